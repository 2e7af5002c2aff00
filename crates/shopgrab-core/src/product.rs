//! The normalized product record every platform handler populates.
//!
//! Absent values are standardized per field type: scalars serialize as
//! `null`, `description_images` as `[]`. Keys are never omitted.

use rand::Rng;
use serde::{Deserialize, Serialize};

/// SKU or model identifier. Platforms disagree on cardinality, so both a
/// single string and a list are accepted on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ModelNumber {
    One(String),
    Many(Vec<String>),
}

/// One extraction result for a single product page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRecord {
    /// Correlation ID for logs and results, e.g. `"job_1718000000000_42"`.
    #[serde(rename = "jobId")]
    pub job_id: String,
    /// Source URL exactly as the caller supplied it.
    pub url: String,
    pub title: Option<String>,
    pub brand: Option<String>,
    pub image: Option<String>,
    /// Price in the site's native currency unit.
    pub price: Option<f64>,
    pub currency: Option<String>,
    pub specifications: Option<String>,
    pub highlights: Option<String>,
    pub estimator: Option<String>,
    pub shipping_price: Option<f64>,
    pub model: Option<ModelNumber>,
    pub description_images: Vec<String>,
    pub description: Option<String>,
    pub measurements: Option<String>,
}

impl ProductRecord {
    /// Creates an empty record for `url` with a freshly generated job ID.
    #[must_use]
    pub fn new(url: &str) -> Self {
        Self::with_job_id(generate_job_id(), url)
    }

    /// Creates an empty record with a caller-chosen job ID.
    #[must_use]
    pub fn with_job_id(job_id: String, url: &str) -> Self {
        Self {
            job_id,
            url: url.to_string(),
            title: None,
            brand: None,
            image: None,
            price: None,
            currency: None,
            specifications: None,
            highlights: None,
            estimator: None,
            shipping_price: None,
            model: None,
            description_images: Vec::new(),
            description: None,
            measurements: None,
        }
    }
}

/// Generates a job ID of the form `job_<unix-millis>_<0..999>`.
///
/// Uniqueness is best-effort; the ID only correlates logs with results.
#[must_use]
pub fn generate_job_id() -> String {
    let timestamp = chrono::Utc::now().timestamp_millis();
    let random: u16 = rand::rng().random_range(0..1000);
    format!("job_{timestamp}_{random}")
}
