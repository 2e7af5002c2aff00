//! Fault-isolated field extraction.
//!
//! A platform is described as an ordered list of [`FieldRule`]s. The battery
//! runs each rule against the page, shapes the raw text, and writes the value
//! into the [`ProductRecord`]. A failing rule leaves its field absent and the
//! battery moves on; nothing escapes a single field.

use serde::Serialize;
use shopgrab_core::{ModelNumber, ProductRecord};

use crate::error::FieldError;
use crate::locator::{Capture, Locator};
use crate::page::Page;
use crate::shape::{join_lines, match_currency, parse_bare_price, parse_price, strip_first};

/// A record attribute a rule can populate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Title,
    Brand,
    Image,
    Price,
    Currency,
    Specifications,
    Highlights,
    Estimator,
    ShippingPrice,
    Model,
    DescriptionImages,
    Description,
    Measurements,
}

impl Field {
    /// Key of this field in the serialized record.
    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            Field::Title => "title",
            Field::Brand => "brand",
            Field::Image => "image",
            Field::Price => "price",
            Field::Currency => "currency",
            Field::Specifications => "specifications",
            Field::Highlights => "highlights",
            Field::Estimator => "estimator",
            Field::ShippingPrice => "shipping_price",
            Field::Model => "model",
            Field::DescriptionImages => "description_images",
            Field::Description => "description",
            Field::Measurements => "measurements",
        }
    }

    fn assign(self, record: &mut ProductRecord, value: FieldValue) -> Result<(), FieldError> {
        match (self, value) {
            (Field::Title, FieldValue::Text(v)) => record.title = Some(v),
            (Field::Brand, FieldValue::Text(v)) => record.brand = Some(v),
            (Field::Image, FieldValue::Text(v)) => record.image = Some(v),
            (Field::Currency, FieldValue::Text(v)) => record.currency = Some(v),
            (Field::Specifications, FieldValue::Text(v)) => record.specifications = Some(v),
            (Field::Highlights, FieldValue::Text(v)) => record.highlights = Some(v),
            (Field::Estimator, FieldValue::Text(v)) => record.estimator = Some(v),
            (Field::Description, FieldValue::Text(v)) => record.description = Some(v),
            (Field::Measurements, FieldValue::Text(v)) => record.measurements = Some(v),
            (Field::Price, FieldValue::Number(v)) => record.price = Some(v),
            (Field::ShippingPrice, FieldValue::Number(v)) => record.shipping_price = Some(v),
            (Field::Model, FieldValue::Text(v)) => record.model = Some(ModelNumber::One(v)),
            (Field::Model, FieldValue::List(v)) => record.model = Some(ModelNumber::Many(v)),
            (Field::DescriptionImages, FieldValue::List(v)) => record.description_images = v,
            (field, value) => {
                return Err(FieldError::Mismatch {
                    field: field.key(),
                    got: value.kind(),
                })
            }
        }
        Ok(())
    }
}

/// Allow-listed currency symbols for one platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrencySymbols {
    pub symbols: &'static [char],
    /// Take the whole run of adjacent symbols rather than just the first.
    pub run: bool,
}

/// How raw node text becomes a record value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    /// First match, trimmed.
    Text,
    /// First match, exactly as read.
    RawText,
    /// Every match trimmed and newline-joined; no matches gives `""`.
    Joined,
    /// Every match as read; no matches gives `[]`.
    List,
    /// First match through [`parse_price`].
    Price,
    /// First match through [`parse_bare_price`].
    BarePrice,
    /// Currency symbol matched in the first node's text.
    Currency(CurrencySymbols),
    /// First match trimmed, with the first occurrence of the prefix removed.
    StripPrefix(&'static str),
}

/// One field of a platform profile: where to look and how to shape it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldRule {
    pub field: Field,
    pub locator: Locator,
    pub capture: Capture,
    pub shape: Shape,
}

impl FieldRule {
    #[must_use]
    pub const fn new(field: Field, locator: Locator, shape: Shape) -> Self {
        Self {
            field,
            locator,
            capture: Capture::Text,
            shape,
        }
    }

    /// Reads the named attribute instead of the node text.
    #[must_use]
    pub const fn attribute(mut self, name: &'static str) -> Self {
        self.capture = Capture::Attribute(name);
        self
    }
}

/// Result of running one rule.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "reason", rename_all = "snake_case")]
pub enum FieldOutcome {
    Extracted,
    NotFound,
    Failed(String),
}

/// Per-field outcomes in the order the rules ran.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ExtractionReport {
    pub fields: Vec<(Field, FieldOutcome)>,
}

impl ExtractionReport {
    #[must_use]
    pub fn outcome(&self, field: Field) -> Option<&FieldOutcome> {
        self.fields
            .iter()
            .find(|(f, _)| *f == field)
            .map(|(_, outcome)| outcome)
    }

    #[must_use]
    pub fn extracted_count(&self) -> usize {
        self.fields
            .iter()
            .filter(|(_, o)| *o == FieldOutcome::Extracted)
            .count()
    }

    #[must_use]
    pub fn failed_count(&self) -> usize {
        self.fields
            .iter()
            .filter(|(_, o)| matches!(o, FieldOutcome::Failed(_)))
            .count()
    }
}

#[derive(Debug)]
enum FieldValue {
    Text(String),
    Number(f64),
    List(Vec<String>),
}

impl FieldValue {
    fn kind(&self) -> &'static str {
        match self {
            FieldValue::Text(_) => "text",
            FieldValue::Number(_) => "number",
            FieldValue::List(_) => "list",
        }
    }
}

/// Runs every rule in order against `page`, writing results into `record`.
///
/// Never fails: each rule's errors are logged and reported, and the field is
/// left at its absent value.
pub async fn run_battery(
    page: &dyn Page,
    rules: &[FieldRule],
    record: &mut ProductRecord,
) -> ExtractionReport {
    let mut report = ExtractionReport::default();

    for rule in rules {
        let field = rule.field.key();
        let result = match extract_field(page, rule).await {
            Ok(value) => rule.field.assign(record, value),
            Err(e) => Err(e),
        };

        let outcome = match result {
            Ok(()) => FieldOutcome::Extracted,
            Err(e) if e.is_absence() => {
                tracing::debug!(field, job_id = %record.job_id, reason = %e, "field not found");
                FieldOutcome::NotFound
            }
            Err(e) => {
                tracing::warn!(field, job_id = %record.job_id, error = %e, "field extraction failed");
                FieldOutcome::Failed(e.to_string())
            }
        };
        report.fields.push((rule.field, outcome));
    }

    report
}

/// Locates, reads and shapes one field. The read and the shaping are a single
/// unit: a price whose text was fetched but cannot be parsed fails here.
async fn extract_field(page: &dyn Page, rule: &FieldRule) -> Result<FieldValue, FieldError> {
    match rule.shape {
        Shape::Joined => {
            let items = page.all(&rule.locator, &rule.capture).await?;
            Ok(FieldValue::Text(join_lines(&items)))
        }
        Shape::List => {
            let items = page.all(&rule.locator, &rule.capture).await?;
            Ok(FieldValue::List(items))
        }
        Shape::Text => {
            let raw = first_match(page, rule).await?;
            Ok(FieldValue::Text(raw.trim().to_string()))
        }
        Shape::RawText => Ok(FieldValue::Text(first_match(page, rule).await?)),
        Shape::StripPrefix(prefix) => {
            let raw = first_match(page, rule).await?;
            Ok(FieldValue::Text(strip_first(&raw, prefix)))
        }
        Shape::Price => {
            let raw = first_match(page, rule).await?;
            parse_price(&raw)
                .map(FieldValue::Number)
                .ok_or(FieldError::Unparseable { raw })
        }
        Shape::BarePrice => {
            let raw = first_match(page, rule).await?;
            parse_bare_price(raw.trim())
                .map(FieldValue::Number)
                .ok_or(FieldError::Unparseable { raw })
        }
        Shape::Currency(currency) => {
            let raw = first_match(page, rule).await?;
            match_currency(&raw, currency.symbols, currency.run)
                .map(FieldValue::Text)
                .ok_or(FieldError::NoCurrency { raw })
        }
    }
}

async fn first_match(page: &dyn Page, rule: &FieldRule) -> Result<String, FieldError> {
    page.first(&rule.locator, &rule.capture)
        .await?
        .ok_or_else(|| FieldError::Missing {
            locator: rule.locator.to_string(),
        })
}

#[cfg(test)]
#[path = "extractor_test.rs"]
mod tests;
