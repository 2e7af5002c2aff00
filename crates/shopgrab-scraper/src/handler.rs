//! One extraction request from session acquisition to record.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use shopgrab_core::{Platform, ProductRecord};

use crate::error::ScraperError;
use crate::extractor::{run_battery, ExtractionReport};
use crate::page::{BrowserSession, SessionProvider};
use crate::platforms::{profile_for, PlatformProfile};

/// A finished extraction: the record plus per-field outcomes.
#[derive(Debug, Clone, Serialize)]
pub struct Extraction {
    pub record: ProductRecord,
    pub report: ExtractionReport,
}

/// Runs platform extractions, each on a fresh session from `provider`.
///
/// Cheap to clone; concurrent calls never share a session.
#[derive(Clone)]
pub struct ProductScraper {
    provider: Arc<dyn SessionProvider>,
    navigation_timeout: Duration,
}

impl ProductScraper {
    #[must_use]
    pub fn new(provider: Arc<dyn SessionProvider>, navigation_timeout: Duration) -> Self {
        Self {
            provider,
            navigation_timeout,
        }
    }

    /// Extracts one product page.
    ///
    /// The session is released on every path, including navigation failure.
    /// Field failures never surface here; they leave the field absent and are
    /// listed in [`Extraction::report`].
    ///
    /// # Errors
    ///
    /// - [`ScraperError::Session`] when no browser session can be opened.
    /// - [`ScraperError::Navigation`] when the page fails to load.
    /// - [`ScraperError::NavigationTimeout`] when loading exceeds the
    ///   configured navigation timeout.
    pub async fn scrape(&self, platform: Platform, url: &str) -> Result<Extraction, ScraperError> {
        let profile = profile_for(platform);
        let mut session = self
            .provider
            .open(&profile.session)
            .await
            .map_err(ScraperError::Session)?;

        let result = self.run(&profile, session.as_mut(), url).await;

        if let Err(e) = session.close().await {
            tracing::warn!(%platform, url, error = %e, "failed to release browser session");
        }

        result
    }

    async fn run(
        &self,
        profile: &PlatformProfile,
        session: &mut dyn BrowserSession,
        url: &str,
    ) -> Result<Extraction, ScraperError> {
        let platform = profile.platform;
        tracing::info!(%platform, url, "navigating");

        match tokio::time::timeout(self.navigation_timeout, session.navigate(url)).await {
            Ok(Ok(())) => {}
            Ok(Err(source)) => {
                return Err(ScraperError::Navigation {
                    url: url.to_string(),
                    source,
                })
            }
            Err(_) => {
                return Err(ScraperError::NavigationTimeout {
                    url: url.to_string(),
                    timeout: self.navigation_timeout,
                })
            }
        }

        let mut record = ProductRecord::new(url);
        let report = run_battery(session.page(), profile.fields, &mut record).await;

        tracing::info!(
            %platform,
            job_id = %record.job_id,
            extracted = report.extracted_count(),
            failed = report.failed_count(),
            "extraction finished"
        );

        Ok(Extraction { record, report })
    }
}

impl std::fmt::Debug for ProductScraper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProductScraper")
            .field("navigation_timeout", &self.navigation_timeout)
            .finish_non_exhaustive()
    }
}
