use std::time::Duration;

use thiserror::Error;

/// Failures raised by a browser session or one of its pages.
#[derive(Debug, Error)]
pub enum BrowserError {
    #[error("browser not reachable at {endpoint}: {reason}")]
    Unavailable { endpoint: String, reason: String },

    #[error("WebSocket error: {0}")]
    WebSocket(String),

    #[error("CDP error {code}: {message}")]
    Protocol { code: i64, message: String },

    #[error("JavaScript evaluation failed: {0}")]
    JavaScript(String),

    #[error("browser command {0} timed out")]
    Timeout(String),

    #[error("browser session closed")]
    SessionClosed,

    #[error("unexpected browser response: {0}")]
    InvalidResponse(String),

    #[error("page reported navigation error: {0}")]
    Navigation(String),

    #[error("invalid CSS selector {selector:?}: {reason}")]
    InvalidSelector { selector: String, reason: String },

    #[error("{0} is not supported by this page implementation")]
    UnsupportedLocator(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<tokio_tungstenite::tungstenite::Error> for BrowserError {
    fn from(e: tokio_tungstenite::tungstenite::Error) -> Self {
        BrowserError::WebSocket(e.to_string())
    }
}

/// Handler-level failures. Any of these aborts the extraction; no record is
/// produced.
#[derive(Debug, Error)]
pub enum ScraperError {
    #[error("failed to open browser session: {0}")]
    Session(#[source] BrowserError),

    #[error("navigation to {url} failed: {source}")]
    Navigation {
        url: String,
        #[source]
        source: BrowserError,
    },

    #[error("navigation to {url} timed out after {timeout:?}")]
    NavigationTimeout { url: String, timeout: Duration },
}

impl ScraperError {
    /// Stable machine-readable code for API responses.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            ScraperError::Session(_) => "session_failed",
            ScraperError::Navigation { .. } | ScraperError::NavigationTimeout { .. } => {
                "navigation_failed"
            }
        }
    }
}

/// Field-level failures. These never leave the extractor battery; they are
/// logged and recorded in the [`crate::ExtractionReport`].
#[derive(Debug, Error)]
pub enum FieldError {
    #[error("no element matched {locator}")]
    Missing { locator: String },

    #[error("no recognized currency symbol in {raw:?}")]
    NoCurrency { raw: String },

    #[error("no numeric value in {raw:?}")]
    Unparseable { raw: String },

    #[error("field {field} cannot hold a {got} value")]
    Mismatch {
        field: &'static str,
        got: &'static str,
    },

    #[error(transparent)]
    Page(#[from] BrowserError),
}

impl FieldError {
    /// `true` when the page simply does not carry the value, as opposed to a
    /// read or shaping failure.
    #[must_use]
    pub fn is_absence(&self) -> bool {
        matches!(
            self,
            FieldError::Missing { .. } | FieldError::NoCurrency { .. }
        )
    }
}
