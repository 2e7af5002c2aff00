//! Browser capability seams.
//!
//! The extractor only ever sees a [`Page`]; handlers acquire one through a
//! [`SessionProvider`] and own the resulting [`BrowserSession`] exclusively
//! for a single extraction.

use async_trait::async_trait;

use crate::error::BrowserError;
use crate::locator::{Capture, Locator};

/// Read access to the DOM of a rendered page.
#[async_trait]
pub trait Page: Send + Sync {
    /// Reads `capture` from the first node matching `locator`.
    ///
    /// Returns `Ok(None)` when nothing matches or the attribute is unset.
    async fn first(
        &self,
        locator: &Locator,
        capture: &Capture,
    ) -> Result<Option<String>, BrowserError>;

    /// Reads `capture` from every node matching `locator`, in document order.
    /// Nodes lacking a requested attribute are skipped.
    async fn all(&self, locator: &Locator, capture: &Capture)
        -> Result<Vec<String>, BrowserError>;
}

/// One exclusive browser context and page.
#[async_trait]
pub trait BrowserSession: Send + Sync {
    /// Navigates to `url` and resolves once the page has loaded. Callers
    /// bound this with their own timeout.
    async fn navigate(&mut self, url: &str) -> Result<(), BrowserError>;

    fn page(&self) -> &dyn Page;

    /// Releases the session. Must be called exactly once on every exit path.
    async fn close(&mut self) -> Result<(), BrowserError>;
}

/// Opens fresh sessions. Sessions are never shared between extractions.
#[async_trait]
pub trait SessionProvider: Send + Sync {
    async fn open(
        &self,
        options: &SessionOptions,
    ) -> Result<Box<dyn BrowserSession>, BrowserError>;
}

/// Emulated device position, in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Geolocation {
    pub latitude: f64,
    pub longitude: f64,
    /// Accuracy radius in metres.
    pub accuracy: f64,
}

/// Per-platform session setup applied before navigation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionOptions {
    pub disable_cache: bool,
    pub geolocation: Option<Geolocation>,
    /// Extra request headers sent with every request from the page.
    pub extra_headers: Vec<(String, String)>,
}
