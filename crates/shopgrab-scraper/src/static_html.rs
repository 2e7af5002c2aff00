//! Offline pages backed by a saved HTML document.
//!
//! No scripts run and no network is touched: navigation only records the URL.
//! Only CSS locators are supported; XPath rules report
//! [`BrowserError::UnsupportedLocator`] and end up as failed fields.

use std::sync::Arc;

use async_trait::async_trait;
use scraper::{ElementRef, Html, Selector};

use crate::error::BrowserError;
use crate::locator::{Capture, Locator};
use crate::page::{BrowserSession, Page, SessionOptions, SessionProvider};

/// Hands out sessions that all render the same document.
#[derive(Debug, Clone)]
pub struct StaticHtmlProvider {
    html: Arc<str>,
}

impl StaticHtmlProvider {
    #[must_use]
    pub fn new(html: impl Into<String>) -> Self {
        Self {
            html: Arc::from(html.into()),
        }
    }
}

#[async_trait]
impl SessionProvider for StaticHtmlProvider {
    async fn open(
        &self,
        _options: &SessionOptions,
    ) -> Result<Box<dyn BrowserSession>, BrowserError> {
        Ok(Box::new(StaticHtmlSession {
            page: HtmlPage {
                html: Arc::clone(&self.html),
            },
            url: None,
            closed: false,
        }))
    }
}

struct StaticHtmlSession {
    page: HtmlPage,
    url: Option<String>,
    closed: bool,
}

#[async_trait]
impl BrowserSession for StaticHtmlSession {
    async fn navigate(&mut self, url: &str) -> Result<(), BrowserError> {
        if self.closed {
            return Err(BrowserError::SessionClosed);
        }
        tracing::debug!(url, "static page navigation");
        self.url = Some(url.to_string());
        Ok(())
    }

    fn page(&self) -> &dyn Page {
        &self.page
    }

    async fn close(&mut self) -> Result<(), BrowserError> {
        self.closed = true;
        Ok(())
    }
}

/// The document is re-parsed per query; `Html` is not `Send` and cannot be
/// held across the async trait boundary.
struct HtmlPage {
    html: Arc<str>,
}

impl HtmlPage {
    fn query(
        &self,
        locator: Locator,
        capture: Capture,
        first_only: bool,
    ) -> Result<Vec<String>, BrowserError> {
        let Locator::Css(css) = locator else {
            return Err(BrowserError::UnsupportedLocator(locator.to_string()));
        };
        let selector = Selector::parse(css).map_err(|e| BrowserError::InvalidSelector {
            selector: css.to_string(),
            reason: e.to_string(),
        })?;

        let document = Html::parse_document(&self.html);
        let mut matches = document.select(&selector);

        if first_only {
            return Ok(matches
                .next()
                .and_then(|el| read(el, capture))
                .into_iter()
                .collect());
        }
        Ok(matches.filter_map(|el| read(el, capture)).collect())
    }
}

/// Mirrors DOM `textContent` / `getAttribute`.
fn read(element: ElementRef<'_>, capture: Capture) -> Option<String> {
    match capture {
        Capture::Text => Some(element.text().collect()),
        Capture::Attribute(name) => element.value().attr(name).map(str::to_string),
    }
}

#[async_trait]
impl Page for HtmlPage {
    async fn first(
        &self,
        locator: &Locator,
        capture: &Capture,
    ) -> Result<Option<String>, BrowserError> {
        Ok(self.query(*locator, *capture, true)?.into_iter().next())
    }

    async fn all(
        &self,
        locator: &Locator,
        capture: &Capture,
    ) -> Result<Vec<String>, BrowserError> {
        self.query(*locator, *capture, false)
    }
}
