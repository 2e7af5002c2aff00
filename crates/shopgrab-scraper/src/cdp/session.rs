use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Map, Value};

use super::connection::CdpConnection;
use super::page::CdpPage;
use super::protocol::BrowserVersion;
use crate::error::BrowserError;
use crate::locator::{Capture, Locator};
use crate::page::{BrowserSession, Page, SessionOptions, SessionProvider};

const READY_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Opens sessions against a running Chrome exposing its DevTools endpoint
/// (e.g. `chrome --headless --remote-debugging-port=9222`).
#[derive(Debug, Clone)]
pub struct CdpSessionProvider {
    endpoint: String,
    command_timeout: Duration,
    http: Client,
}

impl CdpSessionProvider {
    /// `endpoint` is the HTTP debugging endpoint, such as
    /// `http://127.0.0.1:9222`. Every CDP command is bounded by
    /// `command_timeout`.
    ///
    /// # Errors
    ///
    /// Returns [`BrowserError::Http`] if the HTTP client cannot be built.
    pub fn new(endpoint: &str, command_timeout: Duration) -> Result<Self, BrowserError> {
        let http = Client::builder()
            .timeout(command_timeout)
            .connect_timeout(Duration::from_secs(5))
            .build()?;
        Ok(Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            command_timeout,
            http,
        })
    }

    async fn discover(&self) -> Result<BrowserVersion, BrowserError> {
        let url = version_url(&self.endpoint)?;
        let unavailable = |e: reqwest::Error| BrowserError::Unavailable {
            endpoint: self.endpoint.clone(),
            reason: e.to_string(),
        };

        let version: BrowserVersion = self
            .http
            .get(url)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(unavailable)?
            .json()
            .await
            .map_err(unavailable)?;

        tracing::debug!(browser = %version.browser, "discovered browser");
        Ok(version)
    }
}

#[async_trait]
impl SessionProvider for CdpSessionProvider {
    async fn open(
        &self,
        options: &SessionOptions,
    ) -> Result<Box<dyn BrowserSession>, BrowserError> {
        let version = self.discover().await?;
        let conn = Arc::new(
            CdpConnection::connect(&version.web_socket_debugger_url, self.command_timeout).await?,
        );

        let created = conn.call("Target.createBrowserContext", None, None).await?;
        let context_id = string_field(&created, "browserContextId")?;

        let mut session = CdpSession {
            conn: Arc::clone(&conn),
            context_id,
            target_id: None,
            page: None,
            closed: false,
        };

        if let Err(e) = session.prepare(options).await {
            if let Err(close_err) = session.close().await {
                tracing::warn!(error = %close_err, "failed to dispose half-open session");
            }
            return Err(e);
        }

        Ok(Box::new(session))
    }
}

/// An isolated browser context holding exactly one page.
struct CdpSession {
    conn: Arc<CdpConnection>,
    context_id: String,
    target_id: Option<String>,
    page: Option<CdpPage>,
    closed: bool,
}

impl CdpSession {
    async fn prepare(&mut self, options: &SessionOptions) -> Result<(), BrowserError> {
        let target = self
            .conn
            .call(
                "Target.createTarget",
                Some(json!({"url": "about:blank", "browserContextId": self.context_id})),
                None,
            )
            .await?;
        let target_id = string_field(&target, "targetId")?;
        self.target_id = Some(target_id.clone());

        let attached = self
            .conn
            .call(
                "Target.attachToTarget",
                Some(json!({"targetId": target_id, "flatten": true})),
                None,
            )
            .await?;
        let session_id = string_field(&attached, "sessionId")?;

        for domain in ["Page.enable", "Runtime.enable", "Network.enable"] {
            self.conn.call(domain, None, Some(&session_id)).await?;
        }

        if options.disable_cache {
            self.conn
                .call(
                    "Network.setCacheDisabled",
                    Some(json!({"cacheDisabled": true})),
                    Some(&session_id),
                )
                .await?;
        }

        if let Some(geo) = options.geolocation {
            self.conn
                .call(
                    "Browser.grantPermissions",
                    Some(json!({
                        "permissions": ["geolocation"],
                        "browserContextId": self.context_id,
                    })),
                    None,
                )
                .await?;
            self.conn
                .call(
                    "Emulation.setGeolocationOverride",
                    Some(json!({
                        "latitude": geo.latitude,
                        "longitude": geo.longitude,
                        "accuracy": geo.accuracy,
                    })),
                    Some(&session_id),
                )
                .await?;
        }

        if !options.extra_headers.is_empty() {
            let headers: Map<String, Value> = options
                .extra_headers
                .iter()
                .map(|(k, v)| (k.clone(), Value::String(v.clone())))
                .collect();
            self.conn
                .call(
                    "Network.setExtraHTTPHeaders",
                    Some(json!({"headers": headers})),
                    Some(&session_id),
                )
                .await?;
        }

        self.page = Some(CdpPage::new(Arc::clone(&self.conn), session_id));
        Ok(())
    }

    fn cdp_page(&self) -> Result<&CdpPage, BrowserError> {
        match &self.page {
            Some(page) if !self.closed => Ok(page),
            _ => Err(BrowserError::SessionClosed),
        }
    }

    async fn dispose(
        conn: &CdpConnection,
        target_id: Option<&str>,
        context_id: &str,
    ) -> Result<(), BrowserError> {
        if let Some(target_id) = target_id {
            conn.call("Target.closeTarget", Some(json!({"targetId": target_id})), None)
                .await?;
        }
        conn.call(
            "Target.disposeBrowserContext",
            Some(json!({"browserContextId": context_id})),
            None,
        )
        .await?;
        Ok(())
    }
}

#[async_trait]
impl BrowserSession for CdpSession {
    async fn navigate(&mut self, url: &str) -> Result<(), BrowserError> {
        let page = self.cdp_page()?;
        let result = self
            .conn
            .call("Page.navigate", Some(json!({"url": url})), Some(page.session_id()))
            .await?;

        if let Some(error) = result.get("errorText").and_then(Value::as_str) {
            return Err(BrowserError::Navigation(error.to_string()));
        }

        // The old execution context can vanish mid-poll; only a dead
        // connection ends the wait early.
        loop {
            match page.evaluate("document.readyState").await {
                Ok(state) if state.as_str() == Some("complete") => break,
                Ok(_) => {}
                Err(e @ (BrowserError::SessionClosed | BrowserError::WebSocket(_))) => return Err(e),
                Err(e) => tracing::debug!(url, error = %e, "readyState poll failed"),
            }
            tokio::time::sleep(READY_POLL_INTERVAL).await;
        }

        tracing::debug!(url, "page loaded");
        Ok(())
    }

    fn page(&self) -> &dyn Page {
        match &self.page {
            Some(page) => page as &dyn Page,
            None => &ClosedPage,
        }
    }

    async fn close(&mut self) -> Result<(), BrowserError> {
        if self.closed {
            return Ok(());
        }
        // Marked only once teardown has run, so a close cancelled mid-await
        // still leaves the Drop fallback armed.
        let result = Self::dispose(&self.conn, self.target_id.as_deref(), &self.context_id).await;
        self.closed = true;
        result
    }
}

impl Drop for CdpSession {
    fn drop(&mut self) {
        if self.closed {
            return;
        }
        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            tracing::warn!(
                context_id = %self.context_id,
                "session dropped outside runtime; browser context leaked"
            );
            return;
        };
        let conn = Arc::clone(&self.conn);
        let target_id = self.target_id.take();
        let context_id = std::mem::take(&mut self.context_id);
        handle.spawn(async move {
            if let Err(e) = Self::dispose(&conn, target_id.as_deref(), &context_id).await {
                tracing::warn!(%context_id, error = %e, "failed to dispose dropped session");
            }
        });
    }
}

/// Stands in before setup has attached a page.
struct ClosedPage;

#[async_trait]
impl Page for ClosedPage {
    async fn first(&self, _: &Locator, _: &Capture) -> Result<Option<String>, BrowserError> {
        Err(BrowserError::SessionClosed)
    }

    async fn all(&self, _: &Locator, _: &Capture) -> Result<Vec<String>, BrowserError> {
        Err(BrowserError::SessionClosed)
    }
}

/// `/json/version` under the endpoint, keeping any query string (hosted
/// browsers put access tokens there).
fn version_url(endpoint: &str) -> Result<reqwest::Url, BrowserError> {
    let mut url = reqwest::Url::parse(endpoint).map_err(|e| BrowserError::Unavailable {
        endpoint: endpoint.to_string(),
        reason: e.to_string(),
    })?;
    let path = format!("{}/json/version", url.path().trim_end_matches('/'));
    url.set_path(&path);
    Ok(url)
}

fn string_field(value: &Value, key: &str) -> Result<String, BrowserError> {
    value[key]
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| BrowserError::InvalidResponse(format!("missing {key}")))
}
