use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};

use super::connection::CdpConnection;
use crate::error::BrowserError;
use crate::locator::{Capture, Locator};
use crate::page::Page;

/// DOM reads run as `Runtime.evaluate` in the attached target.
pub(crate) struct CdpPage {
    conn: Arc<CdpConnection>,
    session_id: String,
}

impl CdpPage {
    pub(crate) fn new(conn: Arc<CdpConnection>, session_id: String) -> Self {
        Self { conn, session_id }
    }

    pub(crate) fn session_id(&self) -> &str {
        &self.session_id
    }

    pub(crate) async fn evaluate(&self, expression: &str) -> Result<Value, BrowserError> {
        let result = self
            .conn
            .call(
                "Runtime.evaluate",
                Some(json!({
                    "expression": expression,
                    "returnByValue": true,
                })),
                Some(&self.session_id),
            )
            .await?;

        if let Some(exception) = result.get("exceptionDetails") {
            let text = exception["exception"]["description"]
                .as_str()
                .or_else(|| exception["text"].as_str())
                .unwrap_or("unknown exception");
            return Err(BrowserError::JavaScript(text.to_string()));
        }

        Ok(result["result"]["value"].clone())
    }
}

#[async_trait]
impl Page for CdpPage {
    async fn first(
        &self,
        locator: &Locator,
        capture: &Capture,
    ) -> Result<Option<String>, BrowserError> {
        match self.evaluate(&first_script(locator, capture)?).await? {
            Value::Null => Ok(None),
            Value::String(s) => Ok(Some(s)),
            other => Err(BrowserError::InvalidResponse(format!(
                "expected string or null from {locator}, got {other}"
            ))),
        }
    }

    async fn all(
        &self,
        locator: &Locator,
        capture: &Capture,
    ) -> Result<Vec<String>, BrowserError> {
        let value = self.evaluate(&all_script(locator, capture)?).await?;
        Ok(serde_json::from_value(value)?)
    }
}

/// JS expression reading `capture` from a node bound to `el`. Attribute
/// nodes (from `/@attr` XPaths) only have text.
fn capture_expr(capture: &Capture) -> Result<String, BrowserError> {
    Ok(match capture {
        Capture::Text => "el.textContent".to_string(),
        Capture::Attribute(name) => format!(
            "(el.nodeType === 1 ? el.getAttribute({}) : null)",
            serde_json::to_string(name)?
        ),
    })
}

fn first_script(locator: &Locator, capture: &Capture) -> Result<String, BrowserError> {
    let find = match locator {
        Locator::Css(sel) => format!("document.querySelector({})", serde_json::to_string(sel)?),
        Locator::XPath(path) => format!(
            "document.evaluate({}, document, null, XPathResult.FIRST_ORDERED_NODE_TYPE, null).singleNodeValue",
            serde_json::to_string(path)?
        ),
    };
    Ok(format!(
        "(() => {{ const el = {find}; if (!el) return null; return {}; }})()",
        capture_expr(capture)?
    ))
}

fn all_script(locator: &Locator, capture: &Capture) -> Result<String, BrowserError> {
    let nodes = match locator {
        Locator::Css(sel) => format!(
            "Array.from(document.querySelectorAll({}))",
            serde_json::to_string(sel)?
        ),
        Locator::XPath(path) => format!(
            "(() => {{ const snap = document.evaluate({}, document, null, \
             XPathResult.ORDERED_NODE_SNAPSHOT_TYPE, null); const out = []; \
             for (let i = 0; i < snap.snapshotLength; i++) out.push(snap.snapshotItem(i)); \
             return out; }})()",
            serde_json::to_string(path)?
        ),
    };
    Ok(format!(
        "{nodes}.map((el) => {}).filter((v) => v !== null)",
        capture_expr(capture)?
    ))
}
