use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Serialize)]
pub(crate) struct CdpRequest<'a> {
    pub id: u64,
    pub method: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
    #[serde(rename = "sessionId", skip_serializing_if = "Option::is_none")]
    pub session_id: Option<&'a str>,
}

/// Either a command response (`id` set) or an event (`method` set).
#[derive(Debug, Deserialize)]
pub(crate) struct CdpResponse {
    pub id: Option<u64>,
    pub result: Option<Value>,
    pub error: Option<CdpErrorBody>,
    pub method: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CdpErrorBody {
    pub code: i64,
    pub message: String,
}

/// `GET /json/version`. Chrome uses PascalCase for most keys here.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct BrowserVersion {
    #[serde(rename = "Browser", default)]
    pub browser: String,
    #[serde(rename = "webSocketDebuggerUrl")]
    pub web_socket_debugger_url: String,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn request_omits_absent_params_and_session() {
        let req = CdpRequest {
            id: 7,
            method: "Target.createBrowserContext",
            params: None,
            session_id: None,
        };
        let value = serde_json::to_value(&req).unwrap();
        assert_eq!(value, json!({"id": 7, "method": "Target.createBrowserContext"}));
    }

    #[test]
    fn request_carries_flattened_session_id() {
        let req = CdpRequest {
            id: 1,
            method: "Runtime.evaluate",
            params: Some(json!({"expression": "1"})),
            session_id: Some("S1"),
        };
        let value = serde_json::to_value(&req).unwrap();
        assert_eq!(value["sessionId"], "S1");
        assert_eq!(value["params"]["expression"], "1");
    }

    #[test]
    fn parses_error_response() {
        let resp: CdpResponse = serde_json::from_str(
            r#"{"id":3,"error":{"code":-32000,"message":"No target with given id"}}"#,
        )
        .unwrap();
        assert_eq!(resp.id, Some(3));
        let error = resp.error.unwrap();
        assert_eq!(error.code, -32000);
    }

    #[test]
    fn parses_event() {
        let resp: CdpResponse = serde_json::from_str(
            r#"{"method":"Page.loadEventFired","params":{"timestamp":1.0},"sessionId":"S1"}"#,
        )
        .unwrap();
        assert!(resp.id.is_none());
        assert_eq!(resp.method.as_deref(), Some("Page.loadEventFired"));
    }

    #[test]
    fn parses_browser_version() {
        let version: BrowserVersion = serde_json::from_str(
            r#"{"Browser":"HeadlessChrome/126.0","Protocol-Version":"1.3",
                "webSocketDebuggerUrl":"ws://127.0.0.1:9222/devtools/browser/abc"}"#,
        )
        .unwrap();
        assert_eq!(version.browser, "HeadlessChrome/126.0");
        assert!(version.web_socket_debugger_url.ends_with("/abc"));
    }
}
