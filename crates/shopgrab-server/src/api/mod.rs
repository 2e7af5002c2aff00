mod extract;

use axum::{
    http::{header, HeaderName, Method, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use shopgrab_scraper::{ProductScraper, ScraperError};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::middleware::request_id;

#[derive(Clone)]
pub struct AppState {
    pub scraper: ProductScraper,
}

/// JSON error body: `{"message": ..., "code": ...}`. Validation errors carry
/// only a message.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    body: ErrorBody,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    code: Option<&'static str>,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct HealthData {
    status: &'static str,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            body: ErrorBody {
                message: message.into(),
                code: None,
            },
        }
    }
}

impl From<&ScraperError> for ApiError {
    fn from(error: &ScraperError) -> Self {
        Self {
            status: StatusCode::BAD_GATEWAY,
            body: ErrorBody {
                message: error.to_string(),
                code: Some(error.code()),
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        (self.status, Json(self.body)).into_response()
    }
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE, HeaderName::from_static("x-request-id")])
}

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/", post(extract::extract_product))
        .route("/health", get(health))
        .layer(
            ServiceBuilder::new()
                .layer(axum::middleware::from_fn(request_id))
                .layer(TraceLayer::new_for_http())
                .layer(build_cors()),
        )
        .with_state(state)
}

async fn health() -> impl IntoResponse {
    Json(HealthData { status: "ok" })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use shopgrab_scraper::{CdpSessionProvider, StaticHtmlProvider};
    use tower::ServiceExt;

    use super::*;

    const NOON_PAGE: &str = r#"
        <h1 class="sc-320c5568-18">  Widget  </h1>
        <div class="modelNumber">N-42</div>
    "#;

    fn static_app(html: &str) -> Router {
        let scraper = ProductScraper::new(
            Arc::new(StaticHtmlProvider::new(html)),
            Duration::from_secs(5),
        );
        build_app(AppState { scraper })
    }

    fn unreachable_browser_app() -> Router {
        let provider = CdpSessionProvider::new("http://127.0.0.1:1", Duration::from_secs(2))
            .expect("provider");
        let scraper = ProductScraper::new(Arc::new(provider), Duration::from_secs(5));
        build_app(AppState { scraper })
    }

    fn post_json(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .expect("request")
    }

    async fn json_body(response: axum::response::Response) -> serde_json::Value {
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body bytes");
        serde_json::from_slice(&body).expect("json parse")
    }

    #[tokio::test]
    async fn health_is_ok_with_request_id() {
        let response = static_app("")
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key("x-request-id"));
        assert_eq!(json_body(response).await, serde_json::json!({"status": "ok"}));
    }

    #[tokio::test]
    async fn extract_returns_flat_record() {
        let response = static_app(NOON_PAGE)
            .oneshot(post_json(
                r#"{"url": "https://www.noon.com/p/1", "platform": "noon"}"#,
            ))
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        let json = json_body(response).await;
        assert!(json["jobId"].as_str().expect("jobId").starts_with("job_"));
        assert_eq!(json["url"], "https://www.noon.com/p/1");
        assert_eq!(json["title"], "Widget");
        assert_eq!(json["model"], "N-42");
        assert!(json["price"].is_null());
        assert_eq!(json["description_images"], serde_json::json!([]));
        assert!(json.get("report").is_none());
    }

    #[tokio::test]
    async fn unknown_platform_is_rejected() {
        let response = static_app(NOON_PAGE)
            .oneshot(post_json(r#"{"url": "https://x.example", "platform": "amazon"}"#))
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            json_body(response).await,
            serde_json::json!({"message": "Platform not allowed"})
        );
    }

    #[tokio::test]
    async fn platform_is_checked_before_url() {
        let response = static_app(NOON_PAGE)
            .oneshot(post_json(r#"{"platform": "ebay"}"#))
            .await
            .expect("response");

        assert_eq!(
            json_body(response).await["message"],
            "Platform not allowed"
        );
    }

    #[tokio::test]
    async fn missing_url_is_rejected() {
        for body in [r#"{"platform": "shein"}"#, r#"{"platform": "shein", "url": ""}"#] {
            let response = static_app(NOON_PAGE)
                .oneshot(post_json(body))
                .await
                .expect("response");

            assert_eq!(response.status(), StatusCode::BAD_REQUEST);
            assert_eq!(
                json_body(response).await,
                serde_json::json!({"message": "URL is required"})
            );
        }
    }

    #[tokio::test]
    async fn malformed_json_is_bad_request() {
        let response = static_app(NOON_PAGE)
            .oneshot(post_json("{not json"))
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(json_body(response).await["message"].is_string());
    }

    #[tokio::test]
    async fn unreachable_browser_is_bad_gateway() {
        let response = unreachable_browser_app()
            .oneshot(post_json(
                r#"{"url": "https://www.noon.com/p/1", "platform": "noon"}"#,
            ))
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let json = json_body(response).await;
        assert_eq!(json["code"], "session_failed");
        assert!(json.get("jobId").is_none());
    }

    #[test]
    fn bad_request_body_has_no_code() {
        let response = ApiError::bad_request("URL is required").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
