use axum::{
    extract::{rejection::JsonRejection, State},
    Extension, Json,
};
use serde::Deserialize;
use serde_json::Value;
use shopgrab_core::{Platform, ProductRecord};

use crate::middleware::RequestId;

use super::{ApiError, AppState};

/// Fields are loosely typed so a wrong-typed `platform` or `url` gets the
/// same message as a missing one.
#[derive(Debug, Deserialize)]
pub(super) struct ExtractRequest {
    #[serde(default)]
    url: Option<Value>,
    #[serde(default)]
    platform: Option<Value>,
}

pub(super) async fn extract_product(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    payload: Result<Json<ExtractRequest>, JsonRejection>,
) -> Result<Json<ProductRecord>, ApiError> {
    let Json(request) = payload.map_err(|rejection| {
        tracing::debug!(request_id = %req_id.0, error = %rejection, "rejected request body");
        ApiError::bad_request(rejection.body_text())
    })?;

    let platform = request
        .platform
        .as_ref()
        .and_then(Value::as_str)
        .and_then(|p| p.parse::<Platform>().ok())
        .ok_or_else(|| ApiError::bad_request("Platform not allowed"))?;

    let url = request
        .url
        .as_ref()
        .and_then(Value::as_str)
        .filter(|u| !u.is_empty())
        .ok_or_else(|| ApiError::bad_request("URL is required"))?;

    match state.scraper.scrape(platform, url).await {
        Ok(extraction) => Ok(Json(extraction.record)),
        Err(e) => {
            tracing::error!(request_id = %req_id.0, %platform, url, error = %e, "extraction failed");
            Err(ApiError::from(&e))
        }
    }
}
