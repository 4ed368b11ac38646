use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use rn_core::RelatedArticlesRequest;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tracing::info;
use crate::{ApiError, AppState};

#[derive(Debug, Deserialize)]
pub struct CheckBiasRequest {
    pub domain: String,
}

pub async fn health() -> impl IntoResponse {
    Json(json!({ "message": "Server is running" }))
}

pub async fn related_articles_by_text(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<RelatedArticlesRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(request) = payload.map_err(|e| ApiError::bad_request(e.body_text()))?;
    let articles = state.related.related(&request).await?;
    Ok(Json(json!({ "data": articles })))
}

/// Starts a refresh and answers right away; the outcome only reaches the logs.
pub async fn update_mbfc_data(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    if state.refresher.spawn().is_some() {
        info!("📡 MBFC data update triggered");
    }
    Json(json!({ "message": "MBFC data update has been triggered in the background." }))
}

pub async fn check_bias_data(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CheckBiasRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(request) = payload.map_err(|e| ApiError::bad_request(e.body_text()))?;
    let records = state.enricher.check_bias(&request.domain).await?;
    Ok(Json(json!({ "data": records })))
}
