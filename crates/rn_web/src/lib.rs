use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod error;
pub mod handlers;
pub mod state;

pub use error::ApiError;
pub use state::AppState;

pub fn create_app(state: AppState) -> Router {
    let cors = CorsLayer::permissive();

    Router::new()
        .route("/", get(handlers::health))
        .route("/related_articles_by_text", post(handlers::related_articles_by_text))
        .route("/update_mbfc_data", post(handlers::update_mbfc_data))
        .route("/check_bias_data", post(handlers::check_bias_data))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(state))
}

pub mod prelude {
    pub use rn_core::{Article, BiasRecord, Error, Result};
    pub use crate::{create_app, ApiError, AppState};
}
