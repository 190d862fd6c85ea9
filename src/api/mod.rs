use std::path::PathBuf;
use std::sync::Arc;

use axum::http::{HeaderName, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::errors::PlanError;
use crate::provider::DynProvider;
use crate::store::DynStore;

pub mod generate;
pub mod plans;

pub struct AppState {
    pub provider: DynProvider,
    pub store: DynStore,
    pub artifacts_dir: Option<PathBuf>,
}

/// Failure envelope shared by all endpoints.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub success: bool,
    pub error: String,
}

impl IntoResponse for PlanError {
    fn into_response(self) -> Response {
        let status = match self {
            PlanError::NotFound(_) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let body = ErrorBody {
            success: false,
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    // Header list the reference server allowed on every response.
    let allowed_headers = [
        HeaderName::from_static("x-csrf-token"),
        HeaderName::from_static("x-requested-with"),
        HeaderName::from_static("accept"),
        HeaderName::from_static("accept-version"),
        HeaderName::from_static("content-length"),
        HeaderName::from_static("content-md5"),
        HeaderName::from_static("content-type"),
        HeaderName::from_static("date"),
        HeaderName::from_static("x-api-version"),
    ];
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::OPTIONS,
            Method::PATCH,
            Method::DELETE,
            Method::POST,
            Method::PUT,
        ])
        .allow_headers(allowed_headers);

    Router::new()
        .route("/api/generate", post(generate::handle))
        .route("/api/plans", get(plans::list).post(plans::create))
        .route("/api/plans/{id}", get(plans::get_one).delete(plans::remove))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
