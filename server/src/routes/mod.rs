//! Router assembly and the response envelope.
//!
//! SYSTEM CONTEXT
//! ==============
//! Every API handler answers with the JSON envelope from `logs::wire`:
//! `respond_ok` wraps a body, and `ApiError` renders a failure envelope
//! with the error's stable code and a matching HTTP status.

pub mod logs;

use axum::Router;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use axum::routing::get;
use review::FilterError;
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use ::logs::Envelope;
use ::logs::wire::codes;

use crate::error::ErrorCode;
use crate::params::ParamError;
use crate::state::AppState;
use crate::store::StoreError;

/// Prefix of the admin API.
pub const ADMIN_PREFIX: &str = "/api/admin";

pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let admin = Router::new()
        .route("/logs", get(logs::list_logs))
        .route("/logs/years/{year}/months/{month}", get(logs::list_month_logs));

    Router::new()
        .nest(ADMIN_PREFIX, admin)
        .route("/healthz", get(healthz))
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}

async fn not_found() -> ApiError {
    ApiError::NotFound
}

// =============================================================================
// ENVELOPE
// =============================================================================

pub fn respond_ok<T: Serialize>(body: T) -> Json<Envelope<T>> {
    Json(Envelope::ok(body))
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Param(#[from] ParamError),
    #[error("invalid filters: {0}")]
    Filters(#[from] FilterError),
    #[error("session expired")]
    SessionExpired,
    #[error("not found")]
    NotFound,
    #[error("failed to load logs")]
    Store(#[from] StoreError),
}

impl ErrorCode for ApiError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Param(err) => err.error_code(),
            Self::Filters(_) => codes::INVALID_PARAMETER,
            Self::SessionExpired => codes::SESSION_EXPIRED,
            Self::NotFound => codes::NOT_FOUND,
            Self::Store(err) => err.error_code(),
        }
    }
}

impl ApiError {
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Param(_) | Self::Filters(_) => StatusCode::BAD_REQUEST,
            Self::SessionExpired => StatusCode::UNAUTHORIZED,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let Self::Store(err) = &self {
            tracing::error!(error = %err, "log store failure");
        }
        let envelope = Envelope::<()>::failure(self.to_string(), self.error_code());
        (self.status(), Json(envelope)).into_response()
    }
}
