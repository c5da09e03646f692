//! Admin log page routes.

use std::collections::HashMap;

use axum::extract::{Path, Query, State};
use axum::http::HeaderMap;
use axum::http::header::AUTHORIZATION;
use axum::response::Json;
use logs::{Envelope, LogPage, LogScope};
use review::LogFilters;

use crate::params::{ParamError, ParamType, coerce_params, from_query};
use crate::routes::{ApiError, respond_ok};
use crate::services::logs::{PageQuery, fetch_page};
use crate::state::AppState;

const PAGE_SCHEMA: &[(&str, ParamType)] = &[
    ("pageNumber", ParamType::Int),
    ("filters", ParamType::JsonOptional),
    ("countDocuments", ParamType::BooleanOptional),
];

const MONTH_SCHEMA: &[(&str, ParamType)] = &[("year", ParamType::Int), ("month", ParamType::Int)];

/// `GET /api/admin/logs`: one page across all records.
pub async fn list_logs(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> Result<Json<Envelope<LogPage>>, ApiError> {
    authorize(&state, &headers)?;
    serve_page(&state, LogScope::All, query).await
}

/// `GET /api/admin/logs/years/{year}/months/{month}`: one page of one month.
pub async fn list_month_logs(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(path): Path<HashMap<String, String>>,
    Query(query): Query<HashMap<String, String>>,
) -> Result<Json<Envelope<LogPage>>, ApiError> {
    authorize(&state, &headers)?;
    let scope = month_scope(path)?;
    serve_page(&state, scope, query).await
}

async fn serve_page(
    state: &AppState,
    scope: LogScope,
    query: HashMap<String, String>,
) -> Result<Json<Envelope<LogPage>>, ApiError> {
    let query = page_query(query)?;
    let page = fetch_page(state.store.as_ref(), scope, &query, state.page_size).await?;
    Ok(respond_ok(page))
}

/// Admin routes require `Authorization: Bearer <token>` when a token is
/// configured. Anything else reads as an expired session.
pub(crate) fn authorize(state: &AppState, headers: &HeaderMap) -> Result<(), ApiError> {
    let Some(token) = state.token.as_deref() else {
        return Ok(());
    };
    let presented = headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "));
    if presented == Some(token) {
        Ok(())
    } else {
        tracing::warn!("rejected admin request without a valid token");
        Err(ApiError::SessionExpired)
    }
}

pub(crate) fn page_query(raw: HashMap<String, String>) -> Result<PageQuery, ApiError> {
    let params = coerce_params(&from_query(raw), PAGE_SCHEMA)?;
    let page_number = params
        .int("pageNumber")
        .and_then(|n| u32::try_from(n).ok())
        .filter(|n| *n >= 1)
        .ok_or_else(|| ParamError::Invalid { name: "pageNumber".into(), expected: "positive integer" })?;
    let filters = params.json("filters").cloned().map(LogFilters::from_value).transpose()?;
    Ok(PageQuery { page_number, filters, count_documents: params.bool("countDocuments").unwrap_or(false) })
}

pub(crate) fn month_scope(raw: HashMap<String, String>) -> Result<LogScope, ApiError> {
    let params = coerce_params(&from_query(raw), MONTH_SCHEMA)?;
    let year = params
        .int("year")
        .and_then(|y| i32::try_from(y).ok())
        .ok_or_else(|| ParamError::Invalid { name: "year".into(), expected: "integer" })?;
    let month = params
        .int("month")
        .and_then(|m| u32::try_from(m).ok())
        .filter(|m| (1..=12).contains(m))
        .ok_or_else(|| ParamError::Invalid { name: "month".into(), expected: "month between 1 and 12" })?;
    Ok(LogScope::Month { year, month })
}

#[cfg(test)]
#[path = "logs_test.rs"]
mod tests;
