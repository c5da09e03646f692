//! Filtered, paged log queries.
//!
//! DESIGN
//! ======
//! The store returns the scoped records newest first; the filter predicate
//! shared with the dashboard runs here, then the result is cut into pages of
//! the configured size. Page counting is opt-in because callers only need it
//! when a new filter starts over on page 1.

use logs::{LogPage, LogScope};
use review::LogFilters;
use review::pagination::{num_pages, paginate};

use crate::store::{LogStore, StoreError};

/// One page request after parameter coercion.
#[derive(Debug, Clone, PartialEq)]
pub struct PageQuery {
    /// 1-indexed.
    pub page_number: u32,
    pub filters: Option<LogFilters>,
    pub count_documents: bool,
}

/// Fetch one page of `scope` matching the query's filters.
///
/// # Errors
///
/// Returns the store's error if scanning fails.
pub async fn fetch_page(
    store: &dyn LogStore,
    scope: LogScope,
    query: &PageQuery,
    page_size: usize,
) -> Result<LogPage, StoreError> {
    let mut logs = store.scan(scope).await?;
    if let Some(filters) = &query.filters {
        logs.retain(|log| filters.allows(log));
    }
    logs.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));

    let page_number = query.page_number.max(1);
    let items = paginate(&logs, page_number, page_size).to_vec();
    let seen = usize::try_from(page_number).unwrap_or(usize::MAX).saturating_mul(page_size);
    let has_another_page = seen < logs.len();

    tracing::debug!(
        ?scope,
        page_number,
        matched = logs.len(),
        returned = items.len(),
        "log page served"
    );

    Ok(LogPage {
        items,
        has_another_page,
        num_pages: query.count_documents.then(|| num_pages(logs.len(), page_size)),
    })
}

#[cfg(test)]
#[path = "logs_test.rs"]
mod tests;
