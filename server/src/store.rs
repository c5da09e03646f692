//! Log storage backends.
//!
//! DESIGN
//! ======
//! Stores only know how to scope records by calendar month and return them
//! newest first. Filtering and paging happen above the store (see
//! `services::logs`) so both backends evaluate exactly the same predicate.
//!
//! `MemoryLogStore` is seeded from a JSONL file (one record per line, blank
//! lines skipped). `PgLogStore` keeps each record as JSONB next to the
//! columns it is scoped and ordered by.

use std::path::Path;

use async_trait::async_trait;
use logs::wire::codes;
use logs::{Log, LogScope};
use sqlx::PgPool;
use tokio::sync::RwLock;

use crate::error::ErrorCode;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("line {line}: {source}")]
    Parse { line: usize, source: serde_json::Error },
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("stored record is malformed: {0}")]
    Decode(serde_json::Error),
    #[error("record cannot be encoded: {0}")]
    Encode(serde_json::Error),
}

impl ErrorCode for StoreError {
    fn error_code(&self) -> &'static str {
        codes::STORE_FAILURE
    }
}

#[async_trait]
pub trait LogStore: Send + Sync {
    /// Every record in `scope`, newest first.
    async fn scan(&self, scope: LogScope) -> Result<Vec<Log>, StoreError>;

    /// Add records, replacing any with the same id.
    async fn insert(&self, logs: &[Log]) -> Result<(), StoreError>;
}

// =============================================================================
// IN-MEMORY
// =============================================================================

#[derive(Debug, Default)]
pub struct MemoryLogStore {
    logs: RwLock<Vec<Log>>,
}

impl MemoryLogStore {
    #[must_use]
    pub fn new(logs: Vec<Log>) -> Self {
        Self { logs: RwLock::new(logs) }
    }
}

/// Read a JSONL seed file.
///
/// # Errors
///
/// Returns [`StoreError::Io`] if the file cannot be read and
/// [`StoreError::Parse`] (1-indexed line) for the first bad record.
pub async fn load_jsonl(path: &Path) -> Result<Vec<Log>, StoreError> {
    parse_jsonl(&tokio::fs::read_to_string(path).await?)
}

/// Parse JSONL text into records.
///
/// # Errors
///
/// Returns [`StoreError::Parse`] for the first line that is not a record.
pub fn parse_jsonl(raw: &str) -> Result<Vec<Log>, StoreError> {
    raw.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(idx, line)| serde_json::from_str(line).map_err(|source| StoreError::Parse { line: idx + 1, source }))
        .collect()
}

#[async_trait]
impl LogStore for MemoryLogStore {
    async fn scan(&self, scope: LogScope) -> Result<Vec<Log>, StoreError> {
        let mut logs = self
            .logs
            .read()
            .await
            .iter()
            .filter(|log| scope.contains(log))
            .cloned()
            .collect::<Vec<_>>();
        logs.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(logs)
    }

    async fn insert(&self, logs: &[Log]) -> Result<(), StoreError> {
        let mut stored = self.logs.write().await;
        for log in logs {
            match stored.iter_mut().find(|existing| existing.id == log.id) {
                Some(existing) => existing.clone_from(log),
                None => stored.push(log.clone()),
            }
        }
        Ok(())
    }
}

// =============================================================================
// POSTGRES
// =============================================================================

#[derive(Debug, Clone)]
pub struct PgLogStore {
    pool: PgPool,
}

impl PgLogStore {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LogStore for PgLogStore {
    async fn scan(&self, scope: LogScope) -> Result<Vec<Log>, StoreError> {
        let (year, month) = match scope {
            LogScope::All => (None, None),
            LogScope::Month { year, month } => (Some(year), i32::try_from(month).ok()),
        };
        let rows = sqlx::query_scalar::<_, serde_json::Value>(
            "SELECT data
             FROM logs
             WHERE ($1::INTEGER IS NULL OR year = $1)
               AND ($2::INTEGER IS NULL OR month = $2)
             ORDER BY timestamp DESC",
        )
        .bind(year)
        .bind(month)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|data| serde_json::from_value(data).map_err(StoreError::Decode))
            .collect()
    }

    async fn insert(&self, logs: &[Log]) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await?;
        for log in logs {
            let data = serde_json::to_value(log).map_err(StoreError::Encode)?;
            sqlx::query(
                "INSERT INTO logs (id, year, month, timestamp, data)
                 VALUES ($1, $2, $3, $4, $5)
                 ON CONFLICT (id) DO UPDATE
                 SET year = EXCLUDED.year, month = EXCLUDED.month,
                     timestamp = EXCLUDED.timestamp, data = EXCLUDED.data",
            )
            .bind(&log.id)
            .bind(log.year)
            .bind(i32::try_from(log.month).unwrap_or_default())
            .bind(log.timestamp)
            .bind(data)
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "store_test.rs"]
mod tests;
