#[cfg(feature = "postgres")]
pub mod postgres;
pub mod sqlite;

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::{info, warn};

use tasktrack_core::expense::{CategoryTotal, Expense, MonthlySummary, NewExpense};
use tasktrack_core::task::{NewTask, Task};

pub use sqlite::SqliteDatabase;

#[derive(Debug, Error)]
pub enum DbError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

/// Storage operations shared by every backend.
///
/// The service layer only ever sees `Arc<dyn Database>`; whether the rows
/// live in a throwaway in-memory SQLite or a Postgres server is decided once
/// at startup by [`connect`].
#[async_trait]
pub trait Database: Send + Sync {
    // -- Tasks --
    async fn create_task(&self, input: &NewTask) -> Result<Task, DbError>;
    /// All tasks in insertion order.
    async fn list_tasks(&self) -> Result<Vec<Task>, DbError>;
    async fn delete_task(&self, id: &str) -> Result<(), DbError>;
    /// Count tasks, optionally only those with the given `completed` flag.
    async fn count_tasks(&self, completed: Option<bool>) -> Result<i64, DbError>;
    async fn delete_all_tasks(&self) -> Result<u64, DbError>;

    // -- Expenses --
    async fn create_expense(&self, input: &NewExpense) -> Result<Expense, DbError>;
    /// All expenses, newest `date` first.
    async fn list_expenses(&self) -> Result<Vec<Expense>, DbError>;
    async fn delete_expense(&self, id: &str) -> Result<(), DbError>;
    async fn count_expenses(&self) -> Result<i64, DbError>;
    /// Sum and count of expenses dated in `[start, end)`.
    async fn summarize_expenses(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<MonthlySummary, DbError>;
    /// Per-category totals, largest total first.
    async fn expense_totals_by_category(&self) -> Result<Vec<CategoryTotal>, DbError>;
    async fn delete_all_expenses(&self) -> Result<u64, DbError>;

    // -- Lifecycle --
    /// True when this is the disposable fallback store.
    fn is_ephemeral(&self) -> bool;
    /// Release the connection. Safe to call more than once.
    async fn close(&self);
}

/// Which store to open, decided purely by whether a connection string was
/// supplied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreMode {
    Configured(String),
    Ephemeral,
}

impl StoreMode {
    pub fn from_url(url: Option<&str>) -> Self {
        match url.map(str::trim) {
            Some(u) if !u.is_empty() => StoreMode::Configured(u.to_string()),
            _ => StoreMode::Ephemeral,
        }
    }
}

/// Open the store selected by `mode` and run its migrations.
pub async fn connect(mode: &StoreMode) -> Result<Arc<dyn Database>, DbError> {
    match mode {
        StoreMode::Ephemeral => {
            warn!("no database url configured, using an in-memory store; data is lost on exit");
            let db = SqliteDatabase::open_in_memory()?;
            info!("connected to in-memory sqlite store");
            Ok(Arc::new(db))
        }
        StoreMode::Configured(url) => connect_url(url).await,
    }
}

async fn connect_url(url: &str) -> Result<Arc<dyn Database>, DbError> {
    if url.starts_with("postgres://") || url.starts_with("postgresql://") {
        return connect_postgres(url).await;
    }
    if let Some(rest) = url.strip_prefix("sqlite:") {
        let path = rest.strip_prefix("//").unwrap_or(rest);
        if path == ":memory:" {
            info!("connected to configured in-memory sqlite store");
            return Ok(Arc::new(SqliteDatabase::open_memory(false)?));
        }
        let db = SqliteDatabase::open_path(std::path::Path::new(path))?;
        info!(path, "connected to sqlite store");
        return Ok(Arc::new(db));
    }
    Err(DbError::Config(format!(
        "unsupported database url scheme: {}",
        url.split(':').next().unwrap_or(url)
    )))
}

#[cfg(feature = "postgres")]
async fn connect_postgres(url: &str) -> Result<Arc<dyn Database>, DbError> {
    let db = postgres::PostgresDatabase::connect(url).await?;
    info!("connected to postgres store");
    Ok(Arc::new(db))
}

#[cfg(not(feature = "postgres"))]
async fn connect_postgres(_url: &str) -> Result<Arc<dyn Database>, DbError> {
    Err(DbError::Config(
        "postgres support is not enabled in this build".into(),
    ))
}
