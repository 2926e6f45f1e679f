pub(crate) mod migrations;
pub mod queries;

use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::Connection;
use tracing::debug;

use tasktrack_core::expense::{CategoryTotal, Expense, MonthlySummary, NewExpense};
use tasktrack_core::task::{NewTask, Task};

use crate::{Database, DbError};

/// Extension trait that converts `rusqlite::Result<T>` into `Result<T, DbError>`.
pub(crate) trait SqliteResultExt<T> {
    fn to_db(self) -> Result<T, DbError>;
}

impl<T> SqliteResultExt<T> for rusqlite::Result<T> {
    fn to_db(self) -> Result<T, DbError> {
        self.map_err(map_sqlite_err)
    }
}

#[derive(Clone)]
pub struct SqliteDatabase {
    conn: Arc<Mutex<Connection>>,
    ephemeral: bool,
}

impl SqliteDatabase {
    pub fn open_path(path: &Path) -> Result<Self, DbError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path).to_db()?;
        conn.execute_batch(
            "PRAGMA journal_mode=WAL;
             PRAGMA busy_timeout=5000;",
        )
        .to_db()?;
        Self::init(conn, false)
    }

    /// The disposable fallback store: everything vanishes with the process.
    pub fn open_in_memory() -> Result<Self, DbError> {
        Self::open_memory(true)
    }

    pub(crate) fn open_memory(ephemeral: bool) -> Result<Self, DbError> {
        let conn = Connection::open_in_memory().to_db()?;
        Self::init(conn, ephemeral)
    }

    fn init(conn: Connection, ephemeral: bool) -> Result<Self, DbError> {
        let db = Self {
            conn: Arc::new(Mutex::new(conn)),
            ephemeral,
        };
        db.run_migrations()?;
        Ok(db)
    }

    pub(crate) fn with_conn<F, T>(&self, f: F) -> Result<T, DbError>
    where
        F: FnOnce(&Connection) -> Result<T, DbError>,
    {
        let conn = self
            .conn
            .lock()
            .map_err(|_| DbError::Internal("lock poisoned".into()))?;
        f(&conn)
    }

    fn run_migrations(&self) -> Result<(), DbError> {
        self.with_conn(|conn| {
            migrations::run(conn)?;
            Ok(())
        })
    }
}

/// Map a `rusqlite::Error` into a `DbError::Internal`.
pub(crate) fn map_sqlite_err(e: rusqlite::Error) -> DbError {
    DbError::Internal(e.to_string())
}

/// Timestamps are stored as fixed-width UTC text so that string comparison
/// in SQL matches chronological order.
pub(crate) fn to_sql_time(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub(crate) fn from_sql_time(idx: usize, s: &str) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
        })
}

#[async_trait]
impl Database for SqliteDatabase {
    // -- Tasks --
    async fn create_task(&self, input: &NewTask) -> Result<Task, DbError> {
        let db = self.clone();
        let input = input.clone();
        tokio::task::spawn_blocking(move || db.create_task_sync(&input))
            .await
            .map_err(|e| DbError::Internal(e.to_string()))?
    }
    async fn list_tasks(&self) -> Result<Vec<Task>, DbError> {
        let db = self.clone();
        tokio::task::spawn_blocking(move || db.list_tasks_sync())
            .await
            .map_err(|e| DbError::Internal(e.to_string()))?
    }
    async fn delete_task(&self, id: &str) -> Result<(), DbError> {
        let db = self.clone();
        let id = id.to_string();
        tokio::task::spawn_blocking(move || db.delete_task_sync(&id))
            .await
            .map_err(|e| DbError::Internal(e.to_string()))?
    }
    async fn count_tasks(&self, completed: Option<bool>) -> Result<i64, DbError> {
        let db = self.clone();
        tokio::task::spawn_blocking(move || db.count_tasks_sync(completed))
            .await
            .map_err(|e| DbError::Internal(e.to_string()))?
    }
    async fn delete_all_tasks(&self) -> Result<u64, DbError> {
        let db = self.clone();
        tokio::task::spawn_blocking(move || db.delete_all_tasks_sync())
            .await
            .map_err(|e| DbError::Internal(e.to_string()))?
    }

    // -- Expenses --
    async fn create_expense(&self, input: &NewExpense) -> Result<Expense, DbError> {
        let db = self.clone();
        let input = input.clone();
        tokio::task::spawn_blocking(move || db.create_expense_sync(&input))
            .await
            .map_err(|e| DbError::Internal(e.to_string()))?
    }
    async fn list_expenses(&self) -> Result<Vec<Expense>, DbError> {
        let db = self.clone();
        tokio::task::spawn_blocking(move || db.list_expenses_sync())
            .await
            .map_err(|e| DbError::Internal(e.to_string()))?
    }
    async fn delete_expense(&self, id: &str) -> Result<(), DbError> {
        let db = self.clone();
        let id = id.to_string();
        tokio::task::spawn_blocking(move || db.delete_expense_sync(&id))
            .await
            .map_err(|e| DbError::Internal(e.to_string()))?
    }
    async fn count_expenses(&self) -> Result<i64, DbError> {
        let db = self.clone();
        tokio::task::spawn_blocking(move || db.count_expenses_sync())
            .await
            .map_err(|e| DbError::Internal(e.to_string()))?
    }
    async fn summarize_expenses(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<MonthlySummary, DbError> {
        let db = self.clone();
        tokio::task::spawn_blocking(move || db.summarize_expenses_sync(start, end))
            .await
            .map_err(|e| DbError::Internal(e.to_string()))?
    }
    async fn expense_totals_by_category(&self) -> Result<Vec<CategoryTotal>, DbError> {
        let db = self.clone();
        tokio::task::spawn_blocking(move || db.expense_totals_by_category_sync())
            .await
            .map_err(|e| DbError::Internal(e.to_string()))?
    }
    async fn delete_all_expenses(&self) -> Result<u64, DbError> {
        let db = self.clone();
        tokio::task::spawn_blocking(move || db.delete_all_expenses_sync())
            .await
            .map_err(|e| DbError::Internal(e.to_string()))?
    }

    // -- Lifecycle --
    fn is_ephemeral(&self) -> bool {
        self.ephemeral
    }
    async fn close(&self) {
        // The connection is dropped with the last clone of the handle.
        debug!(ephemeral = self.ephemeral, "sqlite store closed");
    }
}
