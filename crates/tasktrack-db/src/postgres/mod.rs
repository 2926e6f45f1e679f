pub(crate) mod migrations;
pub mod queries;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::debug;

use tasktrack_core::expense::{CategoryTotal, Expense, MonthlySummary, NewExpense};
use tasktrack_core::task::{NewTask, Task};

use crate::{Database, DbError};

/// Map a sqlx::Error into a DbError::Internal.
pub(crate) fn pg_err(e: sqlx::Error) -> DbError {
    DbError::Internal(e.to_string())
}

/// Create a DbError::NotFound with the given entity description.
pub(crate) fn pg_not_found(entity: &str) -> DbError {
    DbError::NotFound(entity.to_string())
}

#[derive(Clone)]
pub struct PostgresDatabase {
    pub(crate) pool: PgPool,
}

impl PostgresDatabase {
    /// Connect to a Postgres database and run migrations.
    pub async fn connect(url: &str) -> Result<Self, DbError> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(url)
            .await
            .map_err(pg_err)?;

        let db = Self { pool };
        migrations::run(&db.pool).await?;
        Ok(db)
    }
}

#[async_trait]
impl Database for PostgresDatabase {
    // -- Tasks --
    async fn create_task(&self, input: &NewTask) -> Result<Task, DbError> {
        self.pg_create_task(input).await
    }
    async fn list_tasks(&self) -> Result<Vec<Task>, DbError> {
        self.pg_list_tasks().await
    }
    async fn delete_task(&self, id: &str) -> Result<(), DbError> {
        self.pg_delete_task(id).await
    }
    async fn count_tasks(&self, completed: Option<bool>) -> Result<i64, DbError> {
        self.pg_count_tasks(completed).await
    }
    async fn delete_all_tasks(&self) -> Result<u64, DbError> {
        self.pg_delete_all_tasks().await
    }

    // -- Expenses --
    async fn create_expense(&self, input: &NewExpense) -> Result<Expense, DbError> {
        self.pg_create_expense(input).await
    }
    async fn list_expenses(&self) -> Result<Vec<Expense>, DbError> {
        self.pg_list_expenses().await
    }
    async fn delete_expense(&self, id: &str) -> Result<(), DbError> {
        self.pg_delete_expense(id).await
    }
    async fn count_expenses(&self) -> Result<i64, DbError> {
        self.pg_count_expenses().await
    }
    async fn summarize_expenses(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<MonthlySummary, DbError> {
        self.pg_summarize_expenses(start, end).await
    }
    async fn expense_totals_by_category(&self) -> Result<Vec<CategoryTotal>, DbError> {
        self.pg_expense_totals_by_category().await
    }
    async fn delete_all_expenses(&self) -> Result<u64, DbError> {
        self.pg_delete_all_expenses().await
    }

    // -- Lifecycle --
    fn is_ephemeral(&self) -> bool {
        false
    }
    async fn close(&self) {
        self.pool.close().await;
        debug!("postgres pool closed");
    }
}
