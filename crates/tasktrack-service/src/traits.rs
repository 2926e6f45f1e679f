use async_trait::async_trait;
use tasktrack_core::expense::{CategoryTotal, CreateExpense, Expense, MonthlySummary};
use tasktrack_core::month::YearMonth;
use tasktrack_core::task::{CreateTask, Task};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("internal error: {0}")]
    Internal(String),
}

/// Task and expense operations as seen by the HTTP layer and the seeder.
#[async_trait]
pub trait TrackerService: Send + Sync {
    // -- Tasks --
    async fn list_tasks(&self) -> Result<Vec<Task>, ServiceError>;
    async fn create_task(&self, input: &CreateTask) -> Result<Task, ServiceError>;
    async fn delete_task(&self, id: &str) -> Result<(), ServiceError>;
    async fn count_tasks(&self, completed: Option<bool>) -> Result<i64, ServiceError>;
    async fn clear_tasks(&self) -> Result<u64, ServiceError>;

    // -- Expenses --
    /// All expenses, newest first.
    async fn list_expenses(&self) -> Result<Vec<Expense>, ServiceError>;
    async fn create_expense(&self, input: &CreateExpense) -> Result<Expense, ServiceError>;
    async fn delete_expense(&self, id: &str) -> Result<(), ServiceError>;
    async fn count_expenses(&self) -> Result<i64, ServiceError>;
    /// Total and count for `month`, or for the current local month when `None`.
    async fn monthly_summary(&self, month: Option<YearMonth>)
        -> Result<MonthlySummary, ServiceError>;
    async fn category_breakdown(&self) -> Result<Vec<CategoryTotal>, ServiceError>;
    async fn clear_expenses(&self) -> Result<u64, ServiceError>;
}
