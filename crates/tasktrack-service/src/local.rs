use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tasktrack_core::expense::{CategoryTotal, CreateExpense, Expense, MonthlySummary};
use tasktrack_core::id::validate_id;
use tasktrack_core::month::YearMonth;
use tasktrack_core::task::{CreateTask, Task};
use tasktrack_core::TasktrackError;
use tasktrack_db::{Database, DbError};
use tracing::debug;

use crate::{ServiceError, TrackerService};

/// Service backed by whichever store [`tasktrack_db::connect`] opened.
#[derive(Clone)]
pub struct LocalService {
    db: Arc<dyn Database>,
}

impl LocalService {
    pub fn new(db: Arc<dyn Database>) -> Self {
        Self { db }
    }
}

impl From<DbError> for ServiceError {
    fn from(e: DbError) -> Self {
        match e {
            DbError::NotFound(msg) => ServiceError::NotFound(msg),
            other => ServiceError::Internal(other.to_string()),
        }
    }
}

impl From<TasktrackError> for ServiceError {
    fn from(e: TasktrackError) -> Self {
        match e {
            TasktrackError::InvalidInput(msg) => ServiceError::InvalidInput(msg),
        }
    }
}

#[async_trait]
impl TrackerService for LocalService {
    async fn list_tasks(&self) -> Result<Vec<Task>, ServiceError> {
        Ok(self.db.list_tasks().await?)
    }

    async fn create_task(&self, input: &CreateTask) -> Result<Task, ServiceError> {
        let new = input.resolve(Utc::now())?;
        let task = self.db.create_task(&new).await?;
        debug!(id = %task.id, "task created");
        Ok(task)
    }

    async fn delete_task(&self, id: &str) -> Result<(), ServiceError> {
        validate_id(id)?;
        Ok(self.db.delete_task(id).await?)
    }

    async fn count_tasks(&self, completed: Option<bool>) -> Result<i64, ServiceError> {
        Ok(self.db.count_tasks(completed).await?)
    }

    async fn clear_tasks(&self) -> Result<u64, ServiceError> {
        Ok(self.db.delete_all_tasks().await?)
    }

    async fn list_expenses(&self) -> Result<Vec<Expense>, ServiceError> {
        Ok(self.db.list_expenses().await?)
    }

    async fn create_expense(&self, input: &CreateExpense) -> Result<Expense, ServiceError> {
        let new = input.resolve(Utc::now())?;
        let expense = self.db.create_expense(&new).await?;
        debug!(id = %expense.id, category = %expense.category, "expense created");
        Ok(expense)
    }

    async fn delete_expense(&self, id: &str) -> Result<(), ServiceError> {
        validate_id(id)?;
        Ok(self.db.delete_expense(id).await?)
    }

    async fn count_expenses(&self) -> Result<i64, ServiceError> {
        Ok(self.db.count_expenses().await?)
    }

    async fn monthly_summary(
        &self,
        month: Option<YearMonth>,
    ) -> Result<MonthlySummary, ServiceError> {
        let month = month.unwrap_or_else(YearMonth::current);
        let (start, end) = month.range()?;
        Ok(self.db.summarize_expenses(start, end).await?)
    }

    async fn category_breakdown(&self) -> Result<Vec<CategoryTotal>, ServiceError> {
        Ok(self.db.expense_totals_by_category().await?)
    }

    async fn clear_expenses(&self) -> Result<u64, ServiceError> {
        Ok(self.db.delete_all_expenses().await?)
    }
}
