//! Sample data so a fresh store has something to show.
//!
//! There is exactly one sample set. Startup inserts it when both
//! collections are empty; the `seed` command inserts it on demand.

use chrono::{Datelike, Local, NaiveDate};
use tasktrack_core::expense::{CategoryTotal, CreateExpense};
use tasktrack_core::month::start_of_day;
use tasktrack_core::task::CreateTask;
use tracing::info;

use crate::{ServiceError, TrackerService};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedOutcome {
    /// The store already held data; nothing was inserted.
    Skipped { tasks: i64, expenses: i64 },
    Seeded { tasks: usize, expenses: usize },
}

pub fn sample_tasks() -> Vec<CreateTask> {
    [
        ("Buy groceries", false),
        ("Finish project report", false),
        ("Read for 30 minutes", true),
    ]
    .into_iter()
    .map(|(title, completed)| CreateTask {
        title: Some(title.into()),
        completed: Some(completed),
    })
    .collect()
}

/// Sample expenses dated at local midnight on days of the month containing
/// `today`, so they all count towards the current monthly summary.
pub fn sample_expenses(today: NaiveDate) -> Result<Vec<CreateExpense>, ServiceError> {
    [
        ("Coffee", 3.5, "Food", 2),
        ("Groceries", 54.23, "Food", 3),
        ("Gas", 40.0, "Transport", 5),
        ("Internet", 60.0, "Utilities", 1),
        ("Book", 12.99, "Education", 7),
    ]
    .into_iter()
    .map(|(title, amount, category, day)| -> Result<CreateExpense, ServiceError> {
        let date = NaiveDate::from_ymd_opt(today.year(), today.month(), day)
            .ok_or_else(|| ServiceError::Internal(format!("no day {day} in {today}")))?;
        Ok(CreateExpense::new(title, amount)
            .category(category)
            .date(start_of_day(&Local, date)?))
    })
    .collect()
}

/// Insert the sample set unconditionally.
pub async fn seed(service: &dyn TrackerService) -> Result<SeedOutcome, ServiceError> {
    let tasks = sample_tasks();
    for task in &tasks {
        service.create_task(task).await?;
    }
    let expenses = sample_expenses(Local::now().date_naive())?;
    for expense in &expenses {
        service.create_expense(expense).await?;
    }
    Ok(SeedOutcome::Seeded {
        tasks: tasks.len(),
        expenses: expenses.len(),
    })
}

/// Insert the sample set only when both collections are empty.
pub async fn seed_if_empty(service: &dyn TrackerService) -> Result<SeedOutcome, ServiceError> {
    let tasks = service.count_tasks(None).await?;
    let expenses = service.count_expenses().await?;
    if tasks + expenses > 0 {
        info!(tasks, expenses, "store already has data, skipping sample seed");
        return Ok(SeedOutcome::Skipped { tasks, expenses });
    }

    info!("store is empty, seeding sample data");
    let outcome = seed(service).await?;
    if let SeedOutcome::Seeded { tasks, expenses } = outcome {
        info!(tasks, expenses, "sample data seeded");
    }
    Ok(outcome)
}

/// Remove every task and expense. Returns the number of rows removed from each.
pub async fn reset(service: &dyn TrackerService) -> Result<(u64, u64), ServiceError> {
    let tasks = service.clear_tasks().await?;
    let expenses = service.clear_expenses().await?;
    info!(tasks, expenses, "cleared existing data");
    Ok((tasks, expenses))
}

/// Totals printed after a manual seed.
#[derive(Debug, Clone, PartialEq)]
pub struct StoreSummary {
    pub tasks: i64,
    pub pending_tasks: i64,
    pub completed_tasks: i64,
    pub expenses: i64,
    pub total_spent: f64,
    pub categories: Vec<CategoryTotal>,
}

pub async fn store_summary(service: &dyn TrackerService) -> Result<StoreSummary, ServiceError> {
    let tasks = service.count_tasks(None).await?;
    let pending_tasks = service.count_tasks(Some(false)).await?;
    let categories = service.category_breakdown().await?;
    Ok(StoreSummary {
        tasks,
        pending_tasks,
        completed_tasks: tasks - pending_tasks,
        expenses: service.count_expenses().await?,
        total_spent: categories.iter().map(|c| c.total).sum(),
        categories,
    })
}
