// Backend-agnostic integration tests for the Database trait.
//
// Each public async function accepts `&dyn Database` so that the same logic
// can be exercised against both the SQLite and Postgres backends.

use chrono::{DateTime, TimeZone, Utc};
use tasktrack_core::expense::{CreateExpense, NewExpense};
use tasktrack_core::task::{CreateTask, NewTask};
use tasktrack_db::{Database, DbError};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn make_task(title: &str) -> NewTask {
    CreateTask::new(title).resolve(Utc::now()).unwrap()
}

fn at(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 12, 0, 0).unwrap()
}

fn make_expense(title: &str, amount: f64, date: DateTime<Utc>) -> NewExpense {
    CreateExpense::new(title, amount)
        .date(date)
        .resolve(Utc::now())
        .unwrap()
}

// ---------------------------------------------------------------------------
// Task tests
// ---------------------------------------------------------------------------

/// Create, list, delete; deleting twice reports NotFound.
pub async fn test_task_crud(db: &dyn Database) {
    let task = db.create_task(&make_task("Buy groceries")).await.unwrap();
    assert_eq!(task.title, "Buy groceries");
    assert!(!task.completed);
    assert!(!task.id.is_empty());

    let all = db.list_tasks().await.unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0], task);

    db.delete_task(&task.id).await.unwrap();
    assert!(db.list_tasks().await.unwrap().is_empty());

    let err = db.delete_task(&task.id).await.unwrap_err();
    assert!(matches!(err, DbError::NotFound(_)));
}

/// Tasks come back in the order they were inserted.
pub async fn test_task_order(db: &dyn Database) {
    for title in ["third", "first", "second"] {
        db.create_task(&make_task(title)).await.unwrap();
    }
    let titles: Vec<String> = db
        .list_tasks()
        .await
        .unwrap()
        .into_iter()
        .map(|t| t.title)
        .collect();
    assert_eq!(titles, ["third", "first", "second"]);
}

/// Counting by completion and clearing the collection.
pub async fn test_task_counts(db: &dyn Database) {
    db.create_task(&make_task("open")).await.unwrap();
    let mut done = make_task("done");
    done.completed = true;
    db.create_task(&done).await.unwrap();

    assert_eq!(db.count_tasks(None).await.unwrap(), 2);
    assert_eq!(db.count_tasks(Some(true)).await.unwrap(), 1);
    assert_eq!(db.count_tasks(Some(false)).await.unwrap(), 1);

    assert_eq!(db.delete_all_tasks().await.unwrap(), 2);
    assert_eq!(db.count_tasks(None).await.unwrap(), 0);
}

/// A missing id leaves the collection untouched.
pub async fn test_delete_missing_task(db: &dyn Database) {
    db.create_task(&make_task("keep me")).await.unwrap();
    let err = db
        .delete_task("00000000-0000-4000-8000-000000000000")
        .await
        .unwrap_err();
    assert!(matches!(err, DbError::NotFound(_)));
    assert_eq!(db.count_tasks(None).await.unwrap(), 1);
}

// ---------------------------------------------------------------------------
// Expense tests
// ---------------------------------------------------------------------------

/// Create, list, delete; defaults survive the round trip through storage.
pub async fn test_expense_crud(db: &dyn Database) {
    let input = CreateExpense::new("Coffee", 3.5).resolve(Utc::now()).unwrap();
    let expense = db.create_expense(&input).await.unwrap();
    assert_eq!(expense.title, "Coffee");
    assert_eq!(expense.amount, 3.5);
    assert_eq!(expense.category, "Other");
    assert_eq!(expense.date, input.date);

    assert_eq!(db.count_expenses().await.unwrap(), 1);
    db.delete_expense(&expense.id).await.unwrap();
    assert_eq!(db.count_expenses().await.unwrap(), 0);

    let err = db.delete_expense(&expense.id).await.unwrap_err();
    assert!(matches!(err, DbError::NotFound(_)));
}

/// Expenses are listed newest date first regardless of insertion order.
pub async fn test_expense_order(db: &dyn Database) {
    for day in [1, 5, 3] {
        db.create_expense(&make_expense(&format!("day {day}"), 1.0, at(2024, 5, day)))
            .await
            .unwrap();
    }
    let titles: Vec<String> = db
        .list_expenses()
        .await
        .unwrap()
        .into_iter()
        .map(|e| e.title)
        .collect();
    assert_eq!(titles, ["day 5", "day 3", "day 1"]);
}

/// Only expenses inside `[start, end)` are summed.
pub async fn test_expense_summary(db: &dyn Database) {
    let start = Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap();
    let end = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();

    db.create_expense(&make_expense("Morning Coffee", 150.0, at(2024, 5, 2)))
        .await
        .unwrap();
    db.create_expense(&make_expense("Weekly Groceries", 2500.0, at(2024, 5, 3)))
        .await
        .unwrap();
    db.create_expense(&make_expense("Petrol", 1200.0, at(2024, 5, 4)))
        .await
        .unwrap();
    // Exactly on the upper bound: excluded.
    db.create_expense(&make_expense("Next month", 999.0, end))
        .await
        .unwrap();
    // Exactly on the lower bound: included.
    db.create_expense(&make_expense("Month start", 0.0, start))
        .await
        .unwrap();

    let summary = db.summarize_expenses(start, end).await.unwrap();
    assert_eq!(summary.total, 3850.0);
    assert_eq!(summary.count, 4);

    let empty_start = Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap();
    let empty_end = Utc.with_ymd_and_hms(2023, 2, 1, 0, 0, 0).unwrap();
    let empty = db.summarize_expenses(empty_start, empty_end).await.unwrap();
    assert_eq!(empty.total, 0.0);
    assert_eq!(empty.count, 0);
}

/// Per-category totals, largest first.
pub async fn test_category_totals(db: &dyn Database) {
    for (title, amount, category) in [
        ("Coffee", 3.5, "Food"),
        ("Groceries", 54.5, "Food"),
        ("Gas", 40.0, "Transport"),
        ("Book", 12.0, "Education"),
    ] {
        let input = CreateExpense::new(title, amount)
            .category(category)
            .resolve(Utc::now())
            .unwrap();
        db.create_expense(&input).await.unwrap();
    }

    let totals = db.expense_totals_by_category().await.unwrap();
    let summary: Vec<(&str, f64, i64)> = totals
        .iter()
        .map(|t| (t.category.as_str(), t.total, t.count))
        .collect();
    assert_eq!(
        summary,
        [("Food", 58.0, 2), ("Transport", 40.0, 1), ("Education", 12.0, 1)]
    );

    assert_eq!(db.delete_all_expenses().await.unwrap(), 4);
    assert!(db.expense_totals_by_category().await.unwrap().is_empty());
}
