use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use chrono::{DateTime, Utc};
use tasktrack_core::expense::{CategoryTotal, Expense, MonthlySummary, NewExpense};
use tasktrack_core::task::{NewTask, Task};
use tasktrack_db::{Database, DbError, SqliteDatabase};
use tokio::net::TcpListener;

use crate::routes::{build_router, AppState, InnerAppState};

/// Fresh state over the in-memory fallback store.
pub fn test_state() -> AppState {
    let db = Arc::new(SqliteDatabase::open_in_memory().unwrap());
    InnerAppState::new(db)
}

/// Build a test router over an in-memory SQLite store.
pub fn test_router() -> Router {
    build_router(test_state())
}

/// A store whose every query fails, as if the connection had dropped.
pub struct FailingDatabase;

fn unavailable<T>() -> Result<T, DbError> {
    Err(DbError::Internal("store unavailable".into()))
}

#[async_trait]
impl Database for FailingDatabase {
    async fn create_task(&self, _input: &NewTask) -> Result<Task, DbError> {
        unavailable()
    }
    async fn list_tasks(&self) -> Result<Vec<Task>, DbError> {
        unavailable()
    }
    async fn delete_task(&self, _id: &str) -> Result<(), DbError> {
        unavailable()
    }
    async fn count_tasks(&self, _completed: Option<bool>) -> Result<i64, DbError> {
        unavailable()
    }
    async fn delete_all_tasks(&self) -> Result<u64, DbError> {
        unavailable()
    }
    async fn create_expense(&self, _input: &NewExpense) -> Result<Expense, DbError> {
        unavailable()
    }
    async fn list_expenses(&self) -> Result<Vec<Expense>, DbError> {
        unavailable()
    }
    async fn delete_expense(&self, _id: &str) -> Result<(), DbError> {
        unavailable()
    }
    async fn count_expenses(&self) -> Result<i64, DbError> {
        unavailable()
    }
    async fn summarize_expenses(
        &self,
        _start: DateTime<Utc>,
        _end: DateTime<Utc>,
    ) -> Result<MonthlySummary, DbError> {
        unavailable()
    }
    async fn expense_totals_by_category(&self) -> Result<Vec<CategoryTotal>, DbError> {
        unavailable()
    }
    async fn delete_all_expenses(&self) -> Result<u64, DbError> {
        unavailable()
    }
    fn is_ephemeral(&self) -> bool {
        false
    }
    async fn close(&self) {}
}

pub struct TestServer {
    pub base_url: String,
    pub state: AppState,
    _handle: tokio::task::JoinHandle<()>,
}

/// Spawn a real server on a random port with an empty in-memory store.
pub async fn spawn_test_server() -> TestServer {
    spawn_test_server_with(test_state()).await
}

pub async fn spawn_test_server_with(state: AppState) -> TestServer {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let base_url = format!("http://{addr}");
    let app = build_router(state.clone());
    let handle = tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    TestServer {
        base_url,
        state,
        _handle: handle,
    }
}
