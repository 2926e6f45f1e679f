use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    routing::{delete, get},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tasktrack_core::expense::CreateExpense;
use tasktrack_core::month::YearMonth;
use tasktrack_service::{ServiceError, TrackerService};

use super::{json_body, to_error, ApiError, AppState};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/expenses", get(list_expenses).post(create_expense))
        .route("/api/expenses/{id}", delete(delete_expense))
        .route("/api/expenses/summary/month", get(monthly_summary))
        .route("/api/expenses/summary/category", get(category_breakdown))
}

#[derive(Debug, Deserialize)]
struct MonthQuery {
    month: Option<String>,
}

async fn list_expenses(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    state
        .service
        .list_expenses()
        .await
        .map(|e| Json(json!(e)))
        .map_err(to_error)
}

async fn create_expense(
    State(state): State<AppState>,
    body: Result<Json<CreateExpense>, JsonRejection>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let input = json_body(body)?;
    state
        .service
        .create_expense(&input)
        .await
        .map(|e| (StatusCode::CREATED, Json(json!(e))))
        .map_err(to_error)
}

async fn delete_expense(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    state
        .service
        .delete_expense(&id)
        .await
        .map(|()| Json(json!({ "message": "Expense deleted" })))
        .map_err(to_error)
}

async fn monthly_summary(
    State(state): State<AppState>,
    Query(q): Query<MonthQuery>,
) -> Result<Json<Value>, ApiError> {
    let month = q
        .month
        .as_deref()
        .filter(|m| !m.trim().is_empty())
        .map(str::parse::<YearMonth>)
        .transpose()
        .map_err(|e| to_error(ServiceError::from(e)))?;
    state
        .service
        .monthly_summary(month)
        .await
        .map(|s| Json(json!(s)))
        .map_err(to_error)
}

async fn category_breakdown(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    state
        .service
        .category_breakdown()
        .await
        .map(|c| Json(json!(c)))
        .map_err(to_error)
}
