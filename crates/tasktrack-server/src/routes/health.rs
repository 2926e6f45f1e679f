use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{json, Value};
use tasktrack_service::{ServiceError, TrackerService};

use super::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(banner))
        .route("/status", get(status))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ServerStatus {
    uptime_seconds: u64,
    started_at: DateTime<Utc>,
    version: &'static str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct StoreStatus {
    connected: bool,
    in_memory: bool,
    tasks: i64,
    expenses: i64,
    sample_seeded: bool,
}

async fn banner() -> &'static str {
    "TaskNTrack API"
}

async fn status(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    let counts = async {
        let tasks = state.service.count_tasks(None).await?;
        let expenses = state.service.count_expenses().await?;
        Ok::<_, ServiceError>((tasks, expenses))
    };
    match counts.await {
        Ok((tasks, expenses)) => {
            let server = ServerStatus {
                uptime_seconds: state.started.elapsed().as_secs(),
                started_at: state.started_at,
                version: concat!("tasktrack-server/", env!("CARGO_PKG_VERSION")),
            };
            let db = StoreStatus {
                connected: true,
                in_memory: state.db.is_ephemeral(),
                tasks,
                expenses,
                sample_seeded: state.is_seeded(),
            };
            (
                StatusCode::OK,
                Json(json!({ "status": "ok", "server": server, "db": db })),
            )
        }
        Err(e) => {
            tracing::error!("status check failed: {e}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "status": "error", "error": e.to_string() })),
            )
        }
    }
}
