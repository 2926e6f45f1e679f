pub mod expenses;
pub mod health;
pub mod tasks;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use serde_json::{json, Value};
use tasktrack_db::Database;
use tasktrack_service::{LocalService, ServiceError};
use tower_http::cors::CorsLayer;

pub struct InnerAppState {
    pub service: LocalService,
    pub db: Arc<dyn Database>,
    pub started_at: DateTime<Utc>,
    pub started: Instant,
    /// Set once the startup seeder has inserted the sample set.
    pub sample_seeded: AtomicBool,
}

impl InnerAppState {
    pub fn new(db: Arc<dyn Database>) -> AppState {
        Arc::new(Self {
            service: LocalService::new(db.clone()),
            db,
            started_at: Utc::now(),
            started: Instant::now(),
            sample_seeded: AtomicBool::new(false),
        })
    }

    pub fn mark_seeded(&self) {
        self.sample_seeded.store(true, Ordering::Relaxed);
    }

    pub fn is_seeded(&self) -> bool {
        self.sample_seeded.load(Ordering::Relaxed)
    }
}

pub type AppState = Arc<InnerAppState>;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(health::routes())
        .merge(tasks::routes())
        .merge(expenses::routes())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

pub(crate) type ApiError = (StatusCode, Json<Value>);

pub(crate) fn to_error(e: ServiceError) -> ApiError {
    let status = match &e {
        ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
        ServiceError::InvalidInput(_) => StatusCode::BAD_REQUEST,
        ServiceError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    if status.is_server_error() {
        tracing::error!("request failed: {e}");
    }
    (status, Json(json!({ "error": e.to_string() })))
}

/// Unwrap a JSON body, turning any decode failure into a 400.
pub(crate) fn json_body<T>(body: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    body.map(|Json(v)| v)
        .map_err(|rej| to_error(ServiceError::InvalidInput(rej.body_text())))
}
