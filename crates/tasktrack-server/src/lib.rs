pub mod config;
pub mod routes;
#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers;

use anyhow::Result;
use tasktrack_db::Database;
use tasktrack_service::seed::{self, SeedOutcome};
use tokio::net::TcpListener;
use tracing::{error, info, warn};

pub use routes::{build_router, AppState, InnerAppState};

/// Serve the API on `listener` until a shutdown signal arrives, then close
/// the store.
pub async fn serve(listener: TcpListener, state: AppState) -> Result<()> {
    let db = state.db.clone();
    let app = build_router(state);
    let result = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await;
    close_store(db.as_ref()).await;
    Ok(result?)
}

/// Insert the sample set into an empty store. Failures are logged and
/// startup carries on. Returns whether sample data was inserted.
pub async fn seed_on_startup(state: &InnerAppState) -> bool {
    match seed::seed_if_empty(&state.service).await {
        Ok(SeedOutcome::Seeded { .. }) => {
            state.mark_seeded();
            true
        }
        Ok(SeedOutcome::Skipped { .. }) => false,
        Err(e) => {
            error!("sample seeding failed: {e}");
            false
        }
    }
}

async fn close_store(db: &dyn Database) {
    db.close().await;
    info!("store disconnected");
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("failed to listen for ctrl-c: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!("failed to listen for SIGTERM: {e}");
                std::future::pending::<()>().await;
            }
        }
    };
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("shutdown signal received, draining connections");
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    use super::*;
    use crate::test_helpers::{test_state, FailingDatabase};

    #[tokio::test]
    async fn startup_seeds_empty_store_once() {
        let state = test_state();
        assert!(seed_on_startup(&state).await);
        assert!(state.is_seeded());
        assert_eq!(state.db.count_tasks(None).await.unwrap(), 3);

        let restarted = InnerAppState::new(state.db.clone());
        assert!(!seed_on_startup(&restarted).await);
        assert!(!restarted.is_seeded());
        assert_eq!(restarted.db.count_tasks(None).await.unwrap(), 3);
        assert_eq!(restarted.db.count_expenses().await.unwrap(), 5);
    }

    #[tokio::test]
    async fn seeding_failure_does_not_stop_startup() {
        let state = InnerAppState::new(Arc::new(FailingDatabase));
        assert!(!seed_on_startup(&state).await);
        assert!(!state.is_seeded());

        let res = build_router(state)
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(res.status(), 200);
    }
}
