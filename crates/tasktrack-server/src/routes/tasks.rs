use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::{delete, get},
    Json, Router,
};
use serde_json::{json, Value};
use tasktrack_core::task::CreateTask;
use tasktrack_service::TrackerService;

use super::{json_body, to_error, ApiError, AppState};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/tasks", get(list_tasks).post(create_task))
        .route("/api/tasks/{id}", delete(delete_task))
}

async fn list_tasks(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    state
        .service
        .list_tasks()
        .await
        .map(|t| Json(json!(t)))
        .map_err(to_error)
}

async fn create_task(
    State(state): State<AppState>,
    body: Result<Json<CreateTask>, JsonRejection>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let input = json_body(body)?;
    state
        .service
        .create_task(&input)
        .await
        .map(|t| (StatusCode::CREATED, Json(json!(t))))
        .map_err(to_error)
}

async fn delete_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    state
        .service
        .delete_task(&id)
        .await
        .map(|()| Json(json!({ "message": "Task deleted" })))
        .map_err(to_error)
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{header, Request};
    use axum::Router;
    use serde_json::Value;
    use tower::ServiceExt;

    use crate::test_helpers::test_router;

    async fn send(app: &Router, req: Request<Body>) -> (u16, Value) {
        let res = app.clone().oneshot(req).await.unwrap();
        let status = res.status().as_u16();
        let body = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&body).unwrap_or(Value::Null))
    }

    fn post(uri: &str, body: &str) -> Request<Body> {
        Request::post(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_owned()))
            .unwrap()
    }

    #[tokio::test]
    async fn create_list_delete() {
        let app = test_router();

        let (status, task) = send(&app, post("/api/tasks", r#"{"title":"X"}"#)).await;
        assert_eq!(status, 201);
        assert_eq!(task["title"], "X");
        assert_eq!(task["completed"], false);
        let id = task["id"].as_str().unwrap().to_string();

        let (status, list) = send(&app, Request::get("/api/tasks").body(Body::empty()).unwrap()).await;
        assert_eq!(status, 200);
        assert_eq!(list.as_array().unwrap().len(), 1);

        let uri = format!("/api/tasks/{id}");
        let (status, body) = send(&app, Request::delete(&uri).body(Body::empty()).unwrap()).await;
        assert_eq!(status, 200);
        assert_eq!(body["message"], "Task deleted");

        let (_, list) = send(&app, Request::get("/api/tasks").body(Body::empty()).unwrap()).await;
        assert!(list.as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn missing_title_is_bad_request() {
        let app = test_router();
        let (status, body) = send(&app, post("/api/tasks", r#"{"completed":true}"#)).await;
        assert_eq!(status, 400);
        assert!(body["error"].as_str().unwrap().contains("title"));
    }

    #[tokio::test]
    async fn malformed_body_is_bad_request() {
        let app = test_router();
        let (status, body) = send(&app, post("/api/tasks", "{not json")).await;
        assert_eq!(status, 400);
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn delete_unknown_task() {
        let app = test_router();
        let missing = "/api/tasks/5f1b0c9e-2a4d-4c3b-9e8f-0a1b2c3d4e5f";
        let (status, body) = send(&app, Request::delete(missing).body(Body::empty()).unwrap()).await;
        assert_eq!(status, 404);
        assert!(body["error"].is_string());

        let (status, _) = send(&app, Request::delete("/api/tasks/42").body(Body::empty()).unwrap()).await;
        assert_eq!(status, 400);
    }
}
