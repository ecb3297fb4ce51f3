//! Bug API endpoints.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use super::{ApiResponse, ApiResult, Empty};
use crate::errors::{AppError, ErrorResponse};
use crate::models::{Bug, CreateBugRequest, UpdateBugRequest};
use crate::AppState;

/// GET /api/v1/bugs - List all bugs.
pub async fn list_bugs(State(state): State<AppState>) -> ApiResult<Vec<Bug>> {
    let bugs = state.store.list().await?;
    Ok(ApiResponse::collection(bugs))
}

/// GET /api/v1/bugs/:id - Get a single bug.
pub async fn get_bug(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Bug> {
    match state.store.get(&id).await? {
        Some(bug) => Ok(ApiResponse::new(bug)),
        None => Err(AppError::bug_not_found()),
    }
}

/// POST /api/v1/bugs - Create a new bug.
pub async fn create_bug(
    State(state): State<AppState>,
    payload: Result<Json<CreateBugRequest>, JsonRejection>,
) -> Result<(StatusCode, ApiResponse<Bug>), AppError> {
    let Json(request) = payload?;
    let bug = state.store.create(&request).await?;
    Ok((StatusCode::CREATED, ApiResponse::new(bug)))
}

/// PUT /api/v1/bugs/:id - Update a bug.
pub async fn update_bug(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateBugRequest>, JsonRejection>,
) -> Result<Response, AppError> {
    let Json(request) = payload?;
    match state.store.update(&id, &request).await {
        Ok(bug) => Ok(ApiResponse::new(bug).into_response()),
        Err(AppError::NotFound(_)) => Ok(not_found()),
        Err(e) => Err(e),
    }
}

/// DELETE /api/v1/bugs/:id - Delete a bug.
pub async fn delete_bug(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    match state.store.delete(&id).await {
        Ok(()) => Ok(ApiResponse::new(Empty {}).into_response()),
        Err(AppError::NotFound(_)) => Ok(not_found()),
        Err(e) => Err(e),
    }
}

fn not_found() -> Response {
    (StatusCode::NOT_FOUND, Json(ErrorResponse::not_found())).into_response()
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::Body,
        http::{header, Method, Request},
        Router,
    };
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use sqlx::SqlitePool;
    use tempfile::TempDir;
    use tower::ServiceExt;

    use crate::db::{init_database, BugStore};
    use crate::{create_router, AppState};

    async fn app_with_pool() -> (Router, SqlitePool, TempDir) {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let database_url = format!(
            "sqlite:{}?mode=rwc",
            temp_dir.path().join("api.sqlite").display()
        );
        let pool = init_database(&database_url).await.expect("Failed to init DB");
        let state = AppState {
            store: Arc::new(BugStore::new(pool.clone())),
        };
        (create_router(state), pool, temp_dir)
    }

    async fn app() -> (Router, TempDir) {
        let (router, _pool, temp_dir) = app_with_pool().await;
        (router, temp_dir)
    }

    async fn send(app: &Router, method: Method, uri: &str, body: Option<&str>) -> (u16, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(raw) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(raw.to_string())
            }
            None => Body::empty(),
        };
        let response = app
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();
        let status = response.status().as_u16();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    #[tokio::test]
    async fn test_malformed_json_is_bad_request() {
        let (app, _dir) = app().await;

        let (status, body) = send(&app, Method::POST, "/api/v1/bugs", Some("{not json")).await;

        assert_eq!(status, 400);
        assert_eq!(body["success"], false);
        assert_eq!(body["code"], "BAD_REQUEST");
    }

    #[tokio::test]
    async fn test_create_then_fetch_by_id() {
        let (app, _dir) = app().await;

        let payload = json!({ "title": "Broken link", "description": "404 on docs" }).to_string();
        let (status, created) = send(&app, Method::POST, "/api/v1/bugs", Some(&payload)).await;
        assert_eq!(status, 201);
        let id = created["data"]["id"].as_str().unwrap().to_string();

        let (status, fetched) = send(&app, Method::GET, &format!("/api/v1/bugs/{}", id), None).await;
        assert_eq!(status, 200);
        assert_eq!(fetched["data"], created["data"]);
    }

    #[tokio::test]
    async fn test_update_not_found_has_exact_body() {
        let (app, _dir) = app().await;

        let payload = json!({ "status": "resolved" }).to_string();
        let (status, body) = send(&app, Method::PUT, "/api/v1/bugs/unknown", Some(&payload)).await;

        assert_eq!(status, 404);
        assert_eq!(body, json!({ "success": false, "error": "Bug not found" }));
    }

    #[tokio::test]
    async fn test_update_with_bad_enum_is_validation_error() {
        let (app, _dir) = app().await;

        let payload = json!({ "title": "Enum check", "description": "desc" }).to_string();
        let (_, created) = send(&app, Method::POST, "/api/v1/bugs", Some(&payload)).await;
        let id = created["data"]["id"].as_str().unwrap().to_string();

        let payload = json!({ "status": "closed" }).to_string();
        let (status, body) = send(
            &app,
            Method::PUT,
            &format!("/api/v1/bugs/{}", id),
            Some(&payload),
        )
        .await;

        assert_eq!(status, 400);
        assert_eq!(body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_get_unknown_id_goes_through_generic_stage() {
        let (app, _dir) = app().await;

        let (status, body) = send(&app, Method::GET, "/api/v1/bugs/unknown", None).await;

        assert_eq!(status, 404);
        assert_eq!(body["error"], "Bug not found");
        assert_eq!(body["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_store_failure_is_internal_error() {
        let (app, pool, _dir) = app_with_pool().await;
        sqlx::query("DROP TABLE bugs").execute(&pool).await.unwrap();

        let (status, body) = send(&app, Method::GET, "/api/v1/bugs", None).await;

        assert_eq!(status, 500);
        assert_eq!(body["success"], false);
        assert_eq!(body["code"], "DATABASE_ERROR");
        assert_eq!(body["error"], "Database error");

        let payload = json!({ "title": "After failure", "description": "desc" }).to_string();
        let (status, body) = send(&app, Method::POST, "/api/v1/bugs", Some(&payload)).await;

        assert_eq!(status, 500);
        assert_eq!(body["code"], "DATABASE_ERROR");
        assert!(!body["error"].as_str().unwrap().contains("no such table"));
    }
}
