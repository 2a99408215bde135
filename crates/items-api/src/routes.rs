use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use thiserror::Error;

use crate::db::{CreateItem, Db, DbError, UpdateItem};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Internal(String),
}

impl From<DbError> for ApiError {
    fn from(e: DbError) -> Self {
        match e {
            DbError::NotFound(_) => ApiError::NotFound("Item not found".to_string()),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };
        (status, Json(json!({ "detail": message }))).into_response()
    }
}

pub fn build_router(db: Db) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/items", get(list_items).post(create_item))
        .route(
            "/items/{id}",
            get(get_item).put(update_item).delete(delete_item),
        )
        .with_state(db)
}

async fn root() -> Json<Value> {
    Json(json!({ "message": "items API" }))
}

async fn list_items(State(db): State<Db>) -> Result<Json<Value>, ApiError> {
    let items = db.list_items()?;
    Ok(Json(json!(items)))
}

async fn create_item(
    State(db): State<Db>,
    Json(input): Json<CreateItem>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let item = db.create_item(&input)?;
    Ok((StatusCode::CREATED, Json(json!(item))))
}

async fn get_item(
    State(db): State<Db>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, ApiError> {
    let item = db.get_item(id)?;
    Ok(Json(json!(item)))
}

async fn update_item(
    State(db): State<Db>,
    Path(id): Path<i64>,
    Json(input): Json<UpdateItem>,
) -> Result<Json<Value>, ApiError> {
    let item = db.update_item(id, &input)?;
    Ok(Json(json!(item)))
}

async fn delete_item(
    State(db): State<Db>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    db.delete_item(id)?;
    Ok(StatusCode::NO_CONTENT)
}
