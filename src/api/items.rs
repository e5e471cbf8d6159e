use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde_json::{Value, json};

use super::error_response;
use crate::auth::Claims;
use crate::domain::{CreateItemInput, UpdateItemInput};
use crate::infrastructure::AppState;

type ApiResult = Result<Json<Value>, (StatusCode, Json<Value>)>;

/// Read-only snapshot, no role required.
pub async fn list_items(State(state): State<AppState>) -> ApiResult {
    let items = state.items.list_items().await.map_err(error_response)?;
    Ok(Json(json!({ "items": items })))
}

pub async fn get_item(State(state): State<AppState>, Path(id): Path<i32>) -> ApiResult {
    let item = state.items.get_item(id).await.map_err(error_response)?;
    Ok(Json(json!({ "item": item })))
}

pub async fn inventory_summary(State(state): State<AppState>) -> ApiResult {
    let summary = state
        .items
        .inventory_summary()
        .await
        .map_err(error_response)?;
    Ok(Json(json!({ "summary": summary })))
}

pub async fn create_item(
    State(state): State<AppState>,
    claims: Claims,
    Json(payload): Json<CreateItemInput>,
) -> Result<(StatusCode, Json<Value>), (StatusCode, Json<Value>)> {
    let item = state
        .items
        .create_item(&claims.caller(), payload)
        .await
        .map_err(error_response)?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "item": item, "message": "Item created successfully" })),
    ))
}

pub async fn update_item(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    claims: Claims,
    Json(payload): Json<UpdateItemInput>,
) -> ApiResult {
    let item = state
        .items
        .update_item(&claims.caller(), id, payload)
        .await
        .map_err(error_response)?;
    Ok(Json(json!({ "item": item, "message": "Item updated successfully" })))
}

pub async fn delete_item(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    claims: Claims,
) -> ApiResult {
    state
        .items
        .delete_item(&claims.caller(), id)
        .await
        .map_err(error_response)?;
    Ok(Json(json!({ "message": "Item deleted successfully" })))
}
