//! Room history handlers.
//!
//! Endpoints (also mounted under `/api/room/history`):
//! - GET  /history?roomId=  - The room's pruned history as a JSON array
//! - POST /history?roomId=  - Append `{sender, text, timestamp?}` to the room

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Query, State};
use serde_json::{Value, json};

use roomrelay_types::message::{Message, NewMessage};

use crate::http::error::AppError;
use crate::http::extractors::query::RoomQuery;
use crate::state::AppState;

/// GET /history
pub async fn get_history(
    State(state): State<AppState>,
    Query(query): Query<RoomQuery>,
) -> Result<Json<Vec<Message>>, AppError> {
    let room_id = query.room_id();
    let history = state.rooms.history(&room_id).await?;
    Ok(Json(history))
}

/// POST /history
pub async fn append_history(
    State(state): State<AppState>,
    Query(query): Query<RoomQuery>,
    body: Result<Json<NewMessage>, JsonRejection>,
) -> Result<Json<Value>, AppError> {
    let Json(new_message) = body?;
    let room_id = query.room_id();
    state.rooms.record_message(&room_id, new_message).await?;
    Ok(Json(json!({ "ok": true })))
}
