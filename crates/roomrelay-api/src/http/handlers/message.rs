//! Chat submission handler.
//!
//! POST /api/message?roomId= with `{text, sender?}` records the message,
//! asks the completion service for a reply, records the reply, and returns
//! `{"reply": "..."}`.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Query, State};
use serde::{Deserialize, Serialize};

use roomrelay_types::message::DEFAULT_SENDER;

use crate::http::error::AppError;
use crate::http::extractors::query::RoomQuery;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SubmitMessageRequest {
    pub text: String,
    #[serde(default)]
    pub sender: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SubmitMessageResponse {
    pub reply: String,
}

/// POST /api/message
pub async fn submit_message(
    State(state): State<AppState>,
    Query(query): Query<RoomQuery>,
    body: Result<Json<SubmitMessageRequest>, JsonRejection>,
) -> Result<Json<SubmitMessageResponse>, AppError> {
    let Json(request) = body?;
    let room_id = query.room_id();
    let sender = request
        .sender
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_SENDER.to_string());

    let reply = state
        .rooms
        .submit_message(&room_id, &sender, &request.text)
        .await?;

    Ok(Json(SubmitMessageResponse { reply }))
}
