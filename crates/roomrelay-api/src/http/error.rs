//! Application error type mapping to HTTP status codes.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use roomrelay_types::error::RoomError;

/// Application-level error that maps to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    /// Room operation failure.
    Room(RoomError),
    /// Request body could not be parsed.
    BadBody(String),
}

impl From<RoomError> for AppError {
    fn from(e: RoomError) -> Self {
        AppError::Room(e)
    }
}

impl From<JsonRejection> for AppError {
    fn from(e: JsonRejection) -> Self {
        AppError::BadBody(e.body_text())
    }
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            AppError::BadBody(_) => StatusCode::BAD_REQUEST,
            AppError::Room(RoomError::Validation(_)) => StatusCode::BAD_REQUEST,
            AppError::Room(RoomError::Completion(_)) => StatusCode::BAD_GATEWAY,
            AppError::Room(RoomError::Persistence(_) | RoomError::PermanentLog(_)) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            AppError::Room(e) => e.to_string(),
            AppError::BadBody(msg) => format!("invalid request body: {msg}"),
        };

        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), "{message}");
        }

        (status, Json(json!({ "error": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use roomrelay_types::completion::CompletionError;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (AppError::Room(RoomError::Validation("empty".into())), StatusCode::BAD_REQUEST),
            (AppError::BadBody("eof".into()), StatusCode::BAD_REQUEST),
            (AppError::Room(RoomError::Persistence("disk".into())), StatusCode::INTERNAL_SERVER_ERROR),
            (
                AppError::Room(RoomError::Completion(CompletionError::EmptyReply)),
                StatusCode::BAD_GATEWAY,
            ),
        ];
        for (error, expected) in cases {
            assert_eq!(error.status(), expected);
        }
    }
}
