//! Application error type mapping to HTTP status codes.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use ragchat_types::error::ChatError;

/// Application-level error that maps to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    /// Errors raised by the chat service.
    Chat(ChatError),
    /// Request body could not be decoded.
    Unprocessable(String),
}

impl From<ChatError> for AppError {
    fn from(e: ChatError) -> Self {
        AppError::Chat(e)
    }
}

impl AppError {
    fn status_and_detail(&self) -> (StatusCode, String) {
        match self {
            AppError::Chat(ChatError::NoChatFound(_)) => {
                (StatusCode::NOT_FOUND, "Chat not found".to_string())
            }
            AppError::Chat(ChatError::InputNotProvided) => {
                (StatusCode::BAD_REQUEST, "No input provided".to_string())
            }
            AppError::Chat(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
            AppError::Unprocessable(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg.clone()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, detail) = self.status_and_detail();
        if status.is_server_error() {
            tracing::error!(error = %detail, "Request failed");
        }
        (status, Json(json!({ "detail": detail }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ragchat_types::error::{AgentError, RepositoryError};

    #[test]
    fn test_status_mapping() {
        let cases = [
            (AppError::from(ChatError::NoChatFound("x".into())), StatusCode::NOT_FOUND),
            (AppError::from(ChatError::InputNotProvided), StatusCode::BAD_REQUEST),
            (
                AppError::from(ChatError::Repository(RepositoryError::Connection)),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                AppError::from(ChatError::Agent(AgentError::EmptyMemory)),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (AppError::Unprocessable("bad".into()), StatusCode::UNPROCESSABLE_ENTITY),
        ];
        for (err, expected) in cases {
            assert_eq!(err.status_and_detail().0, expected);
        }
    }

    #[test]
    fn test_not_found_detail() {
        let (_, detail) = AppError::from(ChatError::NoChatFound("abc".into())).status_and_detail();
        assert_eq!(detail, "Chat not found");
    }
}
