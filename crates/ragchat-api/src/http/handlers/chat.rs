//! Chat endpoints.
//!
//! - `POST /chats/` starts a conversation.
//! - `POST /chats/{conversation_id}/continue` continues it with an optional
//!   JSON body `{"query": "..."}`.
//! - `POST /chats/{conversation_id}/continue-with-voice` continues it with an
//!   optional multipart file field `voice_file`.

use axum::Json;
use axum::body::Bytes;
use axum::extract::multipart::MultipartRejection;
use axum::extract::{Multipart, Path, State};
use serde::{Deserialize, Serialize};

use crate::http::error::AppError;
use crate::state::AppState;

/// Multipart field carrying the audio upload.
pub const VOICE_FIELD: &str = "voice_file";

#[derive(Debug, Deserialize)]
pub struct ContinueChatRequest {
    pub query: String,
}

#[derive(Debug, Serialize)]
pub struct StartChatResponse {
    pub chat_id: String,
}

#[derive(Debug, Serialize)]
pub struct ContinueChatResponse {
    pub response: String,
}

/// POST /chats/
pub async fn start_chat(State(state): State<AppState>) -> Result<Json<StartChatResponse>, AppError> {
    let chat_id = state.chat_service.start_conversation().await?;
    Ok(Json(StartChatResponse { chat_id }))
}

/// POST /chats/{conversation_id}/continue
///
/// The body is optional: an empty body or JSON `null` means no query.
/// Anything else must decode as `{"query": string}` or the request is
/// rejected with 422.
pub async fn continue_chat(
    State(state): State<AppState>,
    Path(conversation_id): Path<String>,
    body: Bytes,
) -> Result<Json<ContinueChatResponse>, AppError> {
    let query = parse_query(&body)?;
    tracing::info!(chat_id = %conversation_id, has_query = query.is_some(), "Continue chat");

    let response = state
        .chat_service
        .continue_conversation(&conversation_id, query.as_deref(), None)
        .await?;
    Ok(Json(ContinueChatResponse { response }))
}

/// POST /chats/{conversation_id}/continue-with-voice
///
/// A request that is not multipart at all carries no voice file.
pub async fn continue_chat_with_voice(
    State(state): State<AppState>,
    Path(conversation_id): Path<String>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<ContinueChatResponse>, AppError> {
    let voice = match multipart {
        Ok(mut multipart) => read_voice_file(&mut multipart).await?,
        Err(rejection) => {
            tracing::debug!(chat_id = %conversation_id, "No multipart body: {rejection}");
            None
        }
    };
    tracing::info!(
        chat_id = %conversation_id,
        voice_bytes = voice.as_ref().map_or(0, Vec::len),
        "Continue chat with voice"
    );

    let response = state
        .chat_service
        .continue_conversation(&conversation_id, None, voice.as_deref())
        .await?;
    Ok(Json(ContinueChatResponse { response }))
}

fn parse_query(body: &[u8]) -> Result<Option<String>, AppError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }
    let request: Option<ContinueChatRequest> = serde_json::from_slice(body)
        .map_err(|e| AppError::Unprocessable(format!("Invalid request body: {e}")))?;
    Ok(request.map(|r| r.query))
}

async fn read_voice_file(multipart: &mut Multipart) -> Result<Option<Vec<u8>>, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Unprocessable(format!("Invalid multipart body: {e}")))?
    {
        if field.name() == Some(VOICE_FIELD) {
            let bytes = field
                .bytes()
                .await
                .map_err(|e| AppError::Unprocessable(format!("Failed to read {VOICE_FIELD}: {e}")))?;
            return Ok(Some(bytes.to_vec()));
        }
    }
    Ok(None)
}
