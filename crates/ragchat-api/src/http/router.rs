//! Axum router configuration with middleware.
//!
//! Middleware: CORS, request tracing, and a body limit sized for voice
//! uploads.

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::http::handlers;
use crate::state::AppState;

/// Largest accepted request body (OpenAI transcription accepts up to 25 MB).
const MAX_BODY_BYTES: usize = 25 * 1024 * 1024;

/// Build the complete API router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/chats", post(handlers::chat::start_chat))
        .route("/chats/", post(handlers::chat::start_chat))
        .route(
            "/chats/{conversation_id}/continue",
            post(handlers::chat::continue_chat),
        )
        .route(
            "/chats/{conversation_id}/continue-with-voice",
            post(handlers::chat::continue_chat_with_voice),
        )
        .route("/health", get(handlers::health::health_check))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::path::PathBuf;

    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use serde_json::Value;
    use tokio::sync::Mutex;
    use tower::ServiceExt;

    use ragchat_core::agent::port::{AgentPort, BoxAgent};
    use ragchat_core::chat::box_repository::BoxChatRepository;
    use ragchat_core::chat::repository::ChatRepository;
    use ragchat_core::chat::service::ChatService;
    use ragchat_core::transcription::BoxTranscriber;
    use ragchat_infra::memory::InMemoryChatRepository;
    use ragchat_infra::transcription::fixed::FixedTranscriber;
    use ragchat_types::agent::AgentReply;
    use ragchat_types::chat::Message;
    use ragchat_types::config::AppConfig;
    use ragchat_types::error::AgentError;
    use ragchat_types::llm::LlmError;

    /// Replies `echo: {query}` and keeps a real memory buffer.
    #[derive(Default)]
    struct EchoAgent {
        memory: Mutex<Vec<Message>>,
        fail: bool,
    }

    impl AgentPort for EchoAgent {
        fn new_session(&self) -> Self {
            Self {
                memory: Mutex::new(Vec::new()),
                fail: self.fail,
            }
        }

        async fn invoke(&self, query: &str) -> Result<AgentReply, AgentError> {
            if self.fail {
                return Err(AgentError::Llm(LlmError::AuthenticationFailed));
            }
            let mut memory = self.memory.lock().await;
            let chat_history = memory.clone();
            let output = format!("echo: {query}");
            memory.push(Message::human(query));
            memory.push(Message::ai(output.clone()));
            Ok(AgentReply {
                input: query.to_string(),
                chat_history,
                output,
                intermediate_steps: Vec::new(),
            })
        }

        async fn get_conversation_history(&self) -> Vec<Message> {
            self.memory.lock().await.clone()
        }

        async fn set_memory_variables(&self, history: Vec<Message>) {
            *self.memory.lock().await = history;
        }

        async fn get_last_response(&self) -> Result<String, AgentError> {
            self.memory
                .lock()
                .await
                .last()
                .map(|m| m.content().to_string())
                .ok_or(AgentError::EmptyMemory)
        }
    }

    fn app_with(agent: EchoAgent) -> (Router, AppState) {
        let service = ChatService::new(
            BoxAgent::new(agent),
            BoxChatRepository::new(InMemoryChatRepository::new()),
            BoxTranscriber::new(FixedTranscriber::new("transcribed words")),
        );
        let state = AppState::new(service, AppConfig::default(), PathBuf::from("/tmp/ragchat-test"));
        (build_router(state.clone()), state)
    }

    fn app() -> (Router, AppState) {
        app_with(EchoAgent::default())
    }

    async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    fn post(uri: &str, body: Body) -> Request<Body> {
        Request::post(uri).body(body).unwrap()
    }

    fn post_json(uri: &str, json: &str) -> Request<Body> {
        Request::post(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap()
    }

    fn post_multipart(uri: &str, field: &str, data: &[u8]) -> Request<Body> {
        let boundary = "ragchat-test-boundary";
        let mut body = Vec::new();
        body.extend_from_slice(
            format!(
                "--{boundary}\r\nContent-Disposition: form-data; name=\"{field}\"; filename=\"voice.m4a\"\r\nContent-Type: audio/m4a\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(data);
        body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());

        Request::post(uri)
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={boundary}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    async fn start(router: &Router) -> String {
        let (status, body) = send(router, post("/chats/", Body::empty())).await;
        assert_eq!(status, StatusCode::OK);
        body["chat_id"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn test_health() {
        let (router, _) = app();
        let request = Request::get("/health").body(Body::empty()).unwrap();
        let (status, body) = send(&router, request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    }

    #[tokio::test]
    async fn test_start_chat_persists_empty_chat() {
        let (router, state) = app();
        let chat_id = start(&router).await;

        let chat = state
            .chat_service
            .repository()
            .get_chat(&chat_id)
            .await
            .unwrap()
            .unwrap();
        assert!(chat.conversation_history().is_empty());
    }

    #[tokio::test]
    async fn test_start_chat_without_trailing_slash() {
        let (router, _) = app();
        let (status, body) = send(&router, post("/chats", Body::empty())).await;
        assert_eq!(status, StatusCode::OK);
        assert!(!body["chat_id"].as_str().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_continue_chat_returns_agent_reply() {
        let (router, state) = app();
        let chat_id = start(&router).await;

        let (status, body) = send(
            &router,
            post_json(&format!("/chats/{chat_id}/continue"), r#"{"query": "hi"}"#),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, serde_json::json!({"response": "echo: hi"}));

        let chat = state
            .chat_service
            .repository()
            .get_chat(&chat_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(
            chat.conversation_history(),
            &[Message::human("hi"), Message::ai("echo: hi")]
        );
    }

    #[tokio::test]
    async fn test_continue_unknown_chat_is_404() {
        let (router, _) = app();
        let (status, body) = send(
            &router,
            post_json("/chats/missing/continue", r#"{"query": "hi"}"#),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["detail"], "Chat not found");
    }

    #[tokio::test]
    async fn test_continue_without_body_is_400() {
        let (router, _) = app();
        let chat_id = start(&router).await;

        let (status, body) =
            send(&router, post(&format!("/chats/{chat_id}/continue"), Body::empty())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["detail"], "No input provided");
    }

    #[tokio::test]
    async fn test_continue_with_empty_query_is_400() {
        let (router, _) = app();
        let chat_id = start(&router).await;

        let (status, _) = send(
            &router,
            post_json(&format!("/chats/{chat_id}/continue"), r#"{"query": ""}"#),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_continue_malformed_body_is_422() {
        let (router, _) = app();
        let chat_id = start(&router).await;

        for bad in ["{not json", "{}", r#"{"question": "hi"}"#] {
            let (status, body) =
                send(&router, post_json(&format!("/chats/{chat_id}/continue"), bad)).await;
            assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY, "body: {bad}");
            assert!(body["detail"].is_string());
        }
    }

    #[tokio::test]
    async fn test_continue_with_voice_uses_transcript() {
        let (router, _) = app();
        let chat_id = start(&router).await;

        let (status, body) = send(
            &router,
            post_multipart(
                &format!("/chats/{chat_id}/continue-with-voice"),
                "voice_file",
                b"\x00\x01fake-audio",
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["response"], "echo: transcribed words");
    }

    #[tokio::test]
    async fn test_continue_with_voice_missing_file_is_400() {
        let (router, _) = app();
        let chat_id = start(&router).await;
        let uri = format!("/chats/{chat_id}/continue-with-voice");

        let (status, _) = send(&router, post(&uri, Body::empty())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = send(&router, post_multipart(&uri, "other_field", b"data")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_continue_with_voice_unknown_chat_is_404() {
        let (router, _) = app();
        let (status, body) = send(
            &router,
            post_multipart("/chats/missing/continue-with-voice", "voice_file", b"audio"),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["detail"], "Chat not found");
    }

    #[tokio::test]
    async fn test_agent_failure_is_500() {
        let (router, _) = app_with(EchoAgent {
            fail: true,
            ..EchoAgent::default()
        });
        let chat_id = start(&router).await;

        let (status, body) = send(
            &router,
            post_json(&format!("/chats/{chat_id}/continue"), r#"{"query": "hi"}"#),
        )
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body["detail"].is_string());
    }
}
