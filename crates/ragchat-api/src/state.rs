//! Application state wiring all services together.
//!
//! AppState holds the concrete service instances used by both CLI and REST API.
//! `ChatService` is generic over its ports; AppState pins it to the boxed
//! wrappers so the storage and transcription backends can be picked from
//! configuration at startup.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;

use ragchat_core::agent::executor::ConversationalAgent;
use ragchat_core::agent::port::BoxAgent;
use ragchat_core::agent::tool::BoxTool;
use ragchat_core::chat::box_repository::BoxChatRepository;
use ragchat_core::chat::service::ChatService;
use ragchat_core::retrieval::qa::RetrievalQa;
use ragchat_core::transcription::BoxTranscriber;
use ragchat_infra::config::resolve_database_url;
use ragchat_infra::llm::create_provider;
use ragchat_infra::memory::InMemoryChatRepository;
use ragchat_infra::sqlite::chat::SqliteChatRepository;
use ragchat_infra::sqlite::pool::DatabasePool;
use ragchat_infra::transcription::create_transcriber;
use ragchat_infra::vector::create_retrieval;
use ragchat_types::agent::AgentConfig;
use ragchat_types::config::{AppConfig, StorageBackend};

pub type ConcreteChatService = ChatService<BoxAgent, BoxChatRepository, BoxTranscriber>;

/// Shared application state.
///
/// Used by both CLI commands and REST API handlers.
#[derive(Clone)]
pub struct AppState {
    pub chat_service: Arc<ConcreteChatService>,
    pub config: Arc<AppConfig>,
    pub data_dir: PathBuf,
}

impl AppState {
    pub fn new(chat_service: ConcreteChatService, config: AppConfig, data_dir: PathBuf) -> Self {
        Self {
            chat_service: Arc::new(chat_service),
            config: Arc::new(config),
            data_dir,
        }
    }

    /// Build the LLM provider, agent, repository, and transcriber from
    /// `config`, then wire the chat service.
    ///
    /// Without Pinecone settings the agent runs with no Knowledge Base tool.
    pub async fn init(config: AppConfig, data_dir: PathBuf) -> anyhow::Result<Self> {
        let provider = Arc::new(
            create_provider(&config.openai).context("OPENAI_API_KEY must be set")?,
        );

        let agent_config = AgentConfig {
            model: config.openai.model_name.clone(),
            temperature: config.openai.temperature,
            max_tokens: config.openai.max_tokens,
            memory_window: config.agent.memory_window,
            max_iterations: config.agent.max_iterations,
        };

        let mut tools = Vec::new();
        match create_retrieval(&config.retrieval, &config.openai).await {
            Ok((embedder, index)) => {
                tools.push(BoxTool::new(RetrievalQa::new(
                    provider.clone(),
                    embedder,
                    index,
                    agent_config.clone(),
                    config.retrieval.top_k,
                )));
            }
            Err(e) => {
                tracing::warn!("Knowledge Base tool disabled: {e}");
            }
        }

        let agent = ConversationalAgent::new(provider, tools, agent_config);

        let repository = match config.storage.backend {
            StorageBackend::Sqlite => {
                let db_url = resolve_database_url(&config, &data_dir);
                let pool = DatabasePool::new(&db_url)
                    .await
                    .with_context(|| format!("failed to open chat database {db_url}"))?;
                BoxChatRepository::new(SqliteChatRepository::new(pool))
            }
            StorageBackend::Memory => BoxChatRepository::new(InMemoryChatRepository::new()),
        };

        let transcriber = create_transcriber(&config.transcription, &config.openai.api_key)?;

        tracing::debug!(
            storage = ?config.storage.backend,
            transcriber = ?config.transcription.backend,
            model = %config.openai.model_name,
            "Application state initialized"
        );

        let chat_service = ChatService::new(BoxAgent::new(agent), repository, transcriber);
        Ok(Self::new(chat_service, config, data_dir))
    }
}
