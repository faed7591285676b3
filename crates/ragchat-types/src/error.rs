use thiserror::Error;

use crate::llm::LlmError;

/// Errors surfaced by the chat use cases.
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("no input provided")]
    InputNotProvided,

    #[error("chat '{0}' not found")]
    NoChatFound(String),

    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error(transparent)]
    Agent(#[from] AgentError),

    #[error(transparent)]
    Transcription(#[from] TranscriptionError),
}

/// Errors from repository operations (used by trait definitions in ragchat-core).
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database connection error")]
    Connection,

    #[error("query error: {0}")]
    Query(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Errors raised while running the conversational agent.
#[derive(Debug, Error)]
pub enum AgentError {
    #[error("llm error: {0}")]
    Llm(#[from] LlmError),

    #[error("tool '{name}' failed: {message}")]
    Tool { name: String, message: String },

    #[error("agent memory is empty")]
    EmptyMemory,
}

/// Errors from the speech-to-text collaborator.
#[derive(Debug, Error)]
pub enum TranscriptionError {
    #[error("transcription request failed: {0}")]
    Network(String),

    #[error("transcription service returned HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("invalid transcription response: {0}")]
    Parse(String),
}

/// Errors from embedding and vector index operations.
#[derive(Debug, Error)]
pub enum RetrievalError {
    #[error("embedding error: {0}")]
    Embedding(String),

    #[error("vector index error: {0}")]
    Index(String),

    #[error("retrieval misconfigured: {0}")]
    Config(String),
}
