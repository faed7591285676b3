//! Application configuration types for ragchat.
//!
//! `AppConfig` represents the top-level `config.toml` under the data
//! directory. Every field has a default, so an empty or partial file is
//! valid. Environment overrides are applied by the infra loader.

use serde::{Deserialize, Serialize};

use std::fmt;
use std::str::FromStr;

/// Top-level configuration for ragchat.
///
/// Loaded from `~/.ragchat/config.toml` (or `$RAGCHAT_DATA_DIR/config.toml`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub openai: OpenAiSettings,
    #[serde(default)]
    pub transcription: TranscriptionSettings,
    #[serde(default)]
    pub retrieval: RetrievalSettings,
    #[serde(default)]
    pub agent: AgentSettings,
    #[serde(default)]
    pub storage: StorageSettings,
    #[serde(default)]
    pub server: ServerSettings,
}

/// Chat model and embeddings account.
#[derive(Clone, Serialize, Deserialize)]
pub struct OpenAiSettings {
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_model_name")]
    pub model_name: String,
    #[serde(default = "default_openai_base_url")]
    pub base_url: String,
    #[serde(default = "default_temperature")]
    pub temperature: f64,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
}

fn default_model_name() -> String {
    "gpt-3.5-turbo".to_string()
}

fn default_openai_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_temperature() -> f64 {
    0.7
}

fn default_max_tokens() -> u32 {
    1024
}

impl Default for OpenAiSettings {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model_name: default_model_name(),
            base_url: default_openai_base_url(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
        }
    }
}

impl fmt::Debug for OpenAiSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenAiSettings")
            .field("api_key", &redact(&self.api_key))
            .field("model_name", &self.model_name)
            .field("base_url", &self.base_url)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .finish()
    }
}

/// Which speech-to-text adapter to wire.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TranscriptionBackend {
    #[default]
    OpenAi,
    /// Returns `fixed_text` for every payload. Useful offline.
    Fixed,
}

impl FromStr for TranscriptionBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "openai" => Ok(TranscriptionBackend::OpenAi),
            "fixed" => Ok(TranscriptionBackend::Fixed),
            other => Err(format!("invalid transcription backend: '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptionSettings {
    #[serde(default)]
    pub backend: TranscriptionBackend,
    #[serde(default = "default_transcription_url")]
    pub url: String,
    #[serde(default = "default_transcription_model")]
    pub model: String,
    #[serde(default)]
    pub fixed_text: String,
}

fn default_transcription_url() -> String {
    "https://api.openai.com/v1/audio/transcriptions".to_string()
}

fn default_transcription_model() -> String {
    "whisper-1".to_string()
}

impl Default for TranscriptionSettings {
    fn default() -> Self {
        Self {
            backend: TranscriptionBackend::default(),
            url: default_transcription_url(),
            model: default_transcription_model(),
            fixed_text: String::new(),
        }
    }
}

/// Vector index and embedding settings for the Knowledge Base tool.
#[derive(Clone, Serialize, Deserialize)]
pub struct RetrievalSettings {
    #[serde(default)]
    pub pinecone_api_key: String,
    #[serde(default = "default_index_name")]
    pub index_name: String,
    /// Data-plane host. Resolved from `index_name` when empty.
    #[serde(default)]
    pub index_host: String,
    #[serde(default)]
    pub namespace: String,
    #[serde(default = "default_text_key")]
    pub text_key: String,
    #[serde(default = "default_embedding_model_name")]
    pub embedding_model_name: String,
    #[serde(default = "default_top_k")]
    pub top_k: usize,
}

fn default_index_name() -> String {
    "default_index".to_string()
}

fn default_text_key() -> String {
    "text".to_string()
}

fn default_embedding_model_name() -> String {
    "text-embedding-ada-002".to_string()
}

fn default_top_k() -> usize {
    4
}

impl Default for RetrievalSettings {
    fn default() -> Self {
        Self {
            pinecone_api_key: String::new(),
            index_name: default_index_name(),
            index_host: String::new(),
            namespace: String::new(),
            text_key: default_text_key(),
            embedding_model_name: default_embedding_model_name(),
            top_k: default_top_k(),
        }
    }
}

impl fmt::Debug for RetrievalSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetrievalSettings")
            .field("pinecone_api_key", &redact(&self.pinecone_api_key))
            .field("index_name", &self.index_name)
            .field("index_host", &self.index_host)
            .field("namespace", &self.namespace)
            .field("text_key", &self.text_key)
            .field("embedding_model_name", &self.embedding_model_name)
            .field("top_k", &self.top_k)
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentSettings {
    #[serde(default = "default_memory_window")]
    pub memory_window: usize,
    #[serde(default = "default_max_iterations")]
    pub max_iterations: usize,
}

fn default_memory_window() -> usize {
    5
}

fn default_max_iterations() -> usize {
    3
}

impl Default for AgentSettings {
    fn default() -> Self {
        Self {
            memory_window: default_memory_window(),
            max_iterations: default_max_iterations(),
        }
    }
}

/// Which chat repository to wire.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Sqlite,
    Memory,
}

impl FromStr for StorageBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "sqlite" => Ok(StorageBackend::Sqlite),
            "memory" => Ok(StorageBackend::Memory),
            other => Err(format!("invalid storage backend: '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageSettings {
    #[serde(default)]
    pub backend: StorageBackend,
    /// SQLite URL. Empty means `sqlite://{data_dir}/ragchat.db`.
    #[serde(default)]
    pub database_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8001
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn redact(secret: &str) -> &'static str {
    if secret.is_empty() { "<unset>" } else { "<redacted>" }
}
