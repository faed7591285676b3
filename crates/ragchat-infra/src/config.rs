//! Application configuration loader for ragchat.
//!
//! Reads `config.toml` from the data directory (`~/.ragchat/` by default)
//! and deserializes it into [`AppConfig`]. Falls back to defaults when the
//! file is missing or malformed, then applies environment overrides.

use std::path::{Path, PathBuf};

use ragchat_types::config::AppConfig;

/// Resolve the data directory: `RAGCHAT_DATA_DIR`, else `~/.ragchat`.
pub fn resolve_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("RAGCHAT_DATA_DIR") {
        return PathBuf::from(dir);
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".ragchat")
}

/// SQLite URL for the chat database.
///
/// Uses `storage.database_url` when set, else `{data_dir}/ragchat.db`.
pub fn resolve_database_url(config: &AppConfig, data_dir: &Path) -> String {
    if config.storage.database_url.is_empty() {
        format!("sqlite://{}/ragchat.db", data_dir.display())
    } else {
        config.storage.database_url.clone()
    }
}

/// Load configuration from `{data_dir}/config.toml`, then apply process
/// environment overrides.
pub async fn load_app_config(data_dir: &Path) -> AppConfig {
    let config = load_config_file(data_dir).await;
    apply_env_overrides(config, |key| std::env::var(key).ok())
}

/// Load `{data_dir}/config.toml` without environment overrides.
///
/// - If the file does not exist, returns [`AppConfig::default()`].
/// - If the file exists but fails to parse, logs a warning and returns the default.
pub async fn load_config_file(data_dir: &Path) -> AppConfig {
    let config_path = data_dir.join("config.toml");

    let content = match tokio::fs::read_to_string(&config_path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config.toml found at {}, using defaults", config_path.display());
            return AppConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", config_path.display());
            return AppConfig::default();
        }
    };

    match toml::from_str::<AppConfig>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!(
                "Failed to parse {}: {err}, using defaults",
                config_path.display()
            );
            AppConfig::default()
        }
    }
}

/// Override individual fields from environment variables.
///
/// `lookup` returns the value of a variable, so tests can pass a map
/// instead of touching the process environment. Unparsable numeric or
/// enum values are ignored with a warning.
pub fn apply_env_overrides(
    mut config: AppConfig,
    lookup: impl Fn(&str) -> Option<String>,
) -> AppConfig {
    let string_overrides: [(&str, &mut String); 11] = [
        ("OPENAI_API_KEY", &mut config.openai.api_key),
        ("OPENAI_MODEL_NAME", &mut config.openai.model_name),
        ("OPENAI_BASE_URL", &mut config.openai.base_url),
        ("OPENAI_TRANSCRIPTION_URL", &mut config.transcription.url),
        ("TRANSCRIPTION_MODEL", &mut config.transcription.model),
        ("EMBEDDING_MODEL_NAME", &mut config.retrieval.embedding_model_name),
        ("PINECONE_API_KEY", &mut config.retrieval.pinecone_api_key),
        ("INDEX_NAME", &mut config.retrieval.index_name),
        ("PINECONE_INDEX_HOST", &mut config.retrieval.index_host),
        ("TEXT_KEY", &mut config.retrieval.text_key),
        ("RAGCHAT_DATABASE_URL", &mut config.storage.database_url),
    ];
    for (key, field) in string_overrides {
        if let Some(value) = lookup(key) {
            *field = value;
        }
    }

    if let Some(value) = lookup("TEMPERATURE") {
        match value.parse::<f64>() {
            Ok(t) => config.openai.temperature = t,
            Err(err) => tracing::warn!("Ignoring TEMPERATURE={value}: {err}"),
        }
    }

    if let Some(value) = lookup("RAGCHAT_STORAGE") {
        match value.parse() {
            Ok(backend) => config.storage.backend = backend,
            Err(err) => tracing::warn!("Ignoring RAGCHAT_STORAGE: {err}"),
        }
    }

    if let Some(value) = lookup("RAGCHAT_TRANSCRIBER") {
        match value.parse() {
            Ok(backend) => config.transcription.backend = backend,
            Err(err) => tracing::warn!("Ignoring RAGCHAT_TRANSCRIBER: {err}"),
        }
    }

    config
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    use ragchat_types::config::{StorageBackend, TranscriptionBackend};
    use tempfile::TempDir;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[tokio::test]
    async fn load_config_file_missing_returns_default() {
        let tmp = TempDir::new().unwrap();
        let config = load_config_file(tmp.path()).await;
        assert_eq!(config.openai.model_name, "gpt-3.5-turbo");
        assert_eq!(config.server.port, 8001);
    }

    #[tokio::test]
    async fn load_config_file_valid_toml_returns_parsed() {
        let tmp = TempDir::new().unwrap();
        tokio::fs::write(
            tmp.path().join("config.toml"),
            r#"
[retrieval]
index_name = "docs"
top_k = 2

[server]
port = 9000
"#,
        )
        .await
        .unwrap();

        let config = load_config_file(tmp.path()).await;
        assert_eq!(config.retrieval.index_name, "docs");
        assert_eq!(config.retrieval.top_k, 2);
        assert_eq!(config.server.port, 9000);
    }

    #[tokio::test]
    async fn load_config_file_invalid_toml_returns_default() {
        let tmp = TempDir::new().unwrap();
        tokio::fs::write(tmp.path().join("config.toml"), "this is not { valid toml !!!")
            .await
            .unwrap();

        let config = load_config_file(tmp.path()).await;
        assert_eq!(config.retrieval.index_name, "default_index");
    }

    #[test]
    fn env_overrides_replace_fields() {
        let config = apply_env_overrides(
            AppConfig::default(),
            env(&[
                ("OPENAI_API_KEY", "sk-env"),
                ("OPENAI_MODEL_NAME", "gpt-4o-mini"),
                ("TEMPERATURE", "0.1"),
                ("INDEX_NAME", "kb"),
                ("RAGCHAT_STORAGE", "memory"),
                ("RAGCHAT_TRANSCRIBER", "fixed"),
            ]),
        );
        assert_eq!(config.openai.api_key, "sk-env");
        assert_eq!(config.openai.model_name, "gpt-4o-mini");
        assert!((config.openai.temperature - 0.1).abs() < f64::EPSILON);
        assert_eq!(config.retrieval.index_name, "kb");
        assert_eq!(config.storage.backend, StorageBackend::Memory);
        assert_eq!(config.transcription.backend, TranscriptionBackend::Fixed);
    }

    #[test]
    fn env_overrides_ignore_invalid_values() {
        let config = apply_env_overrides(
            AppConfig::default(),
            env(&[("TEMPERATURE", "warm"), ("RAGCHAT_STORAGE", "dynamo")]),
        );
        assert!((config.openai.temperature - 0.7).abs() < f64::EPSILON);
        assert_eq!(config.storage.backend, StorageBackend::Sqlite);
    }

    #[test]
    fn database_url_defaults_to_data_dir() {
        let config = AppConfig::default();
        let url = resolve_database_url(&config, Path::new("/tmp/rc"));
        assert_eq!(url, "sqlite:///tmp/rc/ragchat.db");

        let mut config = AppConfig::default();
        config.storage.database_url = "sqlite://other.db".to_string();
        assert_eq!(resolve_database_url(&config, Path::new("/tmp/rc")), "sqlite://other.db");
    }
}
