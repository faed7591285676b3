//! OpenAI embeddings client.
//!
//! Implements the `Embedder` trait from `ragchat-core` against
//! `POST {base_url}/embeddings`.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use ragchat_core::retrieval::embedder::Embedder;
use ragchat_types::error::RetrievalError;

pub struct OpenAiEmbedder {
    http: reqwest::Client,
    api_key: SecretString,
    base_url: String,
    model: String,
}

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Deserialize)]
struct EmbeddingData {
    index: usize,
    embedding: Vec<f32>,
}

impl OpenAiEmbedder {
    pub fn new(api_key: SecretString, base_url: String, model: String) -> Result<Self, RetrievalError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .map_err(|e| RetrievalError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            model,
        })
    }
}

impl Embedder for OpenAiEmbedder {
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, RetrievalError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let response = self
            .http
            .post(format!("{}/embeddings", self.base_url))
            .bearer_auth(self.api_key.expose_secret())
            .json(&EmbeddingRequest {
                model: &self.model,
                input: texts,
            })
            .send()
            .await
            .map_err(|e| RetrievalError::Embedding(format!("HTTP request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RetrievalError::Embedding(format!("HTTP {status}: {body}")));
        }

        let mut parsed: EmbeddingResponse = response
            .json()
            .await
            .map_err(|e| RetrievalError::Embedding(format!("failed to parse response: {e}")))?;

        if parsed.data.len() != texts.len() {
            return Err(RetrievalError::Embedding(format!(
                "expected {} embeddings, got {}",
                texts.len(),
                parsed.data.len()
            )));
        }

        parsed.data.sort_by_key(|d| d.index);
        Ok(parsed.data.into_iter().map(|d| d.embedding).collect())
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
