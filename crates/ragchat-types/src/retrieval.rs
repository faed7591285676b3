//! Vector retrieval types for ragchat.
//!
//! These model what flows between the embedder, the vector index, and the
//! retrieval QA tool.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A document returned by a similarity query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredDocument {
    pub id: String,
    pub score: f32,
    /// Text pulled from the metadata field named by `text_key`.
    pub text: String,
}

/// A vector and its metadata, ready to upsert into an index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VectorRecord {
    pub id: String,
    pub values: Vec<f32>,
    #[serde(default)]
    pub metadata: Map<String, Value>,
}

impl VectorRecord {
    /// Build a record carrying `text` under `text_key` plus its source path.
    pub fn with_text(
        id: impl Into<String>,
        values: Vec<f32>,
        text_key: &str,
        text: impl Into<String>,
        source: impl Into<String>,
    ) -> Self {
        let mut metadata = Map::new();
        metadata.insert(text_key.to_string(), Value::String(text.into()));
        metadata.insert("source".to_string(), Value::String(source.into()));
        Self {
            id: id.into(),
            values,
            metadata,
        }
    }
}
