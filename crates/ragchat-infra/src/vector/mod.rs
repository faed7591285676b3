//! Vector retrieval adapters.
//!
//! OpenAI embeddings plus a Pinecone index client, wired together for the
//! Knowledge Base tool and for document ingestion.

pub mod embedder;
pub mod pinecone;

use ragchat_core::retrieval::embedder::BoxEmbedder;
use ragchat_core::retrieval::index::BoxVectorIndex;
use ragchat_types::config::{OpenAiSettings, RetrievalSettings};
use ragchat_types::error::RetrievalError;
use secrecy::SecretString;

use self::embedder::OpenAiEmbedder;
use self::pinecone::PineconeIndex;

/// Build the embedder and vector index from configuration.
///
/// Resolves the Pinecone data-plane host through the control plane when
/// only `index_name` is configured.
pub async fn create_retrieval(
    retrieval: &RetrievalSettings,
    openai: &OpenAiSettings,
) -> Result<(BoxEmbedder, BoxVectorIndex), RetrievalError> {
    if retrieval.pinecone_api_key.is_empty() {
        return Err(RetrievalError::Config("PINECONE_API_KEY is not set".to_string()));
    }

    let embedder = OpenAiEmbedder::new(
        SecretString::from(openai.api_key.clone()),
        openai.base_url.clone(),
        retrieval.embedding_model_name.clone(),
    )?;

    let index = PineconeIndex::connect(retrieval).await?;

    Ok((BoxEmbedder::new(embedder), BoxVectorIndex::new(index)))
}
