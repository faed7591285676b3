//! Embedder trait for text-to-vector conversion, plus its boxed wrapper.
//!
//! Implementations (e.g., OpenAI embeddings) live in ragchat-infra.

use std::future::Future;
use std::pin::Pin;

use ragchat_types::error::RetrievalError;

/// Trait for converting text into embedding vectors.
///
/// Uses RPITIT (native async fn in traits, Rust 2024 edition).
pub trait Embedder: Send + Sync {
    /// Embed one or more texts. Returns one vector per input, in order.
    fn embed(
        &self,
        texts: &[String],
    ) -> impl Future<Output = Result<Vec<Vec<f32>>, RetrievalError>> + Send;

    /// The model name used for embeddings (e.g., "text-embedding-ada-002").
    fn model_name(&self) -> &str;
}

/// Object-safe version of [`Embedder`] with boxed futures.
pub trait EmbedderDyn: Send + Sync {
    fn embed_boxed<'a>(
        &'a self,
        texts: &'a [String],
    ) -> Pin<Box<dyn Future<Output = Result<Vec<Vec<f32>>, RetrievalError>> + Send + 'a>>;

    fn model_name_dyn(&self) -> &str;
}

impl<T: Embedder> EmbedderDyn for T {
    fn embed_boxed<'a>(
        &'a self,
        texts: &'a [String],
    ) -> Pin<Box<dyn Future<Output = Result<Vec<Vec<f32>>, RetrievalError>> + Send + 'a>> {
        Box::pin(self.embed(texts))
    }

    fn model_name_dyn(&self) -> &str {
        self.model_name()
    }
}

/// Type-erased embedder.
pub struct BoxEmbedder {
    inner: Box<dyn EmbedderDyn + Send + Sync>,
}

impl BoxEmbedder {
    /// Wrap a concrete `Embedder` in a type-erased box.
    pub fn new<T: Embedder + 'static>(embedder: T) -> Self {
        Self {
            inner: Box::new(embedder),
        }
    }

    pub async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, RetrievalError> {
        self.inner.embed_boxed(texts).await
    }

    pub fn model_name(&self) -> &str {
        self.inner.model_name_dyn()
    }
}
