//! Vector index trait, plus its boxed wrapper.
//!
//! Ranking is whatever the index returns; callers never re-sort.

use std::future::Future;
use std::pin::Pin;

use ragchat_types::error::RetrievalError;
use ragchat_types::retrieval::{ScoredDocument, VectorRecord};

/// Trait for a remote vector index (e.g., Pinecone).
pub trait VectorIndex: Send + Sync {
    /// Return up to `top_k` documents nearest to `vector`.
    fn query(
        &self,
        vector: &[f32],
        top_k: usize,
    ) -> impl Future<Output = Result<Vec<ScoredDocument>, RetrievalError>> + Send;

    /// Insert or overwrite `records`. Returns the upserted count.
    fn upsert(
        &self,
        records: &[VectorRecord],
    ) -> impl Future<Output = Result<usize, RetrievalError>> + Send;
}

/// Object-safe version of [`VectorIndex`] with boxed futures.
pub trait VectorIndexDyn: Send + Sync {
    fn query_boxed<'a>(
        &'a self,
        vector: &'a [f32],
        top_k: usize,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<ScoredDocument>, RetrievalError>> + Send + 'a>>;

    fn upsert_boxed<'a>(
        &'a self,
        records: &'a [VectorRecord],
    ) -> Pin<Box<dyn Future<Output = Result<usize, RetrievalError>> + Send + 'a>>;
}

impl<T: VectorIndex> VectorIndexDyn for T {
    fn query_boxed<'a>(
        &'a self,
        vector: &'a [f32],
        top_k: usize,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<ScoredDocument>, RetrievalError>> + Send + 'a>>
    {
        Box::pin(self.query(vector, top_k))
    }

    fn upsert_boxed<'a>(
        &'a self,
        records: &'a [VectorRecord],
    ) -> Pin<Box<dyn Future<Output = Result<usize, RetrievalError>> + Send + 'a>> {
        Box::pin(self.upsert(records))
    }
}

/// Type-erased vector index.
pub struct BoxVectorIndex {
    inner: Box<dyn VectorIndexDyn + Send + Sync>,
}

impl BoxVectorIndex {
    pub fn new<T: VectorIndex + 'static>(index: T) -> Self {
        Self {
            inner: Box::new(index),
        }
    }

    pub async fn query(
        &self,
        vector: &[f32],
        top_k: usize,
    ) -> Result<Vec<ScoredDocument>, RetrievalError> {
        self.inner.query_boxed(vector, top_k).await
    }

    pub async fn upsert(&self, records: &[VectorRecord]) -> Result<usize, RetrievalError> {
        self.inner.upsert_boxed(records).await
    }
}
