//! Retrieval abstractions for ragchat.
//!
//! - `Embedder` / `BoxEmbedder`: text-to-vector conversion
//! - `VectorIndex` / `BoxVectorIndex`: similarity query and upsert
//! - `RetrievalQa`: the "Knowledge Base" agent tool built on both

pub mod embedder;
pub mod index;
pub mod qa;
