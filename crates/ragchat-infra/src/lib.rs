//! Infrastructure layer for ragchat.
//!
//! Contains implementations of the ports defined in `ragchat-core`:
//! in-memory and SQLite chat repositories, the OpenAI-compatible LLM
//! provider, OpenAI embeddings and transcription, the Pinecone index
//! client, document ingestion, and the configuration loader.

pub mod config;
pub mod ingest;
pub mod llm;
pub mod memory;
pub mod sqlite;
pub mod transcription;
pub mod vector;

#[cfg(test)]
mod test_support;
