//! Business logic and port trait definitions for ragchat.
//!
//! This crate defines the "ports" (repository, agent, transcription, LLM,
//! embedding and vector index traits) that the infrastructure layer
//! implements, plus the chat use cases and the conversational agent that
//! sit on top of them. It depends only on `ragchat-types` -- never on
//! `ragchat-infra` or any database/IO crate.

pub mod agent;
pub mod chat;
pub mod llm;
pub mod retrieval;
pub mod transcription;
