//! Shared domain types for ragchat.
//!
//! This crate contains the domain types used across the ragchat workspace:
//! Chat, Conversation, Message, agent and LLM request shapes, retrieval
//! records, configuration, and their associated error types.
//!
//! Zero infrastructure dependencies -- only serde, uuid, thiserror.

pub mod agent;
pub mod chat;
pub mod config;
pub mod error;
pub mod llm;
pub mod retrieval;
