//! Chat use cases and persistence abstractions for ragchat.
//!
//! This module defines the `ChatRepository` port, its boxed wrapper for
//! runtime backend selection, and the `ChatService` that starts and
//! continues conversations.

pub mod box_repository;
pub mod repository;
pub mod service;
