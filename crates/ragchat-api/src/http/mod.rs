//! HTTP/REST API layer for ragchat.
//!
//! Axum-based API with `{"detail": ...}` error bodies and CORS support.

pub mod error;
pub mod handlers;
pub mod router;
