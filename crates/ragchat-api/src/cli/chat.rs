//! Conversation CLI commands: start, continue.

use std::path::Path;

use anyhow::{Context, Result};
use console::style;

use crate::state::AppState;

/// Start a conversation and print its id.
pub async fn start_chat(state: &AppState, json: bool) -> Result<()> {
    let chat_id = state.chat_service.start_conversation().await?;

    if json {
        println!("{}", serde_json::json!({ "chat_id": chat_id }));
    } else {
        println!(
            "  {} Conversation started: {}",
            style("✓").green().bold(),
            style(&chat_id).cyan()
        );
        println!(
            "  {}",
            style(format!("Continue with: ragchat continue {chat_id} --query \"...\"")).dim()
        );
    }

    Ok(())
}

/// Continue a conversation and print the agent's reply.
pub async fn continue_chat(
    state: &AppState,
    conversation_id: &str,
    query: Option<&str>,
    voice: Option<&Path>,
    json: bool,
) -> Result<()> {
    let audio = match voice {
        Some(path) => Some(
            tokio::fs::read(path)
                .await
                .with_context(|| format!("failed to read {}", path.display()))?,
        ),
        None => None,
    };

    let response = state
        .chat_service
        .continue_conversation(conversation_id, query, audio.as_deref())
        .await?;

    if json {
        println!("{}", serde_json::json!({ "response": response }));
    } else {
        println!();
        println!("  {} {}", style("ai>").magenta().bold(), response);
        println!();
    }

    Ok(())
}
