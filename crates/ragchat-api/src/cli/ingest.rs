//! Document ingestion CLI command.

use std::path::PathBuf;

use anyhow::{Context, Result};
use console::style;

use ragchat_infra::ingest::ingest_files;
use ragchat_infra::vector::create_retrieval;
use ragchat_types::config::AppConfig;

/// Chunk, embed, and upsert `files` into the configured Pinecone index.
pub async fn ingest(config: &AppConfig, files: &[PathBuf], json: bool) -> Result<()> {
    let (embedder, index) = create_retrieval(&config.retrieval, &config.openai)
        .await
        .context("failed to connect to the vector index")?;

    let report = ingest_files(files, &embedder, &index, &config.retrieval.text_key).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!(
            "  {} Ingested {} file(s): {} chunk(s), {} vector(s) upserted into '{}'",
            style("✓").green().bold(),
            report.files,
            report.chunks,
            report.upserted,
            style(&config.retrieval.index_name).cyan()
        );
    }

    Ok(())
}
