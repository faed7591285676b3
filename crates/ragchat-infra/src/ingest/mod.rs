//! Document ingestion into the vector index.
//!
//! Reads text, markdown, and PDF files, chunks them, embeds the chunks in
//! batches, and upserts them with `{text_key: chunk, "source": path}`
//! metadata.

pub mod chunker;

use std::path::{Path, PathBuf};

use ragchat_core::retrieval::embedder::BoxEmbedder;
use ragchat_core::retrieval::index::BoxVectorIndex;
use ragchat_types::error::RetrievalError;
use ragchat_types::retrieval::VectorRecord;

use self::chunker::{chunk_text, is_markdown, is_pdf};

/// Chunks embedded and upserted per request.
pub const BATCH_SIZE: usize = 64;

#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to extract text from {path}: {message}")]
    Pdf { path: PathBuf, message: String },

    #[error(transparent)]
    Retrieval(#[from] RetrievalError),
}

/// Totals for one ingestion run.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct IngestReport {
    pub files: usize,
    pub chunks: usize,
    pub upserted: usize,
}

/// Ingest every file in `paths`.
///
/// Files are processed in order and each file's chunks get ids
/// `"{file_stem}-{chunk_index}"`, so re-ingesting a file overwrites its
/// earlier vectors.
pub async fn ingest_files(
    paths: &[PathBuf],
    embedder: &BoxEmbedder,
    index: &BoxVectorIndex,
    text_key: &str,
) -> Result<IngestReport, IngestError> {
    let mut report = IngestReport::default();

    for path in paths {
        let text = load_text(path).await?;

        let chunks = chunk_text(&text, is_markdown(path));
        let stem = file_stem(path);
        let source = path.display().to_string();

        let mut upserted = 0;
        for (batch_no, batch) in chunks.chunks(BATCH_SIZE).enumerate() {
            let vectors = embedder.embed(batch).await?;
            let records: Vec<VectorRecord> = batch
                .iter()
                .zip(vectors)
                .enumerate()
                .map(|(i, (chunk, values))| {
                    VectorRecord::with_text(
                        format!("{stem}-{}", batch_no * BATCH_SIZE + i),
                        values,
                        text_key,
                        chunk.as_str(),
                        source.as_str(),
                    )
                })
                .collect();
            upserted += index.upsert(&records).await?;
        }

        tracing::info!(
            path = %source,
            chunks = chunks.len(),
            upserted,
            model = embedder.model_name(),
            "Ingested file"
        );

        report.files += 1;
        report.chunks += chunks.len();
        report.upserted += upserted;
    }

    Ok(report)
}

/// Read `path` as text, extracting the text layer of PDFs.
pub async fn load_text(path: &Path) -> Result<String, IngestError> {
    let read_error = |source| IngestError::Read {
        path: path.to_path_buf(),
        source,
    };

    if !is_pdf(path) {
        return tokio::fs::read_to_string(path).await.map_err(read_error);
    }

    let bytes = tokio::fs::read(path).await.map_err(read_error)?;
    let pdf_error = |message: String| IngestError::Pdf {
        path: path.to_path_buf(),
        message,
    };
    tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&bytes))
        .await
        .map_err(|e| pdf_error(e.to_string()))?
        .map_err(|e| pdf_error(e.to_string()))
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "document".to_string())
}
