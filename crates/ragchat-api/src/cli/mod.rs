//! CLI command definitions for the `ragchat` binary.

pub mod chat;
pub mod ingest;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

/// Conversational RAG chat backend.
#[derive(Parser)]
#[command(name = "ragchat", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Export tracing spans through OpenTelemetry (stdout exporter).
    #[arg(long, global = true)]
    pub otel: bool,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Default log filter for the chosen verbosity; `RUST_LOG` overrides it.
    pub fn log_filter(&self) -> &'static str {
        match self.verbose {
            0 if self.quiet => "error",
            0 => "warn",
            1 => "info,ragchat=debug",
            _ => "trace",
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP API server.
    Serve {
        /// Port to listen on (default from config, 8001).
        #[arg(long)]
        port: Option<u16>,

        /// Host address to bind (default from config, 0.0.0.0).
        #[arg(long)]
        host: Option<String>,
    },

    /// Start a new conversation and print its id.
    Start,

    /// Continue a conversation with a text query or a voice recording.
    Continue {
        /// Conversation id returned by `start`.
        conversation_id: String,

        /// Text query.
        #[arg(long, short)]
        query: Option<String>,

        /// Audio file to transcribe (takes precedence over --query).
        #[arg(long)]
        voice: Option<PathBuf>,
    },

    /// Load text, markdown, or PDF documents into the vector index.
    Ingest {
        /// Files to ingest.
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}
