//! # CoursePilot — Course Materials Assistant
//!
//! Loads course documents, indexes them into the vector store, and
//! serves the chat UI and JSON API.
//!
//! Usage:
//!   coursepilot                          # Serve on 127.0.0.1:8000
//!   coursepilot --docs ./docs            # Ingest a specific folder
//!   coursepilot --port 9000 -v           # Custom port, debug logging

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use coursepilot_core::CoursePilotConfig;

#[derive(Parser)]
#[command(
    name = "coursepilot",
    version,
    about = "📚 CoursePilot — retrieval-augmented Q&A over course materials"
)]
struct Cli {
    /// Path to config file (default: ~/.coursepilot/config.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Folder of course documents to ingest at startup
    #[arg(short, long)]
    docs: Option<PathBuf>,

    /// Bind host (overrides config)
    #[arg(long)]
    host: Option<String>,

    /// Bind port (overrides config)
    #[arg(short, long)]
    port: Option<u16>,

    /// Skip document ingestion at startup
    #[arg(long)]
    no_ingest: bool,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        "coursepilot=debug,tower_http=debug"
    } else {
        "coursepilot=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();

    let mut config = match &cli.config {
        Some(path) => CoursePilotConfig::load_from(path)?,
        None => CoursePilotConfig::load()?,
    };
    if let Some(host) = cli.host {
        config.gateway.host = host;
    }
    if let Some(port) = cli.port {
        config.gateway.port = port;
    }

    let rag = Arc::new(coursepilot_agent::RagSystem::new(&config)?);

    if !cli.no_ingest {
        let docs_dir = cli
            .docs
            .clone()
            .unwrap_or_else(|| PathBuf::from(&config.ingest.docs_dir));
        if docs_dir.is_dir() {
            let (courses, chunks) = rag.add_course_folder(&docs_dir).await?;
            tracing::info!(
                "📚 Ingested {} new course(s), {} chunk(s) from {}",
                courses,
                chunks,
                docs_dir.display()
            );
        } else {
            tracing::warn!("Docs folder {} not found, skipping ingestion", docs_dir.display());
        }
    }

    let analytics = rag.course_analytics()?;
    tracing::info!(
        "✅ CoursePilot ready: {} course(s) in catalog, provider={}",
        analytics.total_courses,
        config.provider
    );

    coursepilot_gateway::start(rag, &config.gateway).await
}
