//! CLI module for the document loader
//!
//! Provides subcommands:
//! - `serve`: run the HTTP API (default)
//! - `load`: load a single path or URL and print the documents as JSON

pub mod load;
pub mod serve;

use clap::{Parser, Subcommand};

use crate::config::AppConfig;
use crate::infrastructure::logging;

/// Document loader - turn files, URLs and web pages into documents
#[derive(Parser)]
#[command(name = "document-loader")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the HTTP API server (default mode)
    Serve,

    /// Load one path or URL and print the documents
    Load(load::LoadArgs),
}

/// Read `.env` and layered configuration, then start logging
pub(crate) fn bootstrap() -> AppConfig {
    dotenvy::dotenv().ok();

    let config = AppConfig::load().unwrap_or_else(|e| {
        eprintln!("Failed to load configuration, using defaults: {}", e);
        AppConfig::default()
    });
    logging::init_logging(&config.logging);

    config
}
