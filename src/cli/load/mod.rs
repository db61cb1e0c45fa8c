//! Load command - runs the dispatcher once and prints JSON to stdout

use std::io::Write;

use clap::Args;
use tracing::info;

use crate::domain::{Document, LoadRequest};
use crate::infrastructure::services::{DocumentService, DocumentServiceTrait};

#[derive(Args, Debug)]
pub struct LoadArgs {
    /// Local path or URL to load
    pub reference: String,

    /// Crawl the URL instead of loading it as a file
    #[arg(long)]
    pub crawl: bool,

    /// Pretty-print the output
    #[arg(long)]
    pub pretty: bool,
}

/// Run the load command
pub async fn run(args: LoadArgs) -> anyhow::Result<()> {
    let config = super::bootstrap();
    let service = DocumentService::from_config(&config)?;

    let documents = load(&service, &args).await?;
    info!(reference = %args.reference, documents = documents.len(), "Loaded documents");

    let output = if args.pretty {
        serde_json::to_string_pretty(&documents)?
    } else {
        serde_json::to_string(&documents)?
    };

    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{}", output)?;

    Ok(())
}

async fn load(
    service: &dyn DocumentServiceTrait,
    args: &LoadArgs,
) -> anyhow::Result<Vec<Document>> {
    let request = LoadRequest::new(args.reference.clone());

    let documents = if args.crawl {
        service.web_crawl(&request).await?
    } else {
        service.load_remote(&request).await?
    };

    Ok(documents)
}
