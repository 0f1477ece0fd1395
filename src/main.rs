#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::style)]

use std::path::Path;

use clap::Parser;
use nodelink::cli::{Args, Command};
use nodelink::config::CodecConfig;
use nodelink::input::{expand_tilde, load_links, parse_records, read_file_or_stdin};
use nodelink::{generate, import_links};
use tracing::Level;

#[tokio::main]
async fn main() {
    let args = Args::parse();
    let is_verbose = args.verbose;
    tracing_subscriber::fmt()
        .with_max_level(if is_verbose {
            Level::TRACE
        } else {
            Level::INFO
        })
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(args).await {
        tracing::error!("Error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run(args: Args) -> anyhow::Result<()> {
    let config = match &args.config {
        Some(path) => {
            tracing::debug!("Loading codec config from: {}", path);
            CodecConfig::from_file(Path::new(&expand_tilde(path))).await?
        }
        None => CodecConfig::default(),
    };

    match args.command {
        Command::Parse { input } => {
            let content = load_links(&input).await?;
            let report = import_links(&content)?;

            for node in &report.nodes {
                println!("{}", serde_json::to_string(node)?);
            }
            for failure in &report.failures {
                tracing::warn!(
                    "Line {}: invalid link '{}': {}",
                    failure.line,
                    failure.link,
                    failure.reason
                );
            }
            tracing::info!(
                "Parsed {} links, {} rejected",
                report.nodes.len(),
                report.failures.len()
            );

            if report.nodes.is_empty() && !report.failures.is_empty() {
                anyhow::bail!("No valid share links found");
            }
        }
        Command::Generate { file } => {
            let content = read_file_or_stdin(file.as_deref()).await?;
            let records = parse_records(&content)?;
            for record in &records {
                println!("{}", generate(record, &config));
            }
            tracing::info!("Generated {} links", records.len());
        }
    }

    Ok(())
}
