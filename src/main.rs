#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::style)]

use std::path::Path;

use anyhow::Context;
use clap::Parser;
use sublink::batch::BatchProcessor;
use sublink::cli::Args;
use sublink::fetch::submit_report;
use sublink::settings::{Settings, expand_tilde, is_remote};
use tokio::io::AsyncReadExt;
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
    let mut settings = match args.config.as_deref() {
        Some(location) => {
            tracing::info!("Loading settings from: {}", location);
            Settings::load(location).await?
        }
        None => Settings::default(),
    };
    args.apply_to(&mut settings);
    settings.validate()?;

    let mut batch = BatchProcessor::from_settings(&settings);

    let json = if let Some(link) = args.link.as_deref() {
        let report = batch.process_single(link);
        serde_json::to_string_pretty(&report).context("Failed to serialize report")?
    } else {
        let report = match args.input.as_deref() {
            Some(location) if is_remote(location) => {
                tracing::info!("Fetching subscription from: {}", location);
                batch.process_url(location).await
            }
            Some(path) => {
                let path = expand_tilde(path);
                let text = tokio::fs::read_to_string(&path)
                    .await
                    .with_context(|| format!("Failed to read input from {:?}", path))?;
                batch.process_text(&text)
            }
            None => {
                let mut text = String::new();
                tokio::io::stdin()
                    .read_to_string(&mut text)
                    .await
                    .context("Failed to read input from stdin")?;
                batch.process_text(&text)
            }
        };
        tracing::info!("Converted {} config(s)", report.total_processed);
        if let Some(url) = settings.checker.url.as_deref() {
            let response = submit_report(url, &report, &settings.fetch).await?;
            tracing::info!("Checker response: {}", response.trim());
        }
        serde_json::to_string_pretty(&report).context("Failed to serialize report")?
    };

    match args.output.as_deref() {
        Some(output) => {
            let output = expand_tilde(output);
            if let Some(parent) = Path::new(&output).parent()
                && !parent.as_os_str().is_empty()
            {
                tokio::fs::create_dir_all(parent)
                    .await
                    .with_context(|| format!("Failed to create directory {:?}", parent))?;
            }
            tokio::fs::write(&output, json)
                .await
                .with_context(|| format!("Failed to write report to {:?}", output))?;
            tracing::info!("Report written to: {}", output);
        }
        None => println!("{json}"),
    }

    Ok(())
}
