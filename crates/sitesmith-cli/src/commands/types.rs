//! Content-type discovery command.

use anyhow::{Context, Result};
use colored::Colorize;
use sitesmith_core::config::Config;
use sitesmith_core::fetcher::ContentFetcher;
use sitesmith_core::HttpFetcher;
use std::path::Path;

use crate::output::OutputFormat;

pub async fn execute(config_path: &Path, format: OutputFormat) -> Result<()> {
    let config = Config::load(config_path)
        .with_context(|| format!("failed to load configuration from '{}'", config_path.display()))?;

    let fetcher = HttpFetcher::with_timeout(&config.api.url, config.api.timeout())?;
    let types = fetcher
        .list_content_types()
        .await
        .context("failed to list content types from the API")?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&types)?);
        },
        OutputFormat::Text => {
            if types.is_empty() {
                println!("No application-defined collection types found.");
                return Ok(());
            }
            for ct in &types {
                println!(
                    "{} ({})",
                    ct.display_name.bold(),
                    ct.plural_name.dimmed()
                );
                println!("  uid: {}", ct.uid);
                println!("  attributes: {}", ct.attributes.join(", "));
            }
        },
    }

    Ok(())
}
