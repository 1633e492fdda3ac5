//! Sitemap generation command - fetch, assemble, persist.

use anyhow::{Context, Result};
use colored::Colorize;
use serde::Serialize;
use sitesmith_core::config::Config;
use sitesmith_core::fetcher::ContentFetcher;
use sitesmith_core::{GenerationReport, HttpFetcher, builder, document};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::output::OutputFormat;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateSummary<'a> {
    entries: usize,
    out: Option<&'a Path>,
    #[serde(flatten)]
    report: &'a GenerationReport,
}

pub async fn execute(
    config_path: &Path,
    out: Option<PathBuf>,
    to_stdout: bool,
    format: OutputFormat,
) -> Result<()> {
    let config = Config::load(config_path)
        .with_context(|| format!("failed to load configuration from '{}'", config_path.display()))?;

    let fetcher = HttpFetcher::with_timeout(&config.api.url, config.api.timeout())?;
    let types = fetcher
        .list_content_types()
        .await
        .context("failed to list content types from the API")?;
    let rules = config.resolve_rules(&types);

    let outcome = builder::generate(&rules, &config.frontend_url, &fetcher)
        .await
        .context("sitemap generation failed")?;

    if to_stdout {
        std::io::stdout().write_all(&outcome.document.to_bytes())?;
        print_text_report(&outcome.report, outcome.document.len(), None, true);
        return Ok(());
    }

    let out = out.unwrap_or_else(|| PathBuf::from(document::FILE_NAME));
    std::fs::write(&out, outcome.document.to_bytes())
        .with_context(|| format!("failed to write '{}'", out.display()))?;

    match format {
        OutputFormat::Json => {
            let summary = GenerateSummary {
                entries: outcome.document.len(),
                out: Some(&out),
                report: &outcome.report,
            };
            println!("{}", serde_json::to_string_pretty(&summary)?);
        },
        OutputFormat::Text => {
            print_text_report(&outcome.report, outcome.document.len(), Some(&out), false);
        },
    }

    Ok(())
}

fn print_text_report(report: &GenerationReport, entries: usize, out: Option<&Path>, to_stderr: bool) {
    let mut lines = Vec::new();

    match out {
        Some(path) => lines.push(format!(
            "{} Wrote {} entries to {}",
            "✓".green(),
            entries,
            path.display()
        )),
        None => lines.push(format!("{} Generated {} entries", "✓".green(), entries)),
    }

    for skipped in &report.skipped {
        lines.push(format!(
            "{} rule #{} skipped: {}",
            "!".yellow(),
            skipped.rule_index,
            skipped.reason
        ));
    }
    for warning in &report.warnings {
        lines.push(format!("{} {}", "!".yellow(), warning));
    }

    for line in lines {
        if to_stderr {
            eprintln!("{line}");
        } else {
            println!("{line}");
        }
    }
}
