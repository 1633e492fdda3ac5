//! Configuration check command - validate rules against the live API.
//!
//! Goes one step beyond the builder's runtime skip logic: placeholders are
//! also checked against the attribute sets the content-type schemas declare,
//! so typos like `[headline]` on a collection that only has `title` surface
//! before a generation run fills the sitemap with `undefined`.

use anyhow::{Context, Result};
use colored::Colorize;
use serde::Serialize;
use sitesmith_core::config::Config;
use sitesmith_core::fetcher::ContentFetcher;
use sitesmith_core::{HttpFetcher, Rule, template};
use std::path::Path;

use crate::output::OutputFormat;

#[derive(Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
enum RuleStatus {
    Ok,
    Skipped,
    Warning,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RuleCheck {
    rule_index: usize,
    content_type: Option<String>,
    status: RuleStatus,
    issues: Vec<String>,
}

pub async fn execute(config_path: &Path, format: OutputFormat) -> Result<()> {
    let config = Config::load(config_path)
        .with_context(|| format!("failed to load configuration from '{}'", config_path.display()))?;

    let fetcher = HttpFetcher::with_timeout(&config.api.url, config.api.timeout())?;
    let types = fetcher
        .list_content_types()
        .await
        .context("failed to list content types from the API")?;
    let rules = config.resolve_rules(&types);

    let checks: Vec<RuleCheck> = rules
        .iter()
        .enumerate()
        .map(|(rule_index, rule)| check_rule(rule_index, rule))
        .collect();

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&checks)?);
        },
        OutputFormat::Text => print_text_checks(&checks),
    }

    if checks.iter().any(|c| c.status == RuleStatus::Skipped) {
        std::process::exit(1);
    }
    Ok(())
}

fn check_rule(rule_index: usize, rule: &Rule) -> RuleCheck {
    let mut issues = Vec::new();
    let mut status = RuleStatus::Ok;

    let missing = rule.missing_fields();
    if !missing.is_empty() {
        issues.push(format!("missing required field(s): {}", missing.join(", ")));
        status = RuleStatus::Skipped;
    } else if rule.has_category && rule.category_content_type.is_none() {
        issues.push("has_category is set but no category content type is chosen".to_string());
        status = RuleStatus::Skipped;
    }

    if let (Some(template), Some(content_type)) =
        (rule.location_template.as_deref(), rule.content_type.as_ref())
    {
        for name in template::placeholders(template) {
            if let Some(category_attr) = name.strip_prefix("category-") {
                match rule.category_content_type.as_ref() {
                    Some(category_type) if !category_type.attributes.iter().any(|a| a == category_attr) => {
                        issues.push(format!(
                            "[{name}] references attribute '{category_attr}' not declared on '{}'",
                            category_type.uid
                        ));
                        if status == RuleStatus::Ok {
                            status = RuleStatus::Warning;
                        }
                    },
                    _ => {},
                }
            } else if !content_type.attributes.iter().any(|a| a == name) {
                issues.push(format!(
                    "[{name}] is not a declared attribute of '{}'",
                    content_type.uid
                ));
                if status == RuleStatus::Ok {
                    status = RuleStatus::Warning;
                }
            }
        }
    }

    RuleCheck {
        rule_index,
        content_type: rule.content_type.as_ref().map(|ct| ct.uid.clone()),
        status,
        issues,
    }
}

fn print_text_checks(checks: &[RuleCheck]) {
    for check in checks {
        let (marker, label) = match check.status {
            RuleStatus::Ok => ("✓".green(), "ok".green()),
            RuleStatus::Warning => ("!".yellow(), "warning".yellow()),
            RuleStatus::Skipped => ("✗".red(), "skipped".red()),
        };
        println!(
            "{marker} rule #{} ({}): {label}",
            check.rule_index,
            check.content_type.as_deref().unwrap_or("<unresolved>")
        );
        for issue in &check.issues {
            println!("    {issue}");
        }
    }
}
