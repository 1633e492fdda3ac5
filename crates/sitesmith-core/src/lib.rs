//! # sitesmith-core
//!
//! Core library for sitesmith - sitemap generation from a headless-CMS
//! content API.
//!
//! Given a list of per-collection mapping rules (content type, priority, URL
//! location template, optional one-level category nesting) and a content
//! fetcher, this crate deterministically produces a standards-compliant
//! sitemap document. The core performs no file I/O; it returns document
//! bytes plus a skip/warning report for the caller to present and persist.
//!
//! ## Architecture
//!
//! - **Template engine** ([`template`]): bracketed-placeholder resolution
//!   against item and related-category attributes.
//! - **Builder** ([`builder`]): per-rule orchestration, order-preserving
//!   concurrent fetches, entry accumulation.
//! - **Document** ([`document`]): the `urlset` envelope and XML rendering.
//! - **Fetcher** ([`fetcher`]): the content API trait and its HTTP
//!   implementation.
//! - **Configuration** ([`config`]): the operator-owned TOML schema.
//!
//! ## Quick Start
//!
//! ```no_run
//! use sitesmith_core::{HttpFetcher, builder, config::Config};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = Config::load(std::path::Path::new("sitesmith.toml"))?;
//! let fetcher = HttpFetcher::new(&config.api.url)?;
//!
//! use sitesmith_core::fetcher::ContentFetcher;
//! let types = fetcher.list_content_types().await?;
//! let rules = config.resolve_rules(&types);
//!
//! let outcome = builder::generate(&rules, &config.frontend_url, &fetcher).await?;
//! println!("{} entries", outcome.document.len());
//! for warning in &outcome.report.warnings {
//!     eprintln!("warning: {warning}");
//! }
//! let bytes = outcome.document.to_bytes();
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! Conditions recoverable at rule or item granularity surface as report
//! data, never as errors; only total inability to reach the content API (and
//! hard configuration problems) return [`Error`].

/// Sitemap assembly from rules and fetched content
pub mod builder;
/// Operator-owned TOML configuration
pub mod config;
/// Sitemap document model and XML serialization
pub mod document;
/// Error types and result aliases
pub mod error;
/// Content API trait and HTTP implementation
pub mod fetcher;
/// Location template parsing and resolution
pub mod template;
/// Core data types: rules, content types, items
pub mod types;

// Re-export commonly used types
pub use builder::{GenerateOutcome, GenerationReport, GenerationWarning, SkipReason, SkippedRule};
pub use config::{ApiConfig, Config, RuleConfig};
pub use document::{FILE_NAME, MIME_TYPE, SITEMAP_XMLNS, SitemapDocument, UrlEntry};
pub use error::{Error, Result};
pub use fetcher::{ContentFetcher, HttpFetcher, ItemQuery};
pub use types::{ContentType, ItemRecord, Priority, Rule};
