//! Configuration for sitemap generation.
//!
//! Configuration is a TOML file holding the operator's frontend base URL, the
//! content API endpoint, and the rule list. It is the externally-owned state
//! the builder consumes; the core never persists it.
//!
//! ## Example
//!
//! ```toml
//! frontend_url = "https://www.example.com"
//!
//! [api]
//! url = "https://cms.example.com/api"
//! timeout_secs = 30
//!
//! [[rules]]
//! content_type = "article"
//! priority = 0.8
//! loc = "{frontend_url}/blog/[slug]"
//!
//! [[rules]]
//! content_type = "article"
//! priority = 0.5
//! loc = "{frontend_url}/[category-slug]/[slug]"
//! has_category = true
//! category_content_type = "category"
//! ```
//!
//! Rules name content types by short name, plural path, uid or display name;
//! the names are resolved against the live content-type list at generation
//! time. A rule whose name matches nothing resolves with `content_type`
//! unset and is skipped by the builder, exactly like an incomplete rule.

use crate::types::{ContentType, Priority, Rule};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use url::Url;

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Top-level configuration file schema.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Base URL substituted for `{frontend_url}` in location templates.
    pub frontend_url: String,
    /// Content API settings.
    pub api: ApiConfig,
    /// Per-collection mapping rules, in output order.
    #[serde(default)]
    pub rules: Vec<RuleConfig>,
}

/// Content API endpoint settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the content API, e.g. `https://cms.example.com/api`.
    pub url: String,
    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

const fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl ApiConfig {
    /// The configured timeout as a [`std::time::Duration`].
    #[must_use]
    pub const fn timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.timeout_secs)
    }
}

/// One rule as written by the operator.
///
/// Mirrors [`Rule`] but references content types by name; optional fields an
/// operator left out stay `None` and lead to runtime skips rather than load
/// failures.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RuleConfig {
    /// Name of the collection: short name, plural path, uid or display name.
    pub content_type: Option<String>,
    /// Sitemap priority in `[0, 1]`.
    pub priority: Option<f32>,
    /// Location template with `[name]` / `[category-name]` placeholders.
    pub loc: Option<String>,
    /// Whether locations nest under a related category record.
    #[serde(default)]
    pub has_category: bool,
    /// Name of the category collection, required when `has_category` is set.
    pub category_content_type: Option<String>,
}

impl Config {
    /// Load and validate configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("cannot read '{}': {e}", path.display()))
        })?;
        let config: Self = toml::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the statically checkable parts: URLs parse and priorities
    /// are in range. Rule completeness stays a runtime skip, matching the
    /// builder's invariant.
    pub fn validate(&self) -> Result<()> {
        Url::parse(&self.frontend_url)
            .map_err(|e| Error::InvalidUrl(format!("frontend_url '{}': {e}", self.frontend_url)))?;
        Url::parse(&self.api.url)
            .map_err(|e| Error::InvalidUrl(format!("api.url '{}': {e}", self.api.url)))?;

        for (index, rule) in self.rules.iter().enumerate() {
            if let Some(priority) = rule.priority {
                Priority::new(priority)
                    .map_err(|e| Error::Config(format!("rules[{index}]: {e}")))?;
            }
        }
        Ok(())
    }

    /// Resolve every rule's content-type names against the live type list.
    ///
    /// Priorities were validated at load time; a value that slips through
    /// out of range resolves to `None` and skips the rule.
    #[must_use]
    pub fn resolve_rules(&self, types: &[ContentType]) -> Vec<Rule> {
        self.rules.iter().map(|rule| rule.resolve(types)).collect()
    }
}

impl RuleConfig {
    /// Resolve content-type names against `types`, producing the value
    /// object the builder consumes. Names that match nothing resolve to
    /// `None`.
    #[must_use]
    pub fn resolve(&self, types: &[ContentType]) -> Rule {
        let find = |name: &Option<String>| {
            name.as_deref()
                .and_then(|n| types.iter().find(|ct| ct.matches(n)).cloned())
        };

        Rule {
            content_type: find(&self.content_type),
            priority: self.priority.and_then(|p| Priority::new(p).ok()),
            location_template: self.loc.clone(),
            has_category: self.has_category,
            category_content_type: find(&self.category_content_type),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const SAMPLE: &str = r#"
frontend_url = "https://www.example.com"

[api]
url = "https://cms.example.com/api"

[[rules]]
content_type = "article"
priority = 0.8
loc = "{frontend_url}/blog/[slug]"

[[rules]]
content_type = "article"
priority = 0.5
loc = "{frontend_url}/[category-slug]/[slug]"
has_category = true
category_content_type = "category"
"#;

    fn types() -> Vec<ContentType> {
        vec![
            ContentType {
                uid: "api::article.article".to_string(),
                plural_name: "articles".to_string(),
                display_name: "Article".to_string(),
                attributes: vec!["slug".to_string()],
            },
            ContentType {
                uid: "api::category.category".to_string(),
                plural_name: "categories".to_string(),
                display_name: "Category".to_string(),
                attributes: vec!["slug".to_string()],
            },
        ]
    }

    fn write_config(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_loads_sample_config() {
        let file = write_config(SAMPLE);
        let config = Config::load(file.path()).unwrap();

        assert_eq!(config.frontend_url, "https://www.example.com");
        assert_eq!(config.api.timeout_secs, 30);
        assert_eq!(config.rules.len(), 2);
        assert!(config.rules[1].has_category);
    }

    #[test]
    fn test_rejects_out_of_range_priority() {
        let file = write_config(
            r#"
frontend_url = "https://www.example.com"

[api]
url = "https://cms.example.com/api"

[[rules]]
content_type = "article"
priority = 1.5
loc = "{frontend_url}/[slug]"
"#,
        );
        let result = Config::load(file.path());
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_rejects_invalid_urls() {
        let file = write_config(
            r#"
frontend_url = "not a url"

[api]
url = "https://cms.example.com/api"
"#,
        );
        assert!(matches!(Config::load(file.path()), Err(Error::InvalidUrl(_))));
    }

    #[test]
    fn test_rejects_malformed_toml() {
        let file = write_config("frontend_url = ");
        assert!(matches!(Config::load(file.path()), Err(Error::Config(_))));
    }

    #[test]
    fn test_missing_file_is_config_error() {
        let result = Config::load(Path::new("/nonexistent/sitesmith.toml"));
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_resolves_rules_against_type_list() {
        let file = write_config(SAMPLE);
        let config = Config::load(file.path()).unwrap();
        let rules = config.resolve_rules(&types());

        assert_eq!(rules.len(), 2);
        assert_eq!(
            rules[0].content_type.as_ref().unwrap().uid,
            "api::article.article"
        );
        assert!(rules[0].missing_fields().is_empty());
        assert_eq!(
            rules[1].category_content_type.as_ref().unwrap().uid,
            "api::category.category"
        );
    }

    #[test]
    fn test_unknown_content_type_resolves_to_none() {
        let rule = RuleConfig {
            content_type: Some("podcast".to_string()),
            priority: Some(0.5),
            loc: Some("{frontend_url}/[slug]".to_string()),
            ..RuleConfig::default()
        };
        let resolved = rule.resolve(&types());
        assert!(resolved.content_type.is_none());
        assert_eq!(resolved.missing_fields(), vec!["content_type"]);
    }

    #[test]
    fn test_resolves_by_plural_and_display_name() {
        let by_plural = RuleConfig {
            content_type: Some("articles".to_string()),
            ..RuleConfig::default()
        };
        let by_display = RuleConfig {
            content_type: Some("Article".to_string()),
            ..RuleConfig::default()
        };
        assert!(by_plural.resolve(&types()).content_type.is_some());
        assert!(by_display.resolve(&types()).content_type.is_some());
    }
}
