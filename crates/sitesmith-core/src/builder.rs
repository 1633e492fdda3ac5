//! Sitemap assembly: per-rule fetching, location resolution, accumulation.
//!
//! [`generate`] walks the rule list in order. For each eligible rule it
//! fetches the matching items, resolves every item's location through the
//! template engine, and emits one URL entry per item. Entries accumulate in
//! rule-list order into a [`SitemapDocument`]; everything that went sideways
//! along the way (skipped rules, per-item and per-rule warnings) is returned
//! alongside the document in a [`GenerationReport`] rather than aborting the
//! run.
//!
//! Rules are independent, so their fetches run concurrently; results are
//! joined in rule-list order so concurrency never reorders output.

use crate::document::{SitemapDocument, UrlEntry};
use crate::fetcher::{ContentFetcher, ItemQuery};
use crate::template;
use crate::types::{ContentType, Priority, Rule};
use crate::{Error, Result};
use chrono::{NaiveDate, Utc};
use serde::Serialize;
use tracing::{instrument, warn};

/// Name of the relation category rules filter and traverse.
pub const CATEGORY_RELATION: &str = "categories";

/// Why a rule contributed no entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase", tag = "reason")]
pub enum SkipReason {
    /// One or more of `content_type`, `priority`, `loc` is unset.
    MissingFields {
        /// The unset field names.
        fields: Vec<String>,
    },
    /// `has_category` is set but no category content type was chosen.
    MissingCategoryType,
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingFields { fields } => {
                write!(f, "missing required field(s): {}", fields.join(", "))
            },
            Self::MissingCategoryType => {
                write!(f, "has_category is set but no category content type is chosen")
            },
        }
    }
}

/// A rule that was skipped, with its position and reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SkippedRule {
    /// Zero-based position of the rule in the input list.
    pub rule_index: usize,
    /// Uid of the rule's content type, when one was set.
    pub content_type: Option<String>,
    /// Why the rule was skipped.
    pub reason: SkipReason,
}

/// A recoverable problem encountered while generating.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase", tag = "kind")]
pub enum GenerationWarning {
    /// The fetch for a rule failed; the rule contributed nothing.
    FetchFailed {
        /// Position of the affected rule.
        rule_index: usize,
        /// Uid of the rule's content type.
        content_type: String,
        /// Rendered fetch error.
        message: String,
    },
    /// An item lacked the populated relation a category placeholder needs;
    /// its entry was omitted.
    MissingRelation {
        /// Position of the affected rule.
        rule_index: usize,
        /// Id of the affected item, when known.
        item_id: Option<i64>,
        /// The placeholder that could not be resolved.
        placeholder: String,
    },
    /// A placeholder referenced an attribute the item does not carry; the
    /// literal `undefined` was substituted.
    MissingAttribute {
        /// Position of the affected rule.
        rule_index: usize,
        /// Id of the affected item, when known.
        item_id: Option<i64>,
        /// The attribute that was absent.
        attribute: String,
    },
}

impl std::fmt::Display for GenerationWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::FetchFailed {
                rule_index,
                content_type,
                message,
            } => write!(
                f,
                "rule #{rule_index} ({content_type}): fetch failed: {message}"
            ),
            Self::MissingRelation {
                rule_index,
                item_id,
                placeholder,
            } => write!(
                f,
                "rule #{rule_index}, item {}: no related category record for [{placeholder}], entry omitted",
                item_label(*item_id)
            ),
            Self::MissingAttribute {
                rule_index,
                item_id,
                attribute,
            } => write!(
                f,
                "rule #{rule_index}, item {}: attribute '{attribute}' is absent, substituted 'undefined'",
                item_label(*item_id)
            ),
        }
    }
}

fn item_label(id: Option<i64>) -> String {
    id.map_or_else(|| "<no id>".to_string(), |id| id.to_string())
}

/// Skips and warnings observed during one generation run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationReport {
    /// Rules that contributed nothing, with reasons.
    pub skipped: Vec<SkippedRule>,
    /// Per-rule and per-item recoverable problems.
    pub warnings: Vec<GenerationWarning>,
}

impl GenerationReport {
    /// Whether the run completed without skips or warnings.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.skipped.is_empty() && self.warnings.is_empty()
    }
}

/// The document produced by a generation run plus its report.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerateOutcome {
    /// The assembled sitemap document.
    pub document: SitemapDocument,
    /// Skips and warnings for operator presentation.
    pub report: GenerationReport,
}

/// Generate a sitemap document from `rules` against the content API behind
/// `fetcher`.
///
/// The generation date is computed once and applied uniformly to every
/// entry.
///
/// # Errors
///
/// Returns [`Error::ApiUnreachable`] when every attempted rule failed with a
/// network-class error; individual failures are reported as warnings.
pub async fn generate<F>(rules: &[Rule], frontend_url: &str, fetcher: &F) -> Result<GenerateOutcome>
where
    F: ContentFetcher + ?Sized,
{
    generate_dated(rules, frontend_url, fetcher, Utc::now().date_naive()).await
}

/// [`generate`] with an explicit generation date, for deterministic callers.
#[instrument(skip_all, fields(rule_count = rules.len()))]
pub async fn generate_dated<F>(
    rules: &[Rule],
    frontend_url: &str,
    fetcher: &F,
    last_modified: NaiveDate,
) -> Result<GenerateOutcome>
where
    F: ContentFetcher + ?Sized,
{
    let mut report = GenerationReport::default();
    let mut eligible = Vec::new();

    for (rule_index, rule) in rules.iter().enumerate() {
        let missing = rule.missing_fields();
        if !missing.is_empty() {
            report.skipped.push(SkippedRule {
                rule_index,
                content_type: rule.content_type.as_ref().map(|ct| ct.uid.clone()),
                reason: SkipReason::MissingFields {
                    fields: missing.into_iter().map(str::to_string).collect(),
                },
            });
            continue;
        }
        if rule.has_category && rule.category_content_type.is_none() {
            report.skipped.push(SkippedRule {
                rule_index,
                content_type: rule.content_type.as_ref().map(|ct| ct.uid.clone()),
                reason: SkipReason::MissingCategoryType,
            });
            continue;
        }

        // missing_fields() verified these are set.
        let (Some(content_type), Some(priority), Some(template)) = (
            rule.content_type.as_ref(),
            rule.priority,
            rule.location_template.as_deref(),
        ) else {
            continue;
        };

        eligible.push(EligibleRule {
            rule_index,
            content_type,
            priority,
            template,
            has_category: rule.has_category,
        });
    }

    // Rules are independent; fan out their fetches and join in list order.
    let outputs = futures::future::join_all(eligible.iter().map(|rule| {
        process_rule(rule, frontend_url, fetcher, last_modified)
    }))
    .await;

    let attempted = outputs.len();
    let network_failures = outputs.iter().filter(|o| o.network_failure).count();
    if attempted > 0 && network_failures == attempted {
        return Err(Error::ApiUnreachable { attempted });
    }

    let mut entries = Vec::new();
    for output in outputs {
        entries.extend(output.entries);
        report.warnings.extend(output.warnings);
    }

    Ok(GenerateOutcome {
        document: SitemapDocument::new(entries),
        report,
    })
}

struct EligibleRule<'a> {
    rule_index: usize,
    content_type: &'a ContentType,
    priority: Priority,
    template: &'a str,
    has_category: bool,
}

struct RuleOutput {
    entries: Vec<UrlEntry>,
    warnings: Vec<GenerationWarning>,
    network_failure: bool,
}

async fn process_rule<F>(
    rule: &EligibleRule<'_>,
    frontend_url: &str,
    fetcher: &F,
    last_modified: NaiveDate,
) -> RuleOutput
where
    F: ContentFetcher + ?Sized,
{
    let query = if rule.has_category {
        ItemQuery::with_relation(CATEGORY_RELATION)
    } else {
        ItemQuery::default()
    };

    let items = match fetcher.list_items(rule.content_type, &query).await {
        Ok(items) => items,
        Err(e) => {
            warn!(
                rule_index = rule.rule_index,
                content_type = %rule.content_type.uid,
                error = %e,
                "Rule fetch failed, rule contributes no entries"
            );
            return RuleOutput {
                entries: Vec::new(),
                warnings: vec![GenerationWarning::FetchFailed {
                    rule_index: rule.rule_index,
                    content_type: rule.content_type.uid.clone(),
                    message: e.to_string(),
                }],
                network_failure: e.is_network_class(),
            };
        },
    };

    let mut entries = Vec::new();
    let mut warnings = Vec::new();

    for item in &items {
        let category = if rule.has_category {
            item.first_related(CATEGORY_RELATION)
        } else {
            None
        };

        match template::resolve(rule.template, frontend_url, &item.attributes, category) {
            Ok(resolution) => {
                for attribute in resolution.missing_attributes {
                    warnings.push(GenerationWarning::MissingAttribute {
                        rule_index: rule.rule_index,
                        item_id: item.id,
                        attribute,
                    });
                }
                entries.push(UrlEntry {
                    location: resolution.location,
                    priority: rule.priority,
                    last_modified,
                });
            },
            Err(Error::MissingRelation(placeholder)) => {
                warnings.push(GenerationWarning::MissingRelation {
                    rule_index: rule.rule_index,
                    item_id: item.id,
                    placeholder,
                });
            },
            Err(e) => {
                // resolve only fails with MissingRelation today; anything
                // else is still a per-item condition, not a run failure.
                warnings.push(GenerationWarning::FetchFailed {
                    rule_index: rule.rule_index,
                    content_type: rule.content_type.uid.clone(),
                    message: e.to_string(),
                });
            },
        }
    }

    RuleOutput {
        entries,
        warnings,
        network_failure: false,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::types::ItemRecord;
    use async_trait::async_trait;
    use serde_json::json;
    use std::collections::HashMap;

    /// Test double serving canned items per plural path, with optional
    /// injected failures.
    #[derive(Default)]
    struct StubFetcher {
        items: HashMap<String, Vec<ItemRecord>>,
        failures: HashMap<String, u16>,
    }

    impl StubFetcher {
        fn with_items(mut self, plural: &str, items: Vec<ItemRecord>) -> Self {
            self.items.insert(plural.to_string(), items);
            self
        }

        fn with_failure(mut self, plural: &str, status: u16) -> Self {
            self.failures.insert(plural.to_string(), status);
            self
        }
    }

    #[async_trait]
    impl ContentFetcher for StubFetcher {
        async fn list_content_types(&self) -> crate::Result<Vec<ContentType>> {
            Ok(Vec::new())
        }

        async fn list_items(
            &self,
            content_type: &ContentType,
            _query: &ItemQuery,
        ) -> crate::Result<Vec<ItemRecord>> {
            if let Some(status) = self.failures.get(&content_type.plural_name) {
                return Err(Error::Api {
                    status: *status,
                    url: format!("http://stub/{}", content_type.plural_name),
                });
            }
            Ok(self
                .items
                .get(&content_type.plural_name)
                .cloned()
                .unwrap_or_default())
        }
    }

    fn content_type(short: &str, plural: &str) -> ContentType {
        ContentType {
            uid: format!("api::{short}.{short}"),
            plural_name: plural.to_string(),
            display_name: short.to_string(),
            attributes: vec!["slug".to_string()],
        }
    }

    fn item(id: i64, attributes: serde_json::Value) -> ItemRecord {
        ItemRecord {
            id: Some(id),
            attributes: attributes.as_object().unwrap().clone(),
        }
    }

    fn rule(short: &str, plural: &str, priority: f32, loc: &str) -> Rule {
        Rule {
            content_type: Some(content_type(short, plural)),
            priority: Some(Priority::new(priority).unwrap()),
            location_template: Some(loc.to_string()),
            has_category: false,
            category_content_type: None,
        }
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 8, 28).unwrap()
    }

    #[tokio::test]
    async fn test_all_ineligible_rules_produce_empty_document() {
        let rules = vec![
            Rule {
                content_type: None,
                priority: Some(Priority::new(0.5).unwrap()),
                location_template: Some("{frontend_url}/[slug]".to_string()),
                has_category: false,
                category_content_type: None,
            },
            Rule {
                content_type: Some(content_type("article", "articles")),
                priority: None,
                location_template: None,
                has_category: false,
                category_content_type: None,
            },
        ];
        let fetcher = StubFetcher::default();

        let outcome = generate_dated(&rules, "https://ex.com", &fetcher, date())
            .await
            .unwrap();

        assert!(outcome.document.is_empty());
        assert_eq!(outcome.report.skipped.len(), 2);
        assert_eq!(
            outcome.report.skipped[0].reason,
            SkipReason::MissingFields {
                fields: vec!["content_type".to_string()]
            }
        );
        assert_eq!(
            outcome.report.skipped[1].reason,
            SkipReason::MissingFields {
                fields: vec!["priority".to_string(), "loc".to_string()]
            }
        );
        // Empty document still renders a valid envelope.
        assert!(outcome.document.to_xml().contains("urlset"));
    }

    #[tokio::test]
    async fn test_plain_rule_emits_one_entry_per_item() {
        let rules = vec![rule("article", "articles", 0.8, "{frontend_url}/[slug]")];
        let fetcher = StubFetcher::default().with_items(
            "articles",
            vec![item(1, json!({ "slug": "a" })), item(2, json!({ "slug": "b" }))],
        );

        let outcome = generate_dated(&rules, "https://ex.com", &fetcher, date())
            .await
            .unwrap();

        assert!(outcome.report.is_clean());
        let entries = outcome.document.entries();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].location, "https://ex.com/a");
        assert_eq!(entries[1].location, "https://ex.com/b");
        for entry in entries {
            assert_eq!(entry.priority.to_string(), "0.8");
            assert_eq!(entry.last_modified, date());
        }
    }

    #[tokio::test]
    async fn test_category_rule_without_category_type_is_skipped() {
        let rules = vec![Rule {
            has_category: true,
            ..rule("article", "articles", 0.5, "{frontend_url}/[category-slug]/[slug]")
        }];
        let fetcher = StubFetcher::default()
            .with_items("articles", vec![item(1, json!({ "slug": "x" }))]);

        let outcome = generate_dated(&rules, "https://ex.com", &fetcher, date())
            .await
            .unwrap();

        assert!(outcome.document.is_empty());
        assert_eq!(outcome.report.skipped.len(), 1);
        assert_eq!(
            outcome.report.skipped[0].reason,
            SkipReason::MissingCategoryType
        );
    }

    #[tokio::test]
    async fn test_category_rule_resolves_first_related_record() {
        let rules = vec![Rule {
            has_category: true,
            category_content_type: Some(content_type("category", "categories")),
            ..rule("article", "articles", 0.5, "{frontend_url}/[category-slug]/[slug]")
        }];
        let fetcher = StubFetcher::default().with_items(
            "articles",
            vec![item(
                1,
                json!({
                    "slug": "x",
                    "categories": {
                        "data": [
                            { "id": 10, "attributes": { "slug": "cat1" } },
                            { "id": 11, "attributes": { "slug": "cat2" } }
                        ]
                    }
                }),
            )],
        );

        let outcome = generate_dated(&rules, "https://ex.com", &fetcher, date())
            .await
            .unwrap();

        assert!(outcome.report.is_clean());
        assert_eq!(outcome.document.entries()[0].location, "https://ex.com/cat1/x");
    }

    #[tokio::test]
    async fn test_item_without_relation_is_omitted_with_warning() {
        let rules = vec![Rule {
            has_category: true,
            category_content_type: Some(content_type("category", "categories")),
            ..rule("article", "articles", 0.5, "{frontend_url}/[category-slug]/[slug]")
        }];
        let fetcher = StubFetcher::default().with_items(
            "articles",
            vec![
                item(1, json!({ "slug": "x", "categories": { "data": [] } })),
                item(
                    2,
                    json!({
                        "slug": "y",
                        "categories": { "data": [{ "id": 3, "attributes": { "slug": "cat" } }] }
                    }),
                ),
            ],
        );

        let outcome = generate_dated(&rules, "https://ex.com", &fetcher, date())
            .await
            .unwrap();

        assert_eq!(outcome.document.len(), 1);
        assert_eq!(outcome.document.entries()[0].location, "https://ex.com/cat/y");
        assert_eq!(outcome.report.warnings.len(), 1);
        assert!(matches!(
            &outcome.report.warnings[0],
            GenerationWarning::MissingRelation { item_id: Some(1), .. }
        ));
    }

    #[tokio::test]
    async fn test_missing_attribute_substitutes_and_warns() {
        let rules = vec![rule("article", "articles", 0.5, "{frontend_url}/[slug]")];
        let fetcher = StubFetcher::default()
            .with_items("articles", vec![item(1, json!({ "title": "no slug here" }))]);

        let outcome = generate_dated(&rules, "https://ex.com", &fetcher, date())
            .await
            .unwrap();

        assert_eq!(outcome.document.entries()[0].location, "https://ex.com/undefined");
        assert!(matches!(
            &outcome.report.warnings[0],
            GenerationWarning::MissingAttribute { attribute, .. } if attribute == "slug"
        ));
    }

    #[tokio::test]
    async fn test_output_preserves_rule_list_order() {
        let rules = vec![
            rule("article", "articles", 0.8, "{frontend_url}/articles/[slug]"),
            rule("page", "pages", 0.3, "{frontend_url}/[slug]"),
        ];
        let fetcher = StubFetcher::default()
            .with_items("articles", vec![item(1, json!({ "slug": "a" }))])
            .with_items("pages", vec![item(2, json!({ "slug": "p" }))]);

        let outcome = generate_dated(&rules, "https://ex.com", &fetcher, date())
            .await
            .unwrap();

        let locations: Vec<_> = outcome
            .document
            .entries()
            .iter()
            .map(|e| e.location.as_str())
            .collect();
        assert_eq!(locations, vec!["https://ex.com/articles/a", "https://ex.com/p"]);
    }

    #[tokio::test]
    async fn test_failed_rule_is_isolated() {
        let rules = vec![
            rule("article", "articles", 0.8, "{frontend_url}/[slug]"),
            rule("page", "pages", 0.3, "{frontend_url}/[slug]"),
        ];
        let fetcher = StubFetcher::default()
            .with_failure("articles", 500)
            .with_items("pages", vec![item(2, json!({ "slug": "p" }))]);

        let outcome = generate_dated(&rules, "https://ex.com", &fetcher, date())
            .await
            .unwrap();

        assert_eq!(outcome.document.len(), 1);
        assert_eq!(outcome.document.entries()[0].location, "https://ex.com/p");
        assert!(matches!(
            &outcome.report.warnings[0],
            GenerationWarning::FetchFailed { rule_index: 0, .. }
        ));
    }

    #[tokio::test]
    async fn test_total_unreachability_is_fatal() {
        let rules = vec![
            rule("article", "articles", 0.8, "{frontend_url}/[slug]"),
            rule("page", "pages", 0.3, "{frontend_url}/[slug]"),
        ];
        let fetcher = StubFetcher::default()
            .with_failure("articles", 502)
            .with_failure("pages", 503);

        let result = generate_dated(&rules, "https://ex.com", &fetcher, date()).await;

        match result {
            Err(Error::ApiUnreachable { attempted }) => assert_eq!(attempted, 2),
            other => panic!("expected ApiUnreachable, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_non_network_failure_alone_is_not_fatal() {
        let rules = vec![rule("article", "articles", 0.8, "{frontend_url}/[slug]")];
        let fetcher = StubFetcher::default().with_failure("articles", 404);

        let outcome = generate_dated(&rules, "https://ex.com", &fetcher, date())
            .await
            .unwrap();

        assert!(outcome.document.is_empty());
        assert_eq!(outcome.report.warnings.len(), 1);
    }

    #[tokio::test]
    async fn test_no_rules_yields_empty_clean_outcome() {
        let fetcher = StubFetcher::default();
        let outcome = generate_dated(&[], "https://ex.com", &fetcher, date())
            .await
            .unwrap();
        assert!(outcome.document.is_empty());
        assert!(outcome.report.is_clean());
    }
}
