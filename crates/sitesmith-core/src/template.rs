//! Location template resolution.
//!
//! A location template is a string with zero or more bracketed placeholders:
//! `[name]` resolves against the item's attributes, `[category-name]` against
//! the first related category record. The reserved token `{frontend_url}` is
//! substituted first with the operator-supplied base URL.
//!
//! ```rust
//! use serde_json::json;
//! use sitesmith_core::template::resolve;
//!
//! let item = json!({ "slug": "hello" }).as_object().unwrap().clone();
//! let resolved = resolve("{frontend_url}/[slug]", "https://ex.com", &item, None).unwrap();
//! assert_eq!(resolved.location, "https://ex.com/hello");
//! assert!(resolved.missing_attributes.is_empty());
//! ```
//!
//! Placeholders that reference an attribute absent from (or null on) the item
//! substitute the literal string `undefined` and report the attribute name in
//! [`Resolution::missing_attributes`]. The literal preserves the observable
//! output of naive string replacement; the report makes the rough edge
//! visible to callers.

use crate::{Error, Result};
use regex::Regex;
use serde_json::{Map, Value};
use std::sync::LazyLock;

/// Reserved token replaced with the operator-supplied base URL.
pub const FRONTEND_URL_TOKEN: &str = "{frontend_url}";

/// Prefix marking a placeholder as category-scoped.
const CATEGORY_PREFIX: &str = "category-";

/// Literal substituted when a referenced attribute is absent.
const MISSING_MARKER: &str = "undefined";

static PLACEHOLDER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([^\]]+)\]").unwrap());

/// A fully substituted location plus the attributes that failed to resolve.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// The location string with every placeholder substituted.
    pub location: String,
    /// Placeholder names that had no backing attribute and were substituted
    /// with the `undefined` marker. Category-scoped names keep their
    /// `category-` prefix.
    pub missing_attributes: Vec<String>,
}

/// List the placeholder names a template references, brackets stripped.
#[must_use]
pub fn placeholders(template: &str) -> Vec<&str> {
    PLACEHOLDER_RE
        .captures_iter(template)
        .filter_map(|c| c.get(1))
        .map(|m| m.as_str())
        .collect()
}

/// Resolve a location template against an item and an optional related
/// category record.
///
/// Substitution order does not affect the result: placeholders are distinct
/// non-overlapping literal substrings, each replaced independently.
///
/// Only the first related category record is consulted by callers; this
/// function receives it pre-selected as `category`.
///
/// # Errors
///
/// Returns [`Error::MissingRelation`] if the template contains a
/// category-scoped placeholder but `category` is `None`. The builder
/// guarantees this does not happen for well-behaved fetchers and downgrades
/// it to a per-item warning when it does.
pub fn resolve(
    template: &str,
    frontend_url: &str,
    item: &Map<String, Value>,
    category: Option<&Map<String, Value>>,
) -> Result<Resolution> {
    let mut location = template.replace(FRONTEND_URL_TOKEN, frontend_url);
    let mut missing = Vec::new();

    for name in placeholders(template) {
        let value = if let Some(category_attr) = name.strip_prefix(CATEGORY_PREFIX) {
            let category = category.ok_or_else(|| Error::MissingRelation(name.to_string()))?;
            attribute_text(category, category_attr)
        } else {
            attribute_text(item, name)
        };

        let replacement = match value {
            Some(text) => text,
            None => {
                missing.push(name.to_string());
                MISSING_MARKER.to_string()
            },
        };

        location = location.replace(&format!("[{name}]"), &replacement);
    }

    Ok(Resolution {
        location,
        missing_attributes: missing,
    })
}

/// Render an attribute value as substitution text.
///
/// Strings substitute verbatim; numbers and booleans use their JSON
/// rendering. Null and absent attributes both count as missing.
fn attribute_text(attributes: &Map<String, Value>, name: &str) -> Option<String> {
    match attributes.get(name)? {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}
