//! Core data types for sitemap generation.
//!
//! The central value object is [`Rule`]: one per-collection mapping from a
//! content type to a URL location template. Rules are assembled by the caller
//! (typically from configuration resolved against the live content-type list)
//! and passed to [`generate`](crate::builder::generate); the core never owns
//! operator state.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Descriptor for an application-defined content collection.
///
/// Mirrors what the content-type-builder endpoint exposes for a collection:
/// a unique identifier, the plural path segment used on the REST API, a
/// human-readable name, and the set of attribute names items of this type
/// carry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentType {
    /// Unique identifier, e.g. `api::article.article`.
    pub uid: String,
    /// Plural API path segment, e.g. `articles`.
    pub plural_name: String,
    /// Display name shown to operators, e.g. `Article`.
    pub display_name: String,
    /// Names of the attributes items of this type expose.
    pub attributes: Vec<String>,
}

impl ContentType {
    /// The short name of the collection: the final segment of the uid.
    ///
    /// `api::article.article` yields `article`.
    #[must_use]
    pub fn short_name(&self) -> &str {
        self.uid.rsplit('.').next().unwrap_or(&self.uid)
    }

    /// Whether `name` identifies this content type.
    ///
    /// Matches against the full uid, the short name, the plural API path and
    /// the display name (case-insensitively), so operators can write
    /// `article`, `articles` or `Article` in configuration.
    #[must_use]
    pub fn matches(&self, name: &str) -> bool {
        self.uid == name
            || self.short_name() == name
            || self.plural_name == name
            || self.display_name.eq_ignore_ascii_case(name)
    }
}

/// One record fetched from the content API.
///
/// Exposes a flat attribute map plus, when the fetch populated relations,
/// nested related records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemRecord {
    /// Record id, when the API provides one.
    pub id: Option<i64>,
    /// Flat attribute map of the record.
    pub attributes: Map<String, Value>,
}

impl ItemRecord {
    /// Look up an attribute by name.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&Value> {
        self.attributes.get(name)
    }

    /// The attributes of the first related record under `relation`.
    ///
    /// Populated relations arrive as `{ "<relation>": { "data": [ { "attributes":
    /// {...} } ] } }`. Only the first related record is consulted; that is the
    /// documented single-category policy of location resolution.
    #[must_use]
    pub fn first_related(&self, relation: &str) -> Option<&Map<String, Value>> {
        self.attributes
            .get(relation)?
            .get("data")?
            .as_array()?
            .first()?
            .get("attributes")?
            .as_object()
    }
}

/// Sitemap priority, a value in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "f32", into = "f32")]
pub struct Priority(f32);

impl Priority {
    /// Creates a priority, rejecting values outside `[0, 1]` and non-finite
    /// values.
    pub fn new(value: f32) -> Result<Self> {
        if value.is_finite() && (0.0..=1.0).contains(&value) {
            Ok(Self(value))
        } else {
            Err(Error::Config(format!(
                "priority must be between 0 and 1, got {value}"
            )))
        }
    }

    /// The raw priority value.
    #[must_use]
    pub const fn value(self) -> f32 {
        self.0
    }
}

impl TryFrom<f32> for Priority {
    type Error = Error;

    fn try_from(value: f32) -> Result<Self> {
        Self::new(value)
    }
}

impl From<Priority> for f32 {
    fn from(priority: Priority) -> Self {
        priority.0
    }
}

impl std::fmt::Display for Priority {
    /// Renders whole values with one decimal (`1.0`, not `1`) so the output
    /// matches the conventional sitemap representation.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.0.fract() == 0.0 {
            write!(f, "{:.1}", self.0)
        } else {
            write!(f, "{}", self.0)
        }
    }
}

/// One per-collection mapping rule.
///
/// Fields that the operator may leave unset are `Option`s; a rule contributes
/// output entries iff `content_type`, `location_template` and `priority` are
/// all present, and (when `has_category` is set) `category_content_type` is
/// present as well. Incomplete rules are skipped, not rejected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rule {
    /// The collection this rule maps.
    pub content_type: Option<ContentType>,
    /// Sitemap priority echoed into every entry the rule produces.
    pub priority: Option<Priority>,
    /// Location template with `[name]` / `[category-name]` placeholders.
    pub location_template: Option<String>,
    /// Whether locations nest under a related category record.
    pub has_category: bool,
    /// The category collection, consulted only when `has_category` is set.
    pub category_content_type: Option<ContentType>,
}

impl Rule {
    /// Names of the required fields this rule is missing, in declaration
    /// order. An empty result means the rule passes the base eligibility
    /// check (the category requirement is checked separately).
    #[must_use]
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.content_type.is_none() {
            missing.push("content_type");
        }
        if self.priority.is_none() {
            missing.push("priority");
        }
        if self.location_template.is_none() {
            missing.push("loc");
        }
        missing
    }
}
