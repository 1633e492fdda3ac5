//! Content API access: the fetcher trait and its HTTP implementation.
//!
//! The sitemap builder consumes content through [`ContentFetcher`], a small
//! async trait with two capabilities: list the application-defined content
//! types, and list the items of one type (optionally filtered to items with a
//! non-null relation, with related records populated). Tests inject doubles;
//! production code uses [`HttpFetcher`] against the CMS REST API.

use crate::types::{ContentType, ItemRecord};
use crate::{Error, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::time::Duration;
use tracing::{debug, instrument};

/// Default timeout for content API requests.
const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Uid prefix marking application-defined (as opposed to system) types.
const API_UID_PREFIX: &str = "api::";

/// Schema kind of collection types; single types are not eligible.
const COLLECTION_KIND: &str = "collectionType";

/// Query options for listing content items.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemQuery {
    /// Restrict results to items whose named relation is non-null.
    pub filter_non_null_relation: Option<String>,
    /// Whether to populate relation records in the response.
    pub populate: bool,
}

impl ItemQuery {
    /// Query for items having a non-null `relation`, with relations
    /// populated. This is the shape category rules need.
    #[must_use]
    pub fn with_relation(relation: &str) -> Self {
        Self {
            filter_non_null_relation: Some(relation.to_string()),
            populate: true,
        }
    }
}

/// Capability to retrieve content records from a CMS.
#[async_trait]
pub trait ContentFetcher: Send + Sync {
    /// List the application-defined collection types with their schemas.
    async fn list_content_types(&self) -> Result<Vec<ContentType>>;

    /// List the items of `content_type`, honoring the query's relation
    /// filter and populate flags.
    async fn list_items(
        &self,
        content_type: &ContentType,
        query: &ItemQuery,
    ) -> Result<Vec<ItemRecord>>;
}

/// HTTP fetcher speaking the CMS REST dialect.
///
/// Collection discovery goes through the content-type-builder endpoint;
/// items are listed via each type's plural route. Responses wrap payloads in
/// a `data` envelope.
pub struct HttpFetcher {
    client: Client,
    base_url: String,
}

impl HttpFetcher {
    /// Creates a fetcher for the API at `base_url` with the default timeout.
    pub fn new(base_url: &str) -> Result<Self> {
        Self::with_timeout(base_url, FETCH_TIMEOUT)
    }

    /// Creates a fetcher with a custom request timeout (primarily for tests).
    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self> {
        let base_url = base_url.trim_end_matches('/');
        if base_url.is_empty() {
            return Err(Error::InvalidUrl("API base URL is empty".to_string()));
        }

        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("sitesmith/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(Error::Network)?;

        Ok(Self {
            client,
            base_url: base_url.to_string(),
        })
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
        query: &[(String, String)],
    ) -> Result<T> {
        let response = self.client.get(url).query(query).send().await?;
        let status = response.status();

        if !status.is_success() {
            return Err(Error::Api {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.text().await?;
        serde_json::from_str(&body)
            .map_err(|e| Error::Decode(format!("unexpected payload from '{url}': {e}")))
    }
}

#[async_trait]
impl ContentFetcher for HttpFetcher {
    #[instrument(skip(self), fields(base_url = %self.base_url))]
    async fn list_content_types(&self) -> Result<Vec<ContentType>> {
        let url = format!("{}/content-type-builder/content-types", self.base_url);
        let payload: TypeListPayload = self.get_json(&url, &[]).await?;

        let types: Vec<ContentType> = payload
            .data
            .into_iter()
            .filter(|entry| {
                entry.uid.starts_with(API_UID_PREFIX) && entry.schema.kind == COLLECTION_KIND
            })
            .map(|entry| ContentType {
                uid: entry.uid,
                plural_name: entry.schema.plural_name,
                display_name: entry.schema.display_name,
                attributes: entry.schema.attributes.keys().cloned().collect(),
            })
            .collect();

        debug!(count = types.len(), "Discovered collection types");
        Ok(types)
    }

    #[instrument(skip(self, query), fields(plural = %content_type.plural_name))]
    async fn list_items(
        &self,
        content_type: &ContentType,
        query: &ItemQuery,
    ) -> Result<Vec<ItemRecord>> {
        let url = format!("{}/{}", self.base_url, content_type.plural_name);

        let mut params = Vec::new();
        if let Some(relation) = &query.filter_non_null_relation {
            params.push((format!("filters[{relation}][$notNull]"), "true".to_string()));
        }
        if query.populate {
            params.push(("populate".to_string(), "*".to_string()));
        }

        let payload: ItemListPayload = self.get_json(&url, &params).await?;

        debug!(count = payload.data.len(), "Fetched items");
        Ok(payload
            .data
            .into_iter()
            .map(|entry| ItemRecord {
                id: entry.id,
                attributes: entry.attributes,
            })
            .collect())
    }
}

#[derive(Debug, Deserialize)]
struct TypeListPayload {
    data: Vec<TypeEntry>,
}

#[derive(Debug, Deserialize)]
struct TypeEntry {
    uid: String,
    schema: TypeSchema,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TypeSchema {
    kind: String,
    plural_name: String,
    display_name: String,
    #[serde(default)]
    attributes: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
struct ItemListPayload {
    data: Vec<ItemEntry>,
}

#[derive(Debug, Deserialize)]
struct ItemEntry {
    id: Option<i64>,
    #[serde(default)]
    attributes: Map<String, Value>,
}
