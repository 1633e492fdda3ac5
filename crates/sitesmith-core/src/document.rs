//! Sitemap document model and XML serialization.
//!
//! A [`SitemapDocument`] is an ordered sequence of [`UrlEntry`] values wrapped
//! in the sitemap-protocol `urlset` envelope. Documents are regenerated fully
//! on every run; there is no incremental state.
//!
//! Serialization escapes XML-unsafe characters (`&`, `<`, `>`) in `<loc>`
//! text so output is always well-formed, a deliberate strengthening over the
//! legacy generator this replaces.

use crate::types::Priority;
use chrono::NaiveDate;
use quick_xml::escape::escape;
use serde::{Deserialize, Serialize};

/// Filename under which callers conventionally persist the artifact.
pub const FILE_NAME: &str = "sitemap.xml";

/// MIME type of the produced artifact.
pub const MIME_TYPE: &str = "application/xml";

/// Sitemap protocol namespace.
pub const SITEMAP_XMLNS: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

const XSI_XMLNS: &str = "http://www.w3.org/2001/XMLSchema-instance";
const SCHEMA_LOCATION: &str =
    "http://www.sitemaps.org/schemas/sitemap/0.9 http://www.sitemaps.org/schemas/sitemap/0.9/sitemap.xsd";

/// One resolved sitemap location with its priority and last-modified date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UrlEntry {
    /// Fully substituted location string.
    pub location: String,
    /// Priority echoed from the originating rule.
    pub priority: Priority,
    /// Generation date, identical for every entry of one run.
    pub last_modified: NaiveDate,
}

/// An ordered sitemap document ready for serialization.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SitemapDocument {
    entries: Vec<UrlEntry>,
}

impl SitemapDocument {
    /// Wraps an ordered entry sequence as a document.
    #[must_use]
    pub const fn new(entries: Vec<UrlEntry>) -> Self {
        Self { entries }
    }

    /// The entries in output order.
    #[must_use]
    pub fn entries(&self) -> &[UrlEntry] {
        &self.entries
    }

    /// Number of URL entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the document has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Renders the document as an XML string.
    ///
    /// Child element order inside each `<url>` block is `<priority>`,
    /// `<loc>`, `<lastmod>`, matching the generator this replaces.
    #[must_use]
    pub fn to_xml(&self) -> String {
        let mut xml = String::with_capacity(256 + self.entries.len() * 128);
        xml.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
        xml.push_str(&format!(
            "<urlset xmlns=\"{SITEMAP_XMLNS}\" xmlns:xsi=\"{XSI_XMLNS}\" xsi:schemaLocation=\"{SCHEMA_LOCATION}\">\n"
        ));

        for entry in &self.entries {
            xml.push_str("\t<url>\n");
            xml.push_str(&format!("\t\t<priority>{}</priority>\n", entry.priority));
            xml.push_str(&format!("\t\t<loc>{}</loc>\n", escape(&entry.location)));
            xml.push_str(&format!(
                "\t\t<lastmod>{}</lastmod>\n",
                entry.last_modified.format("%Y-%m-%d")
            ));
            xml.push_str("\t</url>\n");
        }

        xml.push_str("</urlset>");
        xml
    }

    /// Renders the document as bytes suitable for persistence or download.
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        self.to_xml().into_bytes()
    }
}
