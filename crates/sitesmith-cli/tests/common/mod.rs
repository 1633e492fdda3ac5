#![allow(dead_code)]

use serde_json::json;
use std::path::PathBuf;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Mount the content-type-builder endpoint with an article and a category
/// collection plus a single type that must be filtered out.
pub async fn mount_content_types(server: &MockServer) {
    let payload = json!({
        "data": [
            {
                "uid": "api::article.article",
                "schema": {
                    "kind": "collectionType",
                    "pluralName": "articles",
                    "displayName": "Article",
                    "attributes": { "title": {}, "slug": {}, "categories": {} }
                }
            },
            {
                "uid": "api::category.category",
                "schema": {
                    "kind": "collectionType",
                    "pluralName": "categories",
                    "displayName": "Category",
                    "attributes": { "name": {}, "slug": {} }
                }
            },
            {
                "uid": "api::about.about",
                "schema": {
                    "kind": "singleType",
                    "pluralName": "abouts",
                    "displayName": "About",
                    "attributes": {}
                }
            }
        ]
    });

    Mock::given(method("GET"))
        .and(path("/api/content-type-builder/content-types"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&payload))
        .mount(server)
        .await;
}

/// Mount the plural article route with two plain items.
pub async fn mount_articles(server: &MockServer) {
    let payload = json!({
        "data": [
            { "id": 1, "attributes": { "title": "First", "slug": "a" } },
            { "id": 2, "attributes": { "title": "Second", "slug": "b" } }
        ]
    });

    Mock::given(method("GET"))
        .and(path("/api/articles"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&payload))
        .mount(server)
        .await;
}

/// Mount the plural article route with one category-populated item.
pub async fn mount_articles_with_categories(server: &MockServer) {
    let payload = json!({
        "data": [{
            "id": 1,
            "attributes": {
                "title": "Nested",
                "slug": "x",
                "categories": {
                    "data": [{ "id": 9, "attributes": { "name": "Cat", "slug": "cat1" } }]
                }
            }
        }]
    });

    Mock::given(method("GET"))
        .and(path("/api/articles"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&payload))
        .mount(server)
        .await;
}

/// Write a configuration file into `dir` and return its path.
pub fn write_config(dir: &std::path::Path, api_url: &str, rules: &str) -> PathBuf {
    let contents = format!(
        r#"
frontend_url = "https://www.example.com"

[api]
url = "{api_url}"
timeout_secs = 5

{rules}
"#
    );
    let path = dir.join("sitesmith.toml");
    std::fs::write(&path, contents).expect("write config");
    path
}

pub const ARTICLE_RULE: &str = r#"
[[rules]]
content_type = "article"
priority = 0.8
loc = "{frontend_url}/blog/[slug]"
"#;

pub const CATEGORY_RULE: &str = r#"
[[rules]]
content_type = "article"
priority = 0.5
loc = "{frontend_url}/[category-slug]/[slug]"
has_category = true
category_content_type = "category"
"#;
