use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A related article as returned to clients. Built per request from a
/// provider response and never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    #[serde(rename = "clean_url", default)]
    pub source_url: String,
    #[serde(default)]
    pub excerpt: String,
    #[serde(default)]
    pub link: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub title: String,
    /// Provider specific: usually an image URL, sometimes structured.
    #[serde(default = "empty_media")]
    pub media: Value,
    #[serde(rename = "mbfc", default)]
    pub bias: Option<BiasRecord>,
}

fn empty_media() -> Value {
    Value::String(String::new())
}

impl Article {
    pub fn new(source_url: impl Into<String>) -> Self {
        Self {
            source_url: source_url.into(),
            excerpt: String::new(),
            link: String::new(),
            summary: String::new(),
            title: String::new(),
            media: empty_media(),
            bias: None,
        }
    }
}

/// Media bias rating for one publisher domain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BiasRecord {
    pub name: String,
    pub mbfc_url: String,
    pub domain: String,
    pub bias: String,
    pub factual_reporting: String,
    pub country: String,
    pub credibility: String,
}

/// Body of `POST /related_articles_by_text`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelatedArticlesRequest {
    pub title: String,
    #[serde(rename = "innerText", default)]
    pub inner_text: String,
    pub domain: String,
}

/// Everything a provider needs to build one search.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchTerms {
    pub keywords: Vec<String>,
    pub candidate_domains: Vec<String>,
    pub exclude_domain: String,
}
