use async_trait::async_trait;
use chrono::{DateTime, Duration, SecondsFormat, Utc};
use rn_core::{domain_from_url, Article, Error, NewsProvider, ProviderQuery, Result, SearchTerms};
use serde_json::Value;
use std::fmt;
use tracing::debug;
use url::Url;
use super::{article_list, media_field, normalize_all, text_field};
use crate::client::{Auth, HttpClient};
use crate::query::{ParamNames, PhrasePolicy, QueryBuilder};

const BASE_URL: &str = "https://newsapi.org/v2/";

const PARAMS: ParamNames = ParamNames {
    query: "q",
    sources: "domains",
    exclude: "excludeDomains",
};

/// NewsAPI `/v2/everything`.
pub struct NewsApiProvider {
    client: HttpClient,
    api_key: String,
    builder: QueryBuilder,
}

impl fmt::Debug for NewsApiProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewsApiProvider")
            .field("api_key", &"<redacted>")
            .field("builder", &self.builder)
            .finish()
    }
}

impl NewsApiProvider {
    pub fn new(client: HttpClient, api_key: String) -> Result<Self> {
        let base = Url::parse(BASE_URL).map_err(|e| Error::InvalidUrl(e.to_string()))?;
        Self::with_base_url(client, api_key, base)
    }

    pub fn with_base_url(client: HttpClient, api_key: String, base: Url) -> Result<Self> {
        let endpoint = base.join("everything").map_err(|e| Error::InvalidUrl(e.to_string()))?;
        Ok(Self {
            client,
            api_key,
            builder: QueryBuilder::new(endpoint, PARAMS, PhrasePolicy::Exact),
        })
    }

    // NewsAPI has no cleaned domain field; derive it from the article URL
    fn normalize(raw: &Value) -> Article {
        let link = text_field(raw, "url");
        Article {
            source_url: domain_from_url(&link),
            excerpt: text_field(raw, "description"),
            summary: text_field(raw, "content"),
            title: text_field(raw, "title"),
            media: media_field(raw, "urlToImage"),
            link,
            bias: None,
        }
    }
}

/// Start of the search window: one day before `now`, RFC 3339 in UTC.
fn since(now: DateTime<Utc>) -> String {
    (now - Duration::days(1)).to_rfc3339_opts(SecondsFormat::Secs, true)
}

#[async_trait]
impl NewsProvider for NewsApiProvider {
    fn name(&self) -> &str {
        "newsapi"
    }

    fn build_query(&self, terms: &SearchTerms) -> Result<ProviderQuery> {
        let mut query = self.builder.build(terms);
        query.push("sortBy", "relevancy");
        query.push("language", "en");
        query.push("from", since(Utc::now()));
        Ok(query)
    }

    async fn search(&self, terms: &SearchTerms) -> Result<Vec<Article>> {
        let query = self.build_query(terms)?;
        if query.param(PARAMS.query).map_or(true, str::is_empty) {
            debug!("No keywords to search for, skipping NewsAPI request");
            return Ok(Vec::new());
        }
        debug!("NewsAPI query: {:?}", query.param(PARAMS.query));

        let auth = Auth::Header {
            name: "X-Api-Key",
            value: self.api_key.clone(),
        };
        let body = self.client.get_json(query.to_url(), &auth).await?;
        debug!(
            "NewsAPI total results: {}",
            body.get("totalResults").unwrap_or(&serde_json::Value::Null)
        );

        Ok(normalize_all(article_list(&body, "articles"), Self::normalize))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rn_core::test_support::serve;
    use axum::extract::Query;
    use axum::{routing::get, Json, Router};
    use serde_json::json;
    use std::collections::HashMap;

    fn terms() -> SearchTerms {
        SearchTerms {
            keywords: vec!["election results".to_string(), "voter turnout".to_string()],
            candidate_domains: vec!["www.example.com".to_string()],
            exclude_domain: "www.example.com".to_string(),
        }
    }

    fn client() -> HttpClient {
        HttpClient::new(std::time::Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn test_build_query() {
        let provider = NewsApiProvider::new(client(), "key".to_string()).unwrap();
        let query = provider.build_query(&terms()).unwrap();

        assert_eq!(query.endpoint.as_str(), "https://newsapi.org/v2/everything");
        assert_eq!(query.param("q"), Some("\"election results\" OR \"voter turnout\""));
        // only candidate was the requesting domain
        assert_eq!(query.param("domains"), None);
        assert_eq!(query.param("excludeDomains"), Some("example.com"));
        assert_eq!(query.param("language"), Some("en"));
        let from = query.param("from").unwrap();
        assert!(DateTime::parse_from_rfc3339(from).is_ok());
        assert!(from.ends_with('Z'));
    }

    #[test]
    fn test_search_window_is_rfc3339_utc() {
        let now = DateTime::parse_from_rfc3339("2024-11-06T12:30:00Z")
            .unwrap()
            .with_timezone(&Utc);
        assert_eq!(since(now), "2024-11-05T12:30:00Z");
    }

    #[tokio::test]
    async fn test_search_normalizes_articles() {
        let router = Router::new().route(
            "/v2/everything",
            get(|Query(params): Query<HashMap<String, String>>| async move {
                assert!(!params.contains_key("domains"));
                Json(json!({
                    "status": "ok",
                    "totalResults": 1,
                    "articles": [{
                        "source": {"id": "bbc-news", "name": "BBC News"},
                        "title": "Turnout hits record",
                        "description": "Short description",
                        "url": "https://www.bbc.com/news/articles/1",
                        "urlToImage": null,
                        "content": "Body text"
                    }]
                }))
            }),
        );
        let base = serve(router).await.join("v2/").unwrap();
        let provider = NewsApiProvider::with_base_url(client(), "key".to_string(), base).unwrap();

        let articles = provider.search(&terms()).await.unwrap();
        assert_eq!(articles.len(), 1);
        let article = &articles[0];
        assert_eq!(article.source_url, "bbc.com");
        assert_eq!(article.link, "https://www.bbc.com/news/articles/1");
        assert_eq!(article.excerpt, "Short description");
        assert_eq!(article.summary, "Body text");
        assert_eq!(article.media, json!(""));
        assert!(article.bias.is_none());
    }
}
