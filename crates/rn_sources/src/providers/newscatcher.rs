use async_trait::async_trait;
use rn_core::{Article, Error, NewsProvider, ProviderQuery, Result, SearchTerms};
use serde_json::Value;
use std::fmt;
use tracing::debug;
use url::Url;
use super::{article_list, media_field, normalize_all, text_field};
use crate::client::{Auth, HttpClient};
use crate::query::{ParamNames, PhrasePolicy, QueryBuilder};

const BASE_URL: &str = "https://api.newscatcherapi.com/v2/";

const PARAMS: ParamNames = ParamNames {
    query: "q",
    sources: "sources",
    exclude: "not_sources",
};

/// Newscatcher v2 `/search`.
pub struct NewscatcherProvider {
    client: HttpClient,
    api_key: String,
    builder: QueryBuilder,
}

impl fmt::Debug for NewscatcherProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewscatcherProvider")
            .field("api_key", &"<redacted>")
            .field("builder", &self.builder)
            .finish()
    }
}

impl NewscatcherProvider {
    pub fn new(client: HttpClient, api_key: String) -> Result<Self> {
        let base = Url::parse(BASE_URL).map_err(|e| Error::InvalidUrl(e.to_string()))?;
        Self::with_base_url(client, api_key, base)
    }

    pub fn with_base_url(client: HttpClient, api_key: String, base: Url) -> Result<Self> {
        let endpoint = base.join("search").map_err(|e| Error::InvalidUrl(e.to_string()))?;
        Ok(Self {
            client,
            api_key,
            builder: QueryBuilder::new(endpoint, PARAMS, PhrasePolicy::AllWords),
        })
    }

    fn normalize(raw: &Value) -> Article {
        Article {
            source_url: text_field(raw, "clean_url"),
            excerpt: text_field(raw, "excerpt"),
            link: text_field(raw, "link"),
            summary: text_field(raw, "summary"),
            title: text_field(raw, "title"),
            media: media_field(raw, "media"),
            bias: None,
        }
    }
}

#[async_trait]
impl NewsProvider for NewscatcherProvider {
    fn name(&self) -> &str {
        "newscatcher"
    }

    fn build_query(&self, terms: &SearchTerms) -> Result<ProviderQuery> {
        let mut query = self.builder.build(terms);
        query.push("sort_by", "relevancy");
        query.push("lang", "en");
        query.push("from", "1 day ago");
        Ok(query)
    }

    async fn search(&self, terms: &SearchTerms) -> Result<Vec<Article>> {
        let query = self.build_query(terms)?;
        if query.param(PARAMS.query).map_or(true, str::is_empty) {
            debug!("No keywords to search for, skipping Newscatcher request");
            return Ok(Vec::new());
        }
        debug!("Newscatcher query: {:?}", query.param(PARAMS.query));

        let auth = Auth::Header {
            name: "X-Api-Key",
            value: self.api_key.clone(),
        };
        let body = self.client.get_json(query.to_url(), &auth).await?;
        debug!(
            "Newscatcher total hits: {}, page size: {}",
            body.get("total_hits").unwrap_or(&serde_json::Value::Null),
            body.get("page_size").unwrap_or(&serde_json::Value::Null)
        );

        Ok(normalize_all(article_list(&body, "articles"), Self::normalize))
    }
}
