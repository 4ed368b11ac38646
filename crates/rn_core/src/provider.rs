use async_trait::async_trait;
use url::Url;
use crate::types::{Article, SearchTerms};
use crate::Result;

/// A fully built request against one provider endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderQuery {
    pub endpoint: Url,
    pub params: Vec<(String, String)>,
}

impl ProviderQuery {
    pub fn new(endpoint: Url) -> Self {
        Self {
            endpoint,
            params: Vec::new(),
        }
    }

    pub fn param(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn push(&mut self, name: &str, value: impl Into<String>) {
        self.params.push((name.to_string(), value.into()));
    }

    /// Endpoint with every parameter form-urlencoded into the query string.
    pub fn to_url(&self) -> Url {
        let mut url = self.endpoint.clone();
        if !self.params.is_empty() {
            url.query_pairs_mut().extend_pairs(self.params.iter());
        }
        url
    }
}

/// A news search API. Exactly one is active per service instance.
#[async_trait]
pub trait NewsProvider: Send + Sync {
    fn name(&self) -> &str;

    /// Build the outbound request without sending it
    fn build_query(&self, terms: &SearchTerms) -> Result<ProviderQuery>;

    /// Run one search and normalize the results
    async fn search(&self, terms: &SearchTerms) -> Result<Vec<Article>>;
}
