use rn_core::{normalize_domain, Article, BiasRecord, BiasStorage, Result};
use std::sync::Arc;
use tracing::debug;

/// Read side of the bias dataset.
#[derive(Clone)]
pub struct BiasEnricher {
    storage: Arc<dyn BiasStorage>,
}

impl BiasEnricher {
    pub fn new(storage: Arc<dyn BiasStorage>) -> Self {
        Self { storage }
    }

    /// Attach the bias record of each article's domain, or `None` when the
    /// domain is unknown. Order and length are preserved; all domains are
    /// looked up in a single query.
    pub async fn enrich(&self, mut articles: Vec<Article>) -> Result<Vec<Article>> {
        if articles.is_empty() {
            return Ok(articles);
        }

        let mut domains: Vec<String> = Vec::new();
        for article in &articles {
            let domain = normalize_domain(&article.source_url);
            if !domain.is_empty() && !domains.contains(&domain) {
                domains.push(domain);
            }
        }

        let found = if domains.is_empty() {
            Default::default()
        } else {
            self.storage.find_by_domains(&domains).await?
        };
        debug!("Bias records found for {}/{} domains", found.len(), domains.len());

        for article in articles.iter_mut() {
            article.bias = found.get(&normalize_domain(&article.source_url)).cloned();
        }
        Ok(articles)
    }

    /// Every stored record for `domain`; empty when there is none.
    pub async fn check_bias(&self, domain: &str) -> Result<Vec<BiasRecord>> {
        self.storage.find_by_domain(&normalize_domain(domain)).await
    }
}
