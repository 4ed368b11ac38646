use rn_core::config::{DEFAULT_MAX_KEYWORDS, DEFAULT_SOURCE_DOMAINS};
use rn_core::{normalize_domain, Article, KeywordExtractor, NewsProvider, RelatedArticlesRequest, Result, SearchTerms};
use std::sync::Arc;
use tracing::{debug, info};
use crate::enrich::BiasEnricher;

/// Related-articles pipeline. Key phrases from the request drive one
/// provider search; the results come back with bias ratings attached.
pub struct RelatedArticles {
    extractor: Arc<dyn KeywordExtractor>,
    provider: Arc<dyn NewsProvider>,
    enricher: BiasEnricher,
    source_domains: Vec<String>,
    max_keywords: usize,
    use_body_text: bool,
}

impl RelatedArticles {
    pub fn new(
        extractor: Arc<dyn KeywordExtractor>,
        provider: Arc<dyn NewsProvider>,
        enricher: BiasEnricher,
    ) -> Self {
        Self {
            extractor,
            provider,
            enricher,
            source_domains: DEFAULT_SOURCE_DOMAINS.iter().map(|d| d.to_string()).collect(),
            max_keywords: DEFAULT_MAX_KEYWORDS,
            use_body_text: false,
        }
    }

    pub fn with_source_domains(mut self, domains: Vec<String>) -> Self {
        self.source_domains = domains;
        self
    }

    pub fn with_max_keywords(mut self, max_keywords: usize) -> Self {
        self.max_keywords = max_keywords;
        self
    }

    /// Also feed `innerText` to the extractor, not just the title.
    pub fn with_body_text(mut self, enabled: bool) -> Self {
        self.use_body_text = enabled;
        self
    }

    pub fn enricher(&self) -> &BiasEnricher {
        &self.enricher
    }

    fn extraction_text<'a>(&self, request: &'a RelatedArticlesRequest) -> std::borrow::Cow<'a, str> {
        if self.use_body_text && !request.inner_text.trim().is_empty() {
            format!("{}\n{}", request.title, request.inner_text).into()
        } else {
            request.title.as_str().into()
        }
    }

    pub async fn related(&self, request: &RelatedArticlesRequest) -> Result<Vec<Article>> {
        let exclude_domain = normalize_domain(&request.domain);
        let keywords = self
            .extractor
            .extract(&self.extraction_text(request), self.max_keywords)
            .await?;
        if keywords.is_empty() {
            debug!("No key phrases found in {:?}, nothing to search", request.title);
            return Ok(Vec::new());
        }
        info!("🔎 Searching {} for {:?}", self.provider.name(), keywords);

        let terms = SearchTerms {
            keywords,
            candidate_domains: self.source_domains.clone(),
            exclude_domain,
        };
        let articles = self.provider.search(&terms).await?;
        debug!("{} returned {} articles", self.provider.name(), articles.len());

        self.enricher.enrich(articles).await
    }
}
