use rn_sources::{BiasEnricher, BiasRefresher, RelatedArticles};
use std::sync::Arc;

pub struct AppState {
    pub related: Arc<RelatedArticles>,
    pub refresher: Arc<BiasRefresher>,
    pub enricher: BiasEnricher,
}

impl AppState {
    pub fn new(related: RelatedArticles, refresher: BiasRefresher) -> Self {
        let enricher = related.enricher().clone();
        Self {
            related: Arc::new(related),
            refresher: Arc::new(refresher),
            enricher,
        }
    }
}
