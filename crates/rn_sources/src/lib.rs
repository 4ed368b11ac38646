pub mod client;
pub mod enrich;
pub mod manager;
pub mod mbfc;
pub mod providers;
pub mod query;
pub mod refresh;

pub use client::{Auth, HttpClient};
pub use enrich::BiasEnricher;
pub use manager::RelatedArticles;
pub use mbfc::MbfcClient;
pub use providers::{create_provider, NewsApiProvider, NewscatcherProvider};
pub use query::{PhrasePolicy, QueryBuilder};
pub use refresh::BiasRefresher;

pub mod prelude {
    pub use super::{BiasEnricher, BiasRefresher, RelatedArticles};
    pub use rn_core::{Article, BiasRecord, Error, NewsProvider, Result};
}
