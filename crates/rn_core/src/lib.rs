pub mod config;
pub mod domain;
pub mod error;
pub mod models;
pub mod provider;
pub mod storage;
pub mod types;

#[cfg(feature = "test-util")]
pub mod test_support;

pub use domain::{domain_from_url, normalize_domain};
pub use error::Error;
pub use models::KeywordExtractor;
pub use provider::{NewsProvider, ProviderQuery};
pub use storage::BiasStorage;
pub use types::{Article, BiasRecord, RelatedArticlesRequest, SearchTerms};

pub type Result<T> = std::result::Result<T, Error>;
