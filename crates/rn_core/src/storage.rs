use async_trait::async_trait;
use std::collections::HashMap;
use crate::types::BiasRecord;
use crate::Result;

/// Persistence for the bias dataset. Domains passed in are normalized by
/// the backend before they are compared or written.
#[async_trait]
pub trait BiasStorage: Send + Sync {
    /// All rows for one domain, in insertion order
    async fn find_by_domain(&self, domain: &str) -> Result<Vec<BiasRecord>>;

    /// First row for each of the given domains, keyed by normalized domain.
    /// Domains without a row are absent from the map.
    async fn find_by_domains(&self, domains: &[String]) -> Result<HashMap<String, BiasRecord>>;

    /// Delete every row and insert `records` as one unit. Returns the
    /// number of rows written.
    async fn replace_all(&self, records: &[BiasRecord]) -> Result<usize>;

    /// Number of stored rows
    async fn count(&self) -> Result<usize>;
}
