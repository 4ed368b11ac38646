use async_trait::async_trait;
use rn_core::{normalize_domain, BiasRecord, BiasStorage, Result};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use crate::StorageBackend;

/// Process-local bias store. The dataset is swapped under one write lock,
/// so readers never observe a half-replaced table.
#[derive(Clone, Default)]
pub struct InMemoryStorage {
    records: Arc<RwLock<Vec<BiasRecord>>>,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl StorageBackend for InMemoryStorage {
    fn name() -> &'static str {
        "memory"
    }

    async fn connect(_url: &str) -> Result<Self> {
        Ok(Self::new())
    }
}

#[async_trait]
impl BiasStorage for InMemoryStorage {
    async fn find_by_domain(&self, domain: &str) -> Result<Vec<BiasRecord>> {
        let domain = normalize_domain(domain);
        let records = self.records.read().await;
        Ok(records
            .iter()
            .filter(|record| record.domain == domain)
            .cloned()
            .collect())
    }

    async fn find_by_domains(&self, domains: &[String]) -> Result<HashMap<String, BiasRecord>> {
        let wanted: Vec<String> = domains.iter().map(|d| normalize_domain(d)).collect();
        let records = self.records.read().await;
        let mut found = HashMap::new();
        for record in records.iter().filter(|record| wanted.contains(&record.domain)) {
            found
                .entry(record.domain.clone())
                .or_insert_with(|| record.clone());
        }
        Ok(found)
    }

    async fn replace_all(&self, records: &[BiasRecord]) -> Result<usize> {
        let fresh: Vec<BiasRecord> = records
            .iter()
            .map(|record| BiasRecord {
                domain: normalize_domain(&record.domain),
                ..record.clone()
            })
            .collect();
        let written = fresh.len();
        *self.records.write().await = fresh;
        Ok(written)
    }

    async fn count(&self) -> Result<usize> {
        Ok(self.records.read().await.len())
    }
}
