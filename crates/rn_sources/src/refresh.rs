use rn_core::{BiasStorage, Result};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};
use crate::mbfc::MbfcClient;

/// Write side of the bias dataset: download it and swap the stored copy.
pub struct BiasRefresher {
    source: MbfcClient,
    storage: Arc<dyn BiasStorage>,
    running: AtomicBool,
}

/// Clears the running flag when the refresh ends, including on panic.
struct RunningGuard<'a>(&'a AtomicBool);

impl Drop for RunningGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl BiasRefresher {
    pub fn new(source: MbfcClient, storage: Arc<dyn BiasStorage>) -> Self {
        Self {
            source,
            storage,
            running: AtomicBool::new(false),
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Fetch the dataset, then replace the stored rows in one transaction.
    /// A failed fetch leaves the store untouched.
    pub async fn refresh(&self) -> Result<usize> {
        let records = self.source.fetch_dataset().await?;
        let written = self.storage.replace_all(&records).await?;
        info!("✅ MBFC data stored: {} records", written);
        Ok(written)
    }

    /// Run a refresh in the background. Returns `None` when one is
    /// already in flight.
    pub fn spawn(self: &Arc<Self>) -> Option<JoinHandle<()>> {
        if self
            .running
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            warn!("MBFC refresh already running, skipping trigger");
            return None;
        }

        let refresher = Arc::clone(self);
        Some(tokio::spawn(async move {
            let _guard = RunningGuard(&refresher.running);
            info!("🔄 MBFC refresh started");
            if let Err(e) = refresher.refresh().await {
                error!("MBFC refresh failed: {}", e);
            }
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::HttpClient;
    use crate::enrich::BiasEnricher;
    use rn_core::test_support::serve;
    use axum::http::StatusCode;
    use axum::{routing::get, Json, Router};
    use rn_core::config::MbfcSettings;
    use rn_core::{BiasRecord, Error};
    use rn_storage::InMemoryStorage;
    use serde_json::json;
    use std::time::Duration;
    use url::Url;

    fn refresher(url: Url, storage: Arc<dyn BiasStorage>) -> Arc<BiasRefresher> {
        let settings = MbfcSettings {
            api_url: url,
            bearer_token: "token".to_string(),
        };
        let client = HttpClient::new(Duration::from_secs(5)).unwrap();
        Arc::new(BiasRefresher::new(MbfcClient::new(client, settings), storage))
    }

    fn dataset() -> serde_json::Value {
        json!([
            {
                "Name": "Example News",
                "MBFC URL": "https://mediabiasfactcheck.com/example-news/",
                "Domain": "www.example.com",
                "Bias": "Center",
                "Factual Reporting": "High",
                "Country": "USA",
                "Credibility": "High Credibility"
            },
            {
                "Name": "NPR",
                "MBFC URL": "https://mediabiasfactcheck.com/npr/",
                "Domain": "npr.org",
                "Bias": "Left-Center",
                "Factual Reporting": "High",
                "Country": "USA",
                "Credibility": "High Credibility"
            }
        ])
    }

    fn stale() -> BiasRecord {
        BiasRecord {
            name: "Stale".to_string(),
            mbfc_url: String::new(),
            domain: "stale.example".to_string(),
            bias: "Right".to_string(),
            factual_reporting: String::new(),
            country: String::new(),
            credibility: String::new(),
        }
    }

    #[tokio::test]
    async fn test_refresh_then_check_bias() {
        let router = Router::new().route("/full", get(|| async { Json(dataset()) }));
        let url = serve(router).await.join("full").unwrap();
        let storage = Arc::new(InMemoryStorage::new());
        storage.replace_all(&[stale()]).await.unwrap();

        let refresher = refresher(url, storage.clone());
        assert_eq!(refresher.refresh().await.unwrap(), 2);

        let enricher = BiasEnricher::new(storage.clone());
        let with_www = enricher.check_bias("www.example.com").await.unwrap();
        let without_www = enricher.check_bias("example.com").await.unwrap();
        assert_eq!(with_www.len(), 1);
        assert_eq!(with_www, without_www);
        assert_eq!(with_www[0].bias, "Center");
        assert!(enricher.check_bias("stale.example").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_failed_fetch_keeps_existing_rows() {
        let router = Router::new().route(
            "/full",
            get(|| async { (StatusCode::UNAUTHORIZED, "bad token") }),
        );
        let url = serve(router).await.join("full").unwrap();
        let storage = Arc::new(InMemoryStorage::new());
        storage.replace_all(&[stale()]).await.unwrap();

        let refresher = refresher(url, storage.clone());
        assert!(matches!(
            refresher.refresh().await,
            Err(Error::UpstreamFetch { status: 401, .. })
        ));
        assert_eq!(storage.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_spawn_skips_overlapping_trigger() {
        let router = Router::new().route(
            "/full",
            get(|| async {
                tokio::time::sleep(Duration::from_millis(300)).await;
                Json(dataset())
            }),
        );
        let url = serve(router).await.join("full").unwrap();
        let storage = Arc::new(InMemoryStorage::new());
        let refresher = refresher(url, storage.clone());

        let first = refresher.spawn().expect("first trigger runs");
        assert!(refresher.is_running());
        assert!(refresher.spawn().is_none());

        first.await.unwrap();
        assert!(!refresher.is_running());
        assert_eq!(storage.count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_spawn_clears_flag_after_failure() {
        let router = Router::new().route(
            "/full",
            get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "down") }),
        );
        let url = serve(router).await.join("full").unwrap();
        let refresher = refresher(url, Arc::new(InMemoryStorage::new()));

        refresher.spawn().unwrap().await.unwrap();
        assert!(!refresher.is_running());
        assert!(refresher.spawn().is_some());
    }
}
