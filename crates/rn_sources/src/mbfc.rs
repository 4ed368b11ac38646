use rn_core::config::MbfcSettings;
use rn_core::{normalize_domain, BiasRecord, Result};
use serde::Deserialize;
use std::fmt;
use tracing::{info, warn};
use url::Url;
use crate::client::{Auth, HttpClient};

/// One row of the upstream dataset as published by the MBFC API.
#[derive(Debug, Deserialize)]
struct MbfcEntry {
    #[serde(rename = "Name", default)]
    name: Option<String>,
    #[serde(rename = "MBFC URL", default)]
    mbfc_url: Option<String>,
    #[serde(rename = "Domain", default)]
    domain: Option<String>,
    #[serde(rename = "Bias", default)]
    bias: Option<String>,
    #[serde(rename = "Factual Reporting", default)]
    factual_reporting: Option<String>,
    #[serde(rename = "Country", default)]
    country: Option<String>,
    #[serde(rename = "Credibility", default)]
    credibility: Option<String>,
}

impl From<MbfcEntry> for BiasRecord {
    fn from(entry: MbfcEntry) -> Self {
        BiasRecord {
            name: entry.name.unwrap_or_default(),
            mbfc_url: entry.mbfc_url.unwrap_or_default(),
            domain: normalize_domain(entry.domain.as_deref().unwrap_or_default()),
            bias: entry.bias.unwrap_or_default(),
            factual_reporting: entry.factual_reporting.unwrap_or_default(),
            country: entry.country.unwrap_or_default(),
            credibility: entry.credibility.unwrap_or_default(),
        }
    }
}

/// Client for the full bias dataset endpoint.
pub struct MbfcClient {
    client: HttpClient,
    url: Url,
    bearer_token: String,
}

impl fmt::Debug for MbfcClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MbfcClient")
            .field("url", &self.url.as_str())
            .field("bearer_token", &"<redacted>")
            .finish()
    }
}

impl MbfcClient {
    pub fn new(client: HttpClient, settings: MbfcSettings) -> Self {
        Self {
            client,
            url: settings.api_url,
            bearer_token: settings.bearer_token,
        }
    }

    /// Download every record. Rows without a usable domain are dropped.
    pub async fn fetch_dataset(&self) -> Result<Vec<BiasRecord>> {
        let body = self
            .client
            .get_json(self.url.clone(), &Auth::Bearer(self.bearer_token.clone()))
            .await?;
        let entries: Vec<MbfcEntry> = serde_json::from_value(body)?;
        let fetched = entries.len();

        let records: Vec<BiasRecord> = entries
            .into_iter()
            .map(BiasRecord::from)
            .filter(|record| !record.domain.is_empty())
            .collect();

        info!("📥 MBFC data fetched: {} entries", fetched);
        if records.len() < fetched {
            warn!("Dropped {} MBFC entries without a domain", fetched - records.len());
        }
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rn_core::test_support::serve;
    use axum::http::{HeaderMap, StatusCode};
    use axum::{routing::get, Json, Router};
    use rn_core::Error;
    use serde_json::json;
    use std::time::Duration;

    fn mbfc(url: Url, token: &str) -> MbfcClient {
        let settings = MbfcSettings {
            api_url: url,
            bearer_token: token.to_string(),
        };
        MbfcClient::new(HttpClient::new(Duration::from_secs(5)).unwrap(), settings)
    }

    #[tokio::test]
    async fn test_fetch_dataset() {
        let router = Router::new().route(
            "/full",
            get(|headers: HeaderMap| async move {
                if headers.get("authorization").map_or(true, |v| v != "Bearer token") {
                    return Err(StatusCode::UNAUTHORIZED);
                }
                Ok(Json(json!([
                    {
                        "Name": "Example News",
                        "MBFC URL": "https://mediabiasfactcheck.com/example-news/",
                        "Domain": "www.example.com",
                        "Bias": "Left-Center",
                        "Factual Reporting": "High",
                        "Country": "USA",
                        "Credibility": "High Credibility"
                    },
                    { "Name": "No Domain", "Domain": null, "Bias": "Right" },
                    { "Name": "Sparse", "Domain": "sparse.org", "Country": null }
                ])))
            }),
        );
        let url = serve(router).await.join("full").unwrap();
        let mbfc = mbfc(url, "token");

        let records = mbfc.fetch_dataset().await.unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].domain, "example.com");
        assert_eq!(records[0].bias, "Left-Center");
        assert_eq!(records[0].factual_reporting, "High");
        assert_eq!(records[1].name, "Sparse");
        assert_eq!(records[1].country, "");
    }

    #[tokio::test]
    async fn test_rejected_token() {
        let router = Router::new().route(
            "/full",
            get(|| async { (StatusCode::FORBIDDEN, "invalid token") }),
        );
        let url = serve(router).await.join("full").unwrap();
        let mbfc = mbfc(url, "wrong");

        assert!(matches!(
            mbfc.fetch_dataset().await,
            Err(Error::UpstreamFetch { status: 403, .. })
        ));
    }

    #[tokio::test]
    async fn test_unexpected_payload() {
        let router = Router::new().route("/full", get(|| async { Json(json!({"error": "nope"})) }));
        let url = serve(router).await.join("full").unwrap();
        let mbfc = mbfc(url, "token");

        assert!(matches!(mbfc.fetch_dataset().await, Err(Error::Serialization(_))));
    }
}
