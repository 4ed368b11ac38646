use reqwest::Client;
use rn_core::{Error, Result};
use serde_json::Value;
use std::fmt;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Credentials attached to an outbound request.
#[derive(Clone)]
pub enum Auth {
    /// API key sent in a named header, e.g. `X-Api-Key`
    Header { name: &'static str, value: String },
    Bearer(String),
}

impl fmt::Debug for Auth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Auth::Header { name, .. } => f.debug_struct("Header").field("name", name).finish(),
            Auth::Bearer(_) => f.write_str("Bearer(<redacted>)"),
        }
    }
}

/// Shared outbound HTTP client. One GET per call, bounded by the configured
/// timeout; any non-success status is returned as `Error::UpstreamFetch`.
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
}

impl fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpClient").finish_non_exhaustive()
    }
}

impl HttpClient {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("relnews/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }

    pub async fn get_json(&self, url: Url, auth: &Auth) -> Result<Value> {
        debug!("GET {}{}", url.host_str().unwrap_or_default(), url.path());

        let request = self.client.get(url);
        let request = match auth {
            Auth::Header { name, value } => request.header(*name, value),
            Auth::Bearer(token) => request.bearer_auth(token),
        };
        let response = request.send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::UpstreamFetch {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.json().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rn_core::test_support::serve;
    use axum::http::{HeaderMap, StatusCode};
    use axum::{routing::get, Json, Router};
    use serde_json::json;

    #[tokio::test]
    async fn test_sends_auth_header() {
        let router = Router::new().route(
            "/search",
            get(|headers: HeaderMap| async move {
                let key = headers
                    .get("x-api-key")
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or_default()
                    .to_string();
                Json(json!({ "key": key }))
            }),
        );
        let base = serve(router).await;
        let client = HttpClient::new(Duration::from_secs(5)).unwrap();
        let auth = Auth::Header {
            name: "X-Api-Key",
            value: "secret".to_string(),
        };

        let body = client.get_json(base.join("search").unwrap(), &auth).await.unwrap();
        assert_eq!(body["key"], "secret");
    }

    #[tokio::test]
    async fn test_non_success_is_upstream_error() {
        let router = Router::new().route(
            "/data",
            get(|| async { (StatusCode::TOO_MANY_REQUESTS, "quota exceeded") }),
        );
        let base = serve(router).await;
        let client = HttpClient::new(Duration::from_secs(5)).unwrap();

        let err = client
            .get_json(base.join("data").unwrap(), &Auth::Bearer("t".to_string()))
            .await
            .unwrap_err();
        match err {
            Error::UpstreamFetch { status, body } => {
                assert_eq!(status, 429);
                assert_eq!(body, "quota exceeded");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_timeout_is_enforced() {
        let router = Router::new().route(
            "/slow",
            get(|| async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Json(json!({}))
            }),
        );
        let base = serve(router).await;
        let client = HttpClient::new(Duration::from_millis(200)).unwrap();

        let err = client
            .get_json(base.join("slow").unwrap(), &Auth::Bearer("t".to_string()))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Http(ref e) if e.is_timeout()));
    }
}
