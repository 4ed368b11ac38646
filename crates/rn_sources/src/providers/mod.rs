use rn_core::config::{ProviderKind, ProviderSettings};
use rn_core::{normalize_domain, Article, NewsProvider, Result};
use serde_json::Value;
use std::sync::Arc;
use tracing::info;
use crate::client::HttpClient;

pub mod newsapi;
pub mod newscatcher;

pub use newsapi::NewsApiProvider;
pub use newscatcher::NewscatcherProvider;

/// Build the single active news provider.
pub fn create_provider(settings: &ProviderSettings, client: HttpClient) -> Result<Arc<dyn NewsProvider>> {
    let provider: Arc<dyn NewsProvider> = match settings.kind {
        ProviderKind::Newscatcher => Arc::new(NewscatcherProvider::new(client, settings.api_key.clone())?),
        ProviderKind::NewsApi => Arc::new(NewsApiProvider::new(client, settings.api_key.clone())?),
    };
    info!("📰 News provider ready (using {})", provider.name());
    Ok(provider)
}

/// String value of `key`, or empty when absent or null. Other JSON values
/// are rendered as text.
pub(crate) fn text_field(raw: &Value, key: &str) -> String {
    match raw.get(key) {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// `media` is passed through as-is; missing or null becomes `""`.
pub(crate) fn media_field(raw: &Value, key: &str) -> Value {
    match raw.get(key) {
        None | Some(Value::Null) => Value::String(String::new()),
        Some(value) => value.clone(),
    }
}

/// Items of the provider's article list, empty when the field is missing.
pub(crate) fn article_list<'a>(body: &'a Value, field: &str) -> &'a [Value] {
    body.get(field)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default()
}

pub(crate) fn normalize_all(items: &[Value], normalize: fn(&Value) -> Article) -> Vec<Article> {
    items
        .iter()
        .map(normalize)
        .map(|mut article| {
            article.source_url = normalize_domain(&article.source_url);
            article
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::time::Duration;

    #[test]
    fn test_field_defaults() {
        let raw = json!({"title": "A", "summary": null, "rank": 3, "media": {"url": "x"}});
        assert_eq!(text_field(&raw, "title"), "A");
        assert_eq!(text_field(&raw, "summary"), "");
        assert_eq!(text_field(&raw, "excerpt"), "");
        assert_eq!(text_field(&raw, "rank"), "3");
        assert_eq!(media_field(&raw, "media"), json!({"url": "x"}));
        assert_eq!(media_field(&raw, "image"), json!(""));
    }

    #[test]
    fn test_missing_article_list() {
        assert!(article_list(&json!({"status": "No matches for your search."}), "articles").is_empty());
        assert!(article_list(&json!({"articles": null}), "articles").is_empty());
        assert_eq!(article_list(&json!({"articles": [{}, {}]}), "articles").len(), 2);
    }

    #[test]
    fn test_create_provider() {
        let client = HttpClient::new(Duration::from_secs(1)).unwrap();
        let settings = ProviderSettings {
            kind: ProviderKind::NewsApi,
            api_key: "key".to_string(),
        };
        assert_eq!(create_provider(&settings, client).unwrap().name(), "newsapi");
    }
}
