use std::sync::Arc;
use std::time::Duration;
use rn_core::config::{ExtractorKind, ExtractorSettings};
use rn_core::{Error, KeywordExtractor, Result};
use tracing::info;

pub mod chat;
pub mod dummy;
pub mod ngram;
mod stop_words;

pub use chat::ChatExtractor;
pub use dummy::DummyExtractor;
pub use ngram::NgramExtractor;

/// Build the configured keyword extractor.
pub fn create_extractor(settings: &ExtractorSettings, timeout: Duration) -> Result<Arc<dyn KeywordExtractor>> {
    let extractor: Arc<dyn KeywordExtractor> = match settings.kind {
        ExtractorKind::Ngram => Arc::new(NgramExtractor::new()),
        ExtractorKind::Chat => {
            let chat = settings.chat.clone().ok_or_else(|| {
                Error::Configuration("chat extractor selected without chat settings".to_string())
            })?;
            Arc::new(ChatExtractor::new(chat, timeout)?)
        }
    };
    info!("🧠 Keyword extractor ready (using {})", extractor.name());
    Ok(extractor)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_ngram_extractor() {
        let settings = ExtractorSettings {
            kind: ExtractorKind::Ngram,
            max_keywords: 3,
            chat: None,
        };
        let extractor = create_extractor(&settings, Duration::from_secs(1)).unwrap();
        assert_eq!(extractor.name(), "ngram");
    }

    #[test]
    fn test_chat_extractor_needs_settings() {
        let settings = ExtractorSettings {
            kind: ExtractorKind::Chat,
            max_keywords: 3,
            chat: None,
        };
        assert!(matches!(
            create_extractor(&settings, Duration::from_secs(1)),
            Err(Error::Configuration(_))
        ));
    }
}
