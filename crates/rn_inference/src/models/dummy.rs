use std::fmt;
use rn_core::{KeywordExtractor, Result};

/// Returns a fixed phrase list regardless of input. Stands in for a real
/// extractor in tests and local runs.
pub struct DummyExtractor {
    phrases: Vec<String>,
}

impl fmt::Debug for DummyExtractor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DummyExtractor")
            .field("phrases", &self.phrases)
            .finish()
    }
}

impl DummyExtractor {
    pub fn new<I, S>(phrases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            phrases: phrases.into_iter().map(Into::into).collect(),
        }
    }
}

#[async_trait::async_trait]
impl KeywordExtractor for DummyExtractor {
    fn name(&self) -> &str {
        "dummy"
    }

    async fn extract(&self, _text: &str, max_keywords: usize) -> Result<Vec<String>> {
        Ok(self.phrases.iter().take(max_keywords).cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_dummy_extractor() {
        let extractor = DummyExtractor::new(["election results", "vote count"]);
        assert_eq!(
            extractor.extract("ignored", 3).await.unwrap(),
            vec!["election results", "vote count"]
        );
        assert_eq!(extractor.extract("ignored", 1).await.unwrap(), vec!["election results"]);
    }
}
