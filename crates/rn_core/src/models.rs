use async_trait::async_trait;
use std::fmt;
use crate::Result;

#[async_trait]
pub trait KeywordExtractor: Send + Sync + fmt::Debug {
    fn name(&self) -> &str;

    /// Extract at most `max_keywords` key phrases, most relevant first.
    /// Empty text yields an empty list.
    async fn extract(&self, text: &str, max_keywords: usize) -> Result<Vec<String>>;
}
