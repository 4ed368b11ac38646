use std::fmt;
use std::time::Duration;
use reqwest::Client;
use rn_core::config::ChatSettings;
use rn_core::{Error, KeywordExtractor, Result};
use serde::{Deserialize, Serialize};

#[derive(Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: Message,
}

#[derive(Deserialize)]
struct Message {
    content: String,
}

/// Key phrase extraction delegated to an OpenAI-compatible chat endpoint.
pub struct ChatExtractor {
    client: Client,
    settings: ChatSettings,
}

impl fmt::Debug for ChatExtractor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChatExtractor")
            .field("client", &"<reqwest::Client>")
            .field("api_key", &"<redacted>")
            .field("url", &self.settings.url.as_str())
            .field("model", &self.settings.model)
            .finish()
    }
}

impl ChatExtractor {
    pub fn new(settings: ChatSettings, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, settings })
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.settings.url.as_str().trim_end_matches('/'))
    }

    /// One phrase per line; list markers, numbering and quotes are dropped.
    fn parse_phrases(content: &str, max_keywords: usize) -> Vec<String> {
        let mut phrases: Vec<String> = Vec::new();
        for line in content.lines() {
            let phrase = strip_marker(line)
                .trim_matches(|c: char| matches!(c, '"' | '\'' | '`'))
                .trim()
                .to_lowercase();
            if phrase.is_empty() || phrases.contains(&phrase) {
                continue;
            }
            phrases.push(phrase);
            if phrases.len() == max_keywords {
                break;
            }
        }
        phrases
    }
}

fn strip_marker(line: &str) -> &str {
    let line = line.trim();
    if let Some(rest) = line.strip_prefix(['-', '*', '•']) {
        return rest.trim();
    }
    let digits = line.chars().take_while(char::is_ascii_digit).count();
    if digits > 0 {
        if let Some(rest) = line[digits..].strip_prefix(['.', ')']) {
            return rest.trim();
        }
    }
    line
}

#[async_trait::async_trait]
impl KeywordExtractor for ChatExtractor {
    fn name(&self) -> &str {
        "chat"
    }

    async fn extract(&self, text: &str, max_keywords: usize) -> Result<Vec<String>> {
        if text.trim().is_empty() || max_keywords == 0 {
            return Ok(Vec::new());
        }

        let prompt = format!(
            "List the {max_keywords} most relevant two or three word key phrases for the following news text. \
             Answer with one phrase per line and nothing else.\n\n{text}"
        );
        let request = ChatRequest {
            model: self.settings.model.clone(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: prompt,
            }],
            temperature: 0.0,
        };

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.settings.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::UpstreamFetch {
                status: status.as_u16(),
                body,
            });
        }

        let response: ChatResponse = response.json().await?;
        let content = response
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| Error::Inference("chat response had no choices".to_string()))?;

        let phrases = Self::parse_phrases(&content, max_keywords);
        tracing::debug!("Extracted keywords: {:?}", phrases);
        Ok(phrases)
    }
}
