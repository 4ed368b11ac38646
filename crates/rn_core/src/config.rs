use clap::{Args, ValueEnum};
use std::net::SocketAddr;
use std::time::Duration;
use url::Url;
use crate::{normalize_domain, Error, Result};

pub const DEFAULT_MAX_KEYWORDS: usize = 3;
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 5;

/// Outlets searched when `RN_SOURCE_DOMAINS` is not set.
pub const DEFAULT_SOURCE_DOMAINS: &[&str] = &[
    "cnn.com",
    "foxnews.com",
    "nypost.com",
    "washingtonpost.com",
    "latimes.com",
    "bloomberg.com",
    "cbsnews.com",
    "npr.org",
    "aljazeera.com",
    "bbc.com",
    "nytimes.com",
    "msnbc.com",
    "nbcnews.com",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ProviderKind {
    Newscatcher,
    #[value(name = "newsapi")]
    NewsApi,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExtractorKind {
    Ngram,
    Chat,
}

/// Raw settings as read from flags and the environment.
#[derive(Args, Debug, Clone, Default)]
pub struct SettingsArgs {
    /// News search provider used for related articles
    #[arg(long, env = "RN_NEWS_PROVIDER", value_enum)]
    pub news_provider: Option<ProviderKind>,

    #[arg(long, env = "NEWSCATCHER_API_KEY", hide_env_values = true)]
    pub newscatcher_api_key: Option<String>,

    #[arg(long, env = "NEWSAPI_API_KEY", hide_env_values = true)]
    pub newsapi_api_key: Option<String>,

    /// Endpoint serving the full bias dataset
    #[arg(long, env = "MBFC_API_URL")]
    pub mbfc_api_url: Option<String>,

    #[arg(long, env = "BEARER_TOKEN", hide_env_values = true)]
    pub bearer_token: Option<String>,

    /// postgres://, sqlite: or memory://
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    pub database_url: Option<String>,

    #[arg(long, env = "RN_EXTRACTOR", value_enum)]
    pub extractor: Option<ExtractorKind>,

    #[arg(long, env = "RN_CHAT_URL")]
    pub chat_url: Option<String>,

    #[arg(long, env = "RN_CHAT_MODEL")]
    pub chat_model: Option<String>,

    #[arg(long, env = "RN_CHAT_API_KEY", hide_env_values = true)]
    pub chat_api_key: Option<String>,

    #[arg(long, env = "RN_MAX_KEYWORDS")]
    pub max_keywords: Option<usize>,

    /// Comma separated list of outlets to search
    #[arg(long, env = "RN_SOURCE_DOMAINS", value_delimiter = ',')]
    pub source_domains: Option<Vec<String>>,

    #[arg(long, env = "RN_HTTP_TIMEOUT_SECS")]
    pub http_timeout_secs: Option<u64>,

    /// Feed the article body to the extractor along with the title
    #[arg(long, env = "RN_EXTRACT_FROM_BODY")]
    pub extract_from_body: Option<bool>,

    #[arg(long, env = "RN_BIND")]
    pub bind: Option<SocketAddr>,
}

#[derive(Debug, Clone)]
pub struct ProviderSettings {
    pub kind: ProviderKind,
    pub api_key: String,
}

#[derive(Debug, Clone)]
pub struct MbfcSettings {
    pub api_url: Url,
    pub bearer_token: String,
}

#[derive(Debug, Clone)]
pub struct ChatSettings {
    pub url: Url,
    pub model: String,
    pub api_key: String,
}

#[derive(Debug, Clone)]
pub struct ExtractorSettings {
    pub kind: ExtractorKind,
    pub max_keywords: usize,
    pub chat: Option<ChatSettings>,
}

/// Validated service configuration. Built once at startup.
#[derive(Debug, Clone)]
pub struct Settings {
    pub provider: ProviderSettings,
    pub mbfc: MbfcSettings,
    pub database_url: String,
    pub extractor: ExtractorSettings,
    pub source_domains: Vec<String>,
    pub http_timeout: Duration,
    pub extract_from_body: bool,
    pub bind: SocketAddr,
}

impl SettingsArgs {
    pub fn database_url(&self) -> Result<&str> {
        required(&self.database_url, "DATABASE_URL")
    }
}

impl Settings {
    pub fn from_args(args: &SettingsArgs) -> Result<Self> {
        let kind = args.news_provider.unwrap_or(ProviderKind::Newscatcher);
        let api_key = match kind {
            ProviderKind::Newscatcher => required(&args.newscatcher_api_key, "NEWSCATCHER_API_KEY")?,
            ProviderKind::NewsApi => required(&args.newsapi_api_key, "NEWSAPI_API_KEY")?,
        };

        let mbfc = MbfcSettings {
            api_url: parse_url(required(&args.mbfc_api_url, "MBFC_API_URL")?, "MBFC_API_URL")?,
            bearer_token: required(&args.bearer_token, "BEARER_TOKEN")?.to_string(),
        };

        let max_keywords = args.max_keywords.unwrap_or(DEFAULT_MAX_KEYWORDS);
        if max_keywords == 0 {
            return Err(Error::Configuration("RN_MAX_KEYWORDS must be at least 1".to_string()));
        }

        let extractor_kind = args.extractor.unwrap_or(ExtractorKind::Ngram);
        let chat = match extractor_kind {
            ExtractorKind::Ngram => None,
            ExtractorKind::Chat => Some(ChatSettings {
                url: parse_url(
                    args.chat_url.as_deref().unwrap_or("https://api.openai.com/v1"),
                    "RN_CHAT_URL",
                )?,
                model: args.chat_model.clone().unwrap_or_else(|| "gpt-4o-mini".to_string()),
                api_key: required(&args.chat_api_key, "RN_CHAT_API_KEY")?.to_string(),
            }),
        };

        let http_timeout = args.http_timeout_secs.unwrap_or(DEFAULT_HTTP_TIMEOUT_SECS);
        if http_timeout == 0 {
            return Err(Error::Configuration("RN_HTTP_TIMEOUT_SECS must be at least 1".to_string()));
        }

        let source_domains = match &args.source_domains {
            Some(domains) => clean_domains(domains.iter().map(String::as_str)),
            None => clean_domains(DEFAULT_SOURCE_DOMAINS.iter().copied()),
        };

        Ok(Self {
            provider: ProviderSettings {
                kind,
                api_key: api_key.to_string(),
            },
            mbfc,
            database_url: args.database_url()?.to_string(),
            extractor: ExtractorSettings {
                kind: extractor_kind,
                max_keywords,
                chat,
            },
            source_domains,
            http_timeout: Duration::from_secs(http_timeout),
            extract_from_body: args.extract_from_body.unwrap_or(false),
            bind: args.bind.unwrap_or_else(|| SocketAddr::from(([127, 0, 0, 1], 8000))),
        })
    }
}

fn required<'a>(value: &'a Option<String>, name: &str) -> Result<&'a str> {
    match value.as_deref().map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(Error::Configuration(format!("{name} is required"))),
    }
}

fn parse_url(value: &str, name: &str) -> Result<Url> {
    Url::parse(value).map_err(|e| Error::Configuration(format!("{name} is not a valid URL: {e}")))
}

fn clean_domains<'a>(domains: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut cleaned: Vec<String> = Vec::new();
    for domain in domains.map(normalize_domain) {
        if !domain.is_empty() && !cleaned.contains(&domain) {
            cleaned.push(domain);
        }
    }
    cleaned
}
