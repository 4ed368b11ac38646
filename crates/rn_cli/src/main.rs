use anyhow::Context;
use clap::Parser;
use rn_core::config::{Settings, SettingsArgs};
use rn_core::{BiasStorage, RelatedArticlesRequest, Result};
use rn_sources::{create_provider, BiasEnricher, BiasRefresher, HttpClient, MbfcClient, RelatedArticles};
use rn_web::{create_app, AppState};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Related articles with media bias ratings", long_about = None)]
pub struct Cli {
    #[command(flatten)]
    settings: SettingsArgs,
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Serve the HTTP API
    Serve,
    /// Download the bias dataset and replace the stored copy
    Refresh,
    /// Print the stored bias records for a domain
    CheckBias {
        domain: String,
    },
    /// Run the related-articles pipeline once
    Related {
        #[arg(long)]
        title: String,
        /// Domain of the article being read; excluded from results
        #[arg(long)]
        domain: String,
        /// Article body, used when RN_EXTRACT_FROM_BODY is set
        #[arg(long, default_value = "")]
        text: String,
    },
}

async fn check_storage_with_retry(storage: &Arc<dyn BiasStorage>, max_retries: u32, timeout: Duration) -> Result<usize> {
    let mut retries = 0;
    loop {
        match tokio::time::timeout(timeout, storage.count()).await {
            Ok(Ok(count)) => return Ok(count),
            Ok(Err(e)) if retries + 1 >= max_retries => return Err(e),
            Err(_) if retries + 1 >= max_retries => {
                return Err(rn_core::Error::Storage("storage health check timed out".to_string()))
            }
            Ok(Err(e)) => info!("Storage health check failed ({}), retrying {}/{}...", e, retries + 1, max_retries),
            Err(_) => info!("Storage health check timed out, retrying {}/{}...", retries + 1, max_retries),
        }
        retries += 1;
        tokio::time::sleep(Duration::from_secs(2)).await;
    }
}

async fn open_storage(database_url: &str) -> Result<Arc<dyn BiasStorage>> {
    let storage = rn_storage::create_storage(database_url).await?;
    info!("💾 Checking storage connection...");
    let count = check_storage_with_retry(&storage, 3, Duration::from_secs(10)).await?;
    info!("✨ Storage ready ({} bias records)", count);
    Ok(storage)
}

fn build_refresher(settings: &Settings, client: HttpClient, storage: Arc<dyn BiasStorage>) -> BiasRefresher {
    BiasRefresher::new(MbfcClient::new(client, settings.mbfc.clone()), storage)
}

fn build_related(settings: &Settings, client: HttpClient, storage: Arc<dyn BiasStorage>) -> Result<RelatedArticles> {
    let extractor = rn_inference::create_extractor(&settings.extractor, settings.http_timeout)?;
    let provider = create_provider(&settings.provider, client)?;
    Ok(RelatedArticles::new(extractor, provider, BiasEnricher::new(storage))
        .with_source_domains(settings.source_domains.clone())
        .with_max_keywords(settings.extractor.max_keywords)
        .with_body_text(settings.extract_from_body))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
    let cli = Cli::parse();

    match cli.command {
        Commands::CheckBias { domain } => {
            let storage = open_storage(cli.settings.database_url()?).await?;
            let records = BiasEnricher::new(storage).check_bias(&domain).await?;
            println!("{}", serde_json::to_string_pretty(&records)?);
        }
        Commands::Refresh => {
            let settings = Settings::from_args(&cli.settings).context("invalid configuration")?;
            let storage = open_storage(&settings.database_url).await?;
            let client = HttpClient::new(settings.http_timeout)?;
            let written = build_refresher(&settings, client, storage).refresh().await?;
            println!("Stored {} bias records", written);
        }
        Commands::Related { title, domain, text } => {
            let settings = Settings::from_args(&cli.settings).context("invalid configuration")?;
            let storage = open_storage(&settings.database_url).await?;
            let client = HttpClient::new(settings.http_timeout)?;
            let related = build_related(&settings, client, storage)?;

            let request = RelatedArticlesRequest {
                title,
                inner_text: text,
                domain,
            };
            let articles = related.related(&request).await?;
            println!("{}", serde_json::to_string_pretty(&serde_json::json!({ "data": articles }))?);
        }
        Commands::Serve => {
            let settings = Settings::from_args(&cli.settings).context("invalid configuration")?;
            let storage = open_storage(&settings.database_url).await?;
            let client = HttpClient::new(settings.http_timeout)?;
            let related = build_related(&settings, client.clone(), storage.clone())?;
            let refresher = build_refresher(&settings, client, storage);
            let app = create_app(AppState::new(related, refresher));

            let listener = tokio::net::TcpListener::bind(settings.bind)
                .await
                .with_context(|| format!("failed to bind {}", settings.bind))?;
            info!("🚀 Listening on http://{}", settings.bind);
            axum::serve(listener, app).await?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_related() {
        let cli = Cli::try_parse_from([
            "rn",
            "--database-url",
            "memory://",
            "related",
            "--title",
            "Local election results",
            "--domain",
            "example.com",
        ])
        .unwrap();
        assert_eq!(cli.settings.database_url.as_deref(), Some("memory://"));
        match cli.command {
            Commands::Related { title, domain, text } => {
                assert_eq!(title, "Local election results");
                assert_eq!(domain, "example.com");
                assert_eq!(text, "");
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_check_storage_with_retry() {
        let storage = rn_storage::create_storage("memory://").await.unwrap();
        assert_eq!(
            check_storage_with_retry(&storage, 3, Duration::from_secs(1)).await.unwrap(),
            0
        );
    }
}
