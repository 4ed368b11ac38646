use async_trait::async_trait;
use rn_core::{BiasStorage, Error, Result};
use std::sync::Arc;
use tracing::info;

pub mod backends;

pub use backends::*;

/// A concrete bias store that can be opened from a connection URL.
#[async_trait]
pub trait StorageBackend: BiasStorage + Sized + 'static {
    /// Short name used in logs
    fn name() -> &'static str;

    /// Open the store and make sure the `mbfc_data` schema exists
    async fn connect(url: &str) -> Result<Self>;
}

async fn open<T: StorageBackend>(url: &str) -> Result<Arc<dyn BiasStorage>> {
    let storage = T::connect(url).await?;
    info!("🏦 Storage backend initialized (using {})", T::name());
    Ok(Arc::new(storage))
}

/// Pick a backend from the scheme of `url`: `memory://`, `sqlite:` or
/// `postgres://`.
pub async fn create_storage(url: &str) -> Result<Arc<dyn BiasStorage>> {
    let scheme = url.split(':').next().unwrap_or_default().to_ascii_lowercase();
    match scheme.as_str() {
        "memory" => open::<InMemoryStorage>(url).await,
        #[cfg(feature = "postgres")]
        "postgres" | "postgresql" => open::<PostgresStorage>(url).await,
        #[cfg(feature = "sqlite")]
        "sqlite" => open::<SqliteStorage>(url).await,
        "postgres" | "postgresql" | "sqlite" => Err(Error::Configuration(format!(
            "storage backend '{scheme}' was not compiled in"
        ))),
        _ => Err(Error::Configuration(format!(
            "unsupported DATABASE_URL scheme '{scheme}'"
        ))),
    }
}

pub mod prelude {
    pub use super::{create_storage, StorageBackend};
    pub use super::backends::*;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_memory_storage() {
        let storage = create_storage("memory://").await.unwrap();
        assert_eq!(storage.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_unknown_scheme_is_a_configuration_error() {
        assert!(matches!(
            create_storage("mysql://localhost/db").await,
            Err(Error::Configuration(_))
        ));
    }
}
