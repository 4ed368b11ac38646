use async_trait::async_trait;
use rn_core::{normalize_domain, BiasRecord, BiasStorage, Error, Result};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::{QueryBuilder, Row, Sqlite};
use std::collections::HashMap;
use std::path::Path;
use std::str::FromStr;
use super::{INSERT_PREFIX, SELECT_COLUMNS};
use crate::StorageBackend;

const MIGRATIONS: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS mbfc_data (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT,
        mbfc_url TEXT,
        domain TEXT,
        bias TEXT,
        factual_reporting TEXT,
        country TEXT,
        credibility TEXT
    )
    "#,
    "CREATE INDEX IF NOT EXISTS mbfc_data_domain_idx ON mbfc_data (domain)",
];

// older SQLite builds cap a statement at 999 variables
const INSERT_CHUNK: usize = 100;

pub struct SqliteStorage {
    pool: SqlitePool,
}

impl SqliteStorage {
    pub async fn new_with_path(db_path: &Path) -> Result<Self> {
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let options = SqliteConnectOptions::new()
            .filename(db_path)
            .create_if_missing(true);
        Self::with_options(options).await
    }

    async fn with_options(options: SqliteConnectOptions) -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .map_err(|e| Error::Storage(format!("Failed to connect to database: {}", e)))?;

        for (i, migration) in MIGRATIONS.iter().enumerate() {
            sqlx::query(migration)
                .execute(&pool)
                .await
                .map_err(|e| Error::Storage(format!("Failed to run migration {}: {}", i, e)))?;
        }

        Ok(Self { pool })
    }
}

fn record_from_row(row: &SqliteRow) -> Result<BiasRecord> {
    Ok(BiasRecord {
        name: row.try_get("name").map_err(Error::storage)?,
        mbfc_url: row.try_get("mbfc_url").map_err(Error::storage)?,
        domain: row.try_get("domain").map_err(Error::storage)?,
        bias: row.try_get("bias").map_err(Error::storage)?,
        factual_reporting: row.try_get("factual_reporting").map_err(Error::storage)?,
        country: row.try_get("country").map_err(Error::storage)?,
        credibility: row.try_get("credibility").map_err(Error::storage)?,
    })
}

#[async_trait]
impl StorageBackend for SqliteStorage {
    fn name() -> &'static str {
        "sqlite"
    }

    async fn connect(url: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(url)
            .map_err(|e| Error::Configuration(format!("Invalid sqlite URL: {}", e)))?
            .create_if_missing(true);
        Self::with_options(options).await
    }
}

#[async_trait]
impl BiasStorage for SqliteStorage {
    async fn find_by_domain(&self, domain: &str) -> Result<Vec<BiasRecord>> {
        let rows = sqlx::query(&format!("{SELECT_COLUMNS} WHERE domain = ? ORDER BY id"))
            .bind(normalize_domain(domain))
            .fetch_all(&self.pool)
            .await
            .map_err(|e| Error::Storage(format!("Failed to look up bias data: {}", e)))?;

        rows.iter().map(record_from_row).collect()
    }

    async fn find_by_domains(&self, domains: &[String]) -> Result<HashMap<String, BiasRecord>> {
        if domains.is_empty() {
            return Ok(HashMap::new());
        }

        let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new(SELECT_COLUMNS);
        builder.push(" WHERE domain IN (");
        let mut separated = builder.separated(", ");
        for domain in domains {
            separated.push_bind(normalize_domain(domain));
        }
        separated.push_unseparated(") ORDER BY id");

        let rows = builder
            .build()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| Error::Storage(format!("Failed to look up bias data: {}", e)))?;

        let mut found = HashMap::new();
        for row in &rows {
            let record = record_from_row(row)?;
            found.entry(record.domain.clone()).or_insert(record);
        }
        Ok(found)
    }

    async fn replace_all(&self, records: &[BiasRecord]) -> Result<usize> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| Error::Storage(format!("Failed to start transaction: {}", e)))?;

        sqlx::query("DELETE FROM mbfc_data")
            .execute(&mut *tx)
            .await
            .map_err(|e| Error::Storage(format!("Failed to prune bias data: {}", e)))?;

        for chunk in records.chunks(INSERT_CHUNK) {
            let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new(INSERT_PREFIX);
            builder.push_values(chunk, |mut row, record| {
                row.push_bind(record.name.clone())
                    .push_bind(record.mbfc_url.clone())
                    .push_bind(normalize_domain(&record.domain))
                    .push_bind(record.bias.clone())
                    .push_bind(record.factual_reporting.clone())
                    .push_bind(record.country.clone())
                    .push_bind(record.credibility.clone());
            });
            builder
                .build()
                .execute(&mut *tx)
                .await
                .map_err(|e| Error::Storage(format!("Failed to insert bias data: {}", e)))?;
        }

        tx.commit()
            .await
            .map_err(|e| Error::Storage(format!("Failed to commit bias data: {}", e)))?;
        Ok(records.len())
    }

    async fn count(&self) -> Result<usize> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM mbfc_data")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| Error::Storage(format!("Failed to count bias data: {}", e)))?;
        Ok(count as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::conformance;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_sqlite_storage() {
        let temp_dir = tempdir().unwrap();
        let storage = SqliteStorage::new_with_path(&temp_dir.path().join("bias.db"))
            .await
            .unwrap();
        conformance::run(&storage).await;
    }

    #[tokio::test]
    async fn test_failed_insert_rolls_back() {
        let temp_dir = tempdir().unwrap();
        let storage = SqliteStorage::new_with_path(&temp_dir.path().join("bias.db"))
            .await
            .unwrap();
        sqlx::query(&format!(
            "CREATE TRIGGER reject_domain BEFORE INSERT ON mbfc_data \
             WHEN NEW.domain = '{}' BEGIN SELECT RAISE(ABORT, 'rejected row'); END",
            conformance::REJECTED_DOMAIN
        ))
        .execute(&storage.pool)
        .await
        .unwrap();

        conformance::run_rollback(&storage, INSERT_CHUNK * 2 + 50).await;
    }

    #[tokio::test]
    async fn test_dataset_survives_reconnect() {
        let temp_dir = tempdir().unwrap();
        let db_path = temp_dir.path().join("nested").join("bias.db");

        let storage = SqliteStorage::new_with_path(&db_path).await.unwrap();
        storage
            .replace_all(&[conformance::record("BBC", "www.bbc.com", "left-center")])
            .await
            .unwrap();
        drop(storage);

        let url = format!("sqlite://{}", db_path.display());
        let storage = SqliteStorage::connect(&url).await.unwrap();
        let found = storage.find_by_domain("bbc.com").await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].domain, "bbc.com");
    }
}
