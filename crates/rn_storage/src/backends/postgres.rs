use async_trait::async_trait;
use rn_core::{normalize_domain, BiasRecord, BiasStorage, Error, Result};
use sqlx::postgres::{PgPool, PgPoolOptions, PgRow};
use sqlx::{Postgres, QueryBuilder, Row};
use std::collections::HashMap;
use std::time::Duration;
use super::{INSERT_PREFIX, SELECT_COLUMNS};
use crate::StorageBackend;

const MIGRATIONS: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS mbfc_data (
        id SERIAL PRIMARY KEY,
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

// 7 binds per row, well under the protocol's 65535 limit
const INSERT_CHUNK: usize = 1000;

pub struct PostgresStorage {
    pool: PgPool,
}

impl PostgresStorage {
    pub async fn from_pool(pool: PgPool) -> Result<Self> {
        for (i, migration) in MIGRATIONS.iter().enumerate() {
            sqlx::query(migration)
                .execute(&pool)
                .await
                .map_err(|e| Error::Storage(format!("Failed to run migration {}: {}", i, e)))?;
        }
        Ok(Self { pool })
    }
}

fn record_from_row(row: &PgRow) -> Result<BiasRecord> {
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
impl StorageBackend for PostgresStorage {
    fn name() -> &'static str {
        "postgres"
    }

    async fn connect(url: &str) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(5))
            .connect(url)
            .await
            .map_err(|e| Error::Storage(format!("Failed to connect to database: {}", e)))?;
        Self::from_pool(pool).await
    }
}

#[async_trait]
impl BiasStorage for PostgresStorage {
    async fn find_by_domain(&self, domain: &str) -> Result<Vec<BiasRecord>> {
        let rows = sqlx::query(&format!("{SELECT_COLUMNS} WHERE domain = $1 ORDER BY id"))
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
        let domains: Vec<String> = domains.iter().map(|d| normalize_domain(d)).collect();

        let rows = sqlx::query(&format!("{SELECT_COLUMNS} WHERE domain = ANY($1) ORDER BY id"))
            .bind(&domains)
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
            let mut builder: QueryBuilder<Postgres> = QueryBuilder::new(INSERT_PREFIX);
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
