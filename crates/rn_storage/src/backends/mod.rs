pub mod memory;

#[cfg(feature = "postgres")]
pub mod postgres;

#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use memory::InMemoryStorage;

#[cfg(feature = "postgres")]
pub use postgres::PostgresStorage;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteStorage;

#[cfg(any(feature = "postgres", feature = "sqlite"))]
pub(crate) const SELECT_COLUMNS: &str = "SELECT COALESCE(name, '') AS name, COALESCE(mbfc_url, '') AS mbfc_url, \
     COALESCE(domain, '') AS domain, COALESCE(bias, '') AS bias, \
     COALESCE(factual_reporting, '') AS factual_reporting, COALESCE(country, '') AS country, \
     COALESCE(credibility, '') AS credibility FROM mbfc_data";

#[cfg(any(feature = "postgres", feature = "sqlite"))]
pub(crate) const INSERT_PREFIX: &str =
    "INSERT INTO mbfc_data (name, mbfc_url, domain, bias, factual_reporting, country, credibility) ";
