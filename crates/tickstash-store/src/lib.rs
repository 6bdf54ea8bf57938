//! # Tickstash Store
//!
//! DuckDB-backed structured store for collected quote records.
//!
//! Each run of the collector persists exactly one [`stock_data`] entity per
//! ticker. Entities are write-once: the key is composed from the ticker and
//! the RFC3339 observation timestamp, so a new entity is created on every
//! insert and nothing is ever updated in place.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use tickstash_store::{Store, StoreConfig};
//!
//! fn main() -> Result<(), tickstash_store::StoreError> {
//!     let store = Store::open(StoreConfig::default())?;
//!     store.insert_quote("MSFT", 425.33, 18_345_213, "2024-06-03T20:05:11Z")?;
//!
//!     for quote in store.list_quotes()? {
//!         println!("{} - {}: ${}", quote.recorded_at, quote.ticker, quote.price);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Security
//!
//! All user-provided values are passed through parameterized queries, never
//! interpolated into SQL.

pub mod migrations;

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use ::duckdb::{Connection, ToSql};
use serde::Serialize;
use thiserror::Error;

/// Errors that can occur during store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// `DuckDB` database error.
    #[error(transparent)]
    DuckDb(#[from] ::duckdb::Error),

    /// I/O error (file system operations).
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Configuration for the structured store.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Root directory for tickstash data.
    pub tickstash_home: PathBuf,
    /// Path to the `DuckDB` database file.
    pub db_path: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        let tickstash_home = resolve_tickstash_home();
        let db_path = tickstash_home.join("cache").join("tickstash.duckdb");
        Self {
            tickstash_home,
            db_path,
        }
    }
}

impl StoreConfig {
    /// Build a configuration rooted at an explicit home directory.
    pub fn with_home(home: impl Into<PathBuf>) -> Self {
        let tickstash_home = home.into();
        let db_path = tickstash_home.join("cache").join("tickstash.duckdb");
        Self {
            tickstash_home,
            db_path,
        }
    }
}

/// One stored quote entity, as returned by the diagnostic reader.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoredQuote {
    /// Composed entity key (`{ticker}_{rfc3339}`).
    pub entity_key: String,
    /// Ticker symbol.
    pub ticker: String,
    /// Closing price, already rounded to 2 fractional digits.
    pub price: f64,
    /// Traded volume.
    pub volume: u64,
    /// Observation timestamp as stored.
    pub recorded_at: String,
}

/// The structured store for quote record entities.
///
/// The underlying `DuckDB` connection is not `Sync`, so it sits behind a
/// mutex; callers share the store by reference.
pub struct Store {
    config: StoreConfig,
    connection: Mutex<Connection>,
}

impl Store {
    /// Open a store with default configuration.
    pub fn open_default() -> Result<Self, StoreError> {
        Self::open(StoreConfig::default())
    }

    /// Open (creating and migrating if needed) the store at the configured path.
    pub fn open(config: StoreConfig) -> Result<Self, StoreError> {
        if let Some(parent) = config.db_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let connection = Connection::open(config.db_path.as_path())?;
        migrations::apply_migrations(&connection)?;
        Ok(Self {
            config,
            connection: Mutex::new(connection),
        })
    }

    /// Get the path to the database file.
    pub fn db_path(&self) -> &Path {
        self.config.db_path.as_path()
    }

    /// Persist one quote record as a new entity.
    ///
    /// The entity key is composed as `{ticker}_{recorded_at}`, so every call
    /// creates a new row; repeated observations are kept, never merged.
    ///
    /// # Security
    /// All values are passed as query parameters, not interpolated.
    ///
    /// # Panics
    /// Panics if the connection mutex is poisoned (indicating a previous
    /// panic while holding the lock).
    pub fn insert_quote(
        &self,
        ticker: &str,
        price: f64,
        volume: u64,
        recorded_at: &str,
    ) -> Result<(), StoreError> {
        let entity_key = format!("{ticker}_{recorded_at}");
        let params: [&dyn ToSql; 5] = [&entity_key, &ticker, &price, &volume, &recorded_at];
        let connection = self
            .connection
            .lock()
            .expect("duckdb connection mutex poisoned");
        connection.execute(
            "INSERT INTO stock_data (entity_key, ticker, price, volume, recorded_at) \
             VALUES (?, ?, ?, ?, TRY_CAST(? AS TIMESTAMP))",
            params.as_slice(),
        )?;
        Ok(())
    }

    /// Return every stored entity in store-default order.
    ///
    /// Diagnostic path only: no filtering, no pagination, no ordering
    /// guarantee beyond what `DuckDB` happens to return.
    ///
    /// # Panics
    /// Panics if the connection mutex is poisoned.
    pub fn list_quotes(&self) -> Result<Vec<StoredQuote>, StoreError> {
        let connection = self
            .connection
            .lock()
            .expect("duckdb connection mutex poisoned");
        let mut statement = connection.prepare(
            "SELECT entity_key, ticker, price, volume, \
             STRFTIME(recorded_at, '%Y-%m-%dT%H:%M:%SZ') \
             FROM stock_data",
        )?;

        let rows = statement.query_map([], |row| {
            Ok(StoredQuote {
                entity_key: row.get(0)?,
                ticker: row.get(1)?,
                price: row.get(2)?,
                volume: row.get::<_, i64>(3)?.max(0) as u64,
                recorded_at: row.get(4)?,
            })
        })?;

        let mut quotes = Vec::new();
        for quote in rows {
            quotes.push(quote?);
        }
        Ok(quotes)
    }
}

/// Resolve the tickstash home directory from environment or default.
fn resolve_tickstash_home() -> PathBuf {
    if let Some(path) = env::var_os("TICKSTASH_HOME") {
        let path = PathBuf::from(path);
        if !path.as_os_str().is_empty() {
            return path;
        }
    }

    if let Some(home) = env::var_os("HOME") {
        return PathBuf::from(home).join(".tickstash");
    }

    PathBuf::from(".tickstash")
}
