//! # Tickstash Core
//!
//! Core pipeline and domain types for the Tickstash quote collector.
//!
//! ## Overview
//!
//! One collection run fetches the latest daily snapshot for a ticker,
//! persists it as an immutable record in the structured store, refreshes
//! the per-ticker CSV history and PNG price chart on local disk, and
//! publishes both artifacts to an object-store bucket.
//!
//! - **Canonical domain models** for snapshots, quote records, and history rows
//! - **Data source trait** with a Yahoo Finance adapter and a mock mode
//! - **Fixed-order pipeline** (store write before any artifact work)
//! - **Blob publisher** for the `stocks/` artifact prefix
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`chart`] | Price chart rendering (PNG) |
//! | [`domain`] | Domain models (Symbol, DailySnapshot, QuoteRecord) |
//! | [`error`] | Validation and pipeline error types |
//! | [`history`] | Cumulative per-ticker CSV history table |
//! | [`http_client`] | HTTP client abstraction |
//! | [`pipeline`] | Collection run orchestration |
//! | [`publisher`] | Object-store artifact publishing |
//! | [`record`] | Canonical record construction and price rounding |
//! | [`source`] | Data source trait and the Yahoo adapter |
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use tickstash_core::{collect, HttpBlobStore, PublisherConfig, ReqwestHttpClient, Store, Symbol, YahooAdapter};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let symbol = Symbol::parse("MSFT")?;
//!     let http = Arc::new(ReqwestHttpClient::new());
//!     let source = YahooAdapter::new(http.clone());
//!     let store = Store::open_default()?;
//!     let config = PublisherConfig::from_env().expect("TICKSTASH_BUCKET not set");
//!     let blobs = HttpBlobStore::new(config, http);
//!
//!     let outcome = collect(&source, &store, &blobs, ".".as_ref(), &symbol, true).await?;
//!     println!("{outcome:?}");
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! Every run either completes, stops cleanly on an empty dataset, or
//! aborts with a [`PipelineError`] naming the failed stage. There are no
//! in-run retries; recovery is the next scheduled run.

pub mod chart;
pub mod domain;
pub mod error;
pub mod history;
pub mod http_client;
pub mod pipeline;
pub mod publisher;
pub mod record;
pub mod source;

// Re-export commonly used types at crate root for convenience

// Domain models
pub use domain::{
    format_session_date, parse_session_date, DailySnapshot, HistoryRow, QuoteRecord, Symbol,
    UtcDateTime,
};

// Error types
pub use error::{PipelineError, ValidationError};

// History table
pub use history::{history_file_name, HISTORY_HEADER};

// Chart rendering
pub use chart::chart_file_name;

// HTTP client types
pub use http_client::{
    HttpClient, HttpError, HttpMethod, HttpRequest, HttpResponse, NoopHttpClient,
    ReqwestHttpClient,
};

// Pipeline orchestration
pub use pipeline::{collect, QuoteStore, RunOutcome, RunReport};

// Publisher
pub use publisher::{blob_key, BlobStore, HttpBlobStore, NoopBlobStore, PublisherConfig};

// Record construction
pub use record::{build_record, round_price};

// Data source trait and the Yahoo adapter
pub use source::{DataSource, SnapshotRequest, SourceError, SourceErrorKind, YahooAdapter};

// Store (re-exported from tickstash-store)
pub use tickstash_store::{Store, StoreConfig, StoreError, StoredQuote};
