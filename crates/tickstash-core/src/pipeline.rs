//! Collection pipeline: one run fetches a snapshot, persists it, refreshes
//! the local artifacts and publishes them.
//!
//! The structured-store write happens before any artifact work, so a run
//! that fails on local disk or upload has already recorded its quote. A
//! failed upload leaves the local artifacts and store entity in place; the
//! next successful run re-publishes the full state.

use std::fs;
use std::path::{Path, PathBuf};

use tickstash_store::{Store, StoreError};

use crate::chart;
use crate::error::PipelineError;
use crate::history::{self, history_file_name};
use crate::publisher::{blob_key, BlobStore};
use crate::record::build_record;
use crate::source::{DataSource, SnapshotRequest};
use crate::{format_session_date, QuoteRecord, Symbol};

/// Persistence contract for the canonical quote record.
///
/// The pipeline depends on this trait rather than on the DuckDB-backed
/// [`Store`] directly, so tests can observe writes and inject failures.
pub trait QuoteStore: Send + Sync {
    fn insert(&self, record: &QuoteRecord) -> Result<(), StoreError>;
}

impl QuoteStore for Store {
    fn insert(&self, record: &QuoteRecord) -> Result<(), StoreError> {
        self.insert_quote(
            record.ticker.as_str(),
            record.price,
            record.volume,
            &record.observed_at.format_rfc3339(),
        )
    }
}

/// What a completed run produced. Rendered by the CLI as status lines.
#[derive(Debug, Clone, PartialEq)]
pub struct RunReport {
    pub ticker: Symbol,
    pub price: f64,
    pub volume: u64,
    pub observed_at: String,
    pub session_date: String,
    pub table_path: PathBuf,
    pub chart_path: PathBuf,
    /// Total rows in the history table after this run's append.
    pub table_rows: usize,
    pub uploaded: bool,
}

/// Outcome of a collection run.
///
/// An empty provider dataset is a recognized outcome rather than an error;
/// the run stops before writing anything and exits cleanly.
#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome {
    Collected(RunReport),
    NoData { ticker: Symbol },
}

/// Execute one collection run for `symbol`.
///
/// Order is fixed: fetch, persist to the store, append the table, render
/// the chart, upload. Set `publish` to false to stop after the local
/// artifacts (upload-disabled runs still collect).
pub async fn collect(
    source: &dyn DataSource,
    store: &dyn QuoteStore,
    blobs: &dyn BlobStore,
    data_dir: &Path,
    symbol: &Symbol,
    publish: bool,
) -> Result<RunOutcome, PipelineError> {
    let snapshot = source
        .daily_snapshot(SnapshotRequest::new(symbol.clone()))
        .await?;

    let Some(snapshot) = snapshot else {
        return Ok(RunOutcome::NoData {
            ticker: symbol.clone(),
        });
    };

    let record = build_record(&snapshot);
    store.insert(&record)?;

    fs::create_dir_all(data_dir).map_err(|source| PipelineError::LocalIo {
        path: data_dir.to_path_buf(),
        source,
    })?;

    let (table_path, rows) = history::append(data_dir, symbol, &record, snapshot.session_date)?;
    let chart_path = chart::render(data_dir, symbol, &rows)?;

    let mut uploaded = false;
    if publish {
        upload_file(blobs, &table_path, &blob_key(&history_file_name(symbol)), "text/csv").await?;
        upload_file(
            blobs,
            &chart_path,
            &blob_key(&chart::chart_file_name(symbol)),
            "image/png",
        )
        .await?;
        uploaded = true;
    }

    Ok(RunOutcome::Collected(RunReport {
        ticker: symbol.clone(),
        price: record.price,
        volume: record.volume,
        observed_at: record.observed_at.format_rfc3339(),
        session_date: format_session_date(snapshot.session_date),
        table_path,
        chart_path,
        table_rows: rows.len(),
        uploaded,
    }))
}

async fn upload_file(
    blobs: &dyn BlobStore,
    path: &Path,
    key: &str,
    content_type: &str,
) -> Result<(), PipelineError> {
    let bytes = fs::read(path).map_err(|source| PipelineError::LocalIo {
        path: path.to_path_buf(),
        source,
    })?;
    blobs.put(key, bytes, content_type).await
}
