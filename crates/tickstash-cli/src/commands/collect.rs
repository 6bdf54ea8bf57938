//! Run one collection for a ticker.

use std::process::ExitCode;
use std::sync::Arc;

use tickstash_core::{
    collect, BlobStore, DataSource, HttpBlobStore, NoopBlobStore, PublisherConfig,
    ReqwestHttpClient, RunOutcome, Store, Symbol, YahooAdapter,
};

use crate::cli::CollectArgs;
use crate::error::CliError;

pub async fn run(args: &CollectArgs) -> Result<ExitCode, CliError> {
    let symbol = Symbol::parse(&args.ticker)?;

    let http = Arc::new(ReqwestHttpClient::new());
    let source: Box<dyn DataSource> = if args.mock {
        Box::new(YahooAdapter::mock())
    } else {
        Box::new(YahooAdapter::new(http.clone()))
    };

    let store = Store::open_default()?;

    let config = publisher_config(args);
    let publish = !args.skip_upload && config.is_some();
    let blobs: Box<dyn BlobStore> = match config {
        Some(config) if publish => Box::new(HttpBlobStore::new(config, http)),
        _ => Box::new(NoopBlobStore),
    };

    let outcome = collect(
        source.as_ref(),
        &store,
        blobs.as_ref(),
        args.data_dir.as_path(),
        &symbol,
        publish,
    )
    .await?;

    match outcome {
        RunOutcome::NoData { ticker } => {
            eprintln!("⚠ No data found for {ticker}");
            Ok(ExitCode::SUCCESS)
        }
        RunOutcome::Collected(report) => {
            eprintln!(
                "✓ Stored {}: ${:.2} (Volume: {}) at {}",
                report.ticker, report.price, report.volume, report.observed_at
            );
            eprintln!(
                "✓ Appended session {} to {} ({} rows)",
                report.session_date,
                report.table_path.display(),
                report.table_rows
            );
            eprintln!("✓ Rendered chart {}", report.chart_path.display());
            if report.uploaded {
                eprintln!("✓ Published table and chart under stocks/");
            } else {
                eprintln!("⚠ Upload skipped ({})", upload_skip_reason(args.skip_upload));
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn upload_skip_reason(skip_requested: bool) -> &'static str {
    if skip_requested {
        "--skip-upload"
    } else {
        "no bucket configured"
    }
}

/// CLI flags take precedence over the environment; no bucket anywhere
/// means the run collects locally only.
fn publisher_config(args: &CollectArgs) -> Option<PublisherConfig> {
    if let Some(bucket) = &args.bucket {
        let endpoint = args
            .endpoint
            .clone()
            .or_else(|| std::env::var("TICKSTASH_STORAGE_ENDPOINT").ok())
            .unwrap_or_else(|| String::from("https://storage.googleapis.com"));
        return Some(PublisherConfig::new(endpoint, bucket.clone()));
    }
    PublisherConfig::from_env()
}
