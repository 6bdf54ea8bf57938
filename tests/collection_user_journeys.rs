//! Behavior-driven tests for collector user journeys
//!
//! These tests verify WHAT a user can accomplish end to end: collecting
//! with the mock provider into a real DuckDB store and reading back what
//! was recorded.

use tempfile::tempdir;
use tickstash_core::{
    collect, history_file_name, NoopBlobStore, RunOutcome, Store, StoreConfig, Symbol,
    YahooAdapter,
};

// =============================================================================
// User Journey: Collect And Read Back
// =============================================================================

#[tokio::test]
async fn user_can_collect_a_quote_and_read_it_back_from_the_store() {
    // Given: A fresh home directory and the offline provider
    let temp = tempdir().expect("tempdir");
    let symbol = Symbol::parse("MSFT").expect("valid");
    let source = YahooAdapter::mock();
    let store = Store::open(StoreConfig::with_home(temp.path())).expect("store opens");
    let data_dir = temp.path().join("data");

    // When: The user runs a collection
    let outcome = collect(&source, &store, &NoopBlobStore, &data_dir, &symbol, true)
        .await
        .expect("collection must succeed");

    // Then: The run reports a collected quote
    let report = match outcome {
        RunOutcome::Collected(report) => report,
        other => panic!("unexpected outcome: {other:?}"),
    };
    assert_eq!(report.ticker.as_str(), "MSFT");
    assert!(report.price > 0.0);

    // And: The reader sees exactly one entity with the reported values
    let quotes = store.list_quotes().expect("list");
    assert_eq!(quotes.len(), 1);
    assert_eq!(quotes[0].ticker, "MSFT");
    assert_eq!(quotes[0].price, report.price);
    assert_eq!(quotes[0].volume, report.volume);
    assert!(quotes[0].entity_key.starts_with("MSFT_"));
}

#[tokio::test]
async fn collected_quotes_survive_reopening_the_store() {
    // Given: A store that has already recorded one run
    let temp = tempdir().expect("tempdir");
    let symbol = Symbol::parse("AAPL").expect("valid");
    let source = YahooAdapter::mock();
    let data_dir = temp.path().join("data");

    {
        let store = Store::open(StoreConfig::with_home(temp.path())).expect("store opens");
        collect(&source, &store, &NoopBlobStore, &data_dir, &symbol, true)
            .await
            .expect("collection must succeed");
    }

    // When: The user reopens the same home directory later
    let store = Store::open(StoreConfig::with_home(temp.path())).expect("store reopens");

    // Then: The recorded entity is still there
    let quotes = store.list_quotes().expect("list");
    assert_eq!(quotes.len(), 1);
    assert_eq!(quotes[0].ticker, "AAPL");
}

#[tokio::test]
async fn each_run_creates_a_new_entity_and_a_new_table_row() {
    // Given: A user scheduling repeated collections for one ticker
    let temp = tempdir().expect("tempdir");
    let symbol = Symbol::parse("GOOG").expect("valid");
    let source = YahooAdapter::mock();
    let store = Store::open(StoreConfig::with_home(temp.path())).expect("store opens");
    let data_dir = temp.path().join("data");

    // When: Three runs execute
    for _ in 0..3 {
        collect(&source, &store, &NoopBlobStore, &data_dir, &symbol, true)
            .await
            .expect("collection must succeed");
    }

    // Then: The store holds three entities (write-once, never updated)
    let quotes = store.list_quotes().expect("list");
    assert_eq!(quotes.len(), 3);

    // And: The table accumulated three rows plus the header
    let contents = std::fs::read_to_string(data_dir.join(history_file_name(&symbol)))
        .expect("table must exist");
    assert_eq!(contents.lines().count(), 4);
    assert!(contents.starts_with("Price,Volume,Date\n"));
}
