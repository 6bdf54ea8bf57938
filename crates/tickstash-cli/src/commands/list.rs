//! Print every recorded quote entity.

use std::process::ExitCode;

use tickstash_core::{Store, Symbol};

use crate::cli::ListArgs;
use crate::error::CliError;

pub fn run(args: &ListArgs) -> Result<ExitCode, CliError> {
    let filter = match &args.ticker {
        Some(ticker) => Some(Symbol::parse(ticker)?),
        None => None,
    };

    let store = Store::open_default()?;
    let quotes = store.list_quotes()?;

    let mut shown = 0usize;
    for quote in &quotes {
        if let Some(symbol) = &filter {
            if quote.ticker != symbol.as_str() {
                continue;
            }
        }
        println!(
            "{} - {}: ${} (Volume: {})",
            quote.recorded_at, quote.ticker, quote.price, quote.volume
        );
        shown += 1;
    }

    if shown == 0 {
        eprintln!("⚠ No quotes recorded yet");
    }

    Ok(ExitCode::SUCCESS)
}
