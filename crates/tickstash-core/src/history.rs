//! Tabular appender: the cumulative per-ticker CSV history.
//!
//! The table is keyed implicitly by ticker through its file name
//! (`{ticker}_stock_data.csv`) and grows by exactly one row per successful
//! run. Rows are never rewritten and never deduplicated by date: a second
//! run on the same session date appends a second row for that date. The
//! read-then-rewrite sequence assumes a single writer per ticker; that is
//! the external scheduler's contract, not something enforced here.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::PipelineError;
use crate::{format_session_date, parse_session_date, HistoryRow, QuoteRecord, Symbol};
use time::Date;

/// Header row of every history table.
pub const HISTORY_HEADER: &str = "Price,Volume,Date";

/// File name of the history table for a ticker.
pub fn history_file_name(symbol: &Symbol) -> String {
    format!("{symbol}_stock_data.csv")
}

/// Append this run's row to the history table for `symbol`.
///
/// A missing file is the first run and starts a fresh table. The combined
/// table is rewritten through a temporary file and renamed into place.
/// Returns the path of the table and the full set of rows it now contains.
pub fn append(
    data_dir: &Path,
    symbol: &Symbol,
    record: &QuoteRecord,
    session_date: Date,
) -> Result<(PathBuf, Vec<HistoryRow>), PipelineError> {
    let path = data_dir.join(history_file_name(symbol));

    let mut rows = load_history(path.as_path())?;
    rows.push(HistoryRow {
        price: record.price,
        volume: record.volume,
        date: session_date,
    });

    write_history(path.as_path(), &rows)?;
    Ok((path, rows))
}

/// Read an existing history table; a missing file yields an empty table.
pub fn load_history(path: &Path) -> Result<Vec<HistoryRow>, PipelineError> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(error) if error.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(error) => {
            return Err(PipelineError::LocalIo {
                path: path.to_path_buf(),
                source: error,
            })
        }
    };

    let mut lines = contents.lines().enumerate();

    match lines.next() {
        None => return Ok(Vec::new()),
        Some((_, header)) if header.trim() == HISTORY_HEADER => {}
        Some((line, header)) => {
            return Err(PipelineError::MalformedHistory {
                path: path.to_path_buf(),
                line: line + 1,
                reason: format!("expected header '{HISTORY_HEADER}', found '{header}'"),
            })
        }
    }

    let mut rows = Vec::new();
    for (line, raw) in lines {
        if raw.trim().is_empty() {
            continue;
        }
        rows.push(parse_row(path, line + 1, raw)?);
    }

    Ok(rows)
}

fn parse_row(path: &Path, line: usize, raw: &str) -> Result<HistoryRow, PipelineError> {
    let malformed = |reason: String| PipelineError::MalformedHistory {
        path: path.to_path_buf(),
        line,
        reason,
    };

    let mut fields = raw.split(',');
    let price = fields
        .next()
        .and_then(|field| field.trim().parse::<f64>().ok())
        .ok_or_else(|| malformed(format!("invalid price in '{raw}'")))?;
    let volume = fields
        .next()
        .and_then(|field| field.trim().parse::<u64>().ok())
        .ok_or_else(|| malformed(format!("invalid volume in '{raw}'")))?;
    let date = fields
        .next()
        .ok_or_else(|| malformed(format!("missing date in '{raw}'")))
        .and_then(|field| {
            parse_session_date(field).map_err(|error| malformed(error.to_string()))
        })?;

    if fields.next().is_some() {
        return Err(malformed(format!("too many fields in '{raw}'")));
    }

    Ok(HistoryRow {
        price,
        volume,
        date,
    })
}

fn write_history(path: &Path, rows: &[HistoryRow]) -> Result<(), PipelineError> {
    let local_io = |source: std::io::Error| PipelineError::LocalIo {
        path: path.to_path_buf(),
        source,
    };

    let mut contents = String::with_capacity(rows.len() * 32 + HISTORY_HEADER.len() + 1);
    contents.push_str(HISTORY_HEADER);
    contents.push('\n');
    for row in rows {
        contents.push_str(&format!(
            "{:.2},{},{}\n",
            row.price,
            row.volume,
            format_session_date(row.date)
        ));
    }

    let temp_path = path.with_extension("csv.tmp");
    {
        let mut file = fs::File::create(temp_path.as_path()).map_err(local_io)?;
        file.write_all(contents.as_bytes()).map_err(local_io)?;
        file.flush().map_err(local_io)?;
    }
    fs::rename(temp_path.as_path(), path).map_err(local_io)?;

    Ok(())
}
