//! Chart renderer: a PNG line chart of closing price over session date.
//!
//! The chart is rendered from the full persisted history, not just the
//! current run's snapshot, so the published artifact stays consistent with
//! the published table.

use std::path::{Path, PathBuf};

use plotters::prelude::*;
use time::Date;

use crate::error::PipelineError;
use crate::{format_session_date, HistoryRow, Symbol};

const CHART_WIDTH: u32 = 1000;
const CHART_HEIGHT: u32 = 500;

/// File name of the chart artifact for a ticker.
pub fn chart_file_name(symbol: &Symbol) -> String {
    format!("{symbol}_stock_plot.png")
}

/// Render the history as a line chart and save it under `data_dir`.
///
/// The x-axis is bounded to the actual data range so a short history does
/// not get stretched over a misleading time span.
pub fn render(
    data_dir: &Path,
    symbol: &Symbol,
    rows: &[HistoryRow],
) -> Result<PathBuf, PipelineError> {
    let path = data_dir.join(chart_file_name(symbol));

    if rows.is_empty() {
        return Err(PipelineError::ChartRender {
            path,
            reason: String::from("history has no rows to plot"),
        });
    }

    let (x_range, y_range) = axis_ranges(rows);

    draw(path.as_path(), symbol, rows, x_range, y_range).map_err(|reason| {
        PipelineError::ChartRender {
            path: path.clone(),
            reason,
        }
    })?;

    Ok(path)
}

/// Dates are plotted on a julian-day axis and labeled back as `YYYY-MM-DD`.
fn axis_ranges(rows: &[HistoryRow]) -> (std::ops::Range<i32>, std::ops::Range<f64>) {
    let mut x_min = i32::MAX;
    let mut x_max = i32::MIN;
    let mut y_min = f64::INFINITY;
    let mut y_max = f64::NEG_INFINITY;

    for row in rows {
        let day = row.date.to_julian_day();
        x_min = x_min.min(day);
        x_max = x_max.max(day);
        y_min = y_min.min(row.price);
        y_max = y_max.max(row.price);
    }

    // plotters needs non-degenerate ranges; a single-point series gets a
    // one-day / one-unit window around its value.
    if x_min == x_max {
        x_max += 1;
    }
    if y_min == y_max {
        y_min -= 1.0;
        y_max += 1.0;
    } else {
        let pad = (y_max - y_min) * 0.05;
        y_min -= pad;
        y_max += pad;
    }

    (x_min..x_max, y_min..y_max)
}

fn draw(
    path: &Path,
    symbol: &Symbol,
    rows: &[HistoryRow],
    x_range: std::ops::Range<i32>,
    y_range: std::ops::Range<f64>,
) -> Result<(), String> {
    let root = BitMapBackend::new(path, (CHART_WIDTH, CHART_HEIGHT)).into_drawing_area();
    root.fill(&WHITE).map_err(|e| e.to_string())?;

    let mut chart = ChartBuilder::on(&root)
        .caption(format!("{symbol} Stock Price"), ("sans-serif", 28))
        .margin(10)
        .x_label_area_size(45)
        .y_label_area_size(65)
        .build_cartesian_2d(x_range, y_range)
        .map_err(|e| e.to_string())?;

    chart
        .configure_mesh()
        .x_desc("Date")
        .y_desc("Price")
        .x_label_formatter(&|day| {
            Date::from_julian_day(*day)
                .map(format_session_date)
                .unwrap_or_default()
        })
        .draw()
        .map_err(|e| e.to_string())?;

    chart
        .draw_series(LineSeries::new(
            rows.iter()
                .map(|row| (row.date.to_julian_day(), row.price)),
            BLUE.stroke_width(2),
        ))
        .map_err(|e| e.to_string())?
        .label("Closing Price")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], BLUE.stroke_width(2)));

    chart
        .configure_series_labels()
        .border_style(BLACK)
        .background_style(WHITE.mix(0.8))
        .draw()
        .map_err(|e| e.to_string())?;

    root.present().map_err(|e| e.to_string())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;
    use time::macros::date;

    fn row(price: f64, date: Date) -> HistoryRow {
        HistoryRow {
            price,
            volume: 1_000,
            date,
        }
    }

    #[test]
    fn renders_multi_day_history_to_png() {
        let temp = tempdir().expect("tempdir");
        let symbol = Symbol::parse("MSFT").expect("valid symbol");
        let rows = vec![
            row(425.33, date!(2024 - 06 - 03)),
            row(427.87, date!(2024 - 06 - 04)),
            row(423.85, date!(2024 - 06 - 05)),
        ];

        let path = render(temp.path(), &symbol, &rows).expect("render");

        assert_eq!(
            path.file_name().and_then(|name| name.to_str()),
            Some("MSFT_stock_plot.png")
        );
        let metadata = std::fs::metadata(path).expect("artifact must exist");
        assert!(metadata.len() > 0);
    }

    #[test]
    fn renders_single_point_history() {
        let temp = tempdir().expect("tempdir");
        let symbol = Symbol::parse("MSFT").expect("valid symbol");
        let rows = vec![row(425.33, date!(2024 - 06 - 03))];

        let path = render(temp.path(), &symbol, &rows).expect("render");
        assert!(path.exists());
    }

    #[test]
    fn empty_history_is_an_error() {
        let temp = tempdir().expect("tempdir");
        let symbol = Symbol::parse("MSFT").expect("valid symbol");

        let error = render(temp.path(), &symbol, &[]).expect_err("must fail");
        assert!(matches!(error, PipelineError::ChartRender { .. }));
    }

    #[test]
    fn degenerate_ranges_are_widened() {
        let rows = vec![row(425.33, date!(2024 - 06 - 03))];
        let (x_range, y_range) = axis_ranges(&rows);
        assert!(x_range.start < x_range.end);
        assert!(y_range.start < y_range.end);
    }
}
