use chrono::NaiveDate;
use log::{debug, warn};
use pairs_lab_core::data::PriceStore;
use std::collections::BTreeMap;

use super::file::resolve_path;

/// Load a wide price table: first column dates, one column per ticker.
///
/// Gaps are forward-filled, then back-filled; a ticker with no prices at
/// all is dropped.
pub fn load_price_csv(path: &str) -> Result<PriceStore, Box<dyn std::error::Error>> {
    let canonical = resolve_path(path)?;
    let mut rdr = csv::Reader::from_path(&canonical)
        .map_err(|e| format!("Failed to read '{}': {}", canonical.display(), e))?;

    let headers = rdr.headers()?.clone();
    if headers.len() < 2 {
        return Err(format!(
            "'{}' must have a date column and at least one ticker column",
            canonical.display()
        )
        .into());
    }
    let tickers: Vec<String> = headers.iter().skip(1).map(|h| h.trim().to_string()).collect();

    let mut dates: Vec<NaiveDate> = Vec::new();
    let mut columns: Vec<Vec<Option<f64>>> = vec![Vec::new(); tickers.len()];

    for (i, record) in rdr.records().enumerate() {
        let record = record?;
        let row = i + 1;
        let raw_date = record.get(0).unwrap_or_default().trim();
        let date = parse_date(raw_date).ok_or_else(|| {
            format!("Row {}: cannot parse date '{}'", row, raw_date)
        })?;
        dates.push(date);

        for (j, column) in columns.iter_mut().enumerate() {
            let cell = record.get(j + 1).map(str::trim).unwrap_or_default();
            let value = if cell.is_empty() {
                None
            } else {
                let v: f64 = cell.parse().map_err(|_| {
                    format!("Row {}: cannot parse price '{}' for {}", row, cell, tickers[j])
                })?;
                v.is_finite().then_some(v)
            };
            column.push(value);
        }
    }

    let mut series = BTreeMap::new();
    for (ticker, column) in tickers.into_iter().zip(columns) {
        match fill_gaps(&column) {
            Some(filled) => {
                series.insert(ticker, filled);
            }
            None => warn!("dropping {}: no prices in '{}'", ticker, canonical.display()),
        }
    }
    debug!(
        "loaded {} tickers x {} dates from '{}'",
        series.len(),
        dates.len(),
        canonical.display()
    );

    Ok(PriceStore::new(dates, series)?)
}

/// Accepts `YYYY-MM-DD` optionally followed by a time component.
fn parse_date(raw: &str) -> Option<NaiveDate> {
    let day = raw.get(..10).unwrap_or(raw);
    NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
}

/// Forward-fill then back-fill; `None` when the column is entirely empty.
fn fill_gaps(column: &[Option<f64>]) -> Option<Vec<f64>> {
    let first = column.iter().flatten().next().copied()?;
    let mut last = first;
    Some(
        column
            .iter()
            .map(|v| {
                if let Some(v) = v {
                    last = *v;
                }
                last
            })
            .collect(),
    )
}
