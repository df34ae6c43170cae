use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::types::Price;
use crate::{PairsLabError, PairsLabResult};

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Read-only, date-aligned price history for a universe of tickers.
///
/// Every column shares one strictly ascending calendar. The store is built
/// once (usually at process start) and only ever borrowed by the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "PriceStoreData", into = "PriceStoreData")]
pub struct PriceStore {
    dates: Vec<NaiveDate>,
    series: BTreeMap<String, Vec<Price>>,
}

/// Wire form of [`PriceStore`], validated on the way in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceStoreData {
    pub dates: Vec<NaiveDate>,
    pub series: BTreeMap<String, Vec<Price>>,
}

/// Two price columns cut to a common date range.
#[derive(Debug, Clone, PartialEq)]
pub struct PairWindow {
    pub dates: Vec<NaiveDate>,
    pub price1: Vec<Price>,
    pub price2: Vec<Price>,
}

impl PairWindow {
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Construction
// ---------------------------------------------------------------------------

impl PriceStore {
    pub fn new(
        dates: Vec<NaiveDate>,
        series: BTreeMap<String, Vec<Price>>,
    ) -> PairsLabResult<Self> {
        if let Some(pos) = dates.windows(2).position(|w| w[0] >= w[1]) {
            return Err(PairsLabError::InvalidInput {
                field: "dates".into(),
                reason: format!(
                    "Dates must be strictly ascending; {} is followed by {}",
                    dates[pos],
                    dates[pos + 1]
                ),
            });
        }

        for (ticker, prices) in &series {
            if ticker.trim().is_empty() {
                return Err(PairsLabError::InvalidInput {
                    field: "series".into(),
                    reason: "Ticker symbols must be non-empty".into(),
                });
            }
            if prices.len() != dates.len() {
                return Err(PairsLabError::InvalidInput {
                    field: format!("series.{}", ticker),
                    reason: format!(
                        "{} has {} prices but the calendar has {} dates — must be equal",
                        ticker,
                        prices.len(),
                        dates.len()
                    ),
                });
            }
            if let Some(i) = prices.iter().position(|p| !p.is_finite()) {
                return Err(PairsLabError::InvalidInput {
                    field: format!("series.{}", ticker),
                    reason: format!("Non-finite price on {}", dates[i]),
                });
            }
        }

        Ok(PriceStore { dates, series })
    }
}

impl TryFrom<PriceStoreData> for PriceStore {
    type Error = PairsLabError;

    fn try_from(data: PriceStoreData) -> Result<Self, Self::Error> {
        PriceStore::new(data.dates, data.series)
    }
}

impl From<PriceStore> for PriceStoreData {
    fn from(store: PriceStore) -> Self {
        PriceStoreData {
            dates: store.dates,
            series: store.series,
        }
    }
}

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

impl PriceStore {
    /// Number of dates in the shared calendar.
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.dates.first().copied()
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.dates.last().copied()
    }

    /// Ticker symbols in lexical order.
    pub fn tickers(&self) -> Vec<String> {
        self.series.keys().cloned().collect()
    }

    pub fn contains(&self, ticker: &str) -> bool {
        self.series.contains_key(ticker)
    }

    pub fn series(&self, ticker: &str) -> PairsLabResult<&[Price]> {
        self.series
            .get(ticker)
            .map(Vec::as_slice)
            .ok_or_else(|| PairsLabError::UnknownTicker(ticker.to_string()))
    }

    /// Aligned prices of two tickers between optional inclusive bounds.
    pub fn pair_window(
        &self,
        ticker1: &str,
        ticker2: &str,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> PairsLabResult<PairWindow> {
        let s1 = self.series(ticker1)?;
        let s2 = self.series(ticker2)?;

        if let (Some(s), Some(e)) = (start, end) {
            if s > e {
                return Err(PairsLabError::DateError(format!(
                    "Start date {} is after end date {}",
                    s, e
                )));
            }
        }

        let lo = start.map_or(0, |s| self.dates.partition_point(|d| *d < s));
        let hi = end.map_or(self.dates.len(), |e| self.dates.partition_point(|d| *d <= e));
        let hi = hi.max(lo);

        Ok(PairWindow {
            dates: self.dates[lo..hi].to_vec(),
            price1: s1[lo..hi].to_vec(),
            price2: s2[lo..hi].to_vec(),
        })
    }
}
