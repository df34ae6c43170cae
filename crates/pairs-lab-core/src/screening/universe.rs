use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::data::PriceStore;

pub const UNIVERSE_NAME: &str = "US Large Cap (Demo)";

/// What the loaded price store covers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UniverseSummary {
    pub universe_name: String,
    pub num_tickers: usize,
    pub tickers: Vec<String>,
    pub first_date: Option<NaiveDate>,
    pub last_date: Option<NaiveDate>,
}

pub fn universe_summary(prices: &PriceStore) -> UniverseSummary {
    let tickers = prices.tickers();
    UniverseSummary {
        universe_name: UNIVERSE_NAME.to_string(),
        num_tickers: tickers.len(),
        tickers,
        first_date: prices.first_date(),
        last_date: prices.last_date(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn test_summary() {
        let d1 = NaiveDate::from_ymd_opt(2020, 1, 2).unwrap();
        let d2 = NaiveDate::from_ymd_opt(2020, 1, 3).unwrap();
        let mut series = BTreeMap::new();
        series.insert("MSFT".to_string(), vec![1.0, 2.0]);
        series.insert("AAPL".to_string(), vec![3.0, 4.0]);
        let store = PriceStore::new(vec![d1, d2], series).unwrap();

        let s = universe_summary(&store);
        assert_eq!(s.num_tickers, 2);
        assert_eq!(s.tickers, vec!["AAPL".to_string(), "MSFT".to_string()]);
        assert_eq!(s.last_date, Some(d2));
    }

    #[test]
    fn test_empty_store() {
        let store = PriceStore::new(vec![], BTreeMap::new()).unwrap();
        let s = universe_summary(&store);
        assert_eq!(s.num_tickers, 0);
        assert_eq!(s.last_date, None);
    }
}
