use chrono::{Duration, NaiveDate};
use pairs_lab_core::backtest::{run_backtest, BacktestConfig};
use pairs_lab_core::data::PriceStore;
use pairs_lab_core::{PairsLabError, Position};
use pretty_assertions::assert_eq;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::BTreeMap;
use std::f64::consts::PI;

// ===========================================================================
// Fixtures
// ===========================================================================

fn calendar(n: usize) -> Vec<NaiveDate> {
    let start = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
    (0..n).map(|i| start + Duration::days(i as i64)).collect()
}

fn store(columns: Vec<(&str, Vec<f64>)>) -> PriceStore {
    let n = columns[0].1.len();
    let series: BTreeMap<String, Vec<f64>> = columns
        .into_iter()
        .map(|(t, p)| (t.to_string(), p))
        .collect();
    PriceStore::new(calendar(n), series).unwrap()
}

/// series1 = 2 * series2 + 5 + sin(2πt/20), series2 a steady uptrend.
fn oscillating_pair(n: usize) -> PriceStore {
    let s2: Vec<f64> = (0..n).map(|t| 100.0 + 0.5 * t as f64).collect();
    let s1: Vec<f64> = s2
        .iter()
        .enumerate()
        .map(|(t, p)| 2.0 * p + 5.0 + (2.0 * PI * t as f64 / 20.0).sin())
        .collect();
    store(vec![("AAA", s1), ("BBB", s2)])
}

/// Cointegrated random walk pair driven by a seeded RNG.
fn random_pair(seed: u64, n: usize) -> PriceStore {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut s2 = Vec::with_capacity(n);
    let mut s1 = Vec::with_capacity(n);
    let mut level = 50.0_f64;
    let mut noise = 0.0_f64;
    for _ in 0..n {
        level = (level + rng.gen_range(-0.5..0.5)).max(5.0);
        noise = 0.8 * noise + rng.gen_range(-1.0..1.0);
        s2.push(level);
        s1.push(1.5 * level + 20.0 + noise);
    }
    store(vec![("XXX", s1), ("YYY", s2)])
}

fn tight_bands(t1: &str, t2: &str) -> BacktestConfig {
    let mut cfg = BacktestConfig::new(t1, t2);
    cfg.entry_z = 1.2;
    cfg.exit_z = 0.3;
    cfg
}

// ===========================================================================
// Scenarios
// ===========================================================================

#[test]
fn test_linear_pair_recovers_beta_and_trades() {
    let prices = oscillating_pair(300);
    let out = run_backtest(&prices, &tight_bands("AAA", "BBB")).unwrap();
    let r = &out.result;

    let beta = r.metrics.beta.unwrap();
    assert!((beta - 2.0).abs() < 0.01, "beta={}", beta);
    assert!(r.metrics.num_trades > 0);
    assert_eq!(r.metrics.num_trades, r.trades.len());
    assert_eq!(r.metrics.pair, "AAA/BBB");
    assert_eq!(r.bars.len(), 300);
}

#[test]
fn test_default_bands_too_wide_for_pure_sine() {
    // A sine over three periods never reaches |z| > 2
    let prices = oscillating_pair(300);
    let out = run_backtest(&prices, &BacktestConfig::new("AAA", "BBB")).unwrap();
    assert_eq!(out.result.metrics.num_trades, 0);
    assert!(out.result.bars.iter().all(|b| b.position == Position::Flat));
}

#[test]
fn test_insufficient_data_is_an_error() {
    let prices = oscillating_pair(69);
    let err = run_backtest(&prices, &BacktestConfig::new("AAA", "BBB")).unwrap_err();
    assert!(
        matches!(err, PairsLabError::InsufficientData(_)),
        "unexpected error: {}",
        err
    );
}

#[test]
fn test_exact_minimum_runs() {
    let prices = oscillating_pair(70);
    let out = run_backtest(&prices, &BacktestConfig::new("AAA", "BBB")).unwrap();
    assert_eq!(out.result.metrics.num_bars, 70);
}

#[test]
fn test_date_filter_applies_before_length_check() {
    let prices = oscillating_pair(300);
    let mut cfg = BacktestConfig::new("AAA", "BBB");
    cfg.start_date = Some(calendar(300)[250]);
    assert!(matches!(
        run_backtest(&prices, &cfg),
        Err(PairsLabError::InsufficientData(_))
    ));

    cfg.start_date = Some(calendar(300)[100]);
    cfg.end_date = Some(calendar(300)[199]);
    let out = run_backtest(&prices, &cfg).unwrap();
    assert_eq!(out.result.metrics.num_bars, 100);
    assert_eq!(out.result.metrics.start_date, calendar(300)[100]);
    assert_eq!(out.result.metrics.end_date, calendar(300)[199]);
}

#[test]
fn test_oversized_lookback_is_insufficient_data() {
    let prices = oscillating_pair(20);
    let cfg: BacktestConfig = serde_json::from_str(
        r#"{"ticker1":"AAA","ticker2":"BBB","lookback":18446744073709551615}"#,
    )
    .unwrap();
    assert_eq!(cfg.lookback, usize::MAX);
    assert!(matches!(
        run_backtest(&prices, &cfg),
        Err(PairsLabError::InsufficientData(_))
    ));
}

#[test]
fn test_unknown_ticker() {
    let prices = oscillating_pair(100);
    let err = run_backtest(&prices, &BacktestConfig::new("AAA", "NOPE")).unwrap_err();
    match err {
        PairsLabError::UnknownTicker(t) => assert_eq!(t, "NOPE"),
        other => panic!("unexpected error: {}", other),
    }
}

#[test]
fn test_flat_spread_never_trades() {
    let p: Vec<f64> = (0..120).map(|t| 100.0 + (t as f64 * 0.3).sin() * 4.0).collect();
    let prices = store(vec![("AAA", p.clone()), ("BBB", p)]);
    let out = run_backtest(&prices, &BacktestConfig::new("AAA", "BBB")).unwrap();
    let r = &out.result;

    assert_eq!(r.metrics.beta, Some(1.0));
    assert!(r.bars.iter().all(|b| b.zscore.is_none()));
    assert!(r.trades.is_empty());
    assert_eq!(r.metrics.cumulative_return, 0.0);
    assert_eq!(r.metrics.sharpe_ratio, None);
    assert_eq!(r.metrics.win_rate, None);
    assert_eq!(r.metrics.avg_bars_held, None);
    // All-zero returns: the drawdown formula is applied literally and gives
    // exactly zero. The flat-spread scenario text calls drawdown undefined;
    // this follows the metric definition instead.
    assert_eq!(r.metrics.max_drawdown, Some(0.0));
    assert!(!out.warnings.is_empty());
}

#[test]
fn test_constant_hedge_leg_degrades_gracefully() {
    let p1: Vec<f64> = (0..100).map(|t| 100.0 + t as f64).collect();
    let prices = store(vec![("AAA", p1), ("BBB", vec![42.0; 100])]);
    let out = run_backtest(&prices, &BacktestConfig::new("AAA", "BBB")).unwrap();
    let r = &out.result;

    assert_eq!(r.metrics.beta, None);
    assert!(r.bars.iter().all(|b| b.spread.is_none() && b.zscore.is_none()));
    assert!(r.bars.iter().all(|b| b.strategy_return == 0.0));
    assert_eq!(r.metrics.num_trades, 0);
    assert!(out.warnings.iter().any(|w| w.contains("Hedge ratio undefined")));
}

#[test]
fn test_invalid_thresholds_rejected() {
    let prices = oscillating_pair(100);
    let mut cfg = BacktestConfig::new("AAA", "BBB");
    cfg.exit_z = 2.5;
    assert!(matches!(
        run_backtest(&prices, &cfg),
        Err(PairsLabError::InvalidInput { .. })
    ));
}

// ===========================================================================
// Properties
// ===========================================================================

#[test]
fn test_bar_zero_is_flat_with_zero_return() {
    for seed in 0..5 {
        let out = run_backtest(&random_pair(seed, 250), &tight_bands("XXX", "YYY")).unwrap();
        let first = &out.result.bars[0];
        assert_eq!(first.position, Position::Flat);
        assert_eq!(first.strategy_return, 0.0);
        assert!(first.zscore.is_none());
    }
}

#[test]
fn test_trade_invariants_hold_on_random_pairs() {
    for seed in 0..10 {
        let out = run_backtest(&random_pair(seed, 400), &tight_bands("XXX", "YYY")).unwrap();
        let r = &out.result;

        for t in &r.trades {
            assert!(t.bars_held >= 1);
            assert_eq!(t.bars_held, t.exit_index - t.entry_index);
            assert_eq!(r.bars[t.entry_index].date, t.entry_date);
            assert_eq!(r.bars[t.exit_index].date, t.exit_date);
            assert_eq!(r.bars[t.exit_index].position, Position::Flat);

            // pnl is the sum of the per-bar returns it spans
            let summed: f64 = r.bars[t.entry_index..=t.exit_index]
                .iter()
                .map(|b| b.strategy_return)
                .sum();
            assert_eq!(summed, t.pnl);
        }

        // ledger is chronological and trades never overlap
        for w in r.trades.windows(2) {
            assert!(w[0].exit_index <= w[1].entry_index);
        }

        if let Some(dd) = r.metrics.max_drawdown {
            assert!(dd <= 0.0);
        }
        assert!(r.bars.iter().all(|b| b.equity > 0.0));
    }
}

#[test]
fn test_positions_only_change_on_events() {
    let out = run_backtest(&random_pair(7, 400), &tight_bands("XXX", "YYY")).unwrap();
    let r = &out.result;
    let changes = r
        .bars
        .windows(2)
        .filter(|w| w[0].position != w[1].position)
        .count();
    let open_at_end = usize::from(r.open_position.is_some());
    // each closed trade is one entry and one exit
    assert_eq!(changes, 2 * r.trades.len() + open_at_end);
}

#[test]
fn test_backtest_is_deterministic() {
    let prices = random_pair(42, 300);
    let cfg = tight_bands("XXX", "YYY");
    let a = run_backtest(&prices, &cfg).unwrap();
    let b = run_backtest(&prices, &cfg).unwrap();
    assert_eq!(a.result, b.result);
    assert_eq!(a.warnings, b.warnings);
}

#[test]
fn test_equity_matches_compounded_returns() {
    let out = run_backtest(&random_pair(3, 200), &tight_bands("XXX", "YYY")).unwrap();
    let mut equity = 1.0;
    for bar in &out.result.bars {
        equity *= 1.0 + bar.strategy_return;
        assert_eq!(bar.equity, equity);
    }
    let last = out.result.bars.last().unwrap().equity;
    assert_eq!(out.result.metrics.cumulative_return, last - 1.0);
}

#[test]
fn test_result_serialises_with_nulls_for_undefined() {
    let out = run_backtest(&oscillating_pair(100), &BacktestConfig::new("AAA", "BBB")).unwrap();
    let json = serde_json::to_value(&out).unwrap();
    assert!(json["result"]["bars"][0]["zscore"].is_null());
    assert_eq!(json["result"]["bars"][0]["position"], 0);
    assert_eq!(json["metadata"]["precision"], "ieee754_f64");
}
