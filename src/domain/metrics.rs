//! Performance metrics over a trade ledger.
//!
//! Every statistic has an explicit zero guard, so an empty ledger or a
//! zero-variance return set produces zeros rather than NaN or infinity.

use super::position::Trade;
use super::regime::{RegimeKind, RegimeLabels};
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Metrics {
    pub total_return: f64,
    pub average_trade_return: f64,
    pub win_rate: f64,
    pub sharpe_ratio: f64,
    pub max_drawdown: f64,
    pub accuracy: f64,
    pub trade_count: usize,
}

impl Metrics {
    pub fn compute(ledger: &[Trade], labels: &RegimeLabels) -> Self {
        if ledger.is_empty() {
            return Metrics::default();
        }

        let returns: Vec<f64> = ledger.iter().map(|t| t.pnl).collect();
        let n = returns.len() as f64;

        let total_return = returns.iter().map(|r| 1.0 + r).product::<f64>() - 1.0;
        let average_trade_return = returns.iter().sum::<f64>() / n;
        let wins = returns.iter().filter(|&&r| r > 0.0).count();
        let win_rate = wins as f64 / n;

        Metrics {
            total_return,
            average_trade_return,
            win_rate,
            sharpe_ratio: compute_sharpe(&returns),
            max_drawdown: compute_drawdown(&equity_curve(ledger)),
            accuracy: compute_accuracy(ledger, labels),
            trade_count: ledger.len(),
        }
    }
}

/// Cumulative compounded return curve, one point per trade: `C_k = prod(1 + pnl_i), i <= k`.
pub fn equity_curve(ledger: &[Trade]) -> Vec<f64> {
    ledger
        .iter()
        .scan(1.0_f64, |acc, t| {
            *acc *= 1.0 + t.pnl;
            Some(*acc)
        })
        .collect()
}

/// Minimum of `C_k / max(C_0..C_k) - 1`. Always <= 0; the peak starts at `C_0`.
pub fn compute_drawdown(curve: &[f64]) -> f64 {
    let Some(&first) = curve.first() else {
        return 0.0;
    };

    let mut peak = first;
    let mut max_dd = 0.0_f64;

    for &value in curve {
        if value > peak {
            peak = value;
        }
        let dd = value / peak - 1.0;
        if dd < max_dd {
            max_dd = dd;
        }
    }

    max_dd
}

/// `mean / sample_stddev * sqrt(n)`; zero for fewer than two trades or zero variance.
fn compute_sharpe(returns: &[f64]) -> f64 {
    if returns.len() < 2 {
        return 0.0;
    }
    // Identical returns can leave a rounding-sized stddev after `sum / n`.
    if returns.iter().all(|&r| r == returns[0]) {
        return 0.0;
    }

    let n = returns.len() as f64;
    let mean = returns.iter().sum::<f64>() / n;
    let variance = returns.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / (n - 1.0);
    let stddev = variance.sqrt();

    if stddev == 0.0 || !stddev.is_finite() {
        return 0.0;
    }

    mean / stddev * n.sqrt()
}

/// Share of bull/bear trades whose price moved the way the regime implied.
fn compute_accuracy(ledger: &[Trade], labels: &RegimeLabels) -> f64 {
    let mut considered = 0usize;
    let mut correct = 0usize;

    for trade in ledger {
        let hit = match labels.classify(trade.regime) {
            RegimeKind::Bull => trade.exit_price > trade.entry_price,
            RegimeKind::Bear => trade.exit_price < trade.entry_price,
            RegimeKind::Neutral => continue,
        };
        considered += 1;
        if hit {
            correct += 1;
        }
    }

    if considered == 0 {
        0.0
    } else {
        correct as f64 / considered as f64
    }
}

/// Per-regime breakdown of the ledger, keyed by the entry regime label.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegimeResult {
    pub regime: i64,
    pub trade_count: usize,
    pub total_return: f64,
    pub win_rate: f64,
    pub average_trade_return: f64,
}

impl RegimeResult {
    pub fn compute_per_regime(ledger: &[Trade]) -> Vec<RegimeResult> {
        let mut by_regime: BTreeMap<i64, Vec<f64>> = BTreeMap::new();
        for trade in ledger {
            by_regime.entry(trade.regime).or_default().push(trade.pnl);
        }

        by_regime
            .into_iter()
            .map(|(regime, returns)| {
                let n = returns.len() as f64;
                RegimeResult {
                    regime,
                    trade_count: returns.len(),
                    total_return: returns.iter().map(|r| 1.0 + r).product::<f64>() - 1.0,
                    win_rate: returns.iter().filter(|&&r| r > 0.0).count() as f64 / n,
                    average_trade_return: returns.iter().sum::<f64>() / n,
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::position::Direction;
    use approx::assert_relative_eq;
    use chrono::NaiveDate;

    fn make_trade(direction: Direction, entry: f64, exit: f64, regime: i64) -> Trade {
        let entry_date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        Trade {
            entry_date,
            exit_date: entry_date + chrono::Duration::days(3),
            entry_index: 0,
            exit_index: 3,
            direction,
            entry_price: entry,
            exit_price: exit,
            pnl: direction.pnl(entry, exit),
            regime,
        }
    }

    fn long(entry: f64, exit: f64) -> Trade {
        make_trade(Direction::Long, entry, exit, 0)
    }

    #[test]
    fn empty_ledger_is_all_zero() {
        let m = Metrics::compute(&[], &RegimeLabels::default());
        assert_eq!(m, Metrics::default());
        assert_eq!(m.trade_count, 0);
        assert_eq!(m.sharpe_ratio, 0.0);
        assert!(!m.max_drawdown.is_nan());
    }

    #[test]
    fn total_return_compounds() {
        let ledger = vec![long(100.0, 110.0), long(100.0, 90.0)];
        let m = Metrics::compute(&ledger, &RegimeLabels::default());
        assert_relative_eq!(m.total_return, 1.1 * 0.9 - 1.0, epsilon = 1e-12);
        assert_relative_eq!(m.average_trade_return, 0.0, epsilon = 1e-12);
        assert_eq!(m.trade_count, 2);
    }

    #[test]
    fn win_rate_all_winners() {
        let ledger = vec![long(100.0, 110.0), long(100.0, 105.0)];
        let m = Metrics::compute(&ledger, &RegimeLabels::default());
        assert_relative_eq!(m.win_rate, 1.0);
    }

    #[test]
    fn win_rate_half() {
        let ledger = vec![long(100.0, 110.0), long(100.0, 95.0)];
        let m = Metrics::compute(&ledger, &RegimeLabels::default());
        assert_relative_eq!(m.win_rate, 0.5);
    }

    #[test]
    fn breakeven_is_not_a_win() {
        let ledger = vec![long(100.0, 100.0), long(100.0, 110.0)];
        let m = Metrics::compute(&ledger, &RegimeLabels::default());
        assert_relative_eq!(m.win_rate, 0.5);
    }

    #[test]
    fn sharpe_uses_sample_stddev() {
        let ledger = vec![long(100.0, 110.0), long(100.0, 95.0), long(100.0, 102.0)];
        let returns = [0.10, -0.05, 0.02];
        let mean = returns.iter().sum::<f64>() / 3.0;
        let var = returns.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / 2.0;
        let expected = mean / var.sqrt() * 3.0_f64.sqrt();

        let m = Metrics::compute(&ledger, &RegimeLabels::default());
        assert_relative_eq!(m.sharpe_ratio, expected, epsilon = 1e-9);
    }

    #[test]
    fn sharpe_zero_for_single_trade() {
        let m = Metrics::compute(&[long(100.0, 110.0)], &RegimeLabels::default());
        assert_eq!(m.sharpe_ratio, 0.0);
    }

    #[test]
    fn sharpe_zero_for_identical_returns() {
        let ledger = vec![long(100.0, 110.0), long(100.0, 110.0)];
        let m = Metrics::compute(&ledger, &RegimeLabels::default());
        assert_eq!(m.sharpe_ratio, 0.0);
        assert!(m.sharpe_ratio.is_finite());
    }

    #[test]
    fn sharpe_zero_for_three_identical_returns() {
        // 0.3 / 3 rounds away from 0.1, so the sample stddev is not exactly zero.
        let ledger = vec![long(100.0, 110.0); 3];
        let m = Metrics::compute(&ledger, &RegimeLabels::default());
        assert_eq!(m.sharpe_ratio, 0.0);
    }

    #[test]
    fn sharpe_zero_for_repeated_inexact_return() {
        for n in 2..=12 {
            let ledger = vec![long(3.0, 4.0); n];
            let m = Metrics::compute(&ledger, &RegimeLabels::default());
            assert_eq!(m.sharpe_ratio, 0.0, "n = {n}");
        }
    }

    #[test]
    fn drawdown_from_running_peak() {
        let curve = vec![1.1, 1.21, 0.968, 1.0648];
        let dd = compute_drawdown(&curve);
        assert_relative_eq!(dd, 0.968 / 1.21 - 1.0, epsilon = 1e-12);
    }

    #[test]
    fn drawdown_zero_for_rising_curve() {
        assert_eq!(compute_drawdown(&[1.0, 1.05, 1.05, 1.2]), 0.0);
        assert_eq!(compute_drawdown(&[]), 0.0);
    }

    #[test]
    fn drawdown_peak_starts_at_first_trade() {
        // A single losing trade is its own peak.
        let m = Metrics::compute(&[long(100.0, 90.0)], &RegimeLabels::default());
        assert_eq!(m.max_drawdown, 0.0);

        let ledger = vec![long(100.0, 90.0), long(100.0, 90.0)];
        let m = Metrics::compute(&ledger, &RegimeLabels::default());
        assert_relative_eq!(m.max_drawdown, -0.1, epsilon = 1e-12);
    }

    #[test]
    fn equity_curve_compounds_in_order() {
        let curve = equity_curve(&[long(100.0, 110.0), long(100.0, 90.0)]);
        assert_eq!(curve.len(), 2);
        assert_relative_eq!(curve[0], 1.1, epsilon = 1e-12);
        assert_relative_eq!(curve[1], 0.99, epsilon = 1e-12);
    }

    #[test]
    fn accuracy_mixed_bull_and_bear() {
        let ledger = vec![
            make_trade(Direction::Long, 100.0, 110.0, 0),
            make_trade(Direction::Short, 100.0, 110.0, 2),
        ];
        let m = Metrics::compute(&ledger, &RegimeLabels::default());
        assert_relative_eq!(m.accuracy, 0.5);
    }

    #[test]
    fn accuracy_bear_correct_when_price_falls() {
        let ledger = vec![make_trade(Direction::Short, 100.0, 90.0, 2)];
        let m = Metrics::compute(&ledger, &RegimeLabels::default());
        assert_relative_eq!(m.accuracy, 1.0);
    }

    #[test]
    fn accuracy_ignores_other_regimes() {
        let ledger = vec![make_trade(Direction::Long, 100.0, 110.0, 5)];
        let m = Metrics::compute(&ledger, &RegimeLabels::default());
        assert_eq!(m.accuracy, 0.0);
        assert_eq!(m.trade_count, 1);
    }

    #[test]
    fn per_regime_breakdown() {
        let ledger = vec![
            make_trade(Direction::Long, 100.0, 110.0, 0),
            make_trade(Direction::Short, 100.0, 90.0, 2),
            make_trade(Direction::Long, 100.0, 95.0, 0),
        ];
        let results = RegimeResult::compute_per_regime(&ledger);
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].regime, 0);
        assert_eq!(results[0].trade_count, 2);
        assert_relative_eq!(results[0].win_rate, 0.5);
        assert_relative_eq!(results[0].total_return, 1.1 * 0.95 - 1.0, epsilon = 1e-12);
        assert_eq!(results[1].regime, 2);
        assert_relative_eq!(results[1].total_return, 0.1, epsilon = 1e-12);
    }
}
