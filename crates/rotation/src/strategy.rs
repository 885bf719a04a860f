//! The end-to-end rotation pipeline.
//!
//! [`Strategy::evaluate`] is a pure function of a price matrix and a date:
//! the matrix is cut to the periods on or before the date, then momentum,
//! regime, selection, calendar and drift run in that order with no state
//! carried between calls. [`Strategy::run`] adds the only side effect,
//! loading the matrix through the configured sources.

use std::sync::Arc;

use rotation_data::{MatrixBuild, PriceMatrixBuilder};
use rotation_portfolio::{RebalancePeriod, WeightDrift};
use rotation_signals::{Momentum, RegimeFilter, Selector, selection_offset};
use rotation_traits::{
    Date, PriceMatrix, PriceSource, Result, RotationError, UniverseSource,
};
use tracing::info;

use crate::{
    config::StrategyConfig,
    report::{MomentumRow, MomentumTable, StrategyReport},
};

/// Period the offset lands on, counting 1 as the latest row.
fn anchor_period(matrix: &PriceMatrix, offset: usize) -> Option<Date> {
    let periods = matrix.periods();
    periods
        .len()
        .checked_sub(offset)
        .and_then(|i| periods.get(i))
        .copied()
}

/// Quarterly momentum rotation strategy.
#[derive(Debug, Clone, Default)]
pub struct Strategy {
    config: StrategyConfig,
}

impl Strategy {
    /// Create a strategy with the given configuration.
    #[must_use]
    pub const fn new(config: StrategyConfig) -> Self {
        Self { config }
    }

    /// Get the configuration.
    #[must_use]
    pub const fn config(&self) -> &StrategyConfig {
        &self.config
    }

    /// Evaluate the strategy on `matrix` as of `today`.
    ///
    /// Periods after `today` are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`RotationError::InsufficientData`] when no period falls on or
    /// before `today`, and [`RotationError::BenchmarkDataUnavailable`] when the
    /// regime cannot be read.
    pub fn evaluate(&self, matrix: &PriceMatrix, today: Date) -> Result<StrategyReport> {
        let matrix = &matrix.truncate_to(today);
        if matrix.is_empty() {
            return Err(RotationError::InsufficientData(format!(
                "price matrix has no periods on or before {today}"
            )));
        }

        let offset = selection_offset(today);
        let anchor = anchor_period(matrix, offset);

        let regime = RegimeFilter::new(self.config.regime).evaluate(matrix, offset)?;
        let signals = Momentum::new(self.config.momentum).cross_section(matrix, offset);
        let selection =
            Selector::new(self.config.selector).select_with_regime(&signals, regime.regime);
        let period = RebalancePeriod::containing(today)?;
        let drift = WeightDrift::new(self.config.allocation).compute(&selection, matrix, &period)?;

        info!(
            %today,
            offset,
            regime = %regime.regime,
            holdings = selection.len(),
            %period,
            "strategy evaluated"
        );

        Ok(StrategyReport {
            as_of: today,
            offset,
            anchor_period: anchor,
            regime,
            selection,
            period,
            drift,
            statistics: self.config.statistics,
            dropped: Vec::new(),
        })
    }

    /// Rank every constituent by momentum at the selection offset.
    ///
    /// The regime is not applied; `selected` marks what a risk-on run picks.
    /// Periods after `today` are ignored.
    #[must_use]
    pub fn momentum_table(&self, matrix: &PriceMatrix, today: Date) -> MomentumTable {
        let matrix = &matrix.truncate_to(today);
        let offset = selection_offset(today);
        let signals = Momentum::new(self.config.momentum).cross_section(matrix, offset);
        let selector = Selector::new(self.config.selector);
        let chosen = selector.select(&signals);

        let mut rows: Vec<MomentumRow> = selector
            .rank_all(&signals)
            .into_iter()
            .enumerate()
            .map(|(i, entry)| MomentumRow {
                rank: Some(i + 1),
                selected: chosen.iter().any(|c| c.symbol == entry.symbol),
                symbol: entry.symbol,
                momentum: Some(entry.momentum),
            })
            .collect();
        rows.extend(signals.iter().filter(|s| !s.is_present()).map(|s| MomentumRow {
            rank: None,
            symbol: s.symbol.clone(),
            momentum: None,
            selected: false,
        }));

        MomentumTable {
            as_of: today,
            offset,
            anchor_period: anchor_period(matrix, offset),
            window: self.config.momentum.window,
            threshold: self.config.selector.threshold,
            rows,
        }
    }

    /// A matrix builder configured from the fetch settings.
    pub fn builder(&self, source: Arc<dyn PriceSource>) -> PriceMatrixBuilder {
        PriceMatrixBuilder::new(source)
            .with_interval(self.config.interval)
            .with_concurrency(self.config.fetch.concurrency)
            .with_timeout(self.config.fetch.timeout())
    }

    /// Load the universe and build its price matrix.
    ///
    /// # Errors
    ///
    /// Returns an error if the universe cannot be loaded or the benchmark
    /// history is unavailable.
    pub async fn load(
        &self,
        universe: &dyn UniverseSource,
        source: Arc<dyn PriceSource>,
    ) -> Result<MatrixBuild> {
        let symbols = universe.symbols().await?;
        info!(
            universe = universe.name(),
            source = source.name(),
            count = symbols.len(),
            "loaded universe"
        );
        self.builder(source).build(&symbols, &self.config.benchmark).await
    }

    /// Load prices and evaluate the strategy as of `today`.
    ///
    /// # Errors
    ///
    /// See [`Strategy::load`] and [`Strategy::evaluate`].
    pub async fn run(
        &self,
        universe: &dyn UniverseSource,
        source: Arc<dyn PriceSource>,
        today: Date,
    ) -> Result<StrategyReport> {
        let build = self.load(universe, source).await?;
        let mut report = self.evaluate(&build.matrix, today)?;
        report.dropped = build.dropped;
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::NO_HOLDINGS_MESSAGE;
    use approx::assert_relative_eq;
    use async_trait::async_trait;
    use chrono::Months;
    use rotation_portfolio::{AllocationMode, CASH};
    use rotation_signals::Regime;
    use rotation_traits::{Interval, PricePoint, PriceSeries, Symbol};

    const BENCH: &str = "^NDX";

    fn d(y: i32, m: u32, day: u32) -> Date {
        Date::from_ymd_opt(y, m, day).unwrap()
    }

    /// 15 monthly closes from 2023-03 to 2024-05 growing at `growth` per period.
    fn geometric(symbol: &str, growth: f64) -> PriceSeries {
        let start = d(2023, 3, 1);
        let points = (0..15)
            .map(|i| {
                let date = start.checked_add_months(Months::new(i)).unwrap();
                PricePoint::new(date, 100.0 * (1.0 + growth).powi(i as i32))
            })
            .collect();
        PriceSeries::new(symbol, points)
    }

    fn universe(bench_growth: f64) -> Vec<PriceSeries> {
        vec![
            geometric("AAA", 0.02),
            geometric("BBB", 0.01),
            geometric("CCC", 0.0),
            geometric("DDD", -0.01),
            geometric(BENCH, bench_growth),
        ]
    }

    fn matrix(bench_growth: f64) -> PriceMatrix {
        PriceMatrix::align(universe(bench_growth), BENCH).unwrap()
    }

    #[test]
    fn test_evaluate_risk_on() {
        let report = Strategy::default().evaluate(&matrix(0.01), d(2024, 5, 15)).unwrap();

        assert_eq!(report.offset, 2);
        assert_eq!(report.anchor_period, Some(d(2024, 4, 1)));
        assert_eq!(report.regime.regime, Regime::RiskOn);
        assert_eq!(report.selection.symbols(), vec!["AAA", "BBB"]);
        assert_eq!(report.period, RebalancePeriod { last: d(2024, 4, 1), next: d(2024, 7, 1) });
        assert!(!report.fully_in_cash());
        assert!(report.status_message().is_none());

        // Both drift one period from the April close to the May close.
        let weights = report.weights();
        assert_relative_eq!(weights.get("AAA").unwrap(), 0.51 / 1.015 * 100.0, epsilon = 1e-9);
        assert_relative_eq!(weights.get("BBB").unwrap(), 0.505 / 1.015 * 100.0, epsilon = 1e-9);
        assert_eq!(weights.cash(), 0.0);
        assert_relative_eq!(weights.total(), 100.0, epsilon = 1e-6);
        assert_relative_eq!(report.total_return().unwrap(), 1.5, epsilon = 1e-9);
    }

    #[test]
    fn test_evaluate_risk_off_holds_cash() {
        let report = Strategy::default().evaluate(&matrix(-0.02), d(2024, 5, 15)).unwrap();

        assert!(report.is_risk_off());
        assert!(report.regime.long_momentum < 0.0);
        assert!(report.regime.short_momentum < -0.05);
        assert!(report.selection.is_empty());
        assert!(report.fully_in_cash());
        assert!(report.weights().is_empty());
        assert_eq!(report.total_return(), None);
        assert_eq!(report.status_message(), Some(NO_HOLDINGS_MESSAGE));
    }

    #[test]
    fn test_evaluate_fixed_slots_leaves_cash() {
        let config = StrategyConfig {
            allocation: AllocationMode::fixed(),
            ..StrategyConfig::default()
        };
        let report = Strategy::new(config).evaluate(&matrix(0.01), d(2024, 5, 15)).unwrap();

        let weights = report.weights();
        assert!(weights.get(CASH).unwrap() > 80.0);
        assert_relative_eq!(weights.total(), 100.0, epsilon = 1e-6);
    }

    #[test]
    fn test_evaluate_without_benchmark_history() {
        // Benchmark only covers the last three periods, too short for a reading.
        let mut series = universe(0.01);
        series.pop();
        series.push(PriceSeries::new(
            BENCH,
            vec![
                PricePoint::new(d(2024, 3, 1), 1.0),
                PricePoint::new(d(2024, 4, 1), 1.0),
                PricePoint::new(d(2024, 5, 1), 1.0),
            ],
        ));
        let matrix = PriceMatrix::align(series, BENCH).unwrap();

        let err = Strategy::default().evaluate(&matrix, d(2024, 5, 15)).unwrap_err();
        assert!(err.is_benchmark_failure());
    }

    #[test]
    fn test_evaluate_empty_matrix() {
        let matrix = PriceMatrix::align(vec![PriceSeries::new(BENCH, Vec::new())], BENCH).unwrap();
        assert!(matches!(
            Strategy::default().evaluate(&matrix, d(2024, 5, 15)),
            Err(RotationError::InsufficientData(_))
        ));
    }

    #[test]
    fn test_evaluate_is_idempotent() {
        let strategy = Strategy::default();
        let m = matrix(0.01);
        let first = strategy.evaluate(&m, d(2024, 5, 15)).unwrap();
        let second = strategy.evaluate(&m, d(2024, 5, 15)).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_momentum_table() {
        let table = Strategy::default().momentum_table(&matrix(0.01), d(2024, 4, 10));

        // May is after the evaluation date, so April is the latest row.
        assert_eq!(table.offset, 1);
        assert_eq!(table.anchor_period, Some(d(2024, 4, 1)));
        let ranked: Vec<_> = table.rows.iter().map(|r| (r.rank, r.symbol.as_str())).collect();
        assert_eq!(
            ranked,
            vec![(Some(1), "AAA"), (Some(2), "BBB"), (Some(3), "CCC"), (Some(4), "DDD")]
        );
        let selected: Vec<_> = table.selected().map(|r| r.symbol.as_str()).collect();
        assert_eq!(selected, vec!["AAA", "BBB"]);
        assert_eq!(table.missing().count(), 0);
    }

    fn monthly(symbol: &str, start: Date, count: u32, growth: f64) -> PriceSeries {
        let points = (0..count)
            .map(|i| {
                let date = start.checked_add_months(Months::new(i)).unwrap();
                PricePoint::new(date, 100.0 * (1.0 + growth).powi(i as i32))
            })
            .collect();
        PriceSeries::new(symbol, points)
    }

    #[test]
    fn test_evaluate_ignores_later_periods() {
        // Two years of history; NEW lists mid-2023 and climbs fast, so it
        // would top a ranking taken at the end of the matrix.
        let start = d(2022, 6, 1);
        let full = PriceMatrix::align(
            vec![
                monthly("AAA", start, 24, 0.02),
                monthly("BBB", start, 24, 0.01),
                monthly("CCC", start, 24, 0.0),
                monthly(BENCH, start, 24, 0.01),
                monthly("NEW", d(2023, 6, 1), 12, 0.2),
            ],
            BENCH,
        )
        .unwrap();
        let today = d(2023, 8, 15);

        let report = Strategy::default().evaluate(&full, today).unwrap();
        assert_eq!(report.offset, 2);
        assert_eq!(report.anchor_period, Some(d(2023, 7, 1)));
        assert_eq!(report.selection.symbols(), vec!["AAA", "BBB"]);
        assert_eq!(report.period, RebalancePeriod { last: d(2023, 7, 1), next: d(2023, 10, 1) });
        assert!(report.drift.unpriced.is_empty());
        assert!(report.drift.holdings.iter().all(|h| h.current_date == d(2023, 8, 1)));

        let cut = Strategy::default().evaluate(&full.truncate_to(today), today).unwrap();
        assert_eq!(report, cut);

        let table = Strategy::default().momentum_table(&full, today);
        let new = table.rows.iter().find(|r| r.symbol == "NEW").unwrap();
        assert_eq!(new.momentum, None);
    }

    #[test]
    fn test_evaluate_before_first_period() {
        let err = Strategy::default().evaluate(&matrix(0.01), d(2020, 1, 1)).unwrap_err();
        assert!(matches!(err, RotationError::InsufficientData(_)));
    }

    struct FakeUniverse;

    #[async_trait]
    impl UniverseSource for FakeUniverse {
        fn name(&self) -> &str {
            "fake"
        }

        async fn symbols(&self) -> Result<Vec<Symbol>> {
            Ok(["AAA", "BBB", "CCC", "DDD", "GONE"].map(String::from).to_vec())
        }
    }

    struct FakePrices;

    #[async_trait]
    impl PriceSource for FakePrices {
        fn name(&self) -> &str {
            "fake"
        }

        async fn history(&self, symbol: &str, _interval: Interval) -> Result<PriceSeries> {
            universe(0.01)
                .into_iter()
                .find(|s| s.symbol() == symbol)
                .ok_or_else(|| RotationError::SymbolNotFound(symbol.to_string()))
        }
    }

    #[tokio::test]
    async fn test_run_end_to_end() {
        let report = Strategy::default()
            .run(&FakeUniverse, Arc::new(FakePrices), d(2024, 5, 15))
            .await
            .unwrap();

        assert_eq!(report.selection.symbols(), vec!["AAA", "BBB"]);
        assert_eq!(report.dropped.len(), 1);
        assert_eq!(report.dropped[0].symbol, "GONE");

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["regime"]["regime"], "risk_on");
        assert_eq!(json["period"]["last"], "2024-04-01");
    }
}
