//! Concurrent construction of the aligned price matrix.
//!
//! Every ticker is fetched independently through a bounded pool. A constituent
//! that fails, times out, or comes back without a single close is dropped with
//! a warning. The benchmark is different: the regime filter cannot run
//! without it, so any benchmark failure aborts the build.

use std::{collections::HashSet, sync::Arc, time::Duration};

use futures::stream::{self, StreamExt};
use rotation_traits::{
    Interval, PriceMatrix, PriceSeries, PriceSource, Result, RotationError, Symbol,
};
use serde::Serialize;
use tracing::{info, warn};

/// Default number of in-flight requests.
pub const DEFAULT_CONCURRENCY: usize = 8;

/// Default per-ticker timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// A ticker left out of the matrix and why.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DroppedSymbol {
    /// Ticker.
    pub symbol: Symbol,
    /// Failure description.
    pub reason: String,
}

/// Result of a matrix build.
#[derive(Debug, Clone)]
pub struct MatrixBuild {
    /// The aligned matrix, benchmark included.
    pub matrix: PriceMatrix,
    /// Constituents that could not be loaded, in ticker order.
    pub dropped: Vec<DroppedSymbol>,
}

/// Fetches a universe plus benchmark and aligns the results.
#[derive(Clone)]
pub struct PriceMatrixBuilder {
    source: Arc<dyn PriceSource>,
    interval: Interval,
    concurrency: usize,
    timeout: Duration,
}

impl std::fmt::Debug for PriceMatrixBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PriceMatrixBuilder")
            .field("source", &self.source.name())
            .field("interval", &self.interval)
            .field("concurrency", &self.concurrency)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl PriceMatrixBuilder {
    /// Create a builder with monthly sampling and default limits.
    pub fn new(source: Arc<dyn PriceSource>) -> Self {
        Self {
            source,
            interval: Interval::Monthly,
            concurrency: DEFAULT_CONCURRENCY,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Set the sampling interval.
    #[must_use]
    pub const fn with_interval(mut self, interval: Interval) -> Self {
        self.interval = interval;
        self
    }

    /// Set the maximum number of in-flight requests. Zero is treated as one.
    #[must_use]
    pub const fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = if concurrency == 0 { 1 } else { concurrency };
        self
    }

    /// Set the per-ticker timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// The sampling interval.
    pub const fn interval(&self) -> Interval {
        self.interval
    }

    /// Fetch `symbols` and `benchmark` and align them into one matrix.
    ///
    /// Duplicate tickers are fetched once. A benchmark listed among
    /// `symbols` is fetched once and treated as the benchmark.
    ///
    /// # Errors
    ///
    /// Returns [`RotationError::BenchmarkDataUnavailable`] when the benchmark
    /// cannot be loaded. Constituent failures never fail the build.
    pub async fn build(&self, symbols: &[Symbol], benchmark: &str) -> Result<MatrixBuild> {
        let mut seen = HashSet::new();
        seen.insert(benchmark.to_string());
        let mut requests = vec![benchmark.to_string()];
        requests.extend(symbols.iter().filter(|s| seen.insert((*s).clone())).cloned());

        info!(
            source = self.source.name(),
            tickers = requests.len(),
            concurrency = self.concurrency,
            "fetching price histories"
        );

        let results: Vec<(Symbol, Result<PriceSeries>)> = stream::iter(requests)
            .map(|symbol| async move {
                let result = self.fetch_one(&symbol).await;
                (symbol, result)
            })
            .buffer_unordered(self.concurrency)
            .collect()
            .await;

        let mut series = Vec::with_capacity(results.len());
        let mut dropped = Vec::new();
        for (symbol, result) in results {
            match result {
                Ok(s) => series.push(s),
                Err(err) if symbol == benchmark => {
                    return Err(RotationError::benchmark(benchmark, err.to_string()));
                }
                Err(err) => {
                    warn!(symbol = %symbol, error = %err, "dropping ticker");
                    dropped.push(DroppedSymbol {
                        symbol,
                        reason: err.to_string(),
                    });
                }
            }
        }
        dropped.sort_by(|a, b| a.symbol.cmp(&b.symbol));

        let matrix = PriceMatrix::align(series, benchmark)?;
        info!(
            periods = matrix.len(),
            columns = matrix.width(),
            dropped = dropped.len(),
            "price matrix built"
        );

        Ok(MatrixBuild { matrix, dropped })
    }

    /// Fetch one ticker under the timeout, rejecting histories without a close.
    async fn fetch_one(&self, symbol: &str) -> Result<PriceSeries> {
        let series = tokio::time::timeout(self.timeout, self.source.history(symbol, self.interval))
            .await
            .map_err(|_| {
                RotationError::DataFetch(format!("{symbol}: timed out after {:?}", self.timeout))
            })??;

        if !series.has_prices() {
            return Err(RotationError::InsufficientData(format!(
                "{symbol}: no closing prices"
            )));
        }
        Ok(series)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use rotation_traits::{Date, PricePoint};
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn date(y: i32, m: u32) -> Date {
        Date::from_ymd_opt(y, m, 1).unwrap()
    }

    /// Serves canned series; `FAIL` errors, `EMPTY` has no closes, `SLOW` hangs.
    #[derive(Default)]
    struct FakeSource {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl PriceSource for FakeSource {
        fn name(&self) -> &str {
            "fake"
        }

        async fn history(&self, symbol: &str, _interval: Interval) -> Result<PriceSeries> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match symbol {
                "FAIL" | "^BAD" => Err(RotationError::DataFetch("boom".to_string())),
                "EMPTY" => Ok(PriceSeries::new(symbol, vec![PricePoint::absent(date(2024, 1))])),
                "SLOW" => {
                    tokio::time::sleep(Duration::from_secs(60)).await;
                    Ok(PriceSeries::new(symbol, Vec::new()))
                }
                "LATE" => Ok(PriceSeries::new(symbol, vec![PricePoint::new(date(2024, 3), 5.0)])),
                _ => Ok(PriceSeries::new(
                    symbol,
                    vec![
                        PricePoint::new(date(2024, 1), 1.0),
                        PricePoint::new(date(2024, 2), 2.0),
                    ],
                )),
            }
        }
    }

    fn symbols(list: &[&str]) -> Vec<Symbol> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn test_build_aligns_union_of_dates() {
        let builder = PriceMatrixBuilder::new(Arc::new(FakeSource::default()));
        let build = builder.build(&symbols(&["MSFT", "LATE", "AAPL"]), "^NDX").await.unwrap();

        let matrix = build.matrix;
        assert!(build.dropped.is_empty());
        assert_eq!(matrix.periods(), &[date(2024, 1), date(2024, 2), date(2024, 3)]);
        assert_eq!(matrix.symbols().collect::<Vec<_>>(), vec!["AAPL", "LATE", "MSFT", "^NDX"]);
        assert_eq!(matrix.column("LATE").unwrap(), &[None, None, Some(5.0)]);
        assert_eq!(matrix.column("AAPL").unwrap(), &[Some(1.0), Some(2.0), None]);
    }

    #[tokio::test]
    async fn test_build_drops_failed_constituents() {
        let builder = PriceMatrixBuilder::new(Arc::new(FakeSource::default()));
        let build = builder.build(&symbols(&["FAIL", "AAPL", "EMPTY"]), "^NDX").await.unwrap();

        let dropped: Vec<_> = build.dropped.iter().map(|d| d.symbol.as_str()).collect();
        assert_eq!(dropped, vec!["EMPTY", "FAIL"]);
        assert!(build.matrix.column("FAIL").is_none());
        assert!(build.matrix.column("AAPL").is_some());
    }

    #[tokio::test]
    async fn test_build_fails_without_benchmark() {
        let builder = PriceMatrixBuilder::new(Arc::new(FakeSource::default()));
        let err = builder.build(&symbols(&["AAPL"]), "^BAD").await.unwrap_err();
        assert!(err.is_benchmark_failure());
    }

    #[tokio::test]
    async fn test_build_deduplicates_requests() {
        let source = Arc::new(FakeSource::default());
        let builder = PriceMatrixBuilder::new(source.clone()).with_concurrency(2);
        let build = builder
            .build(&symbols(&["AAPL", "AAPL", "^NDX", "MSFT"]), "^NDX")
            .await
            .unwrap();

        assert_eq!(source.calls.load(Ordering::SeqCst), 3);
        assert_eq!(build.matrix.width(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_build_times_out_slow_ticker() {
        let builder = PriceMatrixBuilder::new(Arc::new(FakeSource::default()))
            .with_timeout(Duration::from_secs(1));
        let build = builder.build(&symbols(&["SLOW", "AAPL"]), "^NDX").await.unwrap();

        assert_eq!(build.dropped.len(), 1);
        assert_eq!(build.dropped[0].symbol, "SLOW");
        assert!(build.dropped[0].reason.contains("timed out"));
    }

    #[test]
    fn test_zero_concurrency_clamped() {
        let builder = PriceMatrixBuilder::new(Arc::new(FakeSource::default())).with_concurrency(0);
        assert_eq!(builder.concurrency, 1);
    }
}
