//! Aligned closing-price table.
//!
//! A [`PriceMatrix`] holds one column per instrument (benchmark included) on a
//! single shared, strictly increasing period axis. Periods an instrument was
//! not observed at hold `None`; nothing is forward- or backward-filled, so
//! downstream momentum sees "no signal" rather than "flat".

use std::collections::{BTreeMap, BTreeSet};

use polars::prelude::*;

use crate::{Date, PriceSeries, Result, RotationError, Symbol};

/// Closing prices for a universe plus its benchmark, aligned on one axis.
///
/// Columns iterate in lexical ticker order. That order is the stable column
/// order ranking ties fall back to.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceMatrix {
    periods: Vec<Date>,
    columns: BTreeMap<Symbol, Vec<Option<f64>>>,
    benchmark: Symbol,
}

impl PriceMatrix {
    /// Align series on the union of their period dates.
    ///
    /// # Errors
    ///
    /// Returns [`RotationError::BenchmarkDataUnavailable`] if no series for
    /// `benchmark` is supplied.
    pub fn align(series: Vec<PriceSeries>, benchmark: &str) -> Result<Self> {
        if !series.iter().any(|s| s.symbol() == benchmark) {
            return Err(RotationError::benchmark(benchmark, "no price history"));
        }

        let periods: Vec<Date> = series
            .iter()
            .flat_map(|s| s.points().iter().map(|p| p.date))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let mut columns = BTreeMap::new();
        for s in &series {
            let mut column = vec![None; periods.len()];
            for point in s.points() {
                // Every point date is on the axis by construction.
                if let Ok(idx) = periods.binary_search(&point.date) {
                    column[idx] = point.close;
                }
            }
            columns.insert(s.symbol().to_string(), column);
        }

        Ok(Self {
            periods,
            columns,
            benchmark: benchmark.to_string(),
        })
    }

    /// The shared period axis, ascending.
    pub fn periods(&self) -> &[Date] {
        &self.periods
    }

    /// Number of periods on the axis.
    pub fn len(&self) -> usize {
        self.periods.len()
    }

    /// Whether the axis is empty.
    pub fn is_empty(&self) -> bool {
        self.periods.is_empty()
    }

    /// The most recent period on the axis.
    pub fn latest_period(&self) -> Option<Date> {
        self.periods.last().copied()
    }

    /// The benchmark ticker.
    pub fn benchmark(&self) -> &str {
        &self.benchmark
    }

    /// All tickers, benchmark included, in column order.
    pub fn symbols(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(String::as_str)
    }

    /// Tickers eligible for selection: every column except the benchmark.
    pub fn constituents(&self) -> impl Iterator<Item = &str> {
        self.symbols().filter(move |s| *s != self.benchmark)
    }

    /// Number of columns, benchmark included.
    pub fn width(&self) -> usize {
        self.columns.len()
    }

    /// Price column for a ticker.
    pub fn column(&self, symbol: &str) -> Option<&[Option<f64>]> {
        self.columns.get(symbol).map(Vec::as_slice)
    }

    /// Price column for a ticker, erroring if it is not in the matrix.
    ///
    /// # Errors
    ///
    /// Returns [`RotationError::SymbolNotFound`] for unknown tickers.
    pub fn require_column(&self, symbol: &str) -> Result<&[Option<f64>]> {
        self.column(symbol)
            .ok_or_else(|| RotationError::SymbolNotFound(symbol.to_string()))
    }

    /// The benchmark's price column.
    ///
    /// # Errors
    ///
    /// Returns [`RotationError::BenchmarkDataUnavailable`] if the column is gone.
    pub fn benchmark_column(&self) -> Result<&[Option<f64>]> {
        self.column(&self.benchmark)
            .ok_or_else(|| RotationError::benchmark(self.benchmark.clone(), "column missing"))
    }

    /// Index of the latest period at or before `date`.
    pub fn floor_index(&self, date: Date) -> Option<usize> {
        self.periods.partition_point(|p| *p <= date).checked_sub(1)
    }

    /// The matrix restricted to periods on or before `date`.
    ///
    /// Columns are kept even when every remaining close is absent.
    #[must_use]
    pub fn truncate_to(&self, date: Date) -> Self {
        let end = self.floor_index(date).map_or(0, |i| i + 1);
        Self {
            periods: self.periods[..end].to_vec(),
            columns: self
                .columns
                .iter()
                .map(|(symbol, prices)| (symbol.clone(), prices[..end].to_vec()))
                .collect(),
            benchmark: self.benchmark.clone(),
        }
    }

    /// Latest observed close for `symbol` at a period on or before `date`.
    ///
    /// The search walks back from the floor period past absent closes.
    ///
    /// # Errors
    ///
    /// Returns [`RotationError::SymbolNotFound`] for unknown tickers, and
    /// [`RotationError::NoPriceAtOrBefore`] when nothing is priced that early.
    pub fn price_at_or_before(&self, symbol: &str, date: Date) -> Result<(Date, f64)> {
        let column = self.require_column(symbol)?;
        let no_price = || RotationError::NoPriceAtOrBefore {
            symbol: symbol.to_string(),
            date,
        };

        let floor = self.floor_index(date).ok_or_else(no_price)?;
        (0..=floor)
            .rev()
            .find_map(|i| column[i].map(|close| (self.periods[i], close)))
            .ok_or_else(no_price)
    }

    /// Most recent observed close for `symbol`.
    ///
    /// # Errors
    ///
    /// Same as [`PriceMatrix::price_at_or_before`] evaluated at the last period.
    pub fn latest_price(&self, symbol: &str) -> Result<(Date, f64)> {
        let latest = self.latest_period().ok_or_else(|| {
            RotationError::InsufficientData("price matrix has no periods".to_string())
        })?;
        self.price_at_or_before(symbol, latest)
    }

    /// Render the matrix as a DataFrame: a `date` column followed by one
    /// nullable `f64` column per ticker.
    ///
    /// # Errors
    ///
    /// Propagates Polars construction failures.
    pub fn to_frame(&self) -> Result<DataFrame> {
        let mut columns = Vec::with_capacity(self.columns.len() + 1);
        columns.push(Column::new("date".into(), self.periods.as_slice()));
        for (symbol, prices) in &self.columns {
            columns.push(Column::new(symbol.as_str().into(), prices.as_slice()));
        }
        Ok(DataFrame::new(columns)?)
    }
}
