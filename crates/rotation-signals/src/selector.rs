//! Top-N momentum selection.

use std::cmp::Ordering;

use rotation_traits::Symbol;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{momentum::MomentumSignal, regime::Regime};

/// Configuration for the selector.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectorConfig {
    /// Momentum must be strictly above this to qualify (default: 0.02).
    pub threshold: f64,
    /// Maximum number of holdings (default: 15).
    pub max_holdings: usize,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            threshold: 0.02,
            max_holdings: 15,
        }
    }
}

/// One selected instrument.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectionEntry {
    /// Instrument ticker.
    pub symbol: Symbol,
    /// Momentum at the selection offset.
    pub momentum: f64,
}

/// Ranked holdings; empty means the portfolio is entirely in cash.
///
/// Entries are sorted by momentum descending, ties by ticker ascending.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Selection {
    entries: Vec<SelectionEntry>,
}

impl Selection {
    /// The all-cash selection.
    #[must_use]
    pub const fn cash() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Ranked entries.
    pub fn entries(&self) -> &[SelectionEntry] {
        &self.entries
    }

    /// Iterate over entries in rank order.
    pub fn iter(&self) -> std::slice::Iter<'_, SelectionEntry> {
        self.entries.iter()
    }

    /// Number of holdings.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the selection is all cash.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Tickers in rank order.
    pub fn symbols(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.symbol.as_str()).collect()
    }
}

impl<'a> IntoIterator for &'a Selection {
    type Item = &'a SelectionEntry;
    type IntoIter = std::slice::Iter<'a, SelectionEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Ranking order: momentum descending, then ticker ascending.
fn rank(a: &SelectionEntry, b: &SelectionEntry) -> Ordering {
    b.momentum
        .total_cmp(&a.momentum)
        .then_with(|| a.symbol.cmp(&b.symbol))
}

/// Threshold-and-rank selector.
#[derive(Debug, Clone, Copy, Default)]
pub struct Selector {
    config: SelectorConfig,
}

impl Selector {
    /// Create a selector with the given configuration.
    #[must_use]
    pub const fn new(config: SelectorConfig) -> Self {
        Self { config }
    }

    /// Get the configuration.
    #[must_use]
    pub const fn config(&self) -> &SelectorConfig {
        &self.config
    }

    /// Rank every signal with a present value, without threshold or cap.
    #[must_use]
    pub fn rank_all(&self, signals: &[MomentumSignal]) -> Vec<SelectionEntry> {
        let mut ranked: Vec<SelectionEntry> = signals
            .iter()
            .filter_map(|s| {
                s.value.map(|momentum| SelectionEntry {
                    symbol: s.symbol.clone(),
                    momentum,
                })
            })
            .collect();
        ranked.sort_by(rank);
        ranked
    }

    /// Select instruments whose momentum is strictly above the threshold,
    /// ranked and capped at `max_holdings`.
    #[must_use]
    pub fn select(&self, signals: &[MomentumSignal]) -> Selection {
        let mut entries: Vec<SelectionEntry> = self
            .rank_all(signals)
            .into_iter()
            .filter(|e| e.momentum > self.config.threshold)
            .collect();
        let qualified = entries.len();
        entries.truncate(self.config.max_holdings);

        debug!(
            candidates = signals.len(),
            qualified,
            selected = entries.len(),
            "ranked momentum"
        );

        Selection { entries }
    }

    /// Select under a regime: risk-off always yields the all-cash selection.
    #[must_use]
    pub fn select_with_regime(&self, signals: &[MomentumSignal], regime: Regime) -> Selection {
        if regime.is_risk_off() {
            debug!("regime is risk-off, holding cash");
            return Selection::cash();
        }
        self.select(signals)
    }
}
