//! Initial allocation conventions.
//!
//! At each rebalance every holding receives the same starting fraction of the
//! portfolio. Two conventions are supported and they disagree on what happens
//! when fewer holdings than slots qualify.

use serde::{Deserialize, Serialize};

/// Default number of slots for [`AllocationMode::FixedSlots`].
pub const DEFAULT_SLOTS: usize = 15;

/// How the portfolio is split among holdings at a rebalance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum AllocationMode {
    /// `1 / n` per holding; the portfolio is always fully invested.
    #[default]
    EqualSelected,
    /// `1 / slots` per holding; unfilled slots stay in cash.
    FixedSlots {
        /// Number of slots the portfolio is divided into.
        slots: usize,
    },
}

impl AllocationMode {
    /// Fixed-slot mode with [`DEFAULT_SLOTS`] slots.
    #[must_use]
    pub const fn fixed() -> Self {
        Self::FixedSlots {
            slots: DEFAULT_SLOTS,
        }
    }

    /// Starting fraction for each of `holdings` positions.
    ///
    /// Fixed-slot mode never allocates more than the whole portfolio: with more
    /// holdings than slots it degrades to equal weighting.
    #[must_use]
    pub fn per_holding(&self, holdings: usize) -> f64 {
        let denominator = match self {
            Self::EqualSelected => holdings,
            Self::FixedSlots { slots } => (*slots).max(holdings),
        };
        if denominator == 0 {
            0.0
        } else {
            1.0 / denominator as f64
        }
    }

    /// Fraction left in cash at the rebalance for `holdings` positions.
    #[must_use]
    pub fn undeployed(&self, holdings: usize) -> f64 {
        if holdings == 0 {
            return 1.0;
        }
        (1.0 - self.per_holding(holdings) * holdings as f64).max(0.0)
    }
}

impl std::str::FromStr for AllocationMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "equal" | "equal_selected" => Ok(Self::EqualSelected),
            "fixed" | "fixed_slots" => Ok(Self::fixed()),
            other => other
                .strip_prefix("fixed:")
                .and_then(|n| n.parse::<usize>().ok())
                .filter(|n| *n > 0)
                .map(|slots| Self::FixedSlots { slots })
                .ok_or_else(|| format!("Unknown allocation mode: {s}")),
        }
    }
}
