//! Joins motif and discord indices with timestamps and regime labels.
//!
//! Thin composition over the engine, the extractor, and the labeler:
//! no algorithmic content, just the timestamp alignment the presentation
//! layer consumes.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::algorithms::motifs::{Discord, MotifPair};
use crate::error::{Error, Result};
use crate::regime::{RegimeLabel, RegimeSummary};
use crate::series::TimeSeries;

/// One window occurrence anchored to wall-clock time and regime.
///
/// The regime is the label at the window's start timestamp; `None` when
/// the window starts inside the labeler's warm-up region.
#[derive(Debug, Clone, Serialize)]
pub struct Occurrence {
    pub index: usize,
    pub start: DateTime<Utc>,
    pub regime: Option<RegimeLabel>,
}

/// A motif pair with both occurrences placed in time and regime.
#[derive(Debug, Clone, Serialize)]
pub struct MotifReport {
    pub first: Occurrence,
    pub second: Occurrence,
    pub distance: f64,
}

/// A discord placed in time and regime.
#[derive(Debug, Clone, Serialize)]
pub struct DiscordReport {
    pub occurrence: Occurrence,
    pub distance: f64,
}

/// Reporter tying one series to its regime labels.
pub struct RegimeReporter<'a> {
    series: &'a TimeSeries,
    labels: &'a [Option<RegimeLabel>],
}

impl<'a> RegimeReporter<'a> {
    /// The labels must be the output of `label_regimes` on the same
    /// series, so the arrays are index-aligned.
    pub fn new(series: &'a TimeSeries, labels: &'a [Option<RegimeLabel>]) -> Result<Self> {
        if labels.len() != series.len() {
            return Err(Error::invalid_series(format!(
                "regime labels not aligned with series: {} labels vs {} samples",
                labels.len(),
                series.len()
            )));
        }
        Ok(Self { series, labels })
    }

    fn occurrence(&self, index: usize) -> Occurrence {
        Occurrence {
            index,
            start: self.series.timestamp(index),
            regime: self.labels[index],
        }
    }

    /// Place a motif pair in time and regime.
    pub fn motif(&self, pair: &MotifPair) -> MotifReport {
        MotifReport {
            first: self.occurrence(pair.index_a),
            second: self.occurrence(pair.index_b),
            distance: pair.distance,
        }
    }

    /// Place a discord in time and regime.
    pub fn discord(&self, discord: &Discord) -> DiscordReport {
        DiscordReport {
            occurrence: self.occurrence(discord.index),
            distance: discord.distance,
        }
    }

    /// Regime occupancy over the whole labeled series.
    pub fn summary(&self) -> RegimeSummary {
        RegimeSummary::from_labels(self.labels)
    }
}
