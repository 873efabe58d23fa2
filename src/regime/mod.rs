//! Volatility-regime labeling.
//!
//! Rolling realized volatility over the return series, ranked against its
//! own empirical percentile cut-points over the whole series. Labels are
//! therefore retrospective only: the cut-points see the future, so this
//! module must not be repurposed for live decisioning without replacing
//! the whole-series quantiles with a trailing estimator.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::series::TimeSeries;

/// Coarse volatility classification for one timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RegimeLabel {
    /// Rolling volatility below the lower percentile cut-point.
    LowVol,
    /// Between the cut-points (inclusive).
    Normal,
    /// Above the upper percentile cut-point.
    HighVol,
}

impl RegimeLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LowVol => "low",
            Self::Normal => "normal",
            Self::HighVol => "high",
        }
    }
}

/// Regime labeler configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegimeConfig {
    /// Rolling volatility window in samples.
    pub window: usize,
    /// Minimum observations before a rolling value is defined. `None`
    /// selects `max(2, window / 3)`.
    min_periods: Option<usize>,
    /// Lower percentile cut-point (default 33).
    pub lower_percentile: f64,
    /// Upper percentile cut-point (default 66).
    pub upper_percentile: f64,
}

impl RegimeConfig {
    pub fn new(window: usize) -> Self {
        Self {
            window,
            min_periods: None,
            lower_percentile: 33.0,
            upper_percentile: 66.0,
        }
    }

    pub fn with_min_periods(mut self, min_periods: usize) -> Self {
        self.min_periods = Some(min_periods);
        self
    }

    pub fn with_percentiles(mut self, lower: f64, upper: f64) -> Self {
        self.lower_percentile = lower;
        self.upper_percentile = upper;
        self
    }

    /// Effective warm-up threshold. Sample std needs two observations, so
    /// the floor is 2.
    pub fn min_periods(&self) -> usize {
        self.min_periods.unwrap_or((self.window / 3).max(2))
    }

    fn validate(&self, n: usize) -> Result<()> {
        if self.window < 2 || self.window > n {
            return Err(Error::invalid_config(format!(
                "regime window {} must be in [2, {n}] (series length)",
                self.window
            )));
        }
        let mp = self.min_periods();
        if mp < 2 || mp > self.window {
            return Err(Error::invalid_config(format!(
                "min_periods {mp} must be in [2, {}] (regime window)",
                self.window
            )));
        }
        if !(0.0 < self.lower_percentile
            && self.lower_percentile < self.upper_percentile
            && self.upper_percentile < 100.0)
        {
            return Err(Error::invalid_config(format!(
                "percentile cut-points must satisfy 0 < lower < upper < 100, got {} / {}",
                self.lower_percentile, self.upper_percentile
            )));
        }
        Ok(())
    }
}

/// Rolling sample standard deviation over a trailing window.
///
/// Entry `t` covers `values[t+1-window ..= t]` (clamped at the start of
/// the series); it is `None` until at least `min_periods` observations
/// are available, so the first `min_periods - 1` entries are undefined
/// and entries before the window fills are computed over the partial
/// window. Sample variance (ddof=1), via cumulative sums.
pub fn rolling_std(values: &[f64], window: usize, min_periods: usize) -> Vec<Option<f64>> {
    debug_assert!(min_periods >= 2);

    let n = values.len();
    let mut cumsum = vec![0.0; n + 1];
    let mut cumsum_sq = vec![0.0; n + 1];
    for i in 0..n {
        cumsum[i + 1] = cumsum[i] + values[i];
        cumsum_sq[i + 1] = cumsum_sq[i] + values[i] * values[i];
    }

    (0..n)
        .map(|t| {
            let start = (t + 1).saturating_sub(window);
            let count = t + 1 - start;
            if count < min_periods {
                return None;
            }
            let c = count as f64;
            let sum = cumsum[t + 1] - cumsum[start];
            let sum_sq = cumsum_sq[t + 1] - cumsum_sq[start];
            let var = ((sum_sq - sum * sum / c) / (c - 1.0)).max(0.0);
            Some(var.sqrt())
        })
        .collect()
}

/// Empirical percentile with linear interpolation between order
/// statistics. `sorted` must be ascending and non-empty.
fn percentile(sorted: &[f64], p: f64) -> f64 {
    debug_assert!(!sorted.is_empty());
    debug_assert!((0.0..=100.0).contains(&p));

    let rank = p / 100.0 * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    if lo == hi {
        return sorted[lo];
    }
    let frac = rank - lo as f64;
    sorted[lo] + (sorted[hi] - sorted[lo]) * frac
}

/// Label each timestamp with its volatility regime.
///
/// Rolling volatility is ranked against the series' own empirical
/// lower/upper percentile cut-points (computed over defined entries
/// only): strictly below the lower cut-point is [`RegimeLabel::LowVol`],
/// strictly above the upper is [`RegimeLabel::HighVol`], and everything
/// else (boundaries included) is [`RegimeLabel::Normal`]. Warm-up entries
/// stay `None` rather than being forced into a bucket.
///
/// The result is aligned to the series: entry `t` labels `series[t]`.
pub fn label_regimes(series: &TimeSeries, config: &RegimeConfig) -> Result<Vec<Option<RegimeLabel>>> {
    config.validate(series.len())?;

    let vol = rolling_std(series.values(), config.window, config.min_periods());

    let mut defined: Vec<f64> = vol.iter().flatten().copied().collect();
    debug_assert!(!defined.is_empty(), "validated window guarantees defined entries");
    defined.sort_by(|a, b| a.partial_cmp(b).unwrap());

    let lower_cut = percentile(&defined, config.lower_percentile);
    let upper_cut = percentile(&defined, config.upper_percentile);
    debug!(
        window = config.window,
        min_periods = config.min_periods(),
        lower_cut,
        upper_cut,
        defined = defined.len(),
        "labeling volatility regimes"
    );

    let labels = vol
        .into_iter()
        .map(|v| {
            v.map(|x| {
                if x < lower_cut {
                    RegimeLabel::LowVol
                } else if x > upper_cut {
                    RegimeLabel::HighVol
                } else {
                    RegimeLabel::Normal
                }
            })
        })
        .collect();

    Ok(labels)
}

/// Per-label occupancy of a labeled series.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RegimeSummary {
    pub low: usize,
    pub normal: usize,
    pub high: usize,
    /// Warm-up entries with no label.
    pub undefined: usize,
}

impl RegimeSummary {
    pub fn from_labels(labels: &[Option<RegimeLabel>]) -> Self {
        let mut summary = Self::default();
        for label in labels {
            match label {
                Some(RegimeLabel::LowVol) => summary.low += 1,
                Some(RegimeLabel::Normal) => summary.normal += 1,
                Some(RegimeLabel::HighVol) => summary.high += 1,
                None => summary.undefined += 1,
            }
        }
        summary
    }

    /// Share of defined entries carrying `label`, in [0, 1].
    pub fn share(&self, label: RegimeLabel) -> f64 {
        let defined = self.low + self.normal + self.high;
        if defined == 0 {
            return 0.0;
        }
        let count = match label {
            RegimeLabel::LowVol => self.low,
            RegimeLabel::Normal => self.normal,
            RegimeLabel::HighVol => self.high,
        };
        count as f64 / defined as f64
    }
}
