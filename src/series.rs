use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use crate::error::{Error, Result};

/// A uniformly-sampled univariate series with UTC timestamps.
///
/// This is the value object the engine consumes: ordered `(timestamp, value)`
/// pairs with strictly increasing timestamps, a fixed sampling interval, and
/// finite values. Construction validates all of that once; every downstream
/// component reads the series without re-checking or mutating it.
#[derive(Debug, Clone, Serialize)]
pub struct TimeSeries {
    timestamps: Vec<DateTime<Utc>>,
    values: Vec<f64>,
}

impl TimeSeries {
    /// Build a series from aligned timestamp and value arrays.
    ///
    /// Requires at least two samples (a single point has no sampling
    /// interval), strictly increasing timestamps with a constant step,
    /// and finite values throughout.
    pub fn new(timestamps: Vec<DateTime<Utc>>, values: Vec<f64>) -> Result<Self> {
        if timestamps.len() != values.len() {
            return Err(Error::invalid_series(format!(
                "timestamp/value length mismatch: {} vs {}",
                timestamps.len(),
                values.len()
            )));
        }
        if timestamps.len() < 2 {
            return Err(Error::invalid_series(format!(
                "need at least 2 samples to define a sampling interval, got {}",
                timestamps.len()
            )));
        }

        let step = timestamps[1] - timestamps[0];
        if step <= Duration::zero() {
            return Err(Error::invalid_series(format!(
                "timestamps not strictly increasing at index 1 ({} -> {})",
                timestamps[0], timestamps[1]
            )));
        }
        for (i, pair) in timestamps.windows(2).enumerate() {
            if pair[1] - pair[0] != step {
                return Err(Error::invalid_series(format!(
                    "non-uniform sampling at index {}: expected step {}, got {}",
                    i + 1,
                    step,
                    pair[1] - pair[0]
                )));
            }
        }
        if let Some(i) = values.iter().position(|v| !v.is_finite()) {
            return Err(Error::invalid_series(format!(
                "non-finite value {} at index {i}",
                values[i]
            )));
        }

        Ok(Self { timestamps, values })
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn timestamps(&self) -> &[DateTime<Utc>] {
        &self.timestamps
    }

    /// Timestamp of the sample at `index`.
    pub fn timestamp(&self, index: usize) -> DateTime<Utc> {
        self.timestamps[index]
    }

    /// The fixed sampling interval.
    pub fn interval(&self) -> Duration {
        self.timestamps[1] - self.timestamps[0]
    }
}

/// Derive log-returns from a close-price series.
///
/// `r[t] = ln(close[t] / close[t-1])`, aligned to the timestamp of the
/// later sample, so the result is one sample shorter than the input.
/// Non-positive closes have no log-return and are rejected.
pub fn log_returns(closes: &TimeSeries) -> Result<TimeSeries> {
    if let Some(i) = closes.values.iter().position(|&c| c <= 0.0) {
        return Err(Error::invalid_series(format!(
            "non-positive close {} at index {i}: log-return undefined",
            closes.values[i]
        )));
    }
    if closes.len() < 3 {
        return Err(Error::invalid_series(format!(
            "need at least 3 closes to form a log-return series, got {}",
            closes.len()
        )));
    }

    let values: Vec<f64> = closes
        .values
        .windows(2)
        .map(|w| (w[1] / w[0]).ln())
        .collect();
    let timestamps = closes.timestamps[1..].to_vec();

    TimeSeries::new(timestamps, values)
}
