pub mod algorithms;
pub mod core;
pub mod error;
pub mod metrics;
pub mod regime;
pub mod report;
pub mod series;

pub use crate::algorithms::motifs::{
    best_motif, find_discords, find_motifs, worst_discord, Discord, MotifPair,
};
pub use crate::core::distance_metric::DistanceMetric;
pub use crate::core::matrix_profile::{
    MatrixProfile, MatrixProfileConfig, RollingStats, UNDEFINED_INDEX,
};
pub use crate::error::{Error, Result};
pub use crate::metrics::euclidean::ZNormalizedEuclidean;
pub use crate::regime::{label_regimes, RegimeConfig, RegimeLabel, RegimeSummary};
pub use crate::report::{DiscordReport, MotifReport, Occurrence, RegimeReporter};
pub use crate::series::{log_returns, TimeSeries};

use crate::algorithms::stomp::stomp;

/// High-level facade for matrix profile computation, generic over distance
/// metric.
///
/// # Examples
///
/// ```
/// use volmotif::{EuclideanEngine, MatrixProfileConfig};
///
/// let returns = vec![0.01, -0.02, 0.015, -0.01, 0.012, -0.018, 0.014, -0.012, 0.01];
/// let engine = EuclideanEngine::new(MatrixProfileConfig::new(4));
/// let mp = engine.compute(&returns)?;
/// assert_eq!(mp.len(), returns.len() - 4 + 1);
/// # Ok::<(), volmotif::Error>(())
/// ```
pub struct Engine<M: DistanceMetric> {
    config: MatrixProfileConfig,
    _metric: std::marker::PhantomData<M>,
}

impl<M: DistanceMetric> Engine<M> {
    /// Create a new engine with the given configuration.
    pub fn new(config: MatrixProfileConfig) -> Self {
        Self {
            config,
            _metric: std::marker::PhantomData,
        }
    }

    /// Compute the full self-join matrix profile over raw values.
    pub fn compute(&self, values: &[f64]) -> Result<MatrixProfile> {
        stomp::<M>(values, &self.config)
    }
}

/// Convenience type alias for the z-normalized Euclidean engine.
pub type EuclideanEngine = Engine<ZNormalizedEuclidean>;

/// Compute the self-join matrix profile of a time series.
///
/// Profile index `i` corresponds to the window starting at
/// `series.timestamp(i)`.
pub fn compute_matrix_profile(
    series: &TimeSeries,
    config: &MatrixProfileConfig,
) -> Result<MatrixProfile> {
    stomp::<ZNormalizedEuclidean>(series.values(), config)
}
