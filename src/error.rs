use thiserror::Error;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by the motif engine, the regime labeler, and the
/// series constructors.
///
/// All of these are raised before (or instead of) producing a partial
/// result: either a fully-defined profile/label array comes back, or one
/// of these does. Degenerate (zero-variance) windows are deliberately not
/// an error: they are excluded from candidacy during profile computation,
/// and only if *every* window is degenerate does extraction fail with
/// [`Error::EmptyProfile`].
#[derive(Debug, Error)]
pub enum Error {
    /// The series is too short for the requested window, or the window
    /// itself is below the minimum of 2 samples.
    #[error(
        "insufficient data for window m={m}: need m >= 2 and series length >= 2*m, got length {n}"
    )]
    InsufficientData { n: usize, m: usize },

    /// Extraction was requested on a profile with no defined entries.
    #[error("empty profile: no subsequence has a defined nearest-neighbor distance")]
    EmptyProfile,

    /// A configuration value is out of range. The message carries the
    /// offending values so the caller can re-run with a corrected setup.
    #[error("invalid configuration: {reason}")]
    InvalidConfiguration { reason: String },

    /// The input series violates the value-object contract: mismatched
    /// array lengths, non-increasing or non-uniform timestamps, or
    /// non-finite values.
    #[error("invalid series: {reason}")]
    InvalidSeries { reason: String },
}

impl Error {
    pub(crate) fn invalid_config(reason: impl Into<String>) -> Self {
        Error::InvalidConfiguration {
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid_series(reason: impl Into<String>) -> Self {
        Error::InvalidSeries {
            reason: reason.into(),
        }
    }
}
