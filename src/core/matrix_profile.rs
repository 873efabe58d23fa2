use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Sentinel for a profile entry with no valid neighbor.
///
/// An undefined entry always has `profile[i] == f64::INFINITY` alongside
/// `profile_index[i] == UNDEFINED_INDEX`.
pub const UNDEFINED_INDEX: usize = usize::MAX;

/// Configuration for matrix profile computation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatrixProfileConfig {
    /// Subsequence (window) length in samples.
    pub m: usize,
    /// Trivial-match exclusion radius. `None` selects the default
    /// `ceil(m / 4)`.
    exclusion_radius: Option<usize>,
}

impl MatrixProfileConfig {
    pub fn new(m: usize) -> Self {
        Self {
            m,
            exclusion_radius: None,
        }
    }

    /// Override the default exclusion radius.
    pub fn with_exclusion_radius(mut self, radius: usize) -> Self {
        self.exclusion_radius = Some(radius);
        self
    }

    /// The effective exclusion radius: matches `j` with `|i - j| <= radius`
    /// are never considered neighbor candidates for window `i`.
    pub fn exclusion_radius(&self) -> usize {
        self.exclusion_radius
            .unwrap_or_else(|| (self.m as f64 / 4.0).ceil() as usize)
    }

    /// Validate against a concrete series length.
    ///
    /// `m < 2` and `n < 2m` are data-sufficiency failures; an exclusion
    /// radius reaching half the series is a configuration failure, since no
    /// window could then see a meaningful candidate set.
    pub fn validate(&self, n: usize) -> Result<()> {
        if self.m < 2 || n < 2 * self.m {
            return Err(Error::InsufficientData { n, m: self.m });
        }
        let radius = self.exclusion_radius();
        if radius >= n / 2 {
            return Err(Error::invalid_config(format!(
                "exclusion radius {radius} must be below half the series length ({n} samples)"
            )));
        }
        Ok(())
    }
}

/// The matrix profile: per-window nearest-neighbor distances and indices.
///
/// Both arrays have length `n - m + 1`. Where `profile[i]` is finite,
/// `profile_index[i]` is the index of the minimizing neighbor and
/// `|i - profile_index[i]| > exclusion_radius` holds. Where no valid
/// neighbor exists (series of degenerate windows), `profile[i]` is
/// `f64::INFINITY` and `profile_index[i]` is [`UNDEFINED_INDEX`].
#[derive(Debug, Clone, Serialize)]
pub struct MatrixProfile {
    /// Nearest-neighbor distance for each subsequence.
    pub profile: Vec<f64>,
    /// Index of the nearest neighbor for each subsequence.
    pub profile_index: Vec<usize>,
    /// Subsequence length used.
    pub m: usize,
    /// Exclusion radius used.
    pub exclusion_radius: usize,
}

impl MatrixProfile {
    /// Create a profile with every entry undefined.
    pub fn new(n_subs: usize, m: usize, exclusion_radius: usize) -> Self {
        Self {
            profile: vec![f64::INFINITY; n_subs],
            profile_index: vec![UNDEFINED_INDEX; n_subs],
            m,
            exclusion_radius,
        }
    }

    pub fn len(&self) -> usize {
        self.profile.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profile.is_empty()
    }

    /// Whether window `i` has a valid nearest neighbor.
    pub fn is_defined(&self, i: usize) -> bool {
        self.profile[i].is_finite()
    }

    /// Iterate over `(index, distance)` for the defined entries only.
    pub fn defined(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.profile
            .iter()
            .enumerate()
            .filter(|(_, d)| d.is_finite())
            .map(|(i, &d)| (i, d))
    }
}

/// Rolling mean and standard deviation for all subsequences of length `m`.
///
/// Single pass over cumulative sums and sums-of-squares. The standard
/// deviation here is the population std (ddof=0), which is what the
/// z-normalized distance formula is defined over.
#[derive(Debug, Clone)]
pub struct RollingStats {
    pub mean: Vec<f64>,
    pub std: Vec<f64>,
    /// Precomputed `1 / (sqrt(m) * sigma)` per subsequence; zero marks a
    /// degenerate (constant) subsequence. Lets the inner loop compute
    /// `r = (QT - m*mu_i*mu_j) * m_sigma_inv[i] * m_sigma_inv[j]` without
    /// division.
    pub m_sigma_inv: Vec<f64>,
    /// Whether any subsequence is degenerate (sigma == 0).
    pub has_degenerate: bool,
}

impl RollingStats {
    pub fn compute(ts: &[f64], m: usize) -> Self {
        debug_assert!(m >= 2, "window below minimum");
        debug_assert!(ts.len() >= m, "series shorter than window");

        let n = ts.len();
        let n_subs = n - m + 1;

        let mut cumsum = vec![0.0; n + 1];
        let mut cumsum_sq = vec![0.0; n + 1];
        for i in 0..n {
            cumsum[i + 1] = cumsum[i] + ts[i];
            cumsum_sq[i + 1] = cumsum_sq[i] + ts[i] * ts[i];
        }

        let mut mean = vec![0.0; n_subs];
        let mut std = vec![0.0; n_subs];
        let mut m_sigma_inv = vec![0.0; n_subs];
        let mut has_degenerate = false;

        let m_f = m as f64;
        let sqrt_m = m_f.sqrt();
        for i in 0..n_subs {
            let sum = cumsum[i + m] - cumsum[i];
            let sum_sq = cumsum_sq[i + m] - cumsum_sq[i];
            let mu = sum / m_f;
            // E[X^2] - E[X]^2, clamped for numerical stability
            let var = (sum_sq / m_f - mu * mu).max(0.0);
            let sigma = var.sqrt();
            mean[i] = mu;
            std[i] = sigma;
            if sigma < 1e-15 {
                m_sigma_inv[i] = 0.0;
                has_degenerate = true;
            } else {
                m_sigma_inv[i] = 1.0 / (sqrt_m * sigma);
            }
        }

        Self {
            mean,
            std,
            m_sigma_inv,
            has_degenerate,
        }
    }
}

/// A single entry in the profile accumulator: the best negated Pearson
/// correlation seen so far (lower = closer match) and its neighbor index.
#[derive(Clone, Copy)]
pub(crate) struct AccEntry {
    pub neg_corr: f64,
    pub index: usize,
}

/// Accumulator for diagonal STOMP, working in the correlation domain.
///
/// Converted to a `MatrixProfile` at the end, which defers the per-element
/// sqrt to a single O(n) pass. The replacement rule is lexicographic on
/// `(neg_corr, neighbor)`, so equal-distance ties resolve to the smallest
/// neighbor index no matter the traversal or merge order.
pub(crate) struct ProfileAccumulator {
    pub entries: Vec<AccEntry>,
}

impl ProfileAccumulator {
    pub fn new(n: usize) -> Self {
        Self {
            entries: vec![
                AccEntry {
                    neg_corr: f64::INFINITY,
                    index: UNDEFINED_INDEX,
                };
                n
            ],
        }
    }

    #[inline(always)]
    pub fn update(&mut self, idx: usize, neg_corr: f64, neighbor: usize) {
        let e = &mut self.entries[idx];
        if neg_corr < e.neg_corr || (neg_corr == e.neg_corr && neighbor < e.index) {
            e.neg_corr = neg_corr;
            e.index = neighbor;
        }
    }

    /// Merge another accumulator into this one under the same
    /// `(neg_corr, index)` order, keeping parallel reductions deterministic.
    #[cfg(feature = "parallel")]
    pub fn merge(&mut self, other: &Self) {
        for (a, b) in self.entries.iter_mut().zip(other.entries.iter()) {
            if b.neg_corr < a.neg_corr || (b.neg_corr == a.neg_corr && b.index < a.index) {
                *a = *b;
            }
        }
    }

    /// Convert negated correlations to distances and write into `mp`.
    ///
    /// Entries never updated stay undefined: infinity maps to infinity
    /// through `convert`, and the index sentinel passes through untouched.
    pub fn write_to_matrix_profile(&self, mp: &mut MatrixProfile, convert: impl Fn(f64) -> f64) {
        for (i, e) in self.entries.iter().enumerate() {
            mp.profile[i] = convert(e.neg_corr);
            mp.profile_index[i] = e.index;
        }
    }
}
