/// Distance metric used by the self-join profile engine.
///
/// Static polymorphism: the engine is generic over `M: DistanceMetric`,
/// so the inner loop monomorphizes and inlines. The associated `Context`
/// holds statistics precomputed once per series (rolling means/stds),
/// avoiding per-pair recomputation in the O(n^2) traversal.
///
/// The self-join runs in the correlation domain: the inner loop accumulates
/// negated Pearson correlations and a single O(n) pass converts them to
/// distances at the end, so every metric must supply both the QT-based
/// distance and the correlation data.
pub trait DistanceMetric: Clone + Send + Sync {
    /// Precomputed per-series statistics.
    type Context: Clone + Send + Sync;

    /// Precompute context from a series and subsequence length.
    fn precompute(ts: &[f64], m: usize) -> Self::Context;

    /// Direct O(m) distance between the subsequences starting at `i` and
    /// `j`. Slow path; the tests use it as the oracle against the profile.
    fn distance(ts: &[f64], i: usize, j: usize, m: usize, ctx: &Self::Context) -> f64;

    /// Convert a sliding dot product between windows `i` and `j` into a
    /// distance.
    fn qt_to_distance(qt: f64, i: usize, j: usize, m: usize, ctx: &Self::Context) -> f64;

    /// Correlation-domain data for the diagonal traversal:
    /// `(mean, m_sigma_inv, has_degenerate)` where `m_sigma_inv[i]` is
    /// `1 / (sqrt(m) * sigma_i)`, zero marking a degenerate (zero-variance)
    /// subsequence that must be excluded from candidacy.
    fn correlation_data(ctx: &Self::Context) -> (&[f64], &[f64], bool);

    /// Map an accumulated negated correlation back to a distance.
    /// Must map `f64::INFINITY` to `f64::INFINITY` so never-matched entries
    /// stay undefined.
    fn corr_to_distance(neg_corr: f64, m: usize) -> f64;
}
