use crate::core::distance_metric::DistanceMetric;
use crate::core::matrix_profile::RollingStats;

/// Z-normalized Euclidean distance.
///
/// Distance formula: `d = sqrt(2 * m * (1 - r))` where
/// `r = (QT - m * mu_i * mu_j) / (m * sigma_i * sigma_j)` is the Pearson
/// correlation of the two windows. Subtracting each window's own mean and
/// dividing by its own std makes the metric invariant to local offset and
/// scale, which is what lets motifs recur across volatility clusters of
/// different amplitude.
///
/// A degenerate window (zero variance) has no z-normalized form; its
/// distance to anything is undefined (`f64::INFINITY`), which removes it
/// from neighbor candidacy rather than letting it pollute the profile with
/// a fabricated score.
#[derive(Debug, Clone)]
pub struct ZNormalizedEuclidean;

impl DistanceMetric for ZNormalizedEuclidean {
    type Context = RollingStats;

    fn precompute(ts: &[f64], m: usize) -> Self::Context {
        RollingStats::compute(ts, m)
    }

    fn distance(ts: &[f64], i: usize, j: usize, m: usize, ctx: &Self::Context) -> f64 {
        let qt: f64 = ts[i..i + m]
            .iter()
            .zip(&ts[j..j + m])
            .map(|(a, b)| a * b)
            .sum();
        Self::qt_to_distance(qt, i, j, m, ctx)
    }

    fn qt_to_distance(qt: f64, i: usize, j: usize, m: usize, ctx: &Self::Context) -> f64 {
        let msi = ctx.m_sigma_inv[i];
        let msj = ctx.m_sigma_inv[j];

        // Degenerate windows are not candidates
        if msi == 0.0 || msj == 0.0 {
            return f64::INFINITY;
        }

        // r = (QT - m*mu_i*mu_j) * m_sigma_inv[i] * m_sigma_inv[j]
        // where m_sigma_inv = 1/(sqrt(m)*sigma), so the product supplies
        // the 1/(m*sigma_i*sigma_j) denominator
        let m_f = m as f64;
        let r = (qt - m_f * ctx.mean[i] * ctx.mean[j]) * msi * msj;
        let r_clamped = r.clamp(-1.0, 1.0);
        (2.0 * m_f * (1.0 - r_clamped)).max(0.0).sqrt()
    }

    fn correlation_data(ctx: &Self::Context) -> (&[f64], &[f64], bool) {
        (&ctx.mean, &ctx.m_sigma_inv, ctx.has_degenerate)
    }

    fn corr_to_distance(neg_corr: f64, m: usize) -> f64 {
        (2.0 * m as f64 * (1.0 + neg_corr)).max(0.0).sqrt()
    }
}
