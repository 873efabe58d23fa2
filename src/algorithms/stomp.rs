use tracing::debug;

use crate::algorithms::common::sliding_dot_product;
use crate::core::distance_metric::DistanceMetric;
use crate::core::matrix_profile::{MatrixProfile, MatrixProfileConfig, ProfileAccumulator};
use crate::error::Result;

/// Minimum number of subsequences before dispatching to parallel STOMP.
/// Below this, thread-dispatch overhead exceeds parallelism gains.
#[cfg(feature = "parallel")]
const MIN_PARALLEL_SUBS: usize = 256;

/// Compute the self-join matrix profile with the STOMP algorithm.
///
/// STOMP exploits the relation between consecutive dot products along a
/// diagonal of the (never materialized) pairwise-distance matrix:
///
/// `QT[p][p+k] = QT[p-1][p+k-1] - T[p-1]*T[p+k-1] + T[p+m-1]*T[p+k+m-1]`
///
/// giving O(1) updates per pair and O(n^2) total, independent of `m`.
/// Diagonal `k` holds the pairs `(p, p+k)`; skipping diagonals
/// `k <= exclusion_radius` implements the trivial-match zone, and each
/// pair updates both endpoints, so symmetry comes for free.
///
/// The inner loop runs in the correlation domain (negated Pearson
/// correlations; one O(n) sqrt pass at the end). Degenerate zero-variance
/// windows never produce or receive updates, leaving their entries
/// undefined. For fixed input the output is bit-for-bit reproducible:
/// every pair is computed on exactly one diagonal with the same
/// arithmetic, and the `(value, index)` replacement order makes the
/// parallel merge independent of thread scheduling.
pub fn stomp<M: DistanceMetric>(ts: &[f64], config: &MatrixProfileConfig) -> Result<MatrixProfile> {
    config.validate(ts.len())?;

    let m = config.m;
    let n = ts.len();
    let n_subs = n - m + 1;
    let exclusion_radius = config.exclusion_radius();
    debug!(n, m, n_subs, exclusion_radius, "computing matrix profile");

    let ctx = M::precompute(ts, m);
    let (mean, m_sigma_inv, has_degenerate) = M::correlation_data(&ctx);

    let qt_first = sliding_dot_product(&ts[0..m], ts);
    let m_f = m as f64;
    let m_mean: Vec<f64> = mean.iter().map(|&mu| m_f * mu).collect();

    let cx = CorrCtx {
        ts,
        m,
        n_subs,
        qt_first: &qt_first,
        mean,
        m_sigma_inv,
        m_mean: &m_mean,
    };

    let first_k = exclusion_radius + 1;
    let acc = traverse(&cx, first_k, has_degenerate);

    let mut mp = MatrixProfile::new(n_subs, m, exclusion_radius);
    acc.write_to_matrix_profile(&mut mp, |nc| M::corr_to_distance(nc, m));

    if has_degenerate {
        debug!(
            undefined = mp.profile.iter().filter(|d| d.is_infinite()).count(),
            "degenerate windows excluded from candidacy"
        );
    }
    Ok(mp)
}

/// Read-only context shared by the diagonal scans.
struct CorrCtx<'a> {
    ts: &'a [f64],
    m: usize,
    n_subs: usize,
    qt_first: &'a [f64],
    mean: &'a [f64],
    /// `m * mean[i]`, hoisted out of the inner loop.
    m_mean: &'a [f64],
    m_sigma_inv: &'a [f64],
}

#[cfg(not(feature = "parallel"))]
fn traverse(cx: &CorrCtx<'_>, first_k: usize, has_degenerate: bool) -> ProfileAccumulator {
    let mut acc = ProfileAccumulator::new(cx.n_subs);
    scan_diagonals(cx, first_k, cx.n_subs, has_degenerate, &mut acc);
    acc
}

#[cfg(feature = "parallel")]
fn traverse(cx: &CorrCtx<'_>, first_k: usize, has_degenerate: bool) -> ProfileAccumulator {
    use rayon::prelude::*;

    if cx.n_subs < MIN_PARALLEL_SUBS {
        let mut acc = ProfileAccumulator::new(cx.n_subs);
        scan_diagonals(cx, first_k, cx.n_subs, has_degenerate, &mut acc);
        return acc;
    }

    let n_threads = rayon::current_num_threads();
    let ranges = diagonal_ranges(first_k, cx.n_subs, n_threads);

    let locals: Vec<ProfileAccumulator> = ranges
        .into_par_iter()
        .map(|(start_k, end_k)| {
            let mut acc = ProfileAccumulator::new(cx.n_subs);
            scan_diagonals(cx, start_k, end_k, has_degenerate, &mut acc);
            acc
        })
        .collect();

    let mut combined = ProfileAccumulator::new(cx.n_subs);
    for local in &locals {
        combined.merge(local);
    }
    combined
}

fn scan_diagonals(
    cx: &CorrCtx<'_>,
    start_k: usize,
    end_k: usize,
    has_degenerate: bool,
    acc: &mut ProfileAccumulator,
) {
    for k in start_k..end_k {
        if has_degenerate {
            scan_diagonal_with_degenerates(cx, k, acc);
        } else {
            scan_diagonal(cx, k, acc);
        }
    }
}

/// Scan one diagonal, no degenerate windows anywhere in the series.
///
/// Branch-free inner loop: `mul_add` fuses the QT recurrence and the
/// correlation into FMA instructions, and the p=0 element is hoisted so
/// the loop body carries no initialization check.
#[inline]
fn scan_diagonal(cx: &CorrCtx<'_>, k: usize, acc: &mut ProfileAccumulator) {
    let CorrCtx {
        ts,
        m,
        n_subs,
        qt_first,
        mean,
        m_mean,
        m_sigma_inv,
    } = *cx;
    let diag_len = n_subs - k;

    let mut qt = qt_first[k];
    let neg_r = m_mean[0].mul_add(mean[k], -qt) * m_sigma_inv[0] * m_sigma_inv[k];
    acc.update(0, neg_r, k);
    acc.update(k, neg_r, 0);

    for p in 1..diag_len {
        let j = p + k;
        qt = (-ts[p - 1]).mul_add(ts[j - 1], qt);
        qt = ts[p + m - 1].mul_add(ts[j + m - 1], qt);

        let neg_r = m_mean[p].mul_add(mean[j], -qt) * m_sigma_inv[p] * m_sigma_inv[j];
        acc.update(p, neg_r, j);
        acc.update(j, neg_r, p);
    }
}

/// Scan one diagonal when degenerate windows exist.
///
/// Pairs touching a degenerate window (`m_sigma_inv == 0`) produce no
/// update; the QT recurrence still advances through them so later pairs
/// on the diagonal stay correct.
#[inline]
fn scan_diagonal_with_degenerates(cx: &CorrCtx<'_>, k: usize, acc: &mut ProfileAccumulator) {
    let CorrCtx {
        ts,
        m,
        n_subs,
        qt_first,
        mean,
        m_mean,
        m_sigma_inv,
    } = *cx;
    let diag_len = n_subs - k;

    let mut qt = qt_first[k];
    if m_sigma_inv[0] != 0.0 && m_sigma_inv[k] != 0.0 {
        let neg_r = m_mean[0].mul_add(mean[k], -qt) * m_sigma_inv[0] * m_sigma_inv[k];
        acc.update(0, neg_r, k);
        acc.update(k, neg_r, 0);
    }

    for p in 1..diag_len {
        let j = p + k;
        qt = (-ts[p - 1]).mul_add(ts[j - 1], qt);
        qt = ts[p + m - 1].mul_add(ts[j + m - 1], qt);

        let si = m_sigma_inv[p];
        let sj = m_sigma_inv[j];
        if si != 0.0 && sj != 0.0 {
            let neg_r = m_mean[p].mul_add(mean[j], -qt) * si * sj;
            acc.update(p, neg_r, j);
            acc.update(j, neg_r, p);
        }
    }
}

/// Partition diagonals `[first_k, n_subs)` into load-balanced chunks.
///
/// Diagonal `k` has length `n_subs - k`, so earlier diagonals carry more
/// work. Chunk boundaries come from a binary search over the analytic
/// cumulative-work formula, giving each chunk approximately equal total
/// pair count.
#[cfg(feature = "parallel")]
fn diagonal_ranges(first_k: usize, n_subs: usize, n_chunks: usize) -> Vec<(usize, usize)> {
    let n_diags = n_subs.saturating_sub(first_k);
    if n_diags == 0 || n_chunks == 0 {
        return vec![];
    }
    let n_chunks = n_chunks.min(n_diags);

    // Work in the first i diagonals: i*n_diags - i*(i-1)/2
    let cumwork = |i: usize| -> usize { i * n_diags - i * i.saturating_sub(1) / 2 };
    let total_work = cumwork(n_diags);

    let mut ranges = Vec::with_capacity(n_chunks);
    let mut prev = 0usize;

    for c in 1..=n_chunks {
        let target = if c == n_chunks {
            n_diags
        } else {
            let threshold = (c as f64 * total_work as f64 / n_chunks as f64).round() as usize;
            let mut lo = prev;
            let mut hi = n_diags;
            while lo < hi {
                let mid = lo + (hi - lo) / 2;
                if cumwork(mid) >= threshold {
                    hi = mid;
                } else {
                    lo = mid + 1;
                }
            }
            lo
        };

        if target > prev {
            ranges.push((first_k + prev, first_k + target));
        }
        prev = target;
    }

    ranges
}
