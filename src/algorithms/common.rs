use realfft::RealFftPlanner;

/// Size threshold (n * m) above which the FFT path is dispatched. Below
/// it, the naive O(n*m) loop wins on constant overhead.
const FFT_THRESHOLD: usize = 256 * 1024;

/// Sliding dot product between a query subsequence `q` and the series `ts`.
///
/// Element `i` of the result is `dot(q, ts[i..i+m])`; the result has
/// length `ts.len() - q.len() + 1`. Dispatches to an FFT-based
/// O(n log n) implementation for large inputs.
pub fn sliding_dot_product(q: &[f64], ts: &[f64]) -> Vec<f64> {
    debug_assert!(ts.len() >= q.len(), "series shorter than query");
    if ts.len() * q.len() > FFT_THRESHOLD {
        sliding_dot_product_fft(q, ts)
    } else {
        sliding_dot_product_naive(q, ts)
    }
}

/// Naive O(n*m) sliding dot product.
pub fn sliding_dot_product_naive(q: &[f64], ts: &[f64]) -> Vec<f64> {
    let m = q.len();
    let n_subs = ts.len() - m + 1;
    (0..n_subs)
        .map(|i| q.iter().zip(&ts[i..i + m]).map(|(a, b)| a * b).sum())
        .collect()
}

/// FFT-based O(n log n) sliding dot product via cross-correlation: convolve
/// the reversed query with the series and read the dot products off the
/// overlap region.
pub fn sliding_dot_product_fft(q: &[f64], ts: &[f64]) -> Vec<f64> {
    let m = q.len();
    let n = ts.len();
    let n_subs = n - m + 1;
    let fft_len = (n + m - 1).next_power_of_two();

    let mut planner = RealFftPlanner::<f64>::new();
    let forward = planner.plan_fft_forward(fft_len);
    let inverse = planner.plan_fft_inverse(fft_len);

    let mut q_padded = vec![0.0; fft_len];
    for (dst, src) in q_padded.iter_mut().zip(q.iter().rev()) {
        *dst = *src;
    }
    let mut ts_padded = vec![0.0; fft_len];
    ts_padded[..n].copy_from_slice(ts);

    let mut q_spectrum = forward.make_output_vec();
    let mut ts_spectrum = forward.make_output_vec();
    forward.process(&mut q_padded, &mut q_spectrum).unwrap();
    forward.process(&mut ts_padded, &mut ts_spectrum).unwrap();

    for (qv, tv) in q_spectrum.iter_mut().zip(ts_spectrum.iter()) {
        *qv *= tv;
    }

    let mut conv = vec![0.0; fft_len];
    inverse.process(&mut q_spectrum, &mut conv).unwrap();

    // realfft's inverse is unnormalized
    let norm = 1.0 / fft_len as f64;
    conv[m - 1..m - 1 + n_subs].iter().map(|&x| x * norm).collect()
}

/// Mask profile entries within `zone` of `idx` to infinity.
///
/// Used by greedy top-k extraction to eliminate a found motif/discord and
/// its overlapping neighbors from further consideration.
#[inline]
pub fn apply_exclusion_zone(profile: &mut [f64], idx: usize, zone: usize) {
    let start = idx.saturating_sub(zone);
    let end = (idx + zone + 1).min(profile.len());
    for val in &mut profile[start..end] {
        *val = f64::INFINITY;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sliding_dot_product_simple() {
        // q = [1,2] against [1,2,3,4]: 5, 8, 11
        let result = sliding_dot_product(&[1.0, 2.0], &[1.0, 2.0, 3.0, 4.0]);
        assert_eq!(result.len(), 3);
        assert!((result[0] - 5.0).abs() < 1e-10);
        assert!((result[1] - 8.0).abs() < 1e-10);
        assert!((result[2] - 11.0).abs() < 1e-10);
    }

    #[test]
    fn test_sliding_dot_product_full_overlap() {
        let q = [3.0, 4.0, 5.0];
        let result = sliding_dot_product(&q, &q);
        assert_eq!(result.len(), 1);
        assert!((result[0] - 50.0).abs() < 1e-10); // 9 + 16 + 25
    }

    #[test]
    fn test_fft_vs_naive_equivalence() {
        for (n, m) in [(100, 10), (1000, 50), (5000, 100)] {
            let ts: Vec<f64> = (0..n).map(|i| (i as f64 * 0.1).sin()).collect();
            let q = &ts[0..m];
            let naive = sliding_dot_product_naive(q, &ts);
            let fft = sliding_dot_product_fft(q, &ts);
            assert_eq!(naive.len(), fft.len());
            for (i, (a, b)) in naive.iter().zip(fft.iter()).enumerate() {
                assert!(
                    (a - b).abs() < 1e-6,
                    "mismatch at {i} (n={n}, m={m}): naive={a}, fft={b}"
                );
            }
        }
    }

    #[test]
    fn test_fft_small_case() {
        let result = sliding_dot_product_fft(&[1.0, 2.0], &[1.0, 2.0, 3.0, 4.0]);
        assert_eq!(result.len(), 3);
        assert!((result[0] - 5.0).abs() < 1e-10);
        assert!((result[1] - 8.0).abs() < 1e-10);
        assert!((result[2] - 11.0).abs() < 1e-10);
    }

    #[test]
    fn test_exclusion_zone_masking() {
        let mut profile = vec![1.0; 10];
        apply_exclusion_zone(&mut profile, 5, 2);
        for (i, &val) in profile.iter().enumerate() {
            if (3..=7).contains(&i) {
                assert!(val.is_infinite());
            } else {
                assert!((val - 1.0).abs() < 1e-10);
            }
        }

        // Clamped at the boundary
        let mut profile = vec![1.0; 5];
        apply_exclusion_zone(&mut profile, 0, 2);
        assert!(profile[0].is_infinite());
        assert!(profile[1].is_infinite());
        assert!(profile[2].is_infinite());
        assert!(profile[3].is_finite());
    }
}
