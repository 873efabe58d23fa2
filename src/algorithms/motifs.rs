use serde::Serialize;

use crate::algorithms::common::apply_exclusion_zone;
use crate::core::matrix_profile::MatrixProfile;
use crate::error::{Error, Result};

/// A motif pair: the two most similar non-trivially-overlapping windows.
///
/// `index_a < index_b` always holds. Minimality: no other valid pair of
/// windows has a strictly smaller z-normalized distance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MotifPair {
    /// Start index of the earlier occurrence.
    pub index_a: usize,
    /// Start index of the later occurrence.
    pub index_b: usize,
    /// Distance between the two windows.
    pub distance: f64,
}

/// A discord: the window least similar to anything else in the series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Discord {
    /// Start index of the anomalous window.
    pub index: usize,
    /// Distance to its nearest neighbor (high = anomalous).
    pub distance: f64,
}

/// The globally best motif pair.
///
/// Scans for the minimum profile value; on ties the pair with the lowest
/// `index_a` wins. The ascending scan with strict `<` guarantees that:
/// every window participating in a tied-minimal pair itself attains the
/// minimal profile value, so the smallest such index is reached first and
/// its recorded neighbor (already the smallest by the profile's own
/// tie-break) completes the pair.
///
/// Fails with [`Error::EmptyProfile`] when the profile has no defined
/// entries (empty series window set, or every window degenerate).
pub fn best_motif(mp: &MatrixProfile) -> Result<MotifPair> {
    let (i, distance) = scan_min(&mp.profile).ok_or(Error::EmptyProfile)?;
    let j = mp.profile_index[i];

    Ok(MotifPair {
        index_a: i.min(j),
        index_b: i.max(j),
        distance,
    })
}

/// The discord: the defined entry with the largest nearest-neighbor
/// distance. On ties the lowest index wins. Fails with
/// [`Error::EmptyProfile`] when no entry is defined.
pub fn worst_discord(mp: &MatrixProfile) -> Result<Discord> {
    let (index, distance) = scan_max(&mp.profile).ok_or(Error::EmptyProfile)?;

    Ok(Discord { index, distance })
}

/// First finite minimum: strict `<` keeps the lowest index on ties.
fn scan_min(profile: &[f64]) -> Option<(usize, f64)> {
    let mut best: Option<(usize, f64)> = None;
    for (i, &d) in profile.iter().enumerate() {
        if d.is_finite() && best.map_or(true, |(_, bd)| d < bd) {
            best = Some((i, d));
        }
    }
    best
}

/// First finite maximum: strict `>` keeps the lowest index on ties.
fn scan_max(profile: &[f64]) -> Option<(usize, f64)> {
    let mut worst: Option<(usize, f64)> = None;
    for (i, &d) in profile.iter().enumerate() {
        if d.is_finite() && worst.map_or(true, |(_, wd)| d > wd) {
            worst = Some((i, d));
        }
    }
    worst
}

/// Top-k motifs by greedy extraction with exclusion-zone elimination:
/// take the best remaining pair, mask both occurrences and their
/// overlapping neighbors, repeat.
///
/// Returns up to `k` pairs sorted by ascending distance; fewer when the
/// profile runs out of defined entries.
pub fn find_motifs(mp: &MatrixProfile, k: usize) -> Vec<MotifPair> {
    let mut remaining = mp.profile.clone();
    let zone = mp.exclusion_radius;
    let mut motifs = Vec::with_capacity(k);

    for _ in 0..k {
        let Some((i, distance)) = scan_min(&remaining) else {
            break;
        };
        let j = mp.profile_index[i];

        motifs.push(MotifPair {
            index_a: i.min(j),
            index_b: i.max(j),
            distance,
        });

        apply_exclusion_zone(&mut remaining, i, zone);
        apply_exclusion_zone(&mut remaining, j, zone);
    }

    motifs
}

/// Top-k discords by greedy extraction with exclusion-zone elimination.
///
/// Returns up to `k` discords sorted by descending distance.
pub fn find_discords(mp: &MatrixProfile, k: usize) -> Vec<Discord> {
    let mut remaining = mp.profile.clone();
    let zone = mp.exclusion_radius;
    let mut discords = Vec::with_capacity(k);

    for _ in 0..k {
        let Some((index, distance)) = scan_max(&remaining) else {
            break;
        };

        discords.push(Discord { index, distance });
        apply_exclusion_zone(&mut remaining, index, zone);
    }

    discords
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithms::stomp::stomp;
    use crate::core::matrix_profile::MatrixProfileConfig;
    use crate::metrics::euclidean::ZNormalizedEuclidean;

    fn synthetic_profile(profile: Vec<f64>, profile_index: Vec<usize>) -> MatrixProfile {
        let mut mp = MatrixProfile::new(profile.len(), 4, 1);
        mp.profile = profile;
        mp.profile_index = profile_index;
        mp
    }

    #[test]
    fn test_best_motif_planted_pattern() {
        // Distinctive pattern at 0 and 40, chaotic noise in between
        let m = 8;
        let n = 56;
        let mut ts = vec![0.0; n];
        let pattern = [0.0, 1.0, 0.0, -1.0, 0.0, 1.0, 0.0, -1.0];
        ts[0..8].copy_from_slice(&pattern);
        for (i, val) in ts.iter_mut().enumerate().take(40).skip(8) {
            *val = (i as f64).powi(2) * 0.01 + (i as f64 * 1.7).sin() * 3.0;
        }
        ts[40..48].copy_from_slice(&pattern);
        for (i, val) in ts.iter_mut().enumerate().take(n).skip(48) {
            *val = -(i as f64).powi(2) * 0.01 + (i as f64 * 2.3).cos() * 5.0;
        }

        let mp = stomp::<ZNormalizedEuclidean>(&ts, &MatrixProfileConfig::new(m)).unwrap();
        let motif = best_motif(&mp).unwrap();

        assert_eq!((motif.index_a, motif.index_b), (0, 40));
        assert!(motif.distance < 1e-4, "got {}", motif.distance);
    }

    #[test]
    fn test_best_motif_is_global_minimum() {
        let ts: Vec<f64> = (0..200).map(|i| (i as f64 * 0.15).sin()).collect();
        let mp = stomp::<ZNormalizedEuclidean>(&ts, &MatrixProfileConfig::new(10)).unwrap();
        let motif = best_motif(&mp).unwrap();

        for (_, d) in mp.defined() {
            assert!(motif.distance <= d);
        }
    }

    #[test]
    fn test_best_motif_tie_prefers_lowest_index() {
        // Two tied minima at indices 2 and 7
        let mp = synthetic_profile(
            vec![5.0, 4.0, 1.0, 3.0, 6.0, 5.0, 4.0, 1.0, 3.0, 6.0],
            vec![5, 6, 7, 8, 9, 0, 1, 2, 3, 4],
        );
        let motif = best_motif(&mp).unwrap();
        assert_eq!((motif.index_a, motif.index_b), (2, 7));
        assert_eq!(motif.distance, 1.0);
    }

    #[test]
    fn test_worst_discord_flags_anomaly() {
        // Sine wave with a spike injected at index 25
        let mut ts: Vec<f64> = (0..100).map(|i| (i as f64 * 0.2).sin()).collect();
        ts[25] = 10.0;
        ts[26] = -10.0;

        let mp = stomp::<ZNormalizedEuclidean>(&ts, &MatrixProfileConfig::new(8)).unwrap();
        let discord = worst_discord(&mp).unwrap();

        assert!(
            (20..=30).contains(&discord.index),
            "discord at {} should be near the anomaly at 25",
            discord.index
        );
        for (_, d) in mp.defined() {
            assert!(discord.distance >= d);
        }
    }

    #[test]
    fn test_worst_discord_tie_prefers_lowest_index() {
        let mp = synthetic_profile(
            vec![1.0, 9.0, 2.0, 9.0, 1.0],
            vec![4, 3, 0, 1, 0],
        );
        let discord = worst_discord(&mp).unwrap();
        assert_eq!(discord.index, 1);
        assert_eq!(discord.distance, 9.0);
    }

    #[test]
    fn test_extraction_fails_on_undefined_profile() {
        // Freshly-initialized profile: every entry undefined
        let mp = MatrixProfile::new(10, 4, 1);
        assert!(matches!(best_motif(&mp), Err(Error::EmptyProfile)));
        assert!(matches!(worst_discord(&mp), Err(Error::EmptyProfile)));
    }

    #[test]
    fn test_extraction_fails_on_zero_length_profile() {
        let mp = MatrixProfile::new(0, 4, 1);
        assert!(matches!(best_motif(&mp), Err(Error::EmptyProfile)));
        assert!(matches!(worst_discord(&mp), Err(Error::EmptyProfile)));
    }

    #[test]
    fn test_find_motifs_sorted_ascending() {
        let ts: Vec<f64> = (0..200).map(|i| (i as f64 * 0.15).sin()).collect();
        let mp = stomp::<ZNormalizedEuclidean>(&ts, &MatrixProfileConfig::new(10)).unwrap();
        let motifs = find_motifs(&mp, 5);

        assert!(!motifs.is_empty());
        for w in motifs.windows(2) {
            assert!(w[0].distance <= w[1].distance);
        }
        // First greedy pick agrees with the single-result contract
        assert_eq!(motifs[0], best_motif(&mp).unwrap());
    }

    #[test]
    fn test_find_discords_sorted_descending() {
        let ts: Vec<f64> = (0..200).map(|i| (i as f64 * 0.15).sin()).collect();
        let mp = stomp::<ZNormalizedEuclidean>(&ts, &MatrixProfileConfig::new(10)).unwrap();
        let discords = find_discords(&mp, 5);

        assert!(!discords.is_empty());
        for w in discords.windows(2) {
            assert!(w[0].distance >= w[1].distance);
        }
        assert_eq!(discords[0], worst_discord(&mp).unwrap());
    }

    #[test]
    fn test_find_on_empty_profile_returns_nothing() {
        let mp = MatrixProfile::new(10, 4, 1);
        assert!(find_motifs(&mp, 5).is_empty());
        assert!(find_discords(&mp, 5).is_empty());
    }
}
