use chrono::{DateTime, Duration, TimeZone, Utc};
use volmotif::{
    best_motif, compute_matrix_profile, label_regimes, log_returns, worst_discord,
    MatrixProfileConfig, RegimeConfig, RegimeLabel, RegimeReporter, RegimeSummary, TimeSeries,
};

fn minute_stamps(n: usize) -> Vec<DateTime<Utc>> {
    let base = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
    (0..n).map(|i| base + Duration::minutes(i as i64)).collect()
}

/// Synthetic log-returns: chaotic background, one repeated 8-sample
/// pattern (indices 40 and 200) and one volatility burst (120..135).
fn crafted_returns(n: usize) -> Vec<f64> {
    let mut returns: Vec<f64> = (0..n)
        .map(|i| {
            let t = i as f64;
            ((t * t) * 0.029).sin() * 0.004
        })
        .collect();

    let pattern = [0.012, -0.008, 0.015, 0.002, -0.011, 0.007, -0.013, 0.009];
    returns[40..48].copy_from_slice(&pattern);
    returns[200..208].copy_from_slice(&pattern);

    for v in returns.iter_mut().take(135).skip(120) {
        *v *= 8.0;
    }
    returns
}

#[test]
fn test_full_pipeline_from_closes() {
    let n = 300;
    let planted = crafted_returns(n);

    // Walk the returns into a close-price path, then let the pipeline
    // recover them
    let mut closes = Vec::with_capacity(n + 1);
    closes.push(100.0);
    for r in &planted {
        let last = *closes.last().unwrap();
        closes.push(last * r.exp());
    }
    let close_series = TimeSeries::new(minute_stamps(n + 1), closes).unwrap();
    let returns = log_returns(&close_series).unwrap();

    assert_eq!(returns.len(), n);
    for (got, want) in returns.values().iter().zip(planted.iter()) {
        assert!((got - want).abs() < 1e-9);
    }

    // Motif discovery over the recovered returns
    let mp = compute_matrix_profile(&returns, &MatrixProfileConfig::new(8)).unwrap();
    let motif = best_motif(&mp).unwrap();
    assert_eq!((motif.index_a, motif.index_b), (40, 200));
    assert!(motif.distance < 1e-4, "got {}", motif.distance);

    let discord = worst_discord(&mp).unwrap();
    for (_, d) in mp.defined() {
        assert!(discord.distance >= d);
    }

    // Regime labels over the same series, joined by the reporter
    let labels = label_regimes(&returns, &RegimeConfig::new(8)).unwrap();
    assert_eq!(labels.len(), returns.len());
    let reporter = RegimeReporter::new(&returns, &labels).unwrap();

    let report = reporter.motif(&motif);
    assert_eq!(report.first.index, 40);
    assert_eq!(report.first.start, returns.timestamp(40));
    assert_eq!(report.second.start, returns.timestamp(200));
    assert!(report.first.regime.is_some());
    assert!(report.second.regime.is_some());

    // The burst region ranks in the top volatility bucket
    assert_eq!(labels[130], Some(RegimeLabel::HighVol));

    let discord_report = reporter.discord(&discord);
    assert_eq!(discord_report.occurrence.start, returns.timestamp(discord.index));
}

#[test]
fn test_regime_partition_over_returns() {
    let n = 300;
    let returns = TimeSeries::new(minute_stamps(n), crafted_returns(n)).unwrap();
    let labels = label_regimes(&returns, &RegimeConfig::new(12)).unwrap();
    let summary = RegimeSummary::from_labels(&labels);

    // Warm-up: min_periods defaults to max(2, 12/3) = 4
    assert_eq!(summary.undefined, 3);
    assert_eq!(summary.low + summary.normal + summary.high + summary.undefined, n);

    // All three buckets populated, with low/high bounded by the 33/66
    // cut-point definition (boundary ties can only shrink them)
    let defined = (n - summary.undefined) as f64;
    assert!(summary.low > 0);
    assert!(summary.normal > 0);
    assert!(summary.high > 0);
    assert!((summary.low as f64) <= 0.34 * defined + 1.0);
    assert!((summary.high as f64) <= 0.35 * defined + 1.0);

    // Shares add up over defined entries
    let total_share = summary.share(RegimeLabel::LowVol)
        + summary.share(RegimeLabel::Normal)
        + summary.share(RegimeLabel::HighVol);
    assert!((total_share - 1.0).abs() < 1e-12);
}
