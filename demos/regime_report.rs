//! End-to-end walkthrough: close prices -> log-returns -> matrix profile
//! -> motif/discord -> volatility regimes -> joined report.
//!
//! Run with: cargo run --release --example regime_report

use chrono::{DateTime, Duration, TimeZone, Utc};
use volmotif::{
    best_motif, compute_matrix_profile, label_regimes, log_returns, worst_discord,
    MatrixProfileConfig, RegimeConfig, RegimeLabel, RegimeReporter, TimeSeries,
};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    // Synthetic minute bars: calm / volatile / calm price path with a
    // repeated intraday pattern
    let n = 600;
    let m = 20;
    let base = Utc.with_ymd_and_hms(2024, 6, 3, 0, 0, 0).unwrap();
    let stamps: Vec<DateTime<Utc>> = (0..n).map(|i| base + Duration::minutes(i as i64)).collect();

    let mut step_returns: Vec<f64> = (0..n - 1)
        .map(|i| {
            let t = i as f64;
            let amp = if (200..400).contains(&i) { 0.012 } else { 0.002 };
            amp * ((t * t) * 0.023).sin()
        })
        .collect();
    let pattern: Vec<f64> = (0..m)
        .map(|i| 0.006 * ((i as f64 / m as f64) * std::f64::consts::TAU).cos())
        .collect();
    step_returns[60..60 + m].copy_from_slice(&pattern);
    step_returns[480..480 + m].copy_from_slice(&pattern);

    let mut closes = Vec::with_capacity(n);
    closes.push(25_000.0);
    for r in &step_returns {
        let last = *closes.last().unwrap();
        closes.push(last * r.exp());
    }

    let close_series = TimeSeries::new(stamps, closes).expect("uniform synthetic bars");
    let returns = log_returns(&close_series).expect("positive closes");

    let mp = compute_matrix_profile(&returns, &MatrixProfileConfig::new(m))
        .expect("series long enough for window");
    let motif = best_motif(&mp).expect("profile has defined entries");
    let discord = worst_discord(&mp).expect("profile has defined entries");

    let labels = label_regimes(&returns, &RegimeConfig::new(m)).expect("valid regime config");
    let reporter = RegimeReporter::new(&returns, &labels).expect("labels aligned");

    let motif_report = reporter.motif(&motif);
    let discord_report = reporter.discord(&discord);
    let summary = reporter.summary();

    let regime_name =
        |r: Option<RegimeLabel>| r.map(|l| l.as_str()).unwrap_or("warm-up");

    println!("Motif & Regime Report");
    println!("=====================");
    println!(
        "Best motif: d={:.6}\n  {} @ {} [{}]\n  {} @ {} [{}]",
        motif_report.distance,
        motif_report.first.index,
        motif_report.first.start,
        regime_name(motif_report.first.regime),
        motif_report.second.index,
        motif_report.second.start,
        regime_name(motif_report.second.regime),
    );
    println!(
        "Discord: d={:.6}\n  {} @ {} [{}]",
        discord_report.distance,
        discord_report.occurrence.index,
        discord_report.occurrence.start,
        regime_name(discord_report.occurrence.regime),
    );
    println!(
        "Regime occupancy: low={} normal={} high={} (warm-up {})",
        summary.low, summary.normal, summary.high, summary.undefined
    );
}
