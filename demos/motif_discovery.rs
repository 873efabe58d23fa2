//! Motif discovery on a synthetic log-return series.
//!
//! A motif is a pair of subsequences that are very similar to each other
//! under z-normalized Euclidean distance. After computing the matrix
//! profile we extract the top-k motifs and the discord.
//!
//! Run with: cargo run --release --example motif_discovery

use volmotif::{find_motifs, worst_discord, EuclideanEngine, MatrixProfileConfig};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    // Synthetic minute log-returns:
    // - chaotic background around +/- 40 bps
    // - a distinctive 30-sample pattern planted at indices 50 and 300
    // - a one-off shock at index 420 (the discord)
    let n = 500;
    let m = 30;

    let mut returns: Vec<f64> = (0..n)
        .map(|i| {
            let t = i as f64;
            ((t * t) * 0.017).sin() * 0.004
        })
        .collect();

    let pattern: Vec<f64> = (0..m)
        .map(|i| {
            let t = i as f64 / m as f64;
            0.012 * (t * std::f64::consts::TAU).sin() * (1.0 - t)
        })
        .collect();
    returns[50..50 + m].copy_from_slice(&pattern);
    returns[300..300 + m].copy_from_slice(&pattern);

    returns[420] = 0.08;
    returns[421] = -0.07;

    let engine = EuclideanEngine::new(MatrixProfileConfig::new(m));
    let mp = engine.compute(&returns).expect("valid synthetic input");

    let motifs = find_motifs(&mp, 3);

    println!("Motif Discovery");
    println!("===============");
    println!("Series length: {n}, window: {m}");
    println!("Found {} motifs:\n", motifs.len());
    for (rank, motif) in motifs.iter().enumerate() {
        println!(
            "  Motif #{}: indices ({}, {}), distance = {:.6}",
            rank + 1,
            motif.index_a,
            motif.index_b,
            motif.distance
        );
    }

    let discord = worst_discord(&mp).expect("profile has defined entries");
    println!(
        "\nDiscord: index {}, nearest-neighbor distance = {:.6}",
        discord.index, discord.distance
    );
}
