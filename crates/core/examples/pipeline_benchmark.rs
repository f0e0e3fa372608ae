//! Lightweight decode/validate benchmark harness for local baselines.
//!
//! Run from repository root:
//! `cargo run -p gs1_pharma_core --example pipeline_benchmark --release`
//!
//! Extra payloads can be supplied one per line in the file named by
//! `GS1_BENCH_FILE`.

use std::fs;
use std::time::Instant;

use gs1_pharma_core::{Policy, decode, validate_scan};

fn run_benchmark(label: &str, input: &str, policy: &Policy, iterations: usize) {
    let decode_start = Instant::now();
    for _ in 0..iterations {
        let _ = decode(input);
    }
    let decode_elapsed = decode_start.elapsed();

    let validate_start = Instant::now();
    for _ in 0..iterations {
        let _ = validate_scan(input, policy);
    }
    let validate_elapsed = validate_start.elapsed();

    println!("Benchmark: {label}");
    println!("  input_bytes: {}", input.len());
    println!(
        "  decode:   total={:?}, per_iter={:.3} us",
        decode_elapsed,
        decode_elapsed.as_secs_f64() * 1e6 / iterations as f64
    );
    println!(
        "  validate: total={:?}, per_iter={:.3} us",
        validate_elapsed,
        validate_elapsed.as_secs_f64() * 1e6 / iterations as f64
    );
}

fn main() -> Result<(), String> {
    let iterations = std::env::var("GS1_BENCH_ITERS")
        .ok()
        .and_then(|v| v.parse::<usize>().ok())
        .filter(|v| *v > 0)
        .unwrap_or(100_000);
    let policy = Policy::default();

    let mut samples: Vec<(String, String)> = vec![
        (
            "parenthesized".into(),
            "(01)08699550011111(21)0000000000010158(10)173350(17)271229".into(),
        ),
        (
            "concatenated".into(),
            "01086995500111112100000000000101581727122910173350".into(),
        ),
        (
            "gs_separated".into(),
            "]d20108699550011111172712291012A34B\u{1d}21XYZ987654".into(),
        ),
    ];

    if let Ok(path) = std::env::var("GS1_BENCH_FILE") {
        let text = fs::read_to_string(&path)
            .map_err(|e| format!("failed to read payloads '{path}': {e}"))?;
        samples.extend(
            text.lines()
                .enumerate()
                .filter(|(_, l)| !l.trim().is_empty())
                .map(|(i, l)| (format!("{path}:{}", i + 1), l.to_string())),
        );
    }

    for (label, input) in &samples {
        run_benchmark(label, input, &policy, iterations);
    }

    Ok(())
}
