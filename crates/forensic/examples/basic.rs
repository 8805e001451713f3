//! Basic example demonstrating forensic award scoring
//!
//! Run with: cargo run --example basic -p forensic

use std::sync::Arc;

use chrono::Utc;
use forensic::{
    expected_distribution, DigitProfiler, ForensicConfig, ForensicEngine, Monitor, RawAward,
    ScanStatus, Session, StaticSource,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== forensic Basic Examples ===\n");

    // Regular awards with two suspicious spikes
    let mut awards: Vec<RawAward> = (0..24)
        .map(|i| {
            RawAward::new(
                format!("N{:05}", i),
                format!("Supplier {}", i),
                18_000.0 + (i as f64 * 3_137.0) % 45_000.0,
            )
        })
        .collect();
    awards.push(RawAward::new("N99001", "Overrun Dynamics", 8_400_000.0));
    awards.push(RawAward::new("N99002", "Sole Source Ltd", 12_750_000.0));

    // 1. Annotate
    println!("1. Isolation forest (contamination=0.06, seed=42)");
    let config = ForensicConfig::default();
    let engine = ForensicEngine::new(config.detector.clone())?;
    let annotated = engine.annotate(&awards);
    for t in annotated.iter().filter(|t| t.is_outlier) {
        println!("   {} {:<20} {:>14.2}", t.id, t.recipient_name, t.amount);
    }
    println!("   {} of {} flagged\n", annotated.outlier_count(), annotated.len());

    // 2. Benford profile
    println!("2. Leading digits vs Benford");
    let profiler = DigitProfiler::from_digits(annotated.iter().map(|t| t.leading_digit));
    let expected = expected_distribution();
    for (digit, observed) in profiler.distribution().iter() {
        println!("   {}: observed {:.3}, expected {:.3}", digit, observed, expected.get(digit));
    }
    println!("   chi-squared: {:.3}\n", profiler.chi_squared(&expected));

    // 3. Replay
    println!("3. Replay (first 30 ticks)");
    let session = Arc::new(Session::from_source(&StaticSource::new(awards), &config)?);
    let mut monitor = Monitor::new(session);
    for _ in 0..30 {
        let frame = monitor.tick(Utc::now());
        if let Some(entry) = frame.feed.last() {
            if entry.status != ScanStatus::Passed {
                println!("   tick {:>2}: {:<9} {}", frame.tick, entry.status, entry.name);
            }
        }
    }
    let frame = monitor.frame();
    println!("   Capital analyzed: {}", frame.capital_display);
    println!("   Ledger entries:   {}", frame.ledger_count);

    println!("\n=== Examples Complete ===");
    Ok(())
}
