//! Tracking the median response time of a handful of requests
//!
//! Build a [`P2Estimator`], push each latency through it as it arrives, then read the estimate

use psquare::P2Estimator;

/// Response times in milliseconds, in arrival order
///
/// A real service would feed these from its request handler instead of a constant.
/// Sorted, the middle value is 23.0
const LATENCIES_MS: [f64; 11] = [
    21.0, 19.5, 240.0, 23.0, 22.4, 18.9, 25.1, 31.7, 20.2, 24.8, 26.3,
];

fn main() -> psquare::Result<()> {
    let mut median = P2Estimator::default();

    for latency in LATENCIES_MS {
        median.add(latency)?;
    }

    // One slow outlier barely moves the median
    match median.estimate() {
        Some(ms) => println!("Median latency over {} requests: {ms:.1}ms", median.count()),
        None => println!("Need at least five requests for an estimate"),
    }

    Ok(())
}
