//! A more fully-fledged example, showcasing a custom quantile and other methods on [`P2Estimator`]

use psquare::{Error, P2Estimator};

/// Some sample latencies, in milliseconds, to calculate the p90 for
///
/// In practice, this will probably be a much larger stream
const DATA: [f64; 15] = [
    12.1, 14.8, 11.9, 13.3, 97.4, 12.7, 15.2, 13.9, 12.2, 41.0, 13.1, 12.8, 14.4, 16.0, 12.5,
];

fn main() -> psquare::Result<()> {
    // Quantiles must lie strictly between 0 and 1
    match P2Estimator::new(1.5) {
        Err(Error::InvalidQuantile { quantile }) => println!("Rejected quantile {quantile}"),
        other => println!("Unexpected result: {other:?}"),
    }

    let mut estimator = P2Estimator::new(0.9)?;

    for data_point in DATA {
        estimator.add(data_point)?;

        // The estimate only means something once five points have arrived
        match estimator.estimate() {
            Some(p90) => println!("p90 after {} points: {p90}", estimator.count()),
            None => println!("Still filling: {:?}", estimator.phase()),
        }
    }

    // Non-finite observations are rejected, and leave the estimator as it was
    if let Err(err) = estimator.add(f64::NAN) {
        println!("{err}");
    }

    // The extremes are tracked exactly
    println!(
        "Observed range: {:?} to {:?}",
        estimator.min(),
        estimator.max()
    );

    if let Some(markers) = estimator.markers() {
        println!("Marker heights: {:?}", markers.heights);
        println!("Marker positions: {:?}", markers.positions);
    }

    Ok(())
}
