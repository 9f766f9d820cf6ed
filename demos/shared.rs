//! An example recording latencies from several threads into one [`SharedEstimator`]

use std::{sync::Arc, thread};

use psquare::SharedEstimator;

fn main() -> psquare::Result<()> {
    let p99 = Arc::new(SharedEstimator::new(0.99)?);

    let workers: Vec<_> = (0..4u32)
        .map(|worker| {
            let p99 = Arc::clone(&p99);
            thread::spawn(move || -> psquare::Result<()> {
                // Pretend each worker handles requests with a slowly growing latency
                for request in 0..2500u32 {
                    let latency = f64::from(worker + request % 100) * 1.5;
                    p99.add(latency)?;
                }
                Ok(())
            })
        })
        .collect();

    for worker in workers {
        match worker.join() {
            Ok(result) => result?,
            Err(_) => eprintln!("Worker panicked"),
        }
    }

    println!(
        "p99 latency over {} requests: {:?}",
        p99.count(),
        p99.estimate()
    );

    Ok(())
}
