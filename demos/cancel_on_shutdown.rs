//! Abort a long retry loop from another task.
use cadence::prelude::*;
use std::time::Duration;

#[tokio::main]
async fn main() {
    let (shutdown, signal) = stop_signal();
    let strategy = Regular::new(Duration::from_secs(60), Duration::from_secs(5));

    let worker = tokio::spawn(async move {
        let mut attempt = strategy.attempt().with_stop(signal).start();
        while attempt.next().await {
            println!("attempt {}: service still unavailable", attempt.count());
        }
        attempt
    });

    tokio::time::sleep(Duration::from_millis(200)).await;
    println!("shutting down");
    shutdown.stop();

    let attempt = worker.await.expect("worker task");
    println!("stopped={} after {} attempts", attempt.stopped(), attempt.count());
}
