//! Retry a flaky operation with exponential backoff for up to two seconds.
use cadence::prelude::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

static CALLS: AtomicUsize = AtomicUsize::new(0);

fn flaky() -> Result<&'static str, std::io::Error> {
    if CALLS.fetch_add(1, Ordering::SeqCst) < 3 {
        Err(std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "not yet"))
    } else {
        Ok("hello from cadence")
    }
}

fn should_retry(err: &std::io::Error) -> bool {
    err.kind() == std::io::ErrorKind::ConnectionRefused
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt().with_max_level(tracing::Level::DEBUG).init();

    let strategy =
        Exponential::new(Duration::from_millis(50), 1.5)?.limit_time(Duration::from_secs(2));

    let mut attempt = strategy.start();
    while attempt.next().await {
        match flaky() {
            Ok(value) => {
                println!("{} (after {} attempts)", value, attempt.count());
                return Ok(());
            }
            Err(e) if should_retry(&e) && attempt.has_next().await => {
                println!("attempt {} failed: {}", attempt.count(), e);
            }
            Err(e) => return Err(e.into()),
        }
    }
    Err("retry budget exhausted".into())
}
