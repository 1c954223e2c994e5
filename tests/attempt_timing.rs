//! Attempt timing on the wall clock. The runtime starts paused, so sleeps auto-advance virtual
//! time and the assertions below are deterministic.
use cadence::{Attempt, Regular, Strategy};
use std::time::Duration;
use tokio::time::Instant;

const MARGIN: Duration = Duration::from_millis(10);

fn assert_near(got: Duration, want: Duration, what: &str) {
    let lo = want.saturating_sub(MARGIN);
    let hi = want + MARGIN;
    assert!(got >= lo && got <= hi, "{what}: want {want:?} got {got:?}");
}

#[tokio::test(start_paused = true)]
async fn regular_attempts_follow_delay_until_budget() {
    let strategy = Regular::new(Duration::from_millis(250), Duration::from_millis(100));
    let want = [0u64, 100, 200, 200].map(Duration::from_millis);

    let t0 = Instant::now();
    let mut got = Vec::with_capacity(want.len());
    let mut attempt = Attempt::start(&strategy);
    while attempt.next().await {
        got.push(t0.elapsed());
    }
    got.push(t0.elapsed());

    assert_eq!(got.len(), want.len());
    for (i, (got, want)) in got.into_iter().zip(want).enumerate() {
        assert_near(got, want, &format!("attempt {i}"));
    }
    assert_eq!(attempt.count(), 3);
}

#[tokio::test(start_paused = true)]
async fn zero_strategy_grants_exactly_one_attempt() {
    let mut attempt = Regular::default().start();
    assert!(attempt.next().await);
    assert!(!attempt.next().await);

    let mut attempt = Regular::default().start();
    assert!(attempt.next().await);
    assert!(!attempt.has_next().await);
    assert!(!attempt.next().await);
}

#[tokio::test(start_paused = true)]
async fn has_next_is_memoized_across_sleeps() {
    let mut attempt = Regular::new(Duration::from_millis(200), Duration::ZERO).start();
    assert!(attempt.next().await);
    assert!(attempt.has_next().await);
    tokio::time::sleep(Duration::from_millis(200)).await;
    // the budget is now spent, but the wait for this position already happened
    assert!(attempt.has_next().await);
    assert!(attempt.next().await);
    assert!(!attempt.next().await);
    assert_eq!(attempt.count(), 2);
}

#[tokio::test(start_paused = true)]
async fn min_floor_overrides_spent_budget() {
    let mut attempt = Regular::new(Duration::from_millis(100), Duration::ZERO).with_min(2).start();
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert!(attempt.next().await);
    assert!(attempt.has_next().await);
    assert!(attempt.next().await);
    assert!(!attempt.has_next().await);
    assert!(!attempt.next().await);
    assert_eq!(attempt.count(), 2);
}

#[tokio::test(start_paused = true)]
async fn has_next_decides_between_retry_and_give_up() {
    let strategy = Regular::new(Duration::from_secs(1), Duration::from_millis(250));
    let mut attempt = strategy.start();
    let mut failures = 0;
    let mut gave_up = false;
    while attempt.next().await {
        // every call fails and is retryable
        failures += 1;
        if attempt.has_next().await {
            continue;
        }
        gave_up = true;
    }
    assert!(gave_up);
    assert_eq!(failures, 4);
    assert_eq!(attempt.count(), 4);
}

#[tokio::test(start_paused = true)]
async fn slow_loop_body_does_not_push_schedule_back() {
    let strategy = Regular::new(Duration::from_secs(10), Duration::from_secs(1));
    let t0 = Instant::now();
    let mut attempt = strategy.start();
    let mut starts = Vec::new();
    while attempt.next().await && attempt.count() <= 3 {
        starts.push(t0.elapsed());
        // body takes 600ms of the 1s slot
        tokio::time::sleep(Duration::from_millis(600)).await;
    }
    let want = [0u64, 1000, 2000].map(Duration::from_millis);
    assert_eq!(starts.len(), want.len());
    for (i, (got, want)) in starts.into_iter().zip(want).enumerate() {
        assert_near(got, want, &format!("attempt {i}"));
    }
}
