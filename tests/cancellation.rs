use cadence::{stop_signal, Exponential, ManualClock, Regular, Strategy, Termination};
use std::time::Duration;

#[tokio::test]
async fn stop_raised_up_front_allows_only_first_attempt() {
    let (handle, signal) = stop_signal();
    handle.stop();

    let looper = tokio::spawn(async move {
        let strategy = Regular::new(Duration::from_secs(30), Duration::from_secs(5));
        let mut attempt = strategy.attempt().with_stop(signal).start();
        let mut n = 0;
        while attempt.next().await {
            assert_eq!(n, 0, "unexpected second attempt");
            n += 1;
        }
        (n, attempt.termination())
    });

    let (n, termination) = tokio::time::timeout(Duration::from_secs(1), looper)
        .await
        .expect("attempt loop abort")
        .expect("task ok");
    assert_eq!(n, 1);
    assert_eq!(termination, Some(Termination::Stopped));
}

#[tokio::test]
async fn stop_from_another_task_interrupts_wait() {
    let (handle, signal) = stop_signal();
    let clock = ManualClock::new();
    let strategy = Exponential::new(Duration::from_secs(60), 2.0).unwrap();

    let loop_clock = clock.clone();
    let looper = tokio::spawn(async move {
        let mut attempt = strategy.attempt().with_clock(loop_clock).with_stop(signal).start();
        let mut n = 0;
        while attempt.next().await {
            n += 1;
        }
        (n, attempt.stopped())
    });

    // first attempt runs, then the loop parks on a 60s virtual sleep that never elapses
    clock.wait_for_sleepers(1).await;
    handle.stop();

    let (n, stopped) = tokio::time::timeout(Duration::from_secs(1), looper)
        .await
        .expect("stop interrupts the wait")
        .expect("task ok");
    assert_eq!(n, 1);
    assert!(stopped);
    assert!(handle.is_stopped(), "signal stays raised after being observed");
}

#[tokio::test]
async fn one_signal_stops_many_attempts() {
    let (handle, signal) = stop_signal();
    let clock = ManualClock::new();
    let strategy = Regular::new(Duration::from_secs(3600), Duration::from_secs(60));

    let loopers: Vec<_> = (0..4)
        .map(|_| {
            let signal = signal.clone();
            let clock = clock.clone();
            let strategy = strategy;
            tokio::spawn(async move {
                let mut attempt = strategy.attempt().with_clock(clock).with_stop(signal).start();
                while attempt.next().await {}
                attempt.count()
            })
        })
        .collect();

    clock.wait_for_sleepers(4).await;
    handle.stop();

    for looper in futures::future::join_all(loopers).await {
        assert_eq!(looper.expect("task ok"), 1);
    }
    assert!(signal.is_stopped());
}

#[tokio::test]
async fn stop_after_loop_distinguishes_cancel_from_exhaustion() {
    let (handle, signal) = stop_signal();
    let mut attempt = Regular::default().attempt().with_stop(signal.clone()).start();
    while attempt.next().await {}
    assert_eq!(attempt.termination(), Some(Termination::Exhausted));

    // raising the signal afterwards does not rewrite history
    handle.stop();
    assert!(signal.is_stopped());
    assert!(!attempt.stopped());
    assert!(!attempt.next().await);
}
