use gatebase_auth::prelude::*;
use std::sync::Arc;
use std::time::{Duration, Instant};

#[test]
fn admissions_exhaust_capacity_within_one_window() {
    let limiter = FixedWindowLimiter::new(2, Duration::from_secs(60));
    let now = Instant::now();

    assert_eq!(limiter.check_at("op:user:u1", now), GateOutcome::Admitted);
    assert_eq!(limiter.check_at("op:user:u1", now), GateOutcome::Admitted);
    assert_eq!(
        limiter.check_at("op:user:u1", now),
        GateOutcome::Rejected {
            capacity: 2,
            window: Duration::from_secs(60)
        }
    );
}

#[test]
fn window_elapse_resets_the_bucket_to_full_capacity() {
    let window = Duration::from_secs(60);
    let limiter = FixedWindowLimiter::new(2, window);
    let now = Instant::now();

    for _ in 0..2 {
        assert_eq!(limiter.check_at("op:user:u1", now), GateOutcome::Admitted);
    }
    assert!(matches!(
        limiter.check_at("op:user:u1", now),
        GateOutcome::Rejected { .. }
    ));

    // Past the window the bucket refills, and the admission itself consumes
    // one token: exactly capacity - 1 remain.
    let later = now + window + Duration::from_secs(1);
    assert_eq!(limiter.check_at("op:user:u1", later), GateOutcome::Admitted);
    assert_eq!(limiter.check_at("op:user:u1", later), GateOutcome::Admitted);
    assert!(matches!(
        limiter.check_at("op:user:u1", later),
        GateOutcome::Rejected { .. }
    ));
}

#[test]
fn distinct_identifiers_never_share_a_bucket() {
    let limiter = FixedWindowLimiter::new(1, Duration::from_secs(60));
    let now = Instant::now();

    assert_eq!(limiter.check_at("op:user:u1", now), GateOutcome::Admitted);
    assert!(matches!(
        limiter.check_at("op:user:u1", now),
        GateOutcome::Rejected { .. }
    ));
    assert_eq!(limiter.check_at("op:user:u2", now), GateOutcome::Admitted);
    assert_eq!(limiter.check_at("op:ip:10.0.0.1", now), GateOutcome::Admitted);
}

#[tokio::test(flavor = "multi_thread")]
async fn concurrent_identifiers_do_not_interfere() {
    let limiter = Arc::new(FixedWindowLimiter::new(5, Duration::from_secs(60)));

    let mut tasks = Vec::new();
    for caller in 0..8 {
        let limiter = limiter.clone();
        tasks.push(tokio::spawn(async move {
            let identifier = format!("user:u{caller}");
            for _ in 0..5 {
                let outcome = limiter.check("/v1/cart/add", &identifier).await.expect("check");
                assert_eq!(outcome, GateOutcome::Admitted);
            }
            let outcome = limiter.check("/v1/cart/add", &identifier).await.expect("check");
            assert!(matches!(outcome, GateOutcome::Rejected { .. }));
        }));
    }

    for task in tasks {
        task.await.expect("task");
    }
}

#[tokio::test]
async fn method_overrides_fall_back_to_the_default_gate() {
    let limiter = MethodRateLimiter::new(100, Duration::from_secs(900))
        .with_method_limit("/v1/auth/login", 1, Duration::from_secs(60));

    let outcome = limiter.check("/v1/auth/login", "ip:10.0.0.1").await.expect("check");
    assert_eq!(outcome, GateOutcome::Admitted);
    let outcome = limiter.check("/v1/auth/login", "ip:10.0.0.1").await.expect("check");
    assert_eq!(
        outcome,
        GateOutcome::Rejected {
            capacity: 1,
            window: Duration::from_secs(60)
        }
    );

    // The same identifier is unconstrained on non-overridden methods.
    for _ in 0..10 {
        let outcome = limiter.check("/v1/cart/add", "ip:10.0.0.1").await.expect("check");
        assert_eq!(outcome, GateOutcome::Admitted);
    }
}

#[test]
fn sweep_evicts_buckets_idle_past_twice_the_window() {
    let window = Duration::from_secs(60);
    let limiter = FixedWindowLimiter::new(2, window);
    let now = Instant::now();

    limiter.check_at("op:user:u1", now);
    limiter.check_at("op:user:u2", now);
    assert_eq!(limiter.tracked(), 2);

    assert_eq!(limiter.sweep_once(now + window), 0);
    assert_eq!(limiter.tracked(), 2);

    assert_eq!(limiter.sweep_once(now + window * 2 + Duration::from_secs(1)), 2);
    assert_eq!(limiter.tracked(), 0);
}

#[test]
fn sweep_keeps_recently_refilled_buckets() {
    let window = Duration::from_secs(60);
    let limiter = FixedWindowLimiter::new(2, window);
    let now = Instant::now();

    limiter.check_at("op:user:idle", now);
    // Active caller refills its bucket a window later.
    limiter.check_at("op:user:active", now + window + Duration::from_secs(1));

    assert_eq!(limiter.sweep_once(now + window * 2 + Duration::from_secs(1)), 1);
    assert_eq!(limiter.tracked(), 1);
}

#[tokio::test(flavor = "multi_thread")]
async fn background_sweeper_evicts_idle_buckets() {
    let limiter = Arc::new(FixedWindowLimiter::new(2, Duration::from_millis(25)));
    let _sweeper = limiter.spawn_sweeper();

    limiter.check_at("op:user:u1", Instant::now());
    assert_eq!(limiter.tracked(), 1);

    // The sweeper ticks every 2x window; give it a few ticks.
    for _ in 0..20 {
        tokio::time::sleep(Duration::from_millis(25)).await;
        if limiter.tracked() == 0 {
            return;
        }
    }
    panic!("sweeper never evicted the idle bucket");
}
