use super::RateGate;
use crate::errors::AuthError;
use crate::model::GateOutcome;
use crate::sweep::SweeperHandle;
use async_trait::async_trait;
use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

struct Bucket {
    remaining: u32,
    last_refill: Instant,
}

/// One token bucket per key, refilled to full capacity whenever a whole
/// window has elapsed since the last refill. Admission for different keys
/// never contends: each bucket carries its own lock.
pub struct FixedWindowLimiter {
    buckets: RwLock<HashMap<String, Arc<Mutex<Bucket>>>>,
    capacity: u32,
    window: Duration,
}

impl FixedWindowLimiter {
    pub fn new(capacity: u32, window: Duration) -> Self {
        Self {
            buckets: RwLock::new(HashMap::new()),
            capacity,
            window,
        }
    }

    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    pub fn tracked(&self) -> usize {
        self.buckets.read().len()
    }

    /// Admission check against an explicit clock. The public `RateGate`
    /// implementation passes `Instant::now()`; tests pass synthetic instants.
    pub fn check_at(&self, key: &str, now: Instant) -> GateOutcome {
        let bucket = self.bucket_for(key, now);
        let mut bucket = bucket.lock();

        if now.duration_since(bucket.last_refill) >= self.window {
            bucket.remaining = self.capacity;
            bucket.last_refill = now;
        }

        if bucket.remaining > 0 {
            bucket.remaining -= 1;
            GateOutcome::Admitted
        } else {
            GateOutcome::Rejected {
                capacity: self.capacity,
                window: self.window,
            }
        }
    }

    /// Drops buckets idle for longer than twice the window. Returns how many
    /// were evicted.
    pub fn sweep_once(&self, now: Instant) -> usize {
        let idle_after = self.window * 2;
        let mut buckets = self.buckets.write();
        let before = buckets.len();
        buckets.retain(|_, bucket| now.duration_since(bucket.lock().last_refill) <= idle_after);
        before - buckets.len()
    }

    pub fn spawn_sweeper(self: &Arc<Self>) -> SweeperHandle {
        let limiter = Arc::clone(self);
        SweeperHandle::spawn(self.window * 2, move || {
            let evicted = limiter.sweep_once(Instant::now());
            if evicted > 0 {
                tracing::debug!(target: "gatebase::quota", evicted, "evicted idle buckets");
            }
        })
    }

    fn bucket_for(&self, key: &str, now: Instant) -> Arc<Mutex<Bucket>> {
        if let Some(bucket) = self.buckets.read().get(key) {
            return bucket.clone();
        }

        let mut buckets = self.buckets.write();
        // Re-check: another caller may have created the bucket between locks.
        if let Some(bucket) = buckets.get(key) {
            return bucket.clone();
        }

        let bucket = Arc::new(Mutex::new(Bucket {
            remaining: self.capacity,
            last_refill: now,
        }));
        buckets.insert(key.to_string(), bucket.clone());
        bucket
    }
}

#[async_trait]
impl RateGate for FixedWindowLimiter {
    async fn check(&self, method: &str, identifier: &str) -> Result<GateOutcome, AuthError> {
        Ok(self.check_at(&format!("{method}:{identifier}"), Instant::now()))
    }
}

/// Per-method override limiters over a shared default.
pub struct MethodRateLimiter {
    overrides: HashMap<String, Arc<FixedWindowLimiter>>,
    default_gate: Arc<FixedWindowLimiter>,
}

impl MethodRateLimiter {
    pub fn new(default_capacity: u32, default_window: Duration) -> Self {
        Self {
            overrides: HashMap::new(),
            default_gate: Arc::new(FixedWindowLimiter::new(default_capacity, default_window)),
        }
    }

    pub fn with_method_limit(
        mut self,
        method: impl Into<String>,
        capacity: u32,
        window: Duration,
    ) -> Self {
        self.overrides.insert(
            method.into(),
            Arc::new(FixedWindowLimiter::new(capacity, window)),
        );
        self
    }

    pub fn gate_for(&self, method: &str) -> &Arc<FixedWindowLimiter> {
        self.overrides.get(method).unwrap_or(&self.default_gate)
    }

    pub fn spawn_sweepers(&self) -> Vec<SweeperHandle> {
        let mut handles = vec![self.default_gate.spawn_sweeper()];
        handles.extend(self.overrides.values().map(|gate| gate.spawn_sweeper()));
        handles
    }
}

#[async_trait]
impl RateGate for MethodRateLimiter {
    async fn check(&self, method: &str, identifier: &str) -> Result<GateOutcome, AuthError> {
        self.gate_for(method).check(method, identifier).await
    }
}
