use std::panic::AssertUnwindSafe;
use std::time::Duration;

/// Periodic maintenance task tied to its owner's lifetime: dropping the
/// handle aborts the task.
pub struct SweeperHandle {
    handle: tokio::task::JoinHandle<()>,
}

impl SweeperHandle {
    pub fn spawn<F>(period: Duration, pass: F) -> Self
    where
        F: Fn() + Send + 'static,
    {
        let handle = tokio::spawn(async move {
            let start = tokio::time::Instant::now() + period;
            let mut ticker = tokio::time::interval_at(start, period);
            loop {
                ticker.tick().await;
                // A panicking pass must not kill the ticker.
                if std::panic::catch_unwind(AssertUnwindSafe(|| pass())).is_err() {
                    tracing::error!(target: "gatebase::sweep", "sweep pass panicked");
                }
            }
        });
        Self { handle }
    }

    pub fn abort(&self) {
        self.handle.abort();
    }
}

impl Drop for SweeperHandle {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
