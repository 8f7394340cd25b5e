use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Stop signal for long-running stages: an explicit flag, an optional
/// timeout, or both. Clones share the same flag.
///
/// The timeout only runs once [`start`](Self::start) is called at the
/// beginning of the stage it bounds.
#[derive(Debug, Clone, Default)]
pub struct Cancellation {
    flag: Arc<AtomicBool>,
    timeout: Option<Duration>,
    deadline: Option<Instant>,
}

impl Cancellation {
    /// A signal that never fires unless [`cancel`](Self::cancel) is called.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            timeout: Some(timeout),
            ..Self::default()
        }
    }

    /// A clone sharing the flag whose deadline is `timeout` from now.
    #[must_use]
    pub fn start(&self) -> Self {
        Self {
            flag: Arc::clone(&self.flag),
            timeout: self.timeout,
            deadline: self
                .timeout
                .and_then(|timeout| Instant::now().checked_add(timeout)),
        }
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
            || self.deadline.is_some_and(|deadline| Instant::now() >= deadline)
    }
}
