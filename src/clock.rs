//! Sleep abstraction used for approval pacing.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

/// Source of delays. Production code sleeps on the tokio timer; tests
/// substitute an implementation that returns immediately.
pub trait Clock: Send + Sync {
    /// Wait for `duration` to elapse.
    fn sleep(&self, duration: Duration) -> Pin<Box<dyn Future<Output = ()> + Send + '_>>;
}

/// [`Clock`] backed by [`tokio::time::sleep`].
#[derive(Debug, Default, Clone, Copy)]
pub struct TokioClock;

impl Clock for TokioClock {
    fn sleep(&self, duration: Duration) -> Pin<Box<dyn Future<Output = ()> + Send + '_>> {
        Box::pin(tokio::time::sleep(duration))
    }
}
