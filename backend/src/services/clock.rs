//! Sources of "now" for the banner.

use std::sync::atomic::{AtomicI64, Ordering};

use crate::models::UtcMillis;

pub trait Clock: Send + Sync {
    fn now_millis(&self) -> UtcMillis;
}

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> UtcMillis {
        chrono::Utc::now().timestamp_millis()
    }
}

/// Clock that only moves when told to.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: AtomicI64,
}

impl ManualClock {
    pub fn new(now: UtcMillis) -> Self {
        Self {
            now: AtomicI64::new(now),
        }
    }

    pub fn set(&self, now: UtcMillis) {
        self.now.store(now, Ordering::SeqCst);
    }

    pub fn advance(&self, millis: i64) {
        self.now.fetch_add(millis, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_millis(&self) -> UtcMillis {
        self.now.load(Ordering::SeqCst)
    }
}

/// Wall-clock time anchored at `origin` and advanced by tokio's clock.
///
/// Under `tokio::time::pause` this follows the paused runtime clock, which
/// keeps ticker tests deterministic.
#[derive(Debug, Clone, Copy)]
pub struct TokioClock {
    origin_millis: UtcMillis,
    origin: tokio::time::Instant,
}

impl TokioClock {
    pub fn starting_at(origin_millis: UtcMillis) -> Self {
        Self {
            origin_millis,
            origin: tokio::time::Instant::now(),
        }
    }
}

impl Clock for TokioClock {
    fn now_millis(&self) -> UtcMillis {
        let elapsed = self.origin.elapsed().as_millis();
        self.origin_millis
            .saturating_add(i64::try_from(elapsed).unwrap_or(i64::MAX))
    }
}

impl<C: Clock + ?Sized> Clock for std::sync::Arc<C> {
    fn now_millis(&self) -> UtcMillis {
        (**self).now_millis()
    }
}
