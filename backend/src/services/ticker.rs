//! Periodic banner refresh.
//!
//! Spawns a tokio task that recomputes the banner frame on a fixed cadence
//! and hands it to a sink. The task ends when the handle is cancelled or
//! dropped, when the sink asks to stop, or when the banner reaches a state
//! it will not leave (dismissed, period over).

use log::{debug, error};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use super::banner::{BannerController, BannerFrame};
use super::clock::Clock;
use crate::db::KeyValueStore;

/// Why a ticker task finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickerExit {
    /// The handle was cancelled or dropped.
    Cancelled,
    /// The sink returned `false`.
    SinkClosed,
    /// The last frame was terminal (dismissed, period over, empty schedule).
    Finished,
    /// The task panicked, most likely inside the sink.
    Panicked,
}

pub struct TickerHandle {
    cancel: Option<oneshot::Sender<()>>,
    join: JoinHandle<TickerExit>,
}

impl TickerHandle {
    /// Ask the task to stop. Idempotent.
    pub fn cancel(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            let _ = cancel.send(());
        }
    }

    /// Wait for the task to end without cancelling it.
    pub async fn join(self) -> TickerExit {
        let TickerHandle { cancel, join } = self;
        let result = join.await;
        drop(cancel);
        match result {
            Ok(exit) => exit,
            Err(e) if e.is_panic() => {
                error!("Banner ticker task panicked: {}", e);
                TickerExit::Panicked
            }
            Err(e) => {
                debug!("Banner ticker task aborted: {}", e);
                TickerExit::Cancelled
            }
        }
    }
}

/// Spawn the refresh loop. The first frame is produced immediately.
pub fn spawn_banner_ticker<S, C, F>(
    controller: Arc<Mutex<BannerController<S>>>,
    clock: C,
    period: Duration,
    mut sink: F,
) -> TickerHandle
where
    S: KeyValueStore + 'static,
    C: Clock + 'static,
    F: FnMut(&BannerFrame) -> bool + Send + 'static,
{
    let (cancel_tx, mut cancel_rx) = oneshot::channel::<()>();

    let join = tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = &mut cancel_rx => {
                    debug!("Banner ticker cancelled");
                    return TickerExit::Cancelled;
                }
                _ = interval.tick() => {
                    let frame = controller.lock().frame(clock.now_millis());
                    if !sink(&frame) {
                        return TickerExit::SinkClosed;
                    }
                    if frame.is_terminal() {
                        debug!("Banner ticker finished: {:?}", frame.decision);
                        return TickerExit::Finished;
                    }
                }
            }
        }
    });

    TickerHandle {
        cancel: Some(cancel_tx),
        join,
    }
}
