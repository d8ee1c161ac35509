//! Tick sources that pace a poller.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::{self, Instant, Interval, MissedTickBehavior};

/// What wakes a poller for its next cycle.
#[derive(Debug)]
pub enum TickSource {
    /// Fixed-period timer.
    Interval(Interval),
    /// Ticks fired by a [`ManualTrigger`].
    Manual(mpsc::UnboundedReceiver<()>),
}

impl TickSource {
    /// Tick every `period`, first tick one period from now.
    pub fn interval(period: Duration) -> Self {
        let mut interval = time::interval_at(Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        Self::Interval(interval)
    }

    /// Tick only when the returned trigger fires.
    pub fn manual() -> (Self, ManualTrigger) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self::Manual(rx), ManualTrigger { tx })
    }

    /// Wait for the next tick. Returns false once the source is exhausted.
    pub async fn tick(&mut self) -> bool {
        match self {
            Self::Interval(interval) => {
                interval.tick().await;
                true
            }
            Self::Manual(rx) => rx.recv().await.is_some(),
        }
    }
}

/// Fires ticks of a manual [`TickSource`].
#[derive(Debug, Clone)]
pub struct ManualTrigger {
    tx: mpsc::UnboundedSender<()>,
}

impl ManualTrigger {
    /// Queue one tick. Returns false if the poller has stopped.
    pub fn fire(&self) -> bool {
        self.tx.send(()).is_ok()
    }
}
