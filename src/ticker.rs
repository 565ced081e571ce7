//! Periodic refresh timer.
//!
//! Sends [`AppEvent::Tick`] every `period`, starting immediately so the first
//! table appears without waiting a full interval. Missed ticks are skipped, not
//! bunched up, so a slow refresh does not cause a burst afterwards.

use crate::events::AppEvent;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};

pub struct Ticker {
    handle: JoinHandle<()>,
}

impl Ticker {
    pub fn spawn(period: Duration, tx: mpsc::UnboundedSender<AppEvent>) -> Self {
        let handle = tokio::spawn(async move {
            let mut interval = time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                interval.tick().await;
                if tx.send(AppEvent::Tick).is_err() {
                    tracing::debug!("ticker: channel closed");
                    return;
                }
            }
        });
        Self { handle }
    }

    pub fn stop(&self) {
        self.handle.abort();
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
