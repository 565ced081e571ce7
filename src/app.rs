//! Main event loop: turns timer, resize and key events into refresh triggers.

use crate::coordinator::{RefreshCoordinator, RefreshOutcome, Trigger};
use crate::events::AppEvent;
use crate::input::{self, Action};
use crate::ticker::Ticker;
use crate::tui::Presenter;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::{JoinError, JoinSet};

#[derive(Debug, PartialEq, Eq)]
pub enum ExitReason {
    /// The user pressed `q` or Ctrl+C.
    Quit,
    /// Every event sender went away.
    EventsClosed,
    /// The terminal stopped delivering input.
    InputClosed(String),
}

/// Dispatches events until quit, then stops the timer and the coordinator and
/// waits for any refresh still in flight.
///
/// Each trigger is handed to its own task so a slow fetch never blocks input;
/// the coordinator drops triggers that arrive while a refresh is running.
pub async fn run<P: Presenter + 'static>(
    coordinator: Arc<RefreshCoordinator<P>>,
    events: &mut mpsc::UnboundedReceiver<AppEvent>,
    ticker: &Ticker,
) -> ExitReason {
    let mut inflight = JoinSet::new();

    let reason = loop {
        while let Some(done) = inflight.try_join_next() {
            report(done);
        }

        let Some(event) = events.recv().await else {
            break ExitReason::EventsClosed;
        };

        let trigger = match event {
            AppEvent::Tick => Trigger::Timer,
            AppEvent::Resize { width, height } => {
                tracing::debug!(width, height, "terminal resized");
                Trigger::Resize
            }
            AppEvent::Key(key) => match input::map_key(key) {
                Action::Quit => break ExitReason::Quit,
                Action::Refresh => Trigger::Manual,
                Action::None => continue,
            },
            AppEvent::InputClosed(reason) => {
                tracing::warn!("input closed: {reason}");
                break ExitReason::InputClosed(reason);
            }
        };

        let coordinator = coordinator.clone();
        inflight.spawn(async move { coordinator.refresh(trigger).await });
    };

    ticker.stop();
    let previous = coordinator.stop();
    tracing::info!(?reason, ?previous, "shutting down");

    while let Some(done) = inflight.join_next().await {
        report(done);
    }
    reason
}

fn report(done: Result<RefreshOutcome, JoinError>) {
    match done {
        Ok(RefreshOutcome::Rendered { rows }) => tracing::debug!(rows, "refresh rendered"),
        Ok(RefreshOutcome::Dropped | RefreshOutcome::Stopped) => {}
        // Already logged by the coordinator.
        Ok(RefreshOutcome::Failed(_)) => {}
        Err(e) if e.is_panic() => tracing::error!("refresh task panicked: {e}"),
        Err(e) => tracing::warn!("refresh task cancelled: {e}"),
    }
}
