//! Serializes refresh cycles.
//!
//! The coordinator is `Idle`, `Refreshing` or `Stopped`, held in a single atomic.
//! A refresh only runs if it wins the `Idle -> Refreshing` compare-and-swap; a
//! trigger that loses is dropped rather than queued. The state returns to `Idle`
//! when the [`RefreshGuard`] is dropped, unless [`RefreshCoordinator::stop`] moved
//! it to `Stopped` in the meantime. Because only the guard holder renders, the
//! presenter mutex is never contended.

use crate::circle::BuildFetcher;
use crate::error::RefreshError;
use crate::model::{self, DisplayModel};
use crate::project::ProjectRef;
use crate::tui::Presenter;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Mutex, PoisonError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum RefreshState {
    Idle = 0,
    Refreshing = 1,
    Stopped = 2,
}

impl RefreshState {
    fn from_u8(v: u8) -> Self {
        match v {
            0 => RefreshState::Idle,
            1 => RefreshState::Refreshing,
            _ => RefreshState::Stopped,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    Timer,
    Resize,
    Manual,
}

#[derive(Debug)]
pub enum RefreshOutcome {
    Rendered { rows: usize },
    /// Another refresh was already in flight.
    Dropped,
    Stopped,
    Failed(RefreshError),
}

pub struct RefreshCoordinator<P> {
    state: AtomicU8,
    project: ProjectRef,
    fetcher: BuildFetcher,
    presenter: Mutex<P>,
}

/// Held for the duration of one refresh cycle.
pub struct RefreshGuard<'a> {
    state: &'a AtomicU8,
}

impl Drop for RefreshGuard<'_> {
    fn drop(&mut self) {
        // Fails if stop() ran mid-cycle, which must stay terminal.
        let _ = self.state.compare_exchange(
            RefreshState::Refreshing as u8,
            RefreshState::Idle as u8,
            Ordering::AcqRel,
            Ordering::Acquire,
        );
    }
}

impl<P: Presenter> RefreshCoordinator<P> {
    pub fn new(project: ProjectRef, fetcher: BuildFetcher, presenter: P) -> Self {
        Self {
            state: AtomicU8::new(RefreshState::Idle as u8),
            project,
            fetcher,
            presenter: Mutex::new(presenter),
        }
    }

    pub fn state(&self) -> RefreshState {
        RefreshState::from_u8(self.state.load(Ordering::Acquire))
    }

    /// Claims the single refresh slot, or reports the state that prevented it.
    pub fn try_begin(&self) -> Result<RefreshGuard<'_>, RefreshState> {
        self.state
            .compare_exchange(
                RefreshState::Idle as u8,
                RefreshState::Refreshing as u8,
                Ordering::AcqRel,
                Ordering::Acquire,
            )
            .map(|_| RefreshGuard { state: &self.state })
            .map_err(RefreshState::from_u8)
    }

    /// Runs fetch, build and render once, unless a cycle is already running.
    pub async fn refresh(&self, trigger: Trigger) -> RefreshOutcome {
        let _guard = match self.try_begin() {
            Ok(guard) => guard,
            Err(RefreshState::Stopped) => return RefreshOutcome::Stopped,
            Err(_) => {
                tracing::debug!(?trigger, "refresh in flight, dropping trigger");
                return RefreshOutcome::Dropped;
            }
        };

        let raws = match self.fetcher.fetch(&self.project).await {
            Ok(raws) => raws,
            Err(e) => {
                tracing::warn!(?trigger, "refresh failed: {e}");
                return RefreshOutcome::Failed(e.into());
            }
        };

        let model = model::build(&self.project, &raws);
        match self.draw(&model, trigger) {
            Ok(()) => RefreshOutcome::Rendered {
                rows: model.rows.len(),
            },
            Err(e) => {
                tracing::warn!(?trigger, "render failed: {e}");
                RefreshOutcome::Failed(e.into())
            }
        }
    }

    fn draw(&self, model: &DisplayModel, trigger: Trigger) -> std::io::Result<()> {
        let mut presenter = self.presenter.lock().unwrap_or_else(PoisonError::into_inner);
        if trigger == Trigger::Resize {
            presenter.clear()?;
        }
        presenter.render(model)
    }

    /// Moves to `Stopped` from any state. Returns the state it replaced.
    ///
    /// An in-flight refresh is not interrupted; it finishes and leaves the
    /// coordinator stopped.
    pub fn stop(&self) -> RefreshState {
        RefreshState::from_u8(self.state.swap(RefreshState::Stopped as u8, Ordering::AcqRel))
    }

    /// Gives direct access to the presenter, e.g. to restore the terminal on exit.
    pub fn with_presenter<R>(&self, f: impl FnOnce(&mut P) -> R) -> R {
        let mut presenter = self.presenter.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut presenter)
    }
}
