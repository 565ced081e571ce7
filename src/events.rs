//! Terminal input thread and application event channel.
//!
//! [`EventHandler`] spawns an OS thread (not a tokio task) because
//! `crossterm::event::poll()` blocks. Drop only signals shutdown; the thread
//! notices on its next poll timeout.

use crossterm::event::{self, Event as CrosstermEvent, KeyEvent, KeyEventKind};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;
use tokio::sync::mpsc;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    Key(KeyEvent),
    Resize { width: u16, height: u16 },
    /// Periodic refresh timer fired.
    Tick,
    /// The input thread gave up; the loop should shut down.
    InputClosed(String),
}

pub struct EventHandler {
    rx: mpsc::UnboundedReceiver<AppEvent>,
    tx: mpsc::UnboundedSender<AppEvent>,
    shutdown: Arc<AtomicBool>,
    thread: Option<JoinHandle<()>>,
}

impl EventHandler {
    /// `poll_timeout` bounds how long shutdown can go unnoticed.
    pub fn new(poll_timeout: Duration) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let event_tx = tx.clone();
        let shutdown = Arc::new(AtomicBool::new(false));
        let shutdown_flag = shutdown.clone();

        let thread = std::thread::spawn(move || {
            while !shutdown_flag.load(Ordering::Relaxed) {
                match event::poll(poll_timeout) {
                    Ok(false) => continue,
                    Ok(true) => {}
                    Err(e) => {
                        let _ = event_tx.send(AppEvent::InputClosed(format!("terminal poll error: {e}")));
                        break;
                    }
                }
                let forwarded = match event::read() {
                    Ok(CrosstermEvent::Key(key)) if key.kind == KeyEventKind::Press => {
                        Some(AppEvent::Key(key))
                    }
                    Ok(CrosstermEvent::Resize(width, height)) => Some(AppEvent::Resize { width, height }),
                    Ok(_) => None,
                    Err(e) if e.kind() == std::io::ErrorKind::Interrupted => None,
                    Err(e) => {
                        let _ = event_tx.send(AppEvent::InputClosed(format!("terminal read error: {e}")));
                        break;
                    }
                };
                if let Some(ev) = forwarded {
                    if event_tx.send(ev).is_err() {
                        break;
                    }
                }
            }
        });

        Self {
            rx,
            tx,
            shutdown,
            thread: Some(thread),
        }
    }

    pub fn sender(&self) -> mpsc::UnboundedSender<AppEvent> {
        self.tx.clone()
    }

    pub fn receiver_mut(&mut self) -> &mut mpsc::UnboundedReceiver<AppEvent> {
        &mut self.rx
    }

    pub fn stop(&mut self) {
        self.shutdown.store(true, Ordering::Relaxed);
        if let Some(handle) = self.thread.take() {
            if handle.join().is_err() {
                tracing::error!("input thread panicked");
            }
        }
    }
}

impl Drop for EventHandler {
    fn drop(&mut self) {
        self.shutdown.store(true, Ordering::Relaxed);
    }
}
