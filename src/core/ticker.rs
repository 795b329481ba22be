use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender, TryRecvError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickSignal;

/// Periodic timer that sends a [`TickSignal`] every `interval`.
///
/// The timer thread lives as long as the `Ticker`. Stopping or dropping it
/// wakes the thread immediately and joins it, so no signal is delivered
/// after teardown.
#[derive(Debug)]
pub struct Ticker {
    signals: Receiver<TickSignal>,
    stop_tx: Option<Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl Ticker {
    pub fn start(interval: Duration) -> Self {
        let (signal_tx, signals) = mpsc::channel::<TickSignal>();
        let (stop_tx, stop_rx) = mpsc::channel::<()>();

        let handle = thread::spawn(move || loop {
            match stop_rx.recv_timeout(interval) {
                Err(RecvTimeoutError::Timeout) => {
                    if signal_tx.send(TickSignal).is_err() {
                        break;
                    }
                }
                Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
            }
        });
        debug!(interval_ms = interval.as_millis() as u64, "ticker started");

        Self {
            signals,
            stop_tx: Some(stop_tx),
            handle: Some(handle),
        }
    }

    pub fn is_running(&self) -> bool {
        self.handle.is_some()
    }

    /// Number of ticks that fired since the last call, without blocking.
    pub fn drain(&self) -> usize {
        let mut count = 0;
        loop {
            match self.signals.try_recv() {
                Ok(TickSignal) => count += 1,
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        count
    }

    /// Blocks until the next tick, or returns `false` once stopped.
    pub fn wait(&self) -> bool {
        self.is_running() && self.signals.recv().is_ok()
    }

    pub fn stop(&mut self) {
        if let Some(stop_tx) = self.stop_tx.take() {
            let _ = stop_tx.send(());
        }
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
            debug!("ticker stopped");
        }
        // Anything already queued belongs to the torn-down view.
        while self.signals.try_recv().is_ok() {}
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.stop();
    }
}
