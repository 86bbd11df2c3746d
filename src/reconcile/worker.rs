//! Background polling for payment outcomes not delivered by the embedded UI.
//!
//! One thread, two trigger cadences: a fast probe against the gateway for
//! quick resolution and a slow probe against the backend proxy as a
//! backstop. Both cadences feed the same `Reconciler::resolve` call, so the
//! two sources can never race each other over the session.

use std::sync::mpsc;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use crate::storage::Storage;

use super::probe::StatusProbe;
use super::reconciler::{Reconciler, Resolution};

/// Counters from a worker run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ReconcileStats {
    pub fast_polls: usize,
    pub slow_polls: usize,
    pub resolutions: usize,
    pub probe_errors: usize,
}

/// Handle to a running reconciliation worker. Drop or call `stop()` to shut
/// it down.
pub struct ReconcileHandle {
    stop_tx: mpsc::Sender<()>,
    handle: Option<thread::JoinHandle<ReconcileStats>>,
}

impl ReconcileHandle {
    /// Stop the worker and wait for it to finish. Returns stats.
    pub fn stop(mut self) -> ReconcileStats {
        let _ = self.stop_tx.send(());
        if let Some(handle) = self.handle.take() {
            handle.join().unwrap_or_default()
        } else {
            ReconcileStats::default()
        }
    }

    /// Signal stop without waiting.
    pub fn signal_stop(&self) {
        let _ = self.stop_tx.send(());
    }
}

impl Drop for ReconcileHandle {
    fn drop(&mut self) {
        let _ = self.stop_tx.send(());
    }
}

/// Polls transaction status while a payment session is active and the cart
/// is non-empty, and resolves the session when a terminal state appears.
///
/// The fast cadence tolerates a bounded number of consecutive probe errors;
/// after that it disables itself and asks the user to refresh, leaving the
/// session untouched (the failure is in the check, not the payment). Errors
/// on the slow cadence are ignored outright so a flaky proxy can never block
/// the user from checking out again.
pub struct ReconcileWorker<S, F, L> {
    reconciler: Arc<Reconciler<S>>,
    fast: F,
    slow: L,
    fast_every: Duration,
    slow_every: Duration,
    max_retries: u32,
    tick: Duration,
}

impl<S, F, L> ReconcileWorker<S, F, L> {
    pub fn new(reconciler: Arc<Reconciler<S>>, fast: F, slow: L) -> Self {
        ReconcileWorker {
            reconciler,
            fast,
            slow,
            fast_every: Duration::from_secs(5),
            slow_every: Duration::from_secs(30),
            max_retries: 3,
            tick: Duration::from_millis(200),
        }
    }

    /// Set the fast-probe interval.
    pub fn with_fast_interval(mut self, interval: Duration) -> Self {
        self.fast_every = interval;
        self
    }

    /// Set the slow-probe interval.
    pub fn with_slow_interval(mut self, interval: Duration) -> Self {
        self.slow_every = interval;
        self
    }

    /// Set how many consecutive fast-probe errors are tolerated.
    pub fn with_max_retries(mut self, max: u32) -> Self {
        self.max_retries = max;
        self
    }

    /// Set the scheduling granularity of the worker loop.
    pub fn with_tick(mut self, tick: Duration) -> Self {
        self.tick = tick;
        self
    }
}

impl<S, F, L> ReconcileWorker<S, F, L>
where
    S: Storage + 'static,
    F: StatusProbe + 'static,
    L: StatusProbe + 'static,
{
    /// Spawn the worker thread.
    pub fn spawn(self) -> ReconcileHandle {
        let (stop_tx, stop_rx) = mpsc::channel();

        let handle = thread::spawn(move || self.run(stop_rx));

        ReconcileHandle {
            stop_tx,
            handle: Some(handle),
        }
    }

    fn run(self, stop_rx: mpsc::Receiver<()>) -> ReconcileStats {
        let mut stats = ReconcileStats::default();
        let mut retries = 0u32;
        let mut fast_enabled = true;
        let mut next_fast = Instant::now();
        let mut next_slow = Instant::now() + self.slow_every;

        loop {
            match stop_rx.try_recv() {
                Ok(()) | Err(mpsc::TryRecvError::Disconnected) => break,
                Err(mpsc::TryRecvError::Empty) => {}
            }

            let session = match self.reconciler.sessions().current() {
                Ok(Some(session)) => session,
                _ => break,
            };
            if self.reconciler.cart().is_empty().unwrap_or(true) {
                break;
            }

            let now = Instant::now();

            if fast_enabled && now >= next_fast {
                stats.fast_polls += 1;
                match self.fast.probe(&session.order_id) {
                    Ok(report) => {
                        retries = 0;
                        match self.reconciler.resolve(&session.order_id, &report.status()) {
                            Ok(Resolution::StillPending) => {}
                            Ok(_) => {
                                stats.resolutions += 1;
                                break;
                            }
                            Err(_) => break,
                        }
                    }
                    Err(_) => {
                        stats.probe_errors += 1;
                        retries += 1;
                        if retries >= self.max_retries {
                            self.reconciler.notices().warning(
                                "We couldn't verify your payment status. Please refresh the page.",
                            );
                            fast_enabled = false;
                        }
                    }
                }
                next_fast = now + self.fast_every;
            }

            if now >= next_slow {
                stats.slow_polls += 1;
                if let Ok(report) = self.slow.probe(&session.order_id) {
                    match self.reconciler.resolve(&session.order_id, &report.status()) {
                        Ok(Resolution::StillPending) => {}
                        Ok(_) => {
                            stats.resolutions += 1;
                            break;
                        }
                        Err(_) => break,
                    }
                }
                next_slow = now + self.slow_every;
            }

            thread::sleep(self.tick);
        }

        stats
    }
}
