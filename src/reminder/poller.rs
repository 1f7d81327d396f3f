use std::time::Duration;

use chrono::{Local, NaiveDateTime};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use super::evaluator::{evaluate, ReminderDue};
use crate::schedule::SharedStore;

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(30);

/// Source of the local wall-clock time used to evaluate reminders.
pub trait Clock: Send + Sync + 'static {
    fn now(&self) -> NaiveDateTime;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct LocalClock;

impl Clock for LocalClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

impl<F> Clock for F
where
    F: Fn() -> NaiveDateTime + Send + Sync + 'static,
{
    fn now(&self) -> NaiveDateTime {
        self()
    }
}

/// Periodic reminder check over a shared store.
///
/// Each tick locks the store, runs one evaluation pass, marks fired entries in
/// memory and forwards them on `fired_tx`. The poller never writes the file:
/// whoever drains the channel persists the updated flags.
pub struct ReminderPoller<C: Clock = LocalClock> {
    store: SharedStore,
    clock: C,
    interval: Duration,
    fired_tx: mpsc::Sender<ReminderDue>,
    last_skipped: usize,
}

impl ReminderPoller<LocalClock> {
    pub fn new(store: SharedStore, fired_tx: mpsc::Sender<ReminderDue>) -> Self {
        Self::with_clock(store, fired_tx, LocalClock)
    }
}

impl<C: Clock> ReminderPoller<C> {
    pub fn with_clock(store: SharedStore, fired_tx: mpsc::Sender<ReminderDue>, clock: C) -> Self {
        Self {
            store,
            clock,
            interval: DEFAULT_POLL_INTERVAL,
            fired_tx,
            last_skipped: 0,
        }
    }

    pub fn interval(mut self, interval: Duration) -> Self {
        self.interval = interval.max(Duration::from_millis(1));
        self
    }

    /// Start the loop on the current tokio runtime.
    pub fn spawn(self) -> PollerHandle {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let task = tokio::spawn(self.run(shutdown_rx));
        PollerHandle { shutdown_tx, task }
    }

    /// Tick until `shutdown` becomes `true` or its sender is dropped.
    pub async fn run(mut self, mut shutdown: watch::Receiver<bool>) {
        info!(interval_ms = self.interval.as_millis() as u64, "reminder poller started");

        let mut interval = tokio::time::interval(self.interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            tokio::select! {
                _ = interval.tick() => {
                    self.tick();
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
            }
        }

        info!("reminder poller stopped");
    }

    /// One evaluation pass. Returns how many reminders were forwarded.
    pub fn tick(&mut self) -> usize {
        let now = self.clock.now();
        let mut store = match self.store.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };

        let result = evaluate(store.entries_mut(), now);
        if result.skipped != self.last_skipped {
            if result.skipped > 0 {
                warn!(count = result.skipped, "entries with a reminder but no valid time skipped");
            }
            self.last_skipped = result.skipped;
        }

        let mut sent = 0;
        for due in result.due {
            let id = due.entry_id;
            match self.fired_tx.try_send(due) {
                Ok(()) => {
                    info!(entry_id = %id, "reminder due");
                    sent += 1;
                }
                Err(err) => {
                    // Undo the flag so the next tick retries delivery.
                    warn!(entry_id = %id, "reminder channel unavailable ({err}), will retry");
                    if let Some(entry) = store.entries_mut().iter_mut().find(|e| e.id == id) {
                        entry.last_notified_date = None;
                    }
                }
            }
        }

        debug!(%now, sent, skipped = result.skipped, "reminder pass complete");
        sent
    }
}

/// Handle to a running [`ReminderPoller`].
pub struct PollerHandle {
    shutdown_tx: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl PollerHandle {
    /// Signal the loop to stop and wait at most `timeout` for the current pass.
    ///
    /// Returns `false` if the task had to be aborted.
    pub async fn shutdown(self, timeout: Duration) -> bool {
        let _ = self.shutdown_tx.send(true);
        let abort = self.task.abort_handle();
        match tokio::time::timeout(timeout, self.task).await {
            Ok(_) => true,
            Err(_) => {
                warn!(timeout_ms = timeout.as_millis() as u64, "reminder poller did not stop in time, aborting");
                abort.abort();
                false
            }
        }
    }
}
