pub mod evaluator;
pub mod poller;

pub use evaluator::{evaluate, evaluate_entry, EntryOutcome, Evaluation, ReminderDue};
pub use poller::{Clock, LocalClock, PollerHandle, ReminderPoller, DEFAULT_POLL_INTERVAL};
