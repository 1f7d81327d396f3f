//! Class schedule bookkeeping: entries, validation, conflict checks and
//! once-a-day reminders over a JSON-backed store.

pub mod config;
pub mod conflict;
pub mod format;
pub mod reminder;
pub mod schedule;
pub mod validate;

pub use config::Config;
pub use conflict::{check_for_time_conflict, Conflict, ConflictChecker};
pub use format::{format_date_display, format_time_display};
pub use reminder::{evaluate, ReminderDue, ReminderPoller};
pub use schedule::{EntryDraft, EntryKind, ScheduleEntry, ScheduleStore, SharedStore, SortKey};
pub use validate::InputError;
