use chrono::{Duration, NaiveDateTime};
use uuid::Uuid;

use crate::schedule::{EntryKind, ScheduleEntry};

/// Result of looking at a single entry during one pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryOutcome {
    /// Threshold reached and not yet notified today.
    Due,
    /// Threshold is later today.
    NotYet,
    AlreadyNotified,
    /// No positive offset configured.
    NoReminder,
    /// Offset set but `time` missing or unparsable.
    Malformed,
}

/// Check one entry against `now` without modifying it.
pub fn evaluate_entry(entry: &ScheduleEntry, now: NaiveDateTime) -> EntryOutcome {
    let Some(offset) = entry.reminder_minutes() else {
        return EntryOutcome::NoReminder;
    };
    let Some(time) = entry.parsed_time() else {
        return EntryOutcome::Malformed;
    };

    let today = now.date();
    let remind_at = today.and_time(time) - Duration::minutes(i64::from(offset));
    if now < remind_at {
        EntryOutcome::NotYet
    } else if entry.last_notified_date == Some(today) {
        EntryOutcome::AlreadyNotified
    } else {
        EntryOutcome::Due
    }
}

/// Snapshot of an entry whose reminder just fired.
#[derive(Debug, Clone, PartialEq)]
pub struct ReminderDue {
    pub entry_id: Uuid,
    pub kind: EntryKind,
    pub name: String,
    pub time: String,
    pub location: Option<String>,
    pub fired_at: NaiveDateTime,
}

impl ReminderDue {
    fn from_entry(entry: &ScheduleEntry, fired_at: NaiveDateTime) -> Self {
        Self {
            entry_id: entry.id,
            kind: entry.kind,
            name: entry.name.clone(),
            time: entry.time.clone().unwrap_or_default(),
            location: entry.location.clone(),
            fired_at,
        }
    }

    pub fn message(&self) -> String {
        let mut msg = format!("Reminder: {} - {} at {}", self.kind, self.name, self.time);
        if let Some(loc) = self.location.as_deref().filter(|l| !l.is_empty()) {
            msg.push_str(&format!("\nLocation: {}", loc));
        }
        msg
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Evaluation {
    pub due: Vec<ReminderDue>,
    /// Entries with a reminder but no usable time.
    pub skipped: usize,
}

/// One full pass over `entries`.
///
/// Every due entry gets `last_notified_date = now.date()` so it fires at most
/// once per calendar day. Malformed entries are counted and skipped.
pub fn evaluate(entries: &mut [ScheduleEntry], now: NaiveDateTime) -> Evaluation {
    let mut result = Evaluation::default();
    for entry in entries.iter_mut() {
        match evaluate_entry(entry, now) {
            EntryOutcome::Due => {
                entry.last_notified_date = Some(now.date());
                result.due.push(ReminderDue::from_entry(entry, now));
            }
            EntryOutcome::Malformed => result.skipped += 1,
            EntryOutcome::NotYet | EntryOutcome::AlreadyNotified | EntryOutcome::NoReminder => {}
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::EntryDraft;
    use chrono::NaiveDate;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    fn ten_oclock(offset: Option<u32>) -> ScheduleEntry {
        ScheduleEntry::from_draft(
            EntryDraft::class("Monday", "10:00", "Math")
                .with_location("Room 101")
                .with_reminder(offset),
        )
    }

    #[test]
    fn fires_at_threshold_not_before() {
        let mut entries = vec![ten_oclock(Some(15))];

        let early = evaluate(&mut entries, at(2025, 3, 3, 9, 44));
        assert!(early.due.is_empty());
        assert_eq!(entries[0].last_notified_date, None);

        let on_time = evaluate(&mut entries, at(2025, 3, 3, 9, 45));
        assert_eq!(on_time.due.len(), 1);
        assert_eq!(
            entries[0].last_notified_date,
            NaiveDate::from_ymd_opt(2025, 3, 3)
        );
    }

    #[test]
    fn fires_once_per_day() {
        let mut entries = vec![ten_oclock(Some(15))];
        let now = at(2025, 3, 3, 9, 45);
        assert_eq!(evaluate(&mut entries, now).due.len(), 1);
        assert!(evaluate(&mut entries, now).due.is_empty());
        assert!(evaluate(&mut entries, at(2025, 3, 3, 18, 0)).due.is_empty());
        assert_eq!(
            evaluate_entry(&entries[0], at(2025, 3, 3, 18, 0)),
            EntryOutcome::AlreadyNotified
        );
        // next day it is eligible again
        assert_eq!(evaluate(&mut entries, at(2025, 3, 4, 9, 50)).due.len(), 1);
    }

    #[test]
    fn passed_threshold_still_fires_on_first_poll() {
        let mut entries = vec![ten_oclock(Some(15))];
        let late = evaluate(&mut entries, at(2025, 3, 3, 16, 0));
        assert_eq!(late.due.len(), 1);
    }

    #[test]
    fn no_offset_never_fires() {
        let mut entries = vec![ten_oclock(None), ten_oclock(Some(0))];
        let result = evaluate(&mut entries, at(2025, 3, 3, 10, 0));
        assert!(result.due.is_empty());
        assert_eq!(result.skipped, 0);
        assert_eq!(evaluate_entry(&entries[0], at(2025, 3, 3, 10, 0)), EntryOutcome::NoReminder);
    }

    #[test]
    fn malformed_entry_does_not_block_others() {
        let mut broken = ten_oclock(Some(10));
        broken.time = Some("bad".to_string());
        let mut untimed = ten_oclock(Some(10));
        untimed.time = None;
        let mut entries = vec![broken, ten_oclock(Some(15)), untimed];

        let result = evaluate(&mut entries, at(2025, 3, 3, 9, 50));
        assert_eq!(result.skipped, 2);
        assert_eq!(result.due.len(), 1);
        assert_eq!(result.due[0].entry_id, entries[1].id);
        assert_eq!(entries[0].last_notified_date, None);
    }

    #[test]
    fn offset_can_cross_midnight_backwards() {
        let mut entry = ten_oclock(Some(30));
        entry.time = Some("00:10".to_string());
        // remind_at is 23:40 of the previous day, so any time today is past it
        assert_eq!(evaluate_entry(&entry, at(2025, 3, 3, 0, 0)), EntryOutcome::Due);
    }

    #[test]
    fn message_mentions_kind_time_and_location() {
        let mut entries = vec![ten_oclock(Some(15))];
        let result = evaluate(&mut entries, at(2025, 3, 3, 9, 45));
        assert_eq!(
            result.due[0].message(),
            "Reminder: Class - Math at 10:00\nLocation: Room 101"
        );
    }
}
