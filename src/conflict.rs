//! Overlap check for new or edited class slots.
//!
//! Every class is assumed to occupy a fixed block of `duration_minutes`
//! starting at its `time`. Two blocks conflict when the half-open intervals
//! `[start, start + duration)` intersect.

use std::collections::HashMap;
use std::fmt;

use chrono::{NaiveTime, Timelike};
use uuid::Uuid;

use crate::format::{format_time_display, parse_time};
use crate::schedule::{canonical_day, ScheduleEntry};

pub const DEFAULT_CLASS_MINUTES: u32 = 60;

/// An existing entry the candidate slot would overlap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conflict {
    pub entry_id: Uuid,
    pub name: String,
    pub day: String,
    pub time: String,
}

impl fmt::Display for Conflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Conflict: {} is scheduled from {} on {}.",
            self.name,
            format_time_display(&self.time),
            self.day
        )
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ConflictChecker {
    duration_minutes: u32,
}

impl Default for ConflictChecker {
    fn default() -> Self {
        Self::new(DEFAULT_CLASS_MINUTES)
    }
}

impl ConflictChecker {
    pub fn new(duration_minutes: u32) -> Self {
        Self {
            duration_minutes: duration_minutes.max(1),
        }
    }

    /// First entry on `day` whose block overlaps a block starting at `time`.
    ///
    /// An unparsable candidate time reports no conflict; input validation is
    /// expected to reject it first. Existing entries without a usable time are
    /// skipped. `ignore` excludes the entry being edited.
    pub fn check(
        &self,
        by_day: &HashMap<String, Vec<&ScheduleEntry>>,
        day: &str,
        time: &str,
        ignore: Option<Uuid>,
    ) -> Option<Conflict> {
        let day = canonical_day(day);
        let existing = by_day.get(&day)?;
        let new_start = minutes_of(parse_time(time)?);
        let new_end = new_start + self.duration_minutes;

        existing
            .iter()
            .filter(|e| Some(e.id) != ignore)
            .find_map(|entry| {
                let start = minutes_of(entry.parsed_time()?);
                let end = start + self.duration_minutes;
                if new_start < end && new_end > start {
                    Some(Conflict {
                        entry_id: entry.id,
                        name: entry.name.clone(),
                        day: day.clone(),
                        time: entry.time.clone().unwrap_or_default(),
                    })
                } else {
                    None
                }
            })
    }
}

fn minutes_of(t: NaiveTime) -> u32 {
    t.hour() * 60 + t.minute()
}

/// [`ConflictChecker::check`] with the default one-hour block.
pub fn check_for_time_conflict(
    by_day: &HashMap<String, Vec<&ScheduleEntry>>,
    day: &str,
    time: &str,
) -> Option<Conflict> {
    ConflictChecker::default().check(by_day, day, time, None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::{group_by_day, EntryDraft};

    fn schedule() -> Vec<ScheduleEntry> {
        vec![
            ScheduleEntry::from_draft(EntryDraft::class("Monday", "09:00", "Math")),
            ScheduleEntry::from_draft(EntryDraft::class("Monday", "bad", "Broken")),
            ScheduleEntry::from_draft(EntryDraft::class("Wednesday", "23:30", "Night Lab")),
        ]
    }

    #[test]
    fn overlapping_start_conflicts() {
        let entries = schedule();
        let days = group_by_day(&entries);
        let conflict = check_for_time_conflict(&days, "Monday", "09:30").unwrap();
        assert_eq!(conflict.name, "Math");
        assert_eq!(
            conflict.to_string(),
            "Conflict: Math is scheduled from 09:00 AM on Monday."
        );
    }

    #[test]
    fn adjacent_blocks_do_not_conflict() {
        let entries = schedule();
        let days = group_by_day(&entries);
        assert!(check_for_time_conflict(&days, "Monday", "10:00").is_none());
        assert!(check_for_time_conflict(&days, "Monday", "08:00").is_none());
        assert!(check_for_time_conflict(&days, "Monday", "08:01").is_some());
    }

    #[test]
    fn other_days_never_conflict() {
        let entries = schedule();
        let days = group_by_day(&entries);
        assert!(check_for_time_conflict(&days, "Tuesday", "09:00").is_none());
    }

    #[test]
    fn day_names_match_case_insensitively() {
        let entries = schedule();
        let days = group_by_day(&entries);
        assert!(check_for_time_conflict(&days, "monday", "09:30").is_some());
    }

    #[test]
    fn malformed_entries_are_skipped_not_fatal() {
        let entries = schedule();
        let days = group_by_day(&entries);
        // "Broken" sits on Monday with an unparsable time; Math must still be found.
        assert_eq!(
            check_for_time_conflict(&days, "Monday", "09:15").map(|c| c.name),
            Some("Math".to_string())
        );
        assert!(check_for_time_conflict(&days, "Monday", "14:00").is_none());
    }

    #[test]
    fn bad_candidate_time_reports_nothing() {
        let entries = schedule();
        let days = group_by_day(&entries);
        assert!(check_for_time_conflict(&days, "Monday", "nine").is_none());
    }

    #[test]
    fn late_blocks_do_not_wrap_past_midnight() {
        let entries = schedule();
        let days = group_by_day(&entries);
        assert!(check_for_time_conflict(&days, "Wednesday", "00:00").is_none());
        assert!(check_for_time_conflict(&days, "Wednesday", "23:00").is_some());
    }

    #[test]
    fn duration_is_configurable() {
        let entries = schedule();
        let days = group_by_day(&entries);
        let long = ConflictChecker::new(90);
        assert!(long.check(&days, "Monday", "10:00", None).is_some());
        assert!(long.check(&days, "Monday", "10:30", None).is_none());
    }

    #[test]
    fn edited_entry_ignores_itself() {
        let entries = schedule();
        let days = group_by_day(&entries);
        let math = entries[0].id;
        let checker = ConflictChecker::default();
        assert!(checker.check(&days, "Monday", "09:30", Some(math)).is_none());
    }
}
