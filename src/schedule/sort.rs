use std::cmp::Ordering;

use super::entry::ScheduleEntry;

/// Column the schedule table is ordered by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortKey {
    Day,
    #[default]
    Time,
    Name,
    Kind,
}

impl SortKey {
    pub fn next(&self) -> Self {
        match self {
            SortKey::Day => SortKey::Time,
            SortKey::Time => SortKey::Name,
            SortKey::Name => SortKey::Kind,
            SortKey::Kind => SortKey::Day,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SortKey::Day => "Day",
            SortKey::Time => "Time",
            SortKey::Name => "Name",
            SortKey::Kind => "Type",
        }
    }
}

/// Stable sort; ties fall back to time of day, then name.
pub fn sort_entries(entries: &mut [&ScheduleEntry], key: SortKey) {
    entries.sort_by(|a, b| {
        let primary = match key {
            SortKey::Day => by_day(a, b),
            SortKey::Time => Ordering::Equal,
            SortKey::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
            SortKey::Kind => a.kind.cmp(&b.kind),
        };
        primary
            .then_with(|| by_time(a, b))
            .then_with(|| a.name.cmp(&b.name))
    });
}

// Unknown or missing days sort after Sunday.
fn by_day(a: &ScheduleEntry, b: &ScheduleEntry) -> Ordering {
    let rank = |e: &ScheduleEntry| e.weekday_index().unwrap_or(usize::MAX);
    rank(a).cmp(&rank(b))
}

// Unparsable or missing times sort last.
fn by_time(a: &ScheduleEntry, b: &ScheduleEntry) -> Ordering {
    match (a.parsed_time(), b.parsed_time()) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::{EntryDraft, EntryKind};

    fn entries() -> Vec<ScheduleEntry> {
        vec![
            ScheduleEntry::from_draft(EntryDraft::class("Friday", "08:00", "biology")),
            ScheduleEntry::from_draft(EntryDraft::class("Monday", "13:00", "Art")),
            ScheduleEntry::from_draft(EntryDraft::class("Monday", "09:00", "Chem")),
            ScheduleEntry::from_draft(EntryDraft::dated(EntryKind::Exam, "Art", "Final", "2025-05-01")),
        ]
    }

    fn names(view: &[&ScheduleEntry]) -> Vec<String> {
        view.iter().map(|e| e.name.clone()).collect()
    }

    #[test]
    fn day_order_is_weekday_then_time() {
        let entries = entries();
        let mut view: Vec<&ScheduleEntry> = entries.iter().collect();
        sort_entries(&mut view, SortKey::Day);
        assert_eq!(names(&view), ["Chem", "Art", "biology", "Final"]);
    }

    #[test]
    fn time_order_puts_untimed_last() {
        let entries = entries();
        let mut view: Vec<&ScheduleEntry> = entries.iter().collect();
        sort_entries(&mut view, SortKey::Time);
        assert_eq!(names(&view), ["biology", "Chem", "Art", "Final"]);
    }

    #[test]
    fn name_order_ignores_case() {
        let entries = entries();
        let mut view: Vec<&ScheduleEntry> = entries.iter().collect();
        sort_entries(&mut view, SortKey::Name);
        assert_eq!(names(&view), ["Art", "biology", "Chem", "Final"]);
    }

    #[test]
    fn sort_key_cycles() {
        let mut key = SortKey::default();
        for _ in 0..4 {
            key = key.next();
        }
        assert_eq!(key, SortKey::default());
    }
}
