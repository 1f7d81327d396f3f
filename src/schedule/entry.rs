use std::fmt;

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::format::{parse_date, parse_time};

pub const WEEKDAYS: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    #[default]
    Class,
    Assignment,
    Exam,
}

impl EntryKind {
    pub fn label(&self) -> &'static str {
        match self {
            EntryKind::Class => "Class",
            EntryKind::Assignment => "Assignment",
            EntryKind::Exam => "Exam",
        }
    }

    pub fn is_date_bound(&self) -> bool {
        !matches!(self, EntryKind::Class)
    }
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One persisted schedule record.
///
/// `time` and `due_date` stay textual so a hand-edited or legacy file with a
/// malformed value still loads; readers go through [`ScheduleEntry::parsed_time`]
/// and [`ScheduleEntry::parsed_due_date`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    #[serde(alias = "type")]
    pub kind: EntryKind,
    #[serde(alias = "class")]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub course: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub day: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(
        default,
        alias = "reminder",
        deserialize_with = "deserialize_offset",
        skip_serializing_if = "Option::is_none"
    )]
    pub reminder_offset_minutes: Option<u32>,
    #[serde(default, alias = "notified", skip_serializing_if = "Option::is_none")]
    pub last_notified_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
}

impl ScheduleEntry {
    pub fn from_draft(draft: EntryDraft) -> Self {
        let mut entry = Self {
            id: Uuid::new_v4(),
            kind: draft.kind,
            name: String::new(),
            course: None,
            day: None,
            time: None,
            location: None,
            reminder_offset_minutes: None,
            last_notified_date: None,
            due_date: None,
        };
        entry.apply(draft);
        entry
    }

    /// Overwrite the user-editable fields. The id is kept; the notified flag is
    /// cleared so an edited entry can fire again today.
    pub fn apply(&mut self, draft: EntryDraft) {
        self.last_notified_date = None;
        self.kind = draft.kind;
        self.name = draft.name;
        self.course = draft.course;
        self.day = draft.day;
        self.time = draft.time;
        self.location = draft.location;
        self.reminder_offset_minutes = draft.reminder_offset_minutes.filter(|m| *m > 0);
        self.due_date = draft.due_date;
    }

    pub fn parsed_time(&self) -> Option<NaiveTime> {
        self.time.as_deref().and_then(parse_time)
    }

    pub fn parsed_due_date(&self) -> Option<NaiveDate> {
        self.due_date.as_deref().and_then(parse_date)
    }

    /// Positive reminder offset, if any.
    pub fn reminder_minutes(&self) -> Option<u32> {
        self.reminder_offset_minutes.filter(|m| *m > 0)
    }

    pub fn reminder_display(&self) -> String {
        match self.reminder_minutes() {
            Some(m) => format!("{} min before", m),
            None => "No reminder".to_string(),
        }
    }

    /// Index of `day` in Monday..Sunday, case-insensitive.
    pub fn weekday_index(&self) -> Option<usize> {
        weekday_index(self.day.as_deref()?)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawOffset {
    Minutes(i64),
    Text(String),
}

/// Accepts `15`, `null`, or the older `"15 min before"` / `"No reminder"` text.
fn deserialize_offset<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let minutes = match Option::<RawOffset>::deserialize(deserializer)? {
        Some(RawOffset::Minutes(m)) => u32::try_from(m).ok(),
        Some(RawOffset::Text(text)) => text
            .split_whitespace()
            .next()
            .and_then(|head| head.parse::<u32>().ok()),
        None => None,
    };
    Ok(minutes.filter(|m| *m > 0))
}

pub fn weekday_index(day: &str) -> Option<usize> {
    let day = day.trim();
    WEEKDAYS.iter().position(|d| d.eq_ignore_ascii_case(day))
}

/// `" monday"` -> `"Monday"`. Unknown names are only trimmed.
pub fn canonical_day(day: &str) -> String {
    match weekday_index(day) {
        Some(i) => WEEKDAYS[i].to_string(),
        None => day.trim().to_string(),
    }
}

/// User-supplied field values for creating or editing an entry.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EntryDraft {
    pub kind: EntryKind,
    pub name: String,
    pub course: Option<String>,
    pub day: Option<String>,
    pub time: Option<String>,
    pub location: Option<String>,
    pub reminder_offset_minutes: Option<u32>,
    pub due_date: Option<String>,
}

impl EntryDraft {
    pub fn class(day: &str, time: &str, name: &str) -> Self {
        Self {
            kind: EntryKind::Class,
            name: name.trim().to_string(),
            day: Some(canonical_day(day)),
            time: Some(time.trim().to_string()),
            ..Default::default()
        }
    }

    pub fn dated(kind: EntryKind, course: &str, name: &str, due_date: &str) -> Self {
        Self {
            kind,
            name: name.trim().to_string(),
            course: non_empty(course),
            due_date: non_empty(due_date),
            ..Default::default()
        }
    }

    pub fn with_location(mut self, location: &str) -> Self {
        self.location = non_empty(location);
        self
    }

    pub fn with_time(mut self, time: &str) -> Self {
        self.time = non_empty(time);
        self
    }

    pub fn with_reminder(mut self, minutes: Option<u32>) -> Self {
        self.reminder_offset_minutes = minutes;
        self
    }
}

pub(crate) fn non_empty(s: &str) -> Option<String> {
    let s = s.trim();
    if s.is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}
