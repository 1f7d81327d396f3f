//! Field checks run on raw form input before anything touches the store.

use chrono::{NaiveDate, NaiveTime};
use thiserror::Error;

use crate::format::{parse_date, parse_time};

/// Rejected user input. The `Display` text is meant to be shown as-is.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("{0} required!")]
    MissingFields(&'static str),

    #[error("Time must be in HH:MM format (e.g., 09:00 or 14:30).")]
    BadTime,

    #[error("{0} must be in YYYY-MM-DD format (e.g., 2025-12-31).")]
    BadDate(&'static str),

    #[error("Reminder must be a whole number of minutes.")]
    BadOffset,

    #[error("Reminder must be between {min} and {max} minutes.")]
    OffsetOutOfRange { min: u32, max: u32 },
}

fn all_present(fields: &[&str]) -> bool {
    fields.iter().all(|f| !f.trim().is_empty())
}

pub fn validate_class_input(day: &str, time: &str, name: &str) -> Result<NaiveTime, InputError> {
    if !all_present(&[day, time, name]) {
        return Err(InputError::MissingFields("Day, Time, and Class Name are"));
    }
    parse_time(time).ok_or(InputError::BadTime)
}

pub fn validate_assignment_input(
    class_name: &str,
    title: &str,
    due_date: &str,
) -> Result<NaiveDate, InputError> {
    if !all_present(&[class_name, title, due_date]) {
        return Err(InputError::MissingFields("Class, Assignment, and Due Date are"));
    }
    parse_date(due_date).ok_or(InputError::BadDate("Due Date"))
}

pub fn validate_exam_input(
    class_name: &str,
    exam_name: &str,
    date: &str,
) -> Result<NaiveDate, InputError> {
    if !all_present(&[class_name, exam_name, date]) {
        return Err(InputError::MissingFields("Class, Exam, and Date are"));
    }
    parse_date(date).ok_or(InputError::BadDate("Date"))
}

pub fn validate_reminder_input(text: &str, date: &str) -> Result<NaiveDate, InputError> {
    if !all_present(&[text, date]) {
        return Err(InputError::MissingFields("Reminder text and date are"));
    }
    parse_date(date).ok_or(InputError::BadDate("Date"))
}

/// Optional time on a date-bound entry: empty is fine, anything else must parse.
pub fn validate_optional_time(time: &str) -> Result<Option<NaiveTime>, InputError> {
    if time.trim().is_empty() {
        return Ok(None);
    }
    parse_time(time).map(Some).ok_or(InputError::BadTime)
}

/// Reminder field of the entry form. Empty or `0` means no reminder.
pub fn parse_reminder_offset(text: &str) -> Result<Option<u32>, InputError> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(None);
    }
    match text.parse::<u32>() {
        Ok(0) => Ok(None),
        Ok(minutes) => Ok(Some(minutes)),
        Err(_) => Err(InputError::BadOffset),
    }
}

/// Bounded variant used by the quick "set reminder" prompt.
pub fn parse_reminder_minutes(text: &str, min: u32, max: u32) -> Result<u32, InputError> {
    let minutes = text
        .trim()
        .parse::<u32>()
        .map_err(|_| InputError::BadOffset)?;
    if minutes < min || minutes > max {
        return Err(InputError::OffsetOutOfRange { min, max });
    }
    Ok(minutes)
}
