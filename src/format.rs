use chrono::{NaiveDate, NaiveTime};

pub const TIME_FORMAT: &str = "%H:%M";
pub const DATE_FORMAT: &str = "%Y-%m-%d";

const TIME_DISPLAY_FORMAT: &str = "%I:%M %p";
const DATE_DISPLAY_FORMAT: &str = "%B %d, %Y";

/// Parse a 24-hour `HH:MM` time of day.
pub fn parse_time(s: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(s.trim(), TIME_FORMAT).ok()
}

/// Parse an ISO `YYYY-MM-DD` date.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), DATE_FORMAT).ok()
}

/// `"14:30"` -> `"02:30 PM"`. Unparsable input is returned as-is.
pub fn format_time_display(time_str: &str) -> String {
    match parse_time(time_str) {
        Some(t) => t.format(TIME_DISPLAY_FORMAT).to_string(),
        None => time_str.to_string(),
    }
}

/// `"2025-12-31"` -> `"December 31, 2025"`. Unparsable input is returned as-is.
pub fn format_date_display(date_str: &str) -> String {
    match parse_date(date_str) {
        Some(d) => d.format(DATE_DISPLAY_FORMAT).to_string(),
        None => date_str.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn time_display_is_twelve_hour() {
        assert_eq!(format_time_display("09:00"), "09:00 AM");
        assert_eq!(format_time_display("14:30"), "02:30 PM");
        assert_eq!(format_time_display("00:05"), "12:05 AM");
        assert_eq!(format_time_display("12:00"), "12:00 PM");
    }

    #[test]
    fn time_display_round_trips_every_minute() {
        for h in 0..24 {
            for m in 0..60 {
                let original = format!("{:02}:{:02}", h, m);
                let shown = format_time_display(&original);
                let back = NaiveTime::parse_from_str(&shown, TIME_DISPLAY_FORMAT).unwrap();
                assert_eq!(back, parse_time(&original).unwrap(), "{original} -> {shown}");
            }
        }
    }

    #[test]
    fn bad_input_falls_back_to_original() {
        assert_eq!(format_time_display("bad"), "bad");
        assert_eq!(format_time_display("25:00"), "25:00");
        assert_eq!(format_date_display("2025-13-01"), "2025-13-01");
        assert_eq!(format_date_display(""), "");
    }

    #[test]
    fn date_display_is_long_form() {
        assert_eq!(format_date_display("2025-12-31"), "December 31, 2025");
        assert_eq!(format_date_display("2026-03-07"), "March 07, 2026");
    }
}
