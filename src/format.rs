//! Date formatting for form inputs and table cells

use chrono::{DateTime, Local, NaiveDateTime, TimeZone, Utc};

const INPUT_FORMAT: &str = "%Y-%m-%dT%H:%M";

/// Parse a `datetime-local` input value as local time
pub fn parse_local_datetime(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    let naive = NaiveDateTime::parse_from_str(value, INPUT_FORMAT).ok()?;
    Local.from_local_datetime(&naive).earliest().map(|dt| dt.with_timezone(&Utc))
}

/// Value for a `datetime-local` input
pub fn to_input_value(at: Option<DateTime<Utc>>) -> String {
    at.map(|dt| dt.with_timezone(&Local).format(INPUT_FORMAT).to_string()).unwrap_or_default()
}

pub fn format_due(at: Option<DateTime<Utc>>) -> String {
    match at {
        Some(dt) => dt.with_timezone(&Local).format("%d.%m.%Y %H:%M").to_string(),
        None => "—".to_string(),
    }
}

pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.with_timezone(&Local).format("%d.%m %H:%M").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_and_garbage_inputs() {
        assert_eq!(parse_local_datetime(""), None);
        assert_eq!(parse_local_datetime("  "), None);
        assert_eq!(parse_local_datetime("tomorrow"), None);
    }

    #[test]
    fn test_input_value_survives_parse() {
        let parsed = parse_local_datetime("2026-05-01T09:30").unwrap();
        assert_eq!(to_input_value(Some(parsed)), "2026-05-01T09:30");
        assert_eq!(to_input_value(None), "");
    }

    #[test]
    fn test_missing_due_date() {
        assert_eq!(format_due(None), "—");
    }
}
