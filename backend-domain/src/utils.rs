use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};

use crate::error::DomainError;

/// Current time as the unsigned epoch seconds stored in `time` columns.
pub fn now_epoch_seconds() -> u32 {
    epoch_seconds(Utc::now())
}

pub fn epoch_seconds(at: DateTime<Utc>) -> u32 {
    u32::try_from(at.timestamp().max(0)).unwrap_or(u32::MAX)
}

pub fn epoch_to_utc(seconds: u32) -> DateTime<Utc> {
    DateTime::from_timestamp(i64::from(seconds), 0).unwrap_or_default()
}

pub fn parse_epoch_seconds(seconds: i64) -> Result<DateTime<Utc>, DomainError> {
    if seconds < 0 || seconds > i64::from(u32::MAX) {
        return Err(DomainError::InvalidTimestamp(seconds));
    }
    DateTime::from_timestamp(seconds, 0).ok_or(DomainError::InvalidTimestamp(seconds))
}

/// RFC 3339 at second precision, e.g. `2024-05-01T12:30:00Z`.
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Cuts `value` to at most `max_chars` characters without splitting a code point.
pub fn truncate_chars(value: &str, max_chars: usize) -> &str {
    match value.char_indices().nth(max_chars) {
        Some((idx, _)) => &value[..idx],
        None => value,
    }
}

pub fn parse_date(date: &str) -> anyhow::Result<NaiveDate> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d").map_err(|err| anyhow::anyhow!(err))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_respects_char_boundaries() {
        assert_eq!(truncate_chars("héllo", 2), "hé");
        assert_eq!(truncate_chars("abc", 10), "abc");
        assert_eq!(truncate_chars("", 3), "");
    }

    #[test]
    fn epoch_round_trip_at_second_precision() {
        let at = parse_epoch_seconds(1_700_000_000).unwrap();
        assert_eq!(epoch_seconds(at), 1_700_000_000);
        assert_eq!(format_timestamp(epoch_to_utc(0)), "1970-01-01T00:00:00Z");
    }

    #[test]
    fn rejects_negative_timestamps() {
        assert!(parse_epoch_seconds(-1).is_err());
    }
}
