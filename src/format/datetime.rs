//! Timestamp rendering in the forum's display zone (China Standard Time,
//! UTC+08:00, no daylight saving) with a 24-hour clock.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, TimeZone, Utc};

const DISPLAY_OFFSET_SECS: i32 = 8 * 3600;
const DATE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Values accepted by [`fmt_date_time`].
#[derive(Clone, Debug, PartialEq)]
pub enum DateInput<'a> {
    Missing,
    Text(&'a str),
    /// Milliseconds since the Unix epoch.
    Millis(i64),
    Instant(DateTime<Utc>),
    /// Wall-clock time already in the display zone.
    Local(NaiveDateTime),
    /// A calendar date without time of day.
    Date(NaiveDate),
}

impl<'a> From<&'a str> for DateInput<'a> {
    fn from(value: &'a str) -> Self {
        Self::Text(value)
    }
}

impl<'a> From<&'a String> for DateInput<'a> {
    fn from(value: &'a String) -> Self {
        Self::Text(value.as_str())
    }
}

impl From<i64> for DateInput<'_> {
    fn from(value: i64) -> Self {
        Self::Millis(value)
    }
}

impl<Tz: TimeZone> From<DateTime<Tz>> for DateInput<'_> {
    fn from(value: DateTime<Tz>) -> Self {
        Self::Instant(value.with_timezone(&Utc))
    }
}

impl From<NaiveDateTime> for DateInput<'_> {
    fn from(value: NaiveDateTime) -> Self {
        Self::Local(value)
    }
}

impl From<NaiveDate> for DateInput<'_> {
    fn from(value: NaiveDate) -> Self {
        Self::Date(value)
    }
}

impl<'a, T: Into<DateInput<'a>>> From<Option<T>> for DateInput<'a> {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Missing, Into::into)
    }
}

/// Render `YYYY-MM-DD HH:MM:SS` in the display zone.
///
/// Missing, empty, zero or unparseable input renders as an empty string.
/// Inputs without a time of day degrade to `YYYY-MM-DD`.
#[must_use]
pub fn fmt_date_time<'a>(input: impl Into<DateInput<'a>>) -> String {
    let Some(zone) = FixedOffset::east_opt(DISPLAY_OFFSET_SECS) else {
        return String::new();
    };

    match resolve(input.into(), &zone) {
        Some(Resolved::Instant(instant)) => instant
            .with_timezone(&zone)
            .format(DATE_TIME_FORMAT)
            .to_string(),
        Some(Resolved::Date(date)) => date.format(DATE_FORMAT).to_string(),
        None => String::new(),
    }
}

enum Resolved {
    Instant(DateTime<Utc>),
    Date(NaiveDate),
}

fn resolve(input: DateInput<'_>, zone: &FixedOffset) -> Option<Resolved> {
    match input {
        DateInput::Missing | DateInput::Millis(0) => None,
        DateInput::Millis(millis) => DateTime::from_timestamp_millis(millis).map(Resolved::Instant),
        DateInput::Instant(instant) => Some(Resolved::Instant(instant)),
        DateInput::Local(naive) => local_instant(naive, zone),
        DateInput::Date(date) => Some(Resolved::Date(date)),
        DateInput::Text(text) => parse_text(text.trim(), zone),
    }
}

fn parse_text(text: &str, zone: &FixedOffset) -> Option<Resolved> {
    if text.is_empty() {
        return None;
    }
    if let Ok(instant) = DateTime::parse_from_rfc3339(text) {
        return Some(Resolved::Instant(instant.with_timezone(&Utc)));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
            return local_instant(naive, zone);
        }
    }
    NaiveDate::parse_from_str(text, DATE_FORMAT)
        .ok()
        .map(Resolved::Date)
}

fn local_instant(naive: NaiveDateTime, zone: &FixedOffset) -> Option<Resolved> {
    zone.from_local_datetime(&naive)
        .single()
        .map(|local| Resolved::Instant(local.with_timezone(&Utc)))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn renders_instants_in_display_zone() {
        assert_eq!(fmt_date_time("2024-03-01T16:05:09Z"), "2024-03-02 00:05:09");
        assert_eq!(
            fmt_date_time("2024-03-01T08:05:09.123456+08:00"),
            "2024-03-01 08:05:09"
        );
        let instant = Utc.with_ymd_and_hms(2023, 12, 31, 23, 0, 0).unwrap();
        assert_eq!(fmt_date_time(instant), "2024-01-01 07:00:00");
    }

    #[test]
    fn renders_epoch_millis() {
        assert_eq!(fmt_date_time(1_700_000_000_000_i64), "2023-11-15 06:13:20");
    }

    #[test]
    fn naive_text_is_display_zone_wall_time() {
        assert_eq!(fmt_date_time("2024-05-06 07:08:09"), "2024-05-06 07:08:09");
        assert_eq!(fmt_date_time("2024-05-06T23:59"), "2024-05-06 23:59:00");
    }

    #[test]
    fn missing_or_invalid_input_is_empty() {
        assert_eq!(fmt_date_time(""), "");
        assert_eq!(fmt_date_time("   "), "");
        assert_eq!(fmt_date_time("not a date"), "");
        assert_eq!(fmt_date_time("2024-13-45T00:00:00Z"), "");
        assert_eq!(fmt_date_time(None::<&str>), "");
        assert_eq!(fmt_date_time(0_i64), "");
    }

    #[test]
    fn date_only_input_degrades_to_date() {
        assert_eq!(fmt_date_time("2024-02-29"), "2024-02-29");
        let date = NaiveDate::from_ymd_opt(2020, 1, 2).unwrap();
        assert_eq!(fmt_date_time(date), "2020-01-02");
        assert_eq!(fmt_date_time(Some(date)), "2020-01-02");
    }
}
