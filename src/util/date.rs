//! ISO-8601 timestamps as the API expects them.
//!
//! Outgoing dates always carry millisecond precision and a numeric offset
//! (`2021-06-01T12:00:00.000+00:00`). Incoming dates are parsed leniently: any
//! RFC 3339 timestamp is accepted, as well as offsets written without a colon.
//!
//! Calendar dates (birth dates, licence dates) are a separate type: they go
//! out as `YYYY-MM-DD` so a date read from the API is sent back unchanged.

use chrono::{DateTime, NaiveDate, Utc};

const WIRE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3f%:z";

/// Format a timestamp for query parameters and request bodies.
pub fn format_iso8601(date: &DateTime<Utc>) -> String {
    date.format(WIRE_FORMAT).to_string()
}

/// Parse a timestamp returned by the API.
pub fn parse_iso8601(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    if let Ok(parsed) = DateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f%z") {
        return Some(parsed.with_timezone(&Utc));
    }
    // Calendar dates such as birth dates come without a time part.
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|midnight| midnight.and_utc())
}

const CALENDAR_FORMAT: &str = "%Y-%m-%d";

/// Parse a calendar date. A full timestamp is accepted too and yields the
/// date in its own offset.
pub fn parse_calendar_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(raw, CALENDAR_FORMAT) {
        return Some(date);
    }
    DateTime::parse_from_rfc3339(raw)
        .or_else(|_| DateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f%z"))
        .ok()
        .map(|parsed| parsed.date_naive())
}

/// `#[serde(default, with = "calendar_date")]` for optional calendar dates.
pub mod calendar_date {
    use chrono::NaiveDate;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(date: &Option<NaiveDate>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match date {
            Some(date) => serializer.serialize_str(&date.format(super::CALENDAR_FORMAT).to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        match raw {
            None => Ok(None),
            Some(raw) if raw.trim().is_empty() => Ok(None),
            Some(raw) => super::parse_calendar_date(&raw)
                .map(Some)
                .ok_or_else(|| de::Error::custom(format!("invalid calendar date: {raw}"))),
        }
    }
}

/// `#[serde(with = "iso8601")]` for required timestamps.
pub mod iso8601 {
    use chrono::{DateTime, Utc};
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(date: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&super::format_iso8601(date))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        super::parse_iso8601(&raw)
            .ok_or_else(|| de::Error::custom(format!("invalid ISO-8601 timestamp: {raw}")))
    }

    /// Optional variant; pair with `#[serde(default)]`.
    pub mod option {
        use chrono::{DateTime, Utc};
        use serde::{de, Deserialize, Deserializer, Serializer};

        pub fn serialize<S>(date: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
        where
            S: Serializer,
        {
            match date {
                Some(date) => serializer.serialize_str(&super::super::format_iso8601(date)),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
        where
            D: Deserializer<'de>,
        {
            let raw: Option<String> = Option::deserialize(deserializer)?;
            match raw {
                None => Ok(None),
                Some(raw) if raw.trim().is_empty() => Ok(None),
                Some(raw) => super::super::parse_iso8601(&raw).map(Some).ok_or_else(|| {
                    de::Error::custom(format!("invalid ISO-8601 timestamp: {raw}"))
                }),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn formats_with_milliseconds_and_numeric_offset() {
        let date = Utc.with_ymd_and_hms(2021, 6, 1, 12, 0, 0).unwrap();
        assert_eq!(format_iso8601(&date), "2021-06-01T12:00:00.000+00:00");
    }

    #[test]
    fn keeps_sub_second_precision_to_milliseconds() {
        let date = Utc.with_ymd_and_hms(2021, 6, 1, 12, 0, 0).unwrap()
            + chrono::Duration::microseconds(123_456);
        assert_eq!(format_iso8601(&date), "2021-06-01T12:00:00.123+00:00");
    }

    #[test]
    fn parses_zulu_and_offset_forms() {
        let expected = Utc.with_ymd_and_hms(2021, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(parse_iso8601("2021-01-01T00:00:00Z"), Some(expected));
        assert_eq!(parse_iso8601("2021-01-01T00:00:00.000+00:00"), Some(expected));
        assert_eq!(parse_iso8601("2021-01-01T01:00:00.000+0100"), Some(expected));
    }

    #[test]
    fn calendar_dates_parse_as_utc_midnight() {
        let expected = Utc.with_ymd_and_hms(1990, 4, 12, 0, 0, 0).unwrap();
        assert_eq!(parse_iso8601("1990-04-12"), Some(expected));
    }

    #[test]
    fn calendar_dates_keep_their_day() {
        let expected = NaiveDate::from_ymd_opt(1990, 4, 12).unwrap();
        assert_eq!(parse_calendar_date("1990-04-12"), Some(expected));
        assert_eq!(parse_calendar_date("1990-04-12T23:30:00.000-05:00"), Some(expected));
        assert_eq!(parse_calendar_date("12/04/1990"), None);
    }

    #[test]
    fn rejects_garbage() {
        assert_eq!(parse_iso8601("yesterday"), None);
        assert_eq!(parse_iso8601(""), None);
    }
}
