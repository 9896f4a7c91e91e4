//! Lenient date/time parsing for wire formats.
//!
//! Desktop front ends send scheduled dates either as a plain calendar date
//! (`2024-05-10`) or as a midnight timestamp (`2024-05-10T00:00:00`). Both
//! normalize to the same [`NaiveDate`]. Timestamps are naive local wall-clock
//! times; an explicit offset is accepted and dropped.

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, NaiveTime};

const DATE_FORMAT: &str = "%Y-%m-%d";
const DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

const DATETIME_INPUT_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Parses a timestamp, accepting date-only input as midnight.
pub fn parse_flexible_datetime(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    for format in DATETIME_INPUT_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(value, format) {
            return Some(parsed);
        }
    }

    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Some(parsed.naive_local());
    }

    NaiveDate::parse_from_str(value, DATE_FORMAT)
        .ok()
        .map(|date| date.and_time(NaiveTime::MIN))
}

/// Parses a calendar date, accepting full timestamps and keeping only the date.
pub fn parse_flexible_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    NaiveDate::parse_from_str(value, DATE_FORMAT)
        .ok()
        .or_else(|| parse_flexible_datetime(value).map(|dt| dt.date()))
}

/// Current wall-clock time in the server's local time zone.
pub fn local_now() -> NaiveDateTime {
    Local::now().naive_local()
}

/// Today's date in the server's local time zone.
pub fn local_today() -> NaiveDate {
    Local::now().date_naive()
}

/// Formats a calendar date as `YYYY-MM-DD`.
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Formats a timestamp as `YYYY-MM-DDTHH:MM:SS`.
pub fn format_datetime(value: NaiveDateTime) -> String {
    value.format(DATETIME_FORMAT).to_string()
}

/// Serde adapter for required `NaiveDateTime` fields.
pub mod flexible_datetime {
    use chrono::NaiveDateTime;
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&super::format_datetime(*value))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        super::parse_flexible_datetime(&raw)
            .ok_or_else(|| D::Error::custom(format!("invalid datetime: {raw}")))
    }
}

/// Serde adapter for required `NaiveDate` fields using [`parse_flexible_date`].
pub mod flexible_date {
    use chrono::NaiveDate;
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&super::format_date(*value))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        super::parse_flexible_date(&raw)
            .ok_or_else(|| D::Error::custom(format!("invalid date: {raw}")))
    }
}

/// Serde adapter for `Option<NaiveDate>` fields using [`parse_flexible_date`].
pub mod flexible_date_opt {
    use chrono::NaiveDate;
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &Option<NaiveDate>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(date) => serializer.serialize_str(&super::format_date(*date)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        match raw.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(value) => super::parse_flexible_date(value)
                .map(Some)
                .ok_or_else(|| D::Error::custom(format!("invalid date: {value}"))),
        }
    }
}

/// Serde adapter for `Option<NaiveDateTime>` fields using [`parse_flexible_datetime`].
pub mod flexible_datetime_opt {
    use chrono::NaiveDateTime;
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &Option<NaiveDateTime>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(dt) => serializer.serialize_str(&super::format_datetime(*dt)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        match raw.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(value) => super::parse_flexible_datetime(value)
                .map(Some)
                .ok_or_else(|| D::Error::custom(format!("invalid datetime: {value}"))),
        }
    }
}
