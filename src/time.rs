//! Date-time values in the shape the MyParcel API expects.

use chrono::{DateTime, NaiveDateTime, TimeZone};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Wire format used by the API: local wall time, no offset, whole seconds.
pub const API_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A point in time encoded as `"YYYY-MM-DD HH:MM:SS"`.
///
/// The default value is unset and encodes as JSON `null`, never as an
/// all-zero date string. Fractional seconds are dropped on encoding.
///
/// # Examples
/// ```
/// use chrono::NaiveDate;
/// use myparcel_client::ApiTime;
///
/// let at = NaiveDate::from_ymd_opt(2024, 3, 7)
///     .and_then(|d| d.and_hms_opt(9, 5, 0))
///     .map(ApiTime::from)
///     .unwrap();
/// assert_eq!(serde_json::to_string(&at).unwrap(), "\"2024-03-07 09:05:00\"");
/// assert_eq!(serde_json::to_string(&ApiTime::default()).unwrap(), "null");
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ApiTime(Option<NaiveDateTime>);

impl ApiTime {
    /// An unset time; encodes as `null`.
    pub const fn unset() -> Self {
        Self(None)
    }

    /// Take the wall-clock time of `datetime` in its own zone.
    pub fn from_datetime<Tz: TimeZone>(datetime: &DateTime<Tz>) -> Self {
        Self(Some(datetime.naive_local()))
    }

    /// Returns `true` when no time is set.
    pub const fn is_zero(&self) -> bool {
        self.0.is_none()
    }

    /// The wrapped value, if set.
    pub const fn get(&self) -> Option<NaiveDateTime> {
        self.0
    }
}

impl From<NaiveDateTime> for ApiTime {
    fn from(value: NaiveDateTime) -> Self {
        Self(Some(value))
    }
}

impl From<Option<NaiveDateTime>> for ApiTime {
    fn from(value: Option<NaiveDateTime>) -> Self {
        Self(value)
    }
}

impl fmt::Display for ApiTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(at) => write!(f, "{}", at.format(API_TIME_FORMAT)),
            None => f.write_str("null"),
        }
    }
}

impl Serialize for ApiTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self.0 {
            Some(at) => serializer.collect_str(&at.format(API_TIME_FORMAT)),
            None => serializer.serialize_none(),
        }
    }
}

impl<'de> Deserialize<'de> for ApiTime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        match raw.as_deref().map(str::trim) {
            None | Some("") => Ok(Self(None)),
            Some(text) => NaiveDateTime::parse_from_str(text, API_TIME_FORMAT)
                .map(|at| Self(Some(at)))
                .map_err(serde::de::Error::custom),
        }
    }
}
