//! Nullable calendar date shared by projects and tasks.
//!
//! [`NullableDate`] is either empty or holds a date without time-of-day or
//! timezone. Its encodings must agree:
//!
//! | Form    | Present          | Absent            |
//! |---------|------------------|-------------------|
//! | text    | `"YYYY-MM-DD"`   | `""`              |
//! | JSON    | `"YYYY-MM-DD"`   | `null` (or `""`)  |
//! | storage | `DATE` value     | `NULL`            |
//!
//! Parsing never turns a malformed string into an empty date.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize, Serializer};

/// ISO-8601 calendar date format used on the wire and in text storage.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Error returned when a non-empty string is not a valid `YYYY-MM-DD` date.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid date format: expected YYYY-MM-DD, got {0:?}")]
pub struct DateParseError(pub String);

/// An optional calendar date.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NullableDate(Option<NaiveDate>);

impl NullableDate {
    /// The absent date.
    pub const fn empty() -> Self {
        Self(None)
    }

    /// A present date.
    pub const fn from_date(date: NaiveDate) -> Self {
        Self(Some(date))
    }

    /// Parse the text form. `""` is the empty date; anything else must be
    /// exactly `YYYY-MM-DD` and name a real calendar day.
    pub fn parse(text: &str) -> Result<Self, DateParseError> {
        if text.is_empty() {
            return Ok(Self::empty());
        }

        if !is_iso_shape(text) {
            return Err(DateParseError(text.to_string()));
        }

        NaiveDate::parse_from_str(text, DATE_FORMAT)
            .map(Self::from_date)
            .map_err(|_| DateParseError(text.to_string()))
    }

    /// Text form, `None` when empty.
    pub fn to_text(&self) -> Option<String> {
        self.0.map(|d| d.format(DATE_FORMAT).to_string())
    }

    /// Value bound to a nullable `DATE` column.
    pub fn to_storage_form(self) -> Option<NaiveDate> {
        self.0
    }

    /// Value read back from a nullable `DATE` column.
    pub fn from_storage_form(value: Option<NaiveDate>) -> Self {
        Self(value)
    }

    /// Value read back from a text column holding an ISO date.
    pub fn from_storage_text(value: Option<&str>) -> Result<Self, DateParseError> {
        match value {
            None => Ok(Self::empty()),
            Some(text) => Self::parse(text),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_none()
    }

    pub fn date(&self) -> Option<NaiveDate> {
        self.0
    }
}

/// `YYYY-MM-DD` with every digit present; chrono alone accepts unpadded fields.
fn is_iso_shape(text: &str) -> bool {
    let bytes = text.as_bytes();
    bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        })
}

impl From<NaiveDate> for NullableDate {
    fn from(date: NaiveDate) -> Self {
        Self::from_date(date)
    }
}

impl From<Option<NaiveDate>> for NullableDate {
    fn from(value: Option<NaiveDate>) -> Self {
        Self::from_storage_form(value)
    }
}

impl FromStr for NullableDate {
    type Err = DateParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for NullableDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(date) => write!(f, "{}", date.format(DATE_FORMAT)),
            None => Ok(()),
        }
    }
}

impl Serialize for NullableDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.to_text() {
            Some(text) => serializer.serialize_str(&text),
            None => serializer.serialize_none(),
        }
    }
}

impl<'de> Deserialize<'de> for NullableDate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        match raw {
            None => Ok(Self::empty()),
            Some(text) => Self::parse(&text).map_err(de::Error::custom),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn empty_string_parses_to_empty() {
        assert_eq!(NullableDate::parse(""), Ok(NullableDate::empty()));
    }

    #[test]
    fn parses_iso_date() {
        let date = NullableDate::parse("2025-01-31").unwrap();
        assert_eq!(date.date(), Some(ymd(2025, 1, 31)));
    }

    #[test]
    fn text_round_trips() {
        for s in ["2025-01-01", "1999-12-31", "2024-02-29", "0001-01-01"] {
            let parsed = NullableDate::parse(s).unwrap();
            assert_eq!(parsed.to_text().as_deref(), Some(s));
        }
        let empty = NullableDate::empty();
        assert_eq!(NullableDate::parse(&empty.to_text().unwrap_or_default()), Ok(empty));
    }

    #[test]
    fn rejects_malformed_strings() {
        for s in [
            "2025-1-01",
            "2025/01/01",
            "01-01-2025",
            "2025-02-30",
            "2025-13-01",
            "not a date",
            " 2025-01-01",
            "2025-01-01T00:00:00",
        ] {
            assert_matches!(NullableDate::parse(s), Err(DateParseError(_)), "{s}");
        }
    }

    #[test]
    fn storage_form_round_trips() {
        let present = NullableDate::from_date(ymd(2030, 6, 15));
        assert_eq!(NullableDate::from_storage_form(present.to_storage_form()), present);

        let empty = NullableDate::empty();
        assert_eq!(empty.to_storage_form(), None);
        assert_eq!(NullableDate::from_storage_form(None), empty);
    }

    #[test]
    fn storage_text_form() {
        assert_eq!(
            NullableDate::from_storage_text(Some("2025-03-04")).unwrap(),
            NullableDate::from_date(ymd(2025, 3, 4))
        );
        assert!(NullableDate::from_storage_text(None).unwrap().is_empty());
        assert!(NullableDate::from_storage_text(Some("garbage")).is_err());
    }

    #[test]
    fn display_is_empty_when_absent() {
        assert_eq!(NullableDate::empty().to_string(), "");
        assert_eq!(NullableDate::from_date(ymd(2025, 5, 6)).to_string(), "2025-05-06");
    }

    #[test]
    fn json_encoding() {
        let present = NullableDate::from_date(ymd(2025, 1, 1));
        assert_eq!(serde_json::to_string(&present).unwrap(), "\"2025-01-01\"");
        assert_eq!(serde_json::to_string(&NullableDate::empty()).unwrap(), "null");
    }

    #[test]
    fn json_decoding_accepts_null_and_empty_string() {
        let from_null: NullableDate = serde_json::from_str("null").unwrap();
        let from_empty: NullableDate = serde_json::from_str("\"\"").unwrap();
        assert!(from_null.is_empty());
        assert!(from_empty.is_empty());

        let parsed: NullableDate = serde_json::from_str("\"2024-12-31\"").unwrap();
        assert_eq!(parsed.date(), Some(ymd(2024, 12, 31)));
    }

    #[test]
    fn json_decoding_rejects_bad_date() {
        assert!(serde_json::from_str::<NullableDate>("\"31/12/2024\"").is_err());
        assert!(serde_json::from_str::<NullableDate>("20241231").is_err());
    }
}
