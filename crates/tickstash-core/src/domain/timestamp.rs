//! The collector's two notions of time.
//!
//! A quote record carries an observation instant (`UtcDateTime`, RFC3339,
//! always UTC: when the collector ran) and a session date (`time::Date`,
//! `YYYY-MM-DD`: the trading day the price belongs to). The instant goes
//! into the store key, the date goes into the history table; they are
//! deliberately separate values.

use std::fmt::{Display, Formatter};

use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use time::format_description::well_known::Rfc3339;
use time::{Date, OffsetDateTime, UtcOffset};

use crate::ValidationError;

const SESSION_DATE_FORMAT: &[time::format_description::FormatItem<'static>] =
    time::macros::format_description!("[year]-[month]-[day]");

/// Format a trading-session date as `YYYY-MM-DD`, the form used in the
/// history table and on chart axis labels.
pub fn format_session_date(date: Date) -> String {
    date.format(&SESSION_DATE_FORMAT)
        .expect("session date must be formattable")
}

/// Parse a `YYYY-MM-DD` session date read back from a history table.
pub fn parse_session_date(input: &str) -> Result<Date, ValidationError> {
    Date::parse(input.trim(), &SESSION_DATE_FORMAT).map_err(|_| {
        ValidationError::InvalidSessionDate {
            value: input.to_owned(),
        }
    })
}

/// Observation instant of a collection run, always UTC.
///
/// Construction is via [`UtcDateTime::now`] or deserialization; there is
/// no way to hold a non-UTC value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct UtcDateTime(OffsetDateTime);

impl UtcDateTime {
    /// Current wall-clock instant. This is what gets stamped on a record
    /// and composed into its store key.
    pub fn now() -> Self {
        Self(OffsetDateTime::now_utc())
    }

    pub fn into_inner(self) -> OffsetDateTime {
        self.0
    }

    /// RFC3339 rendering, e.g. `2024-06-03T20:05:11.123Z`. Used for the
    /// store key suffix and status output.
    pub fn format_rfc3339(self) -> String {
        self.0
            .format(&Rfc3339)
            .expect("UtcDateTime must be RFC3339 formattable")
    }
}

impl Display for UtcDateTime {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.format_rfc3339())
    }
}

impl Serialize for UtcDateTime {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.format_rfc3339())
    }
}

impl<'de> Deserialize<'de> for UtcDateTime {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        let parsed = OffsetDateTime::parse(&value, &Rfc3339)
            .map_err(|_| D::Error::custom(format!("not an RFC3339 timestamp: '{value}'")))?;
        if parsed.offset() != UtcOffset::UTC {
            return Err(D::Error::custom(format!(
                "observation timestamps must be UTC: '{value}'"
            )));
        }
        Ok(Self(parsed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    #[test]
    fn observation_instant_round_trips_through_serde() {
        let observed_at = UtcDateTime::now();
        let json = serde_json::to_string(&observed_at).expect("serialize");
        let back: UtcDateTime = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, observed_at);
    }

    #[test]
    fn non_utc_observation_instant_is_rejected() {
        let error = serde_json::from_str::<UtcDateTime>(r#""2024-06-03T21:05:11+01:00""#)
            .expect_err("must fail");
        assert!(error.to_string().contains("UTC"));
    }

    #[test]
    fn session_date_uses_the_table_format() {
        let session = date!(2024 - 06 - 03);
        let formatted = format_session_date(session);
        assert_eq!(formatted, "2024-06-03");
        assert_eq!(parse_session_date(&formatted).expect("must parse"), session);
    }

    #[test]
    fn session_date_rejects_other_layouts() {
        for input in ["06/03/2024", "2024-06-03T20:05:11Z", "Jun 3 2024"] {
            let error = parse_session_date(input).expect_err("must fail");
            assert!(matches!(error, ValidationError::InvalidSessionDate { .. }));
        }
    }
}
