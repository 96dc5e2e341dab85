//! # Temporal Types — UTC-Only Timestamps
//!
//! Every timestamp on a certification record is captured in UTC and
//! truncated to seconds. Records written by earlier deployments may carry
//! local-time offsets and sub-second precision; those are accepted on read
//! and normalized to UTC, so a re-serialized record is always `Z`-suffixed.
//!
//! ## Zero Value
//!
//! Record fields such as `revocationDate` exist from registration onward but
//! are only meaningful after the matching transition. Until then they hold
//! [`Timestamp::ZERO`], which serializes as `0001-01-01T00:00:00Z`.

use chrono::{DateTime, Timelike, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::CoreError;

/// Seconds from the Unix epoch back to `0001-01-01T00:00:00Z`.
const ZERO_EPOCH_SECS: i64 = -62_135_596_800;

/// A UTC-only timestamp, truncated to seconds precision.
///
/// # Construction
///
/// - [`Timestamp::now()`] — current UTC time, truncated.
/// - [`Timestamp::from_utc()`] — from a `DateTime<Utc>`, truncating sub-seconds.
/// - [`Timestamp::parse()`] — from an RFC 3339 string, rejecting non-UTC offsets.
/// - [`Timestamp::parse_lenient()`] — from any RFC 3339 string, converted to UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// The unset timestamp, `0001-01-01T00:00:00Z`.
    ///
    /// Held internally as the earliest representable instant so it orders
    /// before every real timestamp; [`Timestamp::as_datetime`] maps it back
    /// to year one.
    pub const ZERO: Timestamp = Timestamp(DateTime::<Utc>::MIN_UTC);

    /// Create a timestamp from the current UTC time, truncated to seconds.
    pub fn now() -> Self {
        Self(truncate_to_seconds(Utc::now()))
    }

    /// Create a timestamp from a `chrono::DateTime<Utc>`, truncating sub-seconds.
    pub fn from_utc(dt: DateTime<Utc>) -> Self {
        Self(truncate_to_seconds(dt))
    }

    /// Parse a timestamp from an RFC 3339 string with a `Z` suffix.
    ///
    /// Explicit offsets, including `+00:00`, are rejected.
    pub fn parse(s: &str) -> Result<Self, CoreError> {
        if !s.ends_with('Z') {
            return Err(CoreError::InvalidTimestamp {
                input: s.to_string(),
                reason: "must use Z suffix (UTC only)".to_string(),
            });
        }
        Self::parse_lenient(s)
    }

    /// Parse a timestamp from an RFC 3339 string, accepting any offset and
    /// converting to UTC.
    ///
    /// This is the read path for stored records.
    pub fn parse_lenient(s: &str) -> Result<Self, CoreError> {
        let dt = DateTime::parse_from_rfc3339(s).map_err(|e| CoreError::InvalidTimestamp {
            input: s.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self::from_utc(dt.with_timezone(&Utc)).normalize_zero())
    }

    /// Whether this is the unset timestamp.
    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }

    /// The instant this timestamp denotes. [`Timestamp::ZERO`] yields
    /// `0001-01-01T00:00:00Z`, the same instant it serializes as.
    pub fn as_datetime(&self) -> DateTime<Utc> {
        if self.is_zero() {
            return year_one();
        }
        self.0
    }

    /// Render as RFC 3339 with Z suffix (e.g., `2026-01-15T12:00:00Z`).
    pub fn to_iso8601(&self) -> String {
        self.as_datetime().format("%Y-%m-%dT%H:%M:%SZ").to_string()
    }

    /// Map the wire encoding of "unset" back onto [`Timestamp::ZERO`].
    fn normalize_zero(self) -> Self {
        if self.0.timestamp() <= ZERO_EPOCH_SECS {
            Self::ZERO
        } else {
            self
        }
    }
}

impl Default for Timestamp {
    fn default() -> Self {
        Self::ZERO
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_iso8601())
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_iso8601())
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse_lenient(&raw).map_err(serde::de::Error::custom)
    }
}

fn year_one() -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp(ZERO_EPOCH_SECS, 0).unwrap_or(DateTime::<Utc>::MIN_UTC)
}

/// Truncate a `DateTime<Utc>` to seconds precision (discard nanoseconds).
fn truncate_to_seconds(dt: DateTime<Utc>) -> DateTime<Utc> {
    dt.with_nanosecond(0).unwrap_or(dt)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_now_has_no_subseconds() {
        let ts = Timestamp::now();
        assert_eq!(ts.as_datetime().nanosecond(), 0);
        assert!(!ts.is_zero());
    }

    #[test]
    fn test_from_utc_truncates() {
        let dt = Utc.with_ymd_and_hms(2026, 1, 15, 12, 30, 45).unwrap();
        let ts = Timestamp::from_utc(dt.with_nanosecond(123_456_789).unwrap());
        assert_eq!(ts.to_iso8601(), "2026-01-15T12:30:45Z");
    }

    #[test]
    fn test_zero_renders_as_year_one() {
        assert_eq!(Timestamp::ZERO.to_iso8601(), "0001-01-01T00:00:00Z");
        assert_eq!(Timestamp::default(), Timestamp::ZERO);
        assert!(Timestamp::ZERO.is_zero());
    }

    #[test]
    fn test_zero_datetime_matches_serialized_instant() {
        let dt = Timestamp::ZERO.as_datetime();
        assert_eq!(dt, Utc.with_ymd_and_hms(1, 1, 1, 0, 0, 0).unwrap());
        assert_eq!(dt.timestamp(), ZERO_EPOCH_SECS);
        assert!(Timestamp::from_utc(dt).normalize_zero().is_zero());
    }

    #[test]
    fn test_zero_roundtrips_through_json() {
        let json = serde_json::to_string(&Timestamp::ZERO).unwrap();
        assert_eq!(json, "\"0001-01-01T00:00:00Z\"");
        let parsed: Timestamp = serde_json::from_str(&json).unwrap();
        assert!(parsed.is_zero());
    }

    #[test]
    fn test_parse_strict_rejects_offsets() {
        assert!(Timestamp::parse("2026-01-15T12:00:00Z").is_ok());
        assert!(Timestamp::parse("2026-01-15T12:00:00+00:00").is_err());
        assert!(Timestamp::parse("2026-01-15T17:00:00+05:00").is_err());
    }

    #[test]
    fn test_lenient_normalizes_local_time_to_utc() {
        let ts = Timestamp::parse_lenient("2026-01-15T17:00:00.987654321+05:00").unwrap();
        assert_eq!(ts.to_iso8601(), "2026-01-15T12:00:00Z");
    }

    #[test]
    fn test_lenient_rejects_garbage() {
        assert!(matches!(
            Timestamp::parse_lenient("yesterday"),
            Err(CoreError::InvalidTimestamp { .. })
        ));
    }

    #[test]
    fn test_ordering_follows_time() {
        let a = Timestamp::parse("2026-01-15T12:00:00Z").unwrap();
        let b = Timestamp::parse("2026-01-15T12:00:01Z").unwrap();
        assert!(Timestamp::ZERO < a);
        assert!(a < b);
    }

    proptest::proptest! {
        #[test]
        fn prop_serialized_form_is_always_utc(secs in 0i64..4_102_444_800, offset_h in -12i32..=12) {
            let offset = chrono::FixedOffset::east_opt(offset_h * 3600).unwrap();
            let local = offset.timestamp_opt(secs, 0).unwrap();
            let ts = Timestamp::parse_lenient(&local.to_rfc3339()).unwrap();
            let rendered = ts.to_iso8601();
            proptest::prop_assert!(rendered.ends_with('Z'));
            proptest::prop_assert_eq!(ts.as_datetime().timestamp(), secs);
        }
    }
}
