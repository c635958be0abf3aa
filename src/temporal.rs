// ⏳ Timestamp Resolution
// SMS backups store epoch milliseconds; output wants wall-clock time in the
// phone owner's zone, at second precision.

use chrono::{DateTime, Local, NaiveDateTime, Utc};
use chrono_tz::Tz;

use crate::error::{LedgerError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeZoneChoice {
    /// System local zone
    #[default]
    Local,

    /// Named IANA zone, e.g. "Africa/Cairo"
    Named(Tz),
}

impl TimeZoneChoice {
    pub fn parse(name: &str) -> Result<Self> {
        name.parse::<Tz>()
            .map(TimeZoneChoice::Named)
            .map_err(|_| LedgerError::InvalidTimeZone(name.to_string()))
    }

    /// Epoch milliseconds → wall-clock time, truncated to whole seconds.
    /// None when the value is outside chrono's representable range.
    pub fn resolve(&self, timestamp_millis: i64) -> Option<NaiveDateTime> {
        let utc = DateTime::<Utc>::from_timestamp(timestamp_millis.div_euclid(1000), 0)?;
        let local = match self {
            TimeZoneChoice::Local => utc.with_timezone(&Local).naive_local(),
            TimeZoneChoice::Named(tz) => utc.with_timezone(tz).naive_local(),
        };
        Some(local)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_resolve_named_zone() {
        let zone = TimeZoneChoice::parse("UTC").unwrap();
        // 2024-03-01T12:00:00.999Z
        let resolved = zone.resolve(1_709_294_400_999).unwrap();
        assert_eq!(
            resolved,
            NaiveDate::from_ymd_opt(2024, 3, 1).unwrap().and_hms_opt(12, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_resolve_applies_offset() {
        let zone = TimeZoneChoice::parse("Asia/Dubai").unwrap();
        let resolved = zone.resolve(1_709_294_400_000).unwrap();
        assert_eq!(resolved.format("%H:%M").to_string(), "16:00");
    }

    #[test]
    fn test_resolve_out_of_range() {
        assert!(TimeZoneChoice::parse("UTC").unwrap().resolve(i64::MAX).is_none());
    }

    #[test]
    fn test_parse_unknown_zone() {
        assert!(matches!(
            TimeZoneChoice::parse("Mars/Olympus"),
            Err(LedgerError::InvalidTimeZone(_))
        ));
    }
}
