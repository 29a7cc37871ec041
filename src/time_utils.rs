// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shared helpers for date/time formatting.

use chrono::{DateTime, SecondsFormat, Utc};

/// Format a UTC timestamp as RFC3339 using a `Z` suffix.
pub fn format_utc_rfc3339(date: DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Current time, formatted for storage.
pub fn now_rfc3339() -> String {
    format_utc_rfc3339(Utc::now())
}

/// Seconds since the Unix epoch.
pub fn unix_now() -> u64 {
    Utc::now().timestamp().max(0) as u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_format_uses_z_suffix() {
        let date = Utc.with_ymd_and_hms(2026, 3, 4, 5, 6, 7).unwrap();
        assert_eq!(format_utc_rfc3339(date), "2026-03-04T05:06:07.000Z");
    }

    #[test]
    fn test_timestamps_sort_lexicographically() {
        let earlier = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        let later = earlier + chrono::Duration::milliseconds(5);
        assert!(format_utc_rfc3339(earlier) < format_utc_rfc3339(later));
    }
}
