//! Time and timestamp helpers.

use chrono::{DateTime, FixedOffset, Offset, Utc};

/// UTC timestamp used for execution times and schedule state.
pub type Timestamp = DateTime<Utc>;

/// Return the current UTC time.
#[must_use]
pub fn now() -> Timestamp {
    Utc::now()
}

/// Build a fixed offset from a number of minutes east of UTC.
///
/// Out-of-range values (beyond ±24h) fall back to UTC.
#[must_use]
pub fn offset_from_minutes(minutes: i32) -> FixedOffset {
    FixedOffset::east_opt(minutes.saturating_mul(60)).unwrap_or_else(|| Utc.fix())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_return_current_utc_time() {
        let before = Utc::now();
        let ts = now();
        let after = Utc::now();
        assert!(ts >= before);
        assert!(ts <= after);
    }

    #[test]
    fn should_build_offset_from_minutes() {
        assert_eq!(offset_from_minutes(120).local_minus_utc(), 7200);
        assert_eq!(offset_from_minutes(-330).local_minus_utc(), -19800);
    }

    #[test]
    fn should_fall_back_to_utc_when_offset_out_of_range() {
        assert_eq!(offset_from_minutes(25 * 60).local_minus_utc(), 0);
    }
}
