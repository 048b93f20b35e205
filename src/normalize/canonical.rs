use crate::constants::AOE_SHIFT_HOURS;
use chrono::{DateTime, Duration, LocalResult, NaiveDateTime, Offset, TimeZone};
use chrono_tz::Tz;

/// Attaches a zone to a parsed wall-clock time.
///
/// With a zone, the wall clock is read in that zone's calendar rules: an
/// ambiguous time takes the earlier instant, a time inside a spring-forward
/// gap takes the offset in force before the gap. Without a zone, the
/// deadline is shifted 36 hours and labeled UTC.
pub fn attach_zone(naive: NaiveDateTime, zone: Option<Tz>) -> DateTime<Tz> {
    match zone {
        Some(tz) => match tz.from_local_datetime(&naive) {
            LocalResult::Single(dt) => dt,
            LocalResult::Ambiguous(earliest, _) => earliest,
            LocalResult::None => {
                let offset = tz.offset_from_utc_datetime(&naive).fix();
                tz.from_utc_datetime(&(naive - offset))
            }
        },
        None => {
            let shifted = naive
                .checked_add_signed(Duration::hours(AOE_SHIFT_HOURS))
                .unwrap_or(NaiveDateTime::MAX);
            Tz::UTC.from_utc_datetime(&shifted)
        }
    }
}

/// Attaches the zone, then converts into the canonical output zone.
pub fn canonicalize(naive: NaiveDateTime, zone: Option<Tz>, canonical: Tz) -> DateTime<Tz> {
    attach_zone(naive, zone).with_timezone(&canonical)
}
