//! Date-text normalization.
//!
//! `normalize` runs the whole chain on one scraped snippet: strip ordinal
//! suffixes and tokenize, find the stated zone, scan token windows against
//! the format pattern, then express the result in the canonical zone.
//! It is a pure function of its inputs and safe to call from any task.
//!
//! The zone is looked up in the tokens as scraped, before suffix
//! stripping, which would otherwise turn `PST` into `P`.
//!
//! A stated `AOE` on a date-only pattern means the end of that day, so it
//! takes the same 36-hour shift as a deadline with no zone at all.

pub mod canonical;
pub mod cleaner;
pub mod window;
pub mod zones;

pub use canonical::{attach_zone, canonicalize};
pub use cleaner::{clean, strip_ordinals, tokenize};
pub use window::{scan, FormatPattern, WindowMatch};
pub use zones::{parse_zone, ZoneTable};

use crate::constants::AOE_ZONE;
use crate::types::{DeadlineStatus, NormalizedDeadline};
use tracing::debug;

pub fn normalize(raw: &str, pattern: &FormatPattern, zones: &ZoneTable) -> NormalizedDeadline {
    let stated = zones.resolve(&tokenize(raw));
    let tokens = clean(raw);

    match scan(&tokens, pattern) {
        Ok(found) => {
            let (abbr, tz) = match stated {
                Some((abbr, _)) if abbr == AOE_ZONE && !pattern.has_time() => (Some(abbr), None),
                Some((abbr, tz)) => (Some(abbr), Some(tz)),
                None => (None, None),
            };
            let timestamp = canonicalize(found.datetime, tz, zones.canonical_zone());
            debug!(
                window = found.start,
                parsed = %found.datetime,
                zone = abbr.as_deref().unwrap_or("AoE"),
                canonical = %timestamp,
                "normalized deadline"
            );
            NormalizedDeadline::ok(timestamp, abbr)
        }
        Err(reason) => {
            let raw = tokens.join(" ");
            debug!(%reason, raw = %raw, pattern = %pattern, "no parseable date");
            NormalizedDeadline::failed(
                DeadlineStatus::ParseFailed { raw, reason },
                zones.canonical_zone(),
            )
        }
    }
}
