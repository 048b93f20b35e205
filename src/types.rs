use crate::constants::SORT_SENTINEL_YEAR;
use crate::error::{FetchError, ParseError};
use crate::locator::Locator;
use crate::normalize::FormatPattern;
use chrono::{DateTime, Datelike, NaiveDateTime, Utc};
use chrono_tz::Tz;
use std::cmp::Ordering;

/// Where a date lives on a page and how it is written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateTarget {
    pub locator: Locator,
    pub pattern: FormatPattern,
}

/// Static, validated configuration for one conference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConferenceSource {
    pub name: String,
    pub url: String,
    pub deadline: DateTarget,
    pub notification: Option<DateTarget>,
}

/// Outcome of normalizing one scraped date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeadlineStatus {
    Ok,
    /// No window matched; `raw` is the cleaned, space-joined token text.
    ParseFailed { raw: String, reason: ParseError },
    FetchFailed { reason: String },
    LocatorFailed { reason: String },
}

impl DeadlineStatus {
    pub fn label(&self) -> &'static str {
        match self {
            DeadlineStatus::Ok => "ok",
            DeadlineStatus::ParseFailed { .. } => "parse_failed",
            DeadlineStatus::FetchFailed { .. } => "fetch_failed",
            DeadlineStatus::LocatorFailed { .. } => "locator_failed",
        }
    }
}

impl From<FetchError> for DeadlineStatus {
    fn from(err: FetchError) -> Self {
        match err {
            FetchError::FetchFailed(reason) => DeadlineStatus::FetchFailed { reason },
            FetchError::LocatorFailed(reason) => DeadlineStatus::LocatorFailed { reason },
        }
    }
}

/// A deadline expressed in the canonical output zone.
///
/// For every status other than `Ok`, `timestamp` is a placeholder (the Unix
/// epoch in the canonical zone) that only keeps the ordering total.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedDeadline {
    pub status: DeadlineStatus,
    pub timestamp: DateTime<Tz>,
    /// Zone abbreviation found in the text, `None` when the deadline was
    /// treated as Anywhere on Earth.
    pub zone: Option<String>,
    pub display: String,
}

impl NormalizedDeadline {
    pub fn ok(timestamp: DateTime<Tz>, zone: Option<String>) -> Self {
        let display = timestamp.format("%Y-%m-%d %H:%M %Z").to_string();
        Self {
            status: DeadlineStatus::Ok,
            timestamp,
            zone,
            display,
        }
    }

    /// A non-`Ok` entry carrying the placeholder timestamp.
    pub fn failed(status: DeadlineStatus, canonical: Tz) -> Self {
        let display = match &status {
            DeadlineStatus::Ok => String::new(),
            DeadlineStatus::ParseFailed { raw, .. } => raw.clone(),
            DeadlineStatus::FetchFailed { reason } => format!("<fetch failed: {reason}>"),
            DeadlineStatus::LocatorFailed { reason } => format!("<locator failed: {reason}>"),
        };
        Self {
            status,
            timestamp: placeholder_timestamp(canonical),
            zone: None,
            display,
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == DeadlineStatus::Ok
    }

    /// The timestamp to persist: `None` unless the status is `Ok`.
    pub fn persisted_timestamp(&self) -> Option<DateTime<Tz>> {
        self.is_ok().then(|| self.timestamp.clone())
    }

    /// Canonical wall-clock time with the year forced to the sentinel year.
    /// Only meaningful for ordering.
    pub fn month_day(&self) -> NaiveDateTime {
        let local = self.timestamp.naive_local();
        local.with_year(SORT_SENTINEL_YEAR).unwrap_or(local)
    }

    pub fn sort_key(&self) -> SortKey {
        if self.is_ok() {
            SortKey::Available {
                month_day: self.month_day(),
                instant: self.timestamp.with_timezone(&Utc),
            }
        } else {
            SortKey::Unavailable
        }
    }
}

pub fn placeholder_timestamp(canonical: Tz) -> DateTime<Tz> {
    DateTime::<Utc>::default().with_timezone(&canonical)
}

/// Ordering key for deadlines across conferences.
///
/// Available deadlines order by month and day (year ignored), then by the
/// real instant. Every unavailable deadline sorts first and ties with the
/// others.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum SortKey {
    Unavailable,
    Available {
        month_day: NaiveDateTime,
        instant: DateTime<Utc>,
    },
}

/// Normalized dates for one conference, as produced by the orchestrator.
#[derive(Debug, Clone, PartialEq)]
pub struct ConferenceDeadlines {
    pub name: String,
    pub deadline: NormalizedDeadline,
    pub notification: Option<NormalizedDeadline>,
}

impl ConferenceDeadlines {
    pub fn cmp_by_deadline(&self, other: &Self) -> Ordering {
        self.deadline.sort_key().cmp(&other.deadline.sort_key())
    }
}
