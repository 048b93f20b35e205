use crate::error::{CfpError, ParseError, Result};
use chrono::{NaiveDate, NaiveDateTime};
use std::fmt;
use tracing::trace;

/// Conversion specifiers that carry time-of-day information.
const TIME_SPECIFIERS: &str = "HIklMSpPTRrXc+s";

/// A strftime-style date/time pattern whose space-separated components
/// determine how many tokens a candidate window spans.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatPattern {
    pattern: String,
    width: usize,
    has_time: bool,
}

impl FormatPattern {
    pub fn new(pattern: &str) -> Result<Self> {
        let width = pattern.split_whitespace().count();
        if width == 0 {
            return Err(CfpError::Config("format pattern is empty".to_string()));
        }
        Ok(Self {
            pattern: pattern.to_string(),
            width,
            has_time: has_time_component(pattern),
        })
    }

    pub fn as_str(&self) -> &str {
        &self.pattern
    }

    /// Number of tokens in a scan window.
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn has_time(&self) -> bool {
        self.has_time
    }

    /// Parses one candidate string. Date-only patterns resolve to midnight.
    pub fn parse(&self, text: &str) -> Option<NaiveDateTime> {
        if self.has_time {
            NaiveDateTime::parse_from_str(text, &self.pattern).ok()
        } else {
            NaiveDate::parse_from_str(text, &self.pattern)
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        }
    }
}

impl fmt::Display for FormatPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.pattern)
    }
}

fn has_time_component(pattern: &str) -> bool {
    let mut chars = pattern.chars();
    while let Some(c) = chars.next() {
        if c != '%' {
            continue;
        }
        let mut spec = chars.next();
        if matches!(spec, Some('-' | '_' | '0' | '^' | '#')) {
            spec = chars.next();
        }
        match spec {
            Some(s) if TIME_SPECIFIERS.contains(s) => return true,
            _ => {}
        }
    }
    false
}

/// The window that produced the retained parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowMatch {
    pub start: usize,
    pub datetime: NaiveDateTime,
}

/// Tries every contiguous window of `pattern.width()` tokens, left to right.
///
/// When several windows parse, the rightmost one is returned.
pub fn scan(tokens: &[String], pattern: &FormatPattern) -> std::result::Result<WindowMatch, ParseError> {
    let width = pattern.width();
    if tokens.len() < width {
        return Err(ParseError::TooFewTokens {
            tokens: tokens.len(),
            width,
        });
    }

    let windows = tokens.len() - width + 1;
    (0..windows)
        .filter_map(|start| {
            let candidate = tokens[start..start + width].join(" ");
            let parsed = pattern.parse(&candidate);
            trace!(start, candidate = %candidate, matched = parsed.is_some(), "window attempt");
            parsed.map(|datetime| WindowMatch { start, datetime })
        })
        .last()
        .ok_or(ParseError::NoMatchingWindow { windows })
}
