use thiserror::Error;

#[derive(Error, Debug)]
pub enum CfpError {
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Unknown time zone: {0}")]
    UnknownZone(String),

    #[error("Invalid locator '{locator}': {reason}")]
    InvalidLocator { locator: String, reason: String },

    #[error("Malformed record on line {line}: {message}")]
    Record { line: usize, message: String },

    #[error("Storage error: {message}")]
    Storage { message: String },
}

pub type Result<T> = std::result::Result<T, CfpError>;

/// Failures reported by the page fetch adapter. Both are non-fatal for a run.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("fetch failed: {0}")]
    FetchFailed(String),

    #[error("locator failed: {0}")]
    LocatorFailed(String),
}

/// Why the sliding-window date parser found nothing.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("only {tokens} tokens for a {width}-component pattern")]
    TooFewTokens { tokens: usize, width: usize },

    #[error("none of {windows} windows matched the pattern")]
    NoMatchingWindow { windows: usize },
}
