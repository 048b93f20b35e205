//! Element locators for the deadline text on a conference page.
//!
//! Sources name the element either with a CSS selector or with an absolute
//! element path such as `/html/body/div[2]/ul/li[1]`. Paths are translated
//! to the equivalent child-combinator CSS selector so the fetch adapter
//! only ever deals with one selector engine.

use crate::error::{CfpError, Result};
use scraper::Selector;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Locator {
    Css(String),
    Path(String),
}

impl Locator {
    /// The CSS selector text this locator resolves to.
    pub fn to_css(&self) -> Result<String> {
        match self {
            Locator::Css(css) => Ok(css.clone()),
            Locator::Path(path) => path_to_css(path),
        }
    }

    /// Compiles the locator. Used at config load time and by the fetcher.
    pub fn selector(&self) -> Result<Selector> {
        let css = self.to_css()?;
        Selector::parse(&css).map_err(|e| CfpError::InvalidLocator {
            locator: self.to_string(),
            reason: format!("{:?}", e),
        })
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Locator::Css(css) => write!(f, "css:{css}"),
            Locator::Path(path) => write!(f, "path:{path}"),
        }
    }
}

/// Translates `/a/b[2]/c` into `a > b:nth-of-type(2) > c`.
///
/// Only absolute, single-slash paths of element names with optional
/// 1-based positional predicates are accepted.
pub fn path_to_css(path: &str) -> Result<String> {
    let invalid = |reason: &str| CfpError::InvalidLocator {
        locator: path.to_string(),
        reason: reason.to_string(),
    };

    let rest = path
        .strip_prefix('/')
        .ok_or_else(|| invalid("element path must start with '/'"))?;
    if rest.is_empty() {
        return Err(invalid("element path is empty"));
    }

    let mut parts = Vec::new();
    for segment in rest.split('/') {
        if segment.is_empty() {
            return Err(invalid("descendant steps ('//') are not supported"));
        }
        let (name, position) = match segment.split_once('[') {
            Some((name, predicate)) => {
                let index = predicate
                    .strip_suffix(']')
                    .and_then(|n| n.parse::<usize>().ok())
                    .filter(|n| *n >= 1)
                    .ok_or_else(|| invalid("predicates must be positive integers like [2]"))?;
                (name, Some(index))
            }
            None => (segment, None),
        };
        if name.is_empty()
            || !name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(invalid("steps must be plain element names"));
        }
        let name = name.to_ascii_lowercase();
        parts.push(match position {
            Some(n) => format!("{name}:nth-of-type({n})"),
            None => name,
        });
    }

    Ok(parts.join(" > "))
}
