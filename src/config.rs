use crate::constants::{
    BUILTIN_CONFERENCES, DEFAULT_CACHE_PATH, DEFAULT_RETRY_DELAY_MS, DEFAULT_TIMEOUT_SECONDS,
    DEFAULT_USER_AGENT, RECORD_SEPARATOR,
};
use crate::error::{CfpError, Result};
use crate::locator::Locator;
use crate::normalize::{parse_zone, FormatPattern, ZoneTable};
use crate::types::{ConferenceSource, DateTarget};
use serde::Deserialize;
use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    canonical_zone: Option<String>,
    cache_path: Option<PathBuf>,
    #[serde(default)]
    fetch: RawFetch,
    #[serde(default)]
    zones: BTreeMap<String, String>,
    #[serde(default, rename = "conference")]
    conferences: Vec<RawConference>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawFetch {
    timeout_seconds: Option<u64>,
    retry_delay_ms: Option<u64>,
    user_agent: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawConference {
    name: String,
    url: String,
    #[serde(flatten)]
    deadline: RawTarget,
    notification: Option<RawTarget>,
}

#[derive(Debug, Deserialize)]
struct RawTarget {
    selector: Option<String>,
    xpath: Option<String>,
    format: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchSettings {
    pub timeout: Duration,
    pub retry_delay: Duration,
    pub user_agent: String,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECONDS),
            retry_delay: Duration::from_millis(DEFAULT_RETRY_DELAY_MS),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub sources: Vec<ConferenceSource>,
    pub zones: ZoneTable,
    pub fetch: FetchSettings,
    pub cache_path: PathBuf,
}

impl Config {
    /// Loads `path`. A missing file at the default location falls back to
    /// the built-in conference list; an explicitly requested file must exist.
    pub fn load(path: &Path, explicit: bool) -> Result<Self> {
        if !path.exists() && !explicit {
            info!("No config at {}, using built-in conferences", path.display());
            return Self::builtin();
        }
        let content = fs::read_to_string(path).map_err(|e| {
            CfpError::Config(format!("Failed to read config file '{}': {}", path.display(), e))
        })?;
        let config = Self::from_toml_str(&content)?;
        info!(
            "Loaded {} conferences from {}",
            config.sources.len(),
            path.display()
        );
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let raw: RawConfig = toml::from_str(content)?;
        Self::validate(raw)
    }

    pub fn builtin() -> Result<Self> {
        let sources = BUILTIN_CONFERENCES
            .iter()
            .map(|c| {
                build_source(
                    c.name,
                    c.url,
                    RawTarget {
                        selector: None,
                        xpath: Some(c.xpath.to_string()),
                        format: c.format.to_string(),
                    },
                    None,
                )
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            sources,
            zones: ZoneTable::builtin().clone(),
            fetch: FetchSettings::default(),
            cache_path: PathBuf::from(DEFAULT_CACHE_PATH),
        })
    }

    /// Sources whose names appear in `names` (case-insensitive).
    pub fn select_sources(&self, names: &[String]) -> Result<Vec<ConferenceSource>> {
        names
            .iter()
            .map(|name| {
                self.sources
                    .iter()
                    .find(|s| s.name.eq_ignore_ascii_case(name))
                    .cloned()
                    .ok_or_else(|| CfpError::Config(format!("Unknown conference: {}", name)))
            })
            .collect()
    }

    fn validate(raw: RawConfig) -> Result<Self> {
        let mut zones = ZoneTable::builtin().clone();
        for (abbr, name) in &raw.zones {
            zones.insert(abbr, parse_zone(name)?);
        }
        if let Some(canonical) = &raw.canonical_zone {
            zones = zones.with_canonical(canonical)?;
        }

        if raw.conferences.is_empty() {
            return Err(CfpError::Config("no [[conference]] entries".to_string()));
        }

        let mut seen = HashSet::new();
        let mut sources = Vec::with_capacity(raw.conferences.len());
        for conference in raw.conferences {
            if !seen.insert(conference.name.to_lowercase()) {
                return Err(CfpError::Config(format!(
                    "duplicate conference name: {}",
                    conference.name
                )));
            }
            sources.push(build_source(
                &conference.name,
                &conference.url,
                conference.deadline,
                conference.notification,
            )?);
        }

        let defaults = FetchSettings::default();
        let fetch = FetchSettings {
            timeout: raw
                .fetch
                .timeout_seconds
                .map(Duration::from_secs)
                .unwrap_or(defaults.timeout),
            retry_delay: raw
                .fetch
                .retry_delay_ms
                .map(Duration::from_millis)
                .unwrap_or(defaults.retry_delay),
            user_agent: raw.fetch.user_agent.unwrap_or(defaults.user_agent),
        };

        debug!(
            zones = zones.len(),
            canonical = zones.canonical_abbr(),
            "config validated"
        );
        Ok(Self {
            sources,
            zones,
            fetch,
            cache_path: raw
                .cache_path
                .unwrap_or_else(|| PathBuf::from(DEFAULT_CACHE_PATH)),
        })
    }
}

fn build_source(
    name: &str,
    url: &str,
    deadline: RawTarget,
    notification: Option<RawTarget>,
) -> Result<ConferenceSource> {
    let name = name.trim();
    if name.is_empty() {
        return Err(CfpError::Config("conference name is empty".to_string()));
    }
    if name.contains(RECORD_SEPARATOR) || name.contains('\n') {
        return Err(CfpError::Config(format!(
            "conference name '{}' contains a reserved character",
            name
        )));
    }
    if url.trim().is_empty() {
        return Err(CfpError::Config(format!("{}: url is empty", name)));
    }

    Ok(ConferenceSource {
        name: name.to_string(),
        url: url.trim().to_string(),
        deadline: build_target(name, deadline)?,
        notification: notification
            .map(|target| build_target(name, target))
            .transpose()?,
    })
}

fn build_target(name: &str, raw: RawTarget) -> Result<DateTarget> {
    let locator = match (raw.selector, raw.xpath) {
        (Some(css), None) => Locator::Css(css),
        (None, Some(path)) => Locator::Path(path),
        _ => {
            return Err(CfpError::Config(format!(
                "{}: exactly one of `selector` or `xpath` is required",
                name
            )))
        }
    };
    // Fail at load time rather than on the first fetch
    locator.selector()?;

    let pattern = FormatPattern::new(&raw.format)
        .map_err(|e| CfpError::Config(format!("{}: {}", name, e)))?;

    Ok(DateTarget { locator, pattern })
}
