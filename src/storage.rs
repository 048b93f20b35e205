use crate::constants::RECORD_SEPARATOR;
use crate::error::{CfpError, Result};
use crate::types::ConferenceDeadlines;
use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, Offset};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tracing::{debug, info};

/// One persisted line: conference name and, when the deadline normalized,
/// its canonical timestamp with explicit offset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeadlineRecord {
    pub name: String,
    pub timestamp: Option<DateTime<FixedOffset>>,
}

impl DeadlineRecord {
    pub fn from_deadlines(deadlines: &ConferenceDeadlines) -> Self {
        Self {
            name: deadlines.name.clone(),
            timestamp: deadlines
                .deadline
                .persisted_timestamp()
                .map(|ts| ts.with_timezone(&ts.offset().fix())),
        }
    }

    /// `name|2025-05-16T08:59:00+09:00`, or `name|` without a timestamp.
    pub fn to_line(&self) -> String {
        let timestamp = self
            .timestamp
            .map(|ts| ts.to_rfc3339())
            .unwrap_or_default();
        format!("{}{}{}", self.name, RECORD_SEPARATOR, timestamp)
    }

    /// Parses a line written by `to_line`. `line_no` is only used in errors.
    pub fn parse_line(line: &str, line_no: usize) -> Result<Self> {
        let (name, timestamp) = line
            .rsplit_once(RECORD_SEPARATOR)
            .ok_or_else(|| CfpError::Record {
                line: line_no,
                message: format!("missing '{}' separator", RECORD_SEPARATOR),
            })?;
        if name.is_empty() {
            return Err(CfpError::Record {
                line: line_no,
                message: "empty conference name".to_string(),
            });
        }

        let timestamp = match timestamp.trim() {
            "" => None,
            text => Some(DateTime::parse_from_rfc3339(text).map_err(|e| CfpError::Record {
                line: line_no,
                message: format!("bad timestamp '{}': {}", text, e),
            })?),
        };

        Ok(Self {
            name: name.to_string(),
            timestamp,
        })
    }
}

pub fn render_records(records: &[DeadlineRecord]) -> String {
    records
        .iter()
        .map(|r| r.to_line() + "\n")
        .collect()
}

pub fn parse_records(content: &str) -> Result<Vec<DeadlineRecord>> {
    content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(i, line)| DeadlineRecord::parse_line(line, i + 1))
        .collect()
}

/// Persistence of one run's deadline list. `save` replaces what was there.
#[async_trait]
pub trait DeadlineStore: Send + Sync {
    async fn save(&self, records: &[DeadlineRecord]) -> Result<()>;
    async fn load(&self) -> Result<Vec<DeadlineRecord>>;
}

/// Flat text file, one record per line.
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl DeadlineStore for FileStore {
    async fn save(&self, records: &[DeadlineRecord]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        tokio::fs::write(&self.path, render_records(records)).await?;
        info!("💾 Saved {} records to {}", records.len(), self.path.display());
        Ok(())
    }

    async fn load(&self) -> Result<Vec<DeadlineRecord>> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No saved deadlines at {}", self.path.display());
                return Ok(Vec::new());
            }
            Err(e) => return Err(e.into()),
        };
        parse_records(&content)
    }
}

/// In-memory storage implementation for testing
#[derive(Default)]
pub struct InMemoryStore {
    records: Arc<Mutex<Vec<DeadlineRecord>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DeadlineStore for InMemoryStore {
    async fn save(&self, records: &[DeadlineRecord]) -> Result<()> {
        let mut stored = self
            .records
            .lock()
            .map_err(|_| CfpError::Storage {
                message: "deadline store lock poisoned".to_string(),
            })?;
        *stored = records.to_vec();
        Ok(())
    }

    async fn load(&self) -> Result<Vec<DeadlineRecord>> {
        let stored = self
            .records
            .lock()
            .map_err(|_| CfpError::Storage {
                message: "deadline store lock poisoned".to_string(),
            })?;
        Ok(stored.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_format() {
        let ts = DateTime::parse_from_rfc3339("2025-05-16T08:59:00+09:00").unwrap();
        let record = DeadlineRecord {
            name: "OSDI".to_string(),
            timestamp: Some(ts),
        };
        assert_eq!(record.to_line(), "OSDI|2025-05-16T08:59:00+09:00");

        let missing = DeadlineRecord {
            name: "HPDC".to_string(),
            timestamp: None,
        };
        assert_eq!(missing.to_line(), "HPDC|");
        assert_eq!(DeadlineRecord::parse_line("HPDC|", 1).unwrap(), missing);
    }

    #[test]
    fn test_malformed_lines() {
        assert!(matches!(
            DeadlineRecord::parse_line("no separator", 3),
            Err(CfpError::Record { line: 3, .. })
        ));
        assert!(DeadlineRecord::parse_line("X|yesterday", 1).is_err());
        assert!(DeadlineRecord::parse_line("|2025-05-16T08:59:00+09:00", 1).is_err());
    }

    #[test]
    fn test_blank_lines_are_skipped() {
        let records = parse_records("A|\n\nB|2025-01-01T00:00:00+00:00\n").unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].name, "B");
    }
}
