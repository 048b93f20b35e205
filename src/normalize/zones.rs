use crate::constants::{CANONICAL_ZONE, DEFAULT_ZONES};
use crate::error::{CfpError, Result};
use chrono_tz::Tz;
use once_cell::sync::Lazy;
use std::collections::BTreeMap;

static BUILTIN: Lazy<ZoneTable> = Lazy::new(|| {
    let zones = DEFAULT_ZONES
        .iter()
        .filter_map(|(abbr, name)| name.parse::<Tz>().ok().map(|tz| (abbr.to_string(), tz)))
        .collect();
    ZoneTable {
        zones,
        canonical: CANONICAL_ZONE.to_string(),
    }
});

/// Parses an IANA zone name such as `America/Los_Angeles`.
pub fn parse_zone(name: &str) -> Result<Tz> {
    name.trim()
        .parse::<Tz>()
        .map_err(|_| CfpError::UnknownZone(name.to_string()))
}

/// Maps zone abbreviations to geographic zones, with one entry designated
/// as the canonical output zone. Keys are stored uppercase.
#[derive(Debug, Clone, PartialEq)]
pub struct ZoneTable {
    zones: BTreeMap<String, Tz>,
    canonical: String,
}

impl ZoneTable {
    pub fn new<I, K>(entries: I, canonical: &str) -> Result<Self>
    where
        I: IntoIterator<Item = (K, Tz)>,
        K: AsRef<str>,
    {
        let zones = entries
            .into_iter()
            .map(|(abbr, tz)| (abbr.as_ref().trim().to_uppercase(), tz))
            .collect();
        Self {
            zones,
            canonical: String::new(),
        }
        .with_canonical(canonical)
    }

    /// The built-in table, canonical zone `KST`.
    pub fn builtin() -> &'static ZoneTable {
        &BUILTIN
    }

    /// Same entries, different canonical output zone.
    pub fn with_canonical(mut self, abbr: &str) -> Result<Self> {
        let key = abbr.trim().to_uppercase();
        if !self.zones.contains_key(&key) {
            return Err(CfpError::Config(format!(
                "canonical zone '{}' is not in the zone table",
                abbr
            )));
        }
        self.canonical = key;
        Ok(self)
    }

    pub fn insert(&mut self, abbr: &str, tz: Tz) {
        self.zones.insert(abbr.trim().to_uppercase(), tz);
    }

    pub fn lookup(&self, abbr: &str) -> Option<Tz> {
        self.zones.get(&abbr.to_uppercase()).copied()
    }

    pub fn canonical_abbr(&self) -> &str {
        &self.canonical
    }

    pub fn canonical_zone(&self) -> Tz {
        // with_canonical only accepts present keys and entries are never removed
        self.zones
            .get(&self.canonical)
            .copied()
            .unwrap_or(Tz::UTC)
    }

    pub fn len(&self) -> usize {
        self.zones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Tz)> {
        self.zones.iter().map(|(abbr, tz)| (abbr.as_str(), *tz))
    }

    /// Finds the zone stated in a token sequence. The last matching token
    /// wins; `None` means no zone was stated.
    pub fn resolve(&self, tokens: &[String]) -> Option<(String, Tz)> {
        tokens.iter().fold(None, |found, token| {
            match self.lookup(token) {
                Some(tz) => Some((token.to_uppercase(), tz)),
                None => found,
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(text: &str) -> Vec<String> {
        text.split_whitespace().map(str::to_string).collect()
    }

    #[test]
    fn test_builtin_table_is_complete() {
        let table = ZoneTable::builtin();
        assert_eq!(table.len(), DEFAULT_ZONES.len());
        assert_eq!(table.canonical_abbr(), "KST");
        assert_eq!(table.canonical_zone(), chrono_tz::Asia::Seoul);
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        let table = ZoneTable::builtin();
        assert_eq!(table.lookup("pst"), Some(chrono_tz::America::Los_Angeles));
        assert_eq!(table.lookup("Cet"), Some(chrono_tz::Europe::Paris));
        assert_eq!(table.lookup("XYZ"), None);
    }

    #[test]
    fn test_last_zone_token_wins() {
        let table = ZoneTable::builtin();
        let found = table.resolve(&tokens("MAY 1 2025 12:00 PM EST (9:00 AM PST)"));
        // "PST)" does not match, so the last exact match is EST
        assert_eq!(found.map(|(abbr, _)| abbr), Some("EST".to_string()));

        let found = table.resolve(&tokens("EST MAY 1 PST"));
        assert_eq!(found, Some(("PST".to_string(), chrono_tz::America::Los_Angeles)));
    }

    #[test]
    fn test_no_zone_is_not_an_error() {
        assert_eq!(ZoneTable::builtin().resolve(&tokens("MAY 1, 2025")), None);
    }

    #[test]
    fn test_canonical_must_be_a_key() {
        let result = ZoneTable::new([("UTC", Tz::UTC)], "KST");
        assert!(matches!(result, Err(CfpError::Config(_))));

        let table = ZoneTable::new([("utc", Tz::UTC)], "Utc").unwrap();
        assert_eq!(table.canonical_abbr(), "UTC");
    }

    #[test]
    fn test_parse_zone() {
        assert_eq!(parse_zone("Asia/Tokyo").unwrap(), chrono_tz::Asia::Tokyo);
        assert!(parse_zone("Mars/Olympus").is_err());
    }
}
