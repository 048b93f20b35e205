use async_trait::async_trait;
use cfp_deadlines::app::ports::PageFetcher;
use cfp_deadlines::error::FetchError;
use cfp_deadlines::locator::Locator;
use cfp_deadlines::normalize::{FormatPattern, ZoneTable};
use cfp_deadlines::pipeline::Pipeline;
use cfp_deadlines::types::{ConferenceSource, DateTarget, DeadlineStatus};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

/// Serves canned text keyed by (url, locator), with optional delays so
/// tasks finish out of order.
struct FakeFetcher {
    pages: HashMap<(String, String), Result<String, FetchError>>,
    delays: HashMap<String, Duration>,
}

impl FakeFetcher {
    fn new() -> Self {
        Self {
            pages: HashMap::new(),
            delays: HashMap::new(),
        }
    }

    fn with(mut self, url: &str, css: &str, result: Result<&str, FetchError>) -> Self {
        self.pages.insert(
            (url.to_string(), css.to_string()),
            result.map(str::to_string),
        );
        self
    }

    fn delayed(mut self, url: &str, millis: u64) -> Self {
        self.delays.insert(url.to_string(), Duration::from_millis(millis));
        self
    }
}

#[async_trait]
impl PageFetcher for FakeFetcher {
    async fn fetch_text(&self, url: &str, locator: &Locator) -> Result<String, FetchError> {
        if let Some(delay) = self.delays.get(url) {
            tokio::time::sleep(*delay).await;
        }
        let css = locator.to_css().map_err(|e| FetchError::LocatorFailed(e.to_string()))?;
        self.pages
            .get(&(url.to_string(), css))
            .cloned()
            .unwrap_or_else(|| Err(FetchError::LocatorFailed("no element".to_string())))
    }
}

fn source(name: &str, url: &str, format: &str) -> ConferenceSource {
    ConferenceSource {
        name: name.to_string(),
        url: url.to_string(),
        deadline: DateTarget {
            locator: Locator::Css("strong".to_string()),
            pattern: FormatPattern::new(format).unwrap(),
        },
        notification: None,
    }
}

#[tokio::test]
async fn test_run_sorts_and_keeps_failures() {
    let fetcher = FakeFetcher::new()
        .with("https://may.example", "strong", Ok("DEADLINE: MAY 20, 2025"))
        .with("https://jan.example", "strong", Ok("JANUARY 10, 2026 (FIRM)"))
        .with("https://tba.example", "strong", Ok("TO BE ANNOUNCED"))
        .with(
            "https://down.example",
            "strong",
            Err(FetchError::FetchFailed("connection refused".to_string())),
        )
        .delayed("https://jan.example", 50);

    let sources = vec![
        source("May", "https://may.example", "%B %d, %Y"),
        source("Jan", "https://jan.example", "%B %d, %Y"),
        source("Tba", "https://tba.example", "%B %d, %Y"),
        source("Down", "https://down.example", "%B %d, %Y"),
        source("Gone", "https://gone.example", "%B %d, %Y"),
    ];

    let result = Pipeline::run(
        sources,
        Arc::new(fetcher),
        Arc::new(ZoneTable::builtin().clone()),
    )
    .await;

    assert_eq!(result.rows.len(), 5);
    assert_eq!(result.ok, 2);
    assert_eq!(result.parse_failed, 1);
    assert_eq!(result.fetch_failed, 1);
    assert_eq!(result.locator_failed, 1);
    assert_eq!(result.failed(), 3);

    let names: Vec<&str> = result.rows.iter().map(|r| r.name.as_str()).collect();
    // failures first in input order, then January (2026) before May (2025)
    assert_eq!(names, vec!["Tba", "Down", "Gone", "Jan", "May"]);

    assert!(matches!(
        result.rows[0].deadline.status,
        DeadlineStatus::ParseFailed { .. }
    ));
    assert_eq!(result.rows[0].deadline.display, "TO BE ANNOUNCED");
    assert_eq!(result.rows[1].deadline.display, "<fetch failed: connection refused>");
}

#[tokio::test]
async fn test_notification_target_is_normalized() {
    let fetcher = FakeFetcher::new()
        .with("https://conf.example", "strong", Ok("MARCH 3RD, 2025 AOE"))
        .with("https://conf.example", "em", Ok("NOTIFICATION MAY 2ND, 2025"));

    let mut conf = source("Conf", "https://conf.example", "%B %d, %Y");
    conf.notification = Some(DateTarget {
        locator: Locator::Css("em".to_string()),
        pattern: FormatPattern::new("%B %d, %Y").unwrap(),
    });

    let result = Pipeline::run(
        vec![conf],
        Arc::new(fetcher),
        Arc::new(ZoneTable::builtin().clone()),
    )
    .await;

    let row = &result.rows[0];
    assert!(row.deadline.is_ok());
    assert_eq!(row.deadline.zone.as_deref(), Some("AOE"));
    // end of March 3 AoE (UTC-12) is March 4 12:00 UTC, 21:00 in Seoul
    assert_eq!(row.deadline.display, "2025-03-04 21:00 KST");

    let notification = row.notification.as_ref().unwrap();
    assert!(notification.is_ok());
    assert_eq!(notification.display, "2025-05-03 21:00 KST");
}

#[tokio::test]
async fn test_repeated_runs_are_identical() {
    let make = || {
        FakeFetcher::new()
            .with("https://a.example", "strong", Ok("JUNE 1, 2025"))
            .with("https://b.example", "strong", Ok("JUNE 1, 2025"))
    };
    let sources = vec![
        source("A", "https://a.example", "%B %d, %Y"),
        source("B", "https://b.example", "%B %d, %Y"),
    ];
    let zones = Arc::new(ZoneTable::builtin().clone());

    let first = Pipeline::run(sources.clone(), Arc::new(make()), zones.clone()).await;
    let second = Pipeline::run(sources, Arc::new(make()), zones).await;

    assert_eq!(first.rows, second.rows);
    assert_eq!(first.rows[0].deadline.timestamp, first.rows[1].deadline.timestamp);
}
