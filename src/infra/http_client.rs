use crate::app::ports::PageFetcher;
use crate::config::FetchSettings;
use crate::error::{FetchError, Result};
use crate::locator::Locator;
use async_trait::async_trait;
use scraper::Html;
use std::time::Duration;
use tracing::{debug, instrument, warn};

pub struct ReqwestPageFetcher {
    client: reqwest::Client,
    retry_delay: Duration,
}

impl ReqwestPageFetcher {
    pub fn new(settings: &FetchSettings) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(settings.timeout)
            .user_agent(settings.user_agent.clone())
            .build()?;
        Ok(Self {
            client,
            retry_delay: settings.retry_delay,
        })
    }

    async fn get_page(&self, url: &str) -> std::result::Result<String, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::FetchFailed(e.to_string()))?;

        if !response.status().is_success() {
            return Err(FetchError::FetchFailed(format!(
                "GET {} returned status {}",
                url,
                response.status()
            )));
        }

        response
            .text()
            .await
            .map_err(|e| FetchError::FetchFailed(e.to_string()))
    }
}

#[async_trait]
impl PageFetcher for ReqwestPageFetcher {
    #[instrument(skip(self, locator), fields(locator = %locator))]
    async fn fetch_text(&self, url: &str, locator: &Locator) -> std::result::Result<String, FetchError> {
        let page = self.get_page(url).await?;
        if let Some(text) = extract_text(&page, locator)? {
            debug!(text = %text, "located deadline text");
            return Ok(text);
        }

        // Pages that render late sometimes need a second look
        warn!("Locator matched nothing, retrying once in {:?}", self.retry_delay);
        tokio::time::sleep(self.retry_delay).await;
        let page = self.get_page(url).await?;
        extract_text(&page, locator)?
            .ok_or_else(|| FetchError::LocatorFailed(format!("no element matches {}", locator)))
    }
}

/// Text of the first element matching `locator`: concatenated text nodes,
/// whitespace collapsed, uppercased. `Ok(None)` when nothing matches.
pub fn extract_text(html: &str, locator: &Locator) -> std::result::Result<Option<String>, FetchError> {
    let selector = locator
        .selector()
        .map_err(|e| FetchError::LocatorFailed(e.to_string()))?;
    let document = Html::parse_document(html);

    Ok(document.select(&selector).next().map(|element| {
        element
            .text()
            .collect::<String>()
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
            .to_uppercase()
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"<!DOCTYPE html>
<html><body>
  <main>
    <ul>
      <li>Abstract: March 1st, 2025</li>
      <li>Paper submission: <strong>Thursday, April 10, 2025,
          11:59 pm <abbr>PDT</abbr></strong></li>
    </ul>
    <p class="note">Notification: May 22<sup>nd</sup> '25</p>
  </main>
</body></html>"#;

    #[test]
    fn test_extract_by_path() {
        let locator = Locator::Path("/html/body/main/ul/li[2]/strong".into());
        let text = extract_text(PAGE, &locator).unwrap();
        assert_eq!(text.as_deref(), Some("THURSDAY, APRIL 10, 2025, 11:59 PM PDT"));
    }

    #[test]
    fn test_extract_by_css_joins_inline_text() {
        let locator = Locator::Css("p.note".into());
        let text = extract_text(PAGE, &locator).unwrap();
        assert_eq!(text.as_deref(), Some("NOTIFICATION: MAY 22ND '25"));
    }

    #[test]
    fn test_missing_element_is_none() {
        let locator = Locator::Path("/html/body/main/ul/li[3]".into());
        assert_eq!(extract_text(PAGE, &locator).unwrap(), None);
    }

    #[test]
    fn test_bad_locator_is_locator_failure() {
        let locator = Locator::Path("//li".into());
        assert!(matches!(
            extract_text(PAGE, &locator),
            Err(FetchError::LocatorFailed(_))
        ));
    }
}
