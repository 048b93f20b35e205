use crate::error::FetchError;
use crate::locator::Locator;
use async_trait::async_trait;

/// Supplies the raw text behind a locator on a page.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Returns the located element's text. Failures are reported, never
    /// retried by the caller.
    async fn fetch_text(&self, url: &str, locator: &Locator) -> Result<String, FetchError>;
}
