//! Conference call-for-papers deadline scraper.
//!
//! The core is [`normalize::normalize`], which turns a scraped snippet of
//! date text into a timestamp in one canonical zone. The rest of the crate
//! fetches the snippets, orders the results and persists them.

pub mod app;
pub mod config;
pub mod constants;
pub mod error;
pub mod infra;
pub mod locator;
pub mod logging;
pub mod metrics;
pub mod normalize;
pub mod pipeline;
pub mod storage;
pub mod types;
