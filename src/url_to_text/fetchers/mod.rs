use crate::error::CrawlError;
use async_trait::async_trait;
use url::Url;

mod cache;
mod request;

pub use cache::CachedFetcher;
pub use request::{RequestFetcher, DEFAULT_USER_AGENT};

/// Anything that can turn a URL into an HTML body.
///
/// Parsing into a document happens at the call site: `scraper::Html` is not
/// `Send`, so it never crosses an await point.
#[async_trait]
pub trait PageSource: Send + Sync {
    async fn fetch(&self, url: &Url) -> Result<String, CrawlError>;
}

