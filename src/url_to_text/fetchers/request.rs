use super::PageSource;
use crate::error::CrawlError;
use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use std::time::Duration;
use url::Url;

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (compatible; WikibooksRecipesBot/0.1)";

pub struct RequestFetcher {
    client: Client,
    random_delay: Duration,
}

impl RequestFetcher {
    pub fn new(timeout: Option<Duration>, user_agent: Option<&str>) -> Result<Self, CrawlError> {
        let timeout = timeout.unwrap_or(Duration::from_secs(30));
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent.unwrap_or(DEFAULT_USER_AGENT))
            .build()?;

        Ok(Self {
            client,
            random_delay: Duration::ZERO,
        })
    }

    /// Sleep a random duration in `[0, delay)` before every request.
    pub fn with_random_delay(mut self, delay: Duration) -> Self {
        self.random_delay = delay;
        self
    }

    async fn throttle(&self) {
        let max = self.random_delay.as_millis() as u64;
        if max == 0 {
            return;
        }
        let delay = rand::random_range(0..max);
        tokio::time::sleep(Duration::from_millis(delay)).await;
    }
}

#[async_trait]
impl PageSource for RequestFetcher {
    async fn fetch(&self, url: &Url) -> Result<String, CrawlError> {
        self.throttle().await;

        debug!("GET {}", url);
        let response = self.client.get(url.as_str()).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(CrawlError::StatusError {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let html = response.text().await?;
        Ok(html)
    }
}
