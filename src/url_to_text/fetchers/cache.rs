use super::PageSource;
use crate::error::CrawlError;
use async_trait::async_trait;
use log::{debug, warn};
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use url::Url;

/// On-disk response cache in front of another [`PageSource`].
///
/// Bodies are stored one file per URL, named by the SHA-256 of the URL, so a
/// second run against the same site does not touch the network.
pub struct CachedFetcher<F> {
    inner: F,
    dir: PathBuf,
}

impl<F: PageSource> CachedFetcher<F> {
    pub fn new(inner: F, dir: impl Into<PathBuf>) -> Self {
        Self {
            inner,
            dir: dir.into(),
        }
    }

    fn entry_path(&self, url: &Url) -> PathBuf {
        let mut hasher = Sha256::new();
        hasher.update(url.as_str().as_bytes());
        self.dir.join(format!("{:x}.html", hasher.finalize()))
    }

    /// Partial writes land in a temporary file, so an interrupted run never
    /// leaves a truncated entry behind.
    async fn store(&self, path: &Path, body: &str) -> std::io::Result<()> {
        tokio::fs::create_dir_all(&self.dir).await?;
        let partial = path.with_extension(format!("{}.tmp", std::process::id()));
        tokio::fs::write(&partial, body).await?;
        tokio::fs::rename(&partial, path).await
    }
}

#[async_trait]
impl<F: PageSource> PageSource for CachedFetcher<F> {
    async fn fetch(&self, url: &Url) -> Result<String, CrawlError> {
        let path = self.entry_path(url);

        match tokio::fs::read_to_string(&path).await {
            Ok(body) => {
                debug!("Cache hit for {}", url);
                return Ok(body);
            }
            Err(e) if e.kind() != std::io::ErrorKind::NotFound => {
                warn!("Ignoring unreadable cache entry {}: {}", path.display(), e);
            }
            Err(_) => {}
        }

        let body = self.inner.fetch(url).await?;

        if let Err(e) = self.store(&path, &body).await {
            warn!("Failed to cache {}: {}", url, e);
        }

        Ok(body)
    }
}
