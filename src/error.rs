use thiserror::Error;

/// Errors that can occur while crawling and exporting recipes
#[derive(Error, Debug)]
pub enum CrawlError {
    /// Failed to fetch a page
    #[error("Failed to fetch URL: {0}")]
    FetchError(#[from] reqwest::Error),

    /// The server answered with a non-success status
    #[error("HTTP {status} for {url}")]
    StatusError { url: String, status: u16 },

    /// A URL could not be parsed or resolved
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// A CSS selector failed to compile
    #[error("Invalid selector `{0}`")]
    InvalidSelector(String),

    /// An ingredient pattern failed to compile
    #[error("Invalid ingredient pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    /// Filesystem error (cache or output file)
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Failed to serialize the recipe collection
    #[error("Serialization failed: {0}")]
    SerializeError(#[from] serde_json::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(#[from] config::ConfigError),
}
