use crate::ingredient::DEFAULT_UNITS;
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Crawl settings
#[derive(Debug, Deserialize, Clone)]
pub struct CrawlConfig {
    /// Category index page the walk starts from
    #[serde(default = "default_start_url")]
    pub start_url: String,
    /// Where the JSON array of recipes is written
    #[serde(default = "default_output")]
    pub output: PathBuf,
    /// Response cache directory; empty disables caching
    #[serde(default = "default_cache_dir")]
    pub cache_dir: String,
    /// Upper bound of the random pause before each network request
    #[serde(default = "default_random_delay_ms")]
    pub random_delay_ms: u64,
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout: u64,
    #[serde(default)]
    pub user_agent: Option<String>,
    /// Article URLs to skip in addition to the built-in list
    #[serde(default)]
    pub ignore_urls: Vec<String>,
    /// Maximum number of index pages to request
    #[serde(default)]
    pub max_pages: Option<usize>,
    /// Unit vocabulary for ingredient parsing
    #[serde(default = "default_units")]
    pub units: Vec<String>,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            start_url: default_start_url(),
            output: default_output(),
            cache_dir: default_cache_dir(),
            random_delay_ms: default_random_delay_ms(),
            timeout: default_timeout(),
            user_agent: None,
            ignore_urls: Vec::new(),
            max_pages: None,
            units: default_units(),
        }
    }
}

impl CrawlConfig {
    /// Load configuration from file and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        load_config()
    }

    pub fn cache_dir(&self) -> Option<&Path> {
        if self.cache_dir.trim().is_empty() {
            None
        } else {
            Some(Path::new(&self.cache_dir))
        }
    }
}

// Default value functions
fn default_start_url() -> String {
    "https://en.wikibooks.org/wiki/Category:Recipes".to_string()
}

fn default_output() -> PathBuf {
    PathBuf::from("./recipes.json")
}

fn default_cache_dir() -> String {
    "./tmp".to_string()
}

fn default_random_delay_ms() -> u64 {
    250
}

fn default_timeout() -> u64 {
    30
}

fn default_units() -> Vec<String> {
    DEFAULT_UNITS.iter().map(|u| u.to_string()).collect()
}

/// Load configuration from file and environment variables
///
/// Configuration is loaded with the following priority (highest to lowest):
/// 1. Environment variables with RECIPES__ prefix
/// 2. recipes.toml file in current directory
/// 3. Default values
///
/// Environment variable format: RECIPES__RANDOM_DELAY_MS, with list keys
/// comma-separated: RECIPES__UNITS=cup,g
pub fn load_config() -> Result<CrawlConfig, ConfigError> {
    build(
        Config::builder().add_source(File::with_name("recipes").required(false)),
        environment(),
    )
}

fn environment() -> Environment {
    Environment::with_prefix("RECIPES")
        .separator("__")
        .try_parsing(true)
        .list_separator(",")
        .with_list_parse_key("units")
        .with_list_parse_key("ignore_urls")
}

fn build(
    builder: ConfigBuilder<DefaultState>,
    environment: Environment,
) -> Result<CrawlConfig, ConfigError> {
    builder.add_source(environment).build()?.try_deserialize()
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::FileFormat;

    fn fake_environment(vars: &[(&str, &str)]) -> Environment {
        environment().source(Some(
            vars.iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        ))
    }

    fn no_environment() -> Environment {
        fake_environment(&[])
    }

    #[test]
    fn test_default_values() {
        let config = CrawlConfig::default();
        assert_eq!(config.start_url, "https://en.wikibooks.org/wiki/Category:Recipes");
        assert_eq!(config.output, PathBuf::from("./recipes.json"));
        assert_eq!(config.cache_dir(), Some(Path::new("./tmp")));
        assert_eq!(config.random_delay_ms, 250);
        assert_eq!(config.timeout, 30);
        assert!(config.ignore_urls.is_empty());
        assert!(config.max_pages.is_none());
        assert_eq!(config.units, DEFAULT_UNITS);
    }

    #[test]
    fn test_empty_sources_fall_back_to_defaults() {
        let config = build(Config::builder(), no_environment()).unwrap();
        assert_eq!(config.random_delay_ms, default_random_delay_ms());
        assert_eq!(config.units.len(), DEFAULT_UNITS.len());
    }

    #[test]
    fn test_toml_overrides() {
        let toml = r#"
            start_url = "https://example.org/wiki/Category:Soups"
            output = "soups.json"
            cache_dir = ""
            random_delay_ms = 0
            ignore_urls = ["https://example.org/wiki/Soup_Index"]
            max_pages = 2
            units = ["ml", "litre"]
        "#;
        let config = build(
            Config::builder().add_source(File::from_str(toml, FileFormat::Toml)),
            no_environment(),
        )
        .unwrap();

        assert_eq!(config.start_url, "https://example.org/wiki/Category:Soups");
        assert_eq!(config.output, PathBuf::from("soups.json"));
        assert!(config.cache_dir().is_none());
        assert_eq!(config.random_delay_ms, 0);
        assert_eq!(config.timeout, 30);
        assert_eq!(config.ignore_urls, vec!["https://example.org/wiki/Soup_Index"]);
        assert_eq!(config.max_pages, Some(2));
        assert_eq!(config.units, vec!["ml", "litre"]);
    }

    #[test]
    fn test_environment_overrides_lists_and_scalars() {
        let env = fake_environment(&[
            ("RECIPES__UNITS", "ml,litre"),
            (
                "RECIPES__IGNORE_URLS",
                "https://example.org/wiki/A,https://example.org/wiki/B",
            ),
            ("RECIPES__RANDOM_DELAY_MS", "0"),
            ("RECIPES__OUTPUT", "out.json"),
        ]);
        let toml = r#"units = ["cup"]"#;

        let config = build(
            Config::builder().add_source(File::from_str(toml, FileFormat::Toml)),
            env,
        )
        .unwrap();

        assert_eq!(config.units, vec!["ml", "litre"]);
        assert_eq!(
            config.ignore_urls,
            vec!["https://example.org/wiki/A", "https://example.org/wiki/B"]
        );
        assert_eq!(config.random_delay_ms, 0);
        assert_eq!(config.output, PathBuf::from("out.json"));
    }
}
