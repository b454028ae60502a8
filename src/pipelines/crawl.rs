use crate::config::CrawlConfig;
use crate::discovery::Discovery;
use crate::error::CrawlError;
use crate::extractors::{Extractor, ParsingContext, WikibooksExtractor};
use crate::ingredient::IngredientParser;
use crate::model::Recipe;
use crate::url_to_text::fetchers::{CachedFetcher, PageSource, RequestFetcher};
use log::{debug, info, warn};
use std::collections::HashSet;
use std::path::Path;
use std::time::Duration;
use url::Url;

/// Crawl the category index and extract every recipe it links to.
///
/// This pipeline:
/// 1. Walks the index pages and collects article URLs
/// 2. Drops repeated URLs, keeping the first occurrence
/// 3. Fetches each article in turn and keeps the recipes the extractor accepts
///
/// Failed fetches and rejected pages are skipped; only setup errors
/// (bad start URL, bad unit vocabulary, HTTP client) are returned.
pub async fn crawl(config: &CrawlConfig) -> Result<Vec<Recipe>, CrawlError> {
    let start = Url::parse(&config.start_url)?;
    let extractor = WikibooksExtractor::new(IngredientParser::with_units(&config.units)?)?;
    let source = build_source(config)?;

    let discovery = Discovery::new(source.as_ref())?
        .ignore(config.ignore_urls.iter().cloned())
        .max_pages(config.max_pages);
    let links = dedup(discovery.discover(&start).await);
    info!("Discovered {} recipe pages", links.len());

    Ok(extract_all(source.as_ref(), &extractor, &links).await)
}

/// Fetch and extract each URL in order.
pub async fn extract_all(
    source: &dyn PageSource,
    extractor: &dyn Extractor,
    urls: &[Url],
) -> Vec<Recipe> {
    let mut recipes = Vec::new();

    for url in urls {
        let body = match source.fetch(url).await {
            Ok(body) => body,
            Err(e) => {
                warn!("Skipping {}: {}", url, e);
                continue;
            }
        };

        let context = ParsingContext::new(url.clone(), &body);
        match extractor.parse(&context) {
            Some(recipe) => recipes.push(recipe),
            None => debug!("No recipe extracted from {}", url),
        }
    }

    recipes
}

/// Serialize recipes as a pretty-printed JSON array and write them to `path`.
pub async fn write_recipes(path: &Path, recipes: &[Recipe]) -> Result<(), CrawlError> {
    let json = serde_json::to_string_pretty(recipes)?;
    tokio::fs::write(path, json).await?;
    Ok(())
}

/// Crawl, then write the result to the configured output file.
///
/// Returns the number of recipes written.
pub async fn run(config: &CrawlConfig) -> Result<usize, CrawlError> {
    let recipes = crawl(config).await?;
    write_recipes(&config.output, &recipes).await?;
    info!(
        "Wrote {} recipes to {}",
        recipes.len(),
        config.output.display()
    );
    Ok(recipes.len())
}

fn build_source(config: &CrawlConfig) -> Result<Box<dyn PageSource>, CrawlError> {
    let fetcher = RequestFetcher::new(
        Some(Duration::from_secs(config.timeout)),
        config.user_agent.as_deref(),
    )?
    .with_random_delay(Duration::from_millis(config.random_delay_ms));

    let source: Box<dyn PageSource> = match config.cache_dir() {
        Some(dir) => Box::new(CachedFetcher::new(fetcher, dir)),
        None => Box::new(fetcher),
    };
    Ok(source)
}

fn dedup(urls: Vec<Url>) -> Vec<Url> {
    let mut seen = HashSet::new();
    urls.into_iter()
        .filter(|url| seen.insert(url.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dedup_keeps_first_occurrence() {
        let urls = ["https://a.test/1", "https://a.test/2", "https://a.test/1", "https://a.test/3"]
            .iter()
            .map(|u| Url::parse(u).unwrap())
            .collect();

        let deduped: Vec<_> = dedup(urls).into_iter().map(String::from).collect();

        assert_eq!(
            deduped,
            vec!["https://a.test/1", "https://a.test/2", "https://a.test/3"]
        );
    }

    #[tokio::test]
    async fn test_write_recipes_uses_capitalized_fields() {
        let path = std::env::temp_dir().join(format!(
            "wikibooks-recipes-write-{}.json",
            std::process::id()
        ));
        let recipes = vec![Recipe {
            name: "Tea".to_string(),
            link: "https://en.wikibooks.org/wiki/Cookbook:Tea".to_string(),
            ..Default::default()
        }];

        write_recipes(&path, &recipes).await.unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert!(written.starts_with("[\n  {\n    \"Name\": \"Tea\""));
        let value: serde_json::Value = serde_json::from_str(&written).unwrap();
        assert_eq!(value[0]["Link"], "https://en.wikibooks.org/wiki/Cookbook:Tea");
        assert_eq!(value[0]["Ingredients"], serde_json::json!([]));
    }

    #[tokio::test]
    async fn test_write_failure_is_reported() {
        let path = std::env::temp_dir()
            .join("wikibooks-recipes-missing-dir")
            .join("nested")
            .join("recipes.json");

        let result = write_recipes(&path, &[]).await;

        assert!(matches!(result, Err(CrawlError::IoError(_))));
    }
}
