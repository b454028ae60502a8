//! Pagination walk over a category index.
//!
//! Each index page links to a batch of articles and, unless it is the last
//! page, to the next page of the index. The walk follows those links until it
//! runs out of unvisited pages, collecting article URLs as it goes.

use crate::error::CrawlError;
use crate::extractors::compile_selector;
use crate::url_to_text::fetchers::PageSource;
use log::{debug, info, warn};
use scraper::{Html, Selector};
use std::collections::{HashSet, VecDeque};
use url::Url;

/// Visible text of the anchor that leads to the following index page.
pub const NEXT_PAGE_LABEL: &str = "next page";

/// Articles filed under the recipe category that are not recipes.
pub const DEFAULT_IGNORED_URLS: [&str; 3] = [
    "https://en.wikibooks.org/wiki/Cookbook:Wheat-Free_Baking_Mix",
    "https://en.wikibooks.org/wiki/Cookbook:White_Bread",
    "https://en.wikibooks.org/wiki/Cookbook:Whole_Wheat_Bread",
];

const NEXT_PAGE_SELECTOR: &str = "#mw-pages > a";
const ARTICLE_SELECTOR: &str = "#mw-pages > div.mw-content-ltr > div > div > ul > li > a";

/// What a single index page contributes to the walk.
#[derive(Debug, Default)]
struct IndexPage {
    next_page: Option<Url>,
    articles: Vec<Url>,
}

pub struct Discovery<'a> {
    source: &'a dyn PageSource,
    ignored: HashSet<Url>,
    max_pages: Option<usize>,
    next_page: Selector,
    article: Selector,
}

impl<'a> Discovery<'a> {
    pub fn new(source: &'a dyn PageSource) -> Result<Self, CrawlError> {
        Ok(Self {
            source,
            ignored: DEFAULT_IGNORED_URLS
                .iter()
                .map(|u| Url::parse(u))
                .collect::<Result<_, _>>()?,
            max_pages: None,
            next_page: compile_selector(NEXT_PAGE_SELECTOR)?,
            article: compile_selector(ARTICLE_SELECTOR)?,
        })
    }

    /// Add URLs to skip on top of [`DEFAULT_IGNORED_URLS`].
    ///
    /// Entries are parsed so they compare equal to resolved links regardless
    /// of percent-encoding; entries that do not parse are dropped.
    pub fn ignore<I, S>(mut self, urls: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for entry in urls {
            match Url::parse(entry.as_ref()) {
                Ok(mut url) => {
                    url.set_fragment(None);
                    self.ignored.insert(url);
                }
                Err(e) => warn!("Dropping ignore entry {:?}: {}", entry.as_ref(), e),
            }
        }
        self
    }

    /// Stop after this many index pages have been requested.
    pub fn max_pages(mut self, max_pages: Option<usize>) -> Self {
        self.max_pages = max_pages;
        self
    }

    /// Walk the index starting at `start` and return every article URL found,
    /// in page order. The same article may appear more than once.
    ///
    /// A page that fails to load is skipped; the walk goes on with whatever
    /// pages are still queued.
    pub async fn discover(&self, start: &Url) -> Vec<Url> {
        let mut visited = HashSet::from([start.clone()]);
        let mut queue = VecDeque::from([start.clone()]);
        let mut articles = Vec::new();
        let mut requested = 0;

        while let Some(page_url) = queue.pop_front() {
            if self.max_pages.is_some_and(|max| requested >= max) {
                info!("Stopping after {} index pages", requested);
                break;
            }
            requested += 1;

            let body = match self.source.fetch(&page_url).await {
                Ok(body) => body,
                Err(e) => {
                    warn!("Skipping index page {}: {}", page_url, e);
                    continue;
                }
            };

            let page = self.scan(&page_url, &body);
            info!(
                "Index page {} lists {} articles",
                page_url,
                page.articles.len()
            );

            if let Some(next) = page.next_page {
                if visited.insert(next.clone()) {
                    queue.push_back(next);
                } else {
                    debug!("Next page {} already visited", next);
                }
            }

            articles.extend(page.articles);
        }

        articles
    }

    fn scan(&self, base: &Url, body: &str) -> IndexPage {
        let document = Html::parse_document(body);

        let next_page = document
            .select(&self.next_page)
            .find(|a| a.text().collect::<String>().trim() == NEXT_PAGE_LABEL)
            .and_then(|a| a.value().attr("href"))
            .and_then(|href| resolve(base, href));

        let articles = document
            .select(&self.article)
            .filter_map(|a| a.value().attr("href"))
            .filter_map(|href| resolve(base, href))
            .filter(|url| !self.ignored.contains(url))
            .collect();

        IndexPage {
            next_page,
            articles,
        }
    }
}

/// Resolve `href` against the page it appeared on.
///
/// Empty and fragment-only links yield `None`.
pub(crate) fn resolve(base: &Url, href: &str) -> Option<Url> {
    let href = href.trim();
    if href.is_empty() || href.starts_with('#') {
        return None;
    }
    let mut url = base.join(href).ok()?;
    url.set_fragment(None);
    Some(url)
}
