use crate::error::CrawlError;
use crate::model::Recipe;
use scraper::{Html, Selector};
use url::Url;

mod wikibooks;

pub use wikibooks::WikibooksExtractor;

pub struct ParsingContext {
    pub url: Url,
    pub document: Html,
}

impl ParsingContext {
    pub fn new(url: Url, html: &str) -> Self {
        Self {
            url,
            document: Html::parse_document(html),
        }
    }
}

pub trait Extractor {
    /// Build a recipe from the page, or `None` when the page is rejected.
    fn parse(&self, context: &ParsingContext) -> Option<Recipe>;
}

pub(crate) fn compile_selector(css: &str) -> Result<Selector, CrawlError> {
    Selector::parse(css).map_err(|_| CrawlError::InvalidSelector(css.to_string()))
}
