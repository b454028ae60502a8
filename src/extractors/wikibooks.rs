use super::{compile_selector, Extractor, ParsingContext};
use crate::error::CrawlError;
use crate::ingredient::IngredientParser;
use crate::model::Recipe;
use log::debug;
use scraper::{ElementRef, Html, Selector};
use url::Url;

const TITLE_PREFIX: &str = "Cookbook:";
const INGREDIENTS_HEADING: &str = "Ingredients";
const EXCLUDED_CATEGORY: &str = "Recipes";
/// Editors file unfinished recipes here.
const INCOMPLETE_CATEGORY: &str = "Incomplete recipes";

const TITLE_SELECTOR: &str = "#firstHeading";
const CONTENT_SELECTOR: &str = "#mw-content-text > div.mw-content-ltr.mw-parser-output";
const DESCRIPTION_SELECTOR: &str =
    "#mw-content-text > div.mw-content-ltr.mw-parser-output > p:nth-child(4)";
const STEPS_SELECTOR: &str = "#mw-content-text > div.mw-content-ltr.mw-parser-output > ol";
const CATEGORY_SELECTOR: &str = "#mw-normal-catlinks > ul > li";

/// Extracts recipes from Wikibooks Cookbook articles.
pub struct WikibooksExtractor {
    parser: IngredientParser,
    title: Selector,
    content: Selector,
    description: Selector,
    steps: Selector,
    categories: Selector,
}

impl WikibooksExtractor {
    pub fn new(parser: IngredientParser) -> Result<Self, CrawlError> {
        Ok(Self {
            parser,
            title: compile_selector(TITLE_SELECTOR)?,
            content: compile_selector(CONTENT_SELECTOR)?,
            description: compile_selector(DESCRIPTION_SELECTOR)?,
            steps: compile_selector(STEPS_SELECTOR)?,
            categories: compile_selector(CATEGORY_SELECTOR)?,
        })
    }

    /// Trimmed text of every element matching `selector`, concatenated.
    fn child_text(&self, document: &Html, selector: &Selector) -> String {
        document
            .select(selector)
            .flat_map(|el| el.text())
            .collect::<String>()
            .trim()
            .to_string()
    }

    fn name(&self, document: &Html) -> String {
        let heading = self.child_text(document, &self.title);
        heading
            .strip_prefix(TITLE_PREFIX)
            .unwrap_or(heading.as_str())
            .to_string()
    }

    /// Raw lines of every list between the "Ingredients" heading and the
    /// next second-level heading.
    fn ingredient_lines(&self, document: &Html) -> Vec<String> {
        let Some(container) = document.select(&self.content).next() else {
            return Vec::new();
        };

        let mut lines = Vec::new();
        let mut in_ingredients = false;

        for child in container.children().filter_map(ElementRef::wrap) {
            let text = child.text().collect::<String>();
            if text.starts_with(INGREDIENTS_HEADING) {
                in_ingredients = true;
                continue;
            }
            if !in_ingredients {
                continue;
            }
            if is_section_heading(&child) {
                break;
            }
            if child.value().name() != "ul" {
                continue;
            }

            lines.extend(
                text.split('\n')
                    .filter(|line| !line.trim().is_empty())
                    .map(str::to_string),
            );
        }

        lines
    }

    fn steps(&self, document: &Html) -> Vec<String> {
        let text = self.child_text(document, &self.steps);
        if text.is_empty() {
            return Vec::new();
        }
        text.split('\n').map(str::to_string).collect()
    }

    fn categories(&self, document: &Html) -> Vec<String> {
        document
            .select(&self.categories)
            .map(|li| li.text().collect::<String>())
            .filter(|category| category != EXCLUDED_CATEGORY)
            .collect()
    }
}

impl Extractor for WikibooksExtractor {
    fn parse(&self, context: &ParsingContext) -> Option<Recipe> {
        let document = &context.document;

        let categories = self.categories(document);
        if categories.iter().any(|c| c == INCOMPLETE_CATEGORY) {
            debug!("Rejecting {}: marked as incomplete", context.url);
            return None;
        }

        let name = self.name(document);
        if name.is_empty() {
            debug!("Rejecting {}: no title", context.url);
            return None;
        }

        let ingredients = self
            .ingredient_lines(document)
            .iter()
            .map(|line| self.parser.parse(line))
            .collect::<Vec<_>>();

        let recipe = Recipe {
            name,
            description: self.child_text(document, &self.description),
            ingredients,
            steps: self.steps(document),
            categories,
            link: canonical_link(&context.url),
        };

        debug!(
            "Parsed {} ({} ingredients, {} steps)",
            recipe.name,
            recipe.ingredients.len(),
            recipe.steps.len()
        );
        Some(recipe)
    }
}

/// `h2`, or the `div.mw-heading2` wrapper newer MediaWiki puts around it.
fn is_section_heading(element: &ElementRef) -> bool {
    let value = element.value();
    match value.name() {
        "h2" => true,
        "div" => value.classes().any(|class| class == "mw-heading2"),
        _ => false,
    }
}

fn canonical_link(url: &Url) -> String {
    let mut link = url.clone();
    link.set_query(None);
    link.set_fragment(None);
    link.to_string()
}
