//! Ingredient line parsing.
//!
//! A raw line such as `2 cups low-sodium chicken broth` goes through two steps:
//! vulgar-fraction glyphs are rewritten as decimals, then an ordered list of
//! matchers is tried and the first one that recognises the line wins. A line
//! no matcher accepts becomes an ingredient whose name is the whole line.

use crate::error::CrawlError;
use crate::model::Ingredient;
use log::trace;
use regex::{Captures, Regex};
use std::sync::OnceLock;

/// Fraction glyphs and their decimal spellings, applied in this order.
///
/// Thirds are truncated to two decimals.
pub const FRACTION_GLYPHS: [(&str, &str); 6] = [
    ("⅛", "0.125"),
    ("¼", "0.25"),
    ("⅓", "0.33"),
    ("½", "0.5"),
    ("⅔", "0.66"),
    ("¾", "0.75"),
];

/// Unit vocabulary recognised by [`AmountUnitName`] unless configured otherwise.
pub const DEFAULT_UNITS: [&str; 8] = [
    "cup",
    "lbs",
    "tablespoon",
    "tbsp",
    "teaspoon",
    "oz",
    "g",
    "gram",
];

// ASCII-only classes: a Unicode digit would match here and then fail to
// parse as a float, losing the quantity.
const AMOUNT: &str = r"([0-9]*\.?[0-9]+)";
const NOT_DIGIT: &str = r"[^0-9]";
const SPACE: &str = r"[\t\n\f\r ]";

/// Replace the first occurrence of each fraction glyph with its decimal form.
pub fn normalize_fractions(input: &str) -> String {
    FRACTION_GLYPHS
        .iter()
        .fold(input.to_string(), |line, (glyph, decimal)| {
            line.replacen(glyph, decimal, 1)
        })
}

/// One tier of the ingredient parser.
pub trait LineMatcher: Send + Sync {
    /// Returns `None` when the line does not have the shape this tier expects.
    fn try_match(&self, line: &str) -> Option<Ingredient>;
}

/// `<amount> <filler> <unit> <name>`, e.g. `2 cans (2 lbs) white beans`.
pub struct AmountUnitName {
    pattern: Regex,
}

impl AmountUnitName {
    pub fn new<S: AsRef<str>>(units: &[S]) -> Result<Self, CrawlError> {
        let alternatives = units
            .iter()
            .map(|unit| regex::escape(unit.as_ref()))
            .collect::<Vec<_>>()
            .join("|");
        let pattern = Regex::new(&format!(
            r"{AMOUNT}{NOT_DIGIT}*({alternatives})[s).,]?{SPACE}+(.+)"
        ))?;
        Ok(Self { pattern })
    }
}

impl LineMatcher for AmountUnitName {
    fn try_match(&self, line: &str) -> Option<Ingredient> {
        let captures = self.pattern.captures(line)?;
        Some(Ingredient {
            name: group(&captures, 3),
            amount: parse_amount(&captures),
            unit: group(&captures, 2),
        })
    }
}

/// `<amount> <name>`, e.g. `1 egg`.
pub struct AmountName {
    pattern: Regex,
}

impl AmountName {
    pub fn new() -> Result<Self, CrawlError> {
        let pattern = Regex::new(&format!(r"{AMOUNT}{SPACE}(.+)"))?;
        Ok(Self { pattern })
    }
}

impl LineMatcher for AmountName {
    fn try_match(&self, line: &str) -> Option<Ingredient> {
        let captures = self.pattern.captures(line)?;
        Some(Ingredient {
            name: group(&captures, 2),
            amount: parse_amount(&captures),
            unit: String::new(),
        })
    }
}

fn group(captures: &Captures, index: usize) -> String {
    captures
        .get(index)
        .map(|m| m.as_str().to_string())
        .unwrap_or_default()
}

// The amount pattern only admits ASCII digits and one dot, so this parse
// cannot fail; zero is the fallback all the same.
fn parse_amount(captures: &Captures) -> f64 {
    captures
        .get(1)
        .and_then(|m| m.as_str().parse().ok())
        .unwrap_or(0.0)
}

/// Ordered list of matchers with a name-only fallback.
pub struct IngredientParser {
    matchers: Vec<Box<dyn LineMatcher>>,
}

impl IngredientParser {
    pub fn new(matchers: Vec<Box<dyn LineMatcher>>) -> Self {
        Self { matchers }
    }

    /// Build the standard two tiers around a custom unit vocabulary.
    ///
    /// The filler between amount and unit is greedy, so when several units
    /// appear on a line the last one followed by whitespace is taken.
    pub fn with_units<S: AsRef<str>>(units: &[S]) -> Result<Self, CrawlError> {
        let mut matchers: Vec<Box<dyn LineMatcher>> = Vec::new();
        if !units.is_empty() {
            matchers.push(Box::new(AmountUnitName::new(units)?));
        }
        matchers.push(Box::new(AmountName::new()?));
        Ok(Self::new(matchers))
    }

    pub fn parse(&self, input: &str) -> Ingredient {
        let line = normalize_fractions(input);

        if let Some(ingredient) = self.matchers.iter().find_map(|m| m.try_match(&line)) {
            trace!("Parsed ingredient {:?} from {:?}", ingredient, input);
            return ingredient;
        }

        Ingredient {
            name: line,
            ..Default::default()
        }
    }
}

impl Default for IngredientParser {
    fn default() -> Self {
        Self::with_units(&DEFAULT_UNITS).expect("default ingredient patterns are valid")
    }
}

/// Parse one line with the default unit vocabulary.
pub fn parse_ingredient(input: &str) -> Ingredient {
    static PARSER: OnceLock<IngredientParser> = OnceLock::new();
    PARSER.get_or_init(IngredientParser::default).parse(input)
}
