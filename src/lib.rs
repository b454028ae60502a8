pub mod config;
pub mod discovery;
pub mod error;
pub mod extractors;
pub mod ingredient;
pub mod model;
pub mod pipelines;
pub mod url_to_text;

pub use config::{load_config, CrawlConfig};
pub use error::CrawlError;
pub use ingredient::parse_ingredient;
pub use model::{Ingredient, Recipe};
pub use pipelines::crawl::{crawl, run, write_recipes};
