use serde::{Deserialize, Serialize};

/// A single ingredient line broken into its parts.
///
/// `amount` is `0.0` and `unit` is empty when the line did not carry them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Ingredient {
    pub name: String,
    pub amount: f64,
    pub unit: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Recipe {
    pub name: String,
    pub description: String,
    pub ingredients: Vec<Ingredient>,
    pub steps: Vec<String>,
    pub categories: Vec<String>,
    /// Canonical source URL (no query, no fragment)
    pub link: String,
}
