//! Selection weights and the breakdown table they live in

use crate::algorithm::composition::Composition;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Weight attached to one option
///
/// Weights are percentage-like probability masses. The conditional form also
/// carries replacement tables for other categories, applied once the option
/// owning the weight has been selected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Weight {
    /// Plain probability mass
    Flat(f64),
    /// Base mass plus per-category replacement tables
    Conditional(ConditionalWeight),
}

/// Weight that reshapes other categories when its option is chosen
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConditionalWeight {
    /// Mass of the owning option itself
    #[serde(rename = "baseValue", default, skip_serializing_if = "Option::is_none")]
    pub base_value: Option<f64>,
    /// Replacement weight tables keyed by the category they replace
    #[serde(flatten)]
    pub overrides: BTreeMap<String, BTreeMap<String, f64>>,
}

impl Weight {
    /// Scalar selection weight
    ///
    /// A conditional weight without `baseValue` resolves to zero, which keeps the
    /// option out of every draw. Negative masses are clamped to zero as well.
    pub fn resolve(&self) -> f64 {
        match self {
            Self::Flat(value) => value.max(0.0),
            Self::Conditional(conditional) => conditional.base_value.unwrap_or(0.0).max(0.0),
        }
    }

    /// Replacement table this weight imposes on `category`, if any
    pub fn override_for(&self, category: &str) -> Option<&BTreeMap<String, f64>> {
        match self {
            Self::Flat(_) => None,
            Self::Conditional(conditional) => conditional.overrides.get(category),
        }
    }

    /// Whether this is a conditional weight lacking its own base mass
    pub const fn is_missing_base(&self) -> bool {
        matches!(
            self,
            Self::Conditional(ConditionalWeight {
                base_value: None,
                ..
            })
        )
    }
}

/// Weighted options for one category
pub type WeightTable = BTreeMap<String, Weight>;

/// Option names paired with resolved scalar weights
pub type ResolvedTable = Vec<(String, f64)>;

/// Category → option → weight table for one generation run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Breakdown {
    categories: BTreeMap<String, WeightTable>,
}

impl Breakdown {
    /// Wrap an existing category map
    pub const fn new(categories: BTreeMap<String, WeightTable>) -> Self {
        Self { categories }
    }

    /// Add or replace one category's table
    pub fn insert(&mut self, category: impl Into<String>, table: WeightTable) {
        self.categories.insert(category.into(), table);
    }

    /// Category names in stable order
    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.categories.keys().map(String::as_str)
    }

    /// Weight table of a category
    pub fn table(&self, category: &str) -> Option<&WeightTable> {
        self.categories.get(category)
    }

    /// Weight of a single option
    pub fn weight(&self, category: &str, option: &str) -> Option<&Weight> {
        self.categories.get(category)?.get(option)
    }

    /// Whether a category offers the named option
    pub fn has_option(&self, category: &str, option: &str) -> bool {
        self.weight(category, option).is_some()
    }

    /// Iterate over every (category, table) pair
    pub fn iter(&self) -> impl Iterator<Item = (&str, &WeightTable)> {
        self.categories.iter().map(|(c, t)| (c.as_str(), t))
    }

    /// Number of categories
    pub fn len(&self) -> usize {
        self.categories.len()
    }

    /// Whether no categories are defined
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Category table with every weight reduced to a scalar
    pub fn resolved_table(&self, category: &str) -> ResolvedTable {
        self.categories
            .get(category)
            .map(|table| {
                table
                    .iter()
                    .map(|(option, weight)| (option.clone(), weight.resolve()))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Table in force for `category` given what has been selected so far
    ///
    /// The first selected option (in category order) whose conditional weight
    /// carries a table for `category` wins over the category's own table.
    pub fn effective_table(&self, composition: &Composition, category: &str) -> ResolvedTable {
        let replacement = composition
            .iter()
            .filter(|(other, _)| *other != category)
            .find_map(|(other, option)| self.weight(other, option)?.override_for(category));

        match replacement {
            Some(table) => table
                .iter()
                .map(|(option, weight)| (option.clone(), weight.max(0.0)))
                .collect(),
            None => self.resolved_table(category),
        }
    }
}

/// Sum of the scalar weights of a table
pub fn total_weight(table: &[(String, f64)]) -> f64 {
    table.iter().map(|(_, weight)| weight).sum()
}
