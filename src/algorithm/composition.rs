//! The category → option mapping built up during one attempt

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

/// One finished or in-progress set of selections
///
/// Each category holds at most one option. Serializes as a flat JSON object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Composition {
    selections: BTreeMap<String, String>,
}

/// Metadata attribute derived from a selection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    /// Category name
    pub trait_type: String,
    /// Option name without its file extension
    pub value: String,
}

impl Composition {
    /// Create an empty composition
    pub fn new() -> Self {
        Self::default()
    }

    /// Selected option of a category
    pub fn get(&self, category: &str) -> Option<&str> {
        self.selections.get(category).map(String::as_str)
    }

    /// Whether the category has been filled
    pub fn contains(&self, category: &str) -> bool {
        self.selections.contains_key(category)
    }

    /// Set a category's option, returning the previous one
    pub fn insert(&mut self, category: impl Into<String>, option: impl Into<String>) -> Option<String> {
        self.selections.insert(category.into(), option.into())
    }

    /// Clear a category
    pub fn remove(&mut self, category: &str) -> Option<String> {
        self.selections.remove(category)
    }

    /// Filled (category, option) pairs in category order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.selections
            .iter()
            .map(|(category, option)| (category.as_str(), option.as_str()))
    }

    /// Number of filled categories
    pub fn len(&self) -> usize {
        self.selections.len()
    }

    /// Whether nothing has been selected
    pub fn is_empty(&self) -> bool {
        self.selections.is_empty()
    }

    /// Composition holding only `category`'s current value, if it has one
    pub fn retain_only(&self, category: &str) -> Self {
        let mut kept = Self::new();
        if let Some(option) = self.get(category) {
            kept.insert(category, option);
        }
        kept
    }

    /// Metadata attributes with file extensions stripped from option names
    pub fn attributes(&self) -> Vec<Attribute> {
        self.iter()
            .map(|(category, option)| Attribute {
                trait_type: category.to_string(),
                value: Path::new(option)
                    .file_stem()
                    .map_or_else(|| option.to_string(), |stem| stem.to_string_lossy().into_owned()),
            })
            .collect()
    }

    /// Consume into the underlying map
    pub fn into_inner(self) -> BTreeMap<String, String> {
        self.selections
    }
}

impl From<BTreeMap<String, String>> for Composition {
    fn from(selections: BTreeMap<String, String>) -> Self {
        Self { selections }
    }
}

impl<C: Into<String>, O: Into<String>> FromIterator<(C, O)> for Composition {
    fn from_iter<I: IntoIterator<Item = (C, O)>>(iter: I) -> Self {
        Self {
            selections: iter
                .into_iter()
                .map(|(category, option)| (category.into(), option.into()))
                .collect(),
        }
    }
}

/// Reason an attempt was rejected
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    /// A selected option's do-not-pair rule rejects another selection
    Excluded {
        /// Category whose rule fired
        by_category: String,
        /// Option whose rule fired
        by_option: String,
        /// Category of the rejected selection
        category: String,
        /// Rejected option
        option: String,
    },
    /// A selected option's requirement is not met by the rest of the composition
    Unmet {
        /// Category of the demanding option
        category: String,
        /// Demanding option
        option: String,
    },
    /// A category ran out of redraws and the exhaustion policy restarts
    Exhausted {
        /// Category that could not be filled
        category: String,
    },
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Excluded {
                by_category,
                by_option,
                category,
                option,
            } => write!(
                f,
                "{by_category}={by_option} excludes {category}={option}"
            ),
            Self::Unmet { category, option } => {
                write!(f, "requirement of {category}={option} is not met")
            }
            Self::Exhausted { category } => {
                write!(f, "no admissible option found for {category}")
            }
        }
    }
}
