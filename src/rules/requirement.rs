//! Co-occurrence requirements evaluated on finished compositions

use crate::algorithm::composition::{Composition, Violation};
use crate::io::configuration::ATTRIBUTES_TO_INCLUDE;
use crate::io::error::Result;
use crate::io::rules_file::RawRequirement;
use crate::rules::matcher::Matcher;
use std::collections::{BTreeMap, BTreeSet};

/// A compiled requirement
#[derive(Debug, Clone)]
pub enum Requirement {
    /// Some other selection must match at least one identifier
    AnyOf(Vec<Matcher>),
    /// Each listed category must be filled with a matching option
    ///
    /// An empty identifier list only demands that the category is present.
    AllOf(BTreeMap<String, Vec<Matcher>>),
}

impl Requirement {
    fn compile(raw: &RawRequirement, categories: &BTreeSet<String>, location: &str) -> Result<Self> {
        Ok(match raw {
            RawRequirement::AnyOf(identifiers) => Self::AnyOf(
                identifiers
                    .iter()
                    .map(|id| Matcher::parse(id, categories, location))
                    .collect::<Result<_>>()?,
            ),
            RawRequirement::AllOf(targets) => {
                let mut compiled = BTreeMap::new();
                for (target, identifiers) in targets {
                    let target_location = format!("{location}.{target}");
                    let matchers = identifiers
                        .iter()
                        .map(|id| Matcher::parse(id, categories, &target_location))
                        .collect::<Result<_>>()?;
                    compiled.insert(target.clone(), matchers);
                }
                Self::AllOf(compiled)
            }
        })
    }

    /// Whether the composition satisfies this requirement on behalf of `category`
    pub fn satisfied_by(&self, composition: &Composition, category: &str) -> bool {
        match self {
            Self::AnyOf(identifiers) => composition
                .iter()
                .filter(|(other, _)| *other != category)
                .any(|(other, option)| identifiers.iter().any(|id| id.matches(other, option))),
            Self::AllOf(targets) => targets.iter().all(|(target, identifiers)| {
                composition.get(target).is_some_and(|option| {
                    identifiers.is_empty() || identifiers.iter().any(|id| id.matches(target, option))
                })
            }),
        }
    }

    /// Categories this requirement names
    pub fn referenced_categories(&self) -> Vec<&str> {
        match self {
            Self::AnyOf(identifiers) => identifiers.iter().filter_map(Matcher::category).collect(),
            Self::AllOf(targets) => targets.keys().map(String::as_str).collect(),
        }
    }
}

/// Requirements of one category
#[derive(Debug, Clone, Default)]
struct CategoryRequirements {
    per_option: Vec<(Matcher, Requirement)>,
    whole_category: Option<Requirement>,
}

/// Compiled requirement table
#[derive(Debug, Clone, Default)]
pub struct RequirementRules {
    rules: BTreeMap<String, CategoryRequirements>,
}

impl RequirementRules {
    /// Compile the raw requirement table
    ///
    /// # Errors
    ///
    /// Returns an error if an identifier or key fails to compile as a pattern
    pub fn compile(
        raw: &BTreeMap<String, BTreeMap<String, RawRequirement>>,
        categories: &BTreeSet<String>,
    ) -> Result<Self> {
        let no_categories = BTreeSet::new();
        let mut rules = BTreeMap::new();

        for (category, entries) in raw {
            let mut compiled = CategoryRequirements::default();
            for (key, entry) in entries {
                let location = format!("need.{category}.{key}");
                let requirement = Requirement::compile(entry, categories, &location)?;
                if key == ATTRIBUTES_TO_INCLUDE {
                    compiled.whole_category = Some(requirement);
                } else {
                    let key_matcher = Matcher::parse(key, &no_categories, &location)?;
                    compiled.per_option.push((key_matcher, requirement));
                }
            }
            rules.insert(category.clone(), compiled);
        }

        Ok(Self { rules })
    }

    /// Whether every requirement attached to `category`=`option` holds
    ///
    /// Options without requirements are vacuously satisfied.
    pub fn need_satisfied(&self, composition: &Composition, category: &str, option: &str) -> bool {
        let Some(entry) = self.rules.get(category) else {
            return true;
        };

        let whole = entry
            .whole_category
            .as_ref()
            .is_none_or(|requirement| requirement.satisfied_by(composition, category));

        whole
            && entry
                .per_option
                .iter()
                .filter(|(key, _)| key.matches_option(option))
                .all(|(_, requirement)| requirement.satisfied_by(composition, category))
    }

    /// First selection whose requirement the composition fails
    pub fn first_unmet(&self, composition: &Composition) -> Option<Violation> {
        composition
            .iter()
            .find(|(category, option)| !self.need_satisfied(composition, category, option))
            .map(|(category, option)| Violation::Unmet {
                category: category.to_string(),
                option: option.to_string(),
            })
    }

    /// Category names used as owners or referenced by requirements
    pub fn referenced_categories(&self) -> Vec<&str> {
        let mut names = Vec::new();
        for (owner, entry) in &self.rules {
            names.push(owner.as_str());
            for (_, requirement) in &entry.per_option {
                names.extend(requirement.referenced_categories());
            }
            if let Some(requirement) = &entry.whole_category {
                names.extend(requirement.referenced_categories());
            }
        }
        names
    }

    /// Literal option keys per owning category
    pub fn literal_keys(&self) -> Vec<(&str, &Matcher)> {
        self.rules
            .iter()
            .flat_map(|(owner, entry)| {
                entry
                    .per_option
                    .iter()
                    .filter(|(key, _)| key.literal_name().is_some())
                    .map(move |(key, _)| (owner.as_str(), key))
            })
            .collect()
    }
}
