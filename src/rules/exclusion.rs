//! Do-not-pair rules and the checks that evaluate them
//!
//! A rule belongs to an already selected (category, option) pair and names what
//! may not appear next to it. Checks only ever consult the rules of *other*
//! selections, so a candidate is judged against the composition around it.

use crate::algorithm::composition::{Composition, Violation};
use crate::io::configuration::ATTRIBUTES_TO_EXCLUDE;
use crate::io::error::{Result, configuration_error};
use crate::io::rules_file::RawExclusion;
use crate::rules::matcher::Matcher;
use std::collections::{BTreeMap, BTreeSet};

/// Exclusions attached to options matching `key`
#[derive(Debug, Clone)]
pub struct ExclusionRule {
    /// Matches the owning option name (literal, pattern or wildcard)
    pub key: Matcher,
    /// Identifiers checked against every other category
    pub anywhere: Vec<Matcher>,
    /// Identifiers checked only against the keyed category
    pub per_category: BTreeMap<String, Vec<Matcher>>,
}

impl ExclusionRule {
    fn forbids_category(&self, candidate_category: &str) -> bool {
        self.anywhere
            .iter()
            .any(|m| m.matches_category(candidate_category))
            || self
                .per_category
                .get(candidate_category)
                .is_some_and(|list| list.iter().any(|m| m.matches_category(candidate_category)))
    }

    fn forbids_option(&self, candidate_category: &str, candidate_option: &str) -> bool {
        self.anywhere
            .iter()
            .any(|m| m.matches(candidate_category, candidate_option))
            || self.per_category.get(candidate_category).is_some_and(|list| {
                list.iter()
                    .any(|m| m.matches(candidate_category, candidate_option))
            })
    }
}

/// Compiled do-not-pair table
#[derive(Debug, Clone, Default)]
pub struct ExclusionRules {
    rules: BTreeMap<String, Vec<ExclusionRule>>,
}

impl ExclusionRules {
    /// Compile the raw do-not-pair table
    ///
    /// # Errors
    ///
    /// Returns an error if a pattern fails to compile or a flat list uses the
    /// wildcard, which would exclude every other category
    pub fn compile(
        raw: &BTreeMap<String, BTreeMap<String, RawExclusion>>,
        categories: &BTreeSet<String>,
    ) -> Result<Self> {
        let no_categories = BTreeSet::new();
        let mut rules = BTreeMap::new();

        for (category, entries) in raw {
            let mut compiled = Vec::with_capacity(entries.len());
            for (key, entry) in entries {
                let location = format!("dnp.{category}.{key}");
                let key_matcher = Matcher::parse(key, &no_categories, &location)?;
                let mut rule = ExclusionRule {
                    key: key_matcher,
                    anywhere: Vec::new(),
                    per_category: BTreeMap::new(),
                };

                match entry {
                    RawExclusion::Patterns(patterns) => {
                        for pattern in patterns {
                            let matcher = Matcher::parse(pattern, categories, &location)?;
                            if matches!(matcher, Matcher::Wildcard) {
                                return Err(configuration_error(format!(
                                    "{location}: wildcard needs a target category"
                                )));
                            }
                            rule.anywhere.push(matcher);
                        }
                    }
                    RawExclusion::Targeted(targets) => {
                        for (target, patterns) in targets {
                            let target_location = format!("{location}.{target}");
                            let matchers = patterns
                                .iter()
                                .map(|p| Matcher::parse(p, categories, &target_location))
                                .collect::<Result<Vec<_>>>()?;
                            if target == ATTRIBUTES_TO_EXCLUDE {
                                rule.anywhere.extend(matchers);
                            } else {
                                rule.per_category.insert(target.clone(), matchers);
                            }
                        }
                    }
                }
                compiled.push(rule);
            }
            rules.insert(category.clone(), compiled);
        }

        Ok(Self { rules })
    }

    /// Rules of `category` whose key matches `option`
    pub fn rules_for<'a>(
        &'a self,
        category: &str,
        option: &'a str,
    ) -> impl Iterator<Item = &'a ExclusionRule> + 'a {
        self.rules
            .get(category)
            .into_iter()
            .flatten()
            .filter(move |rule| rule.key.matches_option(option))
    }

    /// Selection whose rules drop `candidate_category` as a whole
    pub fn category_conflict<'c>(
        &self,
        composition: &'c Composition,
        candidate_category: &str,
    ) -> Option<(&'c str, &'c str)> {
        composition
            .iter()
            .filter(|(existing, _)| *existing != candidate_category)
            .find(|(existing, option)| {
                self.rules_for(existing, option)
                    .any(|rule| rule.forbids_category(candidate_category))
            })
    }

    /// Selection whose rules reject `candidate_option` in `candidate_category`
    pub fn option_conflict<'c>(
        &self,
        composition: &'c Composition,
        candidate_category: &str,
        candidate_option: &str,
    ) -> Option<(&'c str, &'c str)> {
        composition
            .iter()
            .filter(|(existing, _)| *existing != candidate_category)
            .find(|(existing, option)| {
                self.rules_for(existing, option)
                    .any(|rule| rule.forbids_option(candidate_category, candidate_option))
            })
    }

    /// Whether any selection excludes `candidate_category` entirely
    pub fn category_forbidden(&self, composition: &Composition, candidate_category: &str) -> bool {
        self.category_conflict(composition, candidate_category)
            .is_some()
    }

    /// Whether any other selection excludes `candidate_option` for `candidate_category`
    pub fn option_forbidden(
        &self,
        composition: &Composition,
        candidate_category: &str,
        candidate_option: &str,
    ) -> bool {
        self.option_conflict(composition, candidate_category, candidate_option)
            .is_some()
    }

    /// First pairwise exclusion found across a whole composition
    ///
    /// Incremental checks during selection are not enough on their own: a
    /// later selection can carry a rule against an earlier one.
    pub fn first_violation(&self, composition: &Composition) -> Option<Violation> {
        composition.iter().find_map(|(category, option)| {
            self.option_conflict(composition, category, option)
                .map(|(by_category, by_option)| Violation::Excluded {
                    by_category: by_category.to_string(),
                    by_option: by_option.to_string(),
                    category: category.to_string(),
                    option: option.to_string(),
                })
        })
    }

    /// Category names referenced as rule owners or targets
    pub fn referenced_categories(&self) -> impl Iterator<Item = &str> {
        self.rules.iter().flat_map(|(owner, rules)| {
            std::iter::once(owner.as_str()).chain(
                rules
                    .iter()
                    .flat_map(|rule| rule.per_category.keys().map(String::as_str)),
            )
        })
    }

    /// Literal option keys per owning category
    pub fn literal_keys(&self) -> impl Iterator<Item = (&str, &Matcher)> {
        self.rules.iter().flat_map(|(owner, rules)| {
            rules
                .iter()
                .filter(|rule| rule.key.literal_name().is_some())
                .map(move |rule| (owner.as_str(), &rule.key))
        })
    }
}
