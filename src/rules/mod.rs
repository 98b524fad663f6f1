//! Rule tables compiled from a rules file

/// Follow-up rules fired on commit
pub mod cascade;
/// Do-not-pair rules
pub mod exclusion;
/// Typed identifier matching shared by every table
pub mod matcher;
/// Co-occurrence requirements
pub mod requirement;
/// Weights, conditional tables and the breakdown
pub mod weight;

use crate::io::error::{ComposeError, Result};
use crate::io::rules_file::RulesFile;
use cascade::CascadeRules;
use exclusion::ExclusionRules;
use requirement::RequirementRules;
use std::collections::BTreeSet;
use weight::Breakdown;

/// How configuration inconsistencies are treated at load time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Validation {
    /// Log each issue as a warning and continue; such rules never match
    #[default]
    Lenient,
    /// Fail with every issue found
    Strict,
}

/// Read-only rule tables for one generation run
///
/// Shared freely across threads; composers only ever borrow it.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    /// Weighted options per category
    pub breakdown: Breakdown,
    /// Do-not-pair rules
    pub exclusions: ExclusionRules,
    /// Co-occurrence requirements
    pub requirements: RequirementRules,
    /// Cascades and mirrors
    pub cascades: CascadeRules,
}

impl RuleSet {
    /// Compile a rules file into matchable tables
    ///
    /// # Errors
    ///
    /// Returns an error if a pattern fails to compile, or if validation is
    /// strict and the tables reference unknown categories or options
    pub fn compile(file: &RulesFile, validation: Validation) -> Result<Self> {
        let categories: BTreeSet<String> =
            file.breakdown.categories().map(str::to_string).collect();

        let rules = Self {
            breakdown: file.breakdown.clone(),
            exclusions: ExclusionRules::compile(&file.dnp, &categories)?,
            requirements: RequirementRules::compile(&file.need, &categories)?,
            cascades: CascadeRules::compile(&file.required, &file.mirrors)?,
        };

        let mut issues = rules.issues();
        issues.extend(
            file.anchors
                .iter()
                .chain(&file.preserve)
                .filter(|anchor| !categories.contains(*anchor))
                .map(|anchor| format!("anchor '{anchor}' is not a category")),
        );

        if issues.is_empty() {
            return Ok(rules);
        }

        match validation {
            Validation::Strict => Err(ComposeError::Configuration { issues }),
            Validation::Lenient => {
                for issue in &issues {
                    tracing::warn!(%issue, "rule will have no effect");
                }
                Ok(rules)
            }
        }
    }

    /// Inconsistencies between the rule tables and the breakdown
    pub fn issues(&self) -> Vec<String> {
        let mut issues = Vec::new();
        let mut unknown = BTreeSet::new();

        let referenced = self
            .exclusions
            .referenced_categories()
            .chain(self.requirements.referenced_categories())
            .chain(self.cascades.referenced_categories());
        for category in referenced {
            if self.breakdown.table(category).is_none() && unknown.insert(category) {
                issues.push(format!("unknown category '{category}'"));
            }
        }

        let literal_keys = self
            .exclusions
            .literal_keys()
            .chain(self.requirements.literal_keys());
        for (category, key) in literal_keys {
            let known = self
                .breakdown
                .table(category)
                .is_none_or(|table| table.keys().any(|name| key.matches_option(name)));
            if !known {
                issues.push(format!("unknown option '{key}' in category '{category}'"));
            }
        }

        for forced in self.cascades.forced_traits() {
            let known = self
                .breakdown
                .table(&forced.attribute)
                .is_none_or(|table| table.keys().any(|name| forced.value.matches_option(name)));
            if !known {
                issues.push(format!(
                    "forced trait '{}' matches no option of category '{}'",
                    forced.value, forced.attribute
                ));
            }
        }

        for (category, table) in self.breakdown.iter() {
            for (option, weight) in table {
                if weight.is_missing_base() {
                    issues.push(format!(
                        "conditional weight of {category}={option} has no baseValue"
                    ));
                }
            }
        }

        issues
    }

    /// All category names in stable order
    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.breakdown.categories()
    }
}
