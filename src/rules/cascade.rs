//! Follow-up rules fired when an option is committed

use crate::io::error::Result;
use crate::io::rules_file::RawCascade;
use crate::rules::matcher::Matcher;
use crate::rules::weight::Breakdown;
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

/// Option forced into another category
#[derive(Debug, Clone)]
pub struct TraitOverride {
    /// Receiving category
    pub attribute: String,
    /// Option to assign, or a pattern restricting a weighted draw
    pub value: Matcher,
}

impl TraitOverride {
    /// Option to assign without a draw
    ///
    /// A literal naming one of the target's options yields that option as spelled
    /// in the breakdown. A literal that looks like a file name is taken as is.
    /// Anything else restricts a weighted draw instead.
    pub fn direct_option<'a>(&'a self, breakdown: &'a Breakdown) -> Option<&'a str> {
        let name = self.value.literal_name()?;
        breakdown
            .table(&self.attribute)
            .and_then(|table| table.keys().find(|option| option.eq_ignore_ascii_case(name)))
            .map(String::as_str)
            .or_else(|| Path::new(name).extension().is_some().then_some(name))
    }
}

/// Follow-ups for options whose name matches `trigger`
#[derive(Debug, Clone)]
pub struct CascadeRule {
    /// Case-insensitive pattern over the committed option's name
    pub trigger: Matcher,
    /// Categories to fill through the regular weighted path
    pub attributes: Vec<String>,
    /// Forced assignments
    pub traits: Vec<TraitOverride>,
}

/// Compiled cascade table, including mirrored category pairs
#[derive(Debug, Clone, Default)]
pub struct CascadeRules {
    rules: BTreeMap<String, Vec<CascadeRule>>,
    mirrors: BTreeMap<String, Vec<String>>,
}

impl CascadeRules {
    /// Compile the raw cascade table and mirror pairs
    ///
    /// # Errors
    ///
    /// Returns an error if a trigger or trait pattern fails to compile
    pub fn compile(
        raw: &BTreeMap<String, BTreeMap<String, RawCascade>>,
        mirrors: &BTreeMap<String, Vec<String>>,
    ) -> Result<Self> {
        let no_categories = BTreeSet::new();
        let mut rules = BTreeMap::new();

        for (category, entries) in raw {
            let mut compiled = Vec::with_capacity(entries.len());
            for (trigger, cascade) in entries {
                let location = format!("required.{category}.{trigger}");
                let traits = cascade
                    .traits
                    .iter()
                    .map(|t| {
                        Ok(TraitOverride {
                            attribute: t.attribute.clone(),
                            value: Matcher::parse(&t.value, &no_categories, &location)?,
                        })
                    })
                    .collect::<Result<Vec<_>>>()?;

                compiled.push(CascadeRule {
                    trigger: Matcher::pattern(trigger, &location)?,
                    attributes: cascade.attributes.clone(),
                    traits,
                });
            }
            rules.insert(category.clone(), compiled);
        }

        Ok(Self {
            rules,
            mirrors: mirrors.clone(),
        })
    }

    /// Rules of `category` triggered by `option`
    pub fn matching<'a>(
        &'a self,
        category: &str,
        option: &'a str,
    ) -> impl Iterator<Item = &'a CascadeRule> + 'a {
        self.rules
            .get(category)
            .into_iter()
            .flatten()
            .filter(move |rule| rule.trigger.matches_option(option))
    }

    /// Categories that copy `category`'s option when they offer the same name
    pub fn mirrors_of(&self, category: &str) -> &[String] {
        self.mirrors
            .get(category)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Every forced assignment across all rules
    pub fn forced_traits(&self) -> impl Iterator<Item = &TraitOverride> {
        self.rules
            .values()
            .flatten()
            .flat_map(|rule| rule.traits.iter())
    }

    /// Every category named by cascade rules or mirrors
    pub fn referenced_categories(&self) -> Vec<&str> {
        let mut names = Vec::new();
        for (owner, rules) in &self.rules {
            names.push(owner.as_str());
            for rule in rules {
                names.extend(rule.attributes.iter().map(String::as_str));
                names.extend(rule.traits.iter().map(|t| t.attribute.as_str()));
            }
        }
        for (source, targets) in &self.mirrors {
            names.push(source.as_str());
            names.extend(targets.iter().map(String::as_str));
        }
        names
    }
}
