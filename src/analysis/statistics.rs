//! Occurrence tallies over batches of generated compositions

use crate::algorithm::composition::Composition;
use crate::rules::weight::Breakdown;
use serde::Serialize;
use std::collections::BTreeMap;

/// Per-category option counts accumulated over many compositions
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TraitTally {
    /// Number of compositions recorded
    pub compositions: usize,
    /// Category → option → occurrences
    pub counts: BTreeMap<String, BTreeMap<String, usize>>,
}

impl TraitTally {
    /// Create an empty tally
    pub fn new() -> Self {
        Self::default()
    }

    /// Tally every composition of a batch
    pub fn from_batch<'a>(batch: impl IntoIterator<Item = &'a Composition>) -> Self {
        let mut tally = Self::new();
        for composition in batch {
            tally.record(composition);
        }
        tally
    }

    /// Count the selections of one composition
    pub fn record(&mut self, composition: &Composition) {
        self.compositions += 1;
        for (category, option) in composition.iter() {
            *self
                .counts
                .entry(category.to_string())
                .or_default()
                .entry(option.to_string())
                .or_default() += 1;
        }
    }

    /// Occurrences of one option
    pub fn count(&self, category: &str, option: &str) -> usize {
        self.counts
            .get(category)
            .and_then(|options| options.get(option))
            .copied()
            .unwrap_or(0)
    }

    /// Compositions in which the category was filled at all
    pub fn category_count(&self, category: &str) -> usize {
        self.counts
            .get(category)
            .map_or(0, |options| options.values().sum())
    }

    /// Fraction of recorded compositions holding the option
    pub fn share(&self, category: &str, option: &str) -> f64 {
        if self.compositions == 0 {
            return 0.0;
        }
        self.count(category, option) as f64 / self.compositions as f64
    }
}

/// Summary of a breakdown next to the observed tally
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchReport {
    /// Number of options offered across all categories
    pub total_options: usize,
    /// Observed counts
    pub tally: TraitTally,
    /// Category → fraction of compositions in which it appeared
    pub coverage: BTreeMap<String, f64>,
}

impl BatchReport {
    /// Build a report for a batch generated from `breakdown`
    pub fn new(breakdown: &Breakdown, tally: TraitTally) -> Self {
        let coverage = breakdown
            .categories()
            .map(|category| {
                let seen = tally.category_count(category) as f64;
                let share = if tally.compositions == 0 {
                    0.0
                } else {
                    seen / tally.compositions as f64
                };
                (category.to_string(), share)
            })
            .collect();

        Self {
            total_options: total_options(breakdown),
            tally,
            coverage,
        }
    }
}

/// Number of options offered across all categories
pub fn total_options(breakdown: &Breakdown) -> usize {
    breakdown.iter().map(|(_, table)| table.len()).sum()
}
