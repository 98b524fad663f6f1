//! Starter rules files built from a directory of trait layers
//!
//! Expects `<root>/<Category>/<option file>` and spreads 100 percent of weight
//! over each category's options at random, leaving the rule tables empty.

use crate::algorithm::selection::RandomSelector;
use crate::io::configuration::SCAFFOLD_TOTAL;
use crate::io::error::{Result, WithContext};
use crate::io::rules_file::RulesFile;
use crate::rules::weight::{Breakdown, Weight, WeightTable};
use std::collections::BTreeMap;
use std::path::Path;

/// Split `total` into `parts` positive-leaning integers that sum to `total`
///
/// All but the last part are drawn from `1..=total / (parts - 1)`; the last
/// takes whatever remains.
pub fn random_partition(parts: usize, total: u32, selector: &mut RandomSelector) -> Vec<u32> {
    match parts {
        0 => return Vec::new(),
        1 => return vec![total],
        _ => {}
    }

    let drawn = parts - 1;
    let ceiling = total / u32::try_from(drawn).unwrap_or(u32::MAX);
    let floor = u32::from(ceiling > 0);

    let mut values: Vec<u32> = (0..drawn)
        .map(|_| selector.between(floor, ceiling))
        .collect();
    let used: u32 = values.iter().sum();
    values.push(total.saturating_sub(used));
    values
}

/// Build a rules file from category → option names
pub fn scaffold_rules(listing: &BTreeMap<String, Vec<String>>, seed: u64) -> RulesFile {
    let mut selector = RandomSelector::new(seed);
    let mut breakdown = Breakdown::default();

    for (category, options) in listing {
        let weights = random_partition(options.len(), SCAFFOLD_TOTAL, &mut selector);
        let table: WeightTable = options
            .iter()
            .cloned()
            .zip(weights.into_iter().map(|w| Weight::Flat(f64::from(w))))
            .collect();
        breakdown.insert(category.clone(), table);
    }

    RulesFile {
        breakdown,
        ..RulesFile::default()
    }
}

/// List trait layers as category directory → sorted option file names
///
/// Hidden entries are skipped.
///
/// # Errors
///
/// Returns an error if the root or a category directory cannot be read
pub fn read_trait_directory(root: &Path) -> Result<BTreeMap<String, Vec<String>>> {
    let mut listing = BTreeMap::new();

    for entry in std::fs::read_dir(root).with_path(root, "list trait directory")? {
        let path = entry.with_path(root, "list trait directory")?.path();
        if !path.is_dir() {
            continue;
        }
        let Some(category) = visible_name(&path) else {
            continue;
        };

        let mut options = Vec::new();
        for option_entry in std::fs::read_dir(&path).with_path(&path, "list trait options")? {
            let option_path = option_entry.with_path(&path, "list trait options")?.path();
            if option_path.is_file() {
                if let Some(option) = visible_name(&option_path) {
                    options.push(option);
                }
            }
        }
        options.sort();
        listing.insert(category, options);
    }

    Ok(listing)
}

fn visible_name(path: &Path) -> Option<String> {
    let name = path.file_name()?.to_string_lossy().into_owned();
    (!name.starts_with('.')).then_some(name)
}
