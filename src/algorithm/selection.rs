use crate::io::configuration::GATE_SCALE;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng, rngs::StdRng};

/// Seeded random source for every stochastic choice in a composer
pub struct RandomSelector {
    rng: StdRng,
}

impl RandomSelector {
    /// Create a deterministic random selector
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Bernoulli gate deciding whether a category takes part in an attempt
    ///
    /// Draws uniformly from `[0, 100)` and includes the category when the draw
    /// falls below its total weight. Totals of 100 or more always pass, zero never does.
    pub fn include(&mut self, total_weight: f64) -> bool {
        self.rng.random::<f64>() * GATE_SCALE < total_weight
    }

    /// Generic weighted random selection
    ///
    /// Returns index into weights array using cumulative distribution, or
    /// `None` when nothing carries positive weight
    pub fn weighted_choice(&mut self, weights: &[f64]) -> Option<usize> {
        let total: f64 = weights.iter().filter(|w| **w > 0.0).sum();
        if total <= 0.0 {
            return None;
        }

        let mut rand_val = self.rng.random::<f64>() * total;
        let mut last_positive = None;
        for (i, &weight) in weights.iter().enumerate() {
            if weight <= 0.0 {
                continue;
            }
            last_positive = Some(i);
            rand_val -= weight;
            if rand_val < 0.0 {
                return Some(i);
            }
        }
        last_positive
    }

    /// Draw one option proportionally to its weight
    pub fn choose<'t>(&mut self, table: &'t [(String, f64)]) -> Option<&'t str> {
        let weights: Vec<f64> = table.iter().map(|(_, weight)| *weight).collect();
        self.weighted_choice(&weights)
            .and_then(|index| table.get(index))
            .map(|(option, _)| option.as_str())
    }

    /// Shuffle items in place
    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        items.shuffle(&mut self.rng);
    }

    /// Uniform integer in `low..=high`
    pub fn between(&mut self, low: u32, high: u32) -> u32 {
        if high <= low {
            return low;
        }
        self.rng.random_range(low..=high)
    }
}
