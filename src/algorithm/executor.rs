use crate::{
    algorithm::composition::{Composition, Violation},
    algorithm::selection::RandomSelector,
    io::configuration::{DEFAULT_MAX_ATTEMPTS, MAX_CASCADE_DEPTH, MAX_REDRAWS},
    io::error::{ComposeError, Result, invalid_parameter},
    io::rules_file::RulesFile,
    rules::RuleSet,
    rules::weight::{ResolvedTable, total_weight},
};

/// What happens when a category runs out of redraws
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ExhaustionPolicy {
    /// Leave the category empty for this attempt
    #[default]
    Skip,
    /// Reject the whole attempt and start over
    Restart,
}

/// Engine parameters controlling ordering, redraws and restarts
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ComposerConfig {
    /// Categories processed first, in this order, before the shuffled rest
    pub anchors: Vec<String>,
    /// Anchor whose value is carried into a restarted attempt
    pub preserve: Option<String>,
    /// Draws per category before giving up on it
    pub max_redraws: usize,
    /// Whole-attempt ceiling; `None` retries forever
    pub max_attempts: Option<usize>,
    /// Behaviour once `max_redraws` is exhausted
    pub exhaustion: ExhaustionPolicy,
    /// Nesting limit for cascades triggering further cascades
    pub max_cascade_depth: usize,
    /// Whether categories pulled in by a cascade pass the inclusion gate first
    pub gate_cascaded_attributes: bool,
}

impl Default for ComposerConfig {
    fn default() -> Self {
        Self {
            anchors: Vec::new(),
            preserve: None,
            max_redraws: MAX_REDRAWS,
            max_attempts: Some(DEFAULT_MAX_ATTEMPTS),
            exhaustion: ExhaustionPolicy::Skip,
            max_cascade_depth: MAX_CASCADE_DEPTH,
            gate_cascaded_attributes: true,
        }
    }
}

impl ComposerConfig {
    /// Defaults with the ordering settings taken from a rules file
    pub fn from_rules_file(file: &RulesFile) -> Self {
        Self {
            anchors: file.anchors.clone(),
            preserve: file.preserve.clone(),
            ..Self::default()
        }
    }

    /// Reject parameter combinations the loop cannot work with
    ///
    /// # Errors
    ///
    /// Returns an error if the redraw bound or attempt ceiling is zero
    pub fn validate(&self) -> Result<()> {
        if self.max_redraws == 0 {
            return Err(invalid_parameter(
                "max_redraws",
                &self.max_redraws,
                &"at least one draw per category is needed",
            ));
        }
        if self.max_attempts == Some(0) {
            return Err(invalid_parameter(
                "max_attempts",
                &0,
                &"at least one attempt is needed",
            ));
        }
        Ok(())
    }
}

type Step = std::result::Result<(), Violation>;

/// Generate-and-test composer producing one valid composition per call
///
/// Each attempt fills categories one by one, rejecting draws that clash with
/// what is already selected, then validates the result as a whole. Any
/// violation discards the attempt and starts over; there is no backtracking.
pub struct Composer<'r> {
    rules: &'r RuleSet,
    config: ComposerConfig,
    random_selector: RandomSelector,
    /// Anchors that exist in the breakdown, deduplicated
    anchors: Vec<String>,
    /// Every other category, reshuffled per attempt
    remaining: Vec<String>,
    last_attempts: usize,
}

impl<'r> Composer<'r> {
    /// Create a composer over shared rule tables
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid
    pub fn new(rules: &'r RuleSet, config: ComposerConfig, seed: u64) -> Result<Self> {
        config.validate()?;

        let mut anchors: Vec<String> = Vec::with_capacity(config.anchors.len());
        for anchor in &config.anchors {
            if rules.breakdown.table(anchor).is_some() && !anchors.contains(anchor) {
                anchors.push(anchor.clone());
            }
        }
        let remaining = rules
            .categories()
            .filter(|category| !anchors.iter().any(|a| a.as_str() == *category))
            .map(str::to_string)
            .collect();

        Ok(Self {
            rules,
            config,
            random_selector: RandomSelector::new(seed),
            anchors,
            remaining,
            last_attempts: 0,
        })
    }

    /// Attempts used by the most recent [`Composer::compose`] call
    pub const fn attempts(&self) -> usize {
        self.last_attempts
    }

    /// Active configuration
    pub const fn config(&self) -> &ComposerConfig {
        &self.config
    }

    /// Produce one composition satisfying every rule
    ///
    /// # Errors
    ///
    /// Returns [`ComposeError::ConstraintUnsatisfiable`] once the attempt
    /// ceiling is reached
    pub fn compose(&mut self) -> Result<Composition> {
        let mut start = Composition::new();
        let mut last_violation = None;
        let mut attempts = 0;

        loop {
            if self.config.max_attempts.is_some_and(|max| attempts >= max) {
                self.last_attempts = attempts;
                return Err(ComposeError::ConstraintUnsatisfiable {
                    attempts,
                    last_violation,
                });
            }
            attempts += 1;

            let mut working = start.clone();
            match self.attempt(&mut working) {
                Ok(()) => {
                    self.last_attempts = attempts;
                    tracing::debug!(attempts, size = working.len(), "composition accepted");
                    return Ok(working);
                }
                Err(violation) => {
                    tracing::debug!(attempt = attempts, %violation, "attempt rejected");
                    start = self
                        .config
                        .preserve
                        .as_deref()
                        .map(|anchor| working.retain_only(anchor))
                        .unwrap_or_default();
                    last_violation = Some(violation);
                }
            }
        }
    }

    /// Produce `count` compositions; duplicates are possible
    ///
    /// # Errors
    ///
    /// Returns the first composition failure
    pub fn compose_batch(&mut self, count: usize) -> Result<Vec<Composition>> {
        (0..count).map(|_| self.compose()).collect()
    }

    /// First rule a complete composition breaks, if any
    pub fn validate_composition(&self, composition: &Composition) -> Option<Violation> {
        self.rules
            .exclusions
            .first_violation(composition)
            .or_else(|| self.rules.requirements.first_unmet(composition))
    }

    fn attempt(&mut self, working: &mut Composition) -> Step {
        // Carried-over anchors lost their cascades with the rest of the attempt
        let carried: Vec<(String, String)> = working
            .iter()
            .map(|(category, option)| (category.to_string(), option.to_string()))
            .collect();
        for (category, option) in &carried {
            self.follow_up(working, category, option, 0)?;
        }

        for category in self.processing_order() {
            if !working.contains(&category) {
                self.select_category(working, &category, true, 0)?;
            }
        }

        match self.validate_composition(working) {
            Some(violation) => Err(violation),
            None => Ok(()),
        }
    }

    fn processing_order(&mut self) -> Vec<String> {
        let mut rest = self.remaining.clone();
        self.random_selector.shuffle(&mut rest);
        self.anchors.iter().cloned().chain(rest).collect()
    }

    fn select_category(
        &mut self,
        working: &mut Composition,
        category: &str,
        gated: bool,
        depth: usize,
    ) -> Step {
        let rules = self.rules;
        if rules.exclusions.category_forbidden(working, category) {
            tracing::trace!(category, "category excluded by existing selection");
            return Ok(());
        }

        let table = rules.breakdown.effective_table(working, category);
        let total = total_weight(&table);
        if total <= 0.0 || (gated && !self.random_selector.include(total)) {
            tracing::trace!(category, total, "category left out");
            return Ok(());
        }

        for _ in 0..self.config.max_redraws {
            let Some(option) = self.random_selector.choose(&table) else {
                break;
            };
            if rules.exclusions.option_forbidden(working, category, option) {
                continue;
            }
            let option = option.to_string();
            return self.commit(working, category, &option, depth);
        }

        match self.config.exhaustion {
            ExhaustionPolicy::Skip => {
                tracing::trace!(category, "redraws exhausted, category left empty");
                Ok(())
            }
            ExhaustionPolicy::Restart => Err(Violation::Exhausted {
                category: category.to_string(),
            }),
        }
    }

    fn commit(
        &mut self,
        working: &mut Composition,
        category: &str,
        option: &str,
        depth: usize,
    ) -> Step {
        if working.get(category) == Some(option) {
            return Ok(());
        }
        working.insert(category, option);
        self.follow_up(working, category, option, depth)
    }

    /// Mirrors and cascade rules for a freshly committed selection
    fn follow_up(
        &mut self,
        working: &mut Composition,
        category: &str,
        option: &str,
        depth: usize,
    ) -> Step {
        if depth >= self.config.max_cascade_depth {
            tracing::warn!(category, option, depth, "cascade depth limit reached");
            return Ok(());
        }
        let rules = self.rules;

        for target in rules.cascades.mirrors_of(category) {
            if rules.breakdown.has_option(target, option) {
                self.commit(working, target, option, depth + 1)?;
            }
        }

        for rule in rules.cascades.matching(category, option) {
            let gated = self.config.gate_cascaded_attributes;
            for attribute in &rule.attributes {
                if !working.contains(attribute) {
                    self.select_category(working, attribute, gated, depth + 1)?;
                }
            }

            for forced in &rule.traits {
                if let Some(name) = forced.direct_option(&rules.breakdown) {
                    self.commit(working, &forced.attribute, name, depth + 1)?;
                    continue;
                }
                let candidates: ResolvedTable = rules
                    .breakdown
                    .effective_table(working, &forced.attribute)
                    .into_iter()
                    .filter(|(name, _)| forced.value.matches_option(name))
                    .collect();
                if let Some(choice) = self.random_selector.choose(&candidates) {
                    let choice = choice.to_string();
                    self.commit(working, &forced.attribute, &choice, depth + 1)?;
                } else {
                    tracing::trace!(
                        attribute = %forced.attribute,
                        pattern = %forced.value,
                        "no option matches forced trait"
                    );
                }
            }
        }

        Ok(())
    }
}
