//! Constrained weighted trait composition for generative collectible artwork
//!
//! Given a weighted breakdown of categories and options, do-not-pair rules,
//! requirement rules and cascading follow-ups, the composer draws one complete
//! category → option mapping at a time, restarting whole attempts until the
//! result satisfies every rule.

#![forbid(unsafe_code)]

/// Composition loop, random selection and the composition builder
pub mod algorithm;
/// Batch statistics over generated compositions
pub mod analysis;
/// Input/output operations, configuration and error handling
pub mod io;
/// Compiled rule tables and the checks built on them
pub mod rules;

pub use algorithm::composition::Composition;
pub use algorithm::executor::{Composer, ComposerConfig, ExhaustionPolicy};
pub use io::error::{ComposeError, Result};
pub use rules::RuleSet;
