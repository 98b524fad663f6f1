//! Engine constants and runtime configuration defaults

/// Scale of the Bernoulli gate draw; category weights are percentages
pub const GATE_SCALE: f64 = 100.0;

/// Redraws allowed per category before it is given up for the attempt
pub const MAX_REDRAWS: usize = 50;

/// Default ceiling on whole-attempt restarts before reporting unsatisfiable rules
pub const DEFAULT_MAX_ATTEMPTS: usize = 10_000;

// Stops mutually triggering cascade rules from recursing without end
/// Maximum nesting of cascade commits within one attempt
pub const MAX_CASCADE_DEPTH: usize = 16;

/// Key in an exclusion entry that lists whole categories to drop
pub const ATTRIBUTES_TO_EXCLUDE: &str = "attributesToExclude";

/// Key in a requirement table that applies to every option of the category
pub const ATTRIBUTES_TO_INCLUDE: &str = "attributesToInclude";

/// Probability mass distributed across options by the scaffold command
pub const SCAFFOLD_TOTAL: u32 = 100;

// Default values for configurable parameters
/// Fixed seed for reproducible generation
pub const DEFAULT_SEED: u64 = 42;

/// Default number of compositions per run
pub const DEFAULT_COUNT: usize = 1;

// Progress bar display settings
/// Width of progress bars in characters
pub const PROGRESS_BAR_WIDTH: u16 = 40;
