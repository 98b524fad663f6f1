/// Command-line parsing and command dispatch
pub mod cli;
/// Engine constants and defaults
pub mod configuration;
/// Error type and context helpers
pub mod error;
/// Terminal progress display
pub mod progress;
/// JSON rules file format
pub mod rules_file;
/// Starter rules files from trait directories
pub mod scaffold;
