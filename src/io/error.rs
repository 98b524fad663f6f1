//! Error types and context management for composition operations

use crate::algorithm::composition::Violation;
use std::fmt;
use std::path::{Path, PathBuf};

/// Main error type for all composition operations
#[derive(Debug)]
pub enum ComposeError {
    /// Failed to parse a rules file
    ConfigLoad {
        /// Path to the rules file
        path: PathBuf,
        /// Underlying JSON error
        source: serde_json::Error,
    },

    /// Rule tables reference things that do not exist or cannot be honoured
    Configuration {
        /// Every issue found during validation
        issues: Vec<String>,
    },

    /// A rule string failed to compile as a regular expression
    InvalidPattern {
        /// Where in the rule tables the pattern was found
        location: String,
        /// The offending pattern text
        pattern: String,
        /// Underlying regex error
        source: regex::Error,
    },

    /// Engine parameter validation failed
    InvalidParameter {
        /// Parameter name as spelled in `ComposerConfig`
        parameter: &'static str,
        /// Rejected value
        value: String,
        /// Constraint the value breaks
        reason: String,
    },

    /// Attempt ceiling reached without a valid composition
    ///
    /// Contradictory rule sets (for example two mandatory categories whose
    /// only options exclude each other) end up here instead of looping forever.
    ConstraintUnsatisfiable {
        /// Number of whole attempts made
        attempts: usize,
        /// The violation that rejected the final attempt
        last_violation: Option<Violation>,
    },

    /// Reading or writing a file failed
    FileSystem {
        /// File or directory being accessed
        path: PathBuf,
        /// What was being done, e.g. "read rules"
        operation: &'static str,
        /// Error reported by the OS
        source: std::io::Error,
    },
}

impl fmt::Display for ComposeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConfigLoad { path, source } => {
                write!(f, "Failed to load rules '{}': {source}", path.display())
            }
            Self::Configuration { issues } => {
                write!(f, "Invalid rule configuration: {}", issues.join("; "))
            }
            Self::InvalidPattern {
                location,
                pattern,
                source,
            } => {
                write!(f, "Invalid pattern '{pattern}' at {location}: {source}")
            }
            Self::InvalidParameter {
                parameter,
                value,
                reason,
            } => {
                write!(f, "Invalid parameter '{parameter}' = '{value}': {reason}")
            }
            Self::ConstraintUnsatisfiable {
                attempts,
                last_violation,
            } => match last_violation {
                Some(violation) => write!(
                    f,
                    "No valid composition after {attempts} attempts (last rejection: {violation})"
                ),
                None => write!(f, "No valid composition after {attempts} attempts"),
            },
            Self::FileSystem {
                path,
                operation,
                source,
            } => {
                write!(
                    f,
                    "Could not {operation} at '{}': {source}",
                    path.display()
                )
            }
        }
    }
}

impl std::error::Error for ComposeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::ConfigLoad { source, .. } => Some(source),
            Self::InvalidPattern { source, .. } => Some(source),
            Self::FileSystem { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Convenience type alias for composition results
pub type Result<T> = std::result::Result<T, ComposeError>;

/// Attaches file locations to errors raised by path-less conversions
pub trait WithContext<T> {
    /// Record the path and operation on file system and parse errors
    ///
    /// # Errors
    ///
    /// Propagates the original error with the path applied
    fn with_path(self, path: &Path, operation: &'static str) -> Result<T>;
}

impl<T, E> WithContext<T> for std::result::Result<T, E>
where
    E: Into<ComposeError>,
{
    fn with_path(self, path: &Path, operation: &'static str) -> Result<T> {
        self.map_err(|e| match e.into() {
            ComposeError::FileSystem { source, .. } => ComposeError::FileSystem {
                path: path.to_path_buf(),
                operation,
                source,
            },
            ComposeError::ConfigLoad { source, .. } => ComposeError::ConfigLoad {
                path: path.to_path_buf(),
                source,
            },
            other => other,
        })
    }
}

impl From<serde_json::Error> for ComposeError {
    fn from(err: serde_json::Error) -> Self {
        Self::ConfigLoad {
            path: PathBuf::from("<unknown>"),
            source: err,
        }
    }
}

impl From<std::io::Error> for ComposeError {
    fn from(err: std::io::Error) -> Self {
        Self::FileSystem {
            path: PathBuf::from("<unknown>"),
            operation: "unknown",
            source: err,
        }
    }
}

/// Build a [`ComposeError::InvalidParameter`]
pub fn invalid_parameter(
    parameter: &'static str,
    value: &impl ToString,
    reason: &impl ToString,
) -> ComposeError {
    ComposeError::InvalidParameter {
        parameter,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

/// Create a configuration error from a single issue
pub fn configuration_error(issue: impl Into<String>) -> ComposeError {
    ComposeError::Configuration {
        issues: vec![issue.into()],
    }
}
