//! Typed dispatch for the identifiers used throughout the rule tables
//!
//! Rule files express everything as plain strings. Each string is classified
//! once when the rules are compiled, so matching never has to guess whether a
//! value was meant as a name, a regular expression or a category reference.

use crate::io::error::{ComposeError, Result};
use regex::{Regex, RegexBuilder};
use std::collections::BTreeSet;
use std::fmt;

/// Sentinel standing for every option of a category
pub const WILDCARD: &str = "*";

// `.` is left out so file-like names such as "Fox.png" stay literal
const REGEX_METACHARACTERS: &[char] = &[
    '^', '$', '*', '+', '?', '(', ')', '[', ']', '{', '}', '|', '\\',
];

/// A compiled rule identifier
#[derive(Debug, Clone)]
pub enum Matcher {
    /// Option name, matched by case-insensitive equality or as an unanchored regex
    ///
    /// A bare "Crown" therefore selects "Crown.png" as well as "crown".
    Literal {
        /// Name as written in the rules file
        name: String,
        /// The same text compiled case-insensitively
        pattern: Regex,
    },
    /// Case-insensitive, unanchored regular expression over option names
    Pattern(Regex),
    /// Any option of the category in scope
    Wildcard,
    /// A whole category, by name
    CategoryRef(String),
}

impl Matcher {
    /// Classify a raw rule string
    ///
    /// Strings naming a known category become [`Matcher::CategoryRef`]. Strings
    /// without regex metacharacters are literals; everything else is compiled.
    ///
    /// # Errors
    ///
    /// Returns an error if the string needs to be a regex but does not compile
    pub fn parse(raw: &str, categories: &BTreeSet<String>, location: &str) -> Result<Self> {
        if raw == WILDCARD {
            return Ok(Self::Wildcard);
        }
        if categories.contains(raw) {
            return Ok(Self::CategoryRef(raw.to_string()));
        }
        if !raw.contains(REGEX_METACHARACTERS) {
            return Self::literal(raw, location);
        }
        Self::pattern(raw, location)
    }

    /// Build a literal name matcher
    ///
    /// # Errors
    ///
    /// Returns an error if the name does not compile as a regex
    pub fn literal(name: &str, location: &str) -> Result<Self> {
        Ok(Self::Literal {
            name: name.to_string(),
            pattern: compile(name, location)?,
        })
    }

    /// Compile a string as a regex regardless of its shape
    ///
    /// # Errors
    ///
    /// Returns an error if the pattern does not compile
    pub fn pattern(raw: &str, location: &str) -> Result<Self> {
        compile(raw, location).map(Self::Pattern)
    }

    /// Literal name, if this is a [`Matcher::Literal`]
    pub fn literal_name(&self) -> Option<&str> {
        match self {
            Self::Literal { name, .. } => Some(name),
            _ => None,
        }
    }

    /// Whether this identifier selects the whole of `category`
    pub fn matches_category(&self, category: &str) -> bool {
        match self {
            Self::Wildcard => true,
            Self::CategoryRef(name) => name == category,
            Self::Literal { .. } | Self::Pattern(_) => false,
        }
    }

    /// Whether this identifier selects `option` by name
    pub fn matches_option(&self, option: &str) -> bool {
        match self {
            Self::Literal { name, pattern } => {
                name.eq_ignore_ascii_case(option) || pattern.is_match(option)
            }
            Self::Pattern(regex) => regex.is_match(option),
            Self::Wildcard => true,
            Self::CategoryRef(_) => false,
        }
    }

    /// Whether this identifier selects `option` filed under `category`
    pub fn matches(&self, category: &str, option: &str) -> bool {
        self.matches_category(category) || self.matches_option(option)
    }

    /// Referenced category name, if any
    pub fn category(&self) -> Option<&str> {
        match self {
            Self::CategoryRef(name) => Some(name),
            _ => None,
        }
    }
}

impl fmt::Display for Matcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal { name, .. } => write!(f, "{name}"),
            Self::Pattern(regex) => write!(f, "/{}/", regex.as_str()),
            Self::Wildcard => write!(f, "{WILDCARD}"),
            Self::CategoryRef(name) => write!(f, "<{name}>"),
        }
    }
}

fn compile(raw: &str, location: &str) -> Result<Regex> {
    RegexBuilder::new(raw)
        .case_insensitive(true)
        .build()
        .map_err(|source| ComposeError::InvalidPattern {
            location: location.to_string(),
            pattern: raw.to_string(),
            source,
        })
}
