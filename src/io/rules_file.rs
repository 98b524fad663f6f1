//! JSON rules file format shared with the rendering side of the pipeline
//!
//! Only the keys the engine understands are modelled. Rendering settings such as
//! `name`, `width` or `order` may sit in the same file and are ignored here.

use crate::io::error::{Result, WithContext};
use crate::rules::weight::Breakdown;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Exclusion entry for one option of one category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawExclusion {
    /// Patterns matched against any other category's option or name
    Patterns(Vec<String>),
    /// Patterns keyed by the category they apply to, plus `attributesToExclude`
    Targeted(BTreeMap<String, Vec<String>>),
}

/// Requirement entry for one option (or a whole category)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawRequirement {
    /// At least one identifier must be present somewhere else
    AnyOf(Vec<String>),
    /// Every listed category must hold one of its identifiers
    AllOf(BTreeMap<String, Vec<String>>),
}

/// Forced follow-up selection for a single category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawTraitOverride {
    /// Category receiving the forced option
    pub attribute: String,
    /// Literal option name or pattern restricting the draw
    #[serde(rename = "trait")]
    pub value: String,
}

/// Cascade triggered when an option matching the rule key is committed
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawCascade {
    /// Categories to resolve through the normal weighted path
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attributes: Vec<String>,
    /// Options to force into other categories
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub traits: Vec<RawTraitOverride>,
}

/// Complete rules file as written by users or by the scaffold command
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RulesFile {
    /// Weighted options per category
    pub breakdown: Breakdown,
    /// Do-not-pair rules
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub dnp: BTreeMap<String, BTreeMap<String, RawExclusion>>,
    /// Co-occurrence requirements
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub need: BTreeMap<String, BTreeMap<String, RawRequirement>>,
    /// Cascading follow-up rules keyed by option pattern
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub required: BTreeMap<String, BTreeMap<String, RawCascade>>,
    /// Categories processed first, in this order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub anchors: Vec<String>,
    /// Categories that copy an identically named option from a source category
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub mirrors: BTreeMap<String, Vec<String>>,
    /// Anchor whose value survives a restarted attempt
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preserve: Option<String>,
}

impl RulesFile {
    /// Parse a rules file from JSON text
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not a valid rules document
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Read and parse a rules file from disk
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).with_path(path, "read rules")?;
        Self::from_json(&text).with_path(path, "parse rules")
    }

    /// Write the rules file as pretty-printed JSON
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails
    pub fn save(&self, path: &Path) -> Result<()> {
        let text = serde_json::to_string_pretty(self).with_path(path, "serialize rules")?;
        std::fs::write(path, text).with_path(path, "write rules")
    }
}
