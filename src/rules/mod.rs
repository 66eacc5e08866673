//! The rule table a loaded dictionary hands to the affix engine.
//!
//! A [`Dictionary`] is built once and never mutated afterwards; every
//! [`crate::affix::AffixProcessor`] bound to it only reads from it.

pub mod condition;
pub mod flags;
pub mod loader;

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

pub use condition::Condition;
pub use flags::parse_flags;

#[derive(Debug, Error)]
pub enum RuleTableError {
    #[error("rule table contains no affix rules")]
    Empty,

    #[error("invalid flag {flag:?} for flag type {flag_type}")]
    InvalidFlag { flag: String, flag_type: FlagType },

    #[error("failed to read rule table {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse TOML rule table: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("failed to parse JSON rule table: {0}")]
    Json(#[from] serde_json::Error),
}

/// How flag strings are encoded. Fixed once per dictionary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlagType {
    /// One flag per 8-bit character.
    #[default]
    #[serde(alias = "narrow")]
    Char,
    /// One flag per pair of characters.
    #[serde(alias = "wide")]
    Long,
    /// Comma-separated decimal numbers.
    #[serde(alias = "numeric")]
    Num,
    /// One flag per Unicode code point.
    #[serde(rename = "utf8", alias = "utf-8", alias = "UTF-8")]
    Utf8,
}

impl fmt::Display for FlagType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FlagType::Char => write!(f, "char"),
            FlagType::Long => write!(f, "long"),
            FlagType::Num => write!(f, "num"),
            FlagType::Utf8 => write!(f, "utf8"),
        }
    }
}

/// A single decoded flag token.
///
/// Tokens only come out of [`parse_flags`], so two flags compare equal
/// exactly when they name the same rule (numeric flags are normalized).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Flag(String);

impl Flag {
    pub(crate) fn new(token: String) -> Self {
        Self(token)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for Flag {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Flag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AffixKind {
    Prefix,
    Suffix,
}

impl fmt::Display for AffixKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AffixKind::Prefix => write!(f, "prefix"),
            AffixKind::Suffix => write!(f, "suffix"),
        }
    }
}

/// One strip/add/condition line of an affix rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AffixEntry {
    strip: Option<String>,
    affix: String,
    condition: Condition,
}

impl AffixEntry {
    /// `strip` of `None` (or an empty string) means nothing is removed from the stem.
    pub fn new(strip: Option<&str>, affix: &str, condition: &str) -> Self {
        Self {
            strip: strip.filter(|s| !s.is_empty()).map(str::to_string),
            affix: affix.to_string(),
            condition: Condition::parse(condition),
        }
    }

    pub fn strip(&self) -> Option<&str> {
        self.strip.as_deref()
    }

    pub fn affix(&self) -> &str {
        &self.affix
    }

    pub fn condition(&self) -> &Condition {
        &self.condition
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AffixRule {
    kind: AffixKind,
    cross_product: bool,
    entries: Vec<AffixEntry>,
}

impl AffixRule {
    pub fn new(kind: AffixKind, cross_product: bool) -> Self {
        Self {
            kind,
            cross_product,
            entries: Vec::new(),
        }
    }

    pub fn prefix(cross_product: bool) -> Self {
        Self::new(AffixKind::Prefix, cross_product)
    }

    pub fn suffix(cross_product: bool) -> Self {
        Self::new(AffixKind::Suffix, cross_product)
    }

    pub fn with_entry(mut self, entry: AffixEntry) -> Self {
        self.entries.push(entry);
        self
    }

    pub fn kind(&self) -> AffixKind {
        self.kind
    }

    /// Whether this rule may combine with an opposite-kind rule in one pass.
    pub fn cross_product(&self) -> bool {
        self.cross_product
    }

    pub fn entries(&self) -> &[AffixEntry] {
        &self.entries
    }
}

/// Flags with a fixed meaning rather than an affix rule behind them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReservedFlags {
    /// Stems carrying this flag are not words on their own.
    pub need_affix: Option<Flag>,
}

#[derive(Debug, Clone, Default)]
pub struct Dictionary {
    flag_type: FlagType,
    rules: HashMap<Flag, AffixRule>,
    reserved: ReservedFlags,
}

impl Dictionary {
    pub fn new(flag_type: FlagType) -> Self {
        Self {
            flag_type,
            ..Default::default()
        }
    }

    /// Register `rule` under `flag`, which must decode to exactly one token.
    /// A later rule for the same flag replaces the earlier one.
    pub fn with_rule(mut self, flag: &str, rule: AffixRule) -> Result<Self, RuleTableError> {
        let flag = self.single_flag(flag)?;
        if self.rules.insert(flag.clone(), rule).is_some() {
            log::debug!("affix rule {} defined twice, keeping the last one", flag);
        }
        Ok(self)
    }

    pub fn with_need_affix(mut self, flag: &str) -> Result<Self, RuleTableError> {
        self.reserved.need_affix = Some(self.single_flag(flag)?);
        Ok(self)
    }

    pub fn flag_type(&self) -> FlagType {
        self.flag_type
    }

    pub fn reserved(&self) -> &ReservedFlags {
        &self.reserved
    }

    pub fn rule(&self, flag: &str) -> Option<&AffixRule> {
        self.rules.get(flag)
    }

    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// A table without any rule cannot expand anything; callers should
    /// refuse to check against it.
    pub fn ensure_usable(&self) -> Result<(), RuleTableError> {
        if self.rules.is_empty() {
            return Err(RuleTableError::Empty);
        }
        Ok(())
    }

    fn single_flag(&self, raw: &str) -> Result<Flag, RuleTableError> {
        let mut tokens = parse_flags(raw, self.flag_type);
        match (tokens.pop(), tokens.is_empty()) {
            (Some(flag), true) => Ok(flag),
            _ => Err(RuleTableError::InvalidFlag {
                flag: raw.to_string(),
                flag_type: self.flag_type,
            }),
        }
    }
}
