//! Affix rule engine for dictionary-driven spellcheckers.
//!
//! A loader builds a [`Dictionary`] (flag type, affix rules keyed by flag,
//! reserved flags) and an [`AffixProcessor`] bound to it expands a stem's
//! flag string into every surface form the rules allow.

pub mod affix;
pub mod cli;
pub mod config;
pub mod rules;

pub use affix::{AffixProcessor, ProcessorStats};
pub use config::Config;
pub use rules::{AffixEntry, AffixKind, AffixRule, Condition, Dictionary, FlagType, RuleTableError};
