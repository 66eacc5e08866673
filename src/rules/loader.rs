//! Deserialize an already-structured rule table (TOML or JSON) into a
//! [`Dictionary`].

use super::{AffixEntry, AffixKind, AffixRule, Dictionary, FlagType, RuleTableError};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Marker used by affix tables for "nothing" in the strip and affix columns.
const ZERO: &str = "0";

#[derive(Debug, Deserialize)]
struct RawTable {
    #[serde(default)]
    flag_type: FlagType,
    #[serde(default)]
    reserved: RawReserved,
    #[serde(default)]
    rules: BTreeMap<String, RawRule>,
}

#[derive(Debug, Default, Deserialize)]
struct RawReserved {
    need_affix: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawRule {
    kind: AffixKind,
    #[serde(default)]
    cross_product: bool,
    #[serde(default)]
    entries: Vec<RawEntry>,
}

#[derive(Debug, Deserialize)]
struct RawEntry {
    strip: Option<String>,
    #[serde(default)]
    affix: String,
    condition: Option<String>,
}

impl RawEntry {
    fn into_entry(self) -> AffixEntry {
        let strip = self.strip.as_deref().filter(|s| *s != ZERO);
        let affix = if self.affix == ZERO { "" } else { &self.affix };
        AffixEntry::new(strip, affix, self.condition.as_deref().unwrap_or("."))
    }
}

/// Load a rule table, choosing JSON for `.json` files and TOML otherwise.
pub fn load_from_path(path: &Path) -> Result<Dictionary, RuleTableError> {
    let content = fs::read_to_string(path).map_err(|source| RuleTableError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let is_json = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"));

    let dictionary = if is_json {
        from_json_str(&content)?
    } else {
        from_toml_str(&content)?
    };

    log::debug!(
        "loaded {} affix rules from {}",
        dictionary.rule_count(),
        path.display()
    );
    Ok(dictionary)
}

pub fn from_toml_str(content: &str) -> Result<Dictionary, RuleTableError> {
    build(toml::from_str(content)?)
}

pub fn from_json_str(content: &str) -> Result<Dictionary, RuleTableError> {
    build(serde_json::from_str(content)?)
}

fn build(raw: RawTable) -> Result<Dictionary, RuleTableError> {
    let mut dictionary = Dictionary::new(raw.flag_type);

    for (flag, raw_rule) in raw.rules {
        let rule = raw_rule
            .entries
            .into_iter()
            .map(RawEntry::into_entry)
            .fold(
                AffixRule::new(raw_rule.kind, raw_rule.cross_product),
                AffixRule::with_entry,
            );
        dictionary = dictionary.with_rule(&flag, rule)?;
    }

    if let Some(flag) = raw.reserved.need_affix {
        dictionary = dictionary.with_need_affix(&flag)?;
    }

    Ok(dictionary)
}
