pub mod apply;

use crate::rules::{parse_flags, AffixKind, AffixRule, Dictionary, Flag};
use apply::apply_entry;
use dashmap::DashMap;
use indexmap::IndexSet;
use serde::Serialize;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Counters exposed for instrumentation and tests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ProcessorStats {
    /// Flag tokens looked up in the rule table.
    pub rule_lookups: usize,
    /// Expansions answered from the cache.
    pub cache_hits: usize,
    /// Expansions actually computed.
    pub expansions: usize,
}

/// Expands stems into surface forms using one [`Dictionary`].
///
/// Results are memoized per `(stem, flags)` pair for the lifetime of the
/// processor and never evicted; build a new processor when the dictionary
/// changes. The cache is internally synchronized, so a processor can be
/// shared between threads.
pub struct AffixProcessor {
    dictionary: Arc<Dictionary>,
    flag_limit: Option<usize>,
    cache: DashMap<(String, String), Vec<String>>,
    rule_lookups: AtomicUsize,
    cache_hits: AtomicUsize,
    expansions: AtomicUsize,
}

impl AffixProcessor {
    pub fn new(dictionary: impl Into<Arc<Dictionary>>) -> Self {
        Self {
            dictionary: dictionary.into(),
            flag_limit: None,
            cache: DashMap::new(),
            rule_lookups: AtomicUsize::new(0),
            cache_hits: AtomicUsize::new(0),
            expansions: AtomicUsize::new(0),
        }
    }

    /// Only consider the first `limit` flag tokens of a stem. The
    /// prefix/suffix cross product is quadratic in the number of rules, so
    /// untrusted dictionaries should be capped.
    pub fn with_flag_limit(mut self, limit: usize) -> Self {
        self.flag_limit = Some(limit);
        self
    }

    pub fn dictionary(&self) -> &Dictionary {
        &self.dictionary
    }

    /// Every surface form derivable from `stem`, the stem itself first.
    pub fn expand_word(&self, stem: &str, flags: &str) -> Vec<String> {
        let key = (stem.to_string(), flags.to_string());
        if let Some(forms) = self.cache.get(&key) {
            self.cache_hits.fetch_add(1, Ordering::Relaxed);
            return forms.value().clone();
        }

        let forms = self.expand_uncached(stem, flags);
        self.expansions.fetch_add(1, Ordering::Relaxed);
        log::debug!("expanded {:?}/{} into {} forms", stem, flags, forms.len());

        self.cache.entry(key).or_insert(forms).value().clone()
    }

    /// Whether `stem` may stand alone as a word.
    ///
    /// Stems carrying the need-affix flag are only valid when at least one
    /// of their affix rules actually produces a form.
    pub fn is_valid_with_affixes(&self, stem: &str, flags: &str) -> bool {
        let Some(need_affix) = &self.dictionary.reserved().need_affix else {
            return true;
        };

        if !parse_flags(flags, self.dictionary.flag_type()).contains(need_affix) {
            return true;
        }

        self.expand_word(stem, flags).len() > 1
    }

    /// Whether `word` is one of the forms the dictionary entry
    /// `stem`/`flags` stands for. The bare stem only counts when
    /// [`Self::is_valid_with_affixes`] accepts it.
    pub fn generates(&self, word: &str, stem: &str, flags: &str) -> bool {
        if word == stem {
            return self.is_valid_with_affixes(stem, flags);
        }
        self.expand_word(stem, flags).iter().any(|form| form == word)
    }

    pub fn stats(&self) -> ProcessorStats {
        ProcessorStats {
            rule_lookups: self.rule_lookups.load(Ordering::Relaxed),
            cache_hits: self.cache_hits.load(Ordering::Relaxed),
            expansions: self.expansions.load(Ordering::Relaxed),
        }
    }

    pub fn cached_entries(&self) -> usize {
        self.cache.len()
    }

    /// Decoded flags in order of first appearance, capped by the flag limit.
    fn flag_tokens(&self, flags: &str) -> Vec<Flag> {
        let mut tokens: IndexSet<Flag> = parse_flags(flags, self.dictionary.flag_type())
            .into_iter()
            .collect();

        if let Some(limit) = self.flag_limit {
            if tokens.len() > limit {
                log::debug!(
                    "flag string {:?} has {} flags, only the first {} are used",
                    flags,
                    tokens.len(),
                    limit
                );
                tokens.truncate(limit);
            }
        }

        tokens.into_iter().collect()
    }

    fn expand_uncached(&self, stem: &str, flags: &str) -> Vec<String> {
        let mut prefixes: Vec<&AffixRule> = Vec::new();
        let mut suffixes: Vec<&AffixRule> = Vec::new();

        for flag in self.flag_tokens(flags) {
            self.rule_lookups.fetch_add(1, Ordering::Relaxed);
            match self.dictionary.rule(flag.as_str()) {
                Some(rule) if rule.kind() == AffixKind::Prefix => prefixes.push(rule),
                Some(rule) => suffixes.push(rule),
                None => log::trace!("no affix rule for flag {} on {:?}", flag, stem),
            }
        }

        let mut forms = IndexSet::new();
        forms.insert(stem.to_string());

        for (rules, kind) in [(&prefixes, AffixKind::Prefix), (&suffixes, AffixKind::Suffix)] {
            for entry in rules.iter().flat_map(|rule| rule.entries()) {
                if let Some(form) = apply_entry(stem, entry, kind) {
                    if form != stem {
                        forms.insert(form);
                    }
                }
            }
        }

        // One prefix and one suffix at most; combined forms are not expanded again.
        for prefix in prefixes.iter().filter(|rule| rule.cross_product()) {
            for suffix in suffixes.iter().filter(|rule| rule.cross_product()) {
                for prefix_entry in prefix.entries() {
                    let Some(prefixed) = apply_entry(stem, prefix_entry, AffixKind::Prefix) else {
                        continue;
                    };
                    for suffix_entry in suffix.entries() {
                        if let Some(form) = apply_entry(&prefixed, suffix_entry, AffixKind::Suffix) {
                            if form != stem && form != prefixed {
                                forms.insert(form);
                            }
                        }
                    }
                }
            }
        }

        forms.into_iter().collect()
    }
}
