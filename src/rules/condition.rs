use super::AffixKind;
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// Gate deciding whether an affix entry may apply to a stem.
///
/// Only `.` (or an empty pattern) and a single bracket class `[abc]` /
/// `[^abc]` are understood. Multi-character conditions such as `[^aeiou]y`
/// are kept as [`Condition::Unsupported`] and never match, so an entry
/// written for a richer condition grammar produces no forms instead of
/// wrong ones.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Condition {
    #[default]
    Any,
    Class { chars: Vec<char>, negated: bool },
    Unsupported(String),
}

impl Condition {
    pub fn parse(pattern: &str) -> Self {
        let pattern = pattern.trim();
        if pattern.is_empty() || pattern == "." {
            return Condition::Any;
        }

        if let Some(inner) = pattern
            .strip_prefix('[')
            .and_then(|rest| rest.strip_suffix(']'))
        {
            let (negated, set) = match inner.strip_prefix('^') {
                Some(set) => (true, set),
                None => (false, inner),
            };
            if !set.is_empty() && !set.contains(|c| c == '[' || c == ']') {
                return Condition::Class {
                    chars: set.chars().collect(),
                    negated,
                };
            }
        }

        log::debug!(
            "unsupported affix condition {:?}: entries using it will never apply",
            pattern
        );
        Condition::Unsupported(pattern.to_string())
    }

    /// Test the edge of `stem` that an affix of `kind` touches.
    ///
    /// An empty stem only takes prefixes, and only under `.`.
    pub fn matches(&self, stem: &str, kind: AffixKind) -> bool {
        match self {
            Condition::Any => kind == AffixKind::Prefix || !stem.is_empty(),
            Condition::Class { chars, negated } => {
                let edge = match kind {
                    AffixKind::Prefix => stem.chars().next(),
                    AffixKind::Suffix => stem.chars().next_back(),
                };
                match edge {
                    Some(c) => chars.contains(&c) != *negated,
                    None => false,
                }
            }
            Condition::Unsupported(_) => false,
        }
    }

    pub fn is_supported(&self) -> bool {
        !matches!(self, Condition::Unsupported(_))
    }
}

impl FromStr for Condition {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Condition::parse(s))
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Condition::Any => write!(f, "."),
            Condition::Class { chars, negated } => {
                let set: String = chars.iter().collect();
                if *negated {
                    write!(f, "[^{}]", set)
                } else {
                    write!(f, "[{}]", set)
                }
            }
            Condition::Unsupported(pattern) => f.write_str(pattern),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::sync::Once;

    thread_local! {
        static RECORDS: RefCell<Vec<(log::Level, String)>> = const { RefCell::new(Vec::new()) };
    }

    struct Capture;

    impl log::Log for Capture {
        fn enabled(&self, _: &log::Metadata) -> bool {
            true
        }

        fn log(&self, record: &log::Record) {
            RECORDS.with(|r| r.borrow_mut().push((record.level(), record.args().to_string())));
        }

        fn flush(&self) {}
    }

    static CAPTURE: Capture = Capture;
    static INIT: Once = Once::new();

    /// Log records emitted on this thread while running `f`.
    fn captured(f: impl FnOnce()) -> Vec<(log::Level, String)> {
        INIT.call_once(|| {
            let _ = log::set_logger(&CAPTURE);
            log::set_max_level(log::LevelFilter::Trace);
        });
        RECORDS.with(|r| r.borrow_mut().clear());
        f();
        RECORDS.with(|r| r.borrow_mut().drain(..).collect())
    }

    #[test]
    fn test_dot_and_empty_match_any_edge() {
        for pattern in [".", "", "  "] {
            let condition = Condition::parse(pattern);
            assert_eq!(condition, Condition::Any);
            assert!(condition.matches("walk", AffixKind::Suffix));
            assert!(condition.matches("", AffixKind::Prefix));
            assert!(!condition.matches("", AffixKind::Suffix));
        }
    }

    #[test]
    fn test_suffix_class_checks_last_char() {
        let condition = Condition::parse("[^y]");
        assert!(!condition.matches("happy", AffixKind::Suffix));
        assert!(condition.matches("walk", AffixKind::Suffix));
        // the first character is irrelevant for suffixes
        assert!(condition.matches("yak", AffixKind::Suffix));

        let condition = Condition::parse("[sxz]");
        assert!(condition.matches("box", AffixKind::Suffix));
        assert!(!condition.matches("cat", AffixKind::Suffix));
    }

    #[test]
    fn test_prefix_class_checks_first_char() {
        let condition = Condition::parse("[aeiou]");
        assert!(condition.matches("able", AffixKind::Prefix));
        assert!(!condition.matches("table", AffixKind::Prefix));
    }

    #[test]
    fn test_class_never_matches_empty_stem() {
        assert!(!Condition::parse("[a]").matches("", AffixKind::Suffix));
        assert!(!Condition::parse("[^a]").matches("", AffixKind::Prefix));
    }

    #[test]
    fn test_multi_character_conditions_are_unsupported() {
        for pattern in ["[^aeiou]y", "y", "[]", "[^]", "[ab"] {
            let condition = Condition::parse(pattern);
            assert!(!condition.is_supported(), "{pattern}");
            assert!(!condition.matches("day", AffixKind::Suffix));
        }
    }

    #[test]
    fn test_unsupported_condition_logs_at_debug() {
        let records = captured(|| {
            Condition::parse("[^aeiou]y");
        });

        let unsupported: Vec<_> = records
            .iter()
            .filter(|(_, message)| message.contains("[^aeiou]y"))
            .collect();
        assert_eq!(unsupported.len(), 1);
        assert_eq!(unsupported[0].0, log::Level::Debug);
    }

    #[test]
    fn test_display_round_trips_text() {
        assert_eq!(Condition::parse("[^y]").to_string(), "[^y]");
        assert_eq!(Condition::parse("").to_string(), ".");
    }
}
