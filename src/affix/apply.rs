use crate::rules::{AffixEntry, AffixKind};

/// Strip `strip` from the `kind` edge of `stem` and attach `affix` there.
///
/// Returns `None` when the stem does not carry `strip` at that edge, which
/// means the entry targets a different class of stem.
pub fn apply(stem: &str, strip: Option<&str>, affix: &str, kind: AffixKind) -> Option<String> {
    let strip = strip.unwrap_or("");
    match kind {
        AffixKind::Prefix => stem
            .strip_prefix(strip)
            .map(|rest| format!("{}{}", affix, rest)),
        AffixKind::Suffix => stem
            .strip_suffix(strip)
            .map(|rest| format!("{}{}", rest, affix)),
    }
}

/// Apply `entry` to `stem` if its condition holds.
pub(crate) fn apply_entry(stem: &str, entry: &AffixEntry, kind: AffixKind) -> Option<String> {
    if !entry.condition().matches(stem, kind) {
        return None;
    }
    let form = apply(stem, entry.strip(), entry.affix(), kind)?;
    log::trace!("{} {:?} -> {:?}", kind, stem, form);
    Some(form)
}
