use super::{Flag, FlagType};

/// Split a raw flag string into flag tokens according to `flag_type`.
///
/// Malformed pieces are dropped rather than reported: an odd trailing
/// character in long mode, a non-numeric or out-of-range token in numeric
/// mode, and characters beyond U+00FF in char mode.
pub fn parse_flags(raw: &str, flag_type: FlagType) -> Vec<Flag> {
    match flag_type {
        FlagType::Char => raw
            .chars()
            .filter(|&c| {
                let narrow = u32::from(c) <= 0xFF;
                if !narrow {
                    log::debug!("skipping non 8-bit flag character {:?}", c);
                }
                narrow
            })
            .map(|c| Flag::new(c.to_string()))
            .collect(),
        FlagType::Long => {
            let chars: Vec<char> = raw.chars().collect();
            let pairs = chars.chunks_exact(2);
            if !pairs.remainder().is_empty() {
                log::debug!("dropping trailing half of long flag string {:?}", raw);
            }
            pairs.map(|pair| Flag::new(pair.iter().collect())).collect()
        }
        FlagType::Num => raw
            .split(',')
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .filter_map(|token| match token.parse::<u16>() {
                Ok(n) if n > 0 && token.bytes().all(|b| b.is_ascii_digit()) => {
                    Some(Flag::new(n.to_string()))
                }
                _ => {
                    log::debug!("skipping malformed numeric flag {:?}", token);
                    None
                }
            })
            .collect(),
        FlagType::Utf8 => raw.chars().map(|c| Flag::new(c.to_string())).collect(),
    }
}
