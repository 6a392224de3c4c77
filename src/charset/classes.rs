//! Fixed character classes.
//!
//! These are the building blocks for both generator modes: the
//! single-letter class identifiers of the pattern language and the
//! named ranges of the packed character-set format.

/// `A`-`Z`.
pub const UPPER_CASE: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";
/// `a`-`z`.
pub const LOWER_CASE: &str = "abcdefghijklmnopqrstuvwxyz";
/// `0`-`9`.
pub const DIGITS: &str = "0123456789";

/// Upper-case consonants.
pub const UPPER_CONSONANTS: &str = "BCDFGHJKLMNPQRSTVWXYZ";
/// Lower-case consonants.
pub const LOWER_CONSONANTS: &str = "bcdfghjklmnpqrstvwxyz";
/// Upper-case vowels.
pub const UPPER_VOWELS: &str = "AEIOU";
/// Lower-case vowels.
pub const LOWER_VOWELS: &str = "aeiou";

/// Basic punctuation.
pub const PUNCTUATION: &str = ",.;:";
/// Brackets of all four kinds.
pub const BRACKETS: &str = "[]{}()<>";

/// Every printable ASCII character that is neither a letter, a digit
/// nor a space.
pub const PRINTABLE_ASCII_SPECIAL: &str = "!\"#$%&'()*+,-./:;<=>?@[\\]^_`{|}~";

/// `0`-`9`, `A`-`F`.
pub const UPPER_HEX: &str = "0123456789ABCDEF";
/// `0`-`9`, `a`-`f`.
pub const LOWER_HEX: &str = "0123456789abcdef";

/// ASCII punctuation without hyphen, underscore, space and brackets,
/// which have their own packed ranges.
pub const SPECIAL: &str = "!\"#$%&'*+,./:;=?@\\^`|~";

/// Characters that are easily confused with each other.
pub const LOOK_ALIKE: &str = "O0l1I|";

/// Control characters that must never appear in generated output.
pub const INVALID: &str = "\t\r\n";

/// Latin-1 supplement ranges, skipping U+00A0 (non-breaking space)
/// and U+00AD (soft hyphen).
pub const HIGH_ANSI_RANGES: [(char, char); 2] = [('\u{A1}', '\u{AC}'), ('\u{AE}', '\u{FF}')];

/// Returns the Latin-1 supplement block as a string.
pub fn high_ansi() -> String {
    HIGH_ANSI_RANGES
        .iter()
        .flat_map(|&(lo, hi)| lo..=hi)
        .collect()
}

/// Component strings of a class letter, or `None` if `letter` is not a
/// class identifier. `x` (high ANSI) is range based and handled by the
/// caller via [`is_high_ansi_class`].
pub(crate) fn class_components(letter: char) -> Option<&'static [&'static str]> {
    let parts: &'static [&'static str] = match letter {
        'a' => &[LOWER_CASE, DIGITS],
        'A' => &[LOWER_CASE, UPPER_CASE, DIGITS],
        'U' => &[UPPER_CASE, DIGITS],
        'c' => &[LOWER_CONSONANTS],
        'C' => &[LOWER_CONSONANTS, UPPER_CONSONANTS],
        'z' => &[UPPER_CONSONANTS],
        'd' => &[DIGITS],
        'h' => &[LOWER_HEX],
        'H' => &[UPPER_HEX],
        'l' => &[LOWER_CASE],
        'L' => &[LOWER_CASE, UPPER_CASE],
        'u' => &[UPPER_CASE],
        'p' => &[PUNCTUATION],
        'b' => &[BRACKETS],
        's' => &[PRINTABLE_ASCII_SPECIAL],
        'S' => &[UPPER_CASE, LOWER_CASE, DIGITS, PRINTABLE_ASCII_SPECIAL],
        'v' => &[LOWER_VOWELS],
        'V' => &[LOWER_VOWELS, UPPER_VOWELS],
        'Z' => &[UPPER_VOWELS],
        'x' => &[],
        _ => return None,
    };
    Some(parts)
}

#[inline]
pub(crate) fn is_high_ansi_class(letter: char) -> bool {
    letter == 'x'
}

/// Returns true if `letter` names a character class.
pub fn is_class_letter(letter: char) -> bool {
    class_components(letter).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_special_excludes_ranged_chars() {
        for ch in "-_ []{}()<>".chars() {
            assert!(!SPECIAL.contains(ch), "{ch:?} must not be special");
        }
        assert!(SPECIAL.contains('|'));
        assert!(SPECIAL.contains('~'));
    }

    #[test]
    fn test_high_ansi_skips_nbsp_and_soft_hyphen() {
        let high = high_ansi();
        assert!(!high.contains('\u{A0}'));
        assert!(!high.contains('\u{AD}'));
        assert!(high.starts_with('\u{A1}'));
        assert!(high.ends_with('\u{FF}'));
        assert_eq!(high.chars().count(), 12 + 82);
    }

    #[test]
    fn test_class_letters() {
        for letter in "aAUcCzdhHlLupbsSvVZx".chars() {
            assert!(is_class_letter(letter), "{letter} should be a class");
        }
        for letter in "eEfgqrtwy0[]\\^".chars() {
            assert!(!is_class_letter(letter), "{letter} should be literal");
        }
    }
}
