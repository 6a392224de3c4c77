//! Compact persisted form of a character set.
//!
//! A set is stored as ten range flags plus the leftover characters
//! that are not covered by a complete range:
//!
//! ```text
//! flags:     U L D S P m u s B H      ('_' when the range is absent)
//! leftover:  any remaining literal characters
//! ```

use serde::{Deserialize, Serialize};

use super::classes;
use super::set::CharSet;
use super::CharSetError;

/// Placeholder flag for an absent range.
pub const ABSENT_FLAG: char = '_';

/// The named ranges of the packed format, in flag order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharRange {
    /// `A`-`Z`.
    UpperCase,
    /// `a`-`z`.
    LowerCase,
    /// `0`-`9`.
    Digits,
    /// ASCII punctuation without the separately ranged characters.
    Special,
    /// `,.;:`.
    Punctuation,
    /// `-`.
    Minus,
    /// `_`.
    Underline,
    /// ` `.
    Space,
    /// `[]{}()<>`.
    Brackets,
    /// Latin-1 supplement without NBSP and soft hyphen.
    HighAnsi,
}

impl CharRange {
    /// Every range in flag order.
    pub const ALL: [CharRange; 10] = [
        CharRange::UpperCase,
        CharRange::LowerCase,
        CharRange::Digits,
        CharRange::Special,
        CharRange::Punctuation,
        CharRange::Minus,
        CharRange::Underline,
        CharRange::Space,
        CharRange::Brackets,
        CharRange::HighAnsi,
    ];

    /// Flag character written when the range is present.
    pub fn tag(self) -> char {
        match self {
            CharRange::UpperCase => 'U',
            CharRange::LowerCase => 'L',
            CharRange::Digits => 'D',
            CharRange::Special => 'S',
            CharRange::Punctuation => 'P',
            CharRange::Minus => 'm',
            CharRange::Underline => 'u',
            CharRange::Space => 's',
            CharRange::Brackets => 'B',
            CharRange::HighAnsi => 'H',
        }
    }

    /// Characters making up the range.
    pub fn chars(self) -> String {
        match self {
            CharRange::UpperCase => classes::UPPER_CASE.to_owned(),
            CharRange::LowerCase => classes::LOWER_CASE.to_owned(),
            CharRange::Digits => classes::DIGITS.to_owned(),
            CharRange::Special => classes::SPECIAL.to_owned(),
            CharRange::Punctuation => classes::PUNCTUATION.to_owned(),
            CharRange::Minus => "-".to_owned(),
            CharRange::Underline => "_".to_owned(),
            CharRange::Space => " ".to_owned(),
            CharRange::Brackets => classes::BRACKETS.to_owned(),
            CharRange::HighAnsi => classes::high_ansi(),
        }
    }

    /// Returns the range containing `ch`, if any.
    pub fn containing(ch: char) -> Option<CharRange> {
        Self::ALL.into_iter().find(|range| range.chars().contains(ch))
    }
}

/// A character set in its persisted form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackedCharSet {
    /// Ten range flags.
    pub ranges: String,
    /// Characters not covered by a complete range.
    pub additional: String,
}

impl PackedCharSet {
    /// Packs a copy of `set`; `set` itself is left unchanged.
    pub fn pack(set: &CharSet) -> Self {
        let mut work = set.clone();
        let ranges = work.pack_and_remove_ranges();
        Self {
            ranges,
            additional: work.to_string(),
        }
    }

    /// Rebuilds the character set.
    pub fn unpack(&self) -> Result<CharSet, CharSetError> {
        let mut set = CharSet::from_chars(&self.additional);
        set.unpack_ranges(&self.ranges)?;
        Ok(set)
    }
}

impl CharSet {
    /// Removes every complete named range and returns the flag string.
    ///
    /// The characters left in the set afterwards are the leftover
    /// part of the packed form.
    pub fn pack_and_remove_ranges(&mut self) -> String {
        CharRange::ALL
            .into_iter()
            .map(|range| {
                if self.remove_if_all_exist(&range.chars()) {
                    range.tag()
                } else {
                    ABSENT_FLAG
                }
            })
            .collect()
    }

    /// Re-adds the ranges flagged in `flags`.
    ///
    /// Call this on a set that already holds the leftover characters.
    pub fn unpack_ranges(&mut self, flags: &str) -> Result<(), CharSetError> {
        let len = flags.chars().count();
        if len < CharRange::ALL.len() {
            return Err(CharSetError::InvalidRangeFlags { len });
        }

        for (range, flag) in CharRange::ALL.into_iter().zip(flags.chars()) {
            if flag != ABSENT_FLAG {
                self.add_str(&range.chars());
            }
        }
        Ok(())
    }
}
