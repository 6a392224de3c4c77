//! Character-set validation and exclusion rules.
//!
//! Every set is passed through [`prepare`] right before sampling. The
//! result must be checked: an `Err` means the set still holds a code
//! unit that may not appear in a password, and sampling from it could
//! emit that unit.

use thiserror::Error;

use crate::charset::{classes, CharSet};
use crate::profile::GenerationProfile;

/// Errors reported by [`prepare`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SanitizeError {
    #[error("character set contains disallowed code unit U+{unit:04X}")]
    DisallowedCharacter { unit: u16 },
}

/// Returns true for code units that must never be generated: NUL, tab,
/// CR, LF and UTF-16 surrogates.
pub fn is_disallowed(unit: u16) -> bool {
    unit == 0
        || classes::INVALID.encode_utf16().any(|u| u == unit)
        || (0xD800..=0xDFFF).contains(&unit)
}

/// Validates `set` and applies the profile's exclusions.
///
/// Exclusions are applied even when validation fails; the error reports
/// the first disallowed unit found.
pub fn prepare(set: &mut CharSet, profile: &GenerationProfile) -> Result<(), SanitizeError> {
    let disallowed = set.units().find(|&unit| is_disallowed(unit));

    if profile.exclude_look_alike {
        set.remove_str(classes::LOOK_ALIKE);
    }

    if !profile.exclude_characters.is_empty() {
        set.remove_str(&profile.exclude_characters);
    }

    match disallowed {
        Some(unit) => Err(SanitizeError::DisallowedCharacter { unit }),
        None => Ok(()),
    }
}
