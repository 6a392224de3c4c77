//! Generation profiles.
//!
//! A [`GenerationProfile`] is the read-only configuration handed to the
//! generators. Its base character set is stored in the compact packed
//! form (range flags plus leftover characters), which is also how it
//! appears in TOML profile files.

mod config;

pub use config::ProfileError;

use serde::{Deserialize, Serialize};

use crate::charset::{CharRange, CharSet, CharSetError, PackedCharSet};
use crate::sanitize;

/// Which generator a profile drives.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GeneratorType {
    /// Fixed-length draw from one character set.
    #[default]
    CharSet,
    /// Template-driven generation.
    Pattern,
    /// Delegated to a generator looked up by identifier.
    Custom,
}

/// Password generation settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationProfile {
    /// Display name.
    pub name: String,
    /// Generator mode.
    pub generator_type: GeneratorType,
    /// Ask the caller to collect extra entropy before generating.
    pub collect_user_entropy: bool,
    /// Password length in character-set mode.
    pub length: u32,
    /// Packed range flags of the base character set.
    pub char_set_ranges: String,
    /// Leftover characters of the base character set.
    pub char_set_additional: String,
    /// Template for pattern mode.
    pub pattern: String,
    /// Shuffle the pattern output.
    pub permute_result: bool,
    /// Drop `O0Il1|` from every set.
    pub exclude_look_alike: bool,
    /// Never emit the same character twice.
    pub no_repeating_characters: bool,
    /// Characters removed from every set.
    pub exclude_characters: String,
    /// Identifier of the custom generator.
    pub custom_algorithm_id: String,
    /// Options handed to the custom generator unmodified.
    pub custom_algorithm_options: String,
}

impl Default for GenerationProfile {
    fn default() -> Self {
        let mut set = CharSet::new();
        set.add_class('A');
        let packed = PackedCharSet::pack(&set);

        Self {
            name: String::new(),
            generator_type: GeneratorType::CharSet,
            collect_user_entropy: false,
            length: 20,
            char_set_ranges: packed.ranges,
            char_set_additional: packed.additional,
            pattern: String::new(),
            permute_result: false,
            exclude_look_alike: false,
            no_repeating_characters: false,
            exclude_characters: String::new(),
            custom_algorithm_id: String::new(),
            custom_algorithm_options: String::new(),
        }
    }
}

impl GenerationProfile {
    /// Creates a pattern-mode profile.
    pub fn with_pattern(pattern: impl Into<String>) -> Self {
        Self {
            generator_type: GeneratorType::Pattern,
            pattern: pattern.into(),
            ..Default::default()
        }
    }

    /// Creates a character-set-mode profile.
    pub fn with_char_set(set: &CharSet, length: u32) -> Self {
        let mut profile = Self {
            length,
            ..Default::default()
        };
        profile.set_char_set(set);
        profile
    }

    /// Unpacks the base character set into a fresh [`CharSet`].
    pub fn char_set(&self) -> Result<CharSet, CharSetError> {
        let mut set = CharSet::from_chars(&self.char_set_additional);
        set.unpack_ranges(&self.char_set_ranges)?;
        Ok(set)
    }

    /// Stores `set` as the base character set.
    pub fn set_char_set(&mut self, set: &CharSet) {
        let packed = PackedCharSet::pack(set);
        self.char_set_ranges = packed.ranges;
        self.char_set_additional = packed.additional;
    }

    /// Builds a character-set profile that could have produced
    /// `password`: same length, and every named range the password
    /// touches plus its other characters.
    pub fn derive_from_password(password: &str) -> Self {
        let mut set = CharSet::new();
        let mut length = 0u32;

        for ch in password.chars() {
            length = length.saturating_add(1);
            match CharRange::containing(ch) {
                Some(range) => set.add_str(&range.chars()),
                None => set.add(ch),
            }
        }

        Self::with_char_set(&set, length)
    }

    /// Returns true if an option shrinks the space of possible
    /// passwords.
    pub fn has_security_reducing_option(&self) -> bool {
        self.exclude_look_alike
            || self.no_repeating_characters
            || !self.exclude_characters.is_empty()
    }

    /// Checks the profile before it is handed to a generator.
    ///
    /// Generators do not call this themselves.
    pub fn validate(&self) -> Result<(), ProfileError> {
        match self.generator_type {
            GeneratorType::CharSet => {
                let mut set = self.char_set()?;
                sanitize::prepare(&mut set, self)
                    .map_err(|e| ProfileError::InvalidCharSet(e.to_string()))?;
                if self.length > 0 && set.is_empty() {
                    return Err(ProfileError::InvalidCharSet(
                        "no characters left after exclusions".to_owned(),
                    ));
                }
            }
            GeneratorType::Pattern => {
                if let Some(ch) = self
                    .pattern
                    .chars()
                    .find(|&ch| ch.is_ascii() && sanitize::is_disallowed(ch as u16))
                {
                    return Err(ProfileError::InvalidPattern(format!(
                        "pattern contains control character U+{:04X}",
                        ch as u32
                    )));
                }
            }
            GeneratorType::Custom => {}
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charset::classes;

    #[test]
    fn test_default_profile() {
        let profile = GenerationProfile::default();
        assert_eq!(profile.length, 20);
        assert_eq!(profile.char_set_ranges, "ULD_______");
        assert_eq!(profile.char_set_additional, "");
        assert_eq!(profile.char_set().unwrap().len(), 62);
        assert!(profile.validate().is_ok());
    }

    #[test]
    fn test_set_char_set_round_trip() {
        let set = CharSet::from_chars("abc-_ ");
        let profile = GenerationProfile::with_char_set(&set, 8);
        assert_eq!(profile.char_set_ranges, "_____mus__");
        assert_eq!(profile.char_set_additional, "abc");
        assert_eq!(profile.char_set().unwrap(), set);
    }

    #[test]
    fn test_derive_from_password() {
        let profile = GenerationProfile::derive_from_password("aB3 x");
        assert_eq!(profile.generator_type, GeneratorType::CharSet);
        assert_eq!(profile.length, 5);

        let set = profile.char_set().unwrap();
        assert!(set.contains_str(classes::LOWER_CASE));
        assert!(set.contains_str(classes::UPPER_CASE));
        assert!(set.contains_str(classes::DIGITS));
        assert!(set.contains(' '));
        assert!(!set.contains('-'));
        assert_eq!(set.len(), 26 + 26 + 10 + 1);
    }

    #[test]
    fn test_derive_keeps_unranged_literals() {
        let profile = GenerationProfile::derive_from_password("\u{3042}");
        assert_eq!(profile.length, 1);
        assert_eq!(profile.char_set().unwrap().to_string(), "\u{3042}");
    }

    #[test]
    fn test_security_reducing_options() {
        let mut profile = GenerationProfile::default();
        assert!(!profile.has_security_reducing_option());
        profile.exclude_characters = "x".to_owned();
        assert!(profile.has_security_reducing_option());
    }

    #[test]
    fn test_validate_rejects_exhausted_char_set() {
        let profile = GenerationProfile {
            exclude_characters: "abc".to_owned(),
            ..GenerationProfile::with_char_set(&CharSet::from_chars("abc"), 4)
        };
        assert!(matches!(
            profile.validate(),
            Err(ProfileError::InvalidCharSet(_))
        ));
    }

    #[test]
    fn test_validate_rejects_control_chars_in_char_set() {
        let profile = GenerationProfile::with_char_set(&CharSet::from_chars("ab\t"), 4);
        assert!(matches!(
            profile.validate(),
            Err(ProfileError::InvalidCharSet(_))
        ));
    }

    #[test]
    fn test_validate_rejects_control_chars_in_pattern() {
        let profile = GenerationProfile::with_pattern("dd\ndd");
        assert!(matches!(
            profile.validate(),
            Err(ProfileError::InvalidPattern(_))
        ));
        assert!(GenerationProfile::with_pattern("u{4}d{2}").validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_range_flags() {
        let profile = GenerationProfile {
            char_set_ranges: "UL".to_owned(),
            ..Default::default()
        };
        assert!(matches!(
            profile.validate(),
            Err(ProfileError::InvalidRangeFlags(_))
        ));
    }
}
