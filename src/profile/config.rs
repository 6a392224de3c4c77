//! Loading profiles from TOML files.
//!
//! ```toml
//! name = "pin"
//! generator_type = "pattern"
//! pattern = "d{6}"
//! ```
//!
//! Missing keys take their [`GenerationProfile::default`] values.

use std::path::Path;

use super::GenerationProfile;
use crate::charset::CharSetError;

/// Profile loading and validation errors.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ProfileError {
    #[error("failed to read profile file: {0}")]
    FileReadError(String),
    #[error("failed to parse profile file: {0}")]
    ParseError(String),
    #[error("invalid character set: {0}")]
    InvalidCharSet(String),
    #[error("invalid pattern: {0}")]
    InvalidPattern(String),
    #[error("invalid packed character set: {0}")]
    InvalidRangeFlags(#[from] CharSetError),
}

impl GenerationProfile {
    /// Loads a profile from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ProfileError> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ProfileError::FileReadError(e.to_string()))?;
        Self::from_toml_str(&content)
    }

    /// Parses a profile from TOML text.
    ///
    /// The packed character set is checked here; the remaining rules
    /// are left to [`GenerationProfile::validate`].
    pub fn from_toml_str(content: &str) -> Result<Self, ProfileError> {
        let profile: GenerationProfile =
            toml::from_str(content).map_err(|e| ProfileError::ParseError(e.to_string()))?;
        profile.char_set()?;

        tracing::debug!(
            name = %profile.name,
            generator_type = ?profile.generator_type,
            "Loaded generation profile"
        );
        Ok(profile)
    }
}
