//! Password generators and the entry point that dispatches between them.
//!
//! Every call to [`generate`] keys a fresh [`RandomEngine`]; no random
//! state is shared between calls.

pub mod charset_based;
mod custom;
pub mod pattern;

pub use custom::{CustomGenerator, CustomGeneratorPool, GeneratorRegistry};

use thiserror::Error;

use crate::profile::{GenerationProfile, GeneratorType, ProfileError};
use crate::random::{EngineError, RandomEngine};
use crate::sanitize::SanitizeError;
use crate::secret::ProtectedSecret;

/// Errors that can occur during generation.
#[derive(Debug, Error)]
pub enum PasswordError {
    #[error("not enough characters available to generate the password")]
    TooFewCharacters,
    #[error("custom generator not found")]
    UnknownAlgorithm,
    #[error("invalid character set: {0}")]
    InvalidCharSet(String),
    #[error("invalid pattern: {0}")]
    InvalidPattern(String),
    #[error("custom generator failed")]
    CustomGeneratorFailed,
    #[error("cannot allocate a password of {chars} characters")]
    AllocationFailed { chars: usize },
    #[error("failed to key random engine: {0}")]
    Entropy(#[from] EngineError),
}

impl From<SanitizeError> for PasswordError {
    fn from(err: SanitizeError) -> Self {
        PasswordError::InvalidCharSet(err.to_string())
    }
}

impl From<ProfileError> for PasswordError {
    fn from(err: ProfileError) -> Self {
        match err {
            ProfileError::InvalidPattern(msg) => PasswordError::InvalidPattern(msg),
            other => PasswordError::InvalidCharSet(other.to_string()),
        }
    }
}

/// Generates one password for `profile`.
///
/// `user_entropy` is mixed into the engine key when non-empty.
/// `registry` is only consulted in custom mode. On failure no partial
/// password is returned.
pub fn generate(
    profile: &GenerationProfile,
    user_entropy: &[u8],
    registry: Option<&dyn GeneratorRegistry>,
) -> Result<ProtectedSecret, PasswordError> {
    let mut rng = RandomEngine::create(user_entropy)?;

    let result = match profile.generator_type {
        GeneratorType::CharSet => charset_based::generate(profile, &mut rng),
        GeneratorType::Pattern => pattern::generate(profile, &mut rng),
        GeneratorType::Custom => custom::generate(profile, &mut rng, registry),
    };

    match &result {
        Ok(secret) => tracing::debug!(
            generator_type = ?profile.generator_type,
            chars = secret.char_count(),
            random_bytes = rng.bytes_consumed(),
            "Password generated"
        ),
        Err(e) => tracing::warn!(
            generator_type = ?profile.generator_type,
            error = %e,
            "Password generation failed"
        ),
    }

    result
}

/// Like [`generate`], but runs [`GenerationProfile::validate`] first.
pub fn generate_checked(
    profile: &GenerationProfile,
    user_entropy: &[u8],
    registry: Option<&dyn GeneratorRegistry>,
) -> Result<ProtectedSecret, PasswordError> {
    profile.validate()?;
    generate(profile, user_entropy, registry)
}
