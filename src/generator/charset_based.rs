//! Fixed-length generation from a single character set.

use zeroize::Zeroizing;

use super::PasswordError;
use crate::profile::GenerationProfile;
use crate::random::RandomEngine;
use crate::sanitize;
use crate::secret::ProtectedSecret;

/// Draws `profile.length` characters uniformly, with replacement, from
/// the profile's base character set.
///
/// With `no_repeating_characters` each drawn character leaves the set,
/// so a length above the usable set size fails with
/// [`PasswordError::TooFewCharacters`].
pub fn generate(
    profile: &GenerationProfile,
    rng: &mut RandomEngine,
) -> Result<ProtectedSecret, PasswordError> {
    if profile.length == 0 {
        return Ok(ProtectedSecret::empty());
    }

    let mut set = profile
        .char_set()
        .map_err(|e| PasswordError::InvalidCharSet(e.to_string()))?;
    sanitize::prepare(&mut set, profile)?;

    let length = profile.length as usize;
    if set.is_empty() || (profile.no_repeating_characters && length > set.len()) {
        return Err(PasswordError::TooFewCharacters);
    }

    tracing::trace!(
        length = profile.length,
        charset_size = set.len(),
        "Drawing fixed-length password"
    );

    // Sized up front so the plaintext is never reallocated.
    let mut password: Zeroizing<Vec<char>> = Zeroizing::new(Vec::new());
    password
        .try_reserve_exact(length)
        .map_err(|_| PasswordError::AllocationFailed { chars: length })?;
    for _ in 0..profile.length {
        let ch = rng
            .generate_character(&set)
            .ok_or(PasswordError::TooFewCharacters)?;
        if profile.no_repeating_characters {
            set.remove(ch);
        }
        password.push(ch);
    }

    Ok(ProtectedSecret::from_chars(&password))
}
