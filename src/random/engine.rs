//! Per-call ChaCha20 keystream for password generation.
//!
//! # Keying Model
//!
//! Each generation call builds its own engine:
//!
//! ```text
//! key     = OsRng(64 bytes) XOR SHA-512(user entropy)   (XOR skipped if empty)
//! seed    = SHA-256(key)
//! stream  = ChaCha20(seed)
//! ```
//!
//! User entropy is XORed over independent OS randomness, so it can add
//! to the key but never weaken it. Key, digest and seed copies are
//! zeroized as soon as the keystream is initialized.

use rand_chacha::ChaCha20Rng;
use rand_core::{CryptoRng, OsRng, RngCore, SeedableRng};
use sha2::{Digest, Sha256, Sha512};
use thiserror::Error;
use zeroize::{Zeroize, Zeroizing};

use crate::charset::CharSet;

/// Size of the OS-sourced key material in bytes.
pub const KEY_SIZE: usize = 64;

/// Key material the keystream is derived from.
pub type KeyMaterial = Zeroizing<[u8; KEY_SIZE]>;

/// Errors that can occur while keying the engine.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("operating system random source failed: {0}")]
    OsRandom(#[from] rand_core::Error),
}

/// Cryptographically secure random source for one generation call.
///
/// Not `Clone`: one engine serves exactly one generation call.
pub struct RandomEngine {
    inner: ChaCha20Rng,
    /// Keystream bytes handed out so far.
    bytes_consumed: u64,
}

impl RandomEngine {
    /// Creates an engine keyed from the OS CSPRNG, mixing in
    /// `additional_entropy` when it is non-empty.
    pub fn create(additional_entropy: &[u8]) -> Result<Self, EngineError> {
        let key = Self::derive_key(additional_entropy)?;
        Ok(Self::from_key(&key))
    }

    /// Draws fresh key material and mixes in caller entropy.
    pub fn derive_key(additional_entropy: &[u8]) -> Result<KeyMaterial, EngineError> {
        let mut key: KeyMaterial = Zeroizing::new([0u8; KEY_SIZE]);
        OsRng.try_fill_bytes(&mut key[..])?;

        if !additional_entropy.is_empty() {
            mix_entropy(&mut key, additional_entropy);
            tracing::trace!(
                entropy_len = additional_entropy.len(),
                "Mixed user entropy into key material"
            );
        }

        Ok(key)
    }

    /// Initializes the keystream from key material.
    pub fn from_key(key: &KeyMaterial) -> Self {
        let mut digest = Sha256::digest(&key[..]);
        let mut seed = [0u8; 32];
        seed.copy_from_slice(&digest);
        digest.as_mut_slice().zeroize();

        let inner = ChaCha20Rng::from_seed(seed);
        seed.zeroize();

        Self {
            inner,
            bytes_consumed: 0,
        }
    }

    /// Creates an engine from a known seed (for testing only).
    #[cfg(test)]
    pub(crate) fn from_seed_for_testing(seed: [u8; 32]) -> Self {
        Self {
            inner: ChaCha20Rng::from_seed(seed),
            bytes_consumed: 0,
        }
    }

    /// Returns an integer uniformly distributed in `[0, bound)`.
    ///
    /// Uses rejection sampling: outputs below `2^64 mod bound` are
    /// discarded so every residue is equally likely. A `bound` of 0 or
    /// 1 returns 0 without touching the keystream.
    pub fn uniform_index(&mut self, bound: u64) -> u64 {
        if bound <= 1 {
            return 0;
        }

        let threshold = bound.wrapping_neg() % bound;
        loop {
            let r = self.next_u64();
            if r >= threshold {
                return r % bound;
            }
        }
    }

    /// Fisher-Yates shuffle of `buf` in place.
    pub fn shuffle<T>(&mut self, buf: &mut [T]) {
        for i in (1..buf.len()).rev() {
            let j = self.uniform_index(i as u64 + 1) as usize;
            buf.swap(i, j);
        }
    }

    /// Draws one member of `set` uniformly.
    ///
    /// Returns `None` if the set is empty. The set must have passed
    /// [`crate::sanitize::prepare`]; a surrogate unit, which the
    /// sanitizer rejects, also yields `None`.
    pub fn generate_character(&mut self, set: &CharSet) -> Option<char> {
        if set.is_empty() {
            return None;
        }

        let index = self.uniform_index(set.len() as u64) as usize;
        set.get(index).and_then(|unit| char::from_u32(u32::from(unit)))
    }

    /// Returns keystream bytes consumed so far.
    pub fn bytes_consumed(&self) -> u64 {
        self.bytes_consumed
    }
}

/// XORs SHA-512 of `entropy` over the key. The digest is as long as the
/// key, so every key byte is covered.
fn mix_entropy(key: &mut [u8; KEY_SIZE], entropy: &[u8]) {
    let mut digest = Sha512::digest(entropy);
    for (k, d) in key.iter_mut().zip(digest.iter()) {
        *k ^= *d;
    }
    digest.as_mut_slice().zeroize();
}

impl RngCore for RandomEngine {
    fn next_u32(&mut self) -> u32 {
        self.bytes_consumed += 4;
        self.inner.next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.bytes_consumed += 8;
        self.inner.next_u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.bytes_consumed += dest.len() as u64;
        self.inner.fill_bytes(dest);
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand_core::Error> {
        self.bytes_consumed += dest.len() as u64;
        self.inner.try_fill_bytes(dest)
    }
}

impl CryptoRng for RandomEngine {}

impl std::fmt::Debug for RandomEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RandomEngine")
            .field("bytes_consumed", &self.bytes_consumed)
            .finish_non_exhaustive()
    }
}
