//! Pluggable generators selected by identifier.

use std::collections::HashMap;

use super::PasswordError;
use crate::profile::GenerationProfile;
use crate::random::RandomEngine;
use crate::secret::ProtectedSecret;

/// A generator supplied by the caller.
///
/// Implementations read `profile.custom_algorithm_options` for their own
/// settings and should draw all randomness from `rng`.
pub trait CustomGenerator {
    /// Human-readable name.
    fn name(&self) -> &str;

    /// Produces a password, or `None` on failure.
    fn generate(
        &self,
        profile: &GenerationProfile,
        rng: &mut RandomEngine,
    ) -> Option<ProtectedSecret>;
}

/// Lookup of custom generators by identifier.
pub trait GeneratorRegistry {
    /// Returns the generator registered under `id`.
    fn find(&self, id: &str) -> Option<&dyn CustomGenerator>;
}

/// A [`GeneratorRegistry`] backed by a map.
#[derive(Default)]
pub struct CustomGeneratorPool {
    generators: HashMap<String, Box<dyn CustomGenerator + Send + Sync>>,
}

impl CustomGeneratorPool {
    /// Creates an empty pool.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `generator` under `id`, returning the one it replaces.
    pub fn add(
        &mut self,
        id: impl Into<String>,
        generator: Box<dyn CustomGenerator + Send + Sync>,
    ) -> Option<Box<dyn CustomGenerator + Send + Sync>> {
        let id = id.into();
        tracing::debug!(id = %id, name = generator.name(), "Registered custom generator");
        self.generators.insert(id, generator)
    }

    /// Unregisters the generator under `id`.
    pub fn remove(&mut self, id: &str) -> Option<Box<dyn CustomGenerator + Send + Sync>> {
        self.generators.remove(id)
    }

    /// Number of registered generators.
    pub fn len(&self) -> usize {
        self.generators.len()
    }

    /// Returns true if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.generators.is_empty()
    }
}

impl GeneratorRegistry for CustomGeneratorPool {
    fn find(&self, id: &str) -> Option<&dyn CustomGenerator> {
        self.generators
            .get(id)
            .map(|g| g.as_ref() as &dyn CustomGenerator)
    }
}

impl std::fmt::Debug for CustomGeneratorPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CustomGeneratorPool")
            .field("ids", &self.generators.keys().collect::<Vec<_>>())
            .finish()
    }
}

pub(crate) fn generate(
    profile: &GenerationProfile,
    rng: &mut RandomEngine,
    registry: Option<&dyn GeneratorRegistry>,
) -> Result<ProtectedSecret, PasswordError> {
    let id = profile.custom_algorithm_id.as_str();
    if id.is_empty() {
        return Err(PasswordError::UnknownAlgorithm);
    }

    let generator = registry
        .and_then(|r| r.find(id))
        .ok_or(PasswordError::UnknownAlgorithm)?;

    tracing::debug!(id, name = generator.name(), "Delegating to custom generator");

    generator
        .generate(profile, rng)
        .ok_or(PasswordError::CustomGeneratorFailed)
}
