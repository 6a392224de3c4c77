//! Keystream-backed randomness for password generation.
//!
//! This module provides a per-call ChaCha20 engine keyed from the OS
//! CSPRNG, with the uniform sampling and shuffling primitives the
//! generators need.

mod engine;

pub use engine::{EngineError, KeyMaterial, RandomEngine, KEY_SIZE};
