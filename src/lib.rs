//! Password Generation Library
//!
//! Generates passwords from a [`GenerationProfile`], either by drawing a
//! fixed number of characters from one character set, by interpreting a
//! pattern template, or by delegating to a caller-registered generator.
//!
//! # Architecture
//!
//! ```text
//! profile → charset → sanitize → generator → secret
//!                                    ↑
//!                                 random (fresh ChaCha20 keystream per call)
//! ```
//!
//! # Design Principles
//!
//! - **Uniform sampling**: every index is drawn by rejection sampling,
//!   never by a biased modulo
//! - **OS randomness first**: caller entropy is mixed into, never
//!   substituted for, the operating system's randomness
//! - **Wipe plaintext**: character sets, keys and password buffers are
//!   zeroized when dropped
//!
//! # Example
//!
//! ```
//! use pwforge::{generate, GenerationProfile};
//!
//! let profile = GenerationProfile::with_pattern("u{4}-d{4}");
//! let password = generate(&profile, &[], None).unwrap();
//!
//! assert_eq!(password.char_count(), 9);
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]
#![deny(unsafe_code)]

pub mod charset;
pub mod generator;
pub mod profile;
pub mod random;
pub mod sanitize;
pub mod secret;

// Re-export commonly used types at crate root
pub use charset::{CharSet, CharSetError};
pub use generator::{
    generate, generate_checked, CustomGenerator, CustomGeneratorPool, GeneratorRegistry,
    PasswordError,
};
pub use profile::{GenerationProfile, GeneratorType, ProfileError};
pub use random::RandomEngine;
pub use secret::ProtectedSecret;

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
