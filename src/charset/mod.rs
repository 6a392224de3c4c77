//! Character sets and their compact persisted form.
//!
//! [`CharSet`] is the data structure every generator samples from.
//! [`classes`] holds the fixed class table of the pattern language and
//! [`CharRange`] the ten named ranges used for persistence.

pub mod classes;
mod ranges;
mod set;

pub use ranges::{CharRange, PackedCharSet, ABSENT_FLAG};
pub use set::CharSet;

use thiserror::Error;

/// Errors raised while rebuilding a character set.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CharSetError {
    #[error("range flags must be 10 characters, got {len}")]
    InvalidRangeFlags { len: usize },
}
