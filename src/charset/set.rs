//! Ordered, deduplicated set of UTF-16 code units.

use std::fmt;
use std::ops::Index;

use zeroize::Zeroize;

use super::classes;

/// One bit per code unit in the 16-bit space.
const BITMAP_WORDS: usize = 0x10000 / 64;

/// An ordered collection of unique UTF-16 code units.
///
/// Insertion order defines the index used for sampling, so every
/// member is reachable through exactly one index in `0..len()`. A
/// presence bitmap over the whole 16-bit space gives O(1) membership
/// tests. Characters outside the Basic Multilingual Plane are stored as
/// their two surrogate units, which the sanitizer later rejects.
///
/// Both the sequence and the bitmap are wiped on [`CharSet::clear`]
/// and on drop.
pub struct CharSet {
    units: Vec<u16>,
    bitmap: Box<[u64; BITMAP_WORDS]>,
}

impl CharSet {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Creates an empty set that holds `units` code units without
    /// reallocating.
    pub fn with_capacity(units: usize) -> Self {
        Self {
            units: Vec::with_capacity(units),
            bitmap: Box::new([0u64; BITMAP_WORDS]),
        }
    }

    /// Creates a set holding every character of `chars`.
    pub fn from_chars(chars: &str) -> Self {
        let mut set = Self::new();
        set.add_str(chars);
        set
    }

    /// Number of code units in the set.
    #[inline]
    pub fn len(&self) -> usize {
        self.units.len()
    }

    /// Returns true if the set is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// Returns the code unit at `index` in insertion order.
    #[inline]
    pub fn get(&self, index: usize) -> Option<u16> {
        self.units.get(index).copied()
    }

    /// Iterates over the code units in insertion order.
    pub fn units(&self) -> impl Iterator<Item = u16> + '_ {
        self.units.iter().copied()
    }

    /// Removes every member, zeroing the backing storage.
    pub fn clear(&mut self) {
        self.units.zeroize();
        self.bitmap.as_mut_slice().zeroize();
    }

    /// Tests a single code unit.
    #[inline]
    pub fn contains_unit(&self, unit: u16) -> bool {
        let unit = unit as usize;
        (self.bitmap[unit / 64] >> (unit % 64)) & 1 != 0
    }

    /// Tests a character. Characters outside the BMP are tested as
    /// their surrogate pair.
    pub fn contains(&self, ch: char) -> bool {
        let mut buf = [0u16; 2];
        ch.encode_utf16(&mut buf)
            .iter()
            .all(|&unit| self.contains_unit(unit))
    }

    /// Returns true if every character of `chars` is present.
    pub fn contains_str(&self, chars: &str) -> bool {
        chars.encode_utf16().all(|unit| self.contains_unit(unit))
    }

    /// Adds a single code unit. NUL is never stored.
    pub fn add_unit(&mut self, unit: u16) {
        if unit == 0 {
            return;
        }

        if !self.contains_unit(unit) {
            self.units.push(unit);
            self.set_bit(unit);
        }
    }

    /// Adds a character.
    pub fn add(&mut self, ch: char) {
        let mut buf = [0u16; 2];
        for &unit in ch.encode_utf16(&mut buf).iter() {
            self.add_unit(unit);
        }
    }

    /// Adds every character of `chars`.
    pub fn add_str(&mut self, chars: &str) {
        self.units.reserve(chars.len());
        for unit in chars.encode_utf16() {
            self.add_unit(unit);
        }
    }

    /// Adds every code unit in `[lo, hi]`.
    pub fn add_range(&mut self, lo: char, hi: char) {
        let lo = (lo as u32).min(0xFFFF) as u16;
        let hi = (hi as u32).min(0xFFFF) as u16;
        if lo > hi {
            return;
        }

        self.units.reserve(usize::from(hi - lo) + 1);
        for unit in lo..=hi {
            if unit != 0 {
                self.add_unit(unit);
            }
        }
    }

    /// Adds the named class identified by `letter`.
    ///
    /// Returns false, leaving the set untouched, if `letter` is not a
    /// class identifier; the caller then treats it as a literal.
    pub fn add_class(&mut self, letter: char) -> bool {
        let Some(parts) = classes::class_components(letter) else {
            return false;
        };

        if classes::is_high_ansi_class(letter) {
            for (lo, hi) in classes::HIGH_ANSI_RANGES {
                self.add_range(lo, hi);
            }
        } else {
            for part in parts {
                self.add_str(part);
            }
        }
        true
    }

    /// Removes a single code unit, returning whether it was present.
    pub fn remove_unit(&mut self, unit: u16) -> bool {
        if !self.contains_unit(unit) {
            return false;
        }

        self.clear_bit(unit);
        if let Some(pos) = self.units.iter().position(|&u| u == unit) {
            self.units.remove(pos);
        }
        true
    }

    /// Removes a character, returning whether it was present.
    pub fn remove(&mut self, ch: char) -> bool {
        let mut buf = [0u16; 2];
        ch.encode_utf16(&mut buf)
            .iter()
            .fold(true, |all, &unit| self.remove_unit(unit) && all)
    }

    /// Removes every character of `chars`.
    ///
    /// Returns true only if every character was present beforehand.
    pub fn remove_str(&mut self, chars: &str) -> bool {
        chars
            .encode_utf16()
            .fold(true, |all, unit| self.remove_unit(unit) && all)
    }

    /// Removes `chars` only if all of them are present.
    pub fn remove_if_all_exist(&mut self, chars: &str) -> bool {
        if !self.contains_str(chars) {
            return false;
        }
        self.remove_str(chars)
    }

    /// Adds every member of `other`, preserving its order.
    pub fn extend_from(&mut self, other: &CharSet) {
        self.units.reserve(other.len());
        for unit in other.units() {
            self.add_unit(unit);
        }
    }

    #[inline]
    fn set_bit(&mut self, unit: u16) {
        let unit = unit as usize;
        self.bitmap[unit / 64] |= 1u64 << (unit % 64);
    }

    #[inline]
    fn clear_bit(&mut self, unit: u16) {
        let unit = unit as usize;
        self.bitmap[unit / 64] &= !(1u64 << (unit % 64));
    }
}

impl Default for CharSet {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for CharSet {
    fn clone(&self) -> Self {
        Self {
            units: self.units.clone(),
            bitmap: self.bitmap.clone(),
        }
    }
}

impl Drop for CharSet {
    fn drop(&mut self) {
        self.clear();
    }
}

/// Membership equality; insertion order is ignored.
impl PartialEq for CharSet {
    fn eq(&self, other: &Self) -> bool {
        self.bitmap[..] == other.bitmap[..]
    }
}

impl Eq for CharSet {}

impl Index<usize> for CharSet {
    type Output = u16;

    /// Panics if `index >= len()`.
    fn index(&self, index: usize) -> &u16 {
        &self.units[index]
    }
}

/// Writes the members in insertion order. Unpaired surrogates are
/// written as U+FFFD.
impl fmt::Display for CharSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for ch in char::decode_utf16(self.units.iter().copied()) {
            write!(f, "{}", ch.unwrap_or(char::REPLACEMENT_CHARACTER))?;
        }
        Ok(())
    }
}

impl fmt::Debug for CharSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CharSet")
            .field("len", &self.units.len())
            .finish_non_exhaustive()
    }
}
