//! Output container for generated passwords.

use zeroize::Zeroizing;

/// A generated password, held as UTF-8 bytes that are wiped on drop.
///
/// The contents are never printed through `Debug`.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct ProtectedSecret {
    bytes: Zeroizing<Vec<u8>>,
}

impl ProtectedSecret {
    /// An empty secret.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Takes ownership of an already-encoded password.
    pub fn from_string(password: String) -> Self {
        Self {
            bytes: Zeroizing::new(password.into_bytes()),
        }
    }

    /// Encodes `chars` as UTF-8 into a buffer sized up front, so the
    /// plaintext is never reallocated and left behind.
    pub fn from_chars(chars: &[char]) -> Self {
        let len = chars.iter().map(|ch| ch.len_utf8()).sum();
        let mut bytes = Zeroizing::new(Vec::with_capacity(len));
        let mut buf = Zeroizing::new([0u8; 4]);
        for ch in chars {
            bytes.extend_from_slice(ch.encode_utf8(&mut buf[..]).as_bytes());
        }
        Self { bytes }
    }

    /// Returns the UTF-8 bytes.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Returns the password as a string slice.
    pub fn expose(&self) -> &str {
        // Every constructor stores valid UTF-8.
        std::str::from_utf8(&self.bytes).unwrap_or_default()
    }

    /// Length in bytes.
    #[inline]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Returns true if empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Number of characters.
    pub fn char_count(&self) -> usize {
        self.expose().chars().count()
    }
}

impl std::fmt::Debug for ProtectedSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProtectedSecret")
            .field("len", &self.bytes.len())
            .finish_non_exhaustive()
    }
}
