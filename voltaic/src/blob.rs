use std::{
    cmp::Ordering,
    fmt,
    hash::{Hash, Hasher},
    str::{self, Utf8Error},
    sync::OnceLock,
};

use bstr::BStr;

/// Immutable UTF-8 text with a lazily computed UTF-16 form.
///
/// The UTF-8 bytes are the source of truth. Equality, ordering and hashing only look at them, so a
/// blob can be used as a map key without ever materializing the UTF-16 form. The UTF-16 form is
/// computed on the first call to [`as_utf16`][Self::as_utf16] and then cached for the lifetime of
/// the blob.
pub struct Utf8Blob {
    bytes: Box<[u8]>,
    utf16: OnceLock<Box<[u16]>>,
}

impl Utf8Blob {
    /// Creates a blob holding a copy of `text`.
    pub fn new(text: &str) -> Self {
        Self::from_boxed_bytes(text.as_bytes().into())
    }

    /// Creates a blob from bytes that must be valid UTF-8.
    pub fn from_utf8(bytes: Vec<u8>) -> Result<Self, Utf8Error> {
        str::from_utf8(&bytes)?;
        Ok(Self::from_boxed_bytes(bytes.into_boxed_slice()))
    }

    fn from_boxed_bytes(bytes: Box<[u8]>) -> Self {
        Utf8Blob {
            bytes,
            utf16: OnceLock::new(),
        }
    }

    /// The UTF-8 encoded content.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// The content as string slice.
    #[inline]
    pub fn as_str(&self) -> &str {
        // SAFETY every constructor validates or starts from a `str`
        unsafe { str::from_utf8_unchecked(&self.bytes) }
    }

    /// The UTF-16 encoded content, computed on first use.
    pub fn as_utf16(&self) -> &[u16] {
        self.utf16
            .get_or_init(|| self.as_str().encode_utf16().collect())
    }

    /// Length of the UTF-8 encoded content in bytes.
    #[inline]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Returns `true` if the blob holds the empty string.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl Clone for Utf8Blob {
    fn clone(&self) -> Self {
        let utf16 = OnceLock::new();
        if let Some(cached) = self.utf16.get() {
            let _ = utf16.set(cached.clone());
        }
        Utf8Blob {
            bytes: self.bytes.clone(),
            utf16,
        }
    }
}

impl From<&str> for Utf8Blob {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

impl From<String> for Utf8Blob {
    fn from(text: String) -> Self {
        Self::from_boxed_bytes(text.into_bytes().into_boxed_slice())
    }
}

impl AsRef<[u8]> for Utf8Blob {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl PartialEq for Utf8Blob {
    fn eq(&self, other: &Self) -> bool {
        self.bytes == other.bytes
    }
}

impl Eq for Utf8Blob {}

impl PartialEq<str> for Utf8Blob {
    fn eq(&self, other: &str) -> bool {
        *self.bytes == *other.as_bytes()
    }
}

impl PartialEq<&str> for Utf8Blob {
    fn eq(&self, other: &&str) -> bool {
        *self.bytes == *other.as_bytes()
    }
}

impl PartialOrd for Utf8Blob {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Utf8Blob {
    fn cmp(&self, other: &Self) -> Ordering {
        self.bytes.cmp(&other.bytes)
    }
}

impl Hash for Utf8Blob {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.bytes.hash(state)
    }
}

impl fmt::Debug for Utf8Blob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(BStr::new(&self.bytes), f)
    }
}

impl fmt::Display for Utf8Blob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
