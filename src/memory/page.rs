//! A single fixed-size page and its access mode.

use crate::consts::PAGE_SIZE;

/// The access mode granted to a mapped page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AccessMode {
    /// Neither readable nor writable. This is also the implicit mode of any
    /// unmapped page index.
    #[strum(serialize = "inaccessible")]
    Inaccessible,
    /// Readable, not writable. Program image pages are mapped this way.
    #[strum(serialize = "read-only")]
    ReadOnly,
    /// Readable and writable. `sbrk`-allocated pages are mapped this way.
    #[strum(serialize = "read-write")]
    ReadWrite,
}

impl AccessMode {
    /// Whether bytes may be read from a page with this mode.
    pub const fn is_readable(self) -> bool {
        matches!(self, Self::ReadOnly | Self::ReadWrite)
    }

    /// Whether bytes may be written to a page with this mode.
    pub const fn is_writable(self) -> bool {
        matches!(self, Self::ReadWrite)
    }
}

/// A single `PAGE_SIZE`-byte page with a uniform [`AccessMode`].
#[derive(Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Page {
    #[cfg_attr(feature = "serde", serde(with = "serde_bytes_array"))]
    bytes: [u8; PAGE_SIZE as usize],
    mode: AccessMode,
}

impl Page {
    /// A zero-filled page with the given access mode.
    pub fn zeroed(mode: AccessMode) -> Self {
        Self {
            bytes: [0u8; PAGE_SIZE as usize],
            mode,
        }
    }

    /// The page's access mode.
    pub const fn mode(&self) -> AccessMode {
        self.mode
    }

    /// The page's backing buffer.
    pub const fn bytes(&self) -> &[u8; PAGE_SIZE as usize] {
        &self.bytes
    }

    /// Mutable access to the page's backing buffer.
    pub fn bytes_mut(&mut self) -> &mut [u8; PAGE_SIZE as usize] {
        &mut self.bytes
    }
}

impl std::fmt::Debug for Page {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Page").field("mode", &self.mode).finish_non_exhaustive()
    }
}

#[cfg(feature = "serde")]
mod serde_bytes_array {
    use super::PAGE_SIZE;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8; PAGE_SIZE as usize], serializer: S) -> Result<S::Ok, S::Error> {
        bytes.as_slice().serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<[u8; PAGE_SIZE as usize], D::Error> {
        let vec = Vec::<u8>::deserialize(deserializer)?;
        vec.try_into()
            .map_err(|_| serde::de::Error::custom("page buffer has the wrong length"))
    }
}
