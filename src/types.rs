//! Core value types shared across the tree, cache and proof modules.

use serde::{Deserialize, Serialize};

/// A hash digest, N/8 bytes long. The width is discovered at engine
/// construction from the injected hash oracle, so digests are heap-allocated
/// rather than fixed-size arrays.
pub type Digest = Vec<u8>;

/// The state written to a leaf by an update.
///
/// The discriminants are the single-byte wire markers distinguishing the two
/// states: empty leaves collapse to one base-independent default hash, set
/// leaves are bound to their position through the subtree base.
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LeafValue {
    /// The leaf holds nothing; hashes to the tree-wide empty constant.
    Empty = 0x00,
    /// The leaf is occupied; hashes with its base mixed in.
    Set = 0x01,
}

impl LeafValue {
    /// The single-byte marker for this state.
    #[inline]
    pub const fn as_byte(self) -> u8 {
        self as u8
    }

    /// Decodes a marker byte, rejecting anything but the two known states.
    pub const fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            0x00 => Some(Self::Empty),
            0x01 => Some(Self::Set),
            _ => None,
        }
    }
}
