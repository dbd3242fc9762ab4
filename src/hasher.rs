//! Hash oracle implementations and node-hash derivation.
//!
//! [`DigestHasher`] adapts any RustCrypto digest to the [`TreeHash`] oracle
//! contract; [`Sha512Trunc256`] is the recommended concrete choice
//! (SHA-512/256: SHA-256-level security, faster on 64-bit hardware).
//! [`NodeHasher`] derives the leaf and interior node hashes from the oracle,
//! mixing in the tree-wide constant and position metadata.

use crate::{
    traits::TreeHash,
    types::{Digest, LeafValue},
};
use std::marker::PhantomData;

/// Adapts a RustCrypto [`Digest`](sha2::Digest) into a [`TreeHash`] oracle.
pub struct DigestHasher<D>(PhantomData<D>);

/// The recommended hash oracle: SHA-512 truncated to 256 bits.
pub type Sha512Trunc256 = DigestHasher<sha2::Sha512_256>;

impl<D> DigestHasher<D> {
    /// Creates the adapter.
    pub const fn new() -> Self {
        Self(PhantomData)
    }
}

impl<D> Default for DigestHasher<D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D> Clone for DigestHasher<D> {
    fn clone(&self) -> Self {
        Self(PhantomData)
    }
}

impl<D> Copy for DigestHasher<D> {}

impl<D> std::fmt::Debug for DigestHasher<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("DigestHasher")
    }
}

impl<D: sha2::Digest> TreeHash for DigestHasher<D> {
    fn digest(&self, parts: &[&[u8]]) -> Digest {
        let mut hasher = D::new();
        for part in parts {
            hasher.update(part);
        }
        hasher.finalize().to_vec()
    }
}

/// Derives node hashes for one tree: the injected oracle plus the tree-wide
/// leaf constant `c`. Owned by the engine, shared by the update, root and
/// proof paths.
#[derive(Clone, Debug)]
pub(crate) struct NodeHasher<H> {
    hash: H,
    c: Vec<u8>,
}

impl<H: TreeHash> NodeHasher<H> {
    pub(crate) fn new(hash: H, c: &[u8]) -> Self {
        Self { hash, c: c.to_vec() }
    }

    /// Raw oracle access, used to probe the digest width at construction.
    pub(crate) fn digest(&self, parts: &[&[u8]]) -> Digest {
        self.hash.digest(parts)
    }

    /// Hash of two adjacent child hashes without position metadata. Used for
    /// the default-hash chain, where both children are identical.
    pub(crate) fn hash_pair(&self, left: &[u8], right: &[u8]) -> Digest {
        self.hash.digest(&[left, right])
    }

    /// Leaf hash. Empty leaves fold to `hash(c)` regardless of position;
    /// set leaves bind to their key via `base`, preventing cross-position
    /// swaps.
    pub(crate) fn leaf(&self, value: LeafValue, base: &[u8]) -> Digest {
        match value {
            LeafValue::Empty => self.hash.digest(&[&self.c]),
            LeafValue::Set => self.hash.digest(&[&self.c, base]),
        }
    }

    /// Interior-node hash. Height and base make the digest unique at its
    /// position, except when both children are identical: position is
    /// irrelevant there, and the plain pair form lets default chains
    /// telescope.
    pub(crate) fn interior(&self, left: &[u8], right: &[u8], height: u64, base: &[u8]) -> Digest {
        if left == right {
            self.hash.digest(&[left, right])
        } else {
            self.hash.digest(&[left, right, base, &height.to_be_bytes()])
        }
    }
}
