//! The sparse Merkle tree engine.
//!
//! The tree over 2^N leaves is never materialized: [`Smt::update`] and
//! [`Smt::root_hash`] recurse over subtrees, pruning any subtree that holds
//! no keys down to a precomputed default hash, so work is proportional to
//! the number of live leaves rather than the key space.

use crate::{
    bits::bit_split,
    constant::WIDTH_PROBE,
    hasher::NodeHasher,
    keys::KeySet,
    traits::{Cache, TreeHash},
    types::{Digest, LeafValue},
};
use tracing::{debug, trace};

/// A sparse Merkle tree engine: the default-hash table, the tree-wide leaf
/// constant, the hash oracle, and one caching strategy fixed at
/// construction.
///
/// The engine holds no key material. Callers keep the authenticated set as
/// a sorted [`KeySet`] and pass it to each operation together with the
/// subtree coordinates, normally `(self.n(), self.base())` for the whole
/// tree.
#[derive(Clone, Debug)]
pub struct Smt<H, C> {
    nodes: NodeHasher<H>,
    cache: C,
    default_hashes: Vec<Digest>,
    n: u64,
    base: Digest,
}

impl<H: TreeHash, C: Cache> Smt<H, C> {
    /// Creates an engine from the tree-wide leaf constant `c`, a caching
    /// strategy and a hash oracle.
    ///
    /// The oracle's output width N is discovered by hashing a probe input;
    /// the default-hash table for empty subtrees of every height `0..=N` is
    /// built up from the empty-leaf hash.
    pub fn new(c: &[u8], cache: C, hash: H) -> Self {
        let nodes = NodeHasher::new(hash, c);
        let n = nodes.digest(&[WIDTH_PROBE]).len() as u64 * 8;

        let mut default_hashes = Vec::with_capacity(n as usize + 1);
        default_hashes.push(nodes.leaf(LeafValue::Empty, &[]));
        for height in 1..=n as usize {
            let below = &default_hashes[height - 1];
            default_hashes.push(nodes.hash_pair(below, below));
        }
        debug!(n, defaults = default_hashes.len(), "smt engine constructed");

        Self {
            nodes,
            cache,
            default_hashes,
            n,
            base: vec![0u8; (n / 8) as usize],
        }
    }

    /// Output width of the hash oracle in bits; also the tree height.
    #[inline]
    pub fn n(&self) -> u64 {
        self.n
    }

    /// The all-zeros base identifying the whole tree.
    #[inline]
    pub fn base(&self) -> &[u8] {
        &self.base
    }

    /// Number of entries currently held by the caching strategy.
    pub fn cache_entries(&self) -> usize {
        self.cache.entries()
    }

    /// Sets every key in `keys` to `value` and returns the new root hash of
    /// the subtree `(height, base)`.
    ///
    /// `d` is the full sorted keyset of the subtree reflecting the state
    /// *after* this update (for deletions, with the deleted keys already
    /// removed); `keys` is the sorted subset being written. Each interior
    /// hash on the way back up flows through the cache, which is how
    /// entries get written and stale ones purged.
    pub fn update(
        &mut self,
        d: KeySet<'_>,
        keys: KeySet<'_>,
        height: u64,
        base: &[u8],
        value: LeafValue,
    ) -> Digest {
        if height == self.n {
            trace!(keys = keys.len(), total = d.len(), ?value, "root update");
        }
        if height == 0 {
            return self.nodes.leaf(value, base);
        }
        let split = bit_split(base, self.n - height);
        let (ld, rd) = d.split(&split);
        let (lkeys, rkeys) = keys.split(&split);

        // A side with no keys to write keeps its root (read path only); a
        // side with keys recurses. When a single side has all the keys it
        // receives the undivided set, whose other half is empty anyway.
        let (left, right) = match (lkeys.is_empty(), rkeys.is_empty()) {
            (true, false) => (
                self.root_hash(ld, height - 1, base),
                self.update(rd, keys, height - 1, &split, value),
            ),
            (false, true) => (
                self.update(ld, keys, height - 1, base, value),
                self.root_hash(rd, height - 1, &split),
            ),
            _ => (
                self.update(ld, lkeys, height - 1, base, value),
                self.update(rd, rkeys, height - 1, &split, value),
            ),
        };

        let nodes = &self.nodes;
        self.cache.hash_cache(
            left,
            right,
            height,
            base,
            &split,
            &|l, r, h, b| nodes.interior(l, r, h, b),
            &self.default_hashes,
        )
    }

    /// Root hash of the subtree `(height, base)` containing the sorted
    /// sub-keyset `d`.
    ///
    /// Consults the cache first, prunes empty subtrees to their default
    /// hash, and otherwise recurses. This read path never writes to the
    /// cache.
    ///
    /// # Panics
    ///
    /// If more than one key remains at height 0, which means `d` was not
    /// sorted or a split key was mangled by the caller.
    pub fn root_hash(&self, d: KeySet<'_>, height: u64, base: &[u8]) -> Digest {
        if let Some(hash) = self.cache.get(height, base) {
            return hash;
        }
        if d.is_empty() {
            return self.default_hashes[height as usize].clone();
        }
        if height == 0 {
            if d.len() == 1 {
                return self.nodes.leaf(LeafValue::Set, base);
            }
            panic!("{} keys landed on one leaf: unsorted keyset or broken split", d.len());
        }
        let split = bit_split(base, self.n - height);
        let (l, r) = d.split(&split);
        self.nodes.interior(
            &self.root_hash(l, height - 1, base),
            &self.root_hash(r, height - 1, &split),
            height,
            base,
        )
    }

    pub(crate) fn node_hasher(&self) -> &NodeHasher<H> {
        &self.nodes
    }

    pub(crate) fn default_hash(&self, height: u64) -> &Digest {
        &self.default_hashes[height as usize]
    }
}
