//! Behavior seams of the engine: the injected hash oracle and the caching
//! strategy. Both are chosen at construction and fixed for the engine's
//! lifetime.

use crate::types::Digest;

/// The hash oracle backing every node computation.
///
/// Implementations digest the concatenation of `parts`, i.e.
/// `digest(&[a, b])` must equal `digest(&[ab])`, and always return the same
/// fixed output width. The engine discovers that width at construction by
/// hashing a probe input. See [`DigestHasher`](crate::hasher::DigestHasher)
/// for an adapter over RustCrypto digests.
pub trait TreeHash {
    /// Digests the concatenation of the given byte strings.
    fn digest(&self, parts: &[&[u8]]) -> Digest;
}

/// A caching strategy observing interior-hash events.
///
/// Conceptually a map from a subtree position `(height, base)` to that
/// subtree's precomputed root hash. Entries are written (or invalidated)
/// exclusively through [`hash_cache`](Self::hash_cache), which the engine
/// calls for every interior node visited by an update; read paths only
/// consult [`exists`](Self::exists) / [`get`](Self::get).
///
/// Every strategy must uphold one invariant: a stored hash always equals
/// what an uncached recomputation of that subtree would produce for the
/// current key state. Do not share one cache instance between engines with
/// different hash oracles or leaf constants.
pub trait Cache {
    /// Whether a hash is stored for the subtree at `(height, base)`.
    fn exists(&self, height: u64, base: &[u8]) -> bool;

    /// The stored hash for `(height, base)`, if any.
    fn get(&self, height: u64, base: &[u8]) -> Option<Digest>;

    /// Computes `interior(left, right, height, base)`, applies this
    /// strategy's write/delete policy, and returns the hash.
    ///
    /// `defaults[h]` is the root hash of a fully-empty subtree of height
    /// `h`; strategies compare children against `defaults[height - 1]` to
    /// detect degenerate branches. `split` is the base of the right child.
    #[allow(clippy::too_many_arguments)]
    fn hash_cache(
        &mut self,
        left: Digest,
        right: Digest,
        height: u64,
        base: &[u8],
        split: &[u8],
        interior: &dyn Fn(&[u8], &[u8], u64, &[u8]) -> Digest,
        defaults: &[Digest],
    ) -> Digest;

    /// Number of stored mappings, for diagnostics.
    fn entries(&self) -> usize;
}

impl<C: Cache + ?Sized> Cache for Box<C> {
    fn exists(&self, height: u64, base: &[u8]) -> bool {
        (**self).exists(height, base)
    }

    fn get(&self, height: u64, base: &[u8]) -> Option<Digest> {
        (**self).get(height, base)
    }

    fn hash_cache(
        &mut self,
        left: Digest,
        right: Digest,
        height: u64,
        base: &[u8],
        split: &[u8],
        interior: &dyn Fn(&[u8], &[u8], u64, &[u8]) -> Digest,
        defaults: &[Digest],
    ) -> Digest {
        (**self).hash_cache(left, right, height, base, split, interior, defaults)
    }

    fn entries(&self) -> usize {
        (**self).entries()
    }
}
