//! The four caching strategies.
//!
//! Every strategy sees the same stream of interior-hash events; they differ
//! only in what they keep. [`CacheNothing`] is the correctness baseline,
//! [`CacheBranch`] keeps every branch with two live children,
//! [`CacheBranchPlus`] keeps such a branch's children instead, and
//! [`CacheBranchMinus`] keeps branches probabilistically. All variants share
//! the delete-on-degenerate rule: an event whose children are not both live
//! purges whatever the strategy previously stored for that position, which
//! is what keeps cached values consistent as keys are emptied.

use crate::{constant::PROBABILITY_BUCKETS, traits::Cache, types::Digest};
use derive_more::{Deref, DerefMut};
use rand::{rngs::OsRng, Rng};
use rustc_hash::FxHashMap;

/// Cache map key: subtree position as `(height, base)`. Collision-free
/// because bases are fixed-width.
pub type CacheKey = (u64, Digest);

/// Uniform draw from the fixed discretization, true when below `x`.
/// `OsRng` pulls operating-system entropy and aborts the process if the
/// source fails, matching the fatal contract for draw errors.
fn rand_less(x: f64) -> bool {
    let draw = OsRng.gen_range(0..PROBABILITY_BUCKETS);
    f64::from(draw) / f64::from(PROBABILITY_BUCKETS) < x
}

/// Whether both children differ from the empty-subtree hash one level down.
#[inline]
fn both_children_live(left: &[u8], right: &[u8], height: u64, defaults: &[Digest]) -> bool {
    let default = defaults[(height - 1) as usize].as_slice();
    default != left && default != right
}

/// Caches nothing. Every lookup misses and every event stores nothing, so
/// traversals always recompute from the leaves.
#[derive(Clone, Copy, Debug, Default)]
pub struct CacheNothing;

impl Cache for CacheNothing {
    fn exists(&self, _height: u64, _base: &[u8]) -> bool {
        false
    }

    fn get(&self, _height: u64, _base: &[u8]) -> Option<Digest> {
        None
    }

    fn hash_cache(
        &mut self,
        left: Digest,
        right: Digest,
        height: u64,
        base: &[u8],
        _split: &[u8],
        interior: &dyn Fn(&[u8], &[u8], u64, &[u8]) -> Digest,
        _defaults: &[Digest],
    ) -> Digest {
        interior(&left, &right, height, base)
    }

    fn entries(&self) -> usize {
        0
    }
}

/// Caches every branch whose children are both non-default, keyed by the
/// branch position itself.
#[derive(Clone, Debug, Default, Deref, DerefMut)]
pub struct CacheBranch(FxHashMap<CacheKey, Digest>);

impl CacheBranch {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }
}

impl Cache for CacheBranch {
    fn exists(&self, height: u64, base: &[u8]) -> bool {
        self.0.contains_key(&(height, base.to_vec()))
    }

    fn get(&self, height: u64, base: &[u8]) -> Option<Digest> {
        self.0.get(&(height, base.to_vec())).cloned()
    }

    fn hash_cache(
        &mut self,
        left: Digest,
        right: Digest,
        height: u64,
        base: &[u8],
        _split: &[u8],
        interior: &dyn Fn(&[u8], &[u8], u64, &[u8]) -> Digest,
        defaults: &[Digest],
    ) -> Digest {
        let hash = interior(&left, &right, height, base);
        if both_children_live(&left, &right, height, defaults) {
            self.0.insert((height, base.to_vec()), hash.clone());
        } else {
            self.0.remove(&(height, base.to_vec()));
        }
        hash
    }

    fn entries(&self) -> usize {
        self.0.len()
    }
}

/// Caches the two children of every branch whose children are both
/// non-default, keyed one level below the branch.
///
/// Audit-path and root queries descend past branching points and look up
/// subtrees one level down, so storing the children serves those lookups
/// directly; the branch's own hash is not kept.
#[derive(Clone, Debug, Default, Deref, DerefMut)]
pub struct CacheBranchPlus(FxHashMap<CacheKey, Digest>);

impl CacheBranchPlus {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }
}

impl Cache for CacheBranchPlus {
    fn exists(&self, height: u64, base: &[u8]) -> bool {
        self.0.contains_key(&(height, base.to_vec()))
    }

    fn get(&self, height: u64, base: &[u8]) -> Option<Digest> {
        self.0.get(&(height, base.to_vec())).cloned()
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
        let hash = interior(&left, &right, height, base);
        if both_children_live(&left, &right, height, defaults) {
            self.0.insert((height - 1, base.to_vec()), left);
            self.0.insert((height - 1, split.to_vec()), right);
        } else {
            self.0.remove(&(height - 1, base.to_vec()));
            self.0.remove(&(height - 1, split.to_vec()));
        }
        hash
    }

    fn entries(&self) -> usize {
        self.0.len()
    }
}

/// Caches like [`CacheBranch`] but only with the configured probability,
/// trading recomputation cost for a smaller map. The stale entry at the
/// position is purged on every non-write event, p-rejections included.
#[derive(Clone, Debug)]
pub struct CacheBranchMinus {
    data: FxHashMap<CacheKey, Digest>,
    probability: f64,
}

impl CacheBranchMinus {
    /// Creates an empty cache that stores eligible branches with the given
    /// probability in `[0, 1]`.
    pub fn new(probability: f64) -> Self {
        Self { data: FxHashMap::default(), probability }
    }
}

impl Cache for CacheBranchMinus {
    fn exists(&self, height: u64, base: &[u8]) -> bool {
        self.data.contains_key(&(height, base.to_vec()))
    }

    fn get(&self, height: u64, base: &[u8]) -> Option<Digest> {
        self.data.get(&(height, base.to_vec())).cloned()
    }

    fn hash_cache(
        &mut self,
        left: Digest,
        right: Digest,
        height: u64,
        base: &[u8],
        _split: &[u8],
        interior: &dyn Fn(&[u8], &[u8], u64, &[u8]) -> Digest,
        defaults: &[Digest],
    ) -> Digest {
        let hash = interior(&left, &right, height, base);
        if rand_less(self.probability) && both_children_live(&left, &right, height, defaults) {
            self.data.insert((height, base.to_vec()), hash.clone());
        } else {
            self.data.remove(&(height, base.to_vec()));
        }
        hash
    }

    fn entries(&self) -> usize {
        self.data.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Concatenation stands in for a real interior hash; positions are
    // ignored so expectations stay readable.
    fn interior(left: &[u8], right: &[u8], _height: u64, _base: &[u8]) -> Digest {
        [left, right].concat()
    }

    fn defaults() -> Vec<Digest> {
        (0u8..5).map(|h| vec![h; 2]).collect()
    }

    #[test]
    fn nothing_never_stores() {
        let mut cache = CacheNothing;
        let hash = cache.hash_cache(
            vec![9, 9],
            vec![8, 8],
            3,
            &[0, 0],
            &[0, 1],
            &interior,
            &defaults(),
        );
        assert_eq!(hash, vec![9, 9, 8, 8]);
        assert_eq!(cache.entries(), 0);
        assert!(!cache.exists(3, &[0, 0]));
        assert_eq!(cache.get(3, &[0, 0]), None);
    }

    #[test]
    fn branch_stores_live_branches_and_purges_degenerate_ones() {
        let mut cache = CacheBranch::new();
        let defaults = defaults();

        let hash = cache.hash_cache(
            vec![9, 9],
            vec![8, 8],
            3,
            &[0, 0],
            &[0, 1],
            &interior,
            &defaults,
        );
        assert!(cache.exists(3, &[0, 0]));
        assert_eq!(cache.get(3, &[0, 0]), Some(hash));
        assert_eq!(cache.entries(), 1);

        // Same position, right child now empty: the entry must go away.
        cache.hash_cache(
            vec![9, 9],
            defaults[2].clone(),
            3,
            &[0, 0],
            &[0, 1],
            &interior,
            &defaults,
        );
        assert!(!cache.exists(3, &[0, 0]));
        assert_eq!(cache.entries(), 0);
    }

    #[test]
    fn branch_plus_stores_children_below_the_branch() {
        let mut cache = CacheBranchPlus::new();
        let defaults = defaults();

        cache.hash_cache(
            vec![9, 9],
            vec![8, 8],
            3,
            &[0, 0],
            &[0, 1],
            &interior,
            &defaults,
        );
        // The branch itself is not cached, its children are.
        assert!(!cache.exists(3, &[0, 0]));
        assert_eq!(cache.get(2, &[0, 0]), Some(vec![9, 9]));
        assert_eq!(cache.get(2, &[0, 1]), Some(vec![8, 8]));
        assert_eq!(cache.entries(), 2);

        cache.hash_cache(
            defaults[2].clone(),
            vec![8, 8],
            3,
            &[0, 0],
            &[0, 1],
            &interior,
            &defaults,
        );
        assert_eq!(cache.entries(), 0);
    }

    #[test]
    fn branch_minus_extremes_are_deterministic() {
        let defaults = defaults();

        let mut always = CacheBranchMinus::new(1.0);
        always.hash_cache(
            vec![9, 9],
            vec![8, 8],
            3,
            &[0, 0],
            &[0, 1],
            &interior,
            &defaults,
        );
        assert_eq!(always.entries(), 1);

        let mut never = CacheBranchMinus::new(0.0);
        never.hash_cache(
            vec![9, 9],
            vec![8, 8],
            3,
            &[0, 0],
            &[0, 1],
            &interior,
            &defaults,
        );
        assert_eq!(never.entries(), 0);
    }

    #[test]
    fn branch_minus_purges_even_on_rejection() {
        let defaults = defaults();
        let mut cache = CacheBranchMinus::new(1.0);
        cache.hash_cache(
            vec![9, 9],
            vec![8, 8],
            3,
            &[0, 0],
            &[0, 1],
            &interior,
            &defaults,
        );
        assert_eq!(cache.entries(), 1);

        // Dropping the probability to zero rejects the write but must still
        // purge the stale entry at the position.
        cache.probability = 0.0;
        cache.hash_cache(
            vec![9, 9],
            vec![7, 7],
            3,
            &[0, 0],
            &[0, 1],
            &interior,
            &defaults,
        );
        assert_eq!(cache.entries(), 0);
    }
}
