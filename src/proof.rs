//! Audit paths: generation and verification of membership and
//! non-membership proofs.
//!
//! An audit path carries the N sibling hashes along a key's leaf-to-root
//! path, ordered by height (index 0 is the leaf level's sibling). The same
//! path proves membership when verified with [`LeafValue::Set`] and
//! non-membership with [`LeafValue::Empty`]; which one holds is decided by
//! the root it reconstructs.

use crate::{
    bits::{bit_is_set, bit_split},
    keys::KeySet,
    traits::{Cache, TreeHash},
    tree::Smt,
    types::{Digest, LeafValue},
};
use derive_more::Deref;
use serde::{Deserialize, Serialize};

/// Sibling hashes along a key's path, ordered leaf-to-root.
///
/// Serializable so provers can ship paths to remote verifiers; the tree
/// itself never crosses a process boundary.
#[derive(Clone, Debug, PartialEq, Eq, Deref, Serialize, Deserialize)]
pub struct AuditPath {
    /// `siblings[h]` is the sibling hash at height `h`, i.e. the root of
    /// the subtree *not* taken when descending toward the key.
    #[deref]
    pub siblings: Vec<Digest>,
}

impl<H: TreeHash, C: Cache> Smt<H, C> {
    /// Builds the audit path for `key` in the subtree `(height, base)`
    /// holding the sorted keyset `d`. For the whole tree pass
    /// `(self.n(), self.base())`.
    ///
    /// Works for members and non-members alike: the path only depends on
    /// the key's bit string and the current tree contents.
    pub fn audit_path(&self, d: KeySet<'_>, height: u64, base: &[u8], key: &[u8]) -> AuditPath {
        AuditPath { siblings: self.collect_siblings(d, height, base, key) }
    }

    fn collect_siblings(
        &self,
        d: KeySet<'_>,
        height: u64,
        base: &[u8],
        key: &[u8],
    ) -> Vec<Digest> {
        if height == 0 {
            return Vec::new();
        }
        let split = bit_split(base, self.n() - height);
        let (l, r) = d.split(&split);

        if !bit_is_set(key, self.n() - height) {
            let mut path = self.collect_siblings(l, height - 1, base, key);
            path.push(self.root_hash(r, height - 1, &split));
            path
        } else {
            let mut path = self.collect_siblings(r, height - 1, &split, key);
            path.push(self.root_hash(l, height - 1, base));
            path
        }
    }

    /// Verifies that `ap` proves `key` to hold `value` under `root`.
    ///
    /// Malformed input (wrong sibling count, wrong key width, tampered
    /// hashes, wrong value, wrong root) uniformly yields `false`; no error
    /// channel leaks which part failed.
    pub fn verify_audit_path(
        &self,
        ap: &AuditPath,
        key: &[u8],
        value: LeafValue,
        root: &[u8],
    ) -> bool {
        if ap.siblings.len() as u64 != self.n() || key.len() as u64 * 8 != self.n() {
            return false;
        }
        let base = vec![0u8; (self.n() / 8) as usize];
        self.reconstruct(ap, self.n(), &base, key, value) == root
    }

    /// Rebuilds the root bottom-up from the leaf along the key's bit path,
    /// advancing the running base on every right descent.
    fn reconstruct(
        &self,
        ap: &AuditPath,
        height: u64,
        base: &[u8],
        key: &[u8],
        value: LeafValue,
    ) -> Digest {
        if height == 0 {
            return self.node_hasher().leaf(value, base);
        }
        let sibling = &ap.siblings[(height - 1) as usize];
        if !bit_is_set(key, self.n() - height) {
            self.node_hasher().interior(
                &self.reconstruct(ap, height - 1, base, key, value),
                sibling,
                height,
                base,
            )
        } else {
            let split = bit_split(base, self.n() - height);
            self.node_hasher().interior(
                sibling,
                &self.reconstruct(ap, height - 1, &split, key, value),
                height,
                base,
            )
        }
    }
}
