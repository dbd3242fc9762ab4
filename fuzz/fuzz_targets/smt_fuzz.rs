#![no_main]

//! Differential fuzzing of the caching strategies.
//!
//! Each input byte is one operation against a small key pool: the high bit
//! selects insert or delete, the low bits pick the key. Every operation is
//! applied to a `CacheBranch` engine and the `CacheNothing` oracle; their
//! roots must stay identical, and an audit path for a probe key must verify
//! against the current root with the probe's true state.

use libfuzzer_sys::fuzz_target;
use smt::{
    CacheBranch, CacheNothing, Digest, KeySet, LeafValue, Sha512Trunc256, Smt, TreeHash,
};
use std::collections::BTreeSet;

const POOL_SIZE: usize = 64;
const MAX_OPS: usize = 48;

fuzz_target!(|data: &[u8]| {
    if data.is_empty() {
        return;
    }
    let oracle = Sha512Trunc256::new();
    let pool: Vec<Digest> =
        (0..POOL_SIZE as u16).map(|i| oracle.digest(&[&i.to_be_bytes()])).collect();

    let mut cached = Smt::new(&[0x42], CacheBranch::new(), Sha512Trunc256::new());
    let mut baseline = Smt::new(&[0x42], CacheNothing, Sha512Trunc256::new());
    let (n, base) = (cached.n(), cached.base().to_vec());

    let mut live: BTreeSet<Digest> = BTreeSet::new();
    for &op in data.iter().take(MAX_OPS) {
        let key = pool[(op & 0x3f) as usize].clone();
        let value = if op & 0x80 == 0 { LeafValue::Set } else { LeafValue::Empty };
        match value {
            LeafValue::Set => live.insert(key.clone()),
            LeafValue::Empty => live.remove(&key),
        };

        // BTreeSet iterates in ascending byte order, which is exactly the
        // sortedness the engine requires.
        let state: Vec<Digest> = live.iter().cloned().collect();
        let d = KeySet::new(&state).unwrap();
        let touched = vec![key];
        let keys = KeySet::new(&touched).unwrap();

        let root = cached.update(d, keys, n, &base, value);
        assert_eq!(
            root,
            baseline.update(d, keys, n, &base, value),
            "cached root diverged from the no-cache oracle"
        );

        let probe = &pool[((op >> 1) & 0x3f) as usize];
        let expected =
            if live.contains(probe) { LeafValue::Set } else { LeafValue::Empty };
        let ap = cached.audit_path(d, n, &base, probe);
        assert!(
            baseline.verify_audit_path(&ap, probe, expected, &root),
            "audit path from the cached engine failed verification"
        );
    }
});
