#![doc = include_str!("../README.md")]
#![deny(missing_docs)]

mod bits;
pub mod cache;
mod constant;
pub mod hasher;
pub mod keys;
pub mod proof;
pub mod traits;
pub mod tree;
pub mod types;

pub use cache::{CacheBranch, CacheBranchMinus, CacheBranchPlus, CacheNothing};
pub use hasher::{DigestHasher, Sha512Trunc256};
pub use keys::{KeySet, KeySetError};
pub use proof::AuditPath;
pub use traits::{Cache, TreeHash};
pub use tree::Smt;
pub use types::{Digest, LeafValue};
