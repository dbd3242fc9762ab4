//! Constants shared across the engine and cache strategies.

/// Probe input hashed once at construction to discover the oracle's output
/// width; the content is arbitrary.
pub(crate) const WIDTH_PROBE: &[u8] = b"smt";

/// Discretization of the probabilistic cache's write threshold: a draw is a
/// uniform integer in `[0, PROBABILITY_BUCKETS)` compared against
/// `p * PROBABILITY_BUCKETS`.
pub(crate) const PROBABILITY_BUCKETS: u32 = 100;
