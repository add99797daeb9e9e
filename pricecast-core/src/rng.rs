//! Deterministic seed derivation.
//!
//! A master seed expands into per-(label, index) sub-seeds via BLAKE3.
//! Derivation is hash-based rather than order-dependent, so the same master
//! seed produces identical sub-seeds regardless of the order in which paths
//! or tickers are processed; results stay bit-identical under any rayon
//! thread count.

use rand::rngs::StdRng;
use rand::SeedableRng;

/// Hash-expanded master seed.
#[derive(Debug, Clone, Copy)]
pub struct SeedSequence {
    master_seed: u64,
}

impl SeedSequence {
    pub fn new(master_seed: u64) -> Self {
        Self { master_seed }
    }

    pub fn master_seed(&self) -> u64 {
        self.master_seed
    }

    /// Derive the sub-seed for a (label, index) pair.
    pub fn sub_seed(&self, label: &str, index: u64) -> u64 {
        let mut hasher = blake3::Hasher::new();
        hasher.update(&self.master_seed.to_le_bytes());
        hasher.update(label.as_bytes());
        hasher.update(&index.to_le_bytes());
        let hash = hasher.finalize();
        let mut bytes = [0u8; 8];
        bytes.copy_from_slice(&hash.as_bytes()[..8]);
        u64::from_le_bytes(bytes)
    }

    /// Create a seeded StdRng for a (label, index) pair.
    pub fn rng_for(&self, label: &str, index: u64) -> StdRng {
        StdRng::seed_from_u64(self.sub_seed(label, index))
    }
}

/// Stable per-ticker seed for the synthetic fallback generator: the same
/// ticker always synthesizes the same series.
pub fn ticker_seed(ticker: &str) -> u64 {
    let hash = blake3::hash(ticker.as_bytes());
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&hash.as_bytes()[..8]);
    u64::from_le_bytes(bytes)
}
