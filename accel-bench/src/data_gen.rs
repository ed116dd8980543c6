use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

/// Deterministic buffer content generator seeded for reproducible runs.
pub struct DataGenerator {
    rng: StdRng,
}

impl DataGenerator {
    /// Create a new generator with a fixed seed.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Generate `count` uniformly distributed bytes.
    pub fn bytes(&mut self, count: usize) -> Vec<u8> {
        let mut buffer = vec![0u8; count];
        self.rng.fill_bytes(&mut buffer);
        buffer
    }
}
