//! Seedable randomness for cosmetic score variance.

use std::ops::Range;
use std::sync::Mutex;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Shared random source. A fixed seed makes every mock result reproducible.
pub struct SeededRandom {
    rng: Mutex<StdRng>,
}

impl SeededRandom {
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            rng: Mutex::new(rng),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self::new(Some(seed))
    }

    fn with_rng<T>(&self, f: impl FnOnce(&mut StdRng) -> T) -> T {
        let mut rng = self.rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        f(&mut rng)
    }

    /// Integer in the half-open `range`.
    pub fn int_in(&self, range: Range<u8>) -> u8 {
        self.with_rng(|rng| rng.gen_range(range))
    }

    pub fn float_in(&self, range: Range<f64>) -> f64 {
        self.with_rng(|rng| rng.gen_range(range))
    }

    /// Signed offset in `-spread..=spread`.
    pub fn jitter(&self, spread: i16) -> i16 {
        self.with_rng(|rng| rng.gen_range(-spread..=spread))
    }

    pub fn chance(&self, probability: f64) -> bool {
        self.with_rng(|rng| rng.gen_bool(probability))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_sequence() {
        let a = SeededRandom::seeded(42);
        let b = SeededRandom::seeded(42);
        let seq_a: Vec<u8> = (0..8).map(|_| a.int_in(45..75)).collect();
        let seq_b: Vec<u8> = (0..8).map(|_| b.int_in(45..75)).collect();
        assert_eq!(seq_a, seq_b);
        assert!(seq_a.iter().all(|v| (45..75).contains(v)));
    }
}
