//! Random number generation for layout walks
//!
//! Uses a seeded ChaCha RNG so a seed fully determines a layout.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// Source of the uniform rolls the walk consumes.
///
/// Every random decision of the generator goes through `rn2`, so a test can
/// script the walk by implementing this trait.
pub trait WalkRng {
    /// Returns a value in `0..n`, or 0 if `n` is 0.
    fn rn2(&mut self, n: u32) -> u32;

    /// Seed that reproduces this stream, when there is one
    fn seed(&self) -> Option<u64> {
        None
    }

    /// Returns a value in `lo..=hi`.
    fn range_inclusive(&mut self, lo: u32, hi: u32) -> u32 {
        if hi <= lo {
            return lo;
        }
        lo + self.rn2(hi - lo + 1)
    }

    /// Uniform pick from `items`, `None` when empty
    fn choose<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T>
    where
        Self: Sized,
    {
        if items.is_empty() {
            None
        } else {
            items.get(self.rn2(items.len() as u32) as usize)
        }
    }
}

/// Layout random number generator
///
/// Wraps ChaCha8Rng. Only the seed is serialized; deserializing restarts the
/// stream from that seed.
#[derive(Debug, Clone)]
pub struct LayoutRng {
    rng: ChaCha8Rng,
    seed: u64,
}

impl Serialize for LayoutRng {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.seed.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for LayoutRng {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let seed = u64::deserialize(deserializer)?;
        Ok(LayoutRng::new(seed))
    }
}

impl LayoutRng {
    /// Stream fully determined by `seed`
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    /// Stream with a freshly drawn seed
    pub fn from_entropy() -> Self {
        Self::new(rand::random())
    }

    /// Seed the stream started from
    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl WalkRng for LayoutRng {
    fn rn2(&mut self, n: u32) -> u32 {
        if n == 0 {
            return 0;
        }
        self.rng.gen_range(0..n)
    }

    fn seed(&self) -> Option<u64> {
        Some(self.seed)
    }
}

impl Default for LayoutRng {
    fn default() -> Self {
        Self::from_entropy()
    }
}
