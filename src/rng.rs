//! Random sampling helpers shared by every stochastic rule.
//!
//! All simulation randomness flows through a [`SimRng`] owned by the world so
//! tests can swap in a deterministic generator.

use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

/// Injectable random source owned by the world
pub type SimRng = Box<dyn RngCore + Send>;

/// Seeded ChaCha generator, the default source
pub fn seeded(seed: u64) -> SimRng {
    Box::new(ChaCha8Rng::seed_from_u64(seed))
}

/// Fresh seed drawn from the thread-local entropy source
pub fn entropy_seed() -> u64 {
    rand::thread_rng().gen()
}

/// Uniform sample in `[min, max)`. Collapses to `min` for an empty range.
#[inline]
pub fn range<R: Rng + ?Sized>(rng: &mut R, min: f32, max: f32) -> f32 {
    if max <= min {
        return min;
    }
    rng.gen_range(min..max)
}

/// Symmetric jitter in `[-amount, amount)`
#[inline]
pub fn jitter<R: Rng + ?Sized>(rng: &mut R, amount: f32) -> f32 {
    range(rng, -amount, amount)
}

/// Bernoulli trial with probability `p` (values outside `[0, 1]` saturate)
#[inline]
pub fn chance<R: Rng + ?Sized>(rng: &mut R, p: f32) -> bool {
    if p <= 0.0 {
        return false;
    }
    rng.gen::<f32>() < p
}

/// Uniformly pick one of `items`. Panics on an empty slice.
#[inline]
pub fn pick<R: Rng + ?Sized, T: Copy>(rng: &mut R, items: &[T]) -> T {
    items[rng.gen_range(0..items.len())]
}
