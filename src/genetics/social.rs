//! Behavioral traits that drive tribe formation and resource sharing.

use crate::rng;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Step size of one random-walk move
const DRIFT: f32 = 0.1;

/// Social disposition of a cell, every trait in [0, 1]
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SocialProfile {
    /// Chance to seek partners and to succeed at founding a tribe
    pub cooperation: f32,
    pub aggression: f32,
    /// Chance to donate surplus resources to the tribe pool
    pub sharing: f32,
    pub learning: f32,
}

impl SocialProfile {
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            cooperation: rng::range(rng, 0.0, 1.0),
            aggression: rng::range(rng, 0.0, 1.0),
            sharing: rng::range(rng, 0.0, 1.0),
            learning: rng::range(rng, 0.0, 1.0),
        }
    }

    /// Trait-wise mean of two profiles
    pub fn average(a: &SocialProfile, b: &SocialProfile) -> Self {
        Self {
            cooperation: (a.cooperation + b.cooperation) / 2.0,
            aggression: (a.aggression + b.aggression) / 2.0,
            sharing: (a.sharing + b.sharing) / 2.0,
            learning: (a.learning + b.learning) / 2.0,
        }
    }

    /// Bounded random walk on every trait
    pub fn evolve<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        for value in [
            &mut self.cooperation,
            &mut self.aggression,
            &mut self.sharing,
            &mut self.learning,
        ] {
            *value = (*value + rng::jitter(rng, DRIFT)).clamp(0.0, 1.0);
        }
    }

    pub fn is_valid(&self) -> bool {
        [self.cooperation, self.aggression, self.sharing, self.learning]
            .iter()
            .all(|v| v.is_finite() && (0.0..=1.0).contains(v))
    }
}
