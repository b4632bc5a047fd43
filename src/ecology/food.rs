//! Food items scattered over the world.

use crate::config::WorldConfig;
use crate::rng;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Unique food identifier
pub type FoodId = u64;

/// Food kinds
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FoodKind {
    Normal,
    /// Yields bonus energy and may teach the eater something
    Special,
}

impl FoodKind {
    /// Energy multiplier applied on consumption
    pub fn energy_multiplier(&self) -> f32 {
        match self {
            FoodKind::Normal => 1.0,
            FoodKind::Special => 1.5,
        }
    }

    /// Display color as RGB
    pub fn color(&self) -> [u8; 3] {
        match self {
            FoodKind::Normal => [0, 255, 0],
            FoodKind::Special => [255, 215, 0],
        }
    }
}

/// A consumable food item
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Food {
    pub id: FoodId,
    pub x: f32,
    pub y: f32,
    /// Base energy yield
    pub energy: f32,
    pub radius: f32,
    pub kind: FoodKind,
}

impl Food {
    pub fn new(id: FoodId, x: f32, y: f32, kind: FoodKind, config: &WorldConfig) -> Self {
        Self {
            id,
            x,
            y,
            energy: config.food_energy,
            radius: config.food_radius,
            kind,
        }
    }

    /// Food at a random position; special with the configured probability
    pub fn random<R: Rng + ?Sized>(id: FoodId, config: &WorldConfig, rng: &mut R) -> Self {
        let x = rng::range(rng, 0.0, config.width);
        let y = rng::range(rng, 0.0, config.height);
        let kind = if rng::chance(rng, config.special_food_chance) {
            FoodKind::Special
        } else {
            FoodKind::Normal
        };
        Self::new(id, x, y, kind, config)
    }

    /// Energy granted to whoever eats this item
    #[inline]
    pub fn yield_energy(&self) -> f32 {
        self.energy * self.kind.energy_multiplier()
    }
}
