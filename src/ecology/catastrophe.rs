//! Area-of-effect hazards spawned by the environment.

use crate::rng;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Unique catastrophe identifier
pub type CatastropheId = u64;

/// Kinds of catastrophe; the kind fixes radius and duration
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CatastropheKind {
    Earthquake,
    Wildfire,
}

impl CatastropheKind {
    pub const ALL: [CatastropheKind; 2] = [CatastropheKind::Earthquake, CatastropheKind::Wildfire];

    pub fn radius(&self) -> f32 {
        match self {
            CatastropheKind::Earthquake => 100.0,
            CatastropheKind::Wildfire => 150.0,
        }
    }

    /// Lifetime in ticks
    pub fn duration(&self) -> u32 {
        match self {
            CatastropheKind::Earthquake => 100,
            CatastropheKind::Wildfire => 300,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            CatastropheKind::Earthquake => "Earthquake",
            CatastropheKind::Wildfire => "Wildfire",
        }
    }
}

/// An active hazard
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Catastrophe {
    pub id: CatastropheId,
    pub kind: CatastropheKind,
    pub x: f32,
    pub y: f32,
    pub radius: f32,
    pub duration: u32,
    /// Damage multiplier in [0.5, 1]
    pub intensity: f32,
    pub age: u32,
    pub active: bool,
}

impl Catastrophe {
    pub fn new(id: CatastropheId, kind: CatastropheKind, x: f32, y: f32, intensity: f32) -> Self {
        Self {
            id,
            kind,
            x,
            y,
            radius: kind.radius(),
            duration: kind.duration(),
            intensity: intensity.clamp(0.5, 1.0),
            age: 0,
            active: true,
        }
    }

    /// Random kind at a random location inside `width` x `height`
    pub fn random<R: Rng + ?Sized>(id: CatastropheId, width: f32, height: f32, rng: &mut R) -> Self {
        let kind = rng::pick(rng, &CatastropheKind::ALL);
        let x = rng::range(rng, 0.0, width);
        let y = rng::range(rng, 0.0, height);
        let intensity = rng.gen_range(0.5..=1.0);
        Self::new(id, kind, x, y, intensity)
    }

    /// Whether a point lies within the affected area
    #[inline]
    pub fn contains(&self, x: f32, y: f32) -> bool {
        let dx = x - self.x;
        let dy = y - self.y;
        dx * dx + dy * dy <= self.radius * self.radius
    }

    /// Raw damage dealt to a target with the given resilience
    #[inline]
    pub fn damage(&self, resilience: f32) -> f32 {
        self.intensity * (1.0 - resilience)
    }

    /// Age by one tick; deactivates once the duration is reached
    pub fn advance(&mut self) {
        self.age += 1;
        if self.age >= self.duration {
            self.active = false;
        }
    }

    /// Remaining strength in [0, 1] for fading out in renderers
    pub fn fade(&self) -> f32 {
        if self.duration == 0 {
            return 0.0;
        }
        1.0 - (self.age as f32 / self.duration as f32).min(1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::seeded;

    #[test]
    fn test_kind_parameters() {
        let quake = Catastrophe::new(0, CatastropheKind::Earthquake, 0.0, 0.0, 0.7);
        assert_eq!(quake.radius, 100.0);
        assert_eq!(quake.duration, 100);

        let fire = Catastrophe::new(1, CatastropheKind::Wildfire, 0.0, 0.0, 0.7);
        assert_eq!(fire.radius, 150.0);
        assert_eq!(fire.duration, 300);
    }

    #[test]
    fn test_random_intensity_range() {
        let mut rng = seeded(9);
        for i in 0..500 {
            let c = Catastrophe::random(i, 800.0, 600.0, &mut rng);
            assert!((0.5..=1.0).contains(&c.intensity));
            assert!(c.x >= 0.0 && c.x < 800.0);
            assert!(c.active);
            assert_eq!(c.age, 0);
        }
    }

    #[test]
    fn test_lifecycle() {
        let mut c = Catastrophe::new(0, CatastropheKind::Earthquake, 0.0, 0.0, 1.0);
        for _ in 0..99 {
            c.advance();
            assert!(c.active);
        }
        c.advance();
        assert_eq!(c.age, 100);
        assert!(!c.active);
        assert_eq!(c.fade(), 0.0);
    }

    #[test]
    fn test_wildfire_damage() {
        let fire = Catastrophe::new(0, CatastropheKind::Wildfire, 100.0, 100.0, 0.8);
        assert!((fire.damage(0.5) - 0.4).abs() < 1e-6);
        assert!(fire.contains(200.0, 100.0));
        assert!(fire.contains(250.0, 100.0));
        assert!(!fire.contains(251.0, 100.0));
    }
}
