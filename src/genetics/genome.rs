//! Heritable trait vector: body color plus three fitness-relevant genes.

use crate::config::ReproductionConfig;
use crate::rng;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// One locus of the genome, used to target mutation bursts
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GeneTrait {
    Red,
    Green,
    Blue,
    Adaptability,
    Intelligence,
    Resilience,
}

impl GeneTrait {
    pub const ALL: [GeneTrait; 6] = [
        GeneTrait::Red,
        GeneTrait::Green,
        GeneTrait::Blue,
        GeneTrait::Adaptability,
        GeneTrait::Intelligence,
        GeneTrait::Resilience,
    ];
}

/// Genome of a cell
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Genome {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    /// Drives genetic compatibility between mates
    pub adaptability: f32,
    /// Scales learning, innovation and special food uptake
    pub intelligence: f32,
    /// Reduces metabolic cost and catastrophe damage
    pub resilience: f32,
}

impl Genome {
    /// Founder genome with bright colors and mid-range traits
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            r: rng.gen_range(100..=255),
            g: rng.gen_range(100..=255),
            b: rng.gen_range(100..=255),
            adaptability: rng::range(rng, 0.3, 0.9),
            intelligence: rng::range(rng, 0.3, 0.9),
            resilience: rng::range(rng, 0.4, 0.95),
        }
    }

    /// Parents' average plus symmetric jitter, each locus clamped to its range
    pub fn blend<R: Rng + ?Sized>(
        a: &Genome,
        b: &Genome,
        config: &ReproductionConfig,
        rng: &mut R,
    ) -> Genome {
        let color = |ca: u8, cb: u8, rng: &mut R| {
            let mean = (ca as f32 + cb as f32) / 2.0;
            clamp_color(mean + rng::jitter(rng, config.color_jitter))
        };
        let gene = |ga: f32, gb: f32, rng: &mut R| {
            ((ga + gb) / 2.0 + rng::jitter(rng, config.trait_jitter)).clamp(0.0, 1.0)
        };

        Genome {
            r: color(a.r, b.r, &mut *rng),
            g: color(a.g, b.g, &mut *rng),
            b: color(a.b, b.b, &mut *rng),
            adaptability: gene(a.adaptability, b.adaptability, &mut *rng),
            intelligence: gene(a.intelligence, b.intelligence, &mut *rng),
            resilience: gene(a.resilience, b.resilience, &mut *rng),
        }
    }

    /// Large mutation on one random locus; returns the locus that changed.
    /// `amount` is expressed on the [0, 1] scale and stretched for colors.
    pub fn mutation_burst<R: Rng + ?Sized>(&mut self, amount: f32, rng: &mut R) -> GeneTrait {
        let target = rng::pick(rng, &GeneTrait::ALL);
        let delta = rng::jitter(rng, amount);
        match target {
            GeneTrait::Red => self.r = clamp_color(self.r as f32 + delta * 255.0),
            GeneTrait::Green => self.g = clamp_color(self.g as f32 + delta * 255.0),
            GeneTrait::Blue => self.b = clamp_color(self.b as f32 + delta * 255.0),
            GeneTrait::Adaptability => {
                self.adaptability = (self.adaptability + delta).clamp(0.0, 1.0)
            }
            GeneTrait::Intelligence => {
                self.intelligence = (self.intelligence + delta).clamp(0.0, 1.0)
            }
            GeneTrait::Resilience => self.resilience = (self.resilience + delta).clamp(0.0, 1.0),
        }
        target
    }

    /// Adaptive hardening after surviving a catastrophe
    pub fn harden(&mut self, step: f32) {
        self.resilience = (self.resilience + step).clamp(0.0, 1.0);
    }

    /// Probability that two genomes produce offspring.
    /// Closer adaptability means higher compatibility.
    #[inline]
    pub fn compatibility(&self, other: &Genome) -> f32 {
        (1.0 - (self.adaptability - other.adaptability).abs()).clamp(0.0, 1.0)
    }

    #[inline]
    pub fn color(&self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }

    /// All continuous loci finite and inside [0, 1]
    pub fn is_valid(&self) -> bool {
        [self.adaptability, self.intelligence, self.resilience]
            .iter()
            .all(|v| v.is_finite() && (0.0..=1.0).contains(v))
    }
}

#[inline]
fn clamp_color(value: f32) -> u8 {
    value.floor().clamp(0.0, 255.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::seeded;

    #[test]
    fn test_random_genome_ranges() {
        let mut rng = seeded(3);
        for _ in 0..200 {
            let g = Genome::random(&mut rng);
            assert!(g.r >= 100 && g.g >= 100 && g.b >= 100);
            assert!((0.3..0.9).contains(&g.adaptability));
            assert!((0.3..0.9).contains(&g.intelligence));
            assert!((0.4..0.95).contains(&g.resilience));
        }
    }

    #[test]
    fn test_blend_stays_in_bounds() {
        let mut rng = seeded(11);
        let config = ReproductionConfig::default();
        let a = Genome {
            r: 255,
            g: 0,
            b: 250,
            adaptability: 1.0,
            intelligence: 0.0,
            resilience: 0.99,
        };
        let b = a.clone();
        for _ in 0..500 {
            let child = Genome::blend(&a, &b, &config, &mut rng);
            assert!(child.is_valid());
        }
    }

    #[test]
    fn test_blend_is_near_average() {
        let mut rng = seeded(5);
        let config = ReproductionConfig::default();
        let a = Genome {
            r: 100,
            g: 100,
            b: 100,
            adaptability: 0.2,
            intelligence: 0.4,
            resilience: 0.6,
        };
        let b = Genome {
            r: 200,
            g: 200,
            b: 200,
            adaptability: 0.4,
            intelligence: 0.6,
            resilience: 0.8,
        };
        let child = Genome::blend(&a, &b, &config, &mut rng);
        assert!((child.r as f32 - 150.0).abs() <= 11.0);
        assert!((child.adaptability - 0.3).abs() <= 0.05 + 1e-6);
        assert!((child.resilience - 0.7).abs() <= 0.05 + 1e-6);
    }

    #[test]
    fn test_mutation_burst_clamped() {
        let mut rng = seeded(8);
        let mut g = Genome::random(&mut rng);
        for _ in 0..1000 {
            g.mutation_burst(5.0, &mut rng);
            assert!(g.is_valid());
        }
    }

    #[test]
    fn test_compatibility() {
        let mut rng = seeded(2);
        let mut a = Genome::random(&mut rng);
        let mut b = a.clone();
        a.adaptability = 0.5;
        b.adaptability = 0.5;
        assert_eq!(a.compatibility(&b), 1.0);
        b.adaptability = 0.9;
        assert!((a.compatibility(&b) - 0.6).abs() < 1e-6);
    }

    #[test]
    fn test_harden_caps_at_one() {
        let mut rng = seeded(4);
        let mut g = Genome::random(&mut rng);
        g.resilience = 0.995;
        g.harden(0.01);
        assert_eq!(g.resilience, 1.0);
    }
}
