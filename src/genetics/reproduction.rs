//! Pairwise reproduction - eligibility, compatibility and offspring synthesis.

use crate::cell::{Cell, CellId, Inheritance};
use crate::config::{Config, ReproductionConfig};
use crate::genetics::{Genome, SocialProfile};
use crate::rng;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Per-pass values shared by every mating attempt
#[derive(Clone, Copy, Debug)]
pub struct MatingContext {
    /// Energy each parent pays
    pub cost: f32,
    /// Live cells plus births already scheduled this tick
    pub headcount: usize,
    pub tick: u64,
}

/// Result of a single mating attempt
#[derive(Debug)]
pub enum MatingOutcome {
    Born(Box<Cell>),
    /// Eligibility rules not met
    Ineligible,
    /// Compatibility roll failed
    Incompatible,
    /// Population cap reached
    AtCapacity,
}

/// Reproduction accounting
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ReproductionSystem {
    pub total_births: u64,
    /// Eligible pairs whose compatibility roll failed
    pub failed_compatibility: u64,
    /// Eligible pairs turned away by the population cap
    pub blocked_by_cap: u64,
}

impl ReproductionSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if two cells can mate
    pub fn can_mate(a: &Cell, b: &Cell, cost: f32, config: &ReproductionConfig) -> bool {
        if a.id == b.id || !a.is_alive() || !b.is_alive() {
            return false;
        }

        // Must be close
        if a.distance_to_cell(b) >= config.proximity {
            return false;
        }

        if a.reproduction_cooldown > 0 || b.reproduction_cooldown > 0 {
            return false;
        }

        // Both must be able to pay
        a.energy > cost && b.energy > cost
    }

    /// Try to produce a child from two parents.
    /// On success both parents pay the cost and enter cooldown.
    pub fn attempt<R: Rng + ?Sized>(
        &mut self,
        a: &mut Cell,
        b: &mut Cell,
        child_id: CellId,
        ctx: MatingContext,
        config: &Config,
        rng: &mut R,
    ) -> MatingOutcome {
        if !Self::can_mate(a, b, ctx.cost, &config.reproduction) {
            return MatingOutcome::Ineligible;
        }

        if ctx.headcount >= config.safety.max_population {
            self.blocked_by_cap += 1;
            return MatingOutcome::AtCapacity;
        }

        if !rng::chance(rng, a.genome.compatibility(&b.genome)) {
            self.failed_compatibility += 1;
            return MatingOutcome::Incompatible;
        }

        let inheritance = Self::inherit(a, b, &config.reproduction, rng);
        let (x, y) = Self::birth_position(a, b, config, rng);

        for parent in [&mut *a, &mut *b] {
            parent.energy -= ctx.cost;
            parent.reproduction_cooldown = config.reproduction.cooldown;
            parent.offspring_count += 1;
        }

        self.total_births += 1;
        let child = Cell::offspring(child_id, x, y, inheritance, config, ctx.tick, rng);
        MatingOutcome::Born(Box::new(child))
    }

    /// Blend both parents into the heritable state of a child
    pub fn inherit<R: Rng + ?Sized>(
        a: &Cell,
        b: &Cell,
        config: &ReproductionConfig,
        rng: &mut R,
    ) -> Inheritance {
        let mut genome = Genome::blend(&a.genome, &b.genome, config, rng);
        if rng::chance(rng, config.mutation_burst_chance) {
            genome.mutation_burst(config.mutation_burst, rng);
        }

        let mut social = SocialProfile::average(&a.social, &b.social);
        social.evolve(rng);

        let metabolism_rate = (a.metabolism_rate + b.metabolism_rate) / 2.0
            + rng::jitter(rng, config.metabolism_jitter);

        Inheritance {
            genome,
            social,
            metabolism_rate,
            knowledge: config.knowledge_inheritance * (a.knowledge + b.knowledge),
            generation: a.generation.max(b.generation) + 1,
            parents: (a.id, b.id),
        }
    }

    /// Midpoint of the parents with a small offset, kept inside the world
    fn birth_position<R: Rng + ?Sized>(a: &Cell, b: &Cell, config: &Config, rng: &mut R) -> (f32, f32) {
        let jitter = config.reproduction.spawn_jitter;
        let r = config.cells.radius;
        let x = (a.x + b.x) / 2.0 + rng::jitter(rng, jitter);
        let y = (a.y + b.y) / 2.0 + rng::jitter(rng, jitter);
        (
            x.clamp(r, config.world.width - r),
            y.clamp(r, config.world.height - r),
        )
    }

    /// Share of compatibility rolls that produced a child
    pub fn success_rate(&self) -> f32 {
        let total = self.total_births + self.failed_compatibility;
        if total == 0 {
            0.0
        } else {
            self.total_births as f32 / total as f32
        }
    }
}
