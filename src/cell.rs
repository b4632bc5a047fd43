//! Cell structure and behavior.
//!
//! A cell only mutates itself. Anything that needs other cells (tribe
//! formation, healer lookup, reproduction) is resolved by the world and
//! handed in as plain values.

use crate::config::{CatastropheConfig, Config, TribeConfig, WorldConfig};
use crate::ecology::{Catastrophe, Environment, Food, FoodKind};
use crate::genetics::{Genome, SocialProfile};
use crate::rng;
use crate::tribe::TribeId;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Unique cell identifier, never reused within a run
pub type CellId = u64;

/// Role a cell plays in its tribe, fixed at birth
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Specialization {
    #[default]
    None,
    Gatherer,
    Hunter,
    Builder,
    Healer,
}

impl Specialization {
    pub const ROLES: [Specialization; 4] = [
        Specialization::Gatherer,
        Specialization::Hunter,
        Specialization::Builder,
        Specialization::Healer,
    ];

    /// No role unless the `chance` roll succeeds, then a uniform role
    pub fn random<R: Rng + ?Sized>(chance: f32, rng: &mut R) -> Self {
        if rng::chance(rng, chance) {
            rng::pick(rng, &Self::ROLES)
        } else {
            Specialization::None
        }
    }

    /// Multiplier on the resource gathering probability
    pub fn gather_multiplier(&self) -> f32 {
        match self {
            Specialization::Gatherer => 2.0,
            Specialization::None
            | Specialization::Hunter
            | Specialization::Builder
            | Specialization::Healer => 1.0,
        }
    }

    pub fn can_heal(&self) -> bool {
        matches!(self, Specialization::Healer)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Specialization::None => "none",
            Specialization::Gatherer => "gatherer",
            Specialization::Hunter => "hunter",
            Specialization::Builder => "builder",
            Specialization::Healer => "healer",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResourceKind {
    Food,
    Material,
    Tool,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 3] = [ResourceKind::Food, ResourceKind::Material, ResourceKind::Tool];
}

/// A gathered resource; immutable once acquired
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    pub kind: ResourceKind,
    pub value: f32,
    pub scarcity_at_acquisition: f32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InnovationKind {
    Tool,
    Technique,
    Social,
}

impl InnovationKind {
    pub const ALL: [InnovationKind; 3] = [
        InnovationKind::Tool,
        InnovationKind::Technique,
        InnovationKind::Social,
    ];
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Innovation {
    pub kind: InnovationKind,
    pub value: f32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Disease {
    /// Energy drain factor per tick
    pub severity: f32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Health {
    /// Resistance to contracting diseases, in [0.5, 1)
    pub immunity: f32,
    pub injuries: f32,
    pub diseases: Vec<Disease>,
}

impl Health {
    #[inline]
    pub fn needs_care(&self) -> bool {
        self.injuries > 0.0 || !self.diseases.is_empty()
    }
}

/// Cause of death tracking
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeathCause {
    Starvation,
    OldAge,
    /// Non-finite state; removed instead of corrupting the world
    Malformed,
}

impl DeathCause {
    pub fn name(&self) -> &'static str {
        match self {
            DeathCause::Starvation => "starvation",
            DeathCause::OldAge => "old_age",
            DeathCause::Malformed => "malformed",
        }
    }
}

/// Position of a tribe healer as seen at the start of the agent phase
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HealerRef {
    pub id: CellId,
    pub x: f32,
    pub y: f32,
}

/// Behavior selected by [`Cell::think`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Behavior {
    Idle,
    /// Steering toward the nearest food
    Foraging,
    SeekingHealer,
    /// Treated by a healer this tick
    Healed,
    Gathering,
}

/// Result of one decision step
#[derive(Debug, Clone, PartialEq)]
pub struct ThinkOutcome {
    pub behavior: Behavior,
    pub learned: bool,
    pub innovation: Option<Innovation>,
}

/// Everything a newborn inherits from its parents
#[derive(Debug, Clone)]
pub struct Inheritance {
    pub genome: Genome,
    pub social: SocialProfile,
    pub metabolism_rate: f32,
    pub knowledge: f32,
    pub generation: u32,
    pub parents: (CellId, CellId),
}

/// Allowed range of the heritable metabolism rate
pub const METABOLISM_RANGE: (f32, f32) = (0.02, 0.2);

/// A cell in the simulation
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Cell {
    // Identity
    pub id: CellId,
    pub generation: u32,
    pub parents: Option<(CellId, CellId)>,
    pub born_at: u64,

    // Physical state
    pub x: f32,
    pub y: f32,
    pub dx: f32,
    pub dy: f32,
    pub radius: f32,
    pub energy: f32,
    pub age: f32,
    pub metabolism_rate: f32,

    // Heredity and disposition
    pub genome: Genome,
    pub social: SocialProfile,
    pub specialization: Specialization,

    // Culture
    pub knowledge: f32,
    pub resources: Vec<Resource>,
    pub innovations: Vec<Innovation>,
    pub tribe: Option<TribeId>,

    pub health: Health,
    pub reproduction_cooldown: u32,

    // Statistics
    pub offspring_count: u32,
    pub food_eaten: u32,
    pub cause_of_death: Option<DeathCause>,
}

impl Cell {
    /// Founder cell with random genome and disposition
    pub fn new<R: Rng + ?Sized>(id: CellId, x: f32, y: f32, config: &Config, tick: u64, rng: &mut R) -> Self {
        let genome = Genome::random(rng);
        let social = SocialProfile::random(rng);
        let metabolism_rate = rng::range(rng, 0.02, 0.08);
        let mut cell = Self::blank(id, x, y, genome, social, metabolism_rate, config, tick, rng);
        cell.energy = config.cells.initial_energy;
        cell
    }

    /// Newborn cell carrying its parents' inheritance
    pub fn offspring<R: Rng + ?Sized>(
        id: CellId,
        x: f32,
        y: f32,
        inheritance: Inheritance,
        config: &Config,
        tick: u64,
        rng: &mut R,
    ) -> Self {
        let metabolism_rate = inheritance
            .metabolism_rate
            .clamp(METABOLISM_RANGE.0, METABOLISM_RANGE.1);
        let mut cell = Self::blank(
            id,
            x,
            y,
            inheritance.genome,
            inheritance.social,
            metabolism_rate,
            config,
            tick,
            rng,
        );
        cell.energy = config.reproduction.birth_energy;
        cell.knowledge = inheritance.knowledge.max(0.0);
        cell.generation = inheritance.generation;
        cell.parents = Some(inheritance.parents);
        cell
    }

    #[allow(clippy::too_many_arguments)]
    fn blank<R: Rng + ?Sized>(
        id: CellId,
        x: f32,
        y: f32,
        genome: Genome,
        social: SocialProfile,
        metabolism_rate: f32,
        config: &Config,
        tick: u64,
        rng: &mut R,
    ) -> Self {
        Self {
            id,
            generation: 0,
            parents: None,
            born_at: tick,
            x,
            y,
            dx: rng::range(rng, -1.0, 1.0),
            dy: rng::range(rng, -1.0, 1.0),
            radius: config.cells.radius,
            energy: config.cells.initial_energy,
            age: 0.0,
            metabolism_rate,
            genome,
            social,
            specialization: Specialization::random(config.cells.specialization_chance, rng),
            knowledge: 0.0,
            resources: Vec::new(),
            innovations: Vec::new(),
            tribe: None,
            health: Health {
                immunity: rng::range(rng, 0.5, 1.0),
                injuries: 0.0,
                diseases: Vec::new(),
            },
            reproduction_cooldown: 0,
            offspring_count: 0,
            food_eaten: 0,
            cause_of_death: None,
        }
    }

    /// Energy burned this tick at the given temperature stress
    #[inline]
    pub fn metabolic_cost(&self, temperature_stress: f32) -> f32 {
        self.metabolism_rate * (1.0 - self.genome.resilience * 0.5) * (1.0 + temperature_stress)
    }

    /// Aging, metabolism and movement
    pub fn update_physics<R: Rng + ?Sized>(&mut self, environment: &Environment, config: &Config, rng: &mut R) {
        self.age += config.cells.age_increment;
        self.energy -= self.metabolic_cost(environment.temperature_stress());

        self.x += self.dx;
        self.y += self.dy;

        self.dx += rng::jitter(rng, config.cells.velocity_jitter);
        self.dy += rng::jitter(rng, config.cells.velocity_jitter);
        self.limit_speed(config.cells.max_speed);

        self.bounce(config.world.width, config.world.height);
    }

    /// Scale velocity down to `max_speed` if it is faster
    pub fn limit_speed(&mut self, max_speed: f32) {
        let speed = self.dx.hypot(self.dy);
        if speed > max_speed {
            self.dx = self.dx / speed * max_speed;
            self.dy = self.dy / speed * max_speed;
        }
    }

    /// Keep the body inside the world and reflect off the walls
    pub fn bounce(&mut self, width: f32, height: f32) {
        let (min_x, max_x) = (self.radius, width - self.radius);
        let (min_y, max_y) = (self.radius, height - self.radius);

        if self.x < min_x {
            self.x = min_x;
            self.dx = self.dx.abs();
        } else if self.x > max_x {
            self.x = max_x;
            self.dx = -self.dx.abs();
        }

        if self.y < min_y {
            self.y = min_y;
            self.dy = self.dy.abs();
        } else if self.y > max_y {
            self.y = max_y;
            self.dy = -self.dy.abs();
        }
    }

    /// Take damage from a catastrophe covering this cell and flee from it.
    /// Returns false when the catastrophe does not reach the cell.
    pub fn expose_to<R: Rng + ?Sized>(
        &mut self,
        catastrophe: &Catastrophe,
        config: &CatastropheConfig,
        max_speed: f32,
        rng: &mut R,
    ) -> bool {
        if !catastrophe.active || !catastrophe.contains(self.x, self.y) {
            return false;
        }

        let damage = catastrophe.damage(self.genome.resilience);
        self.energy -= damage * config.energy_damage_scale;
        self.health.injuries += damage;

        let away_x = self.x - catastrophe.x;
        let away_y = self.y - catastrophe.y;
        let dist = away_x.hypot(away_y);
        if dist > f32::EPSILON {
            self.dx = away_x / dist * max_speed;
            self.dy = away_y / dist * max_speed;
        } else {
            let angle = rng::range(rng, 0.0, std::f32::consts::TAU);
            self.dx = angle.cos() * max_speed;
            self.dy = angle.sin() * max_speed;
        }

        if rng::chance(rng, config.hardening_chance) {
            self.genome.harden(config.hardening_step);
        }

        true
    }

    /// Whether the food item is within contact range
    #[inline]
    pub fn touches(&self, food: &Food) -> bool {
        self.distance_to(food.x, food.y) <= self.radius + food.radius
    }

    /// Consume a food item. Returns the knowledge gained, if any.
    pub fn eat<R: Rng + ?Sized>(&mut self, food: &Food, config: &WorldConfig, rng: &mut R) -> f32 {
        self.energy += food.yield_energy();
        self.food_eaten += 1;

        if food.kind == FoodKind::Special && rng::chance(rng, self.genome.intelligence) {
            self.knowledge += config.special_food_knowledge;
            config.special_food_knowledge
        } else {
            0.0
        }
    }

    /// Priority-ordered decision, then independent learning and innovation
    pub fn think<R: Rng + ?Sized>(
        &mut self,
        foods: &[Food],
        healer: Option<HealerRef>,
        scarcity: f32,
        config: &Config,
        rng: &mut R,
    ) -> ThinkOutcome {
        let behavior = if self.energy < config.cells.hunger_threshold {
            self.seek_food(foods)
        } else if self.health.needs_care() {
            // Without a healer the cell idles this tick
            self.seek_healing(healer, &config.tribes)
        } else if self.energy > config.cells.gather_threshold
            && self.resources.len() < config.cells.max_resources
        {
            self.gather(scarcity, config, rng);
            Behavior::Gathering
        } else {
            Behavior::Idle
        };

        let learned = if rng::chance(rng, self.genome.intelligence) {
            self.learn();
            true
        } else {
            false
        };

        let innovation = if rng::chance(rng, self.genome.intelligence * 0.1) {
            self.try_innovate(rng)
        } else {
            None
        };

        ThinkOutcome {
            behavior,
            learned,
            innovation,
        }
    }

    /// Steer toward the nearest food item
    pub fn seek_food(&mut self, foods: &[Food]) -> Behavior {
        let nearest = foods
            .iter()
            .map(|f| (f, self.distance_to(f.x, f.y)))
            .min_by(|a, b| a.1.total_cmp(&b.1));

        match nearest {
            Some((food, dist)) => {
                if dist > f32::EPSILON {
                    self.dx = (food.x - self.x) / dist;
                    self.dy = (food.y - self.y) / dist;
                }
                Behavior::Foraging
            }
            None => Behavior::Idle,
        }
    }

    /// Get treated by a healer when close enough, otherwise walk to them
    pub fn seek_healing(&mut self, healer: Option<HealerRef>, config: &TribeConfig) -> Behavior {
        let Some(healer) = healer else {
            return Behavior::Idle;
        };

        let dist = self.distance_to(healer.x, healer.y);
        if dist < config.healing_range {
            self.health.injuries *= config.injury_recovery;
            self.health.diseases.clear();
            Behavior::Healed
        } else {
            self.dx = (healer.x - self.x) / dist;
            self.dy = (healer.y - self.y) / dist;
            Behavior::SeekingHealer
        }
    }

    /// Try to gather a resource; harder when resources are scarce
    pub fn gather<R: Rng + ?Sized>(&mut self, scarcity: f32, config: &Config, rng: &mut R) -> bool {
        let probability =
            config.cells.gather_rate / scarcity.max(f32::EPSILON) * self.specialization.gather_multiplier();
        if !rng::chance(rng, probability) {
            return false;
        }

        self.resources.push(Resource {
            kind: rng::pick(rng, &ResourceKind::ALL),
            value: rng::range(rng, 10.0, 30.0),
            scarcity_at_acquisition: scarcity,
        });
        true
    }

    /// Knowledge grows with intelligence
    pub fn learn(&mut self) {
        self.knowledge += 0.1 * self.genome.intelligence;
    }

    /// Innovation succeeds more often for knowledgeable cells
    pub fn try_innovate<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<Innovation> {
        if !rng::chance(rng, 0.01 * self.knowledge) {
            return None;
        }
        let innovation = Innovation {
            kind: rng::pick(rng, &InnovationKind::ALL),
            value: rng::range(rng, 0.1, 1.0),
        };
        self.innovations.push(innovation.clone());
        Some(innovation)
    }

    /// Move reproduction cooldown toward zero
    #[inline]
    pub fn tick_cooldown(&mut self) {
        self.reproduction_cooldown = self.reproduction_cooldown.saturating_sub(1);
    }

    /// Disease contraction and drain. Returns true when a disease was caught.
    pub fn update_health<R: Rng + ?Sized>(&mut self, config: &Config, rng: &mut R) -> bool {
        let contracted = rng::chance(rng, config.cells.disease_chance * (1.0 - self.health.immunity));
        if contracted {
            self.health.diseases.push(Disease {
                severity: rng::range(rng, 0.1, 0.5),
            });
        }

        let burden: f32 = self.health.diseases.iter().map(|d| d.severity).sum();
        self.energy -= burden * config.cells.disease_drain;
        contracted
    }

    /// Occasional passive energy intake
    pub fn passive_gain<R: Rng + ?Sized>(&mut self, config: &Config, rng: &mut R) {
        if rng::chance(rng, config.cells.passive_gain_chance) {
            self.energy += config.cells.passive_gain;
        }
    }

    /// Why this cell should be removed, if it should
    pub fn death_cause(&self, config: &Config) -> Option<DeathCause> {
        if !self.is_well_formed() {
            Some(DeathCause::Malformed)
        } else if self.energy <= 0.0 {
            Some(DeathCause::Starvation)
        } else if self.age >= config.cells.max_age {
            Some(DeathCause::OldAge)
        } else {
            None
        }
    }

    /// All continuous state finite and every trait inside its bounds
    pub fn is_well_formed(&self) -> bool {
        [
            self.x,
            self.y,
            self.dx,
            self.dy,
            self.energy,
            self.age,
            self.knowledge,
            self.health.injuries,
        ]
        .iter()
        .all(|v| v.is_finite())
            && self.genome.is_valid()
            && self.social.is_valid()
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.cause_of_death.is_none()
    }

    #[inline]
    pub fn distance_to(&self, x: f32, y: f32) -> f32 {
        (self.x - x).hypot(self.y - y)
    }

    #[inline]
    pub fn distance_to_cell(&self, other: &Cell) -> f32 {
        self.distance_to(other.x, other.y)
    }

    #[inline]
    pub fn speed(&self) -> f32 {
        self.dx.hypot(self.dy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EnvironmentConfig;
    use crate::ecology::CatastropheKind;
    use crate::rng::seeded;
    use rand::rngs::mock::StepRng;

    fn test_cell(config: &Config) -> Cell {
        let mut rng = seeded(42);
        let mut cell = Cell::new(1, 100.0, 100.0, config, 0, &mut rng);
        cell.health.injuries = 0.0;
        cell
    }

    #[test]
    fn test_cell_creation() {
        let config = Config::default();
        let cell = test_cell(&config);

        assert_eq!(cell.id, 1);
        assert_eq!(cell.energy, 150.0);
        assert_eq!(cell.generation, 0);
        assert!(cell.is_alive());
        assert!(cell.is_well_formed());
        assert!((0.02..0.08).contains(&cell.metabolism_rate));
    }

    #[test]
    fn test_physics_burns_energy_and_ages() {
        let config = Config::default();
        let env = Environment::new(&EnvironmentConfig::default());
        let mut rng = seeded(1);
        let mut cell = test_cell(&config);
        let expected = cell.metabolic_cost(env.temperature_stress());

        cell.update_physics(&env, &config, &mut rng);

        assert!((cell.energy - (150.0 - expected)).abs() < 1e-4);
        assert!((cell.age - 0.02).abs() < 1e-6);
        assert!(cell.speed() <= config.cells.max_speed + 1e-4);
    }

    #[test]
    fn test_cold_costs_more() {
        let config = Config::default();
        let cell = test_cell(&config);
        assert!(cell.metabolic_cost(0.2) > cell.metabolic_cost(0.0));
    }

    #[test]
    fn test_speed_limited() {
        let config = Config::default();
        let mut cell = test_cell(&config);
        cell.dx = 30.0;
        cell.dy = -40.0;
        cell.limit_speed(2.0);
        assert!((cell.speed() - 2.0).abs() < 1e-4);
    }

    #[test]
    fn test_bounce_reflects_velocity() {
        let config = Config::default();
        let mut cell = test_cell(&config);
        cell.x = 1.0;
        cell.dx = -1.5;
        cell.y = config.world.height + 3.0;
        cell.dy = 0.5;
        cell.bounce(config.world.width, config.world.height);

        assert_eq!(cell.x, cell.radius);
        assert_eq!(cell.dx, 1.5);
        assert_eq!(cell.y, config.world.height - cell.radius);
        assert_eq!(cell.dy, -0.5);
    }

    #[test]
    fn test_wildfire_damage_scenario() {
        let config = Config::default();
        let mut cell = test_cell(&config);
        cell.genome.resilience = 0.5;
        let fire = Catastrophe::new(0, CatastropheKind::Wildfire, 120.0, 100.0, 0.8);

        let hit = cell.expose_to(&fire, &config.catastrophes, config.cells.max_speed, &mut seeded(3));

        assert!(hit);
        assert!((cell.energy - 146.0).abs() < 1e-4);
        assert!((cell.health.injuries - 0.4).abs() < 1e-6);
        // Fleeing directly away (the fire is to the east)
        assert!((cell.dx + 2.0).abs() < 1e-4);
        assert!(cell.dy.abs() < 1e-4);
    }

    #[test]
    fn test_catastrophe_out_of_range() {
        let config = Config::default();
        let mut cell = test_cell(&config);
        let quake = Catastrophe::new(0, CatastropheKind::Earthquake, 500.0, 500.0, 1.0);
        assert!(!cell.expose_to(&quake, &config.catastrophes, 2.0, &mut seeded(3)));
        assert_eq!(cell.energy, 150.0);
    }

    #[test]
    fn test_eating_special_food() {
        let config = Config::default();
        let mut cell = test_cell(&config);
        let food = Food::new(0, 102.0, 100.0, FoodKind::Special, &config.world);
        assert!(cell.touches(&food));

        // Zero generator passes every probability gate
        let gained = cell.eat(&food, &config.world, &mut StepRng::new(0, 0));
        assert_eq!(cell.energy, 150.0 + 105.0);
        assert_eq!(gained, config.world.special_food_knowledge);
        assert_eq!(cell.knowledge, config.world.special_food_knowledge);
    }

    #[test]
    fn test_hungry_cell_seeks_food() {
        let config = Config::default();
        let mut cell = test_cell(&config);
        cell.energy = 10.0;
        let foods = vec![
            Food::new(0, 400.0, 100.0, FoodKind::Normal, &config.world),
            Food::new(1, 100.0, 160.0, FoodKind::Normal, &config.world),
        ];

        let outcome = cell.think(&foods, None, 1.0, &config, &mut seeded(5));

        assert_eq!(outcome.behavior, Behavior::Foraging);
        assert!(cell.dx.abs() < 1e-5);
        assert!((cell.dy - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_injured_cell_is_healed_when_adjacent() {
        let config = Config::default();
        let mut cell = test_cell(&config);
        cell.health.injuries = 1.0;
        cell.health.diseases.push(Disease { severity: 0.3 });
        let healer = HealerRef {
            id: 2,
            x: 110.0,
            y: 100.0,
        };

        let behavior = cell.seek_healing(Some(healer), &config.tribes);

        assert_eq!(behavior, Behavior::Healed);
        assert!((cell.health.injuries - 0.9).abs() < 1e-6);
        assert!(cell.health.diseases.is_empty());
    }

    #[test]
    fn test_injured_cell_walks_to_distant_healer() {
        let config = Config::default();
        let mut cell = test_cell(&config);
        cell.health.injuries = 1.0;
        let healer = HealerRef {
            id: 2,
            x: 100.0,
            y: 300.0,
        };

        let behavior = cell.seek_healing(Some(healer), &config.tribes);

        assert_eq!(behavior, Behavior::SeekingHealer);
        assert_eq!(cell.health.injuries, 1.0);
        assert!((cell.dy - 1.0).abs() < 1e-5);
        assert_eq!(cell.seek_healing(None, &config.tribes), Behavior::Idle);
    }

    #[test]
    fn test_gathering_with_forced_rolls() {
        let config = Config::default();
        let mut cell = test_cell(&config);
        cell.energy = 120.0;

        let outcome = cell.think(&[], None, 0.5, &config, &mut StepRng::new(0, 0));

        assert_eq!(outcome.behavior, Behavior::Gathering);
        assert_eq!(cell.resources.len(), 1);
        assert_eq!(cell.resources[0].scarcity_at_acquisition, 0.5);
        assert!(outcome.learned);
        assert!(cell.knowledge > 0.0);
    }

    #[test]
    fn test_injured_cell_without_healer_does_not_gather() {
        let config = Config::default();
        let mut cell = test_cell(&config);
        cell.energy = 120.0;
        cell.health.injuries = 0.4;

        let outcome = cell.think(&[], None, 0.5, &config, &mut StepRng::new(0, 0));

        assert_eq!(outcome.behavior, Behavior::Idle);
        assert!(cell.resources.is_empty());
        assert_eq!(cell.health.injuries, 0.4);
    }

    #[test]
    fn test_innovation_requires_knowledge() {
        let config = Config::default();
        let mut cell = test_cell(&config);
        let mut rng = StepRng::new(0, 0);

        cell.knowledge = 0.0;
        assert!(cell.try_innovate(&mut rng).is_none());

        cell.knowledge = 10.0;
        let innovation = cell.try_innovate(&mut rng).unwrap();
        assert_eq!(cell.innovations.len(), 1);
        assert!((0.1..1.0).contains(&innovation.value));
    }

    #[test]
    fn test_cooldown_never_negative() {
        let config = Config::default();
        let mut cell = test_cell(&config);
        cell.reproduction_cooldown = 2;
        for _ in 0..5 {
            cell.tick_cooldown();
        }
        assert_eq!(cell.reproduction_cooldown, 0);
    }

    #[test]
    fn test_death_causes() {
        let config = Config::default();
        let mut cell = test_cell(&config);
        assert_eq!(cell.death_cause(&config), None);

        cell.energy = 0.0;
        assert_eq!(cell.death_cause(&config), Some(DeathCause::Starvation));

        cell.energy = 50.0;
        cell.age = 300.0;
        assert_eq!(cell.death_cause(&config), Some(DeathCause::OldAge));

        cell.x = f32::NAN;
        assert_eq!(cell.death_cause(&config), Some(DeathCause::Malformed));
    }

    #[test]
    fn test_disease_drains_energy() {
        let config = Config::default();
        let mut cell = test_cell(&config);
        cell.health.diseases.push(Disease { severity: 0.4 });
        // Large generator output fails the contraction roll
        cell.update_health(&config, &mut StepRng::new(u64::MAX, 0));
        assert!((cell.energy - (150.0 - 0.4 * config.cells.disease_drain)).abs() < 1e-5);
    }

    #[test]
    fn test_gatherer_role_doubles_rate() {
        assert_eq!(Specialization::Gatherer.gather_multiplier(), 2.0);
        assert_eq!(Specialization::Healer.gather_multiplier(), 1.0);
        assert!(Specialization::Healer.can_heal());
        assert!(!Specialization::None.can_heal());
    }
}
