//! Global environment state machine.
//!
//! Cycles the seasons, drifts temperature, recomputes resource scarcity from
//! season and crowding, rolls for catastrophes and tracks the highest
//! knowledge any cell has reached.

use crate::config::EnvironmentConfig;
use crate::ecology::seasons::Season;
use crate::rng;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Temperature at which metabolism is unstressed
pub const NEUTRAL_TEMPERATURE: f32 = 20.0;

/// What changed during one environment update
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct EnvironmentUpdate {
    /// New season if a transition happened this tick
    pub season_changed: Option<Season>,
    /// A catastrophe should be spawned this tick
    pub catastrophe_triggered: bool,
}

/// World-owned environment state
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Environment {
    pub temperature: f32,
    pub season: Season,
    pub season_tick_counter: u64,
    pub season_duration: u64,
    pub resource_scarcity: f32,
    pub catastrophe_chance: f32,
    /// Highest knowledge any cell has reached; never decreases
    pub knowledge_ceiling: f32,
    temperature_drift: f32,
    crowding_factor: f32,
}

impl Environment {
    pub fn new(config: &EnvironmentConfig) -> Self {
        Self {
            temperature: Season::Spring.base_temperature(),
            season: Season::Spring,
            season_tick_counter: 0,
            season_duration: config.season_duration,
            resource_scarcity: 1.0,
            catastrophe_chance: config.catastrophe_chance,
            knowledge_ceiling: 0.0,
            temperature_drift: config.temperature_drift,
            crowding_factor: config.crowding_factor,
        }
    }

    /// Advance the environment by one tick
    pub fn update<R: Rng + ?Sized>(&mut self, population: usize, rng: &mut R) -> EnvironmentUpdate {
        let mut update = EnvironmentUpdate::default();

        self.season_tick_counter += 1;
        if self.season_tick_counter >= self.season_duration {
            self.season_tick_counter = 0;
            update.season_changed = Some(self.advance_season(rng));
        }

        self.temperature += rng::jitter(rng, self.temperature_drift);

        update.catastrophe_triggered = rng::chance(rng, self.catastrophe_chance);

        self.recompute_scarcity(population);

        update
    }

    /// Move to the next season and reseed temperature around its base
    pub fn advance_season<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Season {
        self.season = self.season.next();
        self.temperature =
            self.season.base_temperature() + rng::jitter(rng, self.season.temperature_jitter());
        log::info!(
            "Season changed to {} ({:.1}°C)",
            self.season,
            self.temperature
        );
        self.season
    }

    /// Scarcity rises with both harsh seasons and crowding
    pub fn recompute_scarcity(&mut self, population: usize) {
        self.resource_scarcity = Self::scarcity_for(self.season, population, self.crowding_factor);
    }

    pub fn scarcity_for(season: Season, population: usize, crowding_factor: f32) -> f32 {
        season.base_scarcity() * (1.0 + population as f32 * crowding_factor)
    }

    /// Extra metabolic load caused by deviation from the neutral temperature
    #[inline]
    pub fn temperature_stress(&self) -> f32 {
        (self.temperature - NEUTRAL_TEMPERATURE).abs() / NEUTRAL_TEMPERATURE * 0.2
    }

    /// Raise the knowledge ceiling if `knowledge` exceeds it.
    /// Returns true when a new maximum was reached.
    pub fn observe_knowledge(&mut self, knowledge: f32) -> bool {
        if knowledge.is_finite() && knowledge > self.knowledge_ceiling {
            self.knowledge_ceiling = knowledge;
            true
        } else {
            false
        }
    }

    /// Progress through the current season in [0, 1)
    pub fn season_progress(&self) -> f32 {
        self.season_tick_counter as f32 / self.season_duration.max(1) as f32
    }
}
