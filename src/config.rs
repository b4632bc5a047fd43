//! Configuration system for the simulation.
//!
//! Supports YAML configuration files with sensible defaults. Every section
//! falls back to its defaults, so partial files are accepted.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub world: WorldConfig,
    #[serde(default)]
    pub cells: CellConfig,
    #[serde(default)]
    pub reproduction: ReproductionConfig,
    #[serde(default)]
    pub environment: EnvironmentConfig,
    #[serde(default)]
    pub catastrophes: CatastropheConfig,
    #[serde(default)]
    pub tribes: TribeConfig,
    #[serde(default)]
    pub safety: SafetyConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// World bounds and food supply
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Width of the world in simulation units
    pub width: f32,
    /// Height of the world in simulation units
    pub height: f32,
    /// Number of cells at start (and after reset)
    pub initial_cells: usize,
    /// Number of food items at start (and after reset)
    pub initial_food: usize,
    /// Upper bound on food items lying around
    pub max_food: usize,
    /// Base per-tick food spawn probability, divided by scarcity
    pub food_spawn_rate: f32,
    /// Energy yielded by normal food
    pub food_energy: f32,
    /// Contact radius of a food item
    pub food_radius: f32,
    /// Probability that spawned food is special
    pub special_food_chance: f32,
    /// Knowledge granted by special food (gated by intelligence)
    pub special_food_knowledge: f32,
}

/// Cell physiology and behavior thresholds
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CellConfig {
    pub initial_energy: f32,
    pub radius: f32,
    /// Age added every tick
    pub age_increment: f32,
    /// Age at which a cell dies of old age
    pub max_age: f32,
    pub max_speed: f32,
    /// Per-axis velocity noise added every tick
    pub velocity_jitter: f32,
    /// Below this energy a cell seeks food
    pub hunger_threshold: f32,
    /// Above this energy a cell gathers resources
    pub gather_threshold: f32,
    /// Resource count below which gathering is attempted
    pub max_resources: usize,
    /// Base gathering probability, divided by scarcity
    pub gather_rate: f32,
    pub passive_gain_chance: f32,
    pub passive_gain: f32,
    /// Probability of a newborn taking a specialization
    pub specialization_chance: f32,
    /// Base per-tick disease probability, scaled by (1 - immunity)
    pub disease_chance: f32,
    /// Energy drained per unit of disease severity each tick
    pub disease_drain: f32,
}

/// Pairwise reproduction rules
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReproductionConfig {
    /// Maximum distance between mates
    pub proximity: f32,
    /// Fixed part of the reproduction cost
    pub base_cost: f32,
    /// Cost added per living cell
    pub cost_per_cell: f32,
    /// Ticks both parents wait after a birth
    pub cooldown: u32,
    /// Energy a newborn starts with
    pub birth_energy: f32,
    pub color_jitter: f32,
    pub trait_jitter: f32,
    pub metabolism_jitter: f32,
    /// Probability of an extra mutation burst on one trait
    pub mutation_burst_chance: f32,
    pub mutation_burst: f32,
    /// Share of the parents' combined knowledge passed to the child
    pub knowledge_inheritance: f32,
    /// Spawn offset around the parents' midpoint
    pub spawn_jitter: f32,
}

/// Seasons, temperature and scarcity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvironmentConfig {
    /// Ticks per season
    pub season_duration: u64,
    /// Per-tick temperature drift amplitude
    pub temperature_drift: f32,
    /// Scarcity growth per living cell
    pub crowding_factor: f32,
    /// Per-tick catastrophe probability
    pub catastrophe_chance: f32,
}

/// Catastrophe damage model
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CatastropheConfig {
    /// Multiplier applied to raw damage when draining energy
    pub energy_damage_scale: f32,
    /// Probability that exposure hardens resilience
    pub hardening_chance: f32,
    pub hardening_step: f32,
}

/// Tribe formation and culture
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TribeConfig {
    /// Maximum distance for founding a tribe
    pub formation_radius: f32,
    pub territory_radius: f32,
    /// Technology gained per unit of summed member knowledge
    pub technology_rate: f32,
    pub tradition_chance: f32,
    /// Fraction of the knowledge gap closed per tick
    pub teaching_rate: f32,
    /// Members below this energy are fed from the pool
    pub energy_floor: f32,
    /// Energy granted per pooled resource handed out
    pub pool_top_up: f32,
    /// Distance at which a healer can treat a member
    pub healing_range: f32,
    /// Injury multiplier applied per healing contact
    pub injury_recovery: f32,
}

/// Safety limits to prevent runaway simulations
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SafetyConfig {
    /// Maximum allowed population
    pub max_population: usize,
    /// Pause before resuming after a failed tick
    pub restart_delay_ms: u64,
    /// Failed ticks tolerated before the driver gives up
    pub max_restarts: u32,
}

/// History, analysis and log configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Ticks between population analyses
    pub analysis_interval: u64,
    /// Maximum number of retained history events
    pub history_capacity: usize,
    /// Maximum number of retained analysis snapshots
    pub stats_history_capacity: usize,
    /// Number of recent events carried by a snapshot
    pub snapshot_events: usize,
    /// Log level (error, warn, info, debug, trace)
    pub log_level: String,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            width: 1000.0,
            height: 700.0,
            initial_cells: 30,
            initial_food: 50,
            max_food: 400,
            food_spawn_rate: 0.2,
            food_energy: 70.0,
            food_radius: 3.0,
            special_food_chance: 0.1,
            special_food_knowledge: 0.5,
        }
    }
}

impl Default for CellConfig {
    fn default() -> Self {
        Self {
            initial_energy: 150.0,
            radius: 5.0,
            age_increment: 0.02,
            max_age: 300.0,
            max_speed: 2.0,
            velocity_jitter: 0.1,
            hunger_threshold: 30.0,
            gather_threshold: 80.0,
            max_resources: 3,
            gather_rate: 0.1,
            passive_gain_chance: 0.1,
            passive_gain: 2.0,
            specialization_chance: 0.3,
            disease_chance: 0.0005,
            disease_drain: 0.05,
        }
    }
}

impl Default for ReproductionConfig {
    fn default() -> Self {
        Self {
            proximity: 15.0,
            base_cost: 30.0,
            cost_per_cell: 0.03,
            cooldown: 60,
            birth_energy: 80.0,
            color_jitter: 10.0,
            trait_jitter: 0.05,
            metabolism_jitter: 0.01,
            mutation_burst_chance: 0.05,
            mutation_burst: 0.3,
            knowledge_inheritance: 0.6,
            spawn_jitter: 5.0,
        }
    }
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            season_duration: 1000,
            temperature_drift: 0.1,
            crowding_factor: 0.01,
            catastrophe_chance: 0.0001,
        }
    }
}

impl Default for CatastropheConfig {
    fn default() -> Self {
        Self {
            energy_damage_scale: 10.0,
            hardening_chance: 0.01,
            hardening_step: 0.01,
        }
    }
}

impl Default for TribeConfig {
    fn default() -> Self {
        Self {
            formation_radius: 50.0,
            territory_radius: 100.0,
            technology_rate: 0.001,
            tradition_chance: 0.01,
            teaching_rate: 0.1,
            energy_floor: 50.0,
            pool_top_up: 20.0,
            healing_range: 20.0,
            injury_recovery: 0.9,
        }
    }
}

impl Default for SafetyConfig {
    fn default() -> Self {
        Self {
            max_population: 2000,
            restart_delay_ms: 1000,
            max_restarts: 1,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            analysis_interval: 100,
            history_capacity: 1000,
            stats_history_capacity: 500,
            snapshot_events: 5,
            log_level: "info".to_string(),
        }
    }
}

impl ReproductionConfig {
    /// Energy each parent pays, rising with crowding
    pub fn cost(&self, population: usize) -> f32 {
        self.base_cost + population as f32 * self.cost_per_cell
    }
}

impl Config {
    /// Load configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a YAML file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let yaml = serde_yaml::to_string(self)?;
        std::fs::write(path, yaml)?;
        Ok(())
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |msg: &str| Err(ConfigError::Invalid(msg.to_string()));

        if !(self.world.width > 0.0 && self.world.height > 0.0) {
            return invalid("world width and height must be > 0");
        }
        if self.world.width <= 2.0 * self.cells.radius || self.world.height <= 2.0 * self.cells.radius {
            return invalid("world must be larger than a cell");
        }
        if self.world.initial_cells > self.safety.max_population {
            return invalid("initial_cells cannot exceed max_population");
        }
        if self.environment.season_duration == 0 {
            return invalid("season_duration must be > 0");
        }
        if self.cells.max_speed <= 0.0 {
            return invalid("max_speed must be > 0");
        }
        if self.reproduction.proximity <= 0.0 {
            return invalid("reproduction proximity must be > 0");
        }
        if self.logging.history_capacity == 0 {
            return invalid("history_capacity must be > 0");
        }
        if self.logging.stats_history_capacity == 0 {
            return invalid("stats_history_capacity must be > 0");
        }
        if self.logging.analysis_interval == 0 {
            return invalid("analysis_interval must be > 0");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_roundtrip() {
        let config = Config::default();
        let yaml = serde_yaml::to_string(&config).unwrap();
        let loaded: Config = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(config.world.initial_cells, loaded.world.initial_cells);
        assert_eq!(config.reproduction.cooldown, loaded.reproduction.cooldown);
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let yaml = "world:\n  initial_cells: 12\n";
        let loaded: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(loaded.world.initial_cells, 12);
        assert_eq!(loaded.world.initial_food, 50);
        assert_eq!(loaded.environment.season_duration, 1000);
    }

    #[test]
    fn test_reproduction_cost_scales_with_population() {
        let config = ReproductionConfig::default();
        assert!((config.cost(0) - 30.0).abs() < 1e-6);
        assert!((config.cost(10) - 30.3).abs() < 1e-4);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = Config::default();
        config.environment.season_duration = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let mut config = Config::default();
        config.world.initial_cells = config.safety.max_population + 1;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.logging.analysis_interval = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        let mut config = Config::default();
        config.world.initial_food = 77;
        config.save(&path).unwrap();

        let loaded = Config::from_file(&path).unwrap();
        assert_eq!(loaded.world.initial_food, 77);
    }
}
