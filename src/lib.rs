//! # SOCIOGENESIS
//!
//! Artificial-life ecosystem simulator where cells evolve genomes and
//! social traits, form tribes, accumulate knowledge and weather seasons
//! and catastrophes.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use sociogenesis::{Config, World};
//!
//! let mut world = World::new(Config::default());
//!
//! for _ in 0..1000 {
//!     let snapshot = world.tick();
//!     if snapshot.population() == 0 {
//!         break;
//!     }
//! }
//!
//! println!("Population: {}", world.population());
//! println!("Tribes: {}", world.tribes.len());
//! ```
//!
//! ## Configuration
//!
//! ```rust
//! use sociogenesis::Config;
//!
//! let mut config = Config::default();
//! config.world.initial_cells = 60;
//! config.safety.max_population = 300;
//! assert!(config.validate().is_ok());
//! ```
//!
//! ## Supervised runs
//!
//! ```rust,no_run
//! use sociogenesis::{Config, Driver, DriverConfig, World};
//!
//! let config = Config::default();
//! let driver_config = DriverConfig::from_config(&config);
//! let mut driver = Driver::new(World::new(config), driver_config);
//! let report = driver.run(500).unwrap();
//! println!("{:.1} ticks/s", report.ticks_per_second());
//! ```

pub mod analysis;
pub mod cell;
pub mod config;
pub mod driver;
pub mod ecology;
pub mod error;
pub mod genetics;
pub mod grid;
pub mod history;
pub mod rng;
pub mod snapshot;
pub mod stats;
pub mod tribe;
pub mod world;

// Re-export main types
pub use cell::{Cell, CellId};
pub use config::Config;
pub use driver::{Driver, DriverConfig, DriverReport};
pub use error::{ConfigError, SimError, SimResult};
pub use history::{EventKind, HistoricalEvent, HistoryLog};
pub use snapshot::WorldSnapshot;
pub use tribe::{Tribe, TribeId};
pub use world::World;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Run a quick benchmark
pub fn benchmark(ticks: u64, population: usize) -> BenchmarkResult {
    use std::time::Instant;

    let mut config = Config::default();
    config.world.initial_cells = population;
    config.safety.max_population = config.safety.max_population.max(population * 2);

    let mut world = World::new(config);

    let start = Instant::now();
    world.run(ticks);
    let elapsed = start.elapsed().as_secs_f64();

    BenchmarkResult {
        ticks,
        initial_population: population,
        final_population: world.population(),
        tribes: world.tribes.len(),
        elapsed_secs: elapsed,
        ticks_per_second: if elapsed > 0.0 { ticks as f64 / elapsed } else { 0.0 },
        max_generation: world.generation_max(),
    }
}

/// Benchmark result
#[derive(Debug, Clone)]
pub struct BenchmarkResult {
    pub ticks: u64,
    pub initial_population: usize,
    pub final_population: usize,
    pub tribes: usize,
    pub elapsed_secs: f64,
    pub ticks_per_second: f64,
    pub max_generation: u32,
}

impl std::fmt::Display for BenchmarkResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Benchmark Results ===")?;
        writeln!(f, "Ticks: {}", self.ticks)?;
        writeln!(f, "Population: {} -> {}", self.initial_population, self.final_population)?;
        writeln!(f, "Tribes: {}", self.tribes)?;
        writeln!(f, "Time: {:.3}s", self.elapsed_secs)?;
        writeln!(f, "Speed: {:.1} ticks/s", self.ticks_per_second)?;
        writeln!(f, "Max generation: {}", self.max_generation)?;
        Ok(())
    }
}
