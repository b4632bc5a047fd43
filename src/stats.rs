//! Statistics tracking for the simulation.

use crate::cell::Cell;
use crate::ecology::{Environment, Season};
use serde::{Deserialize, Serialize};

/// Statistics snapshot for a simulation step
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Stats {
    /// Current simulation time
    pub time: u64,
    /// Total population count
    pub population: usize,
    /// Cells belonging to a tribe
    pub tribal_population: usize,
    pub tribe_count: usize,
    /// Maximum generation reached
    pub generation_max: u32,
    pub energy_mean: f32,
    pub age_mean: f32,
    pub knowledge_mean: f32,
    pub knowledge_max: f32,
    pub intelligence_mean: f32,
    pub cooperation_mean: f32,
    pub total_innovations: usize,
    pub innovations_mean: f32,
    pub social_complexity: f32,
    /// Food items in the world
    pub food_count: usize,
    pub active_catastrophes: usize,
    /// Births this step
    pub births: usize,
    /// Deaths this step
    pub deaths: usize,
    pub temperature: f32,
    pub resource_scarcity: f32,
    pub season: Option<Season>,
}

impl Stats {
    /// Create new empty stats
    pub fn new() -> Self {
        Self::default()
    }

    /// Update population figures from the live cells
    pub fn update(&mut self, cells: &[Cell], tribe_count: usize) {
        let alive: Vec<&Cell> = cells.iter().filter(|c| c.is_alive()).collect();
        self.population = alive.len();
        self.tribe_count = tribe_count;

        if alive.is_empty() {
            self.tribal_population = 0;
            self.generation_max = 0;
            self.energy_mean = 0.0;
            self.age_mean = 0.0;
            self.knowledge_mean = 0.0;
            self.knowledge_max = 0.0;
            self.intelligence_mean = 0.0;
            self.cooperation_mean = 0.0;
            self.total_innovations = 0;
            self.innovations_mean = 0.0;
            self.social_complexity = 0.0;
            return;
        }

        let n = alive.len() as f32;
        let mean = |f: fn(&Cell) -> f32| alive.iter().map(|c| f(c)).sum::<f32>() / n;

        self.tribal_population = alive.iter().filter(|c| c.tribe.is_some()).count();
        self.generation_max = alive.iter().map(|c| c.generation).max().unwrap_or(0);
        self.energy_mean = mean(|c| c.energy);
        self.age_mean = mean(|c| c.age);
        self.knowledge_mean = mean(|c| c.knowledge);
        self.knowledge_max = alive.iter().map(|c| c.knowledge).fold(0.0, f32::max);
        self.intelligence_mean = mean(|c| c.genome.intelligence);
        self.cooperation_mean = mean(|c| c.social.cooperation);
        self.total_innovations = alive.iter().map(|c| c.innovations.len()).sum();
        self.innovations_mean = self.total_innovations as f32 / n;
        self.social_complexity = social_complexity(
            self.population,
            self.tribal_population,
            self.total_innovations,
            self.knowledge_mean,
        );
    }

    /// Copy the environment readings
    pub fn observe_environment(&mut self, environment: &Environment) {
        self.temperature = environment.temperature;
        self.resource_scarcity = environment.resource_scarcity;
        self.season = Some(environment.season);
    }

    /// Share of the population in a tribe, in percent
    pub fn tribal_percentage(&self) -> f32 {
        if self.population == 0 {
            0.0
        } else {
            self.tribal_population as f32 / self.population as f32 * 100.0
        }
    }

    /// Format stats as a one-line summary
    pub fn summary(&self) -> String {
        format!(
            "T:{:6} | Pop:{:5} | Gen:{:3} | Tribes:{:3} ({:.0}%) | Energy:{:.0} | Know:{:.2} | Food:{:4} | {} {:.1}°C",
            self.time,
            self.population,
            self.generation_max,
            self.tribe_count,
            self.tribal_percentage(),
            self.energy_mean,
            self.knowledge_mean,
            self.food_count,
            self.season.map(|s| s.name()).unwrap_or("-"),
            self.temperature,
        )
    }
}

/// Weighted blend of tribal membership, innovation and knowledge per cell
pub fn social_complexity(population: usize, tribal: usize, innovations: usize, knowledge_mean: f32) -> f32 {
    if population == 0 {
        return 0.0;
    }
    (tribal as f32 * 0.3 + innovations as f32 * 0.4 + knowledge_mean * 0.3) / population as f32
}

/// Periodic population analysis, recorded into the history log
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PopulationAnalysis {
    pub population: usize,
    pub average_intelligence: f32,
    pub average_knowledge: f32,
    pub social_complexity: f32,
    pub innovations: usize,
    pub tribal_count: usize,
}

impl PopulationAnalysis {
    pub fn from_stats(stats: &Stats) -> Self {
        Self {
            population: stats.population,
            average_intelligence: stats.intelligence_mean,
            average_knowledge: stats.knowledge_mean,
            social_complexity: stats.social_complexity,
            innovations: stats.total_innovations,
            tribal_count: stats.tribal_population,
        }
    }
}

/// Historical statistics tracker
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct StatsHistory {
    /// All recorded stats snapshots
    pub snapshots: Vec<Stats>,
    /// Recording interval
    pub interval: u64,
    /// Oldest snapshots are dropped beyond this many
    #[serde(default)]
    pub capacity: usize,
}

impl StatsHistory {
    /// Create new history with recording interval and snapshot limit
    pub fn new(interval: u64, capacity: usize) -> Self {
        Self {
            snapshots: Vec::new(),
            interval,
            capacity: capacity.max(1),
        }
    }

    /// Record a stats snapshot, dropping the oldest once full
    pub fn record(&mut self, stats: Stats) {
        self.snapshots.push(stats);
        let capacity = self.capacity.max(1);
        if self.snapshots.len() > capacity {
            let excess = self.snapshots.len() - capacity;
            self.snapshots.drain(..excess);
        }
    }

    pub fn latest(&self) -> Option<&Stats> {
        self.snapshots.last()
    }

    /// Get population over time
    pub fn population_series(&self) -> Vec<(u64, usize)> {
        self.snapshots.iter().map(|s| (s.time, s.population)).collect()
    }

    /// Get mean knowledge over time
    pub fn knowledge_series(&self) -> Vec<(u64, f32)> {
        self.snapshots.iter().map(|s| (s.time, s.knowledge_mean)).collect()
    }

    /// Get generation max over time
    pub fn generation_series(&self) -> Vec<(u64, u32)> {
        self.snapshots.iter().map(|s| (s.time, s.generation_max)).collect()
    }

    pub fn clear(&mut self) {
        self.snapshots.clear();
    }

    /// Save history to file
    pub fn save(&self, path: &str) -> std::io::Result<()> {
        let json = serde_json::to_string(self)?;
        std::fs::write(path, json)
    }

    /// Load history from file
    pub fn load(path: &str) -> std::io::Result<Self> {
        let json = std::fs::read_to_string(path)?;
        serde_json::from_str(&json).map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::rng::seeded;

    fn cells(n: u64) -> Vec<Cell> {
        let config = Config::default();
        let mut rng = seeded(8);
        (0..n)
            .map(|i| Cell::new(i, 50.0, 50.0, &config, 0, &mut rng))
            .collect()
    }

    #[test]
    fn test_stats_update() {
        let mut cells = cells(4);
        cells[0].tribe = Some(1);
        cells[1].tribe = Some(1);
        cells[2].knowledge = 4.0;
        cells[3].generation = 7;

        let mut stats = Stats::new();
        stats.update(&cells, 1);

        assert_eq!(stats.population, 4);
        assert_eq!(stats.tribal_population, 2);
        assert_eq!(stats.tribal_percentage(), 50.0);
        assert_eq!(stats.generation_max, 7);
        assert_eq!(stats.knowledge_mean, 1.0);
        assert_eq!(stats.knowledge_max, 4.0);
        assert_eq!(stats.energy_mean, 150.0);
        // (2*0.3 + 0 + 1.0*0.3) / 4
        assert!((stats.social_complexity - 0.225).abs() < 1e-6);
    }

    #[test]
    fn test_empty_population_has_no_nan() {
        let mut stats = Stats::new();
        stats.update(&[], 0);

        assert_eq!(stats.population, 0);
        assert_eq!(stats.energy_mean, 0.0);
        assert_eq!(stats.social_complexity, 0.0);
        assert_eq!(stats.tribal_percentage(), 0.0);
        assert!(!stats.summary().contains("NaN"));
    }

    #[test]
    fn test_population_analysis_from_stats() {
        let mut cells = cells(2);
        cells[0].knowledge = 2.0;
        let mut stats = Stats::new();
        stats.update(&cells, 0);

        let analysis = PopulationAnalysis::from_stats(&stats);
        assert_eq!(analysis.population, 2);
        assert_eq!(analysis.average_knowledge, 1.0);
        assert_eq!(analysis.tribal_count, 0);
    }

    #[test]
    fn test_stats_history() {
        let mut history = StatsHistory::new(10, 100);

        for i in 0..5 {
            let mut stats = Stats::new();
            stats.time = i * 10;
            stats.population = (i + 1) as usize * 100;
            stats.knowledge_mean = i as f32 * 0.5;
            stats.generation_max = i as u32;
            history.record(stats);
        }

        let series = history.population_series();
        assert_eq!(series.len(), 5);
        assert_eq!(series[0], (0, 100));
        assert_eq!(series[4], (40, 500));
        assert_eq!(history.latest().map(|s| s.time), Some(40));
        assert_eq!(history.knowledge_series()[2], (20, 1.0));
        assert_eq!(history.generation_series()[3], (30, 3));
    }

    #[test]
    fn test_stats_history_drops_oldest() {
        let mut history = StatsHistory::new(10, 3);

        for i in 0..7 {
            let mut stats = Stats::new();
            stats.time = i * 10;
            history.record(stats);
        }

        assert_eq!(history.snapshots.len(), 3);
        let times: Vec<u64> = history.snapshots.iter().map(|s| s.time).collect();
        assert_eq!(times, vec![40, 50, 60]);
    }

    #[test]
    fn test_history_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.json");
        let path = path.to_str().unwrap();

        let mut history = StatsHistory::new(100, 10);
        history.record(Stats {
            population: 42,
            ..Stats::default()
        });
        history.save(path).unwrap();

        let loaded = StatsHistory::load(path).unwrap();
        assert_eq!(loaded.snapshots[0].population, 42);
    }
}
