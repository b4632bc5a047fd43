//! Data export system for analysis in external tools.

use crate::cell::Cell;
use crate::history::HistoryLog;
use crate::stats::StatsHistory;
use crate::tribe::Tribe;
use crate::world::World;
use std::fs::File;
use std::io::{BufWriter, Result, Write};
use std::path::Path;

/// Export system for saving simulation data
pub struct ExportSystem;

impl ExportSystem {
    /// Export live cells to CSV
    pub fn export_cells_csv<P: AsRef<Path>>(cells: &[Cell], path: P) -> Result<()> {
        let mut file = BufWriter::new(File::create(path)?);

        writeln!(
            file,
            "id,x,y,energy,age,generation,knowledge,intelligence,adaptability,resilience,cooperation,sharing,specialization,tribe,resources,innovations,offspring"
        )?;

        for cell in cells.iter().filter(|c| c.is_alive()) {
            writeln!(
                file,
                "{},{:.2},{:.2},{:.2},{:.2},{},{:.3},{:.3},{:.3},{:.3},{:.3},{:.3},{},{},{},{},{}",
                cell.id,
                cell.x,
                cell.y,
                cell.energy,
                cell.age,
                cell.generation,
                cell.knowledge,
                cell.genome.intelligence,
                cell.genome.adaptability,
                cell.genome.resilience,
                cell.social.cooperation,
                cell.social.sharing,
                cell.specialization.name(),
                cell.tribe.map_or(String::new(), |t| t.to_string()),
                cell.resources.len(),
                cell.innovations.len(),
                cell.offspring_count,
            )?;
        }

        file.flush()
    }

    /// Export tribes to CSV
    pub fn export_tribes_csv<P: AsRef<Path>>(tribes: &[Tribe], path: P) -> Result<()> {
        let mut file = BufWriter::new(File::create(path)?);

        writeln!(
            file,
            "id,members,knowledge,technology,traditions,beliefs,pool,territory_x,territory_y,founded_at"
        )?;

        for tribe in tribes {
            writeln!(
                file,
                "{},{},{:.3},{:.4},{},{},{},{:.1},{:.1},{}",
                tribe.id,
                tribe.size(),
                tribe.knowledge,
                tribe.culture.technology,
                tribe.culture.traditions.len(),
                tribe.culture.beliefs.len(),
                tribe.resources.len(),
                tribe.territory.x,
                tribe.territory.y,
                tribe.founded_at,
            )?;
        }

        file.flush()
    }

    /// Export the statistics history to JSON
    pub fn export_stats_json<P: AsRef<Path>>(history: &StatsHistory, path: P) -> Result<()> {
        let json = serde_json::to_string_pretty(history)?;
        std::fs::write(path, json)
    }

    /// Export retained history events to JSON
    pub fn export_events_json<P: AsRef<Path>>(history: &HistoryLog, path: P) -> Result<()> {
        let events: Vec<_> = history.iter().collect();
        let json = serde_json::to_string_pretty(&events)?;
        std::fs::write(path, json)
    }

    /// Export the current world snapshot to JSON
    pub fn export_world_json<P: AsRef<Path>>(world: &World, path: P) -> Result<()> {
        let json = serde_json::to_string_pretty(&world.snapshot())?;
        std::fs::write(path, json)
    }

    /// Export everything into `base_path`
    pub fn export_full_state<P: AsRef<Path>>(world: &World, base_path: P) -> Result<ExportManifest> {
        let base = base_path.as_ref();
        std::fs::create_dir_all(base)?;

        let cells_path = base.join("cells.csv");
        let tribes_path = base.join("tribes.csv");
        let deaths_path = base.join("deaths.csv");
        let stats_path = base.join("stats.json");
        let events_path = base.join("events.json");
        let snapshot_path = base.join("snapshot.json");

        Self::export_cells_csv(&world.cells, &cells_path)?;
        Self::export_tribes_csv(&world.tribes, &tribes_path)?;
        std::fs::write(&deaths_path, world.survival.to_csv())?;
        Self::export_stats_json(&world.stats_history, &stats_path)?;
        Self::export_events_json(&world.history, &events_path)?;
        Self::export_world_json(world, &snapshot_path)?;

        Ok(ExportManifest {
            time: world.time,
            cells_file: cells_path.to_string_lossy().to_string(),
            tribes_file: tribes_path.to_string_lossy().to_string(),
            deaths_file: deaths_path.to_string_lossy().to_string(),
            stats_file: stats_path.to_string_lossy().to_string(),
            events_file: events_path.to_string_lossy().to_string(),
            snapshot_file: snapshot_path.to_string_lossy().to_string(),
        })
    }

    /// Export summary statistics
    pub fn export_summary<P: AsRef<Path>>(world: &World, path: P) -> Result<()> {
        let mut file = File::create(path)?;
        let stats = &world.stats;

        writeln!(file, "=== SOCIOGENESIS Simulation Summary ===")?;
        writeln!(file, "Time: {}", world.time)?;
        writeln!(file, "Population: {}", world.population())?;
        writeln!(file, "Max Generation: {}", world.generation_max())?;
        writeln!(file, "Season: {}", world.environment.season)?;
        writeln!(file, "Temperature: {:.1}", world.environment.temperature)?;
        writeln!(file, "Resource Scarcity: {:.2}", world.environment.resource_scarcity)?;
        writeln!(file, "Knowledge Ceiling: {:.2}", world.environment.knowledge_ceiling)?;
        writeln!(file)?;

        writeln!(file, "=== Society ===")?;
        writeln!(file, "Tribes: {}", world.tribes.len())?;
        writeln!(file, "Tribal Share: {:.1}%", stats.tribal_percentage())?;
        writeln!(file, "Innovations: {}", stats.total_innovations)?;
        writeln!(file, "Social Complexity: {:.3}", stats.social_complexity)?;
        for insight in &world.insights {
            writeln!(file, "Insight: {}", insight)?;
        }
        writeln!(file)?;

        writeln!(file, "=== Reproduction ===")?;
        writeln!(file, "Total Births: {}", world.reproduction.total_births)?;
        writeln!(file, "Failed Compatibility: {}", world.reproduction.failed_compatibility)?;
        writeln!(file, "Blocked By Cap: {}", world.reproduction.blocked_by_cap)?;
        writeln!(file, "Success Rate: {:.1}%", world.reproduction.success_rate() * 100.0)?;
        writeln!(file)?;

        writeln!(file, "=== Survival ===")?;
        writeln!(file, "{}", world.survival.calculate_stats().summary())?;

        Ok(())
    }
}

/// Manifest of exported files
#[derive(Debug)]
pub struct ExportManifest {
    pub time: u64,
    pub cells_file: String,
    pub tribes_file: String,
    pub deaths_file: String,
    pub stats_file: String,
    pub events_file: String,
    pub snapshot_file: String,
}
