//! Survival analysis and death tracking.

use crate::cell::{Cell, CellId, DeathCause, Specialization};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt::Write;

/// Record of a single death event
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DeathRecord {
    pub cell_id: CellId,
    pub birth_time: u64,
    pub death_time: u64,
    pub lifespan: u64,
    pub cause: DeathCause,
    pub generation: u32,
    pub final_energy: f32,
    pub knowledge: f32,
    pub specialization: Specialization,
    pub was_tribal: bool,
    pub offspring_count: u32,
    pub food_eaten: u32,
}

/// Aggregate view over recorded deaths
#[derive(Clone, Debug, Default)]
pub struct SurvivalStats {
    /// Deaths ever recorded, including pruned records
    pub total_deaths: usize,
    pub deaths_by_starvation: usize,
    pub deaths_by_old_age: usize,
    pub deaths_malformed: usize,
    // Lifespan figures cover retained records only
    pub mean_lifespan: f32,
    pub max_lifespan: u64,
    pub mean_offspring: f32,
    pub mean_tribal_lifespan: f32,
    pub mean_solitary_lifespan: f32,
}

impl SurvivalStats {
    pub fn summary(&self) -> String {
        format!(
            "{} deaths [starvation {} | old age {} | malformed {}] lifespan mean {:.1} max {} (tribal {:.1}, solitary {:.1})",
            self.total_deaths,
            self.deaths_by_starvation,
            self.deaths_by_old_age,
            self.deaths_malformed,
            self.mean_lifespan,
            self.max_lifespan,
            self.mean_tribal_lifespan,
            self.mean_solitary_lifespan,
        )
    }
}

/// Death ledger: recent per-cell records plus lifetime tallies by cause
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct SurvivalAnalyzer {
    /// Most recent death records, oldest first
    pub records: Vec<DeathRecord>,
    /// Lifetime tally per cause; survives pruning
    pub by_cause: HashMap<DeathCause, usize>,
    pub total_tracked: usize,
}

impl SurvivalAnalyzer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Log the death of `cell` at `death_time`
    pub fn record_death(&mut self, cell: &Cell, death_time: u64) {
        let cause = cell.cause_of_death.unwrap_or(DeathCause::Starvation);

        self.records.push(DeathRecord {
            cell_id: cell.id,
            birth_time: cell.born_at,
            death_time,
            lifespan: death_time.saturating_sub(cell.born_at),
            cause,
            generation: cell.generation,
            final_energy: cell.energy,
            knowledge: cell.knowledge,
            specialization: cell.specialization,
            was_tribal: cell.tribe.is_some(),
            offspring_count: cell.offspring_count,
            food_eaten: cell.food_eaten,
        });
        self.total_tracked += 1;
        *self.by_cause.entry(cause).or_default() += 1;
    }

    pub fn deaths_by(&self, cause: DeathCause) -> usize {
        self.by_cause.get(&cause).copied().unwrap_or(0)
    }

    pub fn calculate_stats(&self) -> SurvivalStats {
        let lifespans = || self.records.iter().map(|r| r.lifespan);
        let retained = self.records.len().max(1) as f32;
        let offspring: u64 = self.records.iter().map(|r| u64::from(r.offspring_count)).sum();

        SurvivalStats {
            total_deaths: self.total_tracked,
            deaths_by_starvation: self.deaths_by(DeathCause::Starvation),
            deaths_by_old_age: self.deaths_by(DeathCause::OldAge),
            deaths_malformed: self.deaths_by(DeathCause::Malformed),
            mean_lifespan: mean(lifespans()),
            max_lifespan: lifespans().max().unwrap_or(0),
            mean_offspring: offspring as f32 / retained,
            mean_tribal_lifespan: mean(self.records.iter().filter(|r| r.was_tribal).map(|r| r.lifespan)),
            mean_solitary_lifespan: mean(self.records.iter().filter(|r| !r.was_tribal).map(|r| r.lifespan)),
        }
    }

    /// Share of all recorded deaths per cause
    pub fn death_rate_by_cause(&self) -> HashMap<DeathCause, f32> {
        if self.total_tracked == 0 {
            return HashMap::new();
        }
        let total = self.total_tracked as f32;
        self.by_cause
            .iter()
            .map(|(&cause, &n)| (cause, n as f32 / total))
            .collect()
    }

    /// Retained deaths grouped by lifespan, keyed by bucket start
    pub fn lifespan_distribution(&self, bucket_size: u64) -> BTreeMap<u64, usize> {
        let width = bucket_size.max(1);
        let mut buckets = BTreeMap::new();
        for lifespan in self.records.iter().map(|r| r.lifespan) {
            *buckets.entry(lifespan - lifespan % width).or_default() += 1;
        }
        buckets
    }

    pub fn to_csv(&self) -> String {
        let mut out = String::from(
            "cell_id,birth_time,death_time,lifespan,cause,generation,final_energy,knowledge,specialization,was_tribal,offspring_count,food_eaten\n",
        );
        for r in &self.records {
            // Writing into a String cannot fail
            let _ = writeln!(
                out,
                "{},{},{},{},{},{},{:.2},{:.2},{},{},{},{}",
                r.cell_id,
                r.birth_time,
                r.death_time,
                r.lifespan,
                r.cause.name(),
                r.generation,
                r.final_energy,
                r.knowledge,
                r.specialization.name(),
                r.was_tribal,
                r.offspring_count,
                r.food_eaten,
            );
        }
        out
    }

    /// Keep only the newest `keep_last` records; tallies are untouched
    pub fn prune(&mut self, keep_last: usize) {
        let excess = self.records.len().saturating_sub(keep_last);
        self.records.drain(..excess);
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

fn mean<I: Iterator<Item = u64>>(values: I) -> f32 {
    let (sum, n) = values.fold((0u64, 0u32), |(sum, n), v| (sum + v, n + 1));
    if n == 0 {
        0.0
    } else {
        sum as f32 / n as f32
    }
}
