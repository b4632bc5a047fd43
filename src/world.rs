//! World simulation engine - owns every entity and orchestrates a tick.

use crate::analysis::insights::{generate_insights, Insight};
use crate::analysis::SurvivalAnalyzer;
use crate::cell::{Cell, CellId, DeathCause, HealerRef};
use crate::config::Config;
use crate::ecology::{Catastrophe, CatastropheId, Environment, Food, FoodId};
use crate::genetics::{MatingContext, MatingOutcome, ReproductionSystem};
use crate::grid::SpatialIndex;
use crate::history::{EventPayload, HistoryLog};
use crate::rng::{self, SimRng};
use crate::snapshot::WorldSnapshot;
use crate::stats::{PopulationAnalysis, Stats, StatsHistory};
use crate::tribe::{Tribe, TribeId};
use rayon::prelude::*;
use std::collections::{HashMap, HashSet};

/// Death records kept for survival analysis
const MAX_DEATH_RECORDS: usize = 10_000;

/// The simulation world
pub struct World {
    // Population
    pub cells: Vec<Cell>,
    pub tribes: Vec<Tribe>,

    // Environment
    pub foods: Vec<Food>,
    pub catastrophes: Vec<Catastrophe>,
    pub environment: Environment,

    // State
    pub time: u64,

    // Configuration
    pub config: Config,

    // Statistics
    pub stats: Stats,
    pub stats_history: StatsHistory,
    pub history: HistoryLog,
    pub survival: SurvivalAnalyzer,
    pub reproduction: ReproductionSystem,
    /// Insights from the most recent population analysis
    pub insights: Vec<Insight>,

    spatial_index: SpatialIndex,

    // ID generation
    next_cell_id: CellId,
    next_food_id: FoodId,
    next_catastrophe_id: CatastropheId,
    next_tribe_id: TribeId,

    // Random number generator, injectable for tests
    rng: SimRng,
    seed: Option<u64>,

    births_this_tick: usize,
    deaths_this_tick: usize,
    last_analysis_population: Option<usize>,
}

impl World {
    /// Create a new world seeded from entropy
    pub fn new(config: Config) -> Self {
        Self::new_with_seed(config, rng::entropy_seed())
    }

    /// Create a new world with a specific seed
    pub fn new_with_seed(config: Config, seed: u64) -> Self {
        let mut world = Self::with_rng(config, rng::seeded(seed));
        world.seed = Some(seed);
        world
    }

    /// Create a new world drawing randomness from `rng`
    pub fn with_rng(config: Config, rng: SimRng) -> Self {
        if let Err(e) = config.validate() {
            log::warn!("Running with questionable config: {}", e);
        }
        let spatial_index = SpatialIndex::new(
            config.world.width,
            config.world.height,
            config.tribes.formation_radius,
        );

        let mut world = Self {
            cells: Vec::with_capacity(config.safety.max_population),
            tribes: Vec::new(),
            foods: Vec::with_capacity(config.world.max_food),
            catastrophes: Vec::new(),
            environment: Environment::new(&config.environment),
            time: 0,
            stats: Stats::new(),
            stats_history: StatsHistory::new(
                config.logging.analysis_interval,
                config.logging.stats_history_capacity,
            ),
            history: HistoryLog::new(config.logging.history_capacity),
            survival: SurvivalAnalyzer::new(),
            reproduction: ReproductionSystem::new(),
            insights: Vec::new(),
            spatial_index,
            next_cell_id: 0,
            next_food_id: 0,
            next_catastrophe_id: 0,
            next_tribe_id: 0,
            rng,
            seed: None,
            births_this_tick: 0,
            deaths_this_tick: 0,
            last_analysis_population: None,
            config,
        };

        world.populate();
        world
    }

    /// Seed the initial cells and food
    fn populate(&mut self) {
        let r = self.config.cells.radius;
        let (width, height) = (self.config.world.width, self.config.world.height);

        for _ in 0..self.config.world.initial_cells {
            let x = rng::range(&mut self.rng, r, width - r);
            let y = rng::range(&mut self.rng, r, height - r);
            let id = self.next_cell_id;
            self.next_cell_id += 1;
            self.cells
                .push(Cell::new(id, x, y, &self.config, self.time, &mut self.rng));
        }

        for _ in 0..self.config.world.initial_food {
            self.push_random_food();
        }

        self.refresh_stats();
    }

    /// Discard the current run and start over with fresh cells and food.
    /// Configuration and the random source are kept.
    pub fn reset(&mut self) {
        self.cells.clear();
        self.tribes.clear();
        self.foods.clear();
        self.catastrophes.clear();
        self.environment = Environment::new(&self.config.environment);
        self.time = 0;
        self.stats = Stats::new();
        self.stats_history.clear();
        self.history.clear();
        self.survival.clear();
        self.reproduction = ReproductionSystem::new();
        self.insights.clear();
        self.last_analysis_population = None;

        self.populate();
        log::info!("World reset with {} cells", self.population());
    }

    /// Main simulation step
    pub fn tick(&mut self) -> WorldSnapshot {
        self.births_this_tick = 0;
        self.deaths_this_tick = 0;

        // Phase 1: Environment
        self.update_environment();

        // Phase 2: Food supply
        self.spawn_food();

        // Phase 3: Per-cell behavior
        self.update_cells();

        // Phase 4: Tribes
        self.update_tribes();

        // Phase 5: Reproduction (children held back until after deaths)
        let offspring = self.handle_reproduction();

        // Phase 6: Remove dead cells
        self.remove_dead();

        // Phase 7: Insert offspring
        self.cells.extend(offspring);

        // Phase 8: Catastrophe lifecycle
        self.advance_catastrophes();

        // Phase 9: Statistics and analysis
        self.refresh_stats();
        let interval = self.config.logging.analysis_interval.max(1);
        if (self.time + 1) % interval == 0 {
            self.analyze_population();
        }

        self.time += 1;
        self.snapshot()
    }

    /// Run for a given number of ticks
    pub fn run(&mut self, ticks: u64) {
        for _ in 0..ticks {
            self.tick();
        }
    }

    /// Read-only view of the current state
    pub fn snapshot(&self) -> WorldSnapshot {
        WorldSnapshot::from_world(self)
    }

    fn update_environment(&mut self) {
        let population = self.population();
        let update = self.environment.update(population, &mut self.rng);

        if let Some(season) = update.season_changed {
            self.history.record(
                self.time,
                EventPayload::SeasonChange {
                    season,
                    temperature: self.environment.temperature,
                },
            );
        }

        if update.catastrophe_triggered {
            self.spawn_catastrophe();
        }
    }

    /// Start a random catastrophe somewhere in the world
    pub fn spawn_catastrophe(&mut self) -> CatastropheId {
        let id = self.next_catastrophe_id;
        self.next_catastrophe_id += 1;
        let catastrophe = Catastrophe::random(id, self.config.world.width, self.config.world.height, &mut self.rng);
        self.insert_catastrophe(catastrophe);
        id
    }

    /// Add a prepared catastrophe, recording and logging it
    pub fn insert_catastrophe(&mut self, catastrophe: Catastrophe) {
        log::info!(
            "{} at ({:.0}, {:.0}) with intensity {:.2}",
            catastrophe.kind.name(),
            catastrophe.x,
            catastrophe.y,
            catastrophe.intensity
        );
        self.history.record(
            self.time,
            EventPayload::Catastrophe {
                id: catastrophe.id,
                kind: catastrophe.kind,
                x: catastrophe.x,
                y: catastrophe.y,
                intensity: catastrophe.intensity,
            },
        );
        self.next_catastrophe_id = self.next_catastrophe_id.max(catastrophe.id + 1);
        self.catastrophes.push(catastrophe);
    }

    fn spawn_food(&mut self) {
        if self.foods.len() >= self.config.world.max_food {
            return;
        }
        let scarcity = self.environment.resource_scarcity.max(f32::EPSILON);
        if rng::chance(&mut self.rng, self.config.world.food_spawn_rate / scarcity) {
            self.push_random_food();
        }
    }

    fn push_random_food(&mut self) {
        let id = self.next_food_id;
        self.next_food_id += 1;
        self.foods
            .push(Food::random(id, &self.config.world, &mut self.rng));
    }

    /// Healer positions per tribe, taken before anyone moves
    fn healer_positions(&self) -> HashMap<TribeId, Vec<HealerRef>> {
        let mut healers: HashMap<TribeId, Vec<HealerRef>> = HashMap::new();
        for cell in self.cells.iter().filter(|c| c.is_alive() && c.specialization.can_heal()) {
            if let Some(tribe) = cell.tribe {
                healers.entry(tribe).or_default().push(HealerRef {
                    id: cell.id,
                    x: cell.x,
                    y: cell.y,
                });
            }
        }
        healers
    }

    fn update_cells(&mut self) {
        let healers = self.healer_positions();
        self.spatial_index
            .rebuild(self.cells.iter().map(|c| (c.x, c.y)));

        for i in 0..self.cells.len() {
            if !self.cells[i].is_alive() {
                continue;
            }
            if !self.cells[i].is_well_formed() {
                let cell = &mut self.cells[i];
                log::warn!("Cell {} has malformed state at tick {}, removing it", cell.id, self.time);
                cell.cause_of_death = Some(DeathCause::Malformed);
                continue;
            }

            if !self.step_cell(i, &healers) {
                continue;
            }

            if self.cells[i].tribe.is_none() {
                self.try_form_tribe(i);
            }

            let cell = &mut self.cells[i];
            cell.tick_cooldown();
            cell.update_health(&self.config, &mut self.rng);
            cell.passive_gain(&self.config, &mut self.rng);
        }
    }

    /// Physics, hazards, feeding and decision for one cell.
    /// Returns false when physics alone starved the cell.
    fn step_cell(&mut self, i: usize, healers: &HashMap<TribeId, Vec<HealerRef>>) -> bool {
        let tick = self.time;
        let config = &self.config;
        let rng = &mut self.rng;
        let cell = &mut self.cells[i];

        cell.update_physics(&self.environment, config, rng);
        if cell.energy <= 0.0 {
            cell.cause_of_death = Some(DeathCause::Starvation);
            return false;
        }

        for catastrophe in &self.catastrophes {
            cell.expose_to(catastrophe, &config.catastrophes, config.cells.max_speed, rng);
        }

        let mut k = 0;
        while k < self.foods.len() {
            if cell.touches(&self.foods[k]) {
                let food = self.foods.swap_remove(k);
                cell.eat(&food, &config.world, rng);
            } else {
                k += 1;
            }
        }

        let healer = cell
            .tribe
            .and_then(|t| healers.get(&t))
            .and_then(|hs| nearest_healer(cell, hs));
        let outcome = cell.think(&self.foods, healer, self.environment.resource_scarcity, config, rng);

        if let Some(innovation) = outcome.innovation {
            self.history.record(
                tick,
                EventPayload::Innovation {
                    cell: cell.id,
                    kind: innovation.kind,
                    value: innovation.value,
                },
            );
        }

        if self.environment.observe_knowledge(cell.knowledge) {
            self.history.record(
                tick,
                EventPayload::KnowledgeDiscovery {
                    cell: cell.id,
                    knowledge: cell.knowledge,
                },
            );
        }
        true
    }

    /// Tribeless cell looks for a tribeless neighbor to band together with
    fn try_form_tribe(&mut self, i: usize) {
        let cooperation = self.cells[i].social.cooperation;
        if !rng::chance(&mut self.rng, cooperation) {
            return;
        }

        let radius = self.config.tribes.formation_radius;
        // Index positions are from the start of the phase; anyone may have moved since
        let margin = 2.0 * self.config.cells.max_speed;
        let (x, y) = (self.cells[i].x, self.cells[i].y);
        let mut candidates = self.spatial_index.query_radius(x, y, radius + margin);
        candidates.sort_unstable();

        for j in candidates {
            if j == i {
                continue;
            }
            let other = &self.cells[j];
            if !other.is_alive() || other.tribe.is_some() || other.distance_to(x, y) >= radius {
                continue;
            }
            let p = (cooperation + other.social.cooperation) / 2.0;
            if rng::chance(&mut self.rng, p) {
                self.found_tribe(i, j);
                return;
            }
        }
    }

    fn found_tribe(&mut self, founder: usize, partner: usize) -> TribeId {
        let id = self.next_tribe_id;
        self.next_tribe_id += 1;

        let tribe = Tribe::found(
            id,
            &self.cells[founder],
            &self.cells[partner],
            &self.config.tribes,
            self.time,
        );
        self.cells[founder].tribe = Some(id);
        self.cells[partner].tribe = Some(id);
        log::debug!(
            "Tribe {} founded by cells {} and {}",
            id,
            self.cells[founder].id,
            self.cells[partner].id
        );
        self.tribes.push(tribe);
        id
    }

    fn update_tribes(&mut self) {
        let index: HashMap<CellId, usize> = self.cells.iter().enumerate().map(|(i, c)| (c.id, i)).collect();

        for tribe in &mut self.tribes {
            let update = tribe.update(
                &mut self.cells,
                &index,
                &self.config.tribes,
                &self.config.cells,
                self.time,
                &mut self.rng,
            );
            if let Some(tradition) = update.tradition {
                log::debug!("Tribe {} adopted a {:?} tradition", tribe.id, tradition.kind);
            }
        }
    }

    /// Pair up nearby eligible cells. Candidate pairs are found in
    /// parallel, then rolled in index order with the world RNG.
    fn handle_reproduction(&mut self) -> Vec<Cell> {
        let living = self.population();
        let cost = self.config.reproduction.cost(living);
        let proximity = self.config.reproduction.proximity;

        self.spatial_index
            .rebuild(self.cells.iter().map(|c| (c.x, c.y)));

        let cells = &self.cells;
        let index = &self.spatial_index;
        let repro_config = &self.config.reproduction;
        let mut pairs: Vec<(usize, usize)> = (0..cells.len())
            .into_par_iter()
            .flat_map_iter(|i| {
                let a = &cells[i];
                index
                    .query_radius(a.x, a.y, proximity)
                    .into_iter()
                    .filter(move |&j| j > i && ReproductionSystem::can_mate(a, &cells[j], cost, repro_config))
                    .map(move |j| (i, j))
            })
            .collect();
        pairs.sort_unstable();

        let mut offspring = Vec::new();
        for (i, j) in pairs {
            let ctx = MatingContext {
                cost,
                headcount: living + offspring.len(),
                tick: self.time,
            };
            let (a, b) = pair_mut(&mut self.cells, i, j);
            let outcome = self
                .reproduction
                .attempt(a, b, self.next_cell_id, ctx, &self.config, &mut self.rng);

            if let MatingOutcome::Born(child) = outcome {
                self.next_cell_id += 1;
                self.births_this_tick += 1;
                self.history.record(
                    self.time,
                    EventPayload::Birth {
                        cell: child.id,
                        parents: (a.id, b.id),
                        generation: child.generation,
                    },
                );
                offspring.push(*child);
            }
        }

        if !offspring.is_empty() {
            log::debug!("Tick {}: {} births", self.time, offspring.len());
        }
        offspring
    }

    fn remove_dead(&mut self) {
        for cell in &mut self.cells {
            if cell.cause_of_death.is_none() {
                cell.cause_of_death = cell.death_cause(&self.config);
            }
        }

        for cell in self.cells.iter().filter(|c| !c.is_alive()) {
            let cause = cell.cause_of_death.unwrap_or(DeathCause::Starvation);
            self.survival.record_death(cell, self.time);
            self.history.record(
                self.time,
                EventPayload::Death {
                    cell: cell.id,
                    cause,
                    age: cell.age,
                    generation: cell.generation,
                },
            );
            self.deaths_this_tick += 1;
        }

        if self.deaths_this_tick == 0 {
            return;
        }

        self.cells.retain(|c| c.is_alive());
        self.survival.prune(MAX_DEATH_RECORDS);

        let alive: HashSet<CellId> = self.cells.iter().map(|c| c.id).collect();
        for tribe in &mut self.tribes {
            tribe.purge(|id| alive.contains(&id));
        }
        let before = self.tribes.len();
        self.tribes.retain(|t| !t.is_empty());
        log::debug!(
            "Tick {}: {} deaths, {} tribes dissolved",
            self.time,
            self.deaths_this_tick,
            before - self.tribes.len()
        );
    }

    fn advance_catastrophes(&mut self) {
        for catastrophe in &mut self.catastrophes {
            catastrophe.advance();
        }
        self.catastrophes.retain(|c| c.active);
    }

    fn refresh_stats(&mut self) {
        self.stats.update(&self.cells, self.tribes.len());
        self.stats.observe_environment(&self.environment);
        self.stats.time = self.time;
        self.stats.food_count = self.foods.len();
        self.stats.active_catastrophes = self.catastrophes.len();
        self.stats.births = self.births_this_tick;
        self.stats.deaths = self.deaths_this_tick;
    }

    /// Record a population analysis with the current insights
    fn analyze_population(&mut self) {
        let insights = generate_insights(&self.stats, self.last_analysis_population, &self.environment);
        let analysis = PopulationAnalysis::from_stats(&self.stats);

        self.history.record(
            self.time,
            EventPayload::PopulationAnalysis {
                analysis,
                insights: insights.iter().map(|i| i.to_string()).collect(),
            },
        );
        self.stats_history.record(self.stats.clone());
        self.last_analysis_population = Some(self.stats.population);
        self.insights = insights;
    }

    /// Record a driver notice in the history log
    pub fn record_system_event(&mut self, message: impl Into<String>) {
        self.history.record(
            self.time,
            EventPayload::System {
                message: message.into(),
            },
        );
    }

    /// Add a founder cell at (x, y) with a fresh id
    pub fn spawn_cell(&mut self, x: f32, y: f32) -> CellId {
        let id = self.next_cell_id;
        self.next_cell_id += 1;
        self.cells
            .push(Cell::new(id, x, y, &self.config, self.time, &mut self.rng));
        id
    }

    pub fn cell(&self, id: CellId) -> Option<&Cell> {
        self.cells.iter().find(|c| c.id == id)
    }

    pub fn cell_mut(&mut self, id: CellId) -> Option<&mut Cell> {
        self.cells.iter_mut().find(|c| c.id == id)
    }

    pub fn tribe(&self, id: TribeId) -> Option<&Tribe> {
        self.tribes.iter().find(|t| t.id == id)
    }

    /// Get current population
    pub fn population(&self) -> usize {
        self.cells.iter().filter(|c| c.is_alive()).count()
    }

    /// Check if population is extinct
    pub fn is_extinct(&self) -> bool {
        self.population() == 0
    }

    /// Seed used to build the RNG, if the world was seeded
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    pub fn generation_max(&self) -> u32 {
        self.cells.iter().map(|c| c.generation).max().unwrap_or(0)
    }
}

/// Two distinct mutable cells; requires `i < j`
fn pair_mut(cells: &mut [Cell], i: usize, j: usize) -> (&mut Cell, &mut Cell) {
    debug_assert!(i < j);
    let (left, right) = cells.split_at_mut(j);
    (&mut left[i], &mut right[0])
}

fn nearest_healer(cell: &Cell, healers: &[HealerRef]) -> Option<HealerRef> {
    healers
        .iter()
        .filter(|h| h.id != cell.id)
        .min_by(|a, b| cell.distance_to(a.x, a.y).total_cmp(&cell.distance_to(b.x, b.y)))
        .copied()
}
