//! Read-only snapshot of the world for renderers and exporters.
//!
//! These are lightweight copies of simulation state; building one never
//! mutates the world.

use crate::cell::CellId;
use crate::ecology::{CatastropheKind, FoodKind, Season};
use crate::history::HistoricalEvent;
use crate::stats::Stats;
use crate::tribe::TribeId;
use crate::world::World;
use serde::{Deserialize, Serialize};

/// Lightweight view of a cell for rendering
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CellView {
    pub id: CellId,
    pub x: f32,
    pub y: f32,
    pub radius: f32,
    pub color: [u8; 3],
    pub energy: f32,
    pub generation: u32,
    pub tribe: Option<TribeId>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FoodView {
    pub x: f32,
    pub y: f32,
    pub radius: f32,
    pub kind: FoodKind,
    pub color: [u8; 3],
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CatastropheView {
    pub x: f32,
    pub y: f32,
    pub radius: f32,
    pub kind: CatastropheKind,
    pub age: u32,
    pub duration: u32,
    /// Remaining strength in [0, 1]
    pub fade: f32,
}

/// Environment readings at snapshot time
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentView {
    pub temperature: f32,
    pub season: Season,
    pub season_progress: f32,
    pub resource_scarcity: f32,
    pub knowledge_ceiling: f32,
}

/// Complete world snapshot
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WorldSnapshot {
    /// Current simulation time
    pub tick: u64,
    pub cells: Vec<CellView>,
    pub foods: Vec<FoodView>,
    /// Active catastrophes only
    pub catastrophes: Vec<CatastropheView>,
    /// Most recent history entries, oldest first
    pub recent_events: Vec<HistoricalEvent>,
    pub environment: EnvironmentView,
    pub stats: Stats,
}

impl WorldSnapshot {
    /// Create a snapshot from the current world state
    pub fn from_world(world: &World) -> Self {
        let cells = world
            .cells
            .iter()
            .filter(|c| c.is_alive())
            .map(|c| CellView {
                id: c.id,
                x: c.x,
                y: c.y,
                radius: c.radius,
                color: c.genome.color(),
                energy: c.energy,
                generation: c.generation,
                tribe: c.tribe,
            })
            .collect();

        let foods = world
            .foods
            .iter()
            .map(|f| FoodView {
                x: f.x,
                y: f.y,
                radius: f.radius,
                kind: f.kind,
                color: f.kind.color(),
            })
            .collect();

        let catastrophes = world
            .catastrophes
            .iter()
            .filter(|c| c.active)
            .map(|c| CatastropheView {
                x: c.x,
                y: c.y,
                radius: c.radius,
                kind: c.kind,
                age: c.age,
                duration: c.duration,
                fade: c.fade(),
            })
            .collect();

        let env = &world.environment;
        Self {
            tick: world.time,
            cells,
            foods,
            catastrophes,
            recent_events: world.history.recent(world.config.logging.snapshot_events),
            environment: EnvironmentView {
                temperature: env.temperature,
                season: env.season,
                season_progress: env.season_progress(),
                resource_scarcity: env.resource_scarcity,
                knowledge_ceiling: env.knowledge_ceiling,
            },
            stats: world.stats.clone(),
        }
    }

    #[inline]
    pub fn population(&self) -> usize {
        self.cells.len()
    }
}
