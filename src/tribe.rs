//! Tribes - cooperative groups that pool knowledge and resources.
//!
//! A tribe refers to its members by [`CellId`]; the world owns the cells and
//! resolves ids through an index built once per tick.

use crate::cell::{Cell, CellId, Resource};
use crate::config::{CellConfig, TribeConfig};
use crate::rng;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Unique tribe identifier, never reused within a run
pub type TribeId = u64;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TraditionKind {
    Ritual,
    Custom,
    Belief,
}

impl TraditionKind {
    pub const ALL: [TraditionKind; 3] = [TraditionKind::Ritual, TraditionKind::Custom, TraditionKind::Belief];
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Tradition {
    pub kind: TraditionKind,
    pub value: f32,
    pub founded_at: u64,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Culture {
    pub traditions: Vec<Tradition>,
    /// Belief traditions, also listed in `traditions`
    pub beliefs: Vec<Tradition>,
    pub technology: f32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Territory {
    pub x: f32,
    pub y: f32,
    pub radius: f32,
}

impl Territory {
    #[inline]
    pub fn contains(&self, x: f32, y: f32) -> bool {
        (self.x - x).hypot(self.y - y) <= self.radius
    }
}

/// What happened during one tribe update
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TribeUpdate {
    pub tradition: Option<Tradition>,
    /// Resources moved from members into the pool
    pub deposits: usize,
    /// Members fed from the pool
    pub top_ups: usize,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Tribe {
    pub id: TribeId,
    pub members: Vec<CellId>,
    /// Best knowledge among members
    pub knowledge: f32,
    pub culture: Culture,
    pub territory: Territory,
    /// Shared resource pool
    pub resources: Vec<Resource>,
    pub founded_at: u64,
}

impl Tribe {
    /// New tribe of two; territory centered on the founder
    pub fn found(id: TribeId, founder: &Cell, partner: &Cell, config: &TribeConfig, tick: u64) -> Self {
        Self {
            id,
            members: vec![founder.id, partner.id],
            knowledge: founder.knowledge,
            culture: Culture::default(),
            territory: Territory {
                x: founder.x,
                y: founder.y,
                radius: config.territory_radius,
            },
            resources: Vec::new(),
            founded_at: tick,
        }
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.members.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn contains(&self, id: CellId) -> bool {
        self.members.contains(&id)
    }

    pub fn add_member(&mut self, id: CellId) {
        if !self.contains(id) {
            self.members.push(id);
        }
    }

    /// Drop members that fail `is_alive`. Returns how many were removed.
    pub fn purge<F: Fn(CellId) -> bool>(&mut self, is_alive: F) -> usize {
        let before = self.members.len();
        self.members.retain(|&id| is_alive(id));
        before - self.members.len()
    }

    /// One tick of culture, teaching and pool sharing
    pub fn update<R: Rng + ?Sized>(
        &mut self,
        cells: &mut [Cell],
        index: &HashMap<CellId, usize>,
        tribes: &TribeConfig,
        cell_config: &CellConfig,
        tick: u64,
        rng: &mut R,
    ) -> TribeUpdate {
        let mut update = TribeUpdate::default();
        let members: Vec<usize> = self
            .members
            .iter()
            .filter_map(|id| index.get(id).copied())
            .filter(|&i| cells[i].is_alive())
            .collect();
        if members.is_empty() {
            return update;
        }

        let total_knowledge: f32 = members.iter().map(|&i| cells[i].knowledge).sum();
        self.culture.technology += total_knowledge * tribes.technology_rate;

        if rng::chance(rng, tribes.tradition_chance) {
            let tradition = Tradition {
                kind: rng::pick(rng, &TraditionKind::ALL),
                value: rng::range(rng, 0.0, 1.0),
                founded_at: tick,
            };
            if tradition.kind == TraditionKind::Belief {
                self.culture.beliefs.push(tradition.clone());
            }
            self.culture.traditions.push(tradition.clone());
            update.tradition = Some(tradition);
        }

        // Teaching pulls everyone toward the best member
        let best = members
            .iter()
            .map(|&i| cells[i].knowledge)
            .fold(0.0_f32, f32::max);
        for &i in &members {
            let cell = &mut cells[i];
            if cell.knowledge < best {
                cell.knowledge += (best - cell.knowledge) * tribes.teaching_rate;
            }
        }
        self.knowledge = best;

        for &i in &members {
            let cell = &mut cells[i];
            if cell.resources.len() >= cell_config.max_resources && rng::chance(rng, cell.social.sharing) {
                if let Some(resource) = cell.resources.pop() {
                    self.resources.push(resource);
                    update.deposits += 1;
                }
            }
        }

        for &i in &members {
            let cell = &mut cells[i];
            if cell.energy < tribes.energy_floor {
                if self.resources.pop().is_none() {
                    break;
                }
                cell.energy += tribes.pool_top_up;
                update.top_ups += 1;
            }
        }

        update
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::ResourceKind;
    use crate::config::Config;
    use crate::rng::seeded;
    use rand::rngs::mock::StepRng;

    fn members(config: &Config) -> (Vec<Cell>, HashMap<CellId, usize>) {
        let mut rng = seeded(21);
        let cells: Vec<Cell> = (0..3)
            .map(|i| Cell::new(i, 100.0 + i as f32 * 10.0, 100.0, config, 0, &mut rng))
            .collect();
        let index = cells.iter().enumerate().map(|(i, c)| (c.id, i)).collect();
        (cells, index)
    }

    fn resource(value: f32) -> Resource {
        Resource {
            kind: ResourceKind::Food,
            value,
            scarcity_at_acquisition: 1.0,
        }
    }

    #[test]
    fn test_found_tribe() {
        let config = Config::default();
        let (mut cells, _) = members(&config);
        cells[0].knowledge = 2.5;
        let tribe = Tribe::found(4, &cells[0], &cells[1], &config.tribes, 12);

        assert_eq!(tribe.members, vec![0, 1]);
        assert_eq!(tribe.knowledge, 2.5);
        assert_eq!(tribe.territory.radius, 100.0);
        assert!(tribe.territory.contains(150.0, 100.0));
        assert_eq!(tribe.founded_at, 12);
    }

    #[test]
    fn test_teaching_and_technology() {
        let config = Config::default();
        let (mut cells, index) = members(&config);
        cells[0].knowledge = 10.0;
        cells[1].knowledge = 0.0;
        let mut tribe = Tribe::found(0, &cells[0], &cells[1], &config.tribes, 0);
        let mut rng = StepRng::new(u64::MAX, 0);

        tribe.update(&mut cells, &index, &config.tribes, &config.cells, 1, &mut rng);

        assert!((cells[1].knowledge - 1.0).abs() < 1e-5);
        assert_eq!(cells[0].knowledge, 10.0);
        assert_eq!(tribe.knowledge, 10.0);
        assert!((tribe.culture.technology - 0.01).abs() < 1e-6);
        assert!(tribe.culture.traditions.is_empty());
    }

    #[test]
    fn test_tradition_with_forced_roll() {
        let config = Config::default();
        let (mut cells, index) = members(&config);
        let mut tribe = Tribe::found(0, &cells[0], &cells[1], &config.tribes, 0);

        let update = tribe.update(&mut cells, &index, &config.tribes, &config.cells, 5, &mut StepRng::new(0, 0));

        let tradition = update.tradition.unwrap();
        // Zero generator picks the first kind
        assert_eq!(tradition.kind, TraditionKind::Ritual);
        assert_eq!(tribe.culture.traditions.len(), 1);
        assert!(tribe.culture.beliefs.is_empty());
    }

    #[test]
    fn test_pool_sharing() {
        let config = Config::default();
        let (mut cells, index) = members(&config);
        cells[0].resources = vec![resource(10.0), resource(20.0), resource(25.0)];
        cells[0].social.sharing = 1.0;
        cells[1].energy = 40.0;
        let mut tribe = Tribe::found(0, &cells[0], &cells[1], &config.tribes, 0);

        let update = tribe.update(&mut cells, &index, &config.tribes, &config.cells, 1, &mut seeded(2));

        assert_eq!(update.deposits, 1);
        assert_eq!(update.top_ups, 1);
        assert_eq!(cells[0].resources.len(), 2);
        // Flat top-up regardless of the pooled resource's value
        assert!((cells[1].energy - 60.0).abs() < 1e-5);
        assert!(tribe.resources.is_empty());
    }

    #[test]
    fn test_empty_pool_gives_nothing() {
        let config = Config::default();
        let (mut cells, index) = members(&config);
        cells[1].energy = 10.0;
        let mut tribe = Tribe::found(0, &cells[0], &cells[1], &config.tribes, 0);

        let update = tribe.update(&mut cells, &index, &config.tribes, &config.cells, 1, &mut seeded(2));

        assert_eq!(update.top_ups, 0);
        assert_eq!(cells[1].energy, 10.0);
    }

    #[test]
    fn test_purge_dead_members() {
        let config = Config::default();
        let (cells, _) = members(&config);
        let mut tribe = Tribe::found(0, &cells[0], &cells[1], &config.tribes, 0);
        tribe.add_member(2);
        tribe.add_member(2);
        assert_eq!(tribe.size(), 3);

        let removed = tribe.purge(|id| id != 1);
        assert_eq!(removed, 1);
        assert_eq!(tribe.members, vec![0, 2]);

        tribe.purge(|_| false);
        assert!(tribe.is_empty());
    }
}
