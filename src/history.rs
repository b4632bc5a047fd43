//! Bounded log of notable simulation events.

use crate::cell::{CellId, DeathCause, InnovationKind};
use crate::ecology::{CatastropheId, CatastropheKind, Season};
use crate::stats::PopulationAnalysis;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;

/// Event category, derived from the payload
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    KnowledgeDiscovery,
    Innovation,
    Birth,
    Death,
    Catastrophe,
    PopulationAnalysis,
    SeasonChange,
    System,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum EventPayload {
    /// A cell pushed the knowledge ceiling to a new maximum
    KnowledgeDiscovery { cell: CellId, knowledge: f32 },
    Innovation { cell: CellId, kind: InnovationKind, value: f32 },
    Birth { cell: CellId, parents: (CellId, CellId), generation: u32 },
    Death { cell: CellId, cause: DeathCause, age: f32, generation: u32 },
    Catastrophe { id: CatastropheId, kind: CatastropheKind, x: f32, y: f32, intensity: f32 },
    PopulationAnalysis { analysis: PopulationAnalysis, insights: Vec<String> },
    SeasonChange { season: Season, temperature: f32 },
    /// Driver notices such as halts and restarts
    System { message: String },
}

impl EventPayload {
    pub fn kind(&self) -> EventKind {
        match self {
            EventPayload::KnowledgeDiscovery { .. } => EventKind::KnowledgeDiscovery,
            EventPayload::Innovation { .. } => EventKind::Innovation,
            EventPayload::Birth { .. } => EventKind::Birth,
            EventPayload::Death { .. } => EventKind::Death,
            EventPayload::Catastrophe { .. } => EventKind::Catastrophe,
            EventPayload::PopulationAnalysis { .. } => EventKind::PopulationAnalysis,
            EventPayload::SeasonChange { .. } => EventKind::SeasonChange,
            EventPayload::System { .. } => EventKind::System,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HistoricalEvent {
    pub tick: u64,
    pub payload: EventPayload,
}

impl HistoricalEvent {
    #[inline]
    pub fn kind(&self) -> EventKind {
        self.payload.kind()
    }
}

impl fmt::Display for HistoricalEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] ", self.tick)?;
        match &self.payload {
            EventPayload::KnowledgeDiscovery { cell, knowledge } => {
                write!(f, "Cell {} reached knowledge {:.2}", cell, knowledge)
            }
            EventPayload::Innovation { cell, kind, value } => {
                write!(f, "Cell {} invented a {:?} ({:.2})", cell, kind, value)
            }
            EventPayload::Birth { cell, parents, generation } => write!(
                f,
                "Cell {} born to {} and {} (gen {})",
                cell, parents.0, parents.1, generation
            ),
            EventPayload::Death { cell, cause, age, .. } => {
                write!(f, "Cell {} died of {} at age {:.1}", cell, cause.name(), age)
            }
            EventPayload::Catastrophe { kind, x, y, intensity, .. } => write!(
                f,
                "{} at ({:.0}, {:.0}), intensity {:.2}",
                kind.name(),
                x,
                y,
                intensity
            ),
            EventPayload::PopulationAnalysis { analysis, .. } => write!(
                f,
                "Population {} | tribal {} | knowledge {:.2} | complexity {:.3}",
                analysis.population, analysis.tribal_count, analysis.average_knowledge, analysis.social_complexity
            ),
            EventPayload::SeasonChange { season, temperature } => {
                write!(f, "{} begins ({:.1}°C)", season, temperature)
            }
            EventPayload::System { message } => write!(f, "System: {}", message),
        }
    }
}

/// Ring buffer of events; the oldest entry is evicted once full
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HistoryLog {
    events: VecDeque<HistoricalEvent>,
    capacity: usize,
    /// Events ever recorded, including evicted ones
    total_recorded: u64,
}

impl HistoryLog {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            events: VecDeque::with_capacity(capacity),
            capacity,
            total_recorded: 0,
        }
    }

    pub fn record(&mut self, tick: u64, payload: EventPayload) {
        if self.events.len() == self.capacity {
            self.events.pop_front();
        }
        self.events.push_back(HistoricalEvent { tick, payload });
        self.total_recorded += 1;
    }

    /// Up to `n` most recent events, oldest first
    pub fn recent(&self, n: usize) -> Vec<HistoricalEvent> {
        let skip = self.events.len().saturating_sub(n);
        self.events.iter().skip(skip).cloned().collect()
    }

    /// Most recent event of the given kind
    pub fn last_of(&self, kind: EventKind) -> Option<&HistoricalEvent> {
        self.events.iter().rev().find(|e| e.kind() == kind)
    }

    pub fn count_kind(&self, kind: EventKind) -> usize {
        self.events.iter().filter(|e| e.kind() == kind).count()
    }

    pub fn iter(&self) -> impl Iterator<Item = &HistoricalEvent> {
        self.events.iter()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn total_recorded(&self) -> u64 {
        self.total_recorded
    }

    pub fn clear(&mut self) {
        self.events.clear();
        self.total_recorded = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn system(message: &str) -> EventPayload {
        EventPayload::System {
            message: message.to_string(),
        }
    }

    #[test]
    fn test_ring_buffer_evicts_oldest() {
        let mut log = HistoryLog::new(3);
        for tick in 0..5 {
            log.record(tick, system("tick"));
        }

        assert_eq!(log.len(), 3);
        assert_eq!(log.total_recorded(), 5);
        let ticks: Vec<u64> = log.iter().map(|e| e.tick).collect();
        assert_eq!(ticks, vec![2, 3, 4]);
    }

    #[test]
    fn test_recent_is_chronological() {
        let mut log = HistoryLog::new(10);
        for tick in 0..8 {
            log.record(tick, system("tick"));
        }

        let recent: Vec<u64> = log.recent(3).iter().map(|e| e.tick).collect();
        assert_eq!(recent, vec![5, 6, 7]);
        assert_eq!(log.recent(50).len(), 8);
    }

    #[test]
    fn test_kind_queries() {
        let mut log = HistoryLog::new(10);
        log.record(1, system("start"));
        log.record(
            2,
            EventPayload::SeasonChange {
                season: Season::Summer,
                temperature: 31.0,
            },
        );
        log.record(3, system("halt"));

        assert_eq!(log.count_kind(EventKind::System), 2);
        assert_eq!(log.last_of(EventKind::System).map(|e| e.tick), Some(3));
        assert!(log.last_of(EventKind::Birth).is_none());
    }

    #[test]
    fn test_display() {
        let event = HistoricalEvent {
            tick: 12,
            payload: EventPayload::Death {
                cell: 4,
                cause: DeathCause::Starvation,
                age: 3.5,
                generation: 1,
            },
        };
        assert_eq!(event.to_string(), "[12] Cell 4 died of starvation at age 3.5");
    }

    #[test]
    fn test_clear() {
        let mut log = HistoryLog::new(2);
        log.record(0, system("a"));
        log.clear();
        assert!(log.is_empty());
        assert_eq!(log.total_recorded(), 0);
        assert_eq!(log.capacity(), 2);
    }
}
