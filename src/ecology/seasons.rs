//! Seasonal cycle: temperature bands and resource scarcity per season.

use serde::{Deserialize, Serialize};

/// The four seasons
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Season {
    Spring,
    Summer,
    Autumn,
    Winter,
}

impl Season {
    /// Base temperature the season reseeds to on transition
    pub fn base_temperature(&self) -> f32 {
        match self {
            Season::Spring => 20.0,
            Season::Summer => 30.0,
            Season::Autumn => 15.0,
            Season::Winter => 5.0,
        }
    }

    /// Half-width of the jitter applied around the base temperature
    pub fn temperature_jitter(&self) -> f32 {
        match self {
            Season::Spring => 2.0,
            Season::Summer => 3.0,
            Season::Autumn => 2.0,
            Season::Winter => 3.0,
        }
    }

    /// Scarcity before crowding is applied. Harsher seasons are scarcer.
    pub fn base_scarcity(&self) -> f32 {
        match self {
            Season::Spring => 0.7,
            Season::Summer => 0.5,
            Season::Autumn => 0.8,
            Season::Winter => 1.2,
        }
    }

    /// Get next season
    pub fn next(&self) -> Season {
        match self {
            Season::Spring => Season::Summer,
            Season::Summer => Season::Autumn,
            Season::Autumn => Season::Winter,
            Season::Winter => Season::Spring,
        }
    }

    /// Get display name
    pub fn name(&self) -> &'static str {
        match self {
            Season::Spring => "Spring",
            Season::Summer => "Summer",
            Season::Autumn => "Autumn",
            Season::Winter => "Winter",
        }
    }
}

impl std::fmt::Display for Season {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
