//! Ecological systems.
//!
//! This module contains:
//! - Seasonal cycle (temperature bands, scarcity bases)
//! - Environment state machine (season, temperature, scarcity, knowledge ceiling)
//! - Catastrophes (earthquakes and wildfires)
//! - Food items

pub mod catastrophe;
pub mod environment;
pub mod food;
pub mod seasons;

pub use catastrophe::{Catastrophe, CatastropheId, CatastropheKind};
pub use environment::{Environment, EnvironmentUpdate};
pub use food::{Food, FoodId, FoodKind};
pub use seasons::Season;
