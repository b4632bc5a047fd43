//! Analysis module for insights, survival tracking and data export.

pub mod export;
pub mod insights;
pub mod survival;

pub use export::{ExportManifest, ExportSystem};
pub use insights::{generate_insights, Insight};
pub use survival::{DeathRecord, SurvivalAnalyzer, SurvivalStats};
