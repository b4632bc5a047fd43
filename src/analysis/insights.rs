//! Human-readable observations derived from population statistics.

use crate::ecology::Environment;
use crate::stats::Stats;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Insights kept per analysis; the most recently generated win
pub const MAX_INSIGHTS: usize = 3;

/// Population change that counts as significant
const POPULATION_SWING: i64 = 10;
const HIGH_TRIBAL_PERCENT: f32 = 60.0;
const LOW_TRIBAL_PERCENT: f32 = 20.0;
/// Low tribal share is only reported for populations larger than this
const LOW_TRIBAL_MIN_POPULATION: usize = 10;
const CRITICAL_SCARCITY: f32 = 1.5;
const HIGH_INNOVATION: f32 = 2.0;
const HEAT_LIMIT: f32 = 35.0;
const COLD_LIMIT: f32 = 0.0;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Insight {
    PopulationGrowth(i64),
    PopulationDecline(i64),
    /// Percentage of cells in tribes
    HighCooperation(f32),
    LowCooperation(f32),
    CriticalScarcity(f32),
    /// Mean innovations per cell
    HighInnovation(f32),
    ExtremeHeat(f32),
    ExtremeCold(f32),
    /// Current knowledge ceiling
    CollectiveKnowledge(f32),
}

impl fmt::Display for Insight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Insight::PopulationGrowth(n) => write!(f, "Significant population growth: +{} cells", n),
            Insight::PopulationDecline(n) => write!(f, "Significant population decline: {} cells", n),
            Insight::HighCooperation(p) => write!(f, "High social cooperation: {:.1}% of cells in tribes", p),
            Insight::LowCooperation(p) => write!(f, "Low social cooperation: only {:.1}% of cells in tribes", p),
            Insight::CriticalScarcity(s) => write!(f, "Critical resource scarcity: {:.2}", s),
            Insight::HighInnovation(m) => write!(f, "High innovation: {:.1} innovations per cell", m),
            Insight::ExtremeHeat(t) => write!(f, "Critical high temperature: {:.1}°C", t),
            Insight::ExtremeCold(t) => write!(f, "Critical low temperature: {:.1}°C", t),
            Insight::CollectiveKnowledge(k) => write!(f, "Collective knowledge level: {:.1}", k),
        }
    }
}

/// Compare the current statistics against fixed thresholds.
/// `previous_population` is the population at the last analysis, if any.
pub fn generate_insights(stats: &Stats, previous_population: Option<usize>, environment: &Environment) -> Vec<Insight> {
    let mut insights = Vec::new();

    if stats.population > 0 {
        if let Some(previous) = previous_population {
            let change = stats.population as i64 - previous as i64;
            if change.abs() > POPULATION_SWING {
                insights.push(if change > 0 {
                    Insight::PopulationGrowth(change)
                } else {
                    Insight::PopulationDecline(change)
                });
            }
        }

        let tribal = stats.tribal_percentage();
        if tribal > HIGH_TRIBAL_PERCENT {
            insights.push(Insight::HighCooperation(tribal));
        } else if tribal < LOW_TRIBAL_PERCENT && stats.population > LOW_TRIBAL_MIN_POPULATION {
            insights.push(Insight::LowCooperation(tribal));
        }
    }

    if environment.resource_scarcity > CRITICAL_SCARCITY {
        insights.push(Insight::CriticalScarcity(environment.resource_scarcity));
    }

    if stats.population > 0 && stats.innovations_mean > HIGH_INNOVATION {
        insights.push(Insight::HighInnovation(stats.innovations_mean));
    }

    if environment.temperature > HEAT_LIMIT {
        insights.push(Insight::ExtremeHeat(environment.temperature));
    } else if environment.temperature < COLD_LIMIT {
        insights.push(Insight::ExtremeCold(environment.temperature));
    }

    if environment.knowledge_ceiling > 0.0 {
        insights.push(Insight::CollectiveKnowledge(environment.knowledge_ceiling));
    }

    let skip = insights.len().saturating_sub(MAX_INSIGHTS);
    insights.split_off(skip)
}
