//! Genetics module - heritable genome, social disposition and pairwise reproduction.

pub mod genome;
pub mod reproduction;
pub mod social;

pub use genome::{GeneTrait, Genome};
pub use reproduction::{MatingContext, MatingOutcome, ReproductionSystem};
pub use social::SocialProfile;
