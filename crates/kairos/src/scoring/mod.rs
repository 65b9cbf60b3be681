pub mod engine;
pub mod falloff;

pub use engine::{OrbContext, ScoredAspect, ScoringEngine};
pub use falloff::{Falloff, FalloffMode};
