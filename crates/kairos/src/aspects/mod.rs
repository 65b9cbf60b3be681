pub mod matcher;
pub mod types;

pub use matcher::{angular_separation, AspectMatcher};
pub use types::{AspectInstance, AspectMatch, AspectType, NatalAspect};
