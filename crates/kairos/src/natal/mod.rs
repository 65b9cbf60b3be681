//! Natal chart houses and the per-body amplification profile.

pub mod chart;
pub mod profile;

pub use chart::{ChartError, HouseClass, HouseCusps, NatalChart};
pub use profile::{NatalProfile, NatalSettings};
