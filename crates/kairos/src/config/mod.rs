//! Configuration bundles per (scope, tier).
//!
//! Raw TOML documents come from a [`ConfigSource`]. Each document has a
//! `[defaults]` table and optional `[profiles.<scope>.<tier>]` tables; the
//! resolver deep-merges the matching profile over the defaults and validates
//! the result into typed config.

pub mod error;
pub mod merge;
pub mod resolver;
pub mod store;
pub mod types;
pub mod validate;

pub use error::ConfigError;
pub use merge::{deep_merge, effective_tree};
pub use resolver::{ConfigBundle, ConfigResolver, ValidatedConfig};
pub use store::{
    discover_source, ConfigSource, DirConfigSource, EmbeddedConfigSource, MemoryConfigSource,
    CONFIG_DIR_ENV,
};
pub use types::{
    BodyInclusion, FilterConfig, OrbConfig, PresentationConfig, RelevanceMode, Theme,
    WeightConfig,
};

use serde::{Deserialize, Serialize};
use std::fmt;

/// The five configuration documents
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfigKind {
    Sampling,
    Weights,
    Filters,
    Orbs,
    Presentation,
}

impl ConfigKind {
    pub const ALL: [ConfigKind; 5] = [
        ConfigKind::Sampling,
        ConfigKind::Weights,
        ConfigKind::Filters,
        ConfigKind::Orbs,
        ConfigKind::Presentation,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ConfigKind::Sampling => "sampling",
            ConfigKind::Weights => "weights",
            ConfigKind::Filters => "filters",
            ConfigKind::Orbs => "orbs",
            ConfigKind::Presentation => "presentation",
        }
    }

    pub fn file_name(&self) -> String {
        format!("{}.toml", self.as_str())
    }
}

impl fmt::Display for ConfigKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
