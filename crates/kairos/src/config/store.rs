use crate::config::{deep_merge, ConfigError, ConfigKind};
use crate::period::{Scope, Tier};
use log::{debug, info};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use toml::Table;

/// Environment variable naming a config directory
pub const CONFIG_DIR_ENV: &str = "KAIROS_CONFIG_DIR";

/// Where raw configuration documents come from.
///
/// Implementations return the whole document (`[defaults]` plus
/// `[profiles...]`); merging and validation happen in the resolver.
pub trait ConfigSource: Send + Sync {
    fn name(&self) -> &str;

    fn fetch_raw(&self, kind: ConfigKind, scope: Scope, tier: Tier) -> Result<Table, ConfigError>;
}

fn parse_document(kind: ConfigKind, text: &str) -> Result<Table, ConfigError> {
    text.parse::<Table>().map_err(|e| ConfigError::Parse {
        kind,
        message: e.to_string(),
    })
}

/// Reads `<dir>/<kind>.toml`.
///
/// An optional `<dir>/<kind>.<scope>.<tier>.toml` is merged into
/// `profiles.<scope>.<tier>` so deployments can override a single profile
/// without copying the whole document.
#[derive(Debug, Clone)]
pub struct DirConfigSource {
    dir: PathBuf,
    name: String,
}

impl DirConfigSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        let name = format!("dir:{}", dir.display());
        Self { dir, name }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn read(&self, kind: ConfigKind, path: &Path) -> Result<Table, ConfigError> {
        let text = fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ConfigError::NotFound {
                    kind,
                    location: path.display().to_string(),
                }
            } else {
                ConfigError::Io {
                    kind,
                    location: path.display().to_string(),
                    message: e.to_string(),
                }
            }
        })?;
        parse_document(kind, &text)
    }
}

impl ConfigSource for DirConfigSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn fetch_raw(&self, kind: ConfigKind, scope: Scope, tier: Tier) -> Result<Table, ConfigError> {
        let mut doc = self.read(kind, &self.dir.join(kind.file_name()))?;

        let overlay_path = self.dir.join(format!("{}.{}.{}.toml", kind, scope, tier));
        if overlay_path.is_file() {
            debug!("Merging profile overlay {}", overlay_path.display());
            let overlay = self.read(kind, &overlay_path)?;

            let mut by_tier = Table::new();
            by_tier.insert(tier.as_str().to_string(), toml::Value::Table(overlay));
            let mut by_scope = Table::new();
            by_scope.insert(scope.as_str().to_string(), toml::Value::Table(by_tier));
            let mut wrapper = Table::new();
            wrapper.insert("profiles".to_string(), toml::Value::Table(by_scope));

            doc = deep_merge(&doc, &wrapper);
        }

        Ok(doc)
    }
}

const EMBEDDED_SAMPLING: &str = include_str!("../../configs/sampling.toml");
const EMBEDDED_WEIGHTS: &str = include_str!("../../configs/weights.toml");
const EMBEDDED_FILTERS: &str = include_str!("../../configs/filters.toml");
const EMBEDDED_ORBS: &str = include_str!("../../configs/orbs.toml");
const EMBEDDED_PRESENTATION: &str = include_str!("../../configs/presentation.toml");

/// Default bundles compiled into the crate
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbeddedConfigSource;

impl EmbeddedConfigSource {
    pub fn text(kind: ConfigKind) -> &'static str {
        match kind {
            ConfigKind::Sampling => EMBEDDED_SAMPLING,
            ConfigKind::Weights => EMBEDDED_WEIGHTS,
            ConfigKind::Filters => EMBEDDED_FILTERS,
            ConfigKind::Orbs => EMBEDDED_ORBS,
            ConfigKind::Presentation => EMBEDDED_PRESENTATION,
        }
    }
}

impl ConfigSource for EmbeddedConfigSource {
    fn name(&self) -> &str {
        "embedded"
    }

    fn fetch_raw(&self, kind: ConfigKind, _scope: Scope, _tier: Tier) -> Result<Table, ConfigError> {
        parse_document(kind, Self::text(kind))
    }
}

/// In-memory documents, mostly for tests
#[derive(Debug, Clone, Default)]
pub struct MemoryConfigSource {
    docs: HashMap<ConfigKind, Table>,
}

impl MemoryConfigSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from the embedded defaults
    pub fn from_embedded() -> Result<Self, ConfigError> {
        let mut source = Self::new();
        for kind in ConfigKind::ALL {
            source
                .docs
                .insert(kind, parse_document(kind, EmbeddedConfigSource::text(kind))?);
        }
        Ok(source)
    }

    pub fn insert(&mut self, kind: ConfigKind, doc: Table) {
        self.docs.insert(kind, doc);
    }

    pub fn insert_str(&mut self, kind: ConfigKind, text: &str) -> Result<(), ConfigError> {
        let doc = parse_document(kind, text)?;
        self.docs.insert(kind, doc);
        Ok(())
    }

    pub fn with_str(mut self, kind: ConfigKind, text: &str) -> Result<Self, ConfigError> {
        self.insert_str(kind, text)?;
        Ok(self)
    }
}

impl ConfigSource for MemoryConfigSource {
    fn name(&self) -> &str {
        "memory"
    }

    fn fetch_raw(&self, kind: ConfigKind, _scope: Scope, _tier: Tier) -> Result<Table, ConfigError> {
        self.docs.get(&kind).cloned().ok_or(ConfigError::NotFound {
            kind,
            location: "memory".to_string(),
        })
    }
}

/// Pick a config source: explicit directory, then `KAIROS_CONFIG_DIR`, then
/// the embedded defaults.
pub fn discover_source(explicit: Option<&Path>) -> Arc<dyn ConfigSource> {
    if let Some(dir) = explicit {
        info!("Using config directory {}", dir.display());
        return Arc::new(DirConfigSource::new(dir));
    }
    match std::env::var(CONFIG_DIR_ENV) {
        Ok(dir) if !dir.trim().is_empty() => {
            info!("Using config directory {} (from {})", dir, CONFIG_DIR_ENV);
            Arc::new(DirConfigSource::new(dir))
        }
        _ => {
            info!("Using embedded config defaults");
            Arc::new(EmbeddedConfigSource)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_dir(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "kairos-store-{}-{}",
            tag,
            std::process::id()
        ));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_embedded_documents_parse() {
        for kind in ConfigKind::ALL {
            let doc = EmbeddedConfigSource
                .fetch_raw(kind, Scope::Weekly, Tier::Free)
                .unwrap();
            assert!(doc.contains_key("defaults"), "{} has no defaults", kind);
        }
    }

    #[test]
    fn test_dir_source_missing_file() {
        let dir = temp_dir("missing");
        let source = DirConfigSource::new(&dir);
        let err = source
            .fetch_raw(ConfigKind::Orbs, Scope::Daily, Tier::Free)
            .unwrap_err();
        assert!(matches!(err, ConfigError::NotFound { kind: ConfigKind::Orbs, .. }));
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_dir_source_merges_profile_overlay() {
        let dir = temp_dir("overlay");
        fs::write(
            dir.join("filters.toml"),
            "[defaults]\nx = 1\n[profiles.daily.free]\ny = 2\n",
        )
        .unwrap();
        fs::write(dir.join("filters.daily.free.toml"), "y = 3\nz = 4\n").unwrap();

        let source = DirConfigSource::new(&dir);
        let doc = source
            .fetch_raw(ConfigKind::Filters, Scope::Daily, Tier::Free)
            .unwrap();
        let profile = &doc["profiles"]["daily"]["free"];
        assert_eq!(profile["y"].as_integer(), Some(3));
        assert_eq!(profile["z"].as_integer(), Some(4));
        assert_eq!(doc["defaults"]["x"].as_integer(), Some(1));
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_dir_source_parse_error() {
        let dir = temp_dir("parse");
        fs::write(dir.join("weights.toml"), "[defaults\n").unwrap();
        let err = DirConfigSource::new(&dir)
            .fetch_raw(ConfigKind::Weights, Scope::Daily, Tier::Free)
            .unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_memory_source_missing_kind() {
        let source = MemoryConfigSource::new();
        assert!(source
            .fetch_raw(ConfigKind::Sampling, Scope::Daily, Tier::Free)
            .is_err());
    }
}
