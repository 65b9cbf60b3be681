use crate::config::store::{ConfigSource, EmbeddedConfigSource};
use crate::config::types::{FilterConfig, OrbConfig, PresentationConfig, WeightConfig};
use crate::config::validate::{
    validate_filters, validate_orbs, validate_presentation, validate_sampling, validate_weights,
};
use crate::config::{effective_tree, ConfigError, ConfigKind};
use crate::period::{Scope, Tier};
use crate::sampling::SamplingProfile;
use log::{debug, info};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use toml::Table;

/// Result of validating one config kind
#[derive(Debug, Clone, PartialEq)]
pub enum ValidatedConfig {
    Sampling(SamplingProfile),
    Weights(WeightConfig),
    Filters(FilterConfig),
    Orbs(OrbConfig),
    Presentation(PresentationConfig),
}

impl ValidatedConfig {
    pub fn kind(&self) -> ConfigKind {
        match self {
            ValidatedConfig::Sampling(_) => ConfigKind::Sampling,
            ValidatedConfig::Weights(_) => ConfigKind::Weights,
            ValidatedConfig::Filters(_) => ConfigKind::Filters,
            ValidatedConfig::Orbs(_) => ConfigKind::Orbs,
            ValidatedConfig::Presentation(_) => ConfigKind::Presentation,
        }
    }
}

/// Everything a pipeline run needs for one (scope, tier)
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigBundle {
    pub scope: Scope,
    pub tier: Tier,
    pub sampling: SamplingProfile,
    pub weights: WeightConfig,
    pub filters: FilterConfig,
    pub orbs: OrbConfig,
}

/// Loads, merges and validates config, caching bundles per (scope, tier)
pub struct ConfigResolver {
    source: Arc<dyn ConfigSource>,
    cache: Mutex<HashMap<(Scope, Tier), Arc<ConfigBundle>>>,
}

impl ConfigResolver {
    pub fn new(source: Arc<dyn ConfigSource>) -> Self {
        Self {
            source,
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Resolver over the defaults compiled into the crate
    pub fn embedded() -> Self {
        Self::new(Arc::new(EmbeddedConfigSource))
    }

    pub fn source_name(&self) -> &str {
        self.source.name()
    }

    /// `deep_merge(defaults, profiles.<scope>.<tier>)` before validation
    pub fn effective(&self, kind: ConfigKind, scope: Scope, tier: Tier) -> Result<Table, ConfigError> {
        let doc = self.source.fetch_raw(kind, scope, tier)?;
        effective_tree(&doc, kind, scope, tier)
    }

    pub fn resolve(&self, kind: ConfigKind, scope: Scope, tier: Tier) -> Result<ValidatedConfig, ConfigError> {
        let tree = self.effective(kind, scope, tier)?;
        debug!("Validating {} config for {}/{}", kind, scope, tier);
        Ok(match kind {
            ConfigKind::Sampling => ValidatedConfig::Sampling(validate_sampling(&tree, scope)?),
            ConfigKind::Weights => ValidatedConfig::Weights(validate_weights(&tree)?),
            ConfigKind::Filters => ValidatedConfig::Filters(validate_filters(&tree)?),
            ConfigKind::Orbs => ValidatedConfig::Orbs(validate_orbs(&tree)?),
            ConfigKind::Presentation => {
                ValidatedConfig::Presentation(validate_presentation(&tree)?)
            }
        })
    }

    pub fn sampling(&self, scope: Scope, tier: Tier) -> Result<SamplingProfile, ConfigError> {
        validate_sampling(&self.effective(ConfigKind::Sampling, scope, tier)?, scope)
    }

    pub fn weights(&self, scope: Scope, tier: Tier) -> Result<WeightConfig, ConfigError> {
        validate_weights(&self.effective(ConfigKind::Weights, scope, tier)?)
    }

    pub fn filters(&self, scope: Scope, tier: Tier) -> Result<FilterConfig, ConfigError> {
        validate_filters(&self.effective(ConfigKind::Filters, scope, tier)?)
    }

    pub fn orbs(&self, scope: Scope, tier: Tier) -> Result<OrbConfig, ConfigError> {
        validate_orbs(&self.effective(ConfigKind::Orbs, scope, tier)?)
    }

    pub fn presentation(&self, scope: Scope, tier: Tier) -> Result<PresentationConfig, ConfigError> {
        validate_presentation(&self.effective(ConfigKind::Presentation, scope, tier)?)
    }

    /// Sampling, weights, filters and orbs for one (scope, tier).
    ///
    /// Successful bundles are cached; errors are not.
    pub fn resolve_bundle(&self, scope: Scope, tier: Tier) -> Result<Arc<ConfigBundle>, ConfigError> {
        if let Some(bundle) = self.lock_cache().get(&(scope, tier)) {
            debug!("Config bundle {}/{} served from cache", scope, tier);
            return Ok(Arc::clone(bundle));
        }

        let bundle = Arc::new(ConfigBundle {
            scope,
            tier,
            sampling: self.sampling(scope, tier)?,
            weights: self.weights(scope, tier)?,
            filters: self.filters(scope, tier)?,
            orbs: self.orbs(scope, tier)?,
        });
        info!(
            "Resolved config bundle {}/{} from {} ({})",
            scope,
            tier,
            self.source.name(),
            bundle.sampling.strategy.kind()
        );

        let mut cache = self.lock_cache();
        let entry = cache.entry((scope, tier)).or_insert(bundle);
        Ok(Arc::clone(entry))
    }

    pub fn clear_cache(&self) {
        self.lock_cache().clear();
    }

    fn lock_cache(&self) -> std::sync::MutexGuard<'_, HashMap<(Scope, Tier), Arc<ConfigBundle>>> {
        self.cache.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl std::fmt::Debug for ConfigResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfigResolver")
            .field("source", &self.source.name())
            .finish()
    }
}
