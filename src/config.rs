//! Configuration surface recognized by the core (spec §6).
//!
//! Loaded from TOML via `serde`, with `Default` impls providing the values
//! named in the specification so a caller can start from
//! `CoreConfig::default()` and override only what it needs.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::mining::MiningOptions;

fn default_max_cache_size() -> usize {
    1000
}

fn default_cache_ttl_secs() -> u64 {
    3600
}

fn default_min_confidence() -> f64 {
    0.0
}

/// Composite-corrector configuration (spec §6: `max_cache_size`, `cache_ttl`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CompositeConfig {
    pub max_cache_size: usize,
    pub cache_ttl_secs: u64,
}

impl CompositeConfig {
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }
}

impl Default for CompositeConfig {
    fn default() -> Self {
        Self {
            max_cache_size: default_max_cache_size(),
            cache_ttl_secs: default_cache_ttl_secs(),
        }
    }
}

/// Synonym-provider configuration (spec §6: `min_confidence`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SynonymConfig {
    pub min_confidence: f64,
    pub dictionary_path: Option<PathBuf>,
}

impl Default for SynonymConfig {
    fn default() -> Self {
        Self {
            min_confidence: default_min_confidence(),
            dictionary_path: None,
        }
    }
}

/// Root configuration document for the query-enhancement core.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct CoreConfig {
    pub composite: CompositeConfig,
    pub synonyms: SynonymConfig,
    pub mining: MiningOptions,
}

impl CoreConfig {
    /// Loads configuration from a TOML file. A missing file falls back to
    /// defaults with a warning; malformed TOML is an error — unlike the
    /// synonym dictionary, a broken config file should stop startup rather
    /// than silently run with unintended defaults.
    pub fn load(path: &std::path::Path) -> anyhow::Result<Self> {
        if !path.exists() {
            log::warn!("no config file at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path)?;
        let config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Saves this configuration to `path`, creating parent directories.
    pub fn save(&self, path: &std::path::Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = toml::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Resolves the on-disk location of the synonym dictionary, defaulting
    /// to the platform's local data directory.
    pub fn dictionary_path(&self) -> PathBuf {
        self.synonyms.dictionary_path.clone().unwrap_or_else(|| {
            dirs::data_local_dir()
                .unwrap_or_else(std::env::temp_dir)
                .join("queryforge")
                .join("synonyms.json")
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_documented_values() {
        let config = CoreConfig::default();
        assert_eq!(config.composite.max_cache_size, 1000);
        assert_eq!(config.composite.cache_ttl().as_secs(), 3600);
        assert_eq!(config.synonyms.min_confidence, 0.0);
    }

    #[test]
    fn load_falls_back_to_defaults_when_file_is_missing() {
        let config =
            CoreConfig::load(std::path::Path::new("/nonexistent/queryforge.toml")).unwrap();
        assert_eq!(config.composite.max_cache_size, 1000);
    }

    #[test]
    fn toml_roundtrip_preserves_mining_options() {
        let mut config = CoreConfig::default();
        config.mining.min_similarity = 0.4;
        let serialized = toml::to_string_pretty(&config).unwrap();
        let deserialized: CoreConfig = toml::from_str(&serialized).unwrap();
        assert_eq!(deserialized.mining.min_similarity, 0.4);
    }
}
