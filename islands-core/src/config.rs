//! Island configuration, read from a JSON file.
//!
//! Generation workers read the configuration on every chunk, so the loaded
//! values are kept as an immutable snapshot that is swapped wholesale on
//! reload.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

/// Default world border diameter of an island.
pub const DEFAULT_MAX_ISLAND_SIZE: u32 = 512;

/// Values of the configuration file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct IslandsConfig {
    /// Generate island chunks normally, then empty them before lighting.
    pub protosky_mode: bool,
    /// World border diameter of every island.
    pub max_island_size: u32,
    /// Members allowed per team. `0` means unlimited.
    pub max_team_size: u32,
}

impl Default for IslandsConfig {
    fn default() -> Self {
        Self {
            protosky_mode: false,
            max_island_size: DEFAULT_MAX_ISLAND_SIZE,
            max_team_size: 0,
        }
    }
}

/// The live configuration and the file it came from.
#[derive(Debug)]
pub struct IslandsSettings {
    path: Option<PathBuf>,
    current: RwLock<Arc<IslandsConfig>>,
}

impl IslandsSettings {
    /// Loads the configuration at `path`, writing the defaults there first if
    /// the file does not exist.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read, written or parsed.
    pub fn load(path: impl Into<PathBuf>) -> anyhow::Result<Self> {
        let path = path.into();
        let config = Self::read_or_create(&path)?;
        log::info!(
            "Loaded island config from {}: protosky mode {}",
            path.display(),
            if config.protosky_mode { "on" } else { "off" }
        );
        Ok(Self {
            path: Some(path),
            current: RwLock::new(Arc::new(config)),
        })
    }

    /// Settings not backed by a file. `reload` keeps them unchanged.
    #[must_use]
    pub fn in_memory(config: IslandsConfig) -> Self {
        Self {
            path: None,
            current: RwLock::new(Arc::new(config)),
        }
    }

    fn read_or_create(path: &Path) -> anyhow::Result<IslandsConfig> {
        if !path.exists() {
            let config = IslandsConfig::default();
            let json = serde_json::to_string_pretty(&config)?;
            fs::write(path, json)
                .with_context(|| format!("failed to write {}", path.display()))?;
            log::info!("Created default island config at {}", path.display());
            return Ok(config);
        }
        let json = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        serde_json::from_str(&json).with_context(|| format!("invalid config {}", path.display()))
    }

    /// The configuration as currently loaded.
    #[must_use]
    pub fn snapshot(&self) -> Arc<IslandsConfig> {
        Arc::clone(&self.current.read())
    }

    /// Swaps in a new configuration.
    pub fn replace(&self, config: IslandsConfig) {
        *self.current.write() = Arc::new(config);
    }

    /// Re-reads the file. On error the previous configuration stays active.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed.
    pub fn reload(&self) -> anyhow::Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let config = Self::read_or_create(path)?;
        self.replace(config);
        log::info!("Reloaded island config from {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("islands-{}-{name}", std::process::id()));
        let _ = fs::remove_file(&path);
        path
    }

    #[test]
    fn test_missing_file_is_created_with_defaults() {
        let path = temp_path("defaults.json");
        let settings = IslandsSettings::load(&path).unwrap();
        assert_eq!(*settings.snapshot(), IslandsConfig::default());
        assert!(path.exists());
        fs::remove_file(path).unwrap();
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: IslandsConfig = serde_json::from_str(r#"{"protoskyMode": true}"#).unwrap();
        assert!(config.protosky_mode);
        assert_eq!(config.max_island_size, DEFAULT_MAX_ISLAND_SIZE);
        assert_eq!(config.max_team_size, 0);
    }

    #[test]
    fn test_reload_is_visible_to_new_snapshots() {
        let path = temp_path("reload.json");
        let settings = IslandsSettings::load(&path).unwrap();
        let before = settings.snapshot();

        fs::write(&path, r#"{"protoskyMode": true, "maxTeamSize": 4}"#).unwrap();
        settings.reload().unwrap();

        assert!(!before.protosky_mode);
        let after = settings.snapshot();
        assert!(after.protosky_mode);
        assert_eq!(after.max_team_size, 4);
        fs::remove_file(path).unwrap();
    }

    #[test]
    fn test_bad_reload_keeps_previous() {
        let path = temp_path("bad.json");
        fs::write(&path, r#"{"protoskyMode": true}"#).unwrap();
        let settings = IslandsSettings::load(&path).unwrap();
        fs::write(&path, "not json").unwrap();
        assert!(settings.reload().is_err());
        assert!(settings.snapshot().protosky_mode);
        fs::remove_file(path).unwrap();
    }
}
