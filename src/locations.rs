// src/locations.rs
//
// Where the bridge keeps its settings, data and cache.

use eyre::{eyre, Result};
use log::debug;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub trait LocationsProvider: Send + Sync {
    fn user_config(&self) -> &Path;
    fn user_data(&self) -> &Path;
    fn user_cache(&self) -> &Path;
}

/// Fresh, uniquely named directories under a caller-supplied root.
/// They are removed when the provider is dropped.
pub struct TestLocationsProvider {
    config: TempDir,
    data: TempDir,
    cache: TempDir,
}

impl TestLocationsProvider {
    pub fn new(dir: &Path) -> Result<Self> {
        let provider = Self {
            config: temp_dir_in(dir, "config")?,
            data: temp_dir_in(dir, "data")?,
            cache: temp_dir_in(dir, "cache")?,
        };
        debug!(
            "Test locations: config={:?} data={:?} cache={:?}",
            provider.config.path(),
            provider.data.path(),
            provider.cache.path()
        );
        Ok(provider)
    }
}

fn temp_dir_in(dir: &Path, prefix: &str) -> Result<TempDir> {
    tempfile::Builder::new()
        .prefix(prefix)
        .tempdir_in(dir)
        .map_err(|e| eyre!("Failed to create {} dir in {}: {}", prefix, dir.display(), e))
}

impl LocationsProvider for TestLocationsProvider {
    fn user_config(&self) -> &Path {
        self.config.path()
    }

    fn user_data(&self) -> &Path {
        self.data.path()
    }

    fn user_cache(&self) -> &Path {
        self.cache.path()
    }
}

/// The platform's per-user directories, one subdirectory per application.
pub struct SystemLocations {
    config: PathBuf,
    data: PathBuf,
    cache: PathBuf,
}

impl SystemLocations {
    pub fn new(app_name: &str) -> Result<Self> {
        let config = dirs::config_dir().ok_or_else(|| eyre!("No user config directory on this platform"))?;
        let data = dirs::data_dir().ok_or_else(|| eyre!("No user data directory on this platform"))?;
        let cache = dirs::cache_dir().ok_or_else(|| eyre!("No user cache directory on this platform"))?;

        Ok(Self {
            config: config.join(app_name),
            data: data.join(app_name),
            cache: cache.join(app_name),
        })
    }
}

impl LocationsProvider for SystemLocations {
    fn user_config(&self) -> &Path {
        &self.config
    }

    fn user_data(&self) -> &Path {
        &self.data
    }

    fn user_cache(&self) -> &Path {
        &self.cache
    }
}
