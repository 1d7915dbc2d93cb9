// src/cfg/config.rs

use eyre::{eyre, Result};
use log::{debug, error};
use semver::Version;
use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::updater::{Release, VersionInfo};

/// Initial state of a harness, usually kept next to the test that uses it.
///
/// ```yaml
/// version: 3.4.0
/// min-auto: 3.0.0
/// releases:
///   - version: 3.5.0
///     category: early-access
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct HarnessConfig {
    pub version: Version,

    #[serde(alias = "min-auto")]
    pub min_auto: Version,

    /// Seed for the multi-release answer; empty unless given.
    #[serde(default)]
    pub releases: Vec<Release>,
}

impl HarnessConfig {
    pub fn new(version: Version, min_auto: Version) -> Self {
        Self {
            version,
            min_auto,
            releases: Vec::new(),
        }
    }

    pub fn version_info(&self) -> VersionInfo {
        VersionInfo::new(self.releases.clone())
    }
}

pub fn parse_config(content: &str) -> Result<HarnessConfig> {
    serde_yaml::from_str(content).map_err(|e| {
        error!("Failed to parse YAML: {}", e);
        eyre!("Failed to parse YAML: {}", e)
    })
}

pub fn load_config(config_path: &Path) -> Result<HarnessConfig> {
    debug!("Loading harness configuration from {:?}", config_path);

    let content = fs::read_to_string(config_path).map_err(|e| {
        error!("Failed to read config file {}: {}", config_path.display(), e);
        eyre!("Failed to read config file {}: {}", config_path.display(), e)
    })?;

    let cfg = parse_config(&content)?;

    debug!(
        "Loaded harness configuration: version {} (min auto {}), {} release(s)",
        cfg.version,
        cfg.min_auto,
        cfg.releases.len()
    );
    Ok(cfg)
}
