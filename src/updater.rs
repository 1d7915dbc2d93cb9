// src/updater.rs
//
// Update-provider capability and the version records it exchanges.
// Covers both the legacy single-version protocol and the multi-release one.

use eyre::Result;
use semver::Version;
use serde::{Deserialize, Serialize};
use url::Url;

/// Update channel a legacy version check is made against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    #[default]
    Stable,
    Early,
}

/// Answer of the legacy single-version update protocol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VersionInfoLegacy {
    pub version: Version,

    #[serde(alias = "min-auto")]
    pub min_auto: Version,

    /// Fraction of users eligible for this version, in `[0, 1]`.
    #[serde(alias = "rollout-proportion")]
    pub rollout_proportion: f64,
}

impl Default for VersionInfoLegacy {
    fn default() -> Self {
        Self {
            version: Version::new(0, 0, 0),
            min_auto: Version::new(0, 0, 0),
            rollout_proportion: 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReleaseCategory {
    #[default]
    Stable,
    EarlyAccess,
}

/// One advertised release of the multi-release protocol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Release {
    #[serde(default)]
    pub category: ReleaseCategory,

    pub version: Version,

    #[serde(alias = "min-auto", default)]
    pub min_auto: Option<Version>,

    #[serde(alias = "rollout-proportion", default = "full_rollout")]
    pub rollout_proportion: f64,

    #[serde(alias = "release-notes-page", default)]
    pub release_notes_page: Option<Url>,

    #[serde(alias = "landing-page", default)]
    pub landing_page: Option<Url>,
}

impl Release {
    /// A stable release with full rollout and no extra pages.
    pub fn new(version: Version) -> Self {
        Self {
            category: ReleaseCategory::Stable,
            version,
            min_auto: None,
            rollout_proportion: full_rollout(),
            release_notes_page: None,
            landing_page: None,
        }
    }

    pub fn with_category(mut self, category: ReleaseCategory) -> Self {
        self.category = category;
        self
    }

    pub fn with_min_auto(mut self, min_auto: Version) -> Self {
        self.min_auto = Some(min_auto);
        self
    }
}

fn full_rollout() -> f64 {
    1.0
}

/// Answer of the multi-release protocol. Handled as a single value.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct VersionInfo {
    #[serde(default)]
    pub releases: Vec<Release>,
}

impl VersionInfo {
    pub fn new(releases: Vec<Release>) -> Self {
        Self { releases }
    }
}

/// Fetches update artifacts. Passed through to the updater, which may ignore it.
pub trait Downloader: Send + Sync {
    /// Download `url` and check it against the detached signature at `sig_url`.
    fn download_and_verify(&self, url: &Url, sig_url: &Url) -> Result<Vec<u8>>;

    fn download_file(&self, url: &Url) -> Result<Vec<u8>>;
}

/// Update-provider capability consumed by the application's update checks.
pub trait Updater: Send + Sync {
    fn get_version_info_legacy(
        &self,
        downloader: &dyn Downloader,
        channel: Channel,
    ) -> Result<VersionInfoLegacy>;

    fn install_update_legacy(
        &self,
        downloader: &dyn Downloader,
        info: &VersionInfoLegacy,
    ) -> Result<()>;

    fn remove_old_updates(&self) -> Result<()>;

    fn get_version_info(&self, downloader: &dyn Downloader) -> Result<VersionInfo>;

    fn install_update(&self, downloader: &dyn Downloader, release: &Release) -> Result<()>;
}
