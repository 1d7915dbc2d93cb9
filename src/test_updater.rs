// src/test_updater.rs
//
// In-memory update provider for tests.
// Tests change the advertised versions at any time; the system under test reads them
// through the `Updater` trait from as many threads as it likes.

use eyre::Result;
use log::debug;
use semver::Version;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::updater::{Channel, Downloader, Release, Updater, VersionInfo, VersionInfoLegacy};

struct VersionState {
    latest: VersionInfoLegacy,
    releases: VersionInfo,
}

/// Update provider whose answers are set by the test.
/// Both protocol answers share one lock, so every read sees a whole write.
pub struct TestUpdater {
    state: RwLock<VersionState>,
}

impl TestUpdater {
    pub fn new(version: Version, min_auto: Version) -> Self {
        Self {
            state: RwLock::new(VersionState {
                latest: always_eligible(version, min_auto),
                releases: VersionInfo::default(),
            }),
        }
    }

    /// Replace the legacy answer. Rollout is always 1.0.
    pub fn set_latest_version_legacy(&self, version: Version, min_auto: Version) {
        debug!("TestUpdater: legacy version set to {} (min auto {})", version, min_auto);
        self.write().latest = always_eligible(version, min_auto);
    }

    /// Replace the multi-release answer wholesale.
    pub fn set_latest_version(&self, releases: VersionInfo) {
        debug!("TestUpdater: advertising {} release(s)", releases.releases.len());
        self.write().releases = releases;
    }

    /// Current legacy answer.
    pub fn latest_legacy(&self) -> VersionInfoLegacy {
        self.read().latest.clone()
    }

    /// Current multi-release answer.
    pub fn latest(&self) -> VersionInfo {
        self.read().releases.clone()
    }

    // Writers only ever assign whole values, so a poisoned lock still guards a complete one.
    fn read(&self) -> RwLockReadGuard<'_, VersionState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, VersionState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}

fn always_eligible(version: Version, min_auto: Version) -> VersionInfoLegacy {
    VersionInfoLegacy {
        version,
        min_auto,
        rollout_proportion: 1.0,
    }
}

impl Updater for TestUpdater {
    fn get_version_info_legacy(
        &self,
        _downloader: &dyn Downloader,
        _channel: Channel,
    ) -> Result<VersionInfoLegacy> {
        Ok(self.latest_legacy())
    }

    fn install_update_legacy(
        &self,
        _downloader: &dyn Downloader,
        _info: &VersionInfoLegacy,
    ) -> Result<()> {
        Ok(())
    }

    fn remove_old_updates(&self) -> Result<()> {
        Ok(())
    }

    fn get_version_info(&self, _downloader: &dyn Downloader) -> Result<VersionInfo> {
        Ok(self.latest())
    }

    fn install_update(&self, _downloader: &dyn Downloader, _release: &Release) -> Result<()> {
        Ok(())
    }
}
