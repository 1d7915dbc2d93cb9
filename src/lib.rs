// src/lib.rs
//
// Test doubles for the bridge's collaborators.
// `Mocks` bundles them; `TestUpdater` serves versions set by the test.

pub mod cfg;
pub mod cookie_jar;
pub mod expect;
pub mod locations;
pub mod mocks;
pub mod test_updater;
pub mod updater;

use env_logger::Builder;

pub use cfg::config::{load_config, HarnessConfig};
pub use cookie_jar::{Cookie, CookieJar, TestCookieJar};
pub use expect::{Controller, RecordedCall, Times};
pub use locations::{LocationsProvider, SystemLocations, TestLocationsProvider};
pub use mocks::{Mocks, TlsIssueChannel};
pub use test_updater::TestUpdater;
pub use updater::{Channel, Downloader, Release, ReleaseCategory, Updater, VersionInfo, VersionInfoLegacy};

/// Route `log` output through the test harness. `RUST_LOG` picks the level.
/// Safe to call from every test.
pub fn init_logging() {
    Builder::new()
        .parse_default_env()
        .is_test(true)
        .try_init()
        .ok();
}
