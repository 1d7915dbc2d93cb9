// src/mocks/mod.rs
//
// Mock collaborators of the bridge and the `Mocks` bundle that wires them up.

pub mod autostart;
pub mod crash;
pub mod heartbeat;
pub mod proxy;
pub mod reporter;
pub mod tls;

use log::{debug, info};
use semver::Version;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crate::cfg::config::HarnessConfig;
use crate::expect::Controller;
use crate::test_updater::TestUpdater;

pub use autostart::{Autostarter, MockAutostarter};
pub use crash::{run_guarded, MockPanicHandler, PanicHandler};
pub use heartbeat::{HeartbeatManager, MockHeartbeatManager};
pub use proxy::{MockProxyController, ProxyController};
pub use reporter::{Context, MockReporter, Reporter};
pub use tls::{MockTlsReporter, TlsIssueChannel, TlsReporter};

/// Interval the mock heartbeat manager reports.
pub const HEARTBEAT_INTERVAL: Duration = Duration::from_millis(500);

/// Reported whenever a sync is interrupted; tolerated any number of times.
pub const SYNC_RETRY_MESSAGE: &str = "Failed to sync, will retry later";

/// One of every collaborator the bridge needs, sharing a single controller.
///
/// Background calls the bridge makes all the time are already allowed:
/// - `get_tls_issue_ch` returns `tls_issue_ch`
/// - `handle_panic` with any payload
/// - `is_telemetry_available`, and `get_heartbeat_periodic_interval` returning 500ms
/// - `report_message_with_context` with [`SYNC_RETRY_MESSAGE`]
///
/// Dropping the harness closes `tls_issue_ch` if still open and then checks
/// every expectation.
pub struct Mocks {
    pub controller: Arc<Controller>,

    pub proxy_ctl: MockProxyController,
    pub tls_reporter: MockTlsReporter,
    pub tls_issue_ch: TlsIssueChannel,

    pub updater: Arc<TestUpdater>,
    pub autostarter: MockAutostarter,

    pub crash_handler: MockPanicHandler,
    pub reporter: MockReporter,
    pub heartbeat: MockHeartbeatManager,
}

impl Mocks {
    pub fn new(version: Version, min_auto: Version) -> Self {
        info!("Creating mocks for version {} (min auto {})", version, min_auto);

        let controller = Controller::new();

        let mocks = Mocks {
            proxy_ctl: MockProxyController::new(&controller),
            tls_reporter: MockTlsReporter::new(&controller),
            tls_issue_ch: TlsIssueChannel::new(),

            updater: Arc::new(TestUpdater::new(version, min_auto)),
            autostarter: MockAutostarter::new(&controller),

            crash_handler: MockPanicHandler::new(&controller),
            reporter: MockReporter::new(&controller),
            heartbeat: MockHeartbeatManager::new(&controller),

            controller,
        };

        mocks
            .tls_reporter
            .expect_get_tls_issue_ch()
            .any_times()
            .return_const(mocks.tls_issue_ch.clone());

        // every worker routine reports here on exit
        mocks.crash_handler.expect_handle_panic().any_times();

        // start of the heartbeat process
        mocks.heartbeat.expect_is_telemetry_available().any_times();
        mocks
            .heartbeat
            .expect_get_heartbeat_periodic_interval()
            .any_times()
            .return_const(HEARTBEAT_INTERVAL);

        // sent whenever a sync is cancelled
        // TODO: narrow this down to the tests that actually cancel a sync.
        mocks
            .reporter
            .expect_report_message_with_context()
            .withf(|(message, _)| message == SYNC_RETRY_MESSAGE)
            .any_times();

        mocks
    }

    /// Build from a loaded config, also seeding the multi-release answer.
    pub fn from_config(config: &HarnessConfig) -> Self {
        let mocks = Self::new(config.version.clone(), config.min_auto.clone());
        mocks.updater.set_latest_version(config.version_info());
        mocks
    }

    /// Close the TLS issue channel. Nothing may send on it afterwards.
    ///
    /// # Panics
    /// If the harness was already closed.
    pub fn close(&self) {
        debug!("Closing mocks");
        self.tls_issue_ch.close();
    }
}

impl Drop for Mocks {
    fn drop(&mut self) {
        if !self.tls_issue_ch.is_closed() {
            self.close();
        }
        if !thread::panicking() {
            self.controller.finish();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::panic::{self, AssertUnwindSafe};

    fn v(s: &str) -> Version {
        Version::parse(s).unwrap()
    }

    #[test]
    fn test_background_calls_are_allowed() {
        let mocks = Mocks::new(v("1.0.0"), v("0.9.0"));

        for _ in 0..10 {
            mocks.crash_handler.handle_panic(None);
            assert!(!mocks.heartbeat.is_telemetry_available());
            assert_eq!(mocks.heartbeat.get_heartbeat_periodic_interval(), HEARTBEAT_INTERVAL);
            mocks
                .reporter
                .report_message_with_context(SYNC_RETRY_MESSAGE, Context::new())
                .unwrap();
        }

        assert!(mocks.controller.failures().is_empty());
    }

    #[test]
    fn test_nothing_else_is_allowed() {
        let mocks = Mocks::new(v("1.0.0"), v("0.9.0"));

        mocks.proxy_ctl.allow_proxy();
        let _ = mocks.autostarter.is_enabled();
        let _ = mocks.reporter.report_message("unplanned");

        assert_eq!(mocks.controller.failures().len(), 3);

        // the drop check reports the same failures
        let dropped = panic::catch_unwind(AssertUnwindSafe(move || drop(mocks)));
        assert!(dropped.is_err());
    }

    #[test]
    fn test_tls_channel_identity() {
        let mocks = Mocks::new(v("1.0.0"), v("0.9.0"));
        let first = mocks.tls_reporter.get_tls_issue_ch();
        let second = mocks.tls_reporter.get_tls_issue_ch();

        assert!(first.same_channel(&second));
        assert!(first.same_channel(&mocks.tls_issue_ch));
    }

    #[test]
    fn test_close_once() {
        let mocks = Mocks::new(v("1.0.0"), v("0.9.0"));
        mocks.close();
        assert!(mocks.tls_issue_ch.is_closed());
    }

    #[test]
    fn test_second_close_is_detected() {
        let mocks = Mocks::new(v("1.0.0"), v("0.9.0"));
        mocks.close();

        let second = panic::catch_unwind(AssertUnwindSafe(|| mocks.close()));
        assert!(second.is_err());
    }

    #[test]
    fn test_drop_closes_channel() {
        let mocks = Mocks::new(v("1.0.0"), v("0.9.0"));
        let channel = mocks.tls_reporter.get_tls_issue_ch();
        drop(mocks);

        assert!(channel.is_closed());
        assert_eq!(channel.recv(), None);
    }

    #[test]
    #[should_panic(expected = "MockAutostarter.enable: expected Exactly(1) call(s), got 0")]
    fn test_drop_reports_unmet_expectations() {
        let mocks = Mocks::new(v("1.0.0"), v("0.9.0"));
        mocks.autostarter.expect_enable().times(1);
    }

    #[test]
    fn test_updater_seeded_from_arguments() {
        let mocks = Mocks::new(v("1.0.0"), v("0.9.0"));
        let info = mocks.updater.latest_legacy();

        assert_eq!(info.version, v("1.0.0"));
        assert_eq!(info.min_auto, v("0.9.0"));
        assert_eq!(info.rollout_proportion, 1.0);
    }
}
