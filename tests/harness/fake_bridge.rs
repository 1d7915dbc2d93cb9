// tests/harness/fake_bridge.rs
//
// Minimal system under test. Holds every collaborator by capability only.

use bridge_testkit::mocks::{
    run_guarded, Context, HeartbeatManager, PanicHandler, Reporter, TlsReporter, SYNC_RETRY_MESSAGE,
};
use bridge_testkit::{Channel, Mocks, Release, Updater, VersionInfo, VersionInfoLegacy};
use eyre::Result;
use serde_json::json;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crate::harness::StubDownloader;

pub struct FakeBridge {
    pub downloader: Arc<StubDownloader>,
    updater: Arc<dyn Updater>,
    crash_handler: Arc<dyn PanicHandler>,
    reporter: Arc<dyn Reporter>,
    heartbeat: Arc<dyn HeartbeatManager>,
    tls_reporter: Arc<dyn TlsReporter>,
}

impl FakeBridge {
    pub fn new(mocks: &Mocks) -> Self {
        Self {
            downloader: Arc::new(StubDownloader::new()),
            updater: mocks.updater.clone(),
            crash_handler: Arc::new(mocks.crash_handler.clone()),
            reporter: Arc::new(mocks.reporter.clone()),
            heartbeat: Arc::new(mocks.heartbeat.clone()),
            tls_reporter: Arc::new(mocks.tls_reporter.clone()),
        }
    }

    pub fn check_for_update_legacy(&self) -> Result<VersionInfoLegacy> {
        self.updater
            .get_version_info_legacy(self.downloader.as_ref(), Channel::Stable)
    }

    pub fn check_for_updates(&self) -> Result<VersionInfo> {
        self.updater.get_version_info(self.downloader.as_ref())
    }

    /// Install whatever the legacy check advertises, then clean up.
    pub fn install_latest_legacy(&self) -> Result<()> {
        let info = self.check_for_update_legacy()?;
        self.updater
            .install_update_legacy(self.downloader.as_ref(), &info)?;
        self.updater.remove_old_updates()
    }

    pub fn install_release(&self, release: &Release) -> Result<()> {
        self.updater.install_update(self.downloader.as_ref(), release)
    }

    /// Spawn `count` sync workers. Each reads the heartbeat settings, reports
    /// an interrupted sync, and exits through the panic handler.
    /// Workers listed in `panicking` panic instead of finishing.
    pub fn run_sync_workers(&self, count: usize, panicking: &[usize]) -> usize {
        let handles: Vec<JoinHandle<bool>> = (0..count)
            .map(|worker| {
                let crash_handler = Arc::clone(&self.crash_handler);
                let reporter = Arc::clone(&self.reporter);
                let heartbeat = Arc::clone(&self.heartbeat);
                let panics = panicking.contains(&worker);

                thread::spawn(move || {
                    run_guarded(crash_handler.as_ref(), || {
                        if heartbeat.is_telemetry_available() {
                            heartbeat.send_heartbeat(&json!({ "worker": worker }));
                        }
                        let _interval = heartbeat.get_heartbeat_periodic_interval();

                        if panics {
                            panic!("sync worker {} lost its connection", worker);
                        }

                        let mut context = Context::new();
                        context.insert("worker".to_string(), json!(worker));
                        reporter
                            .report_message_with_context(SYNC_RETRY_MESSAGE, context)
                            .is_ok()
                    })
                    .unwrap_or(false)
                })
            })
            .collect();

        handles
            .into_iter()
            .filter_map(|h| h.join().ok())
            .filter(|finished| *finished)
            .count()
    }

    /// Count TLS issue signals until the channel is closed.
    pub fn watch_tls_issues(&self) -> JoinHandle<usize> {
        let channel = self.tls_reporter.get_tls_issue_ch();
        let crash_handler = Arc::clone(&self.crash_handler);

        thread::spawn(move || {
            run_guarded(crash_handler.as_ref(), || {
                let mut seen = 0;
                while channel.recv().is_some() {
                    seen += 1;
                }
                seen
            })
            .unwrap_or(0)
        })
    }
}
