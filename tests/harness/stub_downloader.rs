// tests/harness/stub_downloader.rs
//
// Downloader that fails every request and counts how often it was asked.

use bridge_testkit::Downloader;
use eyre::{eyre, Result};
use std::sync::atomic::{AtomicUsize, Ordering};
use url::Url;

#[derive(Default)]
pub struct StubDownloader {
    requests: AtomicUsize,
}

impl StubDownloader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request_count(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }
}

impl Downloader for StubDownloader {
    fn download_and_verify(&self, url: &Url, _sig_url: &Url) -> Result<Vec<u8>> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        Err(eyre!("no network in tests: {}", url))
    }

    fn download_file(&self, url: &Url) -> Result<Vec<u8>> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        Err(eyre!("no network in tests: {}", url))
    }
}
