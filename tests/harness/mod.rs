// tests/harness/mod.rs
//
// Support code for the integration tests: a small stand-in for the bridge
// that drives its collaborators the way the real one does.

pub mod fake_bridge;
pub mod stub_downloader;

pub use fake_bridge::FakeBridge;
pub use stub_downloader::StubDownloader;
