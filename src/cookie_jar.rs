// src/cookie_jar.rs
//
// In-memory cookie jar keyed by host.

use std::collections::HashMap;
use std::fmt;
use std::sync::{PoisonError, RwLock};
use url::Url;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cookie {
    pub name: String,
    pub value: String,
}

impl Cookie {
    pub fn new(name: &str, value: &str) -> Self {
        Self {
            name: name.to_string(),
            value: value.to_string(),
        }
    }
}

impl fmt::Display for Cookie {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.name, self.value)
    }
}

/// Cookie storage used by the API client.
pub trait CookieJar: Send + Sync {
    fn set_cookies(&self, url: &Url, cookies: Vec<Cookie>);
    fn cookies(&self, url: &Url) -> Vec<Cookie>;
}

/// Stores the last cookies set for each host. No expiry, path or domain matching.
///
/// Hosts are keyed as `host[:port]`. A default port written out in the URL is
/// not part of the key, so `https://h:443/` and `https://h/` share cookies.
#[derive(Default)]
pub struct TestCookieJar {
    cookies: RwLock<HashMap<String, Vec<Cookie>>>,
}

impl TestCookieJar {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CookieJar for TestCookieJar {
    /// Replaces whatever was stored for the host.
    fn set_cookies(&self, url: &Url, cookies: Vec<Cookie>) {
        self.cookies
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(host_key(url), cookies);
    }

    fn cookies(&self, url: &Url) -> Vec<Cookie> {
        self.cookies
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&host_key(url))
            .cloned()
            .unwrap_or_default()
    }
}

/// `host[:port]`, with the port only when it is not the scheme's default.
/// `Url` drops an explicit default port while parsing, so `https://h:443/`
/// and `https://h/` share a key.
fn host_key(url: &Url) -> String {
    let host = url.host_str().unwrap_or_default();
    match url.port() {
        Some(port) => format!("{}:{}", host, port),
        None => host.to_string(),
    }
}
