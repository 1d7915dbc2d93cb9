// src/mocks/tls.rs
//
// TLS issue reporting capability, the issue notification channel, and the mock reporter.

use std::fmt;
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use crate::expect::{Controller, ExpectationBuilder, Method};

/// Unbuffered channel of "a TLS issue occurred" signals.
///
/// Clones share one channel and any number of them may wait to receive at
/// once. Each signal is taken by exactly one receiver. Closing wakes every
/// waiting receiver with `None` and makes sending panic. Closing twice panics.
#[derive(Clone)]
pub struct TlsIssueChannel {
    inner: Arc<ChannelInner>,
}

struct ChannelInner {
    state: Mutex<ChannelState>,
    changed: Condvar,
}

/// Signals are numbered in send order; `received` counts the ones taken.
#[derive(Default)]
struct ChannelState {
    sent: u64,
    received: u64,
    closed: bool,
}

impl ChannelState {
    fn has_pending(&self) -> bool {
        self.received < self.sent
    }

    fn take(&mut self) -> Option<()> {
        if self.closed || !self.has_pending() {
            return None;
        }
        self.received += 1;
        Some(())
    }
}

impl TlsIssueChannel {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(ChannelInner {
                state: Mutex::new(ChannelState::default()),
                changed: Condvar::new(),
            }),
        }
    }

    /// Signal an issue. Blocks until a receiver takes it.
    ///
    /// # Panics
    /// If the channel is closed, or gets closed before the signal is taken.
    pub fn notify(&self) {
        let mut state = self.lock();
        if state.closed {
            drop(state);
            panic!("send on closed channel");
        }
        let ticket = state.sent;
        state.sent += 1;
        self.inner.changed.notify_all();

        let state = self
            .inner
            .changed
            .wait_while(state, |s| !s.closed && s.received <= ticket)
            .unwrap_or_else(PoisonError::into_inner);
        if state.received <= ticket {
            drop(state);
            panic!("send on closed channel");
        }
    }

    /// Wait for the next signal. `None` once the channel is closed.
    pub fn recv(&self) -> Option<()> {
        let state = self.lock();
        let mut state = self
            .inner
            .changed
            .wait_while(state, |s| !s.closed && !s.has_pending())
            .unwrap_or_else(PoisonError::into_inner);
        let taken = state.take();
        self.inner.changed.notify_all();
        taken
    }

    /// Wait at most `timeout` for the next signal.
    pub fn recv_timeout(&self, timeout: Duration) -> Option<()> {
        let state = self.lock();
        let (mut state, _) = self
            .inner
            .changed
            .wait_timeout_while(state, timeout, |s| !s.closed && !s.has_pending())
            .unwrap_or_else(PoisonError::into_inner);
        let taken = state.take();
        self.inner.changed.notify_all();
        taken
    }

    /// Take a signal only if a sender is already waiting.
    pub fn try_recv(&self) -> Option<()> {
        let taken = self.lock().take();
        self.inner.changed.notify_all();
        taken
    }

    /// Close the channel.
    ///
    /// # Panics
    /// If the channel is already closed.
    pub fn close(&self) {
        let mut state = self.lock();
        if state.closed {
            drop(state);
            panic!("close of closed channel");
        }
        state.closed = true;
        self.inner.changed.notify_all();
    }

    pub fn is_closed(&self) -> bool {
        self.lock().closed
    }

    /// True if both handles refer to the same channel.
    pub fn same_channel(&self, other: &TlsIssueChannel) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    fn lock(&self) -> MutexGuard<'_, ChannelState> {
        self.inner.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for TlsIssueChannel {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for TlsIssueChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TlsIssueChannel")
            .field("closed", &self.is_closed())
            .finish()
    }
}

/// Source of TLS issue notifications, consumed by the TLS monitoring logic.
pub trait TlsReporter: Send + Sync {
    fn get_tls_issue_ch(&self) -> TlsIssueChannel;
}

const MOCK: &str = "MockTlsReporter";

#[derive(Clone)]
pub struct MockTlsReporter {
    get_tls_issue_ch: Arc<Method<(), TlsIssueChannel>>,
}

impl MockTlsReporter {
    pub fn new(controller: &Arc<Controller>) -> Self {
        Self {
            get_tls_issue_ch: Method::new(controller, MOCK, "get_tls_issue_ch", TlsIssueChannel::new),
        }
    }

    pub fn expect_get_tls_issue_ch(&self) -> ExpectationBuilder<'_, (), TlsIssueChannel> {
        self.get_tls_issue_ch.expect()
    }
}

impl TlsReporter for MockTlsReporter {
    fn get_tls_issue_ch(&self) -> TlsIssueChannel {
        self.get_tls_issue_ch.call(())
    }
}
