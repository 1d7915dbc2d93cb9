// src/mocks/crash.rs
//
// Panic handling capability and its mock.
// Every worker routine of the application ends by handing its panic payload
// (if any) to the panic handler; `run_guarded` is that hook.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use crate::expect::{Controller, ExpectationBuilder, Method};

pub trait PanicHandler: Send + Sync {
    /// Called once at the end of every worker routine, with `None` when it
    /// finished normally.
    fn handle_panic(&self, payload: Option<&(dyn Any + Send)>);
}

/// Run `work`, then report its outcome to `handler`.
/// Returns the work's result, or `None` if it panicked.
pub fn run_guarded<T, F>(handler: &dyn PanicHandler, work: F) -> Option<T>
where
    F: FnOnce() -> T,
{
    match panic::catch_unwind(AssertUnwindSafe(work)) {
        Ok(value) => {
            handler.handle_panic(None);
            Some(value)
        }
        Err(payload) => {
            handler.handle_panic(Some(payload.as_ref()));
            None
        }
    }
}

/// Text of a panic payload when it is a string.
pub fn panic_message(payload: &(dyn Any + Send)) -> Option<String> {
    if let Some(s) = payload.downcast_ref::<&str>() {
        Some((*s).to_string())
    } else {
        payload.downcast_ref::<String>().cloned()
    }
}

const MOCK: &str = "MockPanicHandler";

/// Mock panic handler. Payloads are recorded by message:
/// `None` for a normal exit, `Some(text)` for a panic.
#[derive(Clone)]
pub struct MockPanicHandler {
    handle_panic: Arc<Method<Option<String>, ()>>,
}

impl MockPanicHandler {
    pub fn new(controller: &Arc<Controller>) -> Self {
        Self {
            handle_panic: Method::new(controller, MOCK, "handle_panic", || ()),
        }
    }

    pub fn expect_handle_panic(&self) -> ExpectationBuilder<'_, Option<String>, ()> {
        self.handle_panic.expect()
    }
}

impl PanicHandler for MockPanicHandler {
    fn handle_panic(&self, payload: Option<&(dyn Any + Send)>) {
        let message = payload.map(|p| panic_message(p).unwrap_or_else(|| "<non-string panic>".to_string()));
        self.handle_panic.call(message)
    }
}
