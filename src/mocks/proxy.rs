// src/mocks/proxy.rs
//
// Proxy controller capability and its mock.

use std::sync::Arc;

use crate::expect::{Controller, ExpectationBuilder, Method};

/// Turns the application's alternative-routing proxy on and off.
pub trait ProxyController: Send + Sync {
    fn allow_proxy(&self);
    fn disallow_proxy(&self);
}

const MOCK: &str = "MockProxyController";

#[derive(Clone)]
pub struct MockProxyController {
    allow_proxy: Arc<Method<(), ()>>,
    disallow_proxy: Arc<Method<(), ()>>,
}

impl MockProxyController {
    pub fn new(controller: &Arc<Controller>) -> Self {
        Self {
            allow_proxy: Method::new(controller, MOCK, "allow_proxy", || ()),
            disallow_proxy: Method::new(controller, MOCK, "disallow_proxy", || ()),
        }
    }

    pub fn expect_allow_proxy(&self) -> ExpectationBuilder<'_, (), ()> {
        self.allow_proxy.expect()
    }

    pub fn expect_disallow_proxy(&self) -> ExpectationBuilder<'_, (), ()> {
        self.disallow_proxy.expect()
    }
}

impl ProxyController for MockProxyController {
    fn allow_proxy(&self) {
        self.allow_proxy.call(())
    }

    fn disallow_proxy(&self) {
        self.disallow_proxy.call(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unprogrammed_call_is_flagged() {
        let controller = Controller::new();
        let proxy = MockProxyController::new(&controller);

        proxy.allow_proxy();
        assert_eq!(controller.failures().len(), 1);
    }

    #[test]
    fn test_programmed_calls() {
        let controller = Controller::new();
        let proxy = MockProxyController::new(&controller);
        proxy.expect_allow_proxy().times(1);
        proxy.expect_disallow_proxy().times(2);

        proxy.allow_proxy();
        proxy.disallow_proxy();
        proxy.disallow_proxy();

        assert!(controller.failures().is_empty());
        assert_eq!(controller.calls_to(MOCK, "disallow_proxy").len(), 2);
    }
}
