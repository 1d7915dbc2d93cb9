// src/mocks/autostart.rs
//
// Launch-on-login capability and its mock.

use eyre::Result;
use std::sync::Arc;

use crate::expect::{Controller, ExpectationBuilder, Method};

pub trait Autostarter: Send + Sync {
    fn enable(&self) -> Result<()>;
    fn disable(&self) -> Result<()>;
    fn is_enabled(&self) -> bool;
}

const MOCK: &str = "MockAutostarter";

#[derive(Clone)]
pub struct MockAutostarter {
    enable: Arc<Method<(), Result<()>>>,
    disable: Arc<Method<(), Result<()>>>,
    is_enabled: Arc<Method<(), bool>>,
}

impl MockAutostarter {
    pub fn new(controller: &Arc<Controller>) -> Self {
        Self {
            enable: Method::new(controller, MOCK, "enable", || Ok(())),
            disable: Method::new(controller, MOCK, "disable", || Ok(())),
            is_enabled: Method::new(controller, MOCK, "is_enabled", || false),
        }
    }

    pub fn expect_enable(&self) -> ExpectationBuilder<'_, (), Result<()>> {
        self.enable.expect()
    }

    pub fn expect_disable(&self) -> ExpectationBuilder<'_, (), Result<()>> {
        self.disable.expect()
    }

    pub fn expect_is_enabled(&self) -> ExpectationBuilder<'_, (), bool> {
        self.is_enabled.expect()
    }
}

impl Autostarter for MockAutostarter {
    fn enable(&self) -> Result<()> {
        self.enable.call(())
    }

    fn disable(&self) -> Result<()> {
        self.disable.call(())
    }

    fn is_enabled(&self) -> bool {
        self.is_enabled.call(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eyre::eyre;

    #[test]
    fn test_enable_failure_can_be_injected() {
        let controller = Controller::new();
        let autostart = MockAutostarter::new(&controller);
        autostart
            .expect_enable()
            .returning(|_| Err(eyre!("launch agent not writable")));

        let err = autostart.enable().unwrap_err();
        assert!(err.to_string().contains("launch agent"));
        assert!(controller.failures().is_empty());
    }

    #[test]
    fn test_is_enabled_returns_programmed_value() {
        let controller = Controller::new();
        let autostart = MockAutostarter::new(&controller);
        autostart.expect_is_enabled().any_times().return_const(true);
        autostart.expect_disable().times(1);

        assert!(autostart.is_enabled());
        assert!(autostart.disable().is_ok());
        assert!(controller.failures().is_empty());
    }
}
