// src/mocks/heartbeat.rs
//
// Telemetry heartbeat capability and its mock.

use chrono::{DateTime, Utc};
use eyre::Result;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

use crate::expect::{Controller, ExpectationBuilder, Method};

pub trait HeartbeatManager: Send + Sync {
    fn is_telemetry_available(&self) -> bool;
    fn send_heartbeat(&self, data: &Value) -> bool;
    fn get_last_heartbeat_sent(&self) -> DateTime<Utc>;
    fn set_last_heartbeat_sent(&self, sent: DateTime<Utc>) -> Result<()>;
    fn get_heartbeat_periodic_interval(&self) -> Duration;
}

const MOCK: &str = "MockHeartbeatManager";

#[derive(Clone)]
pub struct MockHeartbeatManager {
    is_telemetry_available: Arc<Method<(), bool>>,
    send_heartbeat: Arc<Method<Value, bool>>,
    get_last_heartbeat_sent: Arc<Method<(), DateTime<Utc>>>,
    set_last_heartbeat_sent: Arc<Method<DateTime<Utc>, Result<()>>>,
    get_heartbeat_periodic_interval: Arc<Method<(), Duration>>,
}

impl MockHeartbeatManager {
    pub fn new(controller: &Arc<Controller>) -> Self {
        Self {
            is_telemetry_available: Method::new(controller, MOCK, "is_telemetry_available", || {
                false
            }),
            send_heartbeat: Method::new(controller, MOCK, "send_heartbeat", || false),
            get_last_heartbeat_sent: Method::new(
                controller,
                MOCK,
                "get_last_heartbeat_sent",
                DateTime::<Utc>::default,
            ),
            set_last_heartbeat_sent: Method::new(
                controller,
                MOCK,
                "set_last_heartbeat_sent",
                || Ok(()),
            ),
            get_heartbeat_periodic_interval: Method::new(
                controller,
                MOCK,
                "get_heartbeat_periodic_interval",
                || Duration::ZERO,
            ),
        }
    }

    pub fn expect_is_telemetry_available(&self) -> ExpectationBuilder<'_, (), bool> {
        self.is_telemetry_available.expect()
    }

    pub fn expect_send_heartbeat(&self) -> ExpectationBuilder<'_, Value, bool> {
        self.send_heartbeat.expect()
    }

    pub fn expect_get_last_heartbeat_sent(&self) -> ExpectationBuilder<'_, (), DateTime<Utc>> {
        self.get_last_heartbeat_sent.expect()
    }

    pub fn expect_set_last_heartbeat_sent(
        &self,
    ) -> ExpectationBuilder<'_, DateTime<Utc>, Result<()>> {
        self.set_last_heartbeat_sent.expect()
    }

    pub fn expect_get_heartbeat_periodic_interval(&self) -> ExpectationBuilder<'_, (), Duration> {
        self.get_heartbeat_periodic_interval.expect()
    }
}

impl HeartbeatManager for MockHeartbeatManager {
    fn is_telemetry_available(&self) -> bool {
        self.is_telemetry_available.call(())
    }

    fn send_heartbeat(&self, data: &Value) -> bool {
        self.send_heartbeat.call(data.clone())
    }

    fn get_last_heartbeat_sent(&self) -> DateTime<Utc> {
        self.get_last_heartbeat_sent.call(())
    }

    fn set_last_heartbeat_sent(&self, sent: DateTime<Utc>) -> Result<()> {
        self.set_last_heartbeat_sent.call(sent)
    }

    fn get_heartbeat_periodic_interval(&self) -> Duration {
        self.get_heartbeat_periodic_interval.call(())
    }
}
