// src/mocks/reporter.rs
//
// Error/message reporting capability and its mock.

use eyre::Result;
use serde_json::{Map, Value};
use std::sync::Arc;

use crate::expect::{Controller, ExpectationBuilder, Method};

/// Extra key/value data attached to a report.
pub type Context = Map<String, Value>;

pub trait Reporter: Send + Sync {
    fn report_exception(&self, exception: &str) -> Result<()>;
    fn report_message(&self, message: &str) -> Result<()>;
    fn report_message_with_context(&self, message: &str, context: Context) -> Result<()>;
    fn report_exception_with_context(&self, exception: &str, context: Context) -> Result<()>;
}

const MOCK: &str = "MockReporter";

type ReportFn = Arc<Method<String, Result<()>>>;
type ReportWithContextFn = Arc<Method<(String, Context), Result<()>>>;

#[derive(Clone)]
pub struct MockReporter {
    report_exception: ReportFn,
    report_message: ReportFn,
    report_message_with_context: ReportWithContextFn,
    report_exception_with_context: ReportWithContextFn,
}

impl MockReporter {
    pub fn new(controller: &Arc<Controller>) -> Self {
        Self {
            report_exception: Method::new(controller, MOCK, "report_exception", || Ok(())),
            report_message: Method::new(controller, MOCK, "report_message", || Ok(())),
            report_message_with_context: Method::new(
                controller,
                MOCK,
                "report_message_with_context",
                || Ok(()),
            ),
            report_exception_with_context: Method::new(
                controller,
                MOCK,
                "report_exception_with_context",
                || Ok(()),
            ),
        }
    }

    pub fn expect_report_exception(&self) -> ExpectationBuilder<'_, String, Result<()>> {
        self.report_exception.expect()
    }

    pub fn expect_report_message(&self) -> ExpectationBuilder<'_, String, Result<()>> {
        self.report_message.expect()
    }

    pub fn expect_report_message_with_context(
        &self,
    ) -> ExpectationBuilder<'_, (String, Context), Result<()>> {
        self.report_message_with_context.expect()
    }

    pub fn expect_report_exception_with_context(
        &self,
    ) -> ExpectationBuilder<'_, (String, Context), Result<()>> {
        self.report_exception_with_context.expect()
    }
}

impl Reporter for MockReporter {
    fn report_exception(&self, exception: &str) -> Result<()> {
        self.report_exception.call(exception.to_string())
    }

    fn report_message(&self, message: &str) -> Result<()> {
        self.report_message.call(message.to_string())
    }

    fn report_message_with_context(&self, message: &str, context: Context) -> Result<()> {
        self.report_message_with_context
            .call((message.to_string(), context))
    }

    fn report_exception_with_context(&self, exception: &str, context: Context) -> Result<()> {
        self.report_exception_with_context
            .call((exception.to_string(), context))
    }
}
