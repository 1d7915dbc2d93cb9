// src/expect.rs
//
// In-memory expectation recorder shared by all mock collaborators.
// Each mock method owns a table of expectations; every call is logged on the
// controller, and unmet or unexpected calls are reported together at `finish`.

use log::{debug, warn};
use std::fmt::Debug;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

/// A call made on a mock collaborator, in the order it happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    pub mock: &'static str,
    pub method: &'static str,
    /// `Debug` rendering of the call arguments.
    pub args: String,
}

impl RecordedCall {
    /// Check if this call was made on the given mock method.
    pub fn is_call_to(&self, mock: &str, method: &str) -> bool {
        self.mock == mock && self.method == method
    }
}

/// How many calls an expectation allows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Times {
    Exactly(usize),
    AtLeast(usize),
}

impl Times {
    /// Unlimited calls, including none.
    pub const ANY: Times = Times::AtLeast(0);

    fn is_saturated(self, calls: usize) -> bool {
        match self {
            Times::Exactly(n) => calls >= n,
            Times::AtLeast(_) => false,
        }
    }

    fn is_satisfied(self, calls: usize) -> bool {
        match self {
            Times::Exactly(n) => calls == n,
            Times::AtLeast(n) => calls >= n,
        }
    }
}

trait Verify: Send + Sync {
    fn unmet(&self) -> Vec<String>;
}

/// Records calls and collects expectation failures for one harness.
#[derive(Default)]
pub struct Controller {
    calls: Mutex<Vec<RecordedCall>>,
    unexpected: Mutex<Vec<String>>,
    methods: Mutex<Vec<Weak<dyn Verify>>>,
    finished: AtomicBool,
}

impl Controller {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Get all recorded calls.
    pub fn calls(&self) -> Vec<RecordedCall> {
        lock(&self.calls).clone()
    }

    /// Get the recorded calls to one mock method.
    pub fn calls_to(&self, mock: &str, method: &str) -> Vec<RecordedCall> {
        lock(&self.calls)
            .iter()
            .filter(|c| c.is_call_to(mock, method))
            .cloned()
            .collect()
    }

    /// Get the count of recorded calls.
    pub fn call_count(&self) -> usize {
        lock(&self.calls).len()
    }

    /// Clear the call log. Expectation counters are kept.
    pub fn clear_calls(&self) {
        lock(&self.calls).clear();
    }

    /// Every unexpected call and unmet expectation seen so far.
    pub fn failures(&self) -> Vec<String> {
        let mut failures = lock(&self.unexpected).clone();
        for method in lock(&self.methods).iter().filter_map(Weak::upgrade) {
            failures.extend(method.unmet());
        }
        failures
    }

    /// Assert that no expectation was violated. Only the first call checks.
    pub fn finish(&self) {
        if self.finished.swap(true, Ordering::SeqCst) {
            return;
        }
        let failures = self.failures();
        assert!(
            failures.is_empty(),
            "mock expectations failed:\n  {}",
            failures.join("\n  ")
        );
    }

    pub fn is_finished(&self) -> bool {
        self.finished.load(Ordering::SeqCst)
    }

    fn register(&self, method: Weak<dyn Verify>) {
        lock(&self.methods).push(method);
    }

    fn record(&self, call: RecordedCall) {
        lock(&self.calls).push(call);
    }

    fn unexpected(&self, message: String) {
        warn!("{}", message);
        lock(&self.unexpected).push(message);
    }
}

type Matcher<A> = Arc<dyn Fn(&A) -> bool + Send + Sync>;
type Responder<A, R> = Arc<dyn Fn(&A) -> R + Send + Sync>;

struct Expectation<A, R> {
    matcher: Option<Matcher<A>>,
    responder: Option<Responder<A, R>>,
    times: Times,
    calls: usize,
}

impl<A, R> Expectation<A, R> {
    fn matches(&self, args: &A) -> bool {
        self.matcher.as_ref().map_or(true, |m| m(args))
    }
}

/// Expectation table for one method of one mock.
/// `A` is the owned argument tuple, `R` the return type.
pub struct Method<A, R> {
    mock: &'static str,
    name: &'static str,
    controller: Arc<Controller>,
    zero: fn() -> R,
    expectations: Mutex<Vec<Expectation<A, R>>>,
}

impl<A, R> Method<A, R>
where
    A: Debug + Send + 'static,
    R: Send + 'static,
{
    /// Create the table and register it with `controller`.
    /// `zero` is returned for unexpected calls and expectations without a response.
    pub fn new(
        controller: &Arc<Controller>,
        mock: &'static str,
        name: &'static str,
        zero: fn() -> R,
    ) -> Arc<Self> {
        let method = Arc::new(Self {
            mock,
            name,
            controller: Arc::clone(controller),
            zero,
            expectations: Mutex::new(Vec::new()),
        });
        let verify: Arc<dyn Verify> = method.clone();
        controller.register(Arc::downgrade(&verify));
        method
    }

    /// Start an expectation. It is registered when the builder is dropped.
    pub fn expect(&self) -> ExpectationBuilder<'_, A, R> {
        ExpectationBuilder {
            method: self,
            expectation: Some(Expectation {
                matcher: None,
                responder: None,
                times: Times::Exactly(1),
                calls: 0,
            }),
        }
    }

    /// Dispatch a call to the first matching expectation that still has room.
    pub fn call(&self, args: A) -> R {
        let rendered = format!("{:?}", args);
        debug!("{}.{}({})", self.mock, self.name, rendered);
        self.controller.record(RecordedCall {
            mock: self.mock,
            method: self.name,
            args: rendered.clone(),
        });

        let responder = {
            let mut expectations = lock(&self.expectations);
            let matched = expectations
                .iter_mut()
                .find(|e| e.matches(&args) && !e.times.is_saturated(e.calls));
            match matched {
                Some(expectation) => {
                    expectation.calls += 1;
                    Some(expectation.responder.clone())
                }
                None => None,
            }
        };

        match responder {
            Some(Some(respond)) => respond(&args),
            Some(None) => (self.zero)(),
            None => {
                self.controller.unexpected(format!(
                    "unexpected call to {}.{}({})",
                    self.mock, self.name, rendered
                ));
                (self.zero)()
            }
        }
    }

    fn push(&self, expectation: Expectation<A, R>) {
        debug!(
            "{}.{}: expecting {:?} call(s)",
            self.mock, self.name, expectation.times
        );
        lock(&self.expectations).push(expectation);
    }
}

impl<A, R> Verify for Method<A, R>
where
    A: Send + 'static,
    R: Send + 'static,
{
    fn unmet(&self) -> Vec<String> {
        lock(&self.expectations)
            .iter()
            .filter(|e| !e.times.is_satisfied(e.calls))
            .map(|e| {
                format!(
                    "{}.{}: expected {:?} call(s), got {}",
                    self.mock, self.name, e.times, e.calls
                )
            })
            .collect()
    }
}

/// Builder returned by `Method::expect`. Defaults to exactly one call
/// returning the method's zero value.
pub struct ExpectationBuilder<'a, A, R>
where
    A: Debug + Send + 'static,
    R: Send + 'static,
{
    method: &'a Method<A, R>,
    expectation: Option<Expectation<A, R>>,
}

impl<A, R> ExpectationBuilder<'_, A, R>
where
    A: Debug + Send + 'static,
    R: Send + 'static,
{
    /// Only match calls whose arguments satisfy `matcher`.
    pub fn withf<F>(mut self, matcher: F) -> Self
    where
        F: Fn(&A) -> bool + Send + Sync + 'static,
    {
        if let Some(e) = self.expectation.as_mut() {
            e.matcher = Some(Arc::new(matcher));
        }
        self
    }

    pub fn times(mut self, n: usize) -> Self {
        if let Some(e) = self.expectation.as_mut() {
            e.times = Times::Exactly(n);
        }
        self
    }

    pub fn at_least(mut self, n: usize) -> Self {
        if let Some(e) = self.expectation.as_mut() {
            e.times = Times::AtLeast(n);
        }
        self
    }

    pub fn any_times(mut self) -> Self {
        if let Some(e) = self.expectation.as_mut() {
            e.times = Times::ANY;
        }
        self
    }

    pub fn never(self) -> Self {
        self.times(0)
    }

    pub fn returning<F>(mut self, respond: F) -> Self
    where
        F: Fn(&A) -> R + Send + Sync + 'static,
    {
        if let Some(e) = self.expectation.as_mut() {
            e.responder = Some(Arc::new(respond));
        }
        self
    }

    pub fn return_const(self, value: R) -> Self
    where
        R: Clone + Sync,
    {
        self.returning(move |_| value.clone())
    }
}

impl<A, R> Drop for ExpectationBuilder<'_, A, R>
where
    A: Debug + Send + 'static,
    R: Send + 'static,
{
    fn drop(&mut self) {
        if let Some(expectation) = self.expectation.take() {
            self.method.push(expectation);
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
