use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::Mutex;

use padlint_client::{CheckRequest, CheckResponse, Checker, ClientError, Issue};

type Responder = Box<dyn Fn(&CheckRequest) -> Result<CheckResponse, ClientError> + Send + Sync>;

/// Checker that answers from a closure and records what it was asked.
pub struct FakeChecker {
    respond: Responder,
    calls: AtomicUsize,
    last_request: Mutex<Option<CheckRequest>>,
}

impl FakeChecker {
    pub fn new<F>(respond: F) -> Self
    where
        F: Fn(&CheckRequest) -> Result<CheckResponse, ClientError> + Send + Sync + 'static,
    {
        Self {
            respond: Box::new(respond),
            calls: AtomicUsize::new(0),
            last_request: Mutex::new(None),
        }
    }

    /// Answers every request with `issues`.
    pub fn returning(issues: Vec<Issue>) -> Self {
        Self::new(move |_| Ok(CheckResponse::with_matches(issues.clone())))
    }

    /// Fails every request with the error `make` builds.
    pub fn failing(make: fn() -> ClientError) -> Self {
        Self::new(move |_| Err(make()))
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_request(&self) -> Option<CheckRequest> {
        self.last_request.lock().clone()
    }
}

impl Checker for FakeChecker {
    async fn check(&self, request: CheckRequest) -> Result<CheckResponse, ClientError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let response = (self.respond)(&request);
        *self.last_request.lock() = Some(request);
        response
    }
}
