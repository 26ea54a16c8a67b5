//! CLI invoker trait and implementations
//!
//! Provides a seam between callers (the HTTP layer, the `flowrun` binary) and
//! the process runner:
//! - [`ProcessRunner`] spawns the real CLI
//! - [`MockInvoker`] returns canned results for tests

use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;

use crate::invocation::{InvocationRequest, InvocationResult};
use crate::runner::ProcessRunner;

/// Trait for flow CLI execution (testable)
#[async_trait]
pub trait CliInvoker: Send + Sync {
    async fn invoke(&self, request: InvocationRequest) -> InvocationResult;
}

#[async_trait]
impl CliInvoker for ProcessRunner {
    async fn invoke(&self, request: InvocationRequest) -> InvocationResult {
        self.run(request).await
    }
}

/// Mock CLI invoker for testing
#[derive(Default)]
pub struct MockInvoker {
    responses: Mutex<VecDeque<InvocationResult>>,
    calls: Mutex<Vec<InvocationRequest>>,
}

impl MockInvoker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a result to return on a later invocation (FIFO)
    pub fn add_response(&self, result: InvocationResult) {
        self.responses
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(result);
    }

    /// Requests received so far, in call order
    pub fn calls(&self) -> Vec<InvocationRequest> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl CliInvoker for MockInvoker {
    async fn invoke(&self, request: InvocationRequest) -> InvocationResult {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(request);

        self.responses
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front()
            .unwrap_or_else(|| InvocationResult::success("", ""))
    }
}
