//! Span helpers for task and command execution.

use std::future::Future;
use std::time::{Duration, Instant};
use tracing::{field, info_span, Instrument, Span};

/// Create a span for one task run.
///
/// `error` starts empty and is filled by [`record_error`].
pub fn task_span(task: &str, invocation_id: &str) -> Span {
    info_span!("task", name = %task, invocation = %invocation_id, error = field::Empty)
}

/// Create a span for one external command.
pub fn command_span(program: &str, dir: &str) -> Span {
    info_span!(
        "command",
        program = %program,
        dir = %dir,
        exit_code = field::Empty,
        error = field::Empty
    )
}

/// Instrument a future with a span.
pub fn instrument_future<F: Future>(future: F, span: Span) -> impl Future<Output = F::Output> {
    future.instrument(span)
}

/// Record an error on the current span.
pub fn record_error(error: &dyn std::error::Error) {
    Span::current().record("error", field::display(error));
}

/// Timing utility for operations.
pub struct Timer {
    start: Instant,
    operation: &'static str,
}

impl Timer {
    /// Start a new timer.
    pub fn start(operation: &'static str) -> Self {
        Self {
            start: Instant::now(),
            operation,
        }
    }

    /// Complete the timer, log and return the duration.
    pub fn finish(self) -> Duration {
        let duration = self.start.elapsed();
        tracing::debug!(
            operation = %self.operation,
            duration_ms = %duration.as_millis(),
            "operation completed"
        );
        duration
    }
}
