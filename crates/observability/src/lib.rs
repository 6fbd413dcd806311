//! Tracing/logging setup and instrumentation hooks shared by both services.

/// Initialize process-wide observability (tracing/logging).
///
/// This is safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    tracing::init();
}

/// Tracing configuration (filters, layers).
pub mod tracing;

/// Instrumentation around outbound service calls.
pub mod hooks;

pub use hooks::{CallOutcome, OutboundCall, OutboundCallHook, TracingCallHook};
