//! Outbound call instrumentation.
//!
//! Callers invoke a hook immediately before and after a remote call. The hook
//! decides what to record (log lines, timings, trace spans); callers stay free
//! of any tracing specifics.

use std::time::Duration;

/// Identifies one outbound call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutboundCall<'a> {
    /// Logical operation name, e.g. `inventory_service_lookup`.
    pub name: &'static str,
    /// Remote peer, e.g. `inventory-service`.
    pub peer: &'a str,
}

/// How an outbound call ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallOutcome<'a> {
    Succeeded,
    Failed(&'a str),
}

pub trait OutboundCallHook: Send + Sync {
    fn on_start(&self, call: OutboundCall<'_>);

    fn on_finish(&self, call: OutboundCall<'_>, elapsed: Duration, outcome: CallOutcome<'_>);
}

impl<H> OutboundCallHook for std::sync::Arc<H>
where
    H: OutboundCallHook + ?Sized,
{
    fn on_start(&self, call: OutboundCall<'_>) {
        (**self).on_start(call)
    }

    fn on_finish(&self, call: OutboundCall<'_>, elapsed: Duration, outcome: CallOutcome<'_>) {
        (**self).on_finish(call, elapsed, outcome)
    }
}

/// Hook that emits structured `tracing` events tagged with the peer name.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingCallHook;

impl OutboundCallHook for TracingCallHook {
    fn on_start(&self, call: OutboundCall<'_>) {
        ::tracing::debug!(call = call.name, peer = call.peer, "outbound call started");
    }

    fn on_finish(&self, call: OutboundCall<'_>, elapsed: Duration, outcome: CallOutcome<'_>) {
        let elapsed_ms = elapsed.as_millis() as u64;
        match outcome {
            CallOutcome::Succeeded => {
                ::tracing::info!(call = call.name, peer = call.peer, elapsed_ms, "outbound call finished");
            }
            CallOutcome::Failed(reason) => {
                ::tracing::warn!(
                    call = call.name,
                    peer = call.peer,
                    elapsed_ms,
                    reason,
                    "outbound call failed"
                );
            }
        }
    }
}
