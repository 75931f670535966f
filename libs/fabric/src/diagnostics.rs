use soapbox_core::{EmptyReason, ResponseEnvelope};

/// Sink for what a call puts on and takes off the wire
///
/// Purely advisory: nothing a sink does can change the outcome of a call.
/// Every method defaults to doing nothing.
pub trait Diagnostics: Send + Sync {
    /// The fully serialized outbound envelope, before it is sent
    fn request(&self, _action: &str, _envelope: &str) {}

    /// The parsed inbound envelope
    fn response(&self, _envelope: &ResponseEnvelope) {}

    /// The response carried nothing to decode
    fn empty_response(&self, _reason: EmptyReason) {}
}

/// Discards everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopDiagnostics;

impl Diagnostics for NoopDiagnostics {}

/// Forwards to `tracing`: envelopes at debug, empty responses at warn
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingDiagnostics;

impl Diagnostics for TracingDiagnostics {
    fn request(&self, action: &str, envelope: &str) {
        tracing::debug!(action, envelope, "request");
    }

    fn response(&self, envelope: &ResponseEnvelope) {
        tracing::debug!(
            header = ?envelope.header,
            fault = ?envelope.body.fault,
            body = %envelope.body.content,
            "response"
        );
    }

    fn empty_response(&self, reason: EmptyReason) {
        tracing::warn!(%reason, "empty response");
    }
}
