//! Tracing and HTTP exchange logging (shared setup).

/// Initialize process-wide tracing.
///
/// Safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    tracing::init();
}

/// HTTP request/response logging layer.
pub mod http;

/// Subscriber configuration (filters, JSON output).
pub mod tracing;

pub use http::{HttpTraceLayer, trace_layer};
