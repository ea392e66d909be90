//! Runtime-side adapters for the core ports.

pub mod metrics_sink;

pub use metrics_sink::MetricsEventSink;
