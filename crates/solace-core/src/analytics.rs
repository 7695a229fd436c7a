//! Analytics sink boundary — fire-and-forget event emission.
//!
//! Tracking is strictly best-effort: `track` cannot fail, and implementations
//! must swallow their own errors. A sink failure must never surface to the
//! caller of a core operation.

use uuid::Uuid;

/// Abstraction over an external analytics service.
pub trait AnalyticsSink: Send + Sync {
  fn track(&self, event: &str, user_id: Uuid, properties: serde_json::Value);
}

/// Emits events as `tracing` records under the `solace::analytics` target.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl AnalyticsSink for LogSink {
  fn track(&self, event: &str, user_id: Uuid, properties: serde_json::Value) {
    tracing::info!(
      target: "solace::analytics",
      %user_id,
      %properties,
      "{event}"
    );
  }
}

/// Discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl AnalyticsSink for NullSink {
  fn track(&self, _event: &str, _user_id: Uuid, _properties: serde_json::Value) {}
}
