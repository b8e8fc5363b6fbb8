//! Events forwarded to the analytic listener.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::stack::FrameError;
use crate::engine::MethodDetails;

/// Why the listener is called.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AnalyzeReason {
    /// A traced call started.
    MethodStart,
    /// A traced call ended, or a drawing cycle ended.
    MethodEnd,
    /// A traced call reported an error.
    MethodError,
    /// The engine reported details of a drawn shape.
    ReceivedDetails,
}

/// Description of a call passed to [`TracingDrawEngine::analyze`](super::TracingDrawEngine::analyze).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallInfo {
    /// Operation name.
    pub method_name: String,
    /// Labelled arguments.
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub arguments: Value,
    /// Start time in milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<f64>,
    /// End time in milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<f64>,
    /// Elapsed milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
    /// Reported error.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<FrameError>,
    /// Reported shape details.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<MethodDetails>,
}

impl CallInfo {
    /// A call of `method_name`.
    #[must_use]
    pub fn new(method_name: impl Into<String>) -> Self {
        Self {
            method_name: method_name.into(),
            ..Self::default()
        }
    }

    /// Attach labelled arguments.
    #[must_use]
    pub fn with_arguments(mut self, arguments: Value) -> Self {
        self.arguments = arguments;
        self
    }

    /// Mark the start time.
    #[must_use]
    pub fn started_at(mut self, start_time: f64) -> Self {
        self.start_time = Some(start_time);
        self
    }

    /// Mark the end time and elapsed time.
    #[must_use]
    pub fn ended_at(mut self, end_time: f64, duration: f64) -> Self {
        self.end_time = Some(end_time);
        self.duration = Some(duration);
        self
    }
}

/// What the listener receives.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeEvent {
    /// Reason for the event.
    pub reason: AnalyzeReason,
    /// The call.
    #[serde(flatten)]
    pub call: CallInfo,
    /// Call depth, not counting start markers. `None` for cycle ends and details.
    pub depth: Option<usize>,
    /// Root calls traced in the current cycle.
    pub root_position: u32,
}

/// Callback invoked synchronously for every forwarded event.
pub type AnalyticListener = Box<dyn FnMut(&AnalyzeEvent)>;
