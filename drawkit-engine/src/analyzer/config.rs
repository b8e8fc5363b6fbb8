//! Analyzer configuration.

use serde::{Deserialize, Serialize};

/// Controls which traced calls are forwarded and which checks run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
#[allow(clippy::struct_excessive_bools)]
pub struct AnalyzerConfig {
    /// Deepest forwarded call. `0` forwards root calls only, negative is unlimited.
    pub analyzing_depth_max: i32,
    /// Shallowest forwarded call.
    pub analyzing_depth_min: i32,
    /// Fail once more root calls than `endless_loop_threshold` were traced.
    pub check_for_endless_loop: bool,
    /// Fail when root calls are traced before `start`.
    pub check_for_start_trigger: bool,
    /// Report the end of a drawing cycle once the call stack stays empty.
    pub check_loop_end: bool,
    /// Forward events only while the debug pointer is active.
    pub use_only_debug_pointer: bool,
    /// Quiet period in milliseconds before the cycle end is reported.
    pub end_debounce_ms: f64,
    /// Root calls allowed per cycle.
    pub endless_loop_threshold: u32,
    /// Pointer distance in pixels within which overlay labels are shown.
    pub label_radius: f64,
    /// Pointer distance in pixels at which labels switch to the focus state.
    pub label_focus_radius: f64,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            analyzing_depth_max: 0,
            analyzing_depth_min: 0,
            check_for_endless_loop: true,
            check_for_start_trigger: true,
            check_loop_end: true,
            use_only_debug_pointer: true,
            end_debounce_ms: 100.0,
            endless_loop_threshold: 5000,
            label_radius: 50.0,
            label_focus_radius: 10.0,
        }
    }
}

impl AnalyzerConfig {
    /// Forward every call regardless of depth or debug pointer.
    #[must_use]
    pub fn unfiltered() -> Self {
        Self {
            analyzing_depth_max: -1,
            use_only_debug_pointer: false,
            ..Self::default()
        }
    }

    /// Set the deepest forwarded call.
    #[must_use]
    pub fn with_depth_max(mut self, depth: i32) -> Self {
        self.analyzing_depth_max = depth;
        self
    }

    /// Whether a call at `depth` lies inside the configured window.
    #[must_use]
    pub fn depth_in_window(&self, depth: usize) -> bool {
        let depth = i64::try_from(depth).unwrap_or(i64::MAX);
        depth >= i64::from(self.analyzing_depth_min)
            && (self.analyzing_depth_max < 0 || depth <= i64::from(self.analyzing_depth_max))
    }
}

/// Options for [`TracingDrawEngine::start_debug`](super::TracingDrawEngine::start_debug).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DebugOptions {
    /// Temporary override of `analyzing_depth_max`.
    pub depth: Option<i32>,
    /// Draw the outlines of traced shapes after each root call.
    pub show_bodies: bool,
}

impl Default for DebugOptions {
    fn default() -> Self {
        Self {
            depth: None,
            show_bodies: true,
        }
    }
}
