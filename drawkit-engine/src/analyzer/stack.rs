//! Call stack of traced operations.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{DrawError, DrawResult};

/// Name of the operation that marks the start of a drawing cycle.
///
/// Frames of this operation do not count towards the call depth.
pub const START_MARKER: &str = "start";

/// An error reported while a frame was active.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameError {
    /// Error message.
    pub message: String,
    /// Error code, see [`DrawError::code`].
    pub number: Option<u32>,
}

/// One active traced call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Frame {
    /// Operation name.
    pub method_name: String,
    /// Labelled arguments.
    pub arguments: Value,
    /// Start time in milliseconds.
    pub start_time: f64,
    /// Errors reported during the call.
    pub errors: Vec<FrameError>,
}

impl Frame {
    /// Create a frame without errors.
    #[must_use]
    pub fn new(method_name: impl Into<String>, arguments: Value, start_time: f64) -> Self {
        Self {
            method_name: method_name.into(),
            arguments,
            start_time,
            errors: Vec::new(),
        }
    }

    fn is_start_marker(&self) -> bool {
        self.method_name == START_MARKER
    }
}

/// Stack of active traced calls.
#[derive(Debug, Clone, Default)]
pub struct CallStack {
    frames: Vec<Frame>,
}

impl CallStack {
    /// Create an empty stack.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Push a frame.
    pub fn push(&mut self, frame: Frame) {
        self.frames.push(frame);
    }

    /// Pop the top frame, which must belong to `method_name`.
    ///
    /// # Errors
    ///
    /// Returns [`DrawError::StackOutOfSync`] if the stack is empty or the top
    /// frame belongs to another method. The stack is left unchanged then.
    pub fn pop_matching(&mut self, method_name: &str) -> DrawResult<Frame> {
        match self.frames.last() {
            Some(top) if top.method_name == method_name => {}
            top => {
                return Err(DrawError::StackOutOfSync {
                    expected: top.map(|frame| frame.method_name.clone()),
                    found: method_name.to_string(),
                });
            }
        }
        self.frames.pop().ok_or(DrawError::StackOutOfSync {
            expected: None,
            found: method_name.to_string(),
        })
    }

    /// The innermost frame.
    #[must_use]
    pub fn top(&self) -> Option<&Frame> {
        self.frames.last()
    }

    /// The innermost frame, mutably.
    pub fn top_mut(&mut self) -> Option<&mut Frame> {
        self.frames.last_mut()
    }

    /// Number of active frames, not counting start markers.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.frames.iter().filter(|f| !f.is_start_marker()).count()
    }

    /// Number of active frames.
    #[must_use]
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Whether no call is active.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Active frames, outermost first.
    #[must_use]
    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }
}
