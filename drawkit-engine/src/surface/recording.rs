//! In-memory surface that records every call.
//!
//! Used for tests and headless tracing: the recorded calls can be inspected
//! to verify painting order and style discipline, and the surface tracks its
//! style state across `save`/`restore` like a browser context does.

use drawkit_core::Rect;
use serde::{Deserialize, Serialize};

use super::{FillRule, LinearGradient, Surface, TextMetrics};
use crate::{SurfaceError, SurfaceResult};

/// Paint held by a [`RecordingSurface`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "kind", content = "value")]
pub enum Paint {
    /// CSS color.
    Color(String),
    /// Linear gradient.
    Gradient(LinearGradient),
}

impl Paint {
    /// The color, if this paint is a plain color.
    #[must_use]
    pub fn as_color(&self) -> Option<&str> {
        match self {
            Self::Color(color) => Some(color),
            Self::Gradient(_) => None,
        }
    }
}

/// One recorded surface call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "call")]
#[allow(missing_docs)]
pub enum SurfaceCall {
    Save,
    Restore,
    BeginPath,
    ClosePath,
    MoveTo { x: f64, y: f64 },
    LineTo { x: f64, y: f64 },
    Rect { x: f64, y: f64, width: f64, height: f64 },
    Arc { x: f64, y: f64, radius: f64, start: f64, end: f64, anticlockwise: bool },
    QuadraticCurveTo { cpx: f64, cpy: f64, x: f64, y: f64 },
    /// Fill with the paint active at the time of the call.
    Fill { rule: FillRule, paint: Paint },
    /// Stroke with the paint and line width active at the time of the call.
    Stroke { paint: Paint, line_width: f64 },
    Clip,
    Translate { x: f64, y: f64 },
    Rotate { angle: f64 },
    ClearRect { x: f64, y: f64, width: f64, height: f64 },
    SetFillStyle { paint: Paint },
    SetStrokeStyle { paint: Paint },
    SetLineWidth { width: f64 },
    SetFont { font: String },
    SetFilter { filter: String },
    SetGlobalCompositeOperation { operation: String },
    FillText { text: String, x: f64, y: f64, paint: Paint },
    DrawImage { src: Rect, dst: Rect, image_calls: usize },
}

/// Snapshot of a recording surface, usable as an image.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedImage {
    /// Image width.
    pub width: f64,
    /// Image height.
    pub height: f64,
    /// Calls that painted the image.
    pub calls: Vec<SurfaceCall>,
}

#[derive(Debug, Clone, PartialEq)]
struct DrawState {
    fill: Paint,
    stroke: Paint,
    line_width: f64,
    font: String,
    filter: String,
    composite_operation: String,
    translation: (f64, f64),
    rotation: f64,
}

impl Default for DrawState {
    fn default() -> Self {
        Self {
            fill: Paint::Color("#000000".to_string()),
            stroke: Paint::Color("#000000".to_string()),
            line_width: 1.0,
            font: "10px sans-serif".to_string(),
            filter: "none".to_string(),
            composite_operation: "source-over".to_string(),
            translation: (0.0, 0.0),
            rotation: 0.0,
        }
    }
}

const COMPOSITE_OPERATIONS: &[&str] = &[
    "source-over",
    "source-in",
    "source-out",
    "source-atop",
    "destination-over",
    "destination-in",
    "destination-out",
    "destination-atop",
    "lighter",
    "copy",
    "xor",
    "multiply",
    "screen",
    "overlay",
    "darken",
    "lighten",
    "color-dodge",
    "color-burn",
    "hard-light",
    "soft-light",
    "difference",
    "exclusion",
    "hue",
    "saturation",
    "color",
    "luminosity",
];

/// A headless [`Surface`] that records calls and tracks state.
#[derive(Debug, Clone)]
pub struct RecordingSurface {
    width: f64,
    height: f64,
    glyph_width: f64,
    glyph_ascent: f64,
    state: DrawState,
    stack: Vec<DrawState>,
    calls: Vec<SurfaceCall>,
}

impl RecordingSurface {
    /// Create a surface of the given size.
    ///
    /// Text is measured as monospace with 10 px glyphs and an 8 px ascent.
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            glyph_width: 10.0,
            glyph_ascent: 8.0,
            state: DrawState::default(),
            stack: Vec::new(),
            calls: Vec::new(),
        }
    }

    /// Override the glyph metrics used by [`Surface::measure_text`].
    #[must_use]
    pub fn with_glyph_metrics(mut self, width: f64, ascent: f64) -> Self {
        self.glyph_width = width;
        self.glyph_ascent = ascent;
        self
    }

    /// All recorded calls.
    #[must_use]
    pub fn calls(&self) -> &[SurfaceCall] {
        &self.calls
    }

    /// Take the recorded calls, leaving the log empty.
    pub fn take_calls(&mut self) -> Vec<SurfaceCall> {
        std::mem::take(&mut self.calls)
    }

    /// Number of recorded calls matching `predicate`.
    pub fn count(&self, predicate: impl Fn(&SurfaceCall) -> bool) -> usize {
        self.calls.iter().filter(|c| predicate(c)).count()
    }

    /// Number of fill passes.
    #[must_use]
    pub fn fill_count(&self) -> usize {
        self.count(|c| matches!(c, SurfaceCall::Fill { .. }))
    }

    /// Number of stroke passes.
    #[must_use]
    pub fn stroke_count(&self) -> usize {
        self.count(|c| matches!(c, SurfaceCall::Stroke { .. }))
    }

    /// Depth of the state stack.
    #[must_use]
    pub fn save_depth(&self) -> usize {
        self.stack.len()
    }

    /// Current fill paint.
    #[must_use]
    pub fn fill_paint(&self) -> &Paint {
        &self.state.fill
    }

    /// Current stroke paint.
    #[must_use]
    pub fn stroke_paint(&self) -> &Paint {
        &self.state.stroke
    }

    /// Current filter.
    #[must_use]
    pub fn filter(&self) -> &str {
        &self.state.filter
    }

    /// Current compositing operation.
    #[must_use]
    pub fn composite_operation(&self) -> &str {
        &self.state.composite_operation
    }

    /// Accumulated translation and rotation of the current transform.
    #[must_use]
    pub fn transform(&self) -> ((f64, f64), f64) {
        (self.state.translation, self.state.rotation)
    }

    fn record(&mut self, call: SurfaceCall) {
        self.calls.push(call);
    }
}

impl Surface for RecordingSurface {
    type Style = Paint;
    type Image = RecordedImage;

    fn width(&self) -> f64 {
        self.width
    }

    fn height(&self) -> f64 {
        self.height
    }

    fn save(&mut self) {
        self.stack.push(self.state.clone());
        self.record(SurfaceCall::Save);
    }

    fn restore(&mut self) {
        // Like a browser context, restoring an empty stack is a no-op.
        if let Some(state) = self.stack.pop() {
            self.state = state;
        }
        self.record(SurfaceCall::Restore);
    }

    fn begin_path(&mut self) {
        self.record(SurfaceCall::BeginPath);
    }

    fn close_path(&mut self) {
        self.record(SurfaceCall::ClosePath);
    }

    fn move_to(&mut self, x: f64, y: f64) {
        self.record(SurfaceCall::MoveTo { x, y });
    }

    fn line_to(&mut self, x: f64, y: f64) {
        self.record(SurfaceCall::LineTo { x, y });
    }

    fn rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.record(SurfaceCall::Rect {
            x,
            y,
            width,
            height,
        });
    }

    fn arc(
        &mut self,
        x: f64,
        y: f64,
        radius: f64,
        start: f64,
        end: f64,
        anticlockwise: bool,
    ) -> SurfaceResult<()> {
        if radius < 0.0 {
            return Err(SurfaceError::new(format!("The radius provided ({radius}) is negative")));
        }
        self.record(SurfaceCall::Arc {
            x,
            y,
            radius,
            start,
            end,
            anticlockwise,
        });
        Ok(())
    }

    fn quadratic_curve_to(&mut self, cpx: f64, cpy: f64, x: f64, y: f64) {
        self.record(SurfaceCall::QuadraticCurveTo { cpx, cpy, x, y });
    }

    fn fill(&mut self, rule: FillRule) {
        let paint = self.state.fill.clone();
        self.record(SurfaceCall::Fill { rule, paint });
    }

    fn stroke(&mut self) {
        let paint = self.state.stroke.clone();
        let line_width = self.state.line_width;
        self.record(SurfaceCall::Stroke { paint, line_width });
    }

    fn clip(&mut self) {
        self.record(SurfaceCall::Clip);
    }

    fn translate(&mut self, x: f64, y: f64) -> SurfaceResult<()> {
        self.state.translation.0 += x;
        self.state.translation.1 += y;
        self.record(SurfaceCall::Translate { x, y });
        Ok(())
    }

    fn rotate(&mut self, angle: f64) -> SurfaceResult<()> {
        self.state.rotation += angle;
        self.record(SurfaceCall::Rotate { angle });
        Ok(())
    }

    fn clear_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.record(SurfaceCall::ClearRect {
            x,
            y,
            width,
            height,
        });
    }

    fn fill_style(&self) -> Paint {
        self.state.fill.clone()
    }

    fn set_fill_style(&mut self, style: &Paint) {
        self.state.fill = style.clone();
        self.record(SurfaceCall::SetFillStyle {
            paint: style.clone(),
        });
    }

    fn set_fill_color(&mut self, color: &str) {
        self.set_fill_style(&Paint::Color(color.to_string()));
    }

    fn stroke_style(&self) -> Paint {
        self.state.stroke.clone()
    }

    fn set_stroke_style(&mut self, style: &Paint) {
        self.state.stroke = style.clone();
        self.record(SurfaceCall::SetStrokeStyle {
            paint: style.clone(),
        });
    }

    fn set_stroke_color(&mut self, color: &str) {
        self.set_stroke_style(&Paint::Color(color.to_string()));
    }

    fn set_stroke_gradient(&mut self, gradient: &LinearGradient) -> SurfaceResult<()> {
        if let Some(stop) = gradient
            .stops
            .iter()
            .find(|s| !(0.0..=1.0).contains(&s.offset))
        {
            return Err(SurfaceError::new(format!(
                "The provided value ({}) is outside the range (0.0, 1.0)",
                stop.offset
            )));
        }
        self.set_stroke_style(&Paint::Gradient(gradient.clone()));
        Ok(())
    }

    fn line_width(&self) -> f64 {
        self.state.line_width
    }

    fn set_line_width(&mut self, width: f64) {
        // Browsers ignore non-positive widths.
        if width > 0.0 && width.is_finite() {
            self.state.line_width = width;
        }
        self.record(SurfaceCall::SetLineWidth { width });
    }

    fn font(&self) -> String {
        self.state.font.clone()
    }

    fn set_font(&mut self, font: &str) {
        self.state.font = font.to_string();
        self.record(SurfaceCall::SetFont {
            font: font.to_string(),
        });
    }

    fn set_filter(&mut self, filter: &str) {
        self.state.filter = filter.to_string();
        self.record(SurfaceCall::SetFilter {
            filter: filter.to_string(),
        });
    }

    fn set_global_composite_operation(&mut self, operation: &str) -> SurfaceResult<()> {
        if !COMPOSITE_OPERATIONS.contains(&operation) {
            return Err(SurfaceError::new(format!(
                "Unknown composite operation: {operation}"
            )));
        }
        self.state.composite_operation = operation.to_string();
        self.record(SurfaceCall::SetGlobalCompositeOperation {
            operation: operation.to_string(),
        });
        Ok(())
    }

    #[allow(clippy::cast_precision_loss)]
    fn measure_text(&self, text: &str) -> SurfaceResult<TextMetrics> {
        Ok(TextMetrics {
            width: text.chars().count() as f64 * self.glyph_width,
            ascent: self.glyph_ascent,
        })
    }

    fn fill_text(&mut self, text: &str, x: f64, y: f64) -> SurfaceResult<()> {
        let paint = self.state.fill.clone();
        self.record(SurfaceCall::FillText {
            text: text.to_string(),
            x,
            y,
            paint,
        });
        Ok(())
    }

    fn draw_image(&mut self, image: &RecordedImage, src: &Rect, dst: &Rect) -> SurfaceResult<()> {
        self.record(SurfaceCall::DrawImage {
            src: src.clone(),
            dst: dst.clone(),
            image_calls: image.calls.len(),
        });
        Ok(())
    }

    fn create_offscreen(&self, width: f64, height: f64) -> SurfaceResult<Self> {
        if width <= 0.0 || height <= 0.0 {
            return Err(SurfaceError::new(format!(
                "Invalid offscreen size {width}x{height}"
            )));
        }
        Ok(Self::new(width, height).with_glyph_metrics(self.glyph_width, self.glyph_ascent))
    }

    fn into_image(self) -> RecordedImage {
        RecordedImage {
            width: self.width,
            height: self.height,
            calls: self.calls,
        }
    }
}
