//! Rendering surfaces.
//!
//! A [`Surface`] is the 2D context a drawing engine paints on. It exposes path
//! construction, fill and stroke, clipping, transforms, style state, text and
//! image blits. Styles can be read back as opaque values so that engines can
//! restore them after a temporary override.

pub mod recording;
#[cfg(feature = "wasm")]
pub mod web;

pub use recording::{Paint, RecordedImage, RecordingSurface, SurfaceCall};
#[cfg(feature = "wasm")]
pub use web::WebCanvasSurface;

use drawkit_core::Rect;
use serde::{Deserialize, Serialize};

use crate::SurfaceResult;

/// Winding rule used when filling or clipping a path.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FillRule {
    /// Non-zero winding.
    #[default]
    NonZero,
    /// Even-odd winding.
    EvenOdd,
}

/// Measured text extent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TextMetrics {
    /// Advance width.
    pub width: f64,
    /// Distance from the baseline to the top of the glyph boxes.
    pub ascent: f64,
}

/// A color stop of a [`LinearGradient`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorStop {
    /// Position along the gradient in `[0, 1]`.
    pub offset: f64,
    /// CSS color.
    pub color: String,
}

/// A linear gradient between two points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearGradient {
    /// Start point.
    pub start: (f64, f64),
    /// End point.
    pub end: (f64, f64),
    /// Color stops in ascending offset order.
    pub stops: Vec<ColorStop>,
}

impl LinearGradient {
    /// Gradient with colors evenly spread from `start` to `end`.
    ///
    /// A single color sits at offset `0`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn even(start: (f64, f64), end: (f64, f64), colors: &[String]) -> Self {
        let last = colors.len().saturating_sub(1);
        let stops = colors
            .iter()
            .enumerate()
            .map(|(i, color)| ColorStop {
                offset: if last == 0 { 0.0 } else { i as f64 / last as f64 },
                color: color.clone(),
            })
            .collect();
        Self { start, end, stops }
    }
}

/// A 2D rendering context.
pub trait Surface {
    /// Saved paint (color, gradient or pattern) as returned by the style getters.
    type Style: Clone;
    /// Image type accepted by [`Surface::draw_image`].
    type Image: Clone;

    /// Surface width in pixels.
    fn width(&self) -> f64;
    /// Surface height in pixels.
    fn height(&self) -> f64;

    /// Push the current state onto the state stack.
    fn save(&mut self);
    /// Pop the state stack.
    fn restore(&mut self);

    /// Start a new path.
    fn begin_path(&mut self);
    /// Close the current sub-path.
    fn close_path(&mut self);
    /// Start a sub-path at a point.
    fn move_to(&mut self, x: f64, y: f64);
    /// Add a straight segment.
    fn line_to(&mut self, x: f64, y: f64);
    /// Add a closed rectangle sub-path.
    fn rect(&mut self, x: f64, y: f64, width: f64, height: f64);
    /// Add an arc.
    ///
    /// # Errors
    ///
    /// Returns an error for invalid radii.
    #[allow(clippy::too_many_arguments)]
    fn arc(
        &mut self,
        x: f64,
        y: f64,
        radius: f64,
        start: f64,
        end: f64,
        anticlockwise: bool,
    ) -> SurfaceResult<()>;
    /// Add a quadratic curve.
    fn quadratic_curve_to(&mut self, cpx: f64, cpy: f64, x: f64, y: f64);

    /// Fill the current path with the current fill style.
    fn fill(&mut self, rule: FillRule);
    /// Stroke the current path with the current stroke style.
    fn stroke(&mut self);
    /// Intersect the clip region with the current path.
    fn clip(&mut self);

    /// Translate the transform.
    ///
    /// # Errors
    ///
    /// Returns an error if the surface rejects the transform.
    fn translate(&mut self, x: f64, y: f64) -> SurfaceResult<()>;
    /// Rotate the transform by `angle` radians.
    ///
    /// # Errors
    ///
    /// Returns an error if the surface rejects the transform.
    fn rotate(&mut self, angle: f64) -> SurfaceResult<()>;
    /// Clear a rectangle to transparent.
    fn clear_rect(&mut self, x: f64, y: f64, width: f64, height: f64);

    /// Current fill style.
    fn fill_style(&self) -> Self::Style;
    /// Restore a previously read fill style.
    fn set_fill_style(&mut self, style: &Self::Style);
    /// Set a CSS color as fill style.
    fn set_fill_color(&mut self, color: &str);
    /// Current stroke style.
    fn stroke_style(&self) -> Self::Style;
    /// Restore a previously read stroke style.
    fn set_stroke_style(&mut self, style: &Self::Style);
    /// Set a CSS color as stroke style.
    fn set_stroke_color(&mut self, color: &str);
    /// Set a linear gradient as stroke style.
    ///
    /// # Errors
    ///
    /// Returns an error if a color stop is rejected.
    fn set_stroke_gradient(&mut self, gradient: &LinearGradient) -> SurfaceResult<()>;

    /// Current line width.
    fn line_width(&self) -> f64;
    /// Set the line width.
    fn set_line_width(&mut self, width: f64);
    /// Current CSS font.
    fn font(&self) -> String;
    /// Set the CSS font.
    fn set_font(&mut self, font: &str);
    /// Set the CSS filter.
    fn set_filter(&mut self, filter: &str);
    /// Set the compositing operation.
    ///
    /// # Errors
    ///
    /// Returns an error for unknown operations.
    fn set_global_composite_operation(&mut self, operation: &str) -> SurfaceResult<()>;

    /// Measure text with the current font.
    ///
    /// # Errors
    ///
    /// Returns an error if the surface cannot measure text.
    fn measure_text(&self, text: &str) -> SurfaceResult<TextMetrics>;
    /// Fill text at a baseline position.
    ///
    /// # Errors
    ///
    /// Returns an error if the surface cannot draw text.
    fn fill_text(&mut self, text: &str, x: f64, y: f64) -> SurfaceResult<()>;
    /// Draw the `src` region of `image` into `dst`.
    ///
    /// # Errors
    ///
    /// Returns an error if the image cannot be drawn.
    fn draw_image(&mut self, image: &Self::Image, src: &Rect, dst: &Rect) -> SurfaceResult<()>;

    /// Create an offscreen surface of the same kind.
    ///
    /// # Errors
    ///
    /// Returns an error if the offscreen surface cannot be created.
    fn create_offscreen(&self, width: f64, height: f64) -> SurfaceResult<Self>
    where
        Self: Sized;
    /// Turn this surface into an image that can be drawn onto other surfaces.
    fn into_image(self) -> Self::Image
    where
        Self: Sized;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_even_gradient_stops() {
        let colors = vec!["red".to_string(), "green".to_string(), "blue".to_string()];
        let gradient = LinearGradient::even((0.0, 0.0), (10.0, 0.0), &colors);
        let offsets: Vec<f64> = gradient.stops.iter().map(|s| s.offset).collect();
        assert_eq!(offsets, vec![0.0, 0.5, 1.0]);
    }

    #[test]
    fn test_single_color_gradient_starts_at_zero() {
        let gradient = LinearGradient::even((0.0, 0.0), (1.0, 1.0), &["red".to_string()]);
        assert_eq!(gradient.stops.len(), 1);
        assert_eq!(gradient.stops[0].offset, 0.0);
    }
}
