//! The drawing engine capability.
//!
//! [`DrawEngine`] is the fluent drawing API. Every operation returns the
//! engine for chaining and is a no-op while the draw condition is off, except
//! for state setters (`set_context`, `set_unit`, draw condition, `set_font`,
//! `set_global_composite_operation`) which always apply.
//!
//! Composite operations (`hexagon`, `ngon`, `cube`, `cube3d`,
//! `set_conditional_filter`, `geometry`) are provided methods built on the
//! primitive operations, so wrapping engines observe their nested calls.

mod canvas2d;
pub mod shapes;

pub use canvas2d::Canvas2dEngine;

use drawkit_core::{
    AngleSets, Body, FaceStyles, GeometryStore, PositionUnit, Rect, StylePass, UnitConverter,
    Vector2D, Vector3D,
};
use serde::{Deserialize, Serialize};

use crate::surface::{FillRule, Surface};
use crate::DrawResult;

/// Line width used by composite shapes.
pub const DEFAULT_LINE_WIDTH: f64 = 0.5;

/// Placement of a text operation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TextBox {
    /// Baseline start of the first line. Its unit applies to `width` too.
    pub position: Vector2D,
    /// Wrap width. Text is drawn on a single line when `None`.
    pub width: Option<f64>,
    /// Distance between wrapped lines. Defaults to the ascent of `M`.
    pub line_height: Option<f64>,
    /// Center each wrapped line within `width`.
    pub center: bool,
}

impl TextBox {
    /// Unwrapped text at `position`.
    #[must_use]
    pub fn at(position: Vector2D) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    /// Wrap lines at `width`.
    #[must_use]
    pub fn wrapped(mut self, width: f64) -> Self {
        self.width = Some(width);
        self
    }

    /// Set the line height.
    #[must_use]
    pub fn with_line_height(mut self, line_height: f64) -> Self {
        self.line_height = Some(line_height);
        self
    }

    /// Center wrapped lines.
    #[must_use]
    pub fn centered(mut self) -> Self {
        self.center = true;
        self
    }
}

/// Shape information reported by an engine for a drawn primitive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MethodDetails {
    /// Operation that produced the shape.
    pub method_name: String,
    /// Outline in surface pixels.
    pub body: Option<Body>,
}

/// Fluent 2D drawing API.
pub trait DrawEngine {
    /// Surface the engine draws on.
    type Surface: Surface;

    /// Bind the rendering surface, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Wrapping engines may report tracing errors.
    fn set_context(&mut self, surface: Self::Surface) -> DrawResult<&mut Self>;

    /// The bound surface.
    fn context(&self) -> Option<&Self::Surface>;

    /// The bound surface, mutably.
    fn context_mut(&mut self) -> Option<&mut Self::Surface>;

    /// Whether drawing operations are currently enabled.
    fn draw_condition(&self) -> bool;

    /// Default unit for values without their own unit.
    fn unit(&self) -> PositionUnit;

    /// Unit converter for the bound surface.
    ///
    /// # Errors
    ///
    /// Returns [`crate::DrawError::NoContextBound`] without a surface.
    fn converter(&self) -> DrawResult<UnitConverter>;

    /// Enable or disable drawing.
    ///
    /// # Errors
    ///
    /// Wrapping engines may report tracing errors.
    fn set_draw_condition(&mut self, condition: bool) -> DrawResult<&mut Self>;

    /// Re-enable drawing regardless of the previous condition.
    ///
    /// # Errors
    ///
    /// Wrapping engines may report tracing errors.
    fn remove_draw_condition(&mut self) -> DrawResult<&mut Self>;

    /// Set the default unit.
    ///
    /// # Errors
    ///
    /// Wrapping engines may report tracing errors.
    fn set_unit(&mut self, unit: PositionUnit) -> DrawResult<&mut Self>;

    /// Mark the start of a drawing cycle.
    ///
    /// # Errors
    ///
    /// Wrapping engines may report tracing errors.
    fn start(&mut self, name: &str) -> DrawResult<&mut Self>;

    /// Begin a new path.
    ///
    /// # Errors
    ///
    /// Returns an error without a bound surface.
    fn begin_path(&mut self) -> DrawResult<&mut Self>;

    /// Close the current sub-path.
    ///
    /// # Errors
    ///
    /// Returns an error without a bound surface.
    fn close_path(&mut self) -> DrawResult<&mut Self>;

    /// Move the pen.
    ///
    /// # Errors
    ///
    /// Returns an error without a bound surface.
    fn move_to(&mut self, position: &Vector2D) -> DrawResult<&mut Self>;

    /// Add a quadratic curve to the current path.
    ///
    /// # Errors
    ///
    /// Returns an error without a bound surface.
    fn quadratic_curve_to(
        &mut self,
        control_point: &Vector2D,
        position: &Vector2D,
    ) -> DrawResult<&mut Self>;

    /// Fill the current path with the current fill style.
    ///
    /// # Errors
    ///
    /// Returns an error without a bound surface.
    fn fill(&mut self, rule: FillRule) -> DrawResult<&mut Self>;

    /// Stroke the current path with the current stroke style.
    ///
    /// # Errors
    ///
    /// Returns an error without a bound surface.
    fn stroke(&mut self) -> DrawResult<&mut Self>;

    /// Push the surface state.
    ///
    /// # Errors
    ///
    /// Returns an error without a bound surface.
    fn save(&mut self) -> DrawResult<&mut Self>;

    /// Pop the surface state.
    ///
    /// # Errors
    ///
    /// Returns an error without a bound surface.
    fn restore(&mut self) -> DrawResult<&mut Self>;

    /// Clear the whole surface.
    ///
    /// # Errors
    ///
    /// Returns an error without a bound surface.
    fn cls(&mut self) -> DrawResult<&mut Self>;

    /// Add a rectangle to the current path without drawing it.
    ///
    /// # Errors
    ///
    /// Returns an error without a bound surface.
    fn select_rect(&mut self, rect: &Rect) -> DrawResult<&mut Self>;

    /// Add a rounded rectangle to the current path without drawing it.
    ///
    /// # Errors
    ///
    /// Returns an error without a bound surface.
    fn select_round_rect(&mut self, rect: &Rect, radius: f64) -> DrawResult<&mut Self>;

    /// Set the fill color.
    ///
    /// # Errors
    ///
    /// Returns an error without a bound surface.
    fn set_fill_style(&mut self, color: &str) -> DrawResult<&mut Self>;

    /// Set the stroke color.
    ///
    /// # Errors
    ///
    /// Returns an error without a bound surface.
    fn set_stroke_style(&mut self, color: &str) -> DrawResult<&mut Self>;

    /// Set the CSS filter.
    ///
    /// # Errors
    ///
    /// Returns an error without a bound surface.
    fn set_filter(&mut self, filter: &str) -> DrawResult<&mut Self>;

    /// Set the CSS font. Applies even while drawing is disabled.
    ///
    /// # Errors
    ///
    /// Returns an error without a bound surface.
    fn set_font(&mut self, font: &str) -> DrawResult<&mut Self>;

    /// Set the compositing operation. Applies even while drawing is disabled.
    ///
    /// # Errors
    ///
    /// Returns an error without a bound surface or for unknown operations.
    fn set_global_composite_operation(&mut self, operation: &str) -> DrawResult<&mut Self>;

    /// Draw a circle.
    ///
    /// # Errors
    ///
    /// Returns an error without a bound surface or for a negative radius.
    fn circle(
        &mut self,
        position: &Vector2D,
        radius: f64,
        stroke: &StylePass,
        fill: &StylePass,
    ) -> DrawResult<&mut Self>;

    /// Draw a ring between two radii.
    ///
    /// # Errors
    ///
    /// Returns an error without a bound surface or for a negative radius.
    fn donut(
        &mut self,
        position: &Vector2D,
        outer_radius: f64,
        inner_radius: f64,
        stroke: &StylePass,
        fill: &StylePass,
    ) -> DrawResult<&mut Self>;

    /// Draw a rectangle, rotated by `angle` degrees around `pivot` (a fraction
    /// of the rectangle).
    ///
    /// # Errors
    ///
    /// Returns an error without a bound surface.
    fn rectangle(
        &mut self,
        rect: &Rect,
        stroke: &StylePass,
        fill: &StylePass,
        angle: f64,
        pivot: &Vector2D,
    ) -> DrawResult<&mut Self>;

    /// Draw a rectangle with rounded corners.
    ///
    /// # Errors
    ///
    /// Returns an error without a bound surface.
    fn round_rectangle(
        &mut self,
        rect: &Rect,
        radius: f64,
        stroke: &StylePass,
        fill: &StylePass,
    ) -> DrawResult<&mut Self>;

    /// Draw a polyline. The path is closed before filling.
    ///
    /// # Errors
    ///
    /// Returns an error without a bound surface.
    fn lines(
        &mut self,
        start: &Vector2D,
        destinations: &[Vector2D],
        stroke: &StylePass,
        fill: &StylePass,
        line_width: f64,
    ) -> DrawResult<&mut Self>;

    /// Stroke a polyline with a linear gradient from the start to the last point.
    ///
    /// # Errors
    ///
    /// Returns an error without a bound surface or for rejected colors.
    fn gradient_lines(
        &mut self,
        start: &Vector2D,
        destinations: &[Vector2D],
        colors: &[String],
        width: f64,
    ) -> DrawResult<&mut Self>;

    /// Draw text, wrapping greedily when the box has a width.
    ///
    /// # Errors
    ///
    /// Returns an error without a bound surface or if text cannot be drawn.
    fn text(
        &mut self,
        text_box: &TextBox,
        text: &str,
        color: Option<&str>,
        font: Option<&str>,
    ) -> DrawResult<&mut Self>;

    /// Draw the `src` region of an image into `dst` (defaults to `src`),
    /// rotated by `angle` degrees around `pivot`.
    ///
    /// # Errors
    ///
    /// Returns an error without a bound surface or if the image cannot be drawn.
    fn image(
        &mut self,
        image: &<Self::Surface as Surface>::Image,
        src: &Rect,
        dst: Option<&Rect>,
        angle: f64,
        pivot: &Vector2D,
    ) -> DrawResult<&mut Self>;

    /// Save the state and clip to the union of `rects`.
    ///
    /// # Errors
    ///
    /// Returns an error without a bound surface.
    fn clip_rect(&mut self, rects: &[Rect]) -> DrawResult<&mut Self>;

    /// Save the state and clip to the union of rounded `rects`.
    ///
    /// # Errors
    ///
    /// Returns an error without a bound surface.
    fn clip_round_rect(&mut self, rects: &[Rect], radius: f64) -> DrawResult<&mut Self>;

    /// Drop the clip pushed by `clip_rect` or `clip_round_rect`.
    ///
    /// # Errors
    ///
    /// Returns an error without a bound surface.
    fn reset_clip(&mut self) -> DrawResult<&mut Self>;

    /// Draw a grid over `area` (defaults to the whole surface), rotated by
    /// `angle` degrees around the area center.
    ///
    /// # Errors
    ///
    /// Returns an error without a bound surface or for a non-positive cell size.
    fn grid(
        &mut self,
        cell_size: f64,
        stroke: &str,
        area: Option<&Rect>,
        angle: f64,
    ) -> DrawResult<&mut Self>;

    /// Draw a regular hexagon.
    ///
    /// # Errors
    ///
    /// Returns an error without a bound surface.
    fn hexagon(
        &mut self,
        position: &Vector2D,
        radius: f64,
        stroke: &StylePass,
        fill: &StylePass,
        angle: f64,
    ) -> DrawResult<&mut Self> {
        shapes::hexagon(self, position, radius, stroke, fill, angle)?;
        Ok(self)
    }

    /// Draw a regular polygon.
    ///
    /// # Errors
    ///
    /// Returns an error without a bound surface or for zero sides.
    fn ngon(
        &mut self,
        position: &Vector2D,
        radius: f64,
        sides: u32,
        stroke: &StylePass,
        fill: &StylePass,
        angle: f64,
    ) -> DrawResult<&mut Self> {
        shapes::ngon(self, position, radius, sides, stroke, fill, angle)?;
        Ok(self)
    }

    /// Draw a 2.5D cube on `plane`, tilted by `tilt` degrees.
    ///
    /// # Errors
    ///
    /// Returns an error without a bound surface.
    fn cube(
        &mut self,
        plane: &Rect,
        depth: Option<f64>,
        tilt: f64,
        stroke: &StylePass,
        fills: &FaceStyles,
    ) -> DrawResult<&mut Self> {
        shapes::cube(self, plane, depth, tilt, stroke, fills)?;
        Ok(self)
    }

    /// Draw a rotated cuboid in perspective.
    ///
    /// # Errors
    ///
    /// Returns an error without a bound surface.
    fn cube3d(
        &mut self,
        plane: &Rect,
        depth: Option<f64>,
        angles: &AngleSets,
        stroke: &StylePass,
        fills: &FaceStyles,
        pivot: &Vector3D,
    ) -> DrawResult<&mut Self> {
        shapes::cube3d(self, plane, depth, angles, stroke, fills, pivot)?;
        Ok(self)
    }

    /// Set the filter only when `condition` holds.
    ///
    /// # Errors
    ///
    /// Returns an error without a bound surface.
    fn set_conditional_filter(&mut self, condition: bool, filter: &str) -> DrawResult<&mut Self> {
        shapes::conditional_filter(self, condition, filter)?;
        Ok(self)
    }

    /// Draw a built geometry.
    ///
    /// # Errors
    ///
    /// Returns an error without a bound surface.
    fn geometry(&mut self, store: &GeometryStore) -> DrawResult<&mut Self> {
        shapes::geometry(self, store)?;
        Ok(self)
    }
}
