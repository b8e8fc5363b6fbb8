//! Canvas 2D drawing engine.
//!
//! Converts logical units to pixels and issues primitive operations on the
//! bound [`Surface`]. Temporary style overrides are always restored, so state
//! never leaks from one call into the next.

use std::f64::consts::TAU;

use drawkit_core::{
    grid_lines, rotate_about, wrap_words, Body, PositionUnit, Rect, StylePass, UnitConverter,
    Vector2D,
};

use super::{DrawEngine, MethodDetails, TextBox};
use crate::surface::{FillRule, LinearGradient, Surface};
use crate::{DrawError, DrawResult};

/// Run a fill pass on `surface`.
fn fill_pass<S: Surface>(surface: &mut S, pass: &StylePass) {
    match pass {
        StylePass::Skip => {}
        StylePass::UseCurrent => surface.fill(FillRule::NonZero),
        StylePass::Explicit(color) => {
            let previous = surface.fill_style();
            surface.set_fill_color(color);
            surface.fill(FillRule::NonZero);
            surface.set_fill_style(&previous);
        }
    }
}

/// Run a stroke pass on `surface`.
fn stroke_pass<S: Surface>(surface: &mut S, pass: &StylePass) {
    match pass {
        StylePass::Skip => {}
        StylePass::UseCurrent => surface.stroke(),
        StylePass::Explicit(color) => {
            let previous = surface.stroke_style();
            surface.set_stroke_color(color);
            surface.stroke();
            surface.set_stroke_style(&previous);
        }
    }
}

/// Add a rounded rectangle sub-path.
fn round_rect_path<S: Surface>(surface: &mut S, rect: &Rect, radius: f64) {
    let (x, y, w, h) = (rect.x, rect.y, rect.width, rect.height);
    surface.move_to(x + radius, y);
    surface.line_to(x + w - radius, y);
    surface.quadratic_curve_to(x + w, y, x + w, y + radius);
    surface.line_to(x + w, y + h - radius);
    surface.quadratic_curve_to(x + w, y + h, x + w - radius, y + h);
    surface.line_to(x + radius, y + h);
    surface.quadratic_curve_to(x, y + h, x, y + h - radius);
    surface.line_to(x, y + radius);
    surface.quadratic_curve_to(x, y, x + radius, y);
}

/// Rotate around `(px, py)` by `angle` degrees for the following calls.
fn rotate_around<S: Surface>(surface: &mut S, px: f64, py: f64, angle: f64) -> DrawResult<()> {
    surface.translate(px, py)?;
    surface.rotate(angle.to_radians())?;
    surface.translate(-px, -py)?;
    Ok(())
}

/// Fill `text` at `(x, y)`, wrapped to `width` when given.
#[allow(clippy::cast_precision_loss)]
fn fill_text_box<S: Surface>(
    surface: &mut S,
    text_box: &TextBox,
    text: &str,
    x: f64,
    y: f64,
    width: Option<f64>,
) -> DrawResult<()> {
    let Some(width) = width else {
        surface.fill_text(text, x, y)?;
        return Ok(());
    };
    let line_height = match text_box.line_height {
        Some(h) => h,
        None => surface.measure_text("M")?.ascent,
    };
    let lines = wrap_words(text, width, |s| surface.measure_text(s).map(|m| m.width))?;
    for (index, line) in lines.iter().enumerate() {
        let line_x = if text_box.center {
            let line_width = surface.measure_text(line)?.width;
            x + width / 2.0 - line_width / 2.0
        } else {
            x
        };
        surface.fill_text(line, line_x, y + index as f64 * line_height)?;
    }
    Ok(())
}

/// Draws on a 2D [`Surface`].
#[derive(Debug)]
pub struct Canvas2dEngine<S: Surface> {
    surface: Option<S>,
    draw_condition: bool,
    unit: PositionUnit,
    record_details: bool,
    details: Vec<MethodDetails>,
}

impl<S: Surface> Canvas2dEngine<S> {
    /// Create an engine without a surface.
    #[must_use]
    pub fn new() -> Self {
        Self {
            surface: None,
            draw_condition: true,
            unit: PositionUnit::Px,
            record_details: false,
            details: Vec::new(),
        }
    }

    /// Create an engine bound to `surface`.
    #[must_use]
    pub fn with_surface(surface: S) -> Self {
        Self {
            surface: Some(surface),
            ..Self::new()
        }
    }

    /// Collect [`MethodDetails`] for drawn shapes.
    pub fn set_record_details(&mut self, record: bool) {
        self.record_details = record;
        if !record {
            self.details.clear();
        }
    }

    /// Take the details collected since the last call.
    pub fn take_details(&mut self) -> Vec<MethodDetails> {
        std::mem::take(&mut self.details)
    }

    /// Unbind and return the surface.
    #[must_use]
    pub fn into_surface(self) -> Option<S> {
        self.surface
    }

    fn surface_mut(&mut self) -> DrawResult<&mut S> {
        self.surface.as_mut().ok_or(DrawError::NoContextBound)
    }

    fn emit(&mut self, method_name: &str, body: Body) {
        if self.record_details {
            self.details.push(MethodDetails {
                method_name: method_name.to_string(),
                body: Some(body),
            });
        }
    }
}

impl<S: Surface> Default for Canvas2dEngine<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Surface> DrawEngine for Canvas2dEngine<S> {
    type Surface = S;

    fn set_context(&mut self, surface: S) -> DrawResult<&mut Self> {
        tracing::debug!("Surface bound: {}x{}", surface.width(), surface.height());
        self.surface = Some(surface);
        Ok(self)
    }

    fn context(&self) -> Option<&S> {
        self.surface.as_ref()
    }

    fn context_mut(&mut self) -> Option<&mut S> {
        self.surface.as_mut()
    }

    fn draw_condition(&self) -> bool {
        self.draw_condition
    }

    fn unit(&self) -> PositionUnit {
        self.unit
    }

    fn converter(&self) -> DrawResult<UnitConverter> {
        let surface = self.surface.as_ref().ok_or(DrawError::NoContextBound)?;
        Ok(UnitConverter::new(surface.width(), surface.height(), self.unit))
    }

    fn set_draw_condition(&mut self, condition: bool) -> DrawResult<&mut Self> {
        self.draw_condition = condition;
        Ok(self)
    }

    fn remove_draw_condition(&mut self) -> DrawResult<&mut Self> {
        self.draw_condition = true;
        Ok(self)
    }

    fn set_unit(&mut self, unit: PositionUnit) -> DrawResult<&mut Self> {
        self.unit = unit;
        Ok(self)
    }

    fn start(&mut self, name: &str) -> DrawResult<&mut Self> {
        tracing::trace!("Drawing cycle started: {name}");
        Ok(self)
    }

    fn begin_path(&mut self) -> DrawResult<&mut Self> {
        if !self.draw_condition {
            return Ok(self);
        }
        self.surface_mut()?.begin_path();
        Ok(self)
    }

    fn close_path(&mut self) -> DrawResult<&mut Self> {
        if !self.draw_condition {
            return Ok(self);
        }
        self.surface_mut()?.close_path();
        Ok(self)
    }

    fn move_to(&mut self, position: &Vector2D) -> DrawResult<&mut Self> {
        if !self.draw_condition {
            return Ok(self);
        }
        let p = self.converter()?.vector(position);
        self.surface_mut()?.move_to(p.x(), p.y());
        Ok(self)
    }

    fn quadratic_curve_to(
        &mut self,
        control_point: &Vector2D,
        position: &Vector2D,
    ) -> DrawResult<&mut Self> {
        if !self.draw_condition {
            return Ok(self);
        }
        let converter = self.converter()?;
        let cp = converter.vector(control_point);
        let p = converter.vector(position);
        self.surface_mut()?
            .quadratic_curve_to(cp.x(), cp.y(), p.x(), p.y());
        Ok(self)
    }

    fn fill(&mut self, rule: FillRule) -> DrawResult<&mut Self> {
        if !self.draw_condition {
            return Ok(self);
        }
        self.surface_mut()?.fill(rule);
        Ok(self)
    }

    fn stroke(&mut self) -> DrawResult<&mut Self> {
        if !self.draw_condition {
            return Ok(self);
        }
        self.surface_mut()?.stroke();
        Ok(self)
    }

    fn save(&mut self) -> DrawResult<&mut Self> {
        if !self.draw_condition {
            return Ok(self);
        }
        self.surface_mut()?.save();
        Ok(self)
    }

    fn restore(&mut self) -> DrawResult<&mut Self> {
        if !self.draw_condition {
            return Ok(self);
        }
        self.surface_mut()?.restore();
        Ok(self)
    }

    fn cls(&mut self) -> DrawResult<&mut Self> {
        if !self.draw_condition {
            return Ok(self);
        }
        let surface = self.surface_mut()?;
        let (w, h) = (surface.width(), surface.height());
        surface.clear_rect(0.0, 0.0, w, h);
        Ok(self)
    }

    fn select_rect(&mut self, rect: &Rect) -> DrawResult<&mut Self> {
        if !self.draw_condition {
            return Ok(self);
        }
        let r = self.converter()?.rect(rect);
        self.surface_mut()?.rect(r.x, r.y, r.width, r.height);
        Ok(self)
    }

    fn select_round_rect(&mut self, rect: &Rect, radius: f64) -> DrawResult<&mut Self> {
        if !self.draw_condition {
            return Ok(self);
        }
        let converter = self.converter()?;
        let r = converter.rect(rect);
        let radius = converter.scalar(radius);
        round_rect_path(self.surface_mut()?, &r, radius);
        Ok(self)
    }

    fn set_fill_style(&mut self, color: &str) -> DrawResult<&mut Self> {
        if !self.draw_condition {
            return Ok(self);
        }
        self.surface_mut()?.set_fill_color(color);
        Ok(self)
    }

    fn set_stroke_style(&mut self, color: &str) -> DrawResult<&mut Self> {
        if !self.draw_condition {
            return Ok(self);
        }
        self.surface_mut()?.set_stroke_color(color);
        Ok(self)
    }

    fn set_filter(&mut self, filter: &str) -> DrawResult<&mut Self> {
        if !self.draw_condition {
            return Ok(self);
        }
        self.surface_mut()?.set_filter(filter);
        Ok(self)
    }

    fn set_font(&mut self, font: &str) -> DrawResult<&mut Self> {
        self.surface_mut()?.set_font(font);
        Ok(self)
    }

    fn set_global_composite_operation(&mut self, operation: &str) -> DrawResult<&mut Self> {
        self.surface_mut()?.set_global_composite_operation(operation)?;
        Ok(self)
    }

    fn circle(
        &mut self,
        position: &Vector2D,
        radius: f64,
        stroke: &StylePass,
        fill: &StylePass,
    ) -> DrawResult<&mut Self> {
        if !self.draw_condition {
            return Ok(self);
        }
        let converter = self.converter()?;
        let center = converter.vector(position);
        let radius = converter.scalar(radius);

        let surface = self.surface_mut()?;
        surface.begin_path();
        surface.arc(center.x(), center.y(), radius, 0.0, TAU, false)?;
        surface.close_path();
        fill_pass(surface, fill);
        stroke_pass(surface, stroke);

        self.emit("circle", Body::Circle { center, radius });
        Ok(self)
    }

    fn donut(
        &mut self,
        position: &Vector2D,
        outer_radius: f64,
        inner_radius: f64,
        stroke: &StylePass,
        fill: &StylePass,
    ) -> DrawResult<&mut Self> {
        if !self.draw_condition {
            return Ok(self);
        }
        let converter = self.converter()?;
        let center = converter.vector(position);
        let outer = converter.scalar(outer_radius);
        let inner = converter.scalar(inner_radius);

        let surface = self.surface_mut()?;
        surface.begin_path();
        surface.arc(center.x(), center.y(), outer, 0.0, TAU, false)?;
        surface.arc(center.x(), center.y(), inner, 0.0, TAU, true)?;
        fill_pass(surface, fill);
        stroke_pass(surface, stroke);

        self.emit(
            "donut",
            Body::Circle {
                center,
                radius: outer,
            },
        );
        Ok(self)
    }

    fn rectangle(
        &mut self,
        rect: &Rect,
        stroke: &StylePass,
        fill: &StylePass,
        angle: f64,
        pivot: &Vector2D,
    ) -> DrawResult<&mut Self> {
        if !self.draw_condition {
            return Ok(self);
        }
        let r = self.converter()?.rect(rect);
        let anchor = r.point_at(pivot);
        let rotated = angle != 0.0;

        let surface = self.surface_mut()?;
        if rotated {
            surface.save();
            rotate_around(surface, anchor.x(), anchor.y(), angle)?;
        }
        surface.begin_path();
        surface.rect(r.x, r.y, r.width, r.height);
        surface.close_path();
        fill_pass(surface, fill);
        stroke_pass(surface, stroke);
        if rotated {
            surface.restore();
        }

        let body = match Body::rect(r.x, r.y, r.width, r.height) {
            Body::Polygon(corners) if rotated => Body::Polygon(
                corners
                    .iter()
                    .map(|c| rotate_about(c, &anchor, angle))
                    .collect(),
            ),
            body => body,
        };
        self.emit("rectangle", body);
        Ok(self)
    }

    fn round_rectangle(
        &mut self,
        rect: &Rect,
        radius: f64,
        stroke: &StylePass,
        fill: &StylePass,
    ) -> DrawResult<&mut Self> {
        if !self.draw_condition {
            return Ok(self);
        }
        let converter = self.converter()?;
        let r = converter.rect(rect);
        let radius = converter.scalar(radius);

        let surface = self.surface_mut()?;
        surface.begin_path();
        round_rect_path(surface, &r, radius);
        surface.close_path();
        fill_pass(surface, fill);
        stroke_pass(surface, stroke);

        self.emit("round_rectangle", Body::rect(r.x, r.y, r.width, r.height));
        Ok(self)
    }

    fn lines(
        &mut self,
        start: &Vector2D,
        destinations: &[Vector2D],
        stroke: &StylePass,
        fill: &StylePass,
        line_width: f64,
    ) -> DrawResult<&mut Self> {
        if !self.draw_condition {
            return Ok(self);
        }
        let converter = self.converter()?;
        let start = converter.vector(start);
        let destinations = converter.vectors(destinations);

        let surface = self.surface_mut()?;
        let previous_width = surface.line_width();
        surface.begin_path();
        surface.set_line_width(line_width);
        surface.move_to(start.x(), start.y());
        for point in &destinations {
            surface.line_to(point.x(), point.y());
        }
        stroke_pass(surface, stroke);
        if fill.is_drawn() {
            surface.close_path();
            fill_pass(surface, fill);
        }
        surface.set_line_width(previous_width);

        let mut points = Vec::with_capacity(destinations.len() + 1);
        points.push(start);
        points.extend(destinations);
        self.emit("lines", Body::Polygon(points));
        Ok(self)
    }

    fn gradient_lines(
        &mut self,
        start: &Vector2D,
        destinations: &[Vector2D],
        colors: &[String],
        width: f64,
    ) -> DrawResult<&mut Self> {
        if !self.draw_condition {
            return Ok(self);
        }
        let converter = self.converter()?;
        let start = converter.vector(start);
        let destinations = converter.vectors(destinations);
        let end = destinations.last().unwrap_or(&start);
        let gradient = LinearGradient::even((start.x(), start.y()), (end.x(), end.y()), colors);

        let surface = self.surface_mut()?;
        let previous_style = surface.stroke_style();
        let previous_width = surface.line_width();
        surface.set_stroke_gradient(&gradient)?;
        surface.set_line_width(width);
        surface.begin_path();
        surface.move_to(start.x(), start.y());
        for point in &destinations {
            surface.line_to(point.x(), point.y());
        }
        surface.stroke();
        surface.set_stroke_style(&previous_style);
        surface.set_line_width(previous_width);
        Ok(self)
    }

    fn text(
        &mut self,
        text_box: &TextBox,
        text: &str,
        color: Option<&str>,
        font: Option<&str>,
    ) -> DrawResult<&mut Self> {
        if !self.draw_condition {
            return Ok(self);
        }
        let converter = self.converter()?;
        let position = converter.vector(&text_box.position);
        let width = text_box
            .width
            .map(|w| w * converter.multiplier(text_box.position.position_unit()).0);

        let surface = self.surface_mut()?;
        let previous_fill = surface.fill_style();
        let previous_font = surface.font();
        if let Some(color) = color {
            surface.set_fill_color(color);
        }
        if let Some(font) = font {
            surface.set_font(font);
        }

        let drawn = fill_text_box(surface, text_box, text, position.x(), position.y(), width);

        surface.set_fill_style(&previous_fill);
        if font.is_some() {
            surface.set_font(&previous_font);
        }
        drawn?;
        Ok(self)
    }

    fn image(
        &mut self,
        image: &S::Image,
        src: &Rect,
        dst: Option<&Rect>,
        angle: f64,
        pivot: &Vector2D,
    ) -> DrawResult<&mut Self> {
        if !self.draw_condition {
            return Ok(self);
        }
        let dst = self.converter()?.rect(dst.unwrap_or(src));
        let anchor = dst.point_at(pivot);

        let surface = self.surface_mut()?;
        surface.save();
        let drawn = rotate_around(surface, anchor.x(), anchor.y(), angle)
            .and_then(|()| surface.draw_image(image, src, &dst).map_err(DrawError::from));
        surface.restore();
        drawn?;
        Ok(self)
    }

    fn clip_rect(&mut self, rects: &[Rect]) -> DrawResult<&mut Self> {
        if !self.draw_condition {
            return Ok(self);
        }
        let converter = self.converter()?;
        let surface = self.surface_mut()?;
        surface.save();
        surface.begin_path();
        for rect in rects {
            let r = converter.rect(rect);
            surface.rect(r.x, r.y, r.width, r.height);
        }
        surface.clip();
        Ok(self)
    }

    fn clip_round_rect(&mut self, rects: &[Rect], radius: f64) -> DrawResult<&mut Self> {
        if !self.draw_condition {
            return Ok(self);
        }
        let converter = self.converter()?;
        let radius = converter.scalar(radius);
        let surface = self.surface_mut()?;
        surface.save();
        surface.begin_path();
        for rect in rects {
            round_rect_path(surface, &converter.rect(rect), radius);
        }
        surface.clip();
        Ok(self)
    }

    fn reset_clip(&mut self) -> DrawResult<&mut Self> {
        if !self.draw_condition {
            return Ok(self);
        }
        self.surface_mut()?.restore();
        Ok(self)
    }

    fn grid(
        &mut self,
        cell_size: f64,
        stroke: &str,
        area: Option<&Rect>,
        angle: f64,
    ) -> DrawResult<&mut Self> {
        if !self.draw_condition {
            return Ok(self);
        }
        let converter = self.converter()?;
        let area = area.map_or_else(
            || Rect::new(0.0, 0.0, converter.width(), converter.height()),
            |a| converter.rect(a),
        );
        let lines = grid_lines(&area, cell_size, angle)?;
        let center = area.center();

        let surface = self.surface_mut()?;
        surface.save();
        surface.begin_path();
        surface.rect(area.x, area.y, area.width, area.height);
        surface.clip();
        let drawn = rotate_around(surface, center.x(), center.y(), angle);
        if drawn.is_ok() {
            surface.begin_path();
            for (from, to) in &lines {
                surface.move_to(from.x(), from.y());
                surface.line_to(to.x(), to.y());
            }
            surface.set_stroke_color(stroke);
            surface.stroke();
        }
        surface.restore();
        drawn?;
        Ok(self)
    }
}
