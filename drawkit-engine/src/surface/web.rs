//! Browser surface over `CanvasRenderingContext2D`.

use drawkit_core::Rect;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, CanvasWindingRule, HtmlCanvasElement};

use super::{FillRule, LinearGradient, Surface, TextMetrics};
use crate::{dom, SurfaceError, SurfaceResult};

fn js_error(err: JsValue) -> SurfaceError {
    SurfaceError::new(
        err.as_string()
            .unwrap_or_else(|| format!("{err:?}")),
    )
}

/// A [`Surface`] backed by an HTML canvas element.
#[derive(Debug, Clone)]
pub struct WebCanvasSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl WebCanvasSurface {
    /// Bind to the 2D context of a canvas element.
    ///
    /// # Errors
    ///
    /// Returns an error if the canvas has no 2D context.
    pub fn from_canvas(canvas: HtmlCanvasElement) -> SurfaceResult<Self> {
        let ctx = canvas
            .get_context("2d")
            .map_err(js_error)?
            .ok_or_else(|| SurfaceError::new("Canvas has no 2d context"))?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| SurfaceError::new("Context is not a CanvasRenderingContext2D"))?;
        Ok(Self { canvas, ctx })
    }

    /// Wrap an existing context.
    ///
    /// # Errors
    ///
    /// Returns an error if the context is detached from its canvas.
    pub fn from_context(ctx: CanvasRenderingContext2d) -> SurfaceResult<Self> {
        let canvas = ctx
            .canvas()
            .ok_or_else(|| SurfaceError::new("Context has no canvas"))?;
        Ok(Self { canvas, ctx })
    }

    /// The wrapped context.
    #[must_use]
    pub fn context(&self) -> &CanvasRenderingContext2d {
        &self.ctx
    }

    /// The canvas element.
    #[must_use]
    pub fn canvas(&self) -> &HtmlCanvasElement {
        &self.canvas
    }
}

#[allow(deprecated)]
impl Surface for WebCanvasSurface {
    type Style = JsValue;
    type Image = HtmlCanvasElement;

    fn width(&self) -> f64 {
        f64::from(self.canvas.width())
    }

    fn height(&self) -> f64 {
        f64::from(self.canvas.height())
    }

    fn save(&mut self) {
        self.ctx.save();
    }

    fn restore(&mut self) {
        self.ctx.restore();
    }

    fn begin_path(&mut self) {
        self.ctx.begin_path();
    }

    fn close_path(&mut self) {
        self.ctx.close_path();
    }

    fn move_to(&mut self, x: f64, y: f64) {
        self.ctx.move_to(x, y);
    }

    fn line_to(&mut self, x: f64, y: f64) {
        self.ctx.line_to(x, y);
    }

    fn rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.ctx.rect(x, y, width, height);
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
        self.ctx
            .arc_with_anticlockwise(x, y, radius, start, end, anticlockwise)
            .map_err(js_error)
    }

    fn quadratic_curve_to(&mut self, cpx: f64, cpy: f64, x: f64, y: f64) {
        self.ctx.quadratic_curve_to(cpx, cpy, x, y);
    }

    fn fill(&mut self, rule: FillRule) {
        let rule = match rule {
            FillRule::NonZero => CanvasWindingRule::Nonzero,
            FillRule::EvenOdd => CanvasWindingRule::Evenodd,
        };
        self.ctx.fill_with_canvas_winding_rule(rule);
    }

    fn stroke(&mut self) {
        self.ctx.stroke();
    }

    fn clip(&mut self) {
        self.ctx.clip();
    }

    fn translate(&mut self, x: f64, y: f64) -> SurfaceResult<()> {
        self.ctx.translate(x, y).map_err(js_error)
    }

    fn rotate(&mut self, angle: f64) -> SurfaceResult<()> {
        self.ctx.rotate(angle).map_err(js_error)
    }

    fn clear_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.ctx.clear_rect(x, y, width, height);
    }

    fn fill_style(&self) -> JsValue {
        self.ctx.fill_style()
    }

    fn set_fill_style(&mut self, style: &JsValue) {
        self.ctx.set_fill_style(style);
    }

    fn set_fill_color(&mut self, color: &str) {
        self.ctx.set_fill_style(&JsValue::from_str(color));
    }

    fn stroke_style(&self) -> JsValue {
        self.ctx.stroke_style()
    }

    fn set_stroke_style(&mut self, style: &JsValue) {
        self.ctx.set_stroke_style(style);
    }

    fn set_stroke_color(&mut self, color: &str) {
        self.ctx.set_stroke_style(&JsValue::from_str(color));
    }

    #[allow(clippy::cast_possible_truncation)]
    fn set_stroke_gradient(&mut self, gradient: &LinearGradient) -> SurfaceResult<()> {
        let (x0, y0) = gradient.start;
        let (x1, y1) = gradient.end;
        let canvas_gradient = self.ctx.create_linear_gradient(x0, y0, x1, y1);
        for stop in &gradient.stops {
            canvas_gradient
                .add_color_stop(stop.offset as f32, &stop.color)
                .map_err(js_error)?;
        }
        self.ctx.set_stroke_style(&JsValue::from(canvas_gradient));
        Ok(())
    }

    fn line_width(&self) -> f64 {
        self.ctx.line_width()
    }

    fn set_line_width(&mut self, width: f64) {
        self.ctx.set_line_width(width);
    }

    fn font(&self) -> String {
        self.ctx.font()
    }

    fn set_font(&mut self, font: &str) {
        self.ctx.set_font(font);
    }

    fn set_filter(&mut self, filter: &str) {
        self.ctx.set_filter(filter);
    }

    fn set_global_composite_operation(&mut self, operation: &str) -> SurfaceResult<()> {
        self.ctx
            .set_global_composite_operation(operation)
            .map_err(js_error)
    }

    fn measure_text(&self, text: &str) -> SurfaceResult<TextMetrics> {
        let metrics = self.ctx.measure_text(text).map_err(js_error)?;
        Ok(TextMetrics {
            width: metrics.width(),
            ascent: metrics.actual_bounding_box_ascent(),
        })
    }

    fn fill_text(&mut self, text: &str, x: f64, y: f64) -> SurfaceResult<()> {
        self.ctx.fill_text(text, x, y).map_err(js_error)
    }

    fn draw_image(&mut self, image: &HtmlCanvasElement, src: &Rect, dst: &Rect) -> SurfaceResult<()> {
        self.ctx
            .draw_image_with_html_canvas_element_and_sw_and_sh_and_dx_and_dy_and_dw_and_dh(
                image, src.x, src.y, src.width, src.height, dst.x, dst.y, dst.width, dst.height,
            )
            .map_err(js_error)
    }

    fn create_offscreen(&self, width: f64, height: f64) -> SurfaceResult<Self> {
        let width = format!("{width}");
        let height = format!("{height}");
        let canvas = dom::create_element("canvas", &[("width", &width), ("height", &height)])
            .map_err(js_error)?
            .dyn_into::<HtmlCanvasElement>()
            .map_err(|_| SurfaceError::new("Created element is not a canvas"))?;
        Self::from_canvas(canvas)
    }

    fn into_image(self) -> HtmlCanvasElement {
        self.canvas
    }
}
