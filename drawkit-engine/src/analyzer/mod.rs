//! Method-call analyzer.
//!
//! [`TracingDrawEngine`] owns a [`Canvas2dEngine`] and wraps every
//! [`DrawEngine`] operation: a frame is pushed on entry, the operation is
//! delegated, and the frame is popped on exit. Composite operations run
//! against the tracing engine itself, so their nested calls are traced one
//! level deeper.
//!
//! ```text
//! caller ──► TracingDrawEngine ──► Canvas2dEngine ──► Surface
//!                 │
//!                 ├─ CallStack (frames, depth)
//!                 ├─ Debouncer (cycle end)
//!                 └─ listener(&AnalyzeEvent)
//! ```
//!
//! Fatal errors (stack out of sync, not started, endless loop) propagate to
//! the caller. Any other error of a delegated operation is attached to its
//! frame, reported as [`AnalyzeReason::MethodError`], and drawing continues.

mod config;
mod event;
mod overlay;
mod stack;
mod timer;

pub use config::{AnalyzerConfig, DebugOptions};
pub use event::{AnalyticListener, AnalyzeEvent, AnalyzeReason, CallInfo};
pub use overlay::{OVERLAY_COLOR, OVERLAY_LINE_WIDTH};
pub use stack::{CallStack, Frame, FrameError, START_MARKER};
#[cfg(feature = "wasm")]
pub use timer::PerformanceClock;
pub use timer::{default_clock, Clock, Debouncer, ManualClock, MonotonicClock, TimerHandle};

use std::fmt;

use drawkit_core::{
    AngleSets, Body, FaceStyles, GeometryStore, PositionUnit, Rect, StylePass, UnitConverter,
    Vector2D, Vector3D,
};
use serde::Serialize;
use serde_json::Value;

use crate::engine::{shapes, Canvas2dEngine, DrawEngine, MethodDetails, TextBox};
use crate::meta;
use crate::surface::{FillRule, Surface};
use crate::{DrawError, DrawResult};

/// Capture an argument for the listener.
fn arg<T: Serialize + ?Sized>(value: &T) -> Value {
    serde_json::to_value(value).unwrap_or(Value::Null)
}

/// A [`DrawEngine`] that traces every operation.
pub struct TracingDrawEngine<S: Surface> {
    engine: Canvas2dEngine<S>,
    config: AnalyzerConfig,
    depth_reset: Option<i32>,
    show_bodies: bool,
    stack: CallStack,
    root_position: u32,
    started_at: Option<f64>,
    clock: Box<dyn Clock>,
    listener: Option<AnalyticListener>,
    end_timer: Debouncer<f64>,
    debug_pointer: bool,
    pointer: Vector2D,
    bodies: Vec<Body>,
    drawing_overlay: bool,
    label: Option<S::Image>,
}

impl<S: Surface> TracingDrawEngine<S> {
    /// Create an analyzer without a surface.
    #[must_use]
    pub fn new() -> Self {
        let mut engine = Canvas2dEngine::new();
        engine.set_record_details(true);
        Self {
            engine,
            config: AnalyzerConfig::default(),
            depth_reset: None,
            show_bodies: false,
            stack: CallStack::new(),
            root_position: 0,
            started_at: None,
            clock: default_clock(),
            listener: None,
            end_timer: Debouncer::new(),
            debug_pointer: false,
            pointer: Vector2D::zero(),
            bodies: Vec::new(),
            drawing_overlay: false,
            label: None,
        }
    }

    /// Create an analyzer bound to `surface`.
    #[must_use]
    pub fn with_surface(surface: S) -> Self {
        let mut analyzer = Self::new();
        let mut engine = Canvas2dEngine::with_surface(surface);
        engine.set_record_details(true);
        analyzer.engine = engine;
        analyzer
    }

    /// Use `clock` for timestamps and the cycle-end timer.
    #[must_use]
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// Replace the configuration.
    #[must_use]
    pub fn with_config(mut self, config: AnalyzerConfig) -> Self {
        self.config = config;
        self
    }

    /// Current configuration.
    #[must_use]
    pub const fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// Mutable configuration.
    pub fn config_mut(&mut self) -> &mut AnalyzerConfig {
        &mut self.config
    }

    /// Active frames.
    #[must_use]
    pub const fn call_stack(&self) -> &CallStack {
        &self.stack
    }

    /// Root calls traced since the last `start`.
    #[must_use]
    pub const fn root_position(&self) -> u32 {
        self.root_position
    }

    /// Whether `start` was called.
    #[must_use]
    pub const fn is_started(&self) -> bool {
        self.started_at.is_some()
    }

    /// Whether a cycle end is waiting to be reported.
    #[must_use]
    pub fn has_pending_end(&self) -> bool {
        self.end_timer.is_pending()
    }

    /// Whether events are currently scoped to the debug pointer.
    #[must_use]
    pub const fn is_debug_pointer_active(&self) -> bool {
        self.debug_pointer
    }

    /// The wrapped engine.
    #[must_use]
    pub const fn engine(&self) -> &Canvas2dEngine<S> {
        &self.engine
    }

    /// Unwrap the engine.
    #[must_use]
    pub fn into_engine(self) -> Canvas2dEngine<S> {
        self.engine
    }

    /// Set the listener called for every forwarded event.
    pub fn set_analytic_listener(
        &mut self,
        listener: impl FnMut(&AnalyzeEvent) + 'static,
    ) -> &mut Self {
        self.listener = Some(Box::new(listener));
        self
    }

    /// Toggle the debug pointer.
    pub fn set_debug_pointer(&mut self, active: bool) -> &mut Self {
        self.debug_pointer = active;
        self
    }

    /// Pointer position in surface pixels, used to place overlay labels.
    pub fn set_pointer_position(&mut self, position: Vector2D) -> &mut Self {
        self.pointer = position;
        self
    }

    /// Enter debug mode: start if needed, override the depth window, show
    /// body outlines and activate the debug pointer.
    ///
    /// # Errors
    ///
    /// Propagates fatal errors from starting the analyzer.
    pub fn start_debug(&mut self, options: &DebugOptions) -> DrawResult<&mut Self> {
        if self.started_at.is_none() {
            self.start("")?;
        }
        if let Some(depth) = options.depth {
            if self.depth_reset.is_none() {
                self.depth_reset = Some(self.config.analyzing_depth_max);
            }
            self.config.analyzing_depth_max = depth;
        }
        self.show_bodies = options.show_bodies;
        self.debug_pointer = true;
        tracing::debug!("Debug mode on: {options:?}");
        Ok(self)
    }

    /// Leave debug mode, restoring an overridden depth.
    pub fn stop_debug(&mut self) -> &mut Self {
        self.debug_pointer = false;
        if let Some(depth) = self.depth_reset.take() {
            self.config.analyzing_depth_max = depth;
        }
        self.show_bodies = false;
        self.bodies.clear();
        tracing::debug!("Debug mode off");
        self
    }

    /// Report the end of the drawing cycle if the quiet period has passed.
    ///
    /// Call this from the host's event loop. Returns whether an end was reported.
    pub fn tick(&mut self) -> bool {
        let now = self.clock.now();
        match self.end_timer.poll(now) {
            Some(end_time) => {
                self.cycle_end(end_time);
                true
            }
            None => false,
        }
    }

    /// Record a call event.
    ///
    /// # Errors
    ///
    /// Returns [`DrawError::StackOutOfSync`] when an end does not match the
    /// innermost frame, [`DrawError::NotStarted`] for root activity before
    /// `start`, and [`DrawError::EndlessLoop`] past the root call threshold.
    pub fn analyze(&mut self, reason: AnalyzeReason, call: CallInfo) -> DrawResult<()> {
        if self.drawing_overlay {
            return Ok(());
        }
        let (depth, check) = match reason {
            AnalyzeReason::MethodStart => {
                self.end_timer.cancel();
                let depth = self.stack.depth();
                let is_marker = call.method_name == START_MARKER;
                if depth == 0 && !is_marker {
                    self.root_position = self.root_position.saturating_add(1);
                }
                let start_time = call.start_time.unwrap_or_else(|| self.clock.now());
                self.stack.push(Frame::new(
                    call.method_name.clone(),
                    call.arguments.clone(),
                    start_time,
                ));
                (depth, !is_marker && self.forwards(depth))
            }
            AnalyzeReason::MethodEnd => {
                let frame = self.stack.pop_matching(&call.method_name)?;
                let depth = self.stack.depth();
                let forward = frame.method_name != START_MARKER && self.forwards(depth);
                if self.stack.is_empty() {
                    self.draw_overlay();
                    if self.config.check_loop_end {
                        let now = self.clock.now();
                        self.end_timer
                            .schedule(now, self.config.end_debounce_ms, now);
                    }
                }
                if frame.method_name == START_MARKER {
                    self.self_check()?;
                }
                (depth, forward)
            }
            AnalyzeReason::MethodError => {
                let depth = self.stack.depth().saturating_sub(1);
                match (self.stack.top_mut(), &call.error) {
                    (Some(top), Some(error)) => top.errors.push(error.clone()),
                    (None, _) => tracing::warn!("Error reported outside a traced call"),
                    (Some(_), None) => {}
                }
                (depth, true)
            }
            AnalyzeReason::ReceivedDetails => {
                if let Some(details) = call.details.clone() {
                    self.handle_method_details(details);
                }
                return Ok(());
            }
        };

        if check {
            if let Err(err) = self.self_check() {
                if reason == AnalyzeReason::MethodStart {
                    self.reject_start(&call.method_name, depth);
                }
                return Err(err);
            }
            tracing::trace!(
                "{reason:?} {} depth={depth} root={}",
                call.method_name,
                self.root_position
            );
            self.notify(reason, call, Some(depth));
        }
        Ok(())
    }

    /// Attach an error to the innermost frame and report it.
    ///
    /// # Errors
    ///
    /// Propagates fatal self-check errors.
    pub fn report_error(&mut self, message: &str, number: Option<u32>) -> DrawResult<()> {
        let method_name = self
            .stack
            .top()
            .map(|frame| frame.method_name.clone())
            .unwrap_or_default();
        let call = CallInfo {
            error: Some(FrameError {
                message: message.to_string(),
                number,
            }),
            ..CallInfo::new(method_name)
        };
        self.analyze(AnalyzeReason::MethodError, call)
    }

    /// Undo a start that failed its self check, so the rejected call leaves
    /// no frame behind and is not counted as a root call.
    fn reject_start(&mut self, method_name: &str, depth: usize) {
        if self.discard_frame(method_name) && depth == 0 {
            self.root_position = self.root_position.saturating_sub(1);
        }
    }

    /// Pop the innermost frame if it belongs to `method_name`.
    fn discard_frame(&mut self, method_name: &str) -> bool {
        let discarded = self.stack.pop_matching(method_name).is_ok();
        if discarded {
            tracing::debug!("Discarded frame of {method_name} after a fatal error");
        }
        discarded
    }

    fn forwards(&self, depth: usize) -> bool {
        self.config.depth_in_window(depth)
            && (!self.config.use_only_debug_pointer || self.debug_pointer)
    }

    fn self_check(&self) -> DrawResult<()> {
        if self.config.check_for_start_trigger
            && self.root_position > 0
            && self.started_at.is_none()
        {
            return Err(DrawError::NotStarted);
        }
        if self.config.check_for_endless_loop
            && self.root_position > self.config.endless_loop_threshold
        {
            return Err(DrawError::EndlessLoop);
        }
        Ok(())
    }

    fn notify(&mut self, reason: AnalyzeReason, call: CallInfo, depth: Option<usize>) {
        let event = AnalyzeEvent {
            reason,
            call,
            depth,
            root_position: self.root_position,
        };
        if let Some(listener) = self.listener.as_mut() {
            listener(&event);
        }
    }

    fn cycle_end(&mut self, end_time: f64) {
        let duration = end_time - self.started_at.unwrap_or(end_time);
        tracing::debug!("Drawing cycle ended after {duration:.1} ms");
        self.notify(
            AnalyzeReason::MethodEnd,
            CallInfo::new(START_MARKER).ended_at(end_time, duration),
            None,
        );
    }

    fn handle_method_details(&mut self, details: MethodDetails) {
        if self.drawing_overlay {
            return;
        }
        if self.show_bodies {
            if let Some(body) = &details.body {
                self.bodies.push(body.clone());
            }
        }
        let method_name = details.method_name.clone();
        let call = CallInfo {
            details: Some(details),
            ..CallInfo::new(method_name)
        };
        self.notify(AnalyzeReason::ReceivedDetails, call, None);
    }

    fn forward_details(&mut self) {
        for details in self.engine.take_details() {
            self.handle_method_details(details);
        }
    }

    fn draw_overlay(&mut self) {
        if self.bodies.is_empty() {
            return;
        }
        let bodies = std::mem::take(&mut self.bodies);
        self.drawing_overlay = true;
        if self.label.is_none() {
            match self.engine.context().map(overlay::build_label).transpose() {
                Ok(label) => self.label = label,
                Err(err) => tracing::warn!("Overlay label unavailable: {err}"),
            }
        }
        let drawn = overlay::draw_bodies(
            &mut self.engine,
            &bodies,
            &self.pointer,
            self.label.as_ref(),
            &self.config,
        );
        if let Err(err) = drawn {
            tracing::warn!("Overlay not drawn: {err}");
        }
        self.engine.take_details();
        self.drawing_overlay = false;
        tracing::debug!("Drew {} overlay bodies", bodies.len());
    }

    fn traced<F>(&mut self, method: &'static str, arguments: Vec<Value>, op: F) -> DrawResult<&mut Self>
    where
        F: FnOnce(&mut Self) -> DrawResult<()>,
    {
        let start_time = self.clock.now();
        let arguments = meta::label_arguments(method, arguments);
        self.analyze(
            AnalyzeReason::MethodStart,
            CallInfo::new(method)
                .with_arguments(arguments.clone())
                .started_at(start_time),
        )?;

        let result = op(self);
        self.forward_details();
        if let Err(err) = result {
            if err.is_fatal() {
                self.discard_frame(method);
                return Err(err);
            }
            tracing::warn!("{method} failed: {err}");
            self.report_error(&err.to_string(), Some(err.code()))?;
        }

        let end_time = self.clock.now();
        self.analyze(
            AnalyzeReason::MethodEnd,
            CallInfo::new(method)
                .with_arguments(arguments)
                .ended_at(end_time, end_time - start_time),
        )?;
        Ok(self)
    }
}

impl<S: Surface> Default for TracingDrawEngine<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Surface> fmt::Debug for TracingDrawEngine<S>
where
    S: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TracingDrawEngine")
            .field("engine", &self.engine)
            .field("config", &self.config)
            .field("stack", &self.stack)
            .field("root_position", &self.root_position)
            .field("started_at", &self.started_at)
            .field("end_timer", &self.end_timer)
            .field("debug_pointer", &self.debug_pointer)
            .field("bodies", &self.bodies.len())
            .finish_non_exhaustive()
    }
}

impl<S: Surface> DrawEngine for TracingDrawEngine<S> {
    type Surface = S;

    fn set_context(&mut self, surface: S) -> DrawResult<&mut Self> {
        self.engine.set_context(surface)?;
        self.label = None;
        self.traced("set_context", vec![Value::Null], |_| Ok(()))
    }

    fn context(&self) -> Option<&S> {
        self.engine.context()
    }

    fn context_mut(&mut self) -> Option<&mut S> {
        self.engine.context_mut()
    }

    fn draw_condition(&self) -> bool {
        self.engine.draw_condition()
    }

    fn unit(&self) -> PositionUnit {
        self.engine.unit()
    }

    fn converter(&self) -> DrawResult<UnitConverter> {
        self.engine.converter()
    }

    fn set_draw_condition(&mut self, condition: bool) -> DrawResult<&mut Self> {
        self.traced("set_draw_condition", vec![arg(&condition)], |this| {
            this.engine.set_draw_condition(condition).map(|_| ())
        })
    }

    fn remove_draw_condition(&mut self) -> DrawResult<&mut Self> {
        self.traced("remove_draw_condition", vec![], |this| {
            this.engine.remove_draw_condition().map(|_| ())
        })
    }

    fn set_unit(&mut self, unit: PositionUnit) -> DrawResult<&mut Self> {
        self.traced("set_unit", vec![arg(&unit)], |this| {
            this.engine.set_unit(unit).map(|_| ())
        })
    }

    fn start(&mut self, name: &str) -> DrawResult<&mut Self> {
        self.traced(START_MARKER, vec![arg(name)], |this| {
            this.engine.start(name)?;
            this.started_at = Some(this.clock.now());
            this.root_position = 0;
            Ok(())
        })
    }

    fn begin_path(&mut self) -> DrawResult<&mut Self> {
        self.traced("begin_path", vec![], |this| this.engine.begin_path().map(|_| ()))
    }

    fn close_path(&mut self) -> DrawResult<&mut Self> {
        self.traced("close_path", vec![], |this| this.engine.close_path().map(|_| ()))
    }

    fn move_to(&mut self, position: &Vector2D) -> DrawResult<&mut Self> {
        self.traced("move_to", vec![arg(position)], |this| {
            this.engine.move_to(position).map(|_| ())
        })
    }

    fn quadratic_curve_to(
        &mut self,
        control_point: &Vector2D,
        position: &Vector2D,
    ) -> DrawResult<&mut Self> {
        self.traced(
            "quadratic_curve_to",
            vec![arg(control_point), arg(position)],
            |this| this.engine.quadratic_curve_to(control_point, position).map(|_| ()),
        )
    }

    fn fill(&mut self, rule: FillRule) -> DrawResult<&mut Self> {
        self.traced("fill", vec![arg(&rule)], |this| this.engine.fill(rule).map(|_| ()))
    }

    fn stroke(&mut self) -> DrawResult<&mut Self> {
        self.traced("stroke", vec![], |this| this.engine.stroke().map(|_| ()))
    }

    fn save(&mut self) -> DrawResult<&mut Self> {
        self.traced("save", vec![], |this| this.engine.save().map(|_| ()))
    }

    fn restore(&mut self) -> DrawResult<&mut Self> {
        self.traced("restore", vec![], |this| this.engine.restore().map(|_| ()))
    }

    fn cls(&mut self) -> DrawResult<&mut Self> {
        self.traced("cls", vec![], |this| this.engine.cls().map(|_| ()))
    }

    fn select_rect(&mut self, rect: &Rect) -> DrawResult<&mut Self> {
        self.traced("select_rect", vec![arg(rect)], |this| {
            this.engine.select_rect(rect).map(|_| ())
        })
    }

    fn select_round_rect(&mut self, rect: &Rect, radius: f64) -> DrawResult<&mut Self> {
        self.traced("select_round_rect", vec![arg(rect), arg(&radius)], |this| {
            this.engine.select_round_rect(rect, radius).map(|_| ())
        })
    }

    fn set_fill_style(&mut self, color: &str) -> DrawResult<&mut Self> {
        self.traced("set_fill_style", vec![arg(color)], |this| {
            this.engine.set_fill_style(color).map(|_| ())
        })
    }

    fn set_stroke_style(&mut self, color: &str) -> DrawResult<&mut Self> {
        self.traced("set_stroke_style", vec![arg(color)], |this| {
            this.engine.set_stroke_style(color).map(|_| ())
        })
    }

    fn set_filter(&mut self, filter: &str) -> DrawResult<&mut Self> {
        self.traced("set_filter", vec![arg(filter)], |this| {
            this.engine.set_filter(filter).map(|_| ())
        })
    }

    fn set_font(&mut self, font: &str) -> DrawResult<&mut Self> {
        self.traced("set_font", vec![arg(font)], |this| {
            this.engine.set_font(font).map(|_| ())
        })
    }

    fn set_global_composite_operation(&mut self, operation: &str) -> DrawResult<&mut Self> {
        self.traced("set_global_composite_operation", vec![arg(operation)], |this| {
            this.engine.set_global_composite_operation(operation).map(|_| ())
        })
    }

    fn circle(
        &mut self,
        position: &Vector2D,
        radius: f64,
        stroke: &StylePass,
        fill: &StylePass,
    ) -> DrawResult<&mut Self> {
        self.traced(
            "circle",
            vec![arg(position), arg(&radius), arg(stroke), arg(fill)],
            |this| this.engine.circle(position, radius, stroke, fill).map(|_| ()),
        )
    }

    fn donut(
        &mut self,
        position: &Vector2D,
        outer_radius: f64,
        inner_radius: f64,
        stroke: &StylePass,
        fill: &StylePass,
    ) -> DrawResult<&mut Self> {
        self.traced(
            "donut",
            vec![
                arg(position),
                arg(&outer_radius),
                arg(&inner_radius),
                arg(stroke),
                arg(fill),
            ],
            |this| {
                this.engine
                    .donut(position, outer_radius, inner_radius, stroke, fill)
                    .map(|_| ())
            },
        )
    }

    fn rectangle(
        &mut self,
        rect: &Rect,
        stroke: &StylePass,
        fill: &StylePass,
        angle: f64,
        pivot: &Vector2D,
    ) -> DrawResult<&mut Self> {
        self.traced(
            "rectangle",
            vec![arg(rect), arg(stroke), arg(fill), arg(&angle), arg(pivot)],
            |this| {
                this.engine
                    .rectangle(rect, stroke, fill, angle, pivot)
                    .map(|_| ())
            },
        )
    }

    fn round_rectangle(
        &mut self,
        rect: &Rect,
        radius: f64,
        stroke: &StylePass,
        fill: &StylePass,
    ) -> DrawResult<&mut Self> {
        self.traced(
            "round_rectangle",
            vec![arg(rect), arg(&radius), arg(stroke), arg(fill)],
            |this| {
                this.engine
                    .round_rectangle(rect, radius, stroke, fill)
                    .map(|_| ())
            },
        )
    }

    fn lines(
        &mut self,
        start: &Vector2D,
        destinations: &[Vector2D],
        stroke: &StylePass,
        fill: &StylePass,
        line_width: f64,
    ) -> DrawResult<&mut Self> {
        self.traced(
            "lines",
            vec![
                arg(start),
                arg(destinations),
                arg(stroke),
                arg(fill),
                arg(&line_width),
            ],
            |this| {
                this.engine
                    .lines(start, destinations, stroke, fill, line_width)
                    .map(|_| ())
            },
        )
    }

    fn gradient_lines(
        &mut self,
        start: &Vector2D,
        destinations: &[Vector2D],
        colors: &[String],
        width: f64,
    ) -> DrawResult<&mut Self> {
        self.traced(
            "gradient_lines",
            vec![arg(start), arg(destinations), arg(colors), arg(&width)],
            |this| {
                this.engine
                    .gradient_lines(start, destinations, colors, width)
                    .map(|_| ())
            },
        )
    }

    fn text(
        &mut self,
        text_box: &TextBox,
        text: &str,
        color: Option<&str>,
        font: Option<&str>,
    ) -> DrawResult<&mut Self> {
        self.traced(
            "text",
            vec![arg(text_box), arg(text), arg(&color), arg(&font)],
            |this| this.engine.text(text_box, text, color, font).map(|_| ()),
        )
    }

    fn image(
        &mut self,
        image: &S::Image,
        src: &Rect,
        dst: Option<&Rect>,
        angle: f64,
        pivot: &Vector2D,
    ) -> DrawResult<&mut Self> {
        self.traced(
            "image",
            vec![Value::Null, arg(src), arg(&dst), arg(&angle), arg(pivot)],
            |this| this.engine.image(image, src, dst, angle, pivot).map(|_| ()),
        )
    }

    fn clip_rect(&mut self, rects: &[Rect]) -> DrawResult<&mut Self> {
        self.traced("clip_rect", vec![arg(rects)], |this| {
            this.engine.clip_rect(rects).map(|_| ())
        })
    }

    fn clip_round_rect(&mut self, rects: &[Rect], radius: f64) -> DrawResult<&mut Self> {
        self.traced("clip_round_rect", vec![arg(rects), arg(&radius)], |this| {
            this.engine.clip_round_rect(rects, radius).map(|_| ())
        })
    }

    fn reset_clip(&mut self) -> DrawResult<&mut Self> {
        self.traced("reset_clip", vec![], |this| this.engine.reset_clip().map(|_| ()))
    }

    fn grid(
        &mut self,
        cell_size: f64,
        stroke: &str,
        area: Option<&Rect>,
        angle: f64,
    ) -> DrawResult<&mut Self> {
        self.traced(
            "grid",
            vec![arg(&cell_size), arg(stroke), arg(&area), arg(&angle)],
            |this| this.engine.grid(cell_size, stroke, area, angle).map(|_| ()),
        )
    }

    fn hexagon(
        &mut self,
        position: &Vector2D,
        radius: f64,
        stroke: &StylePass,
        fill: &StylePass,
        angle: f64,
    ) -> DrawResult<&mut Self> {
        self.traced(
            "hexagon",
            vec![arg(position), arg(&radius), arg(stroke), arg(fill), arg(&angle)],
            |this| shapes::hexagon(this, position, radius, stroke, fill, angle),
        )
    }

    fn ngon(
        &mut self,
        position: &Vector2D,
        radius: f64,
        sides: u32,
        stroke: &StylePass,
        fill: &StylePass,
        angle: f64,
    ) -> DrawResult<&mut Self> {
        self.traced(
            "ngon",
            vec![
                arg(position),
                arg(&radius),
                arg(&sides),
                arg(stroke),
                arg(fill),
                arg(&angle),
            ],
            |this| shapes::ngon(this, position, radius, sides, stroke, fill, angle),
        )
    }

    fn cube(
        &mut self,
        plane: &Rect,
        depth: Option<f64>,
        tilt: f64,
        stroke: &StylePass,
        fills: &FaceStyles,
    ) -> DrawResult<&mut Self> {
        self.traced(
            "cube",
            vec![arg(plane), arg(&depth), arg(&tilt), arg(stroke), arg(fills)],
            |this| shapes::cube(this, plane, depth, tilt, stroke, fills),
        )
    }

    fn cube3d(
        &mut self,
        plane: &Rect,
        depth: Option<f64>,
        angles: &AngleSets,
        stroke: &StylePass,
        fills: &FaceStyles,
        pivot: &Vector3D,
    ) -> DrawResult<&mut Self> {
        self.traced(
            "cube3d",
            vec![
                arg(plane),
                arg(&depth),
                arg(angles),
                arg(stroke),
                arg(fills),
                arg(pivot),
            ],
            |this| shapes::cube3d(this, plane, depth, angles, stroke, fills, pivot),
        )
    }

    fn set_conditional_filter(&mut self, condition: bool, filter: &str) -> DrawResult<&mut Self> {
        self.traced(
            "set_conditional_filter",
            vec![arg(&condition), arg(filter)],
            |this| shapes::conditional_filter(this, condition, filter),
        )
    }

    fn geometry(&mut self, store: &GeometryStore) -> DrawResult<&mut Self> {
        self.traced("geometry", vec![arg(store)], |this| shapes::geometry(this, store))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::RecordingSurface;
    use std::cell::RefCell;
    use std::rc::Rc;

    type Log = Rc<RefCell<Vec<AnalyzeEvent>>>;

    fn analyzer(config: AnalyzerConfig) -> (TracingDrawEngine<RecordingSurface>, ManualClock, Log) {
        let clock = ManualClock::new();
        let log: Log = Rc::default();
        let mut analyzer = TracingDrawEngine::with_surface(RecordingSurface::new(300.0, 300.0))
            .with_clock(clock.clone())
            .with_config(config);
        let sink = Rc::clone(&log);
        analyzer.set_analytic_listener(move |event| sink.borrow_mut().push(event.clone()));
        (analyzer, clock, log)
    }

    #[test]
    fn test_root_call_is_forwarded() {
        let (mut analyzer, _, log) = analyzer(AnalyzerConfig::unfiltered());
        analyzer.start("frame").expect("starts");
        analyzer.begin_path().expect("traced");

        let events = log.borrow();
        let reasons: Vec<(AnalyzeReason, &str)> = events
            .iter()
            .map(|e| (e.reason, e.call.method_name.as_str()))
            .collect();
        assert_eq!(
            reasons,
            vec![
                (AnalyzeReason::MethodStart, "begin_path"),
                (AnalyzeReason::MethodEnd, "begin_path"),
            ]
        );
        assert_eq!(events[0].depth, Some(0));
        assert_eq!(events[0].root_position, 1);
    }

    #[test]
    fn test_not_started() {
        let (mut analyzer, _, _) = analyzer(AnalyzerConfig::unfiltered());
        let err = analyzer.begin_path().err();
        assert_eq!(err, Some(DrawError::NotStarted));
    }

    #[test]
    fn test_debug_pointer_scopes_events() {
        let (mut analyzer, _, log) = analyzer(AnalyzerConfig::default());
        analyzer.start("").expect("starts");
        analyzer.save().expect("traced");
        assert!(log.borrow().is_empty());

        analyzer.set_debug_pointer(true);
        analyzer.restore().expect("traced");
        assert_eq!(log.borrow().len(), 2);
    }

    #[test]
    fn test_manual_mismatch_is_fatal() {
        let (mut analyzer, _, _) = analyzer(AnalyzerConfig::unfiltered());
        analyzer.start("").expect("starts");
        analyzer
            .analyze(AnalyzeReason::MethodStart, CallInfo::new("circle"))
            .expect("push");
        let err = analyzer
            .analyze(AnalyzeReason::MethodEnd, CallInfo::new("lines"))
            .err();
        assert!(matches!(err, Some(DrawError::StackOutOfSync { .. })));
    }

    #[test]
    fn test_per_call_error_is_reported() {
        let clock = ManualClock::new();
        let log: Log = Rc::default();
        let sink = Rc::clone(&log);
        let mut analyzer = TracingDrawEngine::<RecordingSurface>::new()
            .with_clock(clock)
            .with_config(AnalyzerConfig::unfiltered());
        analyzer.set_analytic_listener(move |event| sink.borrow_mut().push(event.clone()));
        analyzer.start("").expect("starts");

        analyzer.begin_path().expect("error is captured");
        let events = log.borrow();
        let error = events
            .iter()
            .find(|e| e.reason == AnalyzeReason::MethodError)
            .and_then(|e| e.call.error.clone())
            .expect("error forwarded");
        assert_eq!(error.number, Some(1));
        assert_eq!(error.message, DrawError::NoContextBound.to_string());
        assert!(analyzer.call_stack().is_empty());
    }

    #[test]
    fn test_details_are_forwarded() {
        let (mut analyzer, _, log) = analyzer(AnalyzerConfig::unfiltered());
        analyzer.start("").expect("starts");
        analyzer
            .circle(&Vector2D::new(10.0, 10.0), 5.0, &StylePass::Skip, &"red".into())
            .expect("draws");
        let events = log.borrow();
        let details: Vec<&AnalyzeEvent> = events
            .iter()
            .filter(|e| e.reason == AnalyzeReason::ReceivedDetails)
            .collect();
        assert_eq!(details.len(), 1);
        assert_eq!(details[0].call.method_name, "circle");
    }

    #[test]
    fn test_debug_mode_draws_overlay_and_restores_depth() {
        let (mut analyzer, _, _) = analyzer(AnalyzerConfig::default());
        analyzer
            .start_debug(&DebugOptions {
                depth: Some(3),
                show_bodies: true,
            })
            .expect("debug on");
        assert!(analyzer.is_started());
        assert_eq!(analyzer.config().analyzing_depth_max, 3);

        analyzer.set_pointer_position(Vector2D::new(10.0, 10.0));
        analyzer
            .rectangle(
                &Rect::new(10.0, 10.0, 20.0, 20.0),
                &"black".into(),
                &StylePass::Skip,
                0.0,
                &Vector2D::new(0.5, 0.5),
            )
            .expect("draws");

        let surface = analyzer.context().expect("bound");
        let overlay_strokes = surface.count(|c| {
            matches!(
                c,
                crate::surface::SurfaceCall::Stroke { line_width, .. }
                    if (*line_width - OVERLAY_LINE_WIDTH).abs() < f64::EPSILON
            )
        });
        assert_eq!(overlay_strokes, 1);
        assert_eq!(
            surface.count(|c| matches!(c, crate::surface::SurfaceCall::DrawImage { .. })),
            5
        );

        analyzer.stop_debug();
        assert_eq!(analyzer.config().analyzing_depth_max, 0);
        assert!(!analyzer.is_debug_pointer_active());
    }

    #[test]
    fn test_stop_debug_without_override_keeps_depth() {
        let (mut analyzer, _, _) = analyzer(AnalyzerConfig::default().with_depth_max(2));
        analyzer
            .start_debug(&DebugOptions::default())
            .expect("debug on");
        analyzer.stop_debug();
        assert_eq!(analyzer.config().analyzing_depth_max, 2);
    }

    #[test]
    fn test_rejected_call_leaves_no_frame() {
        let (mut analyzer, clock, log) = analyzer(AnalyzerConfig::unfiltered());
        assert_eq!(analyzer.cls().err(), Some(DrawError::NotStarted));
        assert!(analyzer.call_stack().is_empty());
        assert_eq!(analyzer.root_position(), 0);

        analyzer.start("").and_then(|a| a.cls()).expect("draws after start");
        assert!(analyzer.call_stack().is_empty());
        assert_eq!(analyzer.root_position(), 1);
        assert!(log
            .borrow()
            .iter()
            .any(|e| e.reason == AnalyzeReason::MethodStart && e.call.method_name == "cls"));

        clock.advance(1000.0);
        assert!(analyzer.tick());
    }

    #[test]
    fn test_set_context_binds_before_start() {
        let (mut analyzer, _, _) = analyzer(AnalyzerConfig::unfiltered());
        let err = analyzer.set_context(RecordingSurface::new(40.0, 20.0)).err();
        assert_eq!(err, Some(DrawError::NotStarted));
        assert_eq!(analyzer.context().map(Surface::width), Some(40.0));
        assert!(analyzer.call_stack().is_empty());
    }

    #[test]
    fn test_every_traced_name_is_described() {
        let (mut analyzer, _, log) = analyzer(AnalyzerConfig::unfiltered());
        let label = analyzer
            .context()
            .expect("bound")
            .create_offscreen(10.0, 10.0)
            .expect("offscreen")
            .into_image();
        let origin = Vector2D::new(10.0, 10.0);
        let rect = Rect::new(10.0, 10.0, 20.0, 20.0);
        let pivot = Vector2D::new(0.5, 0.5);
        let black = StylePass::from("black");
        let store = GeometryStore::circle(origin.clone(), 5.0, black.clone(), StylePass::Skip);
        analyzer
            .start("")
            .and_then(|a| a.set_draw_condition(true))
            .and_then(|a| a.remove_draw_condition())
            .and_then(|a| a.set_unit(PositionUnit::Px))
            .and_then(|a| a.begin_path())
            .and_then(|a| a.move_to(&origin))
            .and_then(|a| a.quadratic_curve_to(&origin, &origin))
            .and_then(|a| a.close_path())
            .and_then(|a| a.fill(FillRule::NonZero))
            .and_then(|a| a.stroke())
            .and_then(|a| a.save())
            .and_then(|a| a.restore())
            .and_then(|a| a.cls())
            .and_then(|a| a.select_rect(&rect))
            .and_then(|a| a.select_round_rect(&rect, 2.0))
            .and_then(|a| a.set_fill_style("red"))
            .and_then(|a| a.set_stroke_style("red"))
            .and_then(|a| a.set_filter("none"))
            .and_then(|a| a.set_font("12px serif"))
            .and_then(|a| a.set_global_composite_operation("source-over"))
            .and_then(|a| a.circle(&origin, 5.0, &black, &StylePass::Skip))
            .and_then(|a| a.donut(&origin, 5.0, 2.0, &black, &StylePass::Skip))
            .and_then(|a| a.rectangle(&rect, &black, &StylePass::Skip, 0.0, &pivot))
            .and_then(|a| a.round_rectangle(&rect, 2.0, &black, &StylePass::Skip))
            .and_then(|a| a.lines(&origin, &[Vector2D::new(20.0, 20.0)], &black, &StylePass::Skip, 1.0))
            .and_then(|a| {
                a.gradient_lines(
                    &origin,
                    &[Vector2D::new(20.0, 20.0)],
                    &["red".to_string(), "blue".to_string()],
                    1.0,
                )
            })
            .and_then(|a| a.text(&TextBox::at(origin.clone()), "hi", None, None))
            .and_then(|a| a.image(&label, &rect, None, 0.0, &pivot))
            .and_then(|a| a.clip_rect(std::slice::from_ref(&rect)))
            .and_then(|a| a.reset_clip())
            .and_then(|a| a.clip_round_rect(std::slice::from_ref(&rect), 2.0))
            .and_then(|a| a.reset_clip())
            .and_then(|a| a.grid(10.0, "#ccc", None, 0.0))
            .and_then(|a| a.hexagon(&origin, 5.0, &black, &StylePass::Skip, 0.0))
            .and_then(|a| a.ngon(&origin, 5.0, 5, &black, &StylePass::Skip, 0.0))
            .and_then(|a| a.cube(&rect, None, 45.0, &black, &FaceStyles::default()))
            .and_then(|a| {
                a.cube3d(
                    &rect,
                    None,
                    &AngleSets::default(),
                    &black,
                    &FaceStyles::default(),
                    &Vector3D::new(0.5, 0.5, 0.5),
                )
            })
            .and_then(|a| a.set_conditional_filter(true, "none"))
            .and_then(|a| a.geometry(&store))
            .and_then(|a| a.set_context(RecordingSurface::new(300.0, 300.0)))
            .expect("draws");

        let events = log.borrow();
        let traced: std::collections::BTreeSet<&str> = events
            .iter()
            .filter(|e| e.reason == AnalyzeReason::MethodStart)
            .map(|e| e.call.method_name.as_str())
            .collect();
        for name in &traced {
            assert!(meta::lookup(name).is_some(), "{name} has no description");
        }
        let described: std::collections::BTreeSet<&str> = meta::method_names()
            .filter(|name| *name != START_MARKER)
            .collect();
        assert_eq!(traced, described);
        assert!(events.iter().all(|e| !e.call.arguments.is_array()));
    }
}
