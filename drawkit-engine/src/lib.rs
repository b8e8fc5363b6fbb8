//! # Drawkit Engine
//!
//! Fluent 2D drawing on a canvas-like surface, with an optional analyzer that
//! traces every drawing call.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │        TracingDrawEngine (analyzer)         │
//! │   call stack · depth filter · cycle end     │
//! ├─────────────────────────────────────────────┤
//! │            DrawEngine trait                 │
//! │        Canvas2dEngine (unit aware)          │
//! ├─────────────────────────────────────────────┤
//! │              Surface trait                  │
//! ├──────────────────────┬──────────────────────┤
//! │ WebCanvasSurface     │ RecordingSurface     │
//! │ (wasm, web-sys)      │ (headless, tests)    │
//! └──────────────────────┴──────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```
//! use drawkit_engine::{draw_engine, DrawEngine, RecordingSurface};
//! use drawkit_core::{Rect, StylePass, Vector2D};
//!
//! let mut engine = draw_engine(RecordingSurface::new(300.0, 300.0));
//! engine
//!     .rectangle(
//!         &Rect::new(10.0, 10.0, 50.0, 50.0),
//!         &"#000".into(),
//!         &"#fff".into(),
//!         0.0,
//!         &Vector2D::new(0.5, 0.5),
//!     )
//!     .and_then(|e| e.circle(&Vector2D::new(100.0, 100.0), 20.0, &StylePass::UseCurrent, &StylePass::Skip))
//!     .expect("surface is bound");
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod analyzer;
#[cfg(feature = "wasm")]
pub mod dom;
pub mod engine;
pub mod error;
pub mod meta;
pub mod registry;
pub mod surface;

pub use analyzer::{
    AnalyzeEvent, AnalyzeReason, AnalyzerConfig, CallInfo, Clock, DebugOptions, ManualClock,
    MonotonicClock, TracingDrawEngine,
};
pub use engine::{Canvas2dEngine, DrawEngine, MethodDetails, TextBox};
pub use error::{DrawError, DrawResult, SurfaceError, SurfaceResult};
pub use meta::{MethodMeta, ParamKind, ParamMeta, DRAW_ENGINE_META};
pub use registry::EngineRegistry;
#[cfg(feature = "wasm")]
pub use surface::WebCanvasSurface;
pub use surface::{FillRule, RecordingSurface, Surface};

/// Create a drawing engine bound to `surface`.
#[must_use]
pub fn draw_engine<S: Surface>(surface: S) -> Canvas2dEngine<S> {
    Canvas2dEngine::with_surface(surface)
}

/// Create a tracing drawing engine bound to `surface`.
#[must_use]
pub fn analyzed_draw_engine<S: Surface>(surface: S) -> TracingDrawEngine<S> {
    TracingDrawEngine::with_surface(surface)
}

/// Drawkit engine version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
