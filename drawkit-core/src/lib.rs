//! # Drawkit Core
//!
//! Surface independent data model for the Drawkit drawing engine.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │                drawkit-core                 │
//! ├─────────────────────────────────────────────┤
//! │  Data Model      │  Geometry                │
//! │  - Vector2D/3D   │  - N-gons, rectangles    │
//! │  - Rect          │  - 2.5D cube faces       │
//! │  - Style passes  │  - Projected cuboids     │
//! ├─────────────────────────────────────────────┤
//! │  Units           │  Text                    │
//! │  - px / percent  │  - Greedy word wrap      │
//! └─────────────────────────────────────────────┘
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod geometry;
pub mod rect;
pub mod style;
pub mod text;
pub mod unit;
pub mod vector;

pub use error::{GeometryError, GeometryResult};
pub use geometry::{
    cube_faces, grid_lines, grid_spacing, ngon_vertices, project_cuboid, rotate_about, AngleSets,
    Body, BodyType, Face, GeometryStore, GeometryUpdate, GridLine, NgonBuilder, ProjectedCuboid,
    ProjectedFace, RectangleBuilder, RotateType, CUBOID_FACES, DEPTH_EDGES, MIN_GRID_CELL,
};
pub use rect::Rect;
pub use style::{FaceStyles, StylePass};
pub use text::wrap_words;
pub use unit::{PositionType, PositionUnit, UnitConverter};
pub use vector::{Vector2D, Vector3D, VectorOps};

/// Drawkit core version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
