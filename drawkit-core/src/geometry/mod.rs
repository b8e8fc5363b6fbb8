//! Geometry primitives.
//!
//! Builders produce a [`GeometryStore`] holding the outline of a shape
//! relative to its bounding box. [`GeometryStore::update`] rotates and moves
//! that outline into place; drawing engines render the resulting edges.

mod cube;
mod grid;
mod ngon;
mod rectangle;

pub use cube::{
    cube_faces, project_cuboid, AngleSets, Face, ProjectedCuboid, ProjectedFace, CUBOID_FACES,
    DEPTH_EDGES,
};
pub use grid::{grid_lines, grid_spacing, GridLine, MIN_GRID_CELL};
pub use ngon::{ngon_vertices, NgonBuilder};
pub use rectangle::RectangleBuilder;

use serde::{Deserialize, Serialize};

use crate::{StylePass, Vector2D};

/// Rotate `point` around `center` by `angle` degrees.
///
/// Positive angles turn clockwise on a y-down surface.
#[must_use]
pub fn rotate_about(point: &Vector2D, center: &Vector2D, angle: f64) -> Vector2D {
    let (sin, cos) = angle.to_radians().sin_cos();
    let dx = point.raw_x() - center.raw_x();
    let dy = point.raw_y() - center.raw_y();
    Vector2D::new(
        dx * cos - dy * sin + center.raw_x(),
        dx * sin + dy * cos + center.raw_y(),
    )
}

/// How a [`GeometryStore`]'s edges are interpreted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BodyType {
    /// Edges trace a closed polygon perimeter.
    #[default]
    Ngon,
    /// A circle around `position` with radius `width / 2`.
    Circle,
}

/// How rotation steps in a [`GeometryUpdate`] are applied.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RotateType {
    /// Rotate every edge around the pivot.
    #[default]
    Complete,
    /// Move the shape along the path its center takes around the pivot,
    /// keeping its orientation.
    Center,
}

/// Built shape ready to be transformed and drawn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeometryStore {
    /// How `edges` are interpreted.
    pub body_type: BodyType,
    /// Outline vertices. The first and last vertex coincide for closed shapes.
    pub edges: Vec<Vector2D>,
    /// Fill pass.
    pub fill_style: StylePass,
    /// Stroke pass.
    pub stroke_style: StylePass,
    /// Bounding box width.
    pub width: f64,
    /// Bounding box height.
    pub height: f64,
    /// Rotation pivot as a fraction of the bounding box.
    pub pivot: Vector2D,
    /// Position the shape was built for.
    pub position: Vector2D,
}

/// One transformation step for [`GeometryStore::update`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GeometryUpdate {
    /// Rotation steps in degrees, applied in order.
    pub angles: Vec<f64>,
    /// Pivot for the step with the same index. A step without its own pivot
    /// keeps the pivot of the previous step.
    pub pivots: Vec<Option<Vector2D>>,
    /// How rotation steps are applied.
    pub rotate_type: RotateType,
    /// Translation applied after all rotation steps.
    pub position: Vector2D,
}

impl GeometryUpdate {
    /// Translation only.
    #[must_use]
    pub fn translate(position: Vector2D) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    /// Add a rotation step, optionally with its own pivot.
    #[must_use]
    pub fn rotate(mut self, angle: f64, pivot: Option<Vector2D>) -> Self {
        self.angles.push(angle);
        self.pivots.push(pivot);
        self
    }

    /// Set the rotate type.
    #[must_use]
    pub fn with_rotate_type(mut self, rotate_type: RotateType) -> Self {
        self.rotate_type = rotate_type;
        self
    }
}

impl GeometryStore {
    /// A circle store centered on `position`.
    #[must_use]
    pub fn circle(position: Vector2D, radius: f64, stroke: StylePass, fill: StylePass) -> Self {
        Self {
            body_type: BodyType::Circle,
            edges: vec![position.clone()],
            fill_style: fill,
            stroke_style: stroke,
            width: radius * 2.0,
            height: radius * 2.0,
            pivot: Vector2D::new(0.5, 0.5),
            position,
        }
    }

    /// Radius of a circle store.
    #[must_use]
    pub fn radius(&self) -> f64 {
        self.width / 2.0
    }

    /// Apply rotation steps, then translate.
    #[must_use]
    pub fn update(mut self, update: &GeometryUpdate) -> Self {
        let mut pivot = self.pivot.clone();
        let center = Vector2D::new(self.width / 2.0, self.height / 2.0);

        for (index, angle) in update.angles.iter().enumerate() {
            if let Some(Some(step_pivot)) = update.pivots.get(index) {
                pivot = step_pivot.clone();
            }
            let anchor = Vector2D::new(pivot.raw_x() * self.width, pivot.raw_y() * self.height);

            match update.rotate_type {
                RotateType::Center => {
                    let moved = rotate_about(&center, &anchor, *angle);
                    let diff = moved.subtracted(&center);
                    for edge in &mut self.edges {
                        edge.add_vector(&diff);
                    }
                }
                RotateType::Complete => {
                    for edge in &mut self.edges {
                        *edge = rotate_about(edge, &anchor, *angle);
                    }
                }
            }
        }

        for edge in &mut self.edges {
            edge.add_vector(&update.position);
        }
        self.position.add_vector(&update.position);

        tracing::trace!(
            "Geometry updated: {} rotation steps, {} edges",
            update.angles.len(),
            self.edges.len()
        );
        self
    }

    /// Debug body describing this store's outline.
    #[must_use]
    pub fn body(&self) -> Body {
        match self.body_type {
            BodyType::Ngon => Body::Polygon(self.edges.clone()),
            BodyType::Circle => Body::Circle {
                center: self.position.clone(),
                radius: self.radius(),
            },
        }
    }
}

/// Outline of a drawn shape, used for debug overlays.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "type", content = "shape")]
pub enum Body {
    /// Polygon or polyline through the given points.
    Polygon(Vec<Vector2D>),
    /// Circle.
    Circle {
        /// Center point.
        center: Vector2D,
        /// Radius.
        radius: f64,
    },
}

impl Body {
    /// Axis-aligned rectangle outline.
    #[must_use]
    pub fn rect(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self::Polygon(vec![
            Vector2D::new(x, y),
            Vector2D::new(x + width, y),
            Vector2D::new(x + width, y + height),
            Vector2D::new(x, y + height),
            Vector2D::new(x, y),
        ])
    }
}
