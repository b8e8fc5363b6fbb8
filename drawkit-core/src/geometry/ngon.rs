//! Regular polygons.

use std::f64::consts::TAU;

use super::{BodyType, GeometryStore};
use crate::{GeometryError, GeometryResult, StylePass, Vector2D};

/// Vertices of a regular polygon around `center`.
///
/// Returns `sides + 1` points; the last one closes the loop onto the first.
///
/// # Errors
///
/// Returns [`GeometryError::InvalidSideCount`] when `sides` is zero.
pub fn ngon_vertices(
    center: &Vector2D,
    radius: f64,
    sides: u32,
    angle: f64,
) -> GeometryResult<Vec<Vector2D>> {
    if sides == 0 {
        return Err(GeometryError::InvalidSideCount(sides));
    }
    let angle_rad = angle.to_radians();
    let step = TAU / f64::from(sides);

    Ok((0..=sides)
        .map(|i| {
            let theta = step * f64::from(i) + angle_rad;
            Vector2D::new(
                center.raw_x() + radius * theta.cos(),
                center.raw_y() + radius * theta.sin(),
            )
        })
        .collect())
}

/// Builds a [`GeometryStore`] for a regular polygon.
#[derive(Debug, Clone)]
pub struct NgonBuilder {
    position: Vector2D,
    radius: f64,
    sides: u32,
    angle: f64,
    pivot: Vector2D,
    stroke_style: StylePass,
    fill_style: StylePass,
}

impl NgonBuilder {
    /// Polygon with the given side count inscribed in a circle of `radius`.
    #[must_use]
    pub fn new(position: Vector2D, radius: f64, sides: u32) -> Self {
        Self {
            position,
            radius,
            sides,
            angle: 0.0,
            pivot: Vector2D::new(0.5, 0.5),
            stroke_style: StylePass::Skip,
            fill_style: StylePass::Skip,
        }
    }

    /// Initial rotation in degrees.
    #[must_use]
    pub fn with_angle(mut self, angle: f64) -> Self {
        self.angle = angle;
        self
    }

    /// Pivot as a fraction of the bounding box. Defaults to the center.
    #[must_use]
    pub fn with_pivot(mut self, pivot: Vector2D) -> Self {
        self.pivot = pivot;
        self
    }

    /// Stroke and fill passes.
    #[must_use]
    pub fn with_styles(mut self, stroke: StylePass, fill: StylePass) -> Self {
        self.stroke_style = stroke;
        self.fill_style = fill;
        self
    }

    /// Build the store. Vertices are relative to the polygon center, shifted
    /// so that the pivot sits at the origin.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::InvalidSideCount`] when the side count is zero.
    pub fn build(self) -> GeometryResult<GeometryStore> {
        let size = self.radius * 2.0;
        let offset = Vector2D::new(
            (0.5 - self.pivot.raw_x()) * size,
            (0.5 - self.pivot.raw_y()) * size,
        );
        let edges = ngon_vertices(&offset, self.radius, self.sides, self.angle)?;

        Ok(GeometryStore {
            body_type: BodyType::Ngon,
            edges,
            fill_style: self.fill_style,
            stroke_style: self.stroke_style,
            width: size,
            height: size,
            pivot: self.pivot,
            position: self.position,
        })
    }
}
