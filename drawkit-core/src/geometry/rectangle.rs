//! Rectangle outlines.

use super::{rotate_about, BodyType, GeometryStore};
use crate::{StylePass, Vector2D};

/// Builds a [`GeometryStore`] for a rectangle.
///
/// The pivot defaults to the top-right corner `(1, 0)`.
#[derive(Debug, Clone)]
pub struct RectangleBuilder {
    width: f64,
    height: f64,
    position: Vector2D,
    angle: f64,
    pivot: Vector2D,
    stroke_style: StylePass,
    fill_style: StylePass,
}

impl RectangleBuilder {
    /// Rectangle of the given size.
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            position: Vector2D::zero(),
            angle: 0.0,
            pivot: Vector2D::new(1.0, 0.0),
            stroke_style: StylePass::Skip,
            fill_style: StylePass::Skip,
        }
    }

    /// Position recorded on the store.
    #[must_use]
    pub fn at(mut self, position: Vector2D) -> Self {
        self.position = position;
        self
    }

    /// Initial rotation in degrees around the pivot.
    #[must_use]
    pub fn with_angle(mut self, angle: f64) -> Self {
        self.angle = angle;
        self
    }

    /// Pivot as a fraction of the rectangle.
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

    /// Build the store: five vertices tracing the closed outline, rotated
    /// around the pivot.
    #[must_use]
    pub fn build(self) -> GeometryStore {
        let (w, h) = (self.width, self.height);
        let anchor = Vector2D::new(self.pivot.raw_x() * w, self.pivot.raw_y() * h);
        let edges = [(0.0, 0.0), (w, 0.0), (w, h), (0.0, h), (0.0, 0.0)]
            .into_iter()
            .map(|(x, y)| rotate_about(&Vector2D::new(x, y), &anchor, self.angle))
            .collect();

        GeometryStore {
            body_type: BodyType::Ngon,
            edges,
            fill_style: self.fill_style,
            stroke_style: self.stroke_style,
            width: w,
            height: h,
            pivot: self.pivot,
            position: self.position,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unrotated_outline() {
        let store = RectangleBuilder::new(40.0, 20.0).build();
        assert_eq!(store.edges.len(), 5);
        assert_eq!(store.edges[2], Vector2D::new(40.0, 20.0));
        assert_eq!(store.edges[0], store.edges[4]);
        assert_eq!(store.pivot, Vector2D::new(1.0, 0.0));
    }

    #[test]
    fn test_rotation_keeps_pivot_fixed() {
        let store = RectangleBuilder::new(40.0, 20.0).with_angle(90.0).build();
        // The default pivot is the top-right corner.
        assert_eq!(store.edges[1], Vector2D::new(40.0, 0.0));
        assert_eq!(store.edges[0], Vector2D::new(40.0, -40.0));
    }
}
