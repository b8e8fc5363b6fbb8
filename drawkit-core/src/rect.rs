//! Axis-aligned rectangles.

use serde::{Deserialize, Serialize};

use crate::{PositionUnit, Vector2D};

/// A rectangle given by its top-left corner and size.
///
/// The optional colors are decorative attributes carried along for callers
/// that describe styled regions; drawing operations take their styles
/// explicitly.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rect {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    /// Width.
    pub width: f64,
    /// Height.
    pub height: f64,
    /// Unit of all four values; the engine default applies when `None`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position_unit: Option<PositionUnit>,
    /// Decorative color.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// Decorative highlight color.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub highlight_color: Option<String>,
}

impl Rect {
    /// Create a rectangle without a unit.
    #[must_use]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
            position_unit: None,
            color: None,
            highlight_color: None,
        }
    }

    /// Set the unit of this rectangle.
    #[must_use]
    pub fn with_unit(mut self, unit: PositionUnit) -> Self {
        self.position_unit = Some(unit);
        self
    }

    /// Right edge.
    #[must_use]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge.
    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Center point.
    #[must_use]
    pub fn center(&self) -> Vector2D {
        Vector2D::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Point at the given fraction of the rectangle, e.g. `(0.5, 0.5)` for the center.
    #[must_use]
    pub fn point_at(&self, pivot: &Vector2D) -> Vector2D {
        Vector2D::new(
            self.x + self.width * pivot.x(),
            self.y + self.height * pivot.y(),
        )
    }

    /// Top-left corner.
    #[must_use]
    pub fn origin(&self) -> Vector2D {
        Vector2D::new(self.x, self.y)
    }
}

impl From<[f64; 4]> for Rect {
    fn from([x, y, width, height]: [f64; 4]) -> Self {
        Self::new(x, y, width, height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edges_and_center() {
        let rect = Rect::new(10.0, 20.0, 30.0, 40.0);
        assert_eq!(rect.right(), 40.0);
        assert_eq!(rect.bottom(), 60.0);
        assert_eq!(rect.center(), Vector2D::new(25.0, 40.0));
        assert_eq!(rect.point_at(&Vector2D::new(1.0, 0.0)), Vector2D::new(40.0, 20.0));
    }

    #[test]
    fn test_from_array_is_positional() {
        let rect = Rect::from([1.0, 2.0, 3.0, 4.0]);
        assert_eq!(rect, Rect::new(1.0, 2.0, 3.0, 4.0));
    }

    #[test]
    fn test_deserialize_with_unit() {
        let rect: Rect = serde_json::from_str(
            r#"{"x":1,"y":2,"width":3,"height":4,"positionUnit":"percent"}"#,
        )
        .expect("valid rect");
        assert_eq!(rect.position_unit, Some(PositionUnit::Percent));
        assert!(rect.color.is_none());
    }
}
