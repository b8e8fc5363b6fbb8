//! Position units and conversion to absolute surface pixels.
//!
//! Logical positions may be expressed in pixels or in percent of the surface
//! size. Percent values are scaled per axis: `x` and `width` relative to the
//! surface width, `y` and `height` relative to the surface height.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{Rect, Vector2D};

/// Unit a position or size is expressed in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PositionUnit {
    /// Absolute surface pixels.
    #[default]
    Px,
    /// Percent of the surface width (x axis) or height (y axis).
    Percent,
}

/// How a position relates to the viewer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PositionType {
    /// Fixed on the surface.
    #[default]
    Absolute,
    /// Relative to a camera; shifted by the camera position when rendered.
    CameraRelative,
}

/// Keys recognized when converting untyped values.
const AXIS_KEYS: [(&str, Axis); 4] = [
    ("x", Axis::Horizontal),
    ("y", Axis::Vertical),
    ("width", Axis::Horizontal),
    ("height", Axis::Vertical),
];

#[derive(Debug, Clone, Copy)]
enum Axis {
    Horizontal,
    Vertical,
}

/// Converts logical values into absolute pixels for one surface size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnitConverter {
    width: f64,
    height: f64,
    default_unit: PositionUnit,
}

impl UnitConverter {
    /// Create a converter for a surface of the given size.
    ///
    /// `default_unit` applies to values that carry no unit of their own.
    #[must_use]
    pub const fn new(width: f64, height: f64, default_unit: PositionUnit) -> Self {
        Self {
            width,
            height,
            default_unit,
        }
    }

    /// Surface width in pixels.
    #[must_use]
    pub const fn width(&self) -> f64 {
        self.width
    }

    /// Surface height in pixels.
    #[must_use]
    pub const fn height(&self) -> f64 {
        self.height
    }

    /// The unit used for values without an explicit unit.
    #[must_use]
    pub const fn default_unit(&self) -> PositionUnit {
        self.default_unit
    }

    /// Per-axis multipliers for the given unit (or the default unit).
    #[must_use]
    pub fn multiplier(&self, unit: Option<PositionUnit>) -> (f64, f64) {
        match unit.unwrap_or(self.default_unit) {
            PositionUnit::Px => (1.0, 1.0),
            PositionUnit::Percent => (self.width / 100.0, self.height / 100.0),
        }
    }

    /// Convert a scalar such as a radius. Scalars scale with the surface width.
    #[must_use]
    pub fn scalar(&self, value: f64) -> f64 {
        value * self.multiplier(None).0
    }

    /// Convert a vector into pixels. The result is tagged [`PositionUnit::Px`].
    #[must_use]
    pub fn vector(&self, vector: &Vector2D) -> Vector2D {
        let (mx, my) = self.multiplier(vector.position_unit());
        let mut converted = vector.clone();
        converted.set_x(vector.x() * mx);
        converted.set_y(vector.y() * my);
        converted.set_position_unit(Some(PositionUnit::Px));
        converted
    }

    /// Convert every vector of a slice.
    #[must_use]
    pub fn vectors(&self, vectors: &[Vector2D]) -> Vec<Vector2D> {
        vectors.iter().map(|v| self.vector(v)).collect()
    }

    /// Convert a rectangle into pixels. The result is tagged [`PositionUnit::Px`].
    #[must_use]
    pub fn rect(&self, rect: &Rect) -> Rect {
        let (mx, my) = self.multiplier(rect.position_unit);
        Rect {
            x: rect.x * mx,
            y: rect.y * my,
            width: rect.width * mx,
            height: rect.height * my,
            position_unit: Some(PositionUnit::Px),
            ..rect.clone()
        }
    }

    /// Convert an untyped value.
    ///
    /// Numbers are treated as scalars, four-element arrays as
    /// `[x, y, width, height]`, and objects have their `x`, `y`, `width` and
    /// `height` members converted (honouring an optional `positionUnit`
    /// member). Other members are kept. Values without any recognized field
    /// are returned borrowed and unchanged.
    #[must_use]
    pub fn convert_json<'a>(&self, value: &'a Value) -> Cow<'a, Value> {
        match value {
            Value::Number(n) => match n.as_f64() {
                Some(v) => Cow::Owned(Value::from(self.scalar(v))),
                None => Cow::Borrowed(value),
            },
            Value::Array(items) if items.len() == 4 && items.iter().all(Value::is_number) => {
                let mut object = Map::new();
                for ((key, _), item) in AXIS_KEYS.iter().zip(items) {
                    object.insert((*key).to_string(), item.clone());
                }
                match self.convert_object(&object) {
                    Some(converted) => Cow::Owned(Value::Object(converted)),
                    None => Cow::Owned(Value::Object(object)),
                }
            }
            Value::Object(object) => match self.convert_object(object) {
                Some(converted) => Cow::Owned(Value::Object(converted)),
                None => Cow::Borrowed(value),
            },
            _ => Cow::Borrowed(value),
        }
    }

    fn convert_object(&self, object: &Map<String, Value>) -> Option<Map<String, Value>> {
        let unit = object
            .get("positionUnit")
            .and_then(|u| serde_json::from_value::<PositionUnit>(u.clone()).ok());
        let (mx, my) = self.multiplier(unit);

        let mut result = object.clone();
        let mut updated = false;
        for (key, axis) in AXIS_KEYS {
            if let Some(v) = object.get(key).and_then(Value::as_f64) {
                let factor = match axis {
                    Axis::Horizontal => mx,
                    Axis::Vertical => my,
                };
                result.insert(key.to_string(), Value::from(v * factor));
                updated = true;
            }
        }
        if unit.is_some() {
            result.insert("positionUnit".to_string(), Value::from("px"));
        }
        updated.then_some(result)
    }
}
