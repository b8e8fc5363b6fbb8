//! 2D and 3D vectors.
//!
//! [`Vector2D`] reads are rounded to three decimals and `-0` reads as `0`.
//! Its magnitude is computed on demand and cached until a coordinate changes.

use std::cell::Cell;
use std::f64::consts::TAU;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{PositionType, PositionUnit};

/// Round to three decimals and normalize negative zero.
fn rounded(value: f64) -> f64 {
    let r = (value * 1000.0).round() / 1000.0;
    if r == 0.0 {
        0.0
    } else {
        r
    }
}

/// A 2D coordinate pair with optional unit, position type and rotation.
#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vector2D {
    x: f64,
    y: f64,
    #[serde(default)]
    rotation: f64,
    #[serde(default)]
    position_type: PositionType,
    #[serde(default)]
    position_unit: Option<PositionUnit>,
    #[serde(skip)]
    magnitude: Cell<Option<f64>>,
}

impl Vector2D {
    /// Create a vector without an explicit unit.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            rotation: 0.0,
            position_type: PositionType::Absolute,
            position_unit: None,
            magnitude: Cell::new(None),
        }
    }

    /// The zero vector.
    #[must_use]
    pub const fn zero() -> Self {
        Self::new(0.0, 0.0)
    }

    /// Set the unit of this vector.
    #[must_use]
    pub fn with_unit(mut self, unit: PositionUnit) -> Self {
        self.position_unit = Some(unit);
        self
    }

    /// Set the position type of this vector.
    #[must_use]
    pub fn with_position_type(mut self, position_type: PositionType) -> Self {
        self.position_type = position_type;
        self
    }

    /// X coordinate, rounded to three decimals.
    #[must_use]
    pub fn x(&self) -> f64 {
        rounded(self.x)
    }

    /// Y coordinate, rounded to three decimals.
    #[must_use]
    pub fn y(&self) -> f64 {
        rounded(self.y)
    }

    /// X coordinate without rounding.
    #[must_use]
    pub fn raw_x(&self) -> f64 {
        self.x
    }

    /// Y coordinate without rounding.
    #[must_use]
    pub fn raw_y(&self) -> f64 {
        self.y
    }

    /// Replace the x coordinate.
    pub fn set_x(&mut self, x: f64) {
        self.magnitude.set(None);
        self.x = x;
    }

    /// Replace the y coordinate.
    pub fn set_y(&mut self, y: f64) {
        self.magnitude.set(None);
        self.y = y;
    }

    /// Total rotation applied through [`Vector2D::rotate`], in degrees.
    #[must_use]
    pub fn rotation(&self) -> f64 {
        self.rotation
    }

    /// Unit of this vector, if it carries one.
    #[must_use]
    pub fn position_unit(&self) -> Option<PositionUnit> {
        self.position_unit
    }

    /// Replace the unit of this vector.
    pub fn set_position_unit(&mut self, unit: Option<PositionUnit>) {
        self.position_unit = unit;
    }

    /// Position type of this vector.
    #[must_use]
    pub fn position_type(&self) -> PositionType {
        self.position_type
    }

    /// Position on screen given the camera position.
    ///
    /// Absolute vectors are returned as is; camera-relative vectors are shifted
    /// by the camera and floored to whole pixels.
    #[must_use]
    pub fn screen_position(&self, camera: &Vector2D) -> (f64, f64) {
        match self.position_type {
            PositionType::Absolute => (self.x(), self.y()),
            PositionType::CameraRelative => (
                (self.x() - camera.x()).floor(),
                (self.y() - camera.y()).floor(),
            ),
        }
    }

    /// Euclidean length.
    #[must_use]
    pub fn magnitude(&self) -> f64 {
        if let Some(m) = self.magnitude.get() {
            return m;
        }
        let m = self.x().hypot(self.y());
        self.magnitude.set(Some(m));
        m
    }

    /// Unit vector in the same direction, or `None` for the zero vector.
    #[must_use]
    pub fn normalized(&self) -> Option<Vector2D> {
        let m = self.magnitude();
        (m != 0.0).then(|| Vector2D::new(self.x() / m, self.y() / m))
    }

    /// Scale in place.
    pub fn scale(&mut self, factor: f64) -> &mut Self {
        let (x, y) = (self.x() * factor, self.y() * factor);
        self.set_x(x);
        self.set_y(y);
        self
    }

    /// Add another vector in place.
    pub fn add_vector(&mut self, other: &Vector2D) -> &mut Self {
        let (x, y) = (self.x() + other.x(), self.y() + other.y());
        self.set_x(x);
        self.set_y(y);
        self
    }

    /// Difference `self - other` as a new vector.
    #[must_use]
    pub fn subtracted(&self, other: &Vector2D) -> Vector2D {
        Vector2D::new(self.x() - other.x(), self.y() - other.y())
    }

    /// Pairwise operations between this vector and `other`.
    pub fn with<'a>(&'a mut self, other: &'a Vector2D) -> VectorOps<'a> {
        VectorOps { this: self, other }
    }

    /// Rotate around `anchor` by `angle` degrees and accumulate the rotation.
    pub fn rotate(&mut self, angle: f64, anchor: &Vector2D) -> &mut Self {
        self.rotation += angle;

        let (sin, cos) = (-angle).to_radians().sin_cos();
        let dx = self.x - anchor.x();
        let dy = self.y - anchor.y();

        self.set_x(cos * dx + sin * dy + anchor.x());
        self.set_y(cos * dy - sin * dx + anchor.y());
        self
    }
}

impl Default for Vector2D {
    fn default() -> Self {
        Self::zero()
    }
}

impl PartialEq for Vector2D {
    fn eq(&self, other: &Self) -> bool {
        self.x() == other.x() && self.y() == other.y()
    }
}

impl fmt::Debug for Vector2D {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct("Vector2D");
        s.field("x", &self.x()).field("y", &self.y());
        if self.rotation != 0.0 {
            s.field("rotation", &self.rotation);
        }
        if let Some(unit) = self.position_unit {
            s.field("unit", &unit);
        }
        s.finish()
    }
}

impl From<(f64, f64)> for Vector2D {
    fn from((x, y): (f64, f64)) -> Self {
        Self::new(x, y)
    }
}

/// Operations pairing a vector with another one; see [`Vector2D::with`].
pub struct VectorOps<'a> {
    this: &'a mut Vector2D,
    other: &'a Vector2D,
}

impl VectorOps<'_> {
    /// Add `other` to this vector in place.
    pub fn add(self) -> Vector2D {
        self.this.add_vector(self.other).clone()
    }

    /// Subtract `other` from this vector in place.
    pub fn subtract(self) -> Vector2D {
        let diff = self.this.subtracted(self.other);
        self.this.set_x(diff.x);
        self.this.set_y(diff.y);
        self.this.clone()
    }

    /// Euclidean distance between the two vectors.
    #[must_use]
    pub fn distance(&self) -> f64 {
        self.this.subtracted(self.other).magnitude()
    }

    /// Angle of the direction from this vector to `other`, in `[0, 2π)`.
    ///
    /// Uses screen orientation: y grows downwards, angles grow counter-clockwise.
    #[must_use]
    pub fn angle_radians(&self) -> f64 {
        let Some(direction) = self.other.subtracted(self.this).normalized() else {
            return 0.0;
        };
        let mut angle = (-direction.y()).atan2(direction.x());
        if angle < 0.0 {
            angle += TAU;
        }
        if angle == 0.0 || angle >= TAU {
            0.0
        } else {
            angle
        }
    }

    /// Unit vector pointing from this vector to `other`.
    ///
    /// Returns `None` when both vectors coincide.
    #[must_use]
    pub fn angle_vector(&self) -> Option<Vector2D> {
        self.other.subtracted(self.this).normalized()
    }

    /// Per-axis step towards `other`, capped at `speed` per axis.
    ///
    /// The step never overshoots the target, so repeated application lands
    /// exactly on it.
    #[must_use]
    pub fn normalized_move_vector(&self, speed: &Vector2D) -> Vector2D {
        let dx = self.other.x() - self.this.x();
        let dy = self.other.y() - self.this.y();
        let distance = dx.hypot(dy);

        if dx == 0.0 && dy == 0.0 {
            return Vector2D::zero();
        }
        if dx == 0.0 {
            return Vector2D::new(0.0, dy.signum() * speed.y().min(distance));
        }
        if dy == 0.0 {
            return Vector2D::new(dx.signum() * speed.x().min(distance), 0.0);
        }

        let step_x = dx / distance * speed.x();
        let step_y = dy / distance * speed.y();
        Vector2D::new(clamp_step(step_x, dx), clamp_step(step_y, dy))
    }
}

/// Limit `step` so that it does not pass `remaining`.
fn clamp_step(step: f64, remaining: f64) -> f64 {
    if step > 0.0 {
        step.min(remaining)
    } else {
        step.max(remaining)
    }
}

/// A 3D coordinate triple.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vector3D {
    /// X component.
    pub x: f64,
    /// Y component.
    pub y: f64,
    /// Z component.
    pub z: f64,
    /// Unit of the x/y components, if any.
    #[serde(default)]
    pub position_unit: Option<PositionUnit>,
}

impl Vector3D {
    /// Create a new vector.
    #[must_use]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self {
            x,
            y,
            z,
            position_unit: None,
        }
    }

    /// Drop the z component.
    #[must_use]
    pub fn to_2d(&self) -> Vector2D {
        let v = Vector2D::new(self.x, self.y);
        match self.position_unit {
            Some(unit) => v.with_unit(unit),
            None => v,
        }
    }
}

impl From<[f64; 3]> for Vector3D {
    fn from([x, y, z]: [f64; 3]) -> Self {
        Self::new(x, y, z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::{FRAC_PI_2, PI};

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-3
    }

    #[test]
    fn test_reads_are_rounded_and_negative_zero_is_normalized() {
        let v = Vector2D::new(1.234_56, -0.0);
        assert_eq!(v.x(), 1.235);
        assert_eq!(v.y().to_bits(), 0.0_f64.to_bits());
    }

    #[test]
    fn test_magnitude_is_cached_until_mutation() {
        let mut v = Vector2D::new(3.0, 4.0);
        assert_eq!(v.magnitude(), 5.0);
        v.set_x(6.0);
        v.set_y(8.0);
        assert_eq!(v.magnitude(), 10.0);
    }

    #[test]
    fn test_normalized_zero_vector_is_none() {
        assert!(Vector2D::zero().normalized().is_none());
        let n = Vector2D::new(0.0, 2.0).normalized().expect("non-zero");
        assert_eq!(n, Vector2D::new(0.0, 1.0));
    }

    #[test]
    fn test_distance_is_symmetric() {
        let mut a = Vector2D::new(1.0, 2.0);
        let mut b = Vector2D::new(-4.0, 7.5);
        let b_copy = b.clone();
        let a_copy = a.clone();
        let ab = a.with(&b_copy).distance();
        let ba = b.with(&a_copy).distance();
        assert!(close(ab, ba));
    }

    #[test]
    fn test_add_and_subtract_mutate_in_place() {
        let mut a = Vector2D::new(1.0, 1.0);
        let b = Vector2D::new(2.0, 3.0);
        a.with(&b).add();
        assert_eq!(a, Vector2D::new(3.0, 4.0));
        a.with(&b).subtract();
        assert_eq!(a, Vector2D::new(1.0, 1.0));
    }

    #[test]
    fn test_angle_uses_screen_orientation() {
        let mut origin = Vector2D::zero();
        assert!(close(origin.with(&Vector2D::new(1.0, 0.0)).angle_radians(), 0.0));
        // Up on screen is negative y.
        assert!(close(
            origin.with(&Vector2D::new(0.0, -1.0)).angle_radians(),
            FRAC_PI_2
        ));
        assert!(close(origin.with(&Vector2D::new(-1.0, 0.0)).angle_radians(), PI));
        let below = origin.with(&Vector2D::new(0.0, 1.0)).angle_radians();
        assert!(close(below, 3.0 * FRAC_PI_2));
    }

    #[test]
    fn test_move_vector_never_overshoots() {
        let mut from = Vector2D::new(0.0, 0.0);
        let target = Vector2D::new(0.5, 0.25);
        let step = from.with(&target).normalized_move_vector(&Vector2D::new(10.0, 10.0));
        assert_eq!(step, Vector2D::new(0.5, 0.25));

        let step = from
            .with(&Vector2D::new(0.0, -20.0))
            .normalized_move_vector(&Vector2D::new(1.0, 3.0));
        assert_eq!(step, Vector2D::new(0.0, -3.0));

        let step = from
            .with(&Vector2D::new(-30.0, 40.0))
            .normalized_move_vector(&Vector2D::new(1.0, 1.0));
        assert!(close(step.x(), -0.6));
        assert!(close(step.y(), 0.8));
    }

    #[test]
    fn test_rotation_round_trip_restores_coordinates() {
        let anchor = Vector2D::new(5.0, 5.0);
        let mut v = Vector2D::new(12.0, -3.0);
        v.rotate(37.0, &anchor);
        assert!(!close(v.x(), 12.0));
        v.rotate(-37.0, &anchor);
        assert!(close(v.x(), 12.0));
        assert!(close(v.y(), -3.0));
        assert_eq!(v.rotation(), 0.0);
    }

    #[test]
    fn test_rotate_quarter_turn() {
        let mut v = Vector2D::new(1.0, 0.0);
        v.rotate(90.0, &Vector2D::zero());
        assert!(close(v.x(), 0.0));
        assert!(close(v.y(), 1.0));
        assert_eq!(v.rotation(), 90.0);
    }

    #[test]
    fn test_camera_relative_screen_position() {
        let camera = Vector2D::new(10.0, 20.0);
        let v = Vector2D::new(15.5, 25.5).with_position_type(PositionType::CameraRelative);
        assert_eq!(v.screen_position(&camera), (5.0, 5.0));
        assert_eq!(Vector2D::new(1.0, 2.0).screen_position(&camera), (1.0, 2.0));
    }
}
