//! Cubes: flat 2.5D faces and perspective-projected cuboids.

use serde::{Deserialize, Serialize};

use crate::{GeometryError, GeometryResult, Rect, Vector2D, Vector3D};

/// Four corners of a cube face.
pub type Face = [Vector2D; 4];

/// Vertex indices of the six cuboid faces.
pub const CUBOID_FACES: [[usize; 4]; 6] = [
    [0, 1, 2, 3],
    [4, 5, 6, 7],
    [0, 1, 5, 4],
    [2, 3, 7, 6],
    [0, 3, 7, 4],
    [1, 2, 6, 5],
];

/// Edges connecting the front and back planes of a cuboid.
pub const DEPTH_EDGES: [[usize; 2]; 4] = [[0, 4], [1, 5], [2, 6], [3, 7]];

const PERSPECTIVE_DISTANCE: f64 = 500.0;

/// Faces of a 2.5D cube drawn from `plane` towards the upper right.
///
/// The back plane is offset by `cos(tilt) * depth` horizontally and
/// `-sin(tilt) * depth` vertically. `depth` defaults to half the plane width.
/// Faces are returned in drawing order: back, bottom, right, left, top, front.
#[must_use]
pub fn cube_faces(plane: &Rect, depth: Option<f64>, tilt: f64) -> [Face; 6] {
    let depth = depth.unwrap_or(plane.width / 2.0);
    let (sin, cos) = tilt.to_radians().sin_cos();
    let (ox, oy) = (cos * depth, -sin * depth);
    let (x, y, w, h) = (plane.x, plane.y, plane.width, plane.height);
    let v = Vector2D::new;

    [
        [v(x + ox, y + oy), v(x + ox + w, y + oy), v(x + ox + w, y + oy + h), v(x + ox, y + oy + h)],
        [v(x, y + h), v(x + ox, y + h + oy), v(x + ox + w, y + h + oy), v(x + w, y + h)],
        [v(x + w, y), v(x + ox + w, y + oy), v(x + ox + w, y + oy + h), v(x + w, y + h)],
        [v(x, y), v(x + ox, y + oy), v(x + ox, y + oy + h), v(x, y + h)],
        [v(x, y), v(x + ox, y + oy), v(x + ox + w, y + oy), v(x + w, y)],
        [v(x, y), v(x + w, y), v(x + w, y + h), v(x, y + h)],
    ]
}

/// One or more sets of Euler angles in degrees, applied in order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AngleSets(Vec<Vector3D>);

impl AngleSets {
    /// Build from a flat `[x, y, z]` slice.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::InvalidAngleArray`] unless the slice holds
    /// exactly three values.
    pub fn from_flat(values: &[f64]) -> GeometryResult<Self> {
        match values {
            [x, y, z] => Ok(Self(vec![Vector3D::new(*x, *y, *z)])),
            _ => {
                tracing::debug!("Rejected angle array of length {}", values.len());
                Err(GeometryError::InvalidAngleArray(values.len()))
            }
        }
    }

    /// The angle sets.
    #[must_use]
    pub fn sets(&self) -> &[Vector3D] {
        &self.0
    }
}

impl Default for AngleSets {
    fn default() -> Self {
        Self(vec![Vector3D::new(0.0, 0.0, 30.0)])
    }
}

impl From<Vector3D> for AngleSets {
    fn from(angles: Vector3D) -> Self {
        Self(vec![angles])
    }
}

impl From<Vec<Vector3D>> for AngleSets {
    fn from(sets: Vec<Vector3D>) -> Self {
        Self(sets)
    }
}

impl From<Vec<[f64; 3]>> for AngleSets {
    fn from(sets: Vec<[f64; 3]>) -> Self {
        Self(sets.into_iter().map(Vector3D::from).collect())
    }
}

type Matrix3 = [[f64; 3]; 3];

fn multiply(a: &Matrix3, b: &Matrix3) -> Matrix3 {
    let mut out = [[0.0; 3]; 3];
    for (i, row) in out.iter_mut().enumerate() {
        for (j, cell) in row.iter_mut().enumerate() {
            *cell = (0..3).map(|k| a[i][k] * b[k][j]).sum();
        }
    }
    out
}

/// Combined `Rx · Ry · Rz` rotation for angles in degrees.
fn rotation_matrix(angles: &Vector3D) -> Matrix3 {
    let (sx, cx) = angles.x.to_radians().sin_cos();
    let (sy, cy) = angles.y.to_radians().sin_cos();
    let (sz, cz) = angles.z.to_radians().sin_cos();

    let rx = [[1.0, 0.0, 0.0], [0.0, cx, -sx], [0.0, sx, cx]];
    let ry = [[cy, 0.0, sy], [0.0, 1.0, 0.0], [-sy, 0.0, cy]];
    let rz = [[cz, -sz, 0.0], [sz, cz, 0.0], [0.0, 0.0, 1.0]];
    multiply(&multiply(&rx, &ry), &rz)
}

fn apply(m: &Matrix3, v: &Vector3D) -> Vector3D {
    Vector3D::new(
        v.x * m[0][0] + v.y * m[0][1] + v.z * m[0][2],
        v.x * m[1][0] + v.y * m[1][1] + v.z * m[1][2],
        v.x * m[2][0] + v.y * m[2][1] + v.z * m[2][2],
    )
}

/// A projected cuboid face.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectedFace {
    /// Index into [`CUBOID_FACES`], used to pick the face style.
    pub index: usize,
    /// Vertex indices of the corners.
    pub corners: [usize; 4],
    /// Average z of the rotated corners.
    pub depth: f64,
}

/// Result of [`project_cuboid`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectedCuboid {
    /// Projected vertices; `z` keeps the rotated depth.
    pub vertices: [Vector3D; 8],
    /// Faces sorted back to front.
    pub faces: Vec<ProjectedFace>,
}

impl ProjectedCuboid {
    /// Screen position of a vertex.
    #[must_use]
    pub fn point(&self, index: usize) -> Vector2D {
        let v = &self.vertices[index];
        Vector2D::new(v.x, v.y)
    }

    /// First face in drawing order that contains `vertex`.
    #[must_use]
    pub fn face_containing(&self, vertex: usize) -> Option<&ProjectedFace> {
        self.faces.iter().find(|f| f.corners.contains(&vertex))
    }
}

/// Rotate and project a cuboid standing on `plane`.
///
/// The cuboid is centered on the plane with the given `depth` (defaults to
/// half the plane width). Each angle set rotates all vertices around `pivot`,
/// given as fractions of the cuboid's extent. Vertices are projected with
/// `scale = 500 / (500 + z)` around the plane center and faces are sorted by
/// average depth, farthest first.
#[must_use]
pub fn project_cuboid(
    plane: &Rect,
    depth: Option<f64>,
    angles: &AngleSets,
    pivot: &Vector3D,
) -> ProjectedCuboid {
    let depth = depth.unwrap_or(plane.width / 2.0);
    let (hw, hh, hd) = (plane.width / 2.0, plane.height / 2.0, depth / 2.0);
    let center = plane.center();
    let pivot = Vector3D::new(
        (pivot.x - 0.5) * plane.width,
        (pivot.y - 0.5) * plane.height,
        (pivot.z - 0.5) * depth,
    );

    let mut vertices = [
        Vector3D::new(-hw, -hh, -hd),
        Vector3D::new(hw, -hh, -hd),
        Vector3D::new(hw, hh, -hd),
        Vector3D::new(-hw, hh, -hd),
        Vector3D::new(-hw, -hh, hd),
        Vector3D::new(hw, -hh, hd),
        Vector3D::new(hw, hh, hd),
        Vector3D::new(-hw, hh, hd),
    ];

    for set in angles.sets() {
        let m = rotation_matrix(set);
        for v in &mut vertices {
            let relative = Vector3D::new(v.x - pivot.x, v.y - pivot.y, v.z - pivot.z);
            let rotated = apply(&m, &relative);
            *v = Vector3D::new(rotated.x + pivot.x, rotated.y + pivot.y, rotated.z + pivot.z);
        }
    }

    for v in &mut vertices {
        let scale = PERSPECTIVE_DISTANCE / (PERSPECTIVE_DISTANCE + v.z);
        v.x = v.x * scale + center.raw_x();
        v.y = v.y * scale + center.raw_y();
    }

    let mut faces: Vec<ProjectedFace> = CUBOID_FACES
        .iter()
        .enumerate()
        .map(|(index, corners)| ProjectedFace {
            index,
            corners: *corners,
            depth: corners.iter().map(|&i| vertices[i].z).sum::<f64>() / 4.0,
        })
        .collect();
    faces.sort_by(|a, b| b.depth.total_cmp(&a.depth));

    tracing::trace!("Projected cuboid with {} angle sets", angles.sets().len());
    ProjectedCuboid { vertices, faces }
}
