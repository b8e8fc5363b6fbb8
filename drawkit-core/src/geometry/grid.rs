//! Rotated grids.

use crate::{GeometryError, GeometryResult, Rect, Vector2D};

/// A grid line segment.
pub type GridLine = (Vector2D, Vector2D);

/// Smallest accepted cell size and line spacing, in pixels.
pub const MIN_GRID_CELL: f64 = 1.0;

fn fitted(extent: f64, cell: f64) -> f64 {
    if extent <= 0.0 {
        cell
    } else {
        extent / (extent / cell).ceil()
    }
}

/// Line spacing `(x, y)` so that a whole number of cells spans the rotated
/// extent of a `width` × `height` area.
///
/// # Errors
///
/// Returns [`GeometryError::InvalidCellSize`] when `cell` is not finite or
/// smaller than [`MIN_GRID_CELL`].
pub fn grid_spacing(width: f64, height: f64, cell: f64, angle: f64) -> GeometryResult<(f64, f64)> {
    if !(cell.is_finite() && cell >= MIN_GRID_CELL) {
        tracing::debug!("Rejected grid cell size {cell}");
        return Err(GeometryError::InvalidCellSize(cell));
    }
    let (sin, cos) = angle.to_radians().sin_cos();
    let (sin, cos) = (sin.abs(), cos.abs());

    let extent_x = width * cos + height * sin;
    let extent_y = width * sin + height * cos;
    Ok((fitted(extent_x, cell), fitted(extent_y, cell)))
}

/// Lines of a grid covering `area`, in the area's unrotated frame.
///
/// Lines start on the area's top and left edges and extend past the area by
/// its diagonal on every side, so the grid still covers the area after being
/// rotated around its center. Horizontal lines come first.
///
/// # Errors
///
/// Returns [`GeometryError::InvalidCellSize`] when `cell` is rejected by
/// [`grid_spacing`], or when the area is so thin that the fitted spacing
/// drops below [`MIN_GRID_CELL`].
#[allow(clippy::cast_possible_truncation)]
pub fn grid_lines(area: &Rect, cell: f64, angle: f64) -> GeometryResult<Vec<GridLine>> {
    let (spacing_x, spacing_y) = grid_spacing(area.width, area.height, cell, angle)?;
    let spacing = spacing_x.min(spacing_y);
    if spacing < MIN_GRID_CELL {
        tracing::debug!("Rejected grid spacing {spacing} for cell size {cell}");
        return Err(GeometryError::InvalidCellSize(spacing));
    }
    let reach = area.width.hypot(area.height);
    let (left, top) = (area.x - reach, area.y - reach);
    let (right, bottom) = (area.right() + reach, area.bottom() + reach);

    let range = |extent: f64, spacing: f64| {
        let extra = (reach / spacing).ceil() as i64;
        let count = (extent / spacing).round() as i64;
        -extra..=count + extra
    };

    let mut lines = Vec::new();
    for i in range(area.height, spacing_y) {
        #[allow(clippy::cast_precision_loss)]
        let y = area.y + i as f64 * spacing_y;
        lines.push((Vector2D::new(left, y), Vector2D::new(right, y)));
    }
    for i in range(area.width, spacing_x) {
        #[allow(clippy::cast_precision_loss)]
        let x = area.x + i as f64 * spacing_x;
        lines.push((Vector2D::new(x, top), Vector2D::new(x, bottom)));
    }
    Ok(lines)
}
