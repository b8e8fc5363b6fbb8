//! Composite shapes built from primitive [`DrawEngine`] operations.
//!
//! Each function checks the draw condition first and only calls public engine
//! operations, so a tracing engine records the nested calls.

use drawkit_core::{
    cube_faces, ngon_vertices, project_cuboid, AngleSets, BodyType, FaceStyles, GeometryStore,
    PositionUnit, Rect, StylePass, Vector2D, Vector3D, DEPTH_EDGES,
};

use super::{DrawEngine, DEFAULT_LINE_WIDTH};
use crate::DrawResult;

/// Tag an already converted point so it is not converted again.
fn px(point: Vector2D) -> Vector2D {
    point.with_unit(PositionUnit::Px)
}

/// Draw a closed outline through `corners` as one polyline.
fn outline<E: DrawEngine + ?Sized>(
    engine: &mut E,
    corners: &[Vector2D],
    stroke: &StylePass,
    fill: &StylePass,
) -> DrawResult<()> {
    let Some((first, rest)) = corners.split_first() else {
        return Ok(());
    };
    let mut destinations = rest.to_vec();
    destinations.push(first.clone());
    engine.lines(first, &destinations, stroke, fill, DEFAULT_LINE_WIDTH)?;
    Ok(())
}

/// Regular hexagon.
///
/// # Errors
///
/// Propagates errors from [`DrawEngine::ngon`].
pub fn hexagon<E: DrawEngine + ?Sized>(
    engine: &mut E,
    position: &Vector2D,
    radius: f64,
    stroke: &StylePass,
    fill: &StylePass,
    angle: f64,
) -> DrawResult<()> {
    engine.ngon(position, radius, 6, stroke, fill, angle)?;
    Ok(())
}

/// Regular polygon around `position`; the radius scales like a width.
///
/// # Errors
///
/// Returns an error without a bound surface or for zero sides.
pub fn ngon<E: DrawEngine + ?Sized>(
    engine: &mut E,
    position: &Vector2D,
    radius: f64,
    sides: u32,
    stroke: &StylePass,
    fill: &StylePass,
    angle: f64,
) -> DrawResult<()> {
    if !engine.draw_condition() {
        return Ok(());
    }
    let converter = engine.converter()?;
    let center = converter.vector(position);
    let radius = converter.scalar(radius);
    let vertices: Vec<Vector2D> = ngon_vertices(&center, radius, sides, angle)?
        .into_iter()
        .map(px)
        .collect();

    if let Some((first, rest)) = vertices.split_first() {
        engine
            .save()?
            .lines(first, rest, stroke, fill, DEFAULT_LINE_WIDTH)?
            .restore()?;
    }
    Ok(())
}

/// 2.5D cube: six faces drawn back to front, each with its own fill.
///
/// # Errors
///
/// Returns an error without a bound surface.
pub fn cube<E: DrawEngine + ?Sized>(
    engine: &mut E,
    plane: &Rect,
    depth: Option<f64>,
    tilt: f64,
    stroke: &StylePass,
    fills: &FaceStyles,
) -> DrawResult<()> {
    if !engine.draw_condition() {
        return Ok(());
    }
    let converter = engine.converter()?;
    let plane = converter.rect(plane);
    let depth = depth.map(|d| converter.scalar(d));

    for (index, face) in cube_faces(&plane, depth, tilt).into_iter().enumerate() {
        let corners: Vec<Vector2D> = face.into_iter().map(px).collect();
        outline(engine, &corners, stroke, &fills.for_face(index))?;
    }
    Ok(())
}

/// Perspective cuboid. Faces are painted farthest first; depth edges touching
/// an unfilled face are drawn as wireframe lines.
///
/// # Errors
///
/// Returns an error without a bound surface.
pub fn cube3d<E: DrawEngine + ?Sized>(
    engine: &mut E,
    plane: &Rect,
    depth: Option<f64>,
    angles: &AngleSets,
    stroke: &StylePass,
    fills: &FaceStyles,
    pivot: &Vector3D,
) -> DrawResult<()> {
    if !engine.draw_condition() {
        return Ok(());
    }
    let converter = engine.converter()?;
    let plane = converter.rect(plane);
    let depth = depth.map(|d| converter.scalar(d));
    let cuboid = project_cuboid(&plane, depth, angles, pivot);

    for face in &cuboid.faces {
        let corners: Vec<Vector2D> = face.corners.iter().map(|&i| px(cuboid.point(i))).collect();
        outline(engine, &corners, stroke, &fills.for_face(face.index))?;
    }

    let unfilled = |vertex: usize| {
        cuboid
            .face_containing(vertex)
            .map_or(true, |face| !fills.for_face(face.index).is_drawn())
    };
    for [from, to] in DEPTH_EDGES {
        if unfilled(from) || unfilled(to) {
            engine.lines(
                &px(cuboid.point(from)),
                &[px(cuboid.point(to))],
                stroke,
                &StylePass::Skip,
                DEFAULT_LINE_WIDTH,
            )?;
        }
    }
    Ok(())
}

/// Set the filter when `condition` holds.
///
/// # Errors
///
/// Propagates errors from [`DrawEngine::set_filter`].
pub fn conditional_filter<E: DrawEngine + ?Sized>(
    engine: &mut E,
    condition: bool,
    filter: &str,
) -> DrawResult<()> {
    if condition {
        engine.set_filter(filter)?;
    }
    Ok(())
}

/// Draw a [`GeometryStore`]: polygon edges as a filled and stroked outline,
/// circles around the store position.
///
/// # Errors
///
/// Returns an error without a bound surface.
pub fn geometry<E: DrawEngine + ?Sized>(engine: &mut E, store: &GeometryStore) -> DrawResult<()> {
    if !engine.draw_condition() {
        return Ok(());
    }
    match store.body_type {
        BodyType::Circle => {
            engine.circle(
                &store.position,
                store.radius(),
                &store.stroke_style,
                &store.fill_style,
            )?;
        }
        BodyType::Ngon => {
            if let Some((first, rest)) = store.edges.split_first() {
                engine
                    .save()?
                    .lines(first, rest, &store.stroke_style, &store.fill_style, DEFAULT_LINE_WIDTH)?
                    .restore()?;
            }
        }
    }
    Ok(())
}
