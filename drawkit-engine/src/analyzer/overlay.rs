//! Debug overlay: outlines of traced shapes and pointer labels.

use drawkit_core::{Body, PositionUnit, Rect, StylePass, Vector2D};

use super::config::AnalyzerConfig;
use crate::engine::{Canvas2dEngine, DrawEngine};
use crate::surface::Surface;
use crate::DrawResult;

/// Outline color of traced polygons.
pub const OVERLAY_COLOR: &str = "#ff0000";
/// Outline width of traced polygons.
pub const OVERLAY_LINE_WIDTH: f64 = 3.0;

const LABEL_WIDTH: f64 = 100.0;
const LABEL_HEIGHT: f64 = 70.0;

/// Render the two-state position label: idle on top, focused below.
pub(super) fn build_label<S: Surface>(surface: &S) -> DrawResult<S::Image> {
    let offscreen = surface.create_offscreen(LABEL_WIDTH, LABEL_HEIGHT * 2.0)?;
    let mut engine = Canvas2dEngine::with_surface(offscreen);
    let center = Vector2D::new(0.5, 0.5);
    engine
        .rectangle(
            &Rect::new(0.0, 0.0, LABEL_WIDTH, LABEL_HEIGHT),
            &"black".into(),
            &"white".into(),
            0.0,
            &center,
        )?
        .rectangle(
            &Rect::new(0.0, LABEL_HEIGHT, LABEL_WIDTH, LABEL_HEIGHT),
            &"black".into(),
            &"red".into(),
            0.0,
            &center,
        )?;
    tracing::debug!("Built overlay position label");
    engine
        .into_surface()
        .map(Surface::into_image)
        .ok_or(crate::DrawError::NoContextBound)
}

fn pointer_distance(point: &Vector2D, pointer: &Vector2D) -> f64 {
    (point.x() - pointer.x()).hypot(point.y() - pointer.y())
}

/// Draw `bodies` on `engine` in pixel units.
pub(super) fn draw_bodies<S: Surface>(
    engine: &mut Canvas2dEngine<S>,
    bodies: &[Body],
    pointer: &Vector2D,
    label: Option<&S::Image>,
    config: &AnalyzerConfig,
) -> DrawResult<()> {
    let unit = engine.unit();
    engine.set_unit(PositionUnit::Px)?;
    let drawn = bodies
        .iter()
        .try_for_each(|body| draw_body(engine, body, pointer, label, config));
    engine.set_unit(unit)?;
    drawn
}

fn draw_body<S: Surface>(
    engine: &mut Canvas2dEngine<S>,
    body: &Body,
    pointer: &Vector2D,
    label: Option<&S::Image>,
    config: &AnalyzerConfig,
) -> DrawResult<()> {
    match body {
        Body::Polygon(points) => {
            let Some((first, rest)) = points.split_first() else {
                return Ok(());
            };
            engine.lines(
                first,
                rest,
                &StylePass::color(OVERLAY_COLOR),
                &StylePass::Skip,
                OVERLAY_LINE_WIDTH,
            )?;
            let Some(label) = label else {
                return Ok(());
            };
            for point in points {
                let distance = pointer_distance(point, pointer);
                if distance > config.label_radius {
                    continue;
                }
                let src_y = if distance < config.label_focus_radius {
                    LABEL_HEIGHT
                } else {
                    0.0
                };
                engine.image(
                    label,
                    &Rect::new(0.0, src_y, LABEL_WIDTH, LABEL_HEIGHT),
                    Some(&Rect::new(point.x() - 30.0, point.y() - 35.0, 60.0, 30.0)),
                    0.0,
                    &Vector2D::new(0.5, 0.5),
                )?;
            }
        }
        Body::Circle { center, radius } => {
            engine.circle(center, *radius, &StylePass::color("red"), &StylePass::Skip)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::{RecordingSurface, SurfaceCall};

    #[test]
    fn test_label_has_two_states() {
        let surface = RecordingSurface::new(10.0, 10.0);
        let label = build_label(&surface).expect("label renders");
        assert_eq!(label.width, 100.0);
        assert_eq!(label.height, 140.0);
        assert_eq!(
            label
                .calls
                .iter()
                .filter(|c| matches!(c, SurfaceCall::Fill { .. }))
                .count(),
            2
        );
    }

    #[test]
    fn test_labels_near_pointer_only() {
        let mut engine = Canvas2dEngine::with_surface(RecordingSurface::new(200.0, 200.0));
        let label = build_label(engine.context().expect("bound")).expect("label renders");
        let body = Body::rect(0.0, 0.0, 100.0, 100.0);

        draw_bodies(
            &mut engine,
            &[body],
            &Vector2D::new(5.0, 0.0),
            Some(&label),
            &AnalyzerConfig::default(),
        )
        .expect("draws");

        let images: Vec<(Rect, Rect)> = engine
            .context()
            .expect("bound")
            .calls()
            .iter()
            .filter_map(|c| match c {
                SurfaceCall::DrawImage { src, dst, .. } => Some((src.clone(), dst.clone())),
                _ => None,
            })
            .collect();
        // (0,0) appears twice in the closed outline, both within the focus radius.
        assert_eq!(images.len(), 2);
        assert!(images.iter().all(|(src, _)| src.y == 70.0));
        assert_eq!(images[0].1.x, -30.0);
    }

    #[test]
    fn test_circle_marker() {
        let mut engine = Canvas2dEngine::with_surface(RecordingSurface::new(200.0, 200.0));
        engine.set_unit(PositionUnit::Percent).expect("applies");
        draw_bodies(
            &mut engine,
            &[Body::Circle {
                center: Vector2D::new(10.0, 10.0).with_unit(PositionUnit::Px),
                radius: 4.0,
            }],
            &Vector2D::zero(),
            None,
            &AnalyzerConfig::default(),
        )
        .expect("draws");
        let surface = engine.context().expect("bound");
        assert_eq!(surface.stroke_count(), 1);
        assert_eq!(surface.fill_count(), 0);
        assert!(surface.calls().iter().any(|c| matches!(
            c,
            SurfaceCall::Arc { radius, .. } if (*radius - 4.0).abs() < f64::EPSILON
        )));
        assert_eq!(engine.unit(), PositionUnit::Percent);
    }
}
