//! Integration tests for the Canvas 2D engine (drawkit-engine).
//!
//! Drives the public [`DrawEngine`] API against a [`RecordingSurface`] and
//! checks the primitive calls that reach the surface.

use drawkit_core::{
    AngleSets, FaceStyles, GeometryUpdate, NgonBuilder, PositionUnit, Rect, StylePass, Vector2D,
    Vector3D,
};
use drawkit_engine::surface::{Paint, SurfaceCall};
use drawkit_engine::{draw_engine, Canvas2dEngine, DrawEngine, DrawError, RecordingSurface, Surface};

fn engine() -> Canvas2dEngine<RecordingSurface> {
    draw_engine(RecordingSurface::new(300.0, 300.0))
}

fn calls(engine: &Canvas2dEngine<RecordingSurface>) -> Vec<SurfaceCall> {
    engine
        .context()
        .map(|surface| surface.calls().to_vec())
        .unwrap_or_default()
}

fn fill_colors(calls: &[SurfaceCall]) -> Vec<String> {
    calls
        .iter()
        .filter_map(|c| match c {
            SurfaceCall::Fill {
                paint: Paint::Color(color),
                ..
            } => Some(color.clone()),
            _ => None,
        })
        .collect()
}

// ==========================================================================
// Primitive shapes
// ==========================================================================

#[test]
fn test_basic_rectangle() {
    let mut engine = engine();
    engine
        .rectangle(
            &Rect::new(10.0, 10.0, 50.0, 50.0),
            &"#000".into(),
            &"#fff".into(),
            0.0,
            &Vector2D::new(0.5, 0.5),
        )
        .expect("draws");

    let surface = engine.context().expect("bound");
    assert_eq!(surface.fill_count(), 1);
    assert_eq!(surface.stroke_count(), 1);
    assert!(surface.calls().contains(&SurfaceCall::Rect {
        x: 10.0,
        y: 10.0,
        width: 50.0,
        height: 50.0
    }));
    assert_eq!(fill_colors(surface.calls()), vec!["#fff".to_string()]);
    assert!(!surface
        .calls()
        .iter()
        .any(|c| matches!(c, SurfaceCall::Rotate { .. })));
}

#[test]
fn test_percent_rectangle_is_converted() {
    let mut engine = engine();
    engine
        .set_unit(PositionUnit::Percent)
        .and_then(|e| {
            e.rectangle(
                &Rect::new(50.0, 10.0, 10.0, 20.0),
                &StylePass::UseCurrent,
                &StylePass::Skip,
                0.0,
                &Vector2D::new(0.5, 0.5),
            )
        })
        .expect("draws");
    assert!(calls(&engine).contains(&SurfaceCall::Rect {
        x: 150.0,
        y: 30.0,
        width: 30.0,
        height: 60.0
    }));
}

#[test]
fn test_explicit_pixel_rect_ignores_percent_default() {
    let mut engine = engine();
    engine
        .set_unit(PositionUnit::Percent)
        .and_then(|e| e.select_rect(&Rect::new(1.0, 2.0, 3.0, 4.0).with_unit(PositionUnit::Px)))
        .expect("selects");
    assert_eq!(
        calls(&engine),
        vec![SurfaceCall::Rect {
            x: 1.0,
            y: 2.0,
            width: 3.0,
            height: 4.0
        }]
    );
}

#[test]
fn test_no_context_bound() {
    let mut engine = Canvas2dEngine::<RecordingSurface>::new();
    let err = engine
        .circle(&Vector2D::new(1.0, 1.0), 1.0, &StylePass::Skip, &StylePass::Skip)
        .err();
    assert_eq!(err, Some(DrawError::NoContextBound));

    engine
        .set_context(RecordingSurface::new(10.0, 10.0))
        .and_then(|e| e.circle(&Vector2D::new(1.0, 1.0), 1.0, &StylePass::Skip, &StylePass::Skip))
        .expect("bound now");
}

#[test]
fn test_draw_condition_is_a_no_op() {
    let mut engine = engine();
    engine
        .set_draw_condition(false)
        .and_then(|e| e.cls())
        .and_then(|e| e.hexagon(&Vector2D::new(50.0, 50.0), 10.0, &"red".into(), &"blue".into(), 0.0))
        .and_then(|e| e.grid(10.0, "#ccc", None, 0.0))
        .and_then(|e| e.text(&drawkit_engine::TextBox::at(Vector2D::zero()), "hi", None, None))
        .expect("gated calls succeed");
    assert!(calls(&engine).is_empty());

    engine
        .remove_draw_condition()
        .and_then(|e| e.cls())
        .expect("draws");
    assert_eq!(calls(&engine).len(), 1);
}

#[test]
fn test_donut_has_inner_hole() {
    let mut engine = engine();
    engine
        .donut(&Vector2D::new(100.0, 100.0), 40.0, 20.0, &StylePass::Skip, &"teal".into())
        .expect("draws");
    let arcs: Vec<(f64, bool)> = calls(&engine)
        .iter()
        .filter_map(|c| match c {
            SurfaceCall::Arc {
                radius,
                anticlockwise,
                ..
            } => Some((*radius, *anticlockwise)),
            _ => None,
        })
        .collect();
    assert_eq!(arcs, vec![(40.0, false), (20.0, true)]);
}

#[test]
fn test_negative_radius_is_reported() {
    let mut engine = engine();
    let err = engine
        .circle(&Vector2D::new(1.0, 1.0), -1.0, &StylePass::Skip, &StylePass::UseCurrent)
        .err();
    assert!(matches!(err, Some(DrawError::Surface(_))));
}

// ==========================================================================
// Composite shapes
// ==========================================================================

#[test]
fn test_ngon_closes_its_outline() {
    let mut engine = engine();
    engine
        .ngon(&Vector2D::new(100.0, 100.0), 50.0, 5, &"black".into(), &StylePass::Skip, 0.0)
        .expect("draws");
    let c = calls(&engine);
    let line_tos = c
        .iter()
        .filter(|c| matches!(c, SurfaceCall::LineTo { .. }))
        .count();
    assert_eq!(line_tos, 5);
    assert_eq!(c.first(), Some(&SurfaceCall::Save));
    assert_eq!(c.last(), Some(&SurfaceCall::Restore));
}

#[test]
fn test_ngon_rejects_zero_sides() {
    let mut engine = engine();
    let err = engine
        .ngon(&Vector2D::new(1.0, 1.0), 1.0, 0, &StylePass::Skip, &StylePass::Skip, 0.0)
        .err();
    assert!(matches!(err, Some(DrawError::Geometry(_))));
}

#[test]
fn test_cube_uses_one_style_per_face() {
    let mut engine = engine();
    let fills: Vec<StylePass> = ["a", "b", "c", "d", "e", "f"].into_iter().map(StylePass::from).collect();
    engine
        .cube(
            &Rect::new(50.0, 100.0, 40.0, 40.0),
            None,
            45.0,
            &"black".into(),
            &FaceStyles::from(fills),
        )
        .expect("draws");
    assert_eq!(fill_colors(&calls(&engine)), vec!["a", "b", "c", "d", "e", "f"]);
}

#[test]
fn test_cube3d_paints_back_to_front() {
    let mut engine = engine();
    let fills: Vec<StylePass> = ["front", "back", "s2", "s3", "s4", "s5"]
        .into_iter()
        .map(StylePass::from)
        .collect();
    engine
        .cube3d(
            &Rect::new(100.0, 100.0, 60.0, 60.0),
            Some(60.0),
            &AngleSets::from(Vector3D::new(0.0, 0.0, 0.0)),
            &"black".into(),
            &FaceStyles::from(fills),
            &Vector3D::new(0.5, 0.5, 0.5),
        )
        .expect("draws");

    let order = fill_colors(&calls(&engine));
    let back = order.iter().position(|c| c == "back").expect("back drawn");
    let front = order.iter().position(|c| c == "front").expect("front drawn");
    assert!(back < front);
    assert_eq!(order.first().map(String::as_str), Some("back"));
    assert_eq!(order.last().map(String::as_str), Some("front"));
}

#[test]
fn test_cube3d_wireframe_for_unfilled_faces() {
    let mut engine = engine();
    engine
        .cube3d(
            &Rect::new(100.0, 100.0, 60.0, 60.0),
            None,
            &AngleSets::default(),
            &"black".into(),
            &FaceStyles::default(),
            &Vector3D::new(0.5, 0.5, 0.5),
        )
        .expect("draws");
    let surface = engine.context().expect("bound");
    assert_eq!(surface.fill_count(), 0);
    // Six outlines plus four depth edges.
    assert_eq!(surface.stroke_count(), 10);
}

#[test]
fn test_geometry_store_is_drawn() {
    let store = NgonBuilder::new(Vector2D::new(100.0, 100.0), 20.0, 4)
        .with_styles("black".into(), "white".into())
        .build()
        .expect("valid ngon")
        .update(&GeometryUpdate::translate(Vector2D::new(10.0, 0.0)));
    let mut engine = engine();
    engine.geometry(&store).expect("draws");
    let surface = engine.context().expect("bound");
    assert_eq!(surface.fill_count(), 1);
    assert_eq!(surface.stroke_count(), 1);
    assert_eq!(surface.save_depth(), 0);
}

#[test]
fn test_conditional_filter() {
    let mut engine = engine();
    engine
        .set_conditional_filter(false, "blur(2px)")
        .expect("skipped");
    assert_eq!(engine.context().map(RecordingSurface::filter), Some("none"));
    engine
        .set_conditional_filter(true, "blur(2px)")
        .expect("applied");
    assert_eq!(engine.context().map(RecordingSurface::filter), Some("blur(2px)"));
}

// ==========================================================================
// Text, images and clipping
// ==========================================================================

#[test]
fn test_text_default_line_height_is_ascent() {
    let mut engine = engine();
    engine
        .text(
            &drawkit_engine::TextBox::at(Vector2D::new(0.0, 10.0)).wrapped(40.0),
            "abc def",
            None,
            None,
        )
        .expect("draws");
    let ys: Vec<f64> = calls(&engine)
        .iter()
        .filter_map(|c| match c {
            SurfaceCall::FillText { y, .. } => Some(*y),
            _ => None,
        })
        .collect();
    assert_eq!(ys, vec![10.0, 18.0]);
}

#[test]
fn test_image_from_offscreen() {
    let mut engine = engine();
    let label = {
        let surface = engine.context().expect("bound");
        let mut offscreen = draw_engine(surface.create_offscreen(20.0, 20.0).expect("offscreen"));
        offscreen
            .rectangle(
                &Rect::new(0.0, 0.0, 20.0, 20.0),
                &StylePass::Skip,
                &"red".into(),
                0.0,
                &Vector2D::new(0.5, 0.5),
            )
            .expect("draws");
        offscreen.into_surface().expect("bound").into_image()
    };
    engine
        .image(
            &label,
            &Rect::new(0.0, 0.0, 20.0, 20.0),
            Some(&Rect::new(10.0, 10.0, 40.0, 40.0)),
            0.0,
            &Vector2D::new(0.5, 0.5),
        )
        .expect("draws");
    let surface = engine.context().expect("bound");
    assert!(surface.calls().iter().any(|c| matches!(
        c,
        SurfaceCall::DrawImage { dst, image_calls, .. } if dst.width == 40.0 && *image_calls > 0
    )));
    assert_eq!(surface.save_depth(), 0);
}

#[test]
fn test_round_clip_is_compound() {
    let mut engine = engine();
    engine
        .clip_round_rect(
            &[Rect::new(0.0, 0.0, 20.0, 20.0), Rect::new(40.0, 0.0, 20.0, 20.0)],
            4.0,
        )
        .expect("clips");
    let c = calls(&engine);
    let curves = c
        .iter()
        .filter(|c| matches!(c, SurfaceCall::QuadraticCurveTo { .. }))
        .count();
    assert_eq!(curves, 8);
    assert_eq!(c.iter().filter(|c| matches!(c, SurfaceCall::Clip)).count(), 1);

    engine.reset_clip().expect("resets");
    assert_eq!(engine.context().map(RecordingSurface::save_depth), Some(0));
}

#[test]
fn test_composite_operation_validation() {
    let mut engine = engine();
    engine
        .set_global_composite_operation("multiply")
        .expect("known operation");
    assert!(engine.set_global_composite_operation("bogus").is_err());
    assert_eq!(
        engine.context().map(RecordingSurface::composite_operation),
        Some("multiply")
    );
}
