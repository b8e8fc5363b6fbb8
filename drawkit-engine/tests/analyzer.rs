//! Integration tests for the tracing engine (drawkit-engine analyzer).
//!
//! Drives [`TracingDrawEngine`] through the public API with a manual clock
//! and a collecting listener.

use std::cell::RefCell;
use std::rc::Rc;

use drawkit_core::{Rect, StylePass, Vector2D};
use drawkit_engine::registry::DEFAULT_ENGINE;
use drawkit_engine::{
    analyzed_draw_engine, AnalyzeEvent, AnalyzeReason, AnalyzerConfig, CallInfo, DrawEngine,
    DrawError, EngineRegistry, ManualClock, RecordingSurface, TracingDrawEngine,
};

type Events = Rc<RefCell<Vec<AnalyzeEvent>>>;

fn traced(config: AnalyzerConfig) -> (TracingDrawEngine<RecordingSurface>, ManualClock, Events) {
    let clock = ManualClock::new();
    let events: Events = Rc::default();
    let mut engine = analyzed_draw_engine(RecordingSurface::new(300.0, 300.0))
        .with_clock(clock.clone())
        .with_config(config);
    let sink = Rc::clone(&events);
    engine.set_analytic_listener(move |event| sink.borrow_mut().push(event.clone()));
    (engine, clock, events)
}

fn starts(events: &Events) -> Vec<(String, Option<usize>)> {
    events
        .borrow()
        .iter()
        .filter(|e| e.reason == AnalyzeReason::MethodStart)
        .map(|e| (e.call.method_name.clone(), e.depth))
        .collect()
}

// ==========================================================================
// Cycle end
// ==========================================================================

#[test]
fn test_debounced_cycle_end() {
    let (mut engine, clock, events) = traced(AnalyzerConfig::unfiltered());
    engine.start("").expect("started");
    clock.advance(10.0);
    engine
        .circle(&Vector2D::new(10.0, 10.0), 5.0, &StylePass::UseCurrent, &StylePass::Skip)
        .expect("draws");
    assert!(engine.has_pending_end());

    clock.advance(50.0);
    assert!(!engine.tick());

    clock.advance(60.0);
    assert!(engine.tick());
    assert!(!engine.tick());

    let cycle_ends: Vec<AnalyzeEvent> = events
        .borrow()
        .iter()
        .filter(|e| e.reason == AnalyzeReason::MethodEnd && e.call.method_name == "start")
        .cloned()
        .collect();
    assert_eq!(cycle_ends.len(), 1);
    assert_eq!(cycle_ends[0].call.end_time, Some(10.0));
    assert_eq!(cycle_ends[0].call.duration, Some(10.0));
    assert_eq!(cycle_ends[0].depth, None);
}

#[test]
fn test_new_root_call_postpones_cycle_end() {
    let (mut engine, clock, events) = traced(AnalyzerConfig::unfiltered());
    engine.start("").expect("started");
    for _ in 0..3 {
        clock.advance(80.0);
        engine.begin_path().expect("traced");
        assert!(!engine.tick());
    }
    clock.advance(100.0);
    assert!(engine.tick());

    let ends = events
        .borrow()
        .iter()
        .filter(|e| e.call.method_name == "start")
        .count();
    assert_eq!(ends, 1);
}

#[test]
fn test_cycle_end_disabled() {
    let config = AnalyzerConfig {
        check_loop_end: false,
        ..AnalyzerConfig::unfiltered()
    };
    let (mut engine, clock, _events) = traced(config);
    engine.start("").and_then(|e| e.cls()).expect("draws");
    clock.advance(500.0);
    assert!(!engine.has_pending_end());
    assert!(!engine.tick());
}

// ==========================================================================
// Self checks
// ==========================================================================

#[test]
fn test_endless_loop_guard() {
    let (mut engine, _clock, _events) = traced(AnalyzerConfig::unfiltered());
    engine.start("").expect("started");
    for _ in 0..5000 {
        engine.begin_path().expect("below threshold");
    }
    assert_eq!(engine.root_position(), 5000);
    assert_eq!(engine.begin_path().err(), Some(DrawError::EndlessLoop));
    assert!(engine.call_stack().is_empty());
    assert_eq!(engine.root_position(), 5000);
}

#[test]
fn test_restart_after_endless_loop() {
    let config = AnalyzerConfig {
        endless_loop_threshold: 2,
        ..AnalyzerConfig::unfiltered()
    };
    let (mut engine, clock, events) = traced(config);
    engine.start("").and_then(|e| e.cls()).and_then(|e| e.cls()).expect("draws");
    let err = engine
        .hexagon(&Vector2D::new(50.0, 50.0), 20.0, &"black".into(), &StylePass::Skip, 0.0)
        .err();
    assert_eq!(err, Some(DrawError::EndlessLoop));
    assert!(engine.call_stack().is_empty());

    events.borrow_mut().clear();
    engine
        .start("")
        .and_then(|e| e.hexagon(&Vector2D::new(50.0, 50.0), 20.0, &"black".into(), &StylePass::Skip, 0.0))
        .expect("draws after restart");
    assert!(engine.call_stack().is_empty());
    assert_eq!(engine.root_position(), 1);
    assert_eq!(starts(&events).first(), Some(&("hexagon".to_string(), Some(0))));

    clock.advance(200.0);
    assert!(engine.tick());
}

#[test]
fn test_start_resets_root_position() {
    let (mut engine, _clock, _events) = traced(AnalyzerConfig::unfiltered());
    engine.start("").and_then(|e| e.cls()).and_then(|e| e.cls()).expect("draws");
    assert_eq!(engine.root_position(), 2);
    engine.start("").expect("restarted");
    assert_eq!(engine.root_position(), 0);
}

#[test]
fn test_root_call_before_start() {
    let (mut engine, _clock, events) = traced(AnalyzerConfig::unfiltered());
    assert_eq!(engine.cls().err(), Some(DrawError::NotStarted));
    assert!(events.borrow().is_empty());
}

// ==========================================================================
// Depth filtering
// ==========================================================================

#[test]
fn test_depth_window_limits_nested_calls() {
    let (mut engine, _clock, events) = traced(AnalyzerConfig::unfiltered().with_depth_max(1));
    engine
        .start("")
        .and_then(|e| e.hexagon(&Vector2D::new(50.0, 50.0), 20.0, &"black".into(), &StylePass::Skip, 0.0))
        .expect("draws");
    assert_eq!(
        starts(&events),
        vec![("hexagon".to_string(), Some(0)), ("ngon".to_string(), Some(1))]
    );
}

#[test]
fn test_unlimited_depth_sees_primitives() {
    let (mut engine, _clock, events) = traced(AnalyzerConfig::unfiltered());
    engine
        .start("")
        .and_then(|e| e.hexagon(&Vector2D::new(50.0, 50.0), 20.0, &"black".into(), &StylePass::Skip, 0.0))
        .expect("draws");
    let names: Vec<String> = starts(&events).into_iter().map(|(name, _)| name).collect();
    assert_eq!(names, vec!["hexagon", "ngon", "save", "lines", "restore"]);
}

#[test]
fn test_min_depth_skips_roots() {
    let config = AnalyzerConfig {
        analyzing_depth_min: 1,
        ..AnalyzerConfig::unfiltered().with_depth_max(1)
    };
    let (mut engine, _clock, events) = traced(config);
    engine
        .start("")
        .and_then(|e| e.hexagon(&Vector2D::new(50.0, 50.0), 20.0, &"black".into(), &StylePass::Skip, 0.0))
        .expect("draws");
    assert_eq!(starts(&events), vec![("ngon".to_string(), Some(1))]);
}

#[test]
fn test_default_config_needs_debug_pointer() {
    let (mut engine, _clock, events) = traced(AnalyzerConfig::default());
    engine.start("").and_then(|e| e.cls()).expect("draws");
    assert!(starts(&events).is_empty());

    engine.set_debug_pointer(true);
    engine.cls().expect("draws");
    assert_eq!(starts(&events), vec![("cls".to_string(), Some(0))]);
}

// ==========================================================================
// Stack discipline
// ==========================================================================

#[test]
fn test_stack_is_balanced_after_nested_calls() {
    let (mut engine, _clock, _events) = traced(AnalyzerConfig::unfiltered());
    engine
        .start("")
        .and_then(|e| {
            e.rectangle(
                &Rect::new(0.0, 0.0, 10.0, 10.0),
                &"black".into(),
                &StylePass::Skip,
                30.0,
                &Vector2D::new(0.5, 0.5),
            )
        })
        .and_then(|e| e.hexagon(&Vector2D::new(50.0, 50.0), 20.0, &"black".into(), &StylePass::Skip, 0.0))
        .expect("draws");
    assert!(engine.call_stack().is_empty());
    assert_eq!(engine.context().map(RecordingSurface::save_depth), Some(0));
}

#[test]
fn test_mismatched_end_is_reported() {
    let (mut engine, _clock, _events) = traced(AnalyzerConfig::unfiltered());
    engine.start("").expect("started");
    engine
        .analyze(AnalyzeReason::MethodStart, CallInfo::new("circle"))
        .expect("pushed");
    let err = engine.analyze(AnalyzeReason::MethodEnd, CallInfo::new("rectangle"));
    assert_eq!(
        err,
        Err(DrawError::StackOutOfSync {
            expected: Some("circle".to_string()),
            found: "rectangle".to_string(),
        })
    );
    assert_eq!(engine.call_stack().depth(), 1);

    engine
        .analyze(AnalyzeReason::MethodEnd, CallInfo::new("circle"))
        .expect("popped");
    assert!(engine.call_stack().is_empty());
}

#[test]
fn test_failed_call_keeps_drawing() {
    let (mut engine, _clock, events) = traced(AnalyzerConfig::unfiltered());
    engine
        .start("")
        .and_then(|e| e.circle(&Vector2D::new(1.0, 1.0), -5.0, &StylePass::UseCurrent, &StylePass::Skip))
        .and_then(|e| e.cls())
        .expect("non-fatal errors are reported, not returned");

    let errors: Vec<AnalyzeEvent> = events
        .borrow()
        .iter()
        .filter(|e| e.reason == AnalyzeReason::MethodError)
        .cloned()
        .collect();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].call.method_name, "circle");
    assert!(engine.call_stack().is_empty());
}

// ==========================================================================
// Registry
// ==========================================================================

#[test]
fn test_registry_holds_tracing_engines() {
    let mut registry: EngineRegistry<TracingDrawEngine<RecordingSurface>> = EngineRegistry::new();
    registry
        .get_or_create_with(DEFAULT_ENGINE, || {
            let mut engine = analyzed_draw_engine(RecordingSurface::new(100.0, 100.0))
                .with_config(AnalyzerConfig::unfiltered());
            engine.start("")?;
            Ok::<_, DrawError>(engine)
        })
        .and_then(|engine| engine.cls().map(|_| ()))
        .expect("created and drawn");

    let engine = registry.get(DEFAULT_ENGINE).expect("registered");
    assert!(engine.is_started());
    assert_eq!(engine.root_position(), 1);
}
