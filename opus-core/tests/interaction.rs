//! Interaction Integration Tests
//!
//! Drives the engine through its public contract and checks the
//! history and view guarantees:
//! - undo/redo round trips
//! - redo invalidation on fresh input
//! - point spacing filter
//! - scale clamping
//! - auto-fit policy
//! - cancel leaving no trace

use opus_core::{
    CanvasEngine, CanvasEvent, CanvasTemplate, Command, EngineConfig, PointerEvent,
    PointerPhase, Rgba, Size, StrokeDocument, StrokeId, Tool, Vec2, MAX_SCALE, MIN_SCALE,
};

/// Engine with a 2048² canvas shown in a 1024² view (auto-fit scale 0.5).
fn engine() -> CanvasEngine {
    CanvasEngine::new(EngineConfig {
        canvas_size: Size::new(2048.0, 2048.0),
        view_size: Size::new(1024.0, 1024.0),
        ..EngineConfig::default()
    })
}

/// Draw a short horizontal stroke directly on a document.
fn commit_stroke(doc: &mut StrokeDocument, y: f32) -> StrokeId {
    let id = doc.begin_stroke(Vec2::new(0.0, y), 1.0, Rgba::BLACK, 8.0);
    doc.continue_stroke(Vec2::new(5.0, y), 0.8);
    doc.continue_stroke(Vec2::new(10.0, y), 0.6);
    doc.end_stroke();
    id
}

fn committed_ids(doc: &StrokeDocument) -> Vec<StrokeId> {
    doc.strokes().map(|s| s.id).collect()
}

fn pointer(phase: PointerPhase, x: f32, y: f32) -> CanvasEvent {
    CanvasEvent::Pointer(PointerEvent::new(phase, Vec2::new(x, y), Some(0.7)))
}

// ============================================================================
// History
// ============================================================================

#[test]
fn test_undo_all_then_redo_all_restores_history() {
    for n in 1..=6 {
        let mut doc = StrokeDocument::default();
        let mut y = 0.0;
        for _ in 0..n {
            commit_stroke(&mut doc, y);
            y += 20.0;
        }
        let before: Vec<_> = doc.strokes().cloned().collect();

        for _ in 0..n {
            doc.undo();
        }
        assert_eq!(doc.stroke_count(), 0);
        assert_eq!(doc.redo_stack().count(), n);

        for _ in 0..n {
            doc.redo();
        }
        let after: Vec<_> = doc.strokes().cloned().collect();
        assert_eq!(before, after, "history differs after {n} undo/redo pairs");
    }
}

#[test]
fn test_undo_preserves_order_on_both_sides() {
    let mut doc = StrokeDocument::default();
    let a = commit_stroke(&mut doc, 0.0);
    let b = commit_stroke(&mut doc, 20.0);
    let c = commit_stroke(&mut doc, 40.0);

    doc.undo();
    doc.undo();
    assert_eq!(committed_ids(&doc), vec![a]);
    let redo: Vec<_> = doc.redo_stack().map(|s| s.id).collect();
    assert_eq!(redo, vec![c, b]);

    doc.redo();
    assert_eq!(committed_ids(&doc), vec![a, b]);
}

#[test]
fn test_begin_after_undo_empties_redo() {
    let mut doc = StrokeDocument::default();
    commit_stroke(&mut doc, 0.0);
    commit_stroke(&mut doc, 20.0);
    doc.undo();
    doc.undo();
    assert!(doc.can_redo());

    let fresh = doc.begin_stroke(Vec2::new(1.0, 1.0), 1.0, Rgba::BLACK, 4.0);
    assert!(!doc.can_redo());

    doc.end_stroke();
    doc.redo();
    assert_eq!(committed_ids(&doc), vec![fresh]);
}

#[test]
fn test_cancel_leaves_history_and_redo_untouched() {
    let mut doc = StrokeDocument::default();
    commit_stroke(&mut doc, 0.0);
    commit_stroke(&mut doc, 20.0);
    doc.undo();
    let committed = committed_ids(&doc);
    let redo: Vec<StrokeId> = doc.redo_stack().map(|s| s.id).collect();
    assert_eq!(redo.len(), 1);

    doc.begin_stroke(Vec2::zero(), 1.0, Rgba::BLACK, 4.0);
    doc.continue_stroke(Vec2::new(3.0, 0.0), 1.0);
    doc.continue_stroke(Vec2::new(6.0, 0.0), 1.0);
    doc.cancel_stroke();

    assert_eq!(committed_ids(&doc), committed);
    assert_eq!(doc.redo_stack().map(|s| s.id).collect::<Vec<_>>(), redo);
    assert!(doc.current_stroke().is_none());
    assert_eq!(doc.snapshot().len(), committed.len());
}

#[test]
fn test_cancel_without_redo_history_changes_nothing() {
    let mut doc = StrokeDocument::default();
    commit_stroke(&mut doc, 0.0);
    let committed = committed_ids(&doc);

    doc.begin_stroke(Vec2::zero(), 1.0, Rgba::BLACK, 4.0);
    doc.continue_stroke(Vec2::new(3.0, 0.0), 1.0);
    doc.continue_stroke(Vec2::new(6.0, 0.0), 1.0);
    doc.cancel_stroke();

    assert_eq!(committed_ids(&doc), committed);
    assert!(!doc.can_redo());
}

// ============================================================================
// Spacing filter
// ============================================================================

#[test]
fn test_spacing_filter_threshold() {
    let mut doc = StrokeDocument::default();
    doc.begin_stroke(Vec2::new(100.0, 100.0), 1.0, Rgba::BLACK, 4.0);

    doc.continue_stroke(Vec2::new(100.2, 100.2), 1.0);
    doc.continue_stroke(Vec2::new(100.3, 100.0), 1.0);
    assert_eq!(doc.current_stroke().map(|s| s.len()), Some(1));

    doc.continue_stroke(Vec2::new(100.0, 100.5), 1.0);
    assert_eq!(doc.current_stroke().map(|s| s.len()), Some(2));

    doc.continue_stroke(Vec2::new(100.0, 103.0), 1.0);
    assert_eq!(doc.current_stroke().map(|s| s.len()), Some(3));
}

// ============================================================================
// View
// ============================================================================

#[test]
fn test_scale_stays_in_range_for_any_sequence() {
    let mut engine = engine();
    let factors = [0.5, 10.0, 10.0, 0.01, 0.0, -2.0, 1e9, 1e-9, 3.0, f32::NAN];
    for (i, factor) in factors.iter().enumerate() {
        if i % 2 == 0 {
            engine.zoom_by(*factor);
        } else {
            engine.set_scale(*factor);
        }
        let scale = engine.view().scale();
        assert!(
            (MIN_SCALE..=MAX_SCALE).contains(&scale),
            "scale {scale} out of range after {factor}"
        );
    }
}

#[test]
fn test_auto_fit_examples() {
    let mut engine = engine();
    let frame = engine.frame();
    assert!((frame.transform().scale() - 0.5).abs() < f32::EPSILON);
    assert_eq!(frame.transform().translation(), Vec2::zero());

    engine.set_view_size(Size::new(4096.0, 1024.0));
    let frame = engine.frame();
    assert!((frame.transform().scale() - 0.5).abs() < f32::EPSILON);
}

#[test]
fn test_auto_fit_follows_window_until_user_zooms() {
    let mut engine = engine();
    engine.frame();

    engine.set_view_size(Size::new(512.0, 512.0));
    assert!((engine.frame().transform().scale() - 0.25).abs() < f32::EPSILON);

    engine.zoom_by(2.0);
    engine.set_view_size(Size::new(2048.0, 2048.0));
    assert!((engine.frame().transform().scale() - 0.5).abs() < f32::EPSILON);

    engine.handle(&CanvasEvent::Command(Command::ResetView));
    assert!((engine.frame().transform().scale() - 1.0).abs() < f32::EPSILON);
}

#[test]
fn test_repeated_resize_is_idempotent() {
    let mut engine = engine();
    for _ in 0..3 {
        engine.handle(&CanvasEvent::ViewResized(Size::new(800.0, 600.0)));
    }
    let a = engine.frame().transform();
    engine.handle(&CanvasEvent::ViewResized(Size::new(800.0, 600.0)));
    let b = engine.frame().transform();
    assert_eq!(a, b);
}

// ============================================================================
// Full event flow
// ============================================================================

#[test]
fn test_event_stream_draws_and_undoes() {
    let mut engine = engine();
    engine.handle(&pointer(PointerPhase::Down, 100.0, 100.0));
    engine.handle(&pointer(PointerPhase::Move, 110.0, 100.0));
    engine.handle(&pointer(PointerPhase::Move, 110.1, 100.0));
    engine.handle(&pointer(PointerPhase::Up, 110.1, 100.0));

    let stroke = engine.document().strokes().next().expect("stroke committed");
    // 10 view px at 50% zoom = 20 canvas units; the 0.1 px nudge is 0.2 units.
    assert_eq!(stroke.len(), 2);
    assert!((stroke.points()[0].pressure - 0.7).abs() < f32::EPSILON);

    engine.handle(&CanvasEvent::Command(Command::Undo));
    assert_eq!(engine.document().stroke_count(), 0);
    engine.handle(&CanvasEvent::Command(Command::Redo));
    assert_eq!(engine.document().stroke_count(), 1);
}

#[test]
fn test_eraser_and_new_canvas_flow() {
    let mut engine = engine();
    engine.handle(&CanvasEvent::SelectTool(Tool::Eraser));
    engine.handle(&pointer(PointerPhase::Down, 10.0, 10.0));
    engine.handle(&pointer(PointerPhase::Up, 10.0, 10.0));
    assert_eq!(
        engine.document().strokes().next().map(|s| s.color),
        Some(engine.background())
    );

    engine.handle(&CanvasEvent::Command(Command::NewCanvas(CanvasTemplate::Poster)));
    assert_eq!(engine.document().stroke_count(), 0);
    assert_eq!(engine.document().canvas_size(), CanvasTemplate::Poster.size());
    assert!(engine.view().is_auto_fit());
}

#[test]
fn test_pointer_cancel_discards_stroke() {
    let mut engine = engine();
    engine.handle(&pointer(PointerPhase::Down, 10.0, 10.0));
    engine.handle(&pointer(PointerPhase::Move, 40.0, 10.0));
    engine.handle(&pointer(PointerPhase::Cancel, 40.0, 10.0));
    engine.handle(&pointer(PointerPhase::Up, 40.0, 10.0));

    assert_eq!(engine.document().stroke_count(), 0);
    assert!(engine.frame().strokes.is_empty());
}
