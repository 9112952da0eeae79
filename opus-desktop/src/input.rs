//! Mapping from winit input to canvas events.
//!
//! Kept free of window state so the bindings can be tested directly.

use opus_core::{CanvasEvent, CanvasTemplate, Command, PointerEvent, PointerPhase, Tool, Vec2};
use winit::event::{MouseScrollDelta, TouchPhase};
use winit::keyboard::{Key, ModifiersState, NamedKey};

/// Pixels panned per wheel line.
pub const LINE_SCROLL_PIXELS: f32 = 40.0;

/// Zoom exponent per pixel of Ctrl/Cmd + wheel.
pub const WHEEL_ZOOM_RATE: f32 = 0.005;

/// Whether the platform command modifier (Cmd on macOS, Ctrl elsewhere) is held.
#[must_use]
pub fn command_held(modifiers: ModifiersState) -> bool {
    modifiers.super_key() || modifiers.control_key()
}

/// Abandons any stroke or pan drag in progress.
#[must_use]
pub fn cancel() -> CanvasEvent {
    CanvasEvent::Pointer(PointerEvent::new(PointerPhase::Cancel, Vec2::zero(), None))
}

/// Keyboard shortcut for a pressed key, if bound.
///
/// | Keys                  | Action        |
/// |-----------------------|---------------|
/// | Cmd/Ctrl + Z          | undo          |
/// | Cmd/Ctrl + Shift + Z  | redo          |
/// | Cmd/Ctrl + 0          | reset view    |
/// | Cmd/Ctrl + N          | new canvas    |
/// | B / E / I / H         | select tool   |
/// | Escape                | cancel stroke |
#[must_use]
pub fn shortcut(
    key: &Key,
    modifiers: ModifiersState,
    template: CanvasTemplate,
) -> Option<CanvasEvent> {
    if let Key::Named(NamedKey::Escape) = key {
        return Some(cancel());
    }

    let Key::Character(text) = key else {
        return None;
    };
    let ch = text.chars().next()?.to_ascii_lowercase();

    if command_held(modifiers) {
        let command = match ch {
            'z' if modifiers.shift_key() => Command::Redo,
            'z' => Command::Undo,
            '0' => Command::ResetView,
            'n' => Command::NewCanvas(template),
            _ => return None,
        };
        return Some(CanvasEvent::Command(command));
    }

    if modifiers.alt_key() {
        return None;
    }

    let tool = match ch {
        'b' => Tool::Brush,
        'e' => Tool::Eraser,
        'i' => Tool::ColorPicker,
        'h' => Tool::Pan,
        _ => return None,
    };
    Some(CanvasEvent::SelectTool(tool))
}

/// Wheel or trackpad scroll: pans, or zooms while Cmd/Ctrl is held.
#[must_use]
#[allow(clippy::cast_possible_truncation)] // Physical pixel deltas fit in f32
pub fn wheel(delta: MouseScrollDelta, modifiers: ModifiersState) -> Option<CanvasEvent> {
    let (dx, dy) = match delta {
        MouseScrollDelta::LineDelta(x, y) => (x * LINE_SCROLL_PIXELS, y * LINE_SCROLL_PIXELS),
        MouseScrollDelta::PixelDelta(pos) => (pos.x as f32, pos.y as f32),
    };

    if command_held(modifiers) {
        if dy.abs() < f32::EPSILON {
            return None;
        }
        return Some(CanvasEvent::Zoom {
            factor: (dy * WHEEL_ZOOM_RATE).exp(),
        });
    }

    if dx.abs() < f32::EPSILON && dy.abs() < f32::EPSILON {
        return None;
    }
    Some(CanvasEvent::Pan {
        delta: Vec2::new(dx, dy),
    })
}

/// Trackpad pinch: `delta` is the change in magnification.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn pinch(delta: f64) -> CanvasEvent {
    CanvasEvent::Zoom {
        factor: (1.0 + delta) as f32,
    }
}

/// Pointer phase for a touch or pen phase.
#[must_use]
pub const fn touch_phase(phase: TouchPhase) -> PointerPhase {
    match phase {
        TouchPhase::Started => PointerPhase::Down,
        TouchPhase::Moved => PointerPhase::Move,
        TouchPhase::Ended => PointerPhase::Up,
        TouchPhase::Cancelled => PointerPhase::Cancel,
    }
}

/// Follows one touch at a time so a second finger cannot join a stroke.
#[derive(Debug, Clone, Copy, Default)]
pub struct TouchTracker {
    active: Option<u64>,
}

impl TouchTracker {
    /// Pointer phase to forward for a touch event, or `None` when the event
    /// belongs to a finger other than the one drawing.
    pub fn track(&mut self, id: u64, phase: TouchPhase) -> Option<PointerPhase> {
        match phase {
            TouchPhase::Started if self.active.is_none() => {
                self.active = Some(id);
                Some(PointerPhase::Down)
            }
            _ if self.active != Some(id) => None,
            TouchPhase::Ended | TouchPhase::Cancelled => {
                self.active = None;
                Some(touch_phase(phase))
            }
            _ => Some(touch_phase(phase)),
        }
    }

    /// Forget the active touch.
    pub fn reset(&mut self) {
        self.active = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use opus_core::{CanvasEngine, EngineConfig, Stroke};
    use winit::dpi::PhysicalPosition;

    fn key(c: &str) -> Key {
        Key::Character(c.into())
    }

    #[test]
    fn test_undo_redo_shortcuts() {
        let template = CanvasTemplate::Square;
        assert_eq!(
            shortcut(&key("z"), ModifiersState::CONTROL, template),
            Some(CanvasEvent::Command(Command::Undo))
        );
        assert_eq!(
            shortcut(
                &key("Z"),
                ModifiersState::SUPER | ModifiersState::SHIFT,
                template
            ),
            Some(CanvasEvent::Command(Command::Redo))
        );
        assert_eq!(shortcut(&key("z"), ModifiersState::empty(), template), None);
    }

    #[test]
    fn test_view_and_canvas_shortcuts() {
        assert_eq!(
            shortcut(&key("0"), ModifiersState::SUPER, CanvasTemplate::Square),
            Some(CanvasEvent::Command(Command::ResetView))
        );
        assert_eq!(
            shortcut(&key("n"), ModifiersState::CONTROL, CanvasTemplate::Poster),
            Some(CanvasEvent::Command(Command::NewCanvas(CanvasTemplate::Poster)))
        );
    }

    #[test]
    fn test_tool_keys() {
        let none = ModifiersState::empty();
        let template = CanvasTemplate::Square;
        assert_eq!(
            shortcut(&key("e"), none, template),
            Some(CanvasEvent::SelectTool(Tool::Eraser))
        );
        assert_eq!(
            shortcut(&key("H"), none, template),
            Some(CanvasEvent::SelectTool(Tool::Pan))
        );
        assert_eq!(shortcut(&key("q"), none, template), None);
    }

    #[test]
    fn test_escape_cancels() {
        let event = shortcut(
            &Key::Named(NamedKey::Escape),
            ModifiersState::empty(),
            CanvasTemplate::Square,
        );
        assert!(matches!(
            event,
            Some(CanvasEvent::Pointer(PointerEvent {
                phase: PointerPhase::Cancel,
                ..
            }))
        ));
    }

    #[test]
    fn test_cancel_event_abandons_stroke() {
        let mut engine = CanvasEngine::new(EngineConfig::default());
        engine.handle(&CanvasEvent::Pointer(PointerEvent::new(
            PointerPhase::Down,
            Vec2::new(200.0, 200.0),
            None,
        )));
        assert!(engine.document().current_stroke().is_some());

        engine.handle(&cancel());
        assert!(engine.document().current_stroke().is_none());
        assert_eq!(engine.document().stroke_count(), 0);
    }

    #[test]
    fn test_wheel_pans_and_zooms() {
        let pan = wheel(MouseScrollDelta::LineDelta(0.0, -1.0), ModifiersState::empty());
        assert_eq!(
            pan,
            Some(CanvasEvent::Pan {
                delta: Vec2::new(0.0, -40.0)
            })
        );

        let zoom = wheel(
            MouseScrollDelta::PixelDelta(PhysicalPosition::new(0.0, 100.0)),
            ModifiersState::CONTROL,
        );
        match zoom {
            Some(CanvasEvent::Zoom { factor }) => assert!(factor > 1.0),
            other => panic!("expected zoom, got {other:?}"),
        }

        assert_eq!(
            wheel(MouseScrollDelta::LineDelta(0.0, 0.0), ModifiersState::empty()),
            None
        );
    }

    #[test]
    fn test_pinch_factor() {
        assert_eq!(pinch(0.25), CanvasEvent::Zoom { factor: 1.25 });
    }

    #[test]
    fn test_touch_tracker_follows_first_finger() {
        let mut touches = TouchTracker::default();
        assert_eq!(touches.track(1, TouchPhase::Started), Some(PointerPhase::Down));
        assert_eq!(touches.track(2, TouchPhase::Started), None);
        assert_eq!(touches.track(2, TouchPhase::Moved), None);
        assert_eq!(touches.track(2, TouchPhase::Ended), None);
        assert_eq!(touches.track(1, TouchPhase::Moved), Some(PointerPhase::Move));
        assert_eq!(touches.track(1, TouchPhase::Ended), Some(PointerPhase::Up));
        assert_eq!(touches.track(2, TouchPhase::Started), Some(PointerPhase::Down));
        assert_eq!(touches.track(2, TouchPhase::Cancelled), Some(PointerPhase::Cancel));
    }

    #[test]
    fn test_second_finger_does_not_extend_stroke() {
        let mut engine = CanvasEngine::new(EngineConfig::default());
        let mut touches = TouchTracker::default();
        let fingers = [
            (1, TouchPhase::Started, Vec2::new(100.0, 100.0)),
            (2, TouchPhase::Started, Vec2::new(800.0, 800.0)),
            (2, TouchPhase::Moved, Vec2::new(810.0, 800.0)),
            (2, TouchPhase::Ended, Vec2::new(810.0, 800.0)),
        ];
        for (id, phase, position) in fingers {
            if let Some(phase) = touches.track(id, phase) {
                engine.handle(&CanvasEvent::Pointer(PointerEvent::new(phase, position, None)));
            }
        }

        assert_eq!(engine.document().stroke_count(), 0);
        assert_eq!(engine.document().current_stroke().map(Stroke::len), Some(1));

        if let Some(phase) = touches.track(1, TouchPhase::Ended) {
            engine.handle(&CanvasEvent::Pointer(PointerEvent::new(
                phase,
                Vec2::new(100.0, 100.0),
                None,
            )));
        }
        let committed: Vec<usize> = engine.document().strokes().map(Stroke::len).collect();
        assert_eq!(committed, vec![1]);
    }
}
