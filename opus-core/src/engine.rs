//! The canvas engine: owned document + view state behind the interaction contract.
//!
//! Hosts call the pointer, gesture and command methods (or feed
//! [`CanvasEvent`]s to [`CanvasEngine::handle`]) from a single thread, and
//! take a [`FrameSnapshot`] once per frame for rendering. Every method is
//! total: input that makes no sense for the current state is ignored.

use crate::geometry::is_finite;
use crate::{
    BrushSettings, CanvasEvent, CanvasTemplate, CanvasTransform, Command, DocumentPhase,
    PointerEvent, PointerPhase, Projection, Rgba, Size, StrokeDocument, StrokeSnapshot, Tool,
    Vec2, ViewTransform,
};

/// Initial engine settings.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Document size.
    pub canvas_size: Size,
    /// Initial on-screen surface size.
    pub view_size: Size,
    /// Canvas paper color, also recorded by the eraser.
    pub background: Rgba,
    /// Initial brush.
    pub brush: BrushSettings,
    /// Initial tool.
    pub tool: Tool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            canvas_size: CanvasTemplate::default().size(),
            view_size: Size::new(1280.0, 800.0),
            background: Rgba::CANVAS_BACKGROUND,
            brush: BrushSettings::default(),
            tool: Tool::default(),
        }
    }
}

/// Everything the renderer needs for one frame, captured at once.
#[derive(Debug, Clone)]
pub struct FrameSnapshot {
    /// Strokes in drawing order, in-progress stroke last.
    pub strokes: StrokeSnapshot,
    /// Transform and the view/canvas sizes it maps between.
    pub projection: Projection,
    /// Canvas paper color.
    pub background: Rgba,
}

impl FrameSnapshot {
    /// A frame with no strokes.
    #[must_use]
    pub fn empty(projection: Projection, background: Rgba) -> Self {
        Self {
            strokes: StrokeSnapshot::default(),
            projection,
            background,
        }
    }

    /// The transform in effect for this frame.
    #[must_use]
    pub fn transform(&self) -> CanvasTransform {
        self.projection.transform
    }
}

/// Summary for a heads-up display or inspector panel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewStatus {
    /// Zoom as a percentage.
    pub zoom_percent: f32,
    /// Current pan offset.
    pub translation: Vec2,
    /// Document size.
    pub canvas_size: Size,
    /// Committed strokes.
    pub stroke_count: usize,
    /// Whether undo is available.
    pub can_undo: bool,
    /// Whether redo is available.
    pub can_redo: bool,
    /// Active tool.
    pub tool: Tool,
}

impl std::fmt::Display for ViewStatus {
    #[allow(clippy::cast_possible_truncation)] // Display rounding only
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Scale: {:.1}% | Offset: x={}, y={} | Canvas: {} × {} px",
            self.zoom_percent,
            self.translation.x.round() as i64,
            self.translation.y.round() as i64,
            self.canvas_size.width.round() as i64,
            self.canvas_size.height.round() as i64,
        )
    }
}

/// Owns the stroke document, view transform and tool state of one canvas.
#[derive(Debug, Clone)]
pub struct CanvasEngine {
    document: StrokeDocument,
    view: ViewTransform,
    view_size: Size,
    tool: Tool,
    brush: BrushSettings,
    background: Rgba,
    /// Last pointer position of an in-progress pan-tool drag.
    pan_anchor: Option<Vec2>,
}

impl CanvasEngine {
    /// Create an engine from configuration.
    #[must_use]
    pub fn new(config: EngineConfig) -> Self {
        tracing::info!(
            "Canvas engine created: canvas {}x{}, view {}x{}",
            config.canvas_size.width,
            config.canvas_size.height,
            config.view_size.width,
            config.view_size.height
        );
        Self {
            document: StrokeDocument::new(config.canvas_size),
            view: ViewTransform::new(),
            view_size: config.view_size,
            tool: config.tool,
            brush: config.brush,
            background: config.background.clamped(),
            pan_anchor: None,
        }
    }

    // ---------------------------------------------------------------------
    // Pointer lifecycle
    // ---------------------------------------------------------------------

    /// Pointer pressed at a view-space position.
    pub fn begin_stroke(&mut self, view_position: Vec2, pressure: f32) {
        if !is_finite(view_position) {
            return;
        }
        self.refresh_fit();

        match self.tool {
            Tool::Brush | Tool::Eraser => {
                let color = if self.tool == Tool::Eraser {
                    self.background
                } else {
                    self.brush.stroke_color()
                };
                let position = self.projection().view_to_canvas(view_position);
                self.document
                    .begin_stroke(position, pressure, color, self.brush.size());
            }
            Tool::Pan => self.pan_anchor = Some(view_position),
            Tool::ColorPicker => {}
        }
    }

    /// Pointer dragged to a view-space position.
    pub fn continue_stroke(&mut self, view_position: Vec2, pressure: f32) {
        if !is_finite(view_position) {
            return;
        }

        if let Some(anchor) = self.pan_anchor {
            self.view.translate_by(view_position - anchor);
            self.pan_anchor = Some(view_position);
            return;
        }

        if self.document.phase() == DocumentPhase::Drawing {
            let position = self.projection().view_to_canvas(view_position);
            self.document.continue_stroke(position, pressure);
        }
    }

    /// Pointer released: commits any in-progress stroke.
    pub fn end_stroke(&mut self) {
        self.pan_anchor = None;
        self.document.end_stroke();
    }

    /// Pointer input interrupted: discards any in-progress stroke.
    pub fn cancel_stroke(&mut self) {
        self.pan_anchor = None;
        self.document.cancel_stroke();
    }

    // ---------------------------------------------------------------------
    // Gestures and commands
    // ---------------------------------------------------------------------

    /// Pan by a view-space delta. Disables auto-fit.
    pub fn pan_by(&mut self, delta: Vec2) {
        self.view.translate_by(delta);
    }

    /// Zoom by a multiplicative factor. Disables auto-fit.
    pub fn zoom_by(&mut self, factor: f32) {
        self.view.magnify_by(factor);
    }

    /// Set an absolute zoom factor. Disables auto-fit.
    pub fn set_scale(&mut self, scale: f32) {
        self.view.set_scale(scale);
    }

    /// Set an absolute pan offset. Disables auto-fit.
    pub fn set_translation(&mut self, translation: Vec2) {
        self.view.set_translation(translation);
    }

    /// Undo the last committed stroke.
    pub fn undo(&mut self) {
        self.document.undo();
    }

    /// Redo the last undone stroke.
    pub fn redo(&mut self) {
        self.document.redo();
    }

    /// Restore the identity view and re-enable auto-fit.
    pub fn reset_view(&mut self) {
        self.view.reset();
    }

    /// Change the document size; each axis optional, clamped to at least 1.
    pub fn resize_canvas(&mut self, width: Option<f32>, height: Option<f32>) {
        self.document.resize(width, height);
    }

    /// Switch tools. Ends any pan-tool drag.
    pub fn set_active_tool(&mut self, tool: Tool) {
        if tool != self.tool {
            tracing::debug!("Active tool: {tool}");
        }
        self.tool = tool;
        self.pan_anchor = None;
    }

    /// Record the on-screen surface size. Safe to call repeatedly.
    pub fn set_view_size(&mut self, size: Size) {
        self.view_size = size;
    }

    /// Discard all strokes and history, resize the canvas and reset the view.
    pub fn prepare_for_new_canvas(&mut self, canvas_size: Size) {
        tracing::info!(
            "New canvas {}x{}",
            canvas_size.width,
            canvas_size.height
        );
        self.document.clear();
        self.document
            .resize(Some(canvas_size.width), Some(canvas_size.height));
        self.view.reset();
        self.pan_anchor = None;
    }

    /// Dispatch an input event to the matching operation.
    pub fn handle(&mut self, event: &CanvasEvent) {
        match event {
            CanvasEvent::Pointer(pointer) => self.handle_pointer(pointer),
            CanvasEvent::Pan { delta } => self.pan_by(*delta),
            CanvasEvent::Zoom { factor } => self.zoom_by(*factor),
            CanvasEvent::Command(command) => match command {
                Command::Undo => self.undo(),
                Command::Redo => self.redo(),
                Command::ResetView => self.reset_view(),
                Command::NewCanvas(template) => self.prepare_for_new_canvas(template.size()),
            },
            CanvasEvent::SelectTool(tool) => self.set_active_tool(*tool),
            CanvasEvent::ResizeCanvas { width, height } => self.resize_canvas(*width, *height),
            CanvasEvent::ViewResized(size) => self.set_view_size(*size),
        }
    }

    fn handle_pointer(&mut self, pointer: &PointerEvent) {
        let pressure = pointer.effective_pressure();
        match pointer.phase {
            PointerPhase::Down => self.begin_stroke(pointer.position, pressure),
            PointerPhase::Move => self.continue_stroke(pointer.position, pressure),
            PointerPhase::Up => self.end_stroke(),
            PointerPhase::Cancel => self.cancel_stroke(),
        }
    }

    // ---------------------------------------------------------------------
    // Reading
    // ---------------------------------------------------------------------

    /// Apply auto-fit and capture everything needed to draw this frame.
    pub fn frame(&mut self) -> FrameSnapshot {
        self.refresh_fit();
        FrameSnapshot {
            strokes: self.document.snapshot(),
            projection: self.projection(),
            background: self.background,
        }
    }

    /// Current mapping between canvas, view and clip space.
    #[must_use]
    pub fn projection(&self) -> Projection {
        Projection::new(
            self.view.current(),
            self.view_size,
            self.document.canvas_size(),
        )
    }

    /// Status summary for UI display.
    #[must_use]
    pub fn status(&self) -> ViewStatus {
        ViewStatus {
            zoom_percent: self.view.scale() * 100.0,
            translation: self.view.translation(),
            canvas_size: self.document.canvas_size(),
            stroke_count: self.document.stroke_count(),
            can_undo: self.document.can_undo(),
            can_redo: self.document.can_redo(),
            tool: self.tool,
        }
    }

    /// The stroke document.
    #[must_use]
    pub fn document(&self) -> &StrokeDocument {
        &self.document
    }

    /// The view transform.
    #[must_use]
    pub fn view(&self) -> &ViewTransform {
        &self.view
    }

    /// Current view size.
    #[must_use]
    pub fn view_size(&self) -> Size {
        self.view_size
    }

    /// Active tool.
    #[must_use]
    pub fn tool(&self) -> Tool {
        self.tool
    }

    /// Brush settings.
    #[must_use]
    pub fn brush(&self) -> &BrushSettings {
        &self.brush
    }

    /// Mutable brush settings, for inspector controls.
    pub fn brush_mut(&mut self) -> &mut BrushSettings {
        &mut self.brush
    }

    /// Canvas paper color.
    #[must_use]
    pub fn background(&self) -> Rgba {
        self.background
    }

    fn refresh_fit(&mut self) {
        self.view
            .fit_to_view(self.view_size, self.document.canvas_size());
    }
}

impl Default for CanvasEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine_1024() -> CanvasEngine {
        CanvasEngine::new(EngineConfig {
            canvas_size: Size::new(2048.0, 2048.0),
            view_size: Size::new(1024.0, 1024.0),
            ..EngineConfig::default()
        })
    }

    #[test]
    fn test_pointer_positions_are_mapped_to_canvas_space() {
        let mut engine = engine_1024();
        // Auto-fit puts the canvas at 50%, centered: view center = canvas center.
        engine.begin_stroke(Vec2::new(512.0, 512.0), 1.0);
        let stroke = engine.document().current_stroke().expect("drawing");
        assert_eq!(stroke.points()[0].position, Vec2::new(1024.0, 1024.0));

        engine.continue_stroke(Vec2::new(522.0, 512.0), 1.0);
        let stroke = engine.document().current_stroke().expect("drawing");
        assert_eq!(stroke.points()[1].position, Vec2::new(1044.0, 1024.0));
    }

    #[test]
    fn test_eraser_records_background_color() {
        let mut engine = engine_1024();
        engine.set_active_tool(Tool::Eraser);
        engine.begin_stroke(Vec2::new(10.0, 10.0), 1.0);
        engine.end_stroke();

        let stroke = engine.document().strokes().next().expect("committed");
        assert_eq!(stroke.color, Rgba::CANVAS_BACKGROUND);
    }

    #[test]
    fn test_brush_records_brush_color_and_size() {
        let mut engine = engine_1024();
        engine.brush_mut().set_size(30.0);
        engine.begin_stroke(Vec2::new(10.0, 10.0), 1.0);
        engine.end_stroke();

        let stroke = engine.document().strokes().next().expect("committed");
        assert_eq!(stroke.color, engine.brush().stroke_color());
        assert!((stroke.base_width - 30.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_color_picker_ignores_pointer() {
        let mut engine = engine_1024();
        engine.set_active_tool(Tool::ColorPicker);
        engine.begin_stroke(Vec2::new(10.0, 10.0), 1.0);
        engine.continue_stroke(Vec2::new(50.0, 10.0), 1.0);
        engine.end_stroke();

        assert_eq!(engine.document().stroke_count(), 0);
        assert!(engine.view().is_auto_fit());
    }

    #[test]
    fn test_pan_tool_drags_translate_view() {
        let mut engine = engine_1024();
        engine.set_active_tool(Tool::Pan);
        engine.begin_stroke(Vec2::new(100.0, 100.0), 1.0);
        engine.continue_stroke(Vec2::new(130.0, 90.0), 1.0);
        engine.continue_stroke(Vec2::new(140.0, 90.0), 1.0);
        engine.end_stroke();

        assert_eq!(engine.view().translation(), Vec2::new(40.0, -10.0));
        assert!(!engine.view().is_auto_fit());
        assert_eq!(engine.document().stroke_count(), 0);

        // Drag is over: further moves do nothing.
        engine.continue_stroke(Vec2::new(500.0, 500.0), 1.0);
        assert_eq!(engine.view().translation(), Vec2::new(40.0, -10.0));
    }

    #[test]
    fn test_frame_applies_auto_fit() {
        let mut engine = engine_1024();
        let frame = engine.frame();
        assert!((frame.transform().scale() - 0.5).abs() < f32::EPSILON);
        assert_eq!(frame.transform().translation(), Vec2::zero());
        assert!(frame.strokes.is_empty());
    }

    #[test]
    fn test_frame_is_unaffected_by_later_mutation() {
        let mut engine = engine_1024();
        engine.begin_stroke(Vec2::new(10.0, 10.0), 1.0);
        let frame = engine.frame();

        engine.zoom_by(3.0);
        engine.end_stroke();
        engine.undo();

        assert_eq!(frame.strokes.len(), 1);
        assert!((frame.transform().scale() - 0.5).abs() < f32::EPSILON);
    }

    #[test]
    fn test_prepare_for_new_canvas_resets_everything() {
        let mut engine = engine_1024();
        engine.begin_stroke(Vec2::new(10.0, 10.0), 1.0);
        engine.end_stroke();
        engine.begin_stroke(Vec2::new(20.0, 10.0), 1.0);
        engine.end_stroke();
        engine.undo();
        engine.pan_by(Vec2::new(30.0, 30.0));

        engine.prepare_for_new_canvas(CanvasTemplate::Hd.size());

        assert_eq!(engine.document().stroke_count(), 0);
        assert!(!engine.document().can_redo());
        assert!(engine.view().is_auto_fit());
        assert_eq!(engine.view().current(), CanvasTransform::IDENTITY);
        assert_eq!(engine.document().canvas_size(), Size::new(1920.0, 1080.0));
    }

    #[test]
    fn test_handle_dispatches_events() {
        let mut engine = engine_1024();
        let down = PointerEvent::new(PointerPhase::Down, Vec2::new(100.0, 100.0), None);
        let up = PointerEvent::new(PointerPhase::Up, Vec2::new(100.0, 100.0), None);

        engine.handle(&CanvasEvent::Pointer(down));
        engine.handle(&CanvasEvent::Pointer(up));
        assert_eq!(engine.document().stroke_count(), 1);

        engine.handle(&CanvasEvent::Command(Command::Undo));
        assert!(engine.status().can_redo);

        // Auto-fit left the view at 50%.
        engine.handle(&CanvasEvent::Zoom { factor: 2.0 });
        assert!((engine.view().scale() - 1.0).abs() < f32::EPSILON);

        engine.handle(&CanvasEvent::ResizeCanvas {
            width: Some(-5.0),
            height: None,
        });
        assert!((engine.document().canvas_size().width - 1.0).abs() < f32::EPSILON);

        engine.handle(&CanvasEvent::SelectTool(Tool::Pan));
        assert_eq!(engine.tool(), Tool::Pan);
    }

    #[test]
    fn test_non_finite_pointer_positions_are_ignored() {
        let mut engine = engine_1024();
        engine.begin_stroke(Vec2::new(f32::NAN, 0.0), 1.0);
        assert!(engine.document().current_stroke().is_none());

        engine.begin_stroke(Vec2::new(10.0, 10.0), 1.0);
        engine.continue_stroke(Vec2::new(f32::INFINITY, 0.0), 1.0);
        assert_eq!(engine.document().current_stroke().map(crate::Stroke::len), Some(1));
    }

    #[test]
    fn test_status_display() {
        let mut engine = engine_1024();
        engine.frame();
        assert_eq!(
            engine.status().to_string(),
            "Scale: 50.0% | Offset: x=0, y=0 | Canvas: 2048 × 2048 px"
        );
    }
}
