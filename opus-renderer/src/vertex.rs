//! Point-sprite vertex generation.
//!
//! Strokes are drawn as dense runs of round point sprites. Each segment
//! between two recorded points is subdivided at roughly one canvas unit per
//! step, so a stroke's vertex count follows its length, not its point count.
//!
//! Everything here is plain CPU work: no GPU is needed to generate or
//! inspect the vertex stream.

use bytemuck::{Pod, Zeroable};
use opus_core::geometry::{distance, lerp};
use opus_core::{Projection, Rgba, StrokePoint, StrokeSnapshot, Vec2};

/// Canvas-space distance covered by one interpolation step.
pub const STEP_LENGTH: f32 = 1.0;

/// Smallest sprite diameter in pixels.
pub const MIN_POINT_SIZE: f32 = 1.0;

/// One point sprite: clip-space center, pixel diameter and color.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct StrokeVertex {
    /// Center in clip space.
    pub position: Vec2,
    /// Diameter in view pixels.
    pub size: f32,
    /// Straight (non-premultiplied) RGBA.
    pub color: [f32; 4],
}

impl StrokeVertex {
    /// Vertex attributes: position, size, color.
    #[cfg(feature = "gpu")]
    pub const ATTRIBUTES: [wgpu::VertexAttribute; 3] =
        wgpu::vertex_attr_array![0 => Float32x2, 1 => Float32, 2 => Float32x4];

    /// Buffer layout. One vertex per sprite instance.
    #[cfg(feature = "gpu")]
    #[must_use]
    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Self>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRIBUTES,
        }
    }

    /// Center in clip space.
    #[must_use]
    pub const fn center(&self) -> Vec2 {
        self.position
    }
}

/// Flat-colored vertex for the canvas background quad.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct QuadVertex {
    /// Corner in clip space.
    pub position: Vec2,
    /// RGBA.
    pub color: [f32; 4],
}

impl QuadVertex {
    /// Vertex attributes: position, color.
    #[cfg(feature = "gpu")]
    pub const ATTRIBUTES: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x2, 1 => Float32x4];

    /// Buffer layout. One vertex per triangle corner.
    #[cfg(feature = "gpu")]
    #[must_use]
    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Self>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// Per-frame uniform: the view size in pixels, used to turn sprite
/// diameters into clip-space offsets.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct ViewUniform {
    /// View width and height in pixels.
    pub view_size: [f32; 2],
    /// Padding to 16 bytes.
    pub _padding: [f32; 2],
}

impl ViewUniform {
    /// Uniform for a projection's view.
    #[must_use]
    pub fn new(projection: &Projection) -> Self {
        Self {
            view_size: [projection.view_size.width, projection.view_size.height],
            _padding: [0.0; 2],
        }
    }
}

/// Number of interpolation steps for a segment of the given length.
///
/// Zero-length segments (including the single point of a one-point stroke)
/// get zero steps and emit exactly one vertex.
#[must_use]
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
pub fn step_count(segment_length: f32) -> u32 {
    if segment_length <= 0.0 || segment_length.is_nan() {
        return 0;
    }
    let steps = (segment_length / STEP_LENGTH).floor();
    // saturates for very long segments
    (steps.min(u32::MAX as f32) as u32).max(1)
}

/// Sprite diameter in pixels for a stroke width, pressure and zoom.
#[must_use]
pub fn point_size(base_width: f32, pressure: f32, scale: f32) -> f32 {
    (base_width * pressure * scale).max(MIN_POINT_SIZE)
}

/// Generate point-sprite vertices for every stroke in the snapshot, in
/// snapshot order.
#[must_use]
pub fn generate_vertices(strokes: &StrokeSnapshot, projection: &Projection) -> Vec<StrokeVertex> {
    let mut vertices = Vec::new();
    append_vertices(&mut vertices, strokes, projection);
    vertices
}

/// Like [`generate_vertices`], but reuses an existing buffer.
pub fn append_vertices(
    out: &mut Vec<StrokeVertex>,
    strokes: &StrokeSnapshot,
    projection: &Projection,
) {
    let scale = projection.transform.scale();
    for stroke in strokes.iter() {
        let color = stroke.color.to_array();
        let mut emit = |a: &StrokePoint, b: &StrokePoint| {
            emit_segment(out, a, b, |position, pressure| StrokeVertex {
                position: projection.canvas_to_clip(position),
                size: point_size(stroke.base_width, pressure, scale),
                color,
            });
        };

        match stroke.points() {
            [] => {}
            [only] => emit(only, only),
            points => {
                for pair in points.windows(2) {
                    emit(&pair[0], &pair[1]);
                }
            }
        }
    }
}

fn emit_segment(
    out: &mut Vec<StrokeVertex>,
    a: &StrokePoint,
    b: &StrokePoint,
    make: impl Fn(Vec2, f32) -> StrokeVertex,
) {
    let steps = step_count(distance(a.position, b.position));
    if steps == 0 {
        out.push(make(a.position, a.pressure));
        return;
    }

    #[allow(clippy::cast_precision_loss)]
    let total = steps as f32;
    out.reserve(steps as usize + 1);
    for step in 0..=steps {
        #[allow(clippy::cast_precision_loss)]
        let t = step as f32 / total;
        let position = lerp(a.position, b.position, t);
        let pressure = a.pressure + (b.pressure - a.pressure) * t;
        out.push(make(position, pressure));
    }
}

/// The six clip-space corners (two triangles) covering the canvas bounds.
#[must_use]
pub fn background_quad(projection: &Projection, color: Rgba) -> [QuadVertex; 6] {
    let size = projection.canvas_size;
    let corner = |x: f32, y: f32| QuadVertex {
        position: projection.canvas_to_clip(Vec2::new(x, y)),
        color: [color.r, color.g, color.b, 1.0],
    };
    let top_left = corner(0.0, 0.0);
    let top_right = corner(size.width, 0.0);
    let bottom_left = corner(0.0, size.height);
    let bottom_right = corner(size.width, size.height);
    [
        top_left,
        bottom_left,
        top_right,
        top_right,
        bottom_left,
        bottom_right,
    ]
}
