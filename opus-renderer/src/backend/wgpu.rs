//! WebGPU/wgpu rendering backend.
//!
//! Draws each frame in a single render pass: clear to the workspace color,
//! one opaque quad for the canvas paper, then every stroke sprite as an
//! instanced quad with source-over alpha blending.

use std::sync::Arc;

use opus_core::Rgba;
use winit::window::Window;

use crate::vertex::{QuadVertex, StrokeVertex, ViewUniform};
use crate::{BackendType, FramePlan, RenderError, RenderResult, RendererConfig};

use super::RenderBackend;

/// Corners per sprite instance (two triangles).
const SPRITE_CORNERS: u32 = 6;

/// wgpu-based GPU renderer bound to one window surface.
pub struct WgpuBackend {
    surface: Option<wgpu::Surface<'static>>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    surface_config: wgpu::SurfaceConfiguration,
    background_pipeline: wgpu::RenderPipeline,
    sprite_pipeline: wgpu::RenderPipeline,
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    quad_buffer: wgpu::Buffer,
    sprite_buffer: wgpu::Buffer,
    sprite_capacity: usize,
    max_sprite_capacity: usize,
    clear_color: Rgba,
}

impl WgpuBackend {
    /// Create the instance, surface, device and pipelines for `window`.
    ///
    /// # Errors
    ///
    /// Returns an error if no adapter, device or surface can be acquired, or
    /// if the shaders fail validation. Nothing is kept on failure.
    pub fn from_window(window: Arc<Window>, config: &RendererConfig) -> RenderResult<Self> {
        pollster::block_on(Self::initialize(window, config))
    }

    async fn initialize(window: Arc<Window>, config: &RendererConfig) -> RenderResult<Self> {
        let size = window.inner_size();
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance
            .create_surface(window)
            .map_err(|e| RenderError::Surface(e.to_string()))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or(RenderError::NoAdapter)?;

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("Opus Canvas Device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::downlevel_webgl2_defaults()
                        .using_resolution(adapter.limits()),
                    memory_hints: wgpu::MemoryHints::default(),
                },
                None,
            )
            .await
            .map_err(|e| RenderError::GpuInit(e.to_string()))?;

        tracing::info!(
            "wgpu backend initialized with adapter: {:?}",
            adapter.get_info()
        );

        let mut surface_config = surface
            .get_default_config(&adapter, size.width.max(1), size.height.max(1))
            .ok_or_else(|| {
                RenderError::Surface("Surface is not supported by the adapter".to_string())
            })?;
        // stroke colors are already sRGB-encoded
        let caps = surface.get_capabilities(&adapter);
        if let Some(format) = caps.formats.iter().copied().find(|f| !f.is_srgb()) {
            surface_config.format = format;
        }
        surface_config.present_mode = if config.vsync {
            wgpu::PresentMode::AutoVsync
        } else {
            wgpu::PresentMode::AutoNoVsync
        };
        surface.configure(&device, &surface_config);
        tracing::debug!(
            "Surface configured: {}x{} {:?}",
            surface_config.width,
            surface_config.height,
            surface_config.format
        );

        device.push_error_scope(wgpu::ErrorFilter::Validation);
        let pipelines = Pipelines::new(&device, surface_config.format);
        if let Some(error) = device.pop_error_scope().await {
            return Err(RenderError::Shader(error.to_string()));
        }

        let max_sprite_capacity = sprite_limit(device.limits().max_buffer_size);
        let sprite_capacity = config.initial_sprite_capacity.clamp(1, max_sprite_capacity);
        let sprite_buffer = create_sprite_buffer(&device, sprite_capacity);
        let quad_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("canvas_quad_buffer"),
            size: std::mem::size_of::<[QuadVertex; 6]>() as wgpu::BufferAddress,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        Ok(Self {
            surface: Some(surface),
            device,
            queue,
            surface_config,
            background_pipeline: pipelines.background,
            sprite_pipeline: pipelines.sprite,
            uniform_buffer: pipelines.uniform_buffer,
            bind_group: pipelines.bind_group,
            quad_buffer,
            sprite_buffer,
            sprite_capacity,
            max_sprite_capacity,
            clear_color: config.clear_color,
        })
    }

    /// Current surface size in physical pixels.
    #[must_use]
    pub fn size(&self) -> (u32, u32) {
        (self.surface_config.width, self.surface_config.height)
    }

    /// Sprites the vertex buffer can hold before it is regrown.
    #[must_use]
    pub fn sprite_capacity(&self) -> usize {
        self.sprite_capacity
    }

    fn ensure_sprite_capacity(&mut self, needed: usize) {
        if needed <= self.sprite_capacity || self.sprite_capacity == self.max_sprite_capacity {
            return;
        }
        let capacity = grown_capacity(needed, self.max_sprite_capacity);
        tracing::debug!(
            "Growing sprite buffer from {} to {} sprites",
            self.sprite_capacity,
            capacity
        );
        self.sprite_buffer = create_sprite_buffer(&self.device, capacity);
        self.sprite_capacity = capacity;
    }

    fn wgpu_clear_color(&self) -> wgpu::Color {
        let Rgba { r, g, b, a } = self.clear_color;
        wgpu::Color {
            r: f64::from(r),
            g: f64::from(g),
            b: f64::from(b),
            a: f64::from(a),
        }
    }

    /// Encode and submit one pass: the background (on the clearing pass
    /// only) followed by `sprites`.
    fn draw_batch(
        &self,
        view: &wgpu::TextureView,
        load: wgpu::LoadOp<wgpu::Color>,
        plan: &FramePlan,
        sprites: &[StrokeVertex],
    ) -> RenderResult<()> {
        let instances = u32::try_from(sprites.len())
            .map_err(|_| RenderError::Frame("Too many sprites for one draw".to_string()))?;
        let draw_background = matches!(load, wgpu::LoadOp::Clear(_)) && plan.background.is_some();

        if !sprites.is_empty() {
            self.queue
                .write_buffer(&self.sprite_buffer, 0, bytemuck::cast_slice(sprites));
        }

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("canvas_encoder"),
            });

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("canvas_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load,
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            pass.set_bind_group(0, &self.bind_group, &[]);

            if draw_background {
                pass.set_pipeline(&self.background_pipeline);
                pass.set_vertex_buffer(0, self.quad_buffer.slice(..));
                pass.draw(0..6, 0..1);
            }

            if instances > 0 {
                let bytes = std::mem::size_of_val(sprites) as wgpu::BufferAddress;
                pass.set_pipeline(&self.sprite_pipeline);
                pass.set_vertex_buffer(0, self.sprite_buffer.slice(..bytes));
                pass.draw(0..SPRITE_CORNERS, 0..instances);
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        Ok(())
    }

    fn acquire_frame(&self) -> RenderResult<Option<wgpu::SurfaceTexture>> {
        let Some(surface) = &self.surface else {
            return Ok(None);
        };
        match surface.get_current_texture() {
            Ok(frame) => Ok(Some(frame)),
            Err(wgpu::SurfaceError::Outdated | wgpu::SurfaceError::Lost) => {
                tracing::debug!("Surface outdated, reconfiguring");
                surface.configure(&self.device, &self.surface_config);
                Ok(None)
            }
            Err(wgpu::SurfaceError::Timeout) => {
                tracing::warn!("Timed out acquiring surface texture, skipping frame");
                Ok(None)
            }
            Err(e) => Err(RenderError::Surface(e.to_string())),
        }
    }
}

impl RenderBackend for WgpuBackend {
    fn backend_type(&self) -> BackendType {
        BackendType::WebGpu
    }

    fn render(&mut self, plan: &FramePlan) -> RenderResult<()> {
        self.ensure_sprite_capacity(plan.strokes.len());

        let Some(frame) = self.acquire_frame()? else {
            tracing::trace!("No surface texture available, skipping render");
            return Ok(());
        };
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        self.queue
            .write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(&plan.uniform));
        if let Some(quad) = &plan.background {
            self.queue
                .write_buffer(&self.quad_buffer, 0, bytemuck::cast_slice(quad));
        }

        // Histories larger than the sprite buffer are drawn in several
        // passes; each batch is uploaded and submitted before the next.
        let mut batches = plan.strokes.chunks(self.sprite_capacity);
        let first = batches.next().unwrap_or_default();
        self.draw_batch(&view, wgpu::LoadOp::Clear(self.wgpu_clear_color()), plan, first)?;
        let mut batch_count = 1;
        for batch in batches {
            self.draw_batch(&view, wgpu::LoadOp::Load, plan, batch)?;
            batch_count += 1;
        }
        frame.present();

        tracing::trace!(
            "wgpu frame: {} sprites in {} batches, viewport {}x{}",
            plan.strokes.len(),
            batch_count,
            self.surface_config.width,
            self.surface_config.height
        );
        Ok(())
    }

    fn resize(&mut self, width: u32, height: u32) -> RenderResult<()> {
        if width == 0 || height == 0 {
            return Ok(());
        }
        self.surface_config.width = width;
        self.surface_config.height = height;
        if let Some(surface) = &self.surface {
            surface.configure(&self.device, &self.surface_config);
        }
        tracing::debug!("wgpu resized to {}x{}", width, height);
        Ok(())
    }

    fn set_clear_color(&mut self, color: Rgba) {
        self.clear_color = color;
    }

    fn drop_surface(&mut self) {
        if self.surface.take().is_some() {
            tracing::debug!("wgpu surface dropped");
        }
    }

    fn has_surface(&self) -> bool {
        self.surface.is_some()
    }
}

/// Pipelines and the shared view uniform.
struct Pipelines {
    background: wgpu::RenderPipeline,
    sprite: wgpu::RenderPipeline,
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

impl Pipelines {
    fn new(device: &wgpu::Device, format: wgpu::TextureFormat) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("canvas_shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("../shaders/canvas.wgsl").into()),
        });

        let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("view_uniform_buffer"),
            size: std::mem::size_of::<ViewUniform>() as wgpu::BufferAddress,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("view_bind_group_layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("view_bind_group"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("canvas_pipeline_layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let background = create_pipeline(
            device,
            &PipelineDesc {
                label: "background_pipeline",
                layout: &layout,
                shader: &shader,
                vertex_entry: "vs_background",
                fragment_entry: "fs_background",
                buffer: QuadVertex::layout(),
                format,
                blend: wgpu::BlendState::REPLACE,
            },
        );

        let sprite = create_pipeline(
            device,
            &PipelineDesc {
                label: "sprite_pipeline",
                layout: &layout,
                shader: &shader,
                vertex_entry: "vs_sprite",
                fragment_entry: "fs_sprite",
                buffer: StrokeVertex::layout(),
                format,
                blend: wgpu::BlendState::ALPHA_BLENDING,
            },
        );

        Self {
            background,
            sprite,
            uniform_buffer,
            bind_group,
        }
    }
}

struct PipelineDesc<'a> {
    label: &'static str,
    layout: &'a wgpu::PipelineLayout,
    shader: &'a wgpu::ShaderModule,
    vertex_entry: &'static str,
    fragment_entry: &'static str,
    buffer: wgpu::VertexBufferLayout<'static>,
    format: wgpu::TextureFormat,
    blend: wgpu::BlendState,
}

fn create_pipeline(device: &wgpu::Device, desc: &PipelineDesc<'_>) -> wgpu::RenderPipeline {
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(desc.label),
        layout: Some(desc.layout),
        vertex: wgpu::VertexState {
            module: desc.shader,
            entry_point: Some(desc.vertex_entry),
            buffers: &[desc.buffer.clone()],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: desc.shader,
            entry_point: Some(desc.fragment_entry),
            targets: &[Some(wgpu::ColorTargetState {
                format: desc.format,
                blend: Some(desc.blend),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            cull_mode: None,
            ..Default::default()
        },
        depth_stencil: None,
        multisample: wgpu::MultisampleState::default(),
        multiview: None,
        cache: None,
    })
}

/// Most sprites a single vertex buffer may hold under `max_buffer_size`.
fn sprite_limit(max_buffer_size: u64) -> usize {
    let per_sprite = std::mem::size_of::<StrokeVertex>() as u64;
    usize::try_from(max_buffer_size / per_sprite)
        .unwrap_or(usize::MAX)
        .max(1)
}

/// Next power of two at or above `needed`, never above `limit`.
fn grown_capacity(needed: usize, limit: usize) -> usize {
    needed
        .checked_next_power_of_two()
        .unwrap_or(limit)
        .min(limit)
}

fn create_sprite_buffer(device: &wgpu::Device, capacity: usize) -> wgpu::Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("sprite_buffer"),
        size: (capacity * std::mem::size_of::<StrokeVertex>()) as wgpu::BufferAddress,
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}
