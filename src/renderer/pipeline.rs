//! WebGPU render pipeline setup

use super::vertex::{Vertex, colors};
use crate::consts::{FIELD_HEIGHT, FIELD_WIDTH};

/// Fraction of the viewport the field covers on each axis
fn field_scale(width: u32, height: u32) -> (f32, f32) {
    let viewport_aspect = width.max(1) as f32 / height.max(1) as f32;
    let field_aspect = FIELD_WIDTH / FIELD_HEIGHT;

    if viewport_aspect > field_aspect {
        // Bars left and right
        (field_aspect / viewport_aspect, 1.0)
    } else {
        // Bars top and bottom
        (1.0, viewport_aspect / field_aspect)
    }
}

/// Map a playfield point (y down) into clip space
///
/// The field keeps its aspect ratio inside a `width` x `height` viewport;
/// the leftover strip on one axis is letterboxed.
pub fn field_to_ndc(x: f32, y: f32, width: u32, height: u32) -> (f32, f32) {
    let (sx, sy) = field_scale(width, height);
    let nx = (x / FIELD_WIDTH * 2.0 - 1.0) * sx;
    let ny = (1.0 - y / FIELD_HEIGHT * 2.0) * sy;
    (nx, ny)
}

/// Pixel rectangle `(x, y, w, h)` the field occupies in the viewport
///
/// Used as the scissor so entities entering or leaving the field never
/// draw over the bars.
pub fn field_pixel_rect(width: u32, height: u32) -> (u32, u32, u32, u32) {
    let (sx, sy) = field_scale(width, height);
    let w = ((width as f32 * sx).round() as u32).clamp(1, width.max(1));
    let h = ((height as f32 * sy).round() as u32).clamp(1, height.max(1));
    let x = (width.saturating_sub(w)) / 2;
    let y = (height.saturating_sub(h)) / 2;
    (x, y, w, h)
}

/// Smallest vertex buffer ever allocated (in vertices)
const MIN_VERTEX_CAPACITY: usize = 4096;

fn create_vertex_buffer(device: &wgpu::Device, capacity: usize) -> wgpu::Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("scene_vertices"),
        size: (capacity * std::mem::size_of::<Vertex>()) as wgpu::BufferAddress,
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

/// Pass-through pipeline drawing flat-colored triangle lists
fn create_scene_pipeline(
    device: &wgpu::Device,
    format: wgpu::TextureFormat,
) -> wgpu::RenderPipeline {
    let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("scene_shader"),
        source: wgpu::ShaderSource::Wgsl(include_str!("shader.wgsl").into()),
    });

    let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("scene_layout"),
        bind_group_layouts: &[],
        immediate_size: 0,
    });

    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some("scene_pipeline"),
        layout: Some(&layout),
        vertex: wgpu::VertexState {
            module: &shader,
            entry_point: Some("vs_main"),
            buffers: &[Vertex::desc()],
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: &shader,
            entry_point: Some("fs_main"),
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: Default::default(),
        }),
        // Shapes are emitted with mixed winding
        primitive: wgpu::PrimitiveState {
            cull_mode: None,
            ..Default::default()
        },
        depth_stencil: None,
        multisample: wgpu::MultisampleState::default(),
        multiview_mask: None,
        cache: None,
    })
}

/// GPU side of the web front-end
pub struct RenderState {
    pub surface: wgpu::Surface<'static>,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    pipeline: wgpu::RenderPipeline,
    vertex_buffer: wgpu::Buffer,
    /// Buffer size in vertices
    vertex_capacity: usize,
    /// Reused between frames
    scratch: Vec<Vertex>,
    /// Viewport size in pixels
    pub size: (u32, u32),
}

impl RenderState {
    pub async fn new(
        surface: wgpu::Surface<'static>,
        adapter: &wgpu::Adapter,
        width: u32,
        height: u32,
    ) -> Result<Self, wgpu::RequestDeviceError> {
        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("space-flappy-device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::downlevel_webgl2_defaults(),
                memory_hints: Default::default(),
                trace: Default::default(),
                experimental_features: Default::default(),
            })
            .await?;

        let caps = surface.get_capabilities(adapter);
        let format = caps
            .formats
            .iter()
            .copied()
            .find(wgpu::TextureFormat::is_srgb)
            .unwrap_or(caps.formats[0]);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width,
            height,
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let pipeline = create_scene_pipeline(&device, format);
        let vertex_buffer = create_vertex_buffer(&device, MIN_VERTEX_CAPACITY);
        log::info!("Render pipeline ready ({:?}, {}x{})", format, width, height);

        Ok(Self {
            surface,
            device,
            queue,
            config,
            pipeline,
            vertex_buffer,
            vertex_capacity: MIN_VERTEX_CAPACITY,
            scratch: Vec::with_capacity(MIN_VERTEX_CAPACITY),
            size: (width, height),
        })
    }

    pub fn resize(&mut self, new_width: u32, new_height: u32) {
        if new_width > 0 && new_height > 0 {
            self.size = (new_width, new_height);
            self.config.width = new_width;
            self.config.height = new_height;
            self.surface.configure(&self.device, &self.config);
        }
    }

    /// Map the scene to clip space and copy it into the vertex buffer,
    /// growing the buffer when the scene outgrows it
    fn upload(&mut self, vertices: &[Vertex]) {
        let (w, h) = self.size;
        self.scratch.clear();
        self.scratch.extend(vertices.iter().map(|v| {
            let (x, y) = field_to_ndc(v.position[0], v.position[1], w, h);
            Vertex::new(x, y, v.color)
        }));

        if self.scratch.len() > self.vertex_capacity {
            self.vertex_capacity = self.scratch.len().next_power_of_two();
            self.vertex_buffer = create_vertex_buffer(&self.device, self.vertex_capacity);
            log::debug!("Vertex buffer grown to {} vertices", self.vertex_capacity);
        }
        if !self.scratch.is_empty() {
            self.queue
                .write_buffer(&self.vertex_buffer, 0, bytemuck::cast_slice(&self.scratch));
        }
    }

    /// Upload a playfield-space scene and draw it
    pub fn render(&mut self, vertices: &[Vertex]) -> Result<(), wgpu::SurfaceError> {
        self.upload(vertices);
        let vertex_count = self.scratch.len() as u32;

        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("scene_encoder"),
            });

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("scene_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(colors::LETTERBOX),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            if vertex_count > 0 {
                let (x, y, w, h) = field_pixel_rect(self.size.0, self.size.1);
                pass.set_scissor_rect(x, y, w, h);
                pass.set_pipeline(&self.pipeline);
                pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
                pass.draw(0..vertex_count, 0..1);
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: (f32, f32), b: (f32, f32)) -> bool {
        (a.0 - b.0).abs() < 1e-5 && (a.1 - b.1).abs() < 1e-5
    }

    #[test]
    fn test_exact_aspect_fills_viewport() {
        assert!(close(field_to_ndc(0.0, 0.0, 288, 512), (-1.0, 1.0)));
        assert!(close(
            field_to_ndc(FIELD_WIDTH, FIELD_HEIGHT, 576, 1024),
            (1.0, -1.0)
        ));
        assert!(close(field_to_ndc(144.0, 256.0, 288, 512), (0.0, 0.0)));
    }

    #[test]
    fn test_wide_viewport_is_pillarboxed() {
        // 1024x512 is four times wider than the field relative to height
        let (x, y) = field_to_ndc(FIELD_WIDTH, 0.0, 1024, 512);
        assert!((x - 0.28125).abs() < 1e-5);
        assert!((y - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_tall_viewport_is_letterboxed() {
        let (x, y) = field_to_ndc(0.0, 0.0, 288, 1024);
        assert!((x + 1.0).abs() < 1e-5);
        assert!((y - 0.5).abs() < 1e-5);
    }

    #[test]
    fn test_scissor_matches_field_edges() {
        // Pillarbox: field is 288 px wide centered in 1024
        assert_eq!(field_pixel_rect(1024, 512), (368, 0, 288, 512));
        // Letterbox: field is 512 px tall centered in 1024
        assert_eq!(field_pixel_rect(288, 1024), (0, 256, 288, 512));
        assert_eq!(field_pixel_rect(576, 1024), (0, 0, 576, 1024));
    }

    #[test]
    fn test_spawned_hazard_lies_outside_scissor() {
        let (w, h) = (1024, 512);
        let (x, _, sw, _) = field_pixel_rect(w, h);
        let to_px = |ndc: f32| (ndc + 1.0) / 2.0 * w as f32;

        let (right_edge, _) = field_to_ndc(FIELD_WIDTH, 0.0, w, h);
        assert!((to_px(right_edge) - (x + sw) as f32).abs() < 0.5);

        let (spawn, _) = field_to_ndc(FIELD_WIDTH + 10.0, 0.0, w, h);
        assert!(to_px(spawn) > (x + sw) as f32);
        let (exit, _) = field_to_ndc(-25.0, 0.0, w, h);
        assert!(to_px(exit) < x as f32);
    }
}
