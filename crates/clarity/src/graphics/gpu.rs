//! # GPU Backend — winit Window, wgpu Renderer
//!
//! [`WgpuBackend`] owns the event loop and drives it in *pump* mode: the
//! engine's own loop calls [`poll_events`](RenderBackend::poll_events) once
//! per tick instead of handing control to winit.
//!
//! ```text
//! initialize ── EventLoop::new ── pump ──► resumed: create window, device, pipeline
//! update     ── close_requested? ── pump ──► window_event: close / resize / keys
//! render     ── begin_frame: acquire surface texture
//!               draw × N:    upload mesh/texture on first use, queue uniforms
//!               end_frame:   write uniforms, one render pass, submit, present
//! terminate  ── shutdown: drop caches, pipeline, device, window
//! ```
//!
//! ## Resource Caches
//!
//! Vertex/index buffers are keyed by mesh name and texture bind groups by
//! texture path, the same keys the libraries use. They live until
//! `shutdown`, however many components come and go in between.
//!
//! ## Per-Object Uniforms
//!
//! Every draw in a frame gets one slot in a dynamic uniform buffer. Slots are
//! `min_uniform_buffer_offset_alignment` apart and each draw binds group 2
//! at its slot's offset.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use wgpu::util::DeviceExt;
use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::platform::pump_events::{EventLoopExtPumpEvents, PumpStatus};
use winit::window::{Window, WindowId};

use super::backend::{DrawItem, FrameSetup, RenderBackend};
use super::mesh::MeshData;
use super::texture::TextureData;
use super::vertex::{FrameUniform, ObjectUniform, Vertex};
use crate::config::WindowConfig;
use crate::error::GraphicsError;
use crate::input::SharedKeyboard;
use crate::math::Mat4;

const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// How many times `initialize` pumps the loop waiting for the window.
const STARTUP_PUMPS: usize = 16;

// ── Device ──────────────────────────────────────────────────────────────

struct Gpu {
    device: wgpu::Device,
    queue: wgpu::Queue,
    surface: wgpu::Surface<'static>,
    surface_config: wgpu::SurfaceConfiguration,
}

impl Gpu {
    fn new(window: Arc<Window>) -> Result<Self, GraphicsError> {
        let size = window.inner_size();
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor::default());
        let surface = instance.create_surface(window)?;

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::default(),
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .map_err(|err| GraphicsError::AdapterUnavailable(err.to_string()))?;

        let (device, queue) = pollster::block_on(adapter.request_device(&wgpu::DeviceDescriptor {
            label: Some("clarity device"),
            required_features: wgpu::Features::empty(),
            required_limits: wgpu::Limits::default(),
            ..Default::default()
        }))?;

        let caps = surface.get_capabilities(&adapter);
        let format = caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or_else(|| caps.formats.first())
            .copied()
            .ok_or_else(|| GraphicsError::AdapterUnavailable("surface reports no formats".into()))?;

        let surface_config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &surface_config);
        log::info!(
            "GPU ready: {} ({:?}), surface {}x{} {:?}",
            adapter.get_info().name,
            adapter.get_info().backend,
            surface_config.width,
            surface_config.height,
            format
        );

        Ok(Self {
            device,
            queue,
            surface,
            surface_config,
        })
    }

    fn resize(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.surface_config.width = width;
            self.surface_config.height = height;
            self.surface.configure(&self.device, &self.surface_config);
        }
    }

    fn size(&self) -> (u32, u32) {
        (self.surface_config.width, self.surface_config.height)
    }
}

// ── Pipeline ────────────────────────────────────────────────────────────

struct Renderer {
    pipeline: wgpu::RenderPipeline,
    frame_buffer: wgpu::Buffer,
    frame_bind_group: wgpu::BindGroup,
    texture_layout: wgpu::BindGroupLayout,
    sampler: wgpu::Sampler,
    object_layout: wgpu::BindGroupLayout,
    object_buffer: wgpu::Buffer,
    object_bind_group: wgpu::BindGroup,
    object_capacity: usize,
    depth_view: wgpu::TextureView,
    depth_size: (u32, u32),
}

fn uniform_entry(binding: u32, visibility: wgpu::ShaderStages, dynamic: bool) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Uniform,
            has_dynamic_offset: dynamic,
            min_binding_size: None,
        },
        count: None,
    }
}

impl Renderer {
    fn new(gpu: &Gpu) -> Self {
        let device = &gpu.device;

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("clarity shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shader.wgsl").into()),
        });

        let frame_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("frame layout"),
            entries: &[uniform_entry(0, wgpu::ShaderStages::VERTEX, false)],
        });
        let texture_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("texture layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        multisampled: false,
                        view_dimension: wgpu::TextureViewDimension::D2,
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });
        let object_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("object layout"),
            entries: &[uniform_entry(0, wgpu::ShaderStages::VERTEX_FRAGMENT, true)],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("clarity pipeline layout"),
            bind_group_layouts: &[&frame_layout, &texture_layout, &object_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("clarity pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[Vertex::LAYOUT],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: gpu.surface_config.format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                // Mesh files do not promise a winding order.
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        let frame_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("frame uniform"),
            contents: bytemuck::cast_slice(&[FrameUniform::new(Mat4::IDENTITY, Mat4::IDENTITY)]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let frame_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("frame bind group"),
            layout: &frame_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: frame_buffer.as_entire_binding(),
            }],
        });

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("clarity sampler"),
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::Repeat,
            mag_filter: wgpu::FilterMode::Nearest,
            min_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        let object_capacity = 16;
        let (object_buffer, object_bind_group) =
            create_object_buffer(device, &object_layout, object_capacity);

        let (w, h) = gpu.size();
        Self {
            pipeline,
            frame_buffer,
            frame_bind_group,
            texture_layout,
            sampler,
            object_layout,
            object_buffer,
            object_bind_group,
            object_capacity,
            depth_view: create_depth_view(device, w, h),
            depth_size: (w, h),
        }
    }

    fn object_stride(device: &wgpu::Device) -> usize {
        let align = device.limits().min_uniform_buffer_offset_alignment as usize;
        align_up(std::mem::size_of::<ObjectUniform>(), align)
    }

    fn ensure_object_capacity(&mut self, device: &wgpu::Device, count: usize) {
        if count > self.object_capacity {
            let capacity = count.next_power_of_two();
            let (buffer, bind_group) = create_object_buffer(device, &self.object_layout, capacity);
            self.object_buffer = buffer;
            self.object_bind_group = bind_group;
            self.object_capacity = capacity;
        }
    }

    fn resize_depth_if_needed(&mut self, device: &wgpu::Device, size: (u32, u32)) {
        if size != self.depth_size && size.0 > 0 && size.1 > 0 {
            self.depth_view = create_depth_view(device, size.0, size.1);
            self.depth_size = size;
        }
    }
}

fn create_depth_view(device: &wgpu::Device, width: u32, height: u32) -> wgpu::TextureView {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("depth texture"),
        size: wgpu::Extent3d {
            width: width.max(1),
            height: height.max(1),
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: DEPTH_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    texture.create_view(&wgpu::TextureViewDescriptor::default())
}

fn create_object_buffer(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    capacity: usize,
) -> (wgpu::Buffer, wgpu::BindGroup) {
    let stride = Renderer::object_stride(device);
    let buffer = device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("object uniforms"),
        size: (stride * capacity) as u64,
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    });
    let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("object bind group"),
        layout,
        entries: &[wgpu::BindGroupEntry {
            binding: 0,
            resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                buffer: &buffer,
                offset: 0,
                size: wgpu::BufferSize::new(std::mem::size_of::<ObjectUniform>() as u64),
            }),
        }],
    });
    (buffer, bind_group)
}

fn align_up(value: usize, align: usize) -> usize {
    (value + align - 1) & !(align - 1)
}

// ── Cached resources ────────────────────────────────────────────────────

struct GpuMesh {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
}

impl GpuMesh {
    fn upload(device: &wgpu::Device, mesh: &MeshData) -> Self {
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(mesh.name.as_str()),
            contents: bytemuck::cast_slice(&mesh.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(mesh.name.as_str()),
            contents: bytemuck::cast_slice(&mesh.indices),
            usage: wgpu::BufferUsages::INDEX,
        });
        log::debug!("uploaded mesh `{}`", mesh.name);
        Self {
            vertex_buffer,
            index_buffer,
            index_count: mesh.indices.len() as u32,
        }
    }
}

fn upload_texture(gpu: &Gpu, renderer: &Renderer, texture: &TextureData) -> wgpu::BindGroup {
    let gpu_texture = gpu.device.create_texture_with_data(
        &gpu.queue,
        &wgpu::TextureDescriptor {
            label: Some(texture.path.as_str()),
            size: wgpu::Extent3d {
                width: texture.width,
                height: texture.height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        },
        wgpu::util::TextureDataOrder::LayerMajor,
        &texture.pixels,
    );
    let view = gpu_texture.create_view(&wgpu::TextureViewDescriptor::default());
    log::debug!("uploaded texture {} ({}x{})", texture.path, texture.width, texture.height);
    gpu.device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some(texture.path.as_str()),
        layout: &renderer.texture_layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::TextureView(&view),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::Sampler(&renderer.sampler),
            },
        ],
    })
}

// ── Window ──────────────────────────────────────────────────────────────

/// What winit drives while the loop is pumped.
struct WindowApp {
    config: WindowConfig,
    keyboard: SharedKeyboard,
    window: Option<Arc<Window>>,
    gpu: Option<Gpu>,
    renderer: Option<Renderer>,
    close_requested: bool,
    startup_error: Option<GraphicsError>,
}

impl WindowApp {
    fn open(&mut self, event_loop: &ActiveEventLoop) -> Result<(), GraphicsError> {
        let attrs = Window::default_attributes()
            .with_title(&self.config.title)
            .with_inner_size(winit::dpi::LogicalSize::new(
                self.config.width as f64,
                self.config.height as f64,
            ));
        let window = Arc::new(
            event_loop
                .create_window(attrs)
                .map_err(|err| GraphicsError::WindowCreation(err.to_string()))?,
        );
        let gpu = Gpu::new(window.clone())?;
        self.renderer = Some(Renderer::new(&gpu));
        self.gpu = Some(gpu);
        self.window = Some(window);
        Ok(())
    }
}

impl ApplicationHandler for WindowApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        if let Err(err) = self.open(event_loop) {
            log::error!("{err}");
            self.startup_error = Some(err);
            event_loop.exit();
        }
    }

    fn window_event(&mut self, _event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                log::info!("window close requested");
                self.close_requested = true;
            }
            WindowEvent::Resized(size) => {
                if let Some(gpu) = &mut self.gpu {
                    gpu.resize(size.width, size.height);
                }
            }
            WindowEvent::Focused(false) => self.keyboard.borrow_mut().clear(),
            WindowEvent::KeyboardInput { event, .. } => {
                self.keyboard
                    .borrow_mut()
                    .handle_event(event.physical_key, event.state, event.repeat);
            }
            _ => {}
        }
    }
}

// ── Backend ─────────────────────────────────────────────────────────────

struct PendingDraw {
    mesh: String,
    texture: String,
    object: ObjectUniform,
}

struct Frame {
    output: wgpu::SurfaceTexture,
    setup: FrameSetup,
    draws: Vec<PendingDraw>,
}

/// A winit window rendered with wgpu.
pub struct WgpuBackend {
    event_loop: Option<EventLoop<()>>,
    app: WindowApp,
    meshes: HashMap<String, GpuMesh>,
    textures: HashMap<String, wgpu::BindGroup>,
    frame: Option<Frame>,
}

impl WgpuBackend {
    /// Key events from the window are routed into `keyboard`.
    pub fn new(keyboard: SharedKeyboard) -> Self {
        Self {
            event_loop: None,
            app: WindowApp {
                config: WindowConfig::default(),
                keyboard,
                window: None,
                gpu: None,
                renderer: None,
                close_requested: false,
                startup_error: None,
            },
            meshes: HashMap::new(),
            textures: HashMap::new(),
            frame: None,
        }
    }

    fn pump(&mut self) {
        let Some(event_loop) = &mut self.event_loop else {
            return;
        };
        if let PumpStatus::Exit(code) = event_loop.pump_app_events(Some(Duration::ZERO), &mut self.app) {
            log::info!("event loop exited with code {code}");
            self.app.close_requested = true;
        }
    }
}

impl RenderBackend for WgpuBackend {
    fn initialize(&mut self, window: &WindowConfig) -> Result<(), GraphicsError> {
        self.app.config = window.clone();
        if self.event_loop.is_none() {
            self.event_loop = Some(EventLoop::new()?);
        }
        for _ in 0..STARTUP_PUMPS {
            self.pump();
            if let Some(err) = self.app.startup_error.take() {
                return Err(err);
            }
            if self.app.gpu.is_some() {
                return Ok(());
            }
        }
        Err(GraphicsError::WindowCreation(
            "event loop never resumed".to_owned(),
        ))
    }

    fn close_requested(&self) -> bool {
        self.app.close_requested
    }

    fn poll_events(&mut self) {
        self.pump();
    }

    fn begin_frame(&mut self, setup: &FrameSetup) -> Result<(), GraphicsError> {
        let (Some(gpu), Some(renderer)) = (&mut self.app.gpu, &mut self.app.renderer) else {
            return Err(GraphicsError::NotInitialized);
        };
        let output = match gpu.surface.get_current_texture() {
            Ok(output) => output,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                let (w, h) = gpu.size();
                gpu.resize(w, h);
                log::debug!("surface reconfigured, skipping frame");
                return Ok(());
            }
            Err(wgpu::SurfaceError::Timeout) => {
                log::warn!("surface timed out, skipping frame");
                return Ok(());
            }
            Err(err) => return Err(err.into()),
        };
        renderer.resize_depth_if_needed(&gpu.device, gpu.size());
        self.frame = Some(Frame {
            output,
            setup: *setup,
            draws: Vec::new(),
        });
        Ok(())
    }

    fn draw(&mut self, item: DrawItem<'_>) -> Result<(), GraphicsError> {
        let (Some(gpu), Some(renderer)) = (&self.app.gpu, &self.app.renderer) else {
            return Err(GraphicsError::NotInitialized);
        };
        // A skipped frame swallows its draws.
        let Some(frame) = &mut self.frame else {
            return Ok(());
        };
        if !self.meshes.contains_key(&item.mesh.name) {
            self.meshes
                .insert(item.mesh.name.clone(), GpuMesh::upload(&gpu.device, item.mesh));
        }
        if !self.textures.contains_key(&item.texture.path) {
            self.textures
                .insert(item.texture.path.clone(), upload_texture(gpu, renderer, item.texture));
        }
        frame.draws.push(PendingDraw {
            mesh: item.mesh.name.clone(),
            texture: item.texture.path.clone(),
            object: ObjectUniform::new(item.model, item.tint, item.alpha),
        });
        Ok(())
    }

    fn end_frame(&mut self) -> Result<(), GraphicsError> {
        let (Some(gpu), Some(renderer)) = (&self.app.gpu, &mut self.app.renderer) else {
            return Err(GraphicsError::NotInitialized);
        };
        let Some(frame) = self.frame.take() else {
            return Ok(());
        };

        gpu.queue.write_buffer(
            &renderer.frame_buffer,
            0,
            bytemuck::cast_slice(&[FrameUniform::new(frame.setup.view, frame.setup.projection)]),
        );
        renderer.ensure_object_capacity(&gpu.device, frame.draws.len());
        let stride = Renderer::object_stride(&gpu.device);
        let mut objects = vec![0u8; stride * frame.draws.len()];
        for (slot, draw) in frame.draws.iter().enumerate() {
            let bytes = bytemuck::bytes_of(&draw.object);
            objects[slot * stride..slot * stride + bytes.len()].copy_from_slice(bytes);
        }
        if !objects.is_empty() {
            gpu.queue.write_buffer(&renderer.object_buffer, 0, &objects);
        }

        let view = frame
            .output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("clarity frame encoder"),
            });
        {
            let [r, g, b, a] = frame.setup.clear_color;
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("clarity main pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color { r, g, b, a }),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &renderer.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            pass.set_pipeline(&renderer.pipeline);
            pass.set_bind_group(0, &renderer.frame_bind_group, &[]);

            for (slot, draw) in frame.draws.iter().enumerate() {
                let (Some(mesh), Some(texture)) =
                    (self.meshes.get(&draw.mesh), self.textures.get(&draw.texture))
                else {
                    continue;
                };
                pass.set_bind_group(1, texture, &[]);
                pass.set_bind_group(2, &renderer.object_bind_group, &[(slot * stride) as u32]);
                pass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
                pass.set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                pass.draw_indexed(0..mesh.index_count, 0, 0..1);
            }
        }

        gpu.queue.submit(std::iter::once(encoder.finish()));
        frame.output.present();
        Ok(())
    }

    fn shutdown(&mut self) {
        self.frame = None;
        log::info!(
            "releasing {} meshes and {} textures",
            self.meshes.len(),
            self.textures.len()
        );
        self.meshes.clear();
        self.textures.clear();
        self.app.renderer = None;
        self.app.gpu = None;
        self.app.window = None;
    }
}
