use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use fractal::{prepare_frame, Camera, CameraInput, FrameError, FrameParams};
use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::Window;

use crate::controller::CameraController;
use crate::dispatch::ShaderVariant;
use crate::gpu;
use crate::probe;
use crate::renderer::MandelbulbRenderer;
use crate::settings::ViewerSettings;

/// Frame rate and distance logging every `interval` frames.
struct FrameStats {
    interval: u32,
    frames: u32,
    window_start: Instant,
}

impl FrameStats {
    fn new(interval: u32) -> Self {
        Self {
            interval,
            frames: 0,
            window_start: Instant::now(),
        }
    }

    #[allow(clippy::cast_precision_loss)]
    fn record(&mut self, distance: f32, variant: ShaderVariant) {
        if self.interval == 0 {
            return;
        }
        self.frames += 1;
        if self.frames >= self.interval {
            let elapsed = self.window_start.elapsed().as_secs_f32();
            let fps = self.frames as f32 / elapsed.max(f32::EPSILON);
            tracing::info!(fps, distance, %variant, "frame stats");
            self.frames = 0;
            self.window_start = Instant::now();
        }
    }
}

/// Render context owned by the event loop.
pub struct State {
    pub window: Arc<Window>,
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    renderer: MandelbulbRenderer,
    camera: Camera,
    input: CameraInput,
    controller: CameraController,
    stats: FrameStats,
    last_update: Instant,
    /// Block prepared by the last `update`, `None` if that frame is skipped
    pending: Option<(FrameParams, f32)>,
    /// Whether the current run of skipped frames has been reported
    skip_reported: bool,
}

impl State {
    pub async fn new(window: Arc<Window>, settings: &ViewerSettings) -> Result<Self> {
        let instance = wgpu::Instance::default();
        let surface = instance
            .create_surface(window.clone())
            .context("failed to create surface")?;
        let (adapter, device, queue) = gpu::request_device(&instance, Some(&surface)).await?;

        let size = window.inner_size();
        let surface_caps = surface.get_capabilities(&adapter);
        // Shader output is presented as is, without sRGB encoding.
        let format = surface_caps
            .formats
            .iter()
            .copied()
            .find(|f| !f.is_srgb())
            .or_else(|| surface_caps.formats.first().copied())
            .context("surface reports no formats")?;
        if format.is_srgb() {
            tracing::warn!(?format, "no linear surface format available, output will be gamma encoded");
        }
        let alpha_mode = surface_caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width,
            height: size.height,
            desired_maximum_frame_latency: 2,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode,
            view_formats: vec![],
        };
        if size.width > 0 && size.height > 0 {
            surface.configure(&device, &config);
        }
        tracing::info!(?format, width = size.width, height = size.height, "surface configured");

        let renderer =
            MandelbulbRenderer::new(&device, format, settings.variant, size.width, size.height)?;
        probe::self_check(&device, &queue)?.log();

        Ok(Self {
            window,
            surface,
            device,
            queue,
            config,
            renderer,
            camera: settings.camera(size.width, size.height),
            input: CameraInput::default(),
            controller: CameraController::new(),
            stats: FrameStats::new(settings.stats_interval),
            last_update: Instant::now(),
            pending: None,
            skip_reported: false,
        })
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        self.renderer
            .resize(&self.device, new_size.width, new_size.height);
        if new_size.width > 0 && new_size.height > 0 {
            self.config.width = new_size.width;
            self.config.height = new_size.height;
            self.camera.resize(new_size.width, new_size.height);
            self.surface.configure(&self.device, &self.config);
            tracing::debug!(width = new_size.width, height = new_size.height, "resized");
        }
    }

    /// Reconfigure the surface at its current size after it was lost.
    pub fn reconfigure(&mut self) {
        let size = self.window.inner_size();
        self.resize(size);
    }

    pub fn input(&mut self, event: &WindowEvent) -> bool {
        match event {
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(KeyCode::KeyT),
                        state: ElementState::Pressed,
                        repeat: false,
                        ..
                    },
                ..
            } => {
                self.renderer.toggle_variant();
                true
            }
            _ => self.controller.process_event(event, &mut self.input),
        }
    }

    /// Advance the camera and prepare this frame's parameter block.
    pub fn update(&mut self) {
        let now = Instant::now();
        let dt = now.duration_since(self.last_update).as_secs_f32();
        self.last_update = now;

        match prepare_frame(&mut self.camera, &mut self.input, dt) {
            Ok(frame) => self.pending = Some((frame.params, frame.distance)),
            Err(err) => {
                self.pending = None;
                self.report_skip(&err);
            }
        }
    }

    fn report_skip(&mut self, err: &FrameError) {
        if self.skip_reported {
            tracing::debug!(%err, "skipping frame");
        } else {
            tracing::warn!(%err, "skipping frame");
            self.skip_reported = true;
        }
    }

    pub fn render(&mut self) -> Result<(), wgpu::SurfaceError> {
        let Some((params, distance)) = self.pending else {
            return Ok(());
        };
        let (width, height) = self.renderer.size();
        if width == 0 || height == 0 {
            self.report_skip(&FrameError::EmptySurface { width, height });
            return Ok(());
        }

        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        self.renderer.upload(&self.queue, &params);
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Frame Encoder"),
            });
        if let Err(err) = self.renderer.encode_frame(&mut encoder, &view) {
            self.report_skip(&err);
            return Ok(());
        }
        self.queue.submit(Some(encoder.finish()));
        output.present();

        if self.skip_reported {
            tracing::info!("rendering resumed");
            self.skip_reported = false;
        }
        self.stats.record(distance, self.renderer.variant());
        Ok(())
    }
}
