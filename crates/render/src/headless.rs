//! Offscreen rendering
//!
//! [`HeadlessRenderer`] runs either dispatch variant into an `rgba8unorm`
//! texture and reads the result back into an [`image::RgbaImage`]. No window
//! or surface is involved.

use anyhow::{Context, Result};
use fractal::FrameParams;
use image::RgbaImage;

use crate::dispatch::ShaderVariant;
use crate::gpu;
use crate::pipeline::STORAGE_FORMAT;
use crate::renderer::MandelbulbRenderer;

pub struct HeadlessRenderer {
    device: wgpu::Device,
    queue: wgpu::Queue,
    renderer: MandelbulbRenderer,
    target: wgpu::Texture,
    readback: wgpu::Buffer,
    width: u32,
    height: u32,
}

impl HeadlessRenderer {
    /// Acquire a device and build an offscreen target of `width` x `height`.
    ///
    /// # Errors
    ///
    /// Returns an error if no adapter is available, the size is zero, or
    /// pipeline creation fails.
    pub async fn new(variant: ShaderVariant, width: u32, height: u32) -> Result<Self> {
        anyhow::ensure!(width > 0 && height > 0, "output size must be non-zero, got {width}x{height}");

        let instance = wgpu::Instance::default();
        let (_adapter, device, queue) = gpu::request_device(&instance, None).await?;
        let renderer = MandelbulbRenderer::new(&device, STORAGE_FORMAT, variant, width, height)?;

        let target = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Headless Target"),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: STORAGE_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::COPY_SRC,
            view_formats: &[],
        });
        let readback = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Headless Readback"),
            size: u64::from(gpu::padded_bytes_per_row(width)) * u64::from(height),
            usage: wgpu::BufferUsages::MAP_READ | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        Ok(Self {
            device,
            queue,
            renderer,
            target,
            readback,
            width,
            height,
        })
    }

    #[must_use]
    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    #[must_use]
    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    #[must_use]
    pub fn variant(&self) -> ShaderVariant {
        self.renderer.variant()
    }

    pub fn set_variant(&mut self, variant: ShaderVariant) {
        self.renderer.set_variant(variant);
    }

    /// Render one frame from `params` and read it back.
    ///
    /// # Errors
    ///
    /// Returns an error if the frame cannot be encoded or read back.
    pub fn render(&mut self, params: &FrameParams) -> Result<RgbaImage> {
        let view = self
            .target
            .create_view(&wgpu::TextureViewDescriptor::default());
        self.renderer.upload(&self.queue, params);

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Headless Encoder"),
            });
        self.renderer.encode_frame(&mut encoder, &view)?;

        let bytes_per_row = gpu::padded_bytes_per_row(self.width);
        encoder.copy_texture_to_buffer(
            wgpu::ImageCopyTexture {
                texture: &self.target,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            wgpu::ImageCopyBuffer {
                buffer: &self.readback,
                layout: wgpu::ImageDataLayout {
                    offset: 0,
                    bytes_per_row: Some(bytes_per_row),
                    rows_per_image: Some(self.height),
                },
            },
            wgpu::Extent3d {
                width: self.width,
                height: self.height,
                depth_or_array_layers: 1,
            },
        );
        self.queue.submit(Some(encoder.finish()));

        gpu::map_read(&self.device, &self.readback)?;
        let row_bytes = self.width as usize * 4;
        let mut pixels = Vec::with_capacity(row_bytes * self.height as usize);
        {
            let data = self.readback.slice(..).get_mapped_range();
            for row in data.chunks_exact(bytes_per_row as usize) {
                pixels.extend_from_slice(&row[..row_bytes]);
            }
        }
        self.readback.unmap();

        RgbaImage::from_raw(self.width, self.height, pixels)
            .context("readback size does not match the target")
    }
}
