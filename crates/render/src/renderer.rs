//! Device-side half of a frame
//!
//! [`MandelbulbRenderer`] owns the parameter buffers and the
//! [`DispatchDriver`]. The windowed [`crate::state::State`] and the
//! [`crate::headless::HeadlessRenderer`] both drive it the same way:
//! [`MandelbulbRenderer::upload`] the prepared block, then
//! [`MandelbulbRenderer::encode_frame`] into a command encoder.

use anyhow::{bail, Result};
use fractal::{FrameError, FrameParams};

use crate::dispatch::{DispatchDriver, ShaderVariant};
use crate::gpu_types::SurfaceUniform;
use crate::passes::{ComputeShaderPass, PixelShaderPass};
use crate::pipeline;

/// Uniform buffers read by both dispatch variants.
pub struct FrameBuffers {
    /// One [`FrameParams`] block
    pub params: wgpu::Buffer,
    /// One [`SurfaceUniform`]
    pub surface: wgpu::Buffer,
}

pub struct MandelbulbRenderer {
    buffers: FrameBuffers,
    driver: DispatchDriver,
    width: u32,
    height: u32,
}

impl MandelbulbRenderer {
    /// Compile the raymarch shader and build both dispatch variants for
    /// targets of `target_format`.
    ///
    /// # Errors
    ///
    /// Returns an error if shader or pipeline creation fails validation.
    pub fn new(
        device: &wgpu::Device,
        target_format: wgpu::TextureFormat,
        variant: ShaderVariant,
        width: u32,
        height: u32,
    ) -> Result<Self> {
        device.push_error_scope(wgpu::ErrorFilter::Validation);

        let shader = pipeline::create_raymarch_shader(device);
        let buffers = FrameBuffers {
            params: pipeline::create_params_buffer(device),
            surface: pipeline::create_surface_buffer(device, width, height),
        };
        let pixel = PixelShaderPass::new(device, &shader, target_format, &buffers);
        let compute =
            ComputeShaderPass::new(device, &shader, target_format, &buffers, width, height);

        if let Some(err) = pollster::block_on(device.pop_error_scope()) {
            bail!("failed to create raymarch pipelines: {err}");
        }
        tracing::info!(?target_format, %variant, "raymarch pipelines ready");

        Ok(Self {
            driver: DispatchDriver::new(pixel, compute, variant, width, height),
            buffers,
            width,
            height,
        })
    }

    #[must_use]
    pub fn variant(&self) -> ShaderVariant {
        self.driver.variant()
    }

    pub fn set_variant(&mut self, variant: ShaderVariant) {
        self.driver.set_variant(variant);
    }

    pub fn toggle_variant(&mut self) -> ShaderVariant {
        self.driver.toggle_variant()
    }

    #[must_use]
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Adopt a new target size. Zero sizes are recorded but resources are
    /// kept until a usable size arrives.
    pub fn resize(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        if width > 0 && height > 0 {
            self.driver.resize(device, &self.buffers, width, height);
        }
    }

    /// Overwrite the parameter block and surface uniform for this frame.
    pub fn upload(&self, queue: &wgpu::Queue, params: &FrameParams) {
        queue.write_buffer(&self.buffers.params, 0, bytemuck::bytes_of(params));
        queue.write_buffer(
            &self.buffers.surface,
            0,
            bytemuck::bytes_of(&SurfaceUniform::new(self.width, self.height)),
        );
    }

    /// Clear `target` to the baseline colour and raymarch over it.
    ///
    /// # Errors
    ///
    /// Returns [`FrameError::EmptySurface`] for a zero sized target; nothing
    /// is recorded in that case.
    pub fn encode_frame(
        &mut self,
        encoder: &mut wgpu::CommandEncoder,
        target: &wgpu::TextureView,
    ) -> Result<(), FrameError> {
        if self.width == 0 || self.height == 0 {
            return Err(FrameError::EmptySurface {
                width: self.width,
                height: self.height,
            });
        }

        encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Baseline Clear Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(self.driver.baseline().clear_color()),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        self.driver.dispatch(encoder, target, self.width, self.height)
    }
}
