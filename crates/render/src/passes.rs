//! The two [`FullScreenPass`] implementations.

use crate::dispatch::{FullScreenPass, ShaderVariant, Viewport};
use crate::gpu_types::QUAD_VERTEX_COUNT;
use crate::layout::{self, RAYMARCH_WORKGROUP};
use crate::pipeline;
use crate::renderer::FrameBuffers;

/// Raymarches by rasterising the full-screen quad.
pub struct PixelShaderPass {
    pipeline: wgpu::RenderPipeline,
    bind_group: wgpu::BindGroup,
    quad: wgpu::Buffer,
}

impl PixelShaderPass {
    pub fn new(
        device: &wgpu::Device,
        shader: &wgpu::ShaderModule,
        target_format: wgpu::TextureFormat,
        buffers: &FrameBuffers,
    ) -> Self {
        let bind_group_layout = pipeline::create_pixel_bind_group_layout(device);
        let bind_group = pipeline::create_pixel_bind_group(
            device,
            &bind_group_layout,
            &buffers.params,
            &buffers.surface,
        );
        Self {
            pipeline: pipeline::create_render_pipeline(device, shader, &bind_group_layout, target_format),
            bind_group,
            quad: pipeline::create_fullscreen_quad(device),
        }
    }
}

impl FullScreenPass for PixelShaderPass {
    fn variant(&self) -> ShaderVariant {
        ShaderVariant::PixelShaderPath
    }

    fn encode(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        target: &wgpu::TextureView,
        viewport: &Viewport,
    ) {
        let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Raymarch Pixel Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
        });
        viewport.apply(&mut rpass);
        rpass.set_pipeline(&self.pipeline);
        rpass.set_bind_group(0, &self.bind_group, &[]);
        rpass.set_vertex_buffer(0, self.quad.slice(..));
        rpass.draw(0..QUAD_VERTEX_COUNT, 0..1);
    }
}

/// Raymarches into a storage image with one thread per pixel, then blits the
/// image onto the target.
pub struct ComputeShaderPass {
    pipeline: wgpu::ComputePipeline,
    bind_group_layout: wgpu::BindGroupLayout,
    bind_group: wgpu::BindGroup,
    image: wgpu::Texture,
    blit_pipeline: wgpu::RenderPipeline,
    blit_bind_group_layout: wgpu::BindGroupLayout,
    blit_bind_group: wgpu::BindGroup,
}

impl ComputeShaderPass {
    pub fn new(
        device: &wgpu::Device,
        shader: &wgpu::ShaderModule,
        target_format: wgpu::TextureFormat,
        buffers: &FrameBuffers,
        width: u32,
        height: u32,
    ) -> Self {
        let bind_group_layout = pipeline::create_compute_bind_group_layout(device);
        let blit_bind_group_layout = pipeline::create_blit_bind_group_layout(device);
        let image = pipeline::create_storage_image(device, width, height);
        let view = image.create_view(&wgpu::TextureViewDescriptor::default());

        Self {
            pipeline: pipeline::create_raymarch_compute_pipeline(device, shader, &bind_group_layout),
            bind_group: pipeline::create_compute_bind_group(
                device,
                &bind_group_layout,
                &buffers.params,
                &buffers.surface,
                &view,
            ),
            blit_pipeline: pipeline::create_blit_pipeline(device, &blit_bind_group_layout, target_format),
            blit_bind_group: pipeline::create_blit_bind_group(device, &blit_bind_group_layout, &view),
            bind_group_layout,
            blit_bind_group_layout,
            image,
        }
    }

    /// Size of the storage image in pixels.
    #[must_use]
    pub fn image_size(&self) -> (u32, u32) {
        (self.image.width(), self.image.height())
    }
}

impl FullScreenPass for ComputeShaderPass {
    fn variant(&self) -> ShaderVariant {
        ShaderVariant::ComputeShaderPath
    }

    fn resize(&mut self, device: &wgpu::Device, buffers: &FrameBuffers, width: u32, height: u32) {
        if self.image_size() == (width, height) {
            return;
        }
        self.image.destroy();
        self.image = pipeline::create_storage_image(device, width, height);
        let view = self.image.create_view(&wgpu::TextureViewDescriptor::default());
        self.bind_group = pipeline::create_compute_bind_group(
            device,
            &self.bind_group_layout,
            &buffers.params,
            &buffers.surface,
            &view,
        );
        self.blit_bind_group =
            pipeline::create_blit_bind_group(device, &self.blit_bind_group_layout, &view);
        tracing::debug!(width, height, "recreated raymarch storage image");
    }

    fn encode(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        target: &wgpu::TextureView,
        viewport: &Viewport,
    ) {
        {
            let mut cpass = encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
                label: Some("Raymarch Compute Pass"),
                timestamp_writes: None,
            });
            cpass.set_pipeline(&self.pipeline);
            cpass.set_bind_group(0, &self.bind_group, &[]);
            cpass.dispatch_workgroups(
                layout::workgroups(viewport.width, RAYMARCH_WORKGROUP),
                layout::workgroups(viewport.height, RAYMARCH_WORKGROUP),
                1,
            );
        }

        let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Raymarch Blit Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
        });
        viewport.apply(&mut rpass);
        rpass.set_pipeline(&self.blit_pipeline);
        rpass.set_bind_group(0, &self.blit_bind_group, &[]);
        rpass.draw(0..3, 0..1);
    }
}
