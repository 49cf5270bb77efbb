//! Full-screen dispatch driver
//!
//! Selects between the two ways of running the raymarcher over the output
//! surface. Both implement [`FullScreenPass`]; the driver brackets every
//! invocation with the same contract: apply a viewport covering the active
//! surface, record the pass, restore the saved [`PipelineBaseline`].

use std::fmt;
use std::str::FromStr;

use fractal::FrameError;

use crate::passes::{ComputeShaderPass, PixelShaderPass};
use crate::renderer::FrameBuffers;

/// Dispatch mechanism used to run the raymarch program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShaderVariant {
    /// One fragment invocation per pixel of a full-screen quad
    #[default]
    PixelShaderPath,
    /// One compute thread per pixel, writing a storage image
    ComputeShaderPath,
}

impl ShaderVariant {
    /// The other variant.
    #[must_use]
    pub fn toggle(self) -> Self {
        match self {
            ShaderVariant::PixelShaderPath => ShaderVariant::ComputeShaderPath,
            ShaderVariant::ComputeShaderPath => ShaderVariant::PixelShaderPath,
        }
    }
}

impl fmt::Display for ShaderVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ShaderVariant::PixelShaderPath => "pixel",
            ShaderVariant::ComputeShaderPath => "compute",
        };
        f.write_str(name)
    }
}

impl FromStr for ShaderVariant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pixel" | "ps" => Ok(ShaderVariant::PixelShaderPath),
            "compute" | "cs" => Ok(ShaderVariant::ComputeShaderPath),
            other => Err(format!("unknown shader variant '{other}', expected 'pixel' or 'compute'")),
        }
    }
}

/// Rectangle of the render target a pass may write, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    /// Viewport covering a whole `width` x `height` target.
    #[must_use]
    pub fn covering(width: u32, height: u32) -> Self {
        Self {
            x: 0,
            y: 0,
            width,
            height,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Apply as both viewport and scissor rectangle so nothing outside it is written.
    #[allow(clippy::cast_precision_loss)]
    pub fn apply(&self, pass: &mut wgpu::RenderPass<'_>) {
        pass.set_viewport(
            self.x as f32,
            self.y as f32,
            self.width as f32,
            self.height as f32,
            0.0,
            1.0,
        );
        pass.set_scissor_rect(self.x, self.y, self.width, self.height);
    }
}

/// Clear colour every frame starts from.
pub const CLEAR_COLOR: wgpu::Color = wgpu::Color {
    r: 0.3,
    g: 0.3,
    b: 0.3,
    a: 1.0,
};

/// Pipeline state that stages after the raymarcher expect to find.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PipelineBaseline {
    viewport: Viewport,
    clear_color: wgpu::Color,
}

impl PipelineBaseline {
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            viewport: Viewport::covering(width, height),
            clear_color: CLEAR_COLOR,
        }
    }

    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    #[must_use]
    pub fn clear_color(&self) -> wgpu::Color {
        self.clear_color
    }

    /// Adopt a new target size as the baseline.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.viewport = Viewport::covering(width, height);
    }

    /// Run `f` with `active` as the current viewport, then restore the saved one.
    pub fn with_viewport<R>(&mut self, active: Viewport, f: impl FnOnce(&Viewport) -> R) -> R {
        let saved = self.viewport;
        self.viewport = active;
        let result = f(&self.viewport);
        self.viewport = saved;
        result
    }
}

/// One way of running the raymarcher over a render target.
pub trait FullScreenPass {
    fn variant(&self) -> ShaderVariant;

    /// Recreate size dependent resources.
    fn resize(&mut self, _device: &wgpu::Device, _buffers: &FrameBuffers, _width: u32, _height: u32) {}

    /// Record the pass. Only pixels inside `viewport` are written.
    fn encode(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        target: &wgpu::TextureView,
        viewport: &Viewport,
    );
}

/// Owns both pass implementations and the baseline they must leave behind.
pub struct DispatchDriver {
    variant: ShaderVariant,
    pixel: PixelShaderPass,
    compute: ComputeShaderPass,
    baseline: PipelineBaseline,
}

impl DispatchDriver {
    #[must_use]
    pub fn new(
        pixel: PixelShaderPass,
        compute: ComputeShaderPass,
        variant: ShaderVariant,
        width: u32,
        height: u32,
    ) -> Self {
        Self {
            variant,
            pixel,
            compute,
            baseline: PipelineBaseline::new(width, height),
        }
    }

    #[must_use]
    pub fn variant(&self) -> ShaderVariant {
        self.variant
    }

    pub fn set_variant(&mut self, variant: ShaderVariant) {
        if variant != self.variant {
            tracing::info!(from = %self.variant, to = %variant, "switching shader variant");
            self.variant = variant;
        }
    }

    /// Switch to the other variant and return it.
    pub fn toggle_variant(&mut self) -> ShaderVariant {
        self.set_variant(self.variant.toggle());
        self.variant
    }

    #[must_use]
    pub fn baseline(&self) -> &PipelineBaseline {
        &self.baseline
    }

    pub fn resize(&mut self, device: &wgpu::Device, buffers: &FrameBuffers, width: u32, height: u32) {
        self.baseline.resize(width, height);
        self.pixel.resize(device, buffers, width, height);
        self.compute.resize(device, buffers, width, height);
    }

    /// Run the selected variant over a `width` x `height` target.
    ///
    /// The parameter block must already be written for this frame.
    ///
    /// # Errors
    ///
    /// Returns [`FrameError::EmptySurface`] if either dimension is zero;
    /// nothing is recorded in that case.
    pub fn dispatch(
        &mut self,
        encoder: &mut wgpu::CommandEncoder,
        target: &wgpu::TextureView,
        width: u32,
        height: u32,
    ) -> Result<(), FrameError> {
        let active = Viewport::covering(width, height);
        if active.is_empty() {
            return Err(FrameError::EmptySurface { width, height });
        }

        let pass: &dyn FullScreenPass = match self.variant {
            ShaderVariant::PixelShaderPath => &self.pixel,
            ShaderVariant::ComputeShaderPath => &self.compute,
        };
        debug_assert_eq!(pass.variant(), self.variant);
        self.baseline
            .with_viewport(active, |viewport| pass.encode(encoder, target, viewport));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn variant_parses_and_displays() {
        assert_eq!("pixel".parse::<ShaderVariant>(), Ok(ShaderVariant::PixelShaderPath));
        assert_eq!("Compute".parse::<ShaderVariant>(), Ok(ShaderVariant::ComputeShaderPath));
        assert!("vertex".parse::<ShaderVariant>().is_err());
        assert_eq!(ShaderVariant::ComputeShaderPath.to_string(), "compute");
        assert_eq!(ShaderVariant::default(), ShaderVariant::PixelShaderPath);
    }

    #[test]
    fn toggle_alternates() {
        let v = ShaderVariant::PixelShaderPath;
        assert_eq!(v.toggle(), ShaderVariant::ComputeShaderPath);
        assert_eq!(v.toggle().toggle(), v);
    }

    #[test]
    fn baseline_viewport_is_restored() {
        let mut baseline = PipelineBaseline::new(640, 480);
        let active = Viewport {
            x: 10,
            y: 20,
            width: 100,
            height: 50,
        };
        let seen = baseline.with_viewport(active, |v| *v);
        assert_eq!(seen, active);
        assert_eq!(baseline.viewport(), Viewport::covering(640, 480));
        assert_eq!(baseline.clear_color(), CLEAR_COLOR);
    }

    #[test]
    fn empty_viewport_is_detected() {
        assert!(Viewport::covering(0, 480).is_empty());
        assert!(Viewport::covering(640, 0).is_empty());
        assert!(!Viewport::covering(1, 1).is_empty());
    }
}
