//! # Mandelbulb Renderer
//!
//! `wgpu` host for the raymarch shader in `mandelbulb.wgsl`.
//!
//! Each frame, [`fractal::prepare_frame`] produces the parameter block on the
//! CPU; [`MandelbulbRenderer`] uploads it and lets the [`DispatchDriver`] run
//! either the pixel shader or the compute shader variant over the target.
//! [`run`] drives this from a window, [`HeadlessRenderer`] renders offscreen
//! and [`DistanceProbe`] checks the shader's distance estimator against the
//! host copy.

pub mod controller;
pub mod dispatch;
pub mod gpu;
pub mod gpu_types;
pub mod headless;
pub mod layout;
pub mod passes;
pub mod pipeline;
pub mod probe;
pub mod renderer;
pub mod run;
pub mod settings;
pub mod state;

pub use dispatch::{DispatchDriver, FullScreenPass, PipelineBaseline, ShaderVariant, Viewport};
pub use gpu_types::{ScreenVertex, SurfaceUniform};
pub use headless::HeadlessRenderer;
pub use probe::{DistanceProbe, SelfCheckReport};
pub use renderer::MandelbulbRenderer;
pub use run::run;
pub use settings::ViewerSettings;
