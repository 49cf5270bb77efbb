#![deny(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
//! # Mandelbulb Core
//!
//! GPU-free half of the Mandelbulb renderer. Everything in this crate is plain
//! numeric code that the `render` crate marshals onto the GPU each frame.
//!
//! ## Key Components
//!
//! -   **Distance Estimator:** [`distance_estimate`] in the [`distance`]
//!     module is the canonical host copy of the fractal's distance function.
//!     The WGSL copy in the `render` crate is validated against it.
//! -   **Camera:** [`Camera`] owns eye, target, projection and the derived
//!     view and world matrices. It is driven by a [`CameraInput`] accumulator
//!     once per frame.
//! -   **Parameter Block:** [`FrameParams`] is the bit-exact uniform block
//!     consumed by the raymarch shader.
//! -   **Frame Preparation:** [`prepare_frame`] runs camera update, distance
//!     estimation, auto-scaling and packing on one eye position.
//! -   **Reference Raymarcher:** the [`raymarch`] module mirrors the shader's
//!     sphere tracer on the CPU.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use fractal::{prepare_frame, Camera, CameraInput};
//!
//! let mut camera = Camera::default();
//! let mut input = CameraInput::default();
//! let frame = prepare_frame(&mut camera, &mut input, 1.0 / 60.0)?;
//! queue.write_buffer(&params_buffer, 0, bytemuck::bytes_of(&frame.params));
//! ```

pub mod camera;
pub mod distance;
pub mod error;
pub mod frame;
pub mod params;
pub mod raymarch;

pub use camera::{Camera, CameraInput, CameraMode, CameraSettings, MovementKeys};
pub use distance::distance_estimate;
pub use error::{FrameError, MatrixKind};
pub use frame::{prepare_frame, PreparedFrame, SCALE_FACTOR};
pub use params::FrameParams;
