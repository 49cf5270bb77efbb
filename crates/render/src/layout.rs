//! Bind group slots shared by the host pipelines and `mandelbulb.wgsl`.

/// `FrameParams` uniform block
pub const PARAMS: u32 = 0;
/// `SurfaceUniform` block
pub const SURFACE: u32 = 1;
/// Write-only storage image filled by `cs_main`
pub const OUTPUT_IMAGE: u32 = 2;
/// Probe input points, `array<vec4<f32>>`
pub const PROBE_POINTS: u32 = 3;
/// Probe results, `array<f32>`
pub const PROBE_OUT: u32 = 4;

/// Sampled source texture in `blit.wgsl`
pub const BLIT_SOURCE: u32 = 0;

/// Workgroup edge length of `cs_main`.
pub const RAYMARCH_WORKGROUP: u32 = 8;
/// Workgroup size of `cs_probe_de`.
pub const PROBE_WORKGROUP: u32 = 64;

const _: () = assert!(SURFACE == PARAMS + 1);
const _: () = assert!(OUTPUT_IMAGE == 2);

/// Workgroups needed to cover `extent` invocations.
#[must_use]
pub const fn workgroups(extent: u32, group: u32) -> u32 {
    extent.div_ceil(group)
}
