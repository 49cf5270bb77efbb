use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use fractal::CameraMode;
use glam::Vec3;
use render::{ShaderVariant, ViewerSettings};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum VariantArg {
    Pixel,
    Compute,
}

impl From<VariantArg> for ShaderVariant {
    fn from(arg: VariantArg) -> Self {
        match arg {
            VariantArg::Pixel => ShaderVariant::PixelShaderPath,
            VariantArg::Compute => ShaderVariant::ComputeShaderPath,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CameraArg {
    ModelViewer,
    FirstPerson,
}

impl From<CameraArg> for CameraMode {
    fn from(arg: CameraArg) -> Self {
        match arg {
            CameraArg::ModelViewer => CameraMode::ModelViewer,
            CameraArg::FirstPerson => CameraMode::FirstPerson,
        }
    }
}

/// Raymarch a power-7 Mandelbulb on the GPU.
///
/// Left drag rotates the model, right drag orbits, the wheel zooms and T
/// switches between the pixel and compute shader paths.
#[derive(Debug, Parser)]
#[command(version, about)]
pub struct Args {
    /// Output width in pixels
    #[arg(long, default_value_t = 640)]
    pub width: u32,

    /// Output height in pixels
    #[arg(long, default_value_t = 480)]
    pub height: u32,

    /// Dispatch mechanism for the raymarcher
    #[arg(long, value_enum, default_value_t = VariantArg::Pixel)]
    pub variant: VariantArg,

    /// Camera navigation style
    #[arg(long, value_enum, default_value_t = CameraArg::ModelViewer)]
    pub camera: CameraArg,

    /// Render one frame offscreen to this PNG instead of opening a window
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Eye position as X,Y,Z
    #[arg(long, value_parser = parse_vec3, default_value = "3,0,0", allow_hyphen_values = true)]
    pub eye: Vec3,

    /// Look-at target as X,Y,Z
    #[arg(long, value_parser = parse_vec3, default_value = "0,0,0", allow_hyphen_values = true)]
    pub target: Vec3,

    /// Frames between statistics log lines, 0 disables them
    #[arg(long, default_value_t = 120)]
    pub stats_interval: u32,
}

impl Args {
    #[must_use]
    pub fn settings(&self) -> ViewerSettings {
        ViewerSettings {
            width: self.width,
            height: self.height,
            variant: self.variant.into(),
            camera_mode: self.camera.into(),
            eye: self.eye,
            target: self.target,
            stats_interval: self.stats_interval,
        }
    }
}

fn parse_vec3(s: &str) -> Result<Vec3, String> {
    let parts = s
        .split(',')
        .map(|part| {
            part.trim()
                .parse::<f32>()
                .map_err(|e| format!("invalid component '{part}': {e}"))
        })
        .collect::<Result<Vec<_>, _>>()?;
    match parts.as_slice() {
        [x, y, z] if x.is_finite() && y.is_finite() && z.is_finite() => Ok(Vec3::new(*x, *y, *z)),
        [_, _, _] => Err(format!("components must be finite, got '{s}'")),
        _ => Err(format!("expected three comma separated values, got '{s}'")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_initial_window() {
        let args = Args::try_parse_from(["mandelbulb"]).unwrap();
        let settings = args.settings();
        assert_eq!(settings, ViewerSettings::default());
        assert!(args.output.is_none());
    }

    #[test]
    fn flags_override_settings() {
        let args = Args::try_parse_from([
            "mandelbulb",
            "--width",
            "1280",
            "--height",
            "720",
            "--variant",
            "compute",
            "--camera",
            "first-person",
            "--eye",
            "-2,0.5,1",
            "--output",
            "frame.png",
        ])
        .unwrap();
        let settings = args.settings();
        assert_eq!((settings.width, settings.height), (1280, 720));
        assert_eq!(settings.variant, ShaderVariant::ComputeShaderPath);
        assert_eq!(settings.camera_mode, CameraMode::FirstPerson);
        assert_eq!(settings.eye, Vec3::new(-2.0, 0.5, 1.0));
        assert_eq!(args.output, Some(PathBuf::from("frame.png")));
    }

    #[test]
    fn vec3_parser_rejects_bad_input() {
        assert_eq!(parse_vec3(" 1, 2 ,3"), Ok(Vec3::new(1.0, 2.0, 3.0)));
        assert!(parse_vec3("1,2").is_err());
        assert!(parse_vec3("1,x,3").is_err());
        assert!(parse_vec3("1,inf,3").is_err());
    }
}
