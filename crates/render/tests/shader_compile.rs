use std::fs;
use std::path::{Path, PathBuf};

fn shader_path(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("src").join(name)
}

fn validate_shader(path: &Path) -> naga::Module {
    let src = fs::read_to_string(path).expect("read shader");
    let module = naga::front::wgsl::parse_str(&src).expect("wgsl parse");
    let mut validator = naga::valid::Validator::new(
        naga::valid::ValidationFlags::all(),
        naga::valid::Capabilities::all(),
    );
    validator.validate(&module).expect("wgsl validate");
    module
}

fn struct_layout(module: &naga::Module, name: &str) -> (u32, Vec<u32>) {
    module
        .types
        .iter()
        .find_map(|(_, ty)| match &ty.inner {
            naga::TypeInner::Struct { members, span } if ty.name.as_deref() == Some(name) => {
                Some((*span, members.iter().map(|m| m.offset).collect()))
            }
            _ => None,
        })
        .unwrap_or_else(|| panic!("struct {name} not found"))
}

fn entry_points(module: &naga::Module) -> Vec<(&str, naga::ShaderStage)> {
    module
        .entry_points
        .iter()
        .map(|ep| (ep.name.as_str(), ep.stage))
        .collect()
}

#[test]
fn compile_mandelbulb_shader() {
    let module = validate_shader(&shader_path("mandelbulb.wgsl"));
    let eps = entry_points(&module);
    assert!(eps.contains(&("vs_main", naga::ShaderStage::Vertex)));
    assert!(eps.contains(&("fs_main", naga::ShaderStage::Fragment)));
    assert!(eps.contains(&("cs_main", naga::ShaderStage::Compute)));
    assert!(eps.contains(&("cs_probe_de", naga::ShaderStage::Compute)));
}

#[test]
fn compile_blit_shader() {
    let module = validate_shader(&shader_path("blit.wgsl"));
    let eps = entry_points(&module);
    assert!(eps.contains(&("vs_blit", naga::ShaderStage::Vertex)));
    assert!(eps.contains(&("fs_blit", naga::ShaderStage::Fragment)));
}

#[test]
fn frame_params_layout_matches_host() {
    let module = validate_shader(&shader_path("mandelbulb.wgsl"));
    let (span, offsets) = struct_layout(&module, "FrameParams");
    assert_eq!(span as usize, fractal::params::FRAME_PARAMS_SIZE);
    assert_eq!(offsets, vec![0, 64, 128, 192, 196, 200, 204]);
}

#[test]
fn surface_uniform_layout_matches_host() {
    let module = validate_shader(&shader_path("mandelbulb.wgsl"));
    let (span, offsets) = struct_layout(&module, "SurfaceUniform");
    assert_eq!(span as usize, std::mem::size_of::<render::SurfaceUniform>());
    assert_eq!(offsets, vec![0, 8]);
}

#[test]
fn compute_workgroup_matches_dispatch() {
    let module = validate_shader(&shader_path("mandelbulb.wgsl"));
    let size = |name: &str| {
        module
            .entry_points
            .iter()
            .find(|ep| ep.name == name)
            .map(|ep| ep.workgroup_size)
            .unwrap()
    };
    let tile = render::layout::RAYMARCH_WORKGROUP;
    assert_eq!(size("cs_main"), [tile, tile, 1]);
    assert_eq!(size("cs_probe_de"), [render::layout::PROBE_WORKGROUP, 1, 1]);
}
