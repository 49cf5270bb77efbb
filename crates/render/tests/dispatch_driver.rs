use fractal::{prepare_frame, Camera, CameraInput, CameraMode, FrameError};
use render::pipeline::STORAGE_FORMAT;
use render::{gpu, MandelbulbRenderer, ShaderVariant};

fn device() -> Option<(wgpu::Device, wgpu::Queue)> {
    let instance = wgpu::Instance::default();
    match pollster::block_on(gpu::request_device(&instance, None)) {
        Ok((_, device, queue)) => Some((device, queue)),
        Err(e) => {
            println!("skipping GPU test, no usable adapter: {e:#}");
            None
        }
    }
}

fn target(device: &wgpu::Device, width: u32, height: u32) -> wgpu::Texture {
    device.create_texture(&wgpu::TextureDescriptor {
        label: Some("Test Target"),
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
    })
}

/// Read back an rgba8 texture as rows of pixels.
fn read_pixels(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    texture: &wgpu::Texture,
    mut encoder: wgpu::CommandEncoder,
) -> Vec<Vec<[u8; 4]>> {
    let (width, height) = (texture.width(), texture.height());
    let bytes_per_row = gpu::padded_bytes_per_row(width);
    let buffer = device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("Test Readback"),
        size: u64::from(bytes_per_row) * u64::from(height),
        usage: wgpu::BufferUsages::MAP_READ | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    });
    encoder.copy_texture_to_buffer(
        texture.as_image_copy(),
        wgpu::ImageCopyBuffer {
            buffer: &buffer,
            layout: wgpu::ImageDataLayout {
                offset: 0,
                bytes_per_row: Some(bytes_per_row),
                rows_per_image: Some(height),
            },
        },
        texture.size(),
    );
    queue.submit(Some(encoder.finish()));
    gpu::map_read(device, &buffer).unwrap();

    let data = buffer.slice(..).get_mapped_range();
    data.chunks_exact(bytes_per_row as usize)
        .map(|row| {
            row[..width as usize * 4]
                .chunks_exact(4)
                .map(|px| [px[0], px[1], px[2], px[3]])
                .collect()
        })
        .collect()
}

#[test]
fn zero_sized_target_is_rejected() {
    let Some((device, queue)) = device() else {
        return;
    };
    let mut renderer =
        MandelbulbRenderer::new(&device, STORAGE_FORMAT, ShaderVariant::default(), 64, 48).unwrap();
    renderer.resize(&device, 0, 48);
    assert_eq!(renderer.size(), (0, 48));

    let texture = target(&device, 64, 48);
    let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
    let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor { label: None });
    let err = renderer.encode_frame(&mut encoder, &view).unwrap_err();
    assert_eq!(err, FrameError::EmptySurface { width: 0, height: 48 });
    queue.submit(Some(encoder.finish()));
}

#[test]
fn toggle_switches_between_both_variants() {
    let Some((device, _queue)) = device() else {
        return;
    };
    let mut renderer =
        MandelbulbRenderer::new(&device, STORAGE_FORMAT, ShaderVariant::PixelShaderPath, 32, 32)
            .unwrap();
    assert_eq!(renderer.toggle_variant(), ShaderVariant::ComputeShaderPath);
    assert_eq!(renderer.toggle_variant(), ShaderVariant::PixelShaderPath);
    renderer.set_variant(ShaderVariant::ComputeShaderPath);
    assert_eq!(renderer.variant(), ShaderVariant::ComputeShaderPath);
}

#[test]
fn dispatch_writes_only_the_active_surface() {
    let Some((device, queue)) = device() else {
        return;
    };
    let (width, height) = (64, 48);
    let mut camera = Camera::new(CameraMode::ModelViewer, width / 2, height / 2);
    let mut input = CameraInput::default();
    let params = prepare_frame(&mut camera, &mut input, 0.0).unwrap().params;

    for variant in [ShaderVariant::PixelShaderPath, ShaderVariant::ComputeShaderPath] {
        // Renderer sized to the top-left quarter of a larger target.
        let mut renderer =
            MandelbulbRenderer::new(&device, STORAGE_FORMAT, variant, width / 2, height / 2)
                .unwrap();
        let texture = target(&device, width, height);
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        renderer.upload(&queue, &params);
        let mut encoder =
            device.create_command_encoder(&wgpu::CommandEncoderDescriptor { label: None });
        renderer.encode_frame(&mut encoder, &view).unwrap();
        let rows = read_pixels(&device, &queue, &texture, encoder);

        let clear = rows[height as usize - 1][width as usize - 1];
        for (y, row) in rows.iter().enumerate() {
            for (x, px) in row.iter().enumerate() {
                if x >= (width / 2) as usize || y >= (height / 2) as usize {
                    assert_eq!(*px, clear, "{variant}: pixel ({x}, {y}) outside the surface was written");
                }
            }
        }
        // Inside, the raymarched surface differs from the clear colour.
        let centre = rows[(height / 4) as usize][(width / 4) as usize];
        assert_ne!(centre, clear, "{variant}");
    }
}
