//! Adapter and device acquisition shared by the windowed and headless paths.

use anyhow::{Context, Result};

/// Request a high performance adapter and a device with default limits.
///
/// # Errors
///
/// Returns an error if no adapter is available or the device request fails.
pub async fn request_device(
    instance: &wgpu::Instance,
    compatible_surface: Option<&wgpu::Surface<'_>>,
) -> Result<(wgpu::Adapter, wgpu::Device, wgpu::Queue)> {
    let adapter = instance
        .request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface,
            force_fallback_adapter: false,
        })
        .await
        .context("failed to get adapter")?;

    let info = adapter.get_info();
    tracing::info!(name = %info.name, backend = ?info.backend, "selected adapter");

    let (device, queue) = adapter
        .request_device(
            &wgpu::DeviceDescriptor {
                label: Some("Mandelbulb Device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
            },
            None,
        )
        .await
        .context("failed to request device")?;

    Ok((adapter, device, queue))
}

/// Bytes per row of a texture readback, padded to the copy alignment.
#[must_use]
pub fn padded_bytes_per_row(width: u32) -> u32 {
    let unpadded = width * 4;
    let align = wgpu::COPY_BYTES_PER_ROW_ALIGNMENT;
    unpadded.div_ceil(align) * align
}

/// Block until `buffer` is mapped for reading.
///
/// # Errors
///
/// Returns an error if mapping fails.
pub fn map_read(device: &wgpu::Device, buffer: &wgpu::Buffer) -> Result<()> {
    let slice = buffer.slice(..);
    let (tx, rx) = std::sync::mpsc::channel();
    slice.map_async(wgpu::MapMode::Read, move |result| {
        let _ = tx.send(result);
    });
    device.poll(wgpu::Maintain::Wait);
    rx.recv()
        .context("readback callback dropped")?
        .context("failed to map readback buffer")
}

#[cfg(test)]
mod tests {
    use super::padded_bytes_per_row;

    #[test]
    fn rows_are_padded_to_256_bytes() {
        assert_eq!(padded_bytes_per_row(64), 256);
        assert_eq!(padded_bytes_per_row(65), 512);
        assert_eq!(padded_bytes_per_row(640), 2560);
        assert_eq!(padded_bytes_per_row(1), 256);
    }
}
