//! Single-texel pointer readback from the depth target.
//!
//! One RGBA32F texel is copied into a 16-byte staging buffer at the end of a
//! tick, mapped after submit and polled without blocking on the next tick.

use std::sync::mpsc::{Receiver, TryRecvError};

use crate::targets::{RenderTarget, TEXEL_BYTES};

/// Depth-target texel under a pointer at viewport position (`x`, `y`).
///
/// wgpu rows run top-down like viewport space, so only the supersampling
/// scale applies. `None` when the pointer is outside the target.
pub fn readback_texel(
    x: f32,
    y: f32,
    supersampling: u32,
    extent: (u32, u32),
) -> Option<[u32; 2]> {
    if !(x.is_finite() && y.is_finite()) || x < 0.0 || y < 0.0 {
        return None;
    }
    let ss = supersampling.max(1) as f32;
    let px = (x * ss).floor() as u32;
    let py = (y * ss).floor() as u32;
    (px < extent.0 && py < extent.1).then_some([px, py])
}

enum ReadbackState {
    Idle,
    /// Copy encoded, waiting for the submit.
    Copied,
    Mapping(Receiver<Result<(), wgpu::BufferAsyncError>>),
}

impl ReadbackState {
    fn accepts_request(&self) -> bool {
        matches!(self, ReadbackState::Idle)
    }
}

pub struct PointerReadback {
    staging: wgpu::Buffer,
    state: ReadbackState,
}

impl PointerReadback {
    pub fn new(device: &wgpu::Device) -> Self {
        let staging = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("pointer-staging"),
            size: TEXEL_BYTES as u64,
            usage: wgpu::BufferUsages::MAP_READ | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        Self {
            staging,
            state: ReadbackState::Idle,
        }
    }

    pub fn is_pending(&self) -> bool {
        !self.state.accepts_request()
    }

    /// Encode the texel copy.
    ///
    /// Only one readback is in flight at a time. A request made while one is
    /// pending is dropped, not queued: the hit point lags the pointer by at
    /// most one readback, and the next tick after the map completes requests
    /// the texel under the current pointer.
    pub fn request(
        &mut self,
        encoder: &mut wgpu::CommandEncoder,
        depth: &RenderTarget,
        texel: [u32; 2],
    ) {
        if self.is_pending() {
            return;
        }
        encoder.copy_texture_to_buffer(
            wgpu::TexelCopyTextureInfo {
                texture: depth.texture(),
                mip_level: 0,
                origin: wgpu::Origin3d {
                    x: texel[0],
                    y: texel[1],
                    z: 0,
                },
                aspect: wgpu::TextureAspect::All,
            },
            wgpu::TexelCopyBufferInfo {
                buffer: &self.staging,
                layout: wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: None,
                    rows_per_image: None,
                },
            },
            wgpu::Extent3d {
                width: 1,
                height: 1,
                depth_or_array_layers: 1,
            },
        );
        self.state = ReadbackState::Copied;
    }

    /// Start mapping the staging buffer. Call once the copy has been submitted.
    pub fn begin_map(&mut self) {
        if !matches!(self.state, ReadbackState::Copied) {
            return;
        }
        let (tx, rx) = std::sync::mpsc::channel();
        self.staging
            .slice(..)
            .map_async(wgpu::MapMode::Read, move |result| {
                let _ = tx.send(result);
            });
        self.state = ReadbackState::Mapping(rx);
    }

    /// Non-blocking. Returns the texel once the map has completed.
    pub fn poll(&mut self, device: &wgpu::Device) -> Option<[f32; 4]> {
        let ReadbackState::Mapping(rx) = &self.state else {
            return None;
        };
        device.poll(wgpu::Maintain::Poll);

        match rx.try_recv() {
            Ok(Ok(())) => {
                let data = self.staging.slice(..).get_mapped_range();
                let values: &[f32] = bytemuck::cast_slice(&data);
                let texel = [values[0], values[1], values[2], values[3]];
                drop(data);
                self.staging.unmap();
                self.state = ReadbackState::Idle;
                Some(texel)
            }
            Ok(Err(e)) => {
                log::warn!("Pointer readback map failed: {e}");
                self.state = ReadbackState::Idle;
                None
            }
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                self.state = ReadbackState::Idle;
                None
            }
        }
    }
}
