//! Uniform layout and per-call buffers for the Mandelbrot kernel.

use bytemuck::{Pod, Zeroable};
use fractalforge_core::{PlaneMapping, Resolution, ViewParameters};

/// Mirrors `Params` in `mandelbrot.wgsl`. The mapping fields are the
/// precomputed values from [`PlaneMapping`] so the shader performs the same
/// arithmetic as the CPU.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Uniforms {
    pub center_x: f64,
    pub center_y: f64,
    pub scale: f64,
    pub half_width: f64,
    pub half_height: f64,
    pub escape_radius: f64,
    pub width: u32,
    pub height: u32,
    pub max_iterations: u32,
    pub _pad: u32,
}

impl Uniforms {
    pub fn new(view: &ViewParameters, resolution: Resolution) -> Self {
        let mapping = PlaneMapping::new(view, resolution);
        Self {
            center_x: mapping.center_x,
            center_y: mapping.center_y,
            scale: mapping.scale,
            half_width: mapping.half_width,
            half_height: mapping.half_height,
            escape_radius: view.escape_radius,
            width: resolution.width,
            height: resolution.height,
            max_iterations: view.iterations,
            _pad: 0,
        }
    }
}

/// Buffers for one dispatch. Allocated per call and dropped afterwards.
pub struct GpuBuffers {
    pub uniforms: wgpu::Buffer,
    pub iterations: wgpu::Buffer,
    pub staging: wgpu::Buffer,
    pub byte_len: u64,
}

impl GpuBuffers {
    pub fn new(device: &wgpu::Device, resolution: Resolution) -> Self {
        let byte_len = (resolution.pixel_count() * std::mem::size_of::<u32>()) as u64;

        let uniforms = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("mandelbrot_uniforms"),
            size: std::mem::size_of::<Uniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let iterations = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("mandelbrot_iterations"),
            size: byte_len,
            usage: wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_SRC,
            mapped_at_creation: false,
        });

        let staging = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("mandelbrot_staging"),
            size: byte_len,
            usage: wgpu::BufferUsages::MAP_READ | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        Self {
            uniforms,
            iterations,
            staging,
            byte_len,
        }
    }
}
