//! GPU-accelerated Mandelbrot iteration using wgpu compute shaders.
//!
//! The kernel runs in `f64`, so only adapters exposing
//! `wgpu::Features::SHADER_F64` are used. Colors are applied on the host.

mod buffers;
mod device;
mod error;
mod pipeline;
mod renderer;

pub use buffers::{GpuBuffers, Uniforms};
pub use device::{GpuAvailability, GpuContext};
pub use error::GpuError;
pub use pipeline::MandelbrotPipeline;
pub use renderer::{GpuRenderResult, GpuRenderer};
