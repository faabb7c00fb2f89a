//! Host side of the Mandelbrot compute kernel.

use crate::buffers::{GpuBuffers, Uniforms};
use crate::device::GpuContext;
use crate::error::GpuError;
use crate::pipeline::MandelbrotPipeline;
use fractalforge_core::{FractalParameters, IterationMatrix, Resolution};
use std::time::Instant;

/// Result of a GPU render.
pub struct GpuRenderResult {
    pub iterations: IterationMatrix,
    pub compute_time_ms: f64,
}

/// Renders Mandelbrot iteration matrices on the GPU.
///
/// The pipeline is compiled once; buffers are allocated for every call and
/// released when it returns. Concurrent callers share the device and the
/// queue serializes their submissions.
pub struct GpuRenderer {
    context: GpuContext,
    pipeline: MandelbrotPipeline,
}

impl GpuRenderer {
    pub fn new(context: GpuContext) -> Self {
        let pipeline = MandelbrotPipeline::new(&context.device);
        Self { context, pipeline }
    }

    /// Iteration counts for every pixel of a `resolution` image.
    pub async fn render(
        &self,
        params: &FractalParameters,
        resolution: Resolution,
    ) -> Result<GpuRenderResult, GpuError> {
        let FractalParameters::Mandelbrot { view } = params else {
            return Err(GpuError::UnsupportedKind(params.kind()));
        };
        if resolution.is_empty() {
            return Err(GpuError::EmptyImage(resolution.width, resolution.height));
        }

        let start = Instant::now();
        let device = &self.context.device;
        let buffers = GpuBuffers::new(device, resolution);

        let uniforms = Uniforms::new(view, resolution);
        self.context
            .queue
            .write_buffer(&buffers.uniforms, 0, bytemuck::bytes_of(&uniforms));

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("mandelbrot_bind_group"),
            layout: &self.pipeline.bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: buffers.uniforms.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: buffers.iterations.as_entire_binding(),
                },
            ],
        });

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("mandelbrot_encoder"),
        });

        {
            let mut compute_pass = encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
                label: Some("mandelbrot_pass"),
                timestamp_writes: None,
            });
            compute_pass.set_pipeline(&self.pipeline.compute_pipeline);
            compute_pass.set_bind_group(0, &bind_group, &[]);
            compute_pass.dispatch_workgroups(
                resolution.width.div_ceil(8),
                resolution.height.div_ceil(8),
                1,
            );
        }

        encoder.copy_buffer_to_buffer(
            &buffers.iterations,
            0,
            &buffers.staging,
            0,
            buffers.byte_len,
        );

        self.context.queue.submit(std::iter::once(encoder.finish()));

        let counts = self.read_buffer_u32(&buffers.staging).await?;
        let values = counts
            .into_iter()
            .map(|count| count.min(i32::MAX as u32) as i32)
            .collect();
        let iterations = IterationMatrix::from_values(resolution.width, resolution.height, values)
            .ok_or_else(|| GpuError::Unavailable("readback size mismatch".into()))?;

        let compute_time_ms = start.elapsed().as_secs_f64() * 1000.0;
        log::debug!(
            "GPU rendered {}x{} in {compute_time_ms:.2}ms",
            resolution.width,
            resolution.height
        );

        Ok(GpuRenderResult {
            iterations,
            compute_time_ms,
        })
    }

    async fn read_buffer_u32(&self, buffer: &wgpu::Buffer) -> Result<Vec<u32>, GpuError> {
        let slice = buffer.slice(..);

        let (tx, rx) = futures_channel::oneshot::channel();
        slice.map_async(wgpu::MapMode::Read, move |result| {
            let _ = tx.send(result);
        });

        self.context.device.poll(wgpu::Maintain::Wait);

        rx.await
            .map_err(|_| GpuError::Unavailable("Channel closed".into()))?
            .map_err(GpuError::BufferMap)?;

        let data = {
            let view = slice.get_mapped_range();
            bytemuck::cast_slice(&view).to_vec()
        };
        buffer.unmap();

        Ok(data)
    }
}
