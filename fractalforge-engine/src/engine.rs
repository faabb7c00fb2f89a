//! The render orchestrator.

use crate::config::EngineConfig;
use crate::error::RenderError;
use crate::fingerprint::Fingerprint;
use crate::lock;
use crate::metrics::{MetricsRecorder, PerformanceMetrics};
use crate::options::{Backend, RenderOptions};
use crate::result::{RenderResult, RenderStats};
use crate::tiles::{generate_tiles, tile_size_for};
use crate::worker_pool::WorkerPool;
use crate::{cpu_backend, gpu_backend};
use fractalforge_compute::{Palette, PaletteCache, WorkerSettings};
use fractalforge_core::{config_for, FractalKind, FractalParameters, IterationMatrix, Resolution};
use fractalforge_gpu::{GpuAvailability, GpuContext, GpuRenderer};
use futures::future::{BoxFuture, FutureExt, Shared};
use futures_channel::oneshot;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

/// A render in progress. Cloning it yields another handle to the same
/// computation; every clone resolves to the same result.
pub type RenderFuture = Shared<BoxFuture<'static, Result<Arc<RenderResult>, RenderError>>>;

/// Single entry point for rendering.
///
/// Owns the optional GPU renderer, the worker pool, the palette cache, the
/// in-flight map used for deduplication and the metrics ring. `Drop`
/// disposes everything.
pub struct FractalEngine {
    inner: Arc<EngineInner>,
}

struct EngineInner {
    config: EngineConfig,
    state: Mutex<EngineState>,
    in_flight: Mutex<HashMap<Fingerprint, RenderFuture>>,
    metrics: Mutex<MetricsRecorder>,
    palettes: Mutex<PaletteCache>,
    dispatches: AtomicU64,
}

#[derive(Default)]
struct EngineState {
    initialized: bool,
    resolution: Option<Resolution>,
    gpu: Option<Arc<GpuRenderer>>,
    pool: Option<Arc<WorkerPool>>,
}

impl Default for FractalEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl FractalEngine {
    pub fn new(config: EngineConfig) -> Self {
        let inner = EngineInner {
            metrics: Mutex::new(MetricsRecorder::new(config.metrics_capacity)),
            palettes: Mutex::new(PaletteCache::new(config.palette_cache_capacity)),
            config,
            state: Mutex::new(EngineState::default()),
            in_flight: Mutex::new(HashMap::new()),
            dispatches: AtomicU64::new(0),
        };
        Self {
            inner: Arc::new(inner),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.inner.config
    }

    /// Bring up the GPU and the worker pool concurrently.
    ///
    /// Failures of either are logged and leave that backend unavailable.
    /// Calling this on an initialized engine does nothing.
    pub async fn initialize(&self, resolution: Resolution) {
        if lock(&self.inner.state).initialized {
            log::info!("Engine already initialized, ignoring initialize");
            return;
        }

        let config = &self.inner.config;
        let enable_gpu = config.enable_gpu;
        let pool_size = config.worker_count(num_cpus::get());
        let settings = config.worker_settings();
        let timeout = Duration::from_millis(config.worker_init_timeout_ms);

        let (gpu, pool) = run_concurrently(
            ("fractalforge-gpu-init", move || init_gpu(enable_gpu)),
            ("fractalforge-pool-init", move || init_pool(pool_size, settings, timeout)),
        )
        .await;
        let (gpu, pool) = (gpu.flatten(), pool.flatten());

        {
            let mut state = lock(&self.inner.state);
            if state.initialized {
                drop(state);
                log::info!("Engine initialized concurrently, discarding duplicate backends");
                if let Some(pool) = pool {
                    pool.shutdown();
                }
                return;
            }
            *state = EngineState {
                initialized: true,
                resolution: Some(resolution),
                gpu,
                pool,
            };
        }

        let palette = RenderOptions::new(resolution).palette;
        if let Err(e) = self.inner.palette(&palette, None) {
            log::warn!("Failed to pre-warm palette '{palette}': {e}");
        }

        log::info!(
            "Engine ready at {}x{}: gpu={}, workers={}",
            resolution.width,
            resolution.height,
            self.gpu_supported(),
            self.available_workers()
        );
    }

    /// Start (or join) a render.
    ///
    /// The request is registered before this returns, so an identical
    /// request made before the first one completes shares its result and
    /// causes no second dispatch.
    pub fn render_fractal(&self, params: FractalParameters, options: RenderOptions) -> RenderFuture {
        let key = Fingerprint::new(&params, &options);

        let mut in_flight = lock(&self.inner.in_flight);
        if let Some(existing) = in_flight.get(&key) {
            log::debug!("Joining in-flight render {}", key.as_str());
            return existing.clone();
        }

        let inner = Arc::clone(&self.inner);
        let cleanup_key = key.clone();
        let future = async move {
            let result = inner.run(params, options).await;
            lock(&inner.in_flight).remove(&cleanup_key);
            result
        }
        .boxed()
        .shared();

        in_flight.insert(key, future.clone());
        future
    }

    /// [`render_fractal`](Self::render_fractal) with an explicit kind that
    /// must agree with the parameters.
    pub fn render_fractal_kind(
        &self,
        kind: FractalKind,
        params: FractalParameters,
        options: RenderOptions,
    ) -> RenderFuture {
        if params.kind() != kind {
            let error = RenderError::InvalidRequest(format!(
                "requested {kind} but parameters describe {}",
                params.kind()
            ));
            return futures::future::ready(Err::<Arc<RenderResult>, _>(error))
                .boxed()
                .shared();
        }
        self.render_fractal(params, options)
    }

    pub fn gpu_supported(&self) -> bool {
        lock(&self.inner.state).gpu.is_some()
    }

    pub fn available_workers(&self) -> usize {
        lock(&self.inner.state)
            .pool
            .as_ref()
            .map_or(0, |pool| pool.worker_count())
    }

    pub fn is_ready(&self) -> bool {
        lock(&self.inner.state).initialized
    }

    /// Resolution recorded by the last `initialize`.
    pub fn resolution(&self) -> Option<Resolution> {
        lock(&self.inner.state).resolution
    }

    pub fn performance_metrics(&self) -> PerformanceMetrics {
        lock(&self.inner.metrics).snapshot()
    }

    /// Number of renders actually sent to a backend.
    pub fn dispatch_count(&self) -> u64 {
        self.inner.dispatches.load(Ordering::Relaxed)
    }

    /// Drop cached palettes here and in every worker.
    pub fn clear_palette_cache(&self) {
        lock(&self.inner.palettes).clear();
        let pool = lock(&self.inner.state).pool.clone();
        if let Some(pool) = pool {
            pool.broadcast_clear_palettes();
        }
    }

    /// Release every backend. Safe to call repeatedly and before
    /// `initialize`.
    pub fn dispose(&self) {
        self.inner.dispose();
    }
}

impl Drop for FractalEngine {
    fn drop(&mut self) {
        self.inner.dispose();
    }
}

/// Pick the backend for one request.
///
/// A pinned backend must both exist and have a kernel for `kind`. Otherwise
/// the preference chain is GPU, then the worker pool, then the single-thread
/// CPU path.
pub fn select_backend(
    kind: FractalKind,
    options: &RenderOptions,
    gpu_available: bool,
    workers: usize,
) -> Result<Backend, RenderError> {
    let gpu_kernel = config_for(kind).gpu_kernel;

    match options.backend {
        Some(Backend::Gpu) if !gpu_kernel => Err(RenderError::UnsupportedCombination {
            kind,
            backend: Backend::Gpu,
        }),
        Some(Backend::Gpu) if !gpu_available => Err(RenderError::BackendUnavailable(Backend::Gpu)),
        Some(Backend::Workers) if workers == 0 => {
            Err(RenderError::BackendUnavailable(Backend::Workers))
        }
        Some(backend) => Ok(backend),
        None if options.prefer_gpu && gpu_available && gpu_kernel => Ok(Backend::Gpu),
        None if options.prefer_workers && workers > 0 => Ok(Backend::Workers),
        None => Ok(Backend::Cpu),
    }
}

impl EngineInner {
    fn palette(&self, name: &str, root_count: Option<usize>) -> Result<Arc<Palette>, RenderError> {
        let palette = lock(&self.palettes).get(name, self.config.palette_steps, root_count)?;
        Ok(palette)
    }

    async fn run(
        &self,
        params: FractalParameters,
        options: RenderOptions,
    ) -> Result<Arc<RenderResult>, RenderError> {
        let (gpu, pool) = {
            let state = lock(&self.state);
            if !state.initialized {
                return Err(RenderError::NotInitialized);
            }
            (state.gpu.clone(), state.pool.clone())
        };

        params.validate()?;
        let resolution = options.resolution;
        if resolution.is_empty() {
            return Err(RenderError::InvalidRequest(format!(
                "resolution {}x{} has no pixels",
                resolution.width, resolution.height
            )));
        }

        let workers = pool.as_ref().map_or(0, |pool| pool.worker_count());
        let backend = select_backend(params.kind(), &options, gpu.is_some(), workers)?;
        let palette = self.palette(&options.palette, params.root_count())?;

        log::debug!(
            "Rendering {} at {}x{} on {backend}",
            params.kind(),
            resolution.width,
            resolution.height
        );
        self.dispatches.fetch_add(1, Ordering::Relaxed);

        let on_progress = |p: f32| options.report(p);
        let start = Instant::now();
        let mut tiles_processed = None;
        let mut workers_used = None;

        let (pixels, iterations): (Vec<u8>, IterationMatrix) = match backend {
            Backend::Gpu => {
                let gpu = gpu.ok_or(RenderError::BackendUnavailable(Backend::Gpu))?;
                gpu_backend::render(&gpu, &params, resolution, &palette, &on_progress).await?
            }
            Backend::Workers => {
                let pool = pool.ok_or(RenderError::BackendUnavailable(Backend::Workers))?;
                let size = tile_size_for(resolution.pixel_count(), workers, options.tile_size);
                let tiles = generate_tiles(resolution, size);
                tiles_processed = Some(tiles.len());
                workers_used = Some(workers.min(tiles.len()));

                let image = pool
                    .render(&params, &options.palette, resolution, &tiles, &on_progress)
                    .await?;
                (image.pixels, image.iterations)
            }
            Backend::Cpu => {
                let output = cpu_backend::render(
                    &params,
                    resolution,
                    &palette,
                    self.config.cpu_yield_rows,
                    &on_progress,
                )
                .await;
                (output.pixels, output.iterations)
            }
        };

        let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;
        let mut stats = RenderStats::from_matrix(&params, &iterations);
        stats.tiles_processed = tiles_processed;
        stats.workers_used = workers_used;

        lock(&self.metrics).record(elapsed_ms, stats.memory_estimate_bytes);
        log::debug!("Render on {backend} finished in {elapsed_ms:.1}ms");

        Ok(Arc::new(RenderResult {
            resolution,
            pixels,
            iterations,
            elapsed_ms,
            backend,
            stats,
        }))
    }

    fn dispose(&self) {
        let (was_initialized, pool, gpu) = {
            let mut state = lock(&self.state);
            let was_initialized = state.initialized;
            state.initialized = false;
            state.resolution = None;
            (was_initialized, state.pool.take(), state.gpu.take())
        };

        if let Some(pool) = pool {
            pool.shutdown();
        }
        drop(gpu);

        let in_flight = std::mem::take(&mut *lock(&self.in_flight));
        drop(in_flight);
        lock(&self.metrics).clear();
        lock(&self.palettes).clear();

        if was_initialized {
            log::info!("Engine disposed");
        }
    }
}

/// Run both jobs on their own threads and wait for both.
///
/// Each thread is started before either result is awaited, so the total
/// time is that of the slower job. A job whose thread cannot start, or that
/// panics, yields `None`.
async fn run_concurrently<A, B, FA, FB>(first: (&str, FA), second: (&str, FB)) -> (Option<A>, Option<B>)
where
    A: Send + 'static,
    B: Send + 'static,
    FA: FnOnce() -> A + Send + 'static,
    FB: FnOnce() -> B + Send + 'static,
{
    let first = spawn_job(first.0, first.1);
    let second = spawn_job(second.0, second.1);
    futures::join!(await_job(first), await_job(second))
}

fn spawn_job<T: Send + 'static>(
    name: &str,
    job: impl FnOnce() -> T + Send + 'static,
) -> Option<oneshot::Receiver<T>> {
    let (tx, rx) = oneshot::channel();
    let spawned = thread::Builder::new().name(name.to_string()).spawn(move || {
        let _ = tx.send(job());
    });
    match spawned {
        Ok(_) => Some(rx),
        Err(e) => {
            log::warn!("Failed to start {name}: {e}");
            None
        }
    }
}

async fn await_job<T>(job: Option<oneshot::Receiver<T>>) -> Option<T> {
    match job {
        Some(rx) => rx.await.ok(),
        None => None,
    }
}

/// Blocking GPU bring-up, run on its own thread.
fn init_gpu(enabled: bool) -> Option<Arc<GpuRenderer>> {
    if !enabled {
        log::info!("GPU disabled by configuration");
        return None;
    }

    match pollster::block_on(GpuContext::try_init()) {
        GpuAvailability::Available(context) => {
            log::info!(
                "GPU available: {} ({:?})",
                context.adapter_info.name,
                context.adapter_info.backend
            );
            Some(Arc::new(GpuRenderer::new(context)))
        }
        GpuAvailability::Unavailable(reason) => {
            log::warn!("Continuing without GPU: {reason}");
            None
        }
    }
}

/// Blocking pool start-up; waits for the workers' `Ready` messages.
fn init_pool(size: usize, settings: WorkerSettings, timeout: Duration) -> Option<Arc<WorkerPool>> {
    if size == 0 {
        log::info!("Worker pool disabled by configuration");
        return None;
    }

    let pool = WorkerPool::spawn(size, settings, timeout);
    if pool.worker_count() == 0 {
        log::warn!("No worker threads could be started, using single-thread rendering");
        return None;
    }
    Some(Arc::new(pool))
}
