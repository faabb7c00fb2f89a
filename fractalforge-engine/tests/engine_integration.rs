use fractalforge_core::{
    config_for, newton_code, Complex, FractalKind, FractalParameters, Resolution, ViewParameters,
    CUBE_ROOTS_OF_UNITY,
};
use fractalforge_engine::{Backend, EngineConfig, FractalEngine, RenderError, RenderOptions};
use pollster::block_on;
use std::sync::{Arc, Mutex};

fn engine() -> FractalEngine {
    let config = EngineConfig {
        max_workers: 2,
        enable_gpu: false,
        ..EngineConfig::default()
    };
    let engine = FractalEngine::new(config);
    block_on(engine.initialize(Resolution::new(64, 64)));
    engine
}

fn params(kind: FractalKind, iterations: u32) -> FractalParameters {
    let mut params = config_for(kind).default_parameters();
    match &mut params {
        FractalParameters::Mandelbrot { view }
        | FractalParameters::Julia { view, .. }
        | FractalParameters::BurningShip { view }
        | FractalParameters::Newton { view, .. } => view.iterations = iterations,
    }
    params
}

#[test]
fn initialize_builds_the_pool() {
    let engine = engine();
    assert!(engine.is_ready());
    assert!(!engine.gpu_supported());
    assert_eq!(engine.available_workers(), num_cpus::get().min(2));
    assert_eq!(engine.resolution(), Some(Resolution::new(64, 64)));

    // second initialize is a no-op
    block_on(engine.initialize(Resolution::new(8, 8)));
    assert_eq!(engine.resolution(), Some(Resolution::new(64, 64)));
}

#[test]
fn concurrent_identical_requests_share_one_dispatch() {
    let engine = engine();
    let params = params(FractalKind::Mandelbrot, 100);
    let options = RenderOptions::new(Resolution::new(64, 64));

    let first = engine.render_fractal(params.clone(), options.clone());
    let second = engine.render_fractal(params.clone(), options.clone());
    let (a, b) = block_on(async { futures::join!(first, second) });

    let (a, b) = (a.unwrap(), b.unwrap());
    assert!(Arc::ptr_eq(&a, &b));
    assert_eq!(engine.dispatch_count(), 1);

    // completed renders leave the in-flight map
    block_on(engine.render_fractal(params, options)).unwrap();
    assert_eq!(engine.dispatch_count(), 2);
}

#[test]
fn mandelbrot_center_pixel_reaches_the_cap() {
    let engine = engine();
    let params = FractalParameters::mandelbrot(ViewParameters::new(-0.5, 0.0, 1.0, 100, 4.0));

    for backend in [Backend::Workers, Backend::Cpu] {
        let options = RenderOptions::new(Resolution::new(100, 100)).with_backend(backend);
        let result = block_on(engine.render_fractal(params.clone(), options)).unwrap();
        assert_eq!(result.backend, backend);
        assert_eq!(result.iterations.get(50, 50), Some(100));
        // interior pixels are black
        let i = (50 * 100 + 50) * 4;
        assert_eq!(&result.pixels[i..i + 4], &[0, 0, 0, 255]);
    }
}

#[test]
fn julia_pool_matches_single_thread() {
    let engine = engine();
    let params = FractalParameters::julia(
        ViewParameters::new(0.0, 0.0, 1.0, 50, 4.0),
        Complex::new(-0.7, 0.27015),
    );
    let options = RenderOptions::for_kind(FractalKind::Julia, Resolution::new(64, 64));

    let pooled = block_on(engine.render_fractal(params.clone(), options.clone().with_tile_size(16))).unwrap();
    let single = block_on(engine.render_fractal(params, options.with_backend(Backend::Cpu))).unwrap();

    assert_eq!(pooled.backend, Backend::Workers);
    assert_eq!(single.backend, Backend::Cpu);
    assert_eq!(pooled.iterations, single.iterations);
    assert_eq!(pooled.pixels, single.pixels);
    assert_eq!(pooled.stats.tiles_processed, Some(16));
    assert_eq!(single.stats.tiles_processed, None);
}

#[test]
fn newton_point_on_root_converges_immediately() {
    let engine = engine();
    let params = FractalParameters::newton(
        ViewParameters::new(0.0, 0.0, 1.0, 50, 4.0),
        1e-6,
        CUBE_ROOTS_OF_UNITY.to_vec(),
    );
    let options = RenderOptions::for_kind(FractalKind::Newton, Resolution::new(100, 100));
    let result = block_on(engine.render_fractal(params, options)).unwrap();

    // pixel 75 of 100 at zoom 1 maps to real part 1.0
    let (root, iterations) = newton_code::decode(result.iterations.get(75, 50).unwrap());
    assert_eq!(root, 0);
    assert!(iterations <= 1);

    for &value in result.iterations.values() {
        let (root, iterations) = newton_code::decode(value);
        assert!((-1..3).contains(&root));
        assert!(iterations < 100);
    }
    assert!(result.stats.max_iterations <= 50);
}

#[test]
fn every_kind_renders_deterministically() {
    let engine = engine();
    let resolution = Resolution::new(48, 40);

    for kind in FractalKind::ALL {
        let params = params(kind, 64);
        for backend in [Backend::Workers, Backend::Cpu] {
            let options = RenderOptions::for_kind(kind, resolution).with_backend(backend);
            let first = block_on(engine.render_fractal(params.clone(), options.clone())).unwrap();
            let second = block_on(engine.render_fractal(params.clone(), options)).unwrap();
            assert_eq!(first.iterations, second.iterations, "{kind} on {backend}");
            assert_eq!(first.pixels, second.pixels, "{kind} on {backend}");
            assert_eq!(first.pixels.len(), resolution.pixel_count() * 4);
        }
    }
}

#[test]
fn render_before_initialize_fails() {
    let engine = FractalEngine::new(EngineConfig {
        enable_gpu: false,
        ..EngineConfig::default()
    });
    let result = block_on(engine.render_fractal(
        params(FractalKind::Mandelbrot, 10),
        RenderOptions::new(Resolution::new(8, 8)),
    ));
    assert_eq!(result.unwrap_err(), RenderError::NotInitialized);
}

#[test]
fn dispose_is_idempotent_and_resets_capabilities() {
    let engine = engine();
    block_on(engine.render_fractal(
        params(FractalKind::Julia, 20),
        RenderOptions::new(Resolution::new(16, 16)),
    ))
    .unwrap();

    engine.dispose();
    engine.dispose();
    assert!(!engine.is_ready());
    assert_eq!(engine.available_workers(), 0);
    assert_eq!(engine.performance_metrics().render_count, 0);

    let result = block_on(engine.render_fractal(
        params(FractalKind::Julia, 20),
        RenderOptions::new(Resolution::new(16, 16)),
    ));
    assert_eq!(result.unwrap_err(), RenderError::NotInitialized);

    block_on(engine.initialize(Resolution::new(16, 16)));
    assert!(engine.is_ready());
    assert!(engine.available_workers() > 0);
}

#[test]
fn pinned_backends_are_checked_before_dispatch() {
    let engine = engine();
    let julia = RenderOptions::new(Resolution::new(16, 16)).with_backend(Backend::Gpu);
    let result = block_on(engine.render_fractal(params(FractalKind::Julia, 20), julia));
    assert_eq!(
        result.unwrap_err(),
        RenderError::UnsupportedCombination {
            kind: FractalKind::Julia,
            backend: Backend::Gpu
        }
    );

    let mandelbrot = RenderOptions::new(Resolution::new(16, 16)).with_backend(Backend::Gpu);
    let result = block_on(engine.render_fractal(params(FractalKind::Mandelbrot, 20), mandelbrot));
    assert_eq!(result.unwrap_err(), RenderError::BackendUnavailable(Backend::Gpu));
    assert_eq!(engine.dispatch_count(), 0);
}

#[test]
fn invalid_requests_are_rejected() {
    let engine = engine();
    let resolution = Resolution::new(16, 16);

    let no_roots = FractalParameters::newton(ViewParameters::new(0.0, 0.0, 1.0, 20, 4.0), 1e-6, vec![]);
    let result = block_on(engine.render_fractal(no_roots, RenderOptions::new(resolution)));
    assert!(matches!(result, Err(RenderError::InvalidRequest(_))));

    let empty = RenderOptions::new(Resolution::new(0, 16));
    let result = block_on(engine.render_fractal(params(FractalKind::Mandelbrot, 20), empty));
    assert!(matches!(result, Err(RenderError::InvalidRequest(_))));

    let plaid = RenderOptions::new(resolution).with_palette("plaid");
    let result = block_on(engine.render_fractal(params(FractalKind::Mandelbrot, 20), plaid));
    assert!(matches!(result, Err(RenderError::Palette(_))));

    let result = block_on(engine.render_fractal_kind(
        FractalKind::Julia,
        params(FractalKind::Mandelbrot, 20),
        RenderOptions::new(resolution),
    ));
    assert!(matches!(result, Err(RenderError::InvalidRequest(_))));

    // the engine stays usable
    block_on(engine.render_fractal(params(FractalKind::Mandelbrot, 20), RenderOptions::new(resolution)))
        .unwrap();
}

#[test]
fn progress_is_monotone_and_ends_at_one() {
    let engine = engine();

    for backend in [Backend::Workers, Backend::Cpu] {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let options = RenderOptions::new(Resolution::new(64, 64))
            .with_backend(backend)
            .with_tile_size(16)
            .on_progress(move |p| sink.lock().unwrap().push(p));

        block_on(engine.render_fractal(params(FractalKind::BurningShip, 40), options)).unwrap();

        let seen = seen.lock().unwrap();
        assert!(!seen.is_empty());
        assert!(seen.windows(2).all(|w| w[0] <= w[1]), "{backend}: {seen:?}");
        assert_eq!(seen.last().copied(), Some(1.0));
    }
}

#[test]
fn metrics_track_completed_renders() {
    let engine = engine();
    assert_eq!(engine.performance_metrics().render_count, 0);

    for zoom in [1.0, 2.0] {
        let params = FractalParameters::mandelbrot(ViewParameters::new(-0.5, 0.0, zoom, 50, 4.0));
        block_on(engine.render_fractal(params, RenderOptions::new(Resolution::new(32, 32)))).unwrap();
    }

    let metrics = engine.performance_metrics();
    assert_eq!(metrics.render_count, 2);
    assert!(metrics.last_render_time_ms > 0.0);
    assert!(metrics.fps > 0.0);
    assert!(metrics.total_render_time_ms >= metrics.last_render_time_ms);
    assert!(metrics.memory_usage_mb > 0.0);
}

#[test]
fn clearing_palettes_keeps_rendering_working() {
    let engine = engine();
    let options = RenderOptions::for_kind(FractalKind::Newton, Resolution::new(24, 24));
    let before = block_on(engine.render_fractal(params(FractalKind::Newton, 30), options.clone())).unwrap();

    engine.clear_palette_cache();

    let after = block_on(engine.render_fractal(params(FractalKind::Newton, 30), options)).unwrap();
    assert_eq!(before.pixels, after.pixels);
}
