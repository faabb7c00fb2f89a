use fractalforge_compute::{
    evaluate_point, newton_code, render_tile, Complex, FractalParameters, Palette, PlaneMapping,
    RenderRegion, Resolution, ViewParameters, CUBE_ROOTS_OF_UNITY, DEFAULT_JULIA_C,
    DEFAULT_PALETTE_STEPS, PALETTE_NAMES,
};

#[test]
fn mandelbrot_center_pixel_reaches_cap() {
    let params = FractalParameters::mandelbrot(ViewParameters::new(-0.5, 0.0, 1.0, 100, 4.0));
    let resolution = Resolution::new(100, 100);
    let palette = Palette::generate("mandelbrot", DEFAULT_PALETTE_STEPS, None).unwrap();

    let out = render_tile(&params, resolution, resolution.full_region(), &palette, 10, |_| {});
    assert_eq!(out.iterations.get(50, 50), Some(100));
}

#[test]
fn newton_pixel_on_root_converges_immediately() {
    let params = FractalParameters::newton(
        ViewParameters::new(0.0, 0.0, 1.0, 50, 4.0),
        1e-6,
        CUBE_ROOTS_OF_UNITY.to_vec(),
    );
    let resolution = Resolution::new(100, 100);
    let mapping = PlaneMapping::new(params.view(), resolution);

    // (75, 50) maps to (1, 0)
    let point = mapping.pixel_to_complex(75, 50);
    assert!((point.real - 1.0).abs() < 1e-12 && point.imag == 0.0);

    let (root, iterations) = newton_code::decode(evaluate_point(&params, point));
    assert_eq!(root, 0);
    assert!(iterations <= 1);
}

#[test]
fn newton_matrix_decodes_to_known_roots() {
    let roots = vec![
        Complex::new(1.0, 0.0),
        Complex::new(-1.0, 0.0),
        Complex::new(0.0, 1.0),
        Complex::new(0.0, -1.0),
        Complex::new(0.5, 0.5),
    ];
    let params = FractalParameters::newton(ViewParameters::new(0.0, 0.0, 0.8, 40, 4.0), 1e-6, roots);
    let resolution = Resolution::new(40, 30);
    let palette = Palette::generate("newton", DEFAULT_PALETTE_STEPS, Some(5)).unwrap();

    let out = render_tile(&params, resolution, resolution.full_region(), &palette, 0, |_| {});
    for &value in out.iterations.values() {
        let (root, iterations) = newton_code::decode(value);
        assert!((-1..5).contains(&root), "root {root}");
        assert!(value.rem_euclid(100) < 100);
        assert!(iterations <= 40);
    }
}

#[test]
fn julia_tiles_compose_to_full_image() {
    let params = FractalParameters::julia(ViewParameters::new(0.0, 0.0, 1.0, 50, 4.0), DEFAULT_JULIA_C);
    let resolution = Resolution::new(64, 64);
    let palette = Palette::generate("julia", DEFAULT_PALETTE_STEPS, None).unwrap();
    let full = render_tile(&params, resolution, resolution.full_region(), &palette, 0, |_| {});

    let mut composed = vec![0u8; resolution.pixel_count() * 4];
    for ty in (0..64).step_by(24) {
        for tx in (0..64).step_by(24) {
            let region = RenderRegion::new(tx, ty, 24.min(64 - tx), 24.min(64 - ty));
            let tile = render_tile(&params, resolution, region, &palette, 0, |_| {});
            let row_bytes = region.width as usize * 4;
            for (y, src) in tile.pixels.chunks(row_bytes).enumerate() {
                let start = ((region.y as usize + y) * 64 + region.x as usize) * 4;
                composed[start..start + row_bytes].copy_from_slice(src);
            }
        }
    }

    assert_eq!(composed, full.pixels);
}

#[test]
fn every_palette_maps_cap_to_black() {
    let params = FractalParameters::mandelbrot(ViewParameters::new(-0.5, 0.0, 1.0, 100, 4.0));
    for name in PALETTE_NAMES {
        let palette = Palette::generate(name, 256, None).unwrap();
        assert_eq!(palette.len(), 256);
        assert_eq!(fractalforge_compute::colorize(100, &params, &palette), [0, 0, 0, 255]);
    }
}
