use fractalforge_core::{RenderRegion, Resolution};

/// Tile edge length for a render split across `worker_count` workers.
///
/// Monotone in the pixels each worker would own: small per-worker shares get
/// small tiles so the pool stays evenly loaded. `hint` overrides the policy.
pub fn tile_size_for(pixel_count: usize, worker_count: usize, hint: Option<u32>) -> u32 {
    if let Some(size) = hint.filter(|&s| s > 0) {
        return size;
    }

    let per_worker = pixel_count / worker_count.max(1);
    if per_worker < 16_384 {
        64
    } else if per_worker < 65_536 {
        96
    } else if per_worker < 262_144 {
        128
    } else {
        160
    }
}

/// Row-major grid of tiles covering the image, edge tiles clipped.
pub fn generate_tiles(resolution: Resolution, tile_size: u32) -> Vec<RenderRegion> {
    let Resolution { width, height } = resolution;
    let step = tile_size.max(1);
    let mut tiles = Vec::new();

    for y_start in (0..height).step_by(step as usize) {
        for x_start in (0..width).step_by(step as usize) {
            let w = step.min(width - x_start);
            let h = step.min(height - y_start);
            tiles.push(RenderRegion::new(x_start, y_start, w, h));
        }
    }

    tiles
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tile_size_bands() {
        assert_eq!(tile_size_for(100 * 100, 1, None), 64);
        assert_eq!(tile_size_for(200 * 200, 1, None), 96);
        assert_eq!(tile_size_for(400 * 400, 1, None), 128);
        assert_eq!(tile_size_for(1920 * 1080, 1, None), 160);
        // 1920x1080 over 16 workers is 129_600 pixels each
        assert_eq!(tile_size_for(1920 * 1080, 16, None), 128);
    }

    #[test]
    fn tile_size_is_monotone() {
        let mut last = 0;
        for pixels in (0..1_000_000).step_by(4096) {
            let size = tile_size_for(pixels, 1, None);
            assert!(size >= last);
            last = size;
        }
    }

    #[test]
    fn hint_overrides_policy() {
        assert_eq!(tile_size_for(1920 * 1080, 8, Some(32)), 32);
        assert_eq!(tile_size_for(1920 * 1080, 1, Some(0)), 160);
    }

    #[test]
    fn generate_tiles_covers_canvas_exactly() {
        let tiles = generate_tiles(Resolution::new(256, 256), 64);

        // Should be 4x4 = 16 tiles
        assert_eq!(tiles.len(), 16);

        let total_area: usize = tiles.iter().map(|t| t.area()).sum();
        assert_eq!(total_area, 256 * 256);
    }

    #[test]
    fn generate_tiles_handles_non_divisible_sizes() {
        let tiles = generate_tiles(Resolution::new(100, 100), 64);

        // 100/64 = 1.56, so 2x2 = 4 tiles
        assert_eq!(tiles.len(), 4);

        // Edge tiles should be smaller
        assert!(tiles.iter().any(|t| t.width == 36));
        assert!(tiles.iter().any(|t| t.height == 36));
    }

    #[test]
    fn generate_tiles_is_row_major() {
        let tiles = generate_tiles(Resolution::new(130, 70), 64);
        let origins: Vec<_> = tiles.iter().map(|t| (t.x, t.y)).collect();
        assert_eq!(
            origins,
            vec![(0, 0), (64, 0), (128, 0), (0, 64), (64, 64), (128, 64)]
        );
    }

    #[test]
    fn generate_tiles_no_overlap() {
        let resolution = Resolution::new(203, 117);
        let tiles = generate_tiles(resolution, 48);

        for (i, a) in tiles.iter().enumerate() {
            assert!(a.fits_within(resolution));
            for (j, b) in tiles.iter().enumerate() {
                if i != j {
                    assert!(!a.overlaps(b), "Tiles {} and {} overlap", i, j);
                }
            }
        }

        let total_area: usize = tiles.iter().map(|t| t.area()).sum();
        assert_eq!(total_area, resolution.pixel_count());
    }

    #[test]
    fn empty_resolution_has_no_tiles() {
        assert!(generate_tiles(Resolution::new(0, 10), 64).is_empty());
    }
}
