use serde::{Deserialize, Serialize};

/// Target image size in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl Resolution {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Region covering the whole image.
    pub fn full_region(&self) -> RenderRegion {
        RenderRegion::new(0, 0, self.width, self.height)
    }
}

/// Sub-rectangle of the target image computed by one backend invocation (a tile).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RenderRegion {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl RenderRegion {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Area in pixels
    pub fn area(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Exclusive right edge, `None` if it does not fit in a `u32`.
    pub fn right(&self) -> Option<u32> {
        self.x.checked_add(self.width)
    }

    /// Exclusive bottom edge, `None` if it does not fit in a `u32`.
    pub fn bottom(&self) -> Option<u32> {
        self.y.checked_add(self.height)
    }

    /// Check if point is inside the region
    pub fn contains(&self, px: u32, py: u32) -> bool {
        px >= self.x && px - self.x < self.width && py >= self.y && py - self.y < self.height
    }

    /// True when the two regions share at least one pixel.
    pub fn overlaps(&self, other: &RenderRegion) -> bool {
        let span = |start: u32, len: u32| (u64::from(start), u64::from(start) + u64::from(len));
        let (left, right) = span(self.x, self.width);
        let (other_left, other_right) = span(other.x, other.width);
        let (top, bottom) = span(self.y, self.height);
        let (other_top, other_bottom) = span(other.y, other.height);
        left < other_right && other_left < right && top < other_bottom && other_top < bottom
    }

    /// True when the region lies entirely inside `resolution`. A region whose
    /// edges overflow never fits.
    pub fn fits_within(&self, resolution: Resolution) -> bool {
        matches!(self.right(), Some(right) if right <= resolution.width)
            && matches!(self.bottom(), Some(bottom) if bottom <= resolution.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn area_and_edges() {
        let region = RenderRegion::new(10, 20, 100, 50);
        assert_eq!(region.area(), 5000);
        assert_eq!(region.right(), Some(110));
        assert_eq!(region.bottom(), Some(70));
    }

    #[test]
    fn contains_point() {
        let region = RenderRegion::new(10, 20, 100, 50);

        assert!(region.contains(50, 40));
        assert!(region.contains(10, 20)); // Top-left corner
        assert!(region.contains(109, 69)); // Bottom-right corner
        assert!(!region.contains(110, 70)); // Just outside
        assert!(!region.contains(9, 20)); // Just left
        assert!(!region.contains(50, 19)); // Just above
    }

    #[test]
    fn adjacent_regions_do_not_overlap() {
        let left = RenderRegion::new(0, 0, 64, 64);
        let right = RenderRegion::new(64, 0, 64, 64);
        let below = RenderRegion::new(0, 64, 64, 64);
        assert!(!left.overlaps(&right));
        assert!(!left.overlaps(&below));
        assert!(left.overlaps(&RenderRegion::new(63, 63, 2, 2)));
    }

    #[test]
    fn fits_within_resolution() {
        let res = Resolution::new(100, 100);
        assert!(RenderRegion::new(36, 36, 64, 64).fits_within(res));
        assert!(!RenderRegion::new(64, 64, 64, 64).fits_within(res));
        assert_eq!(res.full_region().area(), res.pixel_count());
    }

    #[test]
    fn overflowing_edges_never_fit() {
        let res = Resolution::new(u32::MAX, u32::MAX);
        let wide = RenderRegion::new(u32::MAX - 1, 0, 10, 10);
        let tall = RenderRegion::new(0, u32::MAX - 1, 10, 10);

        assert_eq!(wide.right(), None);
        assert_eq!(tall.bottom(), None);
        assert!(!wide.fits_within(res));
        assert!(!tall.fits_within(res));
        assert!(wide.contains(u32::MAX, 5));
        assert!(wide.overlaps(&RenderRegion::new(u32::MAX, 0, 1, 1)));
    }

    #[test]
    fn serialization_roundtrip() {
        let original = RenderRegion::new(100, 200, 640, 480);
        let json = serde_json::to_string(&original).unwrap();
        let restored: RenderRegion = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, original);
    }
}
