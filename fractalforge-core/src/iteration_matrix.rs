use crate::RenderRegion;
use serde::{Deserialize, Serialize};

/// Per-pixel kernel output, `height` rows of `width` values, row-major.
///
/// Escape-time kinds store the iteration count. Newton stores the composite
/// `root * 100 + iterations` value (see [`crate::newton_code`]).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IterationMatrix {
    width: u32,
    height: u32,
    values: Vec<i32>,
}

impl IterationMatrix {
    /// Zero-filled matrix.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            values: vec![0; width as usize * height as usize],
        }
    }

    /// Wrap a flat row-major buffer. Returns `None` if the length is wrong.
    pub fn from_values(width: u32, height: u32, values: Vec<i32>) -> Option<Self> {
        if values.len() != width as usize * height as usize {
            return None;
        }
        Some(Self {
            width,
            height,
            values,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn values(&self) -> &[i32] {
        &self.values
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    pub fn get(&self, x: u32, y: u32) -> Option<i32> {
        if x < self.width && y < self.height {
            Some(self.values[self.index(x, y)])
        } else {
            None
        }
    }

    pub fn set(&mut self, x: u32, y: u32, value: i32) {
        let idx = self.index(x, y);
        self.values[idx] = value;
    }

    fn rows(&self) -> impl Iterator<Item = &[i32]> {
        self.values.chunks(self.width.max(1) as usize)
    }

    /// Copy `tile` (sized `region.width x region.height`) into this matrix at
    /// the region's offset.
    pub fn copy_region_from(&mut self, tile: &IterationMatrix, region: RenderRegion) {
        debug_assert_eq!(tile.width, region.width);
        debug_assert_eq!(tile.height, region.height);
        let row_len = region.width as usize;
        for (local_y, src) in tile.rows().enumerate() {
            let start = self.index(region.x, region.y + local_y as u32);
            self.values[start..start + row_len].copy_from_slice(src);
        }
    }

    /// Nested `rows x columns` shape.
    pub fn to_nested(&self) -> Vec<Vec<i32>> {
        self.rows().map(|row| row.to_vec()).collect()
    }
}
