use std::cmp;
use std::iter::FusedIterator;

use crate::geometry::{ScreenPoint, ScreenSize};

/// Half-open rectangle of pixels: min is inside, max is outside.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ScreenBlock {
    pub min: ScreenPoint,
    pub max: ScreenPoint,
}

impl ScreenBlock {
    pub fn new(min: ScreenPoint, max: ScreenPoint) -> ScreenBlock {
        ScreenBlock { min, max }
    }

    pub fn from_size(size: ScreenSize) -> ScreenBlock {
        ScreenBlock {
            min: ScreenPoint::origin(),
            max: ScreenPoint::origin() + size,
        }
    }

    pub fn width(&self) -> u32 {
        self.max.x.saturating_sub(self.min.x)
    }

    pub fn height(&self) -> u32 {
        self.max.y.saturating_sub(self.min.y)
    }

    pub fn area(&self) -> u32 {
        self.width() * self.height()
    }

    pub fn is_empty(&self) -> bool {
        self.area() == 0
    }

    pub fn contains(&self, point: ScreenPoint) -> bool {
        point.x >= self.min.x
            && point.x < self.max.x
            && point.y >= self.min.y
            && point.y < self.max.y
    }

    /// Create an iterator over coordinates (x, y) pairs inside the block,
    /// in C order (x changes first, then y)
    pub fn internal_points(&self) -> InternalPoints {
        if self.is_empty() {
            InternalPoints::empty()
        } else {
            InternalPoints {
                min_x: self.min.x,
                max: self.max,
                cursor: self.min,
            }
        }
    }

    /// Create an iterator over horizontal bands of the block, top to bottom.
    /// Every band spans the full block width and is band_height rows tall,
    /// except the last one, which may be clipped.
    /// Band height must be non zero.
    pub fn row_bands(&self, band_height: u32) -> RowBands {
        assert!(band_height > 0);

        if self.is_empty() {
            RowBands::empty()
        } else {
            RowBands {
                min_x: self.min.x,
                max: self.max,
                band_height,
                cursor_y: self.min.y,
            }
        }
    }
}

/// Iterator over pixel coordinates inside a block.
#[derive(Copy, Clone, Debug)]
pub struct InternalPoints {
    min_x: u32,
    max: ScreenPoint,
    cursor: ScreenPoint,
}

impl InternalPoints {
    /// Constructs an iterator over internal points that returns no points
    fn empty() -> InternalPoints {
        InternalPoints {
            min_x: 1,
            max: ScreenPoint::origin(),
            cursor: ScreenPoint::origin(),
        }
    }
}

impl Iterator for InternalPoints {
    type Item = ScreenPoint;

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.len();
        (len, Some(len))
    }

    fn next(&mut self) -> Option<Self::Item> {
        if self.cursor.y >= self.max.y {
            return None;
        }

        let ret = self.cursor;

        debug_assert!(self.cursor.x < self.max.x);
        self.cursor.x += 1;
        if self.cursor.x >= self.max.x {
            self.cursor.x = self.min_x;
            self.cursor.y += 1;
        }

        Some(ret)
    }
}

impl ExactSizeIterator for InternalPoints {
    fn len(&self) -> usize {
        if self.cursor.y >= self.max.y {
            0
        } else {
            let width = (self.max.x - self.min_x) as usize;
            let whole_rows = (self.max.y - self.cursor.y - 1) as usize;
            let current_row = (self.max.x - self.cursor.x) as usize;
            whole_rows * width + current_row
        }
    }
}

impl FusedIterator for InternalPoints {}

/// Iterator over horizontal bands of a block, top to bottom.
#[derive(Copy, Clone, Debug)]
pub struct RowBands {
    min_x: u32,
    max: ScreenPoint,
    band_height: u32,
    cursor_y: u32,
}

impl RowBands {
    /// Constructs an iterator that returns no bands
    fn empty() -> RowBands {
        RowBands {
            min_x: 0,
            max: ScreenPoint::origin(),
            band_height: 1,
            cursor_y: 0,
        }
    }
}

impl Iterator for RowBands {
    type Item = ScreenBlock;

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.len();
        (len, Some(len))
    }

    fn next(&mut self) -> Option<Self::Item> {
        if self.cursor_y >= self.max.y {
            return None;
        }

        let band_end = cmp::min(self.cursor_y + self.band_height, self.max.y);
        let ret = ScreenBlock::new(
            ScreenPoint::new(self.min_x, self.cursor_y),
            ScreenPoint::new(self.max.x, band_end),
        );
        self.cursor_y = band_end;

        Some(ret)
    }
}

impl ExactSizeIterator for RowBands {
    fn len(&self) -> usize {
        let remaining_rows = self.max.y.saturating_sub(self.cursor_y);
        remaining_rows.div_ceil(self.band_height) as usize
    }
}

impl FusedIterator for RowBands {}
