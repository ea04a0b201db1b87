/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Adam7 pass geometry
//!
//! An interlaced image is stored as seven smaller sub-images, each
//! one sampling the full image on a fixed grid
//!
//! ```text
//!     16462646
//!     77777777
//!     56565656
//!     77777777
//!     36463646
//!     77777777
//!     56565656
//!     77777777
//! ```

/// Where a pass starts and how far apart its samples are
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Adam7Pass {
    pub x_offset: usize,
    pub y_offset: usize,
    pub x_stride: usize,
    pub y_stride: usize
}

impl Adam7Pass {
    const fn new(x_offset: usize, y_offset: usize, x_stride: usize, y_stride: usize) -> Adam7Pass {
        Adam7Pass {
            x_offset,
            y_offset,
            x_stride,
            y_stride
        }
    }

    /// Pixel width and height of this pass' sub-image for a `width` by `height` image
    ///
    /// Either may be zero for small images, such passes hold no data.
    pub const fn dimensions(&self, width: usize, height: usize) -> (usize, usize) {
        (
            span(width, self.x_offset, self.x_stride),
            span(height, self.y_offset, self.y_stride)
        )
    }

    /// Full image position for pixel `(x, y)` in the sub-image
    #[inline(always)]
    pub const fn scatter(&self, x: usize, y: usize) -> (usize, usize) {
        (self.x_offset + x * self.x_stride, self.y_offset + y * self.y_stride)
    }
}

const fn span(length: usize, offset: usize, stride: usize) -> usize {
    if length <= offset {
        return 0;
    }
    (length - offset + stride - 1) / stride
}

pub const ADAM7_PASSES: [Adam7Pass; 7] = [
    Adam7Pass::new(0, 0, 8, 8),
    Adam7Pass::new(4, 0, 8, 8),
    Adam7Pass::new(0, 4, 4, 8),
    Adam7Pass::new(2, 0, 4, 4),
    Adam7Pass::new(0, 2, 2, 4),
    Adam7Pass::new(1, 0, 2, 2),
    Adam7Pass::new(0, 1, 1, 2)
];

/// Dimensions of pass `pass` (0 based) for an image of `width` x `height`
pub const fn pass_dimensions(pass: usize, width: usize, height: usize) -> (usize, usize) {
    ADAM7_PASSES[pass].dimensions(width, height)
}

/// Write `row`, row `y` of pass `pass`, into the full `width` wide `out` image
pub fn scatter_row<T: Copy>(pass: &Adam7Pass, y: usize, row: &[T], out: &mut [T], width: usize) {
    for (x, px) in row.iter().enumerate() {
        let (out_x, out_y) = pass.scatter(x, y);
        out[out_y * width + out_x] = *px;
    }
}
