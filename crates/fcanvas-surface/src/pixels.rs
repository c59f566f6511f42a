#![forbid(unsafe_code)]

//! Pixel grid storage.
//!
//! A `PixelGrid` is a 2D array of 32-bit pixels backing both image buffers
//! and surface front buffers. Pixels are premultiplied-alpha BGRA packed
//! into a `u32`.
//!
//! # Layout
//!
//! Pixels are stored in row-major order: `index = y * width + x`. The row
//! stride in bytes is always `width * 4`; there is no row padding.
//!
//! # Invariants
//!
//! 1. `pixels.len() == width * height`
//! 2. Width and height never change after creation

use fcanvas_core::{Point, Rect, Size};

/// Pixel memory layout of a grid.
///
/// Only one format exists today; the enum keeps the creation contract
/// explicit at the host boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PixelFormat {
    /// 32-bit BGRA, premultiplied alpha.
    #[default]
    BgraPremul,
}

impl PixelFormat {
    /// Bytes per pixel for this format.
    #[inline]
    pub const fn bytes_per_pixel(self) -> usize {
        4
    }
}

/// A 2D grid of 32-bit pixels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelGrid {
    width: i32,
    height: i32,
    pixels: Vec<u32>,
}

impl PixelGrid {
    /// Create a zero-filled grid of the given size.
    pub fn new(size: Size) -> Self {
        Self::filled(size, 0)
    }

    /// Create a grid of the given size with every pixel set to `value`.
    pub fn filled(size: Size, value: u32) -> Self {
        let len = size.area() as usize;
        Self {
            width: size.width(),
            height: size.height(),
            pixels: vec![value; len],
        }
    }

    /// Grid width in pixels.
    #[inline]
    pub const fn width(&self) -> i32 {
        self.width
    }

    /// Grid height in pixels.
    #[inline]
    pub const fn height(&self) -> i32 {
        self.height
    }

    /// Grid dimensions.
    #[inline]
    pub const fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Bounding rect of the entire grid.
    #[inline]
    pub const fn bounds(&self) -> Rect {
        Rect::new(0, 0, self.width, self.height)
    }

    /// Row byte length.
    #[inline]
    pub const fn stride_bytes(&self) -> usize {
        self.width as usize * 4
    }

    /// Convert a point to a linear index, or `None` if out of bounds.
    #[inline]
    fn index(&self, at: Point) -> Option<usize> {
        if at.x >= 0 && at.x < self.width && at.y >= 0 && at.y < self.height {
            Some(at.y as usize * self.width as usize + at.x as usize)
        } else {
            None
        }
    }

    /// Read the pixel at `at`, or `None` if out of bounds.
    #[inline]
    pub fn pixel(&self, at: Point) -> Option<u32> {
        self.index(at).map(|i| self.pixels[i])
    }

    /// Write the pixel at `at`. Returns false (and writes nothing) if out
    /// of bounds.
    #[inline]
    pub fn set_pixel(&mut self, at: Point, value: u32) -> bool {
        match self.index(at) {
            Some(i) => {
                self.pixels[i] = value;
                true
            }
            None => false,
        }
    }

    /// Set every pixel to `value`.
    pub fn fill(&mut self, value: u32) {
        self.pixels.fill(value);
    }

    /// Fill a rectangular region, clipped to the grid bounds.
    pub fn fill_rect(&mut self, rect: Rect, value: u32) {
        let Some(clipped) = self.bounds().intersect(&rect) else {
            return;
        };
        for y in clipped.y..clipped.bottom() {
            let row = y as usize * self.width as usize;
            let x0 = row + clipped.x as usize;
            let x1 = row + clipped.right() as usize;
            self.pixels[x0..x1].fill(value);
        }
    }

    /// Copy a rectangular region out into a new grid.
    ///
    /// Result pixels whose source position falls outside this grid are
    /// left zero.
    pub fn crop(&self, rect: Rect) -> PixelGrid {
        let mut out = PixelGrid::new(rect.size());
        out.copy_rect_from(self, rect, Point::ZERO);
        out
    }

    /// Copy `src_rect` of `src` into this grid with its top-left corner at
    /// `dest`. Replaces pixel values; no blending. Pixels falling outside
    /// either grid are skipped without disturbing the mapping between
    /// source and destination positions.
    pub fn copy_rect_from(&mut self, src: &PixelGrid, src_rect: Rect, dest: Point) {
        for dy in 0..src_rect.height {
            for dx in 0..src_rect.width {
                let from = Point::new(src_rect.x + dx, src_rect.y + dy);
                let to = Point::new(dest.x + dx, dest.y + dy);
                if let Some(value) = src.pixel(from) {
                    self.set_pixel(to, value);
                }
            }
        }
    }

    /// Raw access to the pixel slice.
    #[inline]
    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    /// True if every pixel equals `value`.
    pub fn is_uniform(&self, value: u32) -> bool {
        self.pixels.iter().all(|&p| p == value)
    }
}
