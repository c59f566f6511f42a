#![forbid(unsafe_code)]

//! Core value types: points, sizes, and rectangles in pixel space.

pub mod geometry;

pub use geometry::{Point, Rect, Size};
