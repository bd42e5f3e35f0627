//! glyphscan Core - Basic data structures for glyph recognition
//!
//! This crate provides the fundamental data structures used throughout
//! the glyphscan workspace:
//!
//! - [`PixelBuffer`] / [`GrayView`] - Owned raster and borrowed gray view
//! - [`Histogram`] - Intensity statistics with binary persistence
//! - [`Polygon`] - Real-valued vertex list
//! - [`ImageSource`] / [`ImageSink`] - Acquisition and persistence boundary

pub mod error;
pub mod histogram;
pub mod pixel;
pub mod polygon;
pub mod source;

pub use error::{Error, Result};
pub use histogram::{DEFAULT_NUM_BINS, Histogram, gray_histogram};
pub use pixel::convert::rgb_to_gray;
pub use pixel::{ArithOp, GrayView, PixelBuffer, PixelFormat};
pub use polygon::Polygon;
pub use source::{ImageSink, ImageSource, MemorySink, MemorySource};
