//! glyphscan - Captcha glyph detection and recognition
//!
//! glyphscan reads short strings of glyphs from noisy images by matching
//! each detected glyph against a folder of golden templates.
//!
//! # Overview
//!
//! - Pixel buffers, histograms and polygons (re-exported at the root)
//! - Image I/O for PNG, JPEG and binary PNM ([`io`])
//! - Order-statistic filtering ([`filter`])
//! - Distance-tolerant labeling, clusters and detection ([`region`])
//! - Golden sets and the solver ([`recog`])
//!
//! # Example
//!
//! ```
//! use glyphscan::{PixelBuffer, PixelFormat};
//!
//! let buf = PixelBuffer::new(64, 32, PixelFormat::Gray).unwrap();
//! assert_eq!(buf.width(), 64);
//! assert_eq!(buf.height(), 32);
//! ```

// Re-export core types (primary data structures used everywhere)
pub use glyphscan_core::*;

// Re-export domain crates as modules to avoid name conflicts
pub use glyphscan_filter as filter;
pub use glyphscan_io as io;
pub use glyphscan_recog as recog;
pub use glyphscan_region as region;
