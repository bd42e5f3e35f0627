//! glyphscan-region - Region processing for glyphscan
//!
//! This crate provides:
//!
//! - **Connected component analysis** - Distance-tolerant labeling over
//!   row runs
//! - **Clusters** - Point sets with orientation search, splitting,
//!   template matching and binary persistence
//! - **Object detection** - Mask to ordered glyph clusters
//!
//! # Examples
//!
//! ## Labeling a mask
//!
//! ```
//! use glyphscan_region::label_components;
//!
//! let mask = [
//!     true, false, false,
//!     false, true, false,
//!     false, false, false,
//! ];
//! // diagonal neighbours are 1.41 apart
//! assert_eq!(label_components(&mask, 3, 1.0).unwrap().num_clusters, 2);
//! assert_eq!(label_components(&mask, 3, 1.5).unwrap().num_clusters, 1);
//! ```
//!
//! ## Detecting glyphs
//!
//! ```
//! use glyphscan_core::{PixelBuffer, PixelFormat};
//! use glyphscan_region::{DetectorOptions, ObjectDetector};
//!
//! let mut img = PixelBuffer::new(20, 20, PixelFormat::Gray).unwrap();
//! for y in 5..15 {
//!     for x in 5..15 {
//!         img.set(x, y, 255).unwrap();
//!     }
//! }
//! let detector = ObjectDetector::new(DetectorOptions::default());
//! let detection = detector.detect(&img, &img).unwrap();
//! assert_eq!(detection.len(), 1);
//! assert_eq!(detection.centers[0], (9, 9));
//! ```

pub mod cluster;
pub mod conncomp;
pub mod detect;
pub mod error;

pub use cluster::{
    ANGLE_RANGE, Cluster, GOLDEN_THRESHOLD, MATCH_ANGLE_STEP, OrientedBounds, TemplateMatch,
    class_id_for,
};
pub use conncomp::{ComponentLabeler, Labeling, label_components};
pub use detect::{Detection, DetectorOptions, ObjectDetector};
pub use error::{RegionError, RegionResult};
