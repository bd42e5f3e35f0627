//! Image comparison
//!
//! # See also
//!
//! `Cluster::match_template` in glyphscan-region, the main consumer of
//! [`PixelBuffer::diff_ratio`].

use super::PixelBuffer;
use crate::error::{Error, Result};

impl PixelBuffer {
    /// Fraction of disagreeing samples over the union of nonzero samples.
    ///
    /// A sample position counts toward the union when either image is
    /// nonzero there, and toward the disagreements when the two values
    /// differ. Returns `0.0` when the union is empty.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IncompatibleSizes`] if sizes or formats differ.
    pub fn diff_ratio(&self, other: &PixelBuffer) -> Result<f64> {
        if !self.same_size(other) || self.format != other.format {
            return Err(Error::IncompatibleSizes(
                self.width,
                self.height,
                other.width,
                other.height,
            ));
        }

        let mut union = 0u64;
        let mut diff = 0u64;
        for (&a, &b) in self.data.iter().zip(&other.data) {
            if a > 0 || b > 0 {
                union += 1;
                if a != b {
                    diff += 1;
                }
            }
        }

        if union == 0 {
            return Ok(0.0);
        }
        Ok(diff as f64 / union as f64)
    }
}
