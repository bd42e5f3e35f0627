//! Format conversion and thresholding
//!
//! - [`PixelBuffer::to_gray`] - RGB to luminance
//! - [`PixelBuffer::to_rgb`] - gray replicated into three planes (display format)
//! - [`PixelBuffer::invert`] - bitwise complement
//! - [`PixelBuffer::binarize`] - 0/1 plane
//! - [`PixelBuffer::threshold_mask`] - boolean foreground mask

use super::{PixelBuffer, PixelFormat};
use crate::error::Result;

/// Integer luminance weights, scaled by 256.
const RED_WEIGHT: u32 = 77;
const GREEN_WEIGHT: u32 = 150;
const BLUE_WEIGHT: u32 = 29;

/// Luminance of one RGB sample.
#[inline]
pub fn rgb_to_gray(r: u8, g: u8, b: u8) -> u8 {
    ((r as u32 * RED_WEIGHT + g as u32 * GREEN_WEIGHT + b as u32 * BLUE_WEIGHT + 128) >> 8) as u8
}

impl PixelBuffer {
    /// Convert to a single intensity plane.
    ///
    /// Gray buffers are cloned unchanged.
    pub fn to_gray(&self) -> PixelBuffer {
        match self.format {
            PixelFormat::Gray => self.clone(),
            PixelFormat::Rgb => {
                let (r, g, b) = (self.plane(0), self.plane(1), self.plane(2));
                let data = r
                    .iter()
                    .zip(g)
                    .zip(b)
                    .map(|((&r, &g), &b)| rgb_to_gray(r, g, b))
                    .collect();
                PixelBuffer {
                    width: self.width,
                    height: self.height,
                    format: PixelFormat::Gray,
                    data,
                }
            }
        }
    }

    /// Convert to the three-plane display format.
    pub fn to_rgb(&self) -> PixelBuffer {
        match self.format {
            PixelFormat::Rgb => self.clone(),
            PixelFormat::Gray => {
                let mut data = Vec::with_capacity(self.data.len() * 3);
                for _ in 0..3 {
                    data.extend_from_slice(&self.data);
                }
                PixelBuffer {
                    width: self.width,
                    height: self.height,
                    format: PixelFormat::Rgb,
                    data,
                }
            }
        }
    }

    /// Return a copy with every sample complemented (`255 - v`).
    pub fn invert(&self) -> PixelBuffer {
        let mut out = self.clone();
        out.invert_inplace();
        out
    }

    pub fn invert_inplace(&mut self) {
        for v in &mut self.data {
            *v = !*v;
        }
    }

    /// Map every sample to 1 when `>= threshold`, else 0.
    ///
    /// The result has the same format as the input.
    pub fn binarize(&self, threshold: u8) -> PixelBuffer {
        let data = self.data.iter().map(|&v| u8::from(v >= threshold)).collect();
        PixelBuffer {
            width: self.width,
            height: self.height,
            format: self.format,
            data,
        }
    }

    /// Foreground mask of the gray plane: `true` where the sample is `>= threshold`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::UnsupportedFormat`] for RGB input.
    pub fn threshold_mask(&self, threshold: u8) -> Result<Vec<bool>> {
        let view = self.view()?;
        Ok(view.data().iter().map(|&v| v >= threshold).collect())
    }
}
