//! Rank filtering operations
//!
//! Provides rank (order-statistic) filters including median, min, and max
//! filters.
//!
//! The kernel is a `width x height` window with odd sides. For every
//! interior pixel the window samples are gathered through a table of
//! offsets relative to the center, and the `order`-th smallest sample is
//! written to the output. Pixels closer than half a kernel to any edge
//! are copied from the source unchanged.
//!
//! Order `0` and `width * height - 1` take min/max fast paths; any other
//! order uses an in-place selection on a scratch copy of the window.

use crate::{FilterError, FilterResult};
use glyphscan_core::PixelBuffer;

/// An order-statistic filter with a fixed kernel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankFilter {
    width: u32,
    height: u32,
    order: usize,
}

impl RankFilter {
    /// Create a filter.
    ///
    /// # Arguments
    ///
    /// * `width` - Kernel width, odd
    /// * `height` - Kernel height, odd
    /// * `order` - Index into the sorted window, in `[0, width * height)`
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::EvenKernel`] for even or zero sides and
    /// [`FilterError::OrderOutOfRange`] for an out-of-range order.
    pub fn new(width: u32, height: u32, order: usize) -> FilterResult<Self> {
        if width == 0 || height == 0 || width % 2 == 0 || height % 2 == 0 {
            return Err(FilterError::EvenKernel { width, height });
        }
        let len = width as usize * height as usize;
        if order >= len {
            return Err(FilterError::OrderOutOfRange { order, window: len });
        }
        Ok(Self {
            width,
            height,
            order,
        })
    }

    /// Minimum filter (order 0).
    pub fn min(width: u32, height: u32) -> FilterResult<Self> {
        Self::new(width, height, 0)
    }

    /// Maximum filter (last order).
    pub fn max(width: u32, height: u32) -> FilterResult<Self> {
        let len = (width as usize * height as usize).max(1);
        Self::new(width, height, len - 1)
    }

    /// Median filter (middle order).
    pub fn median(width: u32, height: u32) -> FilterResult<Self> {
        let len = width as usize * height as usize;
        Self::new(width, height, len / 2)
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn order(&self) -> usize {
        self.order
    }

    /// Number of samples in the window.
    #[inline]
    pub fn window_len(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Filter every plane of `buf` independently.
    pub fn apply(&self, buf: &PixelBuffer) -> FilterResult<PixelBuffer> {
        let mut out = buf.clone();
        let (w, h) = (buf.width(), buf.height());
        for c in 0..buf.channels() {
            let filtered = self.apply_plane(buf.plane(c), w, h)?;
            out.plane_mut(c).copy_from_slice(&filtered);
        }
        tracing::debug!(
            kernel_w = self.width,
            kernel_h = self.height,
            order = self.order,
            channels = buf.channels(),
            "rank filter applied"
        );
        Ok(out)
    }

    /// Filter one row-major plane.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::PlaneSize`] when `src.len()` does not equal
    /// `width * height`.
    pub fn apply_plane(&self, src: &[u8], width: u32, height: u32) -> FilterResult<Vec<u8>> {
        if src.len() != width as usize * height as usize {
            return Err(FilterError::PlaneSize {
                width,
                height,
                actual: src.len(),
            });
        }

        let mut dst = src.to_vec();
        let half_w = (self.width / 2) as usize;
        let half_h = (self.height / 2) as usize;
        let (w, h) = (width as usize, height as usize);
        if w <= 2 * half_w || h <= 2 * half_h {
            return Ok(dst);
        }

        let offsets = self.offsets(width);
        let last = self.window_len() - 1;
        let mut window = vec![0u8; self.window_len()];

        for y in half_h..h - half_h {
            for x in half_w..w - half_w {
                let center = (y * w + x) as isize;
                let sample = |off: isize| src[(center + off) as usize];
                dst[y * w + x] = if self.order == 0 {
                    offsets.iter().map(|&o| sample(o)).min().unwrap_or(0)
                } else if self.order == last {
                    offsets.iter().map(|&o| sample(o)).max().unwrap_or(0)
                } else {
                    for (slot, &o) in window.iter_mut().zip(&offsets) {
                        *slot = sample(o);
                    }
                    *window.select_nth_unstable(self.order).1
                };
            }
        }

        Ok(dst)
    }

    /// Offsets of the window samples from the center, for one image width.
    fn offsets(&self, image_width: u32) -> Vec<isize> {
        let half_w = (self.width / 2) as isize;
        let half_h = (self.height / 2) as isize;
        let stride = image_width as isize;
        let mut offsets = Vec::with_capacity(self.window_len());
        for ky in 0..self.height as isize {
            let row = (ky - half_h) * stride;
            for kx in 0..self.width as isize {
                offsets.push(row + kx - half_w);
            }
        }
        offsets
    }
}

/// Apply a rank filter of the given order.
///
/// Convenience wrapper for [`RankFilter::new`] + [`RankFilter::apply`].
pub fn rank_filter(
    buf: &PixelBuffer,
    width: u32,
    height: u32,
    order: usize,
) -> FilterResult<PixelBuffer> {
    RankFilter::new(width, height, order)?.apply(buf)
}

/// Apply minimum filter (order 0).
pub fn min_filter(buf: &PixelBuffer, width: u32, height: u32) -> FilterResult<PixelBuffer> {
    RankFilter::min(width, height)?.apply(buf)
}

/// Apply maximum filter (last order).
pub fn max_filter(buf: &PixelBuffer, width: u32, height: u32) -> FilterResult<PixelBuffer> {
    RankFilter::max(width, height)?.apply(buf)
}

/// Apply median filter.
pub fn median_filter(buf: &PixelBuffer, width: u32, height: u32) -> FilterResult<PixelBuffer> {
    RankFilter::median(width, height)?.apply(buf)
}
