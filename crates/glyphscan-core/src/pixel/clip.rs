//! Rectangle clipping for pixel buffers

use super::PixelBuffer;

impl PixelBuffer {
    /// Extract a rectangular sub-region.
    ///
    /// The origin is clamped into the image and the size is clamped to the
    /// remaining extent, never below 1x1, so this always succeeds.
    ///
    /// # Arguments
    ///
    /// * `left`, `top` - Upper-left corner of the region
    /// * `width`, `height` - Requested size
    pub fn crop(&self, left: u32, top: u32, width: u32, height: u32) -> PixelBuffer {
        let left = left.min(self.width - 1);
        let top = top.min(self.height - 1);
        let w = width.min(self.width - left).max(1);
        let h = height.min(self.height - top).max(1);

        let src_w = self.width as usize;
        let plane = self.plane_len();
        let mut data = Vec::with_capacity(w as usize * h as usize * self.channels());
        for c in 0..self.channels() {
            for y in top..top + h {
                let start = c * plane + y as usize * src_w + left as usize;
                data.extend_from_slice(&self.data[start..start + w as usize]);
            }
        }

        PixelBuffer {
            width: w,
            height: h,
            format: self.format,
            data,
        }
    }

    /// Remove `margin_x` columns from both sides and `margin_y` rows from
    /// top and bottom.
    pub fn crop_margins(&self, margin_x: u32, margin_y: u32) -> PixelBuffer {
        let w = self.width.saturating_sub(margin_x.saturating_mul(2));
        let h = self.height.saturating_sub(margin_y.saturating_mul(2));
        self.crop(margin_x, margin_y, w, h)
    }
}
