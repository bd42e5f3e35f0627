//! Synthetic fixtures
//!
//! Small builders for the rasters and masks the regression tests use.

use crate::error::{TestError, TestResult};
use glyphscan_core::PixelBuffer;

/// A gray buffer filled with `value`.
pub fn blank(width: u32, height: u32, value: u8) -> TestResult<PixelBuffer> {
    PixelBuffer::from_gray(width, height, vec![value; width as usize * height as usize]).map_err(
        |e| TestError::Fixture {
            name: "blank",
            message: e.to_string(),
        },
    )
}

/// Paint an axis-aligned rectangle, clipped to the buffer.
pub fn fill_rect(buf: &mut PixelBuffer, x: u32, y: u32, w: u32, h: u32, value: u8) {
    let x_end = (x + w).min(buf.width());
    let y_end = (y + h).min(buf.height());
    for yy in y..y_end {
        for xx in x..x_end {
            let _ = buf.set(xx, yy, value);
        }
    }
}

/// Paint a list of pixels, ignoring the ones outside the buffer.
pub fn draw_points(buf: &mut PixelBuffer, points: &[(u32, u32)], value: u8) {
    for &(x, y) in points {
        let _ = buf.set(x, y, value);
    }
}

/// Row-major boolean mask from an ASCII picture: `#` is foreground.
///
/// All rows must have the same length.
pub fn mask_from_ascii(rows: &[&str]) -> (Vec<bool>, usize) {
    let stride = rows.first().map_or(0, |r| r.len());
    let mask = rows
        .iter()
        .flat_map(|r| r.bytes().map(|b| b == b'#'))
        .collect();
    (mask, stride)
}

/// Pixels of a block letter "L": a vertical bar with a foot.
///
/// The stroke is `stroke` pixels thick, `height` tall and the foot is
/// `width` wide. The top-left corner is at `(x, y)`.
pub fn letter_l(x: u32, y: u32, width: u32, height: u32, stroke: u32) -> Vec<(u32, u32)> {
    let mut points = Vec::new();
    for yy in y..y + height {
        for xx in x..x + width {
            let in_bar = xx < x + stroke;
            let in_foot = yy >= y + height - stroke;
            if in_bar || in_foot {
                points.push((xx, yy));
            }
        }
    }
    points
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_rect_clips() {
        let mut buf = blank(4, 4, 0).unwrap();
        fill_rect(&mut buf, 2, 2, 10, 10, 5);
        assert_eq!(buf.data().iter().filter(|&&v| v == 5).count(), 4);
    }

    #[test]
    fn test_mask_from_ascii() {
        let (mask, stride) = mask_from_ascii(&["#.", ".#"]);
        assert_eq!(stride, 2);
        assert_eq!(mask, vec![true, false, false, true]);
    }

    #[test]
    fn test_letter_l_count() {
        // bar 2x10 + foot 6x2 minus the shared 2x2 corner
        assert_eq!(letter_l(0, 0, 6, 10, 2).len(), 20 + 12 - 4);
    }
}
