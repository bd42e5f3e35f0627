//! Template matching
//!
//! A cluster is compared with a binary target raster by drawing it into a
//! blank raster of the same size, centered on a reference point and
//! rotated by each candidate angle, and measuring the disagreement ratio
//! over the union of set pixels.

use super::{ANGLE_RANGE, Cluster};
use crate::error::{RegionError, RegionResult};
use glyphscan_core::{PixelBuffer, PixelFormat};

/// Angle step, in degrees, of the match search.
pub const MATCH_ANGLE_STEP: i32 = 5;

/// Best candidate of [`Cluster::match_template`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TemplateMatch {
    /// Disagreement ratio in `[0, 1]`
    pub difference: f64,
    /// Rotation in degrees that produced it
    pub angle: f64,
}

fn require_gray(buf: &PixelBuffer) -> RegionResult<()> {
    if buf.format() != PixelFormat::Gray {
        return Err(RegionError::Core(glyphscan_core::Error::UnsupportedFormat {
            expected: "gray",
            actual: buf.format(),
        }));
    }
    Ok(())
}

impl Cluster {
    /// Draw the cluster into `raster`, rotated by `angle` degrees about its
    /// centroid and with the centroid placed at `(refer_x, refer_y)`.
    ///
    /// The raster is cleared first. Point positions are rounded half to
    /// even; points falling outside the raster are dropped.
    pub fn align_to(
        &self,
        raster: &mut PixelBuffer,
        refer_x: f64,
        refer_y: f64,
        angle: f64,
    ) -> RegionResult<()> {
        require_gray(raster)?;
        raster.reset();
        let (w, h) = (raster.width() as i64, raster.height() as i64);
        let stride = raster.width() as usize;
        let data = raster.data_mut();

        for (rx, ry) in self.rotated_offsets(angle) {
            let xp = (rx + refer_x).round_ties_even() as i64;
            if xp < 0 || xp >= w {
                continue;
            }
            let yp = (refer_y - ry).round_ties_even() as i64;
            if yp < 0 || yp >= h {
                continue;
            }
            data[yp as usize * stride + xp as usize] = 1;
        }
        Ok(())
    }

    /// Find the rotation that best reproduces `target`.
    ///
    /// Angles from -30 to 30 degrees in steps of [`MATCH_ANGLE_STEP`] are
    /// tried. On equal difference the angle closest to zero wins, so an
    /// exact copy of the template always matches unrotated.
    ///
    /// # Arguments
    ///
    /// * `target` - Binary gray raster (nonzero = set)
    /// * `center_x`, `center_y` - Where the centroid lands in `target`
    ///
    /// # Errors
    ///
    /// Returns an error when `target` is not gray.
    pub fn match_template(
        &self,
        target: &PixelBuffer,
        center_x: f64,
        center_y: f64,
    ) -> RegionResult<TemplateMatch> {
        require_gray(target)?;
        let mut scratch = PixelBuffer::new(target.width(), target.height(), PixelFormat::Gray)?;

        let mut best = TemplateMatch {
            difference: f64::MAX,
            angle: 0.0,
        };
        for a in (ANGLE_RANGE.0..=ANGLE_RANGE.1).step_by(MATCH_ANGLE_STEP as usize) {
            let angle = a as f64;
            self.align_to(&mut scratch, center_x, center_y, angle)?;
            let difference = target.diff_ratio(&scratch)?;
            tracing::trace!(angle, difference, "match candidate");
            let closer = difference == best.difference && angle.abs() < best.angle.abs();
            if difference < best.difference || closer {
                best = TemplateMatch { difference, angle };
            }
        }
        Ok(best)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bar() -> Cluster {
        let mut pts = Vec::new();
        for y in 4..14 {
            for x in 6..9 {
                pts.push((x as f64, y as f64));
            }
        }
        Cluster::from_points(&pts)
    }

    #[test]
    fn test_align_to_translates() {
        let c = bar();
        let mut raster = PixelBuffer::new(10, 10, PixelFormat::Gray).unwrap();
        raster.data_mut().fill(7);
        // centroid (7, 8.5) moved to (2, 4.5)
        c.align_to(&mut raster, 2.0, 4.5, 0.0).unwrap();
        assert_eq!(raster.get(0, 0), Some(0));
        assert_eq!(raster.get(1, 0), Some(1));
        assert_eq!(raster.get(3, 9), Some(1));
        assert_eq!(raster.get(4, 0), Some(0));
        assert_eq!(raster.data().iter().filter(|&&v| v == 1).count(), 30);
    }

    #[test]
    fn test_align_to_drops_outside_points() {
        let c = bar();
        let mut raster = PixelBuffer::new(4, 4, PixelFormat::Gray).unwrap();
        c.align_to(&mut raster, 0.0, 0.0, 0.0).unwrap();
        // columns -1..=1 and rows -4.5..=4.5; rounding half to even
        // folds rows -0.5/0.5 onto 0 and 1.5/2.5 onto 2
        let set = raster.data().iter().filter(|&&v| v == 1).count();
        assert_eq!(set, 4);
        assert_eq!(raster.get(1, 2), Some(1));
        assert_eq!(raster.get(1, 1), Some(0));
    }

    #[test]
    fn test_match_self() {
        let c = bar();
        let mut target = PixelBuffer::new(16, 16, PixelFormat::Gray).unwrap();
        c.align_to(&mut target, 8.0, 8.5, 0.0).unwrap();
        let m = c.match_template(&target, 8.0, 8.5).unwrap();
        assert_eq!(m.difference, 0.0);
        assert_eq!(m.angle, 0.0);
    }

    #[test]
    fn test_match_tie_prefers_small_rotation() {
        // a single point renders identically at every angle
        let c = Cluster::from_points(&[(3.0, 3.0)]);
        let mut target = PixelBuffer::new(8, 8, PixelFormat::Gray).unwrap();
        c.align_to(&mut target, 4.0, 4.0, 0.0).unwrap();
        let m = c.match_template(&target, 4.0, 4.0).unwrap();
        assert_eq!(m.difference, 0.0);
        assert_eq!(m.angle, 0.0);
    }

    #[test]
    fn test_match_rejects_rgb() {
        let target = PixelBuffer::new(4, 4, PixelFormat::Rgb).unwrap();
        assert!(bar().match_template(&target, 2.0, 2.0).is_err());
    }
}
