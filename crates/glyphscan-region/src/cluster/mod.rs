//! Point clusters
//!
//! A [`Cluster`] is an unordered set of real-valued points (one detected
//! glyph, or one golden template) together with its axis-aligned bounds
//! and centroid. Geometry lives in the submodules:
//!
//! - `geometry`: rotation about the centroid, orientation search,
//!   oriented bounding box, splitting
//! - `matching`: rendering into a raster and template comparison
//! - `serial`: binary persistence
//!
//! The derived bounds and centroid are refreshed by
//! [`Cluster::calc_data_range`]; [`Cluster::push`] alone leaves them stale
//! so that bulk construction stays linear.

mod geometry;
mod matching;
mod serial;

pub use geometry::{ANGLE_RANGE, OrientedBounds};
pub use matching::{MATCH_ANGLE_STEP, TemplateMatch};

use crate::error::{RegionError, RegionResult};
use glyphscan_core::{PixelBuffer, PixelFormat};
use std::cmp::Ordering;
use std::sync::OnceLock;

/// Gray level below which a golden template pixel belongs to the glyph.
pub const GOLDEN_THRESHOLD: u8 = 225;

/// Class id for a template name, taken from its first character.
///
/// `A`-`Z` map to 0-25, `0`-`9` to 26-35, anything else to -1.
pub fn class_id_for(name: &str) -> i32 {
    match name.chars().next() {
        Some(c @ 'A'..='Z') => c as i32 - 'A' as i32,
        Some(c @ '0'..='9') => 26 + c as i32 - '0' as i32,
        _ => -1,
    }
}

/// A set of points with cached bounds and centroid.
#[derive(Debug, Clone, Default)]
pub struct Cluster {
    /// Classification id, -1 when unknown
    pub class_id: i32,
    /// Classification label
    pub class_name: String,
    xs: Vec<f64>,
    ys: Vec<f64>,
    center_x: f64,
    center_y: f64,
    x_min: f64,
    x_max: f64,
    y_min: f64,
    y_max: f64,
    oriented: OnceLock<OrientedBounds>,
}

impl Cluster {
    pub fn new() -> Self {
        Self {
            class_id: -1,
            ..Self::default()
        }
    }

    pub fn with_capacity(n: usize) -> Self {
        Self {
            class_id: -1,
            xs: Vec::with_capacity(n),
            ys: Vec::with_capacity(n),
            ..Self::default()
        }
    }

    /// Build a cluster from points and compute its data range.
    pub fn from_points(points: &[(f64, f64)]) -> Self {
        let mut c = Self::with_capacity(points.len());
        for &(x, y) in points {
            c.push(x, y);
        }
        c.calc_data_range();
        c
    }

    /// Append a point. Call [`Cluster::calc_data_range`] before reading
    /// the bounds or the centroid.
    pub fn push(&mut self, x: f64, y: f64) {
        self.xs.push(x);
        self.ys.push(y);
        self.oriented.take();
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.xs.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.xs.is_empty()
    }

    pub fn xs(&self) -> &[f64] {
        &self.xs
    }

    pub fn ys(&self) -> &[f64] {
        &self.ys
    }

    /// Iterate over `(x, y)` points.
    pub fn points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.xs.iter().copied().zip(self.ys.iter().copied())
    }

    #[inline]
    pub fn center_x(&self) -> f64 {
        self.center_x
    }

    #[inline]
    pub fn center_y(&self) -> f64 {
        self.center_y
    }

    #[inline]
    pub fn x_min(&self) -> f64 {
        self.x_min
    }

    #[inline]
    pub fn x_max(&self) -> f64 {
        self.x_max
    }

    #[inline]
    pub fn y_min(&self) -> f64 {
        self.y_min
    }

    #[inline]
    pub fn y_max(&self) -> f64 {
        self.y_max
    }

    /// Recompute the axis-aligned bounds and the centroid in one pass.
    ///
    /// An empty cluster gets all-zero bounds and centroid.
    pub fn calc_data_range(&mut self) {
        self.oriented.take();
        if self.is_empty() {
            self.center_x = 0.0;
            self.center_y = 0.0;
            self.x_min = 0.0;
            self.x_max = 0.0;
            self.y_min = 0.0;
            self.y_max = 0.0;
            return;
        }

        let (mut x_min, mut x_max) = (f64::MAX, f64::MIN);
        let (mut y_min, mut y_max) = (f64::MAX, f64::MIN);
        let (mut sum_x, mut sum_y) = (0.0, 0.0);
        for (x, y) in self.points() {
            x_min = x_min.min(x);
            x_max = x_max.max(x);
            y_min = y_min.min(y);
            y_max = y_max.max(y);
            sum_x += x;
            sum_y += y;
        }

        let n = self.len() as f64;
        self.x_min = x_min;
        self.x_max = x_max;
        self.y_min = y_min;
        self.y_max = y_max;
        self.center_x = sum_x / n;
        self.center_y = sum_y / n;
    }

    /// Centroid truncated to integer pixel coordinates.
    pub fn center(&self) -> (i32, i32) {
        (self.center_x as i32, self.center_y as i32)
    }

    /// Points truncated to integer pixel coordinates.
    pub fn to_points(&self) -> Vec<(i32, i32)> {
        self.points().map(|(x, y)| (x as i32, y as i32)).collect()
    }

    /// Translate every point and recompute the data range.
    pub fn offset(&mut self, dx: f64, dy: f64) {
        for x in &mut self.xs {
            *x += dx;
        }
        for y in &mut self.ys {
            *y += dy;
        }
        self.calc_data_range();
    }

    /// Left-to-right ordering by `x_min`.
    pub fn cmp_by_x_min(a: &Cluster, b: &Cluster) -> Ordering {
        a.x_min.total_cmp(&b.x_min)
    }

    /// Render into a tight gray buffer: 1 on points, 0 elsewhere.
    ///
    /// The buffer spans `x_min..=x_max` by `y_min..=y_max` (truncated).
    ///
    /// # Errors
    ///
    /// Returns [`RegionError::EmptyCluster`] for a cluster without points.
    pub fn to_mask(&self) -> RegionResult<PixelBuffer> {
        if self.is_empty() {
            return Err(RegionError::EmptyCluster);
        }
        let left = self.x_min as i64;
        let top = self.y_min as i64;
        let width = (self.x_max as i64 - left + 1) as u32;
        let height = (self.y_max as i64 - top + 1) as u32;

        let mut mask = PixelBuffer::new(width, height, PixelFormat::Gray)?;
        for (x, y) in self.points() {
            let px = x as i64 - left;
            let py = y as i64 - top;
            if px >= 0 && py >= 0 {
                // out-of-range pixels are ignored by set
                let _ = mask.set(px as u32, py as u32, 1);
            }
        }
        Ok(mask)
    }

    /// Build a template cluster from a golden glyph image.
    ///
    /// Every pixel darker than [`GOLDEN_THRESHOLD`] becomes a point. The
    /// class name is the first character of `name` and the id follows
    /// [`class_id_for`]. RGB images are converted to gray first.
    pub fn from_golden_image(name: &str, image: &PixelBuffer) -> Self {
        let gray = image.to_gray();
        let width = gray.width() as usize;

        let mut c = Self::new();
        for (i, &v) in gray.data().iter().enumerate() {
            if v < GOLDEN_THRESHOLD {
                c.push((i % width) as f64, (i / width) as f64);
            }
        }
        c.class_name = name.chars().next().map(String::from).unwrap_or_default();
        c.class_id = class_id_for(name);
        c.calc_data_range();
        c
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(x0: f64, y0: f64, side: usize) -> Cluster {
        let mut pts = Vec::new();
        for y in 0..side {
            for x in 0..side {
                pts.push((x0 + x as f64, y0 + y as f64));
            }
        }
        Cluster::from_points(&pts)
    }

    #[test]
    fn test_calc_data_range() {
        let c = Cluster::from_points(&[(1.0, 2.0), (3.0, 6.0), (5.0, 4.0)]);
        assert_eq!((c.x_min(), c.x_max()), (1.0, 5.0));
        assert_eq!((c.y_min(), c.y_max()), (2.0, 6.0));
        assert_eq!((c.center_x(), c.center_y()), (3.0, 4.0));
    }

    #[test]
    fn test_recalc_after_shrinking_range() {
        let mut c = Cluster::from_points(&[(0.0, 0.0), (10.0, 10.0)]);
        c.offset(-5.0, 5.0);
        assert_eq!((c.x_min(), c.x_max()), (-5.0, 5.0));
        assert_eq!((c.y_min(), c.y_max()), (5.0, 15.0));
        assert_eq!(c.center(), (0, 10));
    }

    #[test]
    fn test_empty_cluster_zeroed() {
        let mut c = Cluster::new();
        c.calc_data_range();
        assert_eq!(c.center(), (0, 0));
        assert!(c.to_mask().is_err());
    }

    #[test]
    fn test_class_id_for() {
        assert_eq!(class_id_for("A.png"), 0);
        assert_eq!(class_id_for("Z"), 25);
        assert_eq!(class_id_for("0_1"), 26);
        assert_eq!(class_id_for("9"), 35);
        assert_eq!(class_id_for("a"), -1);
        assert_eq!(class_id_for(""), -1);
    }

    #[test]
    fn test_to_mask() {
        let c = Cluster::from_points(&[(2.0, 3.0), (4.0, 3.0), (4.0, 4.0)]);
        let m = c.to_mask().unwrap();
        assert_eq!((m.width(), m.height()), (3, 2));
        assert_eq!(m.data(), &[1, 0, 1, 0, 0, 1]);
    }

    #[test]
    fn test_cmp_by_x_min() {
        let mut v = vec![square(20.0, 0.0, 2), square(5.0, 0.0, 2)];
        v.sort_by(Cluster::cmp_by_x_min);
        assert_eq!(v[0].x_min(), 5.0);
    }

    #[test]
    fn test_from_golden_image() {
        let mut img = PixelBuffer::new(3, 2, PixelFormat::Gray).unwrap();
        img.data_mut().fill(255);
        img.set(1, 0, 224).unwrap();
        img.set(2, 1, 225).unwrap();
        img.set(0, 1, 0).unwrap();
        let c = Cluster::from_golden_image("K", &img);
        assert_eq!(c.class_name, "K");
        assert_eq!(c.class_id, 10);
        assert_eq!(c.to_points(), vec![(1, 0), (0, 1)]);
    }
}
