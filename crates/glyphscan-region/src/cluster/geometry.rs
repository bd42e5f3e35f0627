//! Rotation, orientation search and splitting
//!
//! Rotations are about the cluster centroid in a y-up frame: a point
//! `(X, Y)` becomes `x = X - cx`, `y = cy - Y`, is rotated counter-clockwise
//! by the angle, then mapped back with `X' = x' + cx`, `Y' = cy - y'`.
//!
//! The orientation of a cluster is the angle in `[-30, 30]` (1 degree
//! steps) that puts the most points on the first or last pixel row of the
//! rotated set. Ties keep the smallest angle.

use super::Cluster;
use glyphscan_core::Polygon;

/// Inclusive angle range, in degrees, searched for orientation and matching.
pub const ANGLE_RANGE: (i32, i32) = (-30, 30);

/// Split threshold bias along the rotated x axis.
const SPLIT_X_BIAS: f64 = 4.5;

/// Oriented bounding box of a cluster.
#[derive(Debug, Clone, PartialEq)]
pub struct OrientedBounds {
    /// Box corners in image coordinates, in the order
    /// (min, min), (max, min), (max, max), (min, max) of the rotated frame
    pub polygon: Polygon,
    /// Orientation in degrees
    pub angle: f64,
    /// Extent along the rotated x axis
    pub size_x: f64,
    /// Extent along the rotated y axis
    pub size_y: f64,
}

/// Sine and cosine of an angle given in degrees.
fn sin_cos(angle: f64) -> (f64, f64) {
    (std::f64::consts::PI * angle / 180.0).sin_cos()
}

impl Cluster {
    /// Rotated offsets from the centroid, y axis pointing up.
    pub(super) fn rotated_offsets(&self, angle: f64) -> impl Iterator<Item = (f64, f64)> + '_ {
        let (sin, cos) = sin_cos(angle);
        let (cx, cy) = (self.center_x, self.center_y);
        self.points().map(move |(px, py)| {
            let x = px - cx;
            let y = cy - py;
            (cos * x - sin * y, sin * x + cos * y)
        })
    }

    /// A copy with every point rotated by `angle` degrees about the centroid.
    ///
    /// Class labels are not carried over.
    pub fn rotate(&self, angle: f64) -> Cluster {
        let (cx, cy) = (self.center_x, self.center_y);
        let mut out = Cluster::with_capacity(self.len());
        for (rx, ry) in self.rotated_offsets(angle) {
            out.push(rx + cx, cy - ry);
        }
        out.calc_data_range();
        out
    }

    /// Score of one candidate orientation; lower is better.
    ///
    /// The rotated copy's top and bottom rows are found by truncating the
    /// extreme y values. The score is minus the larger of the two row
    /// populations. A point counts toward the top row first.
    pub fn orientation_score(&self, angle: f64) -> f64 {
        let rotated = self.rotate(angle);
        let top = rotated.y_min as i64;
        let bottom = rotated.y_max as i64;

        let (mut count_top, mut count_bottom) = (0u32, 0u32);
        for &y in rotated.ys() {
            let row = y as i64;
            if row == top {
                count_top += 1;
            } else if row == bottom {
                count_bottom += 1;
            }
        }
        -(count_top.max(count_bottom) as f64)
    }

    /// Best orientation in degrees, 0 for an empty cluster.
    pub fn alignment_angle(&self) -> f64 {
        if self.is_empty() {
            return 0.0;
        }
        let mut best_score = f64::MAX;
        let mut best_angle = 0.0;
        for a in ANGLE_RANGE.0..=ANGLE_RANGE.1 {
            let angle = a as f64;
            let score = self.orientation_score(angle);
            tracing::trace!(angle, score, "orientation candidate");
            if score < best_score {
                best_score = score;
                best_angle = angle;
            }
        }
        best_angle
    }

    /// Oriented bounding box at the best orientation.
    ///
    /// Computed on first use and cached until the points change.
    pub fn oriented_bounds(&self) -> &OrientedBounds {
        self.oriented
            .get_or_init(|| self.bounds_at(self.alignment_angle()))
    }

    /// Shorthand for the polygon of [`Cluster::oriented_bounds`].
    pub fn poly_bounds(&self) -> &Polygon {
        &self.oriented_bounds().polygon
    }

    /// Axis-aligned box of the points rotated by `angle`, mapped back into
    /// image coordinates.
    pub fn bounds_at(&self, angle: f64) -> OrientedBounds {
        if self.is_empty() {
            return OrientedBounds {
                polygon: Polygon::new(),
                angle,
                size_x: 0.0,
                size_y: 0.0,
            };
        }

        let (mut x_min, mut x_max) = (f64::MAX, f64::MIN);
        let (mut y_min, mut y_max) = (f64::MAX, f64::MIN);
        for (rx, ry) in self.rotated_offsets(angle) {
            x_min = x_min.min(rx);
            x_max = x_max.max(rx);
            y_min = y_min.min(ry);
            y_max = y_max.max(ry);
        }

        let (sin, cos) = sin_cos(-angle);
        let (cx, cy) = (self.center_x, self.center_y);
        let corners = [(x_min, y_min), (x_max, y_min), (x_max, y_max), (x_min, y_max)];
        let mut polygon = Polygon::with_capacity(4);
        for (x, y) in corners {
            polygon.push(cx + (cos * x - sin * y), cy - (sin * x + cos * y));
        }

        OrientedBounds {
            polygon,
            angle,
            size_x: x_max - x_min,
            size_y: y_max - y_min,
        }
    }

    /// Cut the cluster in two across its longer oriented side.
    ///
    /// The points are rotated to the best orientation. When the rotated set
    /// is wider than tall, points with rotated x at most
    /// `(x_min + x_max) / 2 + 4.5` go to the first half; otherwise points
    /// with rotated y at most the midpoint do. Both halves keep the
    /// original coordinates. Either half may be empty.
    pub fn split(&self) -> (Cluster, Cluster) {
        let rotated = self.rotate(self.alignment_angle());
        let width = rotated.x_max - rotated.x_min;
        let height = rotated.y_max - rotated.y_min;

        let (keys, threshold) = if width > height {
            (
                rotated.xs(),
                (rotated.x_min + rotated.x_max) * 0.5 + SPLIT_X_BIAS,
            )
        } else {
            (rotated.ys(), (rotated.y_min + rotated.y_max) * 0.5)
        };

        let mut first = Cluster::new();
        let mut second = Cluster::new();
        for (&key, (x, y)) in keys.iter().zip(self.points()) {
            if key <= threshold {
                first.push(x, y);
            } else {
                second.push(x, y);
            }
        }
        first.calc_data_range();
        second.calc_data_range();
        (first, second)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect(x0: u32, y0: u32, w: u32, h: u32) -> Cluster {
        let mut pts = Vec::new();
        for y in y0..y0 + h {
            for x in x0..x0 + w {
                pts.push((x as f64, y as f64));
            }
        }
        Cluster::from_points(&pts)
    }

    #[test]
    fn test_rotate_zero_is_identity() {
        let c = rect(3, 7, 5, 4);
        let r = c.rotate(0.0);
        for ((x0, y0), (x1, y1)) in c.points().zip(r.points()) {
            assert!((x0 - x1).abs() < 1e-9);
            assert!((y0 - y1).abs() < 1e-9);
        }
    }

    #[test]
    fn test_rotate_quarter_turn() {
        // centroid (1, 0); (2, 0) is 1 to the right, ends up 1 above
        let c = Cluster::from_points(&[(0.0, 0.0), (2.0, 0.0)]);
        let r = c.rotate(90.0);
        assert!((r.xs()[1] - 1.0).abs() < 1e-9);
        assert!((r.ys()[1] + 1.0).abs() < 1e-9);
        assert!((r.center_x() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_axis_aligned_rect_orientation() {
        let c = rect(5, 10, 20, 6);
        assert_eq!(c.orientation_score(0.0), -20.0);
        assert_eq!(c.alignment_angle(), 0.0);
        let b = c.oriented_bounds();
        assert_eq!(b.angle, 0.0);
        assert!((b.size_x - 19.0).abs() < 1e-9);
        assert!((b.size_y - 5.0).abs() < 1e-9);
        let (x, y) = b.polygon.get(0).unwrap();
        assert!((x - 5.0).abs() < 1e-9);
        assert!((y - 15.0).abs() < 1e-9);
    }

    #[test]
    fn test_oriented_bounds_invalidated_by_push() {
        let mut c = rect(0, 0, 4, 4);
        let before = c.oriented_bounds().clone();
        for y in 0..4 {
            c.push(10.0, y as f64);
        }
        c.calc_data_range();
        let after = c.oriented_bounds();
        assert_ne!(&before, after);
        assert_eq!(after, &c.bounds_at(c.alignment_angle()));
        assert!(after.size_x > 9.0);
    }

    #[test]
    fn test_split_wide_rect_with_bias() {
        // x in 5..=44: midpoint 24.5, threshold 29
        let c = rect(5, 10, 40, 10);
        let (a, b) = c.split();
        assert_eq!(a.len(), 250);
        assert_eq!(b.len(), 150);
        assert_eq!(a.x_max(), 29.0);
        assert_eq!(b.x_min(), 30.0);
    }

    #[test]
    fn test_split_tall_rect_at_midpoint() {
        let c = rect(0, 0, 4, 20);
        let (a, b) = c.split();
        assert_eq!(a.len(), 40);
        assert_eq!(b.len(), 40);
        assert_eq!(a.y_max(), 9.0);
    }

    #[test]
    fn test_empty_cluster_geometry() {
        let c = Cluster::new();
        assert_eq!(c.alignment_angle(), 0.0);
        assert!(c.poly_bounds().is_empty());
        let (a, b) = c.split();
        assert!(a.is_empty() && b.is_empty());
    }
}
