//! Glyph detection
//!
//! Turns a filtered gray image into an ordered list of glyph clusters:
//!
//! 1. Threshold the filtered image into a mask.
//! 2. Label the mask with near-8-connectivity.
//! 3. Build one cluster per label from the pixels that also pass the
//!    threshold in the unfiltered source.
//! 4. Drop small clusters.
//! 5. Split clusters whose oriented box is too long, recursively,
//!    dropping small halves.
//! 6. Sort left to right by `x_min`.

use crate::cluster::Cluster;
use crate::conncomp::ComponentLabeler;
use crate::error::{RegionError, RegionResult};
use glyphscan_core::{PixelBuffer, PixelFormat, Polygon};

/// Options for [`ObjectDetector`]
#[derive(Debug, Clone, PartialEq)]
pub struct DetectorOptions {
    /// Minimum intensity of a foreground pixel
    pub threshold: u8,
    /// Clusters with fewer points are discarded
    pub min_points: usize,
    /// Clusters whose longer oriented side exceeds this are split
    pub split_size: f64,
    /// Connection distance handed to the labeler
    pub connect_distance: f64,
}

impl Default for DetectorOptions {
    fn default() -> Self {
        Self {
            threshold: 10,
            min_points: 50,
            split_size: 32.0,
            connect_distance: std::f64::consts::SQRT_2 + 1e-6,
        }
    }
}

impl DetectorOptions {
    /// Set the foreground threshold
    pub fn with_threshold(mut self, threshold: u8) -> Self {
        self.threshold = threshold;
        self
    }

    /// Set the minimum cluster size
    pub fn with_min_points(mut self, min_points: usize) -> Self {
        self.min_points = min_points;
        self
    }

    /// Set the split size
    pub fn with_split_size(mut self, split_size: f64) -> Self {
        self.split_size = split_size;
        self
    }

    /// Set the labeler connection distance
    pub fn with_connect_distance(mut self, distance: f64) -> Self {
        self.connect_distance = distance;
        self
    }
}

/// Detected glyphs in reading order.
///
/// `clusters`, `centers` and `bounds` are parallel.
#[derive(Debug, Clone, Default)]
pub struct Detection {
    pub clusters: Vec<Cluster>,
    /// Truncated centroids
    pub centers: Vec<(i32, i32)>,
    /// Oriented bounding polygons
    pub bounds: Vec<Polygon>,
}

impl Detection {
    pub fn len(&self) -> usize {
        self.clusters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clusters.is_empty()
    }
}

/// Connected-component glyph detector.
#[derive(Debug, Clone, Default)]
pub struct ObjectDetector {
    options: DetectorOptions,
}

impl ObjectDetector {
    pub fn new(options: DetectorOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &DetectorOptions {
        &self.options
    }

    /// Detect glyphs.
    ///
    /// # Arguments
    ///
    /// * `filtered` - Gray image the mask is taken from
    /// * `source` - Unfiltered gray image of the same size; a pixel joins
    ///   its cluster only if it passes the threshold here too
    ///
    /// # Errors
    ///
    /// Returns an error when either image is not gray or their sizes differ.
    pub fn detect(&self, filtered: &PixelBuffer, source: &PixelBuffer) -> RegionResult<Detection> {
        for buf in [filtered, source] {
            if buf.format() != PixelFormat::Gray {
                return Err(RegionError::Core(glyphscan_core::Error::UnsupportedFormat {
                    expected: "gray",
                    actual: buf.format(),
                }));
            }
        }
        if !filtered.same_size(source) {
            return Err(RegionError::Core(glyphscan_core::Error::IncompatibleSizes(
                filtered.width(),
                filtered.height(),
                source.width(),
                source.height(),
            )));
        }

        let threshold = self.options.threshold;
        let mask = filtered.threshold_mask(threshold)?;
        let labeling = ComponentLabeler::new(self.options.connect_distance)
            .label(&mask, filtered.width() as usize)?;

        let src = source.data();
        let stride = source.width() as usize;
        let mut clusters: Vec<Cluster> =
            (0..labeling.num_clusters).map(|_| Cluster::new()).collect();
        for ((&x, &y), &label) in labeling.xs.iter().zip(&labeling.ys).zip(&labeling.labels) {
            let Some(cluster) = (label as usize)
                .checked_sub(1)
                .and_then(|i| clusters.get_mut(i))
            else {
                debug_assert!(false, "label {} out of range", label);
                continue;
            };
            if src[y as usize * stride + x as usize] >= threshold {
                cluster.push(x as f64, y as f64);
            }
        }

        let labeled = clusters.len();
        let mut kept = Vec::new();
        for mut cluster in clusters {
            if cluster.len() < self.options.min_points {
                continue;
            }
            cluster.calc_data_range();
            kept.push(cluster);
        }
        let surviving = kept.len();

        let mut refined = Vec::with_capacity(kept.len());
        for cluster in kept {
            self.refine(cluster, &mut refined);
        }
        refined.sort_by(Cluster::cmp_by_x_min);

        tracing::debug!(
            labeled,
            surviving,
            detected = refined.len(),
            "detected objects"
        );

        let centers = refined.iter().map(Cluster::center).collect();
        let bounds = refined.iter().map(|c| c.poly_bounds().clone()).collect();
        Ok(Detection {
            clusters: refined,
            centers,
            bounds,
        })
    }

    /// Split `cluster` while its oriented box is too long.
    fn refine(&self, cluster: Cluster, out: &mut Vec<Cluster>) {
        let bounds = cluster.oriented_bounds();
        if bounds.size_x.max(bounds.size_y) <= self.options.split_size {
            out.push(cluster);
            return;
        }

        let (first, second) = cluster.split();
        if first.is_empty() || second.is_empty() {
            out.push(cluster);
            return;
        }
        tracing::debug!(
            points = cluster.len(),
            first = first.len(),
            second = second.len(),
            "split cluster"
        );
        for half in [first, second] {
            if half.len() >= self.options.min_points {
                self.refine(half, out);
            }
        }
    }
}
