//! Glyph solver
//!
//! The solver reads a captcha-like image left to right:
//!
//! 1. [`Solver::preprocess`] turns the image into bright glyphs on a dark,
//!    flattened background.
//! 2. [`Solver::detect_objects`] dilates a copy with a max filter and runs
//!    the [`ObjectDetector`] on it, using the undilated image to decide
//!    which pixels belong to each glyph.
//! 3. [`Solver::classify`] matches every glyph against every golden
//!    template and concatenates the winning class names.

use crate::error::{RecogError, RecogResult};
use crate::golden::GoldenSet;
use glyphscan_core::{ArithOp, Histogram, PixelBuffer};
use glyphscan_filter::RankFilter;
use glyphscan_region::{Detection, DetectorOptions, ObjectDetector};

/// Options for [`Solver`]
#[derive(Debug, Clone, PartialEq)]
pub struct SolverOptions {
    /// Added to the background estimate before it is subtracted
    pub background_offset: f64,
    /// Contrast multiplier applied after background removal
    pub contrast_factor: f64,
    /// Side of the square max filter used before detection (odd)
    pub filter_size: u32,
    /// Detector settings
    pub detector: DetectorOptions,
}

impl Default for SolverOptions {
    fn default() -> Self {
        Self {
            background_offset: 20.0,
            contrast_factor: 4.2,
            filter_size: 3,
            detector: DetectorOptions::default(),
        }
    }
}

impl SolverOptions {
    /// Set the background offset
    pub fn with_background_offset(mut self, offset: f64) -> Self {
        self.background_offset = offset;
        self
    }

    /// Set the contrast factor
    pub fn with_contrast_factor(mut self, factor: f64) -> Self {
        self.contrast_factor = factor;
        self
    }

    /// Set the max filter size
    pub fn with_filter_size(mut self, size: u32) -> Self {
        self.filter_size = size;
        self
    }

    /// Set the detector options
    pub fn with_detector(mut self, detector: DetectorOptions) -> Self {
        self.detector = detector;
        self
    }
}

/// Best golden template for one detected glyph.
#[derive(Debug, Clone, PartialEq)]
pub struct ClusterMatch {
    /// Index into the golden set
    pub golden_index: usize,
    pub class_name: String,
    pub class_id: i32,
    /// Disagreement ratio of the best rotation
    pub difference: f64,
    /// Rotation in degrees of the best fit
    pub angle: f64,
}

/// Result of [`Solver::classify`] and [`Solver::solve`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Classification {
    /// Matched class names in reading order
    pub text: String,
    /// One entry per glyph, parallel to the detection
    pub matches: Vec<ClusterMatch>,
}

impl Classification {
    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }
}

/// Captcha glyph solver over a fixed golden set.
#[derive(Debug, Clone)]
pub struct Solver {
    golden: GoldenSet,
    options: SolverOptions,
    detector: ObjectDetector,
}

impl Solver {
    pub fn new(golden: GoldenSet, options: SolverOptions) -> Self {
        let detector = ObjectDetector::new(options.detector.clone());
        Self {
            golden,
            options,
            detector,
        }
    }

    pub fn golden(&self) -> &GoldenSet {
        &self.golden
    }

    pub fn options(&self) -> &SolverOptions {
        &self.options
    }

    /// Flatten the background and stretch the glyph contrast.
    ///
    /// The image is converted to gray and inverted. The most populated
    /// intensity is taken as the background; `background + offset` is
    /// subtracted from every pixel and the result is multiplied by the
    /// contrast factor, clamping to `[0, 255]` after each step.
    pub fn preprocess(&self, image: &PixelBuffer) -> RecogResult<PixelBuffer> {
        let mut gray = image.to_gray();
        gray.invert_inplace();

        let background = Histogram::normalized(&gray).max_bin;
        gray.apply_constant_inplace(
            ArithOp::Subtract,
            background as f64 + self.options.background_offset,
        )?;
        gray.apply_constant_inplace(ArithOp::Multiply, self.options.contrast_factor)?;

        tracing::debug!(
            width = gray.width(),
            height = gray.height(),
            background,
            "preprocessed image"
        );
        Ok(gray)
    }

    /// Detect glyphs in a preprocessed image.
    ///
    /// # Errors
    ///
    /// Returns an error when the filter size is invalid or the image is
    /// not gray.
    pub fn detect_objects(&self, preprocessed: &PixelBuffer) -> RecogResult<Detection> {
        let size = self.options.filter_size;
        let filtered = RankFilter::max(size, size)?.apply(preprocessed)?;
        Ok(self.detector.detect(&filtered, preprocessed)?)
    }

    /// Match each detected glyph against the golden set.
    ///
    /// The template with the smallest difference wins; on ties the
    /// earlier template is kept. An empty golden set or detection gives
    /// an empty classification.
    pub fn classify(&self, detection: &Detection) -> RecogResult<Classification> {
        let mut result = Classification::default();
        if self.golden.is_empty() {
            tracing::warn!("golden set is empty, nothing to match against");
            return Ok(result);
        }

        for (i, cluster) in detection.clusters.iter().enumerate() {
            let mut best: Option<ClusterMatch> = None;
            for (index, golden) in self.golden.iter().enumerate() {
                let m = cluster.match_template(
                    &golden.target,
                    golden.cluster.center_x(),
                    golden.cluster.center_y(),
                )?;
                if best.as_ref().is_none_or(|b| m.difference < b.difference) {
                    best = Some(ClusterMatch {
                        golden_index: index,
                        class_name: golden.class_name().to_string(),
                        class_id: golden.class_id(),
                        difference: m.difference,
                        angle: m.angle,
                    });
                }
            }
            let best = best.ok_or_else(|| {
                RecogError::InvalidParameter("golden set changed during matching".to_string())
            })?;
            tracing::debug!(
                cluster = i,
                class = %best.class_name,
                difference = best.difference,
                angle = best.angle,
                "classified glyph"
            );
            result.text.push_str(&best.class_name);
            result.matches.push(best);
        }
        Ok(result)
    }

    /// Preprocess, detect and classify in one call.
    pub fn solve(&self, image: &PixelBuffer) -> RecogResult<Classification> {
        let preprocessed = self.preprocess(image)?;
        let detection = self.detect_objects(&preprocessed)?;
        let result = self.classify(&detection)?;
        tracing::info!(glyphs = detection.len(), text = %result.text, "solved image");
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glyphscan_core::PixelFormat;

    #[test]
    fn test_options_builder() {
        let o = SolverOptions::default()
            .with_background_offset(5.0)
            .with_contrast_factor(2.0)
            .with_filter_size(5)
            .with_detector(DetectorOptions::default().with_min_points(10));
        assert_eq!(o.background_offset, 5.0);
        assert_eq!(o.contrast_factor, 2.0);
        assert_eq!(o.filter_size, 5);
        assert_eq!(o.detector.min_points, 10);
    }

    #[test]
    fn test_preprocess_flattens_background() {
        // background 200 with one 50 pixel and one 180 pixel
        let mut img = PixelBuffer::from_gray(4, 2, vec![200; 8]).unwrap();
        img.set(1, 0, 50).unwrap();
        img.set(2, 1, 180).unwrap();

        let solver = Solver::new(GoldenSet::new(), SolverOptions::default());
        let out = solver.preprocess(&img).unwrap();
        assert_eq!(out.format(), PixelFormat::Gray);
        // inverted background 55, subtract 75
        assert_eq!(out.get(0, 0), Some(0));
        // 205 - 75 = 130, times 4.2 clamps
        assert_eq!(out.get(1, 0), Some(255));
        // 75 - 75 = 0
        assert_eq!(out.get(2, 1), Some(0));
    }

    #[test]
    fn test_even_filter_size_rejected() {
        let solver = Solver::new(GoldenSet::new(), SolverOptions::default().with_filter_size(2));
        let img = PixelBuffer::new(8, 8, PixelFormat::Gray).unwrap();
        assert!(matches!(solver.detect_objects(&img), Err(RecogError::Filter(_))));
    }

    #[test]
    fn test_empty_golden_set_gives_empty_text() {
        let solver = Solver::new(GoldenSet::new(), SolverOptions::default());
        let mut img = PixelBuffer::from_gray(20, 20, vec![255; 400]).unwrap();
        for y in 5..15 {
            for x in 5..15 {
                img.set(x, y, 0).unwrap();
            }
        }
        let result = solver.solve(&img).unwrap();
        assert!(result.is_empty());
        assert_eq!(result.text, "");
    }
}
