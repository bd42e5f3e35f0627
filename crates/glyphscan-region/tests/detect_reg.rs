//! Object detector regression test
//!
//! Tests the detection pipeline on synthetic images:
//!   (1) two separated 10x10 blobs give two 100-point clusters in
//!       left-to-right order
//!   (2) a 40x10 bar exceeds the split size and becomes two clusters
//!   (3) halves below the minimum point count are dropped
//!   (4) the result is independent of the filtered mask's dilation

use glyphscan_filter::max_filter;
use glyphscan_io::ImageFormat;
use glyphscan_region::{DetectorOptions, ObjectDetector};
use glyphscan_test::{RegParams, synth};

#[test]
fn detect_reg_two_blobs() {
    let mut rp = RegParams::new("detect_two_blobs");

    let mut pixs = synth::blank(50, 50, 0).expect("blank");
    // right blob drawn first so ordering comes from the sort
    synth::fill_rect(&mut pixs, 30, 20, 10, 10, 200);
    synth::fill_rect(&mut pixs, 5, 20, 10, 10, 200);
    let filtered = max_filter(&pixs, 3, 3).expect("max filter");
    rp.write_buffer(&filtered, ImageFormat::Png).expect("write filtered");

    let detector = ObjectDetector::new(DetectorOptions::default().with_threshold(100));
    let d = detector.detect(&filtered, &pixs).expect("detect");
    eprintln!("detected {} clusters", d.len());

    rp.compare_values(2.0, d.len() as f64, 0.0);
    rp.compare_values(100.0, d.clusters[0].len() as f64, 0.0);
    rp.compare_values(100.0, d.clusters[1].len() as f64, 0.0);
    rp.compare_values(5.0, d.clusters[0].x_min(), 0.0);
    rp.compare_values(30.0, d.clusters[1].x_min(), 0.0);

    // centers truncate 9.5/24.5 and 34.5/24.5
    rp.compare_values(9.0, d.centers[0].0 as f64, 0.0);
    rp.compare_values(24.0, d.centers[0].1 as f64, 0.0);
    rp.compare_values(34.0, d.centers[1].0 as f64, 0.0);
    rp.compare_values(4.0, d.bounds[1].len() as f64, 0.0);

    // same answer without the dilation
    let plain = detector.detect(&pixs, &pixs).expect("detect unfiltered");
    rp.compare_values(2.0, plain.len() as f64, 0.0);
    rp.compare_values(d.clusters[1].center_x(), plain.clusters[1].center_x(), 0.0);

    assert!(rp.cleanup(), "detect two blobs test failed");
}

#[test]
fn detect_reg_split_long_bar() {
    let mut rp = RegParams::new("detect_split");

    let mut pixs = synth::blank(60, 30, 0).expect("blank");
    synth::fill_rect(&mut pixs, 5, 10, 40, 10, 255);

    let detector = ObjectDetector::default();
    let d = detector.detect(&pixs, &pixs).expect("detect");

    rp.compare_values(2.0, d.len() as f64, 0.0);
    for c in &d.clusters {
        let b = c.oriented_bounds();
        rp.compare_flag(true, b.size_x.max(b.size_y) <= 32.0);
        rp.compare_flag(true, c.len() >= 50);
    }
    rp.compare_values(250.0, d.clusters[0].len() as f64, 0.0);
    rp.compare_values(150.0, d.clusters[1].len() as f64, 0.0);
    rp.compare_values(30.0, d.clusters[1].x_min(), 0.0);

    // a stricter minimum drops the smaller half
    let strict = ObjectDetector::new(DetectorOptions::default().with_min_points(200));
    let d = strict.detect(&pixs, &pixs).expect("detect strict");
    rp.compare_values(1.0, d.len() as f64, 0.0);
    rp.compare_values(250.0, d.clusters[0].len() as f64, 0.0);

    // raising the split size keeps the bar whole
    let loose = ObjectDetector::new(DetectorOptions::default().with_split_size(64.0));
    let d = loose.detect(&pixs, &pixs).expect("detect loose");
    rp.compare_values(1.0, d.len() as f64, 0.0);
    rp.compare_values(400.0, d.clusters[0].len() as f64, 0.0);

    assert!(rp.cleanup(), "detect split test failed");
}
