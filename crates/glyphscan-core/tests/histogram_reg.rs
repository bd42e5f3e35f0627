//! Histogram regression test
//!
//! Tests histogram statistics and persistence:
//!   (1) statistics of a synthetic two-level image
//!   (2) save/load through a file reproduces the bins bit-for-bit
//!   (3) truncated and negative-count files are rejected whole
//!   (4) save/load keeps bins and bin count for any input (randomized)

use glyphscan_core::{Error, Histogram, PixelBuffer};
use glyphscan_test::{RegParams, synth};
use proptest::prelude::*;

#[test]
fn histogram_reg_statistics() {
    let mut rp = RegParams::new("histogram_statistics");

    // 3/4 background at 40, 1/4 glyph at 220
    let mut pixs = synth::blank(20, 20, 40).expect("blank");
    synth::fill_rect(&mut pixs, 0, 0, 10, 10, 220);

    let mut h = Histogram::from_buffer(&pixs);
    rp.compare_values(400.0, h.total_pixels as f64, 0.0);
    rp.compare_values(40.0, h.max_bin as f64, 0.0);
    rp.compare_values(220.0, h.min_bin as f64, 0.0);
    rp.compare_values(300.0, h.max_count as f64, 0.0);
    rp.compare_values(100.0, h.min_count as f64, 0.0);
    rp.compare_values(40.0, h.median_bin as f64, 0.0);
    rp.compare_values(85.0, h.mean_intensity, 1e-9);
    // sqrt(0.75 * 45^2 + 0.25 * 135^2)
    rp.compare_values(77.942_286_340_599_48, h.intensity_stdev, 1e-9);
    rp.compare_values(40.0, h.min_intensity, 0.0);
    rp.compare_values(220.0, h.max_intensity, 0.0);

    rp.compare_flag(true, h.normalize());
    rp.compare_values(0.75, h.bins()[40] as f64, 1e-7);
    rp.compare_values(0.25, h.bins()[220] as f64, 1e-7);
    // the statistics stay in pixel units
    rp.compare_values(40.0, h.max_bin as f64, 0.0);

    let n = Histogram::normalized(&pixs.to_rgb());
    rp.compare_values(0.0, n.l1_distance(&h), 1e-12);

    assert!(rp.cleanup(), "histogram statistics test failed");
}

#[test]
fn histogram_reg_persistence() {
    let mut rp = RegParams::new("histogram_persistence");

    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("image.hist");

    let pixs = PixelBuffer::from_gray(7, 3, (0..21u8).map(|v| v * 12).collect()).expect("pixs");
    let h = Histogram::normalized(&pixs);
    h.save(&path).expect("save");

    let bytes = std::fs::read(&path).expect("read back");
    rp.compare_values((4 + 4 * 256) as f64, bytes.len() as f64, 0.0);
    rp.compare_strings(&256i32.to_le_bytes(), &bytes[..4]);
    rp.compare_strings(&h.to_bytes().expect("to_bytes"), &bytes);

    let back = Histogram::load(&path).expect("load");
    rp.compare_values(256.0, back.num_bins() as f64, 0.0);
    let same_bits = h
        .bins()
        .iter()
        .zip(back.bins())
        .all(|(a, b)| a.to_bits() == b.to_bits());
    rp.compare_flag(true, same_bits);
    // only the bins are stored
    rp.compare_values(0.0, back.total_pixels as f64, 0.0);

    std::fs::write(&path, &bytes[..bytes.len() - 1]).expect("truncate");
    let truncated = matches!(Histogram::load(&path), Err(Error::CorruptData(_)));
    rp.compare_flag(true, truncated);

    let negative = Histogram::from_bytes(&(-1i32).to_le_bytes());
    rp.compare_flag(true, matches!(negative, Err(Error::CorruptData(_))));

    let missing = Histogram::load(dir.path().join("missing.hist"));
    rp.compare_flag(true, matches!(missing, Err(Error::Io(_))));

    assert!(rp.cleanup(), "histogram persistence test failed");
}

proptest! {
    #[test]
    fn save_load_is_bit_exact(bins in prop::collection::vec(any::<f32>(), 0..300)) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("h.bin");
        let h = Histogram::with_bins(bins);
        h.save(&path).unwrap();
        let back = Histogram::load(&path).unwrap();
        prop_assert_eq!(back.num_bins(), h.num_bins());
        for (a, b) in h.bins().iter().zip(back.bins()) {
            prop_assert_eq!(a.to_bits(), b.to_bits());
        }
    }

    #[test]
    fn normalized_bins_sum_to_one(data in prop::collection::vec(any::<u8>(), 1..500)) {
        let n = data.len() as u32;
        let pixs = PixelBuffer::from_gray(n, 1, data).unwrap();
        let h = Histogram::normalized(&pixs);
        let sum: f64 = h.bins().iter().map(|&b| b as f64).sum();
        prop_assert!((sum - 1.0).abs() < 1e-4);
        prop_assert!(h.bins()[h.max_bin] >= h.bins()[h.min_bin]);
    }
}
