//! Solver regression test
//!
//! Tests the full recognition pipeline on synthetic images:
//!   (1) golden templates load from a folder in file name order, skipping
//!       files that do not decode, including headers claiming huge rasters
//!   (2) a dark L and a dark bar on white read as "LI", each matching its
//!       template exactly at zero rotation
//!   (3) an image without glyphs reads as the empty string
//!   (4) folder histogram helpers skip bad entries

use glyphscan_core::Histogram;
use glyphscan_io::ImageFormat;
use glyphscan_recog::histfolder::{average_folder, calc_folder, load_folder};
use glyphscan_recog::{GoldenSet, Solver, SolverOptions};
use glyphscan_test::{RegParams, synth};
use std::path::Path;

fn write_golden(dir: &Path) {
    let mut l = synth::blank(24, 32, 255).expect("golden L");
    synth::draw_points(&mut l, &synth::letter_l(4, 5, 12, 20, 3), 0);
    glyphscan_io::write_image(&l, dir.join("L.png"), ImageFormat::Png).expect("write L");

    let mut bar = synth::blank(24, 32, 255).expect("golden I");
    synth::fill_rect(&mut bar, 10, 5, 4, 20, 0);
    glyphscan_io::write_image(&bar, dir.join("I.png"), ImageFormat::Png).expect("write I");

    std::fs::write(dir.join("README.txt"), b"not an image").expect("write junk");
}

#[test]
fn solver_reg_golden_folder() {
    let mut rp = RegParams::new("solver_golden_folder");
    let dir = tempfile::tempdir().expect("tempdir");
    write_golden(dir.path());

    // sorts first; the header promises far more data than the file holds
    std::fs::write(dir.path().join("A.pgm"), b"P5 4000000000 3000000000 255\n\0")
        .expect("write corrupt pgm");

    let golden = GoldenSet::load_dir(dir.path()).expect("load golden");
    rp.compare_values(2.0, golden.len() as f64, 0.0);
    let first = golden.get(0).expect("first template");
    let second = golden.get(1).expect("second template");
    rp.compare_strings(b"I", first.class_name().as_bytes());
    rp.compare_values(8.0, first.class_id() as f64, 0.0);
    rp.compare_values(80.0, first.cluster.len() as f64, 0.0);
    rp.compare_strings(b"L", second.class_name().as_bytes());
    rp.compare_values(87.0, second.cluster.len() as f64, 0.0);
    rp.compare_values(
        87.0,
        second.target.data().iter().filter(|&&v| v == 1).count() as f64,
        0.0,
    );

    let empty = tempfile::tempdir().expect("empty dir");
    let none = GoldenSet::load_dir(empty.path()).expect("load empty");
    rp.compare_values(0.0, none.len() as f64, 0.0);
    rp.compare_flag(true, GoldenSet::load_dir(dir.path().join("missing")).is_err());

    assert!(rp.cleanup(), "solver golden folder test failed");
}

#[test]
fn solver_reg_reads_glyphs() {
    let mut rp = RegParams::new("solver_reads_glyphs");
    let dir = tempfile::tempdir().expect("tempdir");
    write_golden(dir.path());
    let solver = Solver::new(
        GoldenSet::load_dir(dir.path()).expect("load golden"),
        SolverOptions::default(),
    );

    // bar drawn first, L second; reading order comes from x
    let mut pixs = synth::blank(48, 40, 255).expect("image");
    synth::fill_rect(&mut pixs, 30, 8, 4, 20, 0);
    synth::draw_points(&mut pixs, &synth::letter_l(10, 8, 12, 20, 3), 0);

    let pre = solver.preprocess(&pixs).expect("preprocess");
    rp.compare_values(0.0, pre.get(0, 0).map_or(-1.0, f64::from), 0.0);
    rp.compare_values(255.0, pre.get(10, 8).map_or(-1.0, f64::from), 0.0);
    rp.write_buffer(&pre, ImageFormat::Png).expect("write preprocessed");

    let detection = solver.detect_objects(&pre).expect("detect");
    rp.compare_values(2.0, detection.len() as f64, 0.0);
    rp.compare_values(87.0, detection.clusters[0].len() as f64, 0.0);
    rp.compare_values(80.0, detection.clusters[1].len() as f64, 0.0);

    let result = solver.solve(&pixs).expect("solve");
    eprintln!("read {:?}", result.text);
    rp.compare_strings(b"LI", result.text.as_bytes());
    rp.compare_values(2.0, result.matches.len() as f64, 0.0);
    let l = &result.matches[0];
    rp.compare_values(1.0, l.golden_index as f64, 0.0);
    rp.compare_values(11.0, l.class_id as f64, 0.0);
    rp.compare_values(0.0, l.difference, 0.0);
    rp.compare_values(0.0, l.angle, 0.0);
    let i = &result.matches[1];
    rp.compare_values(0.0, i.golden_index as f64, 0.0);
    rp.compare_values(0.0, i.difference, 0.0);

    // RGB input goes through the same gray conversion
    let rgb = solver.solve(&pixs.to_rgb()).expect("solve rgb");
    rp.compare_strings(result.text.as_bytes(), rgb.text.as_bytes());

    // nothing to read
    let blank = synth::blank(48, 40, 255).expect("blank");
    let nothing = solver.solve(&blank).expect("solve blank");
    rp.compare_strings(b"", nothing.text.as_bytes());

    assert!(rp.cleanup(), "solver read test failed");
}

#[test]
fn solver_reg_histogram_folders() {
    let mut rp = RegParams::new("solver_histogram_folders");

    let images = tempfile::tempdir().expect("image dir");
    let dark = synth::blank(8, 8, 10).expect("dark");
    let mut split = synth::blank(8, 8, 0).expect("split");
    synth::fill_rect(&mut split, 0, 0, 4, 8, 200);
    glyphscan_io::write_image(&dark, images.path().join("a.png"), ImageFormat::Png)
        .expect("write a");
    glyphscan_io::write_image(&split, images.path().join("b.pgm"), ImageFormat::Pnm)
        .expect("write b");
    std::fs::write(images.path().join("c.png"), b"\x89PNG broken").expect("write c");
    std::fs::write(images.path().join("d.ppm"), b"P6 70000 70000 255\n\0").expect("write d");

    let computed = calc_folder(images.path()).expect("calc folder");
    rp.compare_values(2.0, computed.len() as f64, 0.0);
    rp.compare_values(1.0, computed[0].1.bins()[10] as f64, 1e-6);
    rp.compare_values(0.5, computed[1].1.bins()[200] as f64, 1e-6);

    let hists = tempfile::tempdir().expect("histogram dir");
    for (i, (_, h)) in computed.iter().enumerate() {
        h.save(hists.path().join(format!("{i}.hist"))).expect("save histogram");
    }
    std::fs::write(hists.path().join("junk.hist"), [1u8, 2]).expect("write junk");

    let loaded = load_folder(hists.path()).expect("load folder");
    rp.compare_values(2.0, loaded.len() as f64, 0.0);
    rp.compare_values(0.0, loaded[0].1.l1_distance(&computed[0].1), 0.0);

    let avg = average_folder(hists.path())
        .expect("average folder")
        .expect("some histograms");
    rp.compare_values(0.5, avg.bins()[10] as f64, 1e-6);
    rp.compare_values(0.25, avg.bins()[0] as f64, 1e-6);

    let empty = tempfile::tempdir().expect("empty dir");
    rp.compare_values(0.0, calc_folder(empty.path()).expect("calc empty").len() as f64, 0.0);
    let no_avg: Option<Histogram> = average_folder(empty.path()).expect("average empty");
    rp.compare_flag(true, no_avg.is_none());

    assert!(rp.cleanup(), "solver histogram folder test failed");
}
