//! Image I/O regression test
//!
//! Writes synthetic gray and RGB buffers through every enabled format,
//! reads them back from disk and checks the samples survive (exactly for
//! lossless formats, approximately for JPEG).

use glyphscan_core::{ImageSink, ImageSource, PixelBuffer};
use glyphscan_io::{FileSink, FileSource, ImageFormat, detect_format, read_image, write_image};
use glyphscan_test::{RegParams, synth};

fn gray_fixture() -> PixelBuffer {
    let mut buf = synth::blank(24, 16, 30).expect("blank");
    synth::fill_rect(&mut buf, 4, 4, 8, 6, 220);
    buf
}

fn rgb_fixture() -> PixelBuffer {
    let n = 6 * 5;
    let r: Vec<u8> = (0..n).map(|i| (i * 8) as u8).collect();
    let g: Vec<u8> = (0..n).map(|i| 255 - (i * 8) as u8).collect();
    let b = vec![77u8; n];
    PixelBuffer::from_rgb_planes(6, 5, &r, &g, &b).expect("rgb planes")
}

#[test]
fn io_reg_lossless_roundtrip() {
    let mut rp = RegParams::new("io_lossless");
    let dir = tempfile::tempdir().expect("tempdir");

    for format in [ImageFormat::Png, ImageFormat::Pnm] {
        for (name, buf) in [("gray", gray_fixture()), ("rgb", rgb_fixture())] {
            let path = dir.path().join(format!("{}.{}", name, format.extension()));
            write_image(&buf, &path, format).expect("write_image");
            rp.compare_values(
                1.0,
                if detect_format(&path).expect("detect") == format { 1.0 } else { 0.0 },
                0.0,
            );
            let back = read_image(&path).expect("read_image");
            rp.compare_buffers(&buf, &back);
        }
    }

    assert!(rp.cleanup(), "io_lossless regression test failed");
}

#[test]
fn io_reg_jpeg_roundtrip() {
    let mut rp = RegParams::new("io_jpeg");
    let dir = tempfile::tempdir().expect("tempdir");

    let buf = synth::blank(32, 32, 100).expect("blank");
    let path = dir.path().join("flat.jpg");
    write_image(&buf, &path, ImageFormat::Jpeg).expect("write jpeg");
    let back = read_image(&path).expect("read jpeg");
    rp.compare_values(32.0, back.width() as f64, 0.0);
    rp.compare_values(32.0, back.height() as f64, 0.0);
    let max_err = buf
        .data()
        .iter()
        .zip(back.data())
        .map(|(a, b)| a.abs_diff(*b))
        .max()
        .unwrap_or(0);
    rp.compare_values(0.0, max_err as f64, 2.0);

    assert!(rp.cleanup(), "io_jpeg regression test failed");
}

#[test]
fn io_reg_source_and_sink() {
    let mut rp = RegParams::new("io_source_sink");
    let dir = tempfile::tempdir().expect("tempdir");

    let mut sink = FileSink::new(dir.path(), "frame", ImageFormat::Png);
    let first = sink.next_path();
    sink.store(&gray_fixture()).expect("store 0");
    sink.store(&rgb_fixture()).expect("store 1");
    rp.compare_values(1.0, if first.exists() { 1.0 } else { 0.0 }, 0.0);

    let mut source = FileSource::new(&first);
    let back = source.acquire().expect("acquire");
    rp.compare_buffers(&gray_fixture(), &back);

    let mut missing = FileSource::new(dir.path().join("nope.png"));
    rp.compare_values(1.0, if missing.acquire().is_err() { 1.0 } else { 0.0 }, 0.0);

    assert!(rp.cleanup(), "io_source_sink regression test failed");
}
