mod common;

use common::{comment_block, gradient, qoi_block, solid};
use image::GenericImageView;
use printpass_core::GcodeError;
use printpass_gcode::{extract_thumbnail, try_extract_thumbnail, ThumbnailOptions};

const HEADER: &str = "; generated by PrusaSlicer 2.7.1\n;\n";
const BODY: &str = "G28\nG1 Z0.2 F720\nG1 X10 Y10 E0.5\n";

#[test]
fn test_selects_largest_qoi_thumbnail() {
    let dir = tempfile::tempdir().unwrap();
    let options = ThumbnailOptions::new(dir.path());

    let small = solid(2, 2, [255, 0, 0, 255]);
    let large = gradient(8, 6);
    let content = format!(
        "{}{}\n{}\n{}",
        HEADER,
        qoi_block(2, 2, &small),
        qoi_block(8, 6, &large),
        BODY
    );

    let url = extract_thumbnail(&content, &options, "job-7");
    assert_eq!(url.as_deref(), Some("/gcode_previews/job-7.png"));

    let written = image::open(dir.path().join("job-7.png")).unwrap();
    assert_eq!(written.dimensions(), (8, 6));
    let rgb = written.to_rgb8();
    assert_eq!(rgb.get_pixel(3, 2).0, [60, 60, 90]);
}

#[test]
fn test_equal_area_keeps_first_block() {
    let dir = tempfile::tempdir().unwrap();
    let options = ThumbnailOptions::new(dir.path());

    let first = solid(4, 4, [0, 200, 0, 255]);
    let second = solid(4, 4, [0, 0, 200, 255]);
    let content = format!(
        "{}{}{}",
        qoi_block(4, 4, &first),
        qoi_block(4, 4, &second),
        BODY
    );

    assert!(extract_thumbnail(&content, &options, "tie").is_some());
    let written = image::open(dir.path().join("tie.png")).unwrap().to_rgb8();
    assert_eq!(written.get_pixel(0, 0).0, [0, 200, 0]);
}

#[test]
fn test_creates_missing_output_directory() {
    let dir = tempfile::tempdir().unwrap();
    let nested = dir.path().join("previews").join("2025");
    let options = ThumbnailOptions::new(&nested).with_url_prefix("/media/previews");

    let content = qoi_block(3, 3, &solid(3, 3, [1, 2, 3, 255]));
    let url = extract_thumbnail(&content, &options, "42");

    assert_eq!(url.as_deref(), Some("/media/previews/42.png"));
    assert!(nested.join("42.png").is_file());
}

#[test]
fn test_png_fallback_writes_payload_verbatim() {
    let dir = tempfile::tempdir().unwrap();
    let options = ThumbnailOptions::new(dir.path());

    let mut png = Vec::new();
    image::DynamicImage::ImageRgb8(image::RgbImage::from_pixel(5, 4, image::Rgb([9, 9, 9])))
        .write_to(&mut std::io::Cursor::new(&mut png), image::ImageFormat::Png)
        .unwrap();
    let content = format!(
        "{}{}{}",
        HEADER,
        comment_block("thumbnail begin 5x4", "thumbnail end", &png),
        BODY
    );

    let url = extract_thumbnail(&content, &options, "png-only");
    assert_eq!(url.as_deref(), Some("/gcode_previews/png-only.png"));
    assert_eq!(std::fs::read(dir.path().join("png-only.png")).unwrap(), png);
}

#[test]
fn test_corrupt_qoi_does_not_fall_back_to_png() {
    let dir = tempfile::tempdir().unwrap();
    let options = ThumbnailOptions::new(dir.path());

    let content = format!(
        "; thumbnail_QOI begin 4x4 8\n; bm90cW9p\n; thumbnail_QOI end\n{}{}",
        comment_block("thumbnail begin 1x1", "thumbnail end", b"\x89PNG"),
        BODY
    );

    assert!(try_extract_thumbnail(&content, &options, "bad").is_err());
    assert_eq!(extract_thumbnail(&content, &options, "bad"), None);
    assert!(!dir.path().join("bad.png").exists());
}

#[test]
fn test_no_thumbnail() {
    let dir = tempfile::tempdir().unwrap();
    let options = ThumbnailOptions::new(dir.path());

    assert_eq!(try_extract_thumbnail(BODY, &options, "none").unwrap(), None);
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[test]
fn test_unsafe_job_id_is_refused() {
    let dir = tempfile::tempdir().unwrap();
    let options = ThumbnailOptions::new(dir.path().join("inner"));

    let content = qoi_block(2, 2, &solid(2, 2, [5, 5, 5, 255]));
    assert_eq!(extract_thumbnail(&content, &options, "../escape"), None);
    assert!(!dir.path().join("escape.png").exists());
}

#[test]
fn test_oversized_header_in_small_block_is_refused() {
    let dir = tempfile::tempdir().unwrap();
    let options = ThumbnailOptions::new(dir.path());

    let mut qoi = b"qoif".to_vec();
    qoi.extend_from_slice(&8000u32.to_be_bytes());
    qoi.extend_from_slice(&8000u32.to_be_bytes());
    qoi.extend_from_slice(&[4, 0]);
    let content = comment_block("thumbnail_QOI begin 16x16", "thumbnail_QOI end", &qoi);

    assert!(matches!(
        try_extract_thumbnail(&content, &options, "j"),
        Err(GcodeError::DimensionMismatch { width: 8000, .. })
    ));
    assert_eq!(extract_thumbnail(&content, &options, "j"), None);
    assert!(!dir.path().join("j.png").exists());
}
