use std::io::Cursor;

use image::imageops::FilterType;

use super::*;
use crate::ShapeError;
use crate::geometry::ScalePolicy;

fn encode(img: DynamicImage) -> Vec<u8> {
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

fn solid_rgba(width: u32, height: u32, px: [u8; 4]) -> Vec<u8> {
    encode(DynamicImage::ImageRgba8(RgbaImage::from_pixel(
        width,
        height,
        image::Rgba(px),
    )))
}

#[test]
fn wide_source_is_centered_vertically() {
    let src = solid_rgba(300, 100, [255, 0, 0, 255]);
    let canvas = RasterTransformer::new(ThumbnailOpts::default())
        .render(&src)
        .unwrap();
    assert_eq!(canvas.dimensions(), (192, 192));

    // Fitted 192x64 at y = 64.
    assert_eq!(canvas.get_pixel(96, 63).0[3], 0);
    assert!(canvas.get_pixel(96, 64).0[3] >= 250);
    assert!(canvas.get_pixel(96, 127).0[3] >= 250);
    assert_eq!(canvas.get_pixel(96, 128).0[3], 0);

    let center = canvas.get_pixel(96, 96).0;
    assert!(center[0] >= 250 && center[1] <= 5 && center[2] <= 5);
}

#[test]
fn tall_source_is_centered_horizontally() {
    let src = solid_rgba(100, 200, [0, 0, 255, 255]);
    let canvas = RasterTransformer::new(ThumbnailOpts::default())
        .render(&src)
        .unwrap();
    assert_eq!(canvas.get_pixel(47, 96).0[3], 0);
    assert!(canvas.get_pixel(48, 96).0[3] >= 250);
    assert!(canvas.get_pixel(143, 96).0[3] >= 250);
    assert_eq!(canvas.get_pixel(144, 96).0[3], 0);
}

#[test]
fn rgb_source_is_normalized_to_opaque_rgba() {
    let rgb = image::RgbImage::from_pixel(10, 10, image::Rgb([10, 200, 30]));
    let src = encode(DynamicImage::ImageRgb8(rgb));
    let opts = ThumbnailOpts {
        max_size: 20,
        resize_filter: FilterType::Nearest,
        ..ThumbnailOpts::default()
    };
    let canvas = RasterTransformer::new(opts).render(&src).unwrap();
    assert_eq!(canvas.get_pixel(5, 5).0, [10, 200, 30, 255]);
}

#[test]
fn shrink_only_copies_small_source_unchanged() {
    let src = solid_rgba(4, 2, [7, 8, 9, 255]);
    let opts = ThumbnailOpts {
        max_size: 10,
        scale_policy: ScalePolicy::ShrinkOnly,
        ..ThumbnailOpts::default()
    };
    let canvas = RasterTransformer::new(opts).render(&src).unwrap();
    // Offsets (3, 4).
    assert_eq!(canvas.get_pixel(3, 4).0, [7, 8, 9, 255]);
    assert_eq!(canvas.get_pixel(6, 5).0, [7, 8, 9, 255]);
    assert_eq!(canvas.get_pixel(2, 4).0, [0, 0, 0, 0]);
    assert_eq!(canvas.get_pixel(7, 4).0, [0, 0, 0, 0]);
}

#[test]
fn transparent_pixels_are_copied_without_blending() {
    let src = solid_rgba(2, 2, [50, 60, 70, 0]);
    let opts = ThumbnailOpts {
        max_size: 2,
        ..ThumbnailOpts::default()
    };
    let canvas = RasterTransformer::new(opts).render(&src).unwrap();
    assert_eq!(canvas.get_pixel(0, 0).0, [50, 60, 70, 0]);
}

#[test]
fn garbage_bytes_are_a_decode_error() {
    let err = RasterTransformer::new(ThumbnailOpts::default())
        .transform(b"definitely not an image")
        .unwrap_err();
    assert!(matches!(err, ShapeError::Decode(_)));
}

#[test]
fn transform_is_deterministic() {
    let src = solid_rgba(37, 91, [1, 2, 3, 200]);
    let t = RasterTransformer::new(ThumbnailOpts::default());
    assert_eq!(t.transform(&src).unwrap(), t.transform(&src).unwrap());
}
