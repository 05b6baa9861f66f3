use super::*;

const SVG_10X10: &[u8] = br##"<svg xmlns="http://www.w3.org/2000/svg" width="10" height="10"><rect width="10" height="10" fill="#00ff00"/></svg>"##;

fn png_bytes(width: u32, height: u32, px: [u8; 4]) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(width, height, image::Rgba(px));
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

#[test]
fn dispatch_follows_kind() {
    let thumbs = Thumbnailer::default();
    assert!(thumbs.thumbnail(ShapeKind::Vector, SVG_10X10).is_ok());
    assert!(thumbs.thumbnail(ShapeKind::Raster, SVG_10X10).is_err());

    let png = png_bytes(4, 2, [1, 2, 3, 255]);
    assert!(thumbs.thumbnail(ShapeKind::Raster, &png).is_ok());
    assert!(thumbs.thumbnail(ShapeKind::Vector, &png).is_err());
}

#[test]
fn both_kinds_produce_canvas_sized_png() {
    let opts = ThumbnailOpts {
        max_size: 32,
        ..ThumbnailOpts::default()
    };
    let thumbs = Thumbnailer::new(opts);
    for (kind, src) in [
        (ShapeKind::Raster, png_bytes(8, 3, [9, 9, 9, 255])),
        (ShapeKind::Vector, SVG_10X10.to_vec()),
    ] {
        let out = thumbs.thumbnail(kind, &src).unwrap();
        let img = image::load_from_memory(&out).unwrap();
        assert_eq!((img.width(), img.height()), (32, 32), "{kind:?}");
    }
}

#[test]
fn encode_png_round_trips_pixels() {
    let px = [10u8, 20, 30, 40, 50, 60, 70, 80];
    let bytes = encode_png(&px, 2, 1, 90).unwrap();
    let img = image::load_from_memory(&bytes).unwrap().to_rgba8();
    assert_eq!(img.as_raw().as_slice(), &px);
}

#[test]
fn encode_png_rejects_short_buffer() {
    assert!(encode_png(&[0u8; 3], 2, 2, 90).is_err());
}

#[test]
fn quality_selects_compression_effort() {
    assert!(matches!(compression_for_quality(0), CompressionType::Fast));
    assert!(matches!(compression_for_quality(50), CompressionType::Default));
    assert!(matches!(compression_for_quality(90), CompressionType::Best));
}
