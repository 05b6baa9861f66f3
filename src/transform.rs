//! Source-to-thumbnail transforms.
//!
//! Both source kinds go through the same contract: raw source bytes in, encoded PNG bytes out,
//! with the fitted image centered on a `max_size × max_size` transparent canvas.

use std::io::Cursor;

use anyhow::Context as _;
use image::ImageEncoder as _;
use image::codecs::png::{CompressionType, FilterType as PngFilter, PngEncoder};
use image::imageops::FilterType;

use crate::foundation::error::{ShapeResult, decode};
use crate::geometry::ScalePolicy;
use crate::shape::ShapeKind;

pub(crate) mod raster;
pub(crate) mod vector;

pub use raster::RasterTransformer;
pub use vector::VectorTransformer;

/// Default thumbnail side length in pixels.
pub const DEFAULT_MAX_SIZE: u32 = 192;

/// Options shared by the raster and vector transforms.
#[derive(Clone, Copy, Debug)]
pub struct ThumbnailOpts {
    /// Side length of the square output canvas.
    pub max_size: u32,
    /// Whether sources smaller than the canvas are upscaled.
    pub scale_policy: ScalePolicy,
    /// Resampling filter for raster sources.
    pub resize_filter: FilterType,
    /// Encoder quality in `0..=100`. PNG is lossless, so this selects the compression effort.
    pub png_quality: u8,
    /// Paint applied when drawing vector sources (straight RGBA8). Only its alpha modulates the
    /// rendered picture.
    pub vector_fill: [u8; 4],
}

impl Default for ThumbnailOpts {
    fn default() -> Self {
        Self {
            max_size: DEFAULT_MAX_SIZE,
            scale_policy: ScalePolicy::Always,
            resize_filter: FilterType::Triangle,
            png_quality: 90,
            vector_fill: [128, 128, 128, 255],
        }
    }
}

/// Turn source bytes of one kind into an encoded thumbnail.
pub trait Transform: Send + Sync {
    fn transform(&self, source: &[u8]) -> ShapeResult<Vec<u8>>;
}

/// Dispatches each shape kind to its transform.
#[derive(Clone, Debug)]
pub struct Thumbnailer {
    raster: RasterTransformer,
    vector: VectorTransformer,
}

impl Thumbnailer {
    pub fn new(opts: ThumbnailOpts) -> Self {
        Self {
            raster: RasterTransformer::new(opts),
            vector: VectorTransformer::new(opts),
        }
    }

    pub fn transformer_for(&self, kind: ShapeKind) -> &dyn Transform {
        match kind {
            ShapeKind::Raster => &self.raster,
            ShapeKind::Vector => &self.vector,
        }
    }

    pub fn thumbnail(&self, kind: ShapeKind, source: &[u8]) -> ShapeResult<Vec<u8>> {
        self.transformer_for(kind).transform(source)
    }
}

impl Default for Thumbnailer {
    fn default() -> Self {
        Self::new(ThumbnailOpts::default())
    }
}

fn compression_for_quality(quality: u8) -> CompressionType {
    match quality {
        0..=33 => CompressionType::Fast,
        34..=89 => CompressionType::Default,
        _ => CompressionType::Best,
    }
}

/// Encode straight-alpha RGBA8 pixels as PNG.
pub(crate) fn encode_png(rgba: &[u8], width: u32, height: u32, quality: u8) -> ShapeResult<Vec<u8>> {
    let expected = (width as usize) * (height as usize) * 4;
    if rgba.len() != expected {
        return Err(crate::ShapeError::decode(format!(
            "pixel buffer is {} bytes, expected {expected} for {width}x{height} rgba8",
            rgba.len()
        )));
    }

    let mut buf = Vec::new();
    let encoder = PngEncoder::new_with_quality(
        Cursor::new(&mut buf),
        compression_for_quality(quality),
        PngFilter::Adaptive,
    );
    encoder
        .write_image(rgba, width, height, image::ExtendedColorType::Rgba8)
        .with_context(|| format!("encode {width}x{height} png"))
        .map_err(decode)?;
    Ok(buf)
}

#[cfg(test)]
#[path = "../tests/unit/transform.rs"]
mod tests;
