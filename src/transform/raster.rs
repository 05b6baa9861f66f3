use anyhow::Context as _;
use image::{DynamicImage, RgbaImage};

use crate::foundation::error::{ShapeResult, decode};
use crate::geometry::place;
use crate::transform::{ThumbnailOpts, Transform, encode_png};

/// Bitmap sources: decode, normalize to RGBA8, resample to fit, pad onto the canvas.
#[derive(Clone, Debug)]
pub struct RasterTransformer {
    opts: ThumbnailOpts,
}

impl RasterTransformer {
    pub fn new(opts: ThumbnailOpts) -> Self {
        Self { opts }
    }

    /// Produce the padded canvas without encoding it.
    pub fn render(&self, source: &[u8]) -> ShapeResult<RgbaImage> {
        let dyn_img = image::load_from_memory(source)
            .context("decode image from memory")
            .map_err(decode)?;
        let rgba = match dyn_img {
            DynamicImage::ImageRgba8(buf) => buf,
            other => {
                tracing::debug!(color = ?other.color(), "converting source to rgba8");
                other.to_rgba8()
            }
        };

        let (width, height) = rgba.dimensions();
        let placement = place(width, height, self.opts.max_size, self.opts.scale_policy)?;

        let fitted = if (placement.fit_width, placement.fit_height) == (width, height) {
            rgba
        } else {
            image::imageops::resize(
                &rgba,
                placement.fit_width,
                placement.fit_height,
                self.opts.resize_filter,
            )
        };

        let mut canvas = RgbaImage::new(placement.canvas, placement.canvas);
        image::imageops::replace(
            &mut canvas,
            &fitted,
            i64::from(placement.offset_x),
            i64::from(placement.offset_y),
        );
        Ok(canvas)
    }
}

impl Transform for RasterTransformer {
    fn transform(&self, source: &[u8]) -> ShapeResult<Vec<u8>> {
        let canvas = self.render(source)?;
        encode_png(
            canvas.as_raw(),
            canvas.width(),
            canvas.height(),
            self.opts.png_quality,
        )
    }
}

#[cfg(test)]
#[path = "../../tests/unit/transform/raster.rs"]
mod tests;
