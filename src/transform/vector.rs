use std::sync::Arc;

use anyhow::Context as _;
use kurbo::Affine;
use resvg::tiny_skia;

use crate::foundation::error::{ShapeError, ShapeResult, decode};
use crate::geometry::{Placement, place};
use crate::transform::{ThumbnailOpts, Transform, encode_png};

/// SVG sources: parse, scale uniformly to fit, render centered onto the canvas.
#[derive(Clone, Debug)]
pub struct VectorTransformer {
    opts: ThumbnailOpts,
    fontdb: Arc<usvg::fontdb::Database>,
}

impl VectorTransformer {
    /// Loads the system fonts once; every parse shares the same database.
    pub fn new(opts: ThumbnailOpts) -> Self {
        Self {
            opts,
            fontdb: build_fontdb(),
        }
    }

    /// Render into a premultiplied pixmap without encoding it.
    pub fn render(&self, source: &[u8]) -> ShapeResult<tiny_skia::Pixmap> {
        let parse_opts = usvg::Options {
            fontdb: Arc::clone(&self.fontdb),
            ..Default::default()
        };
        let tree = usvg::Tree::from_data(source, &parse_opts)
            .context("parse svg tree")
            .map_err(decode)?;

        let (bbox_w, bbox_h) = svg_box(&tree)?;
        let placement = place(bbox_w, bbox_h, self.opts.max_size, self.opts.scale_policy)?;
        let xform = fit_transform(&placement, tree.size().width());

        let mut pixmap = tiny_skia::Pixmap::new(placement.canvas, placement.canvas)
            .ok_or_else(|| ShapeError::decode("failed to allocate svg pixmap"))?;
        resvg::render(&tree, affine_to_skia(xform), &mut pixmap.as_mut());
        apply_paint_alpha(pixmap.data_mut(), self.opts.vector_fill[3]);
        Ok(pixmap)
    }
}

impl Transform for VectorTransformer {
    fn transform(&self, source: &[u8]) -> ShapeResult<Vec<u8>> {
        let pixmap = self.render(source)?;
        let rgba = demultiply(&pixmap);
        encode_png(
            &rgba,
            pixmap.width(),
            pixmap.height(),
            self.opts.png_quality,
        )
    }
}

fn build_fontdb() -> Arc<usvg::fontdb::Database> {
    let mut db = usvg::fontdb::Database::new();
    db.load_system_fonts();
    tracing::debug!(faces = db.len(), "loaded svg fonts");
    Arc::new(db)
}

/// Intrinsic size of the picture, rounded to whole pixels for the fit computation.
fn svg_box(tree: &usvg::Tree) -> ShapeResult<(u32, u32)> {
    fn to_px(v: f32) -> ShapeResult<u32> {
        if !v.is_finite() || v <= 0.0 {
            return Err(ShapeError::decode("svg has invalid width/height"));
        }
        Ok((v.round() as u32).max(1))
    }

    let size = tree.size();
    Ok((to_px(size.width())?, to_px(size.height())?))
}

/// Uniform scale to the fitted width, then translate to the centering offsets.
///
/// The fit preserves the aspect ratio, so one scale factor covers both axes.
fn fit_transform(placement: &Placement, bbox_width: f32) -> Affine {
    let scale = f64::from(placement.fit_width) / f64::from(bbox_width);
    Affine::translate((
        f64::from(placement.offset_x),
        f64::from(placement.offset_y),
    )) * Affine::scale(scale)
}

fn affine_to_skia(a: Affine) -> tiny_skia::Transform {
    let [sx, ky, kx, sy, tx, ty] = a.as_coeffs();
    tiny_skia::Transform::from_row(
        sx as f32, ky as f32, kx as f32, sy as f32, tx as f32, ty as f32,
    )
}

// A layer paint on a picture draw only contributes its alpha.
fn apply_paint_alpha(premul: &mut [u8], alpha: u8) {
    if alpha == 255 {
        return;
    }
    let a = u16::from(alpha);
    for c in premul.iter_mut() {
        *c = ((u16::from(*c) * a + 127) / 255) as u8;
    }
}

fn demultiply(pixmap: &tiny_skia::Pixmap) -> Vec<u8> {
    let mut out = Vec::with_capacity(pixmap.data().len());
    for px in pixmap.pixels() {
        let c = px.demultiply();
        out.extend_from_slice(&[c.red(), c.green(), c.blue(), c.alpha()]);
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/transform/vector.rs"]
mod tests;
