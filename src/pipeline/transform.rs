use std::path::PathBuf;
use std::sync::Mutex;
use std::sync::mpsc::Receiver;

use anyhow::Context as _;

use crate::foundation::error::{ShapeError, ShapeResult, persistence};
use crate::foundation::layout::{OutputLayout, write_file};
use crate::pipeline::{ResultSets, lock};
use crate::shape::Shape;
use crate::transform::Thumbnailer;

/// Turns downloaded sources into thumbnails under `resized/`.
pub(crate) struct TransformStage<'a> {
    pub(crate) thumbnailer: &'a Thumbnailer,
    pub(crate) layout: &'a OutputLayout,
}

impl TransformStage<'_> {
    pub(crate) fn transform(&self, shape: &Shape) -> ShapeResult<PathBuf> {
        let source = shape.local_source().ok_or_else(|| {
            ShapeError::persistence(format!("shape '{}' has no local source", shape.id()))
        })?;
        let bytes = std::fs::read(source)
            .with_context(|| format!("read '{}'", source.display()))
            .map_err(persistence)?;

        let png = self.thumbnailer.thumbnail(shape.kind(), &bytes)?;

        let out = self.layout.resized_path(shape);
        write_file(&out, &png)?;
        Ok(out)
    }

    /// Drain the shared queue until the download stage has hung up and nothing is left.
    ///
    /// `recv` blocks while the queue is empty, and only fails once every sender is gone and the
    /// queue is drained.
    #[tracing::instrument(name = "transform", skip_all)]
    pub(crate) fn run(&self, pending: &Mutex<Receiver<Shape>>, results: &ResultSets) {
        loop {
            let next = lock(pending).recv();
            let Ok(shape) = next else {
                break;
            };

            tracing::info!("about to process: {}", shape.source_url());

            match self.transform(&shape) {
                Ok(out) => {
                    tracing::debug!(id = shape.id(), out = %out.display(), "thumbnail written");
                    results.record_success(shape);
                }
                Err(e) => {
                    tracing::warn!("failed to process: {}, error: {e}", shape.source_url());
                    results.record_failure(shape);
                }
            }
        }
    }
}
