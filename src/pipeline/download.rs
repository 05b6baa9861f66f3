use std::collections::VecDeque;
use std::sync::mpsc::Sender;
use std::time::Duration;

use crate::fetch::Fetcher;
use crate::foundation::error::ShapeResult;
use crate::foundation::layout::{OutputLayout, write_file};
use crate::pipeline::ResultSets;
use crate::shape::Shape;

/// Fetches source bytes into `original/` and feeds the transform queue.
pub(crate) struct DownloadStage<'a, F: ?Sized> {
    pub(crate) fetcher: &'a F,
    pub(crate) layout: &'a OutputLayout,
    pub(crate) timeout: Duration,
}

impl<F: Fetcher + ?Sized> DownloadStage<'_, F> {
    /// Make the shape's source available locally, fetching it only when no cached copy exists.
    pub(crate) fn download(&self, shape: &mut Shape) -> ShapeResult<()> {
        let path = self.layout.original_path(shape);
        if path.is_file() {
            tracing::info!("already downloaded: {}", shape.source_url());
        } else {
            tracing::info!("about to download: {}", shape.source_url());
            let bytes = self.fetcher.fetch(shape.source_url(), self.timeout)?;
            if let Err(e) = write_file(&path, &bytes) {
                // A partial file would otherwise count as cached on the next run.
                if path.exists()
                    && let Err(rm) = std::fs::remove_file(&path)
                {
                    tracing::warn!(
                        "failed to remove partial download: {}, error: {rm}",
                        path.display()
                    );
                }
                return Err(e);
            }
        }
        shape.set_local_source(path);
        Ok(())
    }

    /// Drain `pending` in FIFO order. Dropping `pending_transform` on return tells the
    /// transform workers that no more shapes will arrive.
    #[tracing::instrument(name = "download", skip_all, fields(shapes = pending.len()))]
    pub(crate) fn run(
        &self,
        mut pending: VecDeque<Shape>,
        pending_transform: Sender<Shape>,
        results: &ResultSets,
    ) {
        while let Some(mut shape) = pending.pop_front() {
            if let Err(e) = self.download(&mut shape) {
                tracing::warn!("failed to download: {}, error: {e}", shape.source_url());
                results.record_failure(shape);
                continue;
            }
            if let Err(unsent) = pending_transform.send(shape) {
                tracing::warn!(
                    "failed to queue: {}, error: transform workers have stopped",
                    unsent.0.source_url()
                );
                results.record_failure(unsent.0);
            }
        }
    }
}
