//! Two-stage download → transform pipeline.
//!
//! The download stage runs on the calling thread and feeds an `mpsc` channel; transform
//! workers run on scoped threads and drain it. Dropping the sender when the download queue is
//! exhausted is the completion signal, so workers block instead of polling and exit exactly when
//! both queues are empty.

use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError, mpsc};
use std::time::{Duration, Instant};

use anyhow::Context as _;

use crate::fetch::{DEFAULT_FETCH_TIMEOUT, Fetcher, HttpFetcher};
use crate::foundation::error::{ShapeError, ShapeResult};
use crate::foundation::layout::OutputLayout;
use crate::report::{DEFAULT_REPORT_BASE_URL, write_reports};
use crate::shape::{Shape, read_shapes};
use crate::transform::{ThumbnailOpts, Thumbnailer};

mod download;
mod transform;

use download::DownloadStage;
use transform::TransformStage;

/// Input list read when no path is given.
pub const DEFAULT_SHAPE_LIST: &str = "shapes.txt";

/// Options controlling a pipeline run.
#[derive(Clone, Debug)]
pub struct PipelineOpts {
    /// Working root for `original/`, `resized/` and the report files.
    pub root: PathBuf,
    /// Per-request fetch timeout.
    pub fetch_timeout: Duration,
    /// Number of transform workers draining the transform queue.
    pub transform_workers: usize,
    /// Base URL of hosted media, used by the success report.
    pub report_base_url: String,
    /// Thumbnail geometry and encoding.
    pub thumbnail: ThumbnailOpts,
}

impl Default for PipelineOpts {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,
            transform_workers: 1,
            report_base_url: DEFAULT_REPORT_BASE_URL.to_string(),
            thumbnail: ThumbnailOpts::default(),
        }
    }
}

/// Outcome of a completed run.
#[derive(Clone, Debug, Default)]
pub struct PipelineReport {
    /// Shapes ingested into the download queue.
    pub total: usize,
    /// Shapes whose thumbnail was written, in completion order.
    pub succeeded: Vec<Shape>,
    /// Shapes that failed at either stage, in completion order.
    pub failed: Vec<Shape>,
    pub elapsed: Duration,
}

impl PipelineReport {
    /// `true` when every ingested shape ended in exactly one result set.
    pub fn is_fully_accounted(&self) -> bool {
        self.succeeded.len() + self.failed.len() == self.total
    }
}

pub(crate) fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Terminal outcomes shared by both stages, plus coarse progress.
pub(crate) struct ResultSets {
    succeeded: Mutex<Vec<Shape>>,
    failed: Mutex<Vec<Shape>>,
    progress: Progress,
}

impl ResultSets {
    pub(crate) fn new(total: usize) -> Self {
        Self {
            succeeded: Mutex::new(Vec::new()),
            failed: Mutex::new(Vec::new()),
            progress: Progress::new(total),
        }
    }

    pub(crate) fn record_success(&self, shape: Shape) {
        lock(&self.succeeded).push(shape);
        self.progress.advance();
    }

    pub(crate) fn record_failure(&self, shape: Shape) {
        lock(&self.failed).push(shape);
        self.progress.advance();
    }

    fn into_parts(self) -> (Vec<Shape>, Vec<Shape>) {
        let succeeded = self
            .succeeded
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner);
        let failed = self
            .failed
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner);
        (succeeded, failed)
    }
}

/// Percentage of processed shapes. Only logs when the percentage grows, so the narrated value
/// never goes backwards even when workers finish concurrently.
struct Progress {
    total: usize,
    done: AtomicUsize,
    reported: AtomicUsize,
}

impl Progress {
    fn new(total: usize) -> Self {
        Self {
            total,
            done: AtomicUsize::new(0),
            reported: AtomicUsize::new(0),
        }
    }

    fn advance(&self) -> usize {
        let done = self.done.fetch_add(1, Ordering::Relaxed) + 1;
        let percent = percent_of(done, self.total);
        if self.reported.fetch_max(percent, Ordering::Relaxed) < percent {
            tracing::info!("progress: {percent}% ({done}/{})", self.total);
        }
        percent
    }
}

fn percent_of(done: usize, total: usize) -> usize {
    if total == 0 {
        return 100;
    }
    (done.min(total) * 100) / total
}

/// Download-and-thumbnail pipeline over a [`Fetcher`].
pub struct Pipeline<F> {
    opts: PipelineOpts,
    layout: OutputLayout,
    fetcher: F,
    thumbnailer: Thumbnailer,
}

impl Pipeline<HttpFetcher> {
    /// Pipeline fetching over HTTP(S).
    pub fn http(opts: PipelineOpts) -> ShapeResult<Self> {
        Ok(Self::new(opts, HttpFetcher::new()?))
    }
}

impl<F: Fetcher> Pipeline<F> {
    pub fn new(opts: PipelineOpts, fetcher: F) -> Self {
        let layout = OutputLayout::new(opts.root.clone());
        let thumbnailer = Thumbnailer::new(opts.thumbnail);
        Self {
            opts,
            layout,
            fetcher,
            thumbnailer,
        }
    }

    pub fn layout(&self) -> &OutputLayout {
        &self.layout
    }

    /// Run both stages to completion over `shapes`, then write the reports.
    ///
    /// Per-shape failures end up in [`PipelineReport::failed`]; an `Err` here means the run
    /// itself could not proceed (worker spawn, report write).
    #[tracing::instrument(name = "pipeline", skip_all, fields(shapes = shapes.len()))]
    pub fn run(&self, shapes: Vec<Shape>) -> ShapeResult<PipelineReport> {
        let started = Instant::now();
        let total = shapes.len();
        if total == 0 {
            tracing::info!("no shapes found");
            return Ok(PipelineReport::default());
        }
        tracing::info!("about to process {total} shapes");

        let results = ResultSets::new(total);
        let download = DownloadStage {
            fetcher: &self.fetcher,
            layout: &self.layout,
            timeout: self.opts.fetch_timeout,
        };
        let transform = TransformStage {
            thumbnailer: &self.thumbnailer,
            layout: &self.layout,
        };

        let (tx, rx) = mpsc::channel::<Shape>();
        let rx = Mutex::new(rx);
        let pending_download = VecDeque::from(shapes);

        std::thread::scope(|scope| -> ShapeResult<()> {
            let tx = tx;
            let workers = self.opts.transform_workers.max(1);
            let mut handles = Vec::with_capacity(workers);
            for i in 0..workers {
                let handle = std::thread::Builder::new()
                    .name(format!("transform-{i}"))
                    .spawn_scoped(scope, || transform.run(&rx, &results))
                    .context("spawn transform worker")?;
                handles.push(handle);
            }

            download.run(pending_download, tx, &results);

            for handle in handles {
                handle
                    .join()
                    .map_err(|_| ShapeError::Other(anyhow::anyhow!("transform worker panicked")))?;
            }
            Ok(())
        })?;

        let (succeeded, failed) = results.into_parts();
        let report = PipelineReport {
            total,
            succeeded,
            failed,
            elapsed: started.elapsed(),
        };

        write_reports(
            &self.layout,
            &report.succeeded,
            &report.failed,
            &self.opts.report_base_url,
        )?;

        tracing::info!(
            "===completed with {} errors and elapsed time: {:.3} seconds===",
            report.failed.len(),
            report.elapsed.as_secs_f64()
        );
        Ok(report)
    }

    /// Read an input list and run it. An unreadable list ends the run with an empty report.
    pub fn run_list(&self, list: &Path) -> ShapeResult<PipelineReport> {
        match read_shapes(list) {
            Ok(shapes) => self.run(shapes),
            Err(e) => {
                tracing::warn!("failed to read from path: {} ({e})", list.display());
                Ok(PipelineReport::default())
            }
        }
    }
}

/// Run the HTTP pipeline over `list`, or over `shapes.txt` in the working root when absent.
pub fn run_from_list(list: Option<&Path>, opts: PipelineOpts) -> ShapeResult<PipelineReport> {
    let path = match list {
        Some(p) => p.to_path_buf(),
        None => {
            let default = opts.root.join(DEFAULT_SHAPE_LIST);
            if !default.is_file() {
                tracing::warn!(
                    "please put a file named \"{DEFAULT_SHAPE_LIST}\" in the working directory"
                );
                return Ok(PipelineReport::default());
            }
            default
        }
    };
    Pipeline::http(opts)?.run_list(&path)
}

#[cfg(test)]
#[path = "../tests/unit/pipeline.rs"]
mod tests;
