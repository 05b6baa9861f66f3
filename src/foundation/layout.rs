use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::foundation::error::{ShapeResult, persistence};
use crate::shape::Shape;

const ORIGINAL_DIR: &str = "original";
const RESIZED_DIR: &str = "resized";
const ERROR_REPORT: &str = "error.txt";
const SUCCESS_REPORT: &str = "succeeded.txt";

/// Filesystem layout produced by a pipeline run, rooted at a working directory.
///
/// Source bytes and thumbnails live in separate directories so the download and transform
/// stages never touch the same path for one shape.
#[derive(Clone, Debug)]
pub struct OutputLayout {
    root: PathBuf,
}

impl OutputLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// `original/<id>.<ext>`
    pub fn original_path(&self, shape: &Shape) -> PathBuf {
        self.root
            .join(ORIGINAL_DIR)
            .join(format!("{}.{}", shape.id(), shape.kind().extension()))
    }

    /// `resized/<id>.png`
    pub fn resized_path(&self, shape: &Shape) -> PathBuf {
        self.root
            .join(RESIZED_DIR)
            .join(format!("{}.png", shape.id()))
    }

    pub fn error_report_path(&self) -> PathBuf {
        self.root.join(ERROR_REPORT)
    }

    pub fn success_report_path(&self) -> PathBuf {
        self.root.join(SUCCESS_REPORT)
    }
}

/// Ensure the parent directory of `path` exists.
pub fn ensure_parent_dir(path: &Path) -> ShapeResult<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory '{}'", parent.display()))
            .map_err(persistence)?;
    }
    Ok(())
}

/// Write `bytes` to `path`, creating parent directories on demand.
pub fn write_file(path: &Path, bytes: &[u8]) -> ShapeResult<()> {
    ensure_parent_dir(path)?;
    std::fs::write(path, bytes)
        .with_context(|| format!("write '{}'", path.display()))
        .map_err(persistence)
}
