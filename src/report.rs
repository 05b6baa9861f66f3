//! Failure and success reports written after a run.

use std::path::Path;

use crate::foundation::error::ShapeResult;
use crate::foundation::layout::{OutputLayout, write_file};
use crate::shape::Shape;

/// Default base URL for hosted shape media referenced by the success report.
pub const DEFAULT_REPORT_BASE_URL: &str = "https://media-shape.bybutter.com";

/// One `"<id>","<url>"` line per failed shape.
pub fn failure_lines(failed: &[Shape]) -> Vec<String> {
    failed.iter().map(Shape::to_string).collect()
}

/// One update statement per succeeded shape.
pub fn success_lines(succeeded: &[Shape], base_url: &str) -> Vec<String> {
    succeeded
        .iter()
        .map(|s| s.update_statement(base_url))
        .collect()
}

/// Write `error.txt` and `succeeded.txt`, skipping whichever would be empty.
pub fn write_reports(
    layout: &OutputLayout,
    succeeded: &[Shape],
    failed: &[Shape],
    base_url: &str,
) -> ShapeResult<()> {
    write_lines(&layout.error_report_path(), &failure_lines(failed))?;
    write_lines(
        &layout.success_report_path(),
        &success_lines(succeeded, base_url),
    )?;
    Ok(())
}

fn write_lines(path: &Path, lines: &[String]) -> ShapeResult<()> {
    if lines.is_empty() {
        return Ok(());
    }
    let mut text = lines.join("\n");
    text.push('\n');
    write_file(path, text.as_bytes())?;
    tracing::info!(path = %path.display(), lines = lines.len(), "wrote report");
    Ok(())
}
