//! Shapethumb fetches a list of shape images and renders a fixed-size square PNG thumbnail for
//! each one.
//!
//! - Parse an input list into [`Shape`]s
//! - Run a [`Pipeline`]: one download stage feeding transform workers through a channel
//! - Inspect the [`PipelineReport`]; `error.txt` and `succeeded.txt` are written alongside
//!
//! Raster sources are decoded and resampled with `image`; SVG sources are rendered with
//! `resvg`. Both are fitted into the canvas with the same [`geometry`] and centered.
#![forbid(unsafe_code)]

mod foundation;

pub mod fetch;
pub mod geometry;
pub mod pipeline;
pub mod report;
pub mod shape;
pub mod transform;

pub use crate::fetch::{DEFAULT_FETCH_TIMEOUT, Fetcher, HttpFetcher};
pub use crate::foundation::error::{ShapeError, ShapeResult};
pub use crate::foundation::layout::OutputLayout;
pub use crate::geometry::{Placement, ScalePolicy, fit_to_box, place};
pub use crate::pipeline::{
    DEFAULT_SHAPE_LIST, Pipeline, PipelineOpts, PipelineReport, run_from_list,
};
pub use crate::shape::{Shape, ShapeKind, parse_shapes, read_shapes};
pub use crate::transform::{
    DEFAULT_MAX_SIZE, RasterTransformer, ThumbnailOpts, Thumbnailer, Transform,
    VectorTransformer,
};
