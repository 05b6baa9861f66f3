//! Fit-and-pad geometry for placing a source image on a fixed square canvas.

use crate::foundation::error::{ShapeError, ShapeResult};

/// Whether sources smaller than the canvas are scaled up to fill it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ScalePolicy {
    /// Always scale so the longer side equals the canvas size (upscales small sources).
    #[default]
    Always,
    /// Keep the source size when it already fits inside the canvas.
    ShrinkOnly,
}

/// Placement of a fitted image on a `canvas × canvas` square.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Placement {
    pub canvas: u32,
    pub fit_width: u32,
    pub fit_height: u32,
    pub offset_x: u32,
    pub offset_y: u32,
}

/// Scale `width × height` so that one side equals `max_size`, preserving the aspect ratio.
///
/// The other side is rounded to the nearest pixel and never drops below 1.
pub fn fit_to_box(width: u32, height: u32, max_size: u32, policy: ScalePolicy) -> (u32, u32) {
    if policy == ScalePolicy::ShrinkOnly && width <= max_size && height <= max_size {
        return (width, height);
    }

    let ratio = f64::from(width) / f64::from(height);
    if width > height {
        let fit_height = (f64::from(max_size) / ratio).round() as u32;
        (max_size, fit_height.clamp(1, max_size))
    } else {
        let fit_width = (f64::from(max_size) * ratio).round() as u32;
        (fit_width.clamp(1, max_size), max_size)
    }
}

/// Centering offsets for a `fit_width × fit_height` image on a `canvas` square.
pub fn center_offsets(canvas: u32, fit_width: u32, fit_height: u32) -> (u32, u32) {
    (
        canvas.saturating_sub(fit_width) / 2,
        canvas.saturating_sub(fit_height) / 2,
    )
}

/// Fit a source into a `max_size` square canvas and center it.
pub fn place(width: u32, height: u32, max_size: u32, policy: ScalePolicy) -> ShapeResult<Placement> {
    if width == 0 || height == 0 {
        return Err(ShapeError::decode(format!(
            "source has degenerate size {width}x{height}"
        )));
    }
    if max_size == 0 {
        return Err(ShapeError::config("thumbnail size must be non-zero"));
    }

    let (fit_width, fit_height) = fit_to_box(width, height, max_size, policy);
    let (offset_x, offset_y) = center_offsets(max_size, fit_width, fit_height);
    Ok(Placement {
        canvas: max_size,
        fit_width,
        fit_height,
        offset_x,
        offset_y,
    })
}

#[cfg(test)]
#[path = "../tests/unit/geometry.rs"]
mod tests;
