use std::fmt;
use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::foundation::error::{ShapeError, ShapeResult};

/// Source type of a shape, classified once from its URL at parse time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    /// Bitmap source (PNG, JPEG, ...), decoded and resampled.
    Raster,
    /// SVG source, parsed and rendered.
    Vector,
}

impl ShapeKind {
    /// Classify a source URL. Any URL containing `.svg` is treated as a vector source.
    pub fn classify(url: &str) -> Self {
        if url.contains(".svg") {
            Self::Vector
        } else {
            Self::Raster
        }
    }

    /// File extension used for the cached source bytes.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Raster => "png",
            Self::Vector => "svg",
        }
    }
}

/// One input record: an identifier plus the URL of the image to thumbnail.
///
/// Equality and hashing consider only `(id, source_url)`.
#[derive(Clone, Debug)]
pub struct Shape {
    id: String,
    source_url: String,
    kind: ShapeKind,
    local_source: Option<PathBuf>,
}

impl Shape {
    /// Build a shape from already-split fields.
    pub fn new(id: impl Into<String>, source_url: impl Into<String>) -> ShapeResult<Self> {
        let id = id.into();
        let source_url = source_url.into();
        validate_id(&id)?;
        if source_url.is_empty() {
            return Err(ShapeError::config("shape url must be non-empty"));
        }
        let kind = ShapeKind::classify(&source_url);
        Ok(Self {
            id,
            source_url,
            kind,
            local_source: None,
        })
    }

    /// Parse a `"<id>","<url>"` record.
    ///
    /// Returns `None` for lines that do not split into exactly two comma-separated fields, or
    /// whose fields are empty once quotes are stripped.
    pub fn from_line(line: &str) -> Option<Self> {
        let mut fields = line.split(',');
        let (Some(id), Some(url), None) = (fields.next(), fields.next(), fields.next()) else {
            return None;
        };
        Self::new(strip_field(id), strip_field(url)).ok()
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn source_url(&self) -> &str {
        &self.source_url
    }

    pub fn kind(&self) -> ShapeKind {
        self.kind
    }

    /// Local copy of the source bytes, set once the download stage has persisted them.
    pub fn local_source(&self) -> Option<&Path> {
        self.local_source.as_deref()
    }

    pub(crate) fn set_local_source(&mut self, path: PathBuf) {
        self.local_source = Some(path);
    }

    /// Storage-location update statement for the hosted copy of this shape.
    pub fn update_statement(&self, base_url: &str) -> String {
        format!(
            "update `butter_icon` SET `thumbtail` = {}/{}.{} WHERE `icon_id` = {}",
            base_url.trim_end_matches('/'),
            self.id,
            self.kind.extension(),
            self.id
        )
    }
}

impl PartialEq for Shape {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && self.source_url == other.source_url
    }
}

impl Eq for Shape {}

impl Hash for Shape {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
        self.source_url.hash(state);
    }
}

/// Round-trippable `"<id>","<url>"` form, as used in the failure report.
impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{}\",\"{}\"", self.id, self.source_url)
    }
}

/// Parse every line of `text`, skipping lines that do not form a shape.
pub fn parse_shapes(text: &str) -> Vec<Shape> {
    text.lines().filter_map(Shape::from_line).collect()
}

/// Read and parse an input list file.
pub fn read_shapes(path: &Path) -> ShapeResult<Vec<Shape>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("read shape list '{}'", path.display()))
        .map_err(|e| ShapeError::config(format!("{e:#}")))?;
    Ok(parse_shapes(&text))
}

fn strip_field(field: &str) -> String {
    field.replace('"', "").trim().to_string()
}

// Ids become file stems under `original/` and `resized/`.
fn validate_id(id: &str) -> ShapeResult<()> {
    if id.is_empty() {
        return Err(ShapeError::config("shape id must be non-empty"));
    }
    if id == "." || id == ".." || id.contains(['/', '\\']) {
        return Err(ShapeError::config(format!(
            "shape id '{id}' is not a valid file name"
        )));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../tests/unit/shape.rs"]
mod tests;
