pub type ShapeResult<T> = Result<T, ShapeError>;

/// Failure taxonomy for a single shape moving through the pipeline.
///
/// Malformed input lines are not errors; [`Shape::from_line`](crate::Shape::from_line) returns
/// `None` for them instead.
#[derive(thiserror::Error, Debug)]
pub enum ShapeError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("persistence error: {0}")]
    Persistence(String),

    #[error("decode error: {0}")]
    Decode(String),

    #[error("config error: {0}")]
    Config(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ShapeError {
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    pub fn persistence(msg: impl Into<String>) -> Self {
        Self::Persistence(msg.into())
    }

    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

/// Wrap an [`anyhow::Error`] carrying I/O context as a persistence failure.
pub(crate) fn persistence(err: anyhow::Error) -> ShapeError {
    ShapeError::Persistence(format!("{err:#}"))
}

/// Wrap an [`anyhow::Error`] carrying codec context as a decode failure.
pub(crate) fn decode(err: anyhow::Error) -> ShapeError {
    ShapeError::Decode(format!("{err:#}"))
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
