//! Crate-level error type and `Result` alias for stable, structured error handling.
//! Argument validation fails fast with `InvalidArgument`; everything the raster
//! source or sink reports is surfaced as `SourceRead` / `SinkWrite` unchanged.
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid argument: {arg}={value}")]
    InvalidArgument { arg: &'static str, value: String },

    #[error("Source read error: {0}")]
    SourceRead(String),

    #[error("Sink write error: {0}")]
    SinkWrite(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub fn invalid_argument<V: std::fmt::Display>(arg: &'static str, value: V) -> Self {
        Error::InvalidArgument {
            arg,
            value: value.to_string(),
        }
    }

    pub fn source_read<E: std::fmt::Display>(e: E) -> Self {
        Error::SourceRead(e.to_string())
    }

    pub fn sink_write<E: std::fmt::Display>(e: E) -> Self {
        Error::SinkWrite(e.to_string())
    }
}
