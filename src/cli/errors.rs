use std::path::PathBuf;

use thiserror::Error;

/// Application-specific errors for the CLI
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Cannot read parameter file {path:?}: {source}")]
    Params {
        path: PathBuf,
        #[source]
        source: rasagg::Error,
    },

    #[error("Cannot write report {path:?}: {source}")]
    Report {
        path: PathBuf,
        #[source]
        source: rasagg::Error,
    },

    #[error(transparent)]
    Aggregation(#[from] rasagg::Error),
}
