use std::path::PathBuf;
use thiserror::Error;

use crate::ocr::OcrError;

/// A specialized `Result` type for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;

/// The error type for everything around the matcher: images, files, OCR.
///
/// The matcher itself never fails; these come from the collaborators that
/// feed it and store its results.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Could not load image {path:?}: {source}")]
    ImageLoad {
        path: PathBuf,
        source: image::ImageError,
    },

    #[error("Could not save image {path:?}: {source}")]
    ImageSave {
        path: PathBuf,
        source: image::ImageError,
    },

    #[error("I/O error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid JSON in {path:?}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("OCR failed: {source}")]
    Ocr {
        #[from]
        source: OcrError,
    },

    #[error("Could not start the async runtime: {source}")]
    Runtime { source: std::io::Error },

    #[error("Folder does not exist: {path:?}")]
    MissingDirectory { path: PathBuf },

    #[error("Task failed to complete: {source}")]
    JoinError {
        #[from]
        source: tokio::task::JoinError,
    },
}

impl PipelineError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        PipelineError::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn json(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        PipelineError::Json {
            path: path.into(),
            source,
        }
    }
}
