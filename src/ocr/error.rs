use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum OcrError {
    #[error("the {engine} engine needs the source image path")]
    MissingSource { engine: &'static str },
    #[error("no recorded detections at {path:?}: {source}")]
    MissingRecording {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("recorded detections in {path:?} are malformed: {source}")]
    MalformedRecording {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("backend error: {message}")]
    Backend { message: String },
}

impl OcrError {
    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend {
            message: message.into(),
        }
    }
}
