/// OCR collaborator seam
///
/// Engines produce detections from a preprocessed image; the matcher only
/// ever sees the detections.
mod engine;
mod error;
mod replay;

pub use engine::{NoopOcrEngine, OcrEngine, OcrRequest};
pub use error::OcrError;
pub use replay::{DEFAULT_RECORDING_SUFFIX, ReplayOcrEngine};
