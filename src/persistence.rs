//! One JSON record per processed image

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{PipelineError, PipelineResult};
use crate::text_matching::MatchResult;

/// Persisted form of a match result, keyed by the image it came from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionRecord {
    pub image_name: String,
    #[serde(flatten)]
    pub result: MatchResult,
}

impl ExtractionRecord {
    pub fn new(image_name: impl Into<String>, result: MatchResult) -> Self {
        Self {
            image_name: image_name.into(),
            result,
        }
    }
}

/// Write `record` as JSON indented by four spaces, creating parent folders
pub fn save_json(record: &ExtractionRecord, path: &Path) -> PipelineResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| PipelineError::io(parent, e))?;
    }

    let mut buffer = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
    record
        .serialize(&mut serializer)
        .map_err(|e| PipelineError::json(path, e))?;

    std::fs::write(path, buffer).map_err(|e| PipelineError::io(path, e))
}

pub fn load_json(path: &Path) -> PipelineResult<ExtractionRecord> {
    let raw = std::fs::read_to_string(path).map_err(|e| PipelineError::io(path, e))?;
    serde_json::from_str(&raw).map_err(|e| PipelineError::json(path, e))
}
