//! Engine replaying detections recorded by an earlier OCR run
//!
//! For `label.png` the recording is `label.png.ocr.json` in the same folder:
//! a JSON list of `{"bbox": [[x, y], ...], "text": "...", "confidence": 0.9}`.

use std::path::{Path, PathBuf};

use super::engine::{OcrEngine, OcrRequest};
use super::error::OcrError;
use crate::text_matching::Detection;

pub const DEFAULT_RECORDING_SUFFIX: &str = ".ocr.json";

#[derive(Debug, Clone)]
pub struct ReplayOcrEngine {
    suffix: String,
}

impl ReplayOcrEngine {
    pub fn new(suffix: impl Into<String>) -> Self {
        Self {
            suffix: suffix.into(),
        }
    }

    /// Sidecar file holding the detections for `source`
    pub fn recording_path(&self, source: &Path) -> PathBuf {
        let mut name = source
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(&self.suffix);
        source.with_file_name(name)
    }
}

impl Default for ReplayOcrEngine {
    fn default() -> Self {
        Self::new(DEFAULT_RECORDING_SUFFIX)
    }
}

impl OcrEngine for ReplayOcrEngine {
    fn name(&self) -> &'static str {
        "replay"
    }

    fn recognize(&self, request: &OcrRequest<'_>) -> Result<Vec<Detection>, OcrError> {
        let source = request
            .source()
            .ok_or(OcrError::MissingSource {
                engine: self.name(),
            })?;
        let path = self.recording_path(source);

        let raw = std::fs::read_to_string(&path).map_err(|source| OcrError::MissingRecording {
            path: path.clone(),
            source,
        })?;
        let detections: Vec<Detection> =
            serde_json::from_str(&raw).map_err(|source| OcrError::MalformedRecording {
                path: path.clone(),
                source,
            })?;

        log::debug!(
            "Replayed {} detections from {}",
            detections.len(),
            path.display()
        );
        Ok(detections)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text_matching::point;
    use image::GrayImage;

    #[test]
    fn test_recording_path() {
        let engine = ReplayOcrEngine::default();
        assert_eq!(
            engine.recording_path(Path::new("labels/a.png")),
            PathBuf::from("labels/a.png.ocr.json")
        );
    }

    #[test]
    fn test_replays_recorded_detections() {
        let dir = tempfile::tempdir().unwrap();
        let image_path = dir.path().join("label.jpg");
        std::fs::write(
            dir.path().join("label.jpg.ocr.json"),
            r#"[{"bbox": [[0, 0], [8, 0], [8, 4], [0, 4]], "text": "AB_1_CD", "confidence": 0.91},
                {"text": "noise"}]"#,
        )
        .unwrap();

        let image = GrayImage::new(4, 4);
        let engine = ReplayOcrEngine::default();
        let detections = engine
            .recognize(&OcrRequest::new(&image).with_source(&image_path))
            .unwrap();

        assert_eq!(detections.len(), 2);
        assert_eq!(detections[0].text, "AB_1_CD");
        assert_eq!(detections[0].confidence, Some(0.91));
        assert_eq!(detections[0].bounding_region[2], point(8, 4));
        assert_eq!(detections[1].confidence, None);
    }

    #[test]
    fn test_missing_source_path() {
        let image = GrayImage::new(4, 4);
        let err = ReplayOcrEngine::default()
            .recognize(&OcrRequest::new(&image))
            .unwrap_err();
        assert!(matches!(err, OcrError::MissingSource { engine: "replay" }));
    }

    #[test]
    fn test_missing_and_malformed_recordings() {
        let dir = tempfile::tempdir().unwrap();
        let image = GrayImage::new(4, 4);
        let engine = ReplayOcrEngine::default();

        let absent = dir.path().join("absent.png");
        let err = engine
            .recognize(&OcrRequest::new(&image).with_source(&absent))
            .unwrap_err();
        assert!(matches!(err, OcrError::MissingRecording { .. }));

        let broken = dir.path().join("broken.png");
        std::fs::write(dir.path().join("broken.png.ocr.json"), "{not json").unwrap();
        let err = engine
            .recognize(&OcrRequest::new(&image).with_source(&broken))
            .unwrap_err();
        assert!(matches!(err, OcrError::MalformedRecording { .. }));
    }
}
