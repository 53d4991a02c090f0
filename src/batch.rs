//! Batch extraction over a folder of label images
//!
//! Each image is independent: preprocessing, OCR and matching run on
//! blocking workers, a bounded number at a time. A failing image is
//! reported and the run carries on.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use crate::config::{BatchConfig, PipelineConfig};
use crate::error::{PipelineError, PipelineResult};
use crate::highlight::draw_highlight;
use crate::ocr::{OcrEngine, OcrRequest};
use crate::persistence::{ExtractionRecord, save_json};
use crate::preprocess::preprocess_image;
use crate::text_matching::PatternMatcher;

/// What was produced for one image
#[derive(Debug, Clone, PartialEq)]
pub struct ImageOutcome {
    pub image_name: String,
    pub json_path: PathBuf,
    pub screenshot_path: PathBuf,
    pub target_line: Option<String>,
    pub confidence: f64,
}

#[derive(Debug, Default)]
pub struct BatchReport {
    pub processed: Vec<ImageOutcome>,
    pub failed: Vec<(PathBuf, PipelineError)>,
}

impl BatchReport {
    pub fn total(&self) -> usize {
        self.processed.len() + self.failed.len()
    }
}

/// Image files in `folder` with one of `extensions` (case-insensitive), sorted
pub fn list_images(folder: &Path, extensions: &[String]) -> PipelineResult<Vec<PathBuf>> {
    if !folder.is_dir() {
        return Err(PipelineError::MissingDirectory {
            path: folder.to_path_buf(),
        });
    }

    let entries = std::fs::read_dir(folder).map_err(|e| PipelineError::io(folder, e))?;
    let mut paths: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_file())
        .filter(|path| {
            path.extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| {
                    extensions
                        .iter()
                        .any(|allowed| allowed.eq_ignore_ascii_case(ext))
                })
        })
        .collect();
    paths.sort();
    Ok(paths)
}

/// Run the whole pipeline on one image and write its JSON record and screenshot
pub fn process_image(
    path: &Path,
    engine: &dyn OcrEngine,
    matcher: &PatternMatcher,
    config: &PipelineConfig,
) -> PipelineResult<ImageOutcome> {
    let image_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    log::info!("Processing: {image_name}");

    let prepared = preprocess_image(path, &config.preprocess)?;
    let detections = engine.recognize(&OcrRequest::new(&prepared.processed).with_source(path))?;
    log::debug!(
        "{} returned {} detections for {image_name}",
        engine.name(),
        detections.len()
    );

    let result = matcher.extract_target_from_ocr(detections);
    let highlighted = draw_highlight(
        &prepared.original,
        result.target_line.as_deref(),
        &result.all_lines,
    );

    let outcome = ImageOutcome {
        image_name: image_name.clone(),
        json_path: config.batch.json_out.join(format!("{image_name}.json")),
        screenshot_path: config.batch.screenshot_out.join(&image_name),
        target_line: result.target_line.clone(),
        confidence: result.confidence,
    };

    save_json(&ExtractionRecord::new(image_name, result), &outcome.json_path)?;
    highlighted
        .save(&outcome.screenshot_path)
        .map_err(|source| PipelineError::ImageSave {
            path: outcome.screenshot_path.clone(),
            source,
        })?;

    Ok(outcome)
}

async fn create_output_dirs(batch: &BatchConfig) -> PipelineResult<()> {
    for dir in [&batch.json_out, &batch.screenshot_out] {
        tokio::fs::create_dir_all(dir)
            .await
            .map_err(|e| PipelineError::io(dir, e))?;
    }
    Ok(())
}

/// Process every image of `config.batch.input_dir`
///
/// Fails only when the input folder cannot be listed or the output folders
/// cannot be created; per-image errors, worker panics included, end up in
/// [`BatchReport::failed`].
pub async fn process_dataset(
    config: PipelineConfig,
    engine: Arc<dyn OcrEngine>,
) -> PipelineResult<BatchReport> {
    let images = list_images(&config.batch.input_dir, &config.batch.extensions)?;
    create_output_dirs(&config.batch).await?;

    log::info!(
        "Found {} images to process (engine={}, jobs={})",
        images.len(),
        engine.name(),
        config.batch.max_concurrency
    );

    let limit = Arc::new(Semaphore::new(config.batch.max_concurrency.max(1)));
    let matcher = Arc::new(PatternMatcher::new(config.matcher.clone()));
    let config = Arc::new(config);
    let mut tasks = JoinSet::new();
    let mut in_flight = HashMap::new();

    for path in images {
        let Ok(permit) = limit.clone().acquire_owned().await else {
            break;
        };
        let engine = engine.clone();
        let matcher = matcher.clone();
        let config = config.clone();
        let task_path = path.clone();
        let handle = tasks.spawn_blocking(move || {
            let _permit = permit;
            process_image(&task_path, engine.as_ref(), &matcher, &config)
        });
        in_flight.insert(handle.id(), path);
    }

    let mut report = BatchReport::default();
    while let Some(joined) = tasks.join_next_with_id().await {
        let (path, outcome) = match joined {
            Ok((id, outcome)) => (in_flight.remove(&id).unwrap_or_default(), outcome),
            Err(e) => (in_flight.remove(&e.id()).unwrap_or_default(), Err(e.into())),
        };
        match outcome {
            Ok(outcome) => {
                log::info!("✓ Saved JSON → {}", outcome.json_path.display());
                log::info!("✓ Saved screenshot → {}", outcome.screenshot_path.display());
                report.processed.push(outcome);
            }
            Err(e) => {
                log::error!("✗ Error processing {}: {e}", path.display());
                report.failed.push((path, e));
            }
        }
    }

    report
        .processed
        .sort_by(|a, b| a.image_name.cmp(&b.image_name));
    report.failed.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ocr::{OcrError, ReplayOcrEngine};
    use crate::persistence::load_json;
    use crate::text_matching::Detection;
    use image::{Rgb, RgbImage};

    struct FailingEngine;

    impl OcrEngine for FailingEngine {
        fn name(&self) -> &'static str {
            "failing"
        }

        fn recognize(&self, _: &OcrRequest<'_>) -> Result<Vec<Detection>, OcrError> {
            Err(OcrError::backend("model not loaded"))
        }
    }

    /// Recognizes `A_1_` everywhere except on `b.png`, where it panics
    struct PanickingEngine;

    impl OcrEngine for PanickingEngine {
        fn name(&self) -> &'static str {
            "panicking"
        }

        fn recognize(&self, request: &OcrRequest<'_>) -> Result<Vec<Detection>, OcrError> {
            if request.source().is_some_and(|p| p.ends_with("b.png")) {
                panic!("engine crashed on b.png");
            }
            Ok(vec![Detection::new("A_1_", 0.9)])
        }
    }

    fn write_label(dir: &Path, name: &str, recording: Option<&str>) -> PathBuf {
        let path = dir.join(name);
        RgbImage::from_pixel(64, 48, Rgb([240, 240, 240]))
            .save(&path)
            .unwrap();
        if let Some(body) = recording {
            std::fs::write(dir.join(format!("{name}.ocr.json")), body).unwrap();
        }
        path
    }

    fn config_for(root: &Path) -> PipelineConfig {
        let mut config = PipelineConfig::default();
        config.batch.input_dir = root.join("input");
        config.batch.json_out = root.join("results/json");
        config.batch.screenshot_out = root.join("results/screenshots");
        config.batch.max_concurrency = 2;
        config
    }

    #[test]
    fn test_list_images_filters_and_sorts() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["b.PNG", "a.jpg", "c.jpeg", "notes.txt", "d.png.ocr.json"] {
            std::fs::write(dir.path().join(name), b"").unwrap();
        }
        std::fs::create_dir(dir.path().join("nested.png")).unwrap();

        let images = list_images(dir.path(), &BatchConfig::default().extensions).unwrap();
        let names: Vec<_> = images
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();

        assert_eq!(names, vec!["a.jpg", "b.PNG", "c.jpeg"]);
    }

    #[test]
    fn test_list_images_missing_folder() {
        let err = list_images(Path::new("no/such/folder"), &[]).unwrap_err();
        assert!(matches!(err, PipelineError::MissingDirectory { .. }));
    }

    #[test]
    fn test_process_image_writes_outputs() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_for(dir.path());
        std::fs::create_dir_all(&config.batch.input_dir).unwrap();
        std::fs::create_dir_all(&config.batch.screenshot_out).unwrap();
        let path = write_label(
            &config.batch.input_dir,
            "label.png",
            Some(r#"[{"bbox": [[4, 4], [40, 4], [40, 12], [4, 12]], "text": "SHIP _1_ 42", "confidence": 0.8}]"#),
        );

        let outcome = process_image(
            &path,
            &ReplayOcrEngine::default(),
            &PatternMatcher::default(),
            &config,
        )
        .unwrap();

        assert_eq!(outcome.target_line.as_deref(), Some("SHIP_1_42"));
        assert_eq!(outcome.confidence, 0.8);
        let record = load_json(&outcome.json_path).unwrap();
        assert_eq!(record.image_name, "label.png");
        assert_eq!(record.result.all_lines.len(), 1);

        let screenshot = image::open(&outcome.screenshot_path).unwrap().to_rgb8();
        assert_eq!(*screenshot.get_pixel(4, 4), Rgb([0, 255, 0]));
    }

    #[tokio::test]
    async fn test_process_dataset_continues_past_failures() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_for(dir.path());
        let input = config.batch.input_dir.clone();
        std::fs::create_dir_all(&input).unwrap();
        write_label(&input, "a.png", Some(r#"[{"text": "A_1_", "confidence": 0.9}]"#));
        write_label(&input, "b.png", Some(r#"[{"text": "Hello World", "confidence": 0.99}]"#));
        write_label(&input, "c.png", None);

        let report = process_dataset(config.clone(), Arc::new(ReplayOcrEngine::default()))
            .await
            .unwrap();

        assert_eq!(report.total(), 3);
        assert_eq!(report.processed.len(), 2);
        assert_eq!(report.processed[0].target_line.as_deref(), Some("A_1_"));
        assert_eq!(report.processed[1].target_line, None);
        assert_eq!(report.failed.len(), 1);
        assert!(report.failed[0].0.ends_with("c.png"));
        assert!(matches!(report.failed[0].1, PipelineError::Ocr { .. }));
        assert!(config.batch.json_out.join("b.png.json").is_file());
    }

    #[tokio::test]
    async fn test_process_dataset_engine_failure_is_per_image() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_for(dir.path());
        std::fs::create_dir_all(&config.batch.input_dir).unwrap();
        write_label(&config.batch.input_dir, "a.png", None);

        let report = process_dataset(config, Arc::new(FailingEngine)).await.unwrap();

        assert!(report.processed.is_empty());
        assert_eq!(report.failed.len(), 1);
    }

    #[tokio::test]
    async fn test_process_dataset_missing_input() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_for(dir.path());

        let err = process_dataset(config.clone(), Arc::new(ReplayOcrEngine::default()))
            .await
            .unwrap_err();

        assert!(matches!(err, PipelineError::MissingDirectory { .. }));
        assert!(!config.batch.json_out.exists());
        assert!(!config.batch.screenshot_out.exists());
    }

    #[tokio::test]
    async fn test_process_dataset_survives_worker_panic() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = config_for(dir.path());
        config.batch.max_concurrency = 1;
        let input = config.batch.input_dir.clone();
        std::fs::create_dir_all(&input).unwrap();
        for name in ["a.png", "b.png", "c.png"] {
            write_label(&input, name, None);
        }

        let report = process_dataset(config, Arc::new(PanickingEngine)).await.unwrap();

        assert_eq!(report.total(), 3);
        let names: Vec<_> = report.processed.iter().map(|o| o.image_name.as_str()).collect();
        assert_eq!(names, vec!["a.png", "c.png"]);
        assert_eq!(report.failed.len(), 1);
        assert!(report.failed[0].0.ends_with("b.png"));
        assert!(matches!(report.failed[0].1, PipelineError::JoinError { .. }));
    }
}
