//! Accuracy over a folder of persisted extraction records

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::config::DEFAULT_TARGET_PATTERN;
use crate::error::{PipelineError, PipelineResult};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AccuracySummary {
    pub total: usize,
    pub extracted: usize,
    pub missing: usize,
}

impl AccuracySummary {
    /// Count one record; it is extracted when its line carries the literal pattern
    pub fn record(&mut self, target_line: Option<&str>) {
        self.total += 1;
        if target_line.is_some_and(|line| line.contains(DEFAULT_TARGET_PATTERN)) {
            self.extracted += 1;
        } else {
            self.missing += 1;
        }
    }

    pub fn accuracy_percent(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.extracted as f64 / self.total as f64 * 100.0
    }
}

impl fmt::Display for AccuracySummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "===== Accuracy Summary =====")?;
        writeln!(f, "Total JSON files: {}", self.total)?;
        writeln!(f, "Extracted: {}", self.extracted)?;
        writeln!(f, "Missing: {}", self.missing)?;
        writeln!(f, "Accuracy: {:.2}%", self.accuracy_percent())?;
        write!(f, "============================")
    }
}

/// Only the field the metric needs; the rest of the record may vary
#[derive(Deserialize)]
struct TargetOnly {
    #[serde(default)]
    target_line: Option<String>,
}

fn json_files(folder: &Path) -> PipelineResult<Vec<PathBuf>> {
    let entries = std::fs::read_dir(folder).map_err(|e| PipelineError::io(folder, e))?;
    let mut files: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| {
            path.is_file()
                && path
                    .extension()
                    .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
        })
        .collect();
    files.sort();
    Ok(files)
}

/// Fraction of records in `json_folder` whose target line contains `_1_`
///
/// Unreadable records are logged and counted as missing.
pub fn evaluate_results(json_folder: &Path) -> PipelineResult<AccuracySummary> {
    if !json_folder.is_dir() {
        return Err(PipelineError::MissingDirectory {
            path: json_folder.to_path_buf(),
        });
    }

    let files = json_files(json_folder)?;
    log::info!(
        "Found {} JSON files in {}",
        files.len(),
        json_folder.display()
    );

    let mut summary = AccuracySummary::default();
    for path in &files {
        let parsed = std::fs::read_to_string(path)
            .map_err(|e| PipelineError::io(path, e))
            .and_then(|raw| {
                serde_json::from_str::<TargetOnly>(&raw).map_err(|e| PipelineError::json(path, e))
            });
        match parsed {
            Ok(record) => summary.record(record.target_line.as_deref()),
            Err(e) => {
                log::warn!("Counting unreadable record as missing: {e}");
                summary.record(None);
            }
        }
    }

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_counts() {
        let mut summary = AccuracySummary::default();
        summary.record(Some("AB_1_CD"));
        summary.record(Some("AB-1-CD"));
        summary.record(None);
        summary.record(Some("_1_"));

        assert_eq!(summary.total, 4);
        assert_eq!(summary.extracted, 2);
        assert_eq!(summary.missing, 2);
        assert_eq!(summary.accuracy_percent(), 50.0);
    }

    #[test]
    fn test_empty_summary() {
        let summary = AccuracySummary::default();
        assert_eq!(summary.accuracy_percent(), 0.0);
        assert!(summary.to_string().contains("Accuracy: 0.00%"));
    }

    #[test]
    fn test_evaluate_folder() {
        let dir = tempfile::tempdir().unwrap();
        let write = |name: &str, body: &str| std::fs::write(dir.path().join(name), body).unwrap();
        write("a.png.json", r#"{"image_name": "a.png", "target_line": "XY_1_Z", "confidence": 0.9, "all_lines": []}"#);
        write("b.png.json", r#"{"image_name": "b.png", "target_line": null, "confidence": 0.0, "all_lines": []}"#);
        write("c.png.json", r#"{"target_line": "XY-1-Z"}"#);
        write("d.png.json", "not json");
        write("notes.txt", "ignored");

        let summary = evaluate_results(dir.path()).unwrap();

        assert_eq!(
            summary,
            AccuracySummary {
                total: 4,
                extracted: 1,
                missing: 3
            }
        );
        assert_eq!(summary.accuracy_percent(), 25.0);
    }

    #[test]
    fn test_evaluate_missing_folder() {
        let dir = tempfile::tempdir().unwrap();
        let err = evaluate_results(&dir.path().join("nope")).unwrap_err();
        assert!(matches!(err, PipelineError::MissingDirectory { .. }));
    }

    #[test]
    fn test_evaluate_empty_folder() {
        let dir = tempfile::tempdir().unwrap();
        let summary = evaluate_results(dir.path()).unwrap();
        assert_eq!(summary.total, 0);
    }
}
