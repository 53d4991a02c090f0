//! Text matching data types

use serde::{Deserialize, Serialize};

/// One axis of a bounding polygon vertex
///
/// OCR backends write either integer or fractional pixel positions; the
/// original representation is kept so records re-serialize as recorded.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Coordinate {
    Int(i64),
    Float(f64),
}

impl Coordinate {
    pub fn value(self) -> f64 {
        match self {
            Coordinate::Int(v) => v as f64,
            Coordinate::Float(v) => v,
        }
    }
}

impl From<i64> for Coordinate {
    fn from(v: i64) -> Self {
        Coordinate::Int(v)
    }
}

impl From<i32> for Coordinate {
    fn from(v: i32) -> Self {
        Coordinate::Int(v.into())
    }
}

impl From<f64> for Coordinate {
    fn from(v: f64) -> Self {
        Coordinate::Float(v)
    }
}

/// A point of a bounding polygon in image coordinates
pub type Point = [Coordinate; 2];

/// Build a [`Point`] from either integer or fractional coordinates
pub fn point(x: impl Into<Coordinate>, y: impl Into<Coordinate>) -> Point {
    [x.into(), y.into()]
}

/// One OCR-recognized text fragment
///
/// Every field is optional on input: OCR output is partial, so a missing
/// `text` reads as empty and a missing `confidence` as 0.0 when ranking.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    /// Polygon enclosing the fragment, passed through untouched
    #[serde(rename = "bbox", default)]
    pub bounding_region: Vec<Point>,
    /// Text as recognized, noise included
    #[serde(default)]
    pub text: String,
    /// OCR's self-reported certainty (0.0-1.0)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
}

/// Outcome of selecting the target line among a set of detections
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    /// Normalized text of the selected detection, `None` when nothing qualified
    #[serde(default)]
    pub target_line: Option<String>,
    /// Confidence of the selected detection, 0.0 when nothing qualified
    #[serde(default)]
    pub confidence: f64,
    /// The input detections, verbatim
    #[serde(default)]
    pub all_lines: Vec<Detection>,
}

impl Detection {
    /// Create a detection without a bounding region
    pub fn new(text: impl Into<String>, confidence: f64) -> Self {
        Self {
            bounding_region: Vec::new(),
            text: text.into(),
            confidence: Some(confidence),
        }
    }

    pub fn with_bounding_region(mut self, points: Vec<Point>) -> Self {
        self.bounding_region = points;
        self
    }

    /// Confidence used for ranking; absent counts as 0.0
    pub fn confidence_or_default(&self) -> f64 {
        self.confidence.unwrap_or(0.0)
    }
}

impl MatchResult {
    /// Result for an input where no detection carries the pattern
    pub fn no_match(all_lines: Vec<Detection>) -> Self {
        Self {
            target_line: None,
            confidence: 0.0,
            all_lines,
        }
    }

    pub fn is_match(&self) -> bool {
        self.target_line.is_some()
    }
}
