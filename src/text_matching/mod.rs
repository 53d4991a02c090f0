/// Text matching for OCR detections
///
/// This module turns a noisy, unordered set of OCR detections into one
/// target line:
/// - Whitespace normalization of recognized text
/// - Literal `_1_` containment as the preferred signal
/// - Edit-distance windows tolerating OCR glyph substitutions (`-1-`, `•1•`)
/// - Confidence-based selection within each tier
pub mod matcher;
pub mod similarity;
pub mod types;


pub use matcher::{PatternMatcher, clean_text, extract_target_from_ocr};
pub use similarity::{ratio, similarity_ratio};
pub use types::{Coordinate, Detection, MatchResult, Point, point};
