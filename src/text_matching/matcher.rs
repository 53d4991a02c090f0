//! Target line selection
//!
//! Two-tier search over OCR detections: literal pattern containment first,
//! edit-distance windows as a fallback, highest confidence within a tier.

use super::similarity::similarity_ratio;
use super::types::{Detection, MatchResult};
use crate::config::MatcherConfig;

/// Strip surrounding whitespace and drop every whitespace character inside
pub fn clean_text(text: &str) -> String {
    text.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Pattern matcher for picking the target line out of OCR detections
pub struct PatternMatcher {
    config: MatcherConfig,
    target: Vec<char>,
}

impl PatternMatcher {
    pub fn new(config: MatcherConfig) -> Self {
        let target = config.target_pattern.chars().collect();
        Self { config, target }
    }

    /// True if the text contains the pattern literally
    pub fn is_exact_match(&self, text: &str) -> bool {
        text.contains(self.config.target_pattern.as_str())
    }

    /// True if any pattern-sized window of the trimmed text is similar enough
    ///
    /// Windows slide over characters, so multi-byte glyphs such as `•`
    /// count once. Text shorter than the pattern never matches.
    pub fn fuzzy_contains_pattern(&self, text: &str) -> bool {
        let chars: Vec<char> = text.trim().chars().collect();
        let width = self.target.len();

        if width == 0 {
            return true;
        }
        if chars.len() < width {
            return false;
        }

        chars
            .windows(width)
            .any(|window| similarity_ratio(window, &self.target) >= self.config.fuzzy_threshold)
    }

    /// Select the detection most likely to carry the pattern
    ///
    /// Any exact match beats every fuzzy match, whatever the confidences.
    /// Within a tier the highest confidence wins; among equal confidences
    /// the earliest detection in input order is kept.
    pub fn find_target_line<'a>(&self, detections: &'a [Detection]) -> Option<&'a Detection> {
        let exact = highest_confidence(
            detections
                .iter()
                .filter(|d| self.is_exact_match(&clean_text(&d.text))),
        );
        if let Some(best) = exact {
            log::debug!("Exact match '{}' ({:.3})", best.text, best.confidence_or_default());
            return Some(best);
        }

        let fuzzy = highest_confidence(
            detections
                .iter()
                .filter(|d| self.fuzzy_contains_pattern(&clean_text(&d.text))),
        );
        match fuzzy {
            Some(best) => {
                log::debug!("Fuzzy match '{}' ({:.3})", best.text, best.confidence_or_default());
            }
            None => log::debug!("No candidate among {} detections", detections.len()),
        }
        fuzzy
    }

    /// Wrap the selection into a [`MatchResult`], keeping every detection
    pub fn extract_target_from_ocr(&self, detections: Vec<Detection>) -> MatchResult {
        let selected = self
            .find_target_line(&detections)
            .map(|best| (clean_text(&best.text), best.confidence_or_default()));

        match selected {
            Some((target_line, confidence)) => MatchResult {
                target_line: Some(target_line),
                confidence,
                all_lines: detections,
            },
            None => MatchResult::no_match(detections),
        }
    }
}

impl Default for PatternMatcher {
    fn default() -> Self {
        Self::new(MatcherConfig::default())
    }
}

/// First detection with the maximal confidence
fn highest_confidence<'a>(
    candidates: impl Iterator<Item = &'a Detection>,
) -> Option<&'a Detection> {
    candidates.fold(None, |best, candidate| match best {
        Some(current) if candidate.confidence_or_default() <= current.confidence_or_default() => {
            Some(current)
        }
        Some(current) if candidate.confidence_or_default().is_nan() => Some(current),
        _ => Some(candidate),
    })
}

/// Run the default `_1_` matcher over a set of detections
pub fn extract_target_from_ocr(detections: Vec<Detection>) -> MatchResult {
    PatternMatcher::default().extract_target_from_ocr(detections)
}
