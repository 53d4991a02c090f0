//! Configuration for the extraction pipeline

use std::path::PathBuf;

/// The literal pattern carried by the target line
pub const DEFAULT_TARGET_PATTERN: &str = "_1_";

#[derive(Debug, Clone, PartialEq)]
pub struct MatcherConfig {
    /// Substring searched for exactly, and approximately in the fuzzy pass
    pub target_pattern: String,
    /// Minimum window similarity (0.0 to 1.0) accepted by the fuzzy pass
    pub fuzzy_threshold: f64,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            target_pattern: DEFAULT_TARGET_PATTERN.to_string(),
            fuzzy_threshold: 0.3,
        }
    }
}

/// Matcher preset that only accepts fuzzy windows with two of three characters right
pub fn create_strict_matcher_config() -> MatcherConfig {
    MatcherConfig {
        fuzzy_threshold: 0.6,
        ..MatcherConfig::default()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PreprocessConfig {
    /// Longest side after resizing; larger images are shrunk, smaller kept
    pub max_dim: u32,
    /// Gaussian blur sigma, 0.8 matches a 3x3 kernel
    pub blur_sigma: f32,
    /// Adaptive threshold neighbourhood radius (block of 2r+1 pixels)
    pub threshold_block_radius: u32,
    /// Subtracted from the neighbourhood mean before comparing
    pub threshold_offset: i32,
}

impl Default for PreprocessConfig {
    fn default() -> Self {
        Self {
            max_dim: 1500,
            blur_sigma: 0.8,
            threshold_block_radius: 15,
            threshold_offset: 10,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BatchConfig {
    pub input_dir: PathBuf,
    pub json_out: PathBuf,
    pub screenshot_out: PathBuf,
    /// Lowercase file extensions, without the dot
    pub extensions: Vec<String>,
    /// Images processed at the same time
    pub max_concurrency: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("tests"),
            json_out: PathBuf::from("results/json"),
            screenshot_out: PathBuf::from("results/screenshots"),
            extensions: vec!["jpg".to_string(), "jpeg".to_string(), "png".to_string()],
            max_concurrency: std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PipelineConfig {
    pub matcher: MatcherConfig,
    pub preprocess: PreprocessConfig,
    pub batch: BatchConfig,
}
