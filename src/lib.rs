pub mod args;
pub mod batch;
pub mod config;
pub mod error;
pub mod evaluate;
pub mod highlight;
pub mod ocr;
pub mod persistence;
pub mod preprocess;
pub mod text_matching;

pub use error::{PipelineError, PipelineResult};
pub use text_matching::{Detection, MatchResult, PatternMatcher, extract_target_from_ocr};
