use std::path::Path;

use image::GrayImage;

use super::error::OcrError;
use crate::text_matching::Detection;

/// Input handed to an OCR engine: the preprocessed image and where it came from.
#[derive(Debug, Clone, Copy)]
pub struct OcrRequest<'a> {
    image: &'a GrayImage,
    source: Option<&'a Path>,
}

impl<'a> OcrRequest<'a> {
    pub fn new(image: &'a GrayImage) -> Self {
        Self {
            image,
            source: None,
        }
    }

    pub fn with_source(mut self, source: &'a Path) -> Self {
        self.source = Some(source);
        self
    }

    pub fn image(&self) -> &'a GrayImage {
        self.image
    }

    pub fn source(&self) -> Option<&'a Path> {
        self.source
    }
}

/// Common interface for OCR providers.
///
/// Engines are loaded once by the caller and shared; the matcher never
/// touches them.
pub trait OcrEngine: Send + Sync {
    fn name(&self) -> &'static str;

    fn recognize(&self, request: &OcrRequest<'_>) -> Result<Vec<Detection>, OcrError>;
}

/// Engine that never recognizes anything.
#[derive(Debug, Default)]
pub struct NoopOcrEngine;

impl OcrEngine for NoopOcrEngine {
    fn name(&self) -> &'static str {
        "noop"
    }

    fn recognize(&self, _: &OcrRequest<'_>) -> Result<Vec<Detection>, OcrError> {
        Ok(Vec::new())
    }
}
