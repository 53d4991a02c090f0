//! Image preparation before OCR
//!
//! Resize (shrink only), grayscale, light Gaussian blur, then adaptive mean
//! thresholding so text stands out on uneven label backgrounds.

use std::path::Path;

use image::imageops::FilterType;
use image::{DynamicImage, GrayImage, Luma, RgbImage};
use imageproc::filter::{box_filter, gaussian_blur_f32};

use crate::config::PreprocessConfig;
use crate::error::{PipelineError, PipelineResult};

/// The resized color image (for highlighting) and the binarized one (for OCR)
#[derive(Debug, Clone)]
pub struct Preprocessed {
    pub original: RgbImage,
    pub processed: GrayImage,
}

pub fn load_image(path: &Path) -> PipelineResult<DynamicImage> {
    image::open(path).map_err(|source| PipelineError::ImageLoad {
        path: path.to_path_buf(),
        source,
    })
}

/// Shrink so the longest side is `max_dim`; smaller images are returned as is
pub fn resize_for_ocr(image: &RgbImage, max_dim: u32) -> RgbImage {
    let (width, height) = image.dimensions();
    let longest = width.max(height);
    if longest <= max_dim || max_dim == 0 {
        return image.clone();
    }

    let scale = max_dim as f64 / longest as f64;
    let new_width = ((width as f64 * scale).round() as u32).max(1);
    let new_height = ((height as f64 * scale).round() as u32).max(1);
    log::debug!("Resizing {width}x{height} -> {new_width}x{new_height}");

    image::imageops::resize(image, new_width, new_height, FilterType::Triangle)
}

pub fn to_grayscale(image: &RgbImage) -> GrayImage {
    image::imageops::grayscale(image)
}

pub fn denoise(gray: &GrayImage, sigma: f32) -> GrayImage {
    if sigma <= 0.0 {
        return gray.clone();
    }
    gaussian_blur_f32(gray, sigma)
}

/// Adaptive mean threshold: white where a pixel is brighter than its
/// neighbourhood mean minus `offset`, black elsewhere
pub fn threshold(gray: &GrayImage, block_radius: u32, offset: i32) -> GrayImage {
    let means = box_filter(gray, block_radius, block_radius);
    GrayImage::from_fn(gray.width(), gray.height(), |x, y| {
        let value = gray.get_pixel(x, y)[0] as i32;
        let mean = means.get_pixel(x, y)[0] as i32;
        if value > mean - offset {
            Luma([255])
        } else {
            Luma([0])
        }
    })
}

/// Full preparation of an already decoded image
pub fn preprocess_image_array(image: &DynamicImage, config: &PreprocessConfig) -> Preprocessed {
    let original = resize_for_ocr(&image.to_rgb8(), config.max_dim);
    let gray = to_grayscale(&original);
    let denoised = denoise(&gray, config.blur_sigma);
    let processed = threshold(
        &denoised,
        config.threshold_block_radius,
        config.threshold_offset,
    );
    Preprocessed {
        original,
        processed,
    }
}

pub fn preprocess_image(path: &Path, config: &PreprocessConfig) -> PipelineResult<Preprocessed> {
    let image = load_image(path)?;
    Ok(preprocess_image_array(&image, config))
}
