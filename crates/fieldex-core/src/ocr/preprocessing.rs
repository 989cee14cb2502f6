//! Image preprocessing ahead of an external OCR engine.

use std::path::Path;

use image::imageops::{self, FilterType};
use image::{DynamicImage, GenericImageView, GrayImage, Luma};
use tracing::{debug, info};

use crate::error::Result;
use crate::models::config::PreprocessConfig;

/// Sharpening kernel (centre-weighted Laplacian), row-major.
const SHARPEN_KERNEL: [f32; 9] = [0.0, -1.0, 0.0, -1.0, 5.0, -1.0, 0.0, -1.0, 0.0];

/// Readies scanned documents for OCR: upscale, grayscale, denoise, boost
/// contrast, sharpen and optionally binarize.
pub struct ImagePreprocessor {
    config: PreprocessConfig,
}

impl ImagePreprocessor {
    /// Create a new preprocessor with default settings.
    pub fn new() -> Self {
        Self::with_config(PreprocessConfig::default())
    }

    pub fn with_config(config: PreprocessConfig) -> Self {
        Self { config }
    }

    /// Enhance `input` and write the result to `output`.
    ///
    /// The output format follows the output file extension.
    pub fn process_file(&self, input: &Path, output: &Path) -> Result<()> {
        let image = image::open(input)?;
        let enhanced = self.enhance(&image);
        enhanced.save(output)?;
        info!("Preprocessed {} -> {}", input.display(), output.display());
        Ok(())
    }

    /// Apply the full enhancement pipeline.
    pub fn enhance(&self, image: &DynamicImage) -> DynamicImage {
        let (width, height) = image.dimensions();
        let (new_width, new_height) = self.upscale_dimensions(width, height);

        let resized = if (new_width, new_height) != (width, height) {
            debug!(
                "Upscaling {}x{} to {}x{} for OCR",
                width, height, new_width, new_height
            );
            image.resize_exact(new_width, new_height, FilterType::Lanczos3)
        } else {
            image.clone()
        };

        let mut gray = resized.to_luma8();

        if self.config.blur_sigma > 0.0 {
            gray = imageops::blur(&gray, self.config.blur_sigma);
        }

        if (self.config.contrast - 1.0).abs() > f32::EPSILON {
            gray = imageops::contrast(&gray, contrast_percent(self.config.contrast));
        }

        if self.config.sharpen {
            gray = sharpen(&gray);
        }

        if self.config.threshold {
            gray = adaptive_threshold(
                &gray,
                self.config.threshold_block_size,
                self.config.threshold_offset,
            );
        }

        DynamicImage::ImageLuma8(gray)
    }

    /// Size after scaling the shorter side up to `min_dimension`.
    ///
    /// Images already large enough keep their size.
    pub fn upscale_dimensions(&self, width: u32, height: u32) -> (u32, u32) {
        let min_dim = width.min(height);
        if min_dim == 0 || min_dim >= self.config.min_dimension {
            return (width, height);
        }

        let scale = self.config.min_dimension as f32 / min_dim as f32;
        let new_width = (width as f32 * scale).round() as u32;
        let new_height = (height as f32 * scale).round() as u32;

        (new_width.max(1), new_height.max(1))
    }
}

impl Default for ImagePreprocessor {
    fn default() -> Self {
        Self::new()
    }
}

/// Percentage for [`imageops::contrast`] that scales distances from
/// mid-grey by `factor`.
fn contrast_percent(factor: f32) -> f32 {
    (factor.max(0.0).sqrt() - 1.0) * 100.0
}

fn sharpen(image: &GrayImage) -> GrayImage {
    let (width, height) = image.dimensions();
    if width < 3 || height < 3 {
        return image.clone();
    }

    // filter3x3 leaves a black one-pixel frame; restore the source border.
    let mut result = imageops::filter3x3(image, &SHARPEN_KERNEL);
    for x in 0..width {
        for y in [0, height - 1] {
            result.put_pixel(x, y, *image.get_pixel(x, y));
        }
    }
    for y in 0..height {
        for x in [0, width - 1] {
            result.put_pixel(x, y, *image.get_pixel(x, y));
        }
    }
    result
}

/// Binarize against the mean of each pixel's `block_size` neighbourhood
/// minus `offset`, using a summed-area table.
fn adaptive_threshold(image: &GrayImage, block_size: u32, offset: i32) -> GrayImage {
    let (width, height) = image.dimensions();
    let (w, h) = (width as usize, height as usize);
    let stride = w + 1;

    let mut integral = vec![0u64; stride * (h + 1)];
    for y in 0..h {
        let mut row = 0u64;
        for x in 0..w {
            row += image.get_pixel(x as u32, y as u32)[0] as u64;
            integral[(y + 1) * stride + x + 1] = integral[y * stride + x + 1] + row;
        }
    }

    let half = (block_size / 2) as usize;
    GrayImage::from_fn(width, height, |x, y| {
        let (x, y) = (x as usize, y as usize);
        let (x0, y0) = (x.saturating_sub(half), y.saturating_sub(half));
        let (x1, y1) = ((x + half + 1).min(w), (y + half + 1).min(h));

        let sum = integral[y1 * stride + x1] + integral[y0 * stride + x0]
            - integral[y0 * stride + x1]
            - integral[y1 * stride + x0];
        let count = ((x1 - x0) * (y1 - y0)) as u64;
        let mean = (sum / count) as i32;

        let value = image.get_pixel(x as u32, y as u32)[0] as i32;
        Luma([if value > mean - offset { 255 } else { 0 }])
    })
}
