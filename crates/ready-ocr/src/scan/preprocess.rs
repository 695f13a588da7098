// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// OCR preprocessing filter: optional brightness/contrast transform, BT.601
// grayscale, adaptive Gaussian binarization, and morphological opening.

use image::{DynamicImage, GrayImage, ImageBuffer, Luma};
use imageproc::distance_transform::Norm;
use imageproc::{filter, morphology};
use ready_core::Adjustments;
use tracing::{debug, info, instrument};

use crate::image::processor::{ImageProcessor, to_gray_bt601};

/// Tunables for [`Preprocessor`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PreprocessOptions {
    /// Side of the square neighbourhood used for the local threshold. Odd, >= 3.
    pub block_size: u32,
    /// Constant subtracted from the weighted local mean.
    pub c: i32,
    /// Chebyshev radius of the opening structuring element. 0 is a 1x1 kernel,
    /// which leaves the binarized image untouched.
    pub denoise_radius: u8,
}

impl Default for PreprocessOptions {
    fn default() -> Self {
        Self {
            block_size: 11,
            c: 2,
            denoise_radius: 0,
        }
    }
}

/// Turns a decoded photo or scan into a black-and-white image for OCR.
#[derive(Debug, Clone, Default)]
pub struct Preprocessor {
    options: PreprocessOptions,
}

impl Preprocessor {
    pub fn new(options: PreprocessOptions) -> Self {
        Self { options }
    }

    /// Run the filter. Steps, in order:
    ///
    /// 1. `|v * alpha + beta|` per channel, skipped when both offsets are zero
    /// 2. BT.601 grayscale
    /// 3. adaptive Gaussian threshold (`block_size`, `c`)
    /// 4. morphological opening (`denoise_radius`)
    #[instrument(skip(self, image), fields(
        width = image.width(),
        height = image.height(),
        brightness = adjustments.brightness(),
        contrast = adjustments.contrast(),
    ))]
    pub fn run(&self, image: &DynamicImage, adjustments: Adjustments) -> GrayImage {
        let gray = if adjustments.is_identity() {
            debug!("Zero offsets; skipping brightness/contrast transform");
            to_gray_bt601(image)
        } else {
            ImageProcessor::from_dynamic(image.clone())
                .scale_offset(adjustments.alpha(), adjustments.beta())
                .grayscale_bt601()
        };

        let binary = adaptive_threshold_gaussian(&gray, self.options.block_size, self.options.c);
        let cleaned = self.denoise(binary);

        info!("Preprocessing complete");
        cleaned
    }

    fn denoise(&self, binary: GrayImage) -> GrayImage {
        if self.options.denoise_radius == 0 {
            return binary;
        }
        debug!(radius = self.options.denoise_radius, "Applying morphological opening");
        morphology::open(&binary, Norm::LInf, self.options.denoise_radius)
    }
}

/// Binarize with a Gaussian-weighted local threshold.
///
/// For every pixel the weighted mean of its `block_size` x `block_size`
/// neighbourhood is computed (replicated borders) and rounded to u8; the pixel
/// becomes 255 when `src > mean - c`, otherwise 0. Even or too-small block
/// sizes are bumped to the next odd size >= 3.
pub fn adaptive_threshold_gaussian(gray: &GrayImage, block_size: u32, c: i32) -> GrayImage {
    let block_size = block_size.max(3) | 1;
    let kernel = gaussian_kernel(block_size);
    let mean = local_mean(gray, &kernel);

    let (width, height) = gray.dimensions();
    let mut output = GrayImage::new(width, height);
    for (x, y, pixel) in gray.enumerate_pixels() {
        let local = mean.get_pixel(x, y).0[0] as i64;
        let value = if pixel.0[0] as i64 - local > -(c as i64) { 255u8 } else { 0u8 };
        output.put_pixel(x, y, Luma([value]));
    }

    debug!(block_size, c, "Adaptive threshold complete");
    output
}

/// Normalised 1-D Gaussian kernel of odd length `size`.
///
/// Sigma is derived from the size as `0.3 * ((size - 1) * 0.5 - 1) + 0.8`,
/// which gives 2.0 for an 11-tap kernel.
pub fn gaussian_kernel(size: u32) -> Vec<f32> {
    let sigma = 0.3 * ((size as f64 - 1.0) * 0.5 - 1.0) + 0.8;
    let centre = (size as f64 - 1.0) / 2.0;
    let denom = 2.0 * sigma * sigma;

    let raw: Vec<f64> = (0..size)
        .map(|i| {
            let d = i as f64 - centre;
            (-(d * d) / denom).exp()
        })
        .collect();
    let sum: f64 = raw.iter().sum();
    raw.into_iter().map(|w| (w / sum) as f32).collect()
}

/// Gaussian-weighted local mean with replicated borders, rounded to u8.
fn local_mean(gray: &GrayImage, kernel: &[f32]) -> GrayImage {
    let (width, height) = gray.dimensions();
    if width == 0 || height == 0 {
        return GrayImage::new(width, height);
    }

    let levels: ImageBuffer<Luma<f32>, Vec<f32>> =
        ImageBuffer::from_fn(width, height, |x, y| Luma([gray.get_pixel(x, y).0[0] as f32]));
    let blurred = filter::separable_filter_equal(&levels, kernel);

    GrayImage::from_fn(width, height, |x, y| {
        Luma([blurred.get_pixel(x, y).0[0].round().clamp(0.0, 255.0) as u8])
    })
}

// -- Tests --------------------------------------------------------------------
