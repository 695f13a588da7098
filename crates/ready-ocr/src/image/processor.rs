// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image processor: decoding, linear brightness/contrast scaling, BT.601
// grayscale conversion, preview downscaling, and PNG encoding. Operates on
// in-memory images using the `image` crate.

use image::{DynamicImage, GrayImage, ImageFormat, Luma};
use ready_core::error::ReadyError;
use tracing::{debug, info, instrument};

/// Image processing pipeline operating on a single in-memory image.
///
/// Each transformation consumes `self` and returns a new `ImageProcessor`
/// wrapping the result, enabling method chaining.
///
/// ```ignore
/// let gray = ImageProcessor::open("receipt.jpg")?
///     .scale_offset(1.2, 10.0)
///     .grayscale_bt601();
/// ```
pub struct ImageProcessor {
    /// The current working image.
    image: DynamicImage,
}

impl ImageProcessor {
    // -- Construction ---------------------------------------------------------

    /// Load an image from a file path.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<std::path::Path>) -> Result<Self, ReadyError> {
        let img = image::open(path.as_ref()).map_err(|err| {
            ReadyError::ImageError(format!(
                "failed to open {}: {}",
                path.as_ref().display(),
                err
            ))
        })?;
        info!(
            width = img.width(),
            height = img.height(),
            "Image loaded"
        );
        Ok(Self { image: img })
    }

    /// Create a processor from raw encoded bytes (PNG, JPEG, BMP, TIFF).
    #[instrument(skip(data), fields(data_len = data.len()))]
    pub fn from_bytes(data: &[u8]) -> Result<Self, ReadyError> {
        let img = image::load_from_memory(data).map_err(|err| {
            ReadyError::ImageError(format!("failed to decode image: {}", err))
        })?;
        debug!(
            width = img.width(),
            height = img.height(),
            "Image decoded from bytes"
        );
        Ok(Self { image: img })
    }

    /// Wrap an already-decoded `DynamicImage`.
    pub fn from_dynamic(image: DynamicImage) -> Self {
        Self { image }
    }

    // -- Accessors ------------------------------------------------------------

    /// Current image width in pixels.
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    /// Current image height in pixels.
    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Borrow the underlying `DynamicImage`.
    pub fn as_dynamic(&self) -> &DynamicImage {
        &self.image
    }

    /// Consume the processor and return the underlying `DynamicImage`.
    pub fn into_dynamic(self) -> DynamicImage {
        self.image
    }

    // -- Transformations ------------------------------------------------------

    /// Linear per-channel transform `|v * alpha + beta|`, saturated to u8.
    ///
    /// This is the brightness/contrast adjustment of the preprocessing filter.
    /// The alpha channel, if any, is dropped: the result is always RGB8.
    #[instrument(skip(self), fields(alpha, beta))]
    pub fn scale_offset(self, alpha: f32, beta: f32) -> Self {
        info!(alpha, beta, "Applying brightness/contrast transform");

        let mut rgb = self.image.to_rgb8();
        for pixel in rgb.pixels_mut() {
            for channel in pixel.0.iter_mut() {
                *channel = saturate_abs(*channel as f32 * alpha + beta);
            }
        }

        Self {
            image: DynamicImage::ImageRgb8(rgb),
        }
    }

    /// Convert to 8-bit luma with ITU-R BT.601 weights.
    ///
    /// Uses the 14-bit fixed-point coefficients common to document OCR
    /// toolchains (`0.299 R + 0.587 G + 0.114 B`, rounded), rather than the
    /// BT.709 weights used by `DynamicImage::to_luma8`.
    pub fn grayscale_bt601(&self) -> GrayImage {
        to_gray_bt601(&self.image)
    }

    /// Downscale to fit within `max_width` x `max_height`, preserving aspect
    /// ratio. Images that already fit are returned unchanged (never upscaled).
    pub fn fit_within(self, max_width: u32, max_height: u32) -> Self {
        if self.image.width() <= max_width && self.image.height() <= max_height {
            return self;
        }
        let resized = self
            .image
            .resize(max_width, max_height, image::imageops::FilterType::Triangle);
        debug!(
            new_w = resized.width(),
            new_h = resized.height(),
            "Preview downscale complete"
        );
        Self { image: resized }
    }

    // -- Output ---------------------------------------------------------------

    /// Encode the current image as PNG bytes.
    pub fn to_png_bytes(&self) -> Result<Vec<u8>, ReadyError> {
        encode_to_format(&self.image, ImageFormat::Png)
    }
}

/// BT.601 luma conversion without taking ownership of the image.
///
/// Already-grayscale 8-bit images are copied through untouched.
pub fn to_gray_bt601(image: &DynamicImage) -> GrayImage {
    const R: u32 = 4899;
    const G: u32 = 9617;
    const B: u32 = 1868;
    const SHIFT: u32 = 14;

    if let DynamicImage::ImageLuma8(gray) = image {
        return gray.clone();
    }

    let rgb = image.to_rgb8();
    let (width, height) = rgb.dimensions();
    let mut gray = GrayImage::new(width, height);
    for (x, y, pixel) in rgb.enumerate_pixels() {
        let [r, g, b] = pixel.0;
        let luma = (r as u32 * R + g as u32 * G + b as u32 * B + (1 << (SHIFT - 1))) >> SHIFT;
        gray.put_pixel(x, y, Luma([luma.min(255) as u8]));
    }
    debug!(width, height, "Converted to BT.601 grayscale");
    gray
}

/// Absolute value, round half to even, clamp to 0..=255.
fn saturate_abs(value: f32) -> u8 {
    value.abs().round_ties_even().min(255.0) as u8
}

/// Encode a `DynamicImage` into the specified format, returning the raw bytes.
fn encode_to_format(
    image: &DynamicImage,
    format: ImageFormat,
) -> Result<Vec<u8>, ReadyError> {
    let mut buffer = Vec::new();
    let mut cursor = std::io::Cursor::new(&mut buffer);
    image.write_to(&mut cursor, format).map_err(|err| {
        ReadyError::ImageError(format!("image encoding failed: {}", err))
    })?;
    Ok(buffer)
}
