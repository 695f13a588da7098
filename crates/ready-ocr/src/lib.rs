// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// ready-ocr: text extraction for the Ready desktop app.
//
// Provides image loading and preview scaling, the OCR preprocessing filter
// (brightness/contrast, grayscale, adaptive threshold, opening), the Tesseract
// command-line backend, the fallback extraction pipeline, and the background
// worker that runs it off the UI thread.

pub mod image;
pub mod ocr;
pub mod pipeline;
pub mod scan;
pub mod worker;

#[cfg(test)]
mod test_support;

// Re-export the primary types so callers can use `ready_ocr::ExtractionPipeline` etc.
pub use image::ImageProcessor;
pub use ocr::{OcrEngine, RecognitionOptions, TesseractCli};
pub use pipeline::ExtractionPipeline;
pub use scan::{PreprocessOptions, Preprocessor};
pub use worker::{ExtractionHandle, WorkerEvent, spawn_extraction};
