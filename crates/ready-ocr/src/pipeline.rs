// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Extraction pipeline: load, optionally preprocess, then run OCR with a
// three-step fallback chain.
//
//   attempt 1  working image (preprocessed or original), engine defaults
//   attempt 2  original image, --psm 6
//   attempt 3  original image, --psm 3 --oem 3
//
// The chain only moves on when the previous attempt returned blank text.
// The first non-blank output is returned exactly as the engine printed it.

use std::sync::Arc;

use image::DynamicImage;
use ready_core::error::Result;
use ready_core::human_errors::extraction_failure_message;
use ready_core::{ExtractionOutcome, ExtractionRequest, progress};
use tracing::{debug, error, info, instrument, warn};

use crate::image::ImageProcessor;
use crate::ocr::{EngineMode, OcrEngine, PageSegMode, RecognitionOptions};
use crate::scan::Preprocessor;

/// True when `text` has no visible characters.
pub fn is_blank(text: &str) -> bool {
    text.trim().is_empty()
}

/// Options for the two fallback attempts, in order.
fn fallback_options(language: &str) -> [RecognitionOptions; 2] {
    [
        RecognitionOptions::new(language).with_page_segmentation(PageSegMode::SingleBlock),
        RecognitionOptions::new(language)
            .with_page_segmentation(PageSegMode::FullyAutomatic)
            .with_engine_mode(EngineMode::Default),
    ]
}

/// Stateless apart from its engine and filter settings; one instance is
/// shared by every job.
pub struct ExtractionPipeline {
    engine: Arc<dyn OcrEngine>,
    preprocessor: Preprocessor,
}

impl ExtractionPipeline {
    pub fn new(engine: Arc<dyn OcrEngine>, preprocessor: Preprocessor) -> Self {
        Self {
            engine,
            preprocessor,
        }
    }

    /// Run one job to completion. Never fails: errors are folded into
    /// [`ExtractionOutcome::failed`] with the standard user-facing message.
    #[instrument(skip(self, request, progress), fields(
        path = %request.image_path.display(),
        lang = request.language.code(),
        preprocess = request.preprocess,
    ))]
    pub fn run(&self, request: &ExtractionRequest, mut progress: impl FnMut(u8)) -> ExtractionOutcome {
        match self.try_run(request, &mut progress) {
            Ok(Some(text)) => {
                info!(chars = text.chars().count(), "Extraction produced text");
                ExtractionOutcome::text(text)
            }
            Ok(None) => {
                warn!("All OCR attempts returned blank output");
                ExtractionOutcome::no_text()
            }
            Err(err) => {
                error!(%err, "Extraction failed");
                ExtractionOutcome::failed(extraction_failure_message(&err))
            }
        }
    }

    /// Run the pipeline and surface the underlying error. `Ok(None)` means
    /// every attempt came back blank.
    pub fn try_run(
        &self,
        request: &ExtractionRequest,
        report: &mut dyn FnMut(u8),
    ) -> Result<Option<String>> {
        report(progress::STARTED);

        let original = ImageProcessor::open(&request.image_path)?.into_dynamic();
        report(progress::IMAGE_LOADED);

        let language = request.language.code();
        let primary = RecognitionOptions::new(language);

        let mut text = if request.preprocess {
            let binary = self.preprocessor.run(&original, request.adjustments);
            report(progress::PREPROCESSED);
            self.attempt(1, &DynamicImage::ImageLuma8(binary), &primary)?
        } else {
            self.attempt(1, &original, &primary)?
        };
        report(progress::PRIMARY_PASS);

        for (index, options) in fallback_options(language).iter().enumerate() {
            if !is_blank(&text) {
                break;
            }
            text = self.attempt(index + 2, &original, options)?;
        }
        report(progress::DONE);

        Ok(if is_blank(&text) { None } else { Some(text) })
    }

    fn attempt(
        &self,
        number: usize,
        image: &DynamicImage,
        options: &RecognitionOptions,
    ) -> Result<String> {
        debug!(
            attempt = number,
            engine = self.engine.name(),
            psm = ?options.page_segmentation.map(|m| m.as_arg()),
            oem = ?options.engine_mode.map(|m| m.as_arg()),
            "OCR attempt"
        );
        let text = self.engine.recognize(image, options)?;
        if is_blank(&text) {
            debug!(attempt = number, "Attempt returned blank output");
        }
        Ok(text)
    }
}
