// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Scripted OCR engine and fixture images shared by the unit tests.

use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::Mutex;

use image::{DynamicImage, Rgb, RgbImage};
use ready_core::error::{ReadyError, Result};
use tempfile::TempDir;

use crate::ocr::{OcrEngine, RecognitionOptions};

/// One observed `recognize` call.
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub options: RecognitionOptions,
    /// True when the engine received a single-channel (preprocessed) image.
    pub grayscale: bool,
}

/// Replays queued responses in order and records every call it receives.
/// Once the script runs out it keeps answering with blank output.
#[derive(Default)]
pub struct ScriptedEngine {
    responses: Mutex<VecDeque<Result<String>>>,
    calls: Mutex<Vec<RecordedCall>>,
    panic_on_call: bool,
}

impl ScriptedEngine {
    pub fn new(responses: impl IntoIterator<Item = Result<String>>) -> Self {
        Self {
            responses: Mutex::new(responses.into_iter().collect()),
            ..Self::default()
        }
    }

    pub fn texts(texts: &[&str]) -> Self {
        Self::new(texts.iter().map(|t| Ok(t.to_string())))
    }

    pub fn panicking() -> Self {
        Self {
            panic_on_call: true,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }
}

impl OcrEngine for ScriptedEngine {
    fn name(&self) -> &str {
        "scripted"
    }

    fn recognize(&self, image: &DynamicImage, options: &RecognitionOptions) -> Result<String> {
        if self.panic_on_call {
            panic!("scripted engine exploded");
        }
        self.calls.lock().unwrap().push(RecordedCall {
            options: options.clone(),
            grayscale: matches!(image, DynamicImage::ImageLuma8(_)),
        });
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(String::new()))
    }

    fn version(&self) -> Result<String> {
        Ok("scripted 1.0".into())
    }

    fn available_languages(&self) -> Result<Vec<String>> {
        Err(ReadyError::OcrError("not supported".into()))
    }
}

/// A small RGB page written to a temporary PNG. Keep the `TempDir` alive for
/// as long as the path is used.
pub fn page_fixture() -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("page.png");
    let img = RgbImage::from_fn(48, 32, |x, y| {
        if (10..38).contains(&x) && (12..18).contains(&y) {
            Rgb([15, 15, 15])
        } else {
            Rgb([240, 238, 230])
        }
    });
    img.save(&path).unwrap();
    (dir, path)
}
