// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for the Ready text extractor.

use std::path::PathBuf;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::ReadyError;
use crate::human_errors::NO_TEXT_MESSAGE;

/// Unique identifier for a background extraction job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct JobId(pub Uuid);

impl JobId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for JobId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for JobId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Recognition languages offered in the UI.
///
/// Each variant maps to a Tesseract traineddata code. `FrenchEnglish` uses
/// Tesseract's `+` syntax to load both models at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Language {
    #[default]
    French,
    English,
    Spanish,
    German,
    Italian,
    FrenchEnglish,
}

impl Language {
    /// Every preset, in display order.
    pub const ALL: [Language; 6] = [
        Language::French,
        Language::English,
        Language::Spanish,
        Language::German,
        Language::Italian,
        Language::FrenchEnglish,
    ];

    /// The Tesseract language code passed via `-l`.
    pub fn code(&self) -> &'static str {
        match self {
            Self::French => "fra",
            Self::English => "eng",
            Self::Spanish => "spa",
            Self::German => "deu",
            Self::Italian => "ita",
            Self::FrenchEnglish => "fra+eng",
        }
    }

    /// Human-readable label, e.g. `"German (deu)"`.
    pub fn label(&self) -> &'static str {
        match self {
            Self::French => "French (fra)",
            Self::English => "English (eng)",
            Self::Spanish => "Spanish (spa)",
            Self::German => "German (deu)",
            Self::Italian => "Italian (ita)",
            Self::FrenchEnglish => "Multi-language (fra+eng)",
        }
    }

    /// Individual traineddata names required by this preset.
    pub fn components(&self) -> impl Iterator<Item = &'static str> {
        self.code().split('+')
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = ReadyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Language::ALL
            .into_iter()
            .find(|lang| lang.code() == s.trim())
            .ok_or_else(|| ReadyError::InvalidParameter(format!("unknown language code `{s}`")))
    }
}

/// Brightness and contrast offsets applied before binarization.
///
/// Both values are bounded to [`Adjustments::MIN`]..=[`Adjustments::MAX`],
/// matching the range of the UI sliders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Adjustments {
    brightness: i32,
    contrast: i32,
}

impl Adjustments {
    pub const MIN: i32 = -50;
    pub const MAX: i32 = 50;

    /// Build a validated pair of offsets.
    pub fn new(brightness: i32, contrast: i32) -> crate::Result<Self> {
        for (name, value) in [("brightness", brightness), ("contrast", contrast)] {
            if !(Self::MIN..=Self::MAX).contains(&value) {
                return Err(ReadyError::InvalidParameter(format!(
                    "{name} offset {value} outside {}..={}",
                    Self::MIN,
                    Self::MAX
                )));
            }
        }
        Ok(Self {
            brightness,
            contrast,
        })
    }

    /// Build offsets, clamping out-of-range values instead of rejecting them.
    pub fn clamped(brightness: i32, contrast: i32) -> Self {
        Self {
            brightness: brightness.clamp(Self::MIN, Self::MAX),
            contrast: contrast.clamp(Self::MIN, Self::MAX),
        }
    }

    pub fn brightness(&self) -> i32 {
        self.brightness
    }

    pub fn contrast(&self) -> i32 {
        self.contrast
    }

    /// True when both offsets are zero and the linear transform can be skipped.
    pub fn is_identity(&self) -> bool {
        self.brightness == 0 && self.contrast == 0
    }

    /// Gain applied to every channel: `contrast / 50 + 1`.
    pub fn alpha(&self) -> f32 {
        self.contrast as f32 / 50.0 + 1.0
    }

    /// Offset added to every channel after scaling.
    pub fn beta(&self) -> f32 {
        self.brightness as f32
    }
}

/// Everything the background job needs to extract text from one image.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionRequest {
    /// Image file to read.
    pub image_path: PathBuf,
    /// Recognition language.
    pub language: Language,
    /// Run the preprocessing filter before the primary OCR pass.
    pub preprocess: bool,
    /// Brightness/contrast offsets. Always identity when `preprocess` is off.
    pub adjustments: Adjustments,
}

impl ExtractionRequest {
    /// Create a request. Offsets are discarded when preprocessing is disabled.
    pub fn new(
        image_path: impl Into<PathBuf>,
        language: Language,
        preprocess: bool,
        adjustments: Adjustments,
    ) -> Self {
        Self {
            image_path: image_path.into(),
            language,
            preprocess,
            adjustments: if preprocess {
                adjustments
            } else {
                Adjustments::default()
            },
        }
    }
}

/// Fixed checkpoints reported while a job runs.
pub mod progress {
    /// Job picked up by the worker.
    pub const STARTED: u8 = 10;
    /// Source image decoded.
    pub const IMAGE_LOADED: u8 = 30;
    /// Preprocessing filter applied (only emitted when enabled).
    pub const PREPROCESSED: u8 = 60;
    /// Primary OCR attempt returned.
    pub const PRIMARY_PASS: u8 = 90;
    /// Fallback chain finished.
    pub const DONE: u8 = 100;
}

/// Terminal result of one extraction job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutcomeKind {
    /// Text returned verbatim by the engine.
    Text(String),
    /// Every attempt produced blank output.
    NoText,
    /// The pipeline failed; holds the user-facing message.
    Failed(String),
}

/// Terminal result plus completion time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionOutcome {
    pub kind: OutcomeKind,
    pub completed_at: DateTime<Utc>,
}

impl ExtractionOutcome {
    pub fn text(text: impl Into<String>) -> Self {
        Self::from_kind(OutcomeKind::Text(text.into()))
    }

    pub fn no_text() -> Self {
        Self::from_kind(OutcomeKind::NoText)
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self::from_kind(OutcomeKind::Failed(message.into()))
    }

    fn from_kind(kind: OutcomeKind) -> Self {
        Self {
            kind,
            completed_at: Utc::now(),
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self.kind, OutcomeKind::Failed(_))
    }

    /// The single string shown in place of the extracted text.
    pub fn display_text(&self) -> &str {
        match &self.kind {
            OutcomeKind::Text(text) => text,
            OutcomeKind::NoText => NO_TEXT_MESSAGE,
            OutcomeKind::Failed(message) => message,
        }
    }
}
