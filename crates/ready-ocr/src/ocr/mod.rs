// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// OCR engine abstraction.
//
// The extraction pipeline talks to an `OcrEngine`; the production backend is
// the Tesseract command-line tool (`tesseract` module). Tests substitute a
// scripted engine.

pub mod tesseract;

use image::DynamicImage;
use ready_core::error::Result;

pub use tesseract::TesseractCli;

/// Tesseract page segmentation modes (`--psm`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageSegMode {
    /// 0: orientation and script detection only.
    OsdOnly,
    /// 1: automatic segmentation with OSD.
    AutoOsd,
    /// 2: automatic segmentation, no OSD, no recognition.
    AutoOnly,
    /// 3: fully automatic segmentation, no OSD.
    FullyAutomatic,
    /// 4: a single column of text of variable sizes.
    SingleColumn,
    /// 5: a single uniform block of vertically aligned text.
    SingleBlockVertical,
    /// 6: a single uniform block of text.
    SingleBlock,
    /// 7: a single text line.
    SingleLine,
    /// 8: a single word.
    SingleWord,
    /// 9: a single word in a circle.
    CircleWord,
    /// 10: a single character.
    SingleChar,
    /// 11: sparse text, as much as possible in no particular order.
    SparseText,
    /// 12: sparse text with OSD.
    SparseTextOsd,
    /// 13: raw line, bypassing Tesseract-specific hacks.
    RawLine,
}

impl PageSegMode {
    /// Numeric value passed on the command line.
    pub fn as_arg(&self) -> u8 {
        match self {
            Self::OsdOnly => 0,
            Self::AutoOsd => 1,
            Self::AutoOnly => 2,
            Self::FullyAutomatic => 3,
            Self::SingleColumn => 4,
            Self::SingleBlockVertical => 5,
            Self::SingleBlock => 6,
            Self::SingleLine => 7,
            Self::SingleWord => 8,
            Self::CircleWord => 9,
            Self::SingleChar => 10,
            Self::SparseText => 11,
            Self::SparseTextOsd => 12,
            Self::RawLine => 13,
        }
    }
}

/// Tesseract OCR engine modes (`--oem`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineMode {
    LegacyOnly,
    LstmOnly,
    LegacyAndLstm,
    /// Whatever the installed build considers its default.
    Default,
}

impl EngineMode {
    pub fn as_arg(&self) -> u8 {
        match self {
            Self::LegacyOnly => 0,
            Self::LstmOnly => 1,
            Self::LegacyAndLstm => 2,
            Self::Default => 3,
        }
    }
}

/// Per-call recognition settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecognitionOptions {
    /// Tesseract language code, e.g. `eng` or `fra+eng`.
    pub language: String,
    /// `None` leaves the engine's own default in place.
    pub page_segmentation: Option<PageSegMode>,
    /// `None` leaves the engine's own default in place.
    pub engine_mode: Option<EngineMode>,
}

impl RecognitionOptions {
    /// Engine defaults for everything except the language.
    pub fn new(language: impl Into<String>) -> Self {
        Self {
            language: language.into(),
            page_segmentation: None,
            engine_mode: None,
        }
    }

    pub fn with_page_segmentation(mut self, mode: PageSegMode) -> Self {
        self.page_segmentation = Some(mode);
        self
    }

    pub fn with_engine_mode(mut self, mode: EngineMode) -> Self {
        self.engine_mode = Some(mode);
        self
    }
}

/// Something that turns an image into text.
///
/// Implementations must be shareable across threads: the pipeline is held in
/// an `Arc` and driven from a blocking worker thread.
pub trait OcrEngine: Send + Sync {
    /// Short name for logs and the engine status page.
    fn name(&self) -> &str;

    /// Recognise text in `image`. Output is returned verbatim, including any
    /// trailing whitespace or form feeds the engine emits.
    fn recognize(&self, image: &DynamicImage, options: &RecognitionOptions) -> Result<String>;

    /// Engine version string, e.g. `tesseract 5.3.0`.
    fn version(&self) -> Result<String>;

    /// Installed language data codes.
    fn available_languages(&self) -> Result<Vec<String>>;
}
