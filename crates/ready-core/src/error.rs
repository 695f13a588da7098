// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Ready.

use thiserror::Error;

/// Top-level error type for all Ready operations.
#[derive(Debug, Error)]
pub enum ReadyError {
    // -- Image errors --
    #[error("image processing failed: {0}")]
    ImageError(String),

    // -- OCR engine errors --
    #[error("OCR failed: {0}")]
    OcrError(String),

    #[error("OCR engine unavailable: {0}")]
    EngineUnavailable(String),

    #[error("language data not installed: {0}")]
    UnsupportedLanguage(String),

    // -- Parameters / configuration --
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    // -- Background execution --
    #[error("extraction worker failed: {0}")]
    Worker(String),

    // -- Desktop integration --
    #[error("clipboard unavailable: {0}")]
    Clipboard(String),

    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, ReadyError>;
