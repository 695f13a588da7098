// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Human-readable messages shown in dialogs and in place of extracted text.
//
// The extraction pipeline collapses every failure into one fixed-format string;
// dialogs (image load, save, startup) use the richer `HumanError` mapping.

use std::fmt::Display;

use crate::error::ReadyError;

/// Shown instead of extracted text when every OCR attempt came back blank.
pub const NO_TEXT_MESSAGE: &str = "No text could be extracted from this image. \
Try adjusting the preprocessing settings or use an image with clearer text.";

/// Warning shown when a selected file cannot be decoded as an image.
pub const IMAGE_LOAD_WARNING: &str = "Unable to load the image.";

/// Format any pipeline failure into the single message shown to the user.
pub fn extraction_failure_message(err: &dyn Display) -> String {
    format!(
        "Error while extracting text: {err}\n\nMake sure Tesseract OCR is correctly installed."
    )
}

/// Severity of an error from the user's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// May work if tried again unchanged.
    Transient,
    /// User must do something (pick another file, install a language pack).
    ActionRequired,
    /// Cannot be fixed from inside the app.
    Permanent,
}

/// A human-readable error with plain English message and actionable suggestion.
#[derive(Debug, Clone)]
pub struct HumanError {
    /// Dialog title.
    pub title: String,
    /// Plain English summary.
    pub message: String,
    /// What the user should try.
    pub suggestion: String,
    /// Drives the dialog level (warning vs error).
    pub severity: Severity,
}

impl HumanError {
    /// Message and suggestion joined for a dialog body.
    pub fn body(&self) -> String {
        format!("{}\n\n{}", self.message, self.suggestion)
    }
}

/// Convert a `ReadyError` into a `HumanError` for dialogs.
pub fn humanize_error(err: &ReadyError) -> HumanError {
    match err {
        ReadyError::ImageError(_) => HumanError {
            title: "Error".into(),
            message: IMAGE_LOAD_WARNING.into(),
            suggestion: "The file may be damaged or not an image. Choose a PNG, JPEG, BMP or TIFF file.".into(),
            severity: Severity::ActionRequired,
        },

        ReadyError::OcrError(detail) => HumanError {
            title: "Text recognition failed".into(),
            message: "Tesseract could not read this image.".into(),
            suggestion: format!("Try again with different preprocessing settings. (Detail: {detail})"),
            severity: Severity::Transient,
        },

        ReadyError::EngineUnavailable(_) => HumanError {
            title: "Tesseract not found".into(),
            message: "The Tesseract OCR engine could not be started.".into(),
            suggestion: format!(
                "Install Tesseract OCR, or point the {} environment variable at the tesseract executable.",
                crate::config::TESSERACT_CMD_ENV
            ),
            severity: Severity::Permanent,
        },

        ReadyError::UnsupportedLanguage(code) => HumanError {
            title: "Language not installed".into(),
            message: format!("The language data for `{code}` is not installed."),
            suggestion: "Install the matching Tesseract language pack, or choose another language.".into(),
            severity: Severity::ActionRequired,
        },

        ReadyError::InvalidParameter(detail) => HumanError {
            title: "Invalid setting".into(),
            message: "One of the settings is not valid.".into(),
            suggestion: format!("Check the value and try again. (Detail: {detail})"),
            severity: Severity::ActionRequired,
        },

        ReadyError::Worker(_) => HumanError {
            title: "Extraction interrupted".into(),
            message: "The extraction stopped unexpectedly.".into(),
            suggestion: "Try again. If this keeps happening, please report it.".into(),
            severity: Severity::Transient,
        },

        ReadyError::Clipboard(_) => HumanError {
            title: "Copy failed".into(),
            message: "The text could not be copied to the clipboard.".into(),
            suggestion: "Select the text and copy it manually, or save it as a TXT file.".into(),
            severity: Severity::Transient,
        },

        ReadyError::Io(io_err) => {
            if io_err.kind() == std::io::ErrorKind::NotFound {
                HumanError {
                    title: "Error".into(),
                    message: "The file couldn't be found.".into(),
                    suggestion: "It may have been moved or deleted. Try choosing the file again.".into(),
                    severity: Severity::ActionRequired,
                }
            } else if io_err.kind() == std::io::ErrorKind::PermissionDenied {
                HumanError {
                    title: "Error".into(),
                    message: "The app doesn't have permission to access that file.".into(),
                    suggestion: "Check the file permissions, or choose a different location.".into(),
                    severity: Severity::ActionRequired,
                }
            } else {
                HumanError {
                    title: "Error".into(),
                    message: "There was a problem reading or writing a file.".into(),
                    suggestion: "Try again. If this keeps happening, your disk may be full.".into(),
                    severity: Severity::Transient,
                }
            }
        }
    }
}
