// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Native dialogs and clipboard access for the desktop window.

use std::path::PathBuf;

use dioxus::prelude::*;
use ready_core::error::{ReadyError, Result};
use ready_core::human_errors::{HumanError, Severity};
use rfd::{FileDialog, MessageButtons, MessageDialog, MessageLevel};

/// Extensions offered by the image picker.
pub const IMAGE_EXTENSIONS: [&str; 6] = ["png", "jpg", "jpeg", "bmp", "tif", "tiff"];

/// Receives the text from Rust, writes it, and reports back.
const CLIPBOARD_JS: &str = r#"
    const text = await dioxus.recv();
    try {
        await navigator.clipboard.writeText(text);
        dioxus.send(true);
    } catch (e) {
        dioxus.send(false);
    }
"#;

pub fn pick_image() -> Option<PathBuf> {
    FileDialog::new()
        .set_title("Select an image")
        .add_filter("Images", &IMAGE_EXTENSIONS)
        .pick_file()
}

pub fn pick_save_path() -> Option<PathBuf> {
    FileDialog::new()
        .set_title("Save text")
        .add_filter("Text files", &["txt"])
        .set_file_name("extracted.txt")
        .save_file()
}

pub fn show_info(title: &str, description: &str) {
    MessageDialog::new()
        .set_level(MessageLevel::Info)
        .set_title(title)
        .set_description(description)
        .set_buttons(MessageButtons::Ok)
        .show();
}

pub fn show_warning(title: &str, description: &str) {
    MessageDialog::new()
        .set_level(MessageLevel::Warning)
        .set_title(title)
        .set_description(description)
        .set_buttons(MessageButtons::Ok)
        .show();
}

/// Dialog for a humanized error; transient problems are shown as warnings.
pub fn show_error(error: &HumanError) {
    let level = match error.severity {
        Severity::Transient => MessageLevel::Warning,
        Severity::ActionRequired | Severity::Permanent => MessageLevel::Error,
    };
    MessageDialog::new()
        .set_level(level)
        .set_title(error.title.as_str())
        .set_description(error.body())
        .set_buttons(MessageButtons::Ok)
        .show();
}

/// Shown before exiting when the app cannot start.
pub fn show_startup_error(err: &ReadyError) {
    MessageDialog::new()
        .set_level(MessageLevel::Error)
        .set_title("Startup error")
        .set_description(format!(
            "Unable to start the application.\n\nError: {err}\n\nMake sure Tesseract OCR is correctly installed on your system."
        ))
        .set_buttons(MessageButtons::Ok)
        .show();
}

/// Write `text` to the system clipboard through the webview.
pub async fn copy_to_clipboard(text: String) -> Result<()> {
    let mut eval = document::eval(CLIPBOARD_JS);
    eval.send(text)
        .map_err(|err| ReadyError::Clipboard(err.to_string()))?;
    match eval.recv::<bool>().await {
        Ok(true) => Ok(()),
        Ok(false) => Err(ReadyError::Clipboard("the webview refused clipboard access".into())),
        Err(err) => Err(ReadyError::Clipboard(err.to_string())),
    }
}
