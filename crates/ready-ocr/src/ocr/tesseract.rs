// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Tesseract OCR backend, driven through the `tesseract` command-line tool.
//
// Each recognition call writes the image to a temporary PNG and runs
//
//   tesseract <input.png> stdout -l <lang> [--psm N] [--oem N]
//
// capturing standard output as the recognised text. The binary is treated as
// a black box: no timeout is applied and the call blocks until it exits.

use std::ffi::OsString;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use image::{DynamicImage, ImageFormat};
use ready_core::AppConfig;
use ready_core::error::{ReadyError, Result};
use tracing::{debug, info, instrument, warn};

use super::{OcrEngine, RecognitionOptions};

/// Fragments Tesseract prints on stderr when traineddata is missing.
const MISSING_LANGUAGE_MARKERS: [&str; 2] = ["Failed loading language", "Error opening data file"];

/// Tesseract engine backed by the command-line executable.
#[derive(Debug, Clone)]
pub struct TesseractCli {
    /// Executable path or bare name resolved through `PATH`.
    command: PathBuf,
}

impl TesseractCli {
    pub fn new(command: impl Into<PathBuf>) -> Self {
        Self {
            command: command.into(),
        }
    }

    /// Use the executable chosen by the application configuration.
    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(config.tesseract_cmd.clone())
    }

    pub fn command(&self) -> &Path {
        &self.command
    }

    /// Run the executable with `args`, mapping a missing binary to
    /// [`ReadyError::EngineUnavailable`].
    fn run(&self, args: &[OsString]) -> Result<Output> {
        Command::new(&self.command)
            .args(args)
            .output()
            .map_err(|err| {
                if err.kind() == ErrorKind::NotFound {
                    ReadyError::EngineUnavailable(format!(
                        "`{}` not found; install Tesseract OCR or set {}",
                        self.command.display(),
                        ready_core::config::TESSERACT_CMD_ENV
                    ))
                } else {
                    ReadyError::Io(err)
                }
            })
    }
}

impl OcrEngine for TesseractCli {
    fn name(&self) -> &str {
        "tesseract"
    }

    #[instrument(skip_all, fields(
        width = image.width(),
        height = image.height(),
        lang = %options.language,
        psm = ?options.page_segmentation,
    ))]
    fn recognize(&self, image: &DynamicImage, options: &RecognitionOptions) -> Result<String> {
        let input = tempfile::Builder::new()
            .prefix("ready-ocr-")
            .suffix(".png")
            .tempfile()?;
        image
            .save_with_format(input.path(), ImageFormat::Png)
            .map_err(|err| {
                ReadyError::ImageError(format!("failed to stage image for OCR: {err}"))
            })?;

        let args = build_args(input.path(), options);
        debug!(?args, "Invoking tesseract");
        let output = self.run(&args)?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            warn!(status = %output.status, stderr = %stderr.trim(), "tesseract exited with failure");
            return Err(classify_failure(&stderr, &options.language));
        }

        let text = String::from_utf8_lossy(&output.stdout).into_owned();
        info!(chars = text.chars().count(), "tesseract pass complete");
        Ok(text)
    }

    fn version(&self) -> Result<String> {
        let output = self.run(&[OsString::from("--version")])?;
        // Tesseract 3.x wrote its banner to stderr; 4.x and later use stdout.
        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);
        parse_version(&stdout)
            .or_else(|| parse_version(&stderr))
            .ok_or_else(|| ReadyError::OcrError("tesseract --version printed nothing".into()))
    }

    fn available_languages(&self) -> Result<Vec<String>> {
        let output = self.run(&[OsString::from("--list-langs")])?;
        if !output.status.success() {
            return Err(ReadyError::OcrError(
                String::from_utf8_lossy(&output.stderr).trim().to_string(),
            ));
        }
        Ok(parse_language_list(&String::from_utf8_lossy(&output.stdout)))
    }
}

/// Command-line arguments for one recognition pass.
pub fn build_args(input: &Path, options: &RecognitionOptions) -> Vec<OsString> {
    let mut args: Vec<OsString> = vec![
        input.as_os_str().to_owned(),
        "stdout".into(),
        "-l".into(),
        options.language.clone().into(),
    ];
    if let Some(psm) = options.page_segmentation {
        args.push("--psm".into());
        args.push(psm.as_arg().to_string().into());
    }
    if let Some(oem) = options.engine_mode {
        args.push("--oem".into());
        args.push(oem.as_arg().to_string().into());
    }
    args
}

/// Map a failed run's stderr to an error, recognising missing language data.
fn classify_failure(stderr: &str, language: &str) -> ReadyError {
    if MISSING_LANGUAGE_MARKERS.iter().any(|m| stderr.contains(m)) {
        ReadyError::UnsupportedLanguage(language.to_string())
    } else {
        let detail = stderr.trim();
        ReadyError::OcrError(if detail.is_empty() {
            "tesseract exited with an error and no diagnostics".to_string()
        } else {
            detail.to_string()
        })
    }
}

/// First non-empty line of `--version` output.
fn parse_version(banner: &str) -> Option<String> {
    banner
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .map(str::to_string)
}

/// Language codes from `--list-langs`, skipping the "List of available..." header.
fn parse_language_list(listing: &str) -> Vec<String> {
    listing
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with("List of available languages"))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ocr::{EngineMode, PageSegMode};
    use image::{GrayImage, Luma};

    fn lossy(args: Vec<OsString>) -> Vec<String> {
        args.iter().map(|a| a.to_string_lossy().into_owned()).collect()
    }

    #[test]
    fn default_args_have_no_mode_flags() {
        let args = build_args(Path::new("/tmp/in.png"), &RecognitionOptions::new("fra"));
        assert_eq!(lossy(args), vec!["/tmp/in.png", "stdout", "-l", "fra"]);
    }

    #[test]
    fn mode_flags_follow_language() {
        let opts = RecognitionOptions::new("fra+eng")
            .with_page_segmentation(PageSegMode::FullyAutomatic)
            .with_engine_mode(EngineMode::Default);
        let args = build_args(Path::new("in.png"), &opts);
        assert_eq!(
            lossy(args),
            vec!["in.png", "stdout", "-l", "fra+eng", "--psm", "3", "--oem", "3"]
        );
    }

    #[test]
    fn missing_traineddata_is_unsupported_language() {
        let stderr = "Error opening data file /usr/share/tessdata/xyz.traineddata\n\
                      Failed loading language 'xyz'\n";
        assert!(matches!(
            classify_failure(stderr, "xyz"),
            ReadyError::UnsupportedLanguage(code) if code == "xyz"
        ));
    }

    #[test]
    fn other_failures_keep_stderr() {
        match classify_failure("  Image too small to scale!!\n", "eng") {
            ReadyError::OcrError(detail) => assert_eq!(detail, "Image too small to scale!!"),
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(matches!(classify_failure("", "eng"), ReadyError::OcrError(_)));
    }

    #[test]
    fn parses_version_banner() {
        let banner = "tesseract 5.3.0\n leptonica-1.82.0\n  libgif 5.2.1\n";
        assert_eq!(parse_version(banner).as_deref(), Some("tesseract 5.3.0"));
        assert_eq!(parse_version("\n\n"), None);
    }

    #[test]
    fn parses_language_listing() {
        let listing = "List of available languages in \"/usr/share/tesseract-ocr/5/tessdata/\" (3):\neng\nfra\nosd\n";
        assert_eq!(parse_language_list(listing), vec!["eng", "fra", "osd"]);
    }

    #[test]
    fn missing_binary_reports_engine_unavailable() {
        let engine = TesseractCli::new("/nonexistent/ready-test/tesseract");
        assert!(matches!(engine.version(), Err(ReadyError::EngineUnavailable(_))));

        let img = DynamicImage::ImageLuma8(GrayImage::from_pixel(8, 8, Luma([255])));
        let result = engine.recognize(&img, &RecognitionOptions::new("eng"));
        assert!(matches!(result, Err(ReadyError::EngineUnavailable(_))));
    }

    #[test]
    fn from_config_uses_configured_command() {
        let config = AppConfig {
            tesseract_cmd: PathBuf::from("/usr/local/bin/tesseract"),
            ..AppConfig::default()
        };
        let engine = TesseractCli::from_config(&config);
        assert_eq!(engine.command(), Path::new("/usr/local/bin/tesseract"));
        assert_eq!(engine.name(), "tesseract");
    }

    /// Write an executable shell script standing in for the tesseract binary.
    #[cfg(unix)]
    fn fake_tesseract(dir: &Path, body: &str) -> TesseractCli {
        use std::os::unix::fs::PermissionsExt;

        let path = dir.join("tesseract");
        std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        TesseractCli::new(path)
    }

    /// Another test thread forking while the script was open for writing can
    /// make exec fail with ETXTBSY; retry a few times.
    #[cfg(unix)]
    fn recognize_retrying(
        engine: &TesseractCli,
        options: &RecognitionOptions,
    ) -> Result<String> {
        let img = DynamicImage::ImageLuma8(GrayImage::from_pixel(8, 8, Luma([255])));
        let mut result = engine.recognize(&img, options);
        for _ in 0..5 {
            match &result {
                Err(ReadyError::Io(err)) if err.raw_os_error() == Some(26) => {
                    std::thread::sleep(std::time::Duration::from_millis(20));
                    result = engine.recognize(&img, options);
                }
                _ => break,
            }
        }
        result
    }

    #[cfg(unix)]
    #[test]
    fn recognize_returns_stdout_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        let args_file = dir.path().join("args.txt");
        let engine = fake_tesseract(
            dir.path(),
            &format!(
                "test -f \"$1\" || exit 9\nprintf '%s\\n' \"$@\" > '{}'\nprintf '  text\\n\\f'",
                args_file.display()
            ),
        );

        let options = RecognitionOptions::new("fra").with_page_segmentation(PageSegMode::SingleBlock);
        let text = recognize_retrying(&engine, &options).unwrap();
        assert_eq!(text, "  text\n\x0c");

        let recorded = std::fs::read_to_string(&args_file).unwrap();
        let args: Vec<&str> = recorded.lines().collect();
        assert!(args[0].ends_with(".png"));
        assert_eq!(&args[1..], ["stdout", "-l", "fra", "--psm", "6"]);
        // Staged input is removed once the pass completes.
        assert!(!Path::new(args[0]).exists());
    }

    #[cfg(unix)]
    #[test]
    fn recognize_maps_missing_language_exit() {
        let dir = tempfile::tempdir().unwrap();
        let engine = fake_tesseract(
            dir.path(),
            "echo \"Failed loading language 'xyz'\" >&2\nexit 1",
        );

        let result = recognize_retrying(&engine, &RecognitionOptions::new("xyz"));
        assert!(matches!(
            result,
            Err(ReadyError::UnsupportedLanguage(code)) if code == "xyz"
        ));
    }

    #[cfg(unix)]
    #[test]
    fn recognize_reports_other_non_zero_exits() {
        let dir = tempfile::tempdir().unwrap();
        let engine = fake_tesseract(dir.path(), "echo 'Image too small to scale!!' >&2\nexit 1");

        match recognize_retrying(&engine, &RecognitionOptions::new("eng")) {
            Err(ReadyError::OcrError(detail)) => assert_eq!(detail, "Image too small to scale!!"),
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
