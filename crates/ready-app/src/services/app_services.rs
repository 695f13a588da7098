// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Central service layer: builds the OCR backend once at startup and provides
// the calls the Dioxus pages make (image loading, extraction, saving, engine
// status).
//
// Every field is behind an `Arc`, so the struct is cheap to clone into event
// handlers and async blocks and can be handed to the launcher as root context.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use base64::Engine as _;
use ready_core::error::{ReadyError, Result};
use ready_core::human_errors::humanize_error;
use ready_core::{AppConfig, ExtractionRequest};
use ready_ocr::{
    ExtractionHandle, ExtractionPipeline, ImageProcessor, OcrEngine, PreprocessOptions,
    Preprocessor, TesseractCli, spawn_extraction,
};
use tracing::{info, instrument, warn};

/// An image the user picked, decoded successfully, with its on-screen preview.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedImage {
    pub path: PathBuf,
    /// Final path component, shown in the window title.
    pub file_name: String,
    /// Downscaled PNG as a `data:` URL for an `img` element.
    pub preview_data_url: String,
}

/// What the engine page shows. Failures carry the human-readable message.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineStatus {
    pub command: String,
    pub version: std::result::Result<String, String>,
    pub languages: std::result::Result<Vec<String>, String>,
}

/// Shared application services accessible from all Dioxus components via
/// `use_context::<AppServices>()`.
#[derive(Clone)]
pub struct AppServices {
    config: Arc<AppConfig>,
    engine: Arc<TesseractCli>,
    pipeline: Arc<ExtractionPipeline>,
}

impl AppServices {
    /// Validate the configuration and build the OCR backend. Call once at
    /// startup. Does not touch the Tesseract binary.
    pub fn init(config: AppConfig) -> Result<Self> {
        config.validate()?;
        info!(cmd = %config.tesseract_cmd.display(), "initialising app services");

        let engine = Arc::new(TesseractCli::from_config(&config));
        let preprocessor = Preprocessor::new(PreprocessOptions {
            denoise_radius: config.denoise_radius,
            ..PreprocessOptions::default()
        });
        let pipeline = Arc::new(ExtractionPipeline::new(engine.clone(), preprocessor));

        Ok(Self {
            config: Arc::new(config),
            engine,
            pipeline,
        })
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Ask Tesseract for its version. `None` (with a warning logged) when the
    /// binary cannot be run; the app still starts in that case.
    pub fn probe_engine_version(&self) -> Option<String> {
        match self.engine.version() {
            Ok(version) => {
                info!(%version, "Tesseract OCR detected");
                Some(version)
            }
            Err(err) => {
                warn!(error = %err, "Unable to detect the Tesseract version; make sure it is installed");
                None
            }
        }
    }

    // -- Images --------------------------------------------------------------

    /// Decode `path` and build a preview that fits the configured bounds.
    #[instrument(skip(self), fields(path = %path.display()))]
    pub fn load_image(&self, path: &Path) -> Result<LoadedImage> {
        let preview = ImageProcessor::open(path)?
            .fit_within(self.config.preview_max_width, self.config.preview_max_height)
            .to_png_bytes()?;
        let encoded = base64::engine::general_purpose::STANDARD.encode(&preview);

        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        info!(%file_name, preview_bytes = preview.len(), "image selected");

        Ok(LoadedImage {
            path: path.to_path_buf(),
            file_name,
            preview_data_url: format!("data:image/png;base64,{encoded}"),
        })
    }

    // -- Extraction ----------------------------------------------------------

    /// Start a background job. Must be called from within the tokio runtime.
    pub fn start_extraction(&self, request: ExtractionRequest) -> ExtractionHandle {
        let handle = spawn_extraction(Arc::clone(&self.pipeline), request);
        info!(job_id = %handle.id(), "extraction started");
        handle
    }

    // -- Export --------------------------------------------------------------

    /// Write `text` to `path` as UTF-8, replacing any existing file.
    #[instrument(skip(self, text), fields(path = %path.display(), bytes = text.len()))]
    pub fn save_text(&self, path: &Path, text: &str) -> Result<()> {
        std::fs::write(path, text.as_bytes())?;
        info!("text saved");
        Ok(())
    }

    // -- Engine --------------------------------------------------------------

    /// Query version and installed languages. Runs the binary twice, so call
    /// it off the UI thread.
    pub fn engine_status(&self) -> EngineStatus {
        let describe = |err: ReadyError| humanize_error(&err).body();
        EngineStatus {
            command: self.engine.command().display().to_string(),
            version: self.engine.version().map_err(describe),
            languages: self.engine.available_languages().map_err(describe),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::Engine as _;
    use image::{Rgb, RgbImage};

    fn services() -> AppServices {
        AppServices::init(AppConfig {
            tesseract_cmd: PathBuf::from("/nonexistent/ready-test/tesseract"),
            preview_max_width: 40,
            preview_max_height: 40,
            ..AppConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn init_rejects_empty_command() {
        let config = AppConfig {
            tesseract_cmd: PathBuf::new(),
            ..AppConfig::default()
        };
        assert!(matches!(
            AppServices::init(config),
            Err(ReadyError::InvalidParameter(_))
        ));
    }

    #[test]
    fn load_image_builds_png_preview() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("receipt.jpg.png");
        RgbImage::from_pixel(200, 100, Rgb([200, 10, 10]))
            .save(&path)
            .unwrap();

        let loaded = services().load_image(&path).unwrap();
        assert_eq!(loaded.file_name, "receipt.jpg.png");
        assert_eq!(loaded.path, path);

        let encoded = loaded
            .preview_data_url
            .strip_prefix("data:image/png;base64,")
            .expect("png data url");
        let bytes = base64::engine::general_purpose::STANDARD
            .decode(encoded)
            .unwrap();
        let preview = image::load_from_memory(&bytes).unwrap();
        assert_eq!((preview.width(), preview.height()), (40, 20));
    }

    #[test]
    fn load_image_rejects_non_image() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.png");
        std::fs::write(&path, "plain text pretending to be a png").unwrap();

        assert!(matches!(
            services().load_image(&path),
            Err(ReadyError::ImageError(_))
        ));
    }

    #[test]
    fn save_text_writes_exact_utf8() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.txt");
        std::fs::write(&path, "old contents that are longer").unwrap();

        let text = "Café  crème\n\x0c";
        services().save_text(&path, text).unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), text.as_bytes());
    }

    #[test]
    fn engine_status_reports_missing_binary() {
        let status = services().engine_status();
        assert_eq!(status.command, "/nonexistent/ready-test/tesseract");
        let message = status.version.unwrap_err();
        assert!(message.contains("TESSERACT_CMD"));
        assert!(status.languages.is_err());
        assert_eq!(services().probe_engine_version(), None);
    }
}
