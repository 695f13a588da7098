// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Application configuration.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{ReadyError, Result};
use crate::types::Language;

/// Environment variable naming the Tesseract executable.
pub const TESSERACT_CMD_ENV: &str = "TESSERACT_CMD";

/// Conventional install location of the UB-Mannheim Windows build.
const WINDOWS_TESSERACT_PATH: &str = r"C:\Program Files\Tesseract-OCR\tesseract.exe";

/// Runtime settings, resolved once at startup. Nothing here is persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// Tesseract executable (absolute path or a name looked up on `PATH`).
    pub tesseract_cmd: PathBuf,
    /// Language selected when the window opens.
    pub default_language: Language,
    /// Whether the preprocessing checkbox starts ticked.
    pub preprocessing_default: bool,
    /// Radius of the morphological opening after binarization (0 = 1x1 kernel).
    pub denoise_radius: u8,
    /// Bounding box for the on-screen image preview, in pixels.
    pub preview_max_width: u32,
    pub preview_max_height: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            tesseract_cmd: PathBuf::from("tesseract"),
            default_language: Language::French,
            preprocessing_default: true,
            denoise_radius: 0,
            preview_max_width: 420,
            preview_max_height: 320,
        }
    }
}

impl AppConfig {
    /// Defaults plus the Tesseract location from the environment.
    pub fn from_env() -> Self {
        let env_cmd = std::env::var_os(TESSERACT_CMD_ENV).map(PathBuf::from);
        let windows_default = Path::new(WINDOWS_TESSERACT_PATH);
        Self::resolve(env_cmd, cfg!(windows) && windows_default.exists())
    }

    /// Pick the executable: explicit override, then the Windows install path
    /// when present, then plain `tesseract` on `PATH`.
    fn resolve(env_cmd: Option<PathBuf>, windows_install_present: bool) -> Self {
        let tesseract_cmd = match env_cmd {
            Some(cmd) => cmd,
            None if windows_install_present => PathBuf::from(WINDOWS_TESSERACT_PATH),
            None => PathBuf::from("tesseract"),
        };
        debug!(cmd = %tesseract_cmd.display(), "Resolved Tesseract command");
        Self {
            tesseract_cmd,
            ..Self::default()
        }
    }

    /// Reject settings the rest of the app cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.tesseract_cmd.as_os_str().is_empty() {
            return Err(ReadyError::InvalidParameter(format!(
                "{TESSERACT_CMD_ENV} is set but empty"
            )));
        }
        if self.preview_max_width == 0 || self.preview_max_height == 0 {
            return Err(ReadyError::InvalidParameter(
                "preview bounds must be non-zero".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_command_wins() {
        let config = AppConfig::resolve(Some(PathBuf::from("/opt/tess/bin/tesseract")), true);
        assert_eq!(config.tesseract_cmd, PathBuf::from("/opt/tess/bin/tesseract"));
    }

    #[test]
    fn windows_install_used_when_present() {
        let config = AppConfig::resolve(None, true);
        assert_eq!(config.tesseract_cmd, PathBuf::from(WINDOWS_TESSERACT_PATH));
    }

    #[test]
    fn falls_back_to_path_lookup() {
        let config = AppConfig::resolve(None, false);
        assert_eq!(config.tesseract_cmd, PathBuf::from("tesseract"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn empty_command_is_invalid() {
        let config = AppConfig::resolve(Some(PathBuf::new()), false);
        assert!(matches!(
            config.validate(),
            Err(ReadyError::InvalidParameter(_))
        ));
    }
}
