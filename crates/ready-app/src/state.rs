// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Global application state for the Dioxus UI.
//
// Pages hold this in a `Signal<AppState>` provided at the root and only
// mutate it through the transition methods below, which keep the button
// enablement rules in one place.

use ready_core::{Adjustments, AppConfig, ExtractionOutcome, ExtractionRequest, JobId, Language};
use ready_ocr::WorkerEvent;

use crate::services::app_services::LoadedImage;

/// Window title when no image is selected.
pub const DEFAULT_TITLE: &str = "Ready - Text recognition";

/// Shared state accessible to all pages via `use_context`.
#[derive(Debug, Clone, PartialEq)]
pub struct AppState {
    /// Image chosen for extraction, if it decoded successfully.
    pub image: Option<LoadedImage>,
    pub language: Language,
    /// Whether the preprocessing filter runs before the first OCR pass.
    pub preprocess: bool,
    pub brightness: i32,
    pub contrast: i32,
    /// A job is in flight; select and extract are disabled.
    pub busy: bool,
    /// Last progress checkpoint of the running job.
    pub progress: u8,
    /// Text shown in the result area.
    pub text: String,
    /// Job whose events are currently applied. Events from any other job are ignored.
    pub active_job: Option<JobId>,
}

impl AppState {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            image: None,
            language: config.default_language,
            preprocess: config.preprocessing_default,
            brightness: 0,
            contrast: 0,
            busy: false,
            progress: 0,
            text: String::new(),
            active_job: None,
        }
    }

    // -- Selection -----------------------------------------------------------

    /// Replace the current image. `None` means the last pick could not be
    /// decoded, which leaves nothing to extract from.
    pub fn select_image(&mut self, image: Option<LoadedImage>) {
        self.image = image;
    }

    pub fn window_title(&self) -> String {
        match &self.image {
            Some(image) => format!("Ready - {}", image.file_name),
            None => DEFAULT_TITLE.to_string(),
        }
    }

    pub fn set_brightness(&mut self, value: i32) {
        self.brightness = value.clamp(Adjustments::MIN, Adjustments::MAX);
    }

    pub fn set_contrast(&mut self, value: i32) {
        self.contrast = value.clamp(Adjustments::MIN, Adjustments::MAX);
    }

    // -- Enablement ----------------------------------------------------------

    pub fn can_select(&self) -> bool {
        !self.busy
    }

    pub fn can_extract(&self) -> bool {
        !self.busy && self.image.is_some()
    }

    pub fn can_export(&self) -> bool {
        !self.busy && !self.text.is_empty()
    }

    /// Sliders follow the preprocessing checkbox.
    pub fn adjustments_enabled(&self) -> bool {
        self.preprocess && !self.busy
    }

    /// Snapshot of the current settings, or `None` when extraction is not
    /// allowed right now.
    pub fn extraction_request(&self) -> Option<ExtractionRequest> {
        if !self.can_extract() {
            return None;
        }
        let image = self.image.as_ref()?;
        Some(ExtractionRequest::new(
            image.path.clone(),
            self.language,
            self.preprocess,
            Adjustments::clamped(self.brightness, self.contrast),
        ))
    }

    // -- Job lifecycle -------------------------------------------------------

    pub fn begin_extraction(&mut self, job: JobId) {
        self.busy = true;
        self.progress = 0;
        self.text.clear();
        self.active_job = Some(job);
    }

    /// Returns false for events from a job that is no longer active.
    pub fn apply_progress(&mut self, job: JobId, value: u8) -> bool {
        if self.active_job != Some(job) {
            return false;
        }
        self.progress = value.min(100);
        true
    }

    pub fn finish_extraction(&mut self, job: JobId, outcome: &ExtractionOutcome) -> bool {
        if self.active_job != Some(job) {
            return false;
        }
        self.text = outcome.display_text().to_string();
        self.busy = false;
        self.progress = 0;
        self.active_job = None;
        true
    }

    /// Apply one event from the worker of `job`.
    pub fn apply_event(&mut self, job: JobId, event: WorkerEvent) -> bool {
        match event {
            WorkerEvent::Progress(value) => self.apply_progress(job, value),
            WorkerEvent::Finished(outcome) => self.finish_extraction(job, &outcome),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(&AppConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::app_services::AppServices;
    use image::{Rgb, RgbImage};
    use ready_core::human_errors::NO_TEXT_MESSAGE;
    use std::path::PathBuf;

    fn image(name: &str) -> LoadedImage {
        LoadedImage {
            path: PathBuf::from("/tmp").join(name),
            file_name: name.to_string(),
            preview_data_url: "data:image/png;base64,".into(),
        }
    }

    #[test]
    fn initial_state_follows_config() {
        let config = AppConfig {
            default_language: Language::Spanish,
            preprocessing_default: false,
            ..AppConfig::default()
        };
        let state = AppState::new(&config);
        assert_eq!(state.language, Language::Spanish);
        assert!(!state.preprocess);
        assert!(!state.can_extract());
        assert!(!state.can_export());
        assert_eq!(state.window_title(), DEFAULT_TITLE);
    }

    #[test]
    fn failed_selection_disables_extraction() {
        let mut state = AppState::default();
        state.select_image(Some(image("scan.png")));
        assert!(state.can_extract());
        assert_eq!(state.window_title(), "Ready - scan.png");

        state.select_image(None);
        assert!(!state.can_extract());
        assert!(state.extraction_request().is_none());
    }

    #[test]
    fn request_uses_current_settings() {
        let mut state = AppState::default();
        state.select_image(Some(image("page.jpg")));
        state.language = Language::FrenchEnglish;
        state.set_brightness(80);
        state.set_contrast(-12);

        let request = state.extraction_request().unwrap();
        assert_eq!(request.image_path, PathBuf::from("/tmp/page.jpg"));
        assert_eq!(request.language, Language::FrenchEnglish);
        assert!(request.preprocess);
        assert_eq!(request.adjustments, Adjustments::new(50, -12).unwrap());

        state.preprocess = false;
        let request = state.extraction_request().unwrap();
        assert!(request.adjustments.is_identity());
        assert!(!state.adjustments_enabled());
    }

    #[test]
    fn job_lifecycle_toggles_controls() {
        let mut state = AppState::default();
        state.select_image(Some(image("a.png")));
        state.text = "previous".into();
        let job = JobId::new();

        state.begin_extraction(job);
        assert!(state.busy);
        assert!(state.text.is_empty());
        assert!(!state.can_select());
        assert!(!state.can_extract());
        assert!(!state.can_export());
        assert!(state.extraction_request().is_none());

        assert!(state.apply_progress(job, 30));
        assert_eq!(state.progress, 30);

        assert!(state.finish_extraction(job, &ExtractionOutcome::no_text()));
        assert!(!state.busy);
        assert_eq!(state.text, NO_TEXT_MESSAGE);
        assert!(state.can_extract());
        assert!(state.can_export());
        assert_eq!(state.active_job, None);
    }

    #[test]
    fn stale_job_events_are_ignored() {
        let mut state = AppState::default();
        state.select_image(Some(image("a.png")));
        let current = JobId::new();
        state.begin_extraction(current);

        let stale = JobId::new();
        assert!(!state.apply_progress(stale, 90));
        assert!(!state.finish_extraction(stale, &ExtractionOutcome::text("old")));
        assert!(state.busy);
        assert_eq!(state.progress, 0);
    }

    #[test]
    fn empty_result_keeps_export_disabled() {
        let mut state = AppState::default();
        state.select_image(Some(image("a.png")));
        let job = JobId::new();
        state.begin_extraction(job);
        state.finish_extraction(job, &ExtractionOutcome::text(""));
        assert!(!state.can_export());
    }

    #[tokio::test]
    async fn late_consumer_still_receives_terminal_result() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("page.png");
        RgbImage::from_pixel(24, 16, Rgb([240, 240, 240]))
            .save(&path)
            .unwrap();
        let svc = AppServices::init(AppConfig {
            tesseract_cmd: PathBuf::from("/nonexistent/ready-test/tesseract"),
            ..AppConfig::default()
        })
        .unwrap();

        let mut state = AppState::default();
        state.select_image(Some(LoadedImage {
            path: path.clone(),
            file_name: "page.png".into(),
            preview_data_url: String::new(),
        }));
        let mut handle = svc.start_extraction(state.extraction_request().unwrap());
        let job = handle.id();
        state.begin_extraction(job);

        // Nobody polls while the worker runs, as when the page is not mounted.
        tokio::time::sleep(std::time::Duration::from_millis(200)).await;

        let mut finished = 0;
        while let Some(event) = handle.next_event().await {
            if matches!(event, WorkerEvent::Finished(_)) {
                finished += 1;
            }
            assert!(state.apply_event(job, event));
        }

        assert_eq!(finished, 1);
        assert!(!state.busy);
        assert!(state.can_select());
        assert!(state.can_extract());
        assert!(state.text.starts_with("Error while extracting text: "));
        assert_eq!(state.active_job, None);
    }

    #[test]
    fn apply_event_routes_progress_and_outcome() {
        let mut state = AppState::default();
        state.select_image(Some(image("a.png")));
        let job = JobId::new();
        state.begin_extraction(job);

        assert!(state.apply_event(job, WorkerEvent::Progress(60)));
        assert_eq!(state.progress, 60);
        assert!(!state.apply_event(JobId::new(), WorkerEvent::Progress(90)));
        assert!(state.apply_event(job, WorkerEvent::Finished(ExtractionOutcome::text("done"))));
        assert_eq!(state.text, "done");
        assert!(!state.busy);
    }
}
