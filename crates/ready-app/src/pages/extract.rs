// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Extract page: pick an image, tune preprocessing, run OCR, copy or save.

use dioxus::prelude::*;

use ready_core::Adjustments;
use ready_core::Language;
use ready_core::human_errors::{IMAGE_LOAD_WARNING, humanize_error};

use crate::services::app_services::AppServices;
use crate::services::desktop;
use crate::state::AppState;

const PLACEHOLDER_IDLE: &str = "Extracted text will appear here";
const PLACEHOLDER_BUSY: &str = "Extracting... please wait...";

#[component]
pub fn Extract() -> Element {
    let mut state = use_context::<Signal<AppState>>();
    let svc = use_context::<AppServices>();

    let (busy, progress, preprocess, sliders_enabled) = {
        let s = state.read();
        (s.busy, s.progress, s.preprocess, s.adjustments_enabled())
    };
    let (can_select, can_extract, can_export) = {
        let s = state.read();
        (s.can_select(), s.can_extract(), s.can_export())
    };
    let language = state.read().language;
    let brightness = state.read().brightness;
    let contrast = state.read().contrast;
    let text = state.read().text.clone();
    let preview = state
        .read()
        .image
        .as_ref()
        .map(|image| (image.preview_data_url.clone(), image.file_name.clone()));
    let placeholder = if busy { PLACEHOLDER_BUSY } else { PLACEHOLDER_IDLE };

    rsx! {
        div { style: "display: flex; flex-direction: column; height: 100%;",
            header { style: "margin-bottom: 12px;",
                h1 { style: "margin: 0;", "Text recognition" }
                p { style: "color: #666; margin: 4px 0 0;",
                    "Extract text from a photo or scan with Tesseract OCR."
                }
            }

            div { style: "display: flex; gap: 16px; flex: 1; min-height: 0;",
                // Left column: image and options
                div { style: "flex: 0 0 440px; display: flex; flex-direction: column; gap: 12px;",
                    div { style: "height: 330px; border: 1px solid #ddd; border-radius: 8px; background: #f7f7f7; display: flex; align-items: center; justify-content: center; overflow: hidden;",
                        if let Some((url, name)) = preview {
                            img { src: "{url}", alt: "{name}", style: "max-width: 100%; max-height: 100%;" }
                        } else {
                            span { style: "color: #aaa;", "No image selected" }
                        }
                    }

                    button {
                        style: "padding: 12px; border-radius: 8px; border: 2px dashed #007aff; color: #007aff; background: white; font-size: 15px;",
                        disabled: !can_select,
                        onclick: {
                            let svc = svc.clone();
                            move |_| {
                                let Some(path) = desktop::pick_image() else {
                                    return;
                                };
                                match svc.load_image(&path) {
                                    Ok(image) => {
                                        state.write().select_image(Some(image));
                                    }
                                    Err(e) => {
                                        tracing::warn!(path = %path.display(), error = %e, "selected file is not a readable image");
                                        state.write().select_image(None);
                                        desktop::show_warning("Error", IMAGE_LOAD_WARNING);
                                    }
                                }
                                let title = state.read().window_title();
                                dioxus::desktop::window().set_title(&title);
                            }
                        },
                        "Select an image"
                    }

                    section { style: "border: 1px solid #eee; border-radius: 8px; padding: 12px;",
                        h3 { style: "margin: 0 0 8px;", "Options" }

                        div { style: "display: flex; justify-content: space-between; align-items: center; padding: 6px 0;",
                            span { "Language" }
                            select {
                                style: "padding: 4px 8px; border: 1px solid #ccc; border-radius: 4px;",
                                disabled: busy,
                                onchange: move |evt| {
                                    if let Ok(lang) = evt.value().parse::<Language>() {
                                        state.write().language = lang;
                                    }
                                },
                                for lang in Language::ALL {
                                    option {
                                        value: lang.code(),
                                        selected: lang == language,
                                        {lang.label()}
                                    }
                                }
                            }
                        }

                        div { style: "display: flex; justify-content: space-between; align-items: center; padding: 6px 0;",
                            span { "Apply preprocessing" }
                            input {
                                r#type: "checkbox",
                                checked: preprocess,
                                disabled: busy,
                                onchange: move |evt| {
                                    state.write().preprocess = evt.checked();
                                },
                            }
                        }

                        SliderRow {
                            label: "Brightness",
                            value: brightness,
                            enabled: sliders_enabled,
                            on_change: move |v: i32| state.write().set_brightness(v),
                        }
                        SliderRow {
                            label: "Contrast",
                            value: contrast,
                            enabled: sliders_enabled,
                            on_change: move |v: i32| state.write().set_contrast(v),
                        }
                    }

                    button {
                        style: "padding: 14px; border-radius: 8px; border: none; background: #007aff; color: white; font-size: 16px; font-weight: bold;",
                        disabled: !can_extract,
                        onclick: {
                            let svc = svc.clone();
                            move |_| {
                                let request = state.read().extraction_request();
                                let Some(request) = request else {
                                    return;
                                };
                                let mut handle = svc.start_extraction(request);
                                let job = handle.id();
                                state.write().begin_extraction(job);

                                // Owned by the root scope so switching tabs mid-job
                                // still delivers the result.
                                spawn_forever(async move {
                                    while let Some(event) = handle.next_event().await {
                                        state.write().apply_event(job, event);
                                    }
                                });
                            }
                        },
                        "Extract text"
                    }
                }

                // Right column: result
                div { style: "flex: 1; display: flex; flex-direction: column; gap: 8px; min-width: 0;",
                    if busy {
                        div { style: "display: flex; align-items: center; gap: 8px;",
                            progress { style: "flex: 1; height: 16px;", max: "100", value: "{progress}" }
                            span { style: "color: #666; font-size: 13px; width: 40px; text-align: right;", "{progress}%" }
                        }
                    }

                    textarea {
                        style: "flex: 1; min-height: 300px; padding: 12px; font-family: monospace; font-size: 14px; border: 1px solid #ccc; border-radius: 8px; resize: none;",
                        readonly: true,
                        placeholder: placeholder,
                        value: "{text}",
                    }

                    div { style: "display: flex; gap: 8px;",
                        button {
                            style: "flex: 1; padding: 12px; border-radius: 8px; border: 1px solid #007aff; color: #007aff; background: white;",
                            disabled: !can_export,
                            onclick: move |_| {
                                let text = state.read().text.clone();
                                spawn(async move {
                                    match desktop::copy_to_clipboard(text).await {
                                        Ok(()) => desktop::show_info("Information", "Text copied to the clipboard."),
                                        Err(e) => {
                                            tracing::warn!(error = %e, "clipboard write failed");
                                            desktop::show_error(&humanize_error(&e));
                                        }
                                    }
                                });
                            },
                            "Copy text"
                        }
                        button {
                            style: "flex: 1; padding: 12px; border-radius: 8px; border: none; background: #34c759; color: white;",
                            disabled: !can_export,
                            onclick: {
                                let svc = svc.clone();
                                move |_| {
                                    let text = state.read().text.clone();
                                    if text.is_empty() {
                                        return;
                                    }
                                    let Some(path) = desktop::pick_save_path() else {
                                        return;
                                    };
                                    match svc.save_text(&path, &text) {
                                        Ok(()) => desktop::show_info(
                                            "Information",
                                            &format!("Text saved successfully.\n\nThe file was saved to:\n{}", path.display()),
                                        ),
                                        Err(e) => desktop::show_error(&humanize_error(&e)),
                                    }
                                }
                            },
                            "Save as TXT"
                        }
                    }
                }
            }
        }
    }
}

/// Labelled `-50..=50` slider with its current value.
#[component]
fn SliderRow(label: &'static str, value: i32, enabled: bool, on_change: EventHandler<i32>) -> Element {
    let min = Adjustments::MIN;
    let max = Adjustments::MAX;
    let value_colour = if enabled { "inherit" } else { "#aaa" };
    rsx! {
        div { style: "display: flex; align-items: center; gap: 8px; padding: 6px 0;",
            span { style: "width: 90px;", "{label}" }
            input {
                r#type: "range",
                style: "flex: 1;",
                min: "{min}",
                max: "{max}",
                value: "{value}",
                disabled: !enabled,
                oninput: move |evt| {
                    if let Ok(v) = evt.value().parse::<i32>() {
                        on_change.call(v);
                    }
                },
            }
            span { style: "width: 32px; text-align: right; color: {value_colour};", "{value}" }
        }
    }
}
