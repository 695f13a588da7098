// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Engine page: which Tesseract binary is used, its version, and the installed
// language data.

use dioxus::prelude::*;

use ready_core::Language;

use crate::services::app_services::{AppServices, EngineStatus};

#[component]
pub fn Engine() -> Element {
    let svc = use_context::<AppServices>();
    let mut status = use_signal(|| Option::<EngineStatus>::None);
    let mut checking = use_signal(|| false);

    let mut refresh = move |svc: AppServices| {
        checking.set(true);
        spawn(async move {
            match tokio::task::spawn_blocking(move || svc.engine_status()).await {
                Ok(result) => status.set(Some(result)),
                Err(e) => tracing::error!(error = %e, "engine status probe aborted"),
            }
            checking.set(false);
        });
    };

    use_hook({
        let svc = svc.clone();
        move || refresh(svc)
    });

    rsx! {
        div {
            h1 { "Engine" }
            p { style: "color: #666;", "Tesseract OCR installation used for text recognition." }

            match &*status.read() {
                None => rsx! {
                    p { style: "color: #007aff; margin: 32px 0; text-align: center;", "Checking Tesseract..." }
                },
                Some(info) => rsx! {
                    section { style: "margin: 16px 0;",
                        InfoRow { label: "Executable", value: info.command.clone() }
                        match &info.version {
                            Ok(version) => rsx! { InfoRow { label: "Version", value: version.clone() } },
                            Err(message) => rsx! { ErrorBox { title: "Version unavailable", message: message.clone() } },
                        }
                    }

                    section { style: "margin: 16px 0;",
                        h3 { "Installed languages" }
                        match &info.languages {
                            Ok(codes) => rsx! {
                                ul { style: "list-style: none; padding: 0; margin: 0;",
                                    for code in codes.iter() {
                                        li { style: "padding: 6px 0; border-bottom: 1px solid #f0f0f0;", "{code}" }
                                    }
                                }
                                for lang in missing_presets(codes) {
                                    p { style: "color: #ff9500; font-size: 14px;",
                                        "Missing data for {lang.label()}; that option will fail until the language pack is installed."
                                    }
                                }
                            },
                            Err(message) => rsx! { ErrorBox { title: "Languages unavailable", message: message.clone() } },
                        }
                    }
                },
            }

            button {
                style: "width: 100%; padding: 12px; border-radius: 8px; border: 1px solid #007aff; color: #007aff; background: white; margin-top: 8px;",
                disabled: *checking.read(),
                onclick: {
                    let svc = svc.clone();
                    move |_| refresh(svc.clone())
                },
                "Check again"
            }
        }
    }
}

/// Presets whose traineddata is not in `installed`.
fn missing_presets(installed: &[String]) -> Vec<Language> {
    Language::ALL
        .into_iter()
        .filter(|lang| {
            !lang
                .components()
                .all(|code| installed.iter().any(|have| have == code))
        })
        .collect()
}

#[component]
fn InfoRow(label: &'static str, value: String) -> Element {
    rsx! {
        div { style: "display: flex; justify-content: space-between; padding: 12px 0; border-bottom: 1px solid #f0f0f0;",
            span { "{label}" }
            span { style: "color: #666; font-family: monospace;", "{value}" }
        }
    }
}

#[component]
fn ErrorBox(title: &'static str, message: String) -> Element {
    rsx! {
        div { style: "background: #f8d7da; color: #721c24; border-radius: 8px; padding: 12px; margin: 8px 0; white-space: pre-wrap;",
            strong { "{title}" }
            p { style: "margin: 4px 0 0;", "{message}" }
        }
    }
}
