// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Ready: extract text from images with Tesseract OCR.
//
// Entry point. Initialises logging, resolves configuration, builds the
// backend services, and launches the Dioxus desktop window.

mod pages;
mod services;
mod state;

use dioxus::desktop::{Config, LogicalSize, WindowBuilder};
use dioxus::prelude::*;

use pages::engine::Engine;
use pages::extract::Extract;

use ready_core::AppConfig;
use ready_core::error::Result;
use services::app_services::AppServices;
use services::desktop;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    tracing::info!("Ready starting");

    let svc = match startup() {
        Ok(svc) => svc,
        Err(e) => {
            tracing::error!(error = %e, "startup failed");
            desktop::show_startup_error(&e);
            std::process::exit(1);
        }
    };

    let window = WindowBuilder::new()
        .with_title(state::DEFAULT_TITLE)
        .with_min_inner_size(LogicalSize::new(900.0, 650.0))
        .with_inner_size(LogicalSize::new(1100.0, 750.0));

    dioxus::LaunchBuilder::desktop()
        .with_cfg(Config::new().with_window(window))
        .with_context(svc)
        .launch(app);
}

/// Resolve configuration and build services. The engine probe only logs:
/// a missing Tesseract shows up later as an extraction error.
fn startup() -> Result<AppServices> {
    let config = AppConfig::from_env();
    let svc = AppServices::init(config)?;
    svc.probe_engine_version();
    Ok(svc)
}

/// Top-level route enum.
#[derive(Debug, Clone, Routable, PartialEq)]
enum Route {
    #[layout(TabLayout)]
    #[route("/")]
    Extract {},
    #[route("/engine")]
    Engine {},
}

/// Root component.
fn app() -> Element {
    let svc = use_context::<AppServices>();
    use_context_provider(|| Signal::new(state::AppState::new(svc.config())));

    rsx! {
        Router::<Route> {}
    }
}

/// Top tab bar wrapping both pages.
#[component]
fn TabLayout() -> Element {
    rsx! {
        div { class: "app-container",
            style: "display: flex; flex-direction: column; height: 100vh; font-family: system-ui, -apple-system, sans-serif;",

            nav { class: "tab-bar",
                style: "display: flex; gap: 24px; padding: 8px 16px; border-bottom: 1px solid #e0e0e0; background: #fafafa;",
                TabButton { to: Route::Extract {}, label: "Extract" }
                TabButton { to: Route::Engine {}, label: "Engine" }
            }

            div { class: "page-content",
                style: "flex: 1; overflow-y: auto; padding: 16px;",
                Outlet::<Route> {}
            }
        }
    }
}

#[component]
fn TabButton(to: Route, label: &'static str) -> Element {
    rsx! {
        Link { to: to,
            style: "text-decoration: none; color: #333; font-size: 14px; padding: 4px 0;",
            "{label}"
        }
    }
}
