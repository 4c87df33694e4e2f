// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF Save — index-card PDF exporter
//
// Entry point. Initialises logging, the export service and screen state, and
// launches the Dioxus UI.

mod pages;
mod services;
mod state;

use dioxus::prelude::*;

use pages::home::Home;
use services::export_service::ExportService;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    tracing::info!(target: pdfsave_core::LOG_TARGET, "PDF Save starting");

    dioxus::launch(app);
}

/// Root component.
fn app() -> Element {
    let svc = use_hook(ExportService::init);

    use_context_provider(|| svc.clone());
    use_context_provider(|| Signal::new(state::AppState::new()));

    rsx! {
        div { class: "app-container",
            style: "display: flex; flex-direction: column; height: 100vh; padding: 16px; font-family: system-ui, -apple-system, sans-serif;",
            Home {}
        }
    }
}
