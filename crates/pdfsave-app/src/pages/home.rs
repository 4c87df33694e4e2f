// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// The single screen: four text fields and a Save button.

use dioxus::prelude::*;

use pdfsave_core::LINE_COUNT;

use crate::services::export_service::ExportService;
use crate::state::{AppState, SaveStatus};

#[component]
pub fn Home() -> Element {
    let svc = use_context::<ExportService>();
    let mut state = use_context::<Signal<AppState>>();

    let saving = state.read().status.is_saving() || svc.is_busy();
    let status_msg = state.read().status.message().map(str::to_owned);
    let footer = format!(
        "{} · {} · {}",
        svc.platform(),
        svc.backend(),
        svc.config().file_name
    );

    rsx! {
        div { style: "display: flex; flex-direction: column; gap: 12px;",
            h1 { "PDF Save" }

            for i in 0..LINE_COUNT {
                input {
                    key: "{i}",
                    style: "padding: 12px; font-size: 16px; border: 1px solid #ccc; border-radius: 8px;",
                    placeholder: format!("Line {}", i + 1),
                    value: state.read().lines[i].clone(),
                    oninput: move |evt| state.write().lines[i] = evt.value(),
                }
            }

            button {
                style: "padding: 12px; border-radius: 8px; border: none; background: #007aff; color: white; font-size: 16px;",
                disabled: saving,
                onclick: {
                    let svc = svc.clone();
                    move |_| {
                        let lines = state.read().snapshot();
                        state.write().status = SaveStatus::Saving;
                        let svc = svc.clone();
                        spawn(async move {
                            let result = svc.save(lines).await;
                            state.write().status = SaveStatus::from_result(&result);
                        });
                    }
                },
                "Save"
            }

            if let Some(msg) = status_msg {
                p { style: "color: #666; font-size: 14px; text-align: center;", "{msg}" }
            }

            p { style: "color: #999; font-size: 12px; text-align: center;",
                "{footer}"
            }
        }
    }
}
