// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Application service: loads the persisted configuration, picks the platform
// bridge, and owns the export controller shared by every component.

use std::path::Path;
use std::sync::Arc;

use pdfsave_bridge::traits::PlatformBridge;
use pdfsave_core::config::CONFIG_FILE;
use pdfsave_core::error::Result;
use pdfsave_core::{BackendKind, ExportConfig, LINE_COUNT, LOG_TARGET, PageLines, SavedLocation};
use pdfsave_export::ExportController;
use tracing::{info, warn};

use super::data_dir;

/// Cheaply cloneable handle for `use_context::<ExportService>()`.
#[derive(Clone)]
pub struct ExportService {
    controller: Arc<ExportController>,
    config: Arc<ExportConfig>,
    platform: String,
}

impl ExportService {
    /// Initialise against the real data directory and platform bridge.
    pub fn init() -> Self {
        Self::with_bridge(&data_dir::data_dir(), pdfsave_bridge::platform_bridge())
    }

    pub fn with_bridge(dir: &Path, bridge: Arc<dyn PlatformBridge>) -> Self {
        let config = ExportConfig::load_or_default(dir);
        if !dir.join(CONFIG_FILE).exists() {
            if let Err(e) = config.persist(dir) {
                warn!(target: LOG_TARGET, error = %e, "could not write default config");
            }
        }

        let platform = format!("{} ({})", bridge.platform_name(), bridge.platform_version());
        let controller = ExportController::new(bridge, &config);
        info!(
            target: LOG_TARGET,
            data_dir = %dir.display(),
            %platform,
            backend = %controller.backend(),
            "export service initialised"
        );

        Self {
            controller: Arc::new(controller),
            config: Arc::new(config),
            platform,
        }
    }

    /// Export the four field values as one PDF page.
    pub async fn save(&self, lines: [String; LINE_COUNT]) -> Result<SavedLocation> {
        self.controller.save(PageLines::new(lines)).await
    }

    pub fn is_busy(&self) -> bool {
        self.controller.is_busy()
    }

    pub fn backend(&self) -> BackendKind {
        self.controller.backend()
    }

    pub fn config(&self) -> &ExportConfig {
        &self.config
    }

    pub fn platform(&self) -> &str {
        &self.platform
    }
}
