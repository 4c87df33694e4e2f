// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Permission gate for the legacy write-storage permission.
//
// Scoped-storage platforms never need it. On legacy platforms the request is
// the workflow's only suspension point: `ensure_granted` awaits the OS answer.

use std::sync::Arc;

use pdfsave_bridge::traits::{PermissionStatus, PlatformBridge};
use pdfsave_core::error::{PdfSaveError, Result};
use pdfsave_core::human_errors::permission_rationale;
use pdfsave_core::{ExportConfig, LOG_TARGET, PlatformVersion};
use tracing::{debug, info, warn};

pub struct PermissionGate {
    bridge: Arc<dyn PlatformBridge>,
    scoped_storage_min: PlatformVersion,
}

impl PermissionGate {
    pub fn new(bridge: Arc<dyn PlatformBridge>, config: &ExportConfig) -> Self {
        Self {
            bridge,
            scoped_storage_min: config.scoped_storage_min,
        }
    }

    /// Always true on scoped-storage platforms; otherwise the current grant.
    pub fn has_write_permission(&self) -> bool {
        let granted = self
            .bridge
            .platform_version()
            .supports_scoped_storage(self.scoped_storage_min)
            || self.bridge.check_write_storage().is_granted();
        debug!(target: LOG_TARGET, granted, "permission checked");
        granted
    }

    /// Show the rationale if the OS asks for one, then open the permission
    /// dialog and wait for the answer.
    pub async fn request_write_permission(&self) -> Result<PermissionStatus> {
        if self.bridge.should_show_rationale() {
            info!(target: LOG_TARGET, "showing permission rationale");
            self.bridge.show_notification(&permission_rationale());
        }

        info!(target: LOG_TARGET, "permission requested");
        let request = self.bridge.request_write_storage()?;
        let status = request.outcome().await;

        match status {
            PermissionStatus::Granted => info!(target: LOG_TARGET, "permission granted"),
            PermissionStatus::Denied => warn!(target: LOG_TARGET, "permission denied"),
        }
        Ok(status)
    }

    /// `Ok(())` once the permission is held, `PermissionDenied` otherwise.
    pub async fn ensure_granted(&self) -> Result<()> {
        if self.has_write_permission() {
            return Ok(());
        }
        match self.request_write_permission().await? {
            PermissionStatus::Granted => Ok(()),
            PermissionStatus::Denied => Err(PdfSaveError::PermissionDenied),
        }
    }
}
