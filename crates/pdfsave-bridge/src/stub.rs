// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Stub bridge for desktop/CI builds where Android APIs are unavailable.
//
// Behaves like a legacy platform: there is no shared-storage index, the write
// permission is always granted, and saves go straight to a Downloads folder
// on the local filesystem. Toasts are written to the log.

use std::path::PathBuf;

use pdfsave_core::error::{PdfSaveError, Result};
use pdfsave_core::{ContentUri, LOG_TARGET, MediaEntry, Notification, PlatformVersion};

use crate::permission::PermissionRequest;
use crate::traits::*;

/// Overrides the Downloads directory used by the stub.
pub const DOWNLOADS_DIR_ENV: &str = "PDFSAVE_DOWNLOADS_DIR";

/// Overrides the reported API level (e.g. to exercise the scoped path).
pub const PLATFORM_API_ENV: &str = "PDFSAVE_PLATFORM_API";

/// API level reported when nothing overrides it: the last legacy release.
const DEFAULT_API_LEVEL: u32 = 28;

/// Desktop bridge emulating a legacy-storage device.
#[derive(Debug, Clone)]
pub struct StubBridge {
    downloads_dir: Option<PathBuf>,
    version: PlatformVersion,
}

impl StubBridge {
    pub fn new(downloads_dir: Option<PathBuf>, version: PlatformVersion) -> Self {
        Self {
            downloads_dir,
            version,
        }
    }

    /// Configure from `PDFSAVE_DOWNLOADS_DIR` and `PDFSAVE_PLATFORM_API`.
    pub fn from_env() -> Self {
        let downloads_dir = std::env::var_os(DOWNLOADS_DIR_ENV).map(PathBuf::from);
        let version = std::env::var(PLATFORM_API_ENV)
            .ok()
            .and_then(|v| v.trim().parse().ok())
            .map(PlatformVersion)
            .unwrap_or(PlatformVersion(DEFAULT_API_LEVEL));
        Self::new(downloads_dir, version)
    }
}

impl PlatformBridge for StubBridge {
    fn platform_name(&self) -> &str {
        "Desktop (stub)"
    }

    fn platform_version(&self) -> PlatformVersion {
        self.version
    }
}

impl NativeMediaIndex for StubBridge {
    fn insert_download(&self, _entry: &MediaEntry) -> Result<Option<ContentUri>> {
        tracing::warn!("NativeMediaIndex::insert_download called on stub bridge");
        Err(PdfSaveError::PlatformUnavailable)
    }

    fn open_output(&self, _uri: &ContentUri) -> Result<Option<MediaSink>> {
        tracing::warn!("NativeMediaIndex::open_output called on stub bridge");
        Err(PdfSaveError::PlatformUnavailable)
    }
}

impl NativePermissions for StubBridge {
    fn check_write_storage(&self) -> PermissionStatus {
        PermissionStatus::Granted
    }

    fn should_show_rationale(&self) -> bool {
        false
    }

    fn request_write_storage(&self) -> Result<PermissionRequest> {
        Ok(PermissionRequest::resolved(PermissionStatus::Granted))
    }
}

impl NativeNotifier for StubBridge {
    fn show_notification(&self, notification: &Notification) {
        tracing::info!(
            target: LOG_TARGET,
            duration = ?notification.duration,
            "toast: {}",
            notification.text
        );
    }
}

impl NativeStorageDirs for StubBridge {
    fn public_downloads_dir(&self) -> Result<PathBuf> {
        if let Some(dir) = &self.downloads_dir {
            return Ok(dir.clone());
        }
        if let Ok(xdg) = std::env::var("XDG_DOWNLOAD_DIR") {
            return Ok(PathBuf::from(xdg));
        }
        if let Ok(home) = std::env::var("HOME") {
            return Ok(PathBuf::from(home).join("Downloads"));
        }
        Err(PdfSaveError::Bridge(
            "no Downloads directory: set PDFSAVE_DOWNLOADS_DIR".into(),
        ))
    }
}
