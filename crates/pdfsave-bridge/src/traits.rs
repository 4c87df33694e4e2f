// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Platform-agnostic trait definitions for native capabilities.

use std::io::Write;
use std::path::PathBuf;

use pdfsave_core::error::Result;
use pdfsave_core::{ContentUri, MediaEntry, Notification, PlatformVersion};

use crate::permission::PermissionRequest;

/// Unified bridge that groups all native capabilities the export needs.
pub trait PlatformBridge:
    NativeMediaIndex + NativePermissions + NativeNotifier + NativeStorageDirs + Send + Sync
{
    /// Human-readable platform name (e.g. "Android").
    fn platform_name(&self) -> &str;

    /// API level of the running OS.
    fn platform_version(&self) -> PlatformVersion;
}

/// Byte stream bound to a shared-storage entry.
///
/// `finish` closes the stream and reports a failed close. A stream dropped
/// without `finish` is still closed, but a close error is only logged.
pub trait MediaStream: Write + Send {
    fn finish(self: Box<Self>) -> std::io::Result<()>;
}

pub type MediaSink = Box<dyn MediaStream>;

/// Shared-storage index (Android `MediaStore.Downloads`).
pub trait NativeMediaIndex {
    /// Register a new entry. `Ok(None)` means the index returned no handle.
    fn insert_download(&self, entry: &MediaEntry) -> Result<Option<ContentUri>>;

    /// Open a byte sink for a previously inserted entry. `Ok(None)` means the
    /// platform returned no stream for the handle.
    fn open_output(&self, uri: &ContentUri) -> Result<Option<MediaSink>>;
}

/// Grant state of a runtime permission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionStatus {
    Granted,
    Denied,
}

impl PermissionStatus {
    pub fn from_granted(granted: bool) -> Self {
        if granted { Self::Granted } else { Self::Denied }
    }

    pub fn is_granted(self) -> bool {
        self == Self::Granted
    }
}

/// The broad legacy write-storage permission.
pub trait NativePermissions {
    /// Current grant state of `WRITE_EXTERNAL_STORAGE`.
    fn check_write_storage(&self) -> PermissionStatus;

    /// Whether the OS wants a rationale shown before asking again.
    fn should_show_rationale(&self) -> bool;

    /// Show the OS permission dialog. The returned request resolves when the
    /// platform delivers the user's answer.
    fn request_write_storage(&self) -> Result<PermissionRequest>;
}

/// Transient on-screen notifications.
pub trait NativeNotifier {
    fn show_notification(&self, notification: &Notification);
}

/// Well-known public directories.
pub trait NativeStorageDirs {
    /// The public Downloads directory.
    fn public_downloads_dir(&self) -> Result<PathBuf>;
}
