// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// User-facing toast messages for every export outcome.
//
// Permission prompts use short toasts; save outcomes use long ones so the
// resolved location stays readable.

use crate::error::PdfSaveError;
use crate::types::{BackendKind, Notification, SavedLocation, SavedTarget};

/// Shown before the OS dialog when the user previously denied the permission.
pub const PERMISSION_RATIONALE: &str = "Storage permission is required to save PDF";

/// Convert a successful save into the toast the user sees.
pub fn notification_for_success(location: &SavedLocation) -> Notification {
    match &location.target {
        SavedTarget::Scoped { relative_path, .. } => {
            let folder = relative_path
                .strip_prefix("Download/")
                .map(|rest| format!("Downloads/{rest}"))
                .unwrap_or_else(|| relative_path.clone());
            Notification::long(format!("PDF saved in {folder} folder."))
        }
        SavedTarget::Filesystem { path } => {
            Notification::long(format!("PDF saved at: {}", path.display()))
        }
    }
}

/// The rationale toast.
pub fn permission_rationale() -> Notification {
    Notification::short(PERMISSION_RATIONALE)
}

/// Convert a `PdfSaveError` into the toast the user sees.
pub fn notification_for(err: &PdfSaveError) -> Notification {
    match err {
        PdfSaveError::PermissionDenied => Notification::short("Permission denied to save PDF"),

        PdfSaveError::StorageUnavailable(_) => {
            Notification::long("Failed to save PDF in MediaStore.")
        }

        PdfSaveError::SinkUnavailable(_) => Notification::long("Failed to save PDF."),

        PdfSaveError::WriteFailed {
            backend: BackendKind::ScopedStorage,
            source,
            ..
        } => Notification::long(format!("Error saving PDF: {source}")),

        PdfSaveError::WriteFailed {
            backend: BackendKind::DirectFilesystem,
            source,
            ..
        } => Notification::long(format!("Failed to save PDF: {source}")),

        PdfSaveError::ExportInProgress => Notification::short("A PDF is already being saved"),

        other => Notification::long(format!("Error saving PDF: {other}")),
    }
}
