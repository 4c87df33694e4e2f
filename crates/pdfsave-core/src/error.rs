// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for PDF Save.

use thiserror::Error;

use crate::types::BackendKind;

/// Top-level error type for all PDF Save operations.
///
/// Every variant is terminal for the export attempt that produced it. Nothing
/// in the workflow retries automatically.
#[derive(Debug, Error)]
pub enum PdfSaveError {
    // -- Export taxonomy --
    #[error("storage permission denied")]
    PermissionDenied,

    #[error("shared storage index unavailable: {0}")]
    StorageUnavailable(String),

    #[error("no writable stream for {0}")]
    SinkUnavailable(String),

    #[error("writing {target} failed: {source}")]
    WriteFailed {
        backend: BackendKind,
        target: String,
        #[source]
        source: std::io::Error,
    },

    #[error("an export is already in progress")]
    ExportInProgress,

    // -- Document errors --
    #[error("PDF operation failed: {0}")]
    PdfError(String),

    // -- Storage / persistence --
    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // -- Platform bridge --
    #[error("platform bridge error: {0}")]
    Bridge(String),

    #[error("feature not available on this platform")]
    PlatformUnavailable,
}

impl PdfSaveError {
    /// Build a [`PdfSaveError::WriteFailed`] for the given backend and target.
    pub fn write_failed(
        backend: BackendKind,
        target: impl Into<String>,
        source: std::io::Error,
    ) -> Self {
        Self::WriteFailed {
            backend,
            target: target.into(),
            source,
        }
    }

    /// Short machine-friendly name of the error kind, used as a log field.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::PermissionDenied => "permission_denied",
            Self::StorageUnavailable(_) => "storage_unavailable",
            Self::SinkUnavailable(_) => "sink_unavailable",
            Self::WriteFailed { .. } => "write_failed",
            Self::ExportInProgress => "export_in_progress",
            Self::PdfError(_) => "pdf",
            Self::Io(_) => "io",
            Self::Serialization(_) => "serialization",
            Self::Bridge(_) => "bridge",
            Self::PlatformUnavailable => "platform_unavailable",
        }
    }
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, PdfSaveError>;
