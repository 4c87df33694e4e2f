// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Storage backends. Each writer persists one `RenderedDocument` and leaves it
// `Closed` whatever happens.

pub mod direct;
pub mod scoped;
pub mod selector;

pub use direct::DirectFilesystemWriter;
pub use scoped::ScopedStorageWriter;
pub use selector::StorageSelector;

use pdfsave_core::error::{PdfSaveError, Result};
use pdfsave_core::{BackendKind, LOG_TARGET, SavedLocation};
use pdfsave_document::RenderedDocument;
use tracing::error;

/// A storage strategy for finished documents.
pub trait DocumentWriter: Send + Sync {
    fn kind(&self) -> BackendKind;

    /// Persist the whole document. On return the document is `Closed`.
    fn write(&self, document: &mut RenderedDocument) -> Result<SavedLocation>;
}

/// Log a writer failure with its cause and hand the error back.
pub(crate) fn fail(backend: BackendKind, err: PdfSaveError) -> PdfSaveError {
    error!(target: LOG_TARGET, %backend, kind = err.kind(), error = %err, "storage write failed");
    err
}
