// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Scoped-storage writer: insert a `Download/MyPDFs` entry into the shared
// storage index, open a sink for the returned URI, stream the document.
//
// Failure kinds map one-to-one onto the stage that failed:
//   insert -> StorageUnavailable, open -> SinkUnavailable,
//   write or close -> WriteFailed.

use std::sync::Arc;

use pdfsave_bridge::traits::PlatformBridge;
use pdfsave_core::error::{PdfSaveError, Result};
use pdfsave_core::{BackendKind, ExportConfig, LOG_TARGET, MediaEntry, PlatformVersion, SavedLocation};
use pdfsave_document::RenderedDocument;
use tracing::{error, info, instrument};

use super::{DirectFilesystemWriter, DocumentWriter, fail};

const BACKEND: BackendKind = BackendKind::ScopedStorage;

pub struct ScopedStorageWriter {
    bridge: Arc<dyn PlatformBridge>,
    entry: MediaEntry,
    min_version: PlatformVersion,
    /// Used only when invoked on a platform without the shared index.
    fallback: DirectFilesystemWriter,
}

impl ScopedStorageWriter {
    pub fn new(bridge: Arc<dyn PlatformBridge>, config: &ExportConfig) -> Self {
        Self {
            fallback: DirectFilesystemWriter::new(Arc::clone(&bridge), config),
            bridge,
            entry: config.media_entry(),
            min_version: config.scoped_storage_min,
        }
    }
}

impl DocumentWriter for ScopedStorageWriter {
    fn kind(&self) -> BackendKind {
        BACKEND
    }

    #[instrument(skip_all, fields(backend = %BACKEND))]
    fn write(&self, document: &mut RenderedDocument) -> Result<SavedLocation> {
        let version = self.bridge.platform_version();
        if !version.supports_scoped_storage(self.min_version) {
            error!(
                target: LOG_TARGET,
                %version,
                required = %self.min_version,
                "scoped storage requires API level {} or higher, using direct filesystem",
                self.min_version.0
            );
            return self.fallback.write(document);
        }

        let mut document = document.close_on_drop();
        document.begin_opening();

        let uri = match self.bridge.insert_download(&self.entry) {
            Ok(Some(uri)) => uri,
            Ok(None) => {
                return Err(fail(
                    BACKEND,
                    PdfSaveError::StorageUnavailable("index insert returned no handle".into()),
                ));
            }
            Err(e) => {
                return Err(fail(BACKEND, PdfSaveError::StorageUnavailable(e.to_string())));
            }
        };

        let mut sink = match self.bridge.open_output(&uri) {
            Ok(Some(sink)) => sink,
            Ok(None) => {
                return Err(fail(BACKEND, PdfSaveError::SinkUnavailable(uri.to_string())));
            }
            Err(e) => {
                return Err(fail(BACKEND, PdfSaveError::SinkUnavailable(format!("{uri}: {e}"))));
            }
        };

        document
            .write_to(sink.as_mut())
            .map_err(|e| fail(BACKEND, PdfSaveError::write_failed(BACKEND, uri.as_str(), e)))?;
        sink.finish()
            .map_err(|e| fail(BACKEND, PdfSaveError::write_failed(BACKEND, uri.as_str(), e)))?;

        info!(
            target: LOG_TARGET,
            %uri,
            relative_path = %self.entry.relative_path,
            bytes = document.len(),
            "PDF saved"
        );
        Ok(SavedLocation::scoped(uri, &self.entry, document.len()))
    }
}
