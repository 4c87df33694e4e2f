// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Direct-filesystem writer for legacy platforms.
//
// Writes `<public Downloads>/MyPDFs/textview_content.pdf`, creating `MyPDFs`
// when absent. The file name is fixed, so every export overwrites the last.

use std::fs::File;
use std::sync::Arc;

use pdfsave_bridge::traits::PlatformBridge;
use pdfsave_core::error::{PdfSaveError, Result};
use pdfsave_core::{BackendKind, ExportConfig, LOG_TARGET, SavedLocation};
use pdfsave_document::RenderedDocument;
use tracing::{debug, info, instrument};

use super::{DocumentWriter, fail};

const BACKEND: BackendKind = BackendKind::DirectFilesystem;

pub struct DirectFilesystemWriter {
    /// Asked for the public Downloads directory on every write.
    bridge: Arc<dyn PlatformBridge>,
    subdir: String,
    file_name: String,
}

impl DirectFilesystemWriter {
    pub fn new(bridge: Arc<dyn PlatformBridge>, config: &ExportConfig) -> Self {
        Self {
            bridge,
            subdir: config.legacy_subdir.clone(),
            file_name: config.file_name.clone(),
        }
    }
}

impl DocumentWriter for DirectFilesystemWriter {
    fn kind(&self) -> BackendKind {
        BACKEND
    }

    #[instrument(skip_all, fields(backend = %BACKEND))]
    fn write(&self, document: &mut RenderedDocument) -> Result<SavedLocation> {
        let mut document = document.close_on_drop();
        document.begin_opening();

        let downloads = self.bridge.public_downloads_dir().map_err(|e| {
            fail(
                BACKEND,
                PdfSaveError::write_failed(BACKEND, "Downloads", std::io::Error::other(e.to_string())),
            )
        })?;

        let dir = downloads.join(&self.subdir);
        if !dir.exists() {
            std::fs::create_dir_all(&dir).map_err(|e| {
                fail(BACKEND, PdfSaveError::write_failed(BACKEND, dir.display().to_string(), e))
            })?;
            debug!(target: LOG_TARGET, dir = %dir.display(), "created PDF directory");
        }

        let path = dir.join(&self.file_name);
        let target = path.display().to_string();

        let mut file = File::create(&path)
            .map_err(|e| fail(BACKEND, PdfSaveError::write_failed(BACKEND, &target, e)))?;
        document
            .write_to(&mut file)
            .map_err(|e| fail(BACKEND, PdfSaveError::write_failed(BACKEND, &target, e)))?;
        drop(file);

        info!(target: LOG_TARGET, path = %target, bytes = document.len(), "PDF saved");
        Ok(SavedLocation::filesystem(path, document.len()))
    }
}
