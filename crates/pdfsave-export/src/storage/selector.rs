// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Storage backend selection. The backend is chosen once from the platform
// version; `persist` is then plain dispatch with no fallback between backends.

use std::sync::Arc;

use pdfsave_bridge::traits::PlatformBridge;
use pdfsave_core::error::Result;
use pdfsave_core::{BackendKind, ExportConfig, LOG_TARGET, SavedLocation};
use pdfsave_document::RenderedDocument;
use tracing::info;

use super::{DirectFilesystemWriter, DocumentWriter, ScopedStorageWriter};

pub struct StorageSelector {
    writer: Box<dyn DocumentWriter>,
}

impl StorageSelector {
    /// Scoped storage at or above `config.scoped_storage_min`, direct
    /// filesystem below it.
    pub fn from_platform(bridge: Arc<dyn PlatformBridge>, config: &ExportConfig) -> Self {
        let version = bridge.platform_version();
        let writer: Box<dyn DocumentWriter> =
            if version.supports_scoped_storage(config.scoped_storage_min) {
                Box::new(ScopedStorageWriter::new(bridge, config))
            } else {
                Box::new(DirectFilesystemWriter::new(bridge, config))
            };

        info!(
            target: LOG_TARGET,
            %version,
            backend = %writer.kind(),
            "storage backend selected"
        );
        Self { writer }
    }

    pub fn backend(&self) -> BackendKind {
        self.writer.kind()
    }

    /// Persist through the selected backend. The document is `Closed` on return.
    pub fn persist(&self, document: &mut RenderedDocument) -> Result<SavedLocation> {
        self.writer.write(document)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::Ordering;

    use super::*;
    use crate::test_support::*;
    use pdfsave_core::error::PdfSaveError;
    use pdfsave_core::{PageLines, PlatformVersion};
    use pdfsave_document::PageRenderer;

    fn render() -> RenderedDocument {
        PageRenderer::default()
            .render_page(&PageLines::from(["A", "B", "C", "D"]))
            .unwrap()
    }

    #[test]
    fn modern_platform_routes_to_scoped_storage() {
        let bridge = Arc::new(FakeBridge::new(MODERN, "/unused"));
        let selector = StorageSelector::from_platform(bridge.clone(), &ExportConfig::default());
        assert_eq!(selector.backend(), BackendKind::ScopedStorage);

        let saved = selector.persist(&mut render()).unwrap();
        assert_eq!(saved.backend(), BackendKind::ScopedStorage);
        assert_eq!(bridge.insert_calls.load(Ordering::SeqCst), 1);
        assert_eq!(bridge.downloads_calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn threshold_version_is_modern() {
        let bridge = Arc::new(FakeBridge::new(PlatformVersion(29), "/unused"));
        let selector = StorageSelector::from_platform(bridge, &ExportConfig::default());
        assert_eq!(selector.backend(), BackendKind::ScopedStorage);
    }

    #[test]
    fn legacy_platform_routes_to_direct_filesystem() {
        let downloads = tempfile::tempdir().unwrap();
        let bridge = Arc::new(FakeBridge::new(LEGACY, downloads.path()));
        let selector = StorageSelector::from_platform(bridge.clone(), &ExportConfig::default());
        assert_eq!(selector.backend(), BackendKind::DirectFilesystem);

        let saved = selector.persist(&mut render()).unwrap();
        assert_eq!(saved.backend(), BackendKind::DirectFilesystem);
        assert_eq!(bridge.insert_calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn document_closed_after_every_injected_failure() {
        let cases: [fn(&mut FakeBridge); 4] = [
            |b| b.insert = InsertBehavior::NoHandle,
            |b| b.sink = SinkBehavior::Missing,
            |b| b.sink = SinkBehavior::FailsMidWrite,
            |b| b.sink = SinkBehavior::FailsOnClose,
        ];

        for inject in cases {
            let mut fake = FakeBridge::new(MODERN, "/unused");
            inject(&mut fake);
            let selector = StorageSelector::from_platform(Arc::new(fake), &ExportConfig::default());

            let mut doc = render();
            let result = selector.persist(&mut doc);
            assert!(matches!(
                result,
                Err(PdfSaveError::StorageUnavailable(_)
                    | PdfSaveError::SinkUnavailable(_)
                    | PdfSaveError::WriteFailed { .. })
            ));
            assert!(doc.is_closed());
        }
    }
}
