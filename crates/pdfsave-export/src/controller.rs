// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Export workflow: permission gate -> render -> persist -> notify.
//
// The four lines are captured before the permission request so that a
// deferred grant exports exactly what the user submitted. At most one export
// runs at a time; an overlapping save is rejected with `ExportInProgress`.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use pdfsave_bridge::traits::PlatformBridge;
use pdfsave_core::error::{PdfSaveError, Result};
use pdfsave_core::human_errors::{notification_for, notification_for_success};
use pdfsave_core::{BackendKind, ExportConfig, ExportId, LOG_TARGET, PageLines, SavedLocation};
use pdfsave_document::PageRenderer;
use tracing::{error, info, instrument, warn};

use crate::permission_gate::PermissionGate;
use crate::storage::StorageSelector;

/// The lines captured for one export, held across the permission wait.
#[derive(Debug, Clone)]
pub struct PendingExport {
    pub id: ExportId,
    pub lines: PageLines,
}

impl PendingExport {
    pub fn capture(lines: PageLines) -> Self {
        Self {
            id: ExportId::new(),
            lines,
        }
    }
}

pub struct ExportController {
    bridge: Arc<dyn PlatformBridge>,
    gate: PermissionGate,
    renderer: PageRenderer,
    selector: StorageSelector,
    in_flight: AtomicBool,
}

impl ExportController {
    /// Controller for `bridge` with the backend chosen from its platform version.
    pub fn new(bridge: Arc<dyn PlatformBridge>, config: &ExportConfig) -> Self {
        Self {
            gate: PermissionGate::new(Arc::clone(&bridge), config),
            renderer: PageRenderer::from_config(config),
            selector: StorageSelector::from_platform(Arc::clone(&bridge), config),
            bridge,
            in_flight: AtomicBool::new(false),
        }
    }

    pub fn backend(&self) -> BackendKind {
        self.selector.backend()
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Run one export of `lines`. Exactly one notification is shown for the
    /// outcome, success or failure.
    #[instrument(skip_all)]
    pub async fn save(&self, lines: PageLines) -> Result<SavedLocation> {
        let Some(_busy) = InFlight::acquire(&self.in_flight) else {
            warn!(target: LOG_TARGET, "export rejected, another export is in progress");
            let err = PdfSaveError::ExportInProgress;
            self.bridge.show_notification(&notification_for(&err));
            return Err(err);
        };

        let pending = PendingExport::capture(lines);
        info!(target: LOG_TARGET, id = %pending.id, "export started");

        match self.run(&pending).await {
            Ok(saved) => {
                info!(
                    target: LOG_TARGET,
                    id = %pending.id,
                    backend = %saved.backend(),
                    location = %saved.display_path(),
                    "export finished"
                );
                self.bridge.show_notification(&notification_for_success(&saved));
                Ok(saved)
            }
            Err(err) => {
                error!(
                    target: LOG_TARGET,
                    id = %pending.id,
                    kind = err.kind(),
                    error = %err,
                    "export failed"
                );
                self.bridge.show_notification(&notification_for(&err));
                Err(err)
            }
        }
    }

    async fn run(&self, pending: &PendingExport) -> Result<SavedLocation> {
        self.gate.ensure_granted().await?;
        let mut document = self.renderer.render_page(&pending.lines)?;
        self.selector.persist(&mut document)
    }
}

/// Holds the in-flight flag for the duration of one export.
struct InFlight<'a>(&'a AtomicBool);

impl<'a> InFlight<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::Ordering;

    use super::*;
    use crate::test_support::*;
    use pdfsave_bridge::traits::PermissionStatus;
    use pdfsave_core::{SavedTarget, ToastDuration};
    use pdfsave_document::PdfInspector;

    fn controller_for(bridge: FakeBridge) -> (Arc<FakeBridge>, ExportController) {
        let bridge = Arc::new(bridge);
        let controller = ExportController::new(bridge.clone(), &ExportConfig::default());
        (bridge, controller)
    }

    fn abcd() -> PageLines {
        PageLines::from(["A", "B", "C", "D"])
    }

    #[tokio::test]
    async fn modern_export_lands_in_shared_downloads() {
        let (bridge, controller) = controller_for(FakeBridge::new(MODERN, "/unused"));
        let (logs, _guard) = CapturedLogs::install();

        let saved = controller.save(abcd()).await.unwrap();

        assert!(matches!(
            saved.target,
            SavedTarget::Scoped { ref relative_path, .. } if relative_path == "Download/MyPDFs"
        ));
        assert_eq!(logs.count("PDF saved"), 1);
        assert_eq!(bridge.toasts(), vec!["PDF saved in Downloads/MyPDFs folder.".to_string()]);

        let inspector = PdfInspector::from_bytes(&bridge.written_bytes()).unwrap();
        assert_eq!(inspector.page_count(), 1);
        assert!(!controller.is_busy());
    }

    #[tokio::test]
    async fn legacy_export_creates_directory_then_overwrites() {
        let downloads = tempfile::tempdir().unwrap();
        let (bridge, controller) = controller_for(FakeBridge::new(LEGACY, downloads.path()));
        let dir = downloads.path().join("MyPDFs");
        assert!(!dir.exists());

        let first = controller.save(abcd()).await.unwrap();
        let second = controller.save(abcd()).await.unwrap();

        let path = dir.join("textview_content.pdf");
        assert_eq!(first.target, SavedTarget::Filesystem { path: path.clone() });
        assert_eq!(first.display_path(), second.display_path());
        assert_eq!(std::fs::read_dir(&dir).unwrap().count(), 1);

        let toasts = bridge.toasts();
        assert_eq!(toasts.len(), 2);
        assert_eq!(toasts[0], format!("PDF saved at: {}", path.display()));
    }

    #[tokio::test]
    async fn denial_short_circuits_render_and_storage() {
        let mut fake = FakeBridge::new(LEGACY, "/unused");
        fake.permission = PermissionStatus::Denied;
        fake.dialog = DialogBehavior::Deny;
        let (bridge, controller) = controller_for(fake);
        let (logs, _guard) = CapturedLogs::install();

        let err = controller.save(abcd()).await.unwrap_err();

        assert!(matches!(err, PdfSaveError::PermissionDenied));
        assert_eq!(bridge.storage_calls(), 0);
        assert_eq!(logs.count("document created"), 0);
        assert_eq!(logs.count("PDF saved"), 0);

        let notes = bridge.notifications.lock().unwrap().clone();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].text, "Permission denied to save PDF");
        assert_eq!(notes[0].duration, ToastDuration::Short);
    }

    #[tokio::test]
    async fn deferred_grant_exports_captured_lines() {
        let downloads = tempfile::tempdir().unwrap();
        let mut fake = FakeBridge::new(LEGACY, downloads.path());
        fake.permission = PermissionStatus::Denied;
        fake.dialog = DialogBehavior::Manual;
        let (bridge, controller) = controller_for(fake);

        let (result, delivered) = tokio::join!(controller.save(abcd()), async {
            tokio::task::yield_now().await;
            assert_eq!(bridge.storage_calls(), 0);
            bridge.deliver(true)
        });

        assert!(delivered);
        let saved = result.unwrap();
        assert_eq!(saved.backend(), BackendKind::DirectFilesystem);
        assert!(downloads.path().join("MyPDFs/textview_content.pdf").exists());
    }

    #[tokio::test]
    async fn overlapping_save_is_rejected() {
        let downloads = tempfile::tempdir().unwrap();
        let mut fake = FakeBridge::new(LEGACY, downloads.path());
        fake.permission = PermissionStatus::Denied;
        fake.dialog = DialogBehavior::Manual;
        let (bridge, controller) = controller_for(fake);

        let (first, second) = tokio::join!(controller.save(abcd()), async {
            tokio::task::yield_now().await;
            assert!(controller.is_busy());
            let second = controller.save(abcd()).await;
            bridge.deliver(true);
            second
        });

        assert!(first.is_ok());
        assert!(matches!(second, Err(PdfSaveError::ExportInProgress)));
        assert_eq!(bridge.permission_requests.load(Ordering::SeqCst), 1);
        assert!(!controller.is_busy());
        assert!(bridge.toasts().contains(&"A PDF is already being saved".to_string()));
    }

    #[tokio::test]
    async fn every_failure_produces_one_toast() {
        let cases: [(fn(&mut FakeBridge), &str); 4] = [
            (|b| b.insert = InsertBehavior::NoHandle, "Failed to save PDF in MediaStore."),
            (|b| b.sink = SinkBehavior::Missing, "Failed to save PDF."),
            (|b| b.sink = SinkBehavior::FailsMidWrite, "Error saving PDF: no space left"),
            (|b| b.sink = SinkBehavior::FailsOnClose, "Error saving PDF: stream close failed"),
        ];

        for (inject, expected) in cases {
            let mut fake = FakeBridge::new(MODERN, "/unused");
            inject(&mut fake);
            let (bridge, controller) = controller_for(fake);

            assert!(controller.save(abcd()).await.is_err());
            assert_eq!(bridge.toasts(), vec![expected.to_string()]);
            assert!(!controller.is_busy());
        }
    }

    #[tokio::test]
    async fn flag_released_after_failure() {
        let mut fake = FakeBridge::new(MODERN, "/unused");
        fake.insert = InsertBehavior::Throws;
        let (bridge, controller) = controller_for(fake);

        assert!(controller.save(abcd()).await.is_err());
        assert!(controller.save(abcd()).await.is_err());
        assert_eq!(bridge.insert_calls.load(Ordering::SeqCst), 2);
    }
}
