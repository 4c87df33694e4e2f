// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Test doubles shared by the export unit tests: a scriptable platform bridge
// and a `tracing` layer that records diagnostic messages.

use std::io::Write;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use pdfsave_bridge::permission::{PendingPermissions, PermissionRequest, STORAGE_PERMISSION_CODE};
use pdfsave_bridge::traits::*;
use pdfsave_core::error::{PdfSaveError, Result};
use pdfsave_core::{ContentUri, LOG_TARGET, MediaEntry, Notification, PlatformVersion};
use tracing::field::{Field, Visit};
use tracing::subscriber::DefaultGuard;
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

pub const MODERN: PlatformVersion = PlatformVersion(33);
pub const LEGACY: PlatformVersion = PlatformVersion(28);

/// How the fake index answers an insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertBehavior {
    Handle,
    NoHandle,
    Throws,
}

/// How the fake index answers an open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SinkBehavior {
    Accepts,
    Missing,
    FailsMidWrite,
    /// Accepts every byte, then fails to close.
    FailsOnClose,
}

/// Error text reported by a `SinkBehavior::FailsOnClose` sink.
pub const CLOSE_FAILURE: &str = "stream close failed";

/// How the fake answers a permission dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogBehavior {
    Grant,
    Deny,
    /// Leave the request pending until the test calls `deliver`.
    Manual,
}

pub struct FakeBridge {
    pub version: PlatformVersion,
    pub downloads: PathBuf,
    pub permission: PermissionStatus,
    pub rationale: bool,
    pub dialog: DialogBehavior,
    pub insert: InsertBehavior,
    pub sink: SinkBehavior,
    pub pending: PendingPermissions,
    pub written: Arc<Mutex<Vec<u8>>>,
    pub notifications: Mutex<Vec<Notification>>,
    pub insert_calls: AtomicUsize,
    pub open_calls: AtomicUsize,
    pub downloads_calls: AtomicUsize,
    pub permission_requests: AtomicUsize,
}

impl FakeBridge {
    pub fn new(version: PlatformVersion, downloads: impl Into<PathBuf>) -> Self {
        Self {
            version,
            downloads: downloads.into(),
            permission: PermissionStatus::Granted,
            rationale: false,
            dialog: DialogBehavior::Grant,
            insert: InsertBehavior::Handle,
            sink: SinkBehavior::Accepts,
            pending: PendingPermissions::new(),
            written: Arc::new(Mutex::new(Vec::new())),
            notifications: Mutex::new(Vec::new()),
            insert_calls: AtomicUsize::new(0),
            open_calls: AtomicUsize::new(0),
            downloads_calls: AtomicUsize::new(0),
            permission_requests: AtomicUsize::new(0),
        }
    }

    /// Resolve a `DialogBehavior::Manual` request.
    pub fn deliver(&self, granted: bool) -> bool {
        self.pending.deliver(STORAGE_PERMISSION_CODE, granted)
    }

    pub fn storage_calls(&self) -> usize {
        self.insert_calls.load(Ordering::SeqCst)
            + self.open_calls.load(Ordering::SeqCst)
            + self.downloads_calls.load(Ordering::SeqCst)
    }

    pub fn toasts(&self) -> Vec<String> {
        self.notifications
            .lock()
            .unwrap()
            .iter()
            .map(|n| n.text.clone())
            .collect()
    }

    pub fn written_bytes(&self) -> Vec<u8> {
        self.written.lock().unwrap().clone()
    }
}

impl PlatformBridge for FakeBridge {
    fn platform_name(&self) -> &str {
        "Fake"
    }

    fn platform_version(&self) -> PlatformVersion {
        self.version
    }
}

impl NativeMediaIndex for FakeBridge {
    fn insert_download(&self, entry: &MediaEntry) -> Result<Option<ContentUri>> {
        self.insert_calls.fetch_add(1, Ordering::SeqCst);
        match self.insert {
            InsertBehavior::Handle => Ok(Some(ContentUri(format!(
                "content://media/external/downloads/{}",
                entry.display_name
            )))),
            InsertBehavior::NoHandle => Ok(None),
            InsertBehavior::Throws => Err(PdfSaveError::Bridge("IllegalArgumentException".into())),
        }
    }

    fn open_output(&self, _uri: &ContentUri) -> Result<Option<MediaSink>> {
        self.open_calls.fetch_add(1, Ordering::SeqCst);
        match self.sink {
            SinkBehavior::Accepts => Ok(Some(Box::new(SharedSink {
                buf: Arc::clone(&self.written),
                close_fails: false,
            }))),
            SinkBehavior::Missing => Ok(None),
            SinkBehavior::FailsMidWrite => Ok(Some(Box::new(FailingSink))),
            SinkBehavior::FailsOnClose => Ok(Some(Box::new(SharedSink {
                buf: Arc::clone(&self.written),
                close_fails: true,
            }))),
        }
    }
}

impl NativePermissions for FakeBridge {
    fn check_write_storage(&self) -> PermissionStatus {
        self.permission
    }

    fn should_show_rationale(&self) -> bool {
        self.rationale
    }

    fn request_write_storage(&self) -> Result<PermissionRequest> {
        self.permission_requests.fetch_add(1, Ordering::SeqCst);
        Ok(match self.dialog {
            DialogBehavior::Grant => PermissionRequest::resolved(PermissionStatus::Granted),
            DialogBehavior::Deny => PermissionRequest::resolved(PermissionStatus::Denied),
            DialogBehavior::Manual => self.pending.register(STORAGE_PERMISSION_CODE),
        })
    }
}

impl NativeNotifier for FakeBridge {
    fn show_notification(&self, notification: &Notification) {
        self.notifications.lock().unwrap().push(notification.clone());
    }
}

impl NativeStorageDirs for FakeBridge {
    fn public_downloads_dir(&self) -> Result<PathBuf> {
        self.downloads_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.downloads.clone())
    }
}

struct SharedSink {
    buf: Arc<Mutex<Vec<u8>>>,
    close_fails: bool,
}

impl Write for SharedSink {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.buf.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl MediaStream for SharedSink {
    fn finish(self: Box<Self>) -> std::io::Result<()> {
        if self.close_fails {
            Err(std::io::Error::other(CLOSE_FAILURE))
        } else {
            Ok(())
        }
    }
}

struct FailingSink;

impl Write for FailingSink {
    fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
        Err(std::io::Error::new(std::io::ErrorKind::StorageFull, "no space left"))
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl MediaStream for FailingSink {
    fn finish(self: Box<Self>) -> std::io::Result<()> {
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Log capture
// ---------------------------------------------------------------------------

/// Messages of every `pdfsave`-target event seen while installed.
#[derive(Clone, Default)]
pub struct CapturedLogs(Arc<Mutex<Vec<String>>>);

impl CapturedLogs {
    /// Install as the thread's default subscriber until the guard drops.
    pub fn install() -> (Self, DefaultGuard) {
        let logs = Self::default();
        let subscriber = tracing_subscriber::registry().with(logs.clone());
        let guard = tracing::subscriber::set_default(subscriber);
        (logs, guard)
    }

    pub fn count(&self, message: &str) -> usize {
        self.0.lock().unwrap().iter().filter(|m| *m == message).count()
    }
}

struct MessageVisitor(Option<String>);

impl Visit for MessageVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.0 = Some(format!("{value:?}"));
        }
    }
}

impl<S: Subscriber> Layer<S> for CapturedLogs {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        if event.metadata().target() != LOG_TARGET {
            return;
        }
        let mut visitor = MessageVisitor(None);
        event.record(&mut visitor);
        if let Some(message) = visitor.0 {
            self.0.lock().unwrap().push(message);
        }
    }
}
