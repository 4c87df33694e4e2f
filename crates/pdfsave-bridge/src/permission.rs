// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Asynchronous permission results.
//
// The OS answers a permission dialog through an Activity callback long after
// the request call returned. A request is therefore a future backed by a
// oneshot channel; the callback side resolves the matching responder.

use std::sync::Mutex;

use tokio::sync::oneshot;
use tracing::{debug, warn};

use crate::traits::PermissionStatus;

/// Request code used for the write-storage permission dialog.
pub const STORAGE_PERMISSION_CODE: i32 = 1;

/// Pending answer to a permission dialog.
#[derive(Debug)]
pub struct PermissionRequest {
    rx: oneshot::Receiver<bool>,
}

/// Resolves the paired [`PermissionRequest`].
#[derive(Debug)]
pub struct PermissionResponder {
    tx: oneshot::Sender<bool>,
}

impl PermissionRequest {
    pub fn channel() -> (PermissionResponder, PermissionRequest) {
        let (tx, rx) = oneshot::channel();
        (PermissionResponder { tx }, PermissionRequest { rx })
    }

    /// A request that has already been answered.
    pub fn resolved(status: PermissionStatus) -> Self {
        let (responder, request) = Self::channel();
        responder.resolve(status.is_granted());
        request
    }

    /// Wait for the user's answer. A responder dropped without answering
    /// (dialog dismissed, Activity destroyed) counts as denial.
    pub async fn outcome(self) -> PermissionStatus {
        match self.rx.await {
            Ok(granted) => PermissionStatus::from_granted(granted),
            Err(_) => {
                warn!("permission responder dropped without an answer");
                PermissionStatus::Denied
            }
        }
    }
}

impl PermissionResponder {
    pub fn resolve(self, granted: bool) {
        // The receiver is gone only if the export was abandoned.
        let _ = self.tx.send(granted);
    }
}

/// Single slot holding the responder for the in-flight permission dialog.
///
/// Registering a new request replaces (and thereby denies) any previous one.
#[derive(Debug, Default)]
pub struct PendingPermissions {
    slot: Mutex<Option<(i32, PermissionResponder)>>,
}

impl PendingPermissions {
    pub const fn new() -> Self {
        Self {
            slot: Mutex::new(None),
        }
    }

    /// Park a responder for `request_code` and return the caller's future.
    pub fn register(&self, request_code: i32) -> PermissionRequest {
        let (responder, request) = PermissionRequest::channel();
        let mut slot = self.slot.lock().unwrap_or_else(|e| e.into_inner());
        if slot.replace((request_code, responder)).is_some() {
            debug!(request_code, "superseded an unanswered permission request");
        }
        request
    }

    /// Deliver the OS answer. Returns `false` when no request with this code
    /// is pending.
    pub fn deliver(&self, request_code: i32, granted: bool) -> bool {
        let mut slot = self.slot.lock().unwrap_or_else(|e| e.into_inner());
        match slot.take() {
            Some((code, responder)) if code == request_code => {
                responder.resolve(granted);
                true
            }
            Some(other) => {
                *slot = Some(other);
                warn!(request_code, "permission result for unknown request code");
                false
            }
            None => {
                warn!(request_code, "permission result with no pending request");
                false
            }
        }
    }

    /// Resolve any request still waiting as `Denied`. Called when the host
    /// Activity resumes, after the dialog has closed.
    pub fn deny_unanswered(&self) -> bool {
        let mut slot = self.slot.lock().unwrap_or_else(|e| e.into_inner());
        match slot.take() {
            Some((request_code, responder)) => {
                warn!(request_code, "permission dialog closed without a forwarded result");
                responder.resolve(false);
                true
            }
            None => false,
        }
    }
}
