// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// pdfsave-export — the document export workflow.
//
// Permission gate, storage writers (scoped-storage index and direct
// filesystem), the backend selector, and the controller that ties a Save tap
// to a persisted PDF.

pub mod controller;
pub mod permission_gate;
pub mod storage;

#[cfg(test)]
mod test_support;

pub use controller::{ExportController, PendingExport};
pub use permission_gate::PermissionGate;
pub use storage::{
    DirectFilesystemWriter, DocumentWriter, ScopedStorageWriter, StorageSelector,
};
