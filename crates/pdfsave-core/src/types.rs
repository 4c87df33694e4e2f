// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for PDF Save.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Number of text lines drawn on the page.
pub const LINE_COUNT: usize = 4;

/// Unique identifier for one export attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ExportId(pub Uuid);

impl ExportId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ExportId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ExportId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Snapshot of the four on-screen text fields taken when an export starts.
///
/// No validation: empty strings are legal and render as blank lines.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageLines([String; LINE_COUNT]);

impl PageLines {
    pub fn new(lines: [String; LINE_COUNT]) -> Self {
        Self(lines)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Total number of bytes across all lines (used as a log field).
    pub fn total_len(&self) -> usize {
        self.0.iter().map(String::len).sum()
    }
}

impl<S: Into<String>> From<[S; LINE_COUNT]> for PageLines {
    fn from(lines: [S; LINE_COUNT]) -> Self {
        Self(lines.map(Into::into))
    }
}

/// Lifecycle of a rendered document while it is being persisted.
///
/// Every writer drives `Idle -> Opening -> Writing -> Closed`; `Closed` is
/// reached on every path, including failures before `Writing`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DocumentState {
    /// Rendered and finalized, not yet handed to a writer.
    Idle,
    /// Writer is acquiring its target (index insert, directory, file open).
    Opening,
    /// Bytes are streaming to the sink.
    Writing,
    /// Released. Terminal.
    Closed,
}

/// Which storage strategy persisted (or tried to persist) a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BackendKind {
    /// Shared-storage index (MediaStore Downloads) returning opaque URIs.
    ScopedStorage,
    /// Literal file under the public Downloads directory.
    DirectFilesystem,
}

impl std::fmt::Display for BackendKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ScopedStorage => f.write_str("scoped-storage"),
            Self::DirectFilesystem => f.write_str("direct-filesystem"),
        }
    }
}

/// Platform API level as reported by the OS (Android `Build.VERSION.SDK_INT`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlatformVersion(pub u32);

impl PlatformVersion {
    /// Android 10 (Q), the first release with `MediaStore.Downloads`.
    pub const SCOPED_STORAGE_MIN: PlatformVersion = PlatformVersion(29);

    /// Whether this version is at or above the given scoped-storage threshold.
    pub fn supports_scoped_storage(self, threshold: PlatformVersion) -> bool {
        self >= threshold
    }
}

impl std::fmt::Display for PlatformVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "API {}", self.0)
    }
}

/// Values registered with the shared-storage index before writing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaEntry {
    pub display_name: String,
    pub mime_type: String,
    /// Logical folder the entry is grouped under (e.g. `Download/MyPDFs`).
    pub relative_path: String,
}

/// Opaque handle returned by an index insert.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContentUri(pub String);

impl ContentUri {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ContentUri {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Where a successful export landed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SavedTarget {
    Scoped {
        uri: ContentUri,
        display_name: String,
        relative_path: String,
    },
    Filesystem {
        path: PathBuf,
    },
}

/// Result of a successful persist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedLocation {
    pub target: SavedTarget,
    /// Number of PDF bytes written.
    pub bytes: usize,
    pub saved_at: DateTime<Utc>,
}

impl SavedLocation {
    pub fn scoped(uri: ContentUri, entry: &MediaEntry, bytes: usize) -> Self {
        Self {
            target: SavedTarget::Scoped {
                uri,
                display_name: entry.display_name.clone(),
                relative_path: entry.relative_path.clone(),
            },
            bytes,
            saved_at: Utc::now(),
        }
    }

    pub fn filesystem(path: PathBuf, bytes: usize) -> Self {
        Self {
            target: SavedTarget::Filesystem { path },
            bytes,
            saved_at: Utc::now(),
        }
    }

    pub fn backend(&self) -> BackendKind {
        match self.target {
            SavedTarget::Scoped { .. } => BackendKind::ScopedStorage,
            SavedTarget::Filesystem { .. } => BackendKind::DirectFilesystem,
        }
    }

    /// Human-readable location, e.g. `Download/MyPDFs/textview_content.pdf`.
    pub fn display_path(&self) -> String {
        match &self.target {
            SavedTarget::Scoped {
                display_name,
                relative_path,
                ..
            } => format!("{relative_path}/{display_name}"),
            SavedTarget::Filesystem { path } => path.display().to_string(),
        }
    }
}

/// How long a transient on-screen notification stays visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ToastDuration {
    Short,
    Long,
}

/// A transient user-facing message (an Android toast).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub text: String,
    pub duration: ToastDuration,
}

impl Notification {
    pub fn short(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            duration: ToastDuration::Short,
        }
    }

    pub fn long(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            duration: ToastDuration::Long,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_lines_from_str_array() {
        let lines = PageLines::from(["A", "B", "", "D"]);
        let collected: Vec<&str> = lines.iter().collect();
        assert_eq!(collected, vec!["A", "B", "", "D"]);
        assert_eq!(lines.total_len(), 3);
    }

    #[test]
    fn scoped_storage_threshold_is_inclusive() {
        let threshold = PlatformVersion::SCOPED_STORAGE_MIN;
        assert!(PlatformVersion(29).supports_scoped_storage(threshold));
        assert!(PlatformVersion(34).supports_scoped_storage(threshold));
        assert!(!PlatformVersion(28).supports_scoped_storage(threshold));
    }

    #[test]
    fn scoped_location_display_path() {
        let entry = MediaEntry {
            display_name: "textview_content.pdf".into(),
            mime_type: "application/pdf".into(),
            relative_path: "Download/MyPDFs".into(),
        };
        let loc = SavedLocation::scoped(ContentUri("content://media/1".into()), &entry, 42);
        assert_eq!(loc.backend(), BackendKind::ScopedStorage);
        assert_eq!(loc.display_path(), "Download/MyPDFs/textview_content.pdf");
        assert_eq!(loc.bytes, 42);
    }
}
