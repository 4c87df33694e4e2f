// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Screen state — reactive signals for the Dioxus UI.

use pdfsave_core::human_errors::{notification_for, notification_for_success};
use pdfsave_core::{LINE_COUNT, PdfSaveError, SavedLocation};

/// Progress of the most recent Save tap.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SaveStatus {
    #[default]
    Idle,
    Saving,
    Saved(String),
    Failed(String),
}

impl SaveStatus {
    pub fn from_result(result: &Result<SavedLocation, PdfSaveError>) -> Self {
        match result {
            Ok(saved) => Self::Saved(notification_for_success(saved).text),
            Err(err) => Self::Failed(notification_for(err).text),
        }
    }

    /// Text shown under the Save button.
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Idle => None,
            Self::Saving => Some("Saving PDF..."),
            Self::Saved(msg) | Self::Failed(msg) => Some(msg),
        }
    }

    pub fn is_saving(&self) -> bool {
        matches!(self, Self::Saving)
    }
}

/// Contents of the four text fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppState {
    pub lines: [String; LINE_COUNT],
    pub status: SaveStatus,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the field values, taken at the moment Save is tapped.
    pub fn snapshot(&self) -> [String; LINE_COUNT] {
        self.lines.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn status_messages_follow_outcome() {
        let ok = Ok(SavedLocation::filesystem(PathBuf::from("/d/MyPDFs/x.pdf"), 10));
        assert_eq!(
            SaveStatus::from_result(&ok).message(),
            Some("PDF saved at: /d/MyPDFs/x.pdf")
        );

        let denied = Err(PdfSaveError::PermissionDenied);
        assert_eq!(
            SaveStatus::from_result(&denied),
            SaveStatus::Failed("Permission denied to save PDF".into())
        );
    }

    #[test]
    fn idle_has_no_message() {
        assert_eq!(SaveStatus::default().message(), None);
        assert!(SaveStatus::Saving.is_saving());
    }

    #[test]
    fn snapshot_is_independent_of_later_edits() {
        let mut state = AppState::new();
        state.lines[0] = "A".into();
        let snap = state.snapshot();
        state.lines[0] = "changed".into();
        assert_eq!(snap[0], "A");
    }
}
