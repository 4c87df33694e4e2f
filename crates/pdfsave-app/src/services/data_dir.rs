// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Platform-aware data directory resolution.

use std::path::PathBuf;

/// Return the application data directory, creating it if needed.
///
/// Holds `config.json`. Exported PDFs never go here; they go to the public
/// Downloads location chosen by the storage backend.
pub fn data_dir() -> PathBuf {
    let base = base_dir(std::env::var("XDG_DATA_HOME").ok(), std::env::var("HOME").ok());
    let dir = base.join("pdfsave");
    std::fs::create_dir_all(&dir).ok();
    dir
}

fn base_dir(xdg_data_home: Option<String>, home: Option<String>) -> PathBuf {
    if let Some(xdg) = xdg_data_home.filter(|v| !v.is_empty()) {
        return PathBuf::from(xdg);
    }
    if let Some(home) = home.filter(|v| !v.is_empty()) {
        return PathBuf::from(home).join(".local").join("share");
    }
    // Last resort
    std::env::temp_dir()
}
