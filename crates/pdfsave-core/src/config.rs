// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Export configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::types::{MediaEntry, PlatformVersion};

/// File name of the persisted configuration inside the app data dir.
pub const CONFIG_FILE: &str = "config.json";

/// Page geometry and text placement, all in PDF points (1/72 inch).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageLayout {
    /// Half of a 3 x 2.5 inch index card: 3 * 72.
    pub width_pt: f32,
    /// 2.5 * 72.
    pub height_pt: f32,
    pub font_size_pt: f32,
    /// Left margin of every line.
    pub margin_x_pt: f32,
    /// Baseline of the first line, measured from the top edge.
    pub first_baseline_pt: f32,
    pub line_spacing_pt: f32,
}

impl PageLayout {
    /// Baseline of line `index` measured from the top edge of the page.
    pub fn baseline_from_top(&self, index: usize) -> f32 {
        self.first_baseline_pt + self.line_spacing_pt * index as f32
    }
}

impl Default for PageLayout {
    fn default() -> Self {
        Self {
            width_pt: 216.0,
            height_pt: 180.0,
            font_size_pt: 16.0,
            margin_x_pt: 10.0,
            first_baseline_pt: 30.0,
            line_spacing_pt: 30.0,
        }
    }
}

/// Persistent export settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Fixed output file name. Repeated exports overwrite it.
    pub file_name: String,
    pub mime_type: String,
    /// Shared-storage folder for scoped-storage platforms.
    pub relative_path: String,
    /// Subdirectory of the public Downloads dir on legacy platforms.
    pub legacy_subdir: String,
    /// First platform version that writes through the shared-storage index.
    pub scoped_storage_min: PlatformVersion,
    /// Title embedded in the PDF /Info dictionary.
    pub document_title: String,
    pub layout: PageLayout,
}

impl ExportConfig {
    /// Index entry registered by the scoped-storage writer.
    pub fn media_entry(&self) -> MediaEntry {
        MediaEntry {
            display_name: self.file_name.clone(),
            mime_type: self.mime_type.clone(),
            relative_path: self.relative_path.clone(),
        }
    }

    /// Load `config.json` from `data_dir`, falling back to defaults when the
    /// file is missing or unreadable.
    pub fn load_or_default(data_dir: &Path) -> Self {
        let path = data_dir.join(CONFIG_FILE);
        std::fs::read_to_string(&path)
            .ok()
            .and_then(|data| serde_json::from_str(&data).ok())
            .unwrap_or_default()
    }

    /// Write this config to `data_dir/config.json` as pretty JSON.
    pub fn persist(&self, data_dir: &Path) -> Result<()> {
        let path = data_dir.join(CONFIG_FILE);
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(&path, json)?;
        Ok(())
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            file_name: "textview_content.pdf".into(),
            mime_type: "application/pdf".into(),
            relative_path: "Download/MyPDFs".into(),
            legacy_subdir: "MyPDFs".into(),
            scoped_storage_min: PlatformVersion::SCOPED_STORAGE_MIN,
            document_title: "PDF Save".into(),
            layout: PageLayout::default(),
        }
    }
}
