// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF inspector — load a finished PDF with `lopdf` and report its page
// geometry.

use std::path::Path;

use lopdf::{Dictionary, Document, Object};
use pdfsave_core::error::PdfSaveError;
use tracing::{debug, instrument};

/// Read-only view of a serialized PDF.
pub struct PdfInspector {
    document: Document,
}

impl PdfInspector {
    /// Load a PDF from the filesystem.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<Path>) -> Result<Self, PdfSaveError> {
        let path_ref = path.as_ref();
        let document = Document::load(path_ref).map_err(|err| {
            PdfSaveError::PdfError(format!("failed to open {}: {}", path_ref.display(), err))
        })?;

        debug!(pages = document.get_pages().len(), "PDF loaded");
        Ok(Self { document })
    }

    /// Load a PDF already in memory.
    #[instrument(skip_all, fields(bytes_len = data.len()))]
    pub fn from_bytes(data: &[u8]) -> Result<Self, PdfSaveError> {
        let document = Document::load_mem(data).map_err(|err| {
            PdfSaveError::PdfError(format!("failed to load PDF from memory: {}", err))
        })?;

        debug!(pages = document.get_pages().len(), "PDF loaded from bytes");
        Ok(Self { document })
    }

    /// Wrap a document that is already parsed.
    pub fn from_document(document: Document) -> Self {
        Self { document }
    }

    /// Text of the first page, decoded through each font's encoding.
    pub fn text(&self) -> Result<String, PdfSaveError> {
        self.document
            .extract_text(&[1])
            .map_err(|err| PdfSaveError::PdfError(format!("failed to extract text: {err}")))
    }

    pub fn page_count(&self) -> usize {
        self.document.get_pages().len()
    }

    /// MediaBox of the first page as `[x0, y0, x1, y1]` in points.
    ///
    /// Falls back to the parent `Pages` node when the page inherits it.
    pub fn media_box(&self) -> Option<[f32; 4]> {
        let page_id = *self.document.get_pages().get(&1)?;
        let page = self.document.get_dictionary(page_id).ok()?;

        if let Some(rect) = rect_from(&self.document, page) {
            return Some(rect);
        }

        let parent_id = page.get(b"Parent").ok()?.as_reference().ok()?;
        let parent = self.document.get_dictionary(parent_id).ok()?;
        rect_from(&self.document, parent)
    }
}

fn rect_from(document: &Document, dict: &Dictionary) -> Option<[f32; 4]> {
    let object = dict.get(b"MediaBox").ok()?;
    let object = match object {
        Object::Reference(id) => document.get_object(*id).ok()?,
        other => other,
    };
    let values = object.as_array().ok()?;
    if values.len() != 4 {
        return None;
    }

    let mut rect = [0.0_f32; 4];
    for (slot, value) in rect.iter_mut().zip(values) {
        *slot = match value {
            Object::Integer(i) => *i as f32,
            Object::Real(r) => *r as f32,
            _ => return None,
        };
    }
    Some(rect)
}
