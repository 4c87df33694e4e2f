// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// pdfsave-document — Page rendering for PDF Save.
//
// Renders the four text lines onto a single index-card page, tracks the
// rendered document through its write lifecycle, and inspects finished PDFs.

pub mod pdf;

// Re-export the primary structs so callers can use `pdfsave_document::PageRenderer` etc.
pub use pdf::document::{CloseGuard, RenderedDocument};
pub use pdf::reader::PdfInspector;
pub use pdf::writer::PageRenderer;
