// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF module — rendering, lifecycle, and inspection.

pub mod document;
pub mod encoding;
pub mod reader;
pub mod writer;

pub use document::{CloseGuard, RenderedDocument};
pub use reader::PdfInspector;
pub use writer::PageRenderer;
