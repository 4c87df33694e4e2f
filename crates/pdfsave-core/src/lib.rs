// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF Save — Core types and error definitions shared across all crates.

pub mod config;
pub mod error;
pub mod human_errors;
pub mod types;

pub use config::{ExportConfig, PageLayout};
pub use error::PdfSaveError;
pub use types::*;

/// Fixed `tracing` target used for every diagnostic event emitted by the
/// export workflow.
pub const LOG_TARGET: &str = "pdfsave";
