// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Text re-encoding for built-in fonts.
//
// printpdf 0.8 writes `WriteTextBuiltinFont` strings as raw UTF-8 while the
// font dictionary declares `/WinAnsiEncoding`, so anything outside ASCII would
// be read back as mojibake. This pass reloads the serialized page with
// `lopdf` and rewrites every `Tj`/`TJ` string in the encoding its font
// declares. Characters that encoding cannot represent become `?`.

use std::collections::BTreeMap;

use lopdf::content::Content;
use lopdf::{Document, Encoding, Object, ObjectId, StringFormat};
use pdfsave_core::LOG_TARGET;
use pdfsave_core::error::PdfSaveError;
use tracing::debug;

/// Stand-in for characters the font encoding lacks.
pub const REPLACEMENT: char = '?';

fn pdf_err(context: &'static str) -> impl Fn(lopdf::Error) -> PdfSaveError {
    move |err| PdfSaveError::PdfError(format!("{context}: {err}"))
}

/// Reload `pdf` and re-encode its text operands. Returns the rewritten
/// document, not yet serialized.
pub fn reencode_builtin_text(pdf: &[u8]) -> Result<Document, PdfSaveError> {
    let mut document = Document::load_mem(pdf).map_err(pdf_err("failed to reload page"))?;

    let mut rewritten: Vec<(ObjectId, Vec<u8>)> = Vec::new();
    let mut replaced = 0usize;

    for page_id in document.get_pages().into_values() {
        let fonts = document
            .get_page_fonts(page_id)
            .map_err(pdf_err("failed to read page fonts"))?;
        let encodings: BTreeMap<Vec<u8>, Encoding> = fonts
            .into_iter()
            .filter_map(|(name, font)| font.get_font_encoding(&document).ok().map(|e| (name, e)))
            .collect();

        let mut content = document
            .get_and_decode_page_content(page_id)
            .map_err(pdf_err("failed to decode page content"))?;

        let mut current: Option<&Encoding> = None;
        for operation in &mut content.operations {
            match operation.operator.as_str() {
                "Tf" => {
                    current = operation
                        .operands
                        .first()
                        .and_then(|font| font.as_name().ok())
                        .and_then(|name| encodings.get(name));
                }
                "Tj" | "TJ" => {
                    if let Some(encoding) = current {
                        for operand in &mut operation.operands {
                            replaced += reencode_operand(operand, encoding);
                        }
                    }
                }
                _ => {}
            }
        }

        let bytes = Content::encode(&content).map_err(pdf_err("failed to encode page content"))?;
        rewritten.push((page_id, bytes));
    }

    for (page_id, bytes) in rewritten {
        document
            .change_page_content(page_id, bytes)
            .map_err(pdf_err("failed to replace page content"))?;
    }

    if replaced > 0 {
        debug!(target: LOG_TARGET, replaced, "characters outside the font encoding replaced");
    }
    Ok(document)
}

/// Re-encode one operand in place; returns how many characters were replaced.
fn reencode_operand(operand: &mut Object, encoding: &Encoding) -> usize {
    match operand {
        Object::String(bytes, format) => {
            let text = String::from_utf8_lossy(bytes).into_owned();
            let (encoded, replaced) = encode_text(encoding, &text);
            *format = if encoded.iter().all(|b| (0x20..0x7f).contains(b)) {
                StringFormat::Literal
            } else {
                StringFormat::Hexadecimal
            };
            *bytes = encoded;
            replaced
        }
        Object::Array(items) => items.iter_mut().map(|item| reencode_operand(item, encoding)).sum(),
        _ => 0,
    }
}

/// Encode `text` one character at a time so unmappable characters can be
/// substituted instead of silently dropped.
pub fn encode_text(encoding: &Encoding, text: &str) -> (Vec<u8>, usize) {
    let mut out = Vec::with_capacity(text.len());
    let mut replaced = 0;
    let mut buf = [0u8; 4];

    for ch in text.chars() {
        let bytes = encoding.string_to_bytes(ch.encode_utf8(&mut buf));
        if bytes.is_empty() {
            out.extend(encoding.string_to_bytes(REPLACEMENT.encode_utf8(&mut buf)));
            replaced += 1;
        } else {
            out.extend(bytes);
        }
    }
    (out, replaced)
}
