// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Page renderer — draw the four text lines onto an index-card page using
// `printpdf` 0.8.
//
// printpdf 0.8 uses a data-oriented API: a page is a `PdfPage` holding a
// `Vec<Op>` operation list, serialised via `PdfDocument::save()`. PDF user
// space grows upward, so a baseline measured from the top edge is placed at
// `height - y`. The serialized page then goes through `encoding` so that
// non-ASCII text matches the font's declared WinAnsi encoding.

use pdfsave_core::error::PdfSaveError;
use pdfsave_core::{ExportConfig, LOG_TARGET, PageLayout, PageLines};
use printpdf::{
    BuiltinFont, Color, Mm, Op, PdfDocument, PdfPage, PdfSaveOptions, PdfWarnMsg, Point, Pt, Rgb,
    TextItem,
};
use tracing::{debug, info, instrument};

use super::document::RenderedDocument;
use super::encoding::reencode_builtin_text;
use super::reader::PdfInspector;

/// Renders [`PageLines`] onto a single fixed-size page.
///
/// Layout is fixed: no wrapping, no overflow handling. Text wider than the
/// page runs past the right edge and is clipped by the viewer.
pub struct PageRenderer {
    layout: PageLayout,
    /// Title metadata embedded in the PDF /Info dictionary.
    title: String,
}

impl PageRenderer {
    pub fn new(layout: PageLayout, title: impl Into<String>) -> Self {
        Self {
            layout,
            title: title.into(),
        }
    }

    pub fn from_config(config: &ExportConfig) -> Self {
        Self::new(config.layout.clone(), config.document_title.clone())
    }

    pub fn layout(&self) -> &PageLayout {
        &self.layout
    }

    /// Page dimensions in printpdf's Mm units.
    fn page_dimensions(&self) -> (Mm, Mm) {
        (pt_to_mm(self.layout.width_pt), pt_to_mm(self.layout.height_pt))
    }

    /// Drawing operations for one page: black 16pt Helvetica, one text
    /// section per line.
    pub fn page_ops(&self, lines: &PageLines) -> Vec<Op> {
        let mut ops = vec![Op::SetFillColor {
            col: Color::Rgb(Rgb {
                r: 0.0,
                g: 0.0,
                b: 0.0,
                icc_profile: None,
            }),
        }];

        for (index, line) in lines.iter().enumerate() {
            let y_pt = self.layout.height_pt - self.layout.baseline_from_top(index);

            ops.push(Op::StartTextSection);
            ops.push(Op::SetTextCursor {
                pos: Point {
                    x: Pt(self.layout.margin_x_pt),
                    y: Pt(y_pt),
                },
            });
            ops.push(Op::SetFontSizeBuiltinFont {
                size: Pt(self.layout.font_size_pt),
                font: BuiltinFont::Helvetica,
            });
            ops.push(Op::WriteTextBuiltinFont {
                items: vec![TextItem::Text(line.to_string())],
                font: BuiltinFont::Helvetica,
            });
            ops.push(Op::EndTextSection);
        }

        ops
    }

    /// Render the page and finalize it into a serialized document.
    #[instrument(skip_all, fields(text_len = lines.total_len()))]
    pub fn render_page(&self, lines: &PageLines) -> Result<RenderedDocument, PdfSaveError> {
        let (page_w, page_h) = self.page_dimensions();

        let mut doc = PdfDocument::new(&self.title);
        doc.with_pages(vec![PdfPage::new(page_w, page_h, self.page_ops(lines))]);

        let mut warnings: Vec<PdfWarnMsg> = Vec::new();
        let raw = doc.save(&PdfSaveOptions::default(), &mut warnings);

        if !warnings.is_empty() {
            debug!(target: LOG_TARGET, warnings = warnings.len(), "printpdf reported warnings");
        }
        if raw.is_empty() {
            return Err(PdfSaveError::PdfError("serialised page is empty".into()));
        }

        let mut pdf = reencode_builtin_text(&raw)?;
        let mut output = Vec::with_capacity(raw.len());
        pdf.save_to(&mut output)
            .map_err(|err| PdfSaveError::PdfError(format!("failed to serialise page: {err}")))?;

        let inspector = PdfInspector::from_document(pdf);
        debug!(
            target: LOG_TARGET,
            pages = inspector.page_count(),
            media_box = ?inspector.media_box(),
            "rendered page inspected"
        );

        info!(
            target: LOG_TARGET,
            width_pt = self.layout.width_pt,
            height_pt = self.layout.height_pt,
            bytes = output.len(),
            "document created"
        );

        Ok(RenderedDocument::from_bytes(output))
    }
}

impl Default for PageRenderer {
    fn default() -> Self {
        Self::from_config(&ExportConfig::default())
    }
}

fn pt_to_mm(pt: f32) -> Mm {
    Mm(pt * 25.4 / 72.0)
}
