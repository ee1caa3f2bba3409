//! A4 report layout with printpdf's built-in Helvetica.
//!
//! Cover page with the person's name, then one page (or more, on overflow)
//! per section in `Section::ALL` order. Sections absent from the content map
//! are skipped.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use printpdf::{BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference, PdfLayerReference};
use tracing::debug;

use crate::render::{PdfRenderer, RenderError};
use crate::report::Section;

const DOCUMENT_TITLE: &str = "Big Five Personality Report";

const PAGE_WIDTH: Mm = Mm(210.0);
const PAGE_HEIGHT: Mm = Mm(297.0);
const MARGIN_X: Mm = Mm(20.0);
const TOP: Mm = Mm(277.0);
const BOTTOM: Mm = Mm(20.0);

const HEADING_SIZE: f32 = 16.0;
const SUBHEADING_SIZE: f32 = 12.0;
const BODY_SIZE: f32 = 10.0;
const LINE_HEIGHT: Mm = Mm(5.0);
/// Characters per body line at `BODY_SIZE` across the text width.
const BODY_WRAP: usize = 95;

#[derive(Debug, Default, Clone, Copy)]
pub struct PrintPdfRenderer;

impl PdfRenderer for PrintPdfRenderer {
    fn render(
        &self,
        content: &BTreeMap<Section, String>,
        person_name: &str,
        output_path: &Path,
    ) -> Result<(), RenderError> {
        let (doc, cover_page, cover_layer) =
            PdfDocument::new(DOCUMENT_TITLE, PAGE_WIDTH, PAGE_HEIGHT, "Cover");
        let font = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(pdf_error)?;
        let bold = doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(pdf_error)?;

        let cover = doc.get_page(cover_page).get_layer(cover_layer);
        cover.use_text(DOCUMENT_TITLE, 24.0, MARGIN_X, Mm(200.0), &bold);
        cover.use_text(
            format!("Prepared for {}", to_winansi(person_name)),
            14.0,
            MARGIN_X,
            Mm(185.0),
            &font,
        );

        for section in Section::ALL {
            let Some(text) = content.get(&section) else {
                debug!("No content for section {section}, skipping page");
                continue;
            };
            let mut cursor = PageCursor::new(&doc, section.key());
            cursor.text(section.title(), HEADING_SIZE, &bold);
            cursor.gap();

            for paragraph in text.split("\n\n") {
                let paragraph = to_winansi(paragraph.trim());
                if paragraph.is_empty() {
                    continue;
                }
                if is_heading(&paragraph) {
                    cursor.text(&paragraph, SUBHEADING_SIZE, &bold);
                    continue;
                }
                for line in paragraph.lines() {
                    for wrapped in wrap_text(line, BODY_WRAP) {
                        cursor.text(&wrapped, BODY_SIZE, &font);
                    }
                }
                cursor.gap();
            }
        }

        let file = File::create(output_path).map_err(|source| RenderError::Io {
            path: output_path.to_path_buf(),
            source,
        })?;
        doc.save(&mut BufWriter::new(file)).map_err(pdf_error)?;
        Ok(())
    }
}

fn pdf_error(e: impl std::fmt::Display) -> RenderError {
    RenderError::Pdf(e.to_string())
}

/// Writes lines top-down, starting a new page whenever the bottom margin is reached.
struct PageCursor<'a> {
    doc: &'a PdfDocumentReference,
    layer: PdfLayerReference,
    layer_name: &'static str,
    y: Mm,
}

impl<'a> PageCursor<'a> {
    fn new(doc: &'a PdfDocumentReference, layer_name: &'static str) -> Self {
        let (page, layer) = doc.add_page(PAGE_WIDTH, PAGE_HEIGHT, layer_name);
        Self {
            doc,
            layer: doc.get_page(page).get_layer(layer),
            layer_name,
            y: TOP,
        }
    }

    fn text(&mut self, text: &str, size: f32, font: &IndirectFontRef) {
        if self.y < BOTTOM {
            let (page, layer) = self.doc.add_page(PAGE_WIDTH, PAGE_HEIGHT, self.layer_name);
            self.layer = self.doc.get_page(page).get_layer(layer);
            self.y = TOP;
        }
        self.layer.use_text(text, size, MARGIN_X, self.y, font);
        self.y -= if size > BODY_SIZE {
            Mm(size * 0.5)
        } else {
            LINE_HEIGHT
        };
    }

    fn gap(&mut self) {
        self.y -= LINE_HEIGHT;
    }
}

/// Short single-line paragraphs without closing punctuation are headings.
fn is_heading(paragraph: &str) -> bool {
    !paragraph.contains('\n')
        && paragraph.len() <= 60
        && !paragraph.starts_with("- ")
        && !paragraph.ends_with(['.', '!', '?', ':'])
}

/// Replaces typographic characters the built-in fonts cannot encode.
fn to_winansi(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '\u{2018}' | '\u{2019}' => '\'',
            '\u{201C}' | '\u{201D}' => '"',
            '\u{2013}' | '\u{2014}' => '-',
            '\u{2022}' => '-',
            '\u{00A0}' => ' ',
            other => other,
        })
        .collect()
}

fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if !current.is_empty() && current.len() + word.len() + 1 > max_chars {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}
