//! Landscape A4 PDF table of every report row.
//!
//! Uses the builtin Helvetica faces so no font files are embedded. The
//! builtin fonts carry no metrics here, so cells are clipped by character
//! count instead of measured width.

use printpdf::path::PaintMode;
use printpdf::{
    BuiltinFont, Color, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference,
    PdfLayerReference, Rect, Rgb,
};

use cryptoreport_core::{ReportError, ReportRow};

use super::raster::clip;
use super::REPORT_TITLE;

const PAGE_WIDTH: f32 = 297.0;
const PAGE_HEIGHT: f32 = 210.0;
const MARGIN: f32 = 10.0;
const ROW_HEIGHT: f32 = 7.0;
const TITLE_SIZE: f32 = 18.0;
const BODY_SIZE: f32 = 7.0;
const CELL_PAD: f32 = 1.5;
/// Upper bound on one Helvetica glyph's advance at `BODY_SIZE`, in mm.
const CHAR_WIDTH: f32 = 1.4;
/// Relative column widths, in `ReportRow::COLUMNS` order.
const COLUMN_WEIGHTS: [f32; 10] = [1.2, 0.6, 1.2, 1.0, 1.2, 1.0, 0.9, 0.9, 1.6, 1.6];
const TITLE_BLOCK: f32 = 22.0;
const LAYER: &str = "table";

/// Rows that fit under the header on a page. The first page also holds the
/// title block.
pub(crate) fn rows_per_page(first_page: bool) -> usize {
    let mut usable = PAGE_HEIGHT - 2.0 * MARGIN - ROW_HEIGHT;
    if first_page {
        usable -= TITLE_BLOCK;
    }
    (usable / ROW_HEIGHT).floor().max(1.0) as usize
}

/// Split `count` rows into page-sized `(start, end)` ranges. An empty table
/// still yields one page so the header is printed.
pub(crate) fn paginate(count: usize) -> Vec<(usize, usize)> {
    let mut pages = Vec::new();
    let mut start = 0;
    loop {
        let end = (start + rows_per_page(pages.is_empty())).min(count);
        pages.push((start, end));
        if end >= count {
            break;
        }
        start = end;
    }
    pages
}

struct Fonts {
    regular: IndirectFontRef,
    bold: IndirectFontRef,
}

fn rgb(r: u8, g: u8, b: u8) -> Color {
    Color::Rgb(Rgb::new(
        f32::from(r) / 255.0,
        f32::from(g) / 255.0,
        f32::from(b) / 255.0,
        None,
    ))
}

pub fn render_pdf(rows: &[ReportRow], generated: &str) -> Result<Vec<u8>, ReportError> {
    let (doc, page, layer) =
        PdfDocument::new(REPORT_TITLE, Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), LAYER);
    let fonts = Fonts {
        regular: doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(|e| ReportError::render("PDF", e))?,
        bold: doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(|e| ReportError::render("PDF", e))?,
    };

    let cells: Vec<Vec<String>> = rows
        .iter()
        .map(ReportRow::cells)
        .collect();

    let mut current = doc.get_page(page).get_layer(layer);
    for (index, (start, end)) in paginate(cells.len()).into_iter().enumerate() {
        if index > 0 {
            current = next_page(&doc);
        }
        let mut y = PAGE_HEIGHT - MARGIN;
        if index == 0 {
            // Title, generated line and a gap: TITLE_BLOCK in total.
            y -= 8.0;
            current.set_fill_color(rgb(34, 34, 34));
            current.use_text(REPORT_TITLE, TITLE_SIZE, Mm(MARGIN), Mm(y), &fonts.bold);
            y -= 8.0;
            current.use_text(
                format!("Generated: {generated}"),
                10.0,
                Mm(MARGIN),
                Mm(y),
                &fonts.regular,
            );
            y -= 6.0;
        }
        y = draw_header(&current, &fonts, y);
        for (offset, row) in cells[start..end].iter().enumerate() {
            y = draw_body_row(&current, &fonts, y, row, offset % 2 == 1);
        }
    }
    drop(current);

    doc.save_to_bytes().map_err(|e| ReportError::render("PDF", e))
}

fn next_page(doc: &PdfDocumentReference) -> PdfLayerReference {
    let (page, layer) = doc.add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), LAYER);
    doc.get_page(page).get_layer(layer)
}

pub(crate) fn column_widths() -> [f32; 10] {
    let total: f32 = COLUMN_WEIGHTS.iter().sum();
    COLUMN_WEIGHTS.map(|w| w / total * (PAGE_WIDTH - 2.0 * MARGIN))
}

/// Characters that fit in a column of `width` mm.
pub(crate) fn max_chars(width: f32) -> usize {
    ((width - 2.0 * CELL_PAD) / CHAR_WIDTH).floor().max(2.0) as usize
}

fn fill_band(layer: &PdfLayerReference, top: f32, color: Color) {
    layer.set_fill_color(color);
    layer.add_rect(
        Rect::new(
            Mm(MARGIN),
            Mm(top - ROW_HEIGHT),
            Mm(PAGE_WIDTH - MARGIN),
            Mm(top),
        )
        .with_mode(PaintMode::Fill),
    );
}

fn draw_cells<S: AsRef<str>>(
    layer: &PdfLayerReference,
    font: &IndirectFontRef,
    top: f32,
    cells: &[S],
) {
    let baseline = top - ROW_HEIGHT + 2.2;
    let mut x = MARGIN;
    for (cell, width) in cells.iter().zip(column_widths()) {
        let text = clip(cell.as_ref(), max_chars(width));
        layer.use_text(text, BODY_SIZE, Mm(x + CELL_PAD), Mm(baseline), font);
        x += width;
    }
}

fn draw_header(layer: &PdfLayerReference, fonts: &Fonts, top: f32) -> f32 {
    fill_band(layer, top, rgb(40, 62, 98));
    layer.set_fill_color(rgb(255, 255, 255));
    draw_cells(layer, &fonts.bold, top, &ReportRow::COLUMNS);
    top - ROW_HEIGHT
}

fn draw_body_row(
    layer: &PdfLayerReference,
    fonts: &Fonts,
    top: f32,
    cells: &[String],
    striped: bool,
) -> f32 {
    if striped {
        fill_band(layer, top, rgb(238, 242, 248));
    }
    layer.set_fill_color(rgb(34, 34, 34));
    draw_cells(layer, &fonts.regular, top, cells);
    top - ROW_HEIGHT
}
