//! Table snapshots rendered as PNG: the raw payload before cleaning and the
//! report rows after.

use cryptoreport_core::{RawTable, ReportError, ReportRow};
use image::Rgb;

use super::raster::{clip, text_width, Canvas, BLACK, GLYPH_SIZE, GRID, HEADER_BG, STRIPE_BG, WHITE};

const PADDING: u32 = 6;
const ROW_HEIGHT: u32 = GLYPH_SIZE + 2 * PADDING;
const TITLE_HEIGHT: u32 = 40;
const MARGIN: u32 = 12;
const MAX_CELL_CHARS: usize = 24;

/// First `limit` raw records over the union of their keys.
pub fn render_raw_preview(
    raw: &RawTable,
    limit: usize,
    title: &str,
    artifact: &'static str,
) -> Result<Vec<u8>, ReportError> {
    let columns: Vec<String> = raw.columns().into_iter().map(str::to_owned).collect();
    let body: Vec<Vec<String>> = raw
        .records()
        .iter()
        .take(limit)
        .map(|record| columns.iter().map(|c| record.cell_text(c)).collect())
        .collect();
    draw_table(title, &columns, &body).encode_png(artifact)
}

/// First `limit` report rows over the report columns.
pub fn render_rows_preview(
    rows: &[ReportRow],
    limit: usize,
    title: &str,
    artifact: &'static str,
) -> Result<Vec<u8>, ReportError> {
    let columns: Vec<String> = ReportRow::COLUMNS.iter().map(|c| c.to_string()).collect();
    let body: Vec<Vec<String>> = rows.iter().take(limit).map(ReportRow::cells).collect();
    draw_table(title, &columns, &body).encode_png(artifact)
}

fn draw_table(title: &str, columns: &[String], body: &[Vec<String>]) -> Canvas {
    let header: Vec<String> = columns.iter().map(|c| clip(c, MAX_CELL_CHARS)).collect();
    let body: Vec<Vec<String>> = body
        .iter()
        .map(|row| row.iter().map(|c| clip(c, MAX_CELL_CHARS)).collect())
        .collect();

    // Column width fits the widest clipped cell, header included.
    let widths: Vec<u32> = header
        .iter()
        .enumerate()
        .map(|(i, h)| {
            body.iter()
                .filter_map(|row| row.get(i))
                .chain(std::iter::once(h))
                .map(|cell| text_width(cell, 1))
                .max()
                .unwrap_or(0)
                + 2 * PADDING
        })
        .collect();

    let table_width: u32 = widths.iter().sum::<u32>().max(ROW_HEIGHT);
    let table_height = ROW_HEIGHT * (body.len() as u32 + 1);
    let width = (2 * MARGIN + table_width).max(2 * MARGIN + text_width(title, 2));
    let height = TITLE_HEIGHT + table_height + 2 * MARGIN;

    let mut canvas = Canvas::new(width, height);
    canvas.text(MARGIN as i32, MARGIN as i32, title, 2, BLACK);

    let left = MARGIN as i32;
    let top = (MARGIN + TITLE_HEIGHT) as i32;

    canvas.fill_rect(left, top, table_width, ROW_HEIGHT, HEADER_BG);
    draw_row(&mut canvas, left, top, &widths, &header, WHITE);

    for (r, row) in body.iter().enumerate() {
        let y = top + ((r as u32 + 1) * ROW_HEIGHT) as i32;
        if r % 2 == 1 {
            canvas.fill_rect(left, y, table_width, ROW_HEIGHT, STRIPE_BG);
        }
        draw_row(&mut canvas, left, y, &widths, row, BLACK);
    }

    // Grid: one horizontal rule per row boundary, one vertical per column.
    for r in 0..=body.len() as u32 + 1 {
        let y = (top + (r * ROW_HEIGHT) as i32) as f32;
        canvas.line((left as f32, y), ((left as u32 + table_width) as f32, y), GRID);
    }
    let mut x = left;
    canvas.line((x as f32, top as f32), (x as f32, (top as u32 + table_height) as f32), GRID);
    for w in &widths {
        x += *w as i32;
        canvas.line((x as f32, top as f32), (x as f32, (top as u32 + table_height) as f32), GRID);
    }

    canvas
}

fn draw_row(canvas: &mut Canvas, left: i32, y: i32, widths: &[u32], cells: &[String], color: Rgb<u8>) {
    let mut x = left;
    for (cell, w) in cells.iter().zip(widths) {
        canvas.text(x + PADDING as i32, y + PADDING as i32, cell, 1, color);
        x += *w as i32;
    }
}
