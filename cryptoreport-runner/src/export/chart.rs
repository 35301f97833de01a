//! Price bar chart: one bar per row, x = symbol, y = current price.

use cryptoreport_core::{ReportError, ReportRow};

use super::raster::{clip, text_width, Canvas, BAR, BLACK, GRID};

const SLOT_WIDTH: u32 = 80;
const MIN_WIDTH: u32 = 640;
const HEIGHT: u32 = 480;
const MARGIN_LEFT: u32 = 110;
const MARGIN_RIGHT: u32 = 30;
const MARGIN_TOP: u32 = 60;
const MARGIN_BOTTOM: u32 = 120;
const Y_TICKS: f64 = 5.0;
const MAX_TICKS: usize = 10;
const MAX_LABEL_CHARS: usize = 12;

/// Axis ticks from zero up to a rounded ceiling covering `max`.
pub(crate) fn axis_ticks(max: f64) -> Vec<f64> {
    let max = if max.is_finite() && max > 0.0 { max } else { 1.0 };
    let mut step = nice_step(max / Y_TICKS);
    // Subnormal maxima underflow the step to zero.
    if !(step.is_finite() && step > 0.0) {
        step = max;
    }
    let count = ((max / step).ceil().max(1.0) as usize).min(MAX_TICKS);
    (0..=count).map(|i| i as f64 * step).collect()
}

/// Round `raw` up to 1, 2, 5 or 10 times a power of ten.
fn nice_step(raw: f64) -> f64 {
    let magnitude = 10f64.powf(raw.log10().floor());
    let residual = raw / magnitude;
    let nice = if residual <= 1.0 {
        1.0
    } else if residual <= 2.0 {
        2.0
    } else if residual <= 5.0 {
        5.0
    } else {
        10.0
    };
    nice * magnitude
}

fn tick_label(value: f64, step: f64) -> String {
    if step >= 1.0 {
        format!("{value:.0}")
    } else {
        let decimals = ((-step.log10()).ceil() as usize).min(12);
        format!("{value:.decimals$}")
    }
}

pub fn render_price_chart(rows: &[ReportRow], vs_currency: &str) -> Result<Vec<u8>, ReportError> {
    let plot_width = (rows.len() as u32 * SLOT_WIDTH).max(MIN_WIDTH - MARGIN_LEFT - MARGIN_RIGHT);
    let width = MARGIN_LEFT + plot_width + MARGIN_RIGHT;
    let plot_height = HEIGHT - MARGIN_TOP - MARGIN_BOTTOM;
    let (x0, y_axis) = (MARGIN_LEFT as i32, (MARGIN_TOP + plot_height) as i32);

    let mut canvas = Canvas::new(width, HEIGHT);

    let title = format!("Current Price ({})", vs_currency.to_uppercase());
    let title_x = (width.saturating_sub(text_width(&title, 2)) / 2) as i32;
    canvas.text(title_x, 20, &title, 2, BLACK);

    let max_price = rows.iter().map(|r| r.current_price).fold(0.0, f64::max);
    let ticks = axis_ticks(max_price);
    let top = ticks.last().copied().unwrap_or(1.0);
    let step = if ticks.len() > 1 { ticks[1] } else { top };
    let to_y = |v: f64| y_axis as f32 - (v / top) as f32 * plot_height as f32;

    for &tick in &ticks {
        let y = to_y(tick);
        canvas.line((x0 as f32, y), ((x0 as u32 + plot_width) as f32, y), GRID);
        let label = tick_label(tick, step);
        let lx = x0 - 8 - text_width(&label, 1) as i32;
        canvas.text(lx, y as i32 - 4, &label, 1, BLACK);
    }

    let slot = if rows.is_empty() {
        SLOT_WIDTH
    } else {
        plot_width / rows.len() as u32
    };
    let bar_width = slot * 3 / 5;
    for (i, row) in rows.iter().enumerate() {
        let slot_x = x0 + (i as u32 * slot) as i32;
        let bar_x = slot_x + ((slot - bar_width) / 2) as i32;
        let bar_top = to_y(row.current_price.max(0.0));
        let bar_height = (y_axis as f32 - bar_top).round() as u32;
        canvas.fill_rect(bar_x, y_axis - bar_height as i32, bar_width, bar_height, BAR);

        let label = clip(&row.symbol, MAX_LABEL_CHARS);
        let label_x = slot_x + (slot / 2) as i32 - 4;
        let label_y = y_axis + 8 + text_width(&label, 1) as i32;
        canvas.text_vertical(label_x, label_y, &label, 1, BLACK);
    }

    canvas.line((x0 as f32, MARGIN_TOP as f32), (x0 as f32, y_axis as f32), BLACK);
    canvas.line(
        (x0 as f32, y_axis as f32),
        ((x0 as u32 + plot_width) as f32, y_axis as f32),
        BLACK,
    );

    let axis_label = "Symbol";
    let ax = x0 + ((plot_width - text_width(axis_label, 1)) / 2) as i32;
    canvas.text(ax, HEIGHT as i32 - 20, axis_label, 1, BLACK);

    canvas.encode_png("chart")
}
