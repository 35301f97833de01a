//! Export stage: render every artifact for one run into the output directory.
//!
//! All filenames share one timestamp token captured at export start, so the
//! artifacts of a run can be matched up by name:
//! - `report_<ts>.csv`, `report_<ts>.json`, `report_<ts>.html`
//! - `report_<ts>.pdf` and `chart_<ts>.png` (extended variant)
//! - `before_data_<ts>.png`, `after_data_<ts>.png`, `csv_preview_<ts>.png`
//!   (extended variant)
//!
//! Files are created write-once; an existing file with the same name is an
//! I/O error, never overwritten. The first failing artifact stops the export.
//! Artifacts already written stay on disk.

pub mod chart;
pub mod html;
pub mod pdf;
pub mod preview;
pub mod raster;
pub mod tabular;

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use cryptoreport_core::{Clock, ExportVariant, RawTable, ReportConfig, ReportError, ReportRow, RunLog};

pub const REPORT_TITLE: &str = "Crypto Market Report";

const TOKEN_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";
const LABEL_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// The run timestamp, captured once and reused for every artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunStamp {
    /// Filename token, `YYYY-MM-DD_HH-MM-SS` in local time.
    pub token: String,
    /// Display form for the "Generated:" lines.
    pub label: String,
}

impl RunStamp {
    pub fn capture(clock: &dyn Clock) -> Self {
        let now = clock.local_now();
        Self {
            token: now.format(TOKEN_FORMAT).to_string(),
            label: now.format(LABEL_FORMAT).to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArtifactKind {
    Csv,
    Json,
    Html,
    Pdf,
    Chart,
    BeforePreview,
    AfterPreview,
    CsvPreview,
}

impl ArtifactKind {
    pub const ALL: [ArtifactKind; 8] = [
        ArtifactKind::Csv,
        ArtifactKind::Json,
        ArtifactKind::Html,
        ArtifactKind::Pdf,
        ArtifactKind::Chart,
        ArtifactKind::BeforePreview,
        ArtifactKind::AfterPreview,
        ArtifactKind::CsvPreview,
    ];

    const BASIC: [ArtifactKind; 3] = [ArtifactKind::Csv, ArtifactKind::Json, ArtifactKind::Html];

    /// Artifacts written by `variant`, in write order.
    pub fn for_variant(variant: ExportVariant) -> &'static [ArtifactKind] {
        match variant {
            ExportVariant::Basic => &Self::BASIC,
            ExportVariant::Extended => &Self::ALL,
        }
    }

    pub fn file_name(self, token: &str) -> String {
        match self {
            ArtifactKind::Csv => format!("report_{token}.csv"),
            ArtifactKind::Json => format!("report_{token}.json"),
            ArtifactKind::Html => format!("report_{token}.html"),
            ArtifactKind::Pdf => format!("report_{token}.pdf"),
            ArtifactKind::Chart => format!("chart_{token}.png"),
            ArtifactKind::BeforePreview => format!("before_data_{token}.png"),
            ArtifactKind::AfterPreview => format!("after_data_{token}.png"),
            ArtifactKind::CsvPreview => format!("csv_preview_{token}.png"),
        }
    }

    /// Name used in run log lines and render errors.
    pub fn label(self) -> &'static str {
        match self {
            ArtifactKind::Csv => "CSV",
            ArtifactKind::Json => "JSON",
            ArtifactKind::Html => "HTML",
            ArtifactKind::Pdf => "PDF",
            ArtifactKind::Chart => "chart",
            ArtifactKind::BeforePreview => "before preview",
            ArtifactKind::AfterPreview => "after preview",
            ArtifactKind::CsvPreview => "CSV preview",
        }
    }
}

/// One file written by the exporter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportArtifact {
    pub kind: ArtifactKind,
    pub path: PathBuf,
}

pub struct Exporter {
    output_dir: PathBuf,
    variant: ExportVariant,
    preview_rows: usize,
    vs_currency: String,
    clock: Arc<dyn Clock>,
    log: Arc<RunLog>,
}

impl Exporter {
    pub fn new(config: &ReportConfig, clock: Arc<dyn Clock>, log: Arc<RunLog>) -> Self {
        Self {
            output_dir: config.output_dir.clone(),
            variant: config.variant,
            preview_rows: config.preview_rows,
            vs_currency: config.vs_currency.clone(),
            clock,
            log,
        }
    }

    pub fn export(&self, raw: &RawTable, rows: &[ReportRow]) -> Result<Vec<ReportArtifact>, ReportError> {
        let stamp = RunStamp::capture(self.clock.as_ref());
        fs::create_dir_all(&self.output_dir).map_err(|e| ReportError::io(&self.output_dir, e))?;

        let kinds = ArtifactKind::for_variant(self.variant);
        let mut artifacts = Vec::with_capacity(kinds.len());
        for &kind in kinds {
            let path = self.output_dir.join(kind.file_name(&stamp.token));
            self.log.log(format!("Saving {}: {}", kind.label(), path.display()))?;
            let bytes = self.render(kind, raw, rows, &stamp)?;
            write_new(&path, &bytes)?;
            tracing::debug!(artifact = kind.label(), bytes = bytes.len(), path = %path.display(), "artifact written");
            artifacts.push(ReportArtifact { kind, path });
        }

        self.log.log("Export complete.")?;
        Ok(artifacts)
    }

    fn render(
        &self,
        kind: ArtifactKind,
        raw: &RawTable,
        rows: &[ReportRow],
        stamp: &RunStamp,
    ) -> Result<Vec<u8>, ReportError> {
        let n = self.preview_rows;
        match kind {
            ArtifactKind::Csv => tabular::render_csv(rows).map(String::into_bytes),
            ArtifactKind::Json => tabular::render_json(rows).map(String::into_bytes),
            ArtifactKind::Html => html::render_html(rows, &stamp.label).map(String::into_bytes),
            ArtifactKind::Pdf => pdf::render_pdf(rows, &stamp.label),
            ArtifactKind::Chart => chart::render_price_chart(rows, &self.vs_currency),
            ArtifactKind::BeforePreview => {
                preview::render_raw_preview(raw, n, "Raw data (before cleaning)", "before preview")
            }
            ArtifactKind::AfterPreview => {
                preview::render_rows_preview(rows, n, "Cleaned data (after transform)", "after preview")
            }
            ArtifactKind::CsvPreview => {
                preview::render_rows_preview(rows, n, "CSV preview", "CSV preview")
            }
        }
    }
}

fn write_new(path: &Path, bytes: &[u8]) -> Result<(), ReportError> {
    let mut file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .map_err(|e| ReportError::io(path, e))?;
    file.write_all(bytes).map_err(|e| ReportError::io(path, e))?;
    file.flush().map_err(|e| ReportError::io(path, e))
}
