mod canvas;
mod error;
mod font;
mod layout;
mod logo;
mod pdf;
mod profile;
mod render;
mod table;
mod types;

pub use canvas::{Canvas, Command, PageDocument};
pub use error::LogoTableError;
pub use font::{BuiltinFonts, FaceFonts, FontMetrics, FontRole};
pub use layout::{
    COLUMN_MARGIN, DOCUMENT_MARGIN, FONT_SIZE, HEADER_HEIGHT, LOGO_UNIT_WIDTH, Layout,
    ROW_HEIGHT, TEXT_LEFT_PADDING,
};
pub use logo::{LogoGraphic, LogoSymbol, SequenceLogo};
pub use pdf::write_pdf;
pub use profile::{ProfileMatrix, StructureContext, validate_sequence};
pub use render::render_table;
pub use table::{
    Cell, CellKind, Column, MotifRow, TableModel, format_abundance, format_ordinal,
    format_p_value,
};
pub use types::{Color, Pt, Rect, Size};

/// A motif summary document: a table of per-motif statistics interleaved
/// with logo graphics, rendered onto a single PDF page sized exactly to its
/// content.
///
/// Rows are appended in presentation order; layout and rendering happen in
/// `save_pdf`, measure pass first, paint pass second.
pub struct LogoSummary {
    model: TableModel,
    fonts: Box<dyn FontMetrics>,
}

impl Default for LogoSummary {
    fn default() -> Self {
        Self::new()
    }
}

impl LogoSummary {
    /// Summary measured with the built-in base-14 font metrics.
    pub fn new() -> Self {
        Self::with_fonts(Box::new(BuiltinFonts))
    }

    pub fn with_fonts(fonts: Box<dyn FontMetrics>) -> Self {
        Self {
            model: TableModel::new(),
            fonts,
        }
    }

    /// Appends one motif row: its profile logo, seed k-mer, seed p-value,
    /// seed and motif abundances in percent, and its context trace logo.
    pub fn add_row(
        &mut self,
        motif: Box<dyn LogoGraphic>,
        seed: impl Into<String>,
        p_value: f64,
        seed_abundance: f64,
        motif_abundance: f64,
        trace: Box<dyn LogoGraphic>,
    ) -> Result<(), LogoTableError> {
        self.model.add_row(
            motif,
            seed,
            p_value,
            seed_abundance,
            motif_abundance,
            trace,
        )
    }

    pub fn row_count(&self) -> usize {
        self.model.row_count()
    }

    pub fn model(&self) -> &TableModel {
        &self.model
    }

    /// Runs the measure pass and the paint pass, without touching the
    /// filesystem. Useful for inspecting the would-be output.
    pub fn render_document(&self) -> PageDocument {
        let layout = Layout::compute(&self.model, self.fonts.as_ref());
        tracing::debug!(
            rows = self.model.row_count(),
            canvas_width_milli = layout.canvas_width.to_milli_i64(),
            canvas_height_milli = layout.canvas_height.to_milli_i64(),
            "layout computed"
        );
        let mut canvas = Canvas::new(layout.canvas_size());
        render_table(&self.model, &layout, &mut canvas);
        tracing::debug!(commands = canvas.command_count(), "table rendered");
        canvas.finish()
    }

    /// Renders the summary and publishes it as a one-page PDF at `path`.
    /// Returns the number of bytes written. On failure no file is left at
    /// the destination.
    pub fn save_pdf(&self, path: impl AsRef<std::path::Path>) -> Result<usize, LogoTableError> {
        let document = self.render_document();
        let bytes = pdf::write_pdf(&document, path.as_ref())?;
        tracing::debug!(
            bytes,
            path = %path.as_ref().display(),
            "summary pdf written"
        );
        Ok(bytes)
    }
}
