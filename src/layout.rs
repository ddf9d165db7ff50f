use crate::font::{FontMetrics, FontRole};
use crate::table::{Cell, Column, TableModel};
use crate::types::{Pt, Size};

// Fixed geometry of the summary page, in points.
pub const DOCUMENT_MARGIN: f32 = 50.0;
pub const COLUMN_MARGIN: f32 = 110.0;
pub const HEADER_HEIGHT: f32 = 150.0;
pub const ROW_HEIGHT: f32 = 150.0;
pub const FONT_SIZE: f32 = 65.0;
pub const TEXT_LEFT_PADDING: f32 = 75.0;

// Width reserved per logo position.
pub const LOGO_UNIT_WIDTH: i32 = 150;

pub(crate) fn graphic_width(unit_count: usize) -> Pt {
    let units = i32::try_from(unit_count).unwrap_or(i32::MAX);
    Pt::from_i32(LOGO_UNIT_WIDTH) * units
}

/// Output of the measure pass: per-column widths and the canvas extent.
/// Derived data only; recompute after the model changes.
#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    pub column_widths: [Pt; Column::COUNT],
    pub canvas_width: Pt,
    pub canvas_height: Pt,
    pub header_height: Pt,
    pub row_height: Pt,
    pub document_margin: Pt,
    pub column_margin: Pt,
    pub font_size: Pt,
    pub text_left_padding: Pt,
}

impl Layout {
    /// Single linear pass: seed each column with its header label width,
    /// then take the max over every data cell.
    pub fn compute(model: &TableModel, fonts: &dyn FontMetrics) -> Layout {
        let font_size = Pt::from_f32(FONT_SIZE);
        let mut column_widths = [Pt::ZERO; Column::COUNT];

        for (i, column) in Column::ALL.iter().enumerate() {
            column_widths[i] =
                fonts.text_width(column.label(), FontRole::BoldHeader, font_size);
        }

        for row in model.rows() {
            for (i, column) in Column::ALL.iter().enumerate() {
                let width = match row.cell(*column) {
                    Cell::Text { text, role } => fonts.text_width(&text, role, font_size),
                    Cell::Graphic(graphic) => graphic_width(graphic.unit_count()),
                };
                column_widths[i] = column_widths[i].max(width);
            }
        }

        let document_margin = Pt::from_f32(DOCUMENT_MARGIN);
        let column_margin = Pt::from_f32(COLUMN_MARGIN);
        let header_height = Pt::from_f32(HEADER_HEIGHT);
        let row_height = Pt::from_f32(ROW_HEIGHT);

        let content_width: Pt = column_widths.iter().sum();
        let canvas_width =
            content_width + column_margin * (Column::COUNT as i32) + document_margin * 2;
        let canvas_height = header_height + row_height * (model.row_count() as i32);

        Layout {
            column_widths,
            canvas_width,
            canvas_height,
            header_height,
            row_height,
            document_margin,
            column_margin,
            font_size,
            text_left_padding: Pt::from_f32(TEXT_LEFT_PADDING),
        }
    }

    pub fn canvas_size(&self) -> Size {
        Size {
            width: self.canvas_width,
            height: self.canvas_height,
        }
    }

    /// x-origin of column `index`: the document margin plus every earlier
    /// column's width and trailing inter-column margin.
    pub fn column_x(&self, index: usize) -> Pt {
        let mut x = self.document_margin;
        for width in &self.column_widths[..index] {
            x += *width + self.column_margin;
        }
        x
    }
}
