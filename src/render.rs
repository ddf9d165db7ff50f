use crate::canvas::Canvas;
use crate::font::FontRole;
use crate::layout::{Layout, graphic_width};
use crate::table::{Cell, Column, TableModel};
use crate::types::{Color, Pt, Rect};

const SHADING_COLOR: Color = Color {
    r: 0.8,
    g: 0.8,
    b: 0.8,
};

// 150/255 alpha for the alternating row bands.
const SHADING_ALPHA: f32 = 0.588;

const SEPARATOR_WIDTH: f32 = 2.0;

/// Paint pass. Walks the model top row first in a bottom-left-origin
/// coordinate system, using only widths and extents the layout pass already
/// fixed; nothing is re-measured here.
pub fn render_table(model: &TableModel, layout: &Layout, canvas: &mut Canvas) {
    render_header(layout, canvas);

    for (index, row) in model.rows().iter().enumerate() {
        let display_index = index + 1;
        // Bottom edge of this row's band; every cell in the row derives
        // from it so the row stays vertically aligned.
        let band_bottom =
            layout.canvas_height - layout.header_height - layout.row_height * display_index as i32;
        let baseline = band_bottom + layout.row_height / 2 - layout.font_size / 2;

        if display_index % 2 == 0 {
            shade_band(layout, canvas, band_bottom);
        }

        for (column_index, column) in Column::ALL.iter().enumerate() {
            let x = layout.column_x(column_index);
            match row.cell(*column) {
                Cell::Text { text, role } => {
                    let x = if column.text_left_padded() {
                        x + layout.text_left_padding
                    } else {
                        x
                    };
                    canvas.set_fill_color(Color::BLACK);
                    canvas.set_font(role, layout.font_size);
                    canvas.draw_string(x, baseline, text);
                }
                Cell::Graphic(graphic) => {
                    graphic.paint(
                        canvas,
                        Rect {
                            x,
                            y: band_bottom,
                            width: graphic_width(graphic.unit_count()),
                            height: layout.row_height,
                        },
                    );
                }
            }
        }
    }
}

fn render_header(layout: &Layout, canvas: &mut Canvas) {
    let header_y = layout.canvas_height - layout.header_height / 2;
    canvas.set_fill_color(Color::BLACK);
    canvas.set_font(FontRole::BoldHeader, layout.font_size);
    for (column_index, column) in Column::ALL.iter().enumerate() {
        let mut x = layout.column_x(column_index);
        if column.text_left_padded() {
            x += layout.text_left_padding;
        }
        canvas.draw_string(x, header_y, column.label());
    }

    // Separator directly beneath the header band.
    let separator_y = layout.canvas_height - layout.header_height;
    canvas.set_stroke_color(Color::BLACK);
    canvas.set_line_width(Pt::from_f32(SEPARATOR_WIDTH));
    canvas.move_to(layout.document_margin, separator_y);
    canvas.line_to(layout.canvas_width - layout.document_margin, separator_y);
    canvas.stroke();
}

fn shade_band(layout: &Layout, canvas: &mut Canvas, band_bottom: Pt) {
    let inset = layout.column_margin / 2;
    canvas.save_state();
    canvas.set_fill_color(SHADING_COLOR);
    canvas.set_opacity(SHADING_ALPHA, SHADING_ALPHA);
    canvas.draw_rect(
        inset,
        band_bottom,
        layout.canvas_width - inset * 2,
        layout.row_height,
    );
    canvas.fill();
    canvas.restore_state();
}
