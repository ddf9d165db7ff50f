use crate::canvas::Canvas;
use crate::error::LogoTableError;
use crate::font::FontRole;
use crate::profile::{ProfileMatrix, StructureContext};
use crate::types::{Color, Rect};

/// An embedded vector graphic the table can place. The engine only ever
/// asks for the intrinsic unit count (horizontal positions depicted) and
/// delegates painting; it never inspects the graphic's internals.
pub trait LogoGraphic {
    fn unit_count(&self) -> usize;

    /// Paints the graphic into `region` of the canvas. The region's width
    /// is the measured width from the layout pass, its height the row band.
    fn paint(&self, canvas: &mut Canvas, region: Rect);
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LogoSymbol {
    pub label: char,
    pub color: Color,
}

// Letters below this size would not survive print resolution.
const MIN_LETTER_PT: f32 = 14.0;

// Courier advance per em; used to center letters inside a logo slot.
const LETTER_ADVANCE: f32 = 0.6;

/// A stacked-bar sequence logo: one slot per position, each slot split
/// vertically in proportion to its symbol weights.
#[derive(Debug)]
pub struct SequenceLogo {
    symbols: Vec<LogoSymbol>,
    weights: Vec<Vec<f64>>,
}

impl SequenceLogo {
    /// `weights[pos][i]` is the weight of `symbols[i]` at `pos`. Rows must
    /// match the symbol set and weights must be finite and non-negative.
    pub fn new(
        symbols: Vec<LogoSymbol>,
        weights: Vec<Vec<f64>>,
    ) -> Result<Self, LogoTableError> {
        if symbols.is_empty() {
            return Err(LogoTableError::MalformedModel(
                "logo has no symbols".to_string(),
            ));
        }
        for (pos, row) in weights.iter().enumerate() {
            if row.len() != symbols.len() {
                return Err(LogoTableError::MalformedModel(format!(
                    "logo position {pos} has {} weights for {} symbols",
                    row.len(),
                    symbols.len()
                )));
            }
            for (i, weight) in row.iter().enumerate() {
                if !weight.is_finite() || *weight < 0.0 {
                    return Err(LogoTableError::MalformedModel(format!(
                        "logo weight at position {pos}, symbol {i} is invalid: {weight}"
                    )));
                }
            }
        }
        Ok(Self { symbols, weights })
    }

    /// Builds the six-context structural trace logo from a converted
    /// profile matrix.
    pub fn from_profile(matrix: &ProfileMatrix) -> Self {
        let symbols = StructureContext::ALL
            .iter()
            .map(|context| LogoSymbol {
                label: context.symbol(),
                color: context_color(*context),
            })
            .collect();
        let weights = (0..matrix.len())
            .map(|pos| {
                StructureContext::ALL
                    .iter()
                    .map(|context| matrix.probability(pos, *context))
                    .collect()
            })
            .collect();
        // Matrix rows are validated on conversion, so this cannot fail.
        Self { symbols, weights }
    }
}

fn context_color(context: StructureContext) -> Color {
    match context {
        StructureContext::Hairpin => Color::rgb(0.894, 0.102, 0.110),
        StructureContext::Inner => Color::rgb(0.216, 0.494, 0.722),
        StructureContext::Bulge => Color::rgb(0.302, 0.686, 0.290),
        StructureContext::Multi => Color::rgb(0.596, 0.306, 0.639),
        StructureContext::Dangling => Color::rgb(1.0, 0.498, 0.0),
        StructureContext::Paired => Color::rgb(0.4, 0.4, 0.4),
    }
}

impl LogoGraphic for SequenceLogo {
    fn unit_count(&self) -> usize {
        self.weights.len()
    }

    fn paint(&self, canvas: &mut Canvas, region: Rect) {
        let units = self.weights.len();
        if units == 0 {
            return;
        }
        canvas.save_state();
        let slot_width = region.width / units as i32;
        for (pos, row) in self.weights.iter().enumerate() {
            let total: f64 = row.iter().sum();
            if total <= 0.0 {
                continue;
            }
            let x = region.x + slot_width * pos as i32;
            let mut bottom = region.y;
            for (symbol, weight) in self.symbols.iter().zip(row) {
                let fraction = (weight / total) as f32;
                if fraction <= 0.0 {
                    continue;
                }
                let segment_height = region.height * fraction;
                canvas.set_fill_color(symbol.color);
                canvas.draw_rect(x, bottom, slot_width, segment_height);
                canvas.fill();

                let letter_size = segment_height.min(slot_width);
                if letter_size.to_f32() >= MIN_LETTER_PT {
                    let letter_x = x + (slot_width - letter_size * LETTER_ADVANCE) / 2;
                    let letter_y = bottom + (segment_height - letter_size * 0.7) / 2;
                    canvas.set_fill_color(Color::rgb(1.0, 1.0, 1.0));
                    canvas.set_font(FontRole::Plain, letter_size);
                    canvas.draw_string(letter_x, letter_y, symbol.label.to_string());
                }
                bottom += segment_height;
            }
        }
        canvas.restore_state();
    }
}
