use crate::font::FontRole;
use crate::types::{Color, Pt, Size};

/// A recorded paint operation. Coordinates are PDF user space: origin at the
/// bottom-left corner of the page, y increasing upward.
#[derive(Debug, Clone)]
pub enum Command {
    SaveState,
    RestoreState,
    SetFillColor(Color),
    SetStrokeColor(Color),
    SetLineWidth(Pt),
    // Applies fill and stroke alpha (ca/CA). Values outside 0..1 are clamped.
    SetOpacity {
        fill: f32,
        stroke: f32,
    },
    SetFont {
        role: FontRole,
        size: Pt,
    },
    MoveTo {
        x: Pt,
        y: Pt,
    },
    LineTo {
        x: Pt,
        y: Pt,
    },
    Stroke,
    DrawRect {
        x: Pt,
        y: Pt,
        width: Pt,
        height: Pt,
    },
    Fill,
    DrawString {
        x: Pt,
        y: Pt,
        text: String,
    },
}

/// One finished page plus its exact extent. The summary document is always a
/// single page sized to its content, so there is no page list.
#[derive(Debug, Clone)]
pub struct PageDocument {
    pub page_size: Size,
    pub commands: Vec<Command>,
}

#[derive(Debug, Clone)]
struct GraphicsState {
    fill_color: Color,
    stroke_color: Color,
    line_width: Pt,
    font: Option<(FontRole, Pt)>,
}

impl GraphicsState {
    fn initial() -> Self {
        Self {
            fill_color: Color::BLACK,
            stroke_color: Color::BLACK,
            line_width: Pt::from_f32(1.0),
            font: None,
        }
    }
}

/// Records paint operations for a single content-sized page. Redundant state
/// changes are elided so the serialized content stream stays small.
pub struct Canvas {
    page_size: Size,
    commands: Vec<Command>,
    state_stack: Vec<GraphicsState>,
    current_state: GraphicsState,
}

impl Canvas {
    pub fn new(page_size: Size) -> Self {
        Self {
            page_size,
            commands: Vec::new(),
            state_stack: Vec::new(),
            current_state: GraphicsState::initial(),
        }
    }

    pub fn page_size(&self) -> Size {
        self.page_size
    }

    pub fn save_state(&mut self) {
        self.state_stack.push(self.current_state.clone());
        self.commands.push(Command::SaveState);
    }

    pub fn restore_state(&mut self) {
        if let Some(state) = self.state_stack.pop() {
            self.current_state = state;
            self.commands.push(Command::RestoreState);
        }
    }

    pub fn set_fill_color(&mut self, color: Color) {
        if self.current_state.fill_color == color {
            return;
        }
        self.current_state.fill_color = color;
        self.commands.push(Command::SetFillColor(color));
    }

    pub fn set_stroke_color(&mut self, color: Color) {
        if self.current_state.stroke_color == color {
            return;
        }
        self.current_state.stroke_color = color;
        self.commands.push(Command::SetStrokeColor(color));
    }

    pub fn set_line_width(&mut self, width: Pt) {
        let width = if width < Pt::ZERO { Pt::ZERO } else { width };
        if self.current_state.line_width == width {
            return;
        }
        self.current_state.line_width = width;
        self.commands.push(Command::SetLineWidth(width));
    }

    pub fn set_opacity(&mut self, fill: f32, stroke: f32) {
        self.commands.push(Command::SetOpacity {
            fill: fill.clamp(0.0, 1.0),
            stroke: stroke.clamp(0.0, 1.0),
        });
    }

    pub fn set_font(&mut self, role: FontRole, size: Pt) {
        if self.current_state.font == Some((role, size)) {
            return;
        }
        self.current_state.font = Some((role, size));
        self.commands.push(Command::SetFont { role, size });
    }

    pub fn move_to(&mut self, x: Pt, y: Pt) {
        self.commands.push(Command::MoveTo { x, y });
    }

    pub fn line_to(&mut self, x: Pt, y: Pt) {
        self.commands.push(Command::LineTo { x, y });
    }

    pub fn stroke(&mut self) {
        self.commands.push(Command::Stroke);
    }

    pub fn draw_rect(&mut self, x: Pt, y: Pt, width: Pt, height: Pt) {
        self.commands.push(Command::DrawRect {
            x,
            y,
            width,
            height,
        });
    }

    pub fn fill(&mut self) {
        self.commands.push(Command::Fill);
    }

    pub fn draw_string(&mut self, x: Pt, y: Pt, text: impl Into<String>) {
        self.commands.push(Command::DrawString {
            x,
            y,
            text: text.into(),
        });
    }

    pub fn command_count(&self) -> usize {
        self.commands.len()
    }

    pub fn finish(self) -> PageDocument {
        PageDocument {
            page_size: self.page_size,
            commands: self.commands,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_canvas() -> Canvas {
        Canvas::new(Size {
            width: Pt::from_i32(100),
            height: Pt::from_i32(100),
        })
    }

    #[test]
    fn redundant_state_changes_are_elided() {
        let mut canvas = small_canvas();
        canvas.set_fill_color(Color::rgb(0.8, 0.8, 0.8));
        canvas.set_fill_color(Color::rgb(0.8, 0.8, 0.8));
        canvas.set_font(FontRole::Plain, Pt::from_i32(65));
        canvas.set_font(FontRole::Plain, Pt::from_i32(65));
        assert_eq!(canvas.command_count(), 2);
    }

    #[test]
    fn restore_rewinds_tracked_state() {
        let mut canvas = small_canvas();
        canvas.set_fill_color(Color::rgb(0.8, 0.8, 0.8));
        canvas.save_state();
        canvas.set_fill_color(Color::BLACK);
        canvas.restore_state();
        // Same color as before the save; setting it again must re-emit
        // nothing.
        canvas.set_fill_color(Color::rgb(0.8, 0.8, 0.8));
        let doc = canvas.finish();
        let fills = doc
            .commands
            .iter()
            .filter(|cmd| matches!(cmd, Command::SetFillColor(_)))
            .count();
        assert_eq!(fills, 2);
    }

    #[test]
    fn unbalanced_restore_is_ignored() {
        let mut canvas = small_canvas();
        canvas.restore_state();
        assert_eq!(canvas.command_count(), 0);
    }

    #[test]
    fn opacity_is_clamped() {
        let mut canvas = small_canvas();
        canvas.set_opacity(1.5, -0.5);
        let doc = canvas.finish();
        match &doc.commands[0] {
            Command::SetOpacity { fill, stroke } => {
                assert_eq!(*fill, 1.0);
                assert_eq!(*stroke, 0.0);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }
}
