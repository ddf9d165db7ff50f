use crate::error::LogoTableError;
use crate::types::Pt;
use std::fs;
use std::path::Path;

/// The three typographic roles the table uses. Each maps onto one of the
/// fourteen standard PDF fonts, so documents stay valid without embedding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FontRole {
    Plain,
    BoldHeader,
    BoldIdentifier,
}

impl FontRole {
    pub const ALL: [FontRole; 3] = [
        FontRole::Plain,
        FontRole::BoldHeader,
        FontRole::BoldIdentifier,
    ];

    pub fn base_font_name(self) -> &'static str {
        match self {
            FontRole::Plain => "Courier",
            FontRole::BoldHeader => "Helvetica-Bold",
            FontRole::BoldIdentifier => "Courier-Bold",
        }
    }

    pub(crate) fn resource_name(self) -> &'static str {
        match self {
            FontRole::Plain => "F1",
            FontRole::BoldHeader => "F2",
            FontRole::BoldIdentifier => "F3",
        }
    }

    fn index(self) -> usize {
        match self {
            FontRole::Plain => 0,
            FontRole::BoldHeader => 1,
            FontRole::BoldIdentifier => 2,
        }
    }
}

/// Width measurement for the layout pass. Implementations must be
/// deterministic: the same text, role, and size always yield the same width,
/// because the measure pass and the paint pass both rely on it.
pub trait FontMetrics {
    fn text_width(&self, text: &str, role: FontRole, size: Pt) -> Pt;
}

const FIRST_CHAR: u8 = 32;
const LAST_CHAR: u8 = 126;

// Advance widths in 1/1000 em for the printable ASCII range of
// Helvetica-Bold, straight from the Adobe core AFM data.
#[rustfmt::skip]
const HELVETICA_BOLD_WIDTHS: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333,
    278, 278, 556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333,
    584, 584, 584, 611, 975, 722, 722, 722, 722, 667, 611, 778, 722, 278,
    556, 722, 611, 833, 722, 778, 667, 778, 722, 667, 611, 722, 667, 944,
    667, 667, 611, 333, 278, 333, 584, 556, 333, 556, 611, 556, 611, 556,
    333, 611, 611, 278, 278, 556, 278, 889, 611, 611, 611, 611, 389, 556,
    333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584,
];

// Courier and Courier-Bold are fixed pitch.
const COURIER_WIDTH: u16 = 600;

/// Metrics provider backed by the static advance tables of the base-14
/// fonts. Construction cannot fail, which makes it the default provider.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinFonts;

impl FontMetrics for BuiltinFonts {
    fn text_width(&self, text: &str, role: FontRole, size: Pt) -> Pt {
        let mut units: i32 = 0;
        for ch in text.chars() {
            units = units.saturating_add(builtin_advance(ch, role) as i32);
        }
        if units <= 0 {
            return Pt::ZERO;
        }
        size.mul_ratio(units, 1000)
    }
}

fn builtin_advance(ch: char, role: FontRole) -> u16 {
    match role {
        FontRole::Plain | FontRole::BoldIdentifier => COURIER_WIDTH,
        FontRole::BoldHeader => {
            let code = ch as u32;
            if code < FIRST_CHAR as u32 || code > LAST_CHAR as u32 {
                // Width of space; out-of-range input still reserves room.
                HELVETICA_BOLD_WIDTHS[0]
            } else {
                HELVETICA_BOLD_WIDTHS[(code - FIRST_CHAR as u32) as usize]
            }
        }
    }
}

#[derive(Debug)]
struct ParsedFace {
    widths: Vec<u16>,
    missing_width: u16,
}

impl ParsedFace {
    fn from_bytes(data: &[u8], source: &str) -> Result<Self, LogoTableError> {
        let face = ttf_parser::Face::parse(data, 0)
            .map_err(|err| LogoTableError::Font(format!("cannot parse {source}: {err}")))?;
        let units_per_em = face.units_per_em().max(1) as i64;
        let mut widths = Vec::with_capacity((LAST_CHAR - FIRST_CHAR + 1) as usize);
        for code in FIRST_CHAR..=LAST_CHAR {
            let advance = char::from_u32(code as u32)
                .and_then(|ch| face.glyph_index(ch))
                .and_then(|gid| face.glyph_hor_advance(gid))
                .unwrap_or(0);
            let scaled = ((advance as i64) * 1000 + (units_per_em / 2)) / units_per_em;
            widths.push(scaled.clamp(0, u16::MAX as i64) as u16);
        }
        let missing_width = widths.first().copied().unwrap_or(0);
        Ok(Self {
            widths,
            missing_width,
        })
    }

    fn advance(&self, ch: char) -> u16 {
        let code = ch as u32;
        if code < FIRST_CHAR as u32 || code > LAST_CHAR as u32 {
            return self.missing_width;
        }
        self.widths
            .get((code - FIRST_CHAR as u32) as usize)
            .copied()
            .unwrap_or(self.missing_width)
    }
}

/// Metrics provider backed by real font files, one face per role. Any face
/// that cannot be read or parsed aborts construction: a partially resolved
/// set of metrics would silently skew every column width downstream.
#[derive(Debug)]
pub struct FaceFonts {
    faces: [ParsedFace; 3],
}

impl FaceFonts {
    pub fn from_files(
        plain: impl AsRef<Path>,
        bold_header: impl AsRef<Path>,
        bold_identifier: impl AsRef<Path>,
    ) -> Result<Self, LogoTableError> {
        let load = |path: &Path| -> Result<ParsedFace, LogoTableError> {
            let data = fs::read(path).map_err(|err| {
                LogoTableError::Font(format!("cannot read {}: {err}", path.display()))
            })?;
            ParsedFace::from_bytes(&data, &path.display().to_string())
        };
        Ok(Self {
            faces: [
                load(plain.as_ref())?,
                load(bold_header.as_ref())?,
                load(bold_identifier.as_ref())?,
            ],
        })
    }

    pub fn from_bytes(
        plain: &[u8],
        bold_header: &[u8],
        bold_identifier: &[u8],
    ) -> Result<Self, LogoTableError> {
        Ok(Self {
            faces: [
                ParsedFace::from_bytes(plain, "plain face")?,
                ParsedFace::from_bytes(bold_header, "bold header face")?,
                ParsedFace::from_bytes(bold_identifier, "bold identifier face")?,
            ],
        })
    }
}

impl FontMetrics for FaceFonts {
    fn text_width(&self, text: &str, role: FontRole, size: Pt) -> Pt {
        let face = &self.faces[role.index()];
        let mut units: i32 = 0;
        for ch in text.chars() {
            units = units.saturating_add(face.advance(ch) as i32);
        }
        if units <= 0 {
            return Pt::ZERO;
        }
        size.mul_ratio(units, 1000)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn courier_roles_are_fixed_pitch() {
        let fonts = BuiltinFonts;
        let size = Pt::from_i32(65);
        let one = fonts.text_width("G", FontRole::Plain, size);
        let five = fonts.text_width("GATTA", FontRole::Plain, size);
        assert_eq!(five.to_milli_i64(), one.to_milli_i64() * 5);
        assert_eq!(
            fonts.text_width("1)", FontRole::BoldIdentifier, size),
            fonts.text_width("2)", FontRole::BoldIdentifier, size)
        );
    }

    #[test]
    fn helvetica_bold_is_proportional() {
        let fonts = BuiltinFonts;
        let size = Pt::from_i32(65);
        let narrow = fonts.text_width("i", FontRole::BoldHeader, size);
        let wide = fonts.text_width("W", FontRole::BoldHeader, size);
        assert!(wide > narrow);
        // W is 944/1000 em in Helvetica-Bold.
        assert_eq!(wide.to_milli_i64(), Pt::from_i32(65).mul_ratio(944, 1000).to_milli_i64());
    }

    #[test]
    fn measurement_is_deterministic() {
        let fonts = BuiltinFonts;
        let size = Pt::from_i32(65);
        let a = fonts.text_width("Seed P-value", FontRole::BoldHeader, size);
        let b = fonts.text_width("Seed P-value", FontRole::BoldHeader, size);
        assert_eq!(a, b);
    }

    #[test]
    fn empty_text_measures_zero() {
        let fonts = BuiltinFonts;
        assert_eq!(
            fonts.text_width("", FontRole::Plain, Pt::from_i32(65)),
            Pt::ZERO
        );
    }

    #[test]
    fn invalid_face_bytes_are_a_fatal_font_error() {
        let bogus = b"not a font";
        let err = FaceFonts::from_bytes(bogus, bogus, bogus).unwrap_err();
        assert!(matches!(err, LogoTableError::Font(_)));
    }

    #[test]
    fn missing_face_file_is_a_fatal_font_error() {
        let missing = std::path::Path::new("/nonexistent/face.ttf");
        let err = FaceFonts::from_files(missing, missing, missing).unwrap_err();
        assert!(matches!(err, LogoTableError::Font(_)));
    }
}
