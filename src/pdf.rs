use crate::canvas::{Command, PageDocument};
use crate::error::LogoTableError;
use crate::font::FontRole;
use crate::types::Pt;
use lopdf::{Document as LoDocument, Object as LoObject, Stream as LoStream, dictionary};
use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

fn lopdf_err(err: std::io::Error) -> LogoTableError {
    LogoTableError::Pdf(format!("pdf serialize error: {err}"))
}

type AlphaKey = (i64, i64);

fn alpha_key(fill: f32, stroke: f32) -> AlphaKey {
    (
        (fill as f64 * 1000.0).round() as i64,
        (stroke as f64 * 1000.0).round() as i64,
    )
}

/// Serializes a finished page into PDF bytes: one page sized to the canvas
/// extent, base-14 font resources, ExtGState entries for every distinct
/// opacity the command stream uses.
pub(crate) fn pdf_bytes(document: &PageDocument) -> Result<Vec<u8>, LogoTableError> {
    let mut gs_names: BTreeMap<AlphaKey, String> = BTreeMap::new();
    for command in &document.commands {
        if let Command::SetOpacity { fill, stroke } = command {
            let key = alpha_key(*fill, *stroke);
            let next = gs_names.len() + 1;
            gs_names.entry(key).or_insert_with(|| format!("GS{next}"));
        }
    }

    let content = content_stream(document, &gs_names);

    let mut doc = LoDocument::with_version("1.7");
    let pages_id = doc.new_object_id();

    let mut font_dict = lopdf::Dictionary::new();
    for role in FontRole::ALL {
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => role.base_font_name(),
            "Encoding" => "WinAnsiEncoding",
        });
        font_dict.set(role.resource_name(), font_id);
    }

    let mut resources = lopdf::Dictionary::new();
    resources.set("Font", LoObject::Dictionary(font_dict));
    if !gs_names.is_empty() {
        let mut gs_dict = lopdf::Dictionary::new();
        for ((fill_milli, stroke_milli), name) in &gs_names {
            let gs_id = doc.add_object(dictionary! {
                "Type" => "ExtGState",
                "ca" => LoObject::Real(*fill_milli as f32 / 1000.0),
                "CA" => LoObject::Real(*stroke_milli as f32 / 1000.0),
            });
            gs_dict.set(name.as_str(), gs_id);
        }
        resources.set("ExtGState", LoObject::Dictionary(gs_dict));
    }
    let resources_id = doc.add_object(LoObject::Dictionary(resources));

    let content_id = doc.add_object(LoStream::new(dictionary! {}, content));
    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => content_id,
        "Resources" => resources_id,
        "MediaBox" => vec![
            0.into(),
            0.into(),
            LoObject::Real(document.page_size.width.to_f32()),
            LoObject::Real(document.page_size.height.to_f32()),
        ],
    });
    let pages = dictionary! {
        "Type" => "Pages",
        "Kids" => vec![page_id.into()],
        "Count" => 1,
    };
    doc.objects.insert(pages_id, LoObject::Dictionary(pages));
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.compress();

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).map_err(lopdf_err)?;
    Ok(bytes)
}

/// Writes the document to `path`, never leaving a partial file there: bytes
/// go to a sibling temp file first and are renamed into place only once the
/// write succeeded. The destination directory must already exist.
pub fn write_pdf(
    document: &PageDocument,
    path: impl AsRef<Path>,
) -> Result<usize, LogoTableError> {
    let path = path.as_ref();
    let bytes = pdf_bytes(document)?;
    let tmp = temp_sibling(path)?;
    fs::write(&tmp, &bytes)?;
    if let Err(err) = fs::rename(&tmp, path) {
        let _ = fs::remove_file(&tmp);
        return Err(err.into());
    }
    Ok(bytes.len())
}

fn temp_sibling(path: &Path) -> Result<PathBuf, LogoTableError> {
    let Some(name) = path.file_name() else {
        return Err(LogoTableError::Pdf(format!(
            "destination {} has no file name",
            path.display()
        )));
    };
    let mut tmp_name = name.to_os_string();
    tmp_name.push(".tmp");
    Ok(path.with_file_name(tmp_name))
}

fn content_stream(document: &PageDocument, gs_names: &BTreeMap<AlphaKey, String>) -> Vec<u8> {
    let mut out = String::new();
    let mut font: Option<(FontRole, Pt)> = None;
    for command in &document.commands {
        match command {
            Command::SaveState => out.push_str("q\n"),
            Command::RestoreState => out.push_str("Q\n"),
            Command::SetFillColor(color) => {
                let _ = writeln!(
                    out,
                    "{} {} {} rg",
                    fmt_scalar(color.r),
                    fmt_scalar(color.g),
                    fmt_scalar(color.b)
                );
            }
            Command::SetStrokeColor(color) => {
                let _ = writeln!(
                    out,
                    "{} {} {} RG",
                    fmt_scalar(color.r),
                    fmt_scalar(color.g),
                    fmt_scalar(color.b)
                );
            }
            Command::SetLineWidth(width) => {
                let _ = writeln!(out, "{} w", fmt_pt(*width));
            }
            Command::SetOpacity { fill, stroke } => {
                if let Some(name) = gs_names.get(&alpha_key(*fill, *stroke)) {
                    let _ = writeln!(out, "/{name} gs");
                }
            }
            Command::SetFont { role, size } => {
                font = Some((*role, *size));
            }
            Command::MoveTo { x, y } => {
                let _ = writeln!(out, "{} {} m", fmt_pt(*x), fmt_pt(*y));
            }
            Command::LineTo { x, y } => {
                let _ = writeln!(out, "{} {} l", fmt_pt(*x), fmt_pt(*y));
            }
            Command::Stroke => out.push_str("S\n"),
            Command::DrawRect {
                x,
                y,
                width,
                height,
            } => {
                let _ = writeln!(
                    out,
                    "{} {} {} {} re",
                    fmt_pt(*x),
                    fmt_pt(*y),
                    fmt_pt(*width),
                    fmt_pt(*height)
                );
            }
            Command::Fill => out.push_str("f\n"),
            Command::DrawString { x, y, text } => {
                let (role, size) = font.unwrap_or((FontRole::Plain, Pt::from_i32(12)));
                let _ = writeln!(
                    out,
                    "BT\n/{} {} Tf\n{} {} Td\n({}) Tj\nET",
                    role.resource_name(),
                    fmt_pt(size),
                    fmt_pt(*x),
                    fmt_pt(*y),
                    escape_text(text)
                );
            }
        }
    }
    out.into_bytes()
}

// Millipoint-exact decimal with trailing zeros trimmed.
fn fmt_pt(value: Pt) -> String {
    let milli = value.to_milli_i64();
    let sign = if milli < 0 { "-" } else { "" };
    let abs = milli.abs();
    let int = abs / 1000;
    let frac = abs % 1000;
    if frac == 0 {
        format!("{sign}{int}")
    } else {
        let frac = format!("{frac:03}");
        format!("{sign}{int}.{}", frac.trim_end_matches('0'))
    }
}

fn fmt_scalar(value: f32) -> String {
    let text = format!("{value:.3}");
    let trimmed = text.trim_end_matches('0').trim_end_matches('.');
    if trimmed.is_empty() {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}

fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '(' | ')' | '\\' => {
                out.push('\\');
                out.push(ch);
            }
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::Canvas;
    use crate::types::{Color, Size};
    use std::time::{SystemTime, UNIX_EPOCH};

    fn sample_document() -> PageDocument {
        let mut canvas = Canvas::new(Size {
            width: Pt::from_i32(400),
            height: Pt::from_i32(300),
        });
        canvas.save_state();
        canvas.set_fill_color(Color::rgb(0.8, 0.8, 0.8));
        canvas.set_opacity(0.588, 0.588);
        canvas.draw_rect(Pt::from_i32(10), Pt::from_i32(10), Pt::from_i32(380), Pt::from_i32(100));
        canvas.fill();
        canvas.restore_state();
        canvas.set_font(FontRole::BoldHeader, Pt::from_i32(65));
        canvas.draw_string(Pt::from_i32(20), Pt::from_i32(250), "Seed (1)");
        canvas.finish()
    }

    fn temp_pdf_path(tag: &str) -> std::path::PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos())
            .unwrap_or(0);
        std::env::temp_dir().join(format!(
            "logotable_{tag}_{}_{}.pdf",
            std::process::id(),
            nanos
        ))
    }

    #[test]
    fn fmt_pt_trims_trailing_zeros() {
        assert_eq!(fmt_pt(Pt::from_i32(150)), "150");
        assert_eq!(fmt_pt(Pt::from_f32(12.5)), "12.5");
        assert_eq!(fmt_pt(Pt::from_f32(-0.25)), "-0.25");
        assert_eq!(fmt_pt(Pt::ZERO), "0");
    }

    #[test]
    fn fmt_scalar_trims_trailing_zeros() {
        assert_eq!(fmt_scalar(0.8), "0.8");
        assert_eq!(fmt_scalar(1.0), "1");
        assert_eq!(fmt_scalar(0.0), "0");
    }

    #[test]
    fn text_delimiters_are_escaped() {
        assert_eq!(escape_text("1)"), "1\\)");
        assert_eq!(escape_text("a(b\\c"), "a\\(b\\\\c");
    }

    #[test]
    fn content_stream_emits_font_selection_per_string() {
        let doc = sample_document();
        let mut gs = BTreeMap::new();
        gs.insert(alpha_key(0.588, 0.588), "GS1".to_string());
        let content = String::from_utf8(content_stream(&doc, &gs)).unwrap();
        assert!(content.contains("/GS1 gs"));
        assert!(content.contains("/F2 65 Tf"));
        assert!(content.contains("(Seed \\(1\\)) Tj"));
        assert!(content.contains("10 10 380 100 re"));
    }

    #[test]
    fn written_pdf_is_loadable_and_single_page() {
        let doc = sample_document();
        let path = temp_pdf_path("roundtrip");
        let bytes = write_pdf(&doc, &path).unwrap();
        assert!(bytes > 0);

        let tmp = temp_sibling(&path).unwrap();
        assert!(!tmp.exists());

        let mut loaded = LoDocument::load(&path).unwrap();
        loaded.decompress();
        let pages: Vec<_> = loaded.get_pages().into_iter().collect();
        assert_eq!(pages.len(), 1);
        let content = loaded.get_page_content(pages[0].1).unwrap();
        let content = String::from_utf8_lossy(&content);
        assert!(content.contains("Tj"));

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn missing_destination_directory_leaves_nothing_behind() {
        let doc = sample_document();
        let path = std::env::temp_dir()
            .join("logotable_no_such_dir")
            .join("out.pdf");
        let err = write_pdf(&doc, &path).unwrap_err();
        assert!(matches!(err, LogoTableError::Io(_)));
        assert!(!path.exists());
        assert!(!temp_sibling(&path).unwrap().exists());
    }
}
