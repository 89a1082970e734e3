//! PDF rendering with lopdf

use image::RgbImage;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, ObjectId, Stream};

use crate::error::{ReportError, ReportResult};
use crate::layout::{Element, Page, Report, PAGE_HEIGHT, PAGE_WIDTH};

const POINTS_PER_MM: f32 = 72.0 / 25.4;
const FONT_NAME: &str = "F1";
const CHART_NAME: &str = "Im1";
const TITLE_FONT_SIZE: f32 = 16.0;
const BODY_FONT_SIZE: f32 = 12.0;

fn pt(mm: f32) -> f32 {
    mm * POINTS_PER_MM
}

/// Distance from the bottom edge, in points
fn from_bottom(y_mm: f32) -> f32 {
    pt(PAGE_HEIGHT - y_mm)
}

/// WinAnsi bytes for `text`; characters the encoding lacks become `?`
fn encode_text(text: &str) -> Vec<u8> {
    text.chars().map(|c| win_ansi(c).unwrap_or(b'?')).collect()
}

/// WinAnsiEncoding byte for `c`
///
/// Bytes 0x80..=0x9F hold typographic characters rather than the C1 controls,
/// so those code points never map through directly.
fn win_ansi(c: char) -> Option<u8> {
    let byte = match c {
        '\u{20AC}' => 0x80, // €
        '\u{201A}' => 0x82,
        '\u{0192}' => 0x83,
        '\u{201E}' => 0x84,
        '\u{2026}' => 0x85, // …
        '\u{2020}' => 0x86,
        '\u{2021}' => 0x87,
        '\u{02C6}' => 0x88,
        '\u{2030}' => 0x89,
        '\u{0160}' => 0x8A,
        '\u{2039}' => 0x8B,
        '\u{0152}' => 0x8C,
        '\u{017D}' => 0x8E,
        '\u{2018}' => 0x91,
        '\u{2019}' => 0x92,
        '\u{201C}' => 0x93,
        '\u{201D}' => 0x94,
        '\u{2022}' => 0x95, // •
        '\u{2013}' => 0x96, // –
        '\u{2014}' => 0x97,
        '\u{02DC}' => 0x98,
        '\u{2122}' => 0x99,
        '\u{0161}' => 0x9A,
        '\u{203A}' => 0x9B,
        '\u{0153}' => 0x9C,
        '\u{017E}' => 0x9E,
        '\u{0178}' => 0x9F,
        '\u{0080}'..='\u{009F}' => return None,
        _ => return u8::try_from(u32::from(c)).ok(),
    };
    Some(byte)
}

fn page_content(page: &Page, is_first: bool, chart: &RgbImage) -> ReportResult<Vec<u8>> {
    let mut operations = Vec::new();

    for (index, element) in page.elements.iter().enumerate() {
        match element {
            Element::Text { x, y, text } => {
                let size = if is_first && index == 0 {
                    TITLE_FONT_SIZE
                } else {
                    BODY_FONT_SIZE
                };
                operations.push(Operation::new("BT", vec![]));
                operations.push(Operation::new(
                    "Tf",
                    vec![FONT_NAME.into(), Object::Real(size)],
                ));
                operations.push(Operation::new(
                    "Td",
                    vec![Object::Real(pt(*x)), Object::Real(from_bottom(*y))],
                ));
                operations.push(Operation::new(
                    "Tj",
                    vec![Object::string_literal(encode_text(text))],
                ));
                operations.push(Operation::new("ET", vec![]));
            }
            Element::Chart { x, y, width, height } => {
                // Fit the image inside the slot, keeping its aspect ratio.
                let (w, h) = fit(chart.width(), chart.height(), *width, *height);
                operations.push(Operation::new("q", vec![]));
                operations.push(Operation::new(
                    "cm",
                    vec![
                        Object::Real(pt(w)),
                        Object::Real(0.0),
                        Object::Real(0.0),
                        Object::Real(pt(h)),
                        Object::Real(pt(*x)),
                        Object::Real(from_bottom(*y + h)),
                    ],
                ));
                operations.push(Operation::new("Do", vec![CHART_NAME.into()]));
                operations.push(Operation::new("Q", vec![]));
            }
        }
    }

    Content { operations }
        .encode()
        .map_err(|e| ReportError::Pdf(e.to_string()))
}

fn fit(pixel_width: u32, pixel_height: u32, width: f32, height: f32) -> (f32, f32) {
    if pixel_width == 0 || pixel_height == 0 {
        return (width, height);
    }
    let scale = (width / pixel_width as f32).min(height / pixel_height as f32);
    (pixel_width as f32 * scale, pixel_height as f32 * scale)
}

fn chart_object(doc: &mut Document, chart: &RgbImage) -> ObjectId {
    let stream = Stream::new(
        dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => i64::from(chart.width()),
            "Height" => i64::from(chart.height()),
            "ColorSpace" => "DeviceRGB",
            "BitsPerComponent" => 8_i64,
        },
        chart.as_raw().clone(),
    );
    doc.add_object(stream)
}

/// Render `report` into PDF bytes with `chart` in the chart slot
pub(crate) fn render(report: &Report, chart: &RgbImage) -> ReportResult<Vec<u8>> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    });
    let image_id = chart_object(&mut doc, chart);
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { FONT_NAME => font_id },
        "XObject" => dictionary! { CHART_NAME => image_id },
    });

    let mut kids: Vec<Object> = Vec::with_capacity(report.pages.len());
    for (index, page) in report.pages.iter().enumerate() {
        let content = page_content(page, index == 0, chart)?;
        let content_id = doc.add_object(Stream::new(dictionary! {}, content));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => resources_id,
            "MediaBox" => vec![
                Object::Real(0.0),
                Object::Real(0.0),
                Object::Real(pt(PAGE_WIDTH)),
                Object::Real(pt(PAGE_HEIGHT)),
            ],
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
        }),
    );

    let info_id = doc.add_object(dictionary! {
        "Title" => Object::string_literal(encode_text(&report.title)),
        "Producer" => Object::string_literal("carpinteria"),
    });
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.trailer.set("Info", info_id);
    doc.compress();

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes)
        .map_err(|e| ReportError::Pdf(e.to_string()))?;
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_text_latin1() {
        assert_eq!(encode_text("Teléfono"), b"Tel\xe9fono".to_vec());
        assert_eq!(encode_text("ñ €"), b"\xf1 \x80".to_vec());
    }

    #[test]
    fn test_encode_text_typographic_range() {
        assert_eq!(
            encode_text("\u{201C}Mesa\u{201D} \u{2013} 5\u{2026}"),
            b"\x93Mesa\x94 \x96 5\x85".to_vec()
        );
        assert_eq!(encode_text("Œuvre™"), b"\x8cuvre\x99".to_vec());
        // C1 controls and characters outside WinAnsi have no byte.
        assert_eq!(encode_text("a\u{0081}b"), b"a?b".to_vec());
        assert_eq!(encode_text("\u{0080}"), b"?".to_vec());
        assert_eq!(encode_text("漢字"), b"??".to_vec());
        assert_eq!(encode_text("\u{00A0}ÿ"), b"\xa0\xff".to_vec());
    }

    #[test]
    fn test_fit_keeps_aspect_ratio() {
        assert_eq!(fit(400, 400, 180.0, 100.0), (100.0, 100.0));
        assert_eq!(fit(360, 100, 180.0, 100.0), (180.0, 50.0));
    }

    #[test]
    fn test_render_page_count() {
        let report = Report {
            title: "Título".to_string(),
            pages: vec![Page::default(), Page::default()],
            details: Vec::new(),
        };
        let chart = RgbImage::new(2, 2);

        let bytes = render(&report, &chart).unwrap();
        assert!(bytes.starts_with(b"%PDF-1.5"));

        let loaded = Document::load_mem(&bytes).unwrap();
        assert_eq!(loaded.get_pages().len(), 2);
    }
}
