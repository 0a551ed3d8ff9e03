//! PDF content extraction: positioned text lines and embedded diagrams.
//!
//! Pages are read through their content streams. Text arrives as spans
//! positioned by the text matrix; spans sharing a baseline merge into
//! lines. Image XObjects drawn large enough are persisted under the
//! static directory and re-enter the page text as markdown references,
//! with an OCR caption when tesseract is available.

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;

use lopdf::{Dictionary, Document as LopdfDocument, Object, ObjectId};
use unicode_normalization::UnicodeNormalization;
use uuid::Uuid;

use crate::error::{Error, Result};

use super::ocr::OcrEngine;
use super::{ContentExtractor, ExtractOptions};

/// Extractor for `.pdf` question papers.
pub struct PdfExtractor;

impl PdfExtractor {
    /// Create a new PDF extractor.
    pub fn new() -> Self {
        Self
    }
}

impl Default for PdfExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl ContentExtractor for PdfExtractor {
    fn supported_extensions(&self) -> &[&str] {
        &["pdf"]
    }

    fn name(&self) -> &str {
        "pdf"
    }

    fn extract(&self, path: &Path, options: &ExtractOptions) -> Result<Option<String>> {
        let doc = LopdfDocument::load(path)?;
        if doc.is_encrypted() {
            return Err(Error::Encrypted);
        }

        // One OCR budget per document.
        let mut ocr = OcrEngine::new(options.ocr.clone());

        let mut text = String::new();
        for (page_num, page_id) in doc.get_pages().into_iter().take(options.max_pages) {
            match extract_page(&doc, page_id, options, &mut ocr) {
                Ok(page_text) => {
                    text.push_str(&page_text);
                    text.push('\n');
                }
                Err(e) => log::warn!("Skipping page {}: {}", page_num, e),
            }
        }

        Ok(Some(text.nfkc().collect()))
    }
}

/// A decoded text span with its page position.
struct WordSpan {
    text: String,
    x: f32,
    top: f32,
}

/// One vertically positioned item of a page.
enum PageItem {
    Line { top: f32, text: String },
    Diagram { top: f32, markdown: String },
}

impl PageItem {
    fn top(&self) -> f32 {
        match self {
            PageItem::Line { top, .. } => *top,
            PageItem::Diagram { top, .. } => *top,
        }
    }
}

/// Extract one page: text lines and placed diagrams in vertical order.
fn extract_page(
    doc: &LopdfDocument,
    page_id: ObjectId,
    options: &ExtractOptions,
    ocr: &mut OcrEngine,
) -> Result<String> {
    let (page_width, page_height) = page_dimensions(doc, page_id);
    let content = page_content(doc, page_id)?;
    let operations = lopdf::content::Content::decode(&content)?.operations;

    let fonts = doc.get_page_fonts(page_id).unwrap_or_default();
    let xobjects = page_xobjects(doc, page_id);

    let mut spans: Vec<WordSpan> = Vec::new();
    let mut diagrams: Vec<PageItem> = Vec::new();

    let mut text_matrix = TextMatrix::default();
    let mut in_text_block = false;
    let mut current_font_name: Vec<u8> = Vec::new();

    let mut ctm = Ctm::identity();
    let mut ctm_stack: Vec<Ctm> = Vec::new();

    for op in operations {
        match op.operator.as_str() {
            "BT" => {
                in_text_block = true;
                text_matrix = TextMatrix::default();
            }
            "ET" => {
                in_text_block = false;
            }
            "Tf" => {
                if let Some(Object::Name(font_name)) = op.operands.first() {
                    current_font_name = font_name.clone();
                }
            }
            "Td" | "TD" => {
                if op.operands.len() >= 2 {
                    let tx = get_number(&op.operands[0]).unwrap_or(0.0);
                    let ty = get_number(&op.operands[1]).unwrap_or(0.0);
                    text_matrix.translate(tx, ty);
                }
            }
            "Tm" => {
                if op.operands.len() >= 6 {
                    text_matrix.set(
                        get_number(&op.operands[0]).unwrap_or(1.0),
                        get_number(&op.operands[1]).unwrap_or(0.0),
                        get_number(&op.operands[2]).unwrap_or(0.0),
                        get_number(&op.operands[3]).unwrap_or(1.0),
                        get_number(&op.operands[4]).unwrap_or(0.0),
                        get_number(&op.operands[5]).unwrap_or(0.0),
                    );
                }
            }
            "T*" => {
                text_matrix.next_line();
            }
            "Tj" | "TJ" => {
                if in_text_block {
                    let text = if op.operator == "TJ" {
                        // TJ mixes strings with kerning adjustments in
                        // 1/1000 text-space units; large negative values
                        // are word gaps.
                        if let Some(Object::Array(items)) = op.operands.first() {
                            let mut combined = String::new();
                            let space_threshold = 200.0;
                            for item in items {
                                match item {
                                    Object::String(bytes, _) => {
                                        combined.push_str(&decode_string(
                                            doc,
                                            &fonts,
                                            &current_font_name,
                                            bytes,
                                        ));
                                    }
                                    Object::Integer(n) => {
                                        if -(*n as f32) > space_threshold
                                            && !combined.is_empty()
                                            && !combined.ends_with(' ')
                                        {
                                            combined.push(' ');
                                        }
                                    }
                                    Object::Real(n) => {
                                        if -n > space_threshold
                                            && !combined.is_empty()
                                            && !combined.ends_with(' ')
                                        {
                                            combined.push(' ');
                                        }
                                    }
                                    _ => {}
                                }
                            }
                            combined
                        } else {
                            String::new()
                        }
                    } else if let Some(Object::String(bytes, _)) = op.operands.first() {
                        decode_string(doc, &fonts, &current_font_name, bytes)
                    } else {
                        String::new()
                    };

                    if !text.trim().is_empty() {
                        let (x, y) = text_matrix.get_position();
                        spans.push(WordSpan {
                            text,
                            x,
                            top: page_height - y,
                        });
                    }
                }
            }
            "'" | "\"" => {
                text_matrix.next_line();
                if in_text_block {
                    let text_idx = if op.operator == "\"" { 2 } else { 0 };
                    if let Some(Object::String(bytes, _)) = op.operands.get(text_idx) {
                        let text = decode_string(doc, &fonts, &current_font_name, bytes);
                        if !text.trim().is_empty() {
                            let (x, y) = text_matrix.get_position();
                            spans.push(WordSpan {
                                text,
                                x,
                                top: page_height - y,
                            });
                        }
                    }
                }
            }
            "q" => {
                ctm_stack.push(ctm);
            }
            "Q" => {
                if let Some(previous) = ctm_stack.pop() {
                    ctm = previous;
                }
            }
            "cm" => {
                if op.operands.len() >= 6 {
                    ctm = Ctm::from_operands(&op.operands).concat(&ctm);
                }
            }
            "Do" => {
                if let Some(Object::Name(name)) = op.operands.first() {
                    if let Some(&object_id) = xobjects.get(name.as_slice()) {
                        match place_image(doc, object_id, &ctm, page_width, page_height, options, ocr)
                        {
                            Ok(Some(item)) => diagrams.push(item),
                            Ok(None) => {}
                            Err(e) => log::debug!(
                                "Skipping image {}: {}",
                                String::from_utf8_lossy(name),
                                e
                            ),
                        }
                    }
                }
            }
            _ => {}
        }
    }

    // Lines come first so that ties on `top` keep text above a diagram
    // anchored at the same height.
    spans.sort_by(|l, r| {
        l.top
            .partial_cmp(&r.top)
            .unwrap_or(Ordering::Equal)
            .then(l.x.partial_cmp(&r.x).unwrap_or(Ordering::Equal))
    });
    let mut items = merge_lines(spans, options.line_tolerance);
    items.extend(diagrams);
    items.sort_by(|l, r| l.top().partial_cmp(&r.top()).unwrap_or(Ordering::Equal));

    let mut page_text = String::new();
    for item in items {
        match item {
            PageItem::Line { text, .. } => {
                page_text.push_str(&text);
                page_text.push('\n');
            }
            PageItem::Diagram { markdown, .. } => {
                page_text.push_str(&markdown);
            }
        }
    }

    Ok(page_text)
}

/// Group top-sorted spans into lines within the given tolerance.
fn merge_lines(spans: Vec<WordSpan>, tolerance: f32) -> Vec<PageItem> {
    let mut lines = Vec::new();
    let mut current: Vec<WordSpan> = Vec::new();
    let mut line_top = 0.0f32;

    for span in spans {
        if current.is_empty() {
            line_top = span.top;
            current.push(span);
        } else if (span.top - line_top).abs() < tolerance {
            current.push(span);
        } else {
            lines.push(flush_line(&current));
            line_top = span.top;
            current = vec![span];
        }
    }
    if !current.is_empty() {
        lines.push(flush_line(&current));
    }

    lines
}

fn flush_line(spans: &[WordSpan]) -> PageItem {
    let top = spans.iter().map(|s| s.top).fold(f32::INFINITY, f32::min);
    let text = spans
        .iter()
        .map(|s| s.text.as_str())
        .collect::<Vec<_>>()
        .join(" ");
    PageItem::Line { top, text }
}

/// Persist a drawn image XObject and build its markdown reference.
///
/// Returns `Ok(None)` for non-image XObjects and for images failing the
/// size and degeneracy filters.
fn place_image(
    doc: &LopdfDocument,
    object_id: ObjectId,
    ctm: &Ctm,
    page_width: f32,
    page_height: f32,
    options: &ExtractOptions,
    ocr: &mut OcrEngine,
) -> Result<Option<PageItem>> {
    let stream = match doc.get_object(object_id)? {
        Object::Stream(stream) => stream,
        _ => return Ok(None),
    };

    match stream.dict.get(b"Subtype").ok().and_then(|s| s.as_name().ok()) {
        Some(b"Image") => {}
        _ => return Ok(None),
    }

    // Placed size of the unit image square under the current transform.
    let drawn_width = (ctm.a * ctm.a + ctm.b * ctm.b).sqrt();
    let drawn_height = (ctm.c * ctm.c + ctm.d * ctm.d).sqrt();
    if drawn_width < options.min_image_size || drawn_height < options.min_image_size {
        log::debug!(
            "Skipping small image ({:.0}x{:.0})",
            drawn_width,
            drawn_height
        );
        return Ok(None);
    }

    let x0 = ctm.e.max(0.0);
    let x1 = (ctm.e + drawn_width).min(page_width);
    let top = (page_height - (ctm.f + drawn_height)).max(0.0);
    let bottom = (page_height - ctm.f).min(page_height);
    if x1 - x0 < 10.0 || bottom - top < 10.0 {
        log::debug!("Skipping image with degenerate bounds");
        return Ok(None);
    }

    let (extension, data) = match encoded_image(stream) {
        Some(encoded) => encoded,
        None => {
            log::debug!("Skipping image with unsupported encoding");
            return Ok(None);
        }
    };

    let images_dir = options.images_dir();
    fs::create_dir_all(&images_dir)?;

    let filename = format!(
        "diagram_{}.{}",
        &Uuid::new_v4().simple().to_string()[..8],
        extension
    );
    let image_path = images_dir.join(&filename);
    fs::write(&image_path, &data)?;

    let url = format!(
        "{}/static/images/{}",
        options.base_url.trim_end_matches('/'),
        filename
    );
    let mut markdown = format!("\n\n![Diagram]({})\n", url);
    match ocr.recognize(&image_path) {
        Some(caption) => {
            markdown.push_str(&format!("(Diagram Content: {})\n\n", caption));
        }
        None => markdown.push_str("\n\n"),
    }

    Ok(Some(PageItem::Diagram { top, markdown }))
}

/// Image bytes in a directly persistable encoding, with a file extension.
fn encoded_image(stream: &lopdf::Stream) -> Option<(&'static str, Vec<u8>)> {
    let filter = stream
        .dict
        .get(b"Filter")
        .ok()
        .and_then(|f| f.as_name().ok())
        .unwrap_or(b"");

    match filter {
        // JPEG and JPEG 2000 payloads are complete files as stored.
        b"DCTDecode" => Some(("jpg", stream.content.clone())),
        b"JPXDecode" => Some(("jp2", stream.content.clone())),
        _ => {
            let data = stream.decompressed_content().ok()?;
            if data.starts_with(&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A]) {
                Some(("png", data))
            } else if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
                Some(("jpg", data))
            } else {
                None
            }
        }
    }
}

/// Get the page content stream, concatenating array parts.
fn page_content(doc: &LopdfDocument, page_id: ObjectId) -> Result<Vec<u8>> {
    let page_dict = doc.get_dictionary(page_id)?;
    let contents = match page_dict.get(b"Contents") {
        Ok(contents) => contents,
        Err(_) => return Ok(Vec::new()),
    };

    match contents {
        Object::Reference(r) => {
            if let Ok(Object::Stream(s)) = doc.get_object(*r) {
                return Ok(s.decompressed_content()?);
            }
            Err(Error::PdfParse("Invalid content stream".to_string()))
        }
        Object::Array(parts) => {
            let mut content = Vec::new();
            for part in parts {
                if let Object::Reference(r) = part {
                    if let Ok(Object::Stream(s)) = doc.get_object(*r) {
                        if let Ok(data) = s.decompressed_content() {
                            content.extend_from_slice(&data);
                            content.push(b' ');
                        }
                    }
                }
            }
            Ok(content)
        }
        _ => Err(Error::PdfParse("Invalid content stream".to_string())),
    }
}

/// Page MediaBox dimensions, defaulting to Letter.
fn page_dimensions(doc: &LopdfDocument, page_id: ObjectId) -> (f32, f32) {
    if let Ok(page_dict) = doc.get_dictionary(page_id) {
        if let Ok(media_box) = page_dict.get(b"MediaBox") {
            if let Ok(array) = media_box.as_array() {
                if array.len() >= 4 {
                    let width = array[2].as_float().unwrap_or(612.0);
                    let height = array[3].as_float().unwrap_or(792.0);
                    return (width, height);
                }
            }
        }
    }
    (612.0, 792.0)
}

/// Map of XObject names to object ids for a page.
fn page_xobjects(doc: &LopdfDocument, page_id: ObjectId) -> HashMap<Vec<u8>, ObjectId> {
    let mut xobjects = HashMap::new();

    let page_dict = match doc.get_dictionary(page_id) {
        Ok(dict) => dict,
        Err(_) => return xobjects,
    };
    let resources = match page_dict.get(b"Resources") {
        Ok(Object::Reference(r)) => doc.get_dictionary(*r).ok(),
        Ok(Object::Dictionary(d)) => Some(d),
        _ => None,
    };

    if let Some(resources) = resources {
        if let Ok(entries) = resources.get(b"XObject") {
            let xobj_dict = match entries {
                Object::Reference(r) => doc.get_dictionary(*r).ok(),
                Object::Dictionary(d) => Some(d),
                _ => None,
            };
            if let Some(xobj_dict) = xobj_dict {
                for (name, object) in xobj_dict.iter() {
                    if let Ok(object_id) = object.as_reference() {
                        xobjects.insert(name.clone(), object_id);
                    }
                }
            }
        }
    }

    xobjects
}

/// Decode a content-stream string through the current font's encoding.
fn decode_string(
    doc: &LopdfDocument,
    fonts: &BTreeMap<Vec<u8>, &Dictionary>,
    font_name: &[u8],
    bytes: &[u8],
) -> String {
    match fonts.get(font_name).and_then(|f| f.get_font_encoding(doc).ok()) {
        Some(encoding) => LopdfDocument::decode_text(&encoding, bytes)
            .unwrap_or_else(|_| decode_text_simple(bytes)),
        None => decode_text_simple(bytes),
    }
}

/// Best-effort string decoding when no font encoding is available.
fn decode_text_simple(bytes: &[u8]) -> String {
    // UTF-16BE with BOM
    if bytes.len() >= 2 && bytes[0] == 0xFE && bytes[1] == 0xFF {
        let utf16: Vec<u16> = bytes[2..]
            .chunks(2)
            .filter_map(|c| {
                if c.len() == 2 {
                    Some(u16::from_be_bytes([c[0], c[1]]))
                } else {
                    None
                }
            })
            .collect();
        return String::from_utf16(&utf16).unwrap_or_default();
    }

    if let Ok(s) = String::from_utf8(bytes.to_vec()) {
        return s;
    }

    // Latin-1 fallback
    bytes.iter().map(|&b| b as char).collect()
}

/// Text matrix tracking the pen position in a content stream.
#[derive(Debug, Clone)]
struct TextMatrix {
    a: f32,
    b: f32,
    c: f32,
    d: f32,
    e: f32,
    f: f32,
}

impl Default for TextMatrix {
    fn default() -> Self {
        Self {
            a: 1.0,
            b: 0.0,
            c: 0.0,
            d: 1.0,
            e: 0.0,
            f: 0.0,
        }
    }
}

impl TextMatrix {
    fn set(&mut self, a: f32, b: f32, c: f32, d: f32, e: f32, f: f32) {
        self.a = a;
        self.b = b;
        self.c = c;
        self.d = d;
        self.e = e;
        self.f = f;
    }

    fn translate(&mut self, tx: f32, ty: f32) {
        self.e += tx * self.a + ty * self.c;
        self.f += tx * self.b + ty * self.d;
    }

    fn next_line(&mut self) {
        // Default leading; TL is not tracked.
        self.f -= 12.0 * self.d;
    }

    fn get_position(&self) -> (f32, f32) {
        (self.e, self.f)
    }
}

/// Current transformation matrix for image placement.
#[derive(Debug, Clone, Copy)]
struct Ctm {
    a: f32,
    b: f32,
    c: f32,
    d: f32,
    e: f32,
    f: f32,
}

impl Ctm {
    fn identity() -> Self {
        Self {
            a: 1.0,
            b: 0.0,
            c: 0.0,
            d: 1.0,
            e: 0.0,
            f: 0.0,
        }
    }

    fn from_operands(operands: &[Object]) -> Self {
        Self {
            a: get_number(&operands[0]).unwrap_or(1.0),
            b: get_number(&operands[1]).unwrap_or(0.0),
            c: get_number(&operands[2]).unwrap_or(0.0),
            d: get_number(&operands[3]).unwrap_or(1.0),
            e: get_number(&operands[4]).unwrap_or(0.0),
            f: get_number(&operands[5]).unwrap_or(0.0),
        }
    }

    /// Matrix product `self x other`, applied as in the `cm` operator.
    fn concat(&self, other: &Ctm) -> Ctm {
        Ctm {
            a: self.a * other.a + self.b * other.c,
            b: self.a * other.b + self.b * other.d,
            c: self.c * other.a + self.d * other.c,
            d: self.c * other.b + self.d * other.d,
            e: self.e * other.a + self.f * other.c + other.e,
            f: self.e * other.b + self.f * other.d + other.f,
        }
    }
}

/// Numeric operand as f32.
fn get_number(obj: &Object) -> Option<f32> {
    match obj {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(r) => Some(*r),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::OcrConfig;
    use lopdf::content::{Content, Operation};
    use lopdf::{dictionary, Stream};

    // ==================== Line Geometry Tests ====================

    fn span(text: &str, x: f32, top: f32) -> WordSpan {
        WordSpan {
            text: text.to_string(),
            x,
            top,
        }
    }

    fn line_text(item: &PageItem) -> &str {
        match item {
            PageItem::Line { text, .. } => text,
            PageItem::Diagram { .. } => panic!("expected a text line"),
        }
    }

    #[test]
    fn test_merge_lines_tolerance() {
        let spans = vec![
            span("What", 10.0, 100.0),
            span("is", 40.0, 102.0),
            span("normalization?", 55.0, 99.0),
            span("Explain", 10.0, 120.0),
            span("joins.", 60.0, 121.5),
        ];
        let mut sorted = spans;
        sorted.sort_by(|l, r| {
            l.top
                .partial_cmp(&r.top)
                .unwrap()
                .then(l.x.partial_cmp(&r.x).unwrap())
        });

        let lines = merge_lines(sorted, 5.0);
        assert_eq!(lines.len(), 2);
        assert_eq!(line_text(&lines[0]), "normalization? What is");
        assert_eq!(line_text(&lines[1]), "Explain joins.");
    }

    #[test]
    fn test_merge_lines_empty() {
        assert!(merge_lines(Vec::new(), 5.0).is_empty());
    }

    #[test]
    fn test_ctm_concat_scales() {
        let scale = Ctm {
            a: 150.0,
            b: 0.0,
            c: 0.0,
            d: 120.0,
            e: 100.0,
            f: 500.0,
        };
        let placed = scale.concat(&Ctm::identity());
        assert_eq!(placed.a, 150.0);
        assert_eq!(placed.d, 120.0);
        assert_eq!(placed.e, 100.0);
        assert_eq!(placed.f, 500.0);
    }

    #[test]
    fn test_decode_text_simple_variants() {
        assert_eq!(decode_text_simple(b"Hello"), "Hello");
        assert_eq!(decode_text_simple(&[0xFE, 0xFF, 0x00, 0x48, 0x00, 0x69]), "Hi");
        let latin = decode_text_simple(&[0x63, 0x61, 0x66, 0xE9]);
        assert_eq!(latin, "café");
    }

    // ==================== Document Extraction Tests ====================

    // Builds a single-page document with the given content operations and
    // optional image XObject.
    fn build_pdf(operations: Vec<Operation>, image: Option<Stream>) -> LopdfDocument {
        let mut doc = LopdfDocument::with_version("1.5");
        let pages_id = doc.new_object_id();

        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Courier",
        });

        let mut resources = dictionary! {
            "Font" => dictionary! { "F1" => font_id },
        };
        if let Some(stream) = image {
            let image_id = doc.add_object(stream);
            resources.set("XObject", dictionary! { "Im1" => image_id });
        }
        let resources_id = doc.add_object(resources);

        let content = Content { operations };
        let content_id = doc.add_object(Stream::new(
            dictionary! {},
            content.encode().unwrap(),
        ));

        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "MediaBox" => vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Integer(612),
                Object::Integer(792),
            ],
            "Resources" => resources_id,
        });

        let pages = dictionary! {
            "Type" => "Pages",
            "Kids" => vec![Object::Reference(page_id)],
            "Count" => 1,
        };
        doc.objects.insert(pages_id, Object::Dictionary(pages));

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);
        doc
    }

    fn text_operations(lines: &[(&str, i64)]) -> Vec<Operation> {
        let mut operations = vec![
            Operation::new("BT", vec![]),
            Operation::new(
                "Tf",
                vec![Object::Name(b"F1".to_vec()), Object::Integer(12)],
            ),
        ];
        for (text, y) in lines {
            operations.push(Operation::new(
                "Tm",
                vec![
                    Object::Integer(1),
                    Object::Integer(0),
                    Object::Integer(0),
                    Object::Integer(1),
                    Object::Integer(72),
                    Object::Integer(*y),
                ],
            ));
            operations.push(Operation::new(
                "Tj",
                vec![Object::string_literal(*text)],
            ));
        }
        operations.push(Operation::new("ET", vec![]));
        operations
    }

    #[test]
    fn test_extract_text_lines_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let pdf_path = dir.path().join("paper.pdf");
        let mut doc = build_pdf(
            text_operations(&[("1. What is a deadlock?", 700), ("2. Explain paging.", 650)]),
            None,
        );
        doc.save(&pdf_path).unwrap();

        let options = ExtractOptions::default()
            .with_static_dir(dir.path().join("static"))
            .with_ocr(OcrConfig::disabled());
        let text = PdfExtractor::new()
            .extract(&pdf_path, &options)
            .unwrap()
            .unwrap();

        let deadlock = text.find("What is a deadlock?").unwrap();
        let paging = text.find("Explain paging.").unwrap();
        assert!(deadlock < paging);
    }

    #[test]
    fn test_extract_persists_diagram() {
        let dir = tempfile::tempdir().unwrap();
        let pdf_path = dir.path().join("paper.pdf");

        // Fake JPEG payload: only magic bytes matter for persistence.
        let jpeg = Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => 200,
                "Height" => 100,
                "ColorSpace" => "DeviceRGB",
                "BitsPerComponent" => 8,
                "Filter" => "DCTDecode",
            },
            vec![0xFF, 0xD8, 0xFF, 0xE0, 0x01, 0x02, 0x03],
        );

        let mut operations = text_operations(&[("Q1: Label the diagram below.", 700)]);
        operations.extend(vec![
            Operation::new("q", vec![]),
            Operation::new(
                "cm",
                vec![
                    Object::Integer(150),
                    Object::Integer(0),
                    Object::Integer(0),
                    Object::Integer(120),
                    Object::Integer(100),
                    Object::Integer(400),
                ],
            ),
            Operation::new("Do", vec![Object::Name(b"Im1".to_vec())]),
            Operation::new("Q", vec![]),
        ]);

        let mut doc = build_pdf(operations, Some(jpeg));
        doc.save(&pdf_path).unwrap();

        let options = ExtractOptions::default()
            .with_static_dir(dir.path().join("static"))
            .with_ocr(OcrConfig::disabled());
        let text = PdfExtractor::new()
            .extract(&pdf_path, &options)
            .unwrap()
            .unwrap();

        assert!(text.contains("![Diagram](http://localhost:8000/static/images/diagram_"));
        let question = text.find("Label the diagram").unwrap();
        let diagram = text.find("![Diagram]").unwrap();
        assert!(question < diagram);

        let images: Vec<_> = fs::read_dir(dir.path().join("static/images"))
            .unwrap()
            .collect();
        assert_eq!(images.len(), 1);
    }

    #[test]
    fn test_small_image_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let pdf_path = dir.path().join("paper.pdf");

        let jpeg = Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => 16,
                "Height" => 16,
                "Filter" => "DCTDecode",
            },
            vec![0xFF, 0xD8, 0xFF],
        );

        let mut operations = text_operations(&[("Q1: A bullet icon follows.", 700)]);
        operations.extend(vec![
            Operation::new("q", vec![]),
            Operation::new(
                "cm",
                vec![
                    Object::Integer(16),
                    Object::Integer(0),
                    Object::Integer(0),
                    Object::Integer(16),
                    Object::Integer(100),
                    Object::Integer(400),
                ],
            ),
            Operation::new("Do", vec![Object::Name(b"Im1".to_vec())]),
            Operation::new("Q", vec![]),
        ]);

        let mut doc = build_pdf(operations, Some(jpeg));
        doc.save(&pdf_path).unwrap();

        let options = ExtractOptions::default()
            .with_static_dir(dir.path().join("static"))
            .with_ocr(OcrConfig::disabled());
        let text = PdfExtractor::new()
            .extract(&pdf_path, &options)
            .unwrap()
            .unwrap();

        assert!(!text.contains("![Diagram]"));
        assert!(!dir.path().join("static/images").exists());
    }

    #[test]
    fn test_empty_page_yields_whitespace_only() {
        let dir = tempfile::tempdir().unwrap();
        let pdf_path = dir.path().join("paper.pdf");
        let mut doc = build_pdf(vec![], None);
        doc.save(&pdf_path).unwrap();

        let options = ExtractOptions::default()
            .with_static_dir(dir.path().join("static"))
            .with_ocr(OcrConfig::disabled());
        let text = PdfExtractor::new()
            .extract(&pdf_path, &options)
            .unwrap()
            .unwrap();
        assert!(text.trim().is_empty());
    }

    #[test]
    fn test_not_a_pdf_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let pdf_path = dir.path().join("paper.pdf");
        fs::write(&pdf_path, b"plainly not a pdf").unwrap();

        let options = ExtractOptions::default();
        let result = PdfExtractor::new().extract(&pdf_path, &options);
        assert!(result.is_err());
    }
}
