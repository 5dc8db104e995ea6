//! Glyph collection with pdf-extract and line grouping.

use std::path::Path;

use pdf_extract::{MediaBox, OutputDev, OutputError, Transform};
use tracing::{debug, trace};

use super::{BBox, LayoutParams, Matrix, Orientation, PageLayout, TextObject};
use crate::error::{LayoutError, PdftabError, Result};
use crate::pdf;

const LETTER: [f64; 4] = [0.0, 0.0, 612.0, 792.0];

/// A glyph as reported by the content stream interpreter.
struct Glyph {
    matrix: Matrix,
    width: f64,
    text: String,
}

/// `OutputDev` that records every glyph drawn on the page.
#[derive(Default)]
struct GlyphCollector {
    glyphs: Vec<Glyph>,
}

impl OutputDev for GlyphCollector {
    fn begin_page(
        &mut self,
        _page_num: u32,
        _media_box: &MediaBox,
        _art_box: Option<(f64, f64, f64, f64)>,
    ) -> std::result::Result<(), OutputError> {
        Ok(())
    }

    fn end_page(&mut self) -> std::result::Result<(), OutputError> {
        Ok(())
    }

    fn output_character(
        &mut self,
        trm: &Transform,
        width: f64,
        _spacing: f64,
        font_size: f64,
        char: &str,
    ) -> std::result::Result<(), OutputError> {
        self.glyphs.push(Glyph {
            matrix: Matrix([
                trm.m11 * font_size,
                trm.m12 * font_size,
                trm.m21 * font_size,
                trm.m22 * font_size,
                trm.m31,
                trm.m32,
            ]),
            width,
            text: char.to_string(),
        });
        Ok(())
    }

    fn begin_word(&mut self) -> std::result::Result<(), OutputError> {
        Ok(())
    }

    fn end_word(&mut self) -> std::result::Result<(), OutputError> {
        Ok(())
    }

    fn end_line(&mut self) -> std::result::Result<(), OutputError> {
        Ok(())
    }
}

/// Analyse the single-page PDF at `path`.
pub fn analyze_file(path: &Path, page_number: u32, params: &LayoutParams) -> Result<PageLayout> {
    let data = std::fs::read(path)?;
    analyze_page(&data, page_number, params)
}

/// Analyse the first page of an unencrypted PDF held in memory.
pub fn analyze_page(data: &[u8], page_number: u32, params: &LayoutParams) -> Result<PageLayout> {
    let doc = pdf::load_document(data, "")?;
    let page_id = pdf::page_id(&doc, 1)?;
    let rotate = pdf::page_rotation(&doc, page_id);
    let media_box = pdf::page_media_box(&doc, page_id).unwrap_or(LETTER);
    let page_matrix = Matrix::for_page_rotation(rotate, media_box);

    let extract_doc = pdf_extract::Document::load_mem(data)
        .map_err(|e| LayoutError::Analysis(e.to_string()))?;
    let mut collector = GlyphCollector::default();
    pdf_extract::output_doc(&extract_doc, &mut collector)
        .map_err(|e| PdftabError::Layout(LayoutError::Analysis(format!("{:?}", e))))?;

    let chars: Vec<TextObject> = collector
        .glyphs
        .into_iter()
        .map(|g| glyph_object(g, &page_matrix))
        .collect();

    let (mut horizontal_text, mut vertical_text) = (Vec::new(), Vec::new());
    for line in group_lines(&chars, params) {
        if line.is_blank() {
            continue;
        }
        match line.orientation {
            Orientation::Vertical => vertical_text.push(line),
            _ => horizontal_text.push(line),
        }
    }

    let [x0, y0, x1, y1] = media_box;
    let (width, height) = if rotate % 180 == 0 {
        (x1 - x0, y1 - y0)
    } else {
        (y1 - y0, x1 - x0)
    };

    debug!(
        "Page {}: {} chars, {} horizontal lines, {} vertical lines (rotate {})",
        page_number,
        chars.len(),
        horizontal_text.len(),
        vertical_text.len(),
        rotate
    );

    Ok(PageLayout {
        page_number,
        width,
        height,
        chars,
        horizontal_text,
        vertical_text,
    })
}

fn glyph_object(glyph: Glyph, page_matrix: &Matrix) -> TextObject {
    let matrix = glyph.matrix.then(page_matrix);
    let w = glyph.width;
    let corners = [
        matrix.apply(0.0, 0.0),
        matrix.apply(w, 0.0),
        matrix.apply(0.0, 1.0),
        matrix.apply(w, 1.0),
    ];
    TextObject::new(BBox::from_points(&corners), Orientation::Char, glyph.text).with_matrix(matrix)
}

/// Group characters, in drawing order, into horizontal and vertical lines.
///
/// Two consecutive glyphs join a horizontal line when they overlap
/// vertically by more than `line_overlap` of the smaller height and sit
/// closer than `char_margin` times the wider glyph. Vertical lines use the
/// transposed test. A glyph that fits neither forms a one-glyph horizontal
/// line.
pub fn group_lines(chars: &[TextObject], params: &LayoutParams) -> Vec<TextObject> {
    let mut lines = Vec::new();
    let Some(first) = chars.first() else {
        return lines;
    };

    let mut current: Option<LineBuilder> = None;
    let mut prev = first;
    for next in &chars[1..] {
        let (a, b) = (&prev.bbox, &next.bbox);
        let halign = a.is_voverlap(b)
            && a.height().min(b.height()) * params.line_overlap < a.voverlap(b)
            && a.hdistance(b) < a.width().max(b.width()) * params.char_margin;
        let valign = params.detect_vertical
            && a.is_hoverlap(b)
            && a.width().min(b.width()) * params.line_overlap < a.hoverlap(b)
            && a.vdistance(b) < a.height().max(b.height()) * params.char_margin;

        let extends = match &current {
            Some(line) => match line.orientation {
                Orientation::Vertical => valign,
                _ => halign,
            },
            None => false,
        };

        if let (true, Some(line)) = (extends, current.as_mut()) {
            line.push(next);
        } else if let Some(line) = current.take() {
            lines.push(line.finish());
        } else if valign && !halign {
            current = Some(LineBuilder::start(Orientation::Vertical, prev).with(next));
        } else if halign && !valign {
            current = Some(LineBuilder::start(Orientation::Horizontal, prev).with(next));
        } else {
            lines.push(LineBuilder::start(Orientation::Horizontal, prev).finish());
        }
        prev = next;
    }

    match current {
        Some(line) => lines.push(line.finish()),
        None => lines.push(LineBuilder::start(Orientation::Horizontal, prev).finish()),
    }

    trace!("Grouped {} chars into {} lines", chars.len(), lines.len());
    lines
}

struct LineBuilder {
    orientation: Orientation,
    bbox: BBox,
    text: String,
    matrix: Matrix,
}

impl LineBuilder {
    fn start(orientation: Orientation, glyph: &TextObject) -> Self {
        Self {
            orientation,
            bbox: glyph.bbox,
            text: glyph.text.clone(),
            matrix: glyph.matrix,
        }
    }

    fn with(mut self, glyph: &TextObject) -> Self {
        self.push(glyph);
        self
    }

    fn push(&mut self, glyph: &TextObject) {
        self.bbox = self.bbox.union(&glyph.bbox);
        self.text.push_str(&glyph.text);
    }

    fn finish(self) -> TextObject {
        TextObject::new(self.bbox, self.orientation, self.text).with_matrix(self.matrix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn upright(x: f64, y: f64, text: &str) -> TextObject {
        TextObject::new(BBox::new(x, y, x + 6.0, y + 12.0), Orientation::Char, text)
            .with_matrix(Matrix([12.0, 0.0, 0.0, 12.0, x, y]))
    }

    fn stacked(x: f64, y: f64, text: &str) -> TextObject {
        TextObject::new(BBox::new(x - 12.0, y, x, y + 6.0), Orientation::Char, text)
            .with_matrix(Matrix([0.0, 12.0, -12.0, 0.0, x, y]))
    }

    fn texts(lines: &[TextObject]) -> Vec<(Orientation, &str)> {
        lines.iter().map(|l| (l.orientation, l.text.as_str())).collect()
    }

    #[test]
    fn test_no_chars_no_lines() {
        assert!(group_lines(&[], &LayoutParams::default()).is_empty());
    }

    #[test]
    fn test_single_char_is_horizontal_line() {
        let lines = group_lines(&[upright(0.0, 0.0, "a")], &LayoutParams::default());
        assert_eq!(texts(&lines), vec![(Orientation::Horizontal, "a")]);
    }

    #[test]
    fn test_groups_horizontal_line() {
        let chars = vec![
            upright(10.0, 100.0, "a"),
            upright(16.0, 100.0, "b"),
            upright(22.0, 100.0, "c"),
            upright(10.0, 50.0, "d"),
            upright(16.0, 50.0, "e"),
        ];
        let lines = group_lines(&chars, &LayoutParams::default());
        assert_eq!(
            texts(&lines),
            vec![
                (Orientation::Horizontal, "abc"),
                (Orientation::Horizontal, "de"),
            ]
        );
        assert_eq!(lines[0].bbox, BBox::new(10.0, 100.0, 28.0, 112.0));
    }

    #[test]
    fn test_groups_vertical_line() {
        let chars = vec![
            stacked(100.0, 10.0, "u"),
            stacked(100.0, 16.0, "p"),
            stacked(100.0, 22.0, "!"),
        ];
        let lines = group_lines(&chars, &LayoutParams::default());
        assert_eq!(texts(&lines), vec![(Orientation::Vertical, "up!")]);
        assert_eq!(lines[0].matrix, chars[0].matrix);
    }

    #[test]
    fn test_vertical_detection_can_be_disabled() {
        let chars = vec![stacked(100.0, 10.0, "u"), stacked(100.0, 16.0, "p")];
        let params = LayoutParams {
            detect_vertical: false,
            ..LayoutParams::default()
        };
        let lines = group_lines(&chars, &params);
        assert!(lines.iter().all(|l| l.orientation == Orientation::Horizontal));
    }
}
