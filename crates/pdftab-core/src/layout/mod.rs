//! Layout analysis of single-page documents.
//!
//! Turns a page into positioned text objects: individual characters plus
//! the horizontal and vertical text lines they group into. Coordinates are
//! PDF user space (y grows upward) with the page's `/Rotate` applied.

mod analyzer;
mod rotation;

pub use analyzer::{analyze_file, analyze_page, group_lines};
pub use rotation::{Rotation, detect_rotation};

use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box `(x0, y0, x1, y1)` with `y1` at the top.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BBox {
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
}

impl BBox {
    pub fn new(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        Self {
            x0: x0.min(x1),
            y0: y0.min(y1),
            x1: x0.max(x1),
            y1: y0.max(y1),
        }
    }

    /// Smallest box containing all points.
    pub fn from_points(points: &[(f64, f64)]) -> Self {
        let min_x = points.iter().map(|p| p.0).fold(f64::INFINITY, f64::min);
        let max_x = points.iter().map(|p| p.0).fold(f64::NEG_INFINITY, f64::max);
        let min_y = points.iter().map(|p| p.1).fold(f64::INFINITY, f64::min);
        let max_y = points.iter().map(|p| p.1).fold(f64::NEG_INFINITY, f64::max);
        Self::new(min_x, min_y, max_x, max_y)
    }

    pub fn width(&self) -> f64 {
        self.x1 - self.x0
    }

    pub fn height(&self) -> f64 {
        self.y1 - self.y0
    }

    /// Midpoint of the top edge.
    pub fn top_mid(&self) -> (f64, f64) {
        ((self.x0 + self.x1) / 2.0, self.y1)
    }

    /// Midpoint of the bottom edge.
    pub fn bottom_mid(&self) -> (f64, f64) {
        ((self.x0 + self.x1) / 2.0, self.y0)
    }

    pub fn union(&self, other: &BBox) -> BBox {
        BBox {
            x0: self.x0.min(other.x0),
            y0: self.y0.min(other.y0),
            x1: self.x1.max(other.x1),
            y1: self.y1.max(other.y1),
        }
    }

    /// Length of the horizontal overlap, 0 when disjoint.
    pub fn hoverlap(&self, other: &BBox) -> f64 {
        (self.x1.min(other.x1) - self.x0.max(other.x0)).max(0.0)
    }

    /// Length of the vertical overlap, 0 when disjoint.
    pub fn voverlap(&self, other: &BBox) -> f64 {
        (self.y1.min(other.y1) - self.y0.max(other.y0)).max(0.0)
    }

    pub fn is_hoverlap(&self, other: &BBox) -> bool {
        other.x0 <= self.x1 && self.x0 <= other.x1
    }

    pub fn is_voverlap(&self, other: &BBox) -> bool {
        other.y0 <= self.y1 && self.y0 <= other.y1
    }

    /// Horizontal gap between the boxes, 0 when they overlap.
    pub fn hdistance(&self, other: &BBox) -> f64 {
        if self.is_hoverlap(other) {
            0.0
        } else {
            (self.x0 - other.x1).abs().min((self.x1 - other.x0).abs())
        }
    }

    /// Vertical gap between the boxes, 0 when they overlap.
    pub fn vdistance(&self, other: &BBox) -> f64 {
        if self.is_voverlap(other) {
            0.0
        } else {
            (self.y0 - other.y1).abs().min((self.y1 - other.y0).abs())
        }
    }
}

/// Affine matrix `(a, b, c, d, e, f)` in PDF convention.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Matrix(pub [f64; 6]);

impl Matrix {
    pub const IDENTITY: Matrix = Matrix([1.0, 0.0, 0.0, 1.0, 0.0, 0.0]);

    /// Apply `self`, then `next`.
    pub fn then(&self, next: &Matrix) -> Matrix {
        let [a1, b1, c1, d1, e1, f1] = self.0;
        let [a0, b0, c0, d0, e0, f0] = next.0;
        Matrix([
            a0 * a1 + c0 * b1,
            b0 * a1 + d0 * b1,
            a0 * c1 + c0 * d1,
            b0 * c1 + d0 * d1,
            a0 * e1 + c0 * f1 + e0,
            b0 * e1 + d0 * f1 + f0,
        ])
    }

    /// Transform a point.
    pub fn apply(&self, x: f64, y: f64) -> (f64, f64) {
        let [a, b, c, d, e, f] = self.0;
        (a * x + c * y + e, b * x + d * y + f)
    }

    pub fn b(&self) -> f64 {
        self.0[1]
    }

    pub fn c(&self) -> f64 {
        self.0[2]
    }

    /// Matrix mapping a page's user space into its displayed orientation.
    pub fn for_page_rotation(rotate: i64, media_box: [f64; 4]) -> Matrix {
        let [x0, y0, x1, y1] = media_box;
        match rotate.rem_euclid(360) {
            90 => Matrix([0.0, -1.0, 1.0, 0.0, -y0, x1]),
            180 => Matrix([-1.0, 0.0, 0.0, -1.0, x1, y1]),
            270 => Matrix([0.0, 1.0, -1.0, 0.0, y1, -x0]),
            _ => Matrix([1.0, 0.0, 0.0, 1.0, -x0, -y0]),
        }
    }
}

/// Kind of text object produced by layout analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    /// A single glyph.
    Char,
    /// A line of glyphs read left to right.
    Horizontal,
    /// A line of glyphs stacked top to bottom.
    Vertical,
}

/// A positioned piece of text on a page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextObject {
    pub bbox: BBox,
    pub orientation: Orientation,
    pub text: String,
    /// Glyph rendering matrix scaled by font size (first glyph for lines).
    pub matrix: Matrix,
}

impl TextObject {
    pub fn new(bbox: BBox, orientation: Orientation, text: impl Into<String>) -> Self {
        Self {
            bbox,
            orientation,
            text: text.into(),
            matrix: Matrix::IDENTITY,
        }
    }

    pub fn with_matrix(mut self, matrix: Matrix) -> Self {
        self.matrix = matrix;
        self
    }

    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// Layout analysis parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutParams {
    /// Maximum gap between two glyphs of a line, relative to glyph size.
    pub char_margin: f64,

    /// Minimum overlap between two glyphs of a line, relative to glyph size.
    pub line_overlap: f64,

    /// Group stacked glyphs into vertical lines.
    pub detect_vertical: bool,
}

impl Default for LayoutParams {
    fn default() -> Self {
        Self {
            char_margin: 2.0,
            line_overlap: 0.5,
            detect_vertical: true,
        }
    }
}

/// Text objects of one single-page document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PageLayout {
    /// Page number in the source document (1-indexed).
    pub page_number: u32,
    /// Displayed page width.
    pub width: f64,
    /// Displayed page height.
    pub height: f64,
    pub chars: Vec<TextObject>,
    /// Non-blank horizontal lines.
    pub horizontal_text: Vec<TextObject>,
    /// Non-blank vertical lines.
    pub vertical_text: Vec<TextObject>,
}

impl PageLayout {
    /// Text objects of one kind.
    pub fn text_objects(&self, orientation: Orientation) -> &[TextObject] {
        match orientation {
            Orientation::Char => &self.chars,
            Orientation::Horizontal => &self.horizontal_text,
            Orientation::Vertical => &self.vertical_text,
        }
    }

    /// Classify the page's text orientation.
    pub fn rotation(&self) -> Rotation {
        detect_rotation(
            self.text_objects(Orientation::Char),
            self.text_objects(Orientation::Horizontal),
            self.text_objects(Orientation::Vertical),
        )
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bbox_normalizes_corners() {
        let b = BBox::new(10.0, 20.0, 0.0, 5.0);
        assert_eq!(b, BBox { x0: 0.0, y0: 5.0, x1: 10.0, y1: 20.0 });
        assert_eq!(b.top_mid(), (5.0, 20.0));
        assert_eq!(b.bottom_mid(), (5.0, 5.0));
    }

    #[test]
    fn test_bbox_distances() {
        let a = BBox::new(0.0, 0.0, 10.0, 10.0);
        let b = BBox::new(15.0, 5.0, 20.0, 12.0);
        assert_eq!(a.hdistance(&b), 5.0);
        assert_eq!(a.vdistance(&b), 0.0);
        assert_eq!(a.voverlap(&b), 5.0);
        assert_eq!(a.hoverlap(&b), 0.0);
    }

    #[test]
    fn test_matrix_rotation_makes_quarter_turn_upright() {
        let glyph = Matrix([0.0, 12.0, -12.0, 0.0, 100.0, 200.0]);
        let page = Matrix::for_page_rotation(90, [0.0, 0.0, 612.0, 792.0]);
        let upright = glyph.then(&page);
        assert_eq!(&upright.0[..4], &[12.0, 0.0, 0.0, 12.0]);
        assert_eq!(upright.apply(0.0, 0.0), (200.0, 512.0));
    }

    #[test]
    fn test_text_objects_by_orientation() {
        let bbox = BBox::new(0.0, 0.0, 10.0, 10.0);
        let layout = PageLayout {
            page_number: 1,
            chars: vec![TextObject::new(bbox, Orientation::Char, "a")],
            horizontal_text: vec![TextObject::new(bbox, Orientation::Horizontal, "abc")],
            ..Default::default()
        };
        assert_eq!(layout.text_objects(Orientation::Char)[0].text, "a");
        assert_eq!(layout.text_objects(Orientation::Horizontal)[0].text, "abc");
        assert!(layout.text_objects(Orientation::Vertical).is_empty());
        assert_eq!(layout.rotation(), Rotation::None);
    }

    #[test]
    fn test_matrix_identity_rotation_only_translates() {
        let page = Matrix::for_page_rotation(0, [10.0, 20.0, 622.0, 812.0]);
        assert_eq!(page.apply(10.0, 20.0), (0.0, 0.0));
    }
}
