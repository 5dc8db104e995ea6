//! Page rotation detection from layout text objects.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::TextObject;

/// Orientation of a page's text relative to upright reading direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rotation {
    /// Text reads upright.
    #[default]
    None,
    /// Text is turned a quarter turn clockwise.
    Clockwise,
    /// Text is turned a quarter turn anticlockwise.
    Anticlockwise,
}

impl Rotation {
    /// Degrees to add to the page's `/Rotate` to make the text upright.
    pub fn corrective_degrees(&self) -> Option<i64> {
        match self {
            Rotation::None => None,
            Rotation::Anticlockwise => Some(90),
            Rotation::Clockwise => Some(270),
        }
    }

    pub fn is_rotated(&self) -> bool {
        !matches!(self, Rotation::None)
    }
}

/// Classify a page from its characters and its horizontal and vertical lines.
///
/// Vertical lines must outnumber horizontal ones before the page counts as
/// rotated; the glyph matrices then decide the direction. Blank lines are
/// ignored and every tie resolves to [`Rotation::None`].
pub fn detect_rotation(
    chars: &[TextObject],
    horizontal_text: &[TextObject],
    vertical_text: &[TextObject],
) -> Rotation {
    let hlen = horizontal_text.iter().filter(|t| !t.is_blank()).count();
    let vlen = vertical_text.iter().filter(|t| !t.is_blank()).count();

    if hlen >= vlen {
        return Rotation::None;
    }

    let clockwise = chars
        .iter()
        .filter(|c| c.matrix.b() < 0.0 && c.matrix.c() > 0.0)
        .count();
    let anticlockwise = chars
        .iter()
        .filter(|c| c.matrix.b() > 0.0 && c.matrix.c() < 0.0)
        .count();

    debug!(
        "Vertical text dominates ({} vs {}); clockwise={}, anticlockwise={}",
        vlen, hlen, clockwise, anticlockwise
    );

    match clockwise.cmp(&anticlockwise) {
        std::cmp::Ordering::Greater => Rotation::Clockwise,
        std::cmp::Ordering::Less => Rotation::Anticlockwise,
        std::cmp::Ordering::Equal => Rotation::None,
    }
}
