//! PDF fixtures built in memory with lopdf.

#![allow(dead_code)]

use std::path::{Path, PathBuf};

use lopdf::{Document, Object, ObjectId, Stream, StringFormat, dictionary};

/// A line of text drawn with Helvetica 12pt.
pub struct Line {
    pub text: &'static str,
    pub x: f64,
    pub y: f64,
    pub direction: Direction,
}

/// Reading direction of a drawn line.
#[derive(Clone, Copy)]
pub enum Direction {
    Upright,
    /// Baseline runs bottom to top.
    Anticlockwise,
    /// Baseline runs top to bottom.
    Clockwise,
}

impl Line {
    pub fn upright(text: &'static str, x: f64, y: f64) -> Self {
        Self {
            text,
            x,
            y,
            direction: Direction::Upright,
        }
    }

    pub fn anticlockwise(text: &'static str, x: f64, y: f64) -> Self {
        Self {
            text,
            x,
            y,
            direction: Direction::Anticlockwise,
        }
    }

    pub fn clockwise(text: &'static str, x: f64, y: f64) -> Self {
        Self {
            text,
            x,
            y,
            direction: Direction::Clockwise,
        }
    }

    fn operators(&self) -> String {
        let (a, b, c, d) = match self.direction {
            Direction::Upright => (1, 0, 0, 1),
            Direction::Anticlockwise => (0, 1, -1, 0),
            Direction::Clockwise => (0, -1, 1, 0),
        };
        format!(
            "BT /F1 12 Tf {} {} {} {} {} {} Tm ({}) Tj ET\n",
            a, b, c, d, self.x, self.y, self.text
        )
    }
}

/// Content stream drawing `lines`.
pub fn content(lines: &[Line]) -> Vec<u8> {
    lines.iter().map(Line::operators).collect::<String>().into_bytes()
}

/// Build a document with one page per entry of `pages`.
pub fn build_document(pages: &[Vec<Line>]) -> Document {
    let mut doc = Document::with_version("1.5");
    let pages_id: ObjectId = doc.new_object_id();

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });

    let mut kids = Vec::new();
    for lines in pages {
        let content_id = doc.add_object(Stream::new(dictionary! {}, content(lines)));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
            "Contents" => content_id,
            "Resources" => dictionary! {
                "Font" => dictionary! {
                    "F1" => font_id,
                },
            },
        });
        kids.push(Object::Reference(page_id));
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

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc
}

/// Serialize and write a document to `dir/name`.
pub fn write_pdf(dir: &Path, name: &str, mut doc: Document) -> PathBuf {
    let path = dir.join(name);
    let mut data = Vec::new();
    doc.save_to(&mut data).unwrap();
    std::fs::write(&path, data).unwrap();
    path
}

/// `count` upright pages, each labelled with its page number.
pub fn numbered_pages(count: usize) -> Vec<Vec<Line>> {
    const LABELS: [&str; 6] = ["One", "Two", "Three", "Four", "Five", "Six"];
    (0..count)
        .map(|i| vec![Line::upright(LABELS[i % LABELS.len()], 72.0, 720.0)])
        .collect()
}

/// A page whose text was typeset sideways: four vertical lines and one
/// horizontal line.
pub fn sideways_page(direction: Direction) -> Vec<Line> {
    let words = ["Quarterly", "Revenue", "Forecast", "Summary"];
    let mut lines: Vec<Line> = words
        .iter()
        .enumerate()
        .map(|(i, word)| {
            let x = 150.0 + 60.0 * i as f64;
            match direction {
                Direction::Clockwise => Line::clockwise(word, x, 600.0),
                _ => Line::anticlockwise(word, x, 200.0),
            }
        })
        .collect();
    lines.push(Line::upright("Draft", 72.0, 60.0));
    lines
}

/// A page with a caption above where the test parser reports a table, and
/// a footnote far below it.
pub fn captioned_page() -> Vec<Line> {
    vec![
        Line::upright("Summary", 72.0, 700.0),
        Line::upright("Footnote", 72.0, 100.0),
    ]
}

/// Padding string used in key derivation for the standard security handler.
const PAD_BYTES: [u8; 32] = [
    0x28, 0xBF, 0x4E, 0x5E, 0x4E, 0x75, 0x8A, 0x41, 0x64, 0x00, 0x4E, 0x56, 0xFF, 0xFA, 0x01, 0x08,
    0x2E, 0x2E, 0x00, 0xB6, 0xD0, 0x68, 0x3E, 0x80, 0x2F, 0x0C, 0xA9, 0xFE, 0x64, 0x53, 0x69, 0x7A,
];

fn rc4(key: &[u8], data: &[u8]) -> Vec<u8> {
    let mut s: Vec<u8> = (0..=255).collect();
    let mut j = 0usize;
    for i in 0..256 {
        j = (j + s[i] as usize + key[i % key.len()] as usize) & 0xFF;
        s.swap(i, j);
    }
    let (mut i, mut j) = (0usize, 0usize);
    data.iter()
        .map(|&byte| {
            i = (i + 1) & 0xFF;
            j = (j + s[i] as usize) & 0xFF;
            s.swap(i, j);
            byte ^ s[(s[i] as usize + s[j] as usize) & 0xFF]
        })
        .collect()
}

/// Encrypt `doc` in place with 40-bit RC4 (V=1, R=2) for `password`.
pub fn encrypt(doc: &mut Document, password: &[u8]) {
    let file_id = b"pdftabfixture016";
    let permissions: i32 = -4;

    let len = password.len().min(32);
    let mut padded = password[..len].to_vec();
    padded.extend_from_slice(&PAD_BYTES[..32 - len]);

    let owner_key = md5::compute(&padded);
    let o_value = rc4(&owner_key[..5], &padded);

    let mut key_input = padded.clone();
    key_input.extend_from_slice(&o_value);
    key_input.extend_from_slice(&(permissions as u32).to_le_bytes());
    key_input.extend_from_slice(file_id);
    let key = md5::compute(&key_input)[..5].to_vec();
    let u_value = rc4(&key, &PAD_BYTES);

    for (&(num, generation), obj) in doc.objects.iter_mut() {
        let mut object_key = key.clone();
        object_key.extend_from_slice(&num.to_le_bytes()[..3]);
        object_key.extend_from_slice(&generation.to_le_bytes()[..2]);
        let digest = md5::compute(&object_key);
        let object_key = &digest[..(key.len() + 5).min(16)];

        match obj {
            Object::Stream(stream) => {
                let encrypted = rc4(object_key, &stream.content);
                stream.set_content(encrypted);
            }
            Object::String(content, _) => *content = rc4(object_key, content),
            _ => {}
        }
    }

    let encrypt_id = doc.add_object(dictionary! {
        "Filter" => "Standard",
        "V" => 1_i64,
        "R" => 2_i64,
        "Length" => 40_i64,
        "O" => Object::String(o_value, StringFormat::Literal),
        "U" => Object::String(u_value, StringFormat::Literal),
        "P" => permissions as i64,
    });
    doc.trailer.set("Encrypt", Object::Reference(encrypt_id));
    doc.trailer.set(
        "ID",
        Object::Array(vec![
            Object::String(file_id.to_vec(), StringFormat::Literal),
            Object::String(file_id.to_vec(), StringFormat::Literal),
        ]),
    );
}
