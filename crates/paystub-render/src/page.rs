//! Content-stream composition for a single page.

use lopdf::content::{Content, Operation};
use lopdf::{Object, StringFormat};

/// Fonts registered in the page resources.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Font {
    Regular,
    Bold,
}

impl Font {
    fn resource_name(self) -> &'static [u8] {
        match self {
            Self::Regular => b"F1",
            Self::Bold => b"F2",
        }
    }
}

/// Accumulates page operations, tracking the text state so `Tf` is only
/// emitted when the font or size actually changes.
pub(crate) struct PageContent {
    operations: Vec<Operation>,
    current_font: Option<(Font, f32)>,
}

impl PageContent {
    pub fn new() -> Self {
        Self {
            operations: Vec::new(),
            current_font: None,
        }
    }

    pub fn text(&mut self, font: Font, size: f32, x: f32, y: f32, text: &str) {
        self.operations.push(Operation::new("BT", vec![]));
        self.set_font(font, size);
        self.operations
            .push(Operation::new("Td", vec![x.into(), y.into()]));
        self.operations.push(Operation::new(
            "Tj",
            vec![Object::String(to_win_ansi(text), StringFormat::Literal)],
        ));
        self.operations.push(Operation::new("ET", vec![]));
    }

    pub fn image(&mut self, name: &str, x: f32, y: f32, width: f32, height: f32) {
        self.operations.push(Operation::new("q", vec![]));
        self.operations.push(Operation::new(
            "cm",
            vec![
                width.into(),
                0.into(),
                0.into(),
                height.into(),
                x.into(),
                y.into(),
            ],
        ));
        self.operations.push(Operation::new(
            "Do",
            vec![Object::Name(name.as_bytes().to_vec())],
        ));
        self.operations.push(Operation::new("Q", vec![]));
    }

    pub fn finish(self) -> Content {
        Content {
            operations: self.operations,
        }
    }

    fn set_font(&mut self, font: Font, size: f32) {
        if self.current_font != Some((font, size)) {
            self.operations.push(Operation::new(
                "Tf",
                vec![
                    Object::Name(font.resource_name().to_vec()),
                    size.into(),
                ],
            ));
            self.current_font = Some((font, size));
        }
    }
}

/// Narrow text to WinAnsi bytes for the base-14 Type1 fonts.
pub(crate) fn to_win_ansi(s: &str) -> Vec<u8> {
    s.chars()
        .map(|c| if c as u32 <= 255 { c as u8 } else { b'?' })
        .collect()
}
