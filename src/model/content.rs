//! Raw object content and its canonical hex dump rendering.

use serde::{Deserialize, Serialize};

/// Number of bytes shown per hex dump row.
const ROW_WIDTH: usize = 16;

/// Immutable view over an object's raw bytes.
///
/// `format()` is a pure function of the content: the same bytes always
/// produce the same text, so rendered dumps are stable across runs and
/// safe to compare in tests.
#[derive(Clone, Serialize, Deserialize, Debug, Default, PartialEq, Eq)]
#[serde(transparent)]
pub struct ByteView {
    bytes: Vec<u8>,
}

impl ByteView {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    /// Returns the raw content.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Renders the content as a classic hex dump.
    ///
    /// One line per 16 bytes: a hex offset label, the byte values in hex,
    /// and the printable-ASCII rendering with `.` standing in for anything
    /// non-printable. Empty content produces an empty string. Total over
    /// any input; cannot fail.
    pub fn format(&self) -> String {
        let mut out = String::new();
        for (row, chunk) in self.bytes.chunks(ROW_WIDTH).enumerate() {
            let mut hex = String::with_capacity(ROW_WIDTH * 3);
            let mut ascii = String::with_capacity(ROW_WIDTH);
            for (i, b) in chunk.iter().enumerate() {
                if i > 0 {
                    hex.push(' ');
                }
                hex.push_str(&format!("{:02x}", b));
                ascii.push(if b.is_ascii_graphic() || *b == b' ' {
                    *b as char
                } else {
                    '.'
                });
            }
            out.push_str(&format!(
                "{:08x}  {:<width$}  {}\n",
                row * ROW_WIDTH,
                hex,
                ascii,
                width = ROW_WIDTH * 3 - 1
            ));
        }
        out
    }
}

impl From<Vec<u8>> for ByteView {
    fn from(bytes: Vec<u8>) -> Self {
        Self::new(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_empty() {
        assert_eq!(ByteView::new(vec![]).format(), "");
    }

    #[test]
    fn test_format_mixed_printable() {
        let view = ByteView::new(vec![0x41, 0x00, 0xFF]);
        let text = view.format();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].starts_with("00000000"));
        assert!(lines[0].contains("41 00 ff"));
        assert!(lines[0].ends_with("A.."));
    }

    #[test]
    fn test_format_row_split() {
        let view = ByteView::new((0..17).collect());
        let text = view.format();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[1].starts_with("00000010"));
        assert!(lines[1].contains("10"));
    }

    #[test]
    fn test_format_deterministic() {
        let view = ByteView::new(b"hello world".to_vec());
        assert_eq!(view.format(), view.format());
    }

    #[test]
    fn test_format_space_is_printable() {
        let view = ByteView::new(b"a b".to_vec());
        assert!(view.format().contains("a b\n"));
    }
}
