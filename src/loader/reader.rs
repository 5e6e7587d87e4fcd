//! Low-level primitives of the dump record stream.

use std::io::{self, Read};

use super::LoaderError;

/// Hard cap on a single length-prefixed payload. Object contents in real
/// dumps stay far below this; anything larger means a corrupt length and
/// would otherwise trigger a huge allocation.
const MAX_PAYLOAD: u64 = 1 << 32;

/// Cursor over the raw dump bytes.
///
/// The format has two primitives: unsigned LEB128 varints and
/// varint-length-prefixed byte strings. Everything else is built from
/// those two.
pub struct DumpReader<R: Read> {
    inner: R,
}

impl<R: Read> DumpReader<R> {
    pub fn new(inner: R) -> Self {
        Self { inner }
    }

    fn read_byte(&mut self) -> Result<u8, LoaderError> {
        let mut buf = [0u8; 1];
        match self.inner.read_exact(&mut buf) {
            Ok(()) => Ok(buf[0]),
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => {
                Err(LoaderError::Truncated("unexpected end of dump".to_string()))
            }
            Err(e) => Err(LoaderError::Io(e.to_string())),
        }
    }

    /// Reads an unsigned LEB128 varint.
    pub fn read_uvarint(&mut self) -> Result<u64, LoaderError> {
        let mut value: u64 = 0;
        let mut shift: u32 = 0;
        loop {
            let byte = self.read_byte()?;
            if shift >= 63 && byte > 1 {
                return Err(LoaderError::Malformed("varint overflows u64".to_string()));
            }
            value |= u64::from(byte & 0x7f) << shift;
            if byte & 0x80 == 0 {
                return Ok(value);
            }
            shift += 7;
        }
    }

    /// Reads a length-prefixed byte string.
    pub fn read_bytes(&mut self) -> Result<Vec<u8>, LoaderError> {
        let len = self.read_uvarint()?;
        if len > MAX_PAYLOAD {
            return Err(LoaderError::Malformed(format!(
                "payload length {} exceeds limit",
                len
            )));
        }
        let mut buf = vec![0u8; len as usize];
        match self.inner.read_exact(&mut buf) {
            Ok(()) => Ok(buf),
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => Err(LoaderError::Truncated(
                format!("payload cut short ({} bytes expected)", len),
            )),
            Err(e) => Err(LoaderError::Io(e.to_string())),
        }
    }

    /// Reads a length-prefixed string. Dump strings are expected to be
    /// UTF-8; invalid sequences are replaced rather than rejected.
    pub fn read_string(&mut self) -> Result<String, LoaderError> {
        let bytes = self.read_bytes()?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    /// Checks the fixed-length magic at the start of the stream.
    pub fn expect_magic(&mut self, magic: &[u8]) -> Result<(), LoaderError> {
        let mut buf = vec![0u8; magic.len()];
        match self.inner.read_exact(&mut buf) {
            Ok(()) if buf == magic => Ok(()),
            Ok(()) => Err(LoaderError::BadMagic),
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => Err(LoaderError::BadMagic),
            Err(e) => Err(LoaderError::Io(e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uvarint_single_byte() {
        let mut reader = DumpReader::new(&[0x07u8][..]);
        assert_eq!(reader.read_uvarint().unwrap(), 7);
    }

    #[test]
    fn test_uvarint_multi_byte() {
        // 300 = 0b1_0010_1100 -> 0xac 0x02
        let mut reader = DumpReader::new(&[0xacu8, 0x02][..]);
        assert_eq!(reader.read_uvarint().unwrap(), 300);
    }

    #[test]
    fn test_uvarint_truncated() {
        let mut reader = DumpReader::new(&[0x80u8][..]);
        assert!(matches!(
            reader.read_uvarint(),
            Err(LoaderError::Truncated(_))
        ));
    }

    #[test]
    fn test_bytes_roundtrip() {
        let mut data = vec![0x03u8];
        data.extend_from_slice(b"abc");
        let mut reader = DumpReader::new(&data[..]);
        assert_eq!(reader.read_bytes().unwrap(), b"abc");
    }

    #[test]
    fn test_bytes_cut_short() {
        let data = vec![0x05u8, b'a', b'b'];
        let mut reader = DumpReader::new(&data[..]);
        assert!(matches!(reader.read_bytes(), Err(LoaderError::Truncated(_))));
    }

    #[test]
    fn test_magic_mismatch() {
        let mut reader = DumpReader::new(&b"not the magic at"[..]);
        assert!(matches!(
            reader.expect_magic(b"go1.3 heap dump\n"),
            Err(LoaderError::BadMagic)
        ));
    }
}
