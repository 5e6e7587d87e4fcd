//! On-disk archive container.

use std::io;

use serde::{Deserialize, Serialize};

use crate::model::HeapSnapshot;

use super::StringInterner;

/// File magic for snapshot archives.
pub const ARCHIVE_MAGIC: &[u8; 8] = b"HLSNAP1\n";

/// zstd compression level for archives. Level 3 trades well between write
/// speed and size for dump-scale payloads.
const COMPRESSION_LEVEL: i32 = 3;

/// A parsed snapshot plus the interner needed to display it.
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct Archive {
    pub interner: StringInterner,
    pub snapshot: HeapSnapshot,
}

impl Archive {
    pub fn new(interner: StringInterner, snapshot: HeapSnapshot) -> Self {
        Self { interner, snapshot }
    }

    /// Serializes to magic + zstd-compressed bincode.
    pub fn to_bytes(&self) -> Result<Vec<u8>, io::Error> {
        let raw = bincode::serialize(self).map_err(io::Error::other)?;
        let compressed = zstd::encode_all(&raw[..], COMPRESSION_LEVEL)?;
        let mut out = Vec::with_capacity(ARCHIVE_MAGIC.len() + compressed.len());
        out.extend_from_slice(ARCHIVE_MAGIC);
        out.extend_from_slice(&compressed);
        Ok(out)
    }

    /// Parses bytes produced by [`Archive::to_bytes`].
    pub fn from_bytes(data: &[u8]) -> Result<Self, io::Error> {
        let body = data
            .strip_prefix(ARCHIVE_MAGIC.as_slice())
            .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidData, "not a heaplot archive"))?;
        let raw = zstd::decode_all(body)?;
        bincode::deserialize(&raw).map_err(io::Error::other)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ByteView, Object};

    #[test]
    fn test_roundtrip() {
        let mut interner = StringInterner::new();
        let name_hash = interner.intern("main.Node");
        let archive = Archive::new(
            interner,
            HeapSnapshot {
                objects: vec![Object {
                    address: 0xc000_0100,
                    name_hash,
                    size: 32,
                    content: ByteView::new(vec![1, 2, 3, 4]),
                    children: vec![0xc000_0200],
                    ..Object::default()
                }],
                ..HeapSnapshot::default()
            },
        );

        let bytes = archive.to_bytes().unwrap();
        assert!(bytes.starts_with(ARCHIVE_MAGIC));

        let decoded = Archive::from_bytes(&bytes).unwrap();
        assert_eq!(decoded.snapshot.objects, archive.snapshot.objects);
        assert_eq!(decoded.interner.resolve(name_hash), Some("main.Node"));
    }

    #[test]
    fn test_bad_magic() {
        let err = Archive::from_bytes(b"not an archive at all").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }
}
