//! Archive storage for parsed snapshots.
//!
//! Parsing a large binary dump is the slow part of opening a snapshot, so a
//! parsed snapshot can be re-saved as a compact archive (bincode + zstd)
//! and reopened directly. One archive file holds one snapshot together
//! with its string interner.

mod archive;
mod interner;

pub use archive::{ARCHIVE_MAGIC, Archive};
pub use interner::StringInterner;

use std::fs;
use std::io::{self, Read};
use std::path::Path;

use tracing::info;

/// Writes an archive to `path`, replacing any existing file.
pub fn write_archive(path: impl AsRef<Path>, archive: &Archive) -> io::Result<()> {
    let data = archive.to_bytes()?;
    fs::write(path.as_ref(), &data)?;
    info!(
        "Wrote archive {} ({} objects, {} bytes)",
        path.as_ref().display(),
        archive.snapshot.object_count(),
        data.len()
    );
    Ok(())
}

/// Reads an archive written by [`write_archive`].
pub fn read_archive(path: impl AsRef<Path>) -> io::Result<Archive> {
    let data = fs::read(path.as_ref())?;
    let archive = Archive::from_bytes(&data)?;
    info!(
        "Read archive {} ({} objects)",
        path.as_ref().display(),
        archive.snapshot.object_count()
    );
    Ok(archive)
}

/// Checks whether `path` starts with the archive magic.
///
/// Used by the CLI to pick the loader for an input file without relying on
/// file extensions.
pub fn is_archive(path: impl AsRef<Path>) -> io::Result<bool> {
    let mut file = fs::File::open(path.as_ref())?;
    let mut magic = [0u8; ARCHIVE_MAGIC.len()];
    match file.read_exact(&mut magic) {
        Ok(()) => Ok(magic == *ARCHIVE_MAGIC),
        // Shorter than the magic: not an archive, let the dump loader report it
        Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => Ok(false),
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{HeapSnapshot, Object};

    fn sample_archive() -> Archive {
        let mut interner = StringInterner::new();
        let name_hash = interner.intern("runtime.g");
        Archive {
            interner,
            snapshot: HeapSnapshot {
                objects: vec![Object {
                    address: 0x1000,
                    name_hash,
                    size: 64,
                    ..Object::default()
                }],
                ..HeapSnapshot::default()
            },
        }
    }

    #[test]
    fn test_archive_file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("snap.hlz");

        write_archive(&path, &sample_archive()).unwrap();
        let loaded = read_archive(&path).unwrap();

        assert_eq!(loaded.snapshot.object_count(), 1);
        assert_eq!(loaded.snapshot.objects[0].address, 0x1000);
        let hash = loaded.snapshot.objects[0].name_hash;
        assert_eq!(loaded.interner.resolve(hash), Some("runtime.g"));
    }

    #[test]
    fn test_is_archive_detection() {
        let dir = tempfile::tempdir().unwrap();
        let archive_path = dir.path().join("snap.hlz");
        let other_path = dir.path().join("other.bin");

        write_archive(&archive_path, &sample_archive()).unwrap();
        std::fs::write(&other_path, b"go1.3 heap dump\n").unwrap();

        assert!(is_archive(&archive_path).unwrap());
        assert!(!is_archive(&other_path).unwrap());
    }

    #[test]
    fn test_is_archive_short_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tiny");
        std::fs::write(&path, b"x").unwrap();
        assert!(!is_archive(&path).unwrap());
    }
}
