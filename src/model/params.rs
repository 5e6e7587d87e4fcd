//! Snapshot-wide dump parameters.

use serde::{Deserialize, Serialize};

/// Global parameters of the dumped process.
///
/// Written once near the start of every dump; the loader refuses dumps that
/// lack them because pointer extraction depends on `big_endian` and
/// `ptr_size`.
#[derive(Clone, Serialize, Deserialize, Debug, Default, PartialEq)]
pub struct DumpParams {
    /// Byte order of the target process.
    pub big_endian: bool,
    /// Pointer width in bytes (4 or 8).
    pub ptr_size: u64,
    /// Start of the heap address range (inclusive).
    pub heap_start: u64,
    /// End of the heap address range (exclusive).
    pub heap_end: u64,
    /// Target architecture string, e.g. "amd64".
    pub arch: String,
    /// Build experiment flags the runtime was compiled with.
    pub go_experiment: String,
    /// Logical CPU count of the dumped process.
    pub ncpu: u64,
}

impl DumpParams {
    /// True when `addr` falls inside the heap range `[heap_start, heap_end)`.
    pub fn in_heap(&self, addr: u64) -> bool {
        addr >= self.heap_start && addr < self.heap_end
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_heap_bounds() {
        let params = DumpParams {
            heap_start: 0x1000,
            heap_end: 0x2000,
            ..DumpParams::default()
        };
        assert!(params.in_heap(0x1000));
        assert!(params.in_heap(0x1fff));
        assert!(!params.in_heap(0x2000));
        assert!(!params.in_heap(0xfff));
        assert!(!params.in_heap(0));
    }
}
