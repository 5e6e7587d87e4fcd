//! Snapshot data model.
//!
//! Everything in this module is constructed once by the loader and never
//! mutated afterwards. The viewer only ever reads these structures, which is
//! what makes unrestricted concurrent access to a loaded snapshot safe.

mod content;
mod object;
mod params;
mod snapshot;
mod stats;

pub use content::ByteView;
pub use object::{Field, FieldKind, Object, ObjectKind};
pub use params::DumpParams;
pub use snapshot::{HeapSnapshot, Root, RootKind};
pub use stats::RuntimeStats;

/// Location in the snapshot's virtual address space.
///
/// Unique per object within one snapshot, never reused. Opaque outside of
/// map keys and `0x{:x}` formatting.
pub type Address = u64;
