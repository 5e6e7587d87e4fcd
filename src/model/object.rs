//! Heap objects and their field layout.

use serde::{Deserialize, Serialize};

use super::{Address, ByteView};

/// Category of an object's type descriptor.
#[derive(Clone, Copy, Serialize, Deserialize, Debug, Default, PartialEq, Eq)]
pub enum ObjectKind {
    /// Plain allocation of a single value.
    #[default]
    Regular,
    /// Array allocation.
    Array,
    /// Channel buffer allocation.
    Channel,
    /// No type information; pointers found by conservative scanning.
    Conservative,
}

impl ObjectKind {
    /// Short label used in object tables.
    pub fn label(&self) -> &'static str {
        match self {
            ObjectKind::Regular => "obj",
            ObjectKind::Array => "array",
            ObjectKind::Channel => "chan",
            ObjectKind::Conservative => "cons",
        }
    }
}

/// Kind of a pointer-bearing field slot.
///
/// Only slots the runtime knows may hold pointers appear in the dump; plain
/// scalar data is part of the object content but has no field entry.
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub enum FieldKind {
    /// A single machine pointer.
    Ptr,
    /// String header (pointer + length).
    String,
    /// Slice header (pointer + length + capacity).
    Slice,
    /// Interface value with method table (itab pointer + data pointer).
    Iface,
    /// Empty interface value (type pointer + data pointer).
    Eface,
}

impl FieldKind {
    pub fn label(&self) -> &'static str {
        match self {
            FieldKind::Ptr => "ptr",
            FieldKind::String => "string",
            FieldKind::Slice => "slice",
            FieldKind::Iface => "iface",
            FieldKind::Eface => "eface",
        }
    }
}

/// One member slot inside an object: what it holds and where.
///
/// Owned exclusively by its containing object; the offset is relative to
/// the start of the object's content.
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct Field {
    pub kind: FieldKind,
    pub offset: u64,
}

/// One heap object from the snapshot.
///
/// Created once during load, never mutated. `children` holds the addresses
/// this object points at; two objects may legally reference each other, so
/// consumers must never follow children recursively without a visited set.
#[derive(Clone, Serialize, Deserialize, Debug, Default, PartialEq)]
pub struct Object {
    /// Primary key within the snapshot.
    pub address: Address,
    /// Interned type name hash, resolved through the snapshot's interner.
    /// Zero when the dump carried no type record for this object.
    pub name_hash: u64,
    pub kind: ObjectKind,
    /// Allocated size in bytes. May exceed `content.len()` when the dump
    /// truncated large object contents.
    pub size: u64,
    pub content: ByteView,
    /// Pointer-bearing slots, ordered by offset.
    pub fields: Vec<Field>,
    /// Outgoing reference addresses. Entries may be dangling; lookups on
    /// them return nothing rather than failing.
    pub children: Vec<Address>,
}

impl Object {
    /// True when the dump associated a type descriptor with this object.
    pub fn has_type(&self) -> bool {
        self.name_hash != 0
    }
}
