//! Binary heap dump decoder.
//!
//! Parses the `go1.3 heap dump\n` record stream into a [`HeapSnapshot`]:
//! dump parameters, type descriptors, objects with raw contents, root
//! sources (data/BSS segments, stack frames, finalizers, other roots) and
//! the runtime statistics block. Records the viewer has no use for
//! (goroutines, itabs, OS threads, defer/panic chains, allocation
//! profiles) are parsed only far enough to skip them.
//!
//! Outgoing references are not stored in the dump; they are recovered here
//! by reading pointer-size words at each object's pointer-field offsets,
//! using the dump's endianness and pointer width. A recovered pointer that
//! matches no object record stays in the child list as a dangling
//! reference; the graph tolerates those by design.

mod reader;

pub use reader::DumpReader;

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use tracing::{debug, info};

use crate::model::{
    ByteView, DumpParams, Field, FieldKind, HeapSnapshot, Object, ObjectKind, Root, RootKind,
    RuntimeStats,
};
use crate::storage::StringInterner;

/// Magic header of the supported dump format.
pub const DUMP_MAGIC: &[u8] = b"go1.3 heap dump\n";

// Record tags.
const TAG_EOF: u64 = 0;
const TAG_OBJECT: u64 = 1;
const TAG_OTHER_ROOT: u64 = 2;
const TAG_TYPE: u64 = 3;
const TAG_GOROUTINE: u64 = 4;
const TAG_STACK_FRAME: u64 = 5;
const TAG_PARAMS: u64 = 6;
const TAG_FINALIZER: u64 = 7;
const TAG_ITAB: u64 = 8;
const TAG_OS_THREAD: u64 = 9;
const TAG_MEM_STATS: u64 = 10;
const TAG_QUEUED_FINALIZER: u64 = 11;
const TAG_DATA: u64 = 12;
const TAG_BSS: u64 = 13;
const TAG_DEFER: u64 = 14;
const TAG_PANIC: u64 = 15;
const TAG_MEM_PROF: u64 = 16;
const TAG_ALLOC_SAMPLE: u64 = 17;

// Object kind codes.
const KIND_REGULAR: u64 = 0;
const KIND_ARRAY: u64 = 1;
const KIND_CHANNEL: u64 = 2;
const KIND_CONSERVATIVE: u64 = 127;

// Field kind codes; 0 terminates a field list.
const FIELD_EOL: u64 = 0;
const FIELD_PTR: u64 = 1;
const FIELD_STRING: u64 = 2;
const FIELD_SLICE: u64 = 3;
const FIELD_IFACE: u64 = 4;
const FIELD_EFACE: u64 = 5;

/// Number of entries in the dump's GC pause history ring.
const PAUSE_HISTORY_LEN: usize = 256;

/// Errors raised while decoding a dump.
///
/// These cover malformed input only. Dangling pointers inside a
/// well-formed dump are not errors; they survive into the graph and are
/// rendered as unresolved references.
#[derive(Debug, Clone)]
pub enum LoaderError {
    /// I/O failure reading the input file.
    Io(String),
    /// The file does not start with the supported dump magic.
    BadMagic,
    /// The stream ended inside a record.
    Truncated(String),
    /// A record tag this decoder does not know.
    UnknownTag(u64),
    /// Structurally invalid record content.
    Malformed(String),
    /// The dump carried no params record; pointer extraction is impossible
    /// without it.
    MissingParams,
    /// The dump carried no memstats record.
    MissingStats,
}

impl std::fmt::Display for LoaderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoaderError::Io(msg) => write!(f, "I/O error: {}", msg),
            LoaderError::BadMagic => write!(f, "not a heap dump (bad magic)"),
            LoaderError::Truncated(msg) => write!(f, "truncated dump: {}", msg),
            LoaderError::UnknownTag(tag) => write!(f, "unknown record tag {}", tag),
            LoaderError::Malformed(msg) => write!(f, "malformed dump: {}", msg),
            LoaderError::MissingParams => write!(f, "dump has no params record"),
            LoaderError::MissingStats => write!(f, "dump has no memstats record"),
        }
    }
}

impl std::error::Error for LoaderError {}

/// Type descriptor from a type record.
struct TypeInfo {
    size: u64,
    name_hash: u64,
    fields: Vec<Field>,
}

/// Object record before type resolution and child extraction.
struct RawObject {
    address: u64,
    type_addr: u64,
    kind: ObjectKind,
    content: Vec<u8>,
}

/// Pointer-bearing memory outside the heap (data/BSS segments and stack
/// frames); its pointer fields become roots.
struct RootSource {
    kind: RootKind,
    content: Vec<u8>,
    fields: Vec<Field>,
    description_hash: u64,
}

/// Loads a dump file from disk.
pub fn load_path(path: impl AsRef<Path>) -> Result<(HeapSnapshot, StringInterner), LoaderError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| LoaderError::Io(e.to_string()))?;
    info!("Loading heap dump {}", path.display());
    load_dump(BufReader::new(file))
}

/// Decodes a dump from any byte stream.
pub fn load_dump<R: Read>(input: R) -> Result<(HeapSnapshot, StringInterner), LoaderError> {
    Decoder::new(DumpReader::new(input)).run()
}

struct Decoder<R: Read> {
    reader: DumpReader<R>,
    interner: StringInterner,
    params: Option<DumpParams>,
    stats: Option<RuntimeStats>,
    types: HashMap<u64, TypeInfo>,
    raw_objects: Vec<RawObject>,
    root_sources: Vec<RootSource>,
    roots: Vec<Root>,
}

impl<R: Read> Decoder<R> {
    fn new(reader: DumpReader<R>) -> Self {
        Self {
            reader,
            interner: StringInterner::new(),
            params: None,
            stats: None,
            types: HashMap::new(),
            raw_objects: Vec::new(),
            root_sources: Vec::new(),
            roots: Vec::new(),
        }
    }

    fn run(mut self) -> Result<(HeapSnapshot, StringInterner), LoaderError> {
        self.reader.expect_magic(DUMP_MAGIC)?;

        loop {
            let tag = self.reader.read_uvarint()?;
            match tag {
                TAG_EOF => break,
                TAG_PARAMS => self.read_params()?,
                TAG_TYPE => self.read_type()?,
                TAG_OBJECT => self.read_object()?,
                TAG_OTHER_ROOT => self.read_other_root()?,
                TAG_DATA => self.read_segment(RootKind::Data)?,
                TAG_BSS => self.read_segment(RootKind::Bss)?,
                TAG_STACK_FRAME => self.read_stack_frame()?,
                TAG_FINALIZER | TAG_QUEUED_FINALIZER => self.read_finalizer()?,
                TAG_MEM_STATS => self.read_mem_stats()?,
                TAG_GOROUTINE => self.skip_goroutine()?,
                TAG_ITAB => self.skip_uvarints(2)?,
                TAG_OS_THREAD => self.skip_uvarints(3)?,
                TAG_DEFER => self.skip_uvarints(7)?,
                TAG_PANIC => self.skip_uvarints(6)?,
                TAG_MEM_PROF => self.skip_mem_prof()?,
                TAG_ALLOC_SAMPLE => self.skip_uvarints(2)?,
                other => return Err(LoaderError::UnknownTag(other)),
            }
        }

        self.finish()
    }

    fn read_params(&mut self) -> Result<(), LoaderError> {
        let big_endian = self.reader.read_uvarint()? != 0;
        let ptr_size = self.reader.read_uvarint()?;
        if ptr_size != 4 && ptr_size != 8 {
            return Err(LoaderError::Malformed(format!(
                "unsupported pointer size {}",
                ptr_size
            )));
        }
        let heap_start = self.reader.read_uvarint()?;
        let heap_end = self.reader.read_uvarint()?;
        let arch = self.reader.read_string()?;
        let go_experiment = self.reader.read_string()?;
        let ncpu = self.reader.read_uvarint()?;
        self.params = Some(DumpParams {
            big_endian,
            ptr_size,
            heap_start,
            heap_end,
            arch,
            go_experiment,
            ncpu,
        });
        Ok(())
    }

    fn read_type(&mut self) -> Result<(), LoaderError> {
        let addr = self.reader.read_uvarint()?;
        let size = self.reader.read_uvarint()?;
        let name = self.reader.read_string()?;
        let fields = self.read_field_list()?;
        let name_hash = self.interner.intern(&name);
        self.types.insert(
            addr,
            TypeInfo {
                size,
                name_hash,
                fields,
            },
        );
        Ok(())
    }

    fn read_object(&mut self) -> Result<(), LoaderError> {
        let address = self.reader.read_uvarint()?;
        let type_addr = self.reader.read_uvarint()?;
        let kind = match self.reader.read_uvarint()? {
            KIND_REGULAR => ObjectKind::Regular,
            KIND_ARRAY => ObjectKind::Array,
            KIND_CHANNEL => ObjectKind::Channel,
            KIND_CONSERVATIVE => ObjectKind::Conservative,
            other => {
                return Err(LoaderError::Malformed(format!(
                    "unknown object kind {}",
                    other
                )));
            }
        };
        let content = self.reader.read_bytes()?;
        self.raw_objects.push(RawObject {
            address,
            type_addr,
            kind,
            content,
        });
        Ok(())
    }

    fn read_other_root(&mut self) -> Result<(), LoaderError> {
        let description = self.reader.read_string()?;
        let address = self.reader.read_uvarint()?;
        let description_hash = self.interner.intern(&description);
        self.roots.push(Root {
            kind: RootKind::Other,
            address,
            description_hash,
        });
        Ok(())
    }

    fn read_segment(&mut self, kind: RootKind) -> Result<(), LoaderError> {
        let _address = self.reader.read_uvarint()?;
        let content = self.reader.read_bytes()?;
        let fields = self.read_field_list()?;
        self.root_sources.push(RootSource {
            kind,
            content,
            fields,
            description_hash: 0,
        });
        Ok(())
    }

    fn read_stack_frame(&mut self) -> Result<(), LoaderError> {
        let _sp = self.reader.read_uvarint()?;
        let _depth = self.reader.read_uvarint()?;
        let _child_sp = self.reader.read_uvarint()?;
        let content = self.reader.read_bytes()?;
        let _entry_pc = self.reader.read_uvarint()?;
        let _pc = self.reader.read_uvarint()?;
        let _contin_pc = self.reader.read_uvarint()?;
        let name = self.reader.read_string()?;
        let fields = self.read_field_list()?;
        let description_hash = self.interner.intern(&name);
        self.root_sources.push(RootSource {
            kind: RootKind::StackFrame,
            content,
            fields,
            description_hash,
        });
        Ok(())
    }

    fn read_finalizer(&mut self) -> Result<(), LoaderError> {
        let object = self.reader.read_uvarint()?;
        // fn, fn code pointer, fint, object type
        self.skip_uvarints(4)?;
        self.roots.push(Root {
            kind: RootKind::Finalizer,
            address: object,
            description_hash: 0,
        });
        Ok(())
    }

    fn read_mem_stats(&mut self) -> Result<(), LoaderError> {
        let mut next = || self.reader.read_uvarint();
        let stats = RuntimeStats {
            alloc: next()?,
            total_alloc: next()?,
            sys: next()?,
            lookups: next()?,
            mallocs: next()?,
            frees: next()?,
            heap_alloc: next()?,
            heap_sys: next()?,
            heap_idle: next()?,
            heap_inuse: next()?,
            heap_released: next()?,
            heap_objects: next()?,
            stack_inuse: next()?,
            stack_sys: next()?,
            mspan_inuse: next()?,
            mspan_sys: next()?,
            mcache_inuse: next()?,
            mcache_sys: next()?,
            buck_hash_sys: next()?,
            gc_sys: next()?,
            other_sys: next()?,
            next_gc: next()?,
            last_gc: next()?,
            pause_total_ns: next()?,
            num_gc: 0,
        };
        // Per-cycle pause ring; only the total above is kept.
        self.skip_uvarints(PAUSE_HISTORY_LEN)?;
        let num_gc = self.reader.read_uvarint()?;
        self.stats = Some(RuntimeStats { num_gc, ..stats });
        Ok(())
    }

    fn skip_goroutine(&mut self) -> Result<(), LoaderError> {
        // addr, sp, goid, gopc, status, is_system, is_background, wait_since
        self.skip_uvarints(8)?;
        let _wait_reason = self.reader.read_bytes()?;
        // ctxt, m, defer, panic
        self.skip_uvarints(4)
    }

    fn skip_mem_prof(&mut self) -> Result<(), LoaderError> {
        // bucket id, size
        self.skip_uvarints(2)?;
        let frames = self.reader.read_uvarint()?;
        for _ in 0..frames {
            let _function = self.reader.read_bytes()?;
            let _file = self.reader.read_bytes()?;
            let _line = self.reader.read_uvarint()?;
        }
        // allocs, frees
        self.skip_uvarints(2)
    }

    fn skip_uvarints(&mut self, count: usize) -> Result<(), LoaderError> {
        for _ in 0..count {
            self.reader.read_uvarint()?;
        }
        Ok(())
    }

    /// Reads a (kind, offset) field list terminated by an end-of-list kind.
    fn read_field_list(&mut self) -> Result<Vec<Field>, LoaderError> {
        let mut fields = Vec::new();
        loop {
            let kind = match self.reader.read_uvarint()? {
                FIELD_EOL => return Ok(fields),
                FIELD_PTR => FieldKind::Ptr,
                FIELD_STRING => FieldKind::String,
                FIELD_SLICE => FieldKind::Slice,
                FIELD_IFACE => FieldKind::Iface,
                FIELD_EFACE => FieldKind::Eface,
                other => {
                    return Err(LoaderError::Malformed(format!(
                        "unknown field kind {}",
                        other
                    )));
                }
            };
            let offset = self.reader.read_uvarint()?;
            fields.push(Field { kind, offset });
        }
    }

    /// Resolves types, extracts children and segment roots, and assembles
    /// the snapshot.
    fn finish(self) -> Result<(HeapSnapshot, StringInterner), LoaderError> {
        let Self {
            interner,
            params,
            stats,
            types,
            raw_objects,
            root_sources,
            mut roots,
            ..
        } = self;

        let params = params.ok_or(LoaderError::MissingParams)?;
        let stats = stats.ok_or(LoaderError::MissingStats)?;

        let objects: Vec<Object> = raw_objects
            .into_iter()
            .map(|raw| build_object(raw, &types, &params))
            .collect();

        for source in &root_sources {
            for offset in pointer_offsets(
                &source.fields,
                ObjectKind::Regular,
                0,
                source.content.len(),
                params.ptr_size,
            ) {
                if let Some(target) = read_pointer(&source.content, offset, &params) {
                    if target != 0 && params.in_heap(target) {
                        roots.push(Root {
                            kind: source.kind,
                            address: target,
                            description_hash: source.description_hash,
                        });
                    }
                }
            }
        }

        debug!(
            "Decoded {} objects, {} types, {} roots",
            objects.len(),
            types.len(),
            roots.len()
        );

        Ok((
            HeapSnapshot {
                params,
                stats,
                objects,
                roots,
            },
            interner,
        ))
    }
}

/// Resolves one raw object against the type table and extracts children.
fn build_object(raw: RawObject, types: &HashMap<u64, TypeInfo>, params: &DumpParams) -> Object {
    let type_info = types.get(&raw.type_addr);
    let (name_hash, type_size, pattern) = match type_info {
        Some(t) => (t.name_hash, t.size, t.fields.as_slice()),
        None => (0, 0, &[][..]),
    };

    let offsets = if raw.kind == ObjectKind::Conservative {
        // No layout information; every aligned word may be a pointer.
        conservative_offsets(raw.content.len(), params.ptr_size)
    } else {
        pointer_offsets(
            pattern,
            raw.kind,
            type_size,
            raw.content.len(),
            params.ptr_size,
        )
    };

    let mut children = Vec::new();
    for offset in &offsets {
        if let Some(target) = read_pointer(&raw.content, *offset, params) {
            if target != 0 && params.in_heap(target) && !children.contains(&target) {
                children.push(target);
            }
        }
    }

    // Expanded layout: one entry per pointer slot, repetitions included,
    // so the detail view shows the real offsets for array elements too.
    let fields = expand_fields(pattern, raw.kind, type_size, raw.content.len());

    Object {
        address: raw.address,
        name_hash,
        kind: raw.kind,
        size: raw.content.len() as u64,
        content: ByteView::new(raw.content),
        fields,
        children,
    }
}

/// Field entries with array/channel repetition applied.
fn expand_fields(
    pattern: &[Field],
    kind: ObjectKind,
    type_size: u64,
    content_len: usize,
) -> Vec<Field> {
    if pattern.is_empty() {
        return Vec::new();
    }
    match kind {
        ObjectKind::Array | ObjectKind::Channel if type_size > 0 => {
            let mut fields = Vec::new();
            let mut base = 0u64;
            while base + type_size <= content_len as u64 {
                for f in pattern {
                    fields.push(Field {
                        kind: f.kind,
                        offset: base + f.offset,
                    });
                }
                base += type_size;
            }
            fields
        }
        _ => pattern.to_vec(),
    }
}

/// Byte offsets at which a pointer word may live, given the field layout.
///
/// For interface values the data word (second pointer) is the heap
/// reference; the first word is a type/itab descriptor outside the heap.
fn pointer_offsets(
    pattern: &[Field],
    kind: ObjectKind,
    type_size: u64,
    content_len: usize,
    ptr_size: u64,
) -> Vec<u64> {
    expand_fields(pattern, kind, type_size, content_len)
        .iter()
        .map(|f| match f.kind {
            FieldKind::Ptr | FieldKind::String | FieldKind::Slice => f.offset,
            FieldKind::Iface | FieldKind::Eface => f.offset + ptr_size,
        })
        .collect()
}

/// Every aligned word offset; used for conservatively scanned objects.
fn conservative_offsets(content_len: usize, ptr_size: u64) -> Vec<u64> {
    if ptr_size == 0 {
        return Vec::new();
    }
    (0..content_len as u64)
        .step_by(ptr_size as usize)
        .filter(|offset| offset + ptr_size <= content_len as u64)
        .collect()
}

/// Reads one pointer-size word out of raw content. `None` when the word
/// would run past the end of the content.
fn read_pointer(content: &[u8], offset: u64, params: &DumpParams) -> Option<u64> {
    let start = usize::try_from(offset).ok()?;
    let end = start.checked_add(params.ptr_size as usize)?;
    let bytes = content.get(start..end)?;
    let mut value: u64 = 0;
    if params.big_endian {
        for b in bytes {
            value = (value << 8) | u64::from(*b);
        }
    } else {
        for b in bytes.iter().rev() {
            value = (value << 8) | u64::from(*b);
        }
    }
    Some(value)
}
