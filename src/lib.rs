//! heaplot - Heap snapshot browser library.
//!
//! This library provides the functionality behind the `heaplot` viewer:
//! - `loader` - decodes a binary heap dump into the snapshot model
//! - `graph` / `query` - address-indexed object graph and its read facade
//! - `storage` - compact archive format for fast reopening of large dumps
//! - `tui` - interactive browser for the loaded snapshot

pub mod graph;
pub mod loader;
pub mod model;
pub mod query;
pub mod storage;
pub mod tui;
pub mod util;
