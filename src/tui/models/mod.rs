//! Row models for the TUI tables.

mod object_row;

pub use object_row::{ObjectRow, UNKNOWN_TYPE};
