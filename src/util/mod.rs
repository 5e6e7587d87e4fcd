//! Utility modules for heaplot.

mod addr_parser;
mod fmt;

pub use addr_parser::{AddrParseError, parse_addr};
pub use fmt::{format_count, format_ns_timestamp, format_size};
