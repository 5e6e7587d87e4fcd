//! Table row for the object listings.

use crate::model::Object;
use crate::query::SnapshotQuery;
use crate::tui::table::{SortKey, TableRow};

/// Placeholder shown for objects the dump carried no type record for.
pub const UNKNOWN_TYPE: &str = "<unknown>";

/// One row in the Objects/Garbage tables.
///
/// Type names are resolved from the interner once at row construction so
/// sorting and filtering work on plain strings.
#[derive(Clone, Debug)]
pub struct ObjectRow {
    pub address: u64,
    pub kind: &'static str,
    pub size: u64,
    pub type_name: String,
    pub children: usize,
    pub reachable: bool,
}

impl ObjectRow {
    pub fn from_object(object: &Object, query: &SnapshotQuery) -> Self {
        let type_name = query
            .resolve(object.name_hash)
            .unwrap_or(UNKNOWN_TYPE)
            .to_string();
        Self {
            address: object.address,
            kind: object.kind.label(),
            size: object.size,
            type_name,
            children: object.children.len(),
            reachable: query.is_reachable(object.address),
        }
    }
}

impl TableRow for ObjectRow {
    fn id(&self) -> u64 {
        self.address
    }

    fn column_count() -> usize {
        5
    }

    fn headers() -> Vec<&'static str> {
        vec!["ADDRESS", "KIND", "SIZE", "REFS", "TYPE"]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            format!("{:#x}", self.address),
            self.kind.to_string(),
            self.size.to_string(),
            self.children.to_string(),
            self.type_name.clone(),
        ]
    }

    fn sort_key(&self, column: usize) -> SortKey {
        match column {
            0 => SortKey::Integer(self.address),
            1 => SortKey::String(self.kind.to_string()),
            2 => SortKey::Integer(self.size),
            3 => SortKey::Integer(self.children as u64),
            _ => SortKey::String(self.type_name.clone()),
        }
    }

    fn matches_filter(&self, filter: &str) -> bool {
        let needle = filter.to_lowercase();
        self.type_name.to_lowercase().contains(&needle)
            || format!("{:#x}", self.address).contains(&needle)
            || self.kind.contains(&needle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(address: u64, type_name: &str) -> ObjectRow {
        ObjectRow {
            address,
            kind: "obj",
            size: 32,
            type_name: type_name.to_string(),
            children: 1,
            reachable: true,
        }
    }

    #[test]
    fn test_cells_format_address_hex() {
        let cells = row(0x1000, "main.T").cells();
        assert_eq!(cells[0], "0x1000");
        assert_eq!(cells[4], "main.T");
    }

    #[test]
    fn test_filter_matches_type_and_address() {
        let r = row(0xc0ffee, "main.Server");
        assert!(r.matches_filter("server"));
        assert!(r.matches_filter("c0ffee"));
        assert!(r.matches_filter("0xc0ff"));
        assert!(!r.matches_filter("client"));
    }
}
