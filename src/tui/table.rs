//! Generic table widget state: sorting, filtering, selection tracking.
//!
//! The snapshot never changes while the viewer runs, so unlike a live
//! monitor there is no diff/highlight machinery here; rows are set once
//! and only reordered or filtered afterwards.

/// Sort key types for table columns.
#[derive(Debug, Clone, PartialEq)]
pub enum SortKey {
    Integer(u64),
    String(String),
}

impl PartialOrd for SortKey {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        match (self, other) {
            (SortKey::Integer(a), SortKey::Integer(b)) => a.partial_cmp(b),
            (SortKey::String(a), SortKey::String(b)) => a.partial_cmp(b),
            _ => None,
        }
    }
}

/// Trait for table row items.
pub trait TableRow: Clone {
    /// Unique identifier for selection tracking.
    fn id(&self) -> u64;

    /// Number of columns.
    fn column_count() -> usize;

    /// Column headers.
    fn headers() -> Vec<&'static str>;

    /// Cell values as strings.
    fn cells(&self) -> Vec<String>;

    /// Sort key for the specified column.
    fn sort_key(&self, column: usize) -> SortKey;

    /// Check if item matches the filter.
    fn matches_filter(&self, filter: &str) -> bool;
}

/// State for a table widget.
#[derive(Debug, Clone)]
pub struct TableState<T: TableRow> {
    /// All items (unfiltered).
    pub items: Vec<T>,
    /// Selected row index (in filtered view).
    pub selected: usize,
    /// Sort column index.
    pub sort_column: usize,
    /// Sort direction (true = ascending).
    pub sort_ascending: bool,
    /// Filter string.
    pub filter: Option<String>,
    /// Scroll offset for large tables.
    pub scroll_offset: usize,
    /// Tracked row ID — keeps the same row selected across sort/filter changes.
    pub tracked_id: Option<u64>,
}

impl<T: TableRow> Default for TableState<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: TableRow> TableState<T> {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            selected: 0,
            sort_column: 0,
            sort_ascending: true, // Default ascending (lowest address first)
            filter: None,
            scroll_offset: 0,
            tracked_id: None,
        }
    }

    /// Sets the rows. Called once per table after the snapshot is loaded.
    pub fn set_items(&mut self, items: Vec<T>) {
        self.items = items;
        self.apply_sort();
        let filtered_len = self.filtered_items().len();
        if self.selected >= filtered_len && filtered_len > 0 {
            self.selected = filtered_len - 1;
        }
    }

    /// Returns filtered and sorted items.
    pub fn filtered_items(&self) -> Vec<&T> {
        self.items
            .iter()
            .filter(|item| {
                self.filter
                    .as_ref()
                    .map(|f| item.matches_filter(f))
                    .unwrap_or(true)
            })
            .collect()
    }

    /// Returns the currently selected item, if any row is visible.
    pub fn selected_item(&self) -> Option<&T> {
        self.filtered_items().get(self.selected).copied()
    }

    /// Applies current sort to items.
    fn apply_sort(&mut self) {
        let col = self.sort_column;
        let asc = self.sort_ascending;

        self.items.sort_by(|a, b| {
            let key_a = a.sort_key(col);
            let key_b = b.sort_key(col);
            let cmp = key_a
                .partial_cmp(&key_b)
                .unwrap_or(std::cmp::Ordering::Equal);
            if asc { cmp } else { cmp.reverse() }
        });
    }

    /// Cycles to next sort column.
    pub fn next_sort_column(&mut self) {
        self.sort_column = (self.sort_column + 1) % T::column_count();
        self.apply_sort();
        self.resolve_selection();
    }

    /// Toggles sort direction.
    pub fn toggle_sort_direction(&mut self) {
        self.sort_ascending = !self.sort_ascending;
        self.apply_sort();
        self.resolve_selection();
    }

    /// Sets filter string.
    pub fn set_filter(&mut self, filter: Option<String>) {
        self.filter = filter;
        self.selected = 0;
        self.scroll_offset = 0;
    }

    /// Moves selection up.
    pub fn select_up(&mut self) {
        if self.selected > 0 {
            self.selected -= 1;
            self.tracked_id = None;
        }
    }

    /// Moves selection down.
    pub fn select_down(&mut self) {
        let max = self.filtered_items().len().saturating_sub(1);
        if self.selected < max {
            self.selected += 1;
            self.tracked_id = None;
        }
    }

    /// Moves selection up by a page.
    pub fn page_up(&mut self, page_size: usize) {
        self.selected = self.selected.saturating_sub(page_size);
        self.tracked_id = None;
    }

    /// Moves selection down by a page.
    pub fn page_down(&mut self, page_size: usize) {
        let max = self.filtered_items().len().saturating_sub(1);
        self.selected = (self.selected + page_size).min(max);
        self.tracked_id = None;
    }

    /// Re-finds the tracked row after a sort change.
    ///
    /// If the tracked row is still visible, `selected` follows it to its
    /// new index; otherwise the selection is clamped. Always re-records
    /// `tracked_id` from the resulting row.
    pub fn resolve_selection(&mut self) {
        let ids: Vec<u64> = self.filtered_items().iter().map(|item| item.id()).collect();
        let len = ids.len();
        if len == 0 {
            self.selected = 0;
            self.tracked_id = None;
            return;
        }

        if let Some(tid) = self.tracked_id {
            if let Some(pos) = ids.iter().position(|&id| id == tid) {
                self.selected = pos;
            } else {
                self.tracked_id = None;
                if self.selected >= len {
                    self.selected = len - 1;
                }
            }
        } else if self.selected >= len {
            self.selected = len - 1;
        }

        if let Some(&id) = ids.get(self.selected) {
            self.tracked_id = Some(id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Debug)]
    struct Row {
        id: u64,
        name: String,
    }

    impl TableRow for Row {
        fn id(&self) -> u64 {
            self.id
        }
        fn column_count() -> usize {
            2
        }
        fn headers() -> Vec<&'static str> {
            vec!["ID", "NAME"]
        }
        fn cells(&self) -> Vec<String> {
            vec![self.id.to_string(), self.name.clone()]
        }
        fn sort_key(&self, column: usize) -> SortKey {
            match column {
                0 => SortKey::Integer(self.id),
                _ => SortKey::String(self.name.clone()),
            }
        }
        fn matches_filter(&self, filter: &str) -> bool {
            self.name.contains(filter)
        }
    }

    fn rows() -> Vec<Row> {
        vec![
            Row { id: 3, name: "gamma".into() },
            Row { id: 1, name: "alpha".into() },
            Row { id: 2, name: "beta".into() },
        ]
    }

    #[test]
    fn test_set_items_sorts_ascending() {
        let mut table: TableState<Row> = TableState::new();
        table.set_items(rows());
        let ids: Vec<u64> = table.filtered_items().iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn test_sort_direction_and_column() {
        let mut table: TableState<Row> = TableState::new();
        table.set_items(rows());
        table.toggle_sort_direction();
        let ids: Vec<u64> = table.filtered_items().iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![3, 2, 1]);

        table.toggle_sort_direction();
        table.next_sort_column();
        let names: Vec<String> = table
            .filtered_items()
            .iter()
            .map(|r| r.name.clone())
            .collect();
        assert_eq!(names, vec!["alpha", "beta", "gamma"]);
    }

    #[test]
    fn test_filter() {
        let mut table: TableState<Row> = TableState::new();
        table.set_items(rows());
        table.set_filter(Some("a".to_string()));
        // "gamma", "alpha", "beta" all contain 'a'
        assert_eq!(table.filtered_items().len(), 3);
        table.set_filter(Some("alp".to_string()));
        assert_eq!(table.filtered_items().len(), 1);
        table.set_filter(None);
        assert_eq!(table.filtered_items().len(), 3);
    }

    #[test]
    fn test_selection_bounds() {
        let mut table: TableState<Row> = TableState::new();
        table.set_items(rows());
        table.select_up();
        assert_eq!(table.selected, 0);
        table.select_down();
        table.select_down();
        table.select_down();
        assert_eq!(table.selected, 2);
        table.page_up(10);
        assert_eq!(table.selected, 0);
        table.page_down(10);
        assert_eq!(table.selected, 2);
    }

    #[test]
    fn test_tracked_selection_follows_sort() {
        let mut table: TableState<Row> = TableState::new();
        table.set_items(rows());
        table.selected = 0; // id 1 under ascending sort
        table.resolve_selection();
        assert_eq!(table.tracked_id, Some(1));

        table.toggle_sort_direction();
        // id 1 is now last
        assert_eq!(table.selected, 2);
        assert_eq!(table.selected_item().unwrap().id, 1);
    }
}
