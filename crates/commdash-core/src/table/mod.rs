// ── In-memory dashboard tables ──
//
// A table is a header row plus an ordered body. Sorting permutes the body,
// filtering flips per-row visibility; neither ever drops a row.

mod filter;
mod registry;
mod sort;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

pub use filter::DEFAULT_FILTER_COLUMN;
pub use registry::TableRegistry;
pub use sort::{DataType, DirectionMemory, SortDirection, SortState, compare_text, parse_numeric};

/// Unique identifier of a table on the dashboard (e.g. `"gross-table"`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TableId(String);

impl TableId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TableId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl From<String> for TableId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Sort glyph shown next to a column header.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, strum::Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SortIndicator {
    #[default]
    Neutral,
    Ascending,
    Descending,
}

impl SortIndicator {
    /// Compact glyph for terminal output.
    pub fn glyph(self) -> &'static str {
        match self {
            Self::Neutral => "↕",
            Self::Ascending => "▲",
            Self::Descending => "▼",
        }
    }

    /// Icon class used by the web front end.
    pub fn icon_class(self) -> &'static str {
        match self {
            Self::Neutral => "fas fa-sort",
            Self::Ascending => "fas fa-sort-up",
            Self::Descending => "fas fa-sort-down",
        }
    }
}

/// A column header and its current sort glyph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    pub label: String,
    #[serde(default)]
    pub indicator: SortIndicator,
}

impl Header {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            indicator: SortIndicator::Neutral,
        }
    }
}

/// One body row. Cells are display strings; their data type is supplied by
/// the caller at sort time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Row {
    cells: Vec<String>,
    visible: bool,
}

impl Row {
    pub fn new(cells: Vec<String>) -> Self {
        Self {
            cells,
            visible: true,
        }
    }

    pub fn cells(&self) -> &[String] {
        &self.cells
    }

    pub fn cell(&self, column: usize) -> Option<&str> {
        self.cells.get(column).map(String::as_str)
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }
}

/// On-disk / wire shape of a table: `{ "id", "headers", "rows" }`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableData {
    pub id: String,
    pub headers: Vec<String>,
    #[serde(default)]
    pub rows: Vec<Vec<String>>,
}

/// A dashboard table with its sort memory.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "TableData", into = "TableData")]
pub struct Table {
    id: TableId,
    headers: Vec<Header>,
    rows: Vec<Row>,
    sort_state: SortState,
}

impl Table {
    /// Build a table, checking that every row has one cell per header.
    pub fn new(
        id: impl Into<TableId>,
        headers: Vec<String>,
        rows: Vec<Vec<String>>,
    ) -> Result<Self, CoreError> {
        let id = id.into();
        let expected = headers.len();
        if let Some((row, cells)) = rows.iter().enumerate().find(|(_, r)| r.len() != expected) {
            return Err(CoreError::RowArity {
                table: id.to_string(),
                row,
                expected,
                found: cells.len(),
            });
        }

        Ok(Self {
            id,
            headers: headers.into_iter().map(Header::new).collect(),
            rows: rows.into_iter().map(Row::new).collect(),
            sort_state: SortState::default(),
        })
    }

    /// Choose how sort direction is remembered (per table or per column).
    pub fn with_memory(mut self, memory: DirectionMemory) -> Self {
        self.sort_state = SortState::new(memory);
        self
    }

    pub fn id(&self) -> &TableId {
        &self.id
    }

    pub fn headers(&self) -> &[Header] {
        &self.headers
    }

    /// All rows in display order, hidden ones included.
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn visible_rows(&self) -> impl Iterator<Item = &Row> {
        self.rows.iter().filter(|r| r.visible)
    }

    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn sort_state(&self) -> &SortState {
        &self.sort_state
    }

    /// Text of one column across all rows, in display order.
    pub fn column(&self, column: usize) -> Vec<&str> {
        self.rows.iter().filter_map(|r| r.cell(column)).collect()
    }

    fn check_column(&self, column: usize) -> Result<(), CoreError> {
        if column < self.headers.len() {
            Ok(())
        } else {
            Err(CoreError::ColumnOutOfRange {
                table: self.id.to_string(),
                column,
                columns: self.headers.len(),
            })
        }
    }
}

impl TryFrom<TableData> for Table {
    type Error = CoreError;

    fn try_from(data: TableData) -> Result<Self, Self::Error> {
        Self::new(data.id, data.headers, data.rows)
    }
}

impl From<Table> for TableData {
    fn from(table: Table) -> Self {
        Self {
            id: table.id.0,
            headers: table.headers.into_iter().map(|h| h.label).collect(),
            rows: table.rows.into_iter().map(|r| r.cells).collect(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod tests {
    use super::*;

    /// Build a table from string literals.
    pub(crate) fn table(id: &str, headers: &[&str], rows: &[&[&str]]) -> Table {
        Table::new(
            id,
            headers.iter().map(|h| (*h).to_owned()).collect(),
            rows.iter()
                .map(|r| r.iter().map(|c| (*c).to_owned()).collect())
                .collect(),
        )
        .unwrap_or_else(|e| panic!("test table is malformed: {e}"))
    }

    #[test]
    fn new_rejects_ragged_rows() {
        let err = Table::new(
            "t",
            vec!["a".into(), "b".into()],
            vec![vec!["1".into(), "2".into()], vec!["3".into()]],
        )
        .unwrap_err();
        assert!(matches!(
            err,
            CoreError::RowArity {
                row: 1,
                expected: 2,
                found: 1,
                ..
            }
        ));
    }

    #[test]
    fn deserializes_from_table_data() {
        let json = r#"{"id":"net","headers":["Agent","Net"],"rows":[["Ann","R 10"]]}"#;
        let t: Table = serde_json::from_str(json).unwrap_or_else(|e| panic!("{e}"));
        assert_eq!(t.id().as_str(), "net");
        assert_eq!(t.column_count(), 2);
        assert_eq!(t.column(1), vec!["R 10"]);
        assert!(t.rows().iter().all(Row::is_visible));
    }

    #[test]
    fn deserialize_reports_arity_error() {
        let json = r#"{"id":"net","headers":["Agent","Net"],"rows":[["Ann"]]}"#;
        let err = serde_json::from_str::<Table>(json).unwrap_err();
        assert!(err.to_string().contains("expected 2"), "{err}");
    }

    #[test]
    fn column_out_of_range() {
        let t = table("t", &["a"], &[&["1"]]);
        assert!(t.check_column(0).is_ok());
        assert!(matches!(
            t.check_column(1),
            Err(CoreError::ColumnOutOfRange {
                column: 1,
                columns: 1,
                ..
            })
        ));
    }
}
