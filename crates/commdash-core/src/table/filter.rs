use tracing::debug;

use super::Table;
use crate::error::CoreError;

/// Column searched when the caller does not name one.
pub const DEFAULT_FILTER_COLUMN: usize = 0;

impl Table {
    /// Show rows whose `column` text contains `term` (case-insensitive) and
    /// hide the rest. An empty term shows every row. Returns the number of
    /// visible rows.
    pub fn filter(&mut self, term: &str, column: usize) -> Result<usize, CoreError> {
        self.check_column(column)?;
        let needle = term.to_lowercase();

        let mut visible = 0;
        for row in &mut self.rows {
            row.visible = row
                .cell(column)
                .is_some_and(|text| text.to_lowercase().contains(&needle));
            if row.visible {
                visible += 1;
            }
        }

        debug!(table = %self.id, column, term, visible, "filtered table");
        Ok(visible)
    }

    /// Make every row visible again.
    pub fn clear_filter(&mut self) {
        for row in &mut self.rows {
            row.visible = true;
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::table::{DataType, Row};
    use crate::table::tests::table;
    use pretty_assertions::assert_eq;

    fn deals() -> Table {
        table(
            "deals",
            &["Client", "Region"],
            &[
                &["Xyzzy Holdings", "Gauteng"],
                &["Acme", "Western Cape"],
                &["Big XYZ Corp", "Gauteng"],
                &["Other", "KZN"],
            ],
        )
    }

    fn visible_names(t: &Table) -> Vec<&str> {
        t.visible_rows().filter_map(|r| r.cell(0)).collect()
    }

    #[test]
    fn empty_term_shows_everything() {
        let mut t = deals();
        t.filter("acme", DEFAULT_FILTER_COLUMN).unwrap();
        assert_eq!(t.filter("", DEFAULT_FILTER_COLUMN).unwrap(), 4);
        assert!(t.rows().iter().all(Row::is_visible));
    }

    #[test]
    fn matches_case_insensitive_substring() {
        let mut t = deals();
        assert_eq!(t.filter("xyz", 0).unwrap(), 2);
        assert_eq!(visible_names(&t), vec!["Xyzzy Holdings", "Big XYZ Corp"]);
    }

    #[test]
    fn filters_on_the_requested_column() {
        let mut t = deals();
        assert_eq!(t.filter("GAUTENG", 1).unwrap(), 2);
        assert_eq!(visible_names(&t), vec!["Xyzzy Holdings", "Big XYZ Corp"]);
    }

    #[test]
    fn hidden_rows_are_kept() {
        let mut t = deals();
        t.filter("nothing matches", 0).unwrap();
        assert_eq!(t.visible_rows().count(), 0);
        assert_eq!(t.row_count(), 4);

        t.clear_filter();
        assert_eq!(t.visible_rows().count(), 4);
    }

    #[test]
    fn sort_keeps_visibility_with_the_row() {
        let mut t = deals();
        t.filter("xyz", 0).unwrap();
        t.sort(0, DataType::Text).unwrap();
        assert_eq!(visible_names(&t), vec!["Big XYZ Corp", "Xyzzy Holdings"]);
        assert_eq!(t.row_count(), 4);
    }

    #[test]
    fn filter_rejects_unknown_column() {
        let mut t = deals();
        assert!(matches!(
            t.filter("x", 2),
            Err(CoreError::ColumnOutOfRange { column: 2, .. })
        ));
    }
}
