//! CSV serialization of a table's displayed cells.
//!
//! Every cell is quoted and inner quotes are doubled, so commas, quotes, and
//! newlines inside cells survive a standard CSV reader unchanged. The caller
//! decides what "download" means: write the bytes to disk, attach them to an
//! HTTP response, or hand them to a browser blob.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::CoreError;
use crate::table::Table;

/// MIME type of the produced artifact.
pub const CSV_MIME: &str = "text/csv;charset=utf-8";

/// File name used when the caller supplies none (or an empty one).
pub const DEFAULT_FILENAME: &str = "data.csv";

/// Which body rows an export includes.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum ExportScope {
    /// Every row, including those hidden by a filter.
    #[default]
    All,
    /// Only rows the current filter leaves visible.
    VisibleOnly,
}

/// A finished CSV artifact ready to be saved or served.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CsvExport {
    pub filename: String,
    pub mime: &'static str,
    pub content: String,
}

impl CsvExport {
    pub fn as_bytes(&self) -> &[u8] {
        self.content.as_bytes()
    }

    /// Write the CSV into `dir` under its own file name.
    pub fn save_in(&self, dir: &Path) -> Result<PathBuf, CoreError> {
        let path = dir.join(&self.filename);
        self.write_to(&path)?;
        Ok(path)
    }

    /// Write the CSV to an explicit path.
    pub fn write_to(&self, path: &Path) -> Result<(), CoreError> {
        std::fs::write(path, self.as_bytes()).map_err(|source| CoreError::Io {
            path: path.display().to_string(),
            source,
        })
    }
}

/// Quote one cell, doubling any inner quotes.
pub fn escape_cell(text: &str) -> String {
    format!("\"{}\"", text.replace('"', "\"\""))
}

/// Serialize the header row and the body rows of `table` in display order.
pub fn export_to_csv(table: &Table, filename: Option<&str>, scope: ExportScope) -> CsvExport {
    let header = table
        .headers()
        .iter()
        .map(|h| escape_cell(&h.label))
        .collect::<Vec<_>>()
        .join(",");

    let body = table
        .rows()
        .iter()
        .filter(|row| scope == ExportScope::All || row.is_visible())
        .map(|row| {
            row.cells()
                .iter()
                .map(|c| escape_cell(c))
                .collect::<Vec<_>>()
                .join(",")
        });

    let lines: Vec<String> = std::iter::once(header).chain(body).collect();
    let filename = filename
        .filter(|f| !f.is_empty())
        .unwrap_or(DEFAULT_FILENAME)
        .to_owned();

    debug!(
        table = %table.id(),
        filename = %filename,
        scope = %scope,
        lines = lines.len(),
        "exported table to CSV"
    );

    CsvExport {
        filename,
        mime: CSV_MIME,
        content: lines.join("\n"),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::table::DataType;
    use crate::table::tests::table;
    use pretty_assertions::assert_eq;

    fn tricky() -> Table {
        table(
            "notes",
            &["Agent", "Note, with comma"],
            &[
                &["Zed", "said \"hi\""],
                &["Amy", "line one\nline two"],
                &["Bo", ""],
            ],
        )
    }

    fn read_back(content: &str) -> Vec<Vec<String>> {
        csv::ReaderBuilder::new()
            .has_headers(false)
            .from_reader(content.as_bytes())
            .records()
            .map(|r| r.unwrap().iter().map(str::to_owned).collect())
            .collect()
    }

    #[test]
    fn escapes_quotes_by_doubling() {
        assert_eq!(escape_cell("say \"x\""), "\"say \"\"x\"\"\"");
        assert_eq!(escape_cell(""), "\"\"");
    }

    #[test]
    fn snapshot_of_simple_export() {
        let t = table(
            "gross",
            &["Agent", "Gross"],
            &[&["Ann", "R 10"], &["Ben \"B\"", "R 20"]],
        );
        let export = export_to_csv(&t, None, ExportScope::All);
        insta::assert_snapshot!(export.content, @r#"
        "Agent","Gross"
        "Ann","R 10"
        "Ben ""B""","R 20"
        "#);
    }

    #[test]
    fn round_trips_through_a_csv_reader() {
        let t = tricky();
        let export = export_to_csv(&t, Some("notes.csv"), ExportScope::All);
        let records = read_back(&export.content);

        let mut expected = vec![vec!["Agent".to_owned(), "Note, with comma".to_owned()]];
        expected.extend(t.rows().iter().map(|r| r.cells().to_vec()));
        assert_eq!(records, expected);
    }

    #[test]
    fn follows_display_order_after_sort() {
        let mut t = tricky();
        t.sort(0, DataType::Text).unwrap();
        let records = read_back(&export_to_csv(&t, None, ExportScope::All).content);
        let names: Vec<_> = records.iter().skip(1).map(|r| r[0].as_str()).collect();
        assert_eq!(names, vec!["Amy", "Bo", "Zed"]);
    }

    #[test]
    fn scope_controls_hidden_rows() {
        let mut t = tricky();
        t.filter("a", 0).unwrap();

        let all = read_back(&export_to_csv(&t, None, ExportScope::All).content);
        assert_eq!(all.len(), 4);

        let visible = read_back(&export_to_csv(&t, None, ExportScope::VisibleOnly).content);
        let names: Vec<_> = visible.iter().map(|r| r[0].as_str()).collect();
        assert_eq!(names, vec!["Agent", "Amy"]);
    }

    #[test]
    fn filename_defaults_and_mime() {
        let t = tricky();
        assert_eq!(export_to_csv(&t, None, ExportScope::All).filename, "data.csv");
        assert_eq!(export_to_csv(&t, Some(""), ExportScope::All).filename, "data.csv");
        let named = export_to_csv(&t, Some("q3.csv"), ExportScope::All);
        assert_eq!(named.filename, "q3.csv");
        assert_eq!(named.mime, "text/csv;charset=utf-8");
        assert!(!named.content.ends_with('\n'));
    }

    #[test]
    fn save_in_writes_the_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let export = export_to_csv(&tricky(), Some("out.csv"), ExportScope::All);
        let path = export.save_in(dir.path()).unwrap();
        assert_eq!(std::fs::read_to_string(path).unwrap(), export.content);
    }
}
