//! Table subcommand handlers: load a table file, apply sort and filter,
//! then show it or export it to CSV.

use std::io::ErrorKind;
use std::path::Path;

use serde::Serialize;
use tracing::info;

use commdash_config::Config;
use commdash_core::table::TableData;
use commdash_core::{
    CoreError, CsvExport, DataType, ExportScope, Header, Row, SortDirection, Table, TableId,
    TableRegistry,
};

use crate::cli::{ExportScopeArg, GlobalOpts, SortType, TableArgs, TableCommand, TableViewArgs};
use crate::error::CliError;
use crate::output;

impl From<SortType> for DataType {
    fn from(value: SortType) -> Self {
        match value {
            SortType::Text => Self::Text,
            SortType::Number => Self::Number,
            SortType::Currency => Self::Currency,
        }
    }
}

impl From<ExportScopeArg> for ExportScope {
    fn from(value: ExportScopeArg) -> Self {
        match value {
            ExportScopeArg::All => Self::All,
            ExportScopeArg::VisibleOnly => Self::VisibleOnly,
        }
    }
}

/// What `table show --output json` emits.
#[derive(Debug, Serialize)]
struct TableView<'a> {
    id: &'a TableId,
    headers: &'a [Header],
    rows: Vec<&'a Row>,
    visible: usize,
    total: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    sorted_by: Option<SortSummary>,
}

#[derive(Debug, Serialize)]
struct SortSummary {
    column: usize,
    direction: SortDirection,
}

pub fn handle(args: TableArgs, config: &Config, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        TableCommand::Show { file, view, all } => {
            let (registry, id) = load_and_apply(&file, &view, config)?;
            let table = registry.get(&id)?;
            show(table, all, global)
        }

        TableCommand::Export {
            file,
            view,
            filename,
            out,
            scope,
        } => {
            let (registry, id) = load_and_apply(&file, &view, config)?;
            let scope = scope.map_or_else(|| config.export_scope(), ExportScope::from);
            let name = filename.as_deref().unwrap_or_else(|| config.default_filename());
            let csv = registry.export_table(&id, Some(name), scope)?;

            match out {
                Some(dir) => {
                    let path = csv.save_in(&dir)?;
                    info!(path = %path.display(), %scope, "exported table");
                    let summary = ExportSummary::new(&csv, Some(path.display().to_string()));
                    let text = output::render(
                        global.output(),
                        &summary,
                        |s| s.path.clone().unwrap_or_default(),
                        |s| s.path.clone().unwrap_or_default(),
                    )?;
                    output::print_output(&text, global.quiet);
                }
                None => {
                    let summary = ExportSummary::new(&csv, None);
                    let text = output::render(
                        global.output(),
                        &summary,
                        |_| csv.content.clone(),
                        |_| csv.content.clone(),
                    )?;
                    output::print_output(&text, global.quiet);
                }
            }
            Ok(())
        }
    }
}

/// Export result for structured output.
#[derive(Debug, Serialize)]
struct ExportSummary<'a> {
    filename: &'a str,
    mime: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    path: Option<String>,
    content: &'a str,
}

impl<'a> ExportSummary<'a> {
    fn new(csv: &'a CsvExport, path: Option<String>) -> Self {
        Self {
            filename: &csv.filename,
            mime: csv.mime,
            path,
            content: &csv.content,
        }
    }
}

// ── Helpers ─────────────────────────────────────────────────────────

/// Read a table file into a one-table registry and apply `--sort` /
/// `--filter`.
fn load_and_apply(
    file: &Path,
    view: &TableViewArgs,
    config: &Config,
) -> Result<(TableRegistry, TableId), CliError> {
    let table = read_table(file)?;
    let id = table.id().clone();
    let mut registry = TableRegistry::new(config.direction_memory());
    registry.insert(table);

    if let Some(selector) = &view.sort {
        let column = resolve_column(registry.get(&id)?, selector)?;
        for _ in 0..view.times {
            registry.sort_table(&id, column, view.data_type.into())?;
        }
    }

    if let Some(term) = &view.filter {
        let column = resolve_column(registry.get(&id)?, &view.column)?;
        let visible = registry.filter_table(&id, term, column)?;
        info!(table = %id, term = %term, column, visible, "filtered table");
    }

    Ok((registry, id))
}

fn read_table(file: &Path) -> Result<Table, CliError> {
    let path = file.display().to_string();
    let text = std::fs::read_to_string(file).map_err(|e| match e.kind() {
        ErrorKind::NotFound => CliError::NotFound {
            resource_type: "table file".into(),
            identifier: path.clone(),
            hint: "Pass the path of a JSON table file.".into(),
        },
        _ => CliError::Io(e),
    })?;

    let data: TableData = serde_json::from_str(&text).map_err(|e| CliError::InvalidTable {
        path: path.clone(),
        reason: e.to_string(),
    })?;

    Table::try_from(data).map_err(|e| match e {
        err @ CoreError::RowArity { .. } => CliError::InvalidTable {
            path,
            reason: err.to_string(),
        },
        other => other.into(),
    })
}

/// A column given as a 0-based index or a header label (case-insensitive).
/// Indices are range-checked by the core.
fn resolve_column(table: &Table, selector: &str) -> Result<usize, CliError> {
    if let Ok(index) = selector.trim().parse::<usize>() {
        return Ok(index);
    }
    table
        .headers()
        .iter()
        .position(|h| h.label.eq_ignore_ascii_case(selector.trim()))
        .ok_or_else(|| CliError::NotFound {
            resource_type: "column".into(),
            identifier: selector.to_owned(),
            hint: format!(
                "Available columns: {}",
                table
                    .headers()
                    .iter()
                    .map(|h| h.label.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
        })
}

fn show(table: &Table, all: bool, global: &GlobalOpts) -> Result<(), CliError> {
    let rows: Vec<&Row> = if all {
        table.rows().iter().collect()
    } else {
        table.visible_rows().collect()
    };
    let view = TableView {
        id: table.id(),
        headers: table.headers(),
        visible: table.visible_rows().count(),
        total: table.row_count(),
        sorted_by: table
            .sort_state()
            .last()
            .map(|(column, direction)| SortSummary { column, direction }),
        rows,
    };

    let color = output::should_color(global.color());
    let text = output::render(
        global.output(),
        &view,
        |v| render_table(v, all, color),
        |v| {
            v.rows
                .iter()
                .map(|r| r.cells().join("\t"))
                .collect::<Vec<_>>()
                .join("\n")
        },
    )?;
    output::print_output(&text, global.quiet);
    Ok(())
}

fn render_table(view: &TableView<'_>, all: bool, color: bool) -> String {
    let mut headers: Vec<String> = view
        .headers
        .iter()
        .map(|h| output::header_label(&h.label, h.indicator, color))
        .collect();
    if all {
        headers.push("Shown".into());
    }

    let rows = view.rows.iter().map(|row| {
        let mut cells = row.cells().to_vec();
        if all {
            cells.push(if row.is_visible() { "yes" } else { "no" }.into());
        }
        cells
    });

    format!(
        "{}\n{} of {} rows shown",
        output::render_grid(headers, rows),
        view.visible,
        view.total
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn sample() -> Table {
        Table::new(
            "gross",
            vec!["Agent".into(), "Gross".into()],
            vec![
                vec!["bob".into(), "R 300,00".into()],
                vec!["Alice".into(), "R 1 200,00".into()],
            ],
        )
        .unwrap()
    }

    #[test]
    fn columns_resolve_by_index_or_label() {
        let table = sample();
        assert_eq!(resolve_column(&table, "1").unwrap(), 1);
        assert_eq!(resolve_column(&table, "gross").unwrap(), 1);
        assert_eq!(resolve_column(&table, " Agent ").unwrap(), 0);

        let err = resolve_column(&table, "Net").unwrap_err();
        assert_eq!(err.exit_code(), crate::error::exit_code::NOT_FOUND);
    }

    #[test]
    fn all_rows_view_marks_hidden_rows() {
        let mut table = sample();
        table.filter("ali", 0).unwrap();
        let view = TableView {
            id: table.id(),
            headers: table.headers(),
            rows: table.rows().iter().collect(),
            visible: 1,
            total: 2,
            sorted_by: None,
        };
        let text = render_table(&view, true, false);
        assert!(text.contains("Shown"));
        assert!(text.contains("no"));
        assert!(text.ends_with("1 of 2 rows shown"));
    }
}
