//! Output formatting: table, JSON, YAML, plain.
//!
//! Renders data in the format selected by `--output`. Table uses `tabled`,
//! structured formats use serde, plain emits bare values one per line.

use std::io::{self, IsTerminal, Write};

use owo_colors::OwoColorize;
use tabled::builder::Builder;
use tabled::settings::Style;

use commdash_core::{NotificationKind, SortIndicator};

use crate::cli::{ColorMode, OutputFormat};
use crate::error::CliError;

// ── Color helpers ────────────────────────────────────────────────────

/// Determine whether color output should be enabled.
pub fn should_color(mode: ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => io::stdout().is_terminal() && std::env::var("NO_COLOR").is_err(),
    }
}

/// Header label with its sort glyph; the active glyph is highlighted.
pub fn header_label(label: &str, indicator: SortIndicator, color: bool) -> String {
    let glyph = indicator.glyph();
    match (indicator, color) {
        (SortIndicator::Neutral, true) => format!("{label} {}", glyph.dimmed()),
        (_, true) => format!("{label} {}", glyph.cyan().bold()),
        (_, false) => format!("{label} {glyph}"),
    }
}

/// Icon and message tinted by notification kind.
pub fn kind_badge(kind: NotificationKind, color: bool) -> String {
    let icon = kind.icon();
    if !color {
        return format!("{icon} {kind}");
    }
    match kind {
        NotificationKind::Success => format!("{} {}", icon.green(), kind.green()),
        NotificationKind::Error => format!("{} {}", icon.red(), kind.red()),
        NotificationKind::Warning => format!("{} {}", icon.yellow(), kind.yellow()),
        NotificationKind::Info => format!("{} {}", icon.blue(), kind.blue()),
    }
}

// ── Render dispatchers ───────────────────────────────────────────────

/// Render a serde-serializable value in the chosen format.
///
/// - `table`: `table_fn` builds the human view
/// - `json` / `json-compact` / `yaml`: serializes `data` via serde
/// - `plain`: `plain_fn` returns the bare value(s) for scripting
pub fn render<T>(
    format: OutputFormat,
    data: &T,
    table_fn: impl FnOnce(&T) -> String,
    plain_fn: impl FnOnce(&T) -> String,
) -> Result<String, CliError>
where
    T: serde::Serialize + ?Sized,
{
    match format {
        OutputFormat::Table => Ok(table_fn(data)),
        OutputFormat::Json => render_json(data, false),
        OutputFormat::JsonCompact => render_json(data, true),
        OutputFormat::Yaml => render_yaml(data),
        OutputFormat::Plain => Ok(plain_fn(data)),
    }
}

/// Print the rendered output to stdout, respecting quiet mode.
pub fn print_output(output: &str, quiet: bool) {
    if quiet || output.is_empty() {
        return;
    }
    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{output}");
}

// ── Format-specific renderers ────────────────────────────────────────

/// Rounded table from a header row and string rows.
pub fn render_grid<I, R>(headers: Vec<String>, rows: I) -> String
where
    I: IntoIterator<Item = R>,
    R: IntoIterator<Item = String>,
{
    let mut builder = Builder::default();
    builder.push_record(headers);
    for row in rows {
        builder.push_record(row);
    }
    builder.build().with(Style::rounded()).to_string()
}

/// Two-column key/value detail table.
pub fn render_detail(pairs: &[(&str, String)]) -> String {
    render_grid(
        vec!["Field".into(), "Value".into()],
        pairs
            .iter()
            .map(|(k, v)| vec![(*k).to_owned(), v.clone()]),
    )
}

fn render_json<T: serde::Serialize + ?Sized>(data: &T, compact: bool) -> Result<String, CliError> {
    let out = if compact {
        serde_json::to_string(data)
    } else {
        serde_json::to_string_pretty(data)
    };
    out.map_err(|e| CliError::Render(e.to_string()))
}

fn render_yaml<T: serde::Serialize + ?Sized>(data: &T) -> Result<String, CliError> {
    serde_yaml::to_string(data).map_err(|e| CliError::Render(e.to_string()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[derive(serde::Serialize)]
    struct Figure {
        label: &'static str,
        value: String,
    }

    fn figure() -> Figure {
        Figure {
            label: "gross",
            value: "R\u{a0}1\u{a0}234,56".into(),
        }
    }

    #[test]
    fn structured_formats_serialize_the_data() {
        let data = figure();
        let compact = render(OutputFormat::JsonCompact, &data, |_| String::new(), |_| String::new())
            .unwrap();
        assert_eq!(compact, "{\"label\":\"gross\",\"value\":\"R\u{a0}1\u{a0}234,56\"}");

        let yaml = render(OutputFormat::Yaml, &data, |_| String::new(), |_| String::new()).unwrap();
        assert!(yaml.contains("label: gross"));
    }

    #[test]
    fn plain_uses_the_bare_value() {
        let data = figure();
        let plain = render(OutputFormat::Plain, &data, |_| String::new(), |f| f.value.clone())
            .unwrap();
        assert_eq!(plain, "R\u{a0}1\u{a0}234,56");
    }

    #[test]
    fn grid_has_headers_and_rows() {
        let grid = render_grid(
            vec!["Agent".into(), "Gross".into()],
            vec![vec!["Alice".to_owned(), "R 10".to_owned()]],
        );
        insta::assert_snapshot!(grid, @r"
        ╭───────┬───────╮
        │ Agent │ Gross │
        ├───────┼───────┤
        │ Alice │ R 10  │
        ╰───────┴───────╯
        ");
    }

    #[test]
    fn header_labels_without_color() {
        assert_eq!(header_label("Gross", SortIndicator::Ascending, false), "Gross ▲");
        assert_eq!(header_label("Gross", SortIndicator::Neutral, false), "Gross ↕");
        assert_eq!(kind_badge(NotificationKind::Warning, false), "! warning");
    }
}
