//! Format subcommand handlers.

use serde::Serialize;

use commdash_config::Config;
use commdash_core::format::DEFAULT_PERCENT_DECIMALS;
use commdash_core::{
    Locale, calculate_change, format_currency, format_number, format_percentage,
};

use crate::cli::{FormatArgs, FormatCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

/// One formatted figure, as emitted by `--output json`.
#[derive(Debug, Serialize)]
struct Formatted {
    kind: &'static str,
    locale: String,
    inputs: Vec<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    raw: Option<f64>,
    formatted: String,
}

pub fn handle(args: FormatArgs, config: &Config, global: &GlobalOpts) -> Result<(), CliError> {
    let locale = match args.locale {
        Some(tag) => Locale::from_tag(&tag).ok_or_else(|| CliError::Validation {
            field: "--locale".into(),
            reason: format!("expected en-ZA, en-US, or en-GB, got '{tag}'"),
        })?,
        None => config.locale()?,
    };

    let result = format_figure(&args.command, &locale);
    let out = output::render(
        global.output(),
        &result,
        |r| {
            output::render_detail(&[
                ("Kind", r.kind.to_owned()),
                ("Locale", r.locale.clone()),
                ("Value", r.formatted.clone()),
            ])
        },
        |r| r.formatted.clone(),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}

fn format_figure(command: &FormatCommand, locale: &Locale) -> Formatted {
    let (kind, inputs, raw, formatted) = match *command {
        FormatCommand::Currency { amount } => {
            ("currency", vec![amount], None, format_currency(amount, locale))
        }
        FormatCommand::Percent { value, decimals } => {
            ("percent", vec![value], None, format_percentage(value, decimals))
        }
        FormatCommand::Number { num } => ("number", vec![num], None, format_number(num, locale)),
        FormatCommand::Change { current, previous } => {
            let change = calculate_change(current, previous);
            (
                "change",
                vec![current, previous],
                Some(change),
                format_percentage(change, DEFAULT_PERCENT_DECIMALS),
            )
        }
    };

    Formatted {
        kind,
        locale: locale.tag.clone(),
        inputs,
        raw,
        formatted,
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn change_reports_raw_and_formatted() {
        let out = format_figure(
            &FormatCommand::Change {
                current: 150.0,
                previous: 100.0,
            },
            &Locale::en_za(),
        );
        assert_eq!(out.formatted, "50.0%");
        assert_eq!(out.raw, Some(50.0));
        assert_eq!(out.inputs, vec![150.0, 100.0]);
    }

    #[test]
    fn currency_uses_the_locale() {
        let out = format_figure(&FormatCommand::Currency { amount: 1234.56 }, &Locale::en_us());
        assert_eq!(out.formatted, "$1,234.56");
        assert_eq!(out.locale, "en-US");
    }
}
