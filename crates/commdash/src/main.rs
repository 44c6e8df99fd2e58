mod cli;
mod commands;
mod error;
mod output;

use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

use commdash_config::{Config, Defaults};

use crate::cli::{Cli, ColorMode, Command, GlobalOpts, OutputFormat};
use crate::error::{CliError, exit_code};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_tracing(cli.global.verbose);

    // Dispatch and handle errors with proper exit codes
    let code = match run(cli).await {
        Ok(()) => exit_code::SUCCESS,
        Err(err) => {
            let code = err.exit_code();
            eprintln!("{:?}", miette::Report::new(err));
            code
        }
    };
    if code != exit_code::SUCCESS {
        std::process::exit(code);
    }
}

fn init_tracing(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(mut cli: Cli) -> Result<(), CliError> {
    match cli.command {
        // Config commands handle a broken config file themselves
        Command::Config(args) => {
            let path = commands::config_cmd::resolve_path(&cli.global);
            let defaults = commdash_config::load_config_from(&path)
                .map(|config| config.defaults)
                .unwrap_or_default();
            if let Err(err) = apply_defaults(&mut cli.global, &defaults) {
                tracing::warn!(error = %err, "ignoring configured output defaults");
            }
            commands::config_cmd::handle(args, &cli.global)
        }

        Command::Completions(args) => {
            use clap::CommandFactory;
            use clap_complete::generate;

            let mut cmd = Cli::command();
            generate(args.shell, &mut cmd, "commdash", &mut std::io::stdout());
            Ok(())
        }

        cmd => {
            let config = load_config(&cli.global)?;
            apply_defaults(&mut cli.global, &config.defaults)?;
            tracing::debug!(command = ?cmd, "dispatching command");
            commands::dispatch(cmd, &config, &cli.global).await
        }
    }
}

/// Load the config from `--config` or the platform path, then validate it.
fn load_config(global: &GlobalOpts) -> Result<Config, CliError> {
    let path = commands::config_cmd::resolve_path(global);
    let config = commdash_config::load_config_from(&path)?;
    config.validate()?;
    Ok(config)
}

/// Fill `--output` and `--color` from the config when neither the flag nor
/// its environment variable set them.
fn apply_defaults(global: &mut GlobalOpts, defaults: &Defaults) -> Result<(), CliError> {
    if global.output.is_none() {
        global.output = Some(parse_default::<OutputFormat>("defaults.output", &defaults.output)?);
    }
    if global.color.is_none() {
        global.color = Some(parse_default::<ColorMode>("defaults.color", &defaults.color)?);
    }
    Ok(())
}

fn parse_default<T: ValueEnum>(field: &str, value: &str) -> Result<T, CliError> {
    T::from_str(value, true).map_err(|reason| CliError::Validation {
        field: field.into(),
        reason,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).unwrap()
    }

    fn defaults(output: &str, color: &str) -> Defaults {
        Defaults {
            output: output.into(),
            color: color.into(),
        }
    }

    #[test]
    fn config_defaults_fill_unset_flags() {
        let mut cli = parse(&["commdash", "format", "number", "5"]);
        apply_defaults(&mut cli.global, &defaults("json", "never")).unwrap();
        assert_eq!(cli.global.output(), OutputFormat::Json);
        assert_eq!(cli.global.color(), ColorMode::Never);
    }

    #[test]
    fn flags_beat_config_defaults() {
        let mut cli = parse(&["commdash", "-o", "plain", "--color", "always", "format", "number", "5"]);
        apply_defaults(&mut cli.global, &defaults("json", "never")).unwrap();
        assert_eq!(cli.global.output(), OutputFormat::Plain);
        assert_eq!(cli.global.color(), ColorMode::Always);
    }

    #[test]
    fn unknown_config_default_names_the_field() {
        let mut cli = parse(&["commdash", "format", "number", "5"]);
        let err = apply_defaults(&mut cli.global, &defaults("xml", "auto")).unwrap_err();
        assert!(matches!(err, CliError::Validation { ref field, .. } if field == "defaults.output"));
    }
}
