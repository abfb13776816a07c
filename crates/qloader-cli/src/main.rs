//! `qloader` CLI.

use std::io::{self, IsTerminal};

use clap::{ColorChoice, Parser};
use qloader_cli::commands::{run_aggregate, run_replay};
use qloader_cli::logging::{LogConfig, LogFormat, init_logging};
use qloader_cli::summary::{print_aggregate, print_replay};
use qloader_core::LoaderError;
use serde::Serialize;
use tracing::level_filters::LevelFilter;

mod cli;

use crate::cli::{Cli, Command, LogFormatArg, LogLevelArg, OutputFormatArg};

/// Exit code when the final aggregate is in the error state.
const AGGREGATE_ERROR_EXIT: i32 = 2;

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    let log_config = log_config_from_cli(&cli);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }
    let exit_code = match cli.command {
        Command::Aggregate(args) => match run_aggregate(&args.file) {
            Ok(report) => {
                let failed = report.is_error();
                match args.format {
                    OutputFormatArg::Table => {
                        print_aggregate(&report);
                        exit_code_for(failed)
                    }
                    OutputFormatArg::Json => print_json(&report, failed),
                }
            }
            Err(error) => report_error(&error),
        },
        Command::Replay(args) => match run_replay(&args.file) {
            Ok(frames) => {
                let failed = frames.last().is_some_and(|frame| frame.report.is_error());
                match args.format {
                    OutputFormatArg::Table => {
                        print_replay(&frames);
                        exit_code_for(failed)
                    }
                    OutputFormatArg::Json => print_json(&frames, failed),
                }
            }
            Err(error) => report_error(&error),
        },
    };
    std::process::exit(exit_code);
}

fn report_error(error: &anyhow::Error) -> i32 {
    eprintln!("error: {error:#}");
    if let Some(loader_error) = error.downcast_ref::<LoaderError>() {
        eprintln!("hint: {}", loader_error.user_message());
    }
    1
}

fn exit_code_for(failed: bool) -> i32 {
    if failed { AGGREGATE_ERROR_EXIT } else { 0 }
}

fn print_json<T: Serialize>(value: &T, failed: bool) -> i32 {
    match serde_json::to_string_pretty(value) {
        Ok(json) => {
            println!("{json}");
            exit_code_for(failed)
        }
        Err(error) => {
            eprintln!("error: failed to serialize output: {error}");
            1
        }
    }
}

/// Build logging configuration from CLI flags with consistent precedence.
fn log_config_from_cli(cli: &Cli) -> LogConfig {
    let mut config = LogConfig {
        level_filter: cli.verbosity.tracing_level_filter(),
        ..LogConfig::default()
    };
    config.use_env_filter = !(cli.verbosity.is_present() || cli.log_level.is_some());
    if let Some(level) = cli.log_level {
        config.level_filter = match level {
            LogLevelArg::Error => LevelFilter::ERROR,
            LogLevelArg::Warn => LevelFilter::WARN,
            LogLevelArg::Info => LevelFilter::INFO,
            LogLevelArg::Debug => LevelFilter::DEBUG,
            LogLevelArg::Trace => LevelFilter::TRACE,
        };
    }
    let format = match cli.log_format {
        LogFormatArg::Pretty => LogFormat::Pretty,
        LogFormatArg::Compact => LogFormat::Compact,
        LogFormatArg::Json => LogFormat::Json,
    };
    let with_ansi = match cli.color.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => cli.log_file.is_none() && io::stderr().is_terminal(),
    };
    config
        .with_format(format)
        .with_ansi(with_ansi)
        .with_log_file(cli.log_file.clone())
}
