use std::process::ExitCode;

use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;

mod classify_cmd;
mod cli;
mod consistency_cmd;
mod editor_cmd;
mod error;
mod pdf_cmd;
mod public_cmd;
mod schedule_cmd;
mod share_cmd;
mod shared;
mod validate_cmd;

use classify_cmd::run_classify;
use cli::{Cli, Commands};
use consistency_cmd::run_consistency;
use editor_cmd::run_editor;
use error::{CliResult, OutputFormat, output_format_hint, parse_output_format, render_error};
use pdf_cmd::run_pdf;
use public_cmd::run_public;
use schedule_cmd::run_schedule;
use share_cmd::run_share;
use validate_cmd::run_validate;

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Resolve `--output-format`, then run the command, rendering any error in
/// the requested format.
fn dispatch<A>(
    output_format: &str,
    args: A,
    run: fn(A, OutputFormat) -> CliResult<ExitCode>,
) -> ExitCode {
    let fallback = output_format_hint(output_format);
    let output_format = match parse_output_format(output_format) {
        Ok(format) => format,
        Err(err) => return render_error(&err, fallback),
    };

    match run(args, output_format) {
        Ok(code) => code,
        Err(err) => render_error(&err, output_format),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    debug!("Parsed CLI args: {:?}", cli);

    match cli.command {
        Commands::Schedule(args) => {
            let format = args.output_format.clone();
            dispatch(&format, args, run_schedule)
        }
        Commands::Classify(args) => {
            let format = args.output_format.clone();
            dispatch(&format, args, run_classify)
        }
        Commands::Validate(args) => {
            let format = args.output_format.clone();
            dispatch(&format, args, run_validate)
        }
        Commands::Editor(args) => {
            let format = args.output_format.clone();
            dispatch(&format, args, run_editor)
        }
        Commands::Share(args) => {
            let format = args.output_format.clone();
            dispatch(&format, args, run_share)
        }
        Commands::Public(args) => {
            let format = args.output_format.clone();
            dispatch(&format, args, run_public)
        }
        Commands::Pdf(args) => {
            let format = args.output_format.clone();
            dispatch(&format, args, run_pdf)
        }
        Commands::Consistency(args) => {
            let format = args.output_format.clone();
            dispatch(&format, args, run_consistency)
        }
    }
}
