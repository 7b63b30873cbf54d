use std::process::ExitCode;

use itinerary_core::NotFoundError;
use itinerary_core::public::PublicView;
use serde::Serialize;
use tracing::debug;

use crate::cli::PublicArgs;
use crate::error::{CliResult, EXIT_INPUT_ERROR, EXIT_SUCCESS, OutputFormat};
use crate::shared::{load_public_store, parse_tz_or_input_error, print_json};

#[derive(Debug, Serialize)]
struct Unavailable<'a> {
    reason: &'static str,
    title: &'static str,
    message: &'static str,
    token: &'a str,
}

pub fn run_public(args: PublicArgs, output_format: OutputFormat) -> CliResult<ExitCode> {
    let tz = parse_tz_or_input_error(&args.tz)?;
    let store = load_public_store(&args.store)?;

    match PublicView::load(&store, &args.token, tz) {
        Ok(view) => {
            match output_format {
                OutputFormat::Json => print_json(&view)?,
                OutputFormat::Text => print_view(&view),
            }
            Ok(ExitCode::from(EXIT_SUCCESS))
        }
        Err(err) => {
            debug!(token = %args.token, error = %err, "public copy unavailable");
            let screen = Unavailable {
                reason: reason(&err),
                title: err.title(),
                message: err.message(),
                token: &args.token,
            };
            match output_format {
                OutputFormat::Json => print_json(&screen)?,
                OutputFormat::Text => {
                    println!("{}", screen.title);
                    println!();
                    println!("{}", screen.message);
                }
            }
            Ok(ExitCode::from(EXIT_INPUT_ERROR))
        }
    }
}

fn reason(err: &NotFoundError) -> &'static str {
    match err {
        NotFoundError::TokenNotFound(_) => "token_not_found",
        NotFoundError::SnapshotNotFound(_) => "snapshot_not_found",
        NotFoundError::Revoked(_) => "revoked",
    }
}

fn print_view(view: &PublicView) {
    println!("{}", view.name);
    if let Some(range) = &view.date_range {
        println!("{}", range);
    }
    if !view.notes.is_empty() {
        println!("{}", view.notes);
    }
    println!("Shared {}", view.shared_at);

    for day in &view.days {
        println!();
        println!("{}", day.title);
        for stop in &day.stops {
            let done = if stop.completed { " (done)" } else { "" };
            println!("  {:<15}  {}{}", stop.time_label, stop.name, done);
            if !stop.address.is_empty() {
                println!("  {:<15}  {}", "", stop.address);
            }
        }
    }
}
