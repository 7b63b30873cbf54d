use std::process::ExitCode;

use itinerary_core::public::share;
use tracing::debug;

use crate::cli::ShareArgs;
use crate::error::{CliError, CliResult, EXIT_SUCCESS, OutputFormat};
use crate::shared::{
    load_itinerary, load_or_create_public_store, parse_now, print_json, save_public_store,
};

pub fn run_share(args: ShareArgs, output_format: OutputFormat) -> CliResult<ExitCode> {
    if args.token.trim().is_empty() {
        return Err(CliError::input("Share token must not be empty"));
    }
    let now = parse_now(args.now.as_deref())?;
    let itinerary = load_itinerary(&args.file)?;

    let snapshot = share(&itinerary, args.token.trim(), now);

    if let Some(path) = &args.store {
        let mut store = load_or_create_public_store(path)?;
        let id = store.publish(snapshot.clone());
        save_public_store(path, &store)?;
        debug!(snapshot = %id, store = %path, "published public copy");
    }

    match output_format {
        OutputFormat::Json => print_json(&snapshot)?,
        OutputFormat::Text => println!(
            "Shared '{}' as {} ({} stops)",
            snapshot.name,
            snapshot.token,
            snapshot.stops.len()
        ),
    }

    Ok(ExitCode::from(EXIT_SUCCESS))
}
