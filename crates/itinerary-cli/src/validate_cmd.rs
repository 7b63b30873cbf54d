use std::process::ExitCode;

use itinerary_core::validate::{Violation, find_violations, validate_date_range};
use serde::Serialize;
use tracing::debug;

use crate::cli::ValidateArgs;
use crate::error::{CliResult, EXIT_INPUT_ERROR, EXIT_SUCCESS, OutputFormat};
use crate::shared::{load_itinerary, print_json};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ValidationReport {
    valid: bool,
    stops: usize,
    violations: Vec<Violation>,
}

pub fn run_validate(args: ValidateArgs, output_format: OutputFormat) -> CliResult<ExitCode> {
    let itinerary = load_itinerary(&args.file)?;
    validate_date_range(itinerary.start_date, itinerary.end_date)?;

    let violations = find_violations(&itinerary);
    debug!(violations = violations.len(), "validated itinerary");

    let report = ValidationReport {
        valid: violations.is_empty(),
        stops: itinerary.stops.len(),
        violations,
    };

    match output_format {
        OutputFormat::Json => print_json(&report)?,
        OutputFormat::Text => {
            for violation in &report.violations {
                println!(
                    "{} ({}): {}",
                    violation.stop_id, violation.stop_name, violation.error
                );
            }
            if report.valid {
                println!("OK: {} stops, no violations", report.stops);
            } else {
                println!(
                    "{} of {} stops failed validation",
                    report.violations.len(),
                    report.stops
                );
            }
        }
    }

    let code = if report.valid {
        EXIT_SUCCESS
    } else {
        EXIT_INPUT_ERROR
    };
    Ok(ExitCode::from(code))
}
