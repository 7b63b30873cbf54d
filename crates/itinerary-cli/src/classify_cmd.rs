use std::process::ExitCode;

use itinerary_core::classify::classify_time;
use itinerary_core::parse::parse_clock_time;
use serde::Serialize;

use crate::cli::ClassifyArgs;
use crate::error::{CliResult, EXIT_SUCCESS, OutputFormat};
use crate::shared::print_json;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Classification {
    time: String,
    bucket: &'static str,
    label: &'static str,
    sort_key: &'static str,
    icon: &'static str,
    color: &'static str,
}

pub fn run_classify(args: ClassifyArgs, output_format: OutputFormat) -> CliResult<ExitCode> {
    let results = args
        .times
        .iter()
        .map(|input| -> CliResult<Classification> {
            let time = parse_clock_time(input.trim())?;
            let bucket = classify_time(time);
            Ok(Classification {
                time: input.trim().to_string(),
                bucket: bucket.name(),
                label: bucket.label(),
                sort_key: bucket.sort_key(),
                icon: bucket.icon(),
                color: bucket.color(),
            })
        })
        .collect::<CliResult<Vec<_>>>()?;

    match output_format {
        OutputFormat::Json => print_json(&results)?,
        OutputFormat::Text => {
            for result in &results {
                println!("{} -> {}", result.time, result.label);
            }
        }
    }

    Ok(ExitCode::from(EXIT_SUCCESS))
}
