use std::process::ExitCode;

use itinerary_core::grouping::{DayKey, group_by_day};
use itinerary_core::{effective_sort_key, resolve_display_bucket, time_label};
use serde::Serialize;
use tracing::debug;

use crate::cli::ScheduleArgs;
use crate::error::{CliResult, EXIT_SUCCESS, OutputFormat};
use crate::shared::{load_itinerary, print_json};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ScheduleOutput {
    name: String,
    date_range: Option<String>,
    days: Vec<ScheduleDay>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ScheduleDay {
    key: DayKey,
    day_number: Option<u32>,
    title: String,
    stops: Vec<ScheduleStop>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ScheduleStop {
    id: String,
    name: String,
    time_label: String,
    bucket: &'static str,
    sort_key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    manual_order: Option<i64>,
}

pub fn run_schedule(args: ScheduleArgs, output_format: OutputFormat) -> CliResult<ExitCode> {
    let itinerary = load_itinerary(&args.file)?;
    let groups = group_by_day(&itinerary.stops);
    debug!(days = groups.len(), stops = itinerary.stops.len(), "grouped stops");

    let output = ScheduleOutput {
        name: itinerary.name.clone(),
        date_range: itinerary.date_range_label(),
        days: groups
            .iter()
            .map(|group| ScheduleDay {
                key: group.key,
                day_number: group.day_number,
                title: group.title(),
                stops: group
                    .stops
                    .iter()
                    .map(|stop| ScheduleStop {
                        id: stop.id.clone(),
                        name: stop.name.clone(),
                        time_label: time_label(stop),
                        bucket: resolve_display_bucket(stop).badge().key,
                        sort_key: effective_sort_key(stop).to_string(),
                        manual_order: stop.manual_order,
                    })
                    .collect(),
            })
            .collect(),
    };

    match output_format {
        OutputFormat::Json => print_json(&output)?,
        OutputFormat::Text => print_text(&output),
    }

    Ok(ExitCode::from(EXIT_SUCCESS))
}

fn print_text(output: &ScheduleOutput) {
    match &output.date_range {
        Some(range) => println!("{} ({})", output.name, range),
        None => println!("{}", output.name),
    }

    for day in &output.days {
        println!();
        println!("{}", day.title);
        for stop in &day.stops {
            println!("  {:<15}  {}", stop.time_label, stop.name);
        }
    }
}
