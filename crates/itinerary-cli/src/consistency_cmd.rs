use std::process::ExitCode;

use chrono::Utc;
use chrono_tz::Tz;
use itinerary_core::editor::ItineraryEditor;
use itinerary_core::grouping::{ScheduleOrder, group_by_day};
use itinerary_core::pdf::PdfExporter;
use itinerary_core::public::{PublicView, share};
use serde::Serialize;
use tracing::warn;

use crate::cli::ConsistencyArgs;
use crate::error::{CliResult, EXIT_RUNTIME_ERROR, EXIT_SUCCESS, OutputFormat};
use crate::shared::{load_itinerary, load_layout, print_json};

#[derive(Debug, Serialize)]
struct AdapterCheck {
    adapter: &'static str,
    consistent: bool,
}

#[derive(Debug, Serialize)]
struct ConsistencyReport {
    consistent: bool,
    days: usize,
    stops: usize,
    adapters: Vec<AdapterCheck>,
    order: ScheduleOrder,
}

pub fn run_consistency(args: ConsistencyArgs, output_format: OutputFormat) -> CliResult<ExitCode> {
    let layout = load_layout(args.layout.as_deref())?;
    let itinerary = load_itinerary(&args.file)?;
    let canonical = ScheduleOrder::of_groups(&group_by_day(&itinerary.stops));

    let editor = ItineraryEditor::new(itinerary.clone()).view().order();
    let public = PublicView::from_snapshot(&share(&itinerary, "check", Utc::now()), Tz::UTC).order();
    let pdf = PdfExporter::new(layout).export(&itinerary, Tz::UTC).order();

    let adapters: Vec<AdapterCheck> = [("editor", editor), ("public", public), ("pdf", pdf)]
        .into_iter()
        .map(|(adapter, order)| {
            let consistent = order == canonical;
            if !consistent {
                warn!(adapter, "order differs from canonical grouping");
            }
            AdapterCheck {
                adapter,
                consistent,
            }
        })
        .collect();

    let report = ConsistencyReport {
        consistent: adapters.iter().all(|a| a.consistent),
        days: canonical.0.len(),
        stops: canonical.0.iter().map(|(_, ids)| ids.len()).sum(),
        adapters,
        order: canonical,
    };

    match output_format {
        OutputFormat::Json => print_json(&report)?,
        OutputFormat::Text => {
            for check in &report.adapters {
                let status = if check.consistent { "OK" } else { "MISMATCH" };
                println!("{}: {}", check.adapter, status);
            }
            println!(
                "{} days, {} stops in canonical order",
                report.days, report.stops
            );
        }
    }

    let code = if report.consistent {
        EXIT_SUCCESS
    } else {
        EXIT_RUNTIME_ERROR
    };
    Ok(ExitCode::from(code))
}
