use std::process::ExitCode;

use itinerary_core::editor::{EditorView, ItineraryEditor};
use tracing::{debug, warn};

use crate::cli::EditorArgs;
use crate::error::{CliResult, EXIT_SUCCESS, OutputFormat};
use crate::shared::{
    load_itinerary, parse_day_key, parse_move, parse_now, parse_tz_or_input_error, print_json,
};

pub fn run_editor(args: EditorArgs, output_format: OutputFormat) -> CliResult<ExitCode> {
    let tz = parse_tz_or_input_error(&args.tz)?;
    let now = parse_now(args.now.as_deref())?;
    let collapse = args
        .collapse
        .iter()
        .map(|s| parse_day_key(s))
        .collect::<CliResult<Vec<_>>>()?;
    let moves = args
        .moves
        .iter()
        .map(|s| parse_move(s))
        .collect::<CliResult<Vec<_>>>()?;

    let itinerary = load_itinerary(&args.file)?;
    let mut editor = ItineraryEditor::new(itinerary).with_timezone(tz);

    for id in &args.complete {
        let completed = editor.toggle_complete(id, now)?;
        debug!(stop = %id, completed, "toggled completion");
    }

    for (id, direction) in &moves {
        if !editor.move_stop(id, *direction)? {
            warn!(stop = %id, %direction, "stop is already at the edge of its day");
        }
    }

    for key in collapse {
        editor.toggle_day(key);
    }

    debug!(pending = editor.pending_writes().len(), "editor changes queued");

    let view = editor.view();
    match output_format {
        OutputFormat::Json => print_json(&view)?,
        OutputFormat::Text => print_text(&view),
    }

    Ok(ExitCode::from(EXIT_SUCCESS))
}

fn print_text(view: &EditorView) {
    println!("{}", view.name);
    match &view.date_range {
        Some(range) => println!("{} ({})", range, view.status),
        None => println!("({})", view.status),
    }

    for section in &view.sections {
        println!();
        let marker = if section.collapsed { '>' } else { 'v' };
        println!(
            "{} {} [{}/{}]",
            marker, section.title, section.completed, section.total
        );
        if section.collapsed {
            continue;
        }

        for row in &section.rows {
            let mark = if row.completed { "[x]" } else { "[ ]" };
            let mut line = format!("  {} {:<15}  {}", mark, row.time_label, row.name);
            if let Some(at) = &row.completed_at {
                line.push_str(&format!(" (done {})", at));
            }
            if row.out_of_range {
                line.push_str(" (outside trip dates)");
            }
            println!("{}", line);
        }
    }
}
