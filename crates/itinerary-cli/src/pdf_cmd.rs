use std::io::{self, Write};
use std::process::ExitCode;

use itinerary_core::pdf::{PdfExporter, PdfRenderer, PlainTextRenderer};

use crate::cli::PdfArgs;
use crate::error::{CliError, CliResult, EXIT_SUCCESS, OutputFormat};
use crate::shared::{load_itinerary, load_layout, parse_tz_or_input_error, print_json};

pub fn run_pdf(args: PdfArgs, output_format: OutputFormat) -> CliResult<ExitCode> {
    let tz = parse_tz_or_input_error(&args.tz)?;
    let layout = load_layout(args.layout.as_deref())?;
    let itinerary = load_itinerary(&args.file)?;

    let renderer = PlainTextRenderer::new(&layout);
    let document = PdfExporter::new(layout).export(&itinerary, tz);

    match output_format {
        OutputFormat::Json => print_json(&document)?,
        OutputFormat::Text => {
            let bytes = renderer
                .render(&document)
                .map_err(|e| CliError::runtime(format!("Failed to render document: {}", e)))?;
            io::stdout()
                .write_all(&bytes)
                .map_err(|e| CliError::runtime(format!("Failed to write output: {}", e)))?;
        }
    }

    Ok(ExitCode::from(EXIT_SUCCESS))
}
