use clap::{Parser, Subcommand};

/// Itinerary scheduling tool
#[derive(Parser, Debug)]
#[command(name = "itinerary", version)]
#[command(about = "Schedule, group and export itinerary stops")]
pub struct Cli {
    /// Enable verbose (debug) logging
    #[arg(long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print stops grouped by day in canonical order
    Schedule(ScheduleArgs),
    /// Classify clock times into time-of-day buckets
    Classify(ClassifyArgs),
    /// Check stops against the itinerary's date range
    Validate(ValidateArgs),
    /// Apply editor operations and print the editor view
    Editor(EditorArgs),
    /// Create a public copy of an itinerary
    Share(ShareArgs),
    /// Show a shared itinerary by token
    Public(PublicArgs),
    /// Lay out the itinerary as paginated export
    Pdf(PdfArgs),
    /// Check that the editor, public view and export agree on order
    Consistency(ConsistencyArgs),
}

#[derive(clap::Args, Debug)]
pub struct ScheduleArgs {
    /// Itinerary JSON file (use - for stdin)
    pub file: String,

    /// Output format: json, text
    #[arg(long, default_value = "text")]
    pub output_format: String,
}

#[derive(clap::Args, Debug)]
pub struct ClassifyArgs {
    /// Clock times as HH:MM (24-hour)
    #[arg(required = true)]
    pub times: Vec<String>,

    /// Output format: json, text
    #[arg(long, default_value = "text")]
    pub output_format: String,
}

#[derive(clap::Args, Debug)]
pub struct ValidateArgs {
    /// Itinerary JSON file (use - for stdin)
    pub file: String,

    /// Output format: json, text
    #[arg(long, default_value = "text")]
    pub output_format: String,
}

#[derive(clap::Args, Debug)]
pub struct EditorArgs {
    /// Itinerary JSON file (use - for stdin)
    pub file: String,

    /// Collapse a day (YYYY-MM-DD or "unscheduled"); repeatable
    #[arg(long)]
    pub collapse: Vec<String>,

    /// Move a stop within its day, as ID:up or ID:down; repeatable
    #[arg(long = "move")]
    pub moves: Vec<String>,

    /// Toggle completion of a stop; repeatable
    #[arg(long)]
    pub complete: Vec<String>,

    /// Completion timestamp (RFC3339); defaults to the current time
    #[arg(long)]
    pub now: Option<String>,

    /// IANA timezone for completion times
    #[arg(short, long, default_value = "UTC")]
    pub tz: String,

    /// Output format: json, text
    #[arg(long, default_value = "text")]
    pub output_format: String,
}

#[derive(clap::Args, Debug)]
pub struct ShareArgs {
    /// Itinerary JSON file (use - for stdin)
    pub file: String,

    /// Share token
    #[arg(long)]
    pub token: String,

    /// Share timestamp (RFC3339); defaults to the current time
    #[arg(long)]
    pub now: Option<String>,

    /// Public store JSON file to publish into (created if missing)
    #[arg(long)]
    pub store: Option<String>,

    /// Output format: json, text
    #[arg(long, default_value = "json")]
    pub output_format: String,
}

#[derive(clap::Args, Debug)]
pub struct PublicArgs {
    /// Public store JSON file
    pub store: String,

    /// Share token
    #[arg(long)]
    pub token: String,

    /// IANA timezone for displayed timestamps
    #[arg(short, long, default_value = "UTC")]
    pub tz: String,

    /// Output format: json, text
    #[arg(long, default_value = "text")]
    pub output_format: String,
}

#[derive(clap::Args, Debug)]
pub struct PdfArgs {
    /// Itinerary JSON file (use - for stdin)
    pub file: String,

    /// Layout JSON file; missing fields use A4 defaults
    #[arg(long)]
    pub layout: Option<String>,

    /// IANA timezone for completion times
    #[arg(short, long, default_value = "UTC")]
    pub tz: String,

    /// Output format: json (draw operations), text (rendered pages)
    #[arg(long, default_value = "text")]
    pub output_format: String,
}

#[derive(clap::Args, Debug)]
pub struct ConsistencyArgs {
    /// Itinerary JSON file (use - for stdin)
    pub file: String,

    /// Layout JSON file used for the export
    #[arg(long)]
    pub layout: Option<String>,

    /// Output format: json, text
    #[arg(long, default_value = "text")]
    pub output_format: String,
}
