use std::fmt;
use std::process::ExitCode;

use itinerary_core::{ItineraryError, NotFoundError, OrderingConflict, ValidationError};
use serde::Serialize;

pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_INPUT_ERROR: u8 = 2;
pub const EXIT_RUNTIME_ERROR: u8 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Text,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Input,
    Runtime,
}

/// What a rejected command was about, echoed in the JSON envelope.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Subject {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub day: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

impl Subject {
    fn is_empty(&self) -> bool {
        self.stop.is_none() && self.day.is_none() && self.token.is_none()
    }
}

#[derive(Debug)]
pub struct CliError {
    kind: ErrorKind,
    message: String,
    status: Option<&'static str>,
    subject: Subject,
}

impl CliError {
    pub fn input(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Input,
            message: message.into(),
            status: None,
            subject: Subject::default(),
        }
    }

    /// Input that the engine refused, tagged with why.
    pub fn rejected(message: impl Into<String>, status: &'static str) -> Self {
        Self {
            kind: ErrorKind::Input,
            message: message.into(),
            status: Some(status),
            subject: Subject::default(),
        }
    }

    fn about_stop(mut self, id: impl Into<String>) -> Self {
        self.subject.stop = Some(id.into());
        self
    }

    pub fn runtime(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Runtime,
            message: message.into(),
            status: None,
            subject: Subject::default(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        match self.kind {
            ErrorKind::Input => EXIT_INPUT_ERROR,
            ErrorKind::Runtime => EXIT_RUNTIME_ERROR,
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

impl From<ValidationError> for CliError {
    fn from(err: ValidationError) -> Self {
        let rejected = CliError::rejected(err.to_string(), "invalid_stop");
        match err {
            ValidationError::UnknownStop(id) | ValidationError::DuplicateStop(id) => {
                rejected.about_stop(id)
            }
            _ => rejected,
        }
    }
}

impl From<OrderingConflict> for CliError {
    fn from(err: OrderingConflict) -> Self {
        let mut rejected =
            CliError::rejected(err.to_string(), "ordering_conflict").about_stop(err.stop_id);
        rejected.subject.day = Some(err.day.to_string());
        rejected
    }
}

impl From<NotFoundError> for CliError {
    fn from(err: NotFoundError) -> Self {
        let token = match &err {
            NotFoundError::TokenNotFound(t)
            | NotFoundError::SnapshotNotFound(t)
            | NotFoundError::Revoked(t) => t.clone(),
        };
        let mut rejected = CliError::rejected(err.to_string(), "not_found");
        rejected.subject.token = Some(token);
        rejected
    }
}

impl From<ItineraryError> for CliError {
    fn from(err: ItineraryError) -> Self {
        match err {
            ItineraryError::Validation(e) => e.into(),
            ItineraryError::Ordering(e) => e.into(),
            ItineraryError::NotFound(e) => e.into(),
            ItineraryError::Store(e) => CliError::runtime(e.to_string()),
            ItineraryError::InvalidTimezone(_) => CliError::input(err.to_string()),
        }
    }
}

pub type CliResult<T> = std::result::Result<T, CliError>;

#[derive(Debug, Serialize)]
struct ErrorOutput {
    error: String,
    exit_code: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    status: Option<String>,
    #[serde(skip_serializing_if = "Subject::is_empty")]
    subject: Subject,
}

pub fn render_error(err: &CliError, output_format: OutputFormat) -> ExitCode {
    match output_format {
        OutputFormat::Json => {
            let envelope = ErrorOutput {
                error: err.message.clone(),
                exit_code: err.exit_code(),
                status: err.status.map(str::to_string),
                subject: err.subject.clone(),
            };

            match serde_json::to_string_pretty(&envelope) {
                Ok(json) => eprintln!("{}", json),
                Err(_) => eprintln!("Error: {}", err.message),
            }
        }
        OutputFormat::Text => {
            eprintln!("Error: {}", err.message);
        }
    }

    ExitCode::from(err.exit_code())
}

pub fn output_format_hint(s: &str) -> OutputFormat {
    if s.eq_ignore_ascii_case("json") {
        OutputFormat::Json
    } else {
        OutputFormat::Text
    }
}

pub fn parse_output_format(s: &str) -> CliResult<OutputFormat> {
    match s.to_lowercase().as_str() {
        "json" => Ok(OutputFormat::Json),
        "text" => Ok(OutputFormat::Text),
        _ => Err(CliError::input(format!(
            "Invalid output_format '{}'. Expected: json, text",
            s
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use itinerary_core::StoreError;

    #[test]
    fn rejected_stop_is_an_input_error_with_status() {
        let err: CliError = ValidationError::MissingName.into();
        assert_eq!(err.exit_code(), EXIT_INPUT_ERROR);
        assert_eq!(err.status, Some("invalid_stop"));
        assert_eq!(err.to_string(), "a stop needs a name");
    }

    #[test]
    fn unknown_stop_names_the_stop() {
        let err: CliError = ValidationError::UnknownStop("s9".into()).into();
        assert_eq!(err.subject.stop.as_deref(), Some("s9"));
        assert_eq!(err.subject.day, None);
    }

    #[test]
    fn missing_public_copy_is_tagged_not_found() {
        let err: CliError = ItineraryError::from(NotFoundError::Revoked("t".into())).into();
        assert_eq!(err.exit_code(), EXIT_INPUT_ERROR);
        assert_eq!(err.status, Some("not_found"));
        assert_eq!(err.subject.token.as_deref(), Some("t"));
    }

    #[test]
    fn store_failure_is_a_runtime_error() {
        let err: CliError = ItineraryError::from(StoreError::Serialization("eof".into())).into();
        assert_eq!(err.exit_code(), EXIT_RUNTIME_ERROR);
        assert_eq!(err.status, None);
        assert!(err.subject.is_empty());
    }

    #[test]
    fn output_format_is_case_insensitive() {
        assert_eq!(parse_output_format("JSON").unwrap(), OutputFormat::Json);
        assert!(parse_output_format("yaml").is_err());
        assert_eq!(output_format_hint("yaml"), OutputFormat::Text);
    }
}
