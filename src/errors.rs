// Error types for f1lab

use snafu::Snafu;
use std::io;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum F1LabError {
    // Errors talking to the session data backend
    #[snafu(display("Could not reach the data backend: {reason}"))]
    TransportError { reason: String },
    #[snafu(display("{detail}"))]
    ApiError { detail: String },
    #[snafu(display("Could not decode backend response"))]
    DecodeError { source: io::Error },
    #[snafu(display("Invalid API URL: {url}"))]
    InvalidApiUrl { url: String },
    #[snafu(display("Background fetch of {what} stopped unexpectedly"))]
    FetchWorkerError { what: String },

    // Config management errors
    #[snafu(display("Could not find application data directory to save config file"))]
    NoConfigDir,
    #[snafu(display("Error reading or writing config file"))]
    ConfigIOError { source: io::Error },
    #[snafu(display("Error serializing config file"))]
    ConfigSerializeError { source: serde_json::Error },

    // Output errors
    #[snafu(display("Error writing output file"))]
    WriterError { source: io::Error },
    #[snafu(display("SVG generation failed: {reason}"))]
    SvgGenerationError { reason: String },

    // UI errors
    #[snafu(display("Could not start dashboard: {reason}"))]
    DashboardError { reason: String },

    // User input validation errors
    #[snafu(display("Invalid user input: {field} - {reason}"))]
    InvalidUserInput { field: String, reason: String },
}

impl From<ureq::Error> for F1LabError {
    fn from(value: ureq::Error) -> Self {
        match value {
            ureq::Error::Status(code, _) => F1LabError::ApiError {
                detail: format!("Backend responded with status {code}"),
            },
            ureq::Error::Transport(transport) => F1LabError::TransportError {
                reason: transport.to_string(),
            },
        }
    }
}
