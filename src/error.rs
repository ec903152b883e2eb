use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Diagnostic, Debug)]
pub enum SimulatorError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Format error: {0}")]
    FormatError(#[from] std::fmt::Error),
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("Validation error: {0}")]
    #[diagnostic(code(orderflow::validation))]
    ValidationError(String),
    #[error("Service error: {0}")]
    #[diagnostic(code(orderflow::service))]
    ServiceError(String),
    #[error("A scenario is already running: {0}")]
    #[diagnostic(
        code(orderflow::busy),
        help("wait for the running scenario to finish before starting another")
    )]
    ScenarioInProgress(String),
}

pub type Result<T> = std::result::Result<T, SimulatorError>;
