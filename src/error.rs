use thiserror::Error;

#[derive(Error, Debug)]
pub enum DartError {
    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV Error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON Parsing Error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration Error: {0}")]
    Config(String),

    #[error("Data Validation Error: {0}")]
    Validation(String),

    #[error("'{operation}' is not supported by the {model} accuracy model")]
    UnsupportedOperation {
        model: &'static str,
        operation: &'static str,
    },

    #[error("Simulated throw landed on a non-finite position (radius {radius}, angle {angle})")]
    InvalidLanding { radius: f64, angle: f64 },

    #[error("Search aborted: {0}")]
    SearchAborted(#[source] Box<DartError>),

    #[error("A search is already running")]
    SearchAlreadyRunning,
}

pub type DsResult<T> = Result<T, DartError>;
