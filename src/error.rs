use thiserror::Error;

#[derive(Debug, Error)]
pub enum EstimatorError {
    #[error("Report error: {0}")]
    Report(String),

    #[error("Catalog error: {0}")]
    Catalog(String),

    #[error("Settings error: {0}")]
    Settings(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<EstimatorError> for String {
    fn from(err: EstimatorError) -> Self {
        err.to_string()
    }
}
